use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use ggt::codegen;
use ggt::config::{Config, ConfigError, Emit};
use ggt::diagnostic::{self, Diagnostic, ansi::AnsiRenderer, registry};
use ggt::observability;
use ggt::plugins::Pipeline;
use ggt::resolve::{Generation, Generator};

#[derive(Parser, Debug)]
#[command(name = "ggt", version, about = "Generate table-driven test skeletons for untested Go functions")]
struct Cli {
    /// Go file to generate tests for
    #[arg(value_name = "INPUT")]
    input_pos: Option<PathBuf>,

    /// Test file to create or append to
    #[arg(value_name = "OUTPUT")]
    output_pos: Option<PathBuf>,

    /// Input .go file (overrides INPUT)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output _test.go file [default: INPUT with _test.go]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Only generate tests whose name matches
    #[arg(short, long, value_name = "REGEX")]
    run: Option<String>,

    /// What to produce
    #[arg(long, value_enum, default_value = "go")]
    emit: EmitFormat,

    /// Do not run gofmt on the output file
    #[arg(long)]
    no_fmt: bool,

    /// Print diagnostics as JSON lines
    #[arg(long)]
    json: bool,

    /// Print the generated tree to stderr and enable debug logs
    #[arg(short, long)]
    debug: bool,

    /// Explain a diagnostic code, e.g. GGT-R002
    #[arg(long, value_name = "CODE")]
    explain: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EmitFormat {
    /// Write the Go test file
    Go,
    /// Print the generation model as JSON
    Json,
}

impl From<EmitFormat> for Emit {
    fn from(e: EmitFormat) -> Self {
        match e {
            EmitFormat::Go => Emit::Go,
            EmitFormat::Json => Emit::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Some(code) = &cli.explain {
        return explain(code);
    }

    let reporter = Reporter { json: cli.json };
    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            reporter.report(&Diagnostic::from(&e));
            return ExitCode::from(2);
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(diagnostics) => {
            for d in &diagnostics {
                reporter.report(d);
            }
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--debug`.
fn init_tracing(debug: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<Config, ConfigError> {
    let input = cli.input.clone().or_else(|| cli.input_pos.clone());
    let output = cli.output.clone().or_else(|| cli.output_pos.clone());
    Ok(Config::new(input, output, cli.run.as_deref())?
        .with_emit(cli.emit.into())
        .with_format(!cli.no_fmt)
        .with_debug(cli.debug))
}

fn run(config: &Config) -> Result<(), Vec<Diagnostic>> {
    let generation = Generator::new(config)
        .generate_missing_tests(&[])
        .map_err(|e| diagnostic::from_generate_error(&e))?;

    let file = match generation {
        Generation::UpToDate => {
            println!("no missing tests");
            return Ok(());
        }
        Generation::Missing(file) => file,
    };

    let file = Pipeline::default().apply(file);
    if config.debug {
        eprint!("{}", observability::show_tree(&file));
    }

    match config.emit {
        Emit::Json => {
            let text = serde_json::to_string_pretty(&file)
                .map_err(|e| vec![Diagnostic::error(format!("serialize model: {e}"))])?;
            println!("{text}");
        }
        Emit::Go => {
            codegen::write(&file, config).map_err(|e| vec![Diagnostic::from(&e)])?;
        }
    }
    Ok(())
}

fn explain(code: &str) -> ExitCode {
    match registry::lookup(code) {
        Some(entry) => {
            print!("{}", entry.long);
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("error: unknown diagnostic code {code:?}");
            ExitCode::from(2)
        }
    }
}

struct Reporter {
    json: bool,
}

impl Reporter {
    fn report(&self, d: &Diagnostic) {
        if self.json {
            eprintln!("{}", diagnostic::json::render(d));
        } else {
            let renderer = AnsiRenderer { use_color: io::stderr().is_terminal() };
            eprint!("{}", renderer.render(d));
        }
    }
}
