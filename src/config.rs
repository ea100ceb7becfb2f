use std::path::{Path, PathBuf};

use regex::Regex;

/// What to do with the generated model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emit {
    /// Render Go test source into the output file.
    #[default]
    Go,
    /// Print the model as JSON to stdout and leave the filesystem alone.
    Json,
}

/// Settings for one generation run, built once from the command line and
/// passed by reference to the generator and the writer.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Keep only functions whose test name matches.
    pub run: Option<Regex>,
    pub emit: Emit,
    /// Run `gofmt -w` on the output file after writing.
    pub format: bool,
    pub debug: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no input file given")]
    MissingInput,
    #[error("input file {0:?} expected format: *.go")]
    InputExtension(PathBuf),
    #[error("output file {0:?} expected format: *_test.go")]
    OutputExtension(PathBuf),
    #[error("invalid --run pattern {pattern:?}: {source}")]
    BadPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::MissingInput => "GGT-C001",
            ConfigError::InputExtension(_) => "GGT-C002",
            ConfigError::OutputExtension(_) => "GGT-C003",
            ConfigError::BadPattern { .. } => "GGT-C004",
        }
    }
}

impl Config {
    /// Validate paths and compile the run filter. A missing output path
    /// defaults to the input with `_test.go` in place of `.go`.
    pub fn new(
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        run: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let input = input.ok_or(ConfigError::MissingInput)?;
        if !has_suffix(&input, ".go") {
            return Err(ConfigError::InputExtension(input));
        }
        let output = output.unwrap_or_else(|| default_output(&input));
        if !has_suffix(&output, "_test.go") {
            return Err(ConfigError::OutputExtension(output));
        }
        let run = run
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::BadPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .transpose()?;

        Ok(Config {
            input,
            output,
            run,
            emit: Emit::Go,
            format: true,
            debug: false,
        })
    }

    pub fn with_emit(mut self, emit: Emit) -> Self {
        self.emit = emit;
        self
    }

    pub fn with_format(mut self, format: bool) -> Self {
        self.format = format;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.to_string_lossy().ends_with(suffix)
}

/// `dir/service.go` becomes `dir/service_test.go`.
pub fn default_output(input: &Path) -> PathBuf {
    let text = input.to_string_lossy();
    let stem = text.strip_suffix(".go").unwrap_or(&text);
    PathBuf::from(format!("{stem}_test.go"))
}
