pub mod fmt;
pub mod gotest;

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Config;
use self::fmt::FmtOutcome;
use crate::plugins::PluggableFile;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("open output file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write output file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("run gofmt on {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("format generated file {}: {stderr}", path.display())]
    Format { path: PathBuf, stderr: String },
}

impl RenderError {
    pub fn code(&self) -> &'static str {
        match self {
            RenderError::Open { .. } => "GGT-I003",
            RenderError::Write { .. } => "GGT-I004",
            RenderError::Spawn { .. } => "GGT-I005",
            RenderError::Format { .. } => "GGT-I006",
        }
    }
}

/// What `write` did to the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteReport {
    pub appended: bool,
    /// `None` when formatting is turned off.
    pub format: Option<FmtOutcome>,
}

/// Write the rendered tests to `config.output`: created (truncating) when
/// absent, appended to when it already exists. Runs gofmt afterwards when
/// `config.format` is set.
pub fn write(file: &PluggableFile, config: &Config) -> Result<WriteReport, RenderError> {
    let text = gotest::emit(file);
    let appended = write_text(&config.output, &text)?;
    let format = if config.format { Some(fmt::gofmt(&config.output)?) } else { None };
    info!(
        path = %config.output.display(),
        tests = file.functions.len(),
        appended,
        format = ?format,
        "wrote test file"
    );
    Ok(WriteReport { appended, format })
}

/// Returns whether the text was appended to an existing file.
fn write_text(path: &Path, text: &str) -> Result<bool, RenderError> {
    let exists = path.exists();
    let mut options = OpenOptions::new();
    if exists {
        options.append(true);
    } else {
        options.write(true).create(true).truncate(true);
    }
    let mut out = options
        .open(path)
        .map_err(|source| RenderError::Open { path: path.to_path_buf(), source })?;

    let write_err = |source| RenderError::Write { path: path.to_path_buf(), source };
    if exists {
        out.write_all(b"\n").map_err(write_err)?;
    }
    out.write_all(text.as_bytes()).map_err(write_err)?;
    Ok(exists)
}
