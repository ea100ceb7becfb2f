use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use super::RenderError;

/// Outcome of a formatting attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FmtOutcome {
    Formatted,
    /// `gofmt` is not on `PATH`; the file is left as written.
    Skipped,
}

/// Run `gofmt -w` on `path`.
pub fn gofmt(path: &Path) -> Result<FmtOutcome, RenderError> {
    let bin = match which::which("gofmt") {
        Ok(bin) => bin,
        Err(e) => {
            warn!(error = %e, "gofmt not found, output left unformatted");
            return Ok(FmtOutcome::Skipped);
        }
    };
    run(&bin, path)
}

fn run(bin: &Path, path: &Path) -> Result<FmtOutcome, RenderError> {
    debug!(gofmt = %bin.display(), path = %path.display(), "formatting output");
    let output = Command::new(bin)
        .arg("-w")
        .arg(path)
        .output()
        .map_err(|source| RenderError::Spawn { path: path.to_path_buf(), source })?;
    if !output.status.success() {
        return Err(RenderError::Format {
            path: path.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(FmtOutcome::Formatted)
}
