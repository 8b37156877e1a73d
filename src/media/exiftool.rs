use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::MediaValidator;

/// Validator backed by `exiftool`.
///
/// A file is valid when the tool exits cleanly, prints metadata and nothing
/// on stderr.
#[derive(Debug, Clone)]
pub struct ExifToolValidator {
    program: String,
}

impl ExifToolValidator {
    /// Uses `exiftool` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("exiftool")
    }

    /// Uses a specific executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ExifToolValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaValidator for ExifToolValidator {
    async fn validate(&self, path: &Path) -> bool {
        let output = match Command::new(&self.program)
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                debug!(program = %self.program, error = %e, "validator could not run");
                return false;
            }
        };

        output.status.success()
            && output.stderr.iter().all(u8::is_ascii_whitespace)
            && !output.stdout.iter().all(u8::is_ascii_whitespace)
    }
}
