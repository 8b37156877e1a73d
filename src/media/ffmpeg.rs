use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::MediaTranscoder;
use crate::error::{ChatlogError, Result};

/// Transcoder backed by the `ffmpeg` executable.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: String,
}

impl FfmpegTranscoder {
    /// Uses `ffmpeg` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("ffmpeg")
    }

    /// Uses a specific executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaTranscoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        &self.program
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .is_ok_and(|status| status.success())
    }

    async fn transcode(&self, source: &Path, dest: &Path) -> Result<()> {
        debug!(source = %source.display(), dest = %dest.display(), "transcoding");

        let output = Command::new(&self.program)
            .args(["-y", "-loglevel", "error", "-i"])
            .arg(source)
            .arg(dest)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ChatlogError::transcode(source, e.to_string()))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => output.status.to_string(),
                text => text.to_string(),
            };
            Err(ChatlogError::transcode(source, message))
        }
    }
}
