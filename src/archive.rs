//! Export archives and transcript discovery.
//!
//! Chat exports arrive as a zip holding the transcript (`_chat.txt`) next to
//! its media files. [`extract_archive`] unpacks one into a directory and
//! [`find_transcript`] locates the transcript inside it.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatlog::archive::{extract_archive, find_transcript};
//!
//! # fn example() -> chatlog::Result<()> {
//! let written = extract_archive("WhatsApp Chat.zip", "out")?;
//! println!("extracted {written} files");
//!
//! if let Some(transcript) = find_transcript("out")? {
//!     println!("transcript at {}", transcript.display());
//! }
//! # Ok(())
//! # }
//! ```

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::error::{ChatlogError, Result};

/// Name exports give the transcript.
pub const TRANSCRIPT_FILE_NAME: &str = "_chat.txt";

/// Extracts every entry of the zip at `archive` into `dest`.
///
/// Entries whose names would land outside `dest` are skipped. Returns the
/// number of files written.
///
/// # Errors
///
/// Returns [`ChatlogError::InputNotFound`] if `archive` does not exist,
/// [`ChatlogError::Archive`] if it is not a readable zip, and
/// [`ChatlogError::Io`] if `dest` cannot be written.
pub fn extract_archive(archive: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<usize> {
    let archive = archive.as_ref();
    let dest = dest.as_ref();
    if !archive.exists() {
        return Err(ChatlogError::input_not_found(archive));
    }

    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file).map_err(|e| ChatlogError::archive(archive, e))?;
    fs::create_dir_all(dest)?;

    let mut written = 0;
    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| ChatlogError::archive(archive, e))?;

        let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
            warn!(entry = entry.name(), "skipping archive entry outside destination");
            continue;
        };
        let target = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        debug!(path = %target.display(), "extracted");
        written += 1;
    }

    info!(
        archive = %archive.display(),
        dest = %dest.display(),
        files = written,
        "archive extracted"
    );
    Ok(written)
}

/// Finds the transcript in `dir`.
///
/// Prefers `_chat.txt`; otherwise takes the first `.txt` file in name order.
/// Only the top level of `dir` is searched.
///
/// # Errors
///
/// Returns [`ChatlogError::Io`] if `dir` cannot be listed.
pub fn find_transcript(dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
    let dir = dir.as_ref();
    let preferred = dir.join(TRANSCRIPT_FILE_NAME);
    if preferred.is_file() {
        return Ok(Some(preferred));
    }

    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .collect();
    candidates.sort();

    Ok(candidates.into_iter().next())
}
