// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Artifact persistence for generated sprites and manifests.
//!
//! Writes go to a temporary file inside the destination directory which is
//! then renamed over the target, so readers observe either the previous
//! artifact or the complete new one.

use std::{io::Write, path::{Path, PathBuf}};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, artifact_io_error};

/// Result of an artifact write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactWrite {
    /// Location of the written artifact.
    pub destination: PathBuf,
    /// Number of bytes written.
    pub bytes:       usize
}

/// Atomically replaces `destination` with `contents`, creating parent
/// directories as needed.
///
/// # Errors
///
/// Returns [`Error::ArtifactIo`] when the parent directory cannot be created
/// or the temporary file cannot be written or renamed. The previous artifact
/// is left untouched in that case.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use iconsprite::write_artifact;
///
/// # fn example() -> Result<(), iconsprite::Error> {
/// let written = write_artifact(Path::new("dist/icons-sprite.svg"), "<svg></svg>")?;
/// println!("Wrote {} bytes to {}", written.bytes, written.destination.display());
/// # Ok(())
/// # }
/// ```
pub fn write_artifact(destination: &Path, contents: &str) -> Result<ArtifactWrite, Error> {
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new(".")
    };

    if !parent.exists() {
        std::fs::create_dir_all(parent).map_err(|e| artifact_io_error(destination, e))?;
    }

    let mut file = NamedTempFile::new_in(parent).map_err(|e| artifact_io_error(destination, e))?;
    file.write_all(contents.as_bytes())
        .and_then(|()| file.as_file().sync_all())
        .map_err(|e| artifact_io_error(destination, e))?;
    file.persist(destination)
        .map_err(|e| artifact_io_error(destination, e.error))?;

    debug!("Wrote {} bytes to {}", contents.len(), destination.display());

    Ok(ArtifactWrite {
        destination: destination.to_path_buf(),
        bytes:       contents.len()
    })
}
