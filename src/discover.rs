// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Discovers SVG icon files below a sprite root directory.
//!
//! Entries are visited depth-first with siblings sorted by file name, so the
//! traversal order (and therefore the symbol order of the generated sprite)
//! does not depend on the platform's directory listing order.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::icon_id::to_slash_path;

const SVG_EXTENSION: &str = "svg";

/// Source file discovered for a sprite.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct IconFile
{
    /// Location of the file on disk.
    pub path:          PathBuf,
    /// Path relative to the sprite root, `/`-separated.
    pub relative_path: String,
}

/// Collects `.svg` files located in `directory`.
///
/// Non-recursive discovery visits direct children only; recursive discovery
/// visits the whole subtree. Directories are descended but never reported,
/// and files with any other extension are skipped. A missing directory or an
/// unreadable entry is logged and skipped rather than reported as an error.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use iconsprite::discover_svg_files;
///
/// let files = discover_svg_files(Path::new("assets/icons",), true,);
/// for file in files {
///     println!("{} -> {}", file.relative_path, file.path.display());
/// }
/// ```
pub fn discover_svg_files(directory: &Path, recursive: bool,) -> Vec<IconFile,>
{
    if !directory.is_dir() {
        warn!("Directory not found: {}", directory.display());
        return Vec::new();
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(directory,)
        .min_depth(1,)
        .max_depth(max_depth,)
        .follow_links(true,)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry,) => entry,
            Err(error,) => {
                warn!("Skipping unreadable entry below {}: {error}", directory.display());
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_svg_extension(entry.path(),) {
            continue;
        }

        let Ok(relative,) = entry.path().strip_prefix(directory,) else {
            continue;
        };

        debug!("Discovered {}", entry.path().display());
        files.push(IconFile {
            path:          entry.path().to_path_buf(),
            relative_path: to_slash_path(relative,),
        },);
    }

    files
}

fn has_svg_extension(path: &Path,) -> bool
{
    path.extension().is_some_and(|extension| extension == SVG_EXTENSION,)
}
