// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! The one routine that turns a sprite root directory into a [`Sprite`].
//!
//! Both the build driver and the runtime repository call into this module, so
//! persisted artifacts and sprites generated on demand can never drift apart.

use std::{fs, path::Path};

use tracing::{debug, warn};

use crate::{
    discover::{IconFile, discover_svg_files},
    error::{self, Error},
    icon_id::{derive_icon_id, is_valid_fragment_id},
    sprite::{NormalizedIcon, Sprite, assemble_sprite},
    svg::normalize_svg
};

/// Per-file result reported while a sprite is being assembled.
#[derive(Debug)]
pub enum IconOutcome<'a> {
    /// The file was read and normalized under `id`.
    Processed {
        /// Derived icon id.
        id:   &'a str,
        /// File that produced the icon.
        file: &'a IconFile
    },
    /// The file could not be read and was skipped.
    Failed {
        /// File that failed.
        file:  &'a IconFile,
        /// Read failure.
        error: &'a Error
    }
}

/// Reads and normalizes one discovered file.
///
/// Malformed markup never fails; it yields an empty symbol with the default
/// viewBox and a warning. Only I/O problems are reported.
///
/// # Errors
///
/// Returns [`Error::SvgIo`] when the file cannot be read as UTF-8 text.
pub fn load_icon(file: &IconFile) -> Result<NormalizedIcon, Error> {
    let raw = fs::read_to_string(&file.path).map_err(|source| error::svg_io_error(&file.path, source))?;

    let id = derive_icon_id(&file.relative_path);
    if !is_valid_fragment_id(&id) {
        warn!(
            "Icon id '{id}' derived from {} is not a valid fragment identifier",
            file.path.display()
        );
    }

    let cleaned = normalize_svg(&raw);
    if !cleaned.has_root {
        warn!(
            "No <svg> root found in {}; emitting an empty symbol",
            file.path.display()
        );
    }

    Ok(NormalizedIcon::new(id, file.relative_path.clone(), cleaned))
}

/// Loads `files` in order and assembles them into a sprite.
///
/// Files that cannot be read are logged, reported through `on_icon` and
/// skipped; the remaining files are still assembled.
pub fn assemble_files<F>(
    sprite_id: &str,
    directory: &Path,
    recursive: bool,
    files: &[IconFile],
    mut on_icon: F
) -> Sprite
where
    F: FnMut(IconOutcome<'_>)
{
    let mut icons = Vec::with_capacity(files.len());

    for file in files {
        match load_icon(file) {
            Ok(icon) => {
                debug!("Processed {} as '{}'", file.relative_path, icon.id);
                on_icon(IconOutcome::Processed {
                    id: &icon.id,
                    file
                });
                icons.push(icon);
            }
            Err(error) => {
                warn!("Error processing {}: {error}", file.path.display());
                on_icon(IconOutcome::Failed {
                    file,
                    error: &error
                });
            }
        }
    }

    Sprite::from_assembled(sprite_id, directory, recursive, assemble_sprite(sprite_id, icons))
}

/// Discovers, normalizes and assembles the sprite rooted at `directory`.
///
/// A missing directory produces an empty sprite.
pub fn build_sprite(sprite_id: &str, directory: &Path, recursive: bool) -> Sprite {
    let files = discover_svg_files(directory, recursive);
    debug!(
        "Building sprite '{sprite_id}' from {} files in {}",
        files.len(),
        directory.display()
    );
    assemble_files(sprite_id, directory, recursive, &files, |_| {})
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tempfile::tempdir;

    use super::*;
    use crate::svg::DEFAULT_VIEW_BOX;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent");
        }
        fs::write(path, contents).expect("failed to write icon");
    }

    #[test]
    fn build_sprite_derives_ids_and_view_boxes() {
        let directory = tempdir().expect("failed to create temp dir");
        write(directory.path(), "home.svg", "<svg viewBox=\"0 0 32 32\"><path/></svg>");
        write(
            directory.path(),
            "folder/star.svg",
            "<svg width=\"16\" height=\"16\"><circle/></svg>"
        );

        let sprite = build_sprite("icons", directory.path(), true);

        assert_eq!(sprite.sprite_id, "icons");
        assert_eq!(sprite.manifest["home"].view_box, "0 0 32 32");
        assert_eq!(sprite.manifest["folder-star"].view_box, "0 0 16 16");
        assert_eq!(sprite.manifest["folder-star"].source.as_deref(), Some("folder/star.svg"));
    }

    #[test]
    fn malformed_markup_becomes_empty_symbol() {
        let directory = tempdir().expect("failed to create temp dir");
        write(directory.path(), "broken.svg", "not svg at all");

        let sprite = build_sprite("icons", directory.path(), false);

        assert_eq!(sprite.icons.len(), 1);
        assert_eq!(sprite.icons[0].view_box, DEFAULT_VIEW_BOX);
        assert!(sprite.icons[0].inner_markup.is_empty());
    }

    #[test]
    fn unreadable_file_is_skipped_and_reported() {
        let directory = tempdir().expect("failed to create temp dir");
        write(directory.path(), "good.svg", "<svg><g/></svg>");
        fs::write(directory.path().join("binary.svg"), b"\xff\xfe\x00").expect("write");

        let files = discover_svg_files(directory.path(), false);
        let mut failed = Vec::new();
        let mut processed = Vec::new();
        let sprite = assemble_files("icons", directory.path(), false, &files, |outcome| {
            match outcome {
                IconOutcome::Processed {
                    id, ..
                } => processed.push(id.to_owned()),
                IconOutcome::Failed {
                    file, ..
                } => failed.push(file.path.clone())
            }
        });

        assert_eq!(processed, vec!["good"]);
        assert_eq!(failed, vec![directory.path().join("binary.svg")]);
        assert_eq!(sprite.icon_count(), 1);
    }

    #[test]
    fn load_icon_reports_missing_file() {
        let file = IconFile {
            path:          PathBuf::from("/definitely/not/here.svg"),
            relative_path: "here.svg".to_owned()
        };
        assert!(matches!(load_icon(&file), Err(Error::SvgIo { .. })));
    }

    #[test]
    fn missing_directory_builds_empty_sprite() {
        let directory = tempdir().expect("failed to create temp dir");
        let sprite = build_sprite("icons", &directory.path().join("absent"), true);
        assert!(sprite.is_empty());
        assert!(sprite.manifest.is_empty());
    }
}
