// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Configuration describing which sprite sets the build driver produces.
//!
//! The YAML document lists sprite sets in build order plus the location of
//! the combined manifest. Keys accept both snake_case and the camelCase
//! spelling used by older build scripts. Relative paths are resolved against
//! the directory that contains the configuration file, and the resolved
//! configuration is validated so that no two sets overwrite each other.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{self, Error};

/// Manifest location used by [`BuildConfig::defaults`].
pub const DEFAULT_MANIFEST_FILE: &str = "dist/icon-manifest.json";

/// Raw configuration document as written by users.
///
/// # Examples
///
/// ```
/// use iconsprite::ConfigDocument;
///
/// let yaml = r#"
/// manifest: dist/icon-manifest.json
/// sprites:
///   - inputDir: assets/icons
///     outputFile: dist/icons-sprite.svg
///     spriteId: icons
/// "#;
/// let document: ConfigDocument = serde_yaml::from_str(yaml,).expect("valid configuration",);
/// assert_eq!(document.sprites.len(), 1);
/// assert!(document.sprites[0].recursive);
/// ```
#[derive(Debug, Deserialize, Serialize, Clone,)]
pub struct ConfigDocument
{
    /// Location of the combined manifest.
    #[serde(alias = "manifestFile", alias = "manifest_file", alias = "manifest-file")]
    pub manifest: PathBuf,

    /// Sprite sets in build order.
    #[serde(default)]
    pub sprites: Vec<SpriteSetEntry,>,
}

/// Raw definition of a single sprite set.
#[derive(Debug, Deserialize, Serialize, Clone,)]
pub struct SpriteSetEntry
{
    /// Optional human-readable name used in progress output. Defaults to the
    /// sprite id.
    #[serde(default)]
    pub name: Option<String,>,

    /// Directory holding the icon sources.
    #[serde(alias = "inputDir", alias = "input-dir", alias = "directory")]
    pub input_dir: PathBuf,

    /// Destination of the generated sprite document.
    #[serde(alias = "outputFile", alias = "output-file")]
    pub output_file: PathBuf,

    /// Key of the sprite in the manifest.
    #[serde(alias = "spriteId", alias = "sprite-id")]
    pub sprite_id: String,

    /// Whether subdirectories are searched. Defaults to `true`.
    #[serde(default = "default_recursive")]
    pub recursive: bool,
}

fn default_recursive() -> bool
{
    true
}

/// Resolved and validated sprite set.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct SpriteSet
{
    /// Name used in progress output.
    pub name:        String,
    /// Directory holding the icon sources.
    pub input_dir:   PathBuf,
    /// Destination of the generated sprite document.
    pub output_file: PathBuf,
    /// Key of the sprite in the manifest.
    pub sprite_id:   String,
    /// Whether subdirectories are searched.
    pub recursive:   bool,
}

/// Validated configuration consumed by the build driver and the runtime
/// repository.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct BuildConfig
{
    /// Sprite sets in build order.
    pub sprite_sets:   Vec<SpriteSet,>,
    /// Location of the combined manifest.
    pub manifest_file: PathBuf,
}

impl BuildConfig
{
    /// Returns the conventional layout below `root`.
    ///
    /// * `assets/icons` (recursive) → `dist/icons-sprite.svg`, sprite `icons`
    /// * `assets/large-icons` (flat) → `dist/large-icons-sprite.svg`, sprite
    ///   `large-icons`
    /// * manifest at `dist/icon-manifest.json`
    pub fn defaults(root: &Path,) -> Self
    {
        Self {
            sprite_sets:   vec![
                SpriteSet {
                    name:        "icons".to_owned(),
                    input_dir:   root.join("assets/icons",),
                    output_file: root.join("dist/icons-sprite.svg",),
                    sprite_id:   "icons".to_owned(),
                    recursive:   true,
                },
                SpriteSet {
                    name:        "largeIcons".to_owned(),
                    input_dir:   root.join("assets/large-icons",),
                    output_file: root.join("dist/large-icons-sprite.svg",),
                    sprite_id:   "large-icons".to_owned(),
                    recursive:   false,
                },
            ],
            manifest_file: root.join(DEFAULT_MANIFEST_FILE,),
        }
    }

    /// Loads and validates the YAML configuration at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read,
    /// [`Error::Parse`] when the YAML is malformed and [`Error::Validation`]
    /// when the sets conflict.
    pub fn load(path: &Path,) -> Result<Self, Error,>
    {
        let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
        let base = path.parent().unwrap_or_else(|| Path::new("",),);
        Self::parse(&contents, base,)
    }

    /// Parses configuration text, resolving relative paths against `base`.
    ///
    /// # Errors
    ///
    /// See [`BuildConfig::load`].
    pub fn parse(contents: &str, base: &Path,) -> Result<Self, Error,>
    {
        let document: ConfigDocument = serde_yaml::from_str(contents,)?;
        Self::from_document(document, base,)
    }

    /// Resolves and validates a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the document lists no sprite sets,
    /// a sprite id is blank or repeated, two sets share an output file, or a
    /// set writes to the manifest location.
    pub fn from_document(document: ConfigDocument, base: &Path,) -> Result<Self, Error,>
    {
        if document.sprites.is_empty() {
            return Err(Error::validation("configuration must include at least one sprite set",),);
        }

        let manifest_file = resolve(base, &document.manifest,);
        let mut sprite_sets = Vec::with_capacity(document.sprites.len(),);
        let mut seen_ids = HashSet::with_capacity(document.sprites.len(),);
        let mut seen_outputs = HashSet::with_capacity(document.sprites.len(),);

        for entry in document.sprites {
            let sprite_id = entry.sprite_id.trim();
            if sprite_id.is_empty() {
                return Err(Error::validation("sprite_id must not be empty",),);
            }
            if !seen_ids.insert(sprite_id.to_owned(),) {
                return Err(Error::validation(format!("duplicate sprite_id '{sprite_id}'"),),);
            }

            let output_file = resolve(base, &entry.output_file,);
            if output_file == manifest_file {
                return Err(Error::validation(format!(
                    "sprite '{sprite_id}' writes to the manifest location {}",
                    output_file.display()
                ),),);
            }
            if !seen_outputs.insert(output_file.clone(),) {
                return Err(Error::validation(format!(
                    "duplicate output_file '{}'",
                    output_file.display()
                ),),);
            }

            let name = entry
                .name
                .as_deref()
                .map(str::trim,)
                .filter(|name| !name.is_empty(),)
                .unwrap_or(sprite_id,)
                .to_owned();

            sprite_sets.push(SpriteSet {
                name,
                input_dir: resolve(base, &entry.input_dir,),
                output_file,
                sprite_id: sprite_id.to_owned(),
                recursive: entry.recursive,
            },);
        }

        Ok(Self {
            sprite_sets,
            manifest_file,
        },)
    }
}

fn resolve(base: &Path, path: &Path,) -> PathBuf
{
    if path.is_absolute() { path.to_path_buf() } else { base.join(path,) }
}
