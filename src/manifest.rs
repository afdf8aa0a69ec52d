// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Manifest data model shared by the build driver and the runtime path.
//!
//! The manifest is the only persisted cross-reference artifact: a JSON object
//! whose top-level keys are sprite ids, each mapping icon ids to the viewBox
//! and owning sprite needed to render a `<use>` reference. Maps keep
//! insertion order so repeated builds serialize byte-identically.

use std::{fs, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{self, Error};

/// Location data for a single icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Coordinate system of the symbol.
    #[serde(rename = "viewBox")]
    pub view_box: String,
    /// Sprite that defines the symbol.
    pub sprite:   String,
    /// Relative path of the originating file, kept for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source:   Option<String>
}

/// Icons of one sprite keyed by icon id, in sprite order.
pub type ManifestFragment = IndexMap<String, ManifestEntry>;

/// Combined manifest keyed by sprite id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    sprites: IndexMap<String, ManifestFragment>
}

impl Manifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `fragment` under `sprite_id`, replacing any previous fragment.
    pub fn insert(&mut self, sprite_id: impl Into<String>, fragment: ManifestFragment) {
        self.sprites.insert(sprite_id.into(), fragment);
    }

    /// Returns the fragment registered for `sprite_id`.
    pub fn fragment(&self, sprite_id: &str) -> Option<&ManifestFragment> {
        self.sprites.get(sprite_id)
    }

    /// Iterates over `(sprite_id, fragment)` pairs in registration order.
    pub fn fragments(&self) -> impl Iterator<Item = (&str, &ManifestFragment)> {
        self.sprites
            .iter()
            .map(|(sprite_id, fragment)| (sprite_id.as_str(), fragment))
    }

    /// Finds `icon_id` in the first sprite, in registration order, that
    /// defines it.
    pub fn lookup(&self, icon_id: &str) -> Option<&ManifestEntry> {
        self.sprites
            .values()
            .find_map(|fragment| fragment.get(icon_id))
    }

    /// Lists icon ids, optionally restricted to one sprite.
    ///
    /// An unknown `sprite_id` yields an empty list.
    pub fn icon_ids(&self, sprite_id: Option<&str>) -> Vec<String> {
        match sprite_id {
            Some(sprite_id) => self
                .sprites
                .get(sprite_id)
                .map(|fragment| fragment.keys().cloned().collect())
                .unwrap_or_default(),
            None => self
                .sprites
                .values()
                .flat_map(|fragment| fragment.keys().cloned())
                .collect()
        }
    }

    /// Number of sprites in the manifest.
    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Number of icons across all sprites.
    pub fn icon_count(&self) -> usize {
        self.sprites.values().map(IndexMap::len).sum()
    }

    /// Returns `true` when no sprite has been registered.
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Serializes the manifest as pretty JSON terminated by a newline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] when encoding fails.
    pub fn to_json(&self) -> Result<String, Error> {
        let mut encoded = serde_json::to_string_pretty(self)?;
        encoded.push('\n');
        Ok(encoded)
    }

    /// Decodes a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] when the text is not a valid manifest.
    pub fn from_json(contents: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Loads a persisted manifest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and
    /// [`Error::Manifest`] when its contents cannot be decoded.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
        serde_json::from_str(&contents).map_err(|source| Error::Manifest {
            path:    path.to_path_buf(),
            message: source.to_string()
        })
    }
}
