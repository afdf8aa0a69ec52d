// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! In-memory cache of built sprites.
//!
//! The repository is an ordinary value: the build driver creates a fresh one
//! per pass, and a runtime host creates one at startup and hands it to the
//! [`IconRenderer`](crate::IconRenderer). Sprites are stored in registration
//! order and never invalidated for the lifetime of the repository.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError}
};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::{
    config::BuildConfig,
    error::Error,
    manifest::{Manifest, ManifestEntry, ManifestFragment},
    pipeline::build_sprite,
    sprite::{NormalizedIcon, Sprite, parse_sprite_document}
};

type Slot = Arc<OnceLock<Arc<Sprite>>>;

/// Registry of sprites keyed by sprite id.
///
/// The slot map is guarded by a mutex that is held only while a slot is
/// fetched or inserted. Each slot is a [`OnceLock`], so concurrent first
/// requests for the same sprite id wait for a single build instead of racing.
#[derive(Debug, Default)]
pub struct SpriteRepository {
    slots: Mutex<IndexMap<String, Slot>>
}

impl SpriteRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached sprite for `sprite_id`, building it from
    /// `directory` on first request.
    ///
    /// The discovery parameters of later calls are ignored once a sprite is
    /// cached.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    ///
    /// use iconsprite::SpriteRepository;
    ///
    /// let repository = SpriteRepository::new();
    /// let sprite = repository.get_or_build("icons", Path::new("assets/icons"), true);
    /// println!("{} icons", sprite.icon_count());
    /// ```
    pub fn get_or_build(&self, sprite_id: &str, directory: &Path, recursive: bool) -> Arc<Sprite> {
        self.get_or_insert_with(sprite_id, || build_sprite(sprite_id, directory, recursive))
    }

    /// Returns the cached sprite for `sprite_id`, running `build` at most once
    /// per repository to produce it.
    pub fn get_or_insert_with<F>(&self, sprite_id: &str, build: F) -> Arc<Sprite>
    where
        F: FnOnce() -> Sprite
    {
        let slot = self.slot(sprite_id);
        Arc::clone(slot.get_or_init(|| {
            debug!("Building sprite '{sprite_id}'");
            Arc::new(build())
        }))
    }

    /// Stores an already built sprite, replacing any cached sprite with the
    /// same id while keeping its registration position.
    pub fn register(&self, sprite: Sprite) -> Arc<Sprite> {
        let sprite = Arc::new(sprite);
        let slot = Arc::new(OnceLock::from(Arc::clone(&sprite)));
        self.lock().insert(sprite.sprite_id.clone(), slot);
        sprite
    }

    /// Finds `icon_id` in the first registered sprite that defines it.
    pub fn lookup(&self, icon_id: &str) -> Option<ManifestEntry> {
        self.sprites()
            .iter()
            .find_map(|sprite| sprite.manifest.get(icon_id).cloned())
    }

    /// Lists icon ids in registration order, optionally restricted to one
    /// sprite.
    pub fn available_icons(&self, sprite_id: Option<&str>) -> Vec<String> {
        self.sprites()
            .iter()
            .filter(|sprite| sprite_id.is_none_or(|wanted| sprite.sprite_id == wanted))
            .flat_map(|sprite| sprite.manifest.keys().cloned().collect::<Vec<_>>())
            .collect()
    }

    /// Returns the sprite registered under `sprite_id`.
    pub fn sprite(&self, sprite_id: &str) -> Option<Arc<Sprite>> {
        self.lock()
            .get(sprite_id)
            .and_then(|slot| slot.get().cloned())
    }

    /// Returns every built sprite in registration order.
    pub fn sprites(&self) -> Vec<Arc<Sprite>> {
        self.lock()
            .values()
            .filter_map(|slot| slot.get().cloned())
            .collect()
    }

    /// Snapshot of the combined manifest.
    pub fn manifest(&self) -> Manifest {
        let mut manifest = Manifest::new();
        for sprite in self.sprites() {
            manifest.insert(sprite.sprite_id.clone(), sprite.manifest.clone());
        }
        manifest
    }

    /// Concatenated sprite documents, ready to be inlined into a page.
    pub fn documents(&self) -> String {
        self.sprites()
            .iter()
            .map(|sprite| sprite.document.as_str())
            .collect()
    }

    /// Builds every configured sprite set that is not cached yet.
    pub fn warm(&self, config: &BuildConfig) {
        for set in &config.sprite_sets {
            self.get_or_build(&set.sprite_id, &set.input_dir, set.recursive);
        }
    }

    /// Loads a repository from the artifacts written by a previous build.
    ///
    /// A missing or unreadable manifest yields an empty repository and a
    /// warning. A sprite listed in the manifest whose document is missing is
    /// registered with its manifest fragment and an empty document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArtifactIo`] when a sprite document exists but cannot
    /// be read.
    pub fn from_artifacts(config: &BuildConfig) -> Result<Self, Error> {
        let repository = Self::new();

        let manifest = match Manifest::load(&config.manifest_file) {
            Ok(manifest) => manifest,
            Err(error) => {
                warn!("Icon manifest unavailable, no icons registered: {error}");
                return Ok(repository);
            }
        };

        for (sprite_id, fragment) in manifest.fragments() {
            let set = config
                .sprite_sets
                .iter()
                .find(|set| set.sprite_id == sprite_id);
            let (directory, recursive, document) = match set {
                Some(set) => (
                    set.input_dir.clone(),
                    set.recursive,
                    read_document(&set.output_file)?
                ),
                None => {
                    warn!("Sprite '{sprite_id}' is not configured; registering manifest entries only");
                    (PathBuf::new(), true, String::new())
                }
            };

            repository.register(Sprite {
                sprite_id: sprite_id.to_owned(),
                source_directory: directory,
                recursive,
                icons: recover_icons(&document, fragment),
                document,
                manifest: fragment.clone()
            });
        }

        Ok(repository)
    }

    fn slot(&self, sprite_id: &str) -> Slot {
        Arc::clone(self.lock().entry(sprite_id.to_owned()).or_default())
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_document(path: &Path) -> Result<String, Error> {
    match fs::read_to_string(path) {
        Ok(document) => Ok(document),
        Err(source) if source.kind() == ErrorKind::NotFound => {
            warn!("Sprite file not found: {}", path.display());
            Ok(String::new())
        }
        Err(source) => Err(crate::error::artifact_io_error(path, source))
    }
}

fn recover_icons(document: &str, fragment: &ManifestFragment) -> Vec<NormalizedIcon> {
    parse_sprite_document(document)
        .into_iter()
        .map(|mut icon| {
            icon.source = fragment
                .get(&icon.id)
                .and_then(|entry| entry.source.clone());
            icon
        })
        .collect()
}
