// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Icon sprite pipeline.
//!
//! The library turns directories of standalone SVG icons into hidden sprite
//! documents (one `<symbol>` per icon) plus a JSON manifest, and renders
//! `<svg><use href="#id"></use></svg>` snippets that reference those symbols.
//! The build driver ([`run_build`]) and the runtime [`SpriteRepository`]
//! share one discovery and assembly routine, so generated artifacts and
//! sprites produced on demand agree byte for byte.

mod build;
mod config;
mod discover;
mod error;
mod file;
mod icon_id;
mod manifest;
mod pipeline;
mod render;
mod repository;
mod sprite;
mod svg;
mod watch;

pub use build::{BuildEvent, BuildPhase, BuildSummary, SetReport, run_build};
pub use config::{BuildConfig, ConfigDocument, DEFAULT_MANIFEST_FILE, SpriteSet, SpriteSetEntry};
pub use discover::{IconFile, discover_svg_files};
pub use error::{Error, artifact_io_error, io_error, svg_io_error};
pub use file::{ArtifactWrite, write_artifact};
pub use icon_id::{derive_icon_id, derive_icon_id_from_path, is_valid_fragment_id};
pub use manifest::{Manifest, ManifestEntry, ManifestFragment};
pub use pipeline::{IconOutcome, assemble_files, build_sprite, load_icon};
pub use render::{Attributes, IconOptions, IconRenderer, IconSize, UnknownSize, attributes};
pub use repository::SpriteRepository;
pub use sprite::{
    AssembledSprite, NormalizedIcon, SPRITE_CLOSE_TAG, SPRITE_OPEN_TAG, Sprite, assemble_sprite,
    parse_sprite_document,
};
pub use svg::{CleanedSvg, DEFAULT_VIEW_BOX, ViewBoxOrigin, normalize_svg};
pub use watch::{POLL_INTERVAL, WatchEvent, svg_change, watch, watch_loop};
