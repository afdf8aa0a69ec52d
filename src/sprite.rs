// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Sprite assembly.
//!
//! A sprite is a single hidden SVG document holding one `<symbol>` per icon.
//! Assembly is pure and deterministic: the same ordered icons always produce
//! the same document and manifest fragment, which is what lets the build
//! driver and the runtime repository agree byte-for-byte.

use std::{
    path::{Path, PathBuf},
    sync::LazyLock
};

use indexmap::IndexMap;
use regex::Regex;

use crate::{
    manifest::{ManifestEntry, ManifestFragment},
    svg::CleanedSvg
};

/// Opening tag of every sprite document.
pub const SPRITE_OPEN_TAG: &str =
    r#"<svg xmlns="http://www.w3.org/2000/svg" style="display: none;">"#;
/// Closing tag of every sprite document.
pub const SPRITE_CLOSE_TAG: &str = "</svg>";

static SYMBOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<symbol id="([^"]*)" viewBox="([^"]*)">(.*?)</symbol>"#)
        .expect("valid symbol pattern")
});

/// Icon ready to be emitted as a `<symbol>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedIcon {
    /// Identifier derived from the relative path.
    pub id:           String,
    /// Coordinate system of the symbol.
    pub view_box:     String,
    /// Markup placed inside the symbol.
    pub inner_markup: String,
    /// Relative path of the originating file when known.
    pub source:       Option<String>
}

impl NormalizedIcon {
    /// Combines a derived id and its normalized markup.
    pub fn new(id: impl Into<String>, source: impl Into<String>, cleaned: CleanedSvg) -> Self {
        Self {
            id:           id.into(),
            view_box:     cleaned.view_box,
            inner_markup: cleaned.inner_markup,
            source:       Some(source.into())
        }
    }
}

/// Output of [`assemble_sprite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledSprite {
    /// Icons in document order after duplicate ids were collapsed.
    pub icons:    Vec<NormalizedIcon>,
    /// Serialized sprite document.
    pub document: String,
    /// Manifest entries for every symbol in the document.
    pub manifest: ManifestFragment
}

/// Fully built sprite as cached by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    /// Key of the sprite, e.g. `icons`.
    pub sprite_id:        String,
    /// Directory the icons were discovered in.
    pub source_directory: PathBuf,
    /// Whether discovery descended into subdirectories.
    pub recursive:        bool,
    /// Icons in document order.
    pub icons:            Vec<NormalizedIcon>,
    /// Serialized sprite document.
    pub document:         String,
    /// Manifest fragment describing [`icons`](Self::icons).
    pub manifest:         ManifestFragment
}

impl Sprite {
    /// Wraps an assembled sprite with its discovery parameters.
    pub fn from_assembled(
        sprite_id: impl Into<String>,
        source_directory: &Path,
        recursive: bool,
        assembled: AssembledSprite
    ) -> Self {
        Self {
            sprite_id: sprite_id.into(),
            source_directory: source_directory.to_path_buf(),
            recursive,
            icons: assembled.icons,
            document: assembled.document,
            manifest: assembled.manifest
        }
    }

    /// Number of symbols in the sprite.
    pub fn icon_count(&self) -> usize {
        self.icons.len()
    }

    /// Returns `true` when the sprite holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// Combines icons into one sprite document and its manifest fragment.
///
/// Icons are emitted in input order. When two icons share an id the later
/// one replaces the earlier one while keeping the earlier position, so a
/// customized icon can override a base icon of the same name.
///
/// # Examples
///
/// ```
/// use iconsprite::{NormalizedIcon, assemble_sprite, normalize_svg};
///
/// let icon = NormalizedIcon::new(
///     "home",
///     "home.svg",
///     normalize_svg(r#"<svg viewBox="0 0 32 32"><path/></svg>"#),
/// );
/// let sprite = assemble_sprite("icons", [icon]);
/// assert!(sprite.document.contains(r#"<symbol id="home" viewBox="0 0 32 32"><path/></symbol>"#));
/// assert_eq!(sprite.manifest["home"].sprite, "icons");
/// ```
pub fn assemble_sprite<I>(sprite_id: &str, icons: I) -> AssembledSprite
where
    I: IntoIterator<Item = NormalizedIcon>
{
    let mut unique: IndexMap<String, NormalizedIcon> = IndexMap::new();
    for icon in icons {
        unique.insert(icon.id.clone(), icon);
    }

    let body_len: usize = unique
        .values()
        .map(|icon| icon.id.len() + icon.view_box.len() + icon.inner_markup.len() + 40)
        .sum();
    let mut document =
        String::with_capacity(SPRITE_OPEN_TAG.len() + body_len + SPRITE_CLOSE_TAG.len());
    let mut manifest = ManifestFragment::with_capacity(unique.len());

    document.push_str(SPRITE_OPEN_TAG);
    for icon in unique.values() {
        push_symbol(&mut document, icon);
        manifest.insert(
            icon.id.clone(),
            ManifestEntry {
                view_box: icon.view_box.clone(),
                sprite:   sprite_id.to_owned(),
                source:   icon.source.clone()
            }
        );
    }
    document.push_str(SPRITE_CLOSE_TAG);

    AssembledSprite {
        icons: unique.into_values().collect(),
        document,
        manifest
    }
}

fn push_symbol(buffer: &mut String, icon: &NormalizedIcon) {
    use std::fmt::Write as _;

    let _ = write!(
        buffer,
        "<symbol id=\"{}\" viewBox=\"{}\">{}</symbol>",
        icon.id, icon.view_box, icon.inner_markup
    );
}

/// Recovers the symbols of a persisted sprite document.
///
/// Only symbols in the exact shape written by [`assemble_sprite`] are
/// recognized. The returned icons carry no source path.
pub fn parse_sprite_document(document: &str) -> Vec<NormalizedIcon> {
    SYMBOL
        .captures_iter(document)
        .map(|captures| NormalizedIcon {
            id:           captures[1].to_owned(),
            view_box:     captures[2].to_owned(),
            inner_markup: captures[3].to_owned(),
            source:       None
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::normalize_svg;

    fn icon(id: &str, view_box: &str, inner: &str) -> NormalizedIcon {
        NormalizedIcon::new(
            id,
            format!("{id}.svg"),
            normalize_svg(&format!("<svg viewBox=\"{view_box}\">{inner}</svg>"))
        )
    }

    #[test]
    fn empty_input_produces_empty_hidden_root() {
        let sprite = assemble_sprite("icons", Vec::<NormalizedIcon>::new());
        assert_eq!(sprite.document, format!("{SPRITE_OPEN_TAG}{SPRITE_CLOSE_TAG}"));
        assert!(sprite.manifest.is_empty());
        assert!(sprite.icons.is_empty());
    }

    #[test]
    fn symbols_follow_input_order() {
        let sprite = assemble_sprite(
            "icons",
            [
                icon("zeta", "0 0 1 1", "<a/>"),
                icon("alpha", "0 0 2 2", "<b/>")
            ]
        );

        let expected = format!(
            "{SPRITE_OPEN_TAG}<symbol id=\"zeta\" viewBox=\"0 0 1 1\"><a/></symbol><symbol id=\"alpha\" viewBox=\"0 0 2 2\"><b/></symbol>{SPRITE_CLOSE_TAG}"
        );
        assert_eq!(sprite.document, expected);
        assert_eq!(
            sprite.manifest.keys().collect::<Vec<_>>(),
            vec!["zeta", "alpha"]
        );
    }

    #[test]
    fn manifest_entries_reference_sprite_and_source() {
        let sprite = assemble_sprite("large-icons", [icon("hero", "0 0 64 64", "<g/>")]);
        let entry = &sprite.manifest["hero"];
        assert_eq!(entry.view_box, "0 0 64 64");
        assert_eq!(entry.sprite, "large-icons");
        assert_eq!(entry.source.as_deref(), Some("hero.svg"));
    }

    #[test]
    fn assembling_twice_is_byte_identical() {
        let icons = vec![
            icon("home", "0 0 32 32", "<path d=\"M0 0\"/>"),
            icon("folder-star", "0 0 16 16", "<circle r=\"1\"/>"),
        ];
        let first = assemble_sprite("icons", icons.clone());
        let second = assemble_sprite("icons", icons);
        assert_eq!(first.document, second.document);
        assert_eq!(first.manifest, second.manifest);
    }

    #[test]
    fn duplicate_ids_keep_last_content_at_first_position() {
        let sprite = assemble_sprite(
            "icons",
            [
                icon("home", "0 0 1 1", "<old/>"),
                icon("star", "0 0 2 2", "<star/>"),
                icon("home", "0 0 3 3", "<new/>")
            ]
        );

        assert_eq!(sprite.icons.len(), 2);
        assert_eq!(sprite.document.matches("<symbol ").count(), 2);
        assert!(sprite.document.contains("<symbol id=\"home\" viewBox=\"0 0 3 3\"><new/></symbol>"));
        assert!(!sprite.document.contains("<old/>"));
        assert!(sprite.document.find("id=\"home\"") < sprite.document.find("id=\"star\""));
        assert_eq!(sprite.manifest["home"].view_box, "0 0 3 3");
    }

    #[test]
    fn parse_recovers_assembled_symbols() {
        let icons = vec![
            icon("home", "0 0 32 32", "<path d=\"M0 0\"/>"),
            icon("empty", "0 0 24 24", ""),
        ];
        let sprite = assemble_sprite("icons", icons);
        let parsed = parse_sprite_document(&sprite.document);

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].id, "home");
        assert_eq!(parsed[0].inner_markup, "<path d=\"M0 0\"/>");
        assert_eq!(parsed[1].view_box, "0 0 24 24");
        assert!(parsed.iter().all(|icon| icon.source.is_none()));
    }

    #[test]
    fn sprite_wraps_assembly_with_discovery_parameters() {
        let assembled = assemble_sprite("icons", [icon("home", "0 0 32 32", "<g/>")]);
        let sprite = Sprite::from_assembled("icons", Path::new("/assets/icons"), true, assembled);
        assert_eq!(sprite.sprite_id, "icons");
        assert_eq!(sprite.source_directory, PathBuf::from("/assets/icons"));
        assert!(sprite.recursive);
        assert_eq!(sprite.icon_count(), 1);
        assert!(!sprite.is_empty());
    }
}
