// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Derivation of icon identifiers from file locations.
//!
//! An icon id is the file path relative to its sprite root with every path
//! separator replaced by `-` and the `.svg` extension removed. The id doubles
//! as the manifest key and as the fragment referenced by `<use href="#id">`,
//! so derivation is intentionally literal: no case folding, trimming or
//! collision handling. `a/b.svg` and a top-level `a-b.svg` both become `a-b`.

use std::path::{Component, Path};

const SVG_EXTENSION: &str = ".svg";

/// Derives an icon id from a path relative to the sprite root.
///
/// Both `/` and `\` are treated as separators so ids do not depend on the
/// platform that produced the relative path.
///
/// # Examples
///
/// ```
/// use iconsprite::derive_icon_id;
///
/// assert_eq!(derive_icon_id("folder/star.svg"), "folder-star");
/// assert_eq!(derive_icon_id("Home.svg"), "Home");
/// ```
pub fn derive_icon_id(relative_path: &str,) -> String
{
    let stem = relative_path.strip_suffix(SVG_EXTENSION,).unwrap_or(relative_path,);

    stem.chars()
        .map(|character| match character {
            '/' | '\\' => '-',
            other => other,
        },)
        .collect()
}

/// Derives an icon id from a relative [`Path`].
///
/// Only normal path components participate; `.` segments and roots are
/// dropped before joining.
pub fn derive_icon_id_from_path(relative_path: &Path,) -> String
{
    derive_icon_id(&to_slash_path(relative_path,),)
}

/// Joins the normal components of `relative_path` with `/`.
///
/// Discovery records relative paths in this form so manifest `source` values
/// and derived ids are identical across platforms.
pub(crate) fn to_slash_path(relative_path: &Path,) -> String
{
    relative_path
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment,) => Some(segment.to_string_lossy(),),
            _ => None,
        },)
        .collect::<Vec<_,>>()
        .join("/",)
}

/// Reports whether `id` is usable as an SVG `id` attribute.
///
/// Derivation never rejects ids; the check exists so callers can log a
/// diagnostic for file names that produce unusable fragment references.
pub fn is_valid_fragment_id(id: &str,) -> bool
{
    let mut characters = id.chars();
    let Some(first,) = characters.next() else {
        return false;
    };

    (first.is_alphabetic() || first == '_')
        && characters.all(|character| {
            character.is_alphanumeric() || matches!(character, '-' | '_' | '.')
        },)
}
