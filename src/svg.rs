// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Normalization of raw SVG sources into symbol-ready fragments.
//!
//! The normalizer strips XML prologs, extracts the markup nested inside the
//! first `<svg>` root and resolves the coordinate system the symbol should
//! use. It never fails: unrecognizable input degrades to an empty fragment
//! with [`DEFAULT_VIEW_BOX`], and callers decide whether to log a diagnostic.

use std::sync::LazyLock;

use regex::Regex;

/// ViewBox applied when neither a `viewBox` nor numeric dimensions exist.
pub const DEFAULT_VIEW_BOX: &str = "0 0 24 24";

static XML_PROLOG: LazyLock<Regex,> =
    LazyLock::new(|| Regex::new(r"<\?xml[^>]*\?>",).expect("valid prolog pattern",),);

static SVG_ROOT: LazyLock<Regex,> = LazyLock::new(|| {
    Regex::new(r"(?s)<svg\b([^>]*)>(.*?)</svg>",).expect("valid svg root pattern",)
},);

static VIEW_BOX_ATTRIBUTE: LazyLock<Regex,> = LazyLock::new(|| attribute_pattern("viewBox",),);
static WIDTH_ATTRIBUTE: LazyLock<Regex,> = LazyLock::new(|| attribute_pattern("width",),);
static HEIGHT_ATTRIBUTE: LazyLock<Regex,> = LazyLock::new(|| attribute_pattern("height",),);

/// Builds a matcher for a whole attribute name followed by a quoted value.
///
/// The name must be preceded by whitespace so that `stroke-width` is never
/// mistaken for `width`.
fn attribute_pattern(name: &str,) -> Regex
{
    Regex::new(&format!(r#"(?:^|\s){name}\s*=\s*(?:"([^"]*)"|'([^']*)')"#),)
        .expect("valid attribute pattern",)
}

/// Describes where the resolved viewBox of a [`CleanedSvg`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub enum ViewBoxOrigin
{
    /// Copied verbatim from the `viewBox` attribute of the root element.
    Attribute,
    /// Synthesized from numeric `width` and `height` attributes.
    Dimensions,
    /// Neither source was usable; [`DEFAULT_VIEW_BOX`] applies.
    Fallback,
}

/// Result of normalizing one SVG source.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct CleanedSvg
{
    /// Coordinate system for the generated symbol.
    pub view_box:     String,
    /// Trimmed markup found between the opening and closing `<svg>` tags.
    pub inner_markup: String,
    /// Source of [`view_box`](Self::view_box).
    pub origin:       ViewBoxOrigin,
    /// Whether an `<svg>...</svg>` region was found at all.
    pub has_root:     bool,
}

impl CleanedSvg
{
    fn degenerate() -> Self
    {
        Self {
            view_box:     DEFAULT_VIEW_BOX.to_owned(),
            inner_markup: String::new(),
            origin:       ViewBoxOrigin::Fallback,
            has_root:     false,
        }
    }
}

/// Normalizes raw SVG text into a symbol-ready fragment.
///
/// # Examples
///
/// ```
/// use iconsprite::{ViewBoxOrigin, normalize_svg};
///
/// let cleaned = normalize_svg(
///     r#"<?xml version="1.0"?><svg width="16" height="16"><path d="M0 0"/></svg>"#,
/// );
/// assert_eq!(cleaned.view_box, "0 0 16 16");
/// assert_eq!(cleaned.inner_markup, r#"<path d="M0 0"/>"#);
/// assert_eq!(cleaned.origin, ViewBoxOrigin::Dimensions);
/// ```
pub fn normalize_svg(raw: &str,) -> CleanedSvg
{
    let without_prolog = XML_PROLOG.replace_all(raw, "",);

    let Some(captures,) = SVG_ROOT.captures(&without_prolog,) else {
        return CleanedSvg::degenerate();
    };

    let opening_attributes = captures.get(1,).map_or("", |m| m.as_str(),);
    let inner_markup = captures.get(2,).map_or("", |m| m.as_str(),).trim().to_owned();
    let (view_box, origin,) = resolve_view_box(opening_attributes,);

    CleanedSvg {
        view_box,
        inner_markup,
        origin,
        has_root: true,
    }
}

fn resolve_view_box(attributes: &str,) -> (String, ViewBoxOrigin,)
{
    if let Some(view_box,) = attribute_value(&VIEW_BOX_ATTRIBUTE, attributes,) {
        return (view_box.to_owned(), ViewBoxOrigin::Attribute,);
    }

    let width = attribute_value(&WIDTH_ATTRIBUTE, attributes,).and_then(parse_dimension,);
    let height = attribute_value(&HEIGHT_ATTRIBUTE, attributes,).and_then(parse_dimension,);

    match (width, height,) {
        (Some(width,), Some(height,),) => {
            (format!("0 0 {width} {height}"), ViewBoxOrigin::Dimensions,)
        }
        _ => (DEFAULT_VIEW_BOX.to_owned(), ViewBoxOrigin::Fallback,),
    }
}

fn attribute_value<'a,>(pattern: &Regex, attributes: &'a str,) -> Option<&'a str,>
{
    let captures = pattern.captures(attributes,)?;
    captures.get(1,).or_else(|| captures.get(2,),).map(|m| m.as_str(),)
}

/// Parses a length attribute as a finite number of user units.
///
/// A trailing `px` unit is stripped since it denotes the same user units.
/// Any other unit, percentages and non-finite values yield `None`. Negative
/// values are numeric and pass through unchanged.
fn parse_dimension(value: &str,) -> Option<f64,>
{
    let trimmed = value.trim();
    let numeric = trimmed.strip_suffix("px",).unwrap_or(trimmed,).trim_end();
    let parsed: f64 = numeric.parse().ok()?;

    parsed.is_finite().then_some(parsed,)
}
