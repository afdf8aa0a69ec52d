// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Inline icon markup for templates.
//!
//! The renderer emits a small `<svg>` element that references a symbol of an
//! already inlined sprite through `<use href="#id">`. Sizing and attributes
//! are resolved here; the symbol geometry comes from the manifest entry.

use std::{borrow::Cow, fmt, str::FromStr};

use indexmap::IndexMap;
use tracing::debug;

use crate::repository::SpriteRepository;

/// Ordered attribute map. Later insertions of an existing key keep the
/// original position.
pub type Attributes = IndexMap<String, String>;

/// Builds an [`Attributes`] map from borrowed pairs.
pub fn attributes<'a, I>(pairs: I) -> Attributes
where
    I: IntoIterator<Item = (&'a str, &'a str)>
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}

/// Size preset applied before caller attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconSize {
    /// 20 × 20.
    Small,
    /// 24 × 24.
    #[default]
    Medium,
    /// 32 × 32.
    Large
}

impl IconSize {
    /// Parses a size token, falling back to [`IconSize::Medium`] for
    /// anything unknown.
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or_default()
    }

    /// Edge length in pixels.
    pub fn pixels(self) -> u32 {
        match self {
            Self::Small => 20,
            Self::Medium => 24,
            Self::Large => 32
        }
    }

    /// Token used in templates and size classes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large"
        }
    }
}

impl FromStr for IconSize {
    type Err = UnknownSize;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(UnknownSize)
        }
    }
}

impl fmt::Display for IconSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by [`IconSize::from_str`] for tokens other than `small`,
/// `medium` or `large`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownSize;

/// Second argument of the template `icon` helper: a size token, or an
/// attribute map for the older call shape that implies medium size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconOptions {
    /// Size preset.
    Size(IconSize),
    /// Attributes applied at medium size.
    Attributes(Attributes)
}

impl Default for IconOptions {
    fn default() -> Self {
        Self::Size(IconSize::Medium)
    }
}

impl From<IconSize> for IconOptions {
    fn from(size: IconSize) -> Self {
        Self::Size(size)
    }
}

impl From<&str> for IconOptions {
    fn from(token: &str) -> Self {
        Self::Size(IconSize::from_token(token))
    }
}

impl From<Attributes> for IconOptions {
    fn from(attributes: Attributes) -> Self {
        Self::Attributes(attributes)
    }
}

const DEFAULT_ATTRIBUTES: [(&str, &str); 4] = [
    ("class", "icon"),
    ("width", "24"),
    ("height", "24"),
    ("aria-hidden", "true")
];

/// Produces `<svg><use href="#id"></use></svg>` snippets for icons known to
/// a [`SpriteRepository`].
///
/// # Examples
///
/// ```
/// use iconsprite::{
///     IconRenderer, IconSize, NormalizedIcon, Sprite, SpriteRepository, assemble_sprite,
///     normalize_svg
/// };
///
/// let icon = NormalizedIcon::new(
///     "home",
///     "home.svg",
///     normalize_svg(r#"<svg viewBox="0 0 32 32"><path/></svg>"#)
/// );
/// let repository = SpriteRepository::new();
/// repository.register(Sprite::from_assembled(
///     "icons",
///     std::path::Path::new("assets/icons"),
///     true,
///     assemble_sprite("icons", [icon])
/// ));
///
/// let renderer = IconRenderer::new(&repository);
/// assert_eq!(
///     renderer.render_sized("home", IconSize::Large, &Default::default()),
///     r##"<svg class="icon" width="32" height="32" aria-hidden="true" viewBox="0 0 32 32"><use href="#home"></use></svg>"##
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct IconRenderer<'a> {
    repository: &'a SpriteRepository
}

impl<'a> IconRenderer<'a> {
    /// Creates a renderer backed by `repository`.
    pub fn new(repository: &'a SpriteRepository) -> Self {
        Self {
            repository
        }
    }

    /// Renders `icon_id` with the default attributes overridden by
    /// `attributes`.
    ///
    /// Unknown icons render as an HTML comment naming the missing id.
    pub fn render(&self, icon_id: &str, attributes: &Attributes) -> String {
        self.render_merged(icon_id, [attributes])
    }

    /// Renders `icon_id` at a size preset; `attributes` still win over the
    /// preset.
    pub fn render_sized(&self, icon_id: &str, size: IconSize, attributes: &Attributes) -> String {
        self.render_merged(icon_id, [&size_attributes(size), attributes])
    }

    /// Template entry point accepting either a size or an attribute map as
    /// options, plus extra attributes.
    pub fn icon(&self, icon_id: &str, options: IconOptions, attributes: &Attributes) -> String {
        match options {
            IconOptions::Size(size) => self.render_sized(icon_id, size, attributes),
            IconOptions::Attributes(legacy) => self.render_merged(
                icon_id,
                [&size_attributes(IconSize::Medium), &legacy, attributes]
            )
        }
    }

    /// Renders at the default dimensions and tags the class list with a size
    /// modifier.
    ///
    /// The tokens `small`, `medium`, `large` and `xl` append `icon--{token}`
    /// to the caller's class (or to `icon`). Unknown tokens add no modifier.
    /// No width/height preset is applied; callers set those explicitly.
    pub fn render_with_size_class(&self, icon_id: &str, size: &str, attributes: &Attributes) -> String {
        let mut merged = attributes.clone();
        let base = merged
            .get("class")
            .map(|class| class.trim())
            .filter(|class| !class.is_empty())
            .unwrap_or("icon");
        let class = match size_modifier(size) {
            Some(modifier) => format!("{base} {modifier}"),
            None => base.to_owned()
        };
        merged.insert("class".to_owned(), class);
        self.render(icon_id, &merged)
    }

    /// Lists icon ids, optionally restricted to one sprite.
    pub fn available_icons(&self, sprite_id: Option<&str>) -> Vec<String> {
        self.repository.available_icons(sprite_id)
    }

    fn render_merged<const N: usize>(&self, icon_id: &str, layers: [&Attributes; N]) -> String {
        let Some(entry) = self.repository.lookup(icon_id) else {
            debug!("Icon '{icon_id}' not found");
            return not_found(icon_id);
        };

        let mut merged: Attributes = attributes(DEFAULT_ATTRIBUTES);
        for layer in layers {
            for (key, value) in layer {
                if key == "viewBox" {
                    continue;
                }
                merged.insert(key.clone(), value.clone());
            }
        }

        let mut buffer = String::with_capacity(128);
        buffer.push_str("<svg");
        for (key, value) in &merged {
            buffer.push(' ');
            buffer.push_str(key);
            buffer.push_str("=\"");
            buffer.push_str(&escape_xml(value));
            buffer.push('"');
        }
        buffer.push_str(" viewBox=\"");
        buffer.push_str(&escape_xml(&entry.view_box));
        buffer.push_str("\"><use href=\"#");
        buffer.push_str(&escape_xml(icon_id));
        buffer.push_str("\"></use></svg>");
        buffer
    }
}

fn size_modifier(token: &str) -> Option<&'static str> {
    match token {
        "small" => Some("icon--small"),
        "medium" => Some("icon--medium"),
        "large" => Some("icon--large"),
        "xl" => Some("icon--xl"),
        _ => None
    }
}

fn size_attributes(size: IconSize) -> Attributes {
    let pixels = size.pixels().to_string();
    let mut attributes = Attributes::with_capacity(2);
    attributes.insert("width".to_owned(), pixels.clone());
    attributes.insert("height".to_owned(), pixels);
    attributes
}

fn not_found(icon_id: &str) -> String {
    let mut safe = String::with_capacity(icon_id.len());
    let mut previous = None;
    for character in icon_id.chars() {
        if character == '-' && previous == Some('-') {
            safe.push(' ');
        }
        safe.push(character);
        previous = Some(character);
    }
    format!("<!-- Icon '{safe}' not found -->")
}

fn escape_xml(value: &str) -> Cow<'_, str> {
    if value
        .chars()
        .any(|character| matches!(character, '&' | '<' | '>' | '\"' | '\''))
    {
        let mut escaped = String::with_capacity(value.len());
        for character in value.chars() {
            match character {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '\"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                other => escaped.push(other)
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(value)
    }
}
