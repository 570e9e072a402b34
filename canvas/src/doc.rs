//! Document model: presentations, slides, and the elements placed on them.
//!
//! These types mirror the JSON records kept by the remote store. Geometry is
//! normalised to `f64` here: the store has historically held some numeric
//! fields as strings or nulls, so deserialization accepts either, falls back to
//! defaults for values it cannot read, and serialization always writes
//! numbers. Elements are a tagged sum over their four kinds, so
//! every consumer matches exhaustively on [`ElementBody`].

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::consts::{DEFAULT_FONT_SIZE, DEFAULT_TEXT_COLOR};
use crate::geometry::PercentRect;
use crate::paint::Paint;

/// Identifier of a presentation. Assigned outside this crate, so kept opaque.
pub type PresentationId = String;

/// Unique identifier for a slide within its presentation.
pub type SlideId = Uuid;

/// Unique identifier for an element within its slide.
pub type ElementId = Uuid;

/// Font families offered by the property editor, as `(label, css value)`.
pub const FONT_FAMILIES: [(&str, &str); 3] = [
    ("Arial", "Arial, sans-serif"),
    ("Times New Roman", "Times New Roman, serif"),
    ("Roboto", "Roboto, sans-serif"),
];

// =============================================================================
// SERDE HELPERS
// =============================================================================

/// A finite number from a JSON number or numeric string.
fn loose_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let Ok(n) = s.trim().parse::<f64>() else {
                return None;
            };
            n
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Accept a JSON number or a numeric string. Null, blank or garbage reads as 0.
pub(crate) fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose_number(&Value::deserialize(deserializer)?).unwrap_or(0.0))
}

/// A positive font size, falling back to the default for anything else.
fn font_size_or_default<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let size = loose_number(&Value::deserialize(deserializer)?).filter(|n| *n > 0.0);
    Ok(size.unwrap_or(DEFAULT_FONT_SIZE))
}

/// Accept a JSON bool or the string `"true"`. Anything else is false.
fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.trim() == "true",
        _ => false,
    })
}

/// Unknown or missing languages read as the default.
fn language_or_default<'de, D>(deserializer: D) -> Result<CodeLanguage, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s.parse().unwrap_or_default(),
        _ => CodeLanguage::default(),
    })
}

/// A paint, or `None` when the stored value is null, blank or malformed.
fn paint_or_none<'de, D>(deserializer: D) -> Result<Option<Paint>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::String(s) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(match s.parse() {
        Ok(paint) => Some(paint),
        Err(_) => None,
    })
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_font_family() -> String {
    FONT_FAMILIES[0].1.to_owned()
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_owned()
}

// =============================================================================
// ELEMENTS
// =============================================================================

/// The kind of an element, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Video,
    Code,
}

/// Language used to label a code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CodeLanguage {
    #[default]
    JavaScript,
    Python,
    C,
}

impl CodeLanguage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::C => "c",
        }
    }
}

impl fmt::Display for CodeLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeLanguage {
    type Err = String;

    /// Case-insensitive. An empty string means the default language.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "javascript" => Ok(Self::JavaScript),
            "python" => Ok(Self::Python),
            "c" => Ok(Self::C),
            other => Err(format!("unsupported programming language: {other}")),
        }
    }
}

impl TryFrom<String> for CodeLanguage {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CodeLanguage> for String {
    fn from(lang: CodeLanguage) -> Self {
        lang.as_str().to_owned()
    }
}

/// Payload of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBody {
    #[serde(default)]
    pub content: String,
    /// Font size in em.
    #[serde(default = "default_font_size", deserialize_with = "font_size_or_default")]
    pub font_size: f64,
    #[serde(default = "default_text_color")]
    pub color: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
}

/// Payload of an image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBody {
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub image_alt: String,
}

/// Payload of a video element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoBody {
    #[serde(default)]
    pub video_url: String,
    #[serde(default, deserialize_with = "bool_or_string")]
    pub autoplay: bool,
}

impl VideoBody {
    /// The URL to embed: `video_url` with `autoplay` and `mute` query parameters set.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `video_url` is not an absolute URL.
    pub fn embed_url(&self) -> Result<url::Url, url::ParseError> {
        let mut url = url::Url::parse(&self.video_url)?;
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != "autoplay" && k != "mute")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("autoplay", if self.autoplay { "1" } else { "0" })
            .append_pair("mute", "1");
        Ok(url)
    }
}

/// Payload of a code block element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBody {
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "language_or_default")]
    pub programming_language: CodeLanguage,
    /// Font size in em.
    #[serde(default = "default_font_size", deserialize_with = "font_size_or_default")]
    pub font_size: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
}

/// Kind-specific payload, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementBody {
    Text(TextBody),
    Image(ImageBody),
    Video(VideoBody),
    Code(CodeBody),
}

impl ElementBody {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Text(_) => ElementKind::Text,
            Self::Image(_) => ElementKind::Image,
            Self::Video(_) => ElementKind::Video,
            Self::Code(_) => ElementKind::Code,
        }
    }
}

/// A positioned visual object on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Box in percent of the slide.
    #[serde(flatten)]
    pub rect: PercentRect,
    /// Paint order; higher layers draw on top, ties keep list order.
    #[serde(default)]
    pub layer: i64,
    #[serde(flatten)]
    pub body: ElementBody,
}

impl Element {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.body.kind()
    }
}

// =============================================================================
// SLIDES
// =============================================================================

/// One screen of a presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: SlideId,
    /// Background override; falls back to the presentation default when absent.
    #[serde(default, deserialize_with = "paint_or_none", skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Paint>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Slide {
    /// A new slide with a fresh id, no elements and no background override.
    #[must_use]
    pub fn blank() -> Self {
        Self { id: Uuid::new_v4(), background_color: None, elements: Vec::new() }
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == *id)
    }

    pub fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == *id)
    }

    /// Replace the element with the same id in place. Returns false if absent.
    pub fn replace_element(&mut self, element: Element) -> bool {
        let Some(slot) = self.element_mut(&element.id) else {
            return false;
        };
        *slot = element;
        true
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove_element(&mut self, id: &ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|e| e.id == *id)?;
        Some(self.elements.remove(index))
    }

    /// Overwrite an element's box. Returns false if the element doesn't exist.
    pub fn set_geometry(&mut self, id: &ElementId, rect: PercentRect) -> bool {
        let Some(element) = self.element_mut(id) else {
            return false;
        };
        element.rect = rect;
        true
    }

    /// The layer a newly added element should take: one above the current top.
    #[must_use]
    pub fn next_layer(&self) -> i64 {
        self.elements.iter().map(|e| e.layer).max().map_or(0, |top| top + 1)
    }

    /// Elements in draw order: ascending `layer`, ties in list order.
    #[must_use]
    pub fn paint_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.elements.iter().collect();
        ordered.sort_by_key(|e| e.layer);
        ordered
    }

    /// The paint this slide actually shows.
    #[must_use]
    pub fn background<'a>(&'a self, default: &'a Paint) -> &'a Paint {
        self.background_color.as_ref().unwrap_or(default)
    }
}

// =============================================================================
// PRESENTATIONS
// =============================================================================

/// A named, ordered collection of slides as kept in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub id: PresentationId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(
        default,
        alias = "defaultColor",
        deserialize_with = "paint_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_background: Option<Paint>,
    #[serde(default)]
    pub slides: Vec<Slide>,
    /// Fields owned by other collaborators, carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Presentation {
    /// A presentation holding a single blank slide.
    #[must_use]
    pub fn new(id: impl Into<PresentationId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            thumbnail: None,
            default_background: None,
            slides: vec![Slide::blank()],
            extra: serde_json::Map::new(),
        }
    }

    /// The default background, or plain white when none is set.
    #[must_use]
    pub fn effective_default_background(&self) -> Paint {
        self.default_background.clone().unwrap_or_default()
    }

    #[must_use]
    pub fn slide_index(&self, id: &SlideId) -> Option<usize> {
        self.slides.iter().position(|s| s.id == *id)
    }
}
