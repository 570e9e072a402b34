//! Authoring-form validation.
//!
//! The add/edit forms hand over raw text exactly as typed. [`ElementDraft`]
//! holds that input and [`ElementDraft::build`] turns it into an [`Element`],
//! or reports the first constraint it violates. Nothing reaches the store
//! without passing through here.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

use crate::consts::{DEFAULT_ELEMENT_SIZE, DEFAULT_FONT_SIZE, DEFAULT_TEXT_COLOR, PERCENT_MAX};
use crate::doc::{
    CodeBody, CodeLanguage, Element, ElementBody, ElementId, ElementKind, FONT_FAMILIES, ImageBody, TextBody, VideoBody,
};
use crate::geometry::PercentRect;

/// A constraint violated by an authoring draft.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} must be between 0 and 100, got {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("{position_field} + {size_field} must not exceed 100, got {total}")]
    Overflow { position_field: &'static str, size_field: &'static str, total: f64 },
    #[error("fontSize must be greater than 0, got {0}")]
    FontSize(f64),
    #[error("{field} is required")]
    MissingUrl { field: &'static str },
    #[error("{field} is not a valid URL: {reason}")]
    InvalidUrl { field: &'static str, reason: String },
    #[error("{field} must use http or https, got {scheme}")]
    UnsupportedScheme { field: &'static str, scheme: String },
    #[error("{0}")]
    Language(String),
}

/// Raw input from the element authoring/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDraft {
    pub kind: ElementKind,
    pub position_x: String,
    pub position_y: String,
    pub size_width: String,
    pub size_height: String,
    /// Text or code content.
    pub content: String,
    pub font_size: String,
    pub color: String,
    pub font_family: String,
    pub image_url: String,
    pub image_alt: String,
    pub video_url: String,
    pub autoplay: bool,
    pub programming_language: String,
}

impl ElementDraft {
    /// A blank form for `kind`, pre-filled with the authoring defaults.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            position_x: "0".to_owned(),
            position_y: "0".to_owned(),
            size_width: DEFAULT_ELEMENT_SIZE.to_string(),
            size_height: DEFAULT_ELEMENT_SIZE.to_string(),
            content: String::new(),
            font_size: DEFAULT_FONT_SIZE.to_string(),
            color: DEFAULT_TEXT_COLOR.to_owned(),
            font_family: FONT_FAMILIES[0].1.to_owned(),
            image_url: String::new(),
            image_alt: String::new(),
            video_url: String::new(),
            autoplay: false,
            programming_language: CodeLanguage::default().to_string(),
        }
    }

    /// A form pre-filled from an existing element, for the edit dialog.
    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        let mut draft = Self::new(element.kind());
        draft.position_x = element.rect.position_x.to_string();
        draft.position_y = element.rect.position_y.to_string();
        draft.size_width = element.rect.size_width.to_string();
        draft.size_height = element.rect.size_height.to_string();
        match &element.body {
            ElementBody::Text(text) => {
                draft.content.clone_from(&text.content);
                draft.font_size = text.font_size.to_string();
                draft.color.clone_from(&text.color);
                draft.font_family.clone_from(&text.font_family);
            }
            ElementBody::Image(image) => {
                draft.image_url.clone_from(&image.image_url);
                draft.image_alt.clone_from(&image.image_alt);
            }
            ElementBody::Video(video) => {
                draft.video_url.clone_from(&video.video_url);
                draft.autoplay = video.autoplay;
            }
            ElementBody::Code(code) => {
                draft.content.clone_from(&code.content);
                draft.programming_language = code.programming_language.to_string();
                draft.font_size = code.font_size.to_string();
                draft.font_family.clone_from(&code.font_family);
            }
        }
        draft
    }

    /// Validate the box fields alone.
    ///
    /// # Errors
    ///
    /// Returns the first unparsable, out-of-range, or overflowing field.
    pub fn rect(&self) -> Result<PercentRect, ValidationError> {
        let position_x = percent("positionX", &self.position_x)?;
        let position_y = percent("positionY", &self.position_y)?;
        let size_width = percent("sizeWidth", &self.size_width)?;
        let size_height = percent("sizeHeight", &self.size_height)?;
        fits("positionX", "sizeWidth", position_x, size_width)?;
        fits("positionY", "sizeHeight", position_y, size_height)?;
        Ok(PercentRect { position_x, position_y, size_width, size_height })
    }

    /// Validate the kind-specific payload.
    ///
    /// # Errors
    ///
    /// Returns the first violated payload constraint.
    pub fn body(&self) -> Result<ElementBody, ValidationError> {
        Ok(match self.kind {
            ElementKind::Text => ElementBody::Text(TextBody {
                content: self.content.clone(),
                font_size: font_size(&self.font_size)?,
                color: self.color.clone(),
                font_family: self.font_family.clone(),
            }),
            ElementKind::Image => {
                web_url("imageUrl", &self.image_url)?;
                ElementBody::Image(ImageBody { image_url: self.image_url.trim().to_owned(), image_alt: self.image_alt.clone() })
            }
            ElementKind::Video => {
                web_url("videoUrl", &self.video_url)?;
                ElementBody::Video(VideoBody { video_url: self.video_url.trim().to_owned(), autoplay: self.autoplay })
            }
            ElementKind::Code => ElementBody::Code(CodeBody {
                content: self.content.clone(),
                programming_language: self.programming_language.parse().map_err(ValidationError::Language)?,
                font_size: font_size(&self.font_size)?,
                font_family: self.font_family.clone(),
            }),
        })
    }

    /// Build the element this draft describes.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint; see [`ValidationError`].
    pub fn build(&self, id: ElementId, layer: i64) -> Result<Element, ValidationError> {
        let rect = self.rect()?;
        let body = self.body()?;
        Ok(Element { id, rect, layer, body })
    }
}

fn number(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::NotANumber { field, value: raw.to_owned() }),
    }
}

fn percent(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value = number(field, raw)?;
    if (0.0..=PERCENT_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange { field, value })
    }
}

fn fits(position_field: &'static str, size_field: &'static str, position: f64, size: f64) -> Result<(), ValidationError> {
    let total = position + size;
    if total <= PERCENT_MAX {
        Ok(())
    } else {
        Err(ValidationError::Overflow { position_field, size_field, total })
    }
}

fn font_size(raw: &str) -> Result<f64, ValidationError> {
    let value = number("fontSize", raw)?;
    if value > 0.0 { Ok(value) } else { Err(ValidationError::FontSize(value)) }
}

fn web_url(field: &'static str, raw: &str) -> Result<(), ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingUrl { field });
    }
    let url = url::Url::parse(raw).map_err(|e| ValidationError::InvalidUrl { field, reason: e.to_string() })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ValidationError::UnsupportedScheme { field, scheme: other.to_owned() }),
    }
}
