//! Scene layout: what to draw for one slide at one viewport size.
//!
//! The host draws whatever [`layout`] returns, in order. Each item carries its
//! pixel box and the kind-specific content it needs; the background is already
//! resolved against the presentation default. An in-progress drag or resize
//! replaces the stored box of its element for the duration of the gesture.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::doc::{CodeLanguage, ElementBody, ElementId, Slide};
use crate::geometry::{PixelRect, Viewport, to_pixels};
use crate::paint::Paint;

/// What an element draws inside its box.
#[derive(Debug, Clone, PartialEq)]
pub enum Content<'a> {
    Text { text: &'a str, font_size_em: f64, color: &'a str, font_family: &'a str },
    Image { src: &'a str, alt: &'a str },
    /// `src` already carries the autoplay/mute parameters.
    Video { src: String },
    Code { code: &'a str, language: CodeLanguage, font_size_em: f64, font_family: &'a str },
}

/// One element positioned for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem<'a> {
    pub id: ElementId,
    pub rect: PixelRect,
    /// Stacking index among this slide's items, 0 at the bottom.
    pub z_index: usize,
    /// True while the element is being dragged or resized.
    pub active: bool,
    pub content: Content<'a>,
}

/// A slide ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene<'a> {
    pub viewport: Viewport,
    pub background: Paint,
    /// Items bottom to top.
    pub items: Vec<RenderItem<'a>>,
}

/// Lay out `slide` for `viewport`.
#[must_use]
pub fn layout<'a>(
    slide: &'a Slide,
    default_background: &Paint,
    viewport: Viewport,
    preview: Option<(ElementId, PixelRect)>,
) -> Scene<'a> {
    let items = slide
        .paint_order()
        .into_iter()
        .enumerate()
        .map(|(z_index, element)| {
            let preview_rect = preview.filter(|(id, _)| *id == element.id).map(|(_, rect)| rect);
            RenderItem {
                id: element.id,
                rect: preview_rect.unwrap_or_else(|| to_pixels(&element.rect, viewport)),
                z_index,
                active: preview_rect.is_some(),
                content: content(&element.body),
            }
        })
        .collect();

    Scene { viewport, background: slide.background(default_background).clone(), items }
}

fn content(body: &ElementBody) -> Content<'_> {
    match body {
        ElementBody::Text(text) => Content::Text {
            text: &text.content,
            font_size_em: text.font_size,
            color: &text.color,
            font_family: &text.font_family,
        },
        ElementBody::Image(image) => Content::Image { src: &image.image_url, alt: &image.image_alt },
        ElementBody::Video(video) => Content::Video {
            src: video
                .embed_url()
                .map_or_else(|_| video.video_url.clone(), |url| url.to_string()),
        },
        ElementBody::Code(code) => Content::Code {
            code: &code.content,
            language: code.programming_language,
            font_size_em: code.font_size,
            font_family: &code.font_family,
        },
    }
}
