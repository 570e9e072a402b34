#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn text_element(layer: i64, content: &str) -> Element {
    Element {
        id: Uuid::new_v4(),
        rect: PercentRect::new(0.0, 0.0, 50.0, 50.0),
        layer,
        body: ElementBody::Text(TextBody {
            content: content.into(),
            font_size: 1.0,
            color: "#000000".into(),
            font_family: "Arial, sans-serif".into(),
        }),
    }
}

fn slide_with(elements: Vec<Element>) -> Slide {
    Slide { id: Uuid::new_v4(), background_color: None, elements }
}

// =============================================================
// Element serde
// =============================================================

#[test]
fn text_element_serializes_flat_with_type_tag() {
    let el = text_element(2, "hello");
    let json = serde_json::to_value(&el).unwrap();
    assert_eq!(json["type"], "text");
    assert_eq!(json["content"], "hello");
    assert_eq!(json["layer"], 2);
    assert_eq!(json["positionX"], json!(0.0));
    assert_eq!(json["sizeWidth"], json!(50.0));
    assert_eq!(json["fontFamily"], "Arial, sans-serif");
    assert_eq!(json["id"], el.id.to_string());
}

#[test]
fn element_reads_legacy_string_fields() {
    let id = Uuid::new_v4();
    let el: Element = serde_json::from_value(json!({
        "id": id,
        "type": "text",
        "content": "legacy",
        "sizeWidth": "50",
        "sizeHeight": "40",
        "positionX": "0",
        "positionY": "10",
        "fontSize": "1.5",
        "color": "#ff0000",
    }))
    .unwrap();
    assert_eq!(el.id, id);
    assert_eq!(el.rect, PercentRect::new(0.0, 10.0, 50.0, 40.0));
    assert_eq!(el.layer, 0);
    let ElementBody::Text(text) = &el.body else {
        panic!("expected text body");
    };
    assert_eq!(text.font_size, 1.5);
    assert_eq!(text.font_family, "Arial, sans-serif");
}

#[test]
fn element_round_trip_each_kind() {
    let bodies = [
        ElementBody::Image(ImageBody { image_url: "https://x.test/a.png".into(), image_alt: "a".into() }),
        ElementBody::Video(VideoBody { video_url: "https://youtube.com/embed/x?rel=0".into(), autoplay: true }),
        ElementBody::Code(CodeBody {
            content: "print(1)".into(),
            programming_language: CodeLanguage::Python,
            font_size: 0.8,
            font_family: "Roboto, sans-serif".into(),
        }),
    ];
    for body in bodies {
        let el = Element { id: Uuid::new_v4(), rect: PercentRect::new(10.0, 10.0, 20.0, 20.0), layer: 1, body };
        let back: Element = serde_json::from_str(&serde_json::to_string(&el).unwrap()).unwrap();
        assert_eq!(back, el);
    }
}

#[test]
fn video_autoplay_accepts_string() {
    let el: Element = serde_json::from_value(json!({
        "id": Uuid::new_v4(),
        "type": "video",
        "videoUrl": "https://youtube.com/embed/x",
        "autoplay": "true",
        "positionX": 0, "positionY": 0, "sizeWidth": 10, "sizeHeight": 10,
    }))
    .unwrap();
    assert!(matches!(el.body, ElementBody::Video(VideoBody { autoplay: true, .. })));
}

#[test]
fn blank_font_sizes_fall_back_to_default() {
    for raw in [json!(null), json!(""), json!("big"), json!(0), json!(-1.0)] {
        let el: Element = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "type": "text",
            "content": "x",
            "fontSize": raw,
            "positionX": 0, "positionY": 0, "sizeWidth": 10, "sizeHeight": 10,
        }))
        .unwrap();
        let ElementBody::Text(text) = &el.body else {
            panic!("expected text body");
        };
        assert_eq!(text.font_size, DEFAULT_FONT_SIZE, "fontSize {raw}");
    }
}

#[test]
fn stored_code_language_outside_the_menu_reads_as_default() {
    let el: Element = serde_json::from_value(json!({
        "id": Uuid::new_v4(),
        "type": "code",
        "content": "fn main() {}",
        "programmingLanguage": "rust",
        "positionX": 0, "positionY": 0, "sizeWidth": 10, "sizeHeight": 10,
    }))
    .unwrap();
    let ElementBody::Code(code) = &el.body else {
        panic!("expected code body");
    };
    assert_eq!(code.programming_language, CodeLanguage::JavaScript);
}

#[test]
fn video_autoplay_garbage_is_false() {
    let el: Element = serde_json::from_value(json!({
        "id": Uuid::new_v4(),
        "type": "video",
        "videoUrl": "https://youtube.com/embed/x",
        "autoplay": null,
        "positionX": 0, "positionY": 0, "sizeWidth": 10, "sizeHeight": 10,
    }))
    .unwrap();
    assert!(matches!(el.body, ElementBody::Video(VideoBody { autoplay: false, .. })));
}

#[test]
fn unreadable_backgrounds_read_as_unset() {
    let slide: Slide = serde_json::from_value(json!({ "id": Uuid::new_v4(), "backgroundColor": "" })).unwrap();
    assert_eq!(slide.background_color, None);
    let p: Presentation = serde_json::from_value(json!({
        "id": "p1",
        "defaultBackground": "linear-gradient(sideways, #FFF, #000)",
    }))
    .unwrap();
    assert_eq!(p.default_background, None);
}

#[test]
fn unknown_type_rejects() {
    let result = serde_json::from_value::<Element>(json!({
        "id": Uuid::new_v4(),
        "type": "hexagon",
        "positionX": 0, "positionY": 0, "sizeWidth": 10, "sizeHeight": 10,
    }));
    assert!(result.is_err());
}

#[test]
fn kind_matches_body() {
    assert_eq!(text_element(0, "").kind(), ElementKind::Text);
}

// =============================================================
// CodeLanguage
// =============================================================

#[test]
fn code_language_is_case_insensitive() {
    assert_eq!("JavaScript".parse::<CodeLanguage>().unwrap(), CodeLanguage::JavaScript);
    assert_eq!("PYTHON".parse::<CodeLanguage>().unwrap(), CodeLanguage::Python);
    assert_eq!("c".parse::<CodeLanguage>().unwrap(), CodeLanguage::C);
}

#[test]
fn code_language_empty_is_default() {
    assert_eq!("".parse::<CodeLanguage>().unwrap(), CodeLanguage::JavaScript);
}

#[test]
fn code_language_unknown_rejects() {
    assert!("cobol".parse::<CodeLanguage>().is_err());
}

#[test]
fn code_language_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&CodeLanguage::Python).unwrap(), "\"python\"");
}

// =============================================================
// Video embed
// =============================================================

#[test]
fn embed_url_sets_autoplay_and_mute() {
    let video = VideoBody { video_url: "https://www.youtube.com/embed/abc?rel=0".into(), autoplay: true };
    let url = video.embed_url().unwrap();
    assert_eq!(url.as_str(), "https://www.youtube.com/embed/abc?rel=0&autoplay=1&mute=1");
}

#[test]
fn embed_url_replaces_existing_flags() {
    let video = VideoBody { video_url: "https://v.test/x?autoplay=1&mute=0".into(), autoplay: false };
    let url = video.embed_url().unwrap();
    assert_eq!(url.query(), Some("autoplay=0&mute=1"));
}

#[test]
fn embed_url_rejects_relative() {
    let video = VideoBody { video_url: "not a url".into(), autoplay: false };
    assert!(video.embed_url().is_err());
}

// =============================================================
// Slide
// =============================================================

#[test]
fn paint_order_sorts_by_layer_then_insertion() {
    let a = text_element(1, "a");
    let b = text_element(0, "b");
    let c = text_element(1, "c");
    let d = text_element(0, "d");
    let slide = slide_with(vec![a.clone(), b.clone(), c.clone(), d.clone()]);
    let ids: Vec<ElementId> = slide.paint_order().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![b.id, d.id, a.id, c.id]);
}

#[test]
fn paint_order_survives_round_trip() {
    let slide = slide_with(vec![text_element(2, "top"), text_element(0, "bottom"), text_element(1, "middle")]);
    let before: Vec<ElementId> = slide.paint_order().iter().map(|e| e.id).collect();
    let back: Slide = serde_json::from_str(&serde_json::to_string(&slide).unwrap()).unwrap();
    let after: Vec<ElementId> = back.paint_order().iter().map(|e| e.id).collect();
    assert_eq!(before, after);
}

#[test]
fn next_layer_is_one_above_top() {
    assert_eq!(slide_with(vec![]).next_layer(), 0);
    assert_eq!(slide_with(vec![text_element(0, ""), text_element(4, "")]).next_layer(), 5);
}

#[test]
fn set_geometry_updates_existing_only() {
    let el = text_element(0, "");
    let mut slide = slide_with(vec![el.clone()]);
    let rect = PercentRect::new(5.0, 5.0, 10.0, 10.0);
    assert!(slide.set_geometry(&el.id, rect));
    assert_eq!(slide.element(&el.id).unwrap().rect, rect);
    assert!(!slide.set_geometry(&Uuid::new_v4(), rect));
}

#[test]
fn replace_and_remove_element() {
    let el = text_element(0, "old");
    let mut slide = slide_with(vec![el.clone()]);
    let mut changed = el.clone();
    changed.layer = 9;
    assert!(slide.replace_element(changed.clone()));
    assert_eq!(slide.element(&el.id), Some(&changed));
    assert_eq!(slide.remove_element(&el.id), Some(changed));
    assert!(slide.elements.is_empty());
    assert!(slide.remove_element(&el.id).is_none());
}

#[test]
fn background_falls_back_to_default() {
    let default = Paint::Solid("#123456".into());
    let mut slide = Slide::blank();
    assert_eq!(slide.background(&default), &default);
    slide.background_color = Some(Paint::Solid("#000000".into()));
    assert_eq!(slide.background(&default), &Paint::Solid("#000000".into()));
}

#[test]
fn blank_slides_get_distinct_ids() {
    assert_ne!(Slide::blank().id, Slide::blank().id);
}

#[test]
fn slide_ignores_legacy_content_field() {
    let slide: Slide = serde_json::from_value(json!({ "id": Uuid::new_v4(), "content": "Slide 2" })).unwrap();
    assert!(slide.elements.is_empty());
    assert!(slide.background_color.is_none());
}

// =============================================================
// Presentation
// =============================================================

#[test]
fn presentation_new_has_one_blank_slide() {
    let p = Presentation::new("p1", "Deck");
    assert_eq!(p.slides.len(), 1);
    assert!(p.slides[0].elements.is_empty());
}

#[test]
fn presentation_reads_legacy_default_color() {
    let p: Presentation = serde_json::from_value(json!({
        "id": "p1",
        "name": "Deck",
        "defaultColor": "#ABCDEF",
        "slides": [],
    }))
    .unwrap();
    assert_eq!(p.default_background, Some(Paint::Solid("#ABCDEF".into())));
    let out = serde_json::to_value(&p).unwrap();
    assert_eq!(out["defaultBackground"], "#ABCDEF");
    assert!(out.get("defaultColor").is_none());
}

#[test]
fn presentation_preserves_unknown_fields() {
    let raw = json!({
        "id": "p1",
        "name": "Deck",
        "thumbnail": "https://x.test/t.png",
        "owner": "someone@example.com",
        "createdAt": 1_700_000_000,
        "slides": [{ "id": Uuid::new_v4(), "elements": [] }],
    });
    let p: Presentation = serde_json::from_value(raw.clone()).unwrap();
    let out = serde_json::to_value(&p).unwrap();
    assert_eq!(out["owner"], raw["owner"]);
    assert_eq!(out["createdAt"], raw["createdAt"]);
    assert_eq!(out["thumbnail"], raw["thumbnail"]);
}

#[test]
fn effective_default_background() {
    let mut p = Presentation::new("p1", "Deck");
    assert_eq!(p.effective_default_background(), Paint::default());
    p.default_background = Some(Paint::Solid("#000000".into()));
    assert_eq!(p.effective_default_background(), Paint::Solid("#000000".into()));
}

#[test]
fn slide_index_by_id() {
    let mut p = Presentation::new("p1", "Deck");
    p.slides.push(Slide::blank());
    let second = p.slides[1].id;
    assert_eq!(p.slide_index(&second), Some(1));
    assert_eq!(p.slide_index(&Uuid::new_v4()), None);
}
