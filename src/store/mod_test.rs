use canvas::doc::Slide;
use serde_json::json;
use uuid::Uuid;

use super::*;

/// A sibling the typed model cannot fully read, plus fields it does not model.
fn awkward_sibling(slide_id: Uuid, element_id: Uuid) -> Value {
    json!({
        "id": "p2",
        "name": "Other",
        "owner": "someone-else",
        "slides": [{
            "id": slide_id,
            "content": "Slide 1",
            "elements": [{
                "id": element_id,
                "type": "code",
                "programmingLanguage": "rust",
                "fontSize": null,
                "rotation": 45,
                "positionX": "0", "positionY": "0", "sizeWidth": "10", "sizeHeight": "10"
            }]
        }]
    })
}

// =============================================================================
// parse_snapshot
// =============================================================================

#[test]
fn parse_snapshot_reads_presentations() {
    let text = json!({
        "store": {
            "presentations": [
                { "id": "p1", "name": "Deck", "slides": [] },
                { "id": "p2", "name": "Other", "slides": [] }
            ]
        }
    })
    .to_string();
    let snapshot = parse_snapshot(&text).unwrap();
    assert_eq!(snapshot.presentation_ids(), vec!["p1".to_string(), "p2".to_string()]);
    assert_eq!(snapshot.presentation("p2").unwrap().map(|p| p.name), Some("Other".to_string()));
    assert!(snapshot.presentation("p3").unwrap().is_none());
    assert!(snapshot.contains("p1"));
    assert!(!snapshot.contains("p3"));
}

#[test]
fn parse_snapshot_empty_store() {
    let snapshot = parse_snapshot(r#"{"store":{}}"#).unwrap();
    assert!(snapshot.presentations.is_empty());
    let snapshot = parse_snapshot("{}").unwrap();
    assert!(snapshot.presentations.is_empty());
}

#[test]
fn parse_snapshot_keeps_other_fields() {
    let text = json!({ "store": { "presentations": [], "theme": "dark" } }).to_string();
    let snapshot = parse_snapshot(&text).unwrap();
    assert_eq!(snapshot.extra.get("theme"), Some(&json!("dark")));
}

#[test]
fn parse_snapshot_rejects_garbage() {
    assert!(matches!(parse_snapshot("<html>"), Err(StoreError::Decode(_))));
    assert!(matches!(parse_snapshot(r#"{"store":{"presentations":"nope"}}"#), Err(StoreError::Decode(_))));
}

#[test]
fn unreadable_sibling_does_not_block_the_target() {
    let text = json!({
        "store": {
            "presentations": [
                { "id": "p1", "name": "Deck", "slides": [] },
                { "id": "p2", "slides": "not a list" },
                { "name": "no id at all" }
            ]
        }
    })
    .to_string();
    let snapshot = parse_snapshot(&text).unwrap();
    assert_eq!(snapshot.presentation("p1").unwrap().map(|p| p.name), Some("Deck".to_string()));
    assert!(matches!(snapshot.presentation("p2"), Err(StoreError::Decode(msg)) if msg.contains("p2")));
    assert_eq!(snapshot.presentation_ids(), vec!["p1".to_string(), "p2".to_string()]);
}

#[test]
fn sibling_with_null_font_size_and_unknown_language_decodes() {
    let text = json!({ "store": { "presentations": [awkward_sibling(Uuid::new_v4(), Uuid::new_v4())] } }).to_string();
    let snapshot = parse_snapshot(&text).unwrap();
    let p2 = snapshot.presentation("p2").unwrap().unwrap();
    assert_eq!(p2.slides[0].elements.len(), 1);
}

// =============================================================================
// put_presentation
// =============================================================================

#[test]
fn put_presentation_leaves_siblings_byte_identical() {
    let sibling = awkward_sibling(Uuid::new_v4(), Uuid::new_v4());
    let mut snapshot = StoreSnapshot::new(vec![json!({ "id": "p1", "name": "Deck", "slides": [] }), sibling.clone()]);

    let mut p1 = snapshot.presentation("p1").unwrap().unwrap();
    p1.slides.push(Slide::blank());
    snapshot.put_presentation(&p1).unwrap();

    assert_eq!(snapshot.presentations[1], sibling);
    assert_eq!(snapshot.presentations[0]["slides"].as_array().map(Vec::len), Some(1));
}

#[test]
fn put_presentation_keeps_unmodelled_keys_on_the_target() {
    let (slide_id, element_id) = (Uuid::new_v4(), Uuid::new_v4());
    let mut record = awkward_sibling(slide_id, element_id);
    record["id"] = json!("p1");
    let mut snapshot = StoreSnapshot::new(vec![record]);

    let mut p1 = snapshot.presentation("p1").unwrap().unwrap();
    p1.name = "Renamed".into();
    p1.slides[0].elements[0].rect.position_x = 20.0;
    snapshot.put_presentation(&p1).unwrap();

    let written = &snapshot.presentations[0];
    assert_eq!(written["name"], "Renamed");
    assert_eq!(written["owner"], "someone-else");
    assert_eq!(written["slides"][0]["content"], "Slide 1");
    assert_eq!(written["slides"][0]["elements"][0]["rotation"], 45);
    assert_eq!(written["slides"][0]["elements"][0]["positionX"], json!(20.0));
}

#[test]
fn put_presentation_follows_typed_order_and_membership() {
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let mut snapshot = StoreSnapshot::new(vec![json!({
        "id": "p1",
        "slides": [
            { "id": a, "content": "A" },
            { "id": b, "content": "B" },
            { "id": c, "content": "C" }
        ]
    })]);
    let mut p1 = snapshot.presentation("p1").unwrap().unwrap();
    p1.slides.remove(1);
    p1.slides.reverse();
    snapshot.put_presentation(&p1).unwrap();

    let slides = snapshot.presentations[0]["slides"].as_array().unwrap();
    let contents: Vec<&str> = slides.iter().map(|s| s["content"].as_str().unwrap()).collect();
    assert_eq!(contents, vec!["C", "A"]);
}

#[test]
fn put_presentation_replaces_an_element_whose_kind_changed() {
    let (slide_id, element_id) = (Uuid::new_v4(), Uuid::new_v4());
    let mut snapshot = StoreSnapshot::new(vec![json!({
        "id": "p1",
        "slides": [{
            "id": slide_id,
            "elements": [{
                "id": element_id, "type": "image", "imageUrl": "https://x/y.png",
                "positionX": 0, "positionY": 0, "sizeWidth": 10, "sizeHeight": 10
            }]
        }]
    })]);
    let mut p1 = snapshot.presentation("p1").unwrap().unwrap();
    let mut draft = canvas::validate::ElementDraft::from_element(&p1.slides[0].elements[0]);
    draft.kind = canvas::doc::ElementKind::Text;
    draft.content = "hi".into();
    p1.slides[0].elements[0] = draft.build(element_id, 0).unwrap();
    snapshot.put_presentation(&p1).unwrap();

    let element = &snapshot.presentations[0]["slides"][0]["elements"][0];
    assert_eq!(element["type"], "text");
    assert!(element.get("imageUrl").is_none());
}

#[test]
fn put_presentation_drops_the_old_background_key() {
    let mut snapshot = StoreSnapshot::new(vec![json!({ "id": "p1", "defaultColor": "#111111", "slides": [] })]);
    let mut p1 = snapshot.presentation("p1").unwrap().unwrap();
    p1.default_background = Some("#222222".parse().unwrap());
    snapshot.put_presentation(&p1).unwrap();

    assert!(snapshot.presentations[0].get("defaultColor").is_none());
    let again = snapshot.presentation("p1").unwrap().unwrap();
    assert_eq!(again.default_background, Some("#222222".parse().unwrap()));
}

#[test]
fn put_presentation_appends_when_absent() {
    let mut snapshot = StoreSnapshot::default();
    snapshot.put_presentation(&Presentation::new("p9", "New")).unwrap();
    assert_eq!(snapshot.presentation_ids(), vec!["p9".to_string()]);
}

#[test]
fn from_presentations_round_trips() {
    let deck = Presentation::new("p1", "Deck");
    let snapshot = StoreSnapshot::from_presentations(std::slice::from_ref(&deck)).unwrap();
    assert_eq!(snapshot.presentation("p1").unwrap(), Some(deck));
}

#[test]
fn static_token_returns_its_value() {
    assert_eq!(StaticToken(Some("t".into())).token().as_deref(), Some("t"));
    assert_eq!(StaticToken::default().token(), None);
}
