use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
enum Key {
    Image,
    Caption,
    Label,
}

fn set() -> AnchorSet<Key> {
    let mut s = AnchorSet::new(Surface::new(400.0, 300.0).unwrap(), Breakpoint::Wide);
    let img = s.put_rect(Key::Image, Rect::new(10.0, 10.0, 110.0, 110.0));
    s.put_rect(
        Key::Caption,
        Rect::new(img.x0, img.y1 + 12.0, img.x1, img.y1 + 52.0),
    );
    s
}

#[test]
fn lookups_return_stored_geometry() {
    let s = set();
    assert_eq!(s.len(), 2);
    assert_eq!(s.rect(Key::Caption).unwrap().y0, 122.0);
    assert_eq!(s.point(Key::Image).unwrap(), Point::new(10.0, 10.0));
}

#[test]
fn missing_anchor_is_a_layout_error() {
    let err = set().rect(Key::Label).unwrap_err();
    assert!(matches!(err, ChoreoError::Layout(_)));
    assert!(err.to_string().contains("Label"));
}

#[test]
fn point_anchor_is_not_a_rect() {
    let mut s = set();
    s.put_point(Key::Label, Point::new(1.0, 2.0));
    assert!(s.rect(Key::Label).is_err());
    assert_eq!(s.point(Key::Label).unwrap(), Point::new(1.0, 2.0));
}

#[test]
fn anchor_sets_serialize_by_key_name() {
    let json = serde_json::to_string(&set()).unwrap();
    assert!(json.contains("\"key\":\"caption\""));
    assert!(json.contains("\"wide\""));
}
