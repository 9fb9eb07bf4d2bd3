use super::*;

#[test]
fn parses_rows_and_upscales_anchors() {
    let g = MouthGeometry::parse_csv("10,20,1,1,0\n\n5.5,6,-1,0.8,12\n", 2, 3.0).unwrap();
    assert_eq!(g.len(), 2);
    let r0 = g.row(0).unwrap();
    assert_eq!(r0.anchor, Point::new(30.0, 60.0));
    let r1 = g.row(1).unwrap();
    assert_eq!(r1.anchor, Point::new(16.5, 18.0));
    assert_eq!(r1.scale_x, -1.0);
    assert_eq!(r1.scale_y, 0.8);
    assert_eq!(r1.rotation_deg, 12.0);
}

#[test]
fn missing_rows_are_fatal() {
    let err = MouthGeometry::parse_csv("1,2,1,1,0\n", 30, 3.0).unwrap_err();
    assert!(matches!(err, StickcastError::Config(_)));
}

#[test]
fn short_rows_are_fatal() {
    let err = MouthGeometry::parse_csv("1,2,1,1\n", 1, 3.0).unwrap_err();
    assert!(matches!(err, StickcastError::Config(_)));
}

#[test]
fn unparsable_cells_are_fatal() {
    let err = MouthGeometry::parse_csv("1,2,wide,1,0\n", 1, 3.0).unwrap_err();
    assert!(err.to_string().contains("wide"));
}

#[test]
fn row_past_end_is_an_evaluation_error() {
    let g = MouthGeometry::from_rows(vec![MouthPlacement::at(Point::new(1.0, 1.0))]);
    assert!(matches!(g.row(1), Err(StickcastError::Evaluation(_))));
}
