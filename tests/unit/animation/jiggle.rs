use super::*;

#[test]
fn envelope_starts_at_zero_and_settles_to_one() {
    let p = JiggleParams::default();
    assert_eq!(p.envelope(0.0), 0.0);
    assert_eq!(p.envelope(7.0), 1.0);
    assert_eq!(p.envelope(100.0), 1.0);
    assert!(p.envelope(1.0) > 0.0);
}

#[test]
fn settled_frames_have_unit_factor() {
    let p = JiggleParams::default();
    assert!((p.factor(20, Some(20)) - 1.0).abs() < 1e-12);
}

#[test]
fn missing_next_pose_contributes_nothing() {
    let p = JiggleParams::default();
    assert!((p.factor(20, None) - 1.07).abs() < 1e-12);
    assert!((p.factor(0, None) - 1.0).abs() < 1e-12);
}

#[test]
fn factor_moves_after_pose_change() {
    let p = JiggleParams::default();
    let f = p.factor(1, Some(30));
    let expected = 1.07f64.powf(p.envelope(1.0) - 1.0);
    assert!((f - expected).abs() < 1e-12);
    assert!(f < 1.0);
}

#[test]
fn deserializes_with_partial_fields() {
    let p: JiggleParams = serde_json::from_str(r#"{"base": 1.2}"#).unwrap();
    assert_eq!(p.base, 1.2);
    assert_eq!(p.fader, 0.06);
    assert_eq!(p.max_frames, 7.0);
}
