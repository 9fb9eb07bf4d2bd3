use super::*;

fn minimal() -> Schedule {
    Schedule {
        paragraphs: vec![Event::new(0.0, 0)],
        emotions: vec![Event::new(0.0, 0)],
        images: vec![Event::new(0.0, 0)],
        poses: vec![Event::new(0.0, 2)],
        phonemes: vec![Event::new(0.0, Viseme::M)],
    }
}

#[test]
fn minimal_schedule_is_valid() {
    minimal().validate().unwrap();
}

#[test]
fn empty_track_is_rejected() {
    let mut s = minimal();
    s.images.clear();
    let err = s.validate().unwrap_err();
    assert!(err.to_string().contains("image track must not be empty"));
}

#[test]
fn track_must_start_at_zero() {
    let mut s = minimal();
    s.poses[0].time_s = 0.5;
    assert!(s.validate().is_err());
}

#[test]
fn decreasing_timestamps_are_rejected() {
    let mut s = minimal();
    s.phonemes.push(Event::new(1.0, Viseme::A));
    s.phonemes.push(Event::new(0.9, Viseme::T));
    let err = s.validate().unwrap_err();
    assert!(err.to_string().contains("phoneme track"));
}

#[test]
fn track_names_roundtrip() {
    for t in Track::ALL {
        assert_eq!(t.name().parse::<Track>().unwrap(), t);
    }
    assert!("mouth".parse::<Track>().is_err());
}

#[test]
fn id_track_excludes_phonemes() {
    let s = minimal();
    assert!(s.id_track(Track::Phoneme).is_none());
    assert_eq!(s.id_track(Track::Pose).unwrap()[0].value, 2);
    assert_eq!(s.last_phoneme_time(), Some(0.0));
}
