use super::*;

fn sample() -> Schedule {
    Schedule {
        paragraphs: vec![Event::new(0.0, 0), Event::new(1.0, 1)],
        emotions: vec![Event::new(0.0, 0)],
        images: vec![Event::new(0.0, 0), Event::new(1.0, 1)],
        poses: vec![Event::new(0.0, 3), Event::new(1.0, 1)],
        phonemes: vec![
            Event::new(0.0, Viseme::M),
            Event::new(0.0, Viseme::Y),
            Event::new(0.1, Viseme::A),
            Event::new(1.25, Viseme::T),
        ],
    }
}

#[test]
fn writes_sections_in_track_order() {
    let text = schedule_to_string(&sample());
    assert_eq!(
        text,
        "0.000,paragraph,0\n1.000,paragraph,1\n\
         SECTION\n0.000,emotion,0\n\
         SECTION\n0.000,image,0\n1.000,image,1\n\
         SECTION\n0.000,pose,3\n1.000,pose,1\n\
         SECTION\n0.000,phoneme,m\n0.000,phoneme,y\n0.100,phoneme,a\n1.250,phoneme,t\n"
    );
}

#[test]
fn parses_what_it_writes() {
    let s = sample();
    assert_eq!(parse_schedule(&schedule_to_string(&s)).unwrap(), s);
}

#[test]
fn accepts_unpadded_timestamps_and_blank_lines() {
    let text = "0,paragraph,0\n\nSECTION\n0,emotion,0\nSECTION\n0,image,0\nSECTION\n0,pose,2\n\
                SECTION\n0,phoneme,m\n0.533,phoneme,a\n\n";
    let s = parse_schedule(text).unwrap();
    assert_eq!(s.poses[0].value, 2);
    assert_eq!(s.phonemes[1].time_s, 0.533);
    assert_eq!(s.phonemes[1].value, Viseme::A);
}

#[test]
fn rejects_record_in_wrong_section() {
    let text = "0,paragraph,0\nSECTION\n0,pose,0\nSECTION\n0,image,0\nSECTION\n0,pose,2\n\
                SECTION\n0,phoneme,m\n";
    let err = parse_schedule(text).unwrap_err();
    assert!(err.to_string().contains("in the emotion section"));
}

#[test]
fn rejects_missing_sections() {
    let err = parse_schedule("0,paragraph,0\nSECTION\n0,emotion,0\n").unwrap_err();
    assert!(err.to_string().contains("expected 5"));
}

#[test]
fn rejects_bad_values() {
    let bad_id = "0,paragraph,x\nSECTION\n0,emotion,0\nSECTION\n0,image,0\nSECTION\n0,pose,2\n\
                  SECTION\n0,phoneme,m\n";
    assert!(parse_schedule(bad_id).is_err());

    let bad_viseme = "0,paragraph,0\nSECTION\n0,emotion,0\nSECTION\n0,image,0\nSECTION\n0,pose,2\n\
                      SECTION\n0,phoneme,q\n";
    assert!(parse_schedule(bad_viseme).is_err());
}
