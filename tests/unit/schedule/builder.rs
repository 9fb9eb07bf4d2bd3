use super::*;
use crate::alignment::model::AlignedPhone;
use crate::foundation::rng::Rng64;

struct SeqRng {
    values: Vec<f64>,
    at: usize,
}

impl SeqRng {
    fn new(values: &[f64]) -> Self {
        Self {
            values: values.to_vec(),
            at: 0,
        }
    }
}

impl PoseRng for SeqRng {
    fn next_f64_01(&mut self) -> f64 {
        let v = self.values[self.at % self.values.len()];
        self.at += 1;
        v
    }
}

fn word(text: &str, start: f64, phones: &[(&str, f64)]) -> AlignedWord {
    let phones: Vec<AlignedPhone> = phones
        .iter()
        .map(|(p, d)| AlignedPhone {
            phone: p.to_string(),
            duration: *d,
        })
        .collect();
    let end = start + phones.iter().map(|p| p.duration).sum::<f64>();
    AlignedWord {
        word: text.to_string(),
        start: Some(start),
        end: Some(end),
        case: Some("success".to_string()),
        phones,
    }
}

fn ids(events: &[Event<u32>]) -> Vec<(f64, u32)> {
    events.iter().map(|e| (e.time_s, e.value)).collect()
}

fn visemes(events: &[Event<Viseme>]) -> Vec<(f64, char)> {
    events.iter().map(|e| (e.time_s, e.value.symbol())).collect()
}

#[test]
fn paragraph_break_example() {
    let alignment = Alignment {
        transcript: None,
        words: vec![
            word("Hi", 0.0, &[("hh_B", 0.1), ("aa_E", 0.1)]),
            word("Bye", 1.0, &[("d_B", 0.3)]),
        ],
    };
    let mut rng = SeqRng::new(&[0.0, 0.5]);
    let out = build_schedule(
        "Hi.\n\nBye.",
        &alignment,
        &ScheduleOpts::default(),
        &mut rng,
    )
    .unwrap();
    let s = &out.schedule;

    assert!(out.warnings.is_empty());
    assert_eq!(ids(&s.poses), vec![(0.0, 0), (1.0, 2)]);
    assert_eq!(ids(&s.paragraphs), vec![(0.0, 0), (1.0, 1)]);
    assert_eq!(ids(&s.images), vec![(0.0, 0), (1.0, 1)]);
    assert_eq!(ids(&s.emotions), vec![(0.0, 0)]);
    assert_eq!(
        visemes(&s.phonemes),
        vec![(0.0, 'm'), (0.0, 'y'), (0.1, 'a'), (0.2, 'm'), (1.0, 't')]
    );
    s.validate().unwrap();
}

#[test]
fn single_newline_changes_image_and_pose_only() {
    let alignment = Alignment {
        transcript: None,
        words: vec![
            word("one", 0.0, &[("w_B", 0.1)]),
            word("two", 0.5, &[("t_B", 0.1)]),
        ],
    };
    let mut rng = SeqRng::new(&[0.0, 0.9]);
    let out = build_schedule("one\ntwo", &alignment, &ScheduleOpts::default(), &mut rng).unwrap();
    let s = &out.schedule;
    assert_eq!(ids(&s.paragraphs), vec![(0.0, 0)]);
    assert_eq!(ids(&s.images), vec![(0.0, 0), (0.5, 1)]);
    assert_eq!(ids(&s.poses), vec![(0.0, 0), (0.5, 4)]);
}

#[test]
fn poses_never_repeat_within_two_steps() {
    let words: Vec<AlignedWord> = (0..200)
        .map(|i| word("go", i as f64 * 0.5, &[("g_B", 0.1), ("ow_E", 0.2)]))
        .collect();
    let script = "go. ".repeat(200);
    let alignment = Alignment {
        transcript: None,
        words,
    };
    let opts = ScheduleOpts {
        pose_count: 3,
        ..ScheduleOpts::default()
    };
    let mut rng = Rng64::new(99);
    let out = build_schedule(&script, &alignment, &opts, &mut rng).unwrap();
    let poses: Vec<u32> = out.schedule.poses.iter().map(|e| e.value).collect();
    assert!(poses.len() > 100);
    for w in poses.windows(2) {
        assert_ne!(w[0], w[1]);
    }
    for w in poses.windows(3) {
        assert_ne!(w[0], w[2]);
    }
    assert!(poses.iter().all(|&p| p < 3));
}

#[test]
fn too_few_poses_is_a_config_error() {
    let opts = ScheduleOpts {
        pose_count: 2,
        ..ScheduleOpts::default()
    };
    let mut rng = Rng64::new(0);
    let err = build_schedule("", &Alignment::default(), &opts, &mut rng).unwrap_err();
    assert!(matches!(err, StickcastError::Config(_)));
}

#[test]
fn missing_word_is_skipped_with_warning() {
    let alignment = Alignment {
        transcript: None,
        words: vec![
            word("hello", 0.0, &[("hh_B", 0.1)]),
            word("zebra", 0.5, &[("z_B", 0.1)]),
            word("world", 1.0, &[("w_B", 0.1)]),
        ],
    };
    let mut rng = Rng64::new(1);
    let out = build_schedule(
        "hello world",
        &alignment,
        &ScheduleOpts::default(),
        &mut rng,
    )
    .unwrap();
    assert_eq!(
        out.warnings,
        vec![ScheduleWarning::WordNotFound {
            word: "zebra".to_string(),
            time_s: 0.5
        }]
    );
    let v = visemes(&out.schedule.phonemes);
    assert_eq!(v, vec![(0.0, 'm'), (0.0, 'y'), (1.0, 'u')]);
}

#[test]
fn unaligned_words_are_ignored_silently() {
    let mut lost = word("hello", 0.0, &[]);
    lost.start = None;
    lost.case = Some("not-found-in-audio".to_string());
    let alignment = Alignment {
        transcript: None,
        words: vec![lost, word("world", 1.0, &[("w_B", 0.1)])],
    };
    let mut rng = Rng64::new(1);
    let out = build_schedule(
        "hello world",
        &alignment,
        &ScheduleOpts::default(),
        &mut rng,
    )
    .unwrap();
    assert!(out.warnings.is_empty());
    assert_eq!(out.schedule.phonemes.len(), 2);
}

#[test]
fn emotion_tags_switch_emotion_and_unknown_falls_back() {
    let alignment = Alignment {
        transcript: None,
        words: vec![
            word("happy", 0.5, &[("hh_B", 0.1)]),
            word("day", 1.0, &[("d_B", 0.1)]),
            word("odd", 2.0, &[("aa_B", 0.1)]),
        ],
    };
    let mut rng = Rng64::new(3);
    let out = build_schedule(
        "<happy> happy day <weird> odd",
        &alignment,
        &ScheduleOpts::default(),
        &mut rng,
    )
    .unwrap();
    assert_eq!(ids(&out.schedule.emotions), vec![(0.0, 0), (0.5, 1), (2.0, 0)]);
    assert_eq!(
        out.warnings,
        vec![ScheduleWarning::UnknownEmotion {
            tag: "weird".to_string(),
            time_s: 2.0
        }]
    );
}

#[test]
fn word_inside_tag_is_relocated_past_it() {
    let alignment = Alignment {
        transcript: None,
        words: vec![word("sad", 0.5, &[("s_B", 0.1)])],
    };
    let mut rng = Rng64::new(3);
    let out = build_schedule(
        "<sad> sad",
        &alignment,
        &ScheduleOpts::default(),
        &mut rng,
    )
    .unwrap();
    assert!(out.warnings.is_empty());
    assert_eq!(ids(&out.schedule.emotions), vec![(0.0, 0), (0.5, 2)]);
}

#[test]
fn glides_emit_second_viseme_at_midpoint() {
    let alignment = Alignment {
        transcript: None,
        words: vec![word("eye", 1.0, &[("ay_S", 0.2)])],
    };
    let mut rng = Rng64::new(3);
    let out = build_schedule("eye", &alignment, &ScheduleOpts::default(), &mut rng).unwrap();
    assert_eq!(
        visemes(&out.schedule.phonemes),
        vec![(0.0, 'm'), (1.0, 'a'), (1.1, 'y')]
    );
}

#[test]
fn repeated_visemes_are_compressed() {
    let alignment = Alignment {
        transcript: None,
        words: vec![word("dots", 0.3, &[("d_B", 0.1), ("t_I", 0.1), ("s_E", 0.1)])],
    };
    let mut rng = Rng64::new(3);
    let out = build_schedule("dots", &alignment, &ScheduleOpts::default(), &mut rng).unwrap();
    assert_eq!(visemes(&out.schedule.phonemes), vec![(0.0, 'm'), (0.3, 't')]);
}

#[test]
fn no_closing_mouth_after_word_missing_from_audio() {
    let mut first = word("ah", 0.0, &[("aa_S", 0.2)]);
    first.case = Some("not-found-in-audio".to_string());
    let alignment = Alignment {
        transcript: None,
        words: vec![first, word("next", 1.0, &[("n_B", 0.1)])],
    };
    let mut rng = Rng64::new(3);
    let out = build_schedule("ah\nnext", &alignment, &ScheduleOpts::default(), &mut rng).unwrap();
    assert_eq!(
        visemes(&out.schedule.phonemes),
        vec![(0.0, 'm'), (0.0, 'a'), (1.0, 't')]
    );
}

#[test]
fn phoneme_times_are_non_decreasing() {
    let alignment = Alignment {
        transcript: None,
        words: vec![
            word("a", 0.4, &[("aa_S", 0.3)]),
            word("b", 0.2, &[("b_S", 0.1), ("iy_E", 0.2)]),
            word("c", 0.9, &[("k_B", 0.05), ("ow_E", 0.15)]),
        ],
    };
    let mut rng = Rng64::new(5);
    let out = build_schedule("a\nb c", &alignment, &ScheduleOpts::default(), &mut rng).unwrap();
    for w in out.schedule.phonemes.windows(2) {
        assert!(w[1].time_s >= w[0].time_s);
    }
    out.schedule.validate().unwrap();
}

#[test]
fn word_found_only_inside_a_tag_is_skipped() {
    let alignment = Alignment {
        transcript: None,
        words: vec![
            word("happy", 0.5, &[("hh_B", 0.1)]),
            word("hi", 1.0, &[("hh_B", 0.1), ("ay_E", 0.1)]),
        ],
    };
    let mut rng = Rng64::new(3);
    let out = build_schedule("<happy> hi", &alignment, &ScheduleOpts::default(), &mut rng).unwrap();
    assert_eq!(
        out.warnings,
        vec![ScheduleWarning::WordNotFoundAfterTag {
            word: "happy".to_string(),
            time_s: 0.5
        }]
    );
    // The cursor did not move, so the tag is read with the next word.
    assert_eq!(ids(&out.schedule.emotions), vec![(0.0, 0), (1.0, 1)]);
}

#[test]
fn unclosed_tag_warns_and_keeps_the_word() {
    let alignment = Alignment {
        transcript: None,
        words: vec![
            word("well", 0.0, &[("w_B", 0.1)]),
            word("then", 0.5, &[("dh_B", 0.1)]),
        ],
    };
    let mut rng = Rng64::new(3);
    let out = build_schedule(
        "well <sad then",
        &alignment,
        &ScheduleOpts::default(),
        &mut rng,
    )
    .unwrap();
    assert_eq!(
        out.warnings,
        vec![ScheduleWarning::UnclosedTag { time_s: 0.5 }]
    );
    assert_eq!(ids(&out.schedule.emotions), vec![(0.0, 0)]);
    assert_eq!(
        visemes(&out.schedule.phonemes),
        vec![(0.0, 'm'), (0.0, 'u'), (0.5, 't')]
    );
}
