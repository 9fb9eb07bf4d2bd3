use super::*;
use crate::assets::decode::PreparedBitmap;
use crate::assets::geometry::{MouthGeometry, MouthPlacement};
use crate::config::rig::RigConfig;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Canvas, Point, Rgba8Premul};
use crate::schedule::model::{Event, Schedule};
use crate::schedule::phoneme::Viseme;
use crate::timeline::compiler::{TimelineOpts, compile_timeline};

fn assets() -> CharacterAssets {
    let rig = RigConfig {
        canvas: Canvas {
            width: 16,
            height: 24,
        },
        ..RigConfig::default()
    };
    let bodies = (0..30)
        .map(|i| PreparedBitmap::solid(10, 12, Rgba8Premul::from_straight_rgba(0, i * 8, 90, 255)))
        .collect();
    let mouths = (0..22)
        .map(|i| PreparedBitmap::solid(3, 2, Rgba8Premul::from_straight_rgba(i * 10, 0, 0, 255)))
        .collect();
    let geometry = MouthGeometry::from_rows(vec![MouthPlacement::at(Point::new(5.0, 4.0)); 30]);
    CharacterAssets::from_parts(
        &rig,
        PreparedBitmap::solid(16, 24, Rgba8Premul::from_straight_rgba(255, 255, 255, 255)),
        bodies,
        mouths,
        geometry,
    )
    .unwrap()
}

fn timeline() -> Timeline {
    let s = Schedule {
        paragraphs: vec![Event::new(0.0, 0)],
        emotions: vec![Event::new(0.0, 0), Event::new(0.8, 2)],
        images: vec![Event::new(0.0, 0)],
        poses: vec![Event::new(0.0, 1), Event::new(0.5, 3), Event::new(1.2, 0)],
        phonemes: vec![
            Event::new(0.0, Viseme::M),
            Event::new(0.2, Viseme::A),
            Event::new(0.5, Viseme::T),
            Event::new(0.7, Viseme::U),
            Event::new(1.0, Viseme::M),
        ],
    };
    compile_timeline(&s, TimelineOpts::default()).unwrap()
}

fn run(opts: &RenderOpts) -> (Vec<FrameRGBA>, RenderStats, InMemorySink) {
    let mut sink = InMemorySink::new();
    let stats = render_timeline(
        &timeline(),
        &assets(),
        JiggleParams::default(),
        opts,
        &mut sink,
    )
    .unwrap();
    let frames = sink.frames().iter().map(|(_, f)| f.clone()).collect();
    (frames, stats, sink)
}

#[test]
fn caching_elides_repeated_states() {
    let (frames, stats, sink) = run(&RenderOpts::default());
    let tl = timeline();
    assert_eq!(stats.frames_total, tl.frame_count());
    assert_eq!(frames.len() as u64, tl.frame_count());
    assert!(stats.frames_rendered < stats.frames_total);
    assert_eq!(stats.frames_elided, stats.frames_total - stats.frames_rendered);
    assert_eq!(sink.duplicates(), stats.frames_elided);

    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.frame_count), (16, 24, tl.frame_count()));
    for (i, (idx, _)) in sink.frames().iter().enumerate() {
        assert_eq!(idx.0, i as u64);
    }
}

#[test]
fn cached_output_matches_uncached_output() {
    let (cached, _, _) = run(&RenderOpts::default());
    let (direct, stats, _) = run(&RenderOpts {
        frame_caching: false,
        ..RenderOpts::default()
    });
    assert_eq!(stats.frames_rendered, stats.frames_total);
    assert_eq!(stats.frames_elided, 0);
    assert_eq!(cached, direct);
}

#[test]
fn parallel_matches_sequential() {
    let opts = RenderOpts {
        jiggle: true,
        ..RenderOpts::default()
    };
    let (seq, seq_stats, _) = run(&opts);
    let (par, par_stats, _) = run(&RenderOpts {
        parallel: true,
        threads: Some(2),
        chunk_size: 7,
        ..opts
    });
    assert_eq!(seq, par);
    assert_eq!(seq_stats, par_stats);
}

#[test]
fn jiggle_phase_policy_renders_more_frames() {
    let base = RenderOpts {
        jiggle: true,
        ..RenderOpts::default()
    };
    let (_, discrete, _) = run(&base);
    let (_, phased, _) = run(&RenderOpts {
        signature_policy: SignaturePolicy::WithJigglePhase,
        ..base
    });
    assert!(phased.frames_rendered > discrete.frames_rendered);
}

#[test]
fn zero_threads_is_rejected() {
    let err = build_thread_pool(Some(0)).unwrap_err();
    assert!(matches!(err, StickcastError::Validation(_)));

    let mut sink = InMemorySink::new();
    let err = render_timeline(
        &timeline(),
        &assets(),
        JiggleParams::default(),
        &RenderOpts {
            parallel: true,
            threads: Some(0),
            ..RenderOpts::default()
        },
        &mut sink,
    )
    .unwrap_err();
    assert!(matches!(err, StickcastError::Validation(_)));
    assert!(sink.config().is_none());
}

fn timeline_with(poses: Vec<Event<u32>>, emotions: Vec<Event<u32>>) -> Timeline {
    let s = Schedule {
        paragraphs: vec![Event::new(0.0, 0)],
        emotions,
        images: vec![Event::new(0.0, 0)],
        poses,
        phonemes: vec![Event::new(0.0, Viseme::M), Event::new(0.4, Viseme::A)],
    };
    compile_timeline(&s, TimelineOpts::default()).unwrap()
}

#[test]
fn ids_outside_the_rig_fail_before_any_frame() {
    let cases = [
        // Pose 7 with 5 poses would otherwise land on emotion 1's bodies.
        timeline_with(
            vec![Event::new(0.0, 1), Event::new(0.5, 7)],
            vec![Event::new(0.0, 0)],
        ),
        timeline_with(
            vec![Event::new(0.0, 1)],
            vec![Event::new(0.0, 0), Event::new(1.0, 9)],
        ),
        timeline_with(
            vec![Event::new(0.0, 1)],
            vec![Event::new(0.0, u32::MAX)],
        ),
    ];
    for tl in cases {
        let mut sink = InMemorySink::new();
        let err = render_timeline(
            &tl,
            &assets(),
            JiggleParams::default(),
            &RenderOpts::default(),
            &mut sink,
        )
        .unwrap_err();
        assert!(matches!(err, StickcastError::Validation(_)), "{err}");
        assert!(sink.config().is_none());
        assert!(sink.frames().is_empty());
    }
}
