use crate::schedule::phoneme::Viseme;
use crate::timeline::compiler::FrameEvent;

/// Index into the mouth bitmap set (0..=10 for one polarity).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct MouthShape(pub u8);

impl MouthShape {
    /// Spread lips (`y`). Also the start of the `a` opening ramp.
    pub const SPREAD: MouthShape = MouthShape(0);
    /// Teeth (`t`).
    pub const TEETH: MouthShape = MouthShape(6);
    /// Lip on teeth (`f`).
    pub const LIP_BITE: MouthShape = MouthShape(7);
    /// Closed (`m`).
    pub const CLOSED: MouthShape = MouthShape(8);
    /// Rounded, loose (`u` edges).
    pub const ROUND: MouthShape = MouthShape(9);
    /// Rounded, tight (`u` interior).
    pub const ROUND_TIGHT: MouthShape = MouthShape(10);

    /// Number of shapes per polarity.
    pub const COUNT: u32 = 11;
}

// Opening ramp for short `a` intervals, by length then by `2*start_forced + end_forced`.
// Entries are ramp levels; shape = (level - 1) * 2.
const OPEN_TRACKS: [[&[u8]; 4]; 4] = [
    [&[1], &[2], &[2], &[2]],
    [&[2, 1], &[1, 2], &[2, 1], &[3, 2]],
    [&[1, 2, 1], &[1, 3, 2], &[2, 3, 1], &[2, 3, 2]],
    [&[1, 3, 2, 1], &[1, 2, 3, 2], &[2, 3, 2, 1], &[2, 3, 3, 2]],
];

/// Expand phoneme boundaries into one mouth shape per frame.
///
/// `phonemes` must have strictly increasing frames starting at 0. Each event holds until the next
/// one; the last holds until `frame_count`. Intervals past `frame_count` are dropped.
pub fn mouth_curve(phonemes: &[FrameEvent<Viseme>], frame_count: u64) -> Vec<MouthShape> {
    let mut curve = Vec::with_capacity(frame_count as usize);
    for (i, ev) in phonemes.iter().enumerate() {
        let next = phonemes.get(i + 1);
        let start = ev.frame.min(frame_count);
        let end = next.map(|n| n.frame).unwrap_or(frame_count).min(frame_count);
        if end <= start {
            continue;
        }
        let prev = i.checked_sub(1).map(|p| phonemes[p].value);
        curve.extend(interval_shapes(
            ev.value,
            (end - start) as usize,
            prev,
            next.map(|n| n.value),
        ));
    }
    curve.resize(frame_count as usize, MouthShape::CLOSED);
    curve
}

/// Mouth shapes for one viseme held for `len` frames between `prev` and `next`.
pub fn interval_shapes(
    viseme: Viseme,
    len: usize,
    prev: Option<Viseme>,
    next: Option<Viseme>,
) -> Vec<MouthShape> {
    if len == 0 {
        return Vec::new();
    }
    let mut shapes = match viseme {
        Viseme::Y => vec![MouthShape::SPREAD; len],
        Viseme::T => vec![MouthShape::TEETH; len],
        Viseme::F => vec![MouthShape::LIP_BITE; len],
        Viseme::M => vec![MouthShape::CLOSED; len],
        Viseme::U => {
            let mut v = vec![MouthShape::ROUND; len];
            if len >= 3 {
                v[1..len - 1].fill(MouthShape::ROUND_TIGHT);
            } else if len == 2 {
                v[1] = MouthShape::ROUND_TIGHT;
            }
            v
        }
        Viseme::A => {
            let forces_open = |v: Option<Viseme>| matches!(v, Some(Viseme::T | Viseme::Y));
            open_ramp(len, forces_open(prev), forces_open(next))
        }
    };

    // Lean toward the rounded shape next to a `u`.
    if matches!(viseme, Viseme::A | Viseme::Y) {
        if prev == Some(Viseme::U) {
            shapes[0].0 += 1;
        }
        if next == Some(Viseme::U) {
            shapes[len - 1].0 += 1;
        }
    }
    shapes
}

fn open_ramp(len: usize, start_forced: bool, end_forced: bool) -> Vec<MouthShape> {
    if len < 5 {
        let flags = usize::from(start_forced) * 2 + usize::from(end_forced);
        return OPEN_TRACKS[len - 1][flags]
            .iter()
            .map(|&level| MouthShape((level - 1) * 2))
            .collect();
    }

    let start_size = if start_forced { 2 } else { 1 };
    let end_size = if end_forced { 2 } else { 1 };
    (0..len)
        .map(|k| {
            let level = (k + start_size).min(len - 1 - k + end_size);
            if level >= 3 {
                // Alternate between the two widest shapes while held open.
                if level % 2 == 1 {
                    MouthShape(4)
                } else {
                    MouthShape(5)
                }
            } else {
                MouthShape(((level - 1) * 2) as u8)
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/mouth.rs"]
mod tests;
