use std::fmt;
use std::str::FromStr;

use crate::foundation::error::StickcastError;

/// Visual mouth-shape category.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Viseme {
    /// Open vowel.
    A,
    /// Lip-teeth fricative.
    F,
    /// Closed lips. Also used for silence.
    M,
    /// Tongue/teeth consonant, slightly open.
    T,
    /// Rounded lips.
    U,
    /// Spread, narrow opening.
    Y,
}

impl Viseme {
    /// Single-letter symbol used in schedule artifacts.
    pub fn symbol(self) -> char {
        match self {
            Viseme::A => 'a',
            Viseme::F => 'f',
            Viseme::M => 'm',
            Viseme::T => 't',
            Viseme::U => 'u',
            Viseme::Y => 'y',
        }
    }

    /// Parse a single-letter symbol.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'a' => Some(Viseme::A),
            'f' => Some(Viseme::F),
            'm' => Some(Viseme::M),
            't' => Some(Viseme::T),
            'u' => Some(Viseme::U),
            'y' => Some(Viseme::Y),
            _ => None,
        }
    }

    /// Visemes that leave the mouth visibly open at the end of a word.
    pub fn is_open(self) -> bool {
        matches!(self, Viseme::A | Viseme::F | Viseme::U | Viseme::Y)
    }
}

impl fmt::Display for Viseme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Viseme {
    type Err = StickcastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Viseme::from_symbol(c)
                .ok_or_else(|| StickcastError::validation(format!("unknown viseme '{s}'"))),
            _ => Err(StickcastError::validation(format!("unknown viseme '{s}'"))),
        }
    }
}

/// Mouth movement for one phone: a single viseme, or a glide between two.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouthClass {
    /// Held for the whole phone.
    Single(Viseme),
    /// First viseme at the phone start, second at its midpoint.
    Glide(Viseme, Viseme),
}

/// Classify an aligner phone symbol (position tag already stripped).
///
/// `sil` and anything unrecognised map to the closed mouth.
pub fn classify_phone(symbol: &str) -> MouthClass {
    use MouthClass::{Glide, Single};
    use Viseme::*;

    match symbol {
        "aa" | "ae" | "ah" | "ao" | "eh" | "ih" => Single(A),
        "aw" | "ow" => Glide(A, U),
        "ay" | "ey" | "iy" => Glide(A, Y),
        "oy" => Glide(U, A),
        "b" | "m" | "p" | "oov" | "sil" => Single(M),
        "ch" | "d" | "dh" | "g" | "jh" | "k" | "n" | "ng" | "s" | "sh" | "t" | "th" | "z"
        | "zh" => Single(T),
        "f" | "v" => Single(F),
        "er" | "r" | "uh" | "uw" | "w" => Single(U),
        "hh" | "l" | "y" => Single(Y),
        _ => Single(M),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/phoneme.rs"]
mod tests;
