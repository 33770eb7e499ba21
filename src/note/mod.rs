//! Musical notes in twelve tone equal temperament.
//!
//! A [`Note`] is identified by its index, the signed number of semitones from
//! A4 (440 Hz). Letter, octave and frequency are derived from the index when
//! the note is created, so notes built from an index, a frequency or a
//! letter/octave pair compare equal whenever their indices do.
//!
//! ```
//! use micro_tuner::note::{Letter, Note};
//!
//! let note = Note::from_frequency(446.0).unwrap();
//! assert_eq!(note, Note::from_letter_octave(Letter::A, 4).unwrap());
//! assert_eq!(note.to_string(), "A4");
//! assert_eq!(note.higher().unwrap().letter(), Letter::ASharp);
//! ```

mod calculator;
mod letter;

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;

pub use calculator::{
    frequency_to_index, index_to_frequency, index_to_letter_octave, HIGHEST_INDEX, LOWEST_INDEX,
    STANDARD_FREQUENCY, STANDARD_OCTAVE,
};
pub use letter::Letter;

use crate::error::{PitchError, Result};

/// A note of the chromatic scale within the range
/// [`LOWEST_INDEX`]..=[`HIGHEST_INDEX`].
#[derive(Clone, Copy, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Note {
    index: i32,
    letter: Letter,
    octave: i32,
    frequency: f64,
}

impl Note {
    /// Creates the note `index` semitones away from A4.
    pub fn from_index(index: i32) -> Result<Note> {
        let index = calculator::validate_index(index as i64)?;
        let (letter, octave) = index_to_letter_octave(index);
        Ok(Note {
            index,
            letter,
            octave,
            frequency: index_to_frequency(index),
        })
    }

    /// Creates the note closest to `frequency`. The frequency of the returned
    /// note is the exact frequency of that note, not `frequency`.
    pub fn from_frequency(frequency: f64) -> Result<Note> {
        Note::from_index(frequency_to_index(frequency)?)
    }

    pub fn from_letter_octave(letter: Letter, octave: i32) -> Result<Note> {
        Note::from_index(calculator::letter_octave_to_index(letter, octave, 0)?)
    }

    /// The lowest representable note.
    pub fn lowest() -> Note {
        Note::from_parts(LOWEST_INDEX)
    }

    /// The highest representable note.
    pub fn highest() -> Note {
        Note::from_parts(HIGHEST_INDEX)
    }

    fn from_parts(index: i32) -> Note {
        let (letter, octave) = index_to_letter_octave(index);
        Note {
            index,
            letter,
            octave,
            frequency: index_to_frequency(index),
        }
    }

    /// The notes from C to the C of the following octave, both included.
    pub fn chromatic_scale(octave: i32) -> Result<Vec<Note>> {
        let first = Note::from_letter_octave(Letter::C, octave)?;
        (0..=12).map(|offset| Note::from_index(first.index + offset)).collect()
    }

    /// The number of semitones from A4.
    pub fn index(&self) -> i32 {
        self.index
    }

    pub fn letter(&self) -> Letter {
        self.letter
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    /// The equal temperament frequency of the note in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// One semitone lower. Fails below the lowest representable note.
    pub fn lower(&self) -> Result<Note> {
        Note::from_index(self.index - 1)
    }

    /// One semitone higher. Fails above the highest representable note.
    pub fn higher(&self) -> Result<Note> {
        Note::from_index(self.index + 1)
    }

    /// The distance in cents from this note to `frequency`. Positive values
    /// mean `frequency` is sharp.
    pub fn offset_cents(&self, frequency: f64) -> f64 {
        1200.0 * (frequency / self.frequency).log2()
    }
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Note {}

impl Hash for Note {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl PartialOrd for Note {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Note {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.octave)
    }
}

/// Parses names like `A4`, `C#3`, `Bb2` or `E0`. Flats resolve to the
/// enharmonically equivalent sharp.
impl FromStr for Note {
    type Err = PitchError;

    fn from_str(name: &str) -> Result<Note> {
        let invalid = || PitchError::InvalidNoteName(name.to_string());
        let mut chars = name.trim().chars();
        let letter = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('C') => Letter::C,
            Some('D') => Letter::D,
            Some('E') => Letter::E,
            Some('F') => Letter::F,
            Some('G') => Letter::G,
            Some('A') => Letter::A,
            Some('B') => Letter::B,
            _ => return Err(invalid()),
        };
        let rest = chars.as_str();
        let (accidental, octave) = if let Some(octave) = rest.strip_prefix(&['#', '♯'][..]) {
            (1, octave)
        } else if let Some(octave) = rest.strip_prefix(&['b', '♭'][..]) {
            (-1, octave)
        } else {
            (0, rest)
        };
        let octave: i32 = octave.parse().map_err(|_| invalid())?;
        Note::from_index(calculator::letter_octave_to_index(letter, octave, accidental)?)
    }
}

impl TryFrom<String> for Note {
    type Error = PitchError;

    fn try_from(name: String) -> Result<Note> {
        name.parse()
    }
}

impl From<Note> for String {
    fn from(note: Note) -> String {
        note.to_string()
    }
}
