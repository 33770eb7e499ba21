use core::fmt;

/// The letter of a note in English notation, using sharps for the black keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Letter {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Letter {
    /// All twelve letters of an octave, starting at C.
    pub const ALL: [Letter; 12] = [
        Letter::C,
        Letter::CSharp,
        Letter::D,
        Letter::DSharp,
        Letter::E,
        Letter::F,
        Letter::FSharp,
        Letter::G,
        Letter::GSharp,
        Letter::A,
        Letter::ASharp,
        Letter::B,
    ];

    /// The number of semitones from C up to this letter.
    pub fn semitone(&self) -> i32 {
        *self as i32
    }

    /// Returns the letter `semitone` semitones above C, wrapping around the octave.
    pub fn from_semitone(semitone: i32) -> Letter {
        Letter::ALL[semitone.rem_euclid(12) as usize]
    }

    /// True for the letters played on the black keys of a piano.
    pub fn is_black(&self) -> bool {
        matches!(
            self,
            Letter::CSharp | Letter::DSharp | Letter::FSharp | Letter::GSharp | Letter::ASharp
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Letter::C => "C",
            Letter::CSharp => "C#",
            Letter::D => "D",
            Letter::DSharp => "D#",
            Letter::E => "E",
            Letter::F => "F",
            Letter::FSharp => "F#",
            Letter::G => "G",
            Letter::GSharp => "G#",
            Letter::A => "A",
            Letter::ASharp => "A#",
            Letter::B => "B",
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
