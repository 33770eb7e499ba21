use crate::error::Result;
use crate::note::Note;

/// A successful pitch estimate for one window.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pitch {
    /// The estimated fundamental frequency in Hz.
    pub frequency: f32,
    /// The note closest to `frequency`.
    pub note: Note,
    /// How far `frequency` is from the exact frequency of `note`, in cents.
    pub cents: f64,
    /// The RMS level of the analyzed window in dB relative to 1.
    pub level_db: f32,
}

impl Pitch {
    /// Maps an estimated frequency to its closest note. Fails if that
    /// note is not representable.
    pub fn new(frequency: f32, level_db: f32) -> Result<Pitch> {
        let note = Note::from_frequency(frequency as f64)?;
        Ok(Pitch {
            frequency,
            note,
            cents: note.offset_cents(frequency as f64),
            level_db,
        })
    }
}
