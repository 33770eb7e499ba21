//! Equal temperament conversions between frequencies, note indices and
//! letter/octave pairs. Index 0 is A4, tuned to 440 Hz.

use super::Letter;
use crate::error::{PitchError, Result};

/// The frequency in Hz of the note at index 0 (A4).
pub const STANDARD_FREQUENCY: f64 = 440.0;
/// The octave of the note at index 0.
pub const STANDARD_OCTAVE: i32 = 4;
/// The index of the lowest representable note, E0 at about 20.6 Hz.
pub const LOWEST_INDEX: i32 = -53;
/// The index of the highest representable note, C8 at about 4186 Hz.
pub const HIGHEST_INDEX: i32 = 39;

// Semitones from C up to the standard letter A.
const STANDARD_SEMITONE: i32 = 9;
const SEMITONES_PER_OCTAVE: i32 = 12;

pub(crate) fn validate_index(index: i64) -> Result<i32> {
    if index < LOWEST_INDEX as i64 || index > HIGHEST_INDEX as i64 {
        return Err(PitchError::NoteOutOfRange { index });
    }
    Ok(index as i32)
}

/// Returns the index of the note closest to `frequency`.
pub fn frequency_to_index(frequency: f64) -> Result<i32> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(PitchError::InvalidFrequency(frequency));
    }
    let index = (SEMITONES_PER_OCTAVE as f64 * (frequency / STANDARD_FREQUENCY).log2()).round();
    // Saturates for extreme frequencies, which are out of range anyway.
    validate_index(index as i64)
}

/// Returns the exact equal temperament frequency of the note at `index`.
pub fn index_to_frequency(index: i32) -> f64 {
    STANDARD_FREQUENCY * 2.0_f64.powf(index as f64 / SEMITONES_PER_OCTAVE as f64)
}

/// Returns the letter and octave of the note at `index`. The octave number
/// increases at C.
pub fn index_to_letter_octave(index: i32) -> (Letter, i32) {
    let semitones_from_c = index + STANDARD_SEMITONE;
    let letter = Letter::from_semitone(semitones_from_c);
    let octave = STANDARD_OCTAVE + semitones_from_c.div_euclid(SEMITONES_PER_OCTAVE);
    (letter, octave)
}

/// Returns the index of a letter in a given octave, shifted by `accidental` semitones.
pub(crate) fn letter_octave_to_index(letter: Letter, octave: i32, accidental: i32) -> Result<i32> {
    let index = (octave as i64 - STANDARD_OCTAVE as i64) * SEMITONES_PER_OCTAVE as i64
        + (letter.semitone() + accidental - STANDARD_SEMITONE) as i64;
    validate_index(index)
}
