use thiserror::Error;

/// Errors produced while estimating pitch, building notes or running the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PitchError {
    /// The estimator found no usable period, e.g for silence or noise.
    #[error("no pitch detected")]
    NoPitchDetected,

    #[error("note index {index} is outside the supported range")]
    NoteOutOfRange { index: i64 },

    #[error("invalid frequency {0} Hz")]
    InvalidFrequency(f64),

    #[error("invalid note name {0:?}")]
    InvalidNoteName(String),

    /// The analyzed window was too quiet to be considered.
    #[error("input level {level_db:.1} dB is below the threshold of {threshold_db:.1} dB")]
    LevelBelowThreshold { level_db: f32, threshold_db: f32 },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("the pitch engine is already running")]
    AlreadyRunning,

    #[error("signal source error: {0}")]
    Source(String),

    #[error("failed to spawn thread: {0}")]
    Spawn(String),
}

/// Result type for pitch estimation and engine operations.
pub type Result<T> = core::result::Result<T, PitchError>;
