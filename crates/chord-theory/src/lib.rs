//! Harmonic analysis core for chordscope.
//!
//! Takes an unordered set of sounding pitches and derives its
//! music-theoretic identity: root, quality, fifth stability,
//! seventh/sixth function, upper extensions, and enharmonically
//! correct note spellings. Ambiguous pitch-class sets produce a
//! ranked list of alternative readings.
//!
//! The pipeline: [`PitchSet`] (normalize/rotate) → [`identify`]
//! (ranked [`Candidate`]s with per-note roles) → [`spell`] (per-note
//! names against the chosen rotation) → [`display`] (flat UI buckets).

pub mod display;
pub mod identify;
pub mod pitchset;
pub mod spelling;
pub mod types;

pub use display::{
    display_role, function_label, presence_flags, quality_label, stability_label, PresenceFlags,
};
pub use identify::identify;
pub use pitchset::PitchSet;
pub use spelling::{chromatic_name, spell, SpelledNote};
pub use types::{
    Candidate, DetailedQuality, DisplayRole, ExtensionDegree, FifthQuality, NoteRole,
    SeventhQuality, ThirdQuality,
};

use thiserror::Error;

/// Errors from pitch-set construction. Analysis itself is infallible:
/// empty input means "no chord", unknown intervals become
/// [`NoteRole::Unclassified`].
#[derive(Debug, Error)]
pub enum TheoryError {
    #[error("modulus must be positive, got {0}")]
    InvalidModulus(i32),

    #[error("span must be positive, got {0}")]
    InvalidSpan(i32),
}
