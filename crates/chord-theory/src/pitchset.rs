//! Pitch-set value type: absolute pitches with a modulus and span.
//!
//! All derived forms (normalized, rotated) are new values; a `PitchSet`
//! is never mutated after construction. An empty set is valid and means
//! "no chord" everywhere downstream.

use serde::{Deserialize, Serialize};

use crate::TheoryError;

/// Semitones per octave in standard tuning.
pub const SEMITONES: i32 = 12;

/// An ordered sequence of absolute pitch values with a modulus M
/// (semitones per octave) and a span S (cyclic wraparound distance,
/// normally equal to M).
///
/// Pitch-class comparisons reduce mod M; absolute values are preserved
/// so register-aware operations (lowest note = bass) still work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchSet {
    pitches: Vec<i32>,
    modulus: i32,
    span: i32,
}

impl PitchSet {
    /// Build a 12-EDO pitch set with span equal to one octave.
    pub fn new(pitches: impl Into<Vec<i32>>) -> Self {
        Self {
            pitches: pitches.into(),
            modulus: SEMITONES,
            span: SEMITONES,
        }
    }

    /// Build with an explicit modulus; span defaults to the modulus.
    pub fn with_modulus(pitches: impl Into<Vec<i32>>, modulus: i32) -> Result<Self, TheoryError> {
        if modulus < 1 {
            return Err(TheoryError::InvalidModulus(modulus));
        }
        Ok(Self {
            pitches: pitches.into(),
            modulus,
            span: modulus,
        })
    }

    /// Override the span used by [`element_at`](Self::element_at) octave offsets.
    pub fn with_span(mut self, span: i32) -> Result<Self, TheoryError> {
        if span < 1 {
            return Err(TheoryError::InvalidSpan(span));
        }
        self.span = span;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    pub fn pitches(&self) -> &[i32] {
        &self.pitches
    }

    pub fn modulus(&self) -> i32 {
        self.modulus
    }

    pub fn span(&self) -> i32 {
        self.span
    }

    /// Pitch class of the element at `idx`.
    pub fn pitch_class(&self, idx: usize) -> i32 {
        self.pitches[idx].rem_euclid(self.modulus)
    }

    /// Pitch classes of all elements, in stored order.
    pub fn classes(&self) -> Vec<i32> {
        self.pitches
            .iter()
            .map(|p| p.rem_euclid(self.modulus))
            .collect()
    }

    /// Lowest absolute pitch, or `None` when empty.
    pub fn bass(&self) -> Option<i32> {
        self.pitches.iter().copied().min()
    }

    /// Canonical pitch-class form: reduced mod M, sorted ascending,
    /// duplicates removed. Identification operates on this form.
    pub fn normalize(&self) -> PitchSet {
        let mut classes = self.classes();
        classes.sort_unstable();
        classes.dedup();
        PitchSet {
            pitches: classes,
            modulus: self.modulus,
            span: self.span,
        }
    }

    /// Cyclic re-rooting: a new set starting at `pivot`, wrapping around,
    /// relative order preserved.
    pub fn rotate(&self, pivot: usize) -> PitchSet {
        if self.pitches.is_empty() {
            return self.clone();
        }
        let pivot = pivot % self.pitches.len();
        let mut rotated = Vec::with_capacity(self.pitches.len());
        rotated.extend_from_slice(&self.pitches[pivot..]);
        rotated.extend_from_slice(&self.pitches[..pivot]);
        PitchSet {
            pitches: rotated,
            modulus: self.modulus,
            span: self.span,
        }
    }

    /// Rotate so index 0 holds the first element whose pitch class is `pc`.
    /// Returns an unrotated clone when `pc` is absent.
    pub fn rotate_to_class(&self, pc: i32) -> PitchSet {
        let target = pc.rem_euclid(self.modulus);
        match (0..self.pitches.len()).find(|&i| self.pitch_class(i) == target) {
            Some(pivot) => self.rotate(pivot),
            None => self.clone(),
        }
    }

    /// Cyclic indexed access with automatic octave offset: index `i`
    /// returns the base element plus `floor(i / len)` spans. Consumers
    /// that walk a chord beyond its own length (arpeggiation) use this;
    /// identification does not.
    pub fn element_at(&self, i: i64) -> Option<i32> {
        if self.pitches.is_empty() {
            return None;
        }
        let len = self.pitches.len() as i64;
        let base = self.pitches[i.rem_euclid(len) as usize];
        let octaves = i.div_euclid(len);
        Some(base + self.span * octaves as i32)
    }
}
