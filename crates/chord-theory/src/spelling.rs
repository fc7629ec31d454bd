//! Enharmonic spelling relative to a chosen root.
//!
//! Spelling operates on a specific rotation of a pitch set (index 0 is
//! the reference root), because the correct letter for a pitch class
//! depends on its scale-degree position relative to that root. The same
//! absolute pitch can legitimately spell differently under different
//! roots, so callers re-spell whenever the chosen candidate changes.

use crate::pitchset::{PitchSet, SEMITONES};

const NOTE_NAMES_SHARP: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const NOTE_NAMES_FLAT: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Pitch classes conventionally spelled with flats.
const FLAT_ROOTS: [i32; 6] = [1, 3, 5, 6, 8, 10];

const LETTERS: [char; 7] = ['C', 'D', 'E', 'F', 'G', 'A', 'B'];
const NATURAL_PCS: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Letter steps above the root letter for each interval 0–11.
/// Chromatic degrees lean flat-wise (b3, b5, b6, b7); raised variants
/// emerge from the accidental computation when the root letter demands it.
const DEGREE_STEPS: [usize; 12] = [0, 1, 1, 2, 2, 3, 4, 4, 5, 5, 6, 6];

/// Spellings no player wants to read; simple mode trades them for the
/// plain chromatic name.
const UNCOMMON: [&str; 4] = ["E#", "B#", "Cb", "Fb"];

/// A pitch paired with its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpelledNote {
    pub pitch: i32,
    pub name: String,
}

/// Chromatic fallback name for a pitch class (no root context).
pub fn chromatic_name(pc: i32, use_flats: bool) -> &'static str {
    let idx = pc.rem_euclid(SEMITONES) as usize;
    if use_flats {
        NOTE_NAMES_FLAT[idx]
    } else {
        NOTE_NAMES_SHARP[idx]
    }
}

/// Spell every note of `rotation` relative to its index-0 root.
///
/// With `prefer_simple`, double accidentals and the uncommon
/// E#/B#/Cb/Fb collapse to the plain chromatic name; otherwise the
/// diatonic letter-step spelling stands even when it is awkward.
///
/// Letter names are only defined for a 12-semitone octave; other moduli
/// fall back to numeric pitch-class names.
pub fn spell(rotation: &PitchSet, prefer_simple: bool) -> Vec<SpelledNote> {
    if rotation.is_empty() {
        return Vec::new();
    }
    if rotation.modulus() != SEMITONES {
        return rotation
            .pitches()
            .iter()
            .enumerate()
            .map(|(i, &p)| SpelledNote {
                pitch: p,
                name: rotation.pitch_class(i).to_string(),
            })
            .collect();
    }

    let root_pc = rotation.pitch_class(0);
    let root_flats = FLAT_ROOTS.contains(&root_pc);
    let root_name = chromatic_name(root_pc, root_flats);
    let root_letter = LETTERS
        .iter()
        .position(|&l| root_name.starts_with(l))
        .unwrap_or(0);

    rotation
        .pitches()
        .iter()
        .enumerate()
        .map(|(i, &pitch)| {
            let pc = rotation.pitch_class(i);
            let interval = (pc - root_pc).rem_euclid(SEMITONES);
            let name = if interval == 0 {
                root_name.to_string()
            } else {
                degree_name(root_letter, interval, pc, root_flats, prefer_simple)
            };
            SpelledNote { pitch, name }
        })
        .collect()
}

fn degree_name(
    root_letter: usize,
    interval: i32,
    pc: i32,
    root_flats: bool,
    prefer_simple: bool,
) -> String {
    let letter_idx = (root_letter + DEGREE_STEPS[interval as usize]) % 7;
    let natural = NATURAL_PCS[letter_idx];

    // signed accidental count, wrapped into -2..=2
    let mut diff = (pc - natural).rem_euclid(SEMITONES);
    if diff > 6 {
        diff -= SEMITONES;
    }

    let mut name = String::from(LETTERS[letter_idx]);
    for _ in 0..diff.abs() {
        name.push(if diff > 0 { '#' } else { 'b' });
    }

    if prefer_simple && (diff.abs() > 1 || UNCOMMON.contains(&name.as_str())) {
        return chromatic_name(pc, root_flats).to_string();
    }
    name
}
