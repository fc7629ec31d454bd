use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Quality of the third slot. `Sus2`/`Sus4` mean the 2 or 4 stands in
/// for a conventional third, not that one merely co-sounds with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThirdQuality {
    Sus2,
    Minor,
    Major,
    Sus4,
}

impl ThirdQuality {
    pub fn label(self) -> &'static str {
        match self {
            ThirdQuality::Sus2 => "Sus 2",
            ThirdQuality::Minor => "Minor",
            ThirdQuality::Major => "Major",
            ThirdQuality::Sus4 => "Sus 4",
        }
    }
}

/// Quality of the fifth slot. Absence of any fifth is represented by
/// `None` in [`DetailedQuality`], not by a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FifthQuality {
    Diminished,
    Perfect,
    Augmented,
}

impl FifthQuality {
    pub fn label(self) -> &'static str {
        match self {
            FifthQuality::Diminished => "Diminished",
            FifthQuality::Perfect => "Perfect",
            FifthQuality::Augmented => "Augmented",
        }
    }
}

/// What fills the seventh display slot. A `Sixth` is the functional
/// seventh-substitute of a 6 chord; `Diminished` is the
/// enharmonically-equal interval 9 acting as the chord-defining seventh
/// of a fully diminished chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeventhQuality {
    Sixth,
    Minor,
    Major,
    Diminished,
}

impl SeventhQuality {
    pub fn label(self) -> &'static str {
        match self {
            SeventhQuality::Sixth => "6th",
            SeventhQuality::Minor => "Minor 7th",
            SeventhQuality::Major => "Major 7th",
            SeventhQuality::Diminished => "Diminished 7th",
        }
    }

    /// Whether this slot holds a real seventh, as opposed to a sixth
    /// standing in for one. Governs "add" extension tokens.
    pub fn is_true_seventh(self) -> bool {
        !matches!(self, SeventhQuality::Sixth)
    }
}

/// Upper extension degrees (9th/11th/13th family), ordered by degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionDegree {
    FlatNine,
    Nine,
    SharpNine,
    Eleven,
    SharpEleven,
    FlatThirteen,
    Thirteen,
    SharpThirteen,
}

impl ExtensionDegree {
    /// Chord-symbol token. `add` marks extensions on chords whose
    /// seventh slot holds no true seventh (e.g. "add9" on a plain triad).
    pub fn token(&self, add: bool) -> String {
        let base = self.code();
        match self {
            // b9 and #13 only occur alongside a true seventh
            ExtensionDegree::FlatNine | ExtensionDegree::SharpThirteen => base.to_string(),
            _ if add => format!("add{base}"),
            _ => base.to_string(),
        }
    }

    /// Bare degree code as shown in display roles.
    pub fn code(&self) -> &'static str {
        match self {
            ExtensionDegree::FlatNine => "b9",
            ExtensionDegree::Nine => "9",
            ExtensionDegree::SharpNine => "#9",
            ExtensionDegree::Eleven => "11",
            ExtensionDegree::SharpEleven => "#11",
            ExtensionDegree::FlatThirteen => "b13",
            ExtensionDegree::Thirteen => "13",
            ExtensionDegree::SharpThirteen => "#13",
        }
    }
}

/// Theoretical role of one note within a candidate interpretation.
///
/// Every note in the source set gets exactly one role; assignment is a
/// deterministic function of (root choice, interval-to-root,
/// co-occurring tones).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteRole {
    Root,
    Third(ThirdQuality),
    Fifth(FifthQuality),
    Seventh(SeventhQuality),
    Extension(ExtensionDegree),
    /// Matched no interval-role rule (possible under non-12 moduli).
    Unclassified,
}

/// Flattened per-note category consumed by presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayRole {
    Root,
    Third,
    Fifth,
    Seventh,
    Extension(ExtensionDegree),
    /// Theoretically unclassifiable note, still rendered.
    Unknown,
    /// Degraded-fallback marker: the note sounds but analysis failed.
    Active,
}

impl DisplayRole {
    pub fn code(&self) -> &'static str {
        match self {
            DisplayRole::Root => "root",
            DisplayRole::Third => "third",
            DisplayRole::Fifth => "fifth",
            DisplayRole::Seventh => "seventh",
            DisplayRole::Extension(degree) => degree.code(),
            DisplayRole::Unknown => "unknown",
            DisplayRole::Active => "active",
        }
    }
}

/// Structured third/fifth/seventh/extension breakdown of a candidate.
/// `None` means the slot is omitted, which is a valid chord state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetailedQuality {
    pub third: Option<ThirdQuality>,
    pub fifth: Option<FifthQuality>,
    pub seventh: Option<SeventhQuality>,
    /// Rendered extension tokens in degree order.
    pub extensions: Vec<String>,
}

/// One hypothesis about how a pitch set should be read as a chord.
///
/// Produced in ranked batches by [`identify`](crate::identify); the
/// best guess comes first and alternatives follow so a caller can
/// override the choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Chosen root pitch class.
    pub root_pitch_class: i32,
    /// Full chord symbol: "Cm7", "Fmaj7(#11)", "G/B".
    pub display_name: String,
    /// Spelled root name: "C", "Gb", "Bb".
    pub root_display_name: String,
    /// Base quality token: "maj", "min", "dim", "aug", "sus2", "sus4",
    /// "5" (fifth only), or "--" for a degenerate single note.
    pub base_quality_token: String,
    /// Extension tokens in degree order: ["b9", "add11"], ...
    pub extension_tokens: Vec<String>,
    /// Spelled bass name when the lowest note is not the root.
    pub inversion_suffix: Option<String>,
    /// Role of every input note, keyed by absolute pitch.
    pub per_note_role: BTreeMap<i32, NoteRole>,
    pub detail: DetailedQuality,
    /// Ranking score under the identifier's preference heuristic.
    pub score: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_tokens_respect_add_prefix() {
        assert_eq!(ExtensionDegree::Nine.token(false), "9");
        assert_eq!(ExtensionDegree::Nine.token(true), "add9");
        assert_eq!(ExtensionDegree::SharpEleven.token(true), "add#11");
        // b9 and #13 never take the add prefix
        assert_eq!(ExtensionDegree::FlatNine.token(true), "b9");
        assert_eq!(ExtensionDegree::SharpThirteen.token(true), "#13");
    }

    #[test]
    fn display_role_codes() {
        assert_eq!(DisplayRole::Root.code(), "root");
        assert_eq!(DisplayRole::Extension(ExtensionDegree::Thirteen).code(), "13");
        assert_eq!(DisplayRole::Active.code(), "active");
    }

    #[test]
    fn quality_methods_map_over_options() {
        // Label readouts are built with Option::map over these paths.
        assert_eq!(Some(ThirdQuality::Major).map(ThirdQuality::label), Some("Major"));
        assert_eq!(Some(FifthQuality::Perfect).map(FifthQuality::label), Some("Perfect"));
        assert_eq!(
            Some(SeventhQuality::Sixth).map(SeventhQuality::is_true_seventh),
            Some(false)
        );
        assert_eq!(None::<SeventhQuality>.map(SeventhQuality::label), None);
    }

    #[test]
    fn sixth_is_not_a_true_seventh() {
        assert!(!SeventhQuality::Sixth.is_true_seventh());
        assert!(SeventhQuality::Diminished.is_true_seventh());
        assert!(SeventhQuality::Minor.is_true_seventh());
    }

    #[test]
    fn roles_serialize_as_snake_case() {
        let json = serde_json::to_string(&NoteRole::Third(ThirdQuality::Major)).unwrap();
        assert_eq!(json, r#"{"third":"major"}"#);
        let json = serde_json::to_string(&NoteRole::Root).unwrap();
        assert_eq!(json, r#""root""#);
    }
}
