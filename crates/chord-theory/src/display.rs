//! Role-to-display mapping: flattens the theoretical role taxonomy into
//! the categories presentation layers color, plus the label strings for
//! quality/stability/function readouts.
//!
//! The contextual policy mirrors the identifier (a sus tone is a
//! "third" only when no conventional third exists, a sixth is a
//! "seventh" only when no true seventh exists) but stays a separate,
//! explicit mapping so presentation policy is decoupled from theory.

use serde::{Deserialize, Serialize};

use crate::types::{
    Candidate, DetailedQuality, DisplayRole, ExtensionDegree, NoteRole, SeventhQuality,
    ThirdQuality,
};

/// Which chord functions are present in the current interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PresenceFlags {
    pub root_active: bool,
    pub third_active: bool,
    pub fifth_active: bool,
    pub seventh_active: bool,
}

/// Flatten one note's theoretical role given the chord's detailed
/// quality breakdown.
pub fn display_role(role: NoteRole, detail: &DetailedQuality) -> DisplayRole {
    match role {
        NoteRole::Root => DisplayRole::Root,
        NoteRole::Third(ThirdQuality::Sus2) => {
            if detail.third == Some(ThirdQuality::Sus2) {
                DisplayRole::Third
            } else {
                DisplayRole::Extension(ExtensionDegree::Nine)
            }
        }
        NoteRole::Third(ThirdQuality::Sus4) => {
            if detail.third == Some(ThirdQuality::Sus4) {
                DisplayRole::Third
            } else {
                DisplayRole::Extension(ExtensionDegree::Eleven)
            }
        }
        NoteRole::Third(_) => DisplayRole::Third,
        NoteRole::Fifth(_) => DisplayRole::Fifth,
        NoteRole::Seventh(SeventhQuality::Sixth) => {
            if detail.seventh == Some(SeventhQuality::Sixth) {
                DisplayRole::Seventh
            } else {
                DisplayRole::Extension(ExtensionDegree::Thirteen)
            }
        }
        NoteRole::Seventh(_) => DisplayRole::Seventh,
        NoteRole::Extension(degree) => DisplayRole::Extension(degree),
        NoteRole::Unclassified => DisplayRole::Unknown,
    }
}

/// Function presence flags for a candidate interpretation.
pub fn presence_flags(candidate: &Candidate) -> PresenceFlags {
    let mut flags = PresenceFlags::default();
    for role in candidate.per_note_role.values() {
        match role {
            NoteRole::Root => flags.root_active = true,
            NoteRole::Third(_) => flags.third_active = true,
            NoteRole::Fifth(_) => flags.fifth_active = true,
            NoteRole::Seventh(_) => flags.seventh_active = true,
            _ => {}
        }
    }
    flags
}

/// Quality readout: the third classification, "--" when omitted.
pub fn quality_label(detail: &DetailedQuality) -> &'static str {
    detail.third.map(ThirdQuality::label).unwrap_or("--")
}

/// Stability readout: the fifth classification, "--" when omitted.
pub fn stability_label(detail: &DetailedQuality) -> &'static str {
    detail
        .fifth
        .map(crate::types::FifthQuality::label)
        .unwrap_or("--")
}

/// Function readout: the seventh/sixth classification, "--" when omitted.
pub fn function_label(detail: &DetailedQuality) -> &'static str {
    detail.seventh.map(SeventhQuality::label).unwrap_or("--")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identify::identify;
    use crate::pitchset::PitchSet;
    use crate::types::FifthQuality;

    fn top(pitches: Vec<i32>) -> Candidate {
        identify(&PitchSet::new(pitches), false, true).remove(0)
    }

    #[test]
    fn sus_maps_to_third_only_when_slotted() {
        let detail = DetailedQuality {
            third: Some(ThirdQuality::Sus4),
            ..Default::default()
        };
        assert_eq!(
            display_role(NoteRole::Third(ThirdQuality::Sus4), &detail),
            DisplayRole::Third
        );

        // Same role under a chord with a real third flattens to 11.
        let detail = DetailedQuality {
            third: Some(ThirdQuality::Major),
            ..Default::default()
        };
        assert_eq!(
            display_role(NoteRole::Third(ThirdQuality::Sus4), &detail),
            DisplayRole::Extension(ExtensionDegree::Eleven)
        );
    }

    #[test]
    fn sixth_maps_to_seventh_without_true_seventh() {
        let detail = DetailedQuality {
            seventh: Some(SeventhQuality::Sixth),
            ..Default::default()
        };
        assert_eq!(
            display_role(NoteRole::Seventh(SeventhQuality::Sixth), &detail),
            DisplayRole::Seventh
        );

        let detail = DetailedQuality {
            seventh: Some(SeventhQuality::Minor),
            ..Default::default()
        };
        assert_eq!(
            display_role(NoteRole::Seventh(SeventhQuality::Sixth), &detail),
            DisplayRole::Extension(ExtensionDegree::Thirteen)
        );
    }

    #[test]
    fn unclassified_maps_to_unknown() {
        let detail = DetailedQuality::default();
        assert_eq!(
            display_role(NoteRole::Unclassified, &detail),
            DisplayRole::Unknown
        );
    }

    #[test]
    fn flags_for_full_seventh_chord() {
        let flags = presence_flags(&top(vec![60, 64, 67, 71]));
        assert!(flags.root_active);
        assert!(flags.third_active);
        assert!(flags.fifth_active);
        assert!(flags.seventh_active);
    }

    #[test]
    fn flags_for_bare_fifth() {
        let flags = presence_flags(&top(vec![60, 67]));
        assert!(flags.root_active);
        assert!(!flags.third_active);
        assert!(flags.fifth_active);
        assert!(!flags.seventh_active);
    }

    #[test]
    fn labels_fall_back_to_placeholder() {
        let detail = DetailedQuality::default();
        assert_eq!(quality_label(&detail), "--");
        assert_eq!(stability_label(&detail), "--");
        assert_eq!(function_label(&detail), "--");

        let detail = DetailedQuality {
            third: Some(ThirdQuality::Minor),
            fifth: Some(FifthQuality::Diminished),
            seventh: Some(SeventhQuality::Diminished),
            extensions: Vec::new(),
        };
        assert_eq!(quality_label(&detail), "Minor");
        assert_eq!(stability_label(&detail), "Diminished");
        assert_eq!(function_label(&detail), "Diminished 7th");
    }
}
