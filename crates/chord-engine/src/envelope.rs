//! Request and response envelopes exchanged with callers.
//!
//! Maps are keyed by absolute pitch in `BTreeMap`s so serialized output
//! is deterministic and value-equal responses compare equal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use chord_theory::{Candidate, DetailedQuality, DisplayRole, NoteRole, PresenceFlags};

/// One analysis request: the currently-sounding notes plus the caller's
/// interpretation and spelling preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Absolute pitches; order and duplicates do not matter.
    pub active_pitches: Vec<i32>,
    /// Which candidate the caller wants resolved; out-of-range falls
    /// back to the top-ranked candidate.
    #[serde(default)]
    pub selected_option_index: usize,
    /// Treat the lowest sounding note as the root, bypassing inversion
    /// detection.
    #[serde(default)]
    pub force_bass_as_root: bool,
    /// Favor fewer accidentals over strict diatonic spelling.
    #[serde(default = "default_prefer_simple_spelling")]
    pub prefer_simple_spelling: bool,
}

fn default_prefer_simple_spelling() -> bool {
    true
}

impl AnalysisRequest {
    pub fn new(active_pitches: Vec<i32>) -> Self {
        Self {
            active_pitches,
            selected_option_index: 0,
            force_bass_as_root: false,
            prefer_simple_spelling: true,
        }
    }
}

/// One candidate interpretation, shaped for consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateOption {
    pub display_name: String,
    pub root_display_name: String,
    pub root_pitch_class: i32,
    pub base_quality_token: String,
    pub extension_tokens: Vec<String>,
    pub inversion_suffix: Option<String>,
    pub per_note_role: BTreeMap<i32, NoteRole>,
    pub detailed_quality: DetailedQuality,
}

impl From<&Candidate> for CandidateOption {
    fn from(candidate: &Candidate) -> Self {
        Self {
            display_name: candidate.display_name.clone(),
            root_display_name: candidate.root_display_name.clone(),
            root_pitch_class: candidate.root_pitch_class,
            base_quality_token: candidate.base_quality_token.clone(),
            extension_tokens: candidate.extension_tokens.clone(),
            inversion_suffix: candidate.inversion_suffix.clone(),
            per_note_role: candidate.per_note_role.clone(),
            detailed_quality: candidate.detail.clone(),
        }
    }
}

/// The display analysis of the selected candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAnalysis {
    /// Spelled root, "--" when nothing sounds.
    pub root_name: String,
    /// Third classification label.
    pub quality: String,
    /// Fifth classification label.
    pub stability: String,
    /// Seventh/sixth classification label.
    pub function: String,
    pub extensions: Vec<String>,
    pub per_note_display_role: BTreeMap<i32, DisplayRole>,
    pub per_note_name: BTreeMap<i32, String>,
    pub flags: PresenceFlags,
}

impl ResolvedAnalysis {
    /// The canonical "no chord" state.
    pub fn empty() -> Self {
        Self {
            root_name: "--".to_string(),
            quality: "--".to_string(),
            stability: "--".to_string(),
            function: "--".to_string(),
            extensions: Vec::new(),
            per_note_display_role: BTreeMap::new(),
            per_note_name: BTreeMap::new(),
            flags: PresenceFlags::default(),
        }
    }
}

/// Complete analysis result: ranked candidates plus the resolved view
/// of the selected one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub candidate_options: Vec<CandidateOption>,
    /// Index of the candidate `resolved` reflects (after out-of-range
    /// fallback to the top candidate).
    pub selected_index: usize,
    pub resolved: ResolvedAnalysis,
}

impl AnalysisResponse {
    pub fn empty() -> Self {
        Self {
            candidate_options: Vec::new(),
            selected_index: 0,
            resolved: ResolvedAnalysis::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_apply_on_deserialize() {
        let req: AnalysisRequest = serde_json::from_str(r#"{"active_pitches":[60,64,67]}"#).unwrap();
        assert_eq!(req.selected_option_index, 0);
        assert!(!req.force_bass_as_root);
        // Matches the constructor default, so both paths agree.
        assert!(req.prefer_simple_spelling);
        assert_eq!(req, AnalysisRequest::new(vec![60, 64, 67]));
    }

    #[test]
    fn empty_response_is_placeholder_state() {
        let resp = AnalysisResponse::empty();
        assert!(resp.candidate_options.is_empty());
        assert_eq!(resp.resolved.root_name, "--");
        assert!(!resp.resolved.flags.root_active);
    }

    #[test]
    fn response_roundtrips_through_json() {
        let resp = AnalysisResponse::empty();
        let json = serde_json::to_string(&resp).unwrap();
        let back: AnalysisResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back, resp);
    }
}
