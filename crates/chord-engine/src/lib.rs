//! Chord analysis engine: ties the theory core to callers.
//!
//! [`Engine::analyze`] is the synchronous entry point: cache probe,
//! identify + spell + display-map on miss, fault containment at the
//! boundary. [`AnalysisService`] wraps an engine in an async worker for
//! interactive consumers.

pub mod cache;
pub mod envelope;
pub mod service;

pub use cache::{AnalysisCache, CacheKey, CacheStats, DEFAULT_CAPACITY};
pub use envelope::{AnalysisRequest, AnalysisResponse, CandidateOption, ResolvedAnalysis};
pub use service::{AnalysisHandle, AnalysisService, ServiceError, TaggedRequest, TaggedResponse};

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, error};

use chord_theory::{
    chromatic_name, display_role, function_label, identify, presence_flags, quality_label, spell,
    stability_label, DisplayRole, PitchSet,
};

/// The analysis engine: stateless computation plus a shared bounded
/// memoization cache. Cheap to share behind an `Arc` or to own per
/// worker.
pub struct Engine {
    cache: AnalysisCache,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: AnalysisCache::new(capacity),
        }
    }

    /// Analyze the request, consulting the cache first. Never fails: an
    /// internal fault degrades to a response where every active note is
    /// marked active and no chord name is produced, so callers always
    /// have a consistent state to render.
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisResponse {
        let key = CacheKey::from(request);
        if let Some(hit) = self.cache.get(&key) {
            debug!(pitches = ?request.active_pitches, "analysis cache hit");
            return hit;
        }

        let response = match catch_unwind(AssertUnwindSafe(|| compute(request))) {
            Ok(response) => response,
            Err(_) => {
                error!(
                    pitches = ?request.active_pitches,
                    "analysis fault, degrading to fallback"
                );
                fallback(request)
            }
        };

        self.cache.insert(key, response.clone());
        response
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

fn compute(request: &AnalysisRequest) -> AnalysisResponse {
    let set = PitchSet::new(request.active_pitches.clone());
    let candidates = identify(
        &set,
        request.force_bass_as_root,
        request.prefer_simple_spelling,
    );
    if candidates.is_empty() {
        return AnalysisResponse::empty();
    }

    // Out-of-range selection falls back to the best guess, not the
    // worst-ranked alternative.
    let selected_index = if request.selected_option_index < candidates.len() {
        request.selected_option_index
    } else {
        0
    };
    let chosen = &candidates[selected_index];

    // Spelling is relative to the chosen root's rotation; a different
    // selection legitimately renames the same pitches.
    let rotation = set.normalize().rotate_to_class(chosen.root_pitch_class);
    let spelled = spell(&rotation, request.prefer_simple_spelling);
    let name_by_class: BTreeMap<i32, String> = rotation
        .classes()
        .into_iter()
        .zip(spelled.into_iter().map(|n| n.name))
        .collect();

    let mut per_note_display_role = BTreeMap::new();
    let mut per_note_name = BTreeMap::new();
    for (&pitch, &role) in &chosen.per_note_role {
        per_note_display_role.insert(pitch, display_role(role, &chosen.detail));
        let pc = pitch.rem_euclid(set.modulus());
        let name = name_by_class
            .get(&pc)
            .cloned()
            .unwrap_or_else(|| pc.to_string());
        per_note_name.insert(pitch, name);
    }

    let resolved = ResolvedAnalysis {
        root_name: chosen.root_display_name.clone(),
        quality: quality_label(&chosen.detail).to_string(),
        stability: stability_label(&chosen.detail).to_string(),
        function: function_label(&chosen.detail).to_string(),
        extensions: chosen.extension_tokens.clone(),
        per_note_display_role,
        per_note_name,
        flags: presence_flags(chosen),
    };

    AnalysisResponse {
        candidate_options: candidates.iter().map(CandidateOption::from).collect(),
        selected_index,
        resolved,
    }
}

/// Degraded state after an internal fault: every note renders as plainly
/// active, no chord name, so the display never shows a half-updated
/// analysis.
fn fallback(request: &AnalysisRequest) -> AnalysisResponse {
    let mut resolved = ResolvedAnalysis::empty();
    for &pitch in &request.active_pitches {
        resolved
            .per_note_display_role
            .insert(pitch, DisplayRole::Active);
        resolved
            .per_note_name
            .insert(pitch, chromatic_name(pitch.rem_euclid(12), false).to_string());
    }
    AnalysisResponse {
        candidate_options: Vec::new(),
        selected_index: 0,
        resolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_is_the_no_chord_state() {
        let engine = Engine::new();
        let response = engine.analyze(&AnalysisRequest::new(Vec::new()));
        assert_eq!(response, AnalysisResponse::empty());
    }

    #[test]
    fn second_call_hits_the_cache_with_equal_value() {
        let engine = Engine::new();
        let request = AnalysisRequest::new(vec![60, 64, 67]);
        let first = engine.analyze(&request);
        let second = engine.analyze(&request);
        assert_eq!(first, second);
        assert_eq!(engine.cache_stats().entries, 1);
    }

    #[test]
    fn out_of_range_selection_falls_back_to_top_candidate() {
        let engine = Engine::new();
        let mut request = AnalysisRequest::new(vec![60, 64, 67]);
        request.selected_option_index = 99;
        let response = engine.analyze(&request);
        assert_eq!(response.selected_index, 0);
        assert_eq!(response.resolved.root_name, "C");
    }

    #[test]
    fn selecting_an_alternative_respells_notes() {
        let engine = Engine::new();
        // C E G A: best is C6, the minor-seventh alternative roots on A.
        let mut request = AnalysisRequest::new(vec![60, 64, 67, 69]);
        let best = engine.analyze(&request);
        assert_eq!(best.resolved.root_name, "C");

        let alt_index = best
            .candidate_options
            .iter()
            .position(|c| c.root_pitch_class == 9)
            .expect("Am7 reading offered as alternative");
        request.selected_option_index = alt_index;
        let alt = engine.analyze(&request);
        assert_eq!(alt.resolved.root_name, "A");
        assert_eq!(alt.candidate_options, best.candidate_options);
    }

    #[test]
    fn fallback_marks_every_note_active() {
        let request = AnalysisRequest::new(vec![60, 64, 67]);
        let response = fallback(&request);
        assert!(response.candidate_options.is_empty());
        assert_eq!(response.resolved.root_name, "--");
        for pitch in [60, 64, 67] {
            assert_eq!(
                response.resolved.per_note_display_role[&pitch],
                DisplayRole::Active
            );
        }
        assert_eq!(response.resolved.per_note_name[&60], "C");
    }
}
