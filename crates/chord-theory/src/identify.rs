//! Chord identification: enumerate candidate roots, classify interval
//! content into third/fifth/seventh/extension slots, score, and rank.
//!
//! The interval slots are claimed in functional order. A 3 next to a
//! claimed 4 is a #9, not a second third; a 9 is the functional sixth
//! only when no true seventh (10/11) is present, otherwise it is a 13;
//! a 10 next to a claimed 11 is a #13. These reclassifications are
//! per-candidate, since each root choice changes which notes map to
//! which interval.

use std::collections::BTreeMap;

use tracing::trace;

use crate::pitchset::{PitchSet, SEMITONES};
use crate::spelling::spell;
use crate::types::{
    Candidate, DetailedQuality, ExtensionDegree, FifthQuality, NoteRole, SeventhQuality,
    ThirdQuality,
};

// Ranking weights. Qualitative preferences (tertian completeness, fewer
// stray tones, bass on the root) expressed as an additive score; exact
// values are tunable policy validated by the scenario tests.
const REAL_THIRD: i32 = 30;
const SUS_THIRD: i32 = 12;
const PERFECT_FIFTH: i32 = 10;
// A diminished fifth is structural (dim7, m7b5); an augmented fifth is
// more often a misread inversion of a plain triad, so it earns less.
const DIM_FIFTH: i32 = 6;
const AUG_FIFTH: i32 = 2;
const SEVENTH_SLOT: i32 = 5;
const BASS_IS_ROOT: i32 = 6;
const PER_EXTENSION: i32 = -4;
const PER_UNCLASSIFIED: i32 = -25;

/// Identify a pitch set as a chord, returning candidate interpretations
/// ranked best-first. Empty input yields no candidates.
///
/// With `force_bass_as_root` the lowest sounding note is the only root
/// tried; otherwise every pitch class present is a candidate root.
/// `prefer_simple_spelling` feeds the spelling of roots and slash
/// basses embedded in the candidate names.
pub fn identify(
    set: &PitchSet,
    force_bass_as_root: bool,
    prefer_simple_spelling: bool,
) -> Vec<Candidate> {
    let bass_pc = match set.bass() {
        Some(bass) => bass.rem_euclid(set.modulus()),
        None => return Vec::new(),
    };
    let normalized = set.normalize();

    let roots = if force_bass_as_root {
        vec![bass_pc]
    } else {
        normalized.classes()
    };

    let mut candidates: Vec<Candidate> = roots
        .into_iter()
        .map(|root| interpret(set, &normalized, root, bass_pc, prefer_simple_spelling))
        .collect();

    // Stable sort; enumeration order (ascending pitch class) breaks ties.
    candidates.sort_by(|a, b| b.score.cmp(&a.score));

    trace!(
        count = candidates.len(),
        best = candidates.first().map(|c| c.display_name.as_str()),
        "ranked chord candidates"
    );
    candidates
}

/// Slot assignment for one candidate root.
#[derive(Debug, Default)]
struct Classification {
    third: Option<ThirdQuality>,
    fifth: Option<FifthQuality>,
    seventh: Option<SeventhQuality>,
    extensions: Vec<ExtensionDegree>,
    /// Role per interval-from-root.
    roles: BTreeMap<i32, NoteRole>,
    unclassified: usize,
}

fn classify(intervals: &[i32], modulus: i32) -> Classification {
    let mut cls = Classification::default();
    cls.roles.insert(0, NoteRole::Root);

    // Single note: root role only, no quality classification attempted.
    if intervals.iter().all(|&i| i == 0) {
        return cls;
    }

    if modulus != SEMITONES {
        // Interval-role rules are defined for 12-EDO; everything else
        // renders as a generic unknown rather than failing.
        for &i in intervals.iter().filter(|&&i| i != 0) {
            cls.roles.insert(i, NoteRole::Unclassified);
            cls.unclassified += 1;
        }
        return cls;
    }

    let has = |i: i32| intervals.contains(&i);

    // Third slot: real third beats sus; a 3 under a claimed 4 falls
    // through to the #9 extension below.
    let (third, third_interval) = if has(4) {
        (Some(ThirdQuality::Major), Some(4))
    } else if has(3) {
        (Some(ThirdQuality::Minor), Some(3))
    } else if has(5) {
        (Some(ThirdQuality::Sus4), Some(5))
    } else if has(2) {
        (Some(ThirdQuality::Sus2), Some(2))
    } else {
        (None, None)
    };

    let (fifth, fifth_interval) = if has(7) {
        (Some(FifthQuality::Perfect), Some(7))
    } else if has(6) {
        (Some(FifthQuality::Diminished), Some(6))
    } else if has(8) {
        (Some(FifthQuality::Augmented), Some(8))
    } else {
        (None, None)
    };

    // Seventh slot. Interval 9 with minor third and diminished fifth is
    // the chord-defining diminished seventh, not a plain sixth.
    let (seventh, seventh_interval) = if has(11) {
        (Some(SeventhQuality::Major), Some(11))
    } else if has(10) {
        (Some(SeventhQuality::Minor), Some(10))
    } else if has(9) {
        let quality = if third == Some(ThirdQuality::Minor) && fifth == Some(FifthQuality::Diminished)
        {
            SeventhQuality::Diminished
        } else {
            SeventhQuality::Sixth
        };
        (Some(quality), Some(9))
    } else {
        (None, None)
    };

    cls.third = third;
    cls.fifth = fifth;
    cls.seventh = seventh;

    if let (Some(q), Some(i)) = (third, third_interval) {
        cls.roles.insert(i, NoteRole::Third(q));
    }
    if let (Some(q), Some(i)) = (fifth, fifth_interval) {
        cls.roles.insert(i, NoteRole::Fifth(q));
    }
    if let (Some(q), Some(i)) = (seventh, seventh_interval) {
        cls.roles.insert(i, NoteRole::Seventh(q));
    }

    // Everything unclaimed is an extension.
    for &interval in intervals {
        if interval == 0 || cls.roles.contains_key(&interval) {
            continue;
        }
        let degree = match interval {
            1 => Some(ExtensionDegree::FlatNine),
            2 => Some(ExtensionDegree::Nine),
            3 => Some(ExtensionDegree::SharpNine),
            5 => Some(ExtensionDegree::Eleven),
            6 => Some(ExtensionDegree::SharpEleven),
            8 => Some(ExtensionDegree::FlatThirteen),
            9 => Some(ExtensionDegree::Thirteen),
            10 => Some(ExtensionDegree::SharpThirteen),
            _ => None,
        };
        match degree {
            Some(degree) => {
                cls.roles.insert(interval, NoteRole::Extension(degree));
                cls.extensions.push(degree);
            }
            None => {
                cls.roles.insert(interval, NoteRole::Unclassified);
                cls.unclassified += 1;
            }
        }
    }
    cls.extensions.sort();

    cls
}

fn interpret(
    source: &PitchSet,
    normalized: &PitchSet,
    root_pc: i32,
    bass_pc: i32,
    prefer_simple: bool,
) -> Candidate {
    let modulus = normalized.modulus();
    let rotation = normalized.rotate_to_class(root_pc);
    let spelled = spell(&rotation, prefer_simple);
    let root_display_name = spelled
        .first()
        .map(|n| n.name.clone())
        .unwrap_or_else(|| "--".to_string());

    let intervals: Vec<i32> = rotation
        .classes()
        .iter()
        .map(|&pc| (pc - root_pc).rem_euclid(modulus))
        .collect();
    let cls = classify(&intervals, modulus);

    let has_true_seventh = cls
        .seventh
        .map(SeventhQuality::is_true_seventh)
        .unwrap_or(false);
    let extension_tokens: Vec<String> = cls
        .extensions
        .iter()
        .map(|d| d.token(!has_true_seventh))
        .collect();

    let detail = DetailedQuality {
        third: cls.third,
        fifth: cls.fifth,
        seventh: cls.seventh,
        extensions: extension_tokens.clone(),
    };

    let inversion_suffix = if bass_pc != root_pc {
        (0..rotation.len())
            .find(|&i| rotation.pitch_class(i) == bass_pc)
            .and_then(|i| spelled.get(i))
            .map(|n| n.name.clone())
    } else {
        None
    };

    let single = normalized.len() == 1;
    let (display_name, base_quality_token) = synthesize_name(
        &root_display_name,
        &detail,
        &extension_tokens,
        inversion_suffix.as_deref(),
        single,
    );

    let mut per_note_role = BTreeMap::new();
    for &pitch in source.pitches() {
        let interval = (pitch.rem_euclid(modulus) - root_pc).rem_euclid(modulus);
        let role = cls
            .roles
            .get(&interval)
            .copied()
            .unwrap_or(NoteRole::Unclassified);
        per_note_role.insert(pitch, role);
    }

    let score = score_candidate(&cls, root_pc, bass_pc);

    Candidate {
        root_pitch_class: root_pc,
        display_name,
        root_display_name,
        base_quality_token,
        extension_tokens,
        inversion_suffix,
        per_note_role,
        detail,
        score,
    }
}

fn score_candidate(cls: &Classification, root_pc: i32, bass_pc: i32) -> i32 {
    let mut score = 0;
    score += match cls.third {
        Some(ThirdQuality::Major) | Some(ThirdQuality::Minor) => REAL_THIRD,
        Some(_) => SUS_THIRD,
        None => 0,
    };
    score += match cls.fifth {
        Some(FifthQuality::Perfect) => PERFECT_FIFTH,
        Some(FifthQuality::Diminished) => DIM_FIFTH,
        Some(FifthQuality::Augmented) => AUG_FIFTH,
        None => 0,
    };
    if cls.seventh.is_some() {
        score += SEVENTH_SLOT;
    }
    if root_pc == bass_pc {
        score += BASS_IS_ROOT;
    }
    score += PER_EXTENSION * cls.extensions.len() as i32;
    score += PER_UNCLASSIFIED * cls.unclassified as i32;
    score
}

/// Combine root name, quality, seventh function, extensions and slash
/// bass into a chord symbol plus the coarse base quality token.
fn synthesize_name(
    root_name: &str,
    detail: &DetailedQuality,
    extension_tokens: &[String],
    inversion: Option<&str>,
    single: bool,
) -> (String, String) {
    use FifthQuality as F;
    use SeventhQuality as S;
    use ThirdQuality as T;

    if single {
        return (root_name.to_string(), "--".to_string());
    }

    let base_quality_token = match (detail.third, detail.fifth) {
        (Some(T::Sus2), _) => "sus2",
        (Some(T::Sus4), _) => "sus4",
        (Some(T::Minor), Some(F::Diminished)) => "dim",
        (Some(T::Major), Some(F::Augmented)) => "aug",
        (Some(T::Minor), _) => "min",
        (Some(T::Major), _) => "maj",
        (None, Some(F::Perfect)) => "5",
        (None, _) => "--",
    }
    .to_string();

    let mut suffix = String::new();

    if detail.third == Some(T::Minor) && detail.fifth == Some(F::Diminished) {
        // Diminished family uses its conventional collapsed symbols.
        suffix.push_str(match detail.seventh {
            Some(S::Diminished) => "dim7",
            Some(S::Minor) => "m7b5",
            Some(S::Major) => "dim(maj7)",
            _ => "dim",
        });
    } else {
        let core = match (detail.third, detail.fifth) {
            (Some(T::Major), Some(F::Augmented)) => "aug",
            (Some(T::Minor), _) => "m",
            _ => "",
        };
        suffix.push_str(core);

        match detail.seventh {
            Some(S::Major) => suffix.push_str(if core.is_empty() { "maj7" } else { "(maj7)" }),
            Some(S::Minor) => suffix.push('7'),
            Some(S::Sixth) => suffix.push('6'),
            Some(S::Diminished) => suffix.push_str("dim7"),
            None => {}
        }

        // Altered fifth not already folded into aug/dim naming.
        match detail.fifth {
            Some(F::Diminished) if detail.third != Some(T::Minor) => suffix.push_str("(b5)"),
            Some(F::Augmented) if detail.third != Some(T::Major) => suffix.push_str("(#5)"),
            _ => {}
        }

        match detail.third {
            Some(T::Sus2) => suffix.push_str("sus2"),
            Some(T::Sus4) => suffix.push_str("sus4"),
            _ => {}
        }

        // Bare fifth with nothing else is the power chord.
        if detail.third.is_none()
            && detail.fifth == Some(F::Perfect)
            && detail.seventh.is_none()
            && extension_tokens.is_empty()
        {
            suffix.push('5');
        }
    }

    let mut name = format!("{root_name}{suffix}");
    if !extension_tokens.is_empty() {
        name.push('(');
        name.push_str(&extension_tokens.join(","));
        name.push(')');
    }
    if let Some(bass) = inversion {
        name.push('/');
        name.push_str(bass);
    }

    (name, base_quality_token)
}
