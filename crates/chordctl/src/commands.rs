//! Subcommand implementations for chordctl.

use anyhow::{bail, Result};
use owo_colors::OwoColorize;

use chord_engine::{AnalysisRequest, Engine};
use chord_theory::{chromatic_name, PitchSet};
use scopeconf::ScopeConfig;

/// Identify a chord and print the resolved view plus alternatives.
pub fn analyze(
    config: &ScopeConfig,
    pitches: Vec<i32>,
    option: usize,
    bass_root: bool,
    strict: bool,
    json: bool,
) -> Result<()> {
    let request = build_request(config, pitches, option, bass_root, strict);
    let engine = Engine::with_capacity(config.cache.capacity);
    let response = engine.analyze(&request);
    tracing::debug!(
        candidates = response.candidate_options.len(),
        selected = response.selected_index,
        "analysis complete"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let Some(selected) = response.candidate_options.get(response.selected_index) else {
        println!("{}", "no chord".dimmed());
        return Ok(());
    };

    println!("{}", selected.display_name.bright_green().bold());
    println!("  quality:   {}", response.resolved.quality);
    println!("  stability: {}", response.resolved.stability);
    println!("  function:  {}", response.resolved.function);
    if !response.resolved.extensions.is_empty() {
        println!("  extensions: {}", response.resolved.extensions.join(", "));
    }

    println!();
    println!("{}", "notes".bright_cyan());
    for (pitch, name) in &response.resolved.per_note_name {
        let role = response
            .resolved
            .per_note_display_role
            .get(pitch)
            .map(|r| r.code())
            .unwrap_or("?");
        println!("  {:>4}  {:<4} {}", pitch, name, role.dimmed());
    }

    if response.candidate_options.len() > 1 {
        println!();
        println!("{}", "alternatives".bright_cyan());
        for (i, candidate) in response.candidate_options.iter().enumerate() {
            let marker = if i == response.selected_index { "*" } else { " " };
            println!("  {} [{}] {}", marker, i, candidate.display_name);
        }
    }

    Ok(())
}

/// Walk the identified chord as an arpeggio from the bass.
pub fn arp(config: &ScopeConfig, pitches: Vec<i32>, steps: i64, down: bool) -> Result<()> {
    if steps <= 0 {
        bail!("steps must be positive");
    }

    let request = build_request(config, pitches, 0, false, false);
    let engine = Engine::with_capacity(config.cache.capacity);
    let response = engine.analyze(&request);

    let Some(selected) = response.candidate_options.get(response.selected_index) else {
        println!("{}", "no chord".dimmed());
        return Ok(());
    };

    let set = PitchSet::new(request.active_pitches.clone()).normalize();
    let rotation = set.rotate_to_class(selected.root_pitch_class);

    println!(
        "{} ({} steps)",
        selected.display_name.bright_green().bold(),
        steps
    );
    for i in 0..steps {
        let index = if down { -i } else { i };
        if let Some(pitch) = rotation.element_at(index) {
            let name = chromatic_name(pitch.rem_euclid(12), false);
            println!("  {:>3}  {}", pitch, name);
        }
    }

    Ok(())
}

fn build_request(
    config: &ScopeConfig,
    pitches: Vec<i32>,
    option: usize,
    bass_root: bool,
    strict: bool,
) -> AnalysisRequest {
    let mut request = AnalysisRequest::new(pitches);
    request.selected_option_index = option;
    request.force_bass_as_root = bass_root || config.display.force_bass_as_root;
    request.prefer_simple_spelling = if strict {
        false
    } else {
        config.display.prefer_simple_spelling
    };
    request
}
