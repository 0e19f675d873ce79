//! Candidate generation boundary
//!
//! The engine never calls a text generator itself. This module defines the
//! interface a generator implements, the prompt it is given and how its raw
//! reply is turned into candidate names ready for availability checks.

use crate::error::{DomainRadarError, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Shortest candidate label accepted from a generator
pub const MIN_CANDIDATE_LEN: usize = 3;
/// Longest candidate label accepted from a generator
pub const MAX_CANDIDATE_LEN: usize = 20;

/// What to ask a generator for
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Free text describing the project
    pub description: String,
    /// Number of names wanted
    pub count: usize,
    /// Names already shown, never returned again
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Names the user rejected; the generator should steer away from them
    #[serde(default)]
    pub disliked: Vec<String>,
}

impl GenerationRequest {
    pub fn new(description: impl Into<String>, count: usize) -> Self {
        Self {
            description: description.into(),
            count,
            ..Default::default()
        }
    }

    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_disliked(mut self, disliked: Vec<String>) -> Self {
        self.disliked = disliked;
        self
    }

    /// Prompt text for a generator producing `.{extension}` names
    pub fn build_prompt(&self, extension: &str) -> String {
        let mut prompt = format!(
            "Generate unique and creative domain name suggestions for: \"{}\".
Each domain name should be a .{} domain and should be between {}-{} characters long.
Only use letters, numbers, and hyphens. Do not use any special characters.
Make names catchy, memorable, and relevant to the description.",
            self.description, extension, MIN_CANDIDATE_LEN, MAX_CANDIDATE_LEN
        );

        if !self.disliked.is_empty() {
            prompt.push_str(&format!(
                "\n\nAVOID generating names similar to these disliked domains: {}.
Do not use similar word patterns, prefixes, or suffixes from these domains.",
                self.disliked.join(", ")
            ));
        }

        if !self.exclude.is_empty() {
            prompt.push_str(&format!(
                "\n\nDo not repeat any of these names: {}.",
                self.exclude.join(", ")
            ));
        }

        prompt.push_str(&format!(
            "\n\nFormat the response as a JSON array of strings, like this: [\"name1.{ext}\", \"name2.{ext}\"]
Generate {} domain suggestions.",
            self.count,
            ext = extension
        ));
        prompt
    }
}

/// Anything that turns a request into raw candidate strings
#[async_trait]
pub trait CandidateGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>>;

    fn name(&self) -> &str;
}

/// Extract candidate labels from a generator reply.
///
/// Accepts a JSON array of strings anywhere in the text, falling back to one
/// name per line with list numbering or bullets removed. Labels are lowercased,
/// lose a trailing `.{extension}` and are kept only if they match
/// `^[a-z0-9-]+$` within the length bounds. Duplicates are dropped, first
/// occurrence wins.
pub fn parse_candidates(text: &str, extension: &str) -> Result<Vec<String>> {
    let valid = Regex::new(r"^[a-z0-9-]+$").map_err(|e| DomainRadarError::internal(e.to_string()))?;
    let numbering = Regex::new(r"^\s*(?:\d+[.)]|[-*•])\s*")
        .map_err(|e| DomainRadarError::internal(e.to_string()))?;

    let raw: Vec<String> = match json_array(text) {
        Some(items) => items,
        None => text
            .lines()
            .map(|line| numbering.replace(line, "").into_owned())
            .collect(),
    };

    let suffix = format!(".{}", extension.trim_start_matches('.').to_lowercase());
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for item in raw {
        let lowered = item
            .trim()
            .trim_matches(|c| c == '"' || c == '\'' || c == ',' || c == '`')
            .to_lowercase();
        let label = lowered.strip_suffix(&suffix).unwrap_or(&lowered);

        if !(MIN_CANDIDATE_LEN..=MAX_CANDIDATE_LEN).contains(&label.len()) || !valid.is_match(label) {
            continue;
        }
        if seen.insert(label.to_string()) {
            candidates.push(label.to_string());
        }
    }

    tracing::debug!(parsed = candidates.len(), "Parsed generator reply");
    Ok(candidates)
}

fn json_array(text: &str) -> Option<Vec<String>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

/// Drop candidates whose label appears in `exclude`, compared case-insensitively
/// and ignoring any extension on the excluded entries
pub fn filter_excluded(candidates: Vec<String>, exclude: &[String]) -> Vec<String> {
    let excluded: HashSet<String> = exclude
        .iter()
        .map(|name| {
            let lowered = name.trim().to_lowercase();
            match lowered.split_once('.') {
                Some((label, _)) => label.to_string(),
                None => lowered,
            }
        })
        .collect();

    candidates
        .into_iter()
        .filter(|candidate| !excluded.contains(candidate))
        .collect()
}
