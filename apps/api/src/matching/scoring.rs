//! Score Aggregator — folds per-skill match confidences and a breadth bonus into a 0–100 score.
//!
//! ```text
//! base  = Σ confidence(required skill) / |required| × 100
//! bonus = min(2 × |distinct resume skills not required|, 15)
//! score = min(round(base + bonus), 100)      // round half away from zero
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::matching::matcher::find_match;

pub const BONUS_PER_EXTRA_SKILL: usize = 2;
pub const MAX_BONUS: usize = 15;
pub const MAX_SCORE: u8 = 100;

/// Result of scoring one candidate against one job. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub score: u8, // 0 – 100
}

impl MatchResult {
    /// The result for a job with no stated requirements.
    pub fn empty() -> Self {
        Self {
            matched_skills: vec![],
            missing_skills: vec![],
            score: 0,
        }
    }
}

/// Scores already-normalized skill lists.
///
/// Blank entries are ignored on both sides and repeated job skills are counted
/// once, so `matched_skills` and `missing_skills` partition the distinct
/// required set.
pub fn aggregate(resume: &[String], job: &[String]) -> MatchResult {
    let required = distinct_skills(job);
    if required.is_empty() {
        return MatchResult::empty();
    }

    let resume: Vec<&str> = resume
        .iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();

    let mut matched_skills = Vec::new();
    let mut missing_skills = Vec::new();
    let mut total_confidence = 0.0_f64;

    for skill in &required {
        let m = find_match(skill, &resume);
        if m.found {
            total_confidence += m.confidence;
            matched_skills.push(skill.to_string());
        } else {
            missing_skills.push(skill.to_string());
        }
    }

    // Multiply first: exact .5 results must stay exact for rounding.
    let base_score = total_confidence * 100.0 / required.len() as f64;
    let bonus = bonus_score(&resume, &required);
    let score = (base_score + bonus as f64)
        .round()
        .clamp(0.0, f64::from(MAX_SCORE)) as u8;

    MatchResult {
        matched_skills,
        missing_skills,
        score,
    }
}

/// Points for distinct resume skills that are not (exactly) among the required ones.
pub fn bonus_score(resume: &[&str], required: &[&str]) -> usize {
    let required: HashSet<&str> = required.iter().copied().collect();
    let extras: HashSet<&str> = resume
        .iter()
        .copied()
        .filter(|s| !s.is_empty() && !required.contains(s))
        .collect();
    (extras.len() * BONUS_PER_EXTRA_SKILL).min(MAX_BONUS)
}

/// First occurrence of each non-blank skill, in input order.
fn distinct_skills(skills: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    skills
        .iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty() && seen.insert(*s))
        .collect()
}
