//! Skill Matcher — exact comparison first, then first-above-threshold fuzzy comparison.

use serde::{Deserialize, Serialize};

/// Similarity a fuzzy candidate must strictly exceed to count as the same skill.
pub const FUZZY_THRESHOLD: f64 = 0.8;

/// Outcome of matching one target skill against a candidate list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub found: bool,
    pub matched_value: Option<String>,
    pub confidence: f64, // 0.0 – 1.0
}

impl SkillMatch {
    fn exact(value: &str) -> Self {
        Self {
            found: true,
            matched_value: Some(value.to_string()),
            confidence: 1.0,
        }
    }

    fn not_found() -> Self {
        Self {
            found: false,
            matched_value: None,
            confidence: 0.0,
        }
    }
}

/// Jaro-Winkler similarity in [0, 1]. Defined as 0 when either side is empty.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::jaro_winkler(a, b)
}

/// Finds `target` among `candidates`.
///
/// An exact hit always wins with confidence 1.0. Otherwise the first candidate,
/// in input order, whose similarity is strictly above [`FUZZY_THRESHOLD`] is
/// reported, even if a later candidate would score higher.
pub fn find_match<S: AsRef<str>>(target: &str, candidates: &[S]) -> SkillMatch {
    if candidates.iter().any(|c| c.as_ref() == target) {
        return SkillMatch::exact(target);
    }

    for candidate in candidates {
        let candidate = candidate.as_ref();
        let score = similarity(target, candidate);
        if score > FUZZY_THRESHOLD {
            return SkillMatch {
                found: true,
                matched_value: Some(candidate.to_string()),
                confidence: score,
            };
        }
    }

    SkillMatch::not_found()
}
