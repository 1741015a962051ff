//! Ranking — orders per-job (or per-candidate) results and picks the top match.

use serde::{Deserialize, Serialize};

use crate::matching::scoring::MatchResult;

/// Anything that can be scored: a job posting's required skills, or a candidate's skills.
pub trait SkillProfile: Sync {
    type Id: Clone + Send;

    fn id(&self) -> Self::Id;
    fn skills(&self) -> &[String];
}

impl<Id: Clone + Send + Sync> SkillProfile for (Id, Vec<String>) {
    type Id = Id;

    fn id(&self) -> Id {
        self.0.clone()
    }

    fn skills(&self) -> &[String] {
        &self.1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch<Id> {
    pub id: Id,
    #[serde(flatten)]
    pub result: MatchResult,
}

/// Best entry of a ranking. "Nothing evaluated" and "nothing scored above 0"
/// are kept apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TopMatch<Id> {
    NoneEvaluated,
    NoQualifyingMatch,
    Best { id: Id, score: u8 },
}

impl<Id> TopMatch<Id> {
    pub fn score(&self) -> u8 {
        match self {
            TopMatch::Best { score, .. } => *score,
            _ => 0,
        }
    }

    pub fn id(&self) -> Option<&Id> {
        match self {
            TopMatch::Best { id, .. } => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking<Id> {
    pub evaluated: usize,
    pub matches: Vec<RankedMatch<Id>>,
    pub top_match: TopMatch<Id>,
}

/// Builds a ranking from results in evaluation order.
///
/// Results with score 0 are dropped. The sort is stable, so equal scores keep
/// their input order, and the top match only moves on a strictly greater score.
pub fn rank<Id: Clone>(scored: Vec<(Id, MatchResult)>) -> Ranking<Id> {
    let evaluated = scored.len();

    let mut top_match = if evaluated == 0 {
        TopMatch::NoneEvaluated
    } else {
        TopMatch::NoQualifyingMatch
    };
    let mut best_score = 0_u8;

    let mut matches = Vec::with_capacity(evaluated);
    for (id, result) in scored {
        if result.score == 0 {
            continue;
        }
        if result.score > best_score {
            best_score = result.score;
            top_match = TopMatch::Best {
                id: id.clone(),
                score: result.score,
            };
        }
        matches.push(RankedMatch { id, result });
    }

    matches.sort_by(|a, b| b.result.score.cmp(&a.result.score));

    Ranking {
        evaluated,
        matches,
        top_match,
    }
}
