// Matching engine: normalize → match → aggregate → rank.
// Pure and synchronous. The synonym table is the only shared state and is read-only.

pub mod matcher;
pub mod normalizer;
pub mod ranking;
pub mod scoring;
pub mod synonyms;

use std::sync::Arc;

use rayon::prelude::*;

use crate::matching::ranking::{rank, Ranking, SkillProfile};
use crate::matching::scoring::{aggregate, MatchResult};
use crate::matching::synonyms::SynonymTable;

/// Entry point for all scoring. Cheap to clone; holds the synonym table by `Arc`.
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    synonyms: Arc<SynonymTable>,
}

impl MatchingEngine {
    pub fn new(synonyms: Arc<SynonymTable>) -> Self {
        Self { synonyms }
    }

    pub fn normalize<S: AsRef<str>>(&self, raw_skills: &[S]) -> Vec<String> {
        normalizer::normalize(raw_skills, &self.synonyms)
    }

    /// Scores a resume against a job. An absent list on either side, or a job
    /// with no skills, yields a zero result.
    pub fn score<S, T>(&self, resume_skills: Option<&[S]>, job_skills: Option<&[T]>) -> MatchResult
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        match (resume_skills, job_skills) {
            (Some(resume), Some(job)) if !job.is_empty() => {
                self.score_normalized(&self.normalize(resume), job)
            }
            _ => MatchResult::empty(),
        }
    }

    /// Scores against a resume list that has already gone through [`Self::normalize`].
    pub fn score_normalized<T: AsRef<str>>(
        &self,
        normalized_resume: &[String],
        job_skills: &[T],
    ) -> MatchResult {
        aggregate(normalized_resume, &self.normalize(job_skills))
    }

    /// Ranks jobs for one candidate. The resume is normalized once; jobs are
    /// scored in parallel and ranked in input order.
    pub fn rank_jobs<S, J>(&self, resume_skills: &[S], jobs: &[J]) -> Ranking<J::Id>
    where
        S: AsRef<str>,
        J: SkillProfile,
    {
        let resume = self.normalize(resume_skills);
        let scored: Vec<(J::Id, MatchResult)> = jobs
            .par_iter()
            .map(|job| (job.id(), self.score_normalized(&resume, job.skills())))
            .collect();
        rank(scored)
    }

    /// Ranks candidates for one job. The job's skills are normalized once.
    pub fn rank_candidates<T, C>(&self, job_skills: &[T], candidates: &[C]) -> Ranking<C::Id>
    where
        T: AsRef<str>,
        C: SkillProfile,
    {
        let job = self.normalize(job_skills);
        let scored: Vec<(C::Id, MatchResult)> = candidates
            .par_iter()
            .map(|candidate| {
                let resume = self.normalize(candidate.skills());
                (candidate.id(), aggregate(&resume, &job))
            })
            .collect();
        rank(scored)
    }
}
