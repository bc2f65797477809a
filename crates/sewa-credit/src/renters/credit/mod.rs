//! Renter credit scoring.
//!
//! The engine is a pure function of a renter's rental history: it starts from
//! the policy's base score, applies the completion, lateness, fine, recency,
//! and experience rules in that order, clamps to `0..=100`, and maps the
//! result onto a [`CreditLevel`].

mod config;
mod level;
mod rules;

pub use config::{
    CompletionWeights, CreditPolicy, ExperienceWeights, FineTier, FineWeights, LatenessWeights,
    PolicyError, RecencyWeights,
};
pub use level::CreditLevel;

use super::domain::RentalRecord;
use serde::Serialize;

/// Stateless scorer bound to one policy.
#[derive(Debug, Clone, Default)]
pub struct CreditScoreEngine {
    policy: CreditPolicy,
}

impl CreditScoreEngine {
    pub fn new(policy: CreditPolicy) -> Self {
        Self { policy }
    }

    /// Like [`CreditScoreEngine::new`] but refuses a policy that fails validation.
    pub fn try_new(policy: CreditPolicy) -> Result<Self, PolicyError> {
        policy.validate().map_err(PolicyError::Invalid)?;
        Ok(Self::new(policy))
    }

    pub fn policy(&self) -> &CreditPolicy {
        &self.policy
    }

    /// Scores a history. Records without a full set of return timestamps are
    /// taken to be ordered most recent first.
    pub fn score(&self, history: &[RentalRecord]) -> CreditScore {
        if history.is_empty() {
            return CreditScore::without_history();
        }

        let records = prepare_history(history);
        let sheet = rules::score_history(&records, &self.policy);
        CreditScore::finalize(sheet.score, sheet.factors, sheet.adjustments)
    }
}

/// Scores `history` with the default policy.
pub fn compute_credit_score(history: &[RentalRecord]) -> CreditScore {
    CreditScoreEngine::default().score(history)
}

/// Sanitizes every record and, when all of them carry `tgl_kembali`, orders
/// them newest first. Ties keep their incoming order.
fn prepare_history(history: &[RentalRecord]) -> Vec<RentalRecord> {
    let mut records: Vec<RentalRecord> = history.iter().map(RentalRecord::sanitized).collect();

    if records.iter().all(|record| record.returned_at.is_some()) {
        records.sort_by(|a, b| b.returned_at.cmp(&a.returned_at));
    }

    records
}

/// Positive and negative explanations, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreditFactors {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

/// Scoring rule that moved the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreRule {
    Completion,
    LateReturns,
    LateSeverity,
    Fines,
    FineSeverity,
    RecentIncomplete,
    RecentLate,
    RecentFine,
    Experience,
}

/// Signed score change applied by one rule, before clamping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreAdjustment {
    pub rule: ScoreRule,
    pub points: f64,
}

/// Credit assessment handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditScore {
    pub score: u8,
    pub level: CreditLevel,
    pub color: &'static str,
    pub description: &'static str,
    pub factors: CreditFactors,
    pub adjustments: Vec<ScoreAdjustment>,
}

impl CreditScore {
    fn without_history() -> Self {
        Self::finalize(
            100.0,
            CreditFactors {
                positive: vec![rules::NO_HISTORY.to_string()],
                negative: Vec::new(),
            },
            Vec::new(),
        )
    }

    fn finalize(raw: f64, factors: CreditFactors, adjustments: Vec<ScoreAdjustment>) -> Self {
        let score = clamp_score(raw);
        let level = CreditLevel::from_score(score);

        Self {
            score,
            level,
            color: level.color(),
            description: level.description(),
            factors,
            adjustments,
        }
    }

    /// Score before clamping, i.e. the policy base plus every adjustment.
    pub fn raw_points(&self, base_score: f64) -> f64 {
        base_score
            + self
                .adjustments
                .iter()
                .map(|adjustment| adjustment.points)
                .sum::<f64>()
    }
}

fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}
