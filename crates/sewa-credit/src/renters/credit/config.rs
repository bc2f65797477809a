use std::path::Path;

use serde::{Deserialize, Serialize};

/// Weights table for the renter credit score.
///
/// Every number the scoring rules use lives here so the policy can be tuned
/// without touching rule control flow. `CreditPolicy::default()` is the
/// production policy. Partial JSON documents are merged over the defaults:
///
/// ```json
/// { "lateness": { "late_rate_penalty": 40 }, "experience": { "min_rentals": 8 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreditPolicy {
    /// Score every non-empty history starts from before adjustments.
    pub base_score: f64,
    pub completion: CompletionWeights,
    pub lateness: LatenessWeights,
    pub fines: FineWeights,
    pub recency: RecencyWeights,
    pub experience: ExperienceWeights,
}

impl Default for CreditPolicy {
    fn default() -> Self {
        Self {
            base_score: 100.0,
            completion: CompletionWeights::default(),
            lateness: LatenessWeights::default(),
            fines: FineWeights::default(),
            recency: RecencyWeights::default(),
            experience: ExperienceWeights::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompletionWeights {
    /// Bonus when every rental finished as "Selesai".
    pub all_completed_bonus: f64,
    /// Completion rate at or above which no penalty applies.
    pub majority_threshold: f64,
    /// Penalty scaled by the share of unfinished rentals.
    pub incomplete_penalty: f64,
}

impl Default for CompletionWeights {
    fn default() -> Self {
        Self {
            all_completed_bonus: 5.0,
            majority_threshold: 0.8,
            incomplete_penalty: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LatenessWeights {
    pub on_time_bonus: f64,
    /// Penalty scaled by the share of late returns.
    pub late_rate_penalty: f64,
    pub severe_after_minutes: u32,
    pub severe_penalty: f64,
    pub moderate_after_minutes: u32,
    pub moderate_penalty: f64,
}

impl Default for LatenessWeights {
    fn default() -> Self {
        Self {
            on_time_bonus: 10.0,
            late_rate_penalty: 30.0,
            severe_after_minutes: 24 * 60,
            severe_penalty: 15.0,
            moderate_after_minutes: 2 * 60,
            moderate_penalty: 10.0,
        }
    }
}

/// Fine-to-revenue ratio above which `penalty` applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FineTier {
    pub above_ratio: f64,
    pub penalty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FineWeights {
    /// Penalty scaled by the share of fined rentals.
    pub fined_rate_penalty: f64,
    pub very_high: FineTier,
    pub significant: FineTier,
    pub notable: FineTier,
}

impl Default for FineWeights {
    fn default() -> Self {
        Self {
            fined_rate_penalty: 20.0,
            very_high: FineTier {
                above_ratio: 0.5,
                penalty: 15.0,
            },
            significant: FineTier {
                above_ratio: 0.2,
                penalty: 10.0,
            },
            notable: FineTier {
                above_ratio: 0.1,
                penalty: 5.0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecencyWeights {
    /// How many of the newest rentals count as "recent".
    pub window: usize,
    pub none_completed_penalty: f64,
    pub late_penalty: f64,
    pub fined_penalty: f64,
}

impl Default for RecencyWeights {
    fn default() -> Self {
        Self {
            window: 3,
            none_completed_penalty: 10.0,
            late_penalty: 8.0,
            fined_penalty: 7.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperienceWeights {
    pub min_rentals: usize,
    pub bonus: f64,
}

impl Default for ExperienceWeights {
    fn default() -> Self {
        Self {
            min_rentals: 5,
            bonus: 5.0,
        }
    }
}

/// Failure to load or accept a policy document.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("failed to read credit policy: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid credit policy JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("credit policy rejected: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl CreditPolicy {
    pub fn from_json_str(raw: &str) -> Result<Self, PolicyError> {
        let policy: CreditPolicy = serde_json::from_str(raw)?;
        policy.validate().map_err(PolicyError::Invalid)?;
        Ok(policy)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Returns every problem at once rather than stopping at the first.
    ///
    /// Beyond range checks this enforces that harsher tiers never carry a
    /// smaller penalty than milder ones, which keeps the score
    /// non-increasing in lateness and fines.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !self.base_score.is_finite() || !(0.0..=100.0).contains(&self.base_score) {
            errors.push("base_score: must be between 0 and 100".to_string());
        }

        let weights = [
            (
                "completion.all_completed_bonus",
                self.completion.all_completed_bonus,
            ),
            (
                "completion.incomplete_penalty",
                self.completion.incomplete_penalty,
            ),
            ("lateness.on_time_bonus", self.lateness.on_time_bonus),
            (
                "lateness.late_rate_penalty",
                self.lateness.late_rate_penalty,
            ),
            ("lateness.severe_penalty", self.lateness.severe_penalty),
            ("lateness.moderate_penalty", self.lateness.moderate_penalty),
            ("fines.fined_rate_penalty", self.fines.fined_rate_penalty),
            ("fines.very_high.penalty", self.fines.very_high.penalty),
            ("fines.significant.penalty", self.fines.significant.penalty),
            ("fines.notable.penalty", self.fines.notable.penalty),
            (
                "recency.none_completed_penalty",
                self.recency.none_completed_penalty,
            ),
            ("recency.late_penalty", self.recency.late_penalty),
            ("recency.fined_penalty", self.recency.fined_penalty),
            ("experience.bonus", self.experience.bonus),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name}: must be a non-negative number"));
            }
        }

        let threshold = self.completion.majority_threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            errors.push("completion.majority_threshold: must be between 0 and 1".to_string());
        }

        if self.lateness.moderate_after_minutes >= self.lateness.severe_after_minutes {
            errors.push(format!(
                "lateness.moderate_after_minutes: {} must be below severe_after_minutes {}",
                self.lateness.moderate_after_minutes, self.lateness.severe_after_minutes
            ));
        }
        if self.lateness.moderate_penalty > self.lateness.severe_penalty {
            errors.push("lateness.moderate_penalty: must not exceed severe_penalty".to_string());
        }

        let tiers = [
            ("fines.notable", self.fines.notable),
            ("fines.significant", self.fines.significant),
            ("fines.very_high", self.fines.very_high),
        ];
        for (name, tier) in tiers {
            if !tier.above_ratio.is_finite() || tier.above_ratio < 0.0 {
                errors.push(format!("{name}.above_ratio: must be a non-negative number"));
            }
        }
        for pair in tiers.windows(2) {
            let (milder_name, milder) = pair[0];
            let (harsher_name, harsher) = pair[1];
            if milder.above_ratio >= harsher.above_ratio {
                errors.push(format!(
                    "{milder_name}.above_ratio: must be below {harsher_name}.above_ratio"
                ));
            }
            if milder.penalty > harsher.penalty {
                errors.push(format!(
                    "{milder_name}.penalty: must not exceed {harsher_name}.penalty"
                ));
            }
        }

        if self.recency.window == 0 {
            errors.push("recency.window: must cover at least one rental".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_valid() {
        let policy = CreditPolicy::default();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.base_score, 100.0);
        assert_eq!(policy.lateness.severe_after_minutes, 1440);
        assert_eq!(policy.lateness.moderate_after_minutes, 120);
        assert_eq!(policy.recency.window, 3);
    }

    #[test]
    fn partial_json_merges_over_defaults() {
        let policy = CreditPolicy::from_json_str(
            r#"{ "lateness": { "late_rate_penalty": 40 }, "experience": { "min_rentals": 8 } }"#,
        )
        .expect("policy parses");

        assert_eq!(policy.lateness.late_rate_penalty, 40.0);
        assert_eq!(policy.lateness.on_time_bonus, 10.0);
        assert_eq!(policy.experience.min_rentals, 8);
        assert_eq!(policy.fines, FineWeights::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = CreditPolicy::from_json_str(r#"{ "bonus_points": 3 }"#)
            .expect_err("unknown field rejected");
        assert!(matches!(error, PolicyError::Json(_)));
    }

    #[test]
    fn validation_collects_all_errors() {
        let mut policy = CreditPolicy::default();
        policy.base_score = 120.0;
        policy.lateness.late_rate_penalty = -1.0;
        policy.recency.window = 0;

        let errors = policy.validate().expect_err("policy rejected");

        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("base_score"));
        assert!(errors[1].contains("lateness.late_rate_penalty"));
        assert!(errors[2].contains("recency.window"));
    }

    #[test]
    fn validation_requires_ordered_tiers() {
        let mut policy = CreditPolicy::default();
        policy.fines.significant.above_ratio = 0.6;
        policy.lateness.moderate_penalty = 20.0;

        let errors = policy.validate().expect_err("policy rejected");

        assert!(errors
            .iter()
            .any(|error| error.contains("fines.significant.above_ratio")));
        assert!(errors
            .iter()
            .any(|error| error.contains("lateness.moderate_penalty")));
    }

    #[test]
    fn invalid_document_reports_rule_list() {
        let error = CreditPolicy::from_json_str(r#"{ "recency": { "window": 0 } }"#)
            .expect_err("policy rejected");
        match error {
            PolicyError::Invalid(errors) => assert_eq!(errors.len(), 1),
            other => panic!("expected invalid policy, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let error = CreditPolicy::from_path("./does-not-exist.json").expect_err("io error");
        assert!(matches!(error, PolicyError::Io(_)));
    }
}
