use super::super::domain::RentalRecord;
use super::config::CreditPolicy;
use super::{CreditFactors, ScoreAdjustment, ScoreRule};

pub(crate) const NO_HISTORY: &str = "No rental history yet";

/// Running score plus the explanation trail the rules leave behind.
pub(crate) struct ScoreSheet {
    pub(crate) score: f64,
    pub(crate) factors: CreditFactors,
    pub(crate) adjustments: Vec<ScoreAdjustment>,
}

impl ScoreSheet {
    fn new(base_score: f64) -> Self {
        Self {
            score: base_score,
            factors: CreditFactors::default(),
            adjustments: Vec::new(),
        }
    }

    fn adjust(&mut self, rule: ScoreRule, points: f64) {
        if points != 0.0 {
            self.score += points;
            self.adjustments.push(ScoreAdjustment { rule, points });
        }
    }

    fn positive(&mut self, note: impl Into<String>) {
        self.factors.positive.push(note.into());
    }

    fn negative(&mut self, note: impl Into<String>) {
        self.factors.negative.push(note.into());
    }
}

/// Applies every rule in order. `records` must be non-empty, sanitized, and
/// ordered most recent first.
pub(crate) fn score_history(records: &[RentalRecord], policy: &CreditPolicy) -> ScoreSheet {
    let mut sheet = ScoreSheet::new(policy.base_score);

    apply_completion(records, policy, &mut sheet);
    apply_lateness(records, policy, &mut sheet);
    apply_fines(records, policy, &mut sheet);
    apply_recency(records, policy, &mut sheet);
    apply_experience(records, policy, &mut sheet);

    sheet
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

fn percent(rate: f64) -> f64 {
    (rate * 100.0).round()
}

fn hours(minutes: f64) -> f64 {
    (minutes / 60.0).round()
}

fn apply_completion(records: &[RentalRecord], policy: &CreditPolicy, sheet: &mut ScoreSheet) {
    let weights = &policy.completion;
    let total = records.len();
    let completed = records
        .iter()
        .filter(|record| record.is_completed())
        .count();

    if completed == total {
        sheet.adjust(ScoreRule::Completion, weights.all_completed_bonus);
        sheet.positive("All rentals completed properly");
        return;
    }

    let rate = share(completed, total);
    if rate >= weights.majority_threshold {
        sheet.positive(format!("Majority of rentals completed ({:.0}%)", percent(rate)));
        return;
    }

    sheet.adjust(
        ScoreRule::Completion,
        -(1.0 - rate) * weights.incomplete_penalty,
    );
    if completed == 0 {
        sheet.negative("No rentals completed");
    } else {
        sheet.negative(format!("{:.0}% of rentals not completed", percent(1.0 - rate)));
    }
}

/// Severity is judged on the longest delay rather than the average so an
/// extra short delay can never soften the penalty; the note still reports
/// the average.
fn apply_lateness(records: &[RentalRecord], policy: &CreditPolicy, sheet: &mut ScoreSheet) {
    let weights = &policy.lateness;
    let late: Vec<f64> = records
        .iter()
        .filter(|record| record.is_late())
        .map(|record| record.late_minutes as f64)
        .collect();

    if late.is_empty() {
        sheet.adjust(ScoreRule::LateReturns, weights.on_time_bonus);
        sheet.positive("Never late returning");
        return;
    }

    let count = late.len();
    sheet.adjust(
        ScoreRule::LateReturns,
        -share(count, records.len()) * weights.late_rate_penalty,
    );

    let average = late.iter().sum::<f64>() / count as f64;
    let longest = late.iter().copied().fold(0.0, f64::max);

    let penalty = if longest > f64::from(weights.severe_after_minutes) {
        Some(weights.severe_penalty)
    } else if longest > f64::from(weights.moderate_after_minutes) {
        Some(weights.moderate_penalty)
    } else {
        None
    };

    match penalty {
        Some(points) => {
            sheet.adjust(ScoreRule::LateSeverity, -points);
            sheet.negative(format!(
                "Late on {count} rental(s), averaging {:.0} hours (longest {:.0} hours)",
                hours(average),
                hours(longest)
            ));
        }
        None => sheet.negative(format!("Late on {count} rental(s)")),
    }
}

fn apply_fines(records: &[RentalRecord], policy: &CreditPolicy, sheet: &mut ScoreSheet) {
    let weights = &policy.fines;
    let fined = records.iter().filter(|record| record.is_fined()).count();

    if fined == 0 {
        sheet.positive("No fine history");
        return;
    }

    sheet.adjust(
        ScoreRule::Fines,
        -share(fined, records.len()) * weights.fined_rate_penalty,
    );

    let total_fines: f64 = records.iter().map(|record| record.fine).sum();
    let total_revenue: f64 = records.iter().map(|record| record.price).sum();
    let ratio = if total_revenue > 0.0 {
        total_fines / total_revenue
    } else {
        0.0
    };

    let tiers = [
        (weights.very_high, "Total fines very high"),
        (weights.significant, "Total fines significant"),
        (weights.notable, "Has fine history"),
    ];

    match tiers.iter().find(|(tier, _)| ratio > tier.above_ratio) {
        Some((tier, label)) => {
            sheet.adjust(ScoreRule::FineSeverity, -tier.penalty);
            sheet.negative(format!("{label} ({:.0}% of rental value)", percent(ratio)));
        }
        None => sheet.negative(format!("{fined} rental(s) with light fines")),
    }
}

fn apply_recency(records: &[RentalRecord], policy: &CreditPolicy, sheet: &mut ScoreSheet) {
    let weights = &policy.recency;
    let recent = &records[..weights.window.min(records.len())];

    let completed = recent.iter().filter(|record| record.is_completed()).count();
    let late = recent.iter().filter(|record| record.is_late()).count();
    let fined = recent.iter().filter(|record| record.is_fined()).count();

    if completed == recent.len() {
        sheet.positive("Recent rentals completed well");
    } else if completed == 0 {
        sheet.adjust(ScoreRule::RecentIncomplete, -weights.none_completed_penalty);
        sheet.negative("Most recent rentals not completed");
    }

    if late > 0 {
        sheet.adjust(ScoreRule::RecentLate, -weights.late_penalty);
        sheet.negative("Most recent rental was late");
    }

    if fined > 0 {
        sheet.adjust(ScoreRule::RecentFine, -weights.fined_penalty);
        sheet.negative("Most recent rental incurred a fine");
    }
}

fn apply_experience(records: &[RentalRecord], policy: &CreditPolicy, sheet: &mut ScoreSheet) {
    let weights = &policy.experience;
    let total = records.len();

    if total >= weights.min_rentals {
        sheet.adjust(ScoreRule::Experience, weights.bonus);
        sheet.positive(format!("Sufficient rental experience ({total} rentals)"));
    }
}
