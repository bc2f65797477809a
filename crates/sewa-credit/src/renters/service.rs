use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::credit::{CreditScore, CreditScoreEngine};
use super::domain::{HistoryStats, RentalRecord, RenterId};
use super::repository::{RentalHistoryRepository, RepositoryError};

/// Service composing the history provider and the scoring engine.
pub struct RenterCreditService<R> {
    repository: Arc<R>,
    engine: Arc<CreditScoreEngine>,
}

impl<R> RenterCreditService<R>
where
    R: RentalHistoryRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: CreditScoreEngine) -> Self {
        Self {
            repository,
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &CreditScoreEngine {
        &self.engine
    }

    /// Fetch a renter's history and score it alongside the display totals.
    pub fn assess(&self, renter_id: &RenterId) -> Result<RenterCreditReport, CreditServiceError> {
        let history = self.repository.history(renter_id)?;
        let report = self.report_for(renter_id.clone(), &history);

        debug!(
            renter = %renter_id,
            records = history.len(),
            score = report.credit_score.score,
            level = report.credit_score.level.label(),
            "renter credit assessed"
        );

        Ok(report)
    }

    /// Assess every renter the provider knows, riskiest first.
    pub fn assess_all(&self) -> Result<Vec<RenterCreditReport>, CreditServiceError> {
        let renters = self.repository.renters()?;
        let mut reports = Vec::with_capacity(renters.len());

        for renter_id in renters {
            let history = self.repository.history(&renter_id)?;
            reports.push(self.report_for(renter_id, &history));
        }

        reports.sort_by(|a, b| {
            a.credit_score
                .score
                .cmp(&b.credit_score.score)
                .then_with(|| a.renter_id.cmp(&b.renter_id))
        });

        info!(renters = reports.len(), "renter credit portfolio assessed");
        Ok(reports)
    }

    /// Score records supplied directly by the caller.
    pub fn score_records(&self, history: &[RentalRecord]) -> CreditScore {
        self.engine.score(history)
    }

    fn report_for(&self, renter_id: RenterId, history: &[RentalRecord]) -> RenterCreditReport {
        RenterCreditReport {
            renter_id,
            credit_score: self.engine.score(history),
            stats: HistoryStats::from_records(history),
        }
    }
}

/// Credit score plus the history totals shown next to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenterCreditReport {
    pub renter_id: RenterId,
    pub credit_score: CreditScore,
    pub stats: HistoryStats,
}

/// Error raised by the renter credit service.
#[derive(Debug, thiserror::Error)]
pub enum CreditServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
