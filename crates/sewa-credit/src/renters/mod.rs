//! Renter (penyewa) rental history, credit scoring, and the HTTP surface around them.

pub mod credit;
pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use credit::{
    compute_credit_score, CreditFactors, CreditLevel, CreditPolicy, CreditScore, CreditScoreEngine,
    PolicyError, ScoreAdjustment, ScoreRule,
};
pub use domain::{CompletionStatus, HistoryStats, RentalRecord, RenterId};
pub use import::{HistoryImportError, RentalHistory, RentalHistoryImporter};
pub use repository::{RentalHistoryRepository, RepositoryError};
pub use router::credit_router;
pub use service::{CreditServiceError, RenterCreditReport, RenterCreditService};
