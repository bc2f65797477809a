use super::domain::{RentalRecord, RenterId};

/// Source of completed-rental history, typically the back office API.
///
/// Implementations return each renter's records most recent first. The
/// engine re-sorts on `tgl_kembali` when every record carries one, so the
/// ordering only matters for records without timestamps.
pub trait RentalHistoryRepository: Send + Sync {
    fn history(&self, renter_id: &RenterId) -> Result<Vec<RentalRecord>, RepositoryError>;
    fn renters(&self) -> Result<Vec<RenterId>, RepositoryError>;
}

/// Error enumeration for history provider failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("renter not found")]
    NotFound,
    #[error("history provider unavailable: {0}")]
    Unavailable(String),
}
