use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::renters::credit::{CreditPolicy, CreditScoreEngine};
use crate::renters::domain::{RentalRecord, RenterId};
use crate::renters::repository::{RentalHistoryRepository, RepositoryError};
use crate::renters::service::RenterCreditService;

pub(super) fn completed() -> RentalRecord {
    RentalRecord::new("Selesai", 0, 0.0, 150_000.0)
}

pub(super) fn cancelled() -> RentalRecord {
    RentalRecord::new("Dibatalkan", 0, 0.0, 150_000.0)
}

pub(super) fn late(minutes: i64) -> RentalRecord {
    RentalRecord::new("Selesai", minutes, 0.0, 150_000.0)
}

pub(super) fn fined(fine: f64) -> RentalRecord {
    RentalRecord::new("Selesai", 0, fine, 150_000.0)
}

pub(super) fn renter(id: &str) -> RenterId {
    RenterId(id.to_string())
}

pub(super) fn engine() -> CreditScoreEngine {
    CreditScoreEngine::new(CreditPolicy::default())
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<BTreeMap<RenterId, Vec<RentalRecord>>>>,
}

impl MemoryRepository {
    pub(super) fn with(entries: Vec<(&str, Vec<RentalRecord>)>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository
                .records
                .lock()
                .expect("repository mutex poisoned");
            for (id, history) in entries {
                guard.insert(renter(id), history);
            }
        }
        repository
    }
}

impl RentalHistoryRepository for MemoryRepository {
    fn history(&self, renter_id: &RenterId) -> Result<Vec<RentalRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .get(renter_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    fn renters(&self) -> Result<Vec<RenterId>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.keys().cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl RentalHistoryRepository for UnavailableRepository {
    fn history(&self, _renter_id: &RenterId) -> Result<Vec<RentalRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }

    fn renters(&self) -> Result<Vec<RenterId>, RepositoryError> {
        Err(RepositoryError::Unavailable("backend offline".to_string()))
    }
}

pub(super) fn sample_repository() -> MemoryRepository {
    MemoryRepository::with(vec![
        ("P-001", vec![completed(); 6]),
        (
            "P-002",
            vec![late(2000), fined(90_000.0), cancelled(), completed()],
        ),
        ("P-003", Vec::new()),
    ])
}

pub(super) fn build_service() -> Arc<RenterCreditService<MemoryRepository>> {
    Arc::new(RenterCreditService::new(Arc::new(sample_repository()), engine()))
}

pub(super) async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}
