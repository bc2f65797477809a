use metrics_exporter_prometheus::PrometheusHandle;
use sewa_credit::error::AppError;
use sewa_credit::renters::{
    CreditPolicy, CreditScoreEngine, RentalHistory, RentalHistoryImporter, RentalHistoryRepository,
    RentalRecord, RenterId, RepositoryError,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// History provider backed by an imported export held in memory.
#[derive(Default, Clone)]
pub(crate) struct InMemoryHistoryRepository {
    records: Arc<Mutex<BTreeMap<RenterId, Vec<RentalRecord>>>>,
}

impl InMemoryHistoryRepository {
    pub(crate) fn insert(
        &self,
        renter_id: RenterId,
        history: Vec<RentalRecord>,
    ) -> Result<(), RepositoryError> {
        self.guard()?.insert(renter_id, history);
        Ok(())
    }

    fn guard(
        &self,
    ) -> Result<MutexGuard<'_, BTreeMap<RenterId, Vec<RentalRecord>>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("history store poisoned".to_string()))
    }
}

impl From<RentalHistory> for InMemoryHistoryRepository {
    fn from(history: RentalHistory) -> Self {
        Self {
            records: Arc::new(Mutex::new(history.into_inner())),
        }
    }
}

impl RentalHistoryRepository for InMemoryHistoryRepository {
    fn history(&self, renter_id: &RenterId) -> Result<Vec<RentalRecord>, RepositoryError> {
        self.guard()?
            .get(renter_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    fn renters(&self) -> Result<Vec<RenterId>, RepositoryError> {
        Ok(self.guard()?.keys().cloned().collect())
    }
}

/// Built-in policy unless a JSON policy file is configured.
pub(crate) fn load_engine(policy_path: Option<&Path>) -> Result<CreditScoreEngine, AppError> {
    let policy = match policy_path {
        Some(path) => {
            info!(path = %path.display(), "loading credit policy");
            CreditPolicy::from_path(path)?
        }
        None => CreditPolicy::default(),
    };

    Ok(CreditScoreEngine::try_new(policy)?)
}

/// Empty store unless a history export is configured.
pub(crate) fn load_repository(
    history_csv: Option<&Path>,
) -> Result<InMemoryHistoryRepository, AppError> {
    let Some(path) = history_csv else {
        return Ok(InMemoryHistoryRepository::default());
    };

    let history = RentalHistoryImporter::from_path(path)?;
    info!(
        path = %path.display(),
        renters = history.len(),
        "seeded rental history"
    );
    Ok(InMemoryHistoryRepository::from(history))
}
