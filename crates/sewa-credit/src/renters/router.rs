use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::domain::{RentalRecord, RenterId};
use super::repository::{RentalHistoryRepository, RepositoryError};
use super::service::{CreditServiceError, RenterCreditService};

/// Ad-hoc scoring payload; `history` is ordered most recent first.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub history: Vec<RentalRecord>,
}

/// Router builder exposing renter credit endpoints.
pub fn credit_router<R>(service: Arc<RenterCreditService<R>>) -> Router
where
    R: RentalHistoryRepository + 'static,
{
    Router::new()
        .route("/api/v1/credit-score", post(score_handler::<R>))
        .route("/api/v1/renters/credit-scores", get(portfolio_handler::<R>))
        .route(
            "/api/v1/renters/:renter_id/credit-score",
            get(renter_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn score_handler<R>(
    State(service): State<Arc<RenterCreditService<R>>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    R: RentalHistoryRepository + 'static,
{
    let score = service.score_records(&request.history);
    (StatusCode::OK, axum::Json(score)).into_response()
}

pub(crate) async fn renter_handler<R>(
    State(service): State<Arc<RenterCreditService<R>>>,
    Path(renter_id): Path<String>,
) -> Response
where
    R: RentalHistoryRepository + 'static,
{
    let id = RenterId(renter_id);
    match service.assess(&id) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(CreditServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "renter_id": id.0,
                "error": "renter not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn portfolio_handler<R>(
    State(service): State<Arc<RenterCreditService<R>>>,
) -> Response
where
    R: RentalHistoryRepository + 'static,
{
    match service.assess_all() {
        Ok(reports) => (StatusCode::OK, axum::Json(reports)).into_response(),
        Err(other) => internal_error(other),
    }
}

fn internal_error(error: CreditServiceError) -> Response {
    warn!(%error, "renter credit request failed");
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
