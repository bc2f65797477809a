use super::common::*;
use std::sync::Arc;

use crate::renters::credit::CreditLevel;
use crate::renters::repository::RepositoryError;
use crate::renters::service::{CreditServiceError, RenterCreditService};

#[test]
fn assess_returns_score_and_stats() {
    let service = build_service();

    let report = service.assess(&renter("P-002")).expect("renter assessed");

    assert_eq!(report.renter_id, renter("P-002"));
    assert_eq!(report.credit_score.score, 46);
    assert_eq!(report.credit_score.level, CreditLevel::Poor);
    assert_eq!(report.stats.total_rentals, 4);
    assert_eq!(report.stats.completed_rentals, 3);
    assert_eq!(report.stats.fined_rentals, 1);
    assert_eq!(report.stats.total_fines, 90_000.0);
    assert_eq!(report.stats.total_late_minutes, 2000);
}

#[test]
fn assess_scores_empty_history_as_new_renter() {
    let service = build_service();

    let report = service.assess(&renter("P-003")).expect("renter assessed");

    assert_eq!(report.credit_score.score, 100);
    assert_eq!(report.stats.total_rentals, 0);
}

#[test]
fn assess_reports_unknown_renter() {
    let service = build_service();

    let error = service.assess(&renter("P-404")).expect_err("unknown renter");

    assert!(matches!(
        error,
        CreditServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn assess_all_lists_riskiest_first() {
    let service = build_service();

    let reports = service.assess_all().expect("portfolio assessed");

    let order: Vec<_> = reports
        .iter()
        .map(|report| report.renter_id.0.as_str())
        .collect();
    assert_eq!(order, vec!["P-002", "P-001", "P-003"]);
}

#[test]
fn provider_outage_propagates() {
    let service = RenterCreditService::new(Arc::new(UnavailableRepository), engine());

    let error = service.assess_all().expect_err("provider offline");

    match error {
        CreditServiceError::Repository(RepositoryError::Unavailable(reason)) => {
            assert_eq!(reason, "backend offline")
        }
        other => panic!("expected unavailable provider, got {other:?}"),
    }
}

#[test]
fn score_records_uses_configured_engine() {
    let service = build_service();
    let history = vec![late(30), completed(), completed()];

    assert_eq!(
        service.score_records(&history),
        service.engine().score(&history)
    );
}
