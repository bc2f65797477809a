use crate::infra::{load_engine, InMemoryHistoryRepository};
use clap::Args;
use sewa_credit::error::AppError;
use sewa_credit::renters::{
    CreditServiceError, RentalHistoryImporter, RentalRecord, RenterCreditReport,
    RenterCreditService, RenterId,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional JSON credit policy to score the sample renters with
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
    /// Print the reports as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Rental history export (id_penyewa,status_selesai,keterlambatan_menit,denda,harga,tgl_kembali)
    #[arg(long)]
    pub(crate) history_csv: PathBuf,
    /// Only report this renter
    #[arg(long)]
    pub(crate) renter: Option<String>,
    /// Optional JSON credit policy (defaults to the built-in weights)
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
    /// Print the reports as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score_report(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        history_csv,
        renter,
        policy,
        json,
    } = args;

    let engine = load_engine(policy.as_deref())?;
    let history = RentalHistoryImporter::from_path(&history_csv)?;
    let service =
        RenterCreditService::new(Arc::new(InMemoryHistoryRepository::from(history)), engine);

    let reports = match renter {
        Some(id) => vec![service.assess(&RenterId(id))?],
        None => service.assess_all()?,
    };

    println!("Renter credit report ({})", history_csv.display());
    print_reports(&reports, json);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { policy, json } = args;

    let engine = load_engine(policy.as_deref())?;
    let repository = demo_repository().map_err(CreditServiceError::from)?;
    let service = RenterCreditService::new(Arc::new(repository), engine);
    let reports = service.assess_all()?;

    println!("Renter credit scoring demo");
    println!("Sample renters: {}", reports.len());
    print_reports(&reports, json);

    let ad_hoc = service.score_records(&[]);
    println!(
        "\nWalk-in renter without history: {} ({})",
        ad_hoc.score,
        ad_hoc.level.label()
    );
    Ok(())
}

fn print_reports(reports: &[RenterCreditReport], json: bool) {
    if json {
        match serde_json::to_string_pretty(reports) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("  Report payload unavailable: {}", err),
        }
        return;
    }

    if reports.is_empty() {
        println!("\nNo renters found");
        return;
    }

    for report in reports {
        render_report(report);
    }
}

fn render_report(report: &RenterCreditReport) {
    let score = &report.credit_score;
    let stats = &report.stats;

    println!(
        "\n{} | {} / 100 | {} ({})",
        report.renter_id,
        score.score,
        score.level.label(),
        score.description
    );
    println!(
        "  {} rentals | {} completed | {} fined | {:.1} late hours",
        stats.total_rentals,
        stats.completed_rentals,
        stats.fined_rentals,
        stats.total_late_hours()
    );
    println!(
        "  Revenue Rp {:.0} | fines Rp {:.0}",
        stats.total_revenue, stats.total_fines
    );
    for note in &score.factors.positive {
        println!("  + {note}");
    }
    for note in &score.factors.negative {
        println!("  - {note}");
    }
}

fn demo_repository() -> Result<InMemoryHistoryRepository, sewa_credit::renters::RepositoryError> {
    let repository = InMemoryHistoryRepository::default();
    let on_time = || RentalRecord::new("Selesai", 0, 0.0, 150_000.0);

    repository.insert(RenterId("PNY-1001".to_string()), vec![on_time(); 8])?;
    repository.insert(
        RenterId("PNY-1002".to_string()),
        vec![
            RentalRecord::new("Selesai", 95, 25_000.0, 150_000.0),
            on_time(),
            on_time(),
            on_time(),
            RentalRecord::new("Dibatalkan", 0, 0.0, 150_000.0),
            on_time(),
        ],
    )?;
    repository.insert(
        RenterId("PNY-1003".to_string()),
        vec![
            RentalRecord::new("Dibatalkan", 1_800, 200_000.0, 150_000.0),
            RentalRecord::new("Selesai", 240, 60_000.0, 150_000.0),
            RentalRecord::new("Dibatalkan", 0, 0.0, 150_000.0),
        ],
    )?;
    repository.insert(RenterId("PNY-1004".to_string()), Vec::new())?;

    Ok(repository)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sewa_credit::renters::{CreditLevel, CreditScoreEngine};

    #[test]
    fn demo_renters_span_the_levels() {
        let repository = demo_repository().expect("demo data seeds");
        let service = RenterCreditService::new(Arc::new(repository), CreditScoreEngine::default());

        let reports = service.assess_all().expect("demo renters assessed");

        assert_eq!(reports.len(), 4);
        assert_eq!(reports[0].renter_id.0, "PNY-1003");
        assert_eq!(reports[0].credit_score.level, CreditLevel::VeryPoor);
        let best = reports.last().expect("at least one report");
        assert_eq!(best.credit_score.score, 100);
    }

    #[test]
    fn missing_export_is_reported() {
        let args = ScoreArgs {
            history_csv: PathBuf::from("/nonexistent/riwayat_sewa.csv"),
            renter: None,
            policy: None,
            json: false,
        };
        let error = run_score_report(args).expect_err("export missing");
        assert!(matches!(error, AppError::History(_)));
    }
}
