mod parser;

use super::domain::{RentalRecord, RenterId};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum HistoryImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for HistoryImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryImportError::Io(err) => {
                write!(f, "failed to read rental history export: {}", err)
            }
            HistoryImportError::Csv(err) => write!(f, "invalid rental history CSV data: {}", err),
        }
    }
}

impl std::error::Error for HistoryImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryImportError::Io(err) => Some(err),
            HistoryImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for HistoryImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for HistoryImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Rental history grouped per renter, each list in export order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RentalHistory {
    by_renter: BTreeMap<RenterId, Vec<RentalRecord>>,
}

impl RentalHistory {
    pub fn renters(&self) -> impl Iterator<Item = &RenterId> {
        self.by_renter.keys()
    }

    pub fn history(&self, renter_id: &RenterId) -> Option<&[RentalRecord]> {
        self.by_renter.get(renter_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.by_renter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_renter.is_empty()
    }

    pub fn push(&mut self, renter_id: RenterId, record: RentalRecord) {
        self.by_renter.entry(renter_id).or_default().push(record);
    }

    pub fn into_inner(self) -> BTreeMap<RenterId, Vec<RentalRecord>> {
        self.by_renter
    }
}

/// Loads rental history from the back office CSV export
/// (`id_penyewa,status_selesai,keterlambatan_menit,denda,harga,tgl_kembali`).
pub struct RentalHistoryImporter;

impl RentalHistoryImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RentalHistory, HistoryImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<RentalHistory, HistoryImportError> {
        let mut history = RentalHistory::default();

        for row in parser::parse_rows(reader)? {
            if row.renter_id.0.is_empty() {
                continue;
            }
            history.push(row.renter_id, row.record);
        }

        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    const HEADER: &str = "id_penyewa,status_selesai,keterlambatan_menit,denda,harga,tgl_kembali\n";

    #[test]
    fn groups_rows_per_renter_in_file_order() {
        let csv = format!(
            "{HEADER}P-001,Selesai,0,0,150000,2025-05-03\n\
P-002,Batal,,,,\n\
P-001,Selesai,45,10000,150000,2025-04-01T08:00:00Z\n"
        );

        let history =
            RentalHistoryImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(history.len(), 2);
        let first = history
            .history(&RenterId("P-001".to_string()))
            .expect("renter present");
        assert_eq!(first.len(), 2);
        assert_eq!(
            first[0].returned_at,
            NaiveDate::from_ymd_opt(2025, 5, 3).and_then(|date| date.and_hms_opt(0, 0, 0))
        );
        assert_eq!(first[1].late_minutes, 45);
        assert_eq!(first[1].fine, 10000.0);
    }

    #[test]
    fn blank_cells_default_to_zero() {
        let csv = format!("{HEADER}P-002,Batal,,,,\n");

        let history =
            RentalHistoryImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        let records = history
            .history(&RenterId("P-002".to_string()))
            .expect("renter present");
        assert!(!records[0].is_completed());
        assert_eq!(records[0].late_minutes, 0);
        assert_eq!(records[0].fine, 0.0);
        assert_eq!(records[0].price, 0.0);
        assert!(records[0].returned_at.is_none());
    }

    #[test]
    fn unparseable_dates_are_dropped_not_fatal() {
        let csv = format!("{HEADER}P-003,Selesai,0,0,90000,kemarin sore\n");

        let history =
            RentalHistoryImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        let records = history
            .history(&RenterId("P-003".to_string()))
            .expect("renter present");
        assert!(records[0].returned_at.is_none());
    }

    #[test]
    fn rows_without_renter_are_skipped() {
        let csv = format!("{HEADER},Selesai,0,0,90000,\n");

        let history =
            RentalHistoryImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert!(history.is_empty());
    }

    #[test]
    fn invalid_numbers_surface_as_csv_errors() {
        let csv = format!("{HEADER}P-004,Selesai,lama,0,90000,\n");

        let error = RentalHistoryImporter::from_reader(Cursor::new(csv)).expect_err("csv error");

        assert!(matches!(error, HistoryImportError::Csv(_)));
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = RentalHistoryImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");

        match error {
            HistoryImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
