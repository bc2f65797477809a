use super::super::domain::{parse_timestamp, CompletionStatus, RentalRecord, RenterId};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use tracing::warn;

#[derive(Debug)]
pub(crate) struct HistoryRow {
    pub(crate) renter_id: RenterId,
    pub(crate) record: RentalRecord,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<HistoryRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (index, row) in csv_reader.deserialize::<ExportRow>().enumerate() {
        let row = row?;
        // header is line 1
        let line = index + 2;
        rows.push(row.into_history_row(line));
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct ExportRow {
    #[serde(rename = "id_penyewa")]
    renter_id: String,
    #[serde(
        rename = "status_selesai",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    status: Option<String>,
    #[serde(rename = "keterlambatan_menit", default)]
    late_minutes: Option<i64>,
    #[serde(rename = "denda", default)]
    fine: Option<f64>,
    #[serde(rename = "harga", default)]
    price: Option<f64>,
    #[serde(
        rename = "tgl_kembali",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    returned_at: Option<String>,
}

impl ExportRow {
    fn into_history_row(self, line: usize) -> HistoryRow {
        let returned_at = self.returned_at.as_deref().and_then(|raw| {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                warn!(line, value = raw, "ignoring unparseable tgl_kembali");
            }
            parsed
        });

        HistoryRow {
            renter_id: RenterId(self.renter_id),
            record: RentalRecord {
                status: self.status.map(CompletionStatus::from).unwrap_or_default(),
                late_minutes: self.late_minutes.unwrap_or(0),
                fine: self.fine.unwrap_or(0.0),
                price: self.price.unwrap_or(0.0),
                returned_at,
            },
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
