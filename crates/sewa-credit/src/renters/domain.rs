use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for renters (penyewa).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RenterId(pub String);

impl fmt::Display for RenterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Completion state of a finished rental as recorded by the back office.
///
/// Only the literal `"Selesai"` counts as a normal completion; every other
/// value is preserved verbatim so it can be echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompletionStatus {
    Completed,
    Other(String),
}

impl CompletionStatus {
    pub const COMPLETED_LABEL: &'static str = "Selesai";

    pub fn is_completed(&self) -> bool {
        matches!(self, CompletionStatus::Completed)
    }

    pub fn label(&self) -> &str {
        match self {
            CompletionStatus::Completed => Self::COMPLETED_LABEL,
            CompletionStatus::Other(value) => value,
        }
    }
}

impl Default for CompletionStatus {
    fn default() -> Self {
        CompletionStatus::Other(String::new())
    }
}

impl From<String> for CompletionStatus {
    fn from(value: String) -> Self {
        if value.trim() == Self::COMPLETED_LABEL {
            CompletionStatus::Completed
        } else {
            CompletionStatus::Other(value)
        }
    }
}

impl From<&str> for CompletionStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<CompletionStatus> for String {
    fn from(value: CompletionStatus) -> Self {
        match value {
            CompletionStatus::Completed => CompletionStatus::COMPLETED_LABEL.to_string(),
            CompletionStatus::Other(value) => value,
        }
    }
}

/// One completed rental from a renter's history, in the shape the rental
/// back office exports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalRecord {
    #[serde(
        rename = "status_selesai",
        default,
        deserialize_with = "null_as_default"
    )]
    pub status: CompletionStatus,
    /// Minutes late at return. Zero means on time.
    #[serde(
        rename = "keterlambatan_menit",
        default,
        deserialize_with = "null_as_default"
    )]
    pub late_minutes: i64,
    /// Fine (denda) charged for this rental.
    #[serde(rename = "denda", default, deserialize_with = "null_as_default")]
    pub fine: f64,
    /// Base rental price (harga).
    #[serde(rename = "harga", default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(
        rename = "tgl_kembali",
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub returned_at: Option<NaiveDateTime>,
}

impl RentalRecord {
    pub fn new(
        status: impl Into<CompletionStatus>,
        late_minutes: i64,
        fine: f64,
        price: f64,
    ) -> Self {
        Self {
            status: status.into(),
            late_minutes,
            fine,
            price,
            returned_at: None,
        }
    }

    pub fn returned_at(mut self, returned_at: NaiveDateTime) -> Self {
        self.returned_at = Some(returned_at);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    pub fn is_late(&self) -> bool {
        self.late_minutes > 0
    }

    pub fn is_fined(&self) -> bool {
        self.fine > 0.0
    }

    /// Copy with lateness clamped to zero and money coerced to finite,
    /// non-negative amounts.
    pub fn sanitized(&self) -> Self {
        Self {
            status: self.status.clone(),
            late_minutes: self.late_minutes.max(0),
            fine: non_negative_amount(self.fine),
            price: non_negative_amount(self.price),
            returned_at: self.returned_at,
        }
    }
}

fn non_negative_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Aggregate totals shown next to the credit score. Never read by the scoring rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total_rentals: usize,
    pub total_revenue: f64,
    pub total_fines: f64,
    pub fined_rentals: usize,
    pub completed_rentals: usize,
    pub total_late_minutes: u64,
}

impl HistoryStats {
    pub fn from_records(records: &[RentalRecord]) -> Self {
        records
            .iter()
            .map(RentalRecord::sanitized)
            .fold(Self::default(), |mut stats, record| {
                stats.total_rentals += 1;
                stats.total_revenue += record.price;
                stats.total_fines += record.fine;
                if record.is_fined() {
                    stats.fined_rentals += 1;
                }
                if record.is_completed() {
                    stats.completed_rentals += 1;
                }
                stats.total_late_minutes = stats
                    .total_late_minutes
                    .saturating_add(record.late_minutes.unsigned_abs());
                stats
            })
    }

    pub fn total_late_hours(&self) -> f64 {
        self.total_late_minutes as f64 / 60.0
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_timestamp(raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid tgl_kembali '{raw}'"))),
    }
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS`, or a bare date.
pub(crate) fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}
