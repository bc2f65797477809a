use serde::Serialize;

/// Qualitative band a clamped credit score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CreditLevel {
    #[serde(rename = "Very Poor")]
    VeryPoor,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl CreditLevel {
    const BANDS: [(u8, CreditLevel); 4] = [
        (85, CreditLevel::Excellent),
        (70, CreditLevel::Good),
        (50, CreditLevel::Fair),
        (30, CreditLevel::Poor),
    ];

    pub fn from_score(score: u8) -> Self {
        Self::BANDS
            .iter()
            .find(|(floor, _)| score >= *floor)
            .map(|(_, level)| *level)
            .unwrap_or(CreditLevel::VeryPoor)
    }

    pub const fn label(self) -> &'static str {
        match self {
            CreditLevel::Excellent => "Excellent",
            CreditLevel::Good => "Good",
            CreditLevel::Fair => "Fair",
            CreditLevel::Poor => "Poor",
            CreditLevel::VeryPoor => "Very Poor",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            CreditLevel::Excellent => "#10B981",
            CreditLevel::Good => "#3B82F6",
            CreditLevel::Fair => "#F59E0B",
            CreditLevel::Poor => "#EF4444",
            CreditLevel::VeryPoor => "#7C2D12",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            CreditLevel::Excellent => "Very trustworthy renter",
            CreditLevel::Good => "Reliable renter",
            CreditLevel::Fair => "Needs special attention",
            CreditLevel::Poor => "High risk",
            CreditLevel::VeryPoor => "Very high risk",
        }
    }
}
