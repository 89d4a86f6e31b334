use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Qualitative profitability of a job.
///
/// Recomputed from scratch every time the metrics are; there are no
/// transitions between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfitabilityStatus {
    /// No retail price yet, so nothing meaningful to say.
    Neutral,
    /// Meets the target margin and covers overhead.
    Jackpot,
    /// Covers overhead but misses the target margin.
    Warning,
    /// Misses the target and does not cover overhead.
    Thin,
    /// Meets the target but does not cover overhead.
    NoBueno,
}

impl ProfitabilityStatus {
    pub const ALL: [ProfitabilityStatus; 5] = [
        ProfitabilityStatus::Neutral,
        ProfitabilityStatus::Jackpot,
        ProfitabilityStatus::Warning,
        ProfitabilityStatus::Thin,
        ProfitabilityStatus::NoBueno,
    ];

    /// The machine name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfitabilityStatus::Neutral => "neutral",
            ProfitabilityStatus::Jackpot => "jackpot",
            ProfitabilityStatus::Warning => "warning",
            ProfitabilityStatus::Thin => "thin",
            ProfitabilityStatus::NoBueno => "no-bueno",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfitabilityStatus::Neutral => "Neutral",
            ProfitabilityStatus::Jackpot => "Jackpot",
            ProfitabilityStatus::Warning => "Warning",
            ProfitabilityStatus::Thin => "Thin",
            ProfitabilityStatus::NoBueno => "No Bueno",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ProfitabilityStatus::Neutral => "Enter a retail price to see how this job stacks up.",
            ProfitabilityStatus::Jackpot => "Target net profit hit and every overhead dollar covered.",
            ProfitabilityStatus::Warning => "Overhead is covered, but net profit is below target.",
            ProfitabilityStatus::Thin => "Below target and not covering overhead. This job loses money.",
            ProfitabilityStatus::NoBueno => "Margin looks fine on paper, but overhead is not covered.",
        }
    }

    /// Ordering used when sorting by status, healthiest first.
    pub fn rank(&self) -> u8 {
        match self {
            ProfitabilityStatus::Jackpot => 0,
            ProfitabilityStatus::Warning => 1,
            ProfitabilityStatus::NoBueno => 2,
            ProfitabilityStatus::Thin => 3,
            ProfitabilityStatus::Neutral => 4,
        }
    }
}

impl fmt::Display for ProfitabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfitabilityStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neutral" => Ok(ProfitabilityStatus::Neutral),
            "jackpot" => Ok(ProfitabilityStatus::Jackpot),
            "warning" => Ok(ProfitabilityStatus::Warning),
            "thin" => Ok(ProfitabilityStatus::Thin),
            "no-bueno" | "no_bueno" | "nobueno" | "no bueno" => Ok(ProfitabilityStatus::NoBueno),
            other => Err(CoreError::InvalidInput(
                "status".to_string(),
                format!("unknown status '{}'", other),
            )),
        }
    }
}
