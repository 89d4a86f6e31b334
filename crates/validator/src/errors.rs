use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A validated field of a `JobInput`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    JobName,
    RetailPrice,
    JobCost,
    DivisionOverheadPct,
    CompanyOverheadPct,
    RoyaltyPct,
    TargetNetProfitPct,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::JobName => "job_name",
            Field::RetailPrice => "retail_price",
            Field::JobCost => "job_cost",
            Field::DivisionOverheadPct => "division_overhead_pct",
            Field::CompanyOverheadPct => "company_overhead_pct",
            Field::RoyaltyPct => "royalty_pct",
            Field::TargetNetProfitPct => "target_net_profit_pct",
        }
    }

    /// Human-readable name used at the start of messages.
    pub fn label(&self) -> &'static str {
        match self {
            Field::JobName => "Job name",
            Field::RetailPrice => "Retail price",
            Field::JobCost => "Job cost",
            Field::DivisionOverheadPct => "Division overhead",
            Field::CompanyOverheadPct => "Company overhead",
            Field::RoyaltyPct => "Royalty",
            Field::TargetNetProfitPct => "Target net profit",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every problem found in one input, keyed by field.
///
/// This is returned as data, never raised: an empty set means the input is
/// valid. A field can carry more than one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of messages across all fields.
    pub fn len(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn get(&self, field: Field) -> &[String] {
        self.errors.get(&field).map_or(&[], Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.keys().copied()
    }

    /// Every `(field, message)` pair, in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.errors
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| (*field, m.as_str())))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", field, message)?;
        }
        Ok(())
    }
}
