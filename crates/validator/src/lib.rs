//! # Input Validator
//!
//! Checks a raw `JobInput` against the domain rules before it may be saved.
//! Every rule runs; nothing short-circuits, so a form can show all of its
//! problems at once. Validation never gates the live metrics preview, only
//! persistence.

pub mod errors;

pub use errors::{Field, ValidationErrors};

use core_types::{FieldValue, JobInput};
use rust_decimal::Decimal;

/// Validates `input`, collecting every error. An empty result means valid.
pub fn validate(input: &JobInput) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if input.trimmed_name().is_empty() {
        errors.add(Field::JobName, "Job name is required");
    }

    let retail = required_number(&mut errors, Field::RetailPrice, &input.retail_price);
    if let Some(retail) = retail {
        if retail <= Decimal::ZERO {
            errors.add(Field::RetailPrice, "Retail price must be greater than 0");
        }
    }

    if let Some(cost) = required_number(&mut errors, Field::JobCost, &input.job_cost) {
        if cost < Decimal::ZERO {
            errors.add(Field::JobCost, "Job cost cannot be negative");
        }
        if let Some(retail) = retail {
            if cost > retail {
                errors.add(Field::JobCost, "Job cost cannot exceed retail price");
            }
        }
    }

    for (field, value) in [
        (Field::DivisionOverheadPct, &input.division_overhead_pct),
        (Field::CompanyOverheadPct, &input.company_overhead_pct),
        (Field::RoyaltyPct, &input.royalty_pct),
    ] {
        if let Some(pct) = required_number(&mut errors, field, value) {
            if pct < Decimal::ZERO {
                errors.add(field, format!("{} cannot be negative", field.label()));
            }
        }
    }

    let target = required_number(
        &mut errors,
        Field::TargetNetProfitPct,
        &input.target_net_profit_pct,
    );
    if let Some(target) = target {
        if target < Decimal::ZERO {
            errors.add(Field::TargetNetProfitPct, "Target net profit cannot be negative");
        }
        if target >= Decimal::ONE_HUNDRED {
            errors.add(Field::TargetNetProfitPct, "Target net profit must be less than 100%");
        }
    }

    errors
}

/// Records a "required" or "must be a number" error and returns the number
/// when there is one.
fn required_number(
    errors: &mut ValidationErrors,
    field: Field,
    value: &FieldValue,
) -> Option<Decimal> {
    match value {
        FieldValue::Number(number) => Some(*number),
        FieldValue::Blank => {
            errors.add(field, format!("{} is required", field.label()));
            None
        }
        FieldValue::Text(_) => {
            errors.add(field, format!("{} must be a number", field.label()));
            None
        }
    }
}
