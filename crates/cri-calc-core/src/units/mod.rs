//! Dose unit conversion.
//!
//! Every unit converts through its family's base unit: mg/kg/h for CRI
//! units and mg/kg for bolus units. Activity units (U, mU) are scaled as if
//! 1 U = 1 mg; see [`DoseUnit::is_unit_based`].

mod labels;

pub use labels::*;

use thiserror::Error;

use crate::models::{DoseUnit, UnitFamily};

/// Unit conversion errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    #[error("Unsupported unit '{label}'{}", suggestion_suffix(.suggestion))]
    Unknown {
        label: String,
        suggestion: Option<String>,
    },

    #[error("Unknown carrier fluid '{label}'{}", suggestion_suffix(.suggestion))]
    UnknownFluid {
        label: String,
        suggestion: Option<String>,
    },

    #[error("Cannot convert {from} ({from_family}) to {to} ({to_family})")]
    CrossFamily {
        from: DoseUnit,
        from_family: UnitFamily,
        to: DoseUnit,
        to_family: UnitFamily,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{}'?)", s))
        .unwrap_or_default()
}

pub type UnitResult<T> = Result<T, UnitError>;

/// Multiplier from `unit` to its family's base unit.
pub fn base_factor(unit: DoseUnit) -> f64 {
    match unit {
        // 1 mcg/kg/min = 60 mcg/kg/h = 0.06 mg/kg/h
        DoseUnit::McgPerKgPerMin => 0.06,
        DoseUnit::McgPerKgPerHour => 0.001,
        DoseUnit::MgPerKgPerMin => 60.0,
        DoseUnit::MgPerKgPerHour => 1.0,
        DoseUnit::MgPerKgPerDay => 1.0 / 24.0,
        DoseUnit::UnitsPerKgPerHour => 1.0,
        DoseUnit::MilliunitsPerKgPerMin => 0.06,
        DoseUnit::McgPerKg => 0.001,
        DoseUnit::MgPerKg => 1.0,
        DoseUnit::UnitsPerKg => 1.0,
    }
}

/// Convert a value into its family's base unit.
pub fn to_base(value: f64, unit: DoseUnit) -> f64 {
    match unit {
        // Exact divisors keep 24 mg/kg/day and 1000 mcg/kg at exactly 1
        DoseUnit::MgPerKgPerDay => value / 24.0,
        DoseUnit::McgPerKgPerHour | DoseUnit::McgPerKg => value / 1000.0,
        _ => value * base_factor(unit),
    }
}

/// Convert a base-unit value into `unit`.
pub fn from_base(base_value: f64, unit: DoseUnit) -> f64 {
    match unit {
        DoseUnit::MgPerKgPerDay => base_value * 24.0,
        DoseUnit::McgPerKgPerHour | DoseUnit::McgPerKg => base_value * 1000.0,
        _ => base_value / base_factor(unit),
    }
}

/// Convert a dose magnitude between two units of the same family.
pub fn convert(value: f64, from: DoseUnit, to: DoseUnit) -> UnitResult<f64> {
    ensure_same_family(from, to)?;
    if from == to {
        return Ok(value);
    }
    Ok(from_base(to_base(value, from), to))
}

/// Fail unless both units belong to the same family.
pub fn ensure_same_family(from: DoseUnit, to: DoseUnit) -> UnitResult<()> {
    if from.family() != to.family() {
        return Err(UnitError::CrossFamily {
            from,
            from_family: from.family(),
            to,
            to_family: to.family(),
        });
    }
    Ok(())
}

/// Convert a CRI dose to mcg/kg/h.
pub fn to_mcg_per_kg_per_hour(value: f64, unit: DoseUnit) -> UnitResult<f64> {
    convert(value, unit, DoseUnit::McgPerKgPerHour)
}

/// Convert a bolus dose to mg/kg.
pub fn to_mg_per_kg(value: f64, unit: DoseUnit) -> UnitResult<f64> {
    convert(value, unit, DoseUnit::MgPerKg)
}
