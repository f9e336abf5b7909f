//! CRI and bolus calculation engines.
//!
//! Pipeline: Validation → Unit normalization → Volume math → Warnings
//!
//! Every function here is a pure function of its input. Results are built
//! fresh on each call and carry full precision; use
//! [`CriResult::rounded`](crate::models::CriResult::rounded) or the
//! [`format`](crate::format) helpers for display.

mod bolus;
mod cri;
mod validation;

pub use bolus::*;
pub use cri::*;
pub use validation::*;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::UnitError;

/// Numeric input fields subject to validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Dose,
    Weight,
    StockConcentration,
    VehicleVolume,
    FinalVolume,
    Duration,
    PumpRate,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputField::Dose => "dose",
            InputField::Weight => "weight",
            InputField::StockConcentration => "stock concentration",
            InputField::VehicleVolume => "vehicle volume",
            InputField::FinalVolume => "final volume",
            InputField::Duration => "duration",
            InputField::PumpRate => "pump rate",
        };
        f.write_str(name)
    }
}

/// Calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Invalid {field}: {value} (must be a finite number greater than zero)")]
    InvalidInput { field: InputField, value: f64 },

    #[error(transparent)]
    UnsupportedUnit(#[from] UnitError),
}

impl CalcError {
    /// The offending field, for field-specific messages.
    pub fn field(&self) -> Option<InputField> {
        match self {
            CalcError::InvalidInput { field, .. } => Some(*field),
            CalcError::UnsupportedUnit(_) => None,
        }
    }
}

pub type CalcResult<T> = Result<T, CalcError>;
