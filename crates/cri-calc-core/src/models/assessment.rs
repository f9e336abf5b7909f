//! Clinical-safety annotations attached to calculation results.

use serde::{Deserialize, Serialize};

use super::{BolusResult, CriResult, DoseUnit};

/// Position of a dose relative to the recommended range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeLevel {
    Below,
    Within,
    Above,
    Unknown,
}

impl RangeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RangeLevel::Below => "below",
            RangeLevel::Within => "within",
            RangeLevel::Above => "above",
            RangeLevel::Unknown => "unknown",
        }
    }
}

/// Dose-range classification.
///
/// `min`, `max` and `unit` are the bounds actually compared against,
/// already converted into the candidate's unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeStatus {
    pub level: RangeLevel,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unit: Option<DoseUnit>,
    pub message: String,
}

impl RangeStatus {
    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            level: RangeLevel::Unknown,
            min: None,
            max: None,
            unit: None,
            message: message.into(),
        }
    }

    pub fn is_within(&self) -> bool {
        self.level == RangeLevel::Within
    }
}

/// Fluid compatibility verdict level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityLevel {
    Compatible,
    Caution,
    Incompatible,
}

impl CompatibilityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            CompatibilityLevel::Compatible => "compatible",
            CompatibilityLevel::Caution => "caution",
            CompatibilityLevel::Incompatible => "incompatible",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityVerdict {
    pub level: CompatibilityLevel,
    pub reason: String,
}

/// CRI result annotated with range and carrier fluid verdicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriAssessment {
    pub drug: String,
    pub result: CriResult,
    pub range: RangeStatus,
    /// Present only for bag vehicles
    pub compatibility: Option<CompatibilityVerdict>,
}

/// Bolus result annotated with its range verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BolusAssessment {
    pub drug: String,
    pub result: BolusResult,
    pub range: RangeStatus,
}
