//! Drug reference models: dose ranges and fluid compatibility profiles.
//!
//! The calculation core consumes these as already-normalized input. A single
//! schema is accepted; older record layouts must be migrated before they
//! reach this crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{DoseUnit, FluidType, StockConcentration};

/// Reference data errors.
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Invalid dose range {min}–{max} {unit}: bounds must be finite, non-negative and ordered")]
    InvalidRange { min: f64, max: f64, unit: DoseUnit },

    #[error("Preferred fluid {0} is also listed under avoid")]
    PreferredAvoided(FluidType),

    #[error("Invalid stock concentration: {0}")]
    InvalidStock(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ReferenceResult<T> = Result<T, ReferenceError>;

/// Recommended dose band for a drug in one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseRange {
    pub min: f64,
    pub max: f64,
    pub unit: DoseUnit,
    /// Use-case or species the band applies to (e.g., "analgesia, canine")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indication: Option<String>,
}

impl DoseRange {
    /// Create a validated range.
    pub fn new(min: f64, max: f64, unit: DoseUnit) -> ReferenceResult<Self> {
        let range = Self {
            min,
            max,
            unit,
            indication: None,
        };
        range.validate()?;
        Ok(range)
    }

    /// Check `0 <= min <= max` with finite bounds.
    pub fn validate(&self) -> ReferenceResult<()> {
        let ordered = self.min.is_finite()
            && self.max.is_finite()
            && self.min >= 0.0
            && self.min <= self.max;
        if ordered {
            Ok(())
        } else {
            Err(ReferenceError::InvalidRange {
                min: self.min,
                max: self.max,
                unit: self.unit,
            })
        }
    }

    /// Attach an indication label.
    pub fn with_indication(mut self, indication: impl Into<String>) -> Self {
        self.indication = Some(indication.into());
        self
    }
}

/// Per-drug carrier fluid compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityProfile {
    /// Fluid with maximal stability
    pub preferred: FluidType,
    /// Usable fluids (stability/time/light conditions apply)
    #[serde(default)]
    pub compatible: Vec<FluidType>,
    /// Fluids that must not be used
    #[serde(default)]
    pub avoid: Vec<FluidType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CompatibilityProfile {
    pub fn new(preferred: FluidType) -> Self {
        Self {
            preferred,
            compatible: Vec::new(),
            avoid: Vec::new(),
            notes: None,
        }
    }

    /// The preferred fluid must never be listed under avoid.
    pub fn validate(&self) -> ReferenceResult<()> {
        if self.avoid.contains(&self.preferred) {
            return Err(ReferenceError::PreferredAvoided(self.preferred));
        }
        Ok(())
    }
}

/// Normalized reference record for one drug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugReference {
    pub name: String,
    #[serde(default)]
    pub stocks: Vec<StockConcentration>,
    /// Recommended CRI ranges; the first entry is the preferred one
    #[serde(default)]
    pub cri_ranges: Vec<DoseRange>,
    /// Recommended bolus ranges; the first entry is the preferred one
    #[serde(default)]
    pub bolus_ranges: Vec<DoseRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<CompatibilityProfile>,
}

impl DrugReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stocks: Vec::new(),
            cri_ranges: Vec::new(),
            bolus_ranges: Vec::new(),
            compatibility: None,
        }
    }

    /// Parse and validate a record from JSON.
    pub fn from_json(json: &str) -> ReferenceResult<Self> {
        let drug: DrugReference = serde_json::from_str(json)?;
        drug.validate()?;
        Ok(drug)
    }

    /// Parse and validate a list of records from a JSON array.
    pub fn list_from_json(json: &str) -> ReferenceResult<Vec<Self>> {
        let drugs: Vec<DrugReference> = serde_json::from_str(json)?;
        for drug in &drugs {
            drug.validate()?;
        }
        Ok(drugs)
    }

    /// Check every invariant of the record.
    pub fn validate(&self) -> ReferenceResult<()> {
        for stock in &self.stocks {
            if !(stock.value.is_finite() && stock.value > 0.0) {
                return Err(ReferenceError::InvalidStock(format!(
                    "{}: {} {}",
                    self.name, stock.value, stock.unit
                )));
            }
        }
        for range in self.cri_ranges.iter().chain(&self.bolus_ranges) {
            range.validate()?;
        }
        if let Some(profile) = &self.compatibility {
            profile.validate()?;
        }
        Ok(())
    }
}
