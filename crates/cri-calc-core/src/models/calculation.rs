//! Calculation inputs and results.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Dose, StockConcentration};
use crate::format::{round_for, ValueCategory};

/// How the pump rate of a CRI is determined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// Explicit pump rate in mL/h
    PumpRate(f64),
    /// Duration in hours; rate = vehicle volume / duration
    Duration(f64),
}

/// Input for a continuous rate infusion calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriInput {
    pub dose: Dose,
    pub weight_kg: f64,
    pub stock: StockConcentration,
    pub vehicle_volume_ml: f64,
    pub delivery: Delivery,
}

/// Input for a bolus calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BolusInput {
    pub dose: Dose,
    pub weight_kg: f64,
    pub stock: StockConcentration,
    /// Dilute the drug to this total volume
    #[serde(default)]
    pub final_volume_ml: Option<f64>,
}

/// One line of the human-readable derivation trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivationStep {
    pub label: String,
    pub formula: String,
    pub example: String,
}

impl DerivationStep {
    pub fn new(
        label: impl Into<String>,
        formula: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            formula: formula.into(),
            example: example.into(),
        }
    }
}

/// Physically impossible but well-formed outcome, reported alongside the
/// computed numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalcWarning {
    NegativeDrugVolume { drug_volume_ml: f64 },
    DrugVolumeExceedsVehicle { drug_volume_ml: f64, vehicle_volume_ml: f64 },
    NegativeDiluentVolume { diluent_volume_ml: f64 },
    FinalVolumeBelowDrugVolume { drug_volume_ml: f64, final_volume_ml: f64 },
}

impl fmt::Display for CalcWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcWarning::NegativeDrugVolume { drug_volume_ml } => write!(
                f,
                "Computed drug volume is negative ({:.2} mL); check the inputs",
                drug_volume_ml
            ),
            CalcWarning::DrugVolumeExceedsVehicle {
                drug_volume_ml,
                vehicle_volume_ml,
            } => write!(
                f,
                "Drug volume ({:.2} mL) exceeds the vehicle volume ({:.2} mL)",
                drug_volume_ml, vehicle_volume_ml
            ),
            CalcWarning::NegativeDiluentVolume { diluent_volume_ml } => write!(
                f,
                "Diluent volume is negative ({:.2} mL); the stock is too dilute for this rate",
                diluent_volume_ml
            ),
            CalcWarning::FinalVolumeBelowDrugVolume {
                drug_volume_ml,
                final_volume_ml,
            } => write!(
                f,
                "Final volume ({:.2} mL) is smaller than the drug volume ({:.2} mL); dilution is impossible",
                final_volume_ml, drug_volume_ml
            ),
        }
    }
}

/// Result of a CRI calculation, at full precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriResult {
    /// Dose normalized to mcg/kg/h
    pub dose_mcg_per_kg_per_hour: f64,
    pub mass_mg_per_hour: f64,
    pub required_conc_mg_per_ml: f64,
    /// Concentration actually achieved by the drug volume in the vehicle
    pub final_conc_mg_per_ml: f64,
    pub pump_rate_ml_per_hour: f64,
    pub vehicle_volume_ml: f64,
    pub drug_volume_ml: f64,
    pub diluent_volume_ml: f64,
    pub steps: Vec<DerivationStep>,
    pub warnings: Vec<CalcWarning>,
}

impl CriResult {
    /// Copy with every quantity rounded for display.
    pub fn rounded(&self) -> Self {
        Self {
            dose_mcg_per_kg_per_hour: round_for(self.dose_mcg_per_kg_per_hour, ValueCategory::Dose),
            mass_mg_per_hour: round_for(self.mass_mg_per_hour, ValueCategory::Dose),
            required_conc_mg_per_ml: round_for(
                self.required_conc_mg_per_ml,
                ValueCategory::Concentration,
            ),
            final_conc_mg_per_ml: round_for(
                self.final_conc_mg_per_ml,
                ValueCategory::Concentration,
            ),
            pump_rate_ml_per_hour: round_for(self.pump_rate_ml_per_hour, ValueCategory::Rate),
            vehicle_volume_ml: round_for(self.vehicle_volume_ml, ValueCategory::Volume),
            drug_volume_ml: round_for(self.drug_volume_ml, ValueCategory::Volume),
            diluent_volume_ml: round_for(self.diluent_volume_ml, ValueCategory::Volume),
            steps: self.steps.clone(),
            warnings: self.warnings.clone(),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Result of a bolus calculation, at full precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BolusResult {
    /// Dose normalized to mg/kg
    pub dose_mg_per_kg: f64,
    pub total_dose_mg: f64,
    pub drug_volume_ml: f64,
    pub final_volume_ml: Option<f64>,
    pub diluent_volume_ml: Option<f64>,
    pub steps: Vec<DerivationStep>,
    pub warnings: Vec<CalcWarning>,
}

impl BolusResult {
    /// Copy with every quantity rounded for display.
    pub fn rounded(&self) -> Self {
        Self {
            dose_mg_per_kg: round_for(self.dose_mg_per_kg, ValueCategory::Dose),
            total_dose_mg: round_for(self.total_dose_mg, ValueCategory::Dose),
            drug_volume_ml: round_for(self.drug_volume_ml, ValueCategory::Volume),
            final_volume_ml: self
                .final_volume_ml
                .map(|v| round_for(v, ValueCategory::Volume)),
            diluent_volume_ml: self
                .diluent_volume_ml
                .map(|v| round_for(v, ValueCategory::Volume)),
            steps: self.steps.clone(),
            warnings: self.warnings.clone(),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_messages() {
        let warning = CalcWarning::DrugVolumeExceedsVehicle {
            drug_volume_ml: 72.5,
            vehicle_volume_ml: 60.0,
        };
        assert_eq!(
            warning.to_string(),
            "Drug volume (72.50 mL) exceeds the vehicle volume (60.00 mL)"
        );

        let warning = CalcWarning::FinalVolumeBelowDrugVolume {
            drug_volume_ml: 5.0,
            final_volume_ml: 2.0,
        };
        assert!(warning.to_string().contains("dilution is impossible"));
    }

    #[test]
    fn test_bolus_rounded() {
        let result = BolusResult {
            dose_mg_per_kg: 0.123456,
            total_dose_mg: 1.23456,
            drug_volume_ml: 0.12345,
            final_volume_ml: Some(10.0),
            diluent_volume_ml: Some(9.87655),
            steps: vec![],
            warnings: vec![],
        };

        let rounded = result.rounded();
        assert_eq!(rounded.dose_mg_per_kg, 0.123);
        assert_eq!(rounded.total_dose_mg, 1.235);
        assert_eq!(rounded.drug_volume_ml, 0.12);
        assert_eq!(rounded.diluent_volume_ml, Some(9.88));
        assert!(!rounded.has_warnings());
    }

    #[test]
    fn test_delivery_serde() {
        let delivery: Delivery = serde_json::from_str(r#"{"pump_rate": 5.0}"#).unwrap();
        assert_eq!(delivery, Delivery::PumpRate(5.0));
    }
}
