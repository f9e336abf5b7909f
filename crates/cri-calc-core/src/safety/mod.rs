//! Clinical-safety annotations: dose ranges and carrier fluid compatibility.
//!
//! Both checks are advisory. They never block or alter a calculated volume.

mod compatibility;
mod range;

pub use compatibility::*;
pub use range::*;

use tracing::debug;

use crate::calc::{calculate_bolus, calculate_cri, CalcResult};
use crate::models::{
    BolusAssessment, BolusInput, CriAssessment, CriInput, DrugReference, Vehicle,
};

/// Calculate a CRI for a reference drug and annotate it.
///
/// The vehicle's volume replaces `input.vehicle_volume_ml`. Bag vehicles
/// get a compatibility verdict for their carrier fluid; syringes get none.
pub fn assess_cri(
    drug: &DrugReference,
    input: &CriInput,
    vehicle: &Vehicle,
) -> CalcResult<CriAssessment> {
    let input = CriInput {
        vehicle_volume_ml: vehicle.volume_ml(),
        ..input.clone()
    };
    let result = calculate_cri(&input)?;
    let range = classify_dose(input.dose.value, input.dose.unit, &drug.cri_ranges);
    let compatibility = vehicle
        .fluid()
        .map(|fluid| check_fluid_compatibility(Some(fluid), drug.compatibility.as_ref()));

    debug!(
        drug = %drug.name,
        range = ?range.level,
        compatibility = ?compatibility.as_ref().map(|c| c.level),
        "CRI assessed"
    );

    Ok(CriAssessment {
        drug: drug.name.clone(),
        result,
        range,
        compatibility,
    })
}

/// Calculate a bolus for a reference drug and annotate it with its range.
pub fn assess_bolus(drug: &DrugReference, input: &BolusInput) -> CalcResult<BolusAssessment> {
    let result = calculate_bolus(input)?;
    let range = classify_dose(input.dose.value, input.dose.unit, &drug.bolus_ranges);

    debug!(drug = %drug.name, range = ?range.level, "Bolus assessed");

    Ok(BolusAssessment {
        drug: drug.name.clone(),
        result,
        range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CompatibilityLevel, CompatibilityProfile, Delivery, Dose, DoseRange, DoseUnit, FluidType,
        RangeLevel, StockConcentration,
    };

    fn ketamine() -> DrugReference {
        let mut drug = DrugReference::new("Ketamine");
        drug.stocks = vec![StockConcentration::mg_per_ml(100.0)];
        drug.cri_ranges = vec![DoseRange::new(2.0, 10.0, DoseUnit::McgPerKgPerMin).unwrap()];
        drug.bolus_ranges = vec![DoseRange::new(0.5, 2.0, DoseUnit::MgPerKg).unwrap()];
        let mut profile = CompatibilityProfile::new(FluidType::Saline);
        profile.compatible = vec![FluidType::LactatedRingers];
        profile.avoid = vec![FluidType::SterileWater];
        drug.compatibility = Some(profile);
        drug
    }

    fn cri_input() -> CriInput {
        CriInput {
            dose: Dose::new(0.3, DoseUnit::MgPerKgPerHour),
            weight_kg: 20.0,
            stock: StockConcentration::mg_per_ml(100.0),
            vehicle_volume_ml: 0.0,
            delivery: Delivery::PumpRate(10.0),
        }
    }

    #[test]
    fn test_assess_cri_bag() {
        let vehicle = Vehicle::Bag {
            volume_ml: 500.0,
            fluid: FluidType::LactatedRingers,
        };

        let assessment = assess_cri(&ketamine(), &cri_input(), &vehicle).unwrap();
        assert_eq!(assessment.drug, "Ketamine");
        assert_eq!(assessment.result.vehicle_volume_ml, 500.0);
        // 0.3 mg/kg/h = 5 mcg/kg/min
        assert_eq!(assessment.range.level, RangeLevel::Within);
        assert_eq!(
            assessment.compatibility.map(|c| c.level),
            Some(CompatibilityLevel::Caution)
        );
    }

    #[test]
    fn test_assess_cri_syringe_has_no_fluid_verdict() {
        let vehicle = Vehicle::Syringe { volume_ml: 60.0 };

        let assessment = assess_cri(&ketamine(), &cri_input(), &vehicle).unwrap();
        assert!(assessment.compatibility.is_none());
        assert!((assessment.result.drug_volume_ml - 0.36).abs() < 1e-9);
    }

    #[test]
    fn test_assess_cri_rejects_empty_vehicle() {
        let vehicle = Vehicle::Syringe { volume_ml: 0.0 };
        assert!(assess_cri(&ketamine(), &cri_input(), &vehicle).is_err());
    }

    #[test]
    fn test_assess_bolus() {
        let input = BolusInput {
            dose: Dose::new(3.0, DoseUnit::MgPerKg),
            weight_kg: 10.0,
            stock: StockConcentration::mg_per_ml(100.0),
            final_volume_ml: None,
        };

        let assessment = assess_bolus(&ketamine(), &input).unwrap();
        assert_eq!(assessment.range.level, RangeLevel::Above);
        assert!((assessment.result.drug_volume_ml - 0.3).abs() < 1e-12);
    }
}
