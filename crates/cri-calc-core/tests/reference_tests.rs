//! Reference data integration tests.

use cri_calc_core::models::{
    BolusInput, CompatibilityLevel, CriInput, Delivery, Dose, DoseUnit, DrugReference, FluidType,
    RangeLevel, StockConcentration, Vehicle,
};
use cri_calc_core::safety::{assess_bolus, assess_cri};

const DRUGS_JSON: &str = include_str!("fixtures/drugs.json");

fn load(name: &str) -> DrugReference {
    DrugReference::list_from_json(DRUGS_JSON)
        .unwrap()
        .into_iter()
        .find(|d| d.name == name)
        .unwrap()
}

#[test]
fn test_fixture_loads() {
    let drugs = DrugReference::list_from_json(DRUGS_JSON).unwrap();
    assert_eq!(drugs.len(), 3);

    let fentanyl = &drugs[1];
    assert_eq!(fentanyl.stocks[0].label.as_deref(), Some("50 mcg/mL ampoule"));
    assert_eq!(fentanyl.cri_ranges.len(), 2);

    let insulin = &drugs[2];
    assert!(insulin.compatibility.is_none());
    assert!(insulin.bolus_ranges.is_empty());
    assert!(insulin.cri_ranges[0].unit.is_unit_based());
}

#[test]
fn test_ketamine_cri_in_bag() {
    let ketamine = load("Ketamine");
    let input = CriInput {
        dose: Dose::new(0.3, DoseUnit::MgPerKgPerHour),
        weight_kg: 20.0,
        stock: ketamine.stocks[0].clone(),
        vehicle_volume_ml: 0.0,
        delivery: Delivery::Duration(24.0),
    };
    let vehicle = Vehicle::Bag {
        volume_ml: 500.0,
        fluid: FluidType::Saline,
    };

    let assessment = assess_cri(&ketamine, &input, &vehicle).unwrap();
    // 0.3 mg/kg/h = 5 mcg/kg/min
    assert_eq!(assessment.range.level, RangeLevel::Within);
    assert!(assessment.range.message.contains("analgesia"));

    let compatibility = assessment.compatibility.unwrap();
    assert_eq!(compatibility.level, CompatibilityLevel::Compatible);

    // 6 mg/h over a 500 mL bag running 24 h
    let result = assessment.result;
    assert!((result.mass_mg_per_hour - 6.0).abs() < 1e-9);
    assert!((result.drug_volume_ml - 1.44).abs() < 1e-9);
}

#[test]
fn test_fentanyl_prefers_range_in_same_unit() {
    let fentanyl = load("Fentanyl");
    let input = CriInput {
        dose: Dose::new(0.2, DoseUnit::McgPerKgPerMin),
        weight_kg: 10.0,
        stock: fentanyl.stocks[0].clone(),
        vehicle_volume_ml: 0.0,
        delivery: Delivery::PumpRate(5.0),
    };
    let vehicle = Vehicle::Bag {
        volume_ml: 250.0,
        fluid: FluidType::SterileWater,
    };

    let assessment = assess_cri(&fentanyl, &input, &vehicle).unwrap();
    assert_eq!(assessment.range.level, RangeLevel::Above);
    assert_eq!(assessment.range.unit, Some(DoseUnit::McgPerKgPerMin));

    let compatibility = assessment.compatibility.unwrap();
    assert_eq!(compatibility.level, CompatibilityLevel::Incompatible);
    assert!(compatibility.reason.ends_with("Protect from light"));
}

#[test]
fn test_bolus_without_declared_range_is_unknown() {
    let insulin = load("Insulin (regular)");
    let input = BolusInput {
        dose: Dose::new(0.1, DoseUnit::UnitsPerKg),
        weight_kg: 4.0,
        stock: StockConcentration::mg_per_ml(100.0),
        final_volume_ml: None,
    };

    let assessment = assess_bolus(&insulin, &input).unwrap();
    assert_eq!(assessment.range.level, RangeLevel::Unknown);
    assert!((assessment.result.drug_volume_ml - 0.004).abs() < 1e-12);
}

#[test]
fn test_invalid_records_rejected() {
    let inverted = r#"[{"name": "X", "cri_ranges": [{"min": 5, "max": 1, "unit": "mg/kg/h"}]}]"#;
    assert!(DrugReference::list_from_json(inverted).is_err());

    let avoided = r#"[{"name": "X", "compatibility": {"preferred": "D5W", "avoid": ["D5W"]}}]"#;
    assert!(DrugReference::list_from_json(avoided).is_err());

    let unknown_unit = r#"[{"name": "X", "cri_ranges": [{"min": 1, "max": 2, "unit": "mg/lb/h"}]}]"#;
    assert!(DrugReference::list_from_json(unknown_unit).is_err());
}
