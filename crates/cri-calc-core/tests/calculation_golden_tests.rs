//! Golden tests for the CRI and bolus engines.
//!
//! These tests verify preparation volumes against hand-checked cases.

use cri_calc_core::calc::{calculate_bolus, calculate_cri, InputField};
use cri_calc_core::models::{
    BolusInput, CalcWarning, CriInput, Delivery, Dose, DoseUnit, StockConcentration,
};

/// CRI test case.
struct CriGoldenCase {
    id: &'static str,
    dose: f64,
    unit: DoseUnit,
    weight_kg: f64,
    stock: StockConcentration,
    vehicle_volume_ml: f64,
    delivery: Delivery,
    expected_rate: f64,
    expected_drug_volume: f64,
    tolerance: f64,
}

fn get_cri_cases() -> Vec<CriGoldenCase> {
    vec![
        CriGoldenCase {
            id: "mg-per-hour-syringe",
            dose: 0.5,
            unit: DoseUnit::MgPerKgPerHour,
            weight_kg: 5.5,
            stock: StockConcentration::mg_per_ml(100.0),
            vehicle_volume_ml: 60.0,
            delivery: Delivery::PumpRate(5.0),
            expected_rate: 5.0,
            expected_drug_volume: 0.33,
            tolerance: 0.01,
        },
        CriGoldenCase {
            id: "mcg-per-hour-mcg-stock",
            dose: 5.0,
            unit: DoseUnit::McgPerKgPerHour,
            weight_kg: 5.5,
            stock: StockConcentration::mcg_per_ml(50.0),
            vehicle_volume_ml: 60.0,
            delivery: Delivery::PumpRate(5.0),
            expected_rate: 5.0,
            expected_drug_volume: 6.6,
            tolerance: 0.05,
        },
        CriGoldenCase {
            id: "mcg-per-minute-bag",
            dose: 2.0,
            unit: DoseUnit::McgPerKgPerMin,
            weight_kg: 20.0,
            stock: StockConcentration::mg_per_ml(100.0),
            vehicle_volume_ml: 500.0,
            delivery: Delivery::PumpRate(10.0),
            expected_rate: 10.0,
            expected_drug_volume: 1.2,
            tolerance: 1e-9,
        },
        CriGoldenCase {
            id: "rate-from-duration",
            dose: 0.5,
            unit: DoseUnit::MgPerKgPerHour,
            weight_kg: 5.5,
            stock: StockConcentration::mg_per_ml(100.0),
            vehicle_volume_ml: 60.0,
            delivery: Delivery::Duration(12.0),
            expected_rate: 5.0,
            expected_drug_volume: 0.33,
            tolerance: 0.01,
        },
        CriGoldenCase {
            id: "mg-per-day",
            dose: 24.0,
            unit: DoseUnit::MgPerKgPerDay,
            weight_kg: 10.0,
            stock: StockConcentration::mg_per_ml(50.0),
            vehicle_volume_ml: 50.0,
            delivery: Delivery::PumpRate(2.0),
            expected_rate: 2.0,
            expected_drug_volume: 5.0,
            tolerance: 1e-9,
        },
    ]
}

/// Bolus test case.
struct BolusGoldenCase {
    id: &'static str,
    dose: f64,
    unit: DoseUnit,
    weight_kg: f64,
    stock: StockConcentration,
    final_volume_ml: Option<f64>,
    expected_total_mg: f64,
    expected_drug_volume: f64,
    expected_diluent: Option<f64>,
}

fn get_bolus_cases() -> Vec<BolusGoldenCase> {
    vec![
        BolusGoldenCase {
            id: "undiluted",
            dose: 2.0,
            unit: DoseUnit::MgPerKg,
            weight_kg: 5.0,
            stock: StockConcentration::mg_per_ml(20.0),
            final_volume_ml: None,
            expected_total_mg: 10.0,
            expected_drug_volume: 0.5,
            expected_diluent: None,
        },
        BolusGoldenCase {
            id: "diluted-to-10ml",
            dose: 2.0,
            unit: DoseUnit::MgPerKg,
            weight_kg: 5.0,
            stock: StockConcentration::mg_per_ml(20.0),
            final_volume_ml: Some(10.0),
            expected_total_mg: 10.0,
            expected_drug_volume: 0.5,
            expected_diluent: Some(9.5),
        },
        BolusGoldenCase {
            id: "mcg-per-kg",
            dose: 10.0,
            unit: DoseUnit::McgPerKg,
            weight_kg: 20.0,
            stock: StockConcentration::mg_per_ml(0.5),
            final_volume_ml: None,
            expected_total_mg: 0.2,
            expected_drug_volume: 0.4,
            expected_diluent: None,
        },
    ]
}

#[test]
fn test_cri_golden_cases() {
    for case in get_cri_cases() {
        let input = CriInput {
            dose: Dose::new(case.dose, case.unit),
            weight_kg: case.weight_kg,
            stock: case.stock,
            vehicle_volume_ml: case.vehicle_volume_ml,
            delivery: case.delivery,
        };

        let result = calculate_cri(&input)
            .unwrap_or_else(|e| panic!("Case {}: unexpected error {}", case.id, e));

        assert!(
            (result.pump_rate_ml_per_hour - case.expected_rate).abs() < 1e-9,
            "Case {}: rate mismatch - expected {}, got {}",
            case.id, case.expected_rate, result.pump_rate_ml_per_hour
        );
        assert!(
            (result.drug_volume_ml - case.expected_drug_volume).abs() < case.tolerance,
            "Case {}: drug volume mismatch - expected {}, got {}",
            case.id, case.expected_drug_volume, result.drug_volume_ml
        );
        assert!(
            (result.drug_volume_ml + result.diluent_volume_ml - case.vehicle_volume_ml).abs()
                < 1e-9,
            "Case {}: volumes do not add up to the vehicle", case.id
        );
        assert!(result.warnings.is_empty(), "Case {}: unexpected warnings", case.id);
    }
}

#[test]
fn test_bolus_golden_cases() {
    for case in get_bolus_cases() {
        let input = BolusInput {
            dose: Dose::new(case.dose, case.unit),
            weight_kg: case.weight_kg,
            stock: case.stock,
            final_volume_ml: case.final_volume_ml,
        };

        let result = calculate_bolus(&input)
            .unwrap_or_else(|e| panic!("Case {}: unexpected error {}", case.id, e));

        assert!(
            (result.total_dose_mg - case.expected_total_mg).abs() < 1e-9,
            "Case {}: total dose mismatch - expected {}, got {}",
            case.id, case.expected_total_mg, result.total_dose_mg
        );
        assert!(
            (result.drug_volume_ml - case.expected_drug_volume).abs() < 1e-9,
            "Case {}: drug volume mismatch - expected {}, got {}",
            case.id, case.expected_drug_volume, result.drug_volume_ml
        );
        match (result.diluent_volume_ml, case.expected_diluent) {
            (Some(actual), Some(expected)) => assert!(
                (actual - expected).abs() < 1e-9,
                "Case {}: diluent mismatch - expected {}, got {}",
                case.id, expected, actual
            ),
            (actual, expected) => {
                assert_eq!(actual, expected, "Case {}: diluent mismatch", case.id)
            }
        }
    }
}

#[test]
fn test_invalid_inputs_are_rejected() {
    let base = CriInput {
        dose: Dose::new(0.5, DoseUnit::MgPerKgPerHour),
        weight_kg: 5.5,
        stock: StockConcentration::mg_per_ml(100.0),
        vehicle_volume_ml: 60.0,
        delivery: Delivery::PumpRate(5.0),
    };

    let cases = [
        (
            "zero stock",
            CriInput {
                stock: StockConcentration::mg_per_ml(0.0),
                ..base.clone()
            },
            InputField::StockConcentration,
        ),
        (
            "negative vehicle",
            CriInput {
                vehicle_volume_ml: -1.0,
                ..base.clone()
            },
            InputField::VehicleVolume,
        ),
        (
            "infinite weight",
            CriInput {
                weight_kg: f64::INFINITY,
                ..base.clone()
            },
            InputField::Weight,
        ),
        (
            "zero pump rate",
            CriInput {
                delivery: Delivery::PumpRate(0.0),
                ..base.clone()
            },
            InputField::PumpRate,
        ),
    ];

    for (id, input, field) in cases {
        let err = calculate_cri(&input).expect_err(id);
        assert_eq!(err.field(), Some(field), "Case {}: wrong field", id);
    }

    let bolus = BolusInput {
        dose: Dose::new(2.0, DoseUnit::MgPerKg),
        weight_kg: 5.0,
        stock: StockConcentration::mg_per_ml(20.0),
        final_volume_ml: Some(0.0),
    };
    assert_eq!(
        calculate_bolus(&bolus).unwrap_err().field(),
        Some(InputField::FinalVolume)
    );
}

#[test]
fn test_bolus_final_volume_below_drug_volume_warns() {
    let input = BolusInput {
        dose: Dose::new(2.0, DoseUnit::MgPerKg),
        weight_kg: 5.0,
        stock: StockConcentration::mg_per_ml(20.0),
        final_volume_ml: Some(0.2),
    };

    let result = calculate_bolus(&input).unwrap();
    assert_eq!(result.drug_volume_ml, 0.5);
    assert!(result
        .warnings
        .iter()
        .any(|w| matches!(w, CalcWarning::FinalVolumeBelowDrugVolume { .. })));
}
