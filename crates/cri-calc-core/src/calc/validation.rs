//! Input validation, run before any arithmetic.

use super::{CalcError, CalcResult, InputField};
use crate::models::{BolusInput, CriInput, Delivery, DoseUnit, UnitFamily};
use crate::units::ensure_same_family;

/// Require a finite, strictly positive value.
pub fn ensure_positive(field: InputField, value: f64) -> CalcResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::InvalidInput { field, value })
    }
}

/// Like [`ensure_positive`], for fields that may be omitted.
pub fn ensure_optional_positive(field: InputField, value: Option<f64>) -> CalcResult<Option<f64>> {
    value.map(|v| ensure_positive(field, v)).transpose()
}

/// Require a dose unit of the given family.
pub fn ensure_family(unit: DoseUnit, family: UnitFamily) -> CalcResult<()> {
    let reference = match family {
        UnitFamily::Cri => DoseUnit::MgPerKgPerHour,
        UnitFamily::Bolus => DoseUnit::MgPerKg,
    };
    ensure_same_family(unit, reference)?;
    Ok(())
}

/// Validate every field of a CRI input.
pub fn validate_cri_input(input: &CriInput) -> CalcResult<()> {
    ensure_family(input.dose.unit, UnitFamily::Cri)?;
    ensure_positive(InputField::Dose, input.dose.value)?;
    ensure_positive(InputField::Weight, input.weight_kg)?;
    ensure_positive(InputField::StockConcentration, input.stock.value)?;
    ensure_positive(InputField::VehicleVolume, input.vehicle_volume_ml)?;
    match input.delivery {
        Delivery::PumpRate(rate) => ensure_positive(InputField::PumpRate, rate)?,
        Delivery::Duration(hours) => ensure_positive(InputField::Duration, hours)?,
    };
    Ok(())
}

/// Validate every field of a bolus input.
pub fn validate_bolus_input(input: &BolusInput) -> CalcResult<()> {
    ensure_family(input.dose.unit, UnitFamily::Bolus)?;
    ensure_positive(InputField::Dose, input.dose.value)?;
    ensure_positive(InputField::Weight, input.weight_kg)?;
    ensure_positive(InputField::StockConcentration, input.stock.value)?;
    ensure_optional_positive(InputField::FinalVolume, input.final_volume_ml)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::UnitError;

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive(InputField::Weight, 5.5), Ok(5.5));

        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = ensure_positive(InputField::Weight, bad).unwrap_err();
            assert_eq!(err.field(), Some(InputField::Weight));
        }
    }

    #[test]
    fn test_ensure_optional_positive() {
        assert_eq!(ensure_optional_positive(InputField::FinalVolume, None), Ok(None));
        assert_eq!(
            ensure_optional_positive(InputField::FinalVolume, Some(10.0)),
            Ok(Some(10.0))
        );
        assert!(ensure_optional_positive(InputField::FinalVolume, Some(0.0)).is_err());
    }

    #[test]
    fn test_ensure_family() {
        assert!(ensure_family(DoseUnit::McgPerKgPerMin, UnitFamily::Cri).is_ok());
        assert!(ensure_family(DoseUnit::UnitsPerKg, UnitFamily::Bolus).is_ok());
        assert!(matches!(
            ensure_family(DoseUnit::MgPerKg, UnitFamily::Cri),
            Err(CalcError::UnsupportedUnit(UnitError::CrossFamily { .. }))
        ));
    }
}
