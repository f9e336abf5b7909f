//! Numeric formatting and parsing.
//!
//! Rounding happens only here, at the output boundary. Calculations keep
//! full precision internally.

mod parse;

pub use parse::*;

use serde::{Deserialize, Serialize};

/// Semantic category of a displayed quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueCategory {
    Volume,
    Dose,
    Concentration,
    Rate,
    Weight,
}

/// Display precision and decimal separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub volume_places: u8,
    pub dose_places: u8,
    pub concentration_places: u8,
    pub rate_places: u8,
    pub weight_places: u8,
    pub decimal_separator: char,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            volume_places: 2,
            dose_places: 3,
            concentration_places: 4,
            rate_places: 1,
            weight_places: 1,
            decimal_separator: ',',
        }
    }
}

impl FormatConfig {
    /// Load a config from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Decimal places for a category.
    pub fn places(&self, category: ValueCategory) -> u8 {
        match category {
            ValueCategory::Volume => self.volume_places,
            ValueCategory::Dose => self.dose_places,
            ValueCategory::Concentration => self.concentration_places,
            ValueCategory::Rate => self.rate_places,
            ValueCategory::Weight => self.weight_places,
        }
    }

    /// Round half away from zero to the category's places.
    ///
    /// Non-finite values round to 0.
    pub fn round(&self, value: f64, category: ValueCategory) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }
        let factor = 10f64.powi(i32::from(self.places(category)));
        let scaled = value * factor;
        if !scaled.is_finite() {
            return value;
        }
        let rounded = scaled.round() / factor;
        // Avoid rendering "-0,00"
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    }

    /// Round, then render with exactly the category's places.
    pub fn format(&self, value: f64, category: ValueCategory) -> String {
        let places = usize::from(self.places(category));
        let text = format!("{:.*}", places, self.round(value, category));
        if self.decimal_separator == '.' {
            text
        } else {
            text.replace('.', &self.decimal_separator.to_string())
        }
    }
}

/// Round with the default precision table.
pub fn round_for(value: f64, category: ValueCategory) -> f64 {
    FormatConfig::default().round(value, category)
}

/// Render with the default precision table and a decimal comma.
pub fn format_for_display(value: f64, category: ValueCategory) -> String {
    FormatConfig::default().format(value, category)
}
