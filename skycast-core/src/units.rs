//! Display-side temperature projection. Stored values are always Celsius.

use crate::model::Unit;

/// Project a Celsius value into `unit`, rounded to the nearest whole degree.
pub fn display_temperature(celsius: f64, unit: Unit) -> i64 {
    let value = match unit {
        Unit::Celsius => celsius,
        Unit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    };
    value.round() as i64
}

/// `display_temperature` with the unit symbol appended, e.g. `"70°F"`.
pub fn format_temperature(celsius: f64, unit: Unit) -> String {
    format!("{}{}", display_temperature(celsius, unit), unit.symbol())
}

/// Coarse bucket of the current temperature, used to tint the conditions panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureBand {
    Freezing,
    Cold,
    Mild,
    Warm,
    Hot,
}

impl TemperatureBand {
    pub fn from_celsius(celsius: f64) -> Self {
        if celsius <= 0.0 {
            TemperatureBand::Freezing
        } else if celsius <= 10.0 {
            TemperatureBand::Cold
        } else if celsius <= 20.0 {
            TemperatureBand::Mild
        } else if celsius <= 30.0 {
            TemperatureBand::Warm
        } else {
            TemperatureBand::Hot
        }
    }
}
