use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WeatherError;

/// A trimmed, non-empty location string: a place name, postal code or `"lat,lon"` pair.
///
/// Validity beyond that is up to the weather service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query(String);

impl Query {
    pub fn parse(text: &str) -> Result<Self, WeatherError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(WeatherError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Coordinates> for Query {
    fn from(coords: Coordinates) -> Self {
        Self(coords.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Condition text plus the provider-hosted icon reference, passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    pub icon: String,
}

impl Condition {
    /// The icon reference with a scheme; the provider sends protocol-relative URLs.
    pub fn icon_url(&self) -> String {
        if self.icon.starts_with("//") {
            format!("https:{}", self.icon)
        } else {
            self.icon.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
}

/// Present-moment snapshot. Temperatures are Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_kph: f64,
    pub condition: Condition,
    pub is_day: bool,
    pub observed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourSample {
    pub time: NaiveDateTime,
    pub temperature_c: f64,
    pub condition: Condition,
    pub chance_of_rain_pct: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub condition: Condition,
    /// `None` when the sun does not rise (or set) that day.
    pub sunrise: Option<NaiveTime>,
    pub sunset: Option<NaiveTime>,
    pub chance_of_rain_pct: u8,
    /// Chronological, one sample per hour of the day.
    pub hours: Vec<HourSample>,
}

/// A complete lookup result. Replaced wholesale by the next successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub location: Location,
    pub current: CurrentConditions,
    /// Index 0 is today.
    pub days: Vec<ForecastDay>,
}

/// Result of the current-only endpoint: no daily or hourly data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentReport {
    pub location: Location,
    pub current: CurrentConditions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Unit {
    pub fn toggled(self) -> Self {
        match self {
            Unit::Celsius => Unit::Fahrenheit,
            Unit::Fahrenheit => Unit::Celsius,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Guess the terminal's preference from a `COLORFGBG` value such as `"15;0"`.
    ///
    /// The last field is the background palette index; 0-6 and 8 are dark backgrounds.
    pub fn from_colorfgbg(value: &str) -> Option<Self> {
        let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        match bg {
            0..=6 | 8 => Some(Theme::Dark),
            _ => Some(Theme::Light),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_trimmed() {
        let q = Query::parse("  Paris \n").expect("non-empty query");
        assert_eq!(q.as_str(), "Paris");
    }

    #[test]
    fn blank_query_is_rejected() {
        assert_eq!(Query::parse("").unwrap_err(), WeatherError::EmptyQuery);
        assert_eq!(Query::parse(" \t ").unwrap_err(), WeatherError::EmptyQuery);
    }

    #[test]
    fn coordinates_become_lat_lon_query() {
        let q = Query::from(Coordinates { latitude: 48.8567, longitude: 2.3508 });
        assert_eq!(q.as_str(), "48.8567,2.3508");
    }

    #[test]
    fn protocol_relative_icon_gets_https() {
        let c = Condition {
            text: "Sunny".into(),
            icon: "//cdn.weatherapi.com/weather/64x64/day/113.png".into(),
        };
        assert_eq!(c.icon_url(), "https://cdn.weatherapi.com/weather/64x64/day/113.png");
    }

    #[test]
    fn colorfgbg_hint() {
        assert_eq!(Theme::from_colorfgbg("15;0"), Some(Theme::Dark));
        assert_eq!(Theme::from_colorfgbg("0;15"), Some(Theme::Light));
        assert_eq!(Theme::from_colorfgbg("garbage"), None);
    }

    #[test]
    fn toggles_flip() {
        assert_eq!(Unit::Celsius.toggled(), Unit::Fahrenheit);
        assert_eq!(Unit::Fahrenheit.toggled().toggled(), Unit::Fahrenheit);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }
}
