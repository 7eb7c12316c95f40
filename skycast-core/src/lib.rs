//! Core library for the `skycast` forecast viewer.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The forecast provider seam and its WeatherAPI.com client
//! - Input resolution for typed, located and spoken queries
//! - The view state machine, unit projection and day navigation
//!
//! It is used by `skycast-cli`, but any front end can drive a [`Session`] and render its
//! [`ViewState`].

pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod navigator;
pub mod provider;
pub mod session;
pub mod state;
pub mod units;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{ErrorKind, GeoError, SpeechError, WeatherError};
pub use input::{FixedGeolocator, Geolocator, SpeechRecognizer, Trigger};
pub use model::{
    Condition, Coordinates, CurrentConditions, CurrentReport, Forecast, ForecastDay, HourSample,
    Location, Query, Theme, Unit,
};
pub use navigator::{DayNavigator, Direction, visible_hours};
pub use provider::{ForecastProvider, provider_from_config, weatherapi::WeatherApiProvider};
pub use session::{Outcome, Session};
pub use state::{Phase, ViewState};
pub use units::{TemperatureBand, display_temperature, format_temperature};
