use crate::{
    Config,
    error::WeatherError,
    model::{CurrentReport, Forecast, Query},
    provider::weatherapi::WeatherApiProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

/// Number of days requested from the forecast endpoint.
pub const FORECAST_DAYS: u8 = 7;

/// The network seam. Implementations issue exactly one request per call.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// Multi-day forecast with hourly samples.
    async fn fetch_forecast(&self, query: &Query) -> Result<Forecast, WeatherError>;

    /// Present-moment conditions only.
    async fn fetch_current(&self, query: &Query) -> Result<CurrentReport, WeatherError>;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastProvider>> {
    let api_key = config.api_key()?;
    let provider = WeatherApiProvider::with_base_url(api_key, config.base_url());
    Ok(Box::new(provider))
}
