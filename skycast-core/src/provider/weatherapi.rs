use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::WeatherError,
    model::{
        Condition, CurrentConditions, CurrentReport, Forecast, ForecastDay, HourSample, Location,
        Query,
    },
};

use super::{FORECAST_DAYS, ForecastProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http: Client::new() }
    }

    /// GET `<base>/<endpoint>` and return the JSON body, with the provider's embedded
    /// error envelope already turned into `LocationNotFound`.
    async fn get_json(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%url, ?params, "requesting WeatherAPI.com");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        let value: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) if !status.is_success() => {
                return Err(WeatherError::TransportError(format!(
                    "{endpoint} request failed with status {status}: {}",
                    truncate_body(&body)
                )));
            }
            Err(err) => {
                return Err(WeatherError::TransportError(format!(
                    "{endpoint} returned invalid JSON: {err}"
                )));
            }
        };

        if let Some(error) = value.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("No matching location found.")
                .to_string();
            return Err(WeatherError::LocationNotFound(message));
        }

        if !status.is_success() {
            return Err(WeatherError::TransportError(format!(
                "{endpoint} request failed with status {status}: {}",
                truncate_body(&body)
            )));
        }

        Ok(value)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, WeatherError> {
    serde_json::from_value(value).map_err(|err| WeatherError::MalformedResponse(err.to_string()))
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    region: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    feelslike_c: f64,
    humidity: u8,
    wind_kph: f64,
    is_day: u8,
    condition: WaCondition,
    last_updated_epoch: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WaCurrentResponse {
    location: WaLocation,
    current: WaCurrent,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    maxtemp_c: f64,
    mintemp_c: f64,
    daily_chance_of_rain: u8,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaAstro {
    sunrise: String,
    sunset: String,
}

#[derive(Debug, Deserialize)]
struct WaHour {
    time: String,
    temp_c: f64,
    chance_of_rain: u8,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: String,
    day: WaDay,
    astro: WaAstro,
    hour: Vec<WaHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    current: WaCurrent,
    forecast: WaForecast,
}

impl From<WaLocation> for Location {
    fn from(loc: WaLocation) -> Self {
        Location { name: loc.name, region: loc.region, country: loc.country }
    }
}

impl From<WaCondition> for Condition {
    fn from(c: WaCondition) -> Self {
        Condition { text: c.text, icon: c.icon }
    }
}

impl From<WaCurrent> for CurrentConditions {
    fn from(cur: WaCurrent) -> Self {
        CurrentConditions {
            temperature_c: cur.temp_c,
            feels_like_c: cur.feelslike_c,
            humidity_pct: cur.humidity,
            wind_kph: cur.wind_kph,
            is_day: cur.is_day != 0,
            condition: cur.condition.into(),
            observed_at: cur.last_updated_epoch.and_then(unix_to_utc),
        }
    }
}

impl TryFrom<WaHour> for HourSample {
    type Error = WeatherError;

    fn try_from(hour: WaHour) -> Result<Self, Self::Error> {
        let time = NaiveDateTime::parse_from_str(&hour.time, "%Y-%m-%d %H:%M")
            .map_err(|e| malformed("hour.time", &hour.time, e))?;

        Ok(HourSample {
            time,
            temperature_c: hour.temp_c,
            condition: hour.condition.into(),
            chance_of_rain_pct: hour.chance_of_rain,
        })
    }
}

impl TryFrom<WaForecastDay> for ForecastDay {
    type Error = WeatherError;

    fn try_from(day: WaForecastDay) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&day.date, "%Y-%m-%d")
            .map_err(|e| malformed("forecastday.date", &day.date, e))?;

        let hours = day
            .hour
            .into_iter()
            .map(HourSample::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ForecastDay {
            date,
            min_temp_c: day.day.mintemp_c,
            max_temp_c: day.day.maxtemp_c,
            condition: day.day.condition.into(),
            sunrise: parse_astro_time("astro.sunrise", &day.astro.sunrise)?,
            sunset: parse_astro_time("astro.sunset", &day.astro.sunset)?,
            chance_of_rain_pct: day.day.daily_chance_of_rain,
            hours,
        })
    }
}

impl TryFrom<WaForecastResponse> for Forecast {
    type Error = WeatherError;

    fn try_from(parsed: WaForecastResponse) -> Result<Self, Self::Error> {
        let days = parsed
            .forecast
            .forecastday
            .into_iter()
            .map(ForecastDay::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        if days.is_empty() {
            return Err(WeatherError::MalformedResponse(
                "response contained no forecastday data".to_string(),
            ));
        }

        Ok(Forecast {
            location: parsed.location.into(),
            current: parsed.current.into(),
            days,
        })
    }
}

#[async_trait]
impl ForecastProvider for WeatherApiProvider {
    async fn fetch_forecast(&self, query: &Query) -> Result<Forecast, WeatherError> {
        let days = FORECAST_DAYS.to_string();
        let value = self
            .get_json(
                "forecast.json",
                &[("q", query.as_str()), ("days", &days), ("aqi", "no"), ("alerts", "no")],
            )
            .await?;

        let parsed: WaForecastResponse = decode(value)?;
        Forecast::try_from(parsed)
    }

    async fn fetch_current(&self, query: &Query) -> Result<CurrentReport, WeatherError> {
        let value = self.get_json("current.json", &[("q", query.as_str())]).await?;

        let parsed: WaCurrentResponse = decode(value)?;
        Ok(CurrentReport {
            location: parsed.location.into(),
            current: parsed.current.into(),
        })
    }
}

/// Sunrise/sunset come as `"06:45 AM"`; polar days and nights read `"No sunrise"` etc.
fn parse_astro_time(field: &str, raw: &str) -> Result<Option<NaiveTime>, WeatherError> {
    if raw.starts_with("No ") {
        return Ok(None);
    }
    NaiveTime::parse_from_str(raw, "%I:%M %p")
        .map(Some)
        .map_err(|e| malformed(field, raw, e))
}

fn malformed(field: &str, raw: &str, err: chrono::ParseError) -> WeatherError {
    WeatherError::MalformedResponse(format!("invalid {field} '{raw}': {err}"))
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
