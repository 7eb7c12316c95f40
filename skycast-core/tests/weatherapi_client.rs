// Tests for WeatherApiProvider against a mocked WeatherAPI.com
// Uses mockito for HTTP mocking

use chrono::{Days, NaiveDate};
use mockito::{Matcher, Server};
use serde_json::{Value, json};
use skycast_core::{
    ErrorKind, ForecastProvider, Query, Session, ViewState, WeatherApiProvider, WeatherError,
    visible_hours,
};
use std::sync::Arc;

const KEY: &str = "TEST_KEY";

fn condition(text: &str) -> Value {
    json!({ "text": text, "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png", "code": 1000 })
}

fn current() -> Value {
    json!({
        "last_updated_epoch": 1742644800,
        "temp_c": 21.0,
        "feelslike_c": 20.4,
        "humidity": 48,
        "wind_kph": 11.2,
        "is_day": 1,
        "condition": condition("Sunny"),
        "uv": 4.0
    })
}

fn location(name: &str) -> Value {
    json!({
        "name": name,
        "region": "Ile-de-France",
        "country": "France",
        "lat": 48.87,
        "lon": 2.33
    })
}

fn error_body(code: u32, message: &str) -> String {
    json!({ "error": { "code": code, "message": message } }).to_string()
}

fn forecast_body(name: &str) -> Value {
    let start = NaiveDate::from_ymd_opt(2025, 3, 22).expect("valid date");
    let days: Vec<Value> = (0..7)
        .map(|i| {
            let date = start + Days::new(i);
            let hours: Vec<Value> = (0..24)
                .map(|h| {
                    json!({
                        "time_epoch": 1742601600 + i as i64 * 86400 + h * 3600,
                        "time": format!("{} {:02}:00", date.format("%Y-%m-%d"), h),
                        "temp_c": 8.0 + h as f64 / 2.0,
                        "chance_of_rain": 20,
                        "condition": condition("Partly cloudy")
                    })
                })
                .collect();
            json!({
                "date": date.format("%Y-%m-%d").to_string(),
                "day": {
                    "maxtemp_c": 19.5,
                    "mintemp_c": 7.1,
                    "daily_chance_of_rain": 35,
                    "condition": condition("Patchy rain nearby")
                },
                "astro": {
                    "sunrise": "06:51 AM",
                    "sunset": "07:09 PM",
                    "moon_phase": "Waning Gibbous"
                },
                "hour": hours
            })
        })
        .collect();

    json!({
        "location": location(name),
        "current": current(),
        "forecast": { "forecastday": days }
    })
}

fn provider(server: &Server) -> WeatherApiProvider {
    WeatherApiProvider::with_base_url(KEY.to_string(), server.url())
}

fn query(text: &str) -> Query {
    Query::parse(text).expect("non-empty query")
}

#[tokio::test]
async fn test_forecast_success() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/forecast.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("key".into(), KEY.into()),
            Matcher::UrlEncoded("q".into(), "Paris".into()),
            Matcher::UrlEncoded("days".into(), "7".into()),
            Matcher::UrlEncoded("aqi".into(), "no".into()),
            Matcher::UrlEncoded("alerts".into(), "no".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(forecast_body("Paris").to_string())
        .expect(1)
        .create_async()
        .await;

    let forecast = provider(&server).fetch_forecast(&query("Paris")).await.expect("forecast");

    assert_eq!(forecast.location.name, "Paris");
    assert_eq!(forecast.location.country, "France");
    assert_eq!(forecast.days.len(), 7);
    assert_eq!(forecast.current.temperature_c, 21.0);
    assert!(forecast.current.is_day);
    assert_eq!(forecast.days[0].chance_of_rain_pct, 35);
    assert_eq!(forecast.days[0].sunset.map(|t| t.to_string()).as_deref(), Some("19:09:00"));

    // Third day, every third hour.
    let hours: Vec<_> = visible_hours(&forecast.days[2]).collect();
    assert_eq!(hours.len(), 8);
    assert!(hours.windows(2).all(|w| w[0].time < w[1].time));
    assert_eq!(hours[0].time.to_string(), "2025-03-24 00:00:00");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_forecast_unknown_location() {
    let mut server = Server::new_async().await;

    // WeatherAPI answers bad locations with 400 and an error envelope
    let mock = server
        .mock("GET", "/forecast.json")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(error_body(1006, "No matching location found."))
        .create_async()
        .await;

    let err = provider(&server)
        .fetch_forecast(&query("zzzz-not-a-place"))
        .await
        .unwrap_err();

    assert_eq!(err, WeatherError::LocationNotFound("No matching location found.".into()));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_envelope_with_ok_status() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/forecast.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(error_body(1003, "Parameter q is missing."))
        .create_async()
        .await;

    let err = provider(&server).fetch_forecast(&query("x")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LocationNotFound);
    assert!(err.to_string().contains("Parameter q is missing."));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/forecast.json")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let err = provider(&server).fetch_forecast(&query("Paris")).await.unwrap_err();
    match err {
        WeatherError::TransportError(msg) => {
            assert!(msg.contains("502"));
            assert!(msg.contains("Bad Gateway"));
        }
        other => panic!("Expected TransportError, got {other:?}"),
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_json_is_transport_error() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/forecast.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{\"location\": ")
        .create_async()
        .await;

    let err = provider(&server).fetch_forecast(&query("Paris")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportError);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_field_is_malformed() {
    let mut server = Server::new_async().await;

    let mut body = forecast_body("Paris");
    body["current"]
        .as_object_mut()
        .expect("current is an object")
        .remove("temp_c");

    let mock = server
        .mock("GET", "/forecast.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let err = provider(&server).fetch_forecast(&query("Paris")).await.unwrap_err();
    match err {
        WeatherError::MalformedResponse(msg) => assert!(msg.contains("temp_c")),
        other => panic!("Expected MalformedResponse, got {other:?}"),
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn test_bad_date_is_malformed() {
    let mut server = Server::new_async().await;

    let mut body = forecast_body("Paris");
    body["forecast"]["forecastday"][1]["date"] = json!("22/03/2025");

    let mock = server
        .mock("GET", "/forecast.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let err = provider(&server).fetch_forecast(&query("Paris")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_current_only_endpoint() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/current.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("key".into(), KEY.into()),
            Matcher::UrlEncoded("q".into(), "48.87,2.33".into()),
        ]))
        .with_status(200)
        .with_body(json!({ "location": location("Paris"), "current": current() }).to_string())
        .create_async()
        .await;

    let report = provider(&server).fetch_current(&query("48.87,2.33")).await.expect("report");

    assert_eq!(report.location.name, "Paris");
    assert_eq!(report.current.humidity_pct, 48);
    assert_eq!(report.current.wind_kph, 11.2);
    assert!(report.current.observed_at.is_some());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_failed_retry_keeps_displayed_forecast() {
    let mut server = Server::new_async().await;

    let paris = server
        .mock("GET", "/forecast.json")
        .match_query(Matcher::UrlEncoded("q".into(), "Paris".into()))
        .with_status(200)
        .with_body(forecast_body("Paris").to_string())
        .create_async()
        .await;
    let unknown = server
        .mock("GET", "/forecast.json")
        .match_query(Matcher::UrlEncoded("q".into(), "zzzz-not-a-place".into()))
        .with_status(400)
        .with_body(error_body(1006, "No matching location found."))
        .create_async()
        .await;

    let session = Session::new(Arc::new(provider(&server)), ViewState::default());

    session.submit_text("Paris").await;
    session.select_day(2);
    let outcome = session.submit_text("zzzz-not-a-place").await;

    assert_eq!(
        outcome.notice().as_deref(),
        Some("Location not found: No matching location found.")
    );
    let state = session.snapshot();
    assert_eq!(state.forecast().map(|f| f.location.name.as_str()), Some("Paris"));
    assert_eq!(state.selected_index(), 2);
    assert!(!state.is_loading());

    paris.assert_async().await;
    unknown.assert_async().await;
}
