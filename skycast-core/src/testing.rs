//! Forecast fixtures shared by unit tests.

use chrono::{Days, NaiveDate, NaiveTime};

use crate::model::{Condition, CurrentConditions, Forecast, ForecastDay, HourSample, Location};

pub(crate) fn condition(text: &str) -> Condition {
    Condition {
        text: text.to_string(),
        icon: "//cdn.weatherapi.com/weather/64x64/day/113.png".to_string(),
    }
}

pub(crate) fn day(date: NaiveDate) -> ForecastDay {
    ForecastDay {
        date,
        min_temp_c: 4.0,
        max_temp_c: 14.0,
        condition: condition("Sunny"),
        sunrise: NaiveTime::from_hms_opt(6, 50, 0),
        sunset: NaiveTime::from_hms_opt(19, 10, 0),
        chance_of_rain_pct: 0,
        hours: (0..24)
            .filter_map(|h| date.and_hms_opt(h, 0, 0))
            .map(|time| HourSample {
                time,
                temperature_c: 9.0,
                condition: condition("Clear"),
                chance_of_rain_pct: 0,
            })
            .collect(),
    }
}

pub(crate) fn forecast(name: &str, days: u64) -> Forecast {
    let start = NaiveDate::from_ymd_opt(2025, 3, 22).unwrap_or_default();
    Forecast {
        location: Location {
            name: name.to_string(),
            region: String::new(),
            country: "France".to_string(),
        },
        current: CurrentConditions {
            temperature_c: 12.0,
            feels_like_c: 11.0,
            humidity_pct: 60,
            wind_kph: 9.0,
            condition: condition("Sunny"),
            is_day: true,
            observed_at: None,
        },
        days: (0..days).map(|i| day(start + Days::new(i))).collect(),
    }
}
