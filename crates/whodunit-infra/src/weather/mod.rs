//! Best-effort weather enrichment via the Open-Meteo forecast API.
//!
//! The chat prompt gets one flavor line about current conditions outside the
//! mansion. Any failure -- transport, non-JSON body, missing `current`
//! field -- is logged at warn level and degrades to `None`; a chat request
//! never fails because of weather.

use serde::Deserialize;

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Fields requested from the forecast API.
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m";

/// Client for current-conditions lookups at a fixed location.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    latitude: f64,
    longitude: f64,
}

impl WeatherClient {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            client: reqwest::Client::new(),
            latitude,
            longitude,
        }
    }

    /// One-line summary of current conditions, or `None` on any failure.
    pub async fn current_summary(&self) -> Option<String> {
        match self.fetch().await {
            Ok(Some(current)) => Some(summarize(&current)),
            Ok(None) => {
                tracing::warn!("weather API response is missing current conditions");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch weather");
                None
            }
        }
    }

    async fn fetch(&self) -> Result<Option<CurrentWeather>, reqwest::Error> {
        let response = self
            .client
            .get(FORECAST_URL)
            .query(&[
                ("latitude", self.latitude.to_string()),
                ("longitude", self.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let forecast: ForecastResponse = response.json().await?;
        Ok(forecast.current)
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    weather_code: u32,
    wind_speed_10m: f64,
}

fn summarize(current: &CurrentWeather) -> String {
    format!(
        "{}, {}°C, {}% humidity, wind {} km/h",
        describe_weather_code(current.weather_code),
        current.temperature_2m,
        current.relative_humidity_2m,
        current.wind_speed_10m
    )
}

/// Map a WMO weather code to a short description.
fn describe_weather_code(code: u32) -> &'static str {
    match code {
        0 => "clear",
        1..=3 => "cloudy",
        45..=48 => "fog",
        51..=67 => "rain",
        71..=77 => "snow",
        80..=82 => "rain showers",
        95..=99 => "thunderstorm",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_code_mapping() {
        assert_eq!(describe_weather_code(0), "clear");
        assert_eq!(describe_weather_code(2), "cloudy");
        assert_eq!(describe_weather_code(45), "fog");
        assert_eq!(describe_weather_code(55), "rain");
        assert_eq!(describe_weather_code(73), "snow");
        assert_eq!(describe_weather_code(81), "rain showers");
        assert_eq!(describe_weather_code(96), "thunderstorm");
        assert_eq!(describe_weather_code(42), "unknown");
    }

    #[test]
    fn test_summary_formatting() {
        let current = CurrentWeather {
            temperature_2m: 18.5,
            relative_humidity_2m: 72.0,
            weather_code: 61,
            wind_speed_10m: 12.3,
        };
        assert_eq!(summarize(&current), "rain, 18.5°C, 72% humidity, wind 12.3 km/h");
    }

    #[test]
    fn test_forecast_deserialization() {
        let json = r#"{
            "latitude": 35.69,
            "longitude": 139.69,
            "current": {
                "temperature_2m": 21.0,
                "relative_humidity_2m": 60,
                "weather_code": 3,
                "wind_speed_10m": 5.4
            }
        }"#;
        let forecast: ForecastResponse = serde_json::from_str(json).unwrap();
        let current = forecast.current.unwrap();
        assert_eq!(current.weather_code, 3);
        assert_eq!(current.temperature_2m, 21.0);
    }

    #[test]
    fn test_forecast_missing_current_is_none() {
        let forecast: ForecastResponse =
            serde_json::from_str(r#"{"latitude": 1.0}"#).unwrap();
        assert!(forecast.current.is_none());
    }
}
