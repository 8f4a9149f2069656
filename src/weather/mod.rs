//! Weather client — current conditions and one-call forecast.
//!
//! Two provider calls (OpenWeatherMap), consumed into normalized shapes.
//! Fire-and-forget: 10 s timeout, no retry; any failure degrades to the
//! "Weather unavailable." placeholder at the call site.

pub mod sky;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::config::Settings;
use crate::page::Scale;

const REQUEST_TIMEOUT_SECS: u64 = 10;

// ─── Normalized shapes ────────────────────────────────────────────────────────

/// Current conditions, normalized from the provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Rounded °C.
    pub temperature: i64,
    /// Lowercased condition group, e.g. "clouds".
    pub condition: String,
    /// Free-text description, e.g. "scattered clouds".
    pub description: String,
    /// Cloud cover percentage when reported.
    pub clouds: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyEntry {
    pub dt: i64,
    /// °C.
    pub temp: f64,
    /// Provider condition group, e.g. "Clouds".
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyEntry {
    pub dt: i64,
    pub temp_max: f64,
    pub temp_min: f64,
    pub sunrise: i64,
    pub sunset: i64,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Forecast {
    /// Seconds east of UTC at the location.
    pub timezone_offset: i64,
    pub hourly: Vec<HourlyEntry>,
    pub daily: Vec<DailyEntry>,
}

// ─── Provider DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CurrentDto {
    coord: CoordDto,
    main: MainDto,
    #[serde(default)]
    weather: Vec<ConditionDto>,
    #[serde(default)]
    clouds: Option<CloudsDto>,
}

#[derive(Debug, Deserialize)]
struct CoordDto {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct MainDto {
    temp: f64,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ConditionDto {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct CloudsDto {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OneCallDto {
    #[serde(default)]
    timezone_offset: i64,
    #[serde(default)]
    hourly: Vec<OneCallHourlyDto>,
    #[serde(default)]
    daily: Vec<OneCallDailyDto>,
}

#[derive(Debug, Deserialize)]
struct OneCallHourlyDto {
    dt: i64,
    temp: f64,
    #[serde(default)]
    weather: Vec<ConditionDto>,
}

#[derive(Debug, Deserialize)]
struct OneCallDailyDto {
    dt: i64,
    temp: OneCallDailyTempDto,
    #[serde(default)]
    sunrise: i64,
    #[serde(default)]
    sunset: i64,
    #[serde(default)]
    weather: Vec<ConditionDto>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OneCallDailyTempDto {
    day: f64,
    night: f64,
    min: Option<f64>,
    max: Option<f64>,
}

// ─── Client ───────────────────────────────────────────────────────────────────

pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    location: String,
}

impl WeatherClient {
    pub fn new(settings: &Settings, location: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build weather HTTP client")?;

        Ok(Self {
            http,
            base_url: settings.weather.api_base_url.clone(),
            api_key: settings.weather.api_key.clone(),
            location: location.into(),
        })
    }

    /// Fetch and normalize the current conditions for the location.
    pub async fn current(&self) -> Result<CurrentConditions> {
        Ok(normalize_current(self.fetch_current().await?))
    }

    /// Fetch and normalize the one-call forecast. The provider keys the
    /// forecast by coordinates, so this resolves them through the current
    /// weather endpoint first — two calls total.
    pub async fn forecast(&self) -> Result<Forecast> {
        let current = self.fetch_current().await?;
        let url = format!(
            "{}/data/3.0/onecall?lat={}&lon={}&units=metric&exclude=minutely,alerts&appid={}",
            self.base_url, current.coord.lat, current.coord.lon, self.api_key
        );
        let dto: OneCallDto = self.get_json(&url).await?;
        Ok(normalize_forecast(dto))
    }

    async fn fetch_current(&self) -> Result<CurrentDto> {
        let url = format!(
            "{}/data/2.5/weather?q={}&units=metric&appid={}",
            self.base_url,
            urlencoding::encode(&self.location),
            self.api_key
        );
        self.get_json(&url).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url = %url, "weather request");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("weather request failed")?
            .error_for_status()
            .context("weather provider returned an error")?;
        response
            .json::<T>()
            .await
            .context("weather response was not the expected JSON")
    }
}

fn normalize_current(dto: CurrentDto) -> CurrentConditions {
    let condition = dto.weather.first().cloned().unwrap_or_default();
    CurrentConditions {
        temperature: dto.main.temp.round() as i64,
        condition: condition.main.to_lowercase(),
        description: condition.description,
        clouds: dto.clouds.map(|c| c.all),
    }
}

fn normalize_forecast(dto: OneCallDto) -> Forecast {
    Forecast {
        timezone_offset: dto.timezone_offset,
        hourly: dto
            .hourly
            .into_iter()
            .map(|h| HourlyEntry {
                dt: h.dt,
                temp: h.temp,
                condition: condition_label(&h.weather),
            })
            .collect(),
        daily: dto
            .daily
            .into_iter()
            .map(|d| DailyEntry {
                dt: d.dt,
                temp_max: d.temp.max.unwrap_or(d.temp.day),
                temp_min: d.temp.min.unwrap_or(d.temp.night),
                sunrise: d.sunrise,
                sunset: d.sunset,
                condition: condition_label(&d.weather),
            })
            .collect(),
    }
}

fn condition_label(weather: &[ConditionDto]) -> String {
    weather
        .first()
        .map(|c| c.main.clone())
        .filter(|main| !main.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

// ─── Display helpers ──────────────────────────────────────────────────────────

/// Convert a metric temperature for display.
pub fn display_temp(celsius: f64, scale: Scale) -> i64 {
    match scale {
        Scale::F => ((celsius * 9.0) / 5.0 + 32.0).round() as i64,
        Scale::C => celsius.round() as i64,
    }
}

/// Capitalize the first letter of a lowercased condition for the boot line.
pub fn title_condition(condition: &str) -> String {
    let mut chars = condition.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_normalizes_provider_json() {
        let raw = r#"{
            "coord": {"lat": 42.99, "lon": -71.45},
            "main": {"temp": 11.6},
            "weather": [{"main": "Clouds", "description": "scattered clouds"}],
            "clouds": {"all": 40}
        }"#;
        let dto: CurrentDto = serde_json::from_str(raw).unwrap();
        let current = normalize_current(dto);
        assert_eq!(current.temperature, 12);
        assert_eq!(current.condition, "clouds");
        assert_eq!(current.description, "scattered clouds");
        assert_eq!(current.clouds, Some(40));
    }

    #[test]
    fn forecast_falls_back_to_day_night_temps() {
        let raw = r#"{
            "timezone_offset": -14400,
            "hourly": [{"dt": 100, "temp": 3.2, "weather": [{"main": "Snow"}]}],
            "daily": [{"dt": 200, "temp": {"day": 5.0, "night": -1.0}, "sunrise": 1, "sunset": 2}]
        }"#;
        let dto: OneCallDto = serde_json::from_str(raw).unwrap();
        let forecast = normalize_forecast(dto);
        assert_eq!(forecast.timezone_offset, -14400);
        assert_eq!(forecast.hourly[0].condition, "Snow");
        let day = &forecast.daily[0];
        assert_eq!(day.temp_max, 5.0);
        assert_eq!(day.temp_min, -1.0);
        assert_eq!(day.condition, "Unknown");
    }

    #[test]
    fn temp_conversion_matches_display_rules() {
        assert_eq!(display_temp(0.0, Scale::C), 0);
        assert_eq!(display_temp(0.0, Scale::F), 32);
        assert_eq!(display_temp(21.4, Scale::C), 21);
        assert_eq!(display_temp(21.4, Scale::F), 71);
    }

    #[test]
    fn condition_title_case() {
        assert_eq!(title_condition("clouds"), "Clouds");
        assert_eq!(title_condition(""), "Unknown");
    }
}
