use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{FetchError, FetchFailure},
    model::{WeatherObservation, WeatherQuery},
};

use super::WeatherProvider;

pub const DEFAULT_ENDPOINT: &str = "http://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT.to_string())
    }

    pub fn with_endpoint(api_key: String, endpoint: String) -> Self {
        Self {
            api_key,
            endpoint,
            http: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Caller parameters plus `appid`. A caller-supplied `appid` is replaced.
    fn merged_params(&self, params: &[(String, String)]) -> Vec<(String, String)> {
        let mut merged: Vec<(String, String)> = params
            .iter()
            .filter(|(key, _)| key != "appid")
            .cloned()
            .collect();
        merged.push(("appid".to_string(), self.api_key.clone()));
        merged
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: Option<OwMain>,
    name: Option<String>,
    weather: Option<Vec<OwWeather>>,
}

/// Pull the observation out of a current-weather body.
///
/// Only `main.temp` is required. A missing `name` becomes an empty string and
/// a missing first `weather` entry or `id` becomes condition 0.
pub(crate) fn parse_current(body: &str) -> Result<WeatherObservation, FetchFailure> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| FetchFailure::Malformed(format!("invalid JSON: {e}")))?;

    let raw_kelvin_temp = parsed
        .main
        .and_then(|m| m.temp)
        .ok_or_else(|| FetchFailure::Malformed("missing numeric main.temp".to_string()))?;

    let condition_code = parsed
        .weather
        .as_deref()
        .and_then(|w| w.first())
        .and_then(|w| w.id)
        .unwrap_or(0);

    Ok(WeatherObservation {
        raw_kelvin_temp,
        city_name: parsed.name.unwrap_or_default(),
        condition_code,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_params(&self, params: &[(String, String)]) -> Result<WeatherObservation, FetchError> {
        let query = self.merged_params(params);
        tracing::debug!(endpoint = %self.endpoint, params = ?params, "requesting current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(FetchFailure::from)?;

        let status = res.status();
        let body = res.text().await.map_err(FetchFailure::from)?;

        if !status.is_success() {
            return Err(FetchFailure::Status {
                status,
                body: truncate_body(&body),
            }
            .into());
        }

        let observation = parse_current(&body)?;
        tracing::debug!(?observation, "parsed current weather");
        Ok(observation)
    }

    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherObservation, FetchError> {
        self.fetch_params(&query.to_params()).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
