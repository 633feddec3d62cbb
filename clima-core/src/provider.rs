use crate::{
    Config, WeatherObservation, WeatherQuery, error::FetchError,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// One-shot current-weather lookup. Each call is independent: one GET, no
/// retry, no shared state.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch with raw query parameters; the provider adds its API key.
    async fn fetch_params(&self, params: &[(String, String)]) -> Result<WeatherObservation, FetchError>;

    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherObservation, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key()?;

    Ok(OpenWeatherProvider::with_endpoint(api_key.to_owned(), config.endpoint.clone()))
}
