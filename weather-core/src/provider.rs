use crate::{
    Config, CurrentWeather, ForecastResponse, error::ProviderError,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Source of raw weather data. One call per method, no retries.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for `city`.
    async fn current(&self, city: &str, api_key: &str) -> Result<CurrentWeather, ProviderError>;

    /// The 5 day / 3 hour forecast feed for `city`.
    async fn forecast(&self, city: &str, api_key: &str)
    -> Result<ForecastResponse, ProviderError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let provider = OpenWeatherProvider::new(config)?;
    Ok(Arc::new(provider))
}
