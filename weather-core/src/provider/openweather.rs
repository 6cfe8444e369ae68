use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    Config,
    error::ProviderError,
    model::{CurrentWeather, ForecastResponse},
};

use super::WeatherProvider;

const CURRENT_ENDPOINT: &str = "weather";
const FORECAST_ENDPOINT: &str = "forecast";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    units: String,
    lang: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            units: config.units.clone(),
            lang: config.lang.clone(),
            http,
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// GET one endpoint and return the body of a 2xx response.
    async fn fetch(&self, endpoint: &str, city: &str, api_key: &str) -> Result<String, ProviderError> {
        let res = self
            .http
            .get(self.endpoint_url(endpoint))
            .query(&[
                ("q", city),
                ("appid", api_key),
                ("units", self.units.as_str()),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await
            // The URL carries the API key; keep it out of messages.
            .map_err(|e| ProviderError::Network(e.without_url().to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.without_url().to_string()))?;

        debug!(endpoint, status = status.as_u16(), bytes = body.len(), "OpenWeather responded");

        if !status.is_success() {
            return Err(ProviderError::from_status(status.as_u16(), &body));
        }

        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| {
        ProviderError::InvalidPayload(format!(
            "{endpoint}: {e} (body: {})",
            truncate_body(body)
        ))
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self, api_key))]
    async fn current(&self, city: &str, api_key: &str) -> Result<CurrentWeather, ProviderError> {
        let body = self.fetch(CURRENT_ENDPOINT, city, api_key).await?;
        let weather: CurrentWeather = decode(CURRENT_ENDPOINT, &body)?;

        if !weather.0.is_object() {
            return Err(ProviderError::InvalidPayload(format!(
                "{CURRENT_ENDPOINT}: expected a JSON object (body: {})",
                truncate_body(&body)
            )));
        }

        Ok(weather)
    }

    #[instrument(skip(self, api_key))]
    async fn forecast(
        &self,
        city: &str,
        api_key: &str,
    ) -> Result<ForecastResponse, ProviderError> {
        let body = self.fetch(FORECAST_ENDPOINT, city, api_key).await?;
        decode(FORECAST_ENDPOINT, &body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls_ignore_trailing_slash() {
        let cfg = Config {
            base_url: "http://localhost:9999/data/2.5/".into(),
            ..Config::default()
        };
        let provider = OpenWeatherProvider::new(&cfg).unwrap();

        assert_eq!(provider.endpoint_url(CURRENT_ENDPOINT), "http://localhost:9999/data/2.5/weather");
        assert_eq!(provider.endpoint_url(FORECAST_ENDPOINT), "http://localhost:9999/data/2.5/forecast");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "ờ".repeat(150);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= 203);

        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn decode_failure_is_invalid_payload() {
        let err = decode::<ForecastResponse>(FORECAST_ENDPOINT, "{\"list\": 3}").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidPayload(msg) if msg.starts_with("forecast:")));
    }
}
