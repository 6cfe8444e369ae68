//! Page decisions for the three endpoints.
//!
//! Each method validates the query, makes at most one provider call and
//! returns a [`View`]. Failures never escape: they become the home view with a
//! localized message. Rendering the view is the caller's job.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    Config,
    aggregate::{DayFormatter, MAX_DAYS, TimeBasis, daily_forecasts},
    config::usable_api_key,
    error::{ErrorKind, Page, WeatherError},
    locale::Locale,
    model::{CityInfo, CurrentWeather, DailyForecast, WeatherQuery},
    provider::{WeatherProvider, provider_from_config},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView {
    pub title: String,
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    pub title: String,
    pub weather: CurrentWeather,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastView {
    pub title: String,
    pub city: CityInfo,
    pub forecasts: Vec<DailyForecast>,
}

/// What to render for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Home(HomeView),
    Weather(WeatherView),
    Forecast(ForecastView),
}

impl View {
    /// The error classification, when this is a failure page.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            View::Home(home) => home.error_kind,
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    api_key: Option<String>,
    locale: Locale,
    time_basis: TimeBasis,
}

impl WeatherService {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        api_key: Option<String>,
        locale: Locale,
        time_basis: TimeBasis,
    ) -> Self {
        Self { provider, api_key, locale, time_basis }
    }

    /// Service backed by OpenWeather, configured from `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            provider_from_config(config)?,
            config.api_key.clone(),
            config.locale,
            config.time_basis()?,
        ))
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn home(&self) -> View {
        View::Home(HomeView {
            title: self.home_title(),
            error: None,
            error_kind: None,
        })
    }

    pub async fn current(&self, query: &WeatherQuery) -> View {
        match self.fetch_current(query).await {
            Ok(weather) => {
                let name = weather
                    .location_name()
                    .or(query.city())
                    .unwrap_or_default()
                    .to_string();

                View::Weather(WeatherView {
                    title: self.weather_title(&name),
                    weather,
                })
            }
            Err(err) => self.failure(err, Page::Weather),
        }
    }

    pub async fn forecast(&self, query: &WeatherQuery) -> View {
        match self.fetch_forecast(query).await {
            Ok((city, mut forecasts)) => {
                forecasts.truncate(MAX_DAYS);

                View::Forecast(ForecastView {
                    title: self.forecast_title(&city.name),
                    city,
                    forecasts,
                })
            }
            Err(err) => self.failure(err, Page::Forecast),
        }
    }

    pub async fn fetch_current(&self, query: &WeatherQuery) -> Result<CurrentWeather, WeatherError> {
        let (city, api_key) = self.validate(query)?;
        debug!(city, "fetching current weather");
        Ok(self.provider.current(city, api_key).await?)
    }

    pub async fn fetch_forecast(
        &self,
        query: &WeatherQuery,
    ) -> Result<(CityInfo, Vec<DailyForecast>), WeatherError> {
        let (city, api_key) = self.validate(query)?;
        debug!(city, "fetching forecast");

        let response = self.provider.forecast(city, api_key).await?;
        let formatter = DayFormatter::new(self.locale, self.time_basis, response.city.timezone);
        let days = daily_forecasts(&response.list, &formatter);

        debug!(samples = response.list.len(), days = days.len(), "forecast aggregated");
        Ok((response.city, days))
    }

    fn validate<'q>(&'q self, query: &'q WeatherQuery) -> Result<(&'q str, &'q str), WeatherError> {
        let city = query.city().ok_or(WeatherError::MissingInput)?;
        let api_key =
            usable_api_key(self.api_key.as_deref()).ok_or(WeatherError::MissingCredential)?;
        Ok((city, api_key))
    }

    fn failure(&self, err: WeatherError, page: Page) -> View {
        match &err {
            WeatherError::Provider(source) => warn!(?page, error = %source, "weather lookup failed"),
            _ => debug!(?page, error = %err, "request rejected"),
        }

        View::Home(HomeView {
            title: self.home_title(),
            error: Some(err.user_message(self.locale, page)),
            error_kind: Some(err.kind()),
        })
    }

    fn home_title(&self) -> String {
        match self.locale {
            Locale::Vi => "Weather App - Trang chủ".to_string(),
            Locale::En => "Weather App - Home".to_string(),
        }
    }

    fn weather_title(&self, name: &str) -> String {
        match self.locale {
            Locale::Vi => format!("Thời tiết {name} - Weather App"),
            Locale::En => format!("Weather in {name} - Weather App"),
        }
    }

    fn forecast_title(&self, name: &str) -> String {
        match self.locale {
            Locale::Vi => format!("Dự báo thời tiết {name} - Weather App"),
            Locale::En => format!("Forecast for {name} - Weather App"),
        }
    }
}
