//! Core library for the `weather-web` server.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the `WeatherProvider` abstraction
//! - Reduction of the 3-hour forecast feed into daily summaries
//! - Page decisions (`WeatherService`) producing view-models, independent of HTTP
//!
//! It is used by `weather-web`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod locale;
pub mod model;
pub mod provider;
pub mod service;

pub use aggregate::{DayFormatter, MAX_DAYS, TimeBasis, daily_forecasts};
pub use config::{Config, ServerConfig};
pub use error::{ErrorKind, Page, ProviderError, WeatherError};
pub use locale::Locale;
pub use model::{
    CityInfo, CurrentWeather, DailyForecast, ForecastEntry, ForecastResponse, WeatherQuery,
};
pub use provider::{WeatherProvider, provider_from_config};
pub use service::{ForecastView, HomeView, View, WeatherService, WeatherView};
