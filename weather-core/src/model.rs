use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Incoming `?city=` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>) -> Self {
        Self { city: Some(city.into()) }
    }

    /// The trimmed city, or `None` when absent or blank.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Current-weather payload exactly as OpenWeather returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrentWeather(pub Value);

impl CurrentWeather {
    /// Resolved location name (`name` field), if the provider sent one.
    pub fn location_name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntryMain {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub pressure: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct EntryCondition {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct EntryWind {
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct EntryClouds {
    #[serde(default)]
    pub all: u8,
}

/// One 3-hour sample of the `/forecast` feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastEntry {
    /// Unix seconds, UTC.
    pub dt: i64,
    pub main: EntryMain,
    #[serde(default)]
    pub weather: Vec<EntryCondition>,
    #[serde(default)]
    pub wind: EntryWind,
    #[serde(default)]
    pub clouds: EntryClouds,
}

impl ForecastEntry {
    pub fn condition(&self) -> Option<&EntryCondition> {
        self.weather.first()
    }
}

/// City metadata of the forecast feed. Unknown fields are kept for the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Shift from UTC in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Decoded `/forecast` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastEntry>,
    pub city: CityInfo,
}

/// One representative forecast per calendar day, as handed to the forecast page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    /// Local wall-clock time of the chosen sample.
    pub date: DateTime<FixedOffset>,
    #[serde(rename = "dateString")]
    pub date_string: String,
    #[serde(rename = "dayName")]
    pub day_name: String,
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub description: String,
    pub icon: String,
    pub wind_speed: f64,
    pub clouds: u8,
    pub pressure: f64,
}
