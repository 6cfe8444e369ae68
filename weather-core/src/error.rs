use serde::Serialize;
use thiserror::Error;

use crate::locale::Locale;

/// Failure of a single call to the weather provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("city not found by the weather provider")]
    NotFound,

    #[error("weather provider rejected the API key")]
    Unauthorized,

    #[error("weather provider rate limit exceeded")]
    RateLimited,

    #[error("weather provider returned status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Upstream { status: u16, message: Option<String> },

    /// The request never produced a response: connect failure, DNS, timeout.
    #[error("no response from weather provider: {0}")]
    Network(String),

    /// A 2xx response whose body is not the expected JSON.
    #[error("unexpected payload from weather provider: {0}")]
    InvalidPayload(String),
}

impl ProviderError {
    /// Classifies a non-success HTTP status. `body` is searched for the
    /// provider's JSON `message` field.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            404 => ProviderError::NotFound,
            401 => ProviderError::Unauthorized,
            429 => ProviderError::RateLimited,
            _ => ProviderError::Upstream {
                status,
                message: upstream_message(body),
            },
        }
    }
}

fn upstream_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}

/// Classification handed to the view alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingInput,
    MissingCredential,
    NotFound,
    Unauthorized,
    RateLimited,
    UpstreamError,
    NetworkError,
    InvalidPayload,
}

/// Which page the request was for; selects the generic failure wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Weather,
    Forecast,
}

/// Everything a weather or forecast request can end with besides success.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("city name is required")]
    MissingInput,

    #[error("OpenWeather API key is not configured")]
    MissingCredential,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::MissingInput => ErrorKind::MissingInput,
            WeatherError::MissingCredential => ErrorKind::MissingCredential,
            WeatherError::Provider(err) => match err {
                ProviderError::NotFound => ErrorKind::NotFound,
                ProviderError::Unauthorized => ErrorKind::Unauthorized,
                ProviderError::RateLimited => ErrorKind::RateLimited,
                ProviderError::Upstream { .. } => ErrorKind::UpstreamError,
                ProviderError::Network(_) => ErrorKind::NetworkError,
                ProviderError::InvalidPayload(_) => ErrorKind::InvalidPayload,
            },
        }
    }

    /// Text shown on the home page.
    pub fn user_message(&self, locale: Locale, page: Page) -> String {
        match locale {
            Locale::Vi => self.message_vi(page),
            Locale::En => self.message_en(page),
        }
    }

    fn message_vi(&self, page: Page) -> String {
        match self {
            WeatherError::MissingInput => "Vui lòng nhập tên thành phố".to_string(),
            WeatherError::MissingCredential => {
                "API key chưa được cấu hình. Vui lòng thêm OPENWEATHER_API_KEY vào biến môi trường hoặc file cấu hình"
                    .to_string()
            }
            WeatherError::Provider(err) => match err {
                ProviderError::NotFound => {
                    "Không tìm thấy thành phố. Vui lòng kiểm tra lại tên thành phố".to_string()
                }
                ProviderError::Unauthorized => {
                    "API key không hợp lệ. Vui lòng kiểm tra lại cấu hình".to_string()
                }
                ProviderError::RateLimited => {
                    "Đã vượt quá giới hạn số lần gọi API. Vui lòng thử lại sau".to_string()
                }
                ProviderError::Upstream { message, .. } => {
                    format!("Lỗi từ API: {}", message.as_deref().unwrap_or("Không xác định"))
                }
                ProviderError::Network(_) => {
                    "Không thể kết nối đến máy chủ. Vui lòng kiểm tra kết nối internet".to_string()
                }
                ProviderError::InvalidPayload(_) => match page {
                    Page::Weather => "Đã xảy ra lỗi khi lấy dữ liệu thời tiết".to_string(),
                    Page::Forecast => "Đã xảy ra lỗi khi lấy dữ liệu dự báo".to_string(),
                },
            },
        }
    }

    fn message_en(&self, page: Page) -> String {
        match self {
            WeatherError::MissingInput => "Please enter a city name".to_string(),
            WeatherError::MissingCredential => {
                "API key is not configured. Please set OPENWEATHER_API_KEY in the environment or the config file"
                    .to_string()
            }
            WeatherError::Provider(err) => match err {
                ProviderError::NotFound => {
                    "City not found. Please check the spelling of the city name".to_string()
                }
                ProviderError::Unauthorized => {
                    "Invalid API key. Please check your configuration".to_string()
                }
                ProviderError::RateLimited => {
                    "Too many requests to the weather API. Please try again later".to_string()
                }
                ProviderError::Upstream { message, .. } => {
                    format!("Weather API error: {}", message.as_deref().unwrap_or("Unknown"))
                }
                ProviderError::Network(_) => {
                    "Cannot reach the weather service. Please check your internet connection"
                        .to_string()
                }
                ProviderError::InvalidPayload(_) => match page {
                    Page::Weather => "Something went wrong while fetching the weather".to_string(),
                    Page::Forecast => "Something went wrong while fetching the forecast".to_string(),
                },
            },
        }
    }
}
