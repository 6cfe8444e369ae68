//! HTML rendering of core view-models with embedded Tera templates.

use std::collections::HashMap;

use anyhow::Context as _;
use tera::{Context, Tera};
use weather_core::{Locale, View};

const TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("weather.html", include_str!("../templates/weather.html")),
    ("forecast.html", include_str!("../templates/forecast.html")),
];

/// Compiled page templates plus the fixed UI labels for one locale.
#[derive(Debug)]
pub struct Renderer {
    tera: Tera,
    locale: Locale,
    labels: HashMap<&'static str, &'static str>,
}

impl Renderer {
    pub fn new(locale: Locale) -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)
            .context("Failed to compile page templates")?;

        Ok(Self { tera, locale, labels: labels(locale) })
    }

    /// Render `view` into a full HTML page.
    pub fn render(&self, view: &View) -> tera::Result<String> {
        let (template, mut context) = match view {
            View::Home(page) => ("index.html", Context::from_serialize(page)?),
            View::Weather(page) => ("weather.html", Context::from_serialize(page)?),
            View::Forecast(page) => ("forecast.html", Context::from_serialize(page)?),
        };

        context.insert("lang", self.locale.as_str());
        context.insert("labels", &self.labels);

        self.tera.render(template, &context)
    }
}

fn labels(locale: Locale) -> HashMap<&'static str, &'static str> {
    let pairs: [(&str, &str); 10] = match locale {
        Locale::Vi => [
            ("city_placeholder", "Nhập tên thành phố..."),
            ("current", "Thời tiết hiện tại"),
            ("forecast", "Dự báo 5 ngày"),
            ("search_again", "Tìm thành phố khác"),
            ("feels_like", "Cảm giác như"),
            ("humidity", "Độ ẩm"),
            ("pressure", "Áp suất"),
            ("wind", "Gió"),
            ("clouds", "Mây"),
            ("no_forecast", "Không có dữ liệu dự báo."),
        ],
        Locale::En => [
            ("city_placeholder", "Enter a city name..."),
            ("current", "Current weather"),
            ("forecast", "5-day forecast"),
            ("search_again", "Search another city"),
            ("feels_like", "Feels like"),
            ("humidity", "Humidity"),
            ("pressure", "Pressure"),
            ("wind", "Wind"),
            ("clouds", "Clouds"),
            ("no_forecast", "No forecast data available."),
        ],
    };

    pairs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use weather_core::{CityInfo, CurrentWeather, ErrorKind, ForecastView, HomeView, WeatherView};

    fn renderer() -> Renderer {
        Renderer::new(Locale::Vi).expect("templates should compile")
    }

    #[test]
    fn home_renders_error_escaped() {
        let view = View::Home(HomeView {
            title: "Weather App - Trang chủ".into(),
            error: Some("<b>Vui lòng nhập tên thành phố</b>".into()),
            error_kind: Some(ErrorKind::MissingInput),
        });

        let html = renderer().render(&view).unwrap();

        assert!(html.contains("<title>Weather App - Trang chủ</title>"));
        assert!(html.contains("&lt;b&gt;Vui lòng nhập tên thành phố&lt;&#x2F;b&gt;"));
        assert!(html.contains("formaction=\"/forecast\""));
    }

    #[test]
    fn home_without_error_has_no_alert() {
        let view = View::Home(HomeView {
            title: "Weather App - Home".into(),
            error: None,
            error_kind: None,
        });

        let html = Renderer::new(Locale::En).unwrap().render(&view).unwrap();

        assert!(!html.contains("alert-error"));
        assert!(html.contains("lang=\"en\""));
        assert!(html.contains("5-day forecast"));
    }

    #[test]
    fn weather_page_tolerates_sparse_payload() {
        let view = View::Weather(WeatherView {
            title: "Thời tiết Hanoi - Weather App".into(),
            weather: CurrentWeather(json!({ "name": "Hanoi" })),
        });

        let html = renderer().render(&view).unwrap();

        assert!(html.contains("Hanoi"));
        assert!(html.contains("/forecast?city=Hanoi"));
    }

    #[test]
    fn weather_page_shows_main_fields() {
        let view = View::Weather(WeatherView {
            title: "Thời tiết Hanoi - Weather App".into(),
            weather: CurrentWeather(json!({
                "name": "Hanoi",
                "sys": { "country": "VN" },
                "weather": [{ "description": "mây cụm", "icon": "04d" }],
                "main": { "temp": 29.46, "feels_like": 33.1, "humidity": 74, "pressure": 1008 },
                "wind": { "speed": 3.2 },
                "clouds": { "all": 75 }
            })),
        });

        let html = renderer().render(&view).unwrap();

        assert!(html.contains("Hanoi, VN"));
        assert!(html.contains("mây cụm"));
        assert!(html.contains("04d@2x.png"));
        assert!(html.contains("29.5"));
        assert!(html.contains("Độ ẩm: 74%"));
    }

    #[test]
    fn weather_page_tolerates_null_temperature() {
        let view = View::Weather(WeatherView {
            title: "Thời tiết Hanoi - Weather App".into(),
            weather: CurrentWeather(json!({
                "name": "Hanoi",
                "main": { "temp": null, "humidity": 74 }
            })),
        });

        let html = renderer().render(&view).expect("null values should not fail rendering");

        assert!(html.contains("-&deg;C"));
        assert!(html.contains("Độ ẩm: 74%"));
    }

    #[test]
    fn forecast_page_lists_days() {
        let city: CityInfo = serde_json::from_value(json!({ "name": "Hanoi", "country": "VN" })).unwrap();
        let view = View::Forecast(ForecastView {
            title: "Dự báo thời tiết Hanoi - Weather App".into(),
            city,
            forecasts: vec![],
        });

        let html = renderer().render(&view).unwrap();

        assert!(html.contains("Hanoi, VN"));
        assert!(html.contains("Không có dữ liệu dự báo."));
    }
}
