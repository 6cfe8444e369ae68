use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

/// Language used for dates, day names, page titles and error messages.
///
/// One locale is chosen per process; requests never switch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Vietnamese (`vi-VN`): `d/m/yyyy`, "Thứ Hai" .. "Chủ Nhật".
    #[default]
    Vi,
    /// English (`en-US`): `m/d/yyyy`, "Monday" .. "Sunday".
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Vi => "vi",
            Locale::En => "en",
        }
    }

    pub const fn all() -> &'static [Locale] {
        &[Locale::Vi, Locale::En]
    }

    /// Short numeric calendar date, without zero padding.
    pub fn format_date(&self, date: NaiveDate) -> String {
        match self {
            Locale::Vi => format!("{}/{}/{}", date.day(), date.month(), date.year()),
            Locale::En => format!("{}/{}/{}", date.month(), date.day(), date.year()),
        }
    }

    /// Long weekday name.
    pub fn weekday_name(&self, weekday: Weekday) -> &'static str {
        match self {
            Locale::Vi => match weekday {
                Weekday::Mon => "Thứ Hai",
                Weekday::Tue => "Thứ Ba",
                Weekday::Wed => "Thứ Tư",
                Weekday::Thu => "Thứ Năm",
                Weekday::Fri => "Thứ Sáu",
                Weekday::Sat => "Thứ Bảy",
                Weekday::Sun => "Chủ Nhật",
            },
            Locale::En => match weekday {
                Weekday::Mon => "Monday",
                Weekday::Tue => "Tuesday",
                Weekday::Wed => "Wednesday",
                Weekday::Thu => "Thursday",
                Weekday::Fri => "Friday",
                Weekday::Sat => "Saturday",
                Weekday::Sun => "Sunday",
            },
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Locale {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "vi" | "vi-vn" => Ok(Locale::Vi),
            "en" | "en-us" => Ok(Locale::En),
            _ => Err(anyhow::anyhow!(
                "Unknown locale '{value}'. Supported locales: vi, en."
            )),
        }
    }
}
