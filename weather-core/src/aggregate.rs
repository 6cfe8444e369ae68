//! Reduction of the 3-hour forecast feed into one entry per calendar day.
//!
//! The first pass keeps, per date, the first sample whose local hour is in
//! `12..=15`. If that does not produce [`MAX_DAYS`] days, its result is dropped
//! entirely and a second pass keeps the first sample of every date instead.

use std::{collections::HashSet, convert::TryFrom, ops::RangeInclusive};

use chrono::{DateTime, Datelike, FixedOffset, Local, Offset, Timelike, Utc};
use chrono_tz::Tz;

use crate::{
    locale::Locale,
    model::{DailyForecast, ForecastEntry},
};

/// Upper bound on the number of days shown on the forecast page.
pub const MAX_DAYS: usize = 5;

const MIDDAY_HOURS: RangeInclusive<u32> = 12..=15;

/// Which clock turns provider timestamps into calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeBasis {
    /// The server's local time zone.
    #[default]
    ServerLocal,
    /// The forecast city's own UTC shift, as reported in the feed.
    City,
    /// A fixed IANA zone.
    Zone(Tz),
}

impl TryFrom<&str> for TimeBasis {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "" | "local" => Ok(TimeBasis::ServerLocal),
            "city" => Ok(TimeBasis::City),
            _ => value
                .trim()
                .parse::<Tz>()
                .map(TimeBasis::Zone)
                .map_err(|_| {
                    anyhow::anyhow!(
                        "Unknown time zone '{value}'. Use 'local', 'city' or an IANA name such as 'Asia/Ho_Chi_Minh'."
                    )
                }),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Zone {
    Local,
    Fixed(FixedOffset),
    Named(Tz),
}

/// Turns timestamps into local dates, date strings and day names.
#[derive(Debug, Clone)]
pub struct DayFormatter {
    locale: Locale,
    zone: Zone,
}

impl DayFormatter {
    /// Formatter for `basis`. `city_offset_secs` is only read for [`TimeBasis::City`];
    /// a missing or out-of-range shift falls back to UTC.
    pub fn new(locale: Locale, basis: TimeBasis, city_offset_secs: Option<i32>) -> Self {
        let zone = match basis {
            TimeBasis::ServerLocal => Zone::Local,
            TimeBasis::Zone(tz) => Zone::Named(tz),
            TimeBasis::City => Zone::Fixed(
                city_offset_secs
                    .and_then(FixedOffset::east_opt)
                    .unwrap_or_else(|| Utc.fix()),
            ),
        };

        Self { locale, zone }
    }

    pub fn fixed(locale: Locale, offset: FixedOffset) -> Self {
        Self { locale, zone: Zone::Fixed(offset) }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Local wall-clock time of a unix timestamp.
    pub fn localize(&self, ts: i64) -> Option<DateTime<FixedOffset>> {
        let utc = DateTime::<Utc>::from_timestamp(ts, 0)?;

        Some(match self.zone {
            Zone::Local => utc.with_timezone(&Local).fixed_offset(),
            Zone::Fixed(offset) => utc.with_timezone(&offset),
            Zone::Named(tz) => utc.with_timezone(&tz).fixed_offset(),
        })
    }

    pub fn date_string(&self, local: &DateTime<FixedOffset>) -> String {
        self.locale.format_date(local.date_naive())
    }

    pub fn day_name(&self, local: &DateTime<FixedOffset>) -> String {
        self.locale.weekday_name(local.weekday()).to_string()
    }
}

struct Stamped<'a> {
    entry: &'a ForecastEntry,
    local: DateTime<FixedOffset>,
    date_string: String,
}

/// Picks at most [`MAX_DAYS`] daily forecasts from a feed in ascending time order.
pub fn daily_forecasts(entries: &[ForecastEntry], formatter: &DayFormatter) -> Vec<DailyForecast> {
    let stamped: Vec<Stamped<'_>> = entries
        .iter()
        .filter_map(|entry| {
            let local = formatter.localize(entry.dt)?;
            let date_string = formatter.date_string(&local);
            Some(Stamped { entry, local, date_string })
        })
        .collect();

    let midday = select(&stamped, formatter, |hour| MIDDAY_HOURS.contains(&hour));
    if midday.len() >= MAX_DAYS {
        return midday;
    }

    tracing::debug!(
        midday_days = midday.len(),
        "not enough midday samples, falling back to first sample per day"
    );
    select(&stamped, formatter, |_| true)
}

fn select(
    stamped: &[Stamped<'_>],
    formatter: &DayFormatter,
    accept_hour: impl Fn(u32) -> bool,
) -> Vec<DailyForecast> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut days = Vec::with_capacity(MAX_DAYS);

    for item in stamped {
        if days.len() >= MAX_DAYS {
            break;
        }
        if seen.contains(item.date_string.as_str()) || !accept_hour(item.local.hour()) {
            continue;
        }

        seen.insert(item.date_string.as_str());
        days.push(to_daily(item, formatter));
    }

    days
}

fn to_daily(item: &Stamped<'_>, formatter: &DayFormatter) -> DailyForecast {
    let entry = item.entry;
    let (description, icon) = entry
        .condition()
        .map(|c| (c.description.clone(), c.icon.clone()))
        .unwrap_or_default();

    DailyForecast {
        date: item.local,
        date_string: item.date_string.clone(),
        day_name: formatter.day_name(&item.local),
        temp: entry.main.temp,
        temp_min: entry.main.temp_min,
        temp_max: entry.main.temp_max,
        humidity: entry.main.humidity,
        description,
        icon,
        wind_speed: entry.wind.speed,
        clouds: entry.clouds.all,
        pressure: entry.main.pressure,
    }
}
