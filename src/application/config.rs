use crate::application::{CalendarOptions, Target};
use crate::entities::{Availability, LegendItem, Locale, SelectionMode};
use crate::infrastructure::{HolidayCountry, HolidayLanguage};
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const OPTIONS_FILE_NAME: &str = "options.json";

pub struct Config {
    pub config_dir: PathBuf,
    pub theme: String,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let config_dir = lookup("STAY_CALENDAR_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("stay-calendar")
            });

        let theme = lookup("STAY_CALENDAR_THEME").unwrap_or_else(|| "dark".to_string());
        let log_file = lookup("STAY_CALENDAR_LOG").map(PathBuf::from);

        Self {
            config_dir,
            theme,
            log_file,
        }
    }

    pub fn options_path(&self) -> PathBuf {
        self.config_dir.join(OPTIONS_FILE_NAME)
    }

    /// Options from the config directory, or defaults when the file is absent.
    pub fn load_options(&self) -> Result<OptionsFile> {
        let path = self.options_path();
        if path.exists() {
            OptionsFile::load(&path)
        } else {
            log::debug!("no options file at {}", path.display());
            Ok(OptionsFile::default())
        }
    }
}

/// Serializable subset of [`CalendarOptions`]: everything except the callbacks,
/// which are rebuilt from `disabled_weekdays` and `disabled_dates`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OptionsFile {
    pub locale: Option<Locale>,
    pub start_week_on: Option<i32>,
    pub selection_mode: Option<SelectionMode>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub has_info: Option<bool>,
    pub shown_months: Option<u8>,
    pub availability: Option<Availability>,
    pub enable_holidays: Option<bool>,
    pub holiday_country: Option<HolidayCountry>,
    pub holiday_language: Option<HolidayLanguage>,
    pub primary_legends: Vec<LegendItem>,
    pub secondary_legends: Vec<LegendItem>,
    pub initial_date: Option<NaiveDate>,
    pub disabled_weekdays: Vec<Weekday>,
    pub disabled_dates: Vec<NaiveDate>,
    pub theme: Option<String>,
}

impl OptionsFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read options from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid options file {}", path.display()))
    }

    pub fn into_options(self, target: impl Into<Target>) -> CalendarOptions {
        let mut options = CalendarOptions::new(target);
        options.locale = self.locale;
        options.start_week_on = self.start_week_on;
        options.selection_mode = self.selection_mode;
        options.min_date = self.min_date;
        options.max_date = self.max_date;
        options.has_info = self.has_info.unwrap_or(false);
        options.shown_months = self.shown_months;
        options.availability = self.availability;
        options.enable_holidays =
            self.enable_holidays.unwrap_or(false) || self.holiday_country.is_some();
        options.holiday_country = self.holiday_country;
        options.holiday_language = self.holiday_language;
        options.primary_legends = self.primary_legends;
        options.secondary_legends = self.secondary_legends;
        options.initial_date = self.initial_date;

        let (weekdays, dates) = (self.disabled_weekdays, self.disabled_dates);
        if weekdays.is_empty() && dates.is_empty() {
            options
        } else {
            options.disable_when(move |date| {
                weekdays.contains(&date.weekday()) || dates.contains(&date)
            })
        }
    }
}
