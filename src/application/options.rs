use crate::entities::{Availability, LegendItem, Locale, SelectionMode};
use crate::infrastructure::{HolidayCountry, HolidayLanguage, HolidayProvider};
use chrono::NaiveDate;
use ratatui::layout::Rect;
use std::collections::HashMap;

/// Custom per-date disable rule supplied by the host.
pub type DisablePredicate = Box<dyn Fn(NaiveDate) -> bool>;

/// Replaces the localized month title; receives the 1st of the month.
pub type MonthLabel = Box<dyn Fn(NaiveDate) -> String>;

/// Where the calendar is mounted in the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Area(Rect),
    /// Name of an area registered in [`Regions`].
    Selector(String),
}

impl From<Rect> for Target {
    fn from(area: Rect) -> Self {
        Target::Area(area)
    }
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Target::Selector(selector.to_string())
    }
}

/// Named host areas that selectors resolve against.
#[derive(Debug, Clone, Default)]
pub struct Regions {
    areas: HashMap<String, Rect>,
}

impl Regions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, selector: impl Into<String>, area: Rect) -> Self {
        self.register(selector, area);
        self
    }

    pub fn register(&mut self, selector: impl Into<String>, area: Rect) {
        self.areas.insert(selector.into(), area);
    }

    pub fn resolve(&self, selector: &str) -> Option<Rect> {
        self.areas.get(selector).copied()
    }
}

/// Construction options. Everything except `target` is optional and
/// defaulted when the calendar is built.
#[derive(Default)]
pub struct CalendarOptions {
    // main
    pub target: Option<Target>,
    pub locale: Option<Locale>,
    pub start_week_on: Option<i32>,
    pub selection_mode: Option<SelectionMode>,

    // disable rules
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub is_date_disabled: Option<DisablePredicate>,

    // info
    pub has_info: bool,

    pub shown_months: Option<u8>,

    pub availability: Option<Availability>,

    // holidays
    pub enable_holidays: bool,
    pub holiday_country: Option<HolidayCountry>,
    pub holiday_language: Option<HolidayLanguage>,
    /// Overrides the built-in provider for `holiday_country`.
    pub holiday_provider: Option<Box<dyn HolidayProvider>>,

    // legends
    pub primary_legends: Vec<LegendItem>,
    pub secondary_legends: Vec<LegendItem>,

    /// Month shown first; defaults to today.
    pub initial_date: Option<NaiveDate>,

    /// Accessibility label for month titles.
    pub month_label: Option<MonthLabel>,

    /// Reference "today"; defaults to the local clock.
    pub today: Option<NaiveDate>,
}

impl CalendarOptions {
    pub fn new(target: impl Into<Target>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn start_week_on(mut self, day: i32) -> Self {
        self.start_week_on = Some(day);
        self
    }

    pub fn selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = Some(mode);
        self
    }

    pub fn min_date(mut self, date: NaiveDate) -> Self {
        self.min_date = Some(date);
        self
    }

    pub fn max_date(mut self, date: NaiveDate) -> Self {
        self.max_date = Some(date);
        self
    }

    pub fn disable_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(NaiveDate) -> bool + 'static,
    {
        self.is_date_disabled = Some(Box::new(predicate));
        self
    }

    pub fn has_info(mut self, has_info: bool) -> Self {
        self.has_info = has_info;
        self
    }

    pub fn shown_months(mut self, months: u8) -> Self {
        self.shown_months = Some(months);
        self
    }

    pub fn availability(mut self, availability: Availability) -> Self {
        self.availability = Some(availability);
        self
    }

    pub fn holidays(mut self, country: HolidayCountry) -> Self {
        self.enable_holidays = true;
        self.holiday_country = Some(country);
        self
    }

    pub fn holiday_language(mut self, language: HolidayLanguage) -> Self {
        self.holiday_language = Some(language);
        self
    }

    pub fn holiday_provider<P>(mut self, provider: P) -> Self
    where
        P: HolidayProvider + 'static,
    {
        self.enable_holidays = true;
        self.holiday_provider = Some(Box::new(provider));
        self
    }

    pub fn primary_legends(mut self, legends: Vec<LegendItem>) -> Self {
        self.primary_legends = legends;
        self
    }

    pub fn secondary_legends(mut self, legends: Vec<LegendItem>) -> Self {
        self.secondary_legends = legends;
        self
    }

    pub fn initial_date(mut self, date: NaiveDate) -> Self {
        self.initial_date = Some(date);
        self
    }

    pub fn month_label<F>(mut self, label: F) -> Self
    where
        F: Fn(NaiveDate) -> String + 'static,
    {
        self.month_label = Some(Box::new(label));
        self
    }

    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}
