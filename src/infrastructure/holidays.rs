//! Holiday lookups used to mark days in the month grid.
//!
//! The calendar only needs one question answered: "is this date a holiday,
//! and if so what is it called". Providers answer it; [`HolidayCache`]
//! memoizes the answers so each date is looked up at most once.

use crate::entities::{Locale, parse_date_key};
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub trait HolidayProvider {
    /// Name of the holiday falling on `date`, if any.
    fn holiday_name(&self, date: NaiveDate) -> Option<String>;

    /// Human-readable name for this provider
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HolidayCountry {
    #[default]
    #[serde(rename = "JP")]
    Jp,
}

impl FromStr for HolidayCountry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "JP" => Ok(Self::Jp),
            other => Err(format!("unsupported holiday country '{}'", other)),
        }
    }
}

impl fmt::Display for HolidayCountry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HolidayCountry::Jp => write!(f, "JP"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayLanguage {
    Ja,
    En,
}

impl HolidayLanguage {
    /// Japanese names for Japanese locales, English otherwise.
    pub fn for_locale(locale: Locale) -> Self {
        if locale.tag().starts_with("ja") {
            HolidayLanguage::Ja
        } else {
            HolidayLanguage::En
        }
    }
}

impl FromStr for HolidayLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ja" => Ok(Self::Ja),
            "en" => Ok(Self::En),
            other => Err(format!("unsupported holiday language '{}'", other)),
        }
    }
}

/// Build the built-in provider for a country.
pub fn provider_for(country: HolidayCountry, language: HolidayLanguage) -> Box<dyn HolidayProvider> {
    match country {
        HolidayCountry::Jp => Box::new(JapanHolidays::new(language)),
    }
}

// ============================================================================
// Japan
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JapanHoliday {
    NewYearsDay,
    ComingOfAgeDay,
    FoundationDay,
    EmperorsBirthday,
    VernalEquinoxDay,
    ShowaDay,
    ConstitutionMemorialDay,
    GreeneryDay,
    ChildrensDay,
    MarineDay,
    MountainDay,
    RespectForTheAgedDay,
    AutumnalEquinoxDay,
    SportsDay,
    CultureDay,
    LaborThanksgivingDay,
    SubstituteHoliday,
    CitizensHoliday,
}

impl JapanHoliday {
    fn label(&self, language: HolidayLanguage) -> &'static str {
        let (ja, en) = match self {
            JapanHoliday::NewYearsDay => ("元日", "New Year's Day"),
            JapanHoliday::ComingOfAgeDay => ("成人の日", "Coming of Age Day"),
            JapanHoliday::FoundationDay => ("建国記念の日", "Foundation Day"),
            JapanHoliday::EmperorsBirthday => ("天皇誕生日", "The Emperor's Birthday"),
            JapanHoliday::VernalEquinoxDay => ("春分の日", "Vernal Equinox Day"),
            JapanHoliday::ShowaDay => ("昭和の日", "Shōwa Day"),
            JapanHoliday::ConstitutionMemorialDay => ("憲法記念日", "Constitution Memorial Day"),
            JapanHoliday::GreeneryDay => ("みどりの日", "Greenery Day"),
            JapanHoliday::ChildrensDay => ("こどもの日", "Children's Day"),
            JapanHoliday::MarineDay => ("海の日", "Marine Day"),
            JapanHoliday::MountainDay => ("山の日", "Mountain Day"),
            JapanHoliday::RespectForTheAgedDay => ("敬老の日", "Respect-for-the-Aged Day"),
            JapanHoliday::AutumnalEquinoxDay => ("秋分の日", "Autumnal Equinox Day"),
            JapanHoliday::SportsDay => ("スポーツの日", "Sports Day"),
            JapanHoliday::CultureDay => ("文化の日", "Culture Day"),
            JapanHoliday::LaborThanksgivingDay => ("勤労感謝の日", "Labor Thanksgiving Day"),
            JapanHoliday::SubstituteHoliday => ("振替休日", "Substitute Holiday"),
            JapanHoliday::CitizensHoliday => ("国民の休日", "Citizens' Holiday"),
        };
        match language {
            HolidayLanguage::Ja => ja,
            HolidayLanguage::En => en,
        }
    }
}

/// National holidays of Japan under the post-2000 "Happy Monday" rules.
///
/// Observed:
/// * fixed-date holidays (New Year's Day, Foundation Day, ...)
/// * Happy Monday holidays (Coming of Age, Marine, Respect-for-the-Aged, Sports)
/// * vernal and autumnal equinox days (astronomical approximation)
/// * the 2020/2021 Olympic relocations
/// * substitute holidays when a holiday falls on a Sunday
/// * citizens' holidays sandwiched between two holidays
#[derive(Debug, Clone, Copy)]
pub struct JapanHolidays {
    language: HolidayLanguage,
}

impl JapanHolidays {
    pub fn new(language: HolidayLanguage) -> Self {
        Self { language }
    }

    fn nth_monday(year: i32, month: u32, n: u8) -> u32 {
        NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Mon, n)
            .map(|date| date.day())
            .unwrap_or(0)
    }

    fn vernal_equinox_day(year: i32) -> u32 {
        Self::equinox_day(year, 20.8431, 20.8357)
    }

    fn autumnal_equinox_day(year: i32) -> u32 {
        Self::equinox_day(year, 23.2488, 23.2588)
    }

    fn equinox_day(year: i32, base: f64, base_before_1980: f64) -> u32 {
        let years = (year - 1980) as f64;
        let day = if year >= 1980 {
            base + 0.242194 * years - ((year - 1980) / 4) as f64
        } else {
            base_before_1980 + 0.242194 * years - (year - 1983).div_euclid(4) as f64
        };
        day.floor() as u32
    }

    /// Holidays defined by law for a specific date, before substitutes.
    fn statutory(date: NaiveDate) -> Option<JapanHoliday> {
        let (y, m, d) = (date.year(), date.month(), date.day());

        let holiday = match (m, d) {
            (1, 1) => JapanHoliday::NewYearsDay,
            (1, _) if y >= 2000 && d == Self::nth_monday(y, 1, 2) => JapanHoliday::ComingOfAgeDay,
            (1, 15) if y < 2000 => JapanHoliday::ComingOfAgeDay,
            (2, 11) if y >= 1967 => JapanHoliday::FoundationDay,
            (2, 23) if y >= 2020 => JapanHoliday::EmperorsBirthday,
            (12, 23) if (1989..=2018).contains(&y) => JapanHoliday::EmperorsBirthday,
            (3, _) if d == Self::vernal_equinox_day(y) => JapanHoliday::VernalEquinoxDay,
            (4, 29) if y >= 2007 => JapanHoliday::ShowaDay,
            (4, 29) if y >= 1989 => JapanHoliday::GreeneryDay,
            (5, 3) => JapanHoliday::ConstitutionMemorialDay,
            (5, 4) if y >= 2007 => JapanHoliday::GreeneryDay,
            (5, 5) => JapanHoliday::ChildrensDay,
            (7, 23) if y == 2020 => JapanHoliday::MarineDay,
            (7, 24) if y == 2020 => JapanHoliday::SportsDay,
            (7, 22) if y == 2021 => JapanHoliday::MarineDay,
            (7, 23) if y == 2021 => JapanHoliday::SportsDay,
            (7, _) if y >= 2003 && y != 2020 && y != 2021 && d == Self::nth_monday(y, 7, 3) => {
                JapanHoliday::MarineDay
            }
            (7, 20) if (1996..2003).contains(&y) => JapanHoliday::MarineDay,
            (8, 10) if y == 2020 => JapanHoliday::MountainDay,
            (8, 8) if y == 2021 => JapanHoliday::MountainDay,
            (8, 11) if y >= 2016 && y != 2020 && y != 2021 => JapanHoliday::MountainDay,
            (9, _) if y >= 2003 && d == Self::nth_monday(y, 9, 3) => {
                JapanHoliday::RespectForTheAgedDay
            }
            (9, 15) if y < 2003 => JapanHoliday::RespectForTheAgedDay,
            (9, _) if d == Self::autumnal_equinox_day(y) => JapanHoliday::AutumnalEquinoxDay,
            (10, _) if y >= 2000 && y != 2020 && y != 2021 && d == Self::nth_monday(y, 10, 2) => {
                JapanHoliday::SportsDay
            }
            (10, 10) if (1966..2000).contains(&y) => JapanHoliday::SportsDay,
            (11, 3) => JapanHoliday::CultureDay,
            (11, 23) => JapanHoliday::LaborThanksgivingDay,
            _ => return None,
        };
        Some(holiday)
    }

    /// A non-holiday following an unbroken run of holidays that includes a Sunday.
    fn is_substitute(date: NaiveDate) -> bool {
        let mut day = date.pred_opt();
        while let Some(current) = day {
            if Self::statutory(current).is_none() {
                return false;
            }
            if current.weekday() == Weekday::Sun {
                return true;
            }
            day = current.pred_opt();
        }
        false
    }

    /// A weekday sandwiched between two statutory holidays.
    fn is_citizens_holiday(date: NaiveDate) -> bool {
        if date.weekday() == Weekday::Sun {
            return false;
        }
        match (date.pred_opt(), date.succ_opt()) {
            (Some(before), Some(after)) => {
                Self::statutory(before).is_some() && Self::statutory(after).is_some()
            }
            _ => false,
        }
    }

    fn holiday(date: NaiveDate) -> Option<JapanHoliday> {
        if let Some(holiday) = Self::statutory(date) {
            return Some(holiday);
        }
        if Self::is_substitute(date) {
            return Some(JapanHoliday::SubstituteHoliday);
        }
        if Self::is_citizens_holiday(date) {
            return Some(JapanHoliday::CitizensHoliday);
        }
        None
    }

    /// All holidays of a year, in date order.
    pub fn holidays_in_year(&self, year: i32) -> Vec<(NaiveDate, String)> {
        let (Some(start), Some(end)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) else {
            return Vec::new();
        };
        start
            .iter_days()
            .take_while(|date| *date <= end)
            .filter_map(|date| self.holiday_name(date).map(|name| (date, name)))
            .collect()
    }
}

impl HolidayProvider for JapanHolidays {
    fn holiday_name(&self, date: NaiveDate) -> Option<String> {
        Self::holiday(date).map(|holiday| holiday.label(self.language).to_string())
    }

    fn name(&self) -> &str {
        "Japan"
    }
}

// ============================================================================
// Static table
// ============================================================================

/// Provider backed by a fixed date -> name table, e.g. company closures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticHolidays {
    names: BTreeMap<NaiveDate, String>,
}

impl StaticHolidays {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_holiday(mut self, date: NaiveDate, name: impl Into<String>) -> Self {
        self.names.insert(date, name.into());
        self
    }

    /// Load a JSON object mapping `YYYY/MM/DD` or `YYYY-MM-DD` keys to names.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read holidays from {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse holidays in {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(content)?;
        let mut names = BTreeMap::new();
        for (key, name) in raw {
            let date = parse_date_key(&key)
                .ok_or_else(|| anyhow::anyhow!("Invalid holiday date '{}'", key))?;
            names.insert(date, name);
        }
        Ok(Self { names })
    }
}

impl HolidayProvider for StaticHolidays {
    fn holiday_name(&self, date: NaiveDate) -> Option<String> {
        self.names.get(&date).cloned()
    }

    fn name(&self) -> &str {
        "Static"
    }
}

// ============================================================================
// Cache
// ============================================================================

/// Memoizes provider answers. `None` records "checked, not a holiday".
pub struct HolidayCache {
    provider: Box<dyn HolidayProvider>,
    checked: HashMap<NaiveDate, Option<String>>,
}

impl HolidayCache {
    pub fn new(provider: Box<dyn HolidayProvider>) -> Self {
        Self {
            provider,
            checked: HashMap::new(),
        }
    }

    pub fn holiday_name(&mut self, date: NaiveDate) -> Option<String> {
        if let Some(cached) = self.checked.get(&date) {
            return cached.clone();
        }
        let name = self
            .provider
            .holiday_name(date)
            .filter(|name| !name.is_empty());
        self.checked.insert(date, name.clone());
        name
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn len(&self) -> usize {
        self.checked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn english(date: NaiveDate) -> Option<String> {
        JapanHolidays::new(HolidayLanguage::En).holiday_name(date)
    }

    #[test]
    fn new_years_day() {
        assert_eq!(english(date(2024, 1, 1)).as_deref(), Some("New Year's Day"));
        assert_eq!(english(date(2024, 1, 2)), None);
    }

    #[test]
    fn happy_monday_holidays() {
        assert_eq!(english(date(2024, 1, 8)).as_deref(), Some("Coming of Age Day"));
        assert_eq!(english(date(2024, 7, 15)).as_deref(), Some("Marine Day"));
        assert_eq!(
            english(date(2024, 9, 16)).as_deref(),
            Some("Respect-for-the-Aged Day")
        );
        assert_eq!(english(date(2024, 10, 14)).as_deref(), Some("Sports Day"));
    }

    #[test]
    fn equinox_days() {
        assert_eq!(english(date(2024, 3, 20)).as_deref(), Some("Vernal Equinox Day"));
        assert_eq!(english(date(2024, 9, 22)).as_deref(), Some("Autumnal Equinox Day"));
        assert_eq!(english(date(2023, 3, 21)).as_deref(), Some("Vernal Equinox Day"));
    }

    #[test]
    fn substitute_holiday_after_sunday() {
        // Foundation Day 2024 fell on a Sunday.
        assert_eq!(english(date(2024, 2, 12)).as_deref(), Some("Substitute Holiday"));
        // Children's Day 2024 fell on a Sunday, after the Golden Week run.
        assert_eq!(english(date(2024, 5, 6)).as_deref(), Some("Substitute Holiday"));
        assert_eq!(english(date(2024, 5, 7)), None);
    }

    #[test]
    fn citizens_holiday_between_two_holidays() {
        assert_eq!(english(date(2015, 9, 22)).as_deref(), Some("Citizens' Holiday"));
    }

    #[test]
    fn olympic_relocations() {
        assert_eq!(english(date(2021, 7, 23)).as_deref(), Some("Sports Day"));
        assert_eq!(english(date(2021, 10, 11)), None);
        assert_eq!(english(date(2020, 8, 10)).as_deref(), Some("Mountain Day"));
    }

    #[test]
    fn japanese_names() {
        let provider = JapanHolidays::new(HolidayLanguage::Ja);
        assert_eq!(provider.holiday_name(date(2024, 5, 3)).as_deref(), Some("憲法記念日"));
    }

    #[test]
    fn year_listing_is_ordered() {
        let holidays = JapanHolidays::new(HolidayLanguage::En).holidays_in_year(2024);
        assert_eq!(holidays.first().map(|(d, _)| *d), Some(date(2024, 1, 1)));
        assert_eq!(holidays.last().map(|(d, _)| *d), Some(date(2024, 11, 23)));
        assert!(holidays.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn language_follows_locale() {
        assert_eq!(HolidayLanguage::for_locale(Locale::JaJp), HolidayLanguage::Ja);
        assert_eq!(HolidayLanguage::for_locale(Locale::KoKr), HolidayLanguage::En);
    }

    #[test]
    fn static_holidays_from_json() {
        let holidays =
            StaticHolidays::from_json(r#"{ "2024/12/30": "Closed", "2024-12-31": "Closed" }"#)
                .unwrap();
        assert_eq!(holidays.holiday_name(date(2024, 12, 30)).as_deref(), Some("Closed"));
        assert_eq!(holidays.holiday_name(date(2024, 12, 31)).as_deref(), Some("Closed"));
        assert!(StaticHolidays::from_json(r#"{ "soon": "Closed" }"#).is_err());
    }

    struct CountingProvider {
        calls: Rc<Cell<usize>>,
    }

    impl HolidayProvider for CountingProvider {
        fn holiday_name(&self, date: NaiveDate) -> Option<String> {
            self.calls.set(self.calls.get() + 1);
            (date.day() == 1).then(|| "First".to_string())
        }

        fn name(&self) -> &str {
            "Counting"
        }
    }

    #[test]
    fn cache_consults_provider_once_per_date() {
        let calls = Rc::new(Cell::new(0));
        let mut cache = HolidayCache::new(Box::new(CountingProvider {
            calls: Rc::clone(&calls),
        }));

        for _ in 0..3 {
            assert_eq!(cache.holiday_name(date(2024, 1, 1)).as_deref(), Some("First"));
            assert_eq!(cache.holiday_name(date(2024, 1, 2)), None);
        }

        assert_eq!(calls.get(), 2);
        assert_eq!(cache.len(), 2);
    }
}
