use chrono::{Datelike, NaiveDate};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Date format used for availability inventory keys and header summaries.
pub const INVENTORY_KEY_FORMAT: &str = "%Y/%m/%d";

/// Placeholder shown in the header summary for a missing range bound.
pub const EMPTY_DATE_PLACEHOLDER: &str = "—--/--/--";

pub fn format_inventory_key(date: NaiveDate) -> String {
    date.format(INVENTORY_KEY_FORMAT).to_string()
}

/// Parse a date written as `YYYY/MM/DD` or `YYYY-MM-DD`.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    let key = key.trim();
    NaiveDate::parse_from_str(key, INVENTORY_KEY_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(key, "%Y-%m-%d"))
        .ok()
}

// ============================================================================
// Year / Month
// ============================================================================

/// A calendar month. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self::from_index(year as i64 * 12 + month as i64 - 1)
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    fn index(&self) -> i64 {
        self.year as i64 * 12 + self.month as i64 - 1
    }

    /// Saturates at the first and last months chrono can represent.
    fn from_index(index: i64) -> Self {
        let index = index.clamp(
            Self::of(NaiveDate::MIN).index(),
            Self::of(NaiveDate::MAX).index(),
        );
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn add_months(&self, delta: i32) -> Self {
        Self::from_index(self.index() + delta as i64)
    }

    pub fn next(&self) -> Self {
        self.add_months(1)
    }

    pub fn prev(&self) -> Self {
        self.add_months(-1)
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        // The month after the last representable one does not exist.
        if *self >= Self::of(NaiveDate::MAX) {
            return NaiveDate::MAX;
        }
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ============================================================================
// Date Range
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Range spanning both dates, whichever order they come in.
    pub fn between(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// True for dates strictly inside the range, excluding both bounds.
    pub fn strictly_contains(&self, date: NaiveDate) -> bool {
        date > self.start && date < self.end
    }

    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days().max(0)
    }
}

// ============================================================================
// Selection
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    Single,
    #[default]
    Range,
    /// Selects like `Range`; the header summary names only the first pick.
    Multiple,
}

impl SelectionMode {
    pub fn is_single(&self) -> bool {
        matches!(self, SelectionMode::Single)
    }
}

impl FromStr for SelectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "range" => Ok(Self::Range),
            "multiple" => Ok(Self::Multiple),
            other => Err(format!("unknown selection mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Empty,
    StartOnly,
    Complete,
    Single,
}

/// Snapshot of the current selection as reported to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Selection {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub nights: Option<i64>,
}

impl Selection {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let nights = match (start, end) {
            (Some(start), Some(end)) => Some(DateRange::between(start, end).nights()),
            _ => None,
        };
        Self { start, end, nights }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn state(&self, mode: SelectionMode) -> SelectionState {
        match (mode, self.start, self.end) {
            (_, None, _) => SelectionState::Empty,
            (SelectionMode::Single, Some(_), _) => SelectionState::Single,
            (_, Some(_), None) => SelectionState::StartOnly,
            (_, Some(_), Some(_)) => SelectionState::Complete,
        }
    }

    pub fn is_complete(&self, mode: SelectionMode) -> bool {
        matches!(
            self.state(mode),
            SelectionState::Complete | SelectionState::Single
        )
    }
}

// ============================================================================
// Locale
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "ja-JP")]
    JaJp,
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "ko-KR")]
    KoKr,
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "zh-TW")]
    ZhTw,
    #[serde(rename = "id-ID")]
    IdId,
    #[serde(rename = "th-TH")]
    ThTh,
    #[serde(rename = "ar-SA")]
    ArSa,
}

impl Locale {
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::JaJp => "ja-JP",
            Locale::EnUs => "en-US",
            Locale::KoKr => "ko-KR",
            Locale::ZhCn => "zh-CN",
            Locale::ZhTw => "zh-TW",
            Locale::IdId => "id-ID",
            Locale::ThTh => "th-TH",
            Locale::ArSa => "ar-SA",
        }
    }

    pub fn all() -> [Locale; 8] {
        [
            Locale::JaJp,
            Locale::EnUs,
            Locale::KoKr,
            Locale::ZhCn,
            Locale::ZhTw,
            Locale::IdId,
            Locale::ThTh,
            Locale::ArSa,
        ]
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.replace('_', "-");
        Locale::all()
            .into_iter()
            .find(|locale| locale.tag().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unsupported locale '{}'", s))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// ============================================================================
// Availability
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityKind {
    Price,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityTier {
    Full,
    Low,
    SoldOut,
}

impl AvailabilityTier {
    /// Threshold at and above which a day counts as fully available.
    pub const FULL_THRESHOLD: i64 = 5;

    pub fn from_count(count: i64) -> Self {
        if count == 0 {
            AvailabilityTier::SoldOut
        } else if count < Self::FULL_THRESHOLD {
            AvailabilityTier::Low
        } else {
            AvailabilityTier::Full
        }
    }

    pub fn shape(&self) -> LegendShape {
        match self {
            AvailabilityTier::Full => LegendShape::Circle,
            AvailabilityTier::Low => LegendShape::Triangle,
            AvailabilityTier::SoldOut => LegendShape::Cross,
        }
    }

    pub fn symbol(&self) -> &'static str {
        self.shape().symbol()
    }
}

/// What a day cell shows on its availability line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityMark {
    Price(String),
    Status(Option<AvailabilityTier>),
}

/// Parse the leading integer of a count string, ignoring trailing text.
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    #[serde(rename = "type")]
    pub kind: AvailabilityKind,
    #[serde(
        serialize_with = "serialize_inventory",
        deserialize_with = "deserialize_inventory"
    )]
    pub inventory: BTreeMap<NaiveDate, String>,
}

impl Availability {
    pub fn new(kind: AvailabilityKind) -> Self {
        Self {
            kind,
            inventory: BTreeMap::new(),
        }
    }

    pub fn with_entry(mut self, date: NaiveDate, value: impl Into<String>) -> Self {
        self.inventory.insert(date, value.into());
        self
    }

    pub fn value(&self, date: NaiveDate) -> Option<&str> {
        self.inventory.get(&date).map(String::as_str)
    }

    pub fn mark(&self, date: NaiveDate) -> AvailabilityMark {
        match self.kind {
            AvailabilityKind::Price => {
                AvailabilityMark::Price(self.value(date).unwrap_or_default().to_string())
            }
            AvailabilityKind::Status => AvailabilityMark::Status(
                self.value(date)
                    .and_then(parse_leading_int)
                    .map(AvailabilityTier::from_count),
            ),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InventoryValue {
    Text(String),
    Count(i64),
}

fn serialize_inventory<S>(inventory: &BTreeMap<NaiveDate, String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(
        inventory
            .iter()
            .map(|(date, value)| (format_inventory_key(*date), value)),
    )
}

/// Reads inventory entries in document order. A date may appear once, in either key format.
fn deserialize_inventory<'de, D>(deserializer: D) -> Result<BTreeMap<NaiveDate, String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct InventoryVisitor;

    impl<'de> de::Visitor<'de> for InventoryVisitor {
        type Value = BTreeMap<NaiveDate, String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of YYYY/MM/DD dates to availability values")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: de::MapAccess<'de>,
        {
            let mut inventory = BTreeMap::new();
            while let Some((key, value)) = map.next_entry::<String, InventoryValue>()? {
                let date = parse_date_key(&key)
                    .ok_or_else(|| de::Error::custom(format!("invalid inventory date '{}'", key)))?;
                let value = match value {
                    InventoryValue::Text(text) => text,
                    InventoryValue::Count(count) => count.to_string(),
                };
                if inventory.insert(date, value).is_some() {
                    return Err(de::Error::custom(format!(
                        "duplicate inventory date '{}'",
                        format_inventory_key(date)
                    )));
                }
            }
            Ok(inventory)
        }
    }

    deserializer.deserialize_map(InventoryVisitor)
}

// ============================================================================
// Legends
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendShape {
    Circle,
    Triangle,
    Cross,
}

impl LegendShape {
    pub fn symbol(&self) -> &'static str {
        match self {
            LegendShape::Circle => "○",
            LegendShape::Triangle => "△",
            LegendShape::Cross => "×",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendItem {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub shape: Option<LegendShape>,
}

impl LegendItem {
    pub fn colored(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: Some(color.into()),
            shape: None,
        }
    }

    pub fn shaped(label: impl Into<String>, shape: LegendShape) -> Self {
        Self {
            label: label.into(),
            color: None,
            shape: Some(shape),
        }
    }
}

// ============================================================================
// Events
// ============================================================================

/// Notifications emitted by the calendar for its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CalendarEvent {
    MonthChange { year: i32, month: u32 },
    DateSelect { date: NaiveDate },
    RangeStart { start: NaiveDate },
    RangeComplete {
        start: NaiveDate,
        end: NaiveDate,
        nights: i64,
    },
}

impl CalendarEvent {
    pub fn name(&self) -> &'static str {
        match self {
            CalendarEvent::MonthChange { .. } => "calendar:month-change",
            CalendarEvent::DateSelect { .. } => "calendar:date-select",
            CalendarEvent::RangeStart { .. } => "calendar:range-start",
            CalendarEvent::RangeComplete { .. } => "calendar:range-complete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn year_month_wraps_around_year_boundaries() {
        let december = YearMonth::new(2023, 12);
        assert_eq!(december.next(), YearMonth::new(2024, 1));
        assert_eq!(YearMonth::new(2024, 1).prev(), december);
        assert_eq!(december.add_months(-12), YearMonth::new(2022, 12));
        assert_eq!(december.add_months(14), YearMonth::new(2025, 2));
    }

    #[test]
    fn next_then_prev_returns_to_the_same_month() {
        for index in 0..36 {
            let start = YearMonth::new(2023, 1).add_months(index);
            assert_eq!(start.next().prev(), start);
            assert_eq!(start.prev().next(), start);
        }
    }

    #[test]
    fn month_arithmetic_saturates_at_the_representable_range() {
        let last = YearMonth::of(NaiveDate::MAX);
        assert_eq!(last.next(), last);
        assert_eq!(last.add_months(i32::MAX), last);
        assert_eq!(last.last_day(), NaiveDate::MAX);
        assert_eq!(last.days_in_month(), 31);

        let first = YearMonth::of(NaiveDate::MIN);
        assert_eq!(first.prev(), first);
        assert_eq!(first.first_day(), NaiveDate::MIN);
        assert_eq!(YearMonth::new(i32::MAX, 12), last);
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(YearMonth::new(2024, 2).days_in_month(), 29);
        assert_eq!(YearMonth::new(2023, 2).days_in_month(), 28);
        assert_eq!(YearMonth::new(2100, 2).days_in_month(), 28);
        assert_eq!(YearMonth::new(2024, 12).days_in_month(), 31);
    }

    #[test]
    fn date_range_orders_bounds_and_counts_nights() {
        let range = DateRange::between(date(2024, 1, 20), date(2024, 1, 15));
        assert_eq!(range.start, date(2024, 1, 15));
        assert_eq!(range.end, date(2024, 1, 20));
        assert_eq!(range.nights(), 5);
        assert!(range.strictly_contains(date(2024, 1, 16)));
        assert!(!range.strictly_contains(date(2024, 1, 15)));
        assert!(range.contains(date(2024, 1, 15)));
        assert!(!range.contains(date(2024, 1, 21)));
    }

    #[test]
    fn selection_state_follows_mode_and_bounds() {
        let start = Some(date(2024, 1, 15));
        let end = Some(date(2024, 1, 20));
        assert_eq!(Selection::default().state(SelectionMode::Range), SelectionState::Empty);
        assert_eq!(
            Selection::new(start, None).state(SelectionMode::Range),
            SelectionState::StartOnly
        );
        assert_eq!(
            Selection::new(start, end).state(SelectionMode::Multiple),
            SelectionState::Complete
        );
        assert_eq!(
            Selection::new(start, None).state(SelectionMode::Single),
            SelectionState::Single
        );
        assert_eq!(Selection::new(start, end).nights, Some(5));
    }

    #[test]
    fn availability_tiers_follow_inventory_counts() {
        assert_eq!(AvailabilityTier::from_count(0), AvailabilityTier::SoldOut);
        assert_eq!(AvailabilityTier::from_count(1), AvailabilityTier::Low);
        assert_eq!(AvailabilityTier::from_count(4), AvailabilityTier::Low);
        assert_eq!(AvailabilityTier::from_count(5), AvailabilityTier::Full);
        assert_eq!(AvailabilityTier::from_count(120), AvailabilityTier::Full);
    }

    #[test]
    fn leading_int_parsing_ignores_trailing_text() {
        assert_eq!(parse_leading_int("12 rooms"), Some(12));
        assert_eq!(parse_leading_int(" 0"), Some(0));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("rooms"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn availability_payload_accepts_both_key_formats() {
        let json = r#"{
            "type": "status",
            "inventory": { "2024/01/15": "7", "2024-01-16": 0, "2024/01/17": "n/a" }
        }"#;
        let availability: Availability = serde_json::from_str(json).unwrap();

        assert_eq!(availability.kind, AvailabilityKind::Status);
        assert_eq!(
            availability.mark(date(2024, 1, 15)),
            AvailabilityMark::Status(Some(AvailabilityTier::Full))
        );
        assert_eq!(
            availability.mark(date(2024, 1, 16)),
            AvailabilityMark::Status(Some(AvailabilityTier::SoldOut))
        );
        assert_eq!(availability.mark(date(2024, 1, 17)), AvailabilityMark::Status(None));
        assert_eq!(availability.mark(date(2024, 1, 18)), AvailabilityMark::Status(None));
    }

    #[test]
    fn availability_payload_rejects_bad_dates() {
        let json = r#"{ "type": "price", "inventory": { "15/01/2024": "¥9,800" } }"#;
        assert!(serde_json::from_str::<Availability>(json).is_err());
    }

    #[test]
    fn availability_payload_rejects_the_same_day_twice() {
        let json = r#"{ "type": "price", "inventory": { "2024/01/15": "¥9,800", "2024-01-15": "¥7,000" } }"#;
        let error = serde_json::from_str::<Availability>(json).unwrap_err();
        assert!(error.to_string().contains("duplicate inventory date '2024/01/15'"));

        let json = r#"{ "type": "status", "inventory": { "2024/01/15": 3, "2024/01/15": 0 } }"#;
        assert!(serde_json::from_str::<Availability>(json).is_err());
    }

    #[test]
    fn price_availability_renders_literal_text() {
        let availability =
            Availability::new(AvailabilityKind::Price).with_entry(date(2024, 1, 15), "¥9,800");
        assert_eq!(
            availability.mark(date(2024, 1, 15)),
            AvailabilityMark::Price("¥9,800".to_string())
        );
        assert_eq!(
            availability.mark(date(2024, 1, 16)),
            AvailabilityMark::Price(String::new())
        );
    }

    #[test]
    fn locale_parses_tags_case_insensitively() {
        assert_eq!("ja-JP".parse::<Locale>(), Ok(Locale::JaJp));
        assert_eq!("zh_tw".parse::<Locale>(), Ok(Locale::ZhTw));
        assert!("fr-FR".parse::<Locale>().is_err());
    }

    #[test]
    fn events_serialize_with_kebab_case_tags() {
        let event = CalendarEvent::RangeComplete {
            start: date(2024, 1, 15),
            end: date(2024, 1, 20),
            nights: 5,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "range-complete");
        assert_eq!(json["start"], "2024-01-15");
        assert_eq!(json["nights"], 5);
        assert_eq!(event.name(), "calendar:range-complete");
    }
}
