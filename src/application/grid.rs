//! Month grid computation.
//!
//! A month is laid out as whole weeks: leading placeholders up to the
//! configured first weekday, one cell per day, then trailing placeholders
//! up to the next multiple of seven.

use crate::application::DisablePredicate;
use crate::entities::{Availability, AvailabilityMark, DateRange, YearMonth};
use crate::infrastructure::HolidayCache;
use chrono::{Datelike, NaiveDate};

/// Offset of the 1st of the month from the first column of the grid.
pub fn grid_offset(first: NaiveDate, start_week_on: u32) -> u32 {
    (first.weekday().num_days_from_sunday() + 7 - start_week_on % 7) % 7
}

/// Smallest multiple of seven that fits `offset + days`.
pub fn total_cells(offset: u32, days: u32) -> u32 {
    (offset + days).div_ceil(7) * 7
}

/// Date bounds and custom rule deciding which days cannot be picked.
#[derive(Default)]
pub struct DisableRules {
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub predicate: Option<DisablePredicate>,
}

impl DisableRules {
    pub fn is_disabled(&self, date: NaiveDate) -> bool {
        if self.min_date.is_some_and(|min| date < min) {
            return true;
        }
        if self.max_date.is_some_and(|max| date > max) {
            return true;
        }
        self.predicate.as_ref().is_some_and(|predicate| predicate(date))
    }
}

/// Everything a day cell needs to know besides the selection.
pub struct DayContext<'a> {
    pub rules: &'a DisableRules,
    pub today: NaiveDate,
    pub availability: Option<&'a Availability>,
    pub holidays: Option<&'a mut HolidayCache>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub disabled: bool,
    pub today: bool,
    pub holiday: Option<String>,
    pub availability: Option<AvailabilityMark>,
    pub selected: bool,
    pub start: bool,
    pub end: bool,
    pub in_range: bool,
    pub hover_range: bool,
}

impl DayCell {
    fn build(date: NaiveDate, ctx: &mut DayContext<'_>) -> Self {
        let disabled = ctx.rules.is_disabled(date);
        let holiday = ctx
            .holidays
            .as_mut()
            .and_then(|holidays| holidays.holiday_name(date));
        let availability = match ctx.availability {
            Some(availability) if !disabled => Some(availability.mark(date)),
            _ => None,
        };

        Self {
            date,
            disabled,
            today: date == ctx.today,
            holiday,
            availability,
            selected: false,
            start: false,
            end: false,
            in_range: false,
            hover_range: false,
        }
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// State classes in the order hosts conventionally style them.
    pub fn classes(&self) -> Vec<&'static str> {
        let flags = [
            (self.disabled, "is-disabled"),
            (self.today, "is-today"),
            (self.holiday.is_some(), "is-holiday"),
            (self.selected, "is-selected"),
            (self.start, "is-start"),
            (self.end, "is-end"),
            (self.in_range, "is-in-range"),
            (self.hover_range, "is-hover-range"),
        ];
        flags
            .into_iter()
            .filter_map(|(on, class)| on.then_some(class))
            .collect()
    }

    fn clear_selection(&mut self) {
        self.selected = false;
        self.start = false;
        self.end = false;
        self.in_range = false;
        self.hover_range = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCell {
    Empty,
    Day(DayCell),
}

impl GridCell {
    pub fn as_day(&self) -> Option<&DayCell> {
        match self {
            GridCell::Day(day) => Some(day),
            GridCell::Empty => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year_month: YearMonth,
    pub title: String,
    pub weekdays: Vec<String>,
    pub offset: u32,
    pub days_in_month: u32,
    pub cells: Vec<GridCell>,
}

impl MonthGrid {
    pub fn build(
        year_month: YearMonth,
        start_week_on: u32,
        title: String,
        weekdays: Vec<String>,
        ctx: &mut DayContext<'_>,
    ) -> Self {
        let days_in_month = year_month.days_in_month();
        let offset = grid_offset(year_month.first_day(), start_week_on);
        let total = total_cells(offset, days_in_month);

        let cells = (0..total)
            .map(|index| {
                let day = index as i64 - offset as i64 + 1;
                if day < 1 || day > days_in_month as i64 {
                    return GridCell::Empty;
                }
                match year_month.day(day as u32) {
                    Some(date) => GridCell::Day(DayCell::build(date, ctx)),
                    None => GridCell::Empty,
                }
            })
            .collect();

        Self {
            year_month,
            title,
            weekdays,
            offset,
            days_in_month,
            cells,
        }
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(7)
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter_map(GridCell::as_day)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayCell> {
        self.days().find(|cell| cell.date == date)
    }
}

/// Recompute selection and hover-preview flags of every rendered day.
///
/// `hover` only applies while a start exists without an end.
pub fn apply_selection(
    months: &mut [MonthGrid],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    hover: Option<NaiveDate>,
) {
    let range = match (start, end) {
        (Some(start), Some(end)) => Some(DateRange::between(start, end)),
        _ => None,
    };
    let preview = match (start, end, hover) {
        (Some(start), None, Some(hover)) => Some(DateRange::between(start, hover)),
        _ => None,
    };

    for cell in months.iter_mut().flat_map(|month| month.cells.iter_mut()) {
        let GridCell::Day(day) = cell else {
            continue;
        };
        day.clear_selection();
        if start == Some(day.date) {
            day.selected = true;
            day.start = true;
        }
        if end == Some(day.date) {
            day.selected = true;
            day.end = true;
        }
        if range.is_some_and(|range| range.strictly_contains(day.date)) {
            day.in_range = true;
        }
        if !day.disabled && preview.is_some_and(|preview| preview.strictly_contains(day.date)) {
            day.hover_range = true;
        }
    }
}
