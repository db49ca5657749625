use crate::application::{DayCell, MonthGrid};
use crate::entities::{EMPTY_DATE_PLACEHOLDER, LegendItem, format_inventory_key, Selection};
use chrono::NaiveDate;

/// Columns taken by one day cell.
pub const CELL_WIDTH: u16 = 6;
/// Rows taken by one day cell: day number, availability line.
pub const CELL_HEIGHT: u16 = 2;
/// Columns taken by one month grid.
pub const MONTH_WIDTH: u16 = CELL_WIDTH * 7;
/// Columns between two month grids.
pub const MONTH_GAP: u16 = 4;

/// Sizing of one calendar instance, derived from how many months it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    pub shown_months: u8,
    pub width: u16,
}

impl LayoutMetrics {
    pub fn for_months(shown_months: u8) -> Self {
        let months = shown_months.max(1) as u16;
        Self {
            shown_months: shown_months.max(1),
            width: months * MONTH_WIDTH + (months - 1) * MONTH_GAP,
        }
    }
}

/// Selection summary shown above the navigation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryView {
    Range {
        start: String,
        end: String,
        nights: i64,
    },
    Single(String),
}

impl SummaryView {
    pub fn range(selection: &Selection) -> Self {
        let format = |date: Option<NaiveDate>| {
            date.map(format_inventory_key)
                .unwrap_or_else(|| EMPTY_DATE_PLACEHOLDER.to_string())
        };
        SummaryView::Range {
            start: format(selection.start),
            end: format(selection.end),
            nights: selection.nights.unwrap_or(0),
        }
    }

    pub fn single(selection: &Selection) -> Self {
        match selection.start {
            Some(date) => SummaryView::Single(format!("Selected: {}", format_inventory_key(date))),
            None => SummaryView::Single("Select a date".to_string()),
        }
    }

    pub fn text(&self) -> String {
        match self {
            SummaryView::Range { start, end, nights } => {
                format!("{}  →  {}  |  {} Nights", start, end, nights)
            }
            SummaryView::Single(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub summary: Option<SummaryView>,
    /// Hidden while the first displayed month is the current month.
    pub show_prev: bool,
    pub titles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FooterView {
    pub primary: Vec<LegendItem>,
    pub secondary: Vec<LegendItem>,
}

impl FooterView {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }
}

/// Output of one render pass: header, month grids, footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCalendar {
    pub header: HeaderView,
    pub months: Vec<MonthGrid>,
    pub footer: FooterView,
    pub metrics: LayoutMetrics,
}

impl RenderedCalendar {
    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.months.iter().flat_map(MonthGrid::days)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayCell> {
        self.days().find(|cell| cell.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_scales_with_shown_months() {
        assert_eq!(LayoutMetrics::for_months(1).width, 42);
        assert_eq!(LayoutMetrics::for_months(2).width, 88);
        assert_eq!(LayoutMetrics::for_months(0).shown_months, 1);
    }

    #[test]
    fn range_summary_uses_placeholders() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15);
        let summary = SummaryView::range(&Selection::new(start, None));
        assert_eq!(
            summary,
            SummaryView::Range {
                start: "2024/01/15".to_string(),
                end: EMPTY_DATE_PLACEHOLDER.to_string(),
                nights: 0,
            }
        );
    }

    #[test]
    fn single_summary_prompts_until_picked() {
        assert_eq!(
            SummaryView::single(&Selection::default()).text(),
            "Select a date"
        );
        let picked = Selection::new(NaiveDate::from_ymd_opt(2024, 1, 15), None);
        assert_eq!(SummaryView::single(&picked).text(), "Selected: 2024/01/15");
    }
}
