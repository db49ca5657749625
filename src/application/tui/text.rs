use super::theme::{ColorPair, Theme};
use crate::application::{DayCell, GridCell, MonthGrid, RenderedCalendar};
use crate::entities::{AvailabilityMark, AvailabilityTier, LegendItem};

/// Columns per day cell: two for the number, one marker, one availability symbol.
const TEXT_CELL_WIDTH: usize = 5;

/// Prints a rendered calendar for scripts and non-TTY output.
pub struct TextRenderer {
    theme: Theme,
    color: bool,
}

impl TextRenderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme, color: true }
    }

    pub fn plain() -> Self {
        Self {
            theme: Theme::minimal(),
            color: false,
        }
    }

    fn paint(&self, pair: &ColorPair, text: &str) -> String {
        if self.color {
            pair.colorize(text)
        } else {
            text.to_string()
        }
    }

    pub fn render(&self, view: &RenderedCalendar) -> String {
        let mut out = String::new();

        if let Some(summary) = &view.header.summary {
            out.push_str(&self.paint(&self.theme.colors.summary, &summary.text()));
            out.push_str("\n\n");
        }

        for (index, month) in view.months.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            self.render_month(month, &mut out);
        }

        let footer = [&view.footer.primary, &view.footer.secondary];
        if footer.iter().any(|legends| !legends.is_empty()) {
            out.push('\n');
            for legends in footer.into_iter().filter(|l| !l.is_empty()) {
                out.push_str(&self.legend_line(legends));
                out.push('\n');
            }
        }

        out
    }

    fn render_month(&self, month: &MonthGrid, out: &mut String) {
        let colors = &self.theme.colors;
        let width = TEXT_CELL_WIDTH * 7;

        let title = format!("{:^width$}", month.title, width = width);
        out.push_str(self.paint(&colors.title, title.trim_end()).as_str());
        out.push('\n');

        let header: String = month
            .weekdays
            .iter()
            .map(|name| {
                let short: String = name.chars().take(3).collect();
                format!("{:>4} ", short)
            })
            .collect();
        out.push_str(&self.paint(&colors.weekday, header.trim_end()));
        out.push('\n');

        let mut prices = Vec::new();
        for week in month.weeks() {
            let line: String = week
                .iter()
                .map(|cell| match cell {
                    GridCell::Empty => " ".repeat(TEXT_CELL_WIDTH),
                    GridCell::Day(day) => {
                        match &day.availability {
                            Some(AvailabilityMark::Price(price)) if !price.is_empty() => {
                                prices.push(format!("{:>2}: {}", day.day(), price));
                            }
                            _ => {}
                        }
                        self.render_day(day)
                    }
                })
                .collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }

        if !prices.is_empty() {
            out.push_str(&prices.join("  "));
            out.push('\n');
        }
    }

    fn render_day(&self, day: &DayCell) -> String {
        let colors = &self.theme.colors;
        let marker = if day.selected {
            '*'
        } else if day.in_range || day.hover_range {
            '~'
        } else if day.disabled {
            'x'
        } else if day.holiday.is_some() {
            '!'
        } else {
            ' '
        };
        let symbol = match &day.availability {
            Some(AvailabilityMark::Status(Some(tier))) => tier.symbol(),
            _ => " ",
        };

        let number = format!("{:>3}{}", day.day(), marker);
        let pair = if day.selected {
            &colors.selected
        } else if day.in_range {
            &colors.in_range
        } else if day.disabled {
            &colors.disabled
        } else if day.holiday.is_some() {
            &colors.holiday
        } else if day.today {
            &colors.today
        } else {
            &colors.day
        };
        let tier_pair = match &day.availability {
            Some(AvailabilityMark::Status(Some(AvailabilityTier::Full))) => &colors.full,
            Some(AvailabilityMark::Status(Some(AvailabilityTier::Low))) => &colors.low,
            _ => &colors.sold_out,
        };

        format!(
            "{}{}",
            self.paint(pair, &number),
            self.paint(tier_pair, symbol)
        )
    }

    fn legend_line(&self, legends: &[LegendItem]) -> String {
        legends
            .iter()
            .map(|legend| {
                let symbol = legend.shape.map(|shape| shape.symbol()).unwrap_or("●");
                format!("{} {}", symbol, legend.label)
            })
            .map(|item| self.paint(&self.theme.colors.legend, &item))
            .collect::<Vec<_>>()
            .join("   ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Availability, AvailabilityKind, LegendShape, Locale, SelectionMode};
    use crate::infrastructure::StaticHolidays;
    use crate::infrastructure::test_utils::fixtures::{date, options_at, recorded_calendar};

    #[test]
    fn prints_summary_title_and_markers() {
        let holidays = StaticHolidays::new().with_holiday(date(2024, 1, 22), "Founders");
        let (mut calendar, _) = recorded_calendar(
            options_at(date(2024, 1, 10))
                .locale(Locale::EnUs)
                .has_info(true)
                .holiday_provider(holidays),
        );
        calendar.select(date(2024, 1, 15));
        calendar.select(date(2024, 1, 17));

        let text = TextRenderer::plain().render(calendar.view());
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].contains("2 Nights"));
        assert!(text.contains("January 2024"));
        assert!(text.contains(" Sun  Mon  Tue"));
        assert!(text.contains(" 15* "));
        assert!(text.contains(" 16~ "));
        assert!(text.contains(" 17* "));
        assert!(text.contains(" 22! "));
        assert!(text.contains("  9x "));
    }

    #[test]
    fn prints_availability_and_legends() {
        let availability = Availability::new(AvailabilityKind::Status)
            .with_entry(date(2024, 1, 11), "7")
            .with_entry(date(2024, 1, 12), "2")
            .with_entry(date(2024, 1, 13), "0");
        let (mut calendar, _) = recorded_calendar(
            options_at(date(2024, 1, 10))
                .selection_mode(SelectionMode::Single)
                .has_info(true)
                .availability(availability),
        );
        calendar.set_primary_legends(vec![LegendItem::colored("Planned Stay Date", "#c4af87")]);
        calendar.set_secondary_legends(vec![LegendItem::shaped(
            "Sold out",
            LegendShape::Cross,
        )]);

        let text = TextRenderer::plain().render(calendar.view());

        assert!(text.contains(" 11 ○"));
        assert!(text.contains(" 12 △"));
        assert!(text.contains(" 13 ×"));
        assert!(text.contains("● Planned Stay Date"));
        assert!(text.contains("× Sold out"));
    }

    #[test]
    fn lists_prices_under_the_month() {
        let availability =
            Availability::new(AvailabilityKind::Price).with_entry(date(2024, 1, 20), "¥9,800");
        let (calendar, _) = recorded_calendar(
            options_at(date(2024, 1, 10))
                .has_info(true)
                .availability(availability),
        );

        let text = TextRenderer::plain().render(calendar.view());
        assert!(text.contains("20: ¥9,800"));
    }
}
