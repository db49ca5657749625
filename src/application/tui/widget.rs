//! Drawing of a [`RenderedCalendar`] into a ratatui buffer.
//!
//! Geometry lives in [`CalendarLayout`] so the picker can hit-test mouse
//! positions against exactly what was drawn.

use super::theme::Theme;
use crate::application::{
    CELL_HEIGHT, CELL_WIDTH, DayCell, GridCell, MONTH_GAP, MONTH_WIDTH, RenderedCalendar,
};
use crate::entities::{AvailabilityMark, AvailabilityTier, LegendItem};
use chrono::{Datelike, NaiveDate, Weekday};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

const PREV_LABEL: &str = "‹ Prev";
const NEXT_LABEL: &str = "Next ›";

/// Screen rectangles of everything the user can point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarLayout {
    pub summary: Option<Rect>,
    pub prev: Option<Rect>,
    pub next: Rect,
    pub titles: Vec<Rect>,
    pub weekday_rows: Vec<Rect>,
    /// Area covering all month grids; leaving it clears the hover preview.
    pub months: Rect,
    pub cells: Vec<(Rect, NaiveDate)>,
    pub footer: Rect,
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

fn clip(area: Rect, bounds: Rect) -> Rect {
    area.intersection(bounds)
}

impl CalendarLayout {
    /// Rows needed to draw `view`.
    pub fn height(view: &RenderedCalendar) -> u16 {
        let summary = if view.header.summary.is_some() { 2 } else { 0 };
        let weeks = view
            .months
            .iter()
            .map(|month| month.cells.len() / 7)
            .max()
            .unwrap_or(0) as u16;
        let footer = Self::footer_height(view);
        summary + 2 + 1 + weeks * CELL_HEIGHT + footer
    }

    fn footer_height(view: &RenderedCalendar) -> u16 {
        let mut rows = 0;
        if !view.footer.primary.is_empty() {
            rows += 1;
        }
        if !view.footer.secondary.is_empty() {
            rows += 1;
        }
        if rows > 0 { rows + 1 } else { 0 }
    }

    pub fn compute(view: &RenderedCalendar, area: Rect) -> Self {
        let mut y = area.y;

        let summary = view.header.summary.as_ref().map(|_| {
            let rect = Rect::new(area.x, y, area.width, 1);
            y += 2;
            clip(rect, area)
        });

        let label_width = PREV_LABEL.chars().count() as u16;
        let prev = view
            .header
            .show_prev
            .then(|| clip(Rect::new(area.x, y, label_width, 1), area));
        let right_edge = area.x + view.metrics.width.min(area.width);
        let next = clip(
            Rect::new(right_edge.saturating_sub(label_width), y, label_width, 1),
            area,
        );
        y += 2;

        let month_x = |index: usize| area.x + index as u16 * (MONTH_WIDTH + MONTH_GAP);
        let titles = (0..view.months.len())
            .map(|i| clip(Rect::new(month_x(i), y - 2, MONTH_WIDTH, 1), area))
            .collect();
        let weekday_rows = (0..view.months.len())
            .map(|i| clip(Rect::new(month_x(i), y, MONTH_WIDTH, 1), area))
            .collect();
        y += 1;

        let mut cells = Vec::new();
        let mut grid_height = 0;
        for (index, month) in view.months.iter().enumerate() {
            for (position, cell) in month.cells.iter().enumerate() {
                let GridCell::Day(day) = cell else {
                    continue;
                };
                let column = (position % 7) as u16;
                let week = (position / 7) as u16;
                let rect = Rect::new(
                    month_x(index) + column * CELL_WIDTH,
                    y + week * CELL_HEIGHT,
                    CELL_WIDTH,
                    CELL_HEIGHT,
                );
                cells.push((clip(rect, area), day.date));
            }
            grid_height = grid_height.max((month.cells.len() / 7) as u16 * CELL_HEIGHT);
        }
        let months = clip(
            Rect::new(area.x, y, view.metrics.width, grid_height),
            area,
        );
        y += grid_height + 1;

        let footer = clip(
            Rect::new(area.x, y, area.width, Self::footer_height(view).saturating_sub(1)),
            area,
        );

        Self {
            summary,
            prev,
            next,
            titles,
            weekday_rows,
            months,
            cells,
            footer,
        }
    }

    /// Date of the enabled or disabled day cell under a screen position.
    pub fn date_at(&self, column: u16, row: u16) -> Option<NaiveDate> {
        self.cells
            .iter()
            .find(|(rect, _)| contains(*rect, column, row))
            .map(|(_, date)| *date)
    }

    pub fn is_prev(&self, column: u16, row: u16) -> bool {
        self.prev.is_some_and(|rect| contains(rect, column, row))
    }

    pub fn is_next(&self, column: u16, row: u16) -> bool {
        contains(self.next, column, row)
    }

    pub fn in_months(&self, column: u16, row: u16) -> bool {
        contains(self.months, column, row)
    }
}

/// Draws a rendered calendar. `cursor` highlights the keyboard focus.
pub struct CalendarWidget<'a> {
    view: &'a RenderedCalendar,
    theme: &'a Theme,
    cursor: Option<NaiveDate>,
}

impl<'a> CalendarWidget<'a> {
    pub fn new(view: &'a RenderedCalendar, theme: &'a Theme) -> Self {
        Self {
            view,
            theme,
            cursor: None,
        }
    }

    pub fn cursor(mut self, cursor: Option<NaiveDate>) -> Self {
        self.cursor = cursor;
        self
    }

    fn day_style(&self, day: &DayCell) -> Style {
        let colors = &self.theme.colors;
        let mut style = if day.disabled {
            colors.disabled.to_ratatui()
        } else if day.selected {
            colors.selected.to_ratatui_with_modifier(Modifier::BOLD)
        } else if day.in_range {
            colors.in_range.to_ratatui()
        } else if day.hover_range {
            colors.hover_range.to_ratatui()
        } else if day.today {
            colors.today.to_ratatui_with_modifier(Modifier::BOLD)
        } else if day.holiday.is_some() {
            colors.holiday.to_ratatui()
        } else if matches!(day.date.weekday(), Weekday::Sat | Weekday::Sun) {
            colors.weekend.to_ratatui()
        } else {
            colors.day.to_ratatui()
        };
        if day.holiday.is_some() && !day.disabled {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if self.cursor == Some(day.date) {
            style = style.patch(colors.cursor.to_ratatui());
        }
        style
    }

    fn availability_span(&self, mark: &AvailabilityMark) -> Span<'static> {
        let colors = &self.theme.colors;
        match mark {
            AvailabilityMark::Price(text) => {
                let width = CELL_WIDTH as usize - 1;
                let text: String = text.chars().take(width).collect();
                Span::styled(format!("{:>width$}", text), colors.price.to_ratatui())
            }
            AvailabilityMark::Status(Some(tier)) => {
                let pair = match tier {
                    AvailabilityTier::Full => &colors.full,
                    AvailabilityTier::Low => &colors.low,
                    AvailabilityTier::SoldOut => &colors.sold_out,
                };
                Span::styled(format!("   {} ", tier.symbol()), pair.to_ratatui())
            }
            AvailabilityMark::Status(None) => Span::raw(""),
        }
    }

    fn render_day(&self, day: &DayCell, area: Rect, buf: &mut Buffer) {
        let style = self.day_style(day);
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), style);
        buf.set_string(area.x, area.y, format!("{:>4} ", day.day()), style);

        if area.height > 1 {
            if let Some(mark) = &day.availability {
                let span = self.availability_span(mark);
                buf.set_span(area.x, area.y + 1, &span, area.width);
            }
        }
    }

    fn legend_line(&self, legends: &[LegendItem], primary: bool) -> Line<'static> {
        let mut spans = Vec::new();
        for legend in legends {
            if primary {
                spans.push(Span::styled(
                    "● ",
                    Style::default().fg(self.theme.legend_color(legend.color.as_deref())),
                ));
            } else {
                let symbol = legend.shape.map(|shape| shape.symbol()).unwrap_or("·");
                spans.push(Span::styled(
                    format!("{} ", symbol),
                    self.theme.colors.accent.to_ratatui(),
                ));
            }
            spans.push(Span::styled(
                format!("{}   ", legend.label),
                self.theme.colors.legend.to_ratatui(),
            ));
        }
        Line::from(spans)
    }
}

impl Widget for CalendarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = CalendarLayout::compute(self.view, area);
        let colors = &self.theme.colors;

        if let (Some(summary), Some(rect)) = (&self.view.header.summary, layout.summary) {
            Paragraph::new(summary.text())
                .style(colors.summary.to_ratatui_with_modifier(Modifier::BOLD))
                .render(rect, buf);
        }

        for (title, rect) in self.view.header.titles.iter().zip(&layout.titles) {
            Paragraph::new(title.as_str())
                .style(colors.title.to_ratatui_with_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .render(*rect, buf);
        }

        // Drawn after the titles, which share the row.
        if let Some(rect) = layout.prev {
            buf.set_string(rect.x, rect.y, PREV_LABEL, colors.nav.to_ratatui());
        }
        buf.set_string(layout.next.x, layout.next.y, NEXT_LABEL, colors.nav.to_ratatui());

        for (month, rect) in self.view.months.iter().zip(&layout.weekday_rows) {
            for (column, name) in month.weekdays.iter().enumerate() {
                let x = rect.x + column as u16 * CELL_WIDTH;
                if x >= rect.x + rect.width {
                    break;
                }
                buf.set_stringn(
                    x,
                    rect.y,
                    format!("{:>4}", name),
                    (rect.x + rect.width - x) as usize,
                    colors.weekday.to_ratatui(),
                );
            }
        }

        for (rect, date) in &layout.cells {
            if rect.width == 0 || rect.height == 0 {
                continue;
            }
            if let Some(day) = self.view.day(*date) {
                self.render_day(day, *rect, buf);
            }
        }

        let mut lines = Vec::new();
        if !self.view.footer.primary.is_empty() {
            lines.push(self.legend_line(&self.view.footer.primary, true));
        }
        if !self.view.footer.secondary.is_empty() {
            lines.push(self.legend_line(&self.view.footer.secondary, false));
        }
        if !lines.is_empty() && layout.footer.height > 0 {
            Paragraph::new(lines).render(layout.footer, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Availability, AvailabilityKind, LegendShape};
    use crate::infrastructure::test_utils::fixtures::{date, options_at, recorded_calendar};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn buffer_lines(buf: &Buffer) -> Vec<String> {
        let width = buf.area.width as usize;
        buf.content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }

    #[test]
    fn draws_titles_weekdays_and_days() {
        let (calendar, _) = recorded_calendar(options_at(date(2024, 1, 10)).shown_months(2));
        let theme = Theme::default();
        let area = Rect::new(0, 0, 100, 20);
        let mut buf = Buffer::empty(area);
        CalendarWidget::new(calendar.view(), &theme).render(area, &mut buf);

        let text = buffer_lines(&buf).join("\n");
        assert!(text.contains("January 2024"));
        assert!(text.contains("February 2024"));
        assert!(text.contains("Sun"));
        assert!(text.contains("31"));
        assert!(text.contains(NEXT_LABEL));
        assert!(!text.contains(PREV_LABEL));
    }

    #[test]
    fn layout_maps_positions_back_to_dates() {
        let (calendar, _) = recorded_calendar(options_at(date(2024, 1, 10)));
        let area = Rect::new(5, 2, 60, 20);
        let layout = CalendarLayout::compute(calendar.view(), area);

        // January 2024 starts on a Monday: column 1 of the first week.
        let (first, first_date) = layout.cells[0];
        assert_eq!(first_date, date(2024, 1, 1));
        assert_eq!(first.x, 5 + CELL_WIDTH);
        assert_eq!(layout.date_at(first.x + 2, first.y + 1), Some(date(2024, 1, 1)));
        assert_eq!(layout.date_at(5, first.y), None);
        assert!(layout.in_months(first.x, first.y));
        assert!(!layout.in_months(first.x, area.y));
        assert_eq!(layout.cells.len(), 31);
    }

    #[test]
    fn navigation_controls_are_hit_testable() {
        let (mut calendar, _) = recorded_calendar(options_at(date(2024, 1, 10)));
        let area = Rect::new(0, 0, 60, 20);

        let layout = CalendarLayout::compute(calendar.view(), area);
        assert!(layout.prev.is_none());
        assert!(layout.is_next(layout.next.x, layout.next.y));

        calendar.next_month();
        let layout = CalendarLayout::compute(calendar.view(), area);
        assert!(layout.is_prev(0, layout.next.y));
    }

    #[test]
    fn draws_availability_and_legends() {
        let availability = Availability::new(AvailabilityKind::Status)
            .with_entry(date(2024, 1, 15), "0")
            .with_entry(date(2024, 1, 16), "3");
        let (calendar, _) = recorded_calendar(
            options_at(date(2024, 1, 10))
                .availability(availability)
                .secondary_legends(vec![LegendItem::shaped("Fully booked", LegendShape::Cross)]),
        );
        let theme = Theme::default();
        let height = CalendarLayout::height(calendar.view());

        let mut terminal = Terminal::new(TestBackend::new(60, height)).unwrap();
        terminal
            .draw(|frame| {
                frame.render_widget(CalendarWidget::new(calendar.view(), &theme), frame.area())
            })
            .unwrap();

        let text = buffer_lines(terminal.backend().buffer()).join("\n");
        assert!(text.contains("×"));
        assert!(text.contains("△"));
        assert!(text.contains("Fully booked"));
    }

    #[test]
    fn selected_days_use_the_selected_style() {
        let (mut calendar, _) = recorded_calendar(options_at(date(2024, 1, 10)));
        calendar.select(date(2024, 1, 15));
        let theme = Theme::default();
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        CalendarWidget::new(calendar.view(), &theme).render(area, &mut buf);

        let layout = CalendarLayout::compute(calendar.view(), area);
        let (rect, _) = layout
            .cells
            .iter()
            .find(|(_, d)| *d == date(2024, 1, 15))
            .copied()
            .unwrap();
        let expected = theme.colors.selected.to_ratatui().bg;
        assert_eq!(buf[(rect.x, rect.y)].bg, expected.unwrap());
    }
}
