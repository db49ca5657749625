use super::theme::Theme;
use super::widget::{CalendarLayout, CalendarWidget};
use crate::application::Calendar;
use crate::entities::Selection;
use chrono::{Duration, Months, NaiveDate};
use crossterm::ExecutableCommand;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind, poll,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::tty::IsTty;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::io::{self, Stdout, stdout};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerResult {
    /// User confirmed a complete selection (pressed `y`)
    Confirmed(Selection),
    /// User exited without confirming (quit, escape, ctrl+c, etc.)
    Cancelled(Selection),
}

/// Input handling for the picker, independent of the terminal.
#[derive(Debug, Clone)]
pub struct PickerState {
    /// Keyboard focus; acts as the hover pointer
    pub cursor: NaiveDate,
    pub should_exit: bool,
    pub confirmed: bool,
    pub show_help: bool,
}

impl PickerState {
    pub fn new(calendar: &Calendar) -> Self {
        let range = calendar.displayed_range();
        let cursor = calendar
            .selection()
            .start
            .filter(|start| range.contains(*start))
            .or_else(|| Some(calendar.today()).filter(|today| range.contains(*today)))
            .unwrap_or(range.start);

        Self {
            cursor,
            should_exit: false,
            confirmed: false,
            show_help: false,
        }
    }

    /// Move the cursor, following it into other months when it leaves the view
    fn move_cursor(&mut self, calendar: &mut Calendar, target: NaiveDate) {
        self.cursor = target;
        let range = calendar.displayed_range();
        if target < range.start || target > range.end {
            calendar.goto(target);
        }
        calendar.leave();
        calendar.hover(target);
    }

    /// Move by a day offset; stays put at the ends of the calendar.
    fn shift_cursor(&mut self, calendar: &mut Calendar, delta: Duration) {
        if let Some(target) = self.cursor.checked_add_signed(delta) {
            self.move_cursor(calendar, target);
        }
    }

    fn step_month(&mut self, calendar: &mut Calendar, forward: bool) {
        let shifted = if forward {
            calendar.next_month();
            self.cursor.checked_add_months(Months::new(1))
        } else {
            calendar.prev_month();
            self.cursor.checked_sub_months(Months::new(1))
        };
        if let Some(cursor) = shifted {
            self.cursor = cursor;
        }
    }

    /// Handle keyboard input
    pub fn handle_key_event(&mut self, calendar: &mut Calendar, key: KeyEvent) {
        match (key.code, key.modifiers) {
            // Exit
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => {
                self.should_exit = true;
            }

            // Ctrl+C and Ctrl+D
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
                self.should_exit = true;
            }

            // Navigation - Arrow keys
            (KeyCode::Left, _) | (KeyCode::Char('h'), _) => {
                self.shift_cursor(calendar, Duration::days(-1));
            }
            (KeyCode::Right, _) | (KeyCode::Char('l'), _) => {
                self.shift_cursor(calendar, Duration::days(1));
            }
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => {
                self.shift_cursor(calendar, Duration::weeks(-1));
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => {
                self.shift_cursor(calendar, Duration::weeks(1));
            }

            // Pick the focused date
            (KeyCode::Enter, _) | (KeyCode::Char(' '), _) => {
                calendar.select(self.cursor);
            }

            // Jump by month
            (KeyCode::PageUp, _) | (KeyCode::Char('p'), _) => self.step_month(calendar, false),
            (KeyCode::PageDown, _) | (KeyCode::Char('n'), _) => self.step_month(calendar, true),

            // Jump to today
            (KeyCode::Char('t'), _) => {
                self.move_cursor(calendar, calendar.today());
            }

            (KeyCode::Char('c'), _) => calendar.clear_selection(),

            // Confirm a complete selection
            (KeyCode::Char('y'), _) => {
                if calendar.selection().is_complete(calendar.mode()) {
                    self.confirmed = true;
                    self.should_exit = true;
                }
            }

            // Toggle help
            (KeyCode::Char('?'), _) => {
                self.show_help = !self.show_help;
            }

            _ => {}
        }
    }

    /// Handle mouse input against the layout that was last drawn
    pub fn handle_mouse_event(
        &mut self,
        calendar: &mut Calendar,
        layout: &CalendarLayout,
        mouse: MouseEvent,
    ) {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if layout.is_prev(column, row) {
                    self.step_month(calendar, false);
                } else if layout.is_next(column, row) {
                    self.step_month(calendar, true);
                } else if let Some(date) = layout.date_at(column, row) {
                    if calendar.select(date) {
                        self.cursor = date;
                    }
                }
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                match layout.date_at(column, row) {
                    Some(date) => {
                        if !calendar.is_disabled(date) {
                            self.cursor = date;
                        }
                        calendar.hover(date);
                    }
                    None if !layout.in_months(column, row) => calendar.leave(),
                    None => {}
                }
            }
            MouseEventKind::ScrollUp => self.step_month(calendar, false),
            MouseEventKind::ScrollDown => self.step_month(calendar, true),
            _ => {}
        }
    }

    pub fn result(&self, calendar: &Calendar) -> PickerResult {
        if self.confirmed {
            PickerResult::Confirmed(calendar.selection())
        } else {
            PickerResult::Cancelled(calendar.selection())
        }
    }
}

pub struct CalendarPicker<'a> {
    /// Terminal instance
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Theme for styling
    theme: Theme,
    /// Component being driven
    calendar: &'a mut Calendar,
    state: PickerState,
    /// Geometry of the last frame, for mouse hit-testing
    layout: Option<CalendarLayout>,
}

impl<'a> CalendarPicker<'a> {
    pub fn new(calendar: &'a mut Calendar, theme: Theme) -> io::Result<Self> {
        // First check if we're in a proper terminal
        if !IsTty::is_tty(&std::io::stdout()) {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "Not running in a TTY, cannot initialize terminal interface",
            ));
        }

        enable_raw_mode()
            .map_err(|e| io::Error::other(format!("Failed to enable raw mode: {}", e)))?;

        stdout()
            .execute(EnterAlternateScreen)
            .and_then(|out| out.execute(EnableMouseCapture))
            .map_err(|e| {
                let _ = disable_raw_mode(); // Clean up on failure
                io::Error::other(format!("Failed to enter alternate screen: {}", e))
            })?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend).map_err(|e| {
            let _ = disable_raw_mode();
            let _ = stdout().execute(DisableMouseCapture);
            let _ = stdout().execute(LeaveAlternateScreen);
            io::Error::other(format!("Failed to create terminal: {}", e))
        })?;

        let state = PickerState::new(calendar);

        Ok(Self {
            terminal,
            theme,
            calendar,
            state,
            layout: None,
        })
    }

    /// Calculate centered area with both horizontal and vertical centering
    fn calculate_centered_area(available: Rect, needed_width: u16, needed_height: u16) -> Rect {
        let width = std::cmp::min(available.width, needed_width);
        let height = std::cmp::min(available.height, needed_height);

        let left_margin = available.width.saturating_sub(width) / 2;
        let top_margin = available.height.saturating_sub(height) / 2;

        Rect {
            x: available.x + left_margin,
            y: available.y + top_margin,
            width,
            height,
        }
    }

    /// Create help text
    fn create_help_text(theme: &Theme, cursor: NaiveDate) -> Paragraph<'static> {
        let help_text = vec![
            Line::from(vec![Span::styled(
                "←→↑↓/hjkl=Move • Enter=Pick • PgUp/PgDn=Month • t=Today • c=Clear • y=Confirm • q=Quit",
                theme.colors.help_text.to_ratatui(),
            )]),
            Line::from(vec![Span::styled(
                format!("{}", cursor.format("%A, %B %d, %Y")),
                theme.colors.title.to_ratatui(),
            )]),
        ];

        Paragraph::new(help_text)
            .block(Block::default().borders(Borders::NONE))
            .alignment(Alignment::Center)
    }

    /// Run the picker loop until the user confirms or exits
    pub fn run(&mut self) -> io::Result<PickerResult> {
        const HELP_HEIGHT: u16 = 3;

        loop {
            // Check for exit condition before drawing
            if self.state.should_exit {
                break;
            }

            let view = self.calendar.view();
            let container = self.calendar.container();
            let theme = &self.theme;
            let cursor = self.state.cursor;
            let show_help = self.state.show_help;
            let mut layout = None;

            self.terminal.draw(|frame| {
                let bounds = container.intersection(frame.area());
                let calendar_height = CalendarLayout::height(view);
                let total_height = if show_help {
                    calendar_height + HELP_HEIGHT
                } else {
                    calendar_height
                };

                let centered_area =
                    Self::calculate_centered_area(bounds, view.metrics.width, total_height);

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(calendar_height),
                        Constraint::Length(if show_help { HELP_HEIGHT } else { 0 }),
                    ])
                    .split(centered_area);

                layout = Some(CalendarLayout::compute(view, chunks[0]));
                frame.render_widget(
                    CalendarWidget::new(view, theme).cursor(Some(cursor)),
                    chunks[0],
                );
                if show_help {
                    frame.render_widget(Self::create_help_text(theme, cursor), chunks[1]);
                }
            })?;
            self.layout = layout;

            // Handle events with timeout to prevent blocking indefinitely
            if !poll(std::time::Duration::from_millis(100))? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => {
                    self.state.handle_key_event(self.calendar, key);
                }
                Event::Mouse(mouse) => {
                    if let Some(layout) = &self.layout {
                        self.state.handle_mouse_event(self.calendar, layout, mouse);
                    }
                }
                Event::Resize(width, height) => {
                    self.calendar.set_container(Rect::new(0, 0, width, height));
                }
                _ => {}
            }
        }

        // Ensure proper cleanup before returning
        self.cleanup()?;

        Ok(self.state.result(self.calendar))
    }

    /// Explicit cleanup method
    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        self.terminal.backend_mut().execute(DisableMouseCapture)?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        Ok(())
    }
}

impl Drop for CalendarPicker<'_> {
    fn drop(&mut self) {
        // Fallback cleanup if explicit cleanup wasn't called
        let _ = self.cleanup();
    }
}
