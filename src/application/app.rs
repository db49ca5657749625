use crate::application::tui::{CalendarPicker, PickerResult, TextRenderer, Theme};
use crate::application::{Calendar, Config, OptionsFile, Regions};
use crate::entities::{Availability, DateRange};
use crate::infrastructure::{
    AvailabilityRepository, EventLogListener, FileSystemAvailability, LogListener, StaticHolidays,
};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use ratatui::layout::Rect;
use std::path::PathBuf;

/// Name the terminal area is registered under.
pub const TARGET_SELECTOR: &str = "#calendar";

/// Files supplied next to the options
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub availability: Option<PathBuf>,
    pub holidays: Option<PathBuf>,
    pub events: Option<PathBuf>,
}

pub struct CalendarApp {
    pub calendar: Calendar,
    theme: Theme,
}

impl CalendarApp {
    /// Mount a calendar on the whole terminal with the default plugins.
    pub fn new(config: &Config, options: OptionsFile, sources: Sources) -> Result<Self> {
        let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
        Self::with_area(config, options, sources, Rect::new(0, 0, width, height))
    }

    pub fn with_area(
        config: &Config,
        mut options: OptionsFile,
        sources: Sources,
        area: Rect,
    ) -> Result<Self> {
        let theme = Theme::by_name(options.theme.as_deref().unwrap_or(&config.theme));

        if let Some(path) = &sources.availability {
            let repository = FileSystemAvailability::new(path);
            options.availability = Some(load_availability(&repository, &options)?);
        }

        let mut calendar_options = options.into_options(TARGET_SELECTOR);
        if let Some(path) = &sources.holidays {
            calendar_options =
                calendar_options.holiday_provider(StaticHolidays::from_json_file(path)?);
        }

        let regions = Regions::new().with(TARGET_SELECTOR, area);
        let mut calendar =
            Calendar::new(calendar_options, &regions).context("Failed to build calendar")?;

        calendar.listen(LogListener);
        if let Some(path) = sources.events {
            calendar.listen(EventLogListener::new(path));
        }

        Ok(Self { calendar, theme })
    }

    /// Run the interactive picker until the user confirms or leaves.
    pub fn pick(&mut self) -> Result<PickerResult> {
        let mut picker = CalendarPicker::new(&mut self.calendar, self.theme.clone())
            .context("Failed to start the picker")?;
        Ok(picker.run()?)
    }

    pub fn print(&self, color: bool) -> String {
        let renderer = if color {
            TextRenderer::new(self.theme.clone())
        } else {
            TextRenderer::plain()
        };
        renderer.render(self.calendar.view())
    }
}

/// Availability for the selectable window only; days outside it are never bookable.
fn load_availability(
    repository: &impl AvailabilityRepository,
    options: &OptionsFile,
) -> Result<Availability> {
    let window = DateRange::between(
        options.min_date.unwrap_or_else(|| Local::now().date_naive()),
        options.max_date.unwrap_or(NaiveDate::MAX),
    );
    repository.load(window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::SelectionMode;
    use crate::infrastructure::test_utils::fixtures::{TestDir, date};

    fn config(dir: &TestDir) -> Config {
        Config {
            config_dir: dir.path().to_path_buf(),
            theme: "light".to_string(),
            log_file: None,
        }
    }

    #[test]
    fn mounts_on_the_registered_area_with_file_sources() {
        let dir = TestDir::new();
        let availability = dir.write(
            "availability.json",
            r#"{ "type": "status", "inventory": { "2030/01/15": 1 } }"#,
        );
        let holidays = dir.write("holidays.json", r#"{ "2030-01-16": "Founders" }"#);
        let events = dir.path().join("events.jsonl");

        let options = OptionsFile {
            selection_mode: Some(SelectionMode::Single),
            initial_date: Some(date(2030, 1, 1)),
            ..OptionsFile::default()
        };
        let sources = Sources {
            availability: Some(availability),
            holidays: Some(holidays),
            events: Some(events.clone()),
        };
        let mut app =
            CalendarApp::with_area(&config(&dir), options, sources, Rect::new(0, 0, 90, 30))
                .unwrap();

        assert_eq!(app.calendar.container(), Rect::new(0, 0, 90, 30));
        assert_eq!(app.theme.name, "Light");
        let view = app.calendar.view();
        assert!(view.day(date(2030, 1, 15)).unwrap().availability.is_some());
        assert_eq!(
            view.day(date(2030, 1, 16)).unwrap().holiday.as_deref(),
            Some("Founders")
        );

        assert!(app.calendar.select(date(2030, 1, 20)));
        let log = std::fs::read_to_string(events).unwrap();
        assert!(log.contains("calendar:date-select"));
    }

    #[test]
    fn availability_file_is_limited_to_the_selectable_window() {
        let dir = TestDir::new();
        let path = dir.write(
            "availability.json",
            r#"{ "type": "price", "inventory": {
                "2030/01/04": "¥8,000", "2030/01/15": "¥9,800", "2030/02/20": "¥7,500"
            } }"#,
        );
        let options = OptionsFile {
            min_date: Some(date(2030, 1, 10)),
            max_date: Some(date(2030, 1, 31)),
            ..OptionsFile::default()
        };

        let availability =
            load_availability(&FileSystemAvailability::new(path), &options).unwrap();
        assert_eq!(availability.inventory.len(), 1);
        assert_eq!(availability.value(date(2030, 1, 15)), Some("¥9,800"));
    }

    #[test]
    fn bad_month_count_is_reported() {
        let dir = TestDir::new();
        let options = OptionsFile {
            shown_months: Some(3),
            ..OptionsFile::default()
        };
        let error = CalendarApp::with_area(
            &config(&dir),
            options,
            Sources::default(),
            Rect::new(0, 0, 90, 30),
        )
        .err()
        .unwrap();
        assert!(format!("{:#}", error).contains("shown"));
    }

    #[test]
    fn prints_without_color() {
        let dir = TestDir::new();
        let options = OptionsFile {
            initial_date: Some(date(2030, 1, 1)),
            ..OptionsFile::default()
        };
        let app = CalendarApp::with_area(
            &config(&dir),
            options,
            Sources::default(),
            Rect::new(0, 0, 90, 30),
        )
        .unwrap();

        let text = app.print(false);
        assert!(text.contains("January 2030"));
        assert!(!text.contains('\u{1b}'));
    }
}
