/// Test utilities shared across modules
///
/// Provides a scratch directory that is removed when dropped, plus
/// builders for calendars pinned to a fixed "today" so tests do not depend
/// on the wall clock.
///
/// ## Usage Examples
///
/// ```ignore
/// use crate::infrastructure::test_utils::fixtures::{date, options_at, recorded_calendar};
///
/// #[test]
/// fn my_test() {
///     let (mut calendar, recorder) = recorded_calendar(options_at(date(2024, 1, 10)));
///     calendar.select(date(2024, 1, 15));
///     assert_eq!(recorder.events().len(), 1);
/// }
/// ```
#[cfg(test)]
pub mod fixtures {
    use crate::application::{Calendar, CalendarOptions, Regions};
    use crate::infrastructure::RecordingListener;
    use chrono::NaiveDate;
    use ratatui::layout::Rect;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    /// Options mounted on a 100x40 area with `today` pinned.
    pub fn options_at(today: NaiveDate) -> CalendarOptions {
        CalendarOptions::new(Rect::new(0, 0, 100, 40)).today(today)
    }

    /// Build a calendar with a recording listener already attached.
    pub fn recorded_calendar(options: CalendarOptions) -> (Calendar, RecordingListener) {
        let mut calendar =
            Calendar::new(options, &Regions::new()).expect("Failed to build test calendar");
        let recorder = RecordingListener::new();
        calendar.listen(recorder.clone());
        (calendar, recorder)
    }

    /// Scratch directory for file-backed tests, cleaned up on drop
    pub struct TestDir {
        _temp_dir: TempDir, // Keep temp dir alive
    }

    impl TestDir {
        pub fn new() -> Self {
            Self {
                _temp_dir: TempDir::new().expect("Failed to create temp directory"),
            }
        }

        pub fn path(&self) -> &Path {
            self._temp_dir.path()
        }

        /// Write `content` to `name` inside the directory and return its path
        pub fn write(&self, name: &str, content: &str) -> PathBuf {
            let path = self.path().join(name);
            std::fs::write(&path, content).expect("Failed to write test file");
            path
        }
    }
}
