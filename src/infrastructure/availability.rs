use crate::entities::{Availability, DateRange};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Source of availability payloads for the calendar
pub trait AvailabilityRepository {
    /// Load availability, keeping only the days inside `range`
    fn load(&self, range: DateRange) -> Result<Availability>;
}

/// Reads a JSON availability payload (`{"type": ..., "inventory": {...}}`) from disk
pub struct FileSystemAvailability {
    path: PathBuf,
}

impl FileSystemAvailability {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Availability> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read availability from {}", self.path.display()))?;
        let availability: Availability = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse availability in {}", self.path.display()))?;
        log::debug!(
            "loaded {} availability entries from {}",
            availability.inventory.len(),
            self.path.display()
        );
        Ok(availability)
    }
}

impl AvailabilityRepository for FileSystemAvailability {
    fn load(&self, range: DateRange) -> Result<Availability> {
        let mut availability = self.read()?;
        availability.inventory.retain(|date, _| range.contains(*date));
        Ok(availability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AvailabilityKind;
    use crate::infrastructure::test_utils::fixtures::{TestDir, date};
    use chrono::NaiveDate;

    fn everything() -> DateRange {
        DateRange::between(NaiveDate::MIN, NaiveDate::MAX)
    }

    #[test]
    fn loads_and_filters_to_range() {
        let dir = TestDir::new();
        let path = dir.write(
            "availability.json",
            r#"{ "type": "status", "inventory": { "2024/01/31": "3", "2024/02/01": "9" } }"#,
        );

        let repository = FileSystemAvailability::new(path);
        let february = repository
            .load(DateRange::between(date(2024, 2, 1), date(2024, 2, 29)))
            .unwrap();

        assert_eq!(february.kind, AvailabilityKind::Status);
        assert_eq!(february.inventory.len(), 1);
        assert_eq!(february.value(date(2024, 2, 1)), Some("9"));

        assert_eq!(repository.load(everything()).unwrap().inventory.len(), 2);
    }

    #[test]
    fn reports_the_path_on_parse_errors() {
        let dir = TestDir::new();
        let path = dir.write("broken.json", "{ not json");

        let error = FileSystemAvailability::new(&path)
            .load(everything())
            .unwrap_err();
        assert!(format!("{:#}", error).contains("broken.json"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TestDir::new();
        let repository = FileSystemAvailability::new(dir.path().join("missing.json"));
        assert!(repository.load(everything()).is_err());
    }
}
