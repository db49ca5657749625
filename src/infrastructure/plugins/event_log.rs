use crate::entities::CalendarEvent;
use crate::infrastructure::CalendarListener;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Plugin that appends every notification to a file as one JSON object per line
pub struct EventLogListener {
    path: PathBuf,
}

impl EventLogListener {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CalendarListener for EventLogListener {
    fn on_event(&self, event: &CalendarEvent) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open event log {}", self.path.display()))?;

        let line = serde_json::json!({
            "event": event.name(),
            "at": chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            "detail": event,
        });
        writeln!(file, "{}", line)?;

        Ok(())
    }

    fn name(&self) -> &str {
        "Event Log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn appends_one_json_line_per_event() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");
        let listener = EventLogListener::new(&path);

        listener
            .on_event(&CalendarEvent::MonthChange { year: 2024, month: 2 })
            .unwrap();
        listener
            .on_event(&CalendarEvent::RangeStart {
                start: NaiveDate::from_ymd_opt(2024, 2, 3).unwrap(),
            })
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "calendar:month-change");
        assert_eq!(lines[0]["detail"]["month"], 2);
        assert_eq!(lines[1]["detail"]["start"], "2024-02-03");
    }
}
