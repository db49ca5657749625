use crate::entities::CalendarEvent;
use crate::infrastructure::CalendarListener;
use anyhow::Result;

/// Listener that reports every notification through the `log` facade
pub struct LogListener;

impl CalendarListener for LogListener {
    fn on_event(&self, event: &CalendarEvent) -> Result<()> {
        match event {
            CalendarEvent::MonthChange { year, month } => {
                log::info!("{}: {:04}-{:02}", event.name(), year, month)
            }
            CalendarEvent::DateSelect { date } => log::info!("{}: {}", event.name(), date),
            CalendarEvent::RangeStart { start } => log::info!("{}: {}", event.name(), start),
            CalendarEvent::RangeComplete { start, end, nights } => log::info!(
                "{}: {} -> {} ({} nights)",
                event.name(),
                start,
                end,
                nights
            ),
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "Log"
    }
}
