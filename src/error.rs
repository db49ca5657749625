use thiserror::Error;

/// Errors raised while constructing a calendar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Calendar: 'target' is required.")]
    MissingTarget,
    #[error("Calendar: target element '{0}' not found.")]
    TargetNotFound(String),
    #[error("Calendar: max 'shown_months' is 2, got {0}")]
    TooManyMonths(u8),
}
