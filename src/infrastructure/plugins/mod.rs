pub mod event_log;
pub mod log_listener;
pub mod recording;

pub use event_log::*;
pub use log_listener::*;
pub use recording::*;
