pub mod availability;
pub mod holidays;
pub mod listeners;
pub mod logger;
pub mod plugins;

#[cfg(test)]
pub mod test_utils;

pub use availability::*;
pub use holidays::*;
pub use listeners::*;
pub use logger::*;
pub use plugins::*;
