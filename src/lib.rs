pub mod application;
pub mod entities;
pub mod error;
pub mod infrastructure;

pub use application::*;
pub use entities::*;
pub use error::*;
pub use infrastructure::*;
