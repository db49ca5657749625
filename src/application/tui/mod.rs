pub mod picker;
pub mod text;
pub mod theme;
pub mod widget;

pub use picker::*;
pub use text::*;
pub use theme::*;
pub use widget::*;
