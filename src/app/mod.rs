pub mod menu;
pub mod render;

pub use menu::Menu;
pub use render::{render_view, ReportView};
