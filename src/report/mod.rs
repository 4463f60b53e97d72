pub mod render;
pub mod windows;

pub use self::render::render_report;
pub use self::windows::{fetch_span, plan_for, recently_priced};
