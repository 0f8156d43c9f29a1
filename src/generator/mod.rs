pub mod clash;

// Re-export format converters
pub use clash::{default_template, load_base, render_clash};
