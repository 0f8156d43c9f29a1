pub mod explodes;
pub mod subparser;

// Re-export the entry points used by the conversion pipeline
pub use explodes::{DecodeError, LinkScheme};
pub use subparser::{extract_links, parse_links};
