pub mod generator;
pub mod interfaces;
pub mod models;
pub mod parser;
pub mod utils;
pub mod web_handlers;

// Re-export the main proxy types for easier access
pub use models::{Proxy, ProxyType};

// Re-export the conversion entry point
pub use interfaces::{convert_subscription, ConvertError, SubscriptionResult};
