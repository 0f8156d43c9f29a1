//! Core data models for the application
//!
//! This module contains the primary data structures used throughout the
//! application, separated from the logic that operates on them.
//!
//! # Usage
//!
//! Import the models directly from this module:
//!
//! ```rust
//! use subrelay::models::{CommonProxyOptions, Proxy, ProxyType};
//!
//! let proxy = Proxy::Hysteria2 {
//!     common: CommonProxyOptions {
//!         name: "HK-01".to_string(),
//!         server: "hk.example.com".to_string(),
//!         port: 443,
//!     },
//!     password: "secret".to_string(),
//!     sni: String::new(),
//!     skip_cert_verify: false,
//! };
//!
//! assert_eq!(proxy.name(), "HK-01");
//! assert_eq!(proxy.proxy_type(), ProxyType::Hysteria2);
//! ```

pub mod proxy;
pub mod traffic;

pub use proxy::*;
pub use traffic::{override_total, SubscriptionUserInfo};
