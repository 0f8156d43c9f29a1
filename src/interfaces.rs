//! Programmatic conversion entry point
//!
//! Ties acquisition, parsing and assembly together for the CLI shell and
//! for tests. Fetch failures abort the conversion; per-link decode failures
//! only shrink the proxy list, and a payload with no usable links still
//! yields a valid document.

use std::path::Path;

use log::info;
use thiserror::Error;

use crate::generator::clash::{load_base, render_clash};
use crate::parser::subparser::parse_links;
use crate::utils::http::{acquire, FetchError};

/// Outcome of one conversion run.
#[derive(Debug, Clone)]
pub struct SubscriptionResult {
    /// Serialized Clash document.
    pub document: String,
    /// Verbatim `Subscription-Userinfo` value, when the server sent one.
    pub user_info: Option<String>,
}

/// Why a conversion run failed as a whole.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Converts a subscription input (URL or raw link payload) into a Clash
/// document based on the template at `template`.
pub async fn convert_subscription(
    input: &str,
    template: &Path,
) -> Result<SubscriptionResult, ConvertError> {
    let (content, user_info) = acquire(input).await?;
    if let Some(raw) = &user_info {
        info!("received traffic info: {}", raw);
    }

    let proxies = parse_links(&content);

    let base = load_base(template);
    let document = render_clash(&proxies, base)?;

    Ok(SubscriptionResult {
        document,
        user_info,
    })
}
