//! Subscription acquisition over HTTP(S)

use std::time::Duration;

use log::info;
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT: u64 = 15;

/// User agent offered to subscription servers. Some panels answer 403 to
/// clients they do not recognize, so a plain browser string is used.
pub const SUBSCRIPTION_USER_AGENT: &str = "Mozilla/5.0";

/// Response header carrying subscription usage metadata.
pub const USER_INFO_HEADER: &str = "Subscription-Userinfo";

/// Why a subscription fetch failed. Fetch failures are terminal for the
/// whole conversion, unlike per-link decode failures.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP error: {0}")]
    Status(StatusCode),
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

/// Whether the operator input names a remote subscription rather than being
/// a raw link payload itself.
pub fn is_http_url(input: &str) -> bool {
    starts_with_ignore_case(input, "http://") || starts_with_ignore_case(input, "https://")
}

/// The one supported retry rewrite: a 400 answer to a plain-http URL is
/// retried once against the https equivalent. Commonly the panel sits behind
/// a TLS-only port and answers plain HTTP with 400.
pub fn https_fallback(url: &str, error: &FetchError) -> Option<String> {
    match error {
        FetchError::Status(status)
            if *status == StatusCode::BAD_REQUEST
                && starts_with_ignore_case(url, "http://") =>
        {
            Some(format!("https://{}", &url["http://".len()..]))
        }
        _ => None,
    }
}

async fn fetch_once(client: &Client, url: &str) -> Result<(String, Option<String>), FetchError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let user_info = response
        .headers()
        .get(USER_INFO_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let body = response.text().await?;
    Ok((body, user_info))
}

/// Fetches a subscription document, returning the body and the verbatim
/// `Subscription-Userinfo` header when the server sent one.
pub async fn fetch_subscription(url: &str) -> Result<(String, Option<String>), FetchError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT))
        .user_agent(SUBSCRIPTION_USER_AGENT)
        .build()?;

    match fetch_once(&client, url).await {
        Ok(result) => Ok(result),
        Err(error) => match https_fallback(url, &error) {
            Some(https_url) => {
                info!("got 400 over plain http, retrying via {}", https_url);
                fetch_once(&client, &https_url).await
            }
            None => Err(error),
        },
    }
}

/// Resolves the operator input into a payload: remote subscriptions are
/// fetched, anything else is treated as the payload itself and carries no
/// usage metadata.
pub async fn acquire(input: &str) -> Result<(String, Option<String>), FetchError> {
    if is_http_url(input) {
        info!("fetching subscription: {}", input);
        fetch_subscription(input).await
    } else {
        info!("input is a raw link payload");
        Ok((input.to_string(), None))
    }
}
