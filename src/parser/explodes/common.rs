//! Helpers shared by the URI-shaped scheme decoders

use std::collections::HashMap;

use url::Url;

use super::DecodeError;
use crate::utils::url::url_decode;

/// Extracts the host, removing the brackets of a literal IPv6 address.
pub fn host_to_server(url: &Url) -> Result<String, DecodeError> {
    let host = url.host_str().ok_or(DecodeError::MissingField("server"))?;
    let host = host
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(host);
    Ok(host.to_string())
}

/// Extracts the port. Links without an explicit port do not identify an
/// endpoint, and port zero is equally unusable.
pub fn port_from(url: &Url) -> Result<u16, DecodeError> {
    match url.port() {
        None => Err(DecodeError::MissingField("port")),
        Some(0) => Err(DecodeError::InvalidPort("0".to_string())),
        Some(port) => Ok(port),
    }
}

/// Rejects an empty credential component.
pub fn required(value: &str, field: &'static str) -> Result<String, DecodeError> {
    if value.is_empty() {
        Err(DecodeError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}

/// Collects query parameters, keeping the first occurrence of each key and
/// dropping entries with a blank value, so `?sni=` reads the same as no
/// `sni` at all.
pub fn query_map(url: &Url) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (key, value) in url.query_pairs() {
        if value.is_empty() {
            continue;
        }
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}

/// Percent-decoded fragment as the display name, or the scheme's default
/// label when the link has none.
pub fn fragment_name(url: &Url, default: &str) -> String {
    match url.fragment() {
        Some(fragment) if !fragment.is_empty() => url_decode(fragment),
        _ => default.to_string(),
    }
}
