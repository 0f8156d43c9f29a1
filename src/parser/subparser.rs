//! Payload classification and batch link parsing
//!
//! A fetched payload is either a newline-delimited link list or a base64
//! blob wrapping one. A recognized scheme prefix anywhere in the text
//! short-circuits the base64 path, so a link list whose characters happen to
//! form valid base64 is never mangled.

use log::{debug, info, warn};

use crate::models::Proxy;
use crate::parser::explodes::LinkScheme;
use crate::utils::base64::decode_base64_auto;

/// Splits a payload into trimmed, non-empty candidate link lines, decoding
/// the base64 wrapper first when there is one.
pub fn extract_links(content: &str) -> Vec<String> {
    let looks_decoded = LinkScheme::ALL
        .iter()
        .any(|scheme| content.contains(scheme.prefix()));

    let body = if looks_decoded {
        content.to_string()
    } else {
        let decoded = decode_base64_auto(content);
        if decoded.is_decoded() {
            debug!("payload was base64-wrapped, decoded");
        }
        decoded.into_text()
    };

    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decodes every recognizable link in the payload, preserving input order.
/// A link that fails to decode is logged and skipped, never fatal.
pub fn parse_links(content: &str) -> Vec<Proxy> {
    let mut proxies = Vec::new();

    for line in extract_links(content) {
        let Some(scheme) = LinkScheme::of(&line) else {
            debug!("skipping unrecognized line: {}", line);
            continue;
        };
        let Some(decoder) = scheme.decoder() else {
            debug!("no decoder for {} links, dropping", scheme.label());
            continue;
        };
        match decoder(&line) {
            Ok(proxy) => proxies.push(proxy),
            Err(e) => warn!("error parsing {} link: {}", scheme.label(), e),
        }
    }

    info!("parsed {} nodes", proxies.len());
    proxies
}
