use url::Url;

use super::common::{fragment_name, host_to_server, port_from, query_map, required};
use super::DecodeError;
use crate::models::{CommonProxyOptions, Proxy};

/// Parse a hysteria2 link into a Proxy object
///
/// The userinfo part of the URL is the connection password. Certificate
/// verification is only skipped for the literal `insecure=1`.
pub fn explode_hysteria2(hysteria2: &str) -> Result<Proxy, DecodeError> {
    if !hysteria2.starts_with("hysteria2://") {
        return Err(DecodeError::WrongScheme("hysteria2://"));
    }

    let url = Url::parse(hysteria2)?;
    let params = query_map(&url);

    let server = host_to_server(&url)?;
    let port = port_from(&url)?;
    let password = required(url.username(), "password")?;
    let name = fragment_name(&url, "hysteria2");

    Ok(Proxy::Hysteria2 {
        common: CommonProxyOptions { name, server, port },
        password,
        sni: params.get("sni").cloned().unwrap_or_default(),
        skip_cert_verify: params.get("insecure").map(String::as_str) == Some("1"),
    })
}
