use url::Url;

use super::common::{fragment_name, host_to_server, port_from, query_map, required};
use super::DecodeError;
use crate::models::{CommonProxyOptions, Proxy, RealityOpts};

/// Parse a vless link into a Proxy object
///
/// `security=tls` and `security=reality` both switch TLS on; reality
/// additionally carries the handshake parameters `sni`, `fp`, `pbk` and
/// `sid`, all of which default rather than fail when absent. The client
/// fingerprint defaults to `chrome` under reality but is only emitted for
/// plain TLS when the link names one.
pub fn explode_vless(vless: &str) -> Result<Proxy, DecodeError> {
    if !vless.starts_with("vless://") {
        return Err(DecodeError::WrongScheme("vless://"));
    }

    let url = Url::parse(vless)?;
    let params = query_map(&url);

    let server = host_to_server(&url)?;
    let port = port_from(&url)?;
    let uuid = required(url.username(), "uuid")?;
    let name = fragment_name(&url, "vless");

    let network = params
        .get("type")
        .cloned()
        .unwrap_or_else(|| "tcp".to_string());
    let security = params.get("security").map(String::as_str).unwrap_or("");
    let tls = matches!(security, "tls" | "reality");
    let flow = params.get("flow").cloned();

    let mut servername = None;
    let mut client_fingerprint = None;
    let mut reality_opts = None;

    match security {
        "reality" => {
            servername = Some(params.get("sni").cloned().unwrap_or_default());
            client_fingerprint = Some(
                params
                    .get("fp")
                    .cloned()
                    .unwrap_or_else(|| "chrome".to_string()),
            );
            reality_opts = Some(RealityOpts {
                public_key: params.get("pbk").cloned().unwrap_or_default(),
                short_id: params.get("sid").cloned().unwrap_or_default(),
            });
        }
        "tls" => {
            servername = Some(params.get("sni").cloned().unwrap_or_default());
            client_fingerprint = params.get("fp").cloned();
        }
        _ => {}
    }

    Ok(Proxy::Vless {
        common: CommonProxyOptions { name, server, port },
        uuid,
        network,
        tls,
        udp: true,
        flow,
        servername,
        client_fingerprint,
        reality_opts,
    })
}
