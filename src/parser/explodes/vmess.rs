use serde_json::Value;

use super::DecodeError;
use crate::models::{CommonProxyOptions, Proxy, WsHeaders, WsOpts};
use crate::utils::base64::decode_base64_auto;

/// Parse a vmess link into a Proxy object
///
/// The link body is base64-encoded JSON: the server lives under `add`, the
/// display name under `ps`, and the transport is split across `net`, `tls`,
/// `path` and `host`. Share tools emit `port` and `aid` as either numbers
/// or numeric strings, so both shapes are accepted.
pub fn explode_vmess(vmess: &str) -> Result<Proxy, DecodeError> {
    let encoded = vmess
        .strip_prefix("vmess://")
        .ok_or(DecodeError::WrongScheme("vmess://"))?;

    let decoded = decode_base64_auto(encoded).into_text();
    let json: Value = serde_json::from_str(&decoded)?;

    let server = json["add"].as_str().unwrap_or("");
    if server.is_empty() {
        return Err(DecodeError::MissingField("add"));
    }
    let port = coerce_port(&json["port"])?;
    let uuid = json["id"].as_str().unwrap_or("");
    if uuid.is_empty() {
        return Err(DecodeError::MissingField("id"));
    }

    let name = json["ps"].as_str().unwrap_or("vmess").to_string();
    let alter_id = coerce_alter_id(&json["aid"])?;
    let network = json["net"].as_str().unwrap_or("tcp").to_string();
    let tls = json["tls"].as_str() == Some("tls");

    let ws_opts = if network == "ws" {
        Some(WsOpts {
            path: json["path"].as_str().unwrap_or("/").to_string(),
            headers: WsHeaders {
                host: json["host"].as_str().unwrap_or("").to_string(),
            },
        })
    } else {
        None
    };

    Ok(Proxy::VMess {
        common: CommonProxyOptions {
            name,
            server: server.to_string(),
            port,
        },
        uuid: uuid.to_string(),
        alter_id,
        cipher: "auto".to_string(),
        network,
        tls,
        ws_opts,
    })
}

fn coerce_port(value: &Value) -> Result<u16, DecodeError> {
    let port = match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|p| u16::try_from(p).ok())
            .ok_or_else(|| DecodeError::InvalidPort(n.to_string()))?,
        Value::String(s) => s
            .trim()
            .parse::<u16>()
            .map_err(|_| DecodeError::InvalidPort(s.clone()))?,
        Value::Null => return Err(DecodeError::MissingField("port")),
        other => return Err(DecodeError::InvalidPort(other.to_string())),
    };
    if port == 0 {
        return Err(DecodeError::InvalidPort("0".to_string()));
    }
    Ok(port)
}

fn coerce_alter_id(value: &Value) -> Result<u16, DecodeError> {
    match value {
        Value::Null => Ok(0),
        Value::Number(n) => n.as_u64().and_then(|a| u16::try_from(a).ok()).ok_or_else(|| {
            DecodeError::InvalidField {
                field: "aid",
                value: n.to_string(),
            }
        }),
        Value::String(s) => s.trim().parse::<u16>().map_err(|_| DecodeError::InvalidField {
            field: "aid",
            value: s.clone(),
        }),
        other => Err(DecodeError::InvalidField {
            field: "aid",
            value: other.to_string(),
        }),
    }
}
