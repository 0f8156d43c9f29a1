//! Proxy model definitions
//!
//! Contains the core data structures for decoded proxy endpoints.

use serde::{Deserialize, Serialize};

/// Represents the scheme of a proxy link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyType {
    VMess,
    Vless,
    Hysteria2,
    Tuic,
}

/// Converts a `ProxyType` into the scheme label used in links and in the
/// output document.
impl ProxyType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProxyType::VMess => "vmess",
            ProxyType::Vless => "vless",
            ProxyType::Hysteria2 => "hysteria2",
            ProxyType::Tuic => "tuic",
        }
    }
}

/// Fields every proxy carries regardless of scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonProxyOptions {
    pub name: String,
    pub server: String,
    pub port: u16,
}

/// Websocket transport options for a vmess endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsOpts {
    pub path: String,
    pub headers: WsHeaders,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsHeaders {
    #[serde(rename = "Host")]
    pub host: String,
}

/// Reality handshake parameters for a vless endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealityOpts {
    #[serde(rename = "public-key")]
    pub public_key: String,
    #[serde(rename = "short-id")]
    pub short_id: String,
}

/// One decoded proxy endpoint, tagged by scheme.
///
/// A variant only carries the fields its scheme defines, and serializes
/// directly to the proxy map shape Clash expects. Optional fields are
/// omitted from the output rather than emitted as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Proxy {
    #[serde(rename = "vmess")]
    VMess {
        #[serde(flatten)]
        common: CommonProxyOptions,
        uuid: String,
        #[serde(rename = "alterId")]
        alter_id: u16,
        cipher: String,
        network: String,
        tls: bool,
        #[serde(rename = "ws-opts", skip_serializing_if = "Option::is_none")]
        ws_opts: Option<WsOpts>,
    },
    #[serde(rename = "vless")]
    Vless {
        #[serde(flatten)]
        common: CommonProxyOptions,
        uuid: String,
        network: String,
        tls: bool,
        udp: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        flow: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        servername: Option<String>,
        #[serde(
            rename = "client-fingerprint",
            skip_serializing_if = "Option::is_none"
        )]
        client_fingerprint: Option<String>,
        #[serde(rename = "reality-opts", skip_serializing_if = "Option::is_none")]
        reality_opts: Option<RealityOpts>,
    },
    #[serde(rename = "hysteria2")]
    Hysteria2 {
        #[serde(flatten)]
        common: CommonProxyOptions,
        password: String,
        sni: String,
        #[serde(rename = "skip-cert-verify")]
        skip_cert_verify: bool,
    },
    #[serde(rename = "tuic")]
    Tuic {
        #[serde(flatten)]
        common: CommonProxyOptions,
        uuid: String,
        password: String,
        sni: String,
        #[serde(rename = "congestion-controller")]
        congestion_controller: String,
        #[serde(rename = "udp-relay-mode")]
        udp_relay_mode: String,
        #[serde(rename = "skip-cert-verify")]
        skip_cert_verify: bool,
    },
}

impl Proxy {
    pub fn common(&self) -> &CommonProxyOptions {
        match self {
            Proxy::VMess { common, .. }
            | Proxy::Vless { common, .. }
            | Proxy::Hysteria2 { common, .. }
            | Proxy::Tuic { common, .. } => common,
        }
    }

    /// Display label of this proxy, used for group membership.
    pub fn name(&self) -> &str {
        &self.common().name
    }

    pub fn proxy_type(&self) -> ProxyType {
        match self {
            Proxy::VMess { .. } => ProxyType::VMess,
            Proxy::Vless { .. } => ProxyType::Vless,
            Proxy::Hysteria2 { .. } => ProxyType::Hysteria2,
            Proxy::Tuic { .. } => ProxyType::Tuic,
        }
    }
}
