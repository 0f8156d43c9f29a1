//! Per-scheme link decoders
//!
//! Each decoder turns one link of its scheme into a [`Proxy`]. Decoders are
//! total over arbitrary input: anything malformed becomes a [`DecodeError`],
//! never a panic, so one broken link cannot take down a batch.

pub mod common;
pub mod hysteria2;
pub mod tuic;
pub mod vless;
pub mod vmess;

use thiserror::Error;

use crate::models::Proxy;

pub use hysteria2::explode_hysteria2;
pub use tuic::explode_tuic;
pub use vless::explode_vless;
pub use vmess::explode_vmess;

/// Why a single link failed to decode.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("link does not start with `{0}`")]
    WrongScheme(&'static str),
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("invalid embedded json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid port `{0}`")]
    InvalidPort(String),
    #[error("invalid `{field}` value `{value}`")]
    InvalidField {
        field: &'static str,
        value: String,
    },
}

/// Decoder signature shared by every scheme.
pub type Decoder = fn(&str) -> Result<Proxy, DecodeError>;

/// Link schemes the classifier recognizes.
///
/// `Ss` and `Trojan` are recognized so payloads containing them are treated
/// as link lists rather than base64 blobs, but no decoder exists for them
/// and their links are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScheme {
    Vless,
    VMess,
    Hysteria2,
    Tuic,
    Ss,
    Trojan,
}

impl LinkScheme {
    pub const ALL: [LinkScheme; 6] = [
        LinkScheme::Vless,
        LinkScheme::VMess,
        LinkScheme::Hysteria2,
        LinkScheme::Tuic,
        LinkScheme::Ss,
        LinkScheme::Trojan,
    ];

    /// Scheme label without the `://` separator.
    pub fn label(self) -> &'static str {
        match self {
            LinkScheme::Vless => "vless",
            LinkScheme::VMess => "vmess",
            LinkScheme::Hysteria2 => "hysteria2",
            LinkScheme::Tuic => "tuic",
            LinkScheme::Ss => "ss",
            LinkScheme::Trojan => "trojan",
        }
    }

    /// URI prefix identifying this scheme.
    pub fn prefix(self) -> &'static str {
        match self {
            LinkScheme::Vless => "vless://",
            LinkScheme::VMess => "vmess://",
            LinkScheme::Hysteria2 => "hysteria2://",
            LinkScheme::Tuic => "tuic://",
            LinkScheme::Ss => "ss://",
            LinkScheme::Trojan => "trojan://",
        }
    }

    /// Determines the scheme of a link by literal prefix match.
    pub fn of(link: &str) -> Option<LinkScheme> {
        LinkScheme::ALL
            .into_iter()
            .find(|scheme| link.starts_with(scheme.prefix()))
    }

    /// Decode function for this scheme, when one exists.
    pub fn decoder(self) -> Option<Decoder> {
        match self {
            LinkScheme::VMess => Some(explode_vmess as Decoder),
            LinkScheme::Vless => Some(explode_vless as Decoder),
            LinkScheme::Hysteria2 => Some(explode_hysteria2 as Decoder),
            LinkScheme::Tuic => Some(explode_tuic as Decoder),
            LinkScheme::Ss | LinkScheme::Trojan => None,
        }
    }
}
