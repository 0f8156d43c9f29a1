use base64::{engine::general_purpose, Engine as _};

/// Outcome of a best-effort base64 decode: either the decoded text or the
/// untouched input when it is not base64 at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Base64Auto {
    Decoded(String),
    Unchanged(String),
}

impl Base64Auto {
    /// Collapses to plain text, decoded or not.
    pub fn into_text(self) -> String {
        match self {
            Base64Auto::Decoded(text) | Base64Auto::Unchanged(text) => text,
        }
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self, Base64Auto::Decoded(_))
    }
}

/// Decodes a possibly base64-wrapped payload.
///
/// Line breaks and surrounding whitespace are stripped and padding is
/// restored before trying the standard alphabet, then the URL-safe one.
/// Payloads that do not decode to UTF-8 text under either alphabet come back
/// as [`Base64Auto::Unchanged`], so feeding plain text through is harmless.
pub fn decode_base64_auto(input: &str) -> Base64Auto {
    let mut cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect();

    let rem = cleaned.len() % 4;
    if rem != 0 {
        for _ in 0..4 - rem {
            cleaned.push('=');
        }
    }

    for engine in [&general_purpose::STANDARD, &general_purpose::URL_SAFE] {
        if let Ok(bytes) = engine.decode(&cleaned) {
            if let Ok(text) = String::from_utf8(bytes) {
                return Base64Auto::Decoded(text);
            }
        }
    }

    Base64Auto::Unchanged(input.to_string())
}
