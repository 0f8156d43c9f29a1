//! Subscription usage metadata
//!
//! Airport panels report usage through the `Subscription-Userinfo` response
//! header, a semicolon-separated `key=value` list such as
//! `upload=455727941; download=6174315083; total=1073741824000; expire=0`.
//! The raw value is relayed verbatim; the only supported mutation is
//! overriding the `total=` entry.

/// Parsed view of a `Subscription-Userinfo` header value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriptionUserInfo {
    pub upload: Option<u64>,
    pub download: Option<u64>,
    pub total: Option<u64>,
    pub expire: Option<u64>,
}

impl SubscriptionUserInfo {
    /// Parses a header value. Unknown keys and non-numeric values are
    /// ignored.
    pub fn parse(header: &str) -> Self {
        let mut info = SubscriptionUserInfo::default();
        for item in header.split(';') {
            let Some((key, value)) = item.split_once('=') else {
                continue;
            };
            let value = value.trim().parse::<u64>().ok();
            match key.trim() {
                "upload" => info.upload = value,
                "download" => info.download = value,
                "total" => info.total = value,
                "expire" => info.expire = value,
                _ => {}
            }
        }
        info
    }

    /// Whether the panel reported a zero byte quota, which usually means it
    /// never filled the field in.
    pub fn has_zero_total(&self) -> bool {
        self.total == Some(0)
    }
}

const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

/// Replaces the `total=` entry of a raw userinfo string with a quota of `gb`
/// gigabytes, leaving every other entry untouched and in order. The entry is
/// appended when the key is absent.
pub fn override_total(user_info: &str, gb: u64) -> String {
    let total_bytes = gb.saturating_mul(BYTES_PER_GB);
    let mut found = false;
    let mut parts: Vec<String> = user_info
        .split(';')
        .map(|part| {
            let trimmed = part.trim_start();
            if trimmed.starts_with("total=") {
                found = true;
                let indent = &part[..part.len() - trimmed.len()];
                format!("{}total={}", indent, total_bytes)
            } else {
                part.to_string()
            }
        })
        .collect();
    if !found {
        parts.push(format!(" total={}", total_bytes));
    }
    parts.join(";")
}
