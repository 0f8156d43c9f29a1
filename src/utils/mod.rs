pub mod base64;
pub mod http;
pub mod url;

// Re-export common utilities
pub use base64::{decode_base64_auto, Base64Auto};
pub use http::{acquire, fetch_subscription, FetchError};
pub use url::url_decode;
