pub mod relay;

pub use relay::{serve, RelaySnapshot};
