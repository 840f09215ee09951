//! Event broadcasting
//!
//! Fans inbound chat and typing events out to the live connections.

mod error;
mod fanout;
mod relay;

pub use error::{RelayError, RelayResult};
pub use fanout::Fanout;
pub use relay::BroadcastRelay;
