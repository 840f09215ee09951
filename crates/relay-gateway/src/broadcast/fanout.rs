//! Delivery capability used by the relay

use crate::connection::ConnectionHandle;
use crate::protocol::RelayFrame;
use async_trait::async_trait;

/// Emit primitives provided by the transport side
///
/// The relay never owns the set of live connections; whoever does
/// implements this trait. Delivery is best-effort: failures for one
/// connection are reported only through the return values and never
/// stop delivery to the others.
#[async_trait]
pub trait Fanout: Send + Sync {
    /// Deliver a frame to one connection, returning whether it was queued
    async fn emit_to(&self, handle: ConnectionHandle, frame: RelayFrame) -> bool;

    /// Deliver a frame to every live connection, returning how many accepted it
    async fn emit_all(&self, frame: RelayFrame) -> usize;
}
