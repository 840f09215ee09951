//! # relay-gateway
//!
//! WebSocket relay for chat messages and typing indicators.
//!
//! Every connection is given a session id on connect. Chat messages are
//! acknowledged to the sender and re-broadcast to every live connection;
//! typing events are broadcast with the sender's id attached.

pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod server;
