//! The radio transport boundary.
//!
//! The controller is transport-agnostic: anything that can deliver
//! peer-addressed datagrams on a shared channel can carry the protocol.
//! Implementations wrap the actual radio driver (peer table, channel
//! bookkeeping) and feed inbound datagrams to a
//! [`ReplyHandler`](crate::ReplyHandler).

use thiserror::Error;

use nowswitch_protocol::Address;

/// Errors reported by a transport implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A datagram could not be handed to the radio.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// The peer table rejected a registration.
    #[error("peer registration failed: {0}")]
    AddPeerFailed(String),
}

/// Source information accompanying an inbound datagram.
#[derive(Debug, Clone)]
pub struct RecvInfo {
    /// Address the datagram was sent from.
    pub src: Address,
}

/// A connectionless, peer-addressed datagram radio.
///
/// `send` succeeding means the radio accepted the datagram, not that the
/// peer received it; no delivery guarantee exists at this layer.
pub trait Transport {
    /// Send one datagram to `dest`.
    fn send(&mut self, dest: &Address, payload: &[u8]) -> Result<(), TransportError>;

    /// Register `peer` in the radio's peer table.
    ///
    /// The controller only registers the broadcast address, and at most
    /// once after the first success.
    fn add_peer(&mut self, peer: &Address) -> Result<(), TransportError>;

    /// Current radio channel.
    fn channel(&self) -> u8;

    /// Stage a new radio channel.
    fn set_channel(&mut self, channel: u8);

    /// Apply a staged channel change to the radio.
    fn apply_channel(&mut self);
}
