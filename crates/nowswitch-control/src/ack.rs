//! Acknowledgement state shared with the receive context.
//!
//! The transport's inbound notification may run on a different execution
//! context than the retry loop (callback or interrupt driven). The only
//! data crossing that boundary is the acknowledgement flag and the token
//! it is matched against, both held here behind an `Arc`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, trace};

use crate::transport::RecvInfo;
use nowswitch_protocol::Reply;

/// Shared state between the retry loop and the receive context.
#[derive(Debug)]
pub struct AckState {
    /// Substring expected in a confirming reply.
    token: Mutex<String>,
    /// Set by the receive path when a reply matches the token.
    acknowledged: AtomicBool,
}

impl AckState {
    /// Create acknowledgement state with the given response token.
    pub fn new(token: impl Into<String>) -> Self {
        AckState {
            token: Mutex::new(token.into()),
            acknowledged: AtomicBool::new(false),
        }
    }

    /// Replace the response token. Administrative; not meant to be called
    /// while a session is in flight.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.lock().unwrap() = token.into();
    }

    /// The current response token.
    pub fn token(&self) -> String {
        self.token.lock().unwrap().clone()
    }

    /// Clear the flag at the start of a session.
    pub fn arm(&self) {
        self.acknowledged.store(false, Ordering::Relaxed);
    }

    /// Check whether a confirming reply has been observed.
    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged.load(Ordering::Relaxed)
    }

    /// Match `text` against the response token, setting the flag on a hit.
    /// An empty token never matches. Returns whether the token matched.
    pub fn observe(&self, text: &str) -> bool {
        let token = self.token.lock().unwrap();
        if !token.is_empty() && text.contains(token.as_str()) {
            self.acknowledged.store(true, Ordering::Relaxed);
            true
        } else {
            false
        }
    }
}

/// Receive-context handle for classifying inbound datagrams.
///
/// Cheap to clone; hand one to whatever drives the radio's receive
/// callbacks. Both entry points decode with the same codec routine and
/// report whether the datagram was recognized. A datagram that fails to
/// decode is dropped without touching the acknowledgement flag, so a
/// garbled inbound can never satisfy a pending session.
#[derive(Debug, Clone)]
pub struct ReplyHandler {
    ack: Arc<AckState>,
}

impl ReplyHandler {
    pub(crate) fn new(ack: Arc<AckState>) -> Self {
        ReplyHandler { ack }
    }

    /// Handle a datagram addressed to us. Returns whether it was
    /// recognized.
    pub fn on_received(&self, info: &RecvInfo, data: &[u8]) -> bool {
        match Reply::parse(data) {
            Reply::Invalid { reason } => {
                trace!("ignoring datagram from {}: {}", info.src, reason);
                false
            }
            Reply::Version { mac, version } => {
                debug!("version reply from {}: {}", mac, version);
                self.confirm(data);
                true
            }
            Reply::Status {
                mac,
                switch_on,
                voltage,
            } => {
                debug!(
                    "status reply from {}: on={} voltage={:.2}V",
                    mac, switch_on, voltage
                );
                self.confirm(data);
                true
            }
            Reply::Broadcast { switch_on, voltage } => {
                trace!(
                    "heartbeat from {} on the directed path: on={} voltage={:.2}V",
                    info.src,
                    switch_on,
                    voltage
                );
                self.confirm(data);
                true
            }
        }
    }

    /// Handle a broadcast datagram. Returns whether it was recognized.
    ///
    /// Actuators answer on the broadcast path, so directed reply variants
    /// are expected here too.
    pub fn on_broadcast(&self, info: &RecvInfo, data: &[u8]) -> bool {
        match Reply::parse(data) {
            Reply::Invalid { reason } => {
                trace!("ignoring broadcast from {}: {}", info.src, reason);
                false
            }
            Reply::Broadcast { switch_on, voltage } => {
                debug!(
                    "heartbeat from {}: on={} voltage={:.2}V",
                    info.src, switch_on, voltage
                );
                self.confirm(data);
                true
            }
            Reply::Status {
                mac,
                switch_on,
                voltage,
            } => {
                debug!(
                    "status reply from {} via broadcast: on={} voltage={:.2}V",
                    mac, switch_on, voltage
                );
                self.confirm(data);
                true
            }
            Reply::Version { mac, version } => {
                debug!("version reply from {} via broadcast: {}", mac, version);
                self.confirm(data);
                true
            }
        }
    }

    /// Run the token match over the raw reply text.
    fn confirm(&self, data: &[u8]) {
        let text = String::from_utf8_lossy(data);
        if self.ack.observe(text.trim()) {
            info!("reply matched response token, session confirmed");
        }
    }
}
