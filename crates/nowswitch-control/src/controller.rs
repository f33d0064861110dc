//! The switch command controller.
//!
//! A [`SwitchController`] owns one actuator's address and retry policy,
//! renders commands through the protocol codec, and drives confirmable
//! writes as bounded retry sessions over a [`Transport`]. Inbound
//! datagrams are classified by a [`ReplyHandler`] obtained from
//! [`SwitchController::reply_handler`], which shares only the
//! acknowledgement state with the controller.
//!
//! Delivery is best-effort end to end: a write publishes its intended
//! state immediately and the retry loop merely raises confidence that the
//! actuator heard it.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::ack::{AckState, ReplyHandler};
use crate::config::SwitchConfig;
use crate::error::ControlResult;
use crate::session::{RetrySession, WriteOutcome};
use crate::transport::Transport;
use nowswitch_protocol::{Address, Command};

/// Drives the switch protocol over a datagram transport.
///
/// One controller manages one actuator (the configured target); the
/// one-shot operations can still address other peers by explicit address.
pub struct SwitchController<T: Transport> {
    transport: T,
    target: Address,
    name: String,
    retry_count: u8,
    retry_interval: Duration,
    reported_on: bool,
    last_command: Option<String>,
    broadcast_peer_added: bool,
    ack: Arc<AckState>,
}

impl<T: Transport> SwitchController<T> {
    /// Create a controller from a configuration, validating it first.
    pub fn new(transport: T, config: SwitchConfig) -> ControlResult<Self> {
        let target = config.validate()?;
        let token = config.effective_token(&target);

        Ok(SwitchController {
            transport,
            target,
            name: config.name,
            retry_count: config.retry_count,
            retry_interval: Duration::from_millis(u64::from(config.retry_interval_ms)),
            reported_on: false,
            last_command: None,
            broadcast_peer_added: false,
            ack: Arc::new(AckState::new(token)),
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The configured target actuator.
    pub fn target(&self) -> &Address {
        &self.target
    }

    /// The optimistically reported switch state.
    pub fn state(&self) -> bool {
        self.reported_on
    }

    /// The most recently rendered confirmable command line.
    pub fn last_command(&self) -> Option<&str> {
        self.last_command.as_deref()
    }

    /// Current radio channel, read from the transport.
    pub fn channel(&self) -> u8 {
        self.transport.channel()
    }

    /// Stage and apply a radio channel change.
    pub fn set_channel(&mut self, channel: u8) {
        debug!("switch '{}': changing channel to {}", self.name, channel);
        self.transport.set_channel(channel);
        self.transport.apply_channel();
    }

    /// Replace the response token. Administrative; takes effect for the
    /// next session.
    pub fn set_response_token(&mut self, token: impl Into<String>) {
        self.ack.set_token(token);
    }

    /// Handle for the receive context. Clone it into whatever drives the
    /// radio's inbound callbacks.
    pub fn reply_handler(&self) -> ReplyHandler {
        ReplyHandler::new(Arc::clone(&self.ack))
    }

    /// Log the configured target and retry policy (startup diagnostics).
    pub fn log_config(&self) {
        debug!(
            "switch '{}': target={} token={:?} retries={} interval={}ms channel={}",
            self.name,
            self.target,
            self.ack.token(),
            self.retry_count,
            self.retry_interval.as_millis(),
            self.transport.channel()
        );
    }

    // ========================================================================
    // One-shot operations
    // ========================================================================

    /// Send a single on/off command to `target_mac`.
    ///
    /// The address is validated before anything is transmitted.
    /// `need_response` asks the actuator for a confirmation reply; no
    /// retry loop runs here.
    pub fn send_switch_command(
        &mut self,
        target_mac: &str,
        on: bool,
        need_response: bool,
    ) -> ControlResult<()> {
        self.send_to(target_mac, &Command::SetState { on }, need_response)
    }

    /// Send a single status query to `target_mac`. Queries always request
    /// a reply.
    pub fn send_status_query(&mut self, target_mac: &str) -> ControlResult<()> {
        self.send_to(target_mac, &Command::QueryStatus, true)
    }

    /// Send a single firmware version query to `target_mac`.
    pub fn send_version_query(&mut self, target_mac: &str) -> ControlResult<()> {
        self.send_to(target_mac, &Command::QueryVersion, true)
    }

    /// Send a raw payload to the broadcast address.
    ///
    /// Empty and oversized payloads are rejected before any transport
    /// interaction. Registers the broadcast peer on first use; a
    /// registration failure aborts the send with nothing transmitted.
    pub fn send_custom_message(&mut self, payload: &[u8]) -> ControlResult<()> {
        let broadcast = Address::broadcast();
        let line = Command::Raw(payload.to_vec()).render(&broadcast, 0, false)?;

        self.ensure_broadcast_peer()?;
        self.transport.send(&broadcast, &line)?;
        trace!("switch '{}': broadcast {} bytes", self.name, line.len());
        Ok(())
    }

    // ========================================================================
    // Confirmable writes
    // ========================================================================

    /// Set the switch state, retrying until confirmed or out of attempts.
    ///
    /// The intended state is published immediately (visible via
    /// [`state`](Self::state) before any confirmation arrives) and is
    /// never rolled back; the returned [`WriteOutcome`] reports whether a
    /// confirming reply was observed. The call blocks for the duration of
    /// the retry session.
    pub fn write_state(&mut self, on: bool) -> ControlResult<WriteOutcome> {
        debug!(
            "switch '{}': setting state to {}",
            self.name,
            if on { "ON" } else { "OFF" }
        );
        self.reported_on = on;

        // One channel snapshot; every attempt re-sends this exact line.
        let channel = self.transport.channel();
        let line = Command::SetState { on }.render(&self.target, channel, true)?;
        self.last_command = Some(String::from_utf8_lossy(&line).into_owned());

        let session = RetrySession::new(
            line,
            self.retry_count,
            self.retry_interval,
            Arc::clone(&self.ack),
        );
        Ok(session.run(&mut self.transport, &self.target))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Render `command` for `target_mac` and send it on the broadcast
    /// path.
    fn send_to(
        &mut self,
        target_mac: &str,
        command: &Command,
        handshake: bool,
    ) -> ControlResult<()> {
        let target = Address::parse(target_mac)?;
        let line = command.render(&target, self.transport.channel(), handshake)?;
        self.send_custom_message(&line)
    }

    /// Register the broadcast peer on first use.
    fn ensure_broadcast_peer(&mut self) -> ControlResult<()> {
        if self.broadcast_peer_added {
            return Ok(());
        }
        self.transport.add_peer(&Address::broadcast())?;
        self.broadcast_peer_added = true;
        Ok(())
    }
}
