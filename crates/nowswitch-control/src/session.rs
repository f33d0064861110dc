//! Per-call retry sessions.
//!
//! A confirmable command is driven by one short-lived [`RetrySession`]:
//! the rendered line is transmitted up to the configured attempt budget,
//! with a pause between attempts, until the shared acknowledgement flag
//! reports a confirming reply. The session is consumed by running it, so
//! nothing persists across calls and two sessions cannot overlap on one
//! controller.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{info, trace, warn};

use crate::ack::AckState;
use crate::transport::Transport;
use nowswitch_protocol::Address;

/// How a retried, confirmable command concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A confirming reply was observed.
    Confirmed {
        /// Transmit attempts made before confirmation.
        attempts: u8,
    },

    /// The attempt budget ran out without a confirming reply. The
    /// optimistically published state stays as written; this is a
    /// warning-level outcome, not an error.
    Unconfirmed {
        /// Transmit attempts made.
        attempts: u8,
    },
}

impl WriteOutcome {
    /// Check whether a confirming reply was observed.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, WriteOutcome::Confirmed { .. })
    }

    /// Transmit attempts made.
    pub fn attempts(&self) -> u8 {
        match self {
            WriteOutcome::Confirmed { attempts } | WriteOutcome::Unconfirmed { attempts } => {
                *attempts
            }
        }
    }
}

/// One send-with-retry pass for a single rendered command line.
///
/// The channel was captured when the line was rendered; every attempt
/// re-sends the same bytes. Creating the session clears the shared
/// acknowledgement flag.
#[derive(Debug)]
pub struct RetrySession {
    command: Vec<u8>,
    attempts_total: u8,
    interval: Duration,
    ack: Arc<AckState>,
}

impl RetrySession {
    /// Create a session for one rendered command line and arm the
    /// acknowledgement flag.
    pub(crate) fn new(
        command: Vec<u8>,
        attempts_total: u8,
        interval: Duration,
        ack: Arc<AckState>,
    ) -> Self {
        ack.arm();
        RetrySession {
            command,
            attempts_total,
            interval,
            ack,
        }
    }

    /// Drive the retry loop over `transport` toward `target`.
    ///
    /// A transmit error is logged and does not abort the loop; only the
    /// attempt budget ends it. The inter-attempt pause is a plain
    /// `thread::sleep`, so the receive context must run elsewhere.
    pub(crate) fn run<T: Transport>(self, transport: &mut T, target: &Address) -> WriteOutcome {
        for attempt in 1..=self.attempts_total {
            if self.ack.is_acknowledged() {
                info!("confirming reply observed, stopping retries");
                return WriteOutcome::Confirmed {
                    attempts: attempt - 1,
                };
            }

            match transport.send(target, &self.command) {
                Ok(()) => trace!(
                    "transmit attempt {}/{} ({} bytes)",
                    attempt,
                    self.attempts_total,
                    self.command.len()
                ),
                Err(e) => warn!(
                    "transmit attempt {}/{} failed: {}",
                    attempt, self.attempts_total, e
                ),
            }

            if attempt < self.attempts_total {
                thread::sleep(self.interval);
            }
        }

        if self.ack.is_acknowledged() {
            WriteOutcome::Confirmed {
                attempts: self.attempts_total,
            }
        } else {
            warn!(
                "no confirming reply after {} attempts",
                self.attempts_total
            );
            WriteOutcome::Unconfirmed {
                attempts: self.attempts_total,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;

    /// Transport that counts sends and can set the flag after the Nth.
    struct CountingTransport {
        sends: u32,
        ack: Arc<AckState>,
        confirm_after: Option<u32>,
        fail_all: bool,
    }

    impl Transport for CountingTransport {
        fn send(&mut self, _dest: &Address, _payload: &[u8]) -> Result<(), TransportError> {
            self.sends += 1;
            if Some(self.sends) == self.confirm_after {
                self.ack.observe("tok");
            }
            if self.fail_all {
                Err(TransportError::SendFailed("radio busy".to_string()))
            } else {
                Ok(())
            }
        }

        fn add_peer(&mut self, _peer: &Address) -> Result<(), TransportError> {
            Ok(())
        }

        fn channel(&self) -> u8 {
            1
        }

        fn set_channel(&mut self, _channel: u8) {}

        fn apply_channel(&mut self) {}
    }

    fn target() -> Address {
        Address::parse("30AE-A412-3456").unwrap()
    }

    #[test]
    fn test_confirmation_stops_retries() {
        let ack = Arc::new(AckState::new("tok"));
        let mut transport = CountingTransport {
            sends: 0,
            ack: Arc::clone(&ack),
            confirm_after: Some(2),
            fail_all: false,
        };

        let session = RetrySession::new(
            b"line".to_vec(),
            3,
            Duration::from_millis(1),
            Arc::clone(&ack),
        );
        let outcome = session.run(&mut transport, &target());

        assert_eq!(outcome, WriteOutcome::Confirmed { attempts: 2 });
        assert_eq!(transport.sends, 2);
    }

    #[test]
    fn test_exhausted_attempts_report_unconfirmed() {
        let ack = Arc::new(AckState::new("tok"));
        let mut transport = CountingTransport {
            sends: 0,
            ack: Arc::clone(&ack),
            confirm_after: None,
            fail_all: false,
        };

        let session = RetrySession::new(
            b"line".to_vec(),
            3,
            Duration::from_millis(1),
            Arc::clone(&ack),
        );
        let outcome = session.run(&mut transport, &target());

        assert_eq!(outcome, WriteOutcome::Unconfirmed { attempts: 3 });
        assert!(!outcome.is_confirmed());
        assert_eq!(transport.sends, 3);
    }

    #[test]
    fn test_transmit_errors_do_not_abort_the_loop() {
        let ack = Arc::new(AckState::new("tok"));
        let mut transport = CountingTransport {
            sends: 0,
            ack: Arc::clone(&ack),
            confirm_after: None,
            fail_all: true,
        };

        let session = RetrySession::new(
            b"line".to_vec(),
            4,
            Duration::from_millis(1),
            Arc::clone(&ack),
        );
        let outcome = session.run(&mut transport, &target());

        // Every attempt failed, but every attempt was made.
        assert_eq!(transport.sends, 4);
        assert_eq!(outcome.attempts(), 4);
    }

    #[test]
    fn test_new_session_clears_stale_flag() {
        let ack = Arc::new(AckState::new("tok"));
        ack.observe("tok");
        assert!(ack.is_acknowledged());

        let _session = RetrySession::new(
            b"line".to_vec(),
            1,
            Duration::from_millis(1),
            Arc::clone(&ack),
        );
        assert!(!ack.is_acknowledged());
    }

    #[test]
    fn test_confirmation_on_last_attempt_counts_all_sends() {
        let ack = Arc::new(AckState::new("tok"));
        let mut transport = CountingTransport {
            sends: 0,
            ack: Arc::clone(&ack),
            confirm_after: Some(3),
            fail_all: false,
        };

        let session = RetrySession::new(
            b"line".to_vec(),
            3,
            Duration::from_millis(1),
            Arc::clone(&ack),
        );
        let outcome = session.run(&mut transport, &target());

        assert_eq!(outcome, WriteOutcome::Confirmed { attempts: 3 });
    }
}
