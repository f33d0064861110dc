//! Commands that can be sent to a switch actuator.
//!
//! A command is a single ASCII line:
//!
//! ```text
//! <ADDR>=<CMD>;ch=<channel>[;]
//! ```
//!
//! The channel field tells the actuator which radio channel the controller
//! transmits on, so the two can stay aligned. The trailing semicolon is
//! only appended when the sender wants a confirmation reply; queries always
//! request one.

use bytes::BufMut;

use crate::address::Address;
use crate::error::{ProtocolError, ProtocolResult};

/// Maximum rendered line length (single-datagram limit).
pub const MAX_LINE_LENGTH: usize = 64;

/// Lowest valid radio channel.
pub const MIN_CHANNEL: u8 = 1;

/// Highest valid radio channel.
pub const MAX_CHANNEL: u8 = 14;

/// Commands understood by a switch actuator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set the switch on or off.
    SetState {
        /// Desired state: `true` for on.
        on: bool,
    },

    /// Ask the actuator to report its switch state and supply voltage.
    QueryStatus,

    /// Ask the actuator to report its firmware version.
    QueryVersion,

    /// A pre-rendered payload passed through untouched.
    Raw(Vec<u8>),
}

impl Command {
    /// The single-character payload marker, if the command has one.
    ///
    /// `Raw` has no marker; its bytes are the whole payload.
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            Command::SetState { on: true } => Some("1"),
            Command::SetState { on: false } => Some("0"),
            Command::QueryStatus => Some("?"),
            Command::QueryVersion => Some("V"),
            Command::Raw(_) => None,
        }
    }

    /// Map a payload marker back to its command.
    pub fn from_marker(marker: &str) -> Option<Command> {
        match marker {
            "1" => Some(Command::SetState { on: true }),
            "0" => Some(Command::SetState { on: false }),
            "?" => Some(Command::QueryStatus),
            "V" => Some(Command::QueryVersion),
            _ => None,
        }
    }

    /// Render the command as a wire line addressed to `target`.
    ///
    /// `channel` is coerced to [`MIN_CHANNEL`] when out of range (an
    /// unconfigured radio reports 0). The trailing `;` requesting a
    /// confirmation reply is appended only when `handshake` is set.
    ///
    /// `Raw` payloads skip rendering entirely; they are only rejected when
    /// empty or over the line limit.
    pub fn render(&self, target: &Address, channel: u8, handshake: bool) -> ProtocolResult<Vec<u8>> {
        let marker = match self {
            Command::Raw(payload) => {
                if payload.is_empty() {
                    return Err(ProtocolError::EmptyMessage);
                }
                if payload.len() > MAX_LINE_LENGTH {
                    return Err(ProtocolError::PayloadOverflow {
                        max: MAX_LINE_LENGTH,
                        actual: payload.len(),
                    });
                }
                return Ok(payload.clone());
            }
            Command::SetState { on: true } => "1",
            Command::SetState { on: false } => "0",
            Command::QueryStatus => "?",
            Command::QueryVersion => "V",
        };

        let channel = if (MIN_CHANNEL..=MAX_CHANNEL).contains(&channel) {
            channel
        } else {
            MIN_CHANNEL
        };

        let mut buf = Vec::with_capacity(MAX_LINE_LENGTH);
        buf.put_slice(target.as_str().as_bytes());
        buf.put_u8(b'=');
        buf.put_slice(marker.as_bytes());
        buf.put_slice(format!(";ch={}", channel).as_bytes());
        if handshake {
            buf.put_u8(b';');
        }

        if buf.len() > MAX_LINE_LENGTH {
            return Err(ProtocolError::PayloadOverflow {
                max: MAX_LINE_LENGTH,
                actual: buf.len(),
            });
        }

        Ok(buf)
    }
}

/// A command line decoded from the wire, as an actuator sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Address the line was directed at.
    pub target: Address,
    /// The decoded command.
    pub command: Command,
    /// Channel number carried in the line, as sent.
    pub channel: u8,
    /// Whether the sender asked for a confirmation reply.
    pub wants_reply: bool,
}

impl ParsedCommand {
    /// Decode a rendered command line.
    pub fn parse(data: &[u8]) -> ProtocolResult<ParsedCommand> {
        let text = std::str::from_utf8(data)
            .map_err(|_| ProtocolError::malformed_command("not valid UTF-8"))?
            .trim();

        let (addr_part, rest) = text
            .split_once('=')
            .ok_or_else(|| ProtocolError::malformed_command("missing '=' separator"))?;
        let target = Address::parse(addr_part)?;

        let (marker, rest) = rest
            .split_once(';')
            .ok_or_else(|| ProtocolError::malformed_command("missing ';' after command"))?;
        let command = Command::from_marker(marker).ok_or_else(|| {
            ProtocolError::malformed_command(format!("unknown command marker: {}", marker))
        })?;

        let (channel_part, wants_reply) = match rest.strip_suffix(';') {
            Some(stripped) => (stripped, true),
            None => (rest, false),
        };
        let channel = channel_part
            .strip_prefix("ch=")
            .and_then(|ch| ch.parse::<u8>().ok())
            .ok_or_else(|| {
                ProtocolError::malformed_command(format!("bad channel field: {}", channel_part))
            })?;

        Ok(ParsedCommand {
            target,
            command,
            channel,
            wants_reply,
        })
    }
}
