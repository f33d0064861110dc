//! Reply parsing for datagrams coming back from switch actuators.
//!
//! Actuators answer commands and also emit unsolicited heartbeats, all as
//! single ASCII lines:
//!
//! ```text
//! <ADDR>;<version-string>              version reply
//! <ADDR>;<status>;<voltage>[unit]      status reply, or heartbeat when
//!                                      <ADDR> is the broadcast address
//! ```
//!
//! Classification is total: every byte sequence maps to exactly one
//! [`Reply`] variant, with [`Reply::Invalid`] absorbing anything that
//! cannot be decoded. A garbled datagram is dropped and logged, never an
//! error on the receive path.

use crate::address::Address;

/// A reply decoded from an inbound datagram.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Version reply to a version query.
    Version {
        /// Responding actuator's address.
        mac: Address,
        /// Firmware version string, kept verbatim.
        version: String,
    },

    /// Status reply to a switch command or status query.
    Status {
        /// Responding actuator's address.
        mac: Address,
        /// Reported switch state.
        switch_on: bool,
        /// Reported supply voltage in volts (0.0 when unparseable).
        voltage: f32,
    },

    /// Unsolicited heartbeat sent to the broadcast address.
    Broadcast {
        /// Reported switch state.
        switch_on: bool,
        /// Reported supply voltage in volts (0.0 when unparseable).
        voltage: f32,
    },

    /// Input that could not be decoded. No field of the datagram is
    /// trusted.
    Invalid {
        /// Why the datagram was rejected.
        reason: String,
    },
}

impl Reply {
    /// Decode an inbound datagram.
    pub fn parse(data: &[u8]) -> Reply {
        let text = String::from_utf8_lossy(data);
        let text = text.trim();
        if text.is_empty() {
            log::trace!("rejecting blank datagram");
            return Reply::Invalid {
                reason: "Blank string".to_string(),
            };
        }

        let (addr_part, rest) = match text.split_once(';') {
            Some((addr, rest)) if !addr.is_empty() => (addr, rest),
            _ => {
                log::trace!("rejecting datagram without separator: {:?}", text);
                return Reply::Invalid {
                    reason: "No semicolon separator".to_string(),
                };
            }
        };
        let mac = Address::normalized(addr_part);

        match rest.split_once(';') {
            // One field after the address: a version reply.
            None => Reply::Version {
                mac,
                version: rest.to_string(),
            },
            // Two fields: status and voltage.
            Some((status, voltage)) => {
                let switch_on = status == "1" || status.eq_ignore_ascii_case("on");
                let voltage = parse_voltage(voltage);
                if mac.is_broadcast() {
                    Reply::Broadcast { switch_on, voltage }
                } else {
                    Reply::Status {
                        mac,
                        switch_on,
                        voltage,
                    }
                }
            }
        }
    }

    /// Check whether the datagram decoded to something usable.
    pub fn is_valid(&self) -> bool {
        !matches!(self, Reply::Invalid { .. })
    }

    /// The responding actuator's address, when the variant carries one.
    pub fn mac(&self) -> Option<&Address> {
        match self {
            Reply::Version { mac, .. } | Reply::Status { mac, .. } => Some(mac),
            _ => None,
        }
    }

    /// The reported switch state, when the variant carries one.
    pub fn switch_on(&self) -> Option<bool> {
        match self {
            Reply::Status { switch_on, .. } | Reply::Broadcast { switch_on, .. } => {
                Some(*switch_on)
            }
            _ => None,
        }
    }

    /// The reported supply voltage, when the variant carries one.
    pub fn voltage(&self) -> Option<f32> {
        match self {
            Reply::Status { voltage, .. } | Reply::Broadcast { voltage, .. } => Some(*voltage),
            _ => None,
        }
    }
}

/// Parse a voltage field leniently.
///
/// Strips surrounding whitespace and at most one trailing `V`/`v` unit
/// letter. Anything that still fails numeric parsing yields `0.0` rather
/// than rejecting the reply.
pub fn parse_voltage(field: &str) -> f32 {
    let trimmed = field.trim();
    let trimmed = trimmed
        .strip_suffix('V')
        .or_else(|| trimmed.strip_suffix('v'))
        .unwrap_or(trimmed)
        .trim();
    trimmed.parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_broadcast() {
        let reply = Reply::parse(b"FFFF-FFFF-FFFF;1;3.70V");
        assert_eq!(
            reply,
            Reply::Broadcast {
                switch_on: true,
                voltage: 3.70,
            }
        );
        assert!(reply.is_valid());
        assert_eq!(reply.mac(), None);
        assert_eq!(reply.voltage(), Some(3.70));
    }

    #[test]
    fn test_parse_status() {
        let reply = Reply::parse(b"3361-8481-1234;0;3.65");
        assert_eq!(
            reply,
            Reply::Status {
                mac: Address::normalized("3361-8481-1234"),
                switch_on: false,
                voltage: 3.65,
            }
        );
        assert_eq!(reply.voltage(), Some(3.65));
    }

    #[test]
    fn test_parse_version() {
        let reply = Reply::parse(b"3361-8481-1234;pyramid-switch-1.0.0");
        assert_eq!(
            reply,
            Reply::Version {
                mac: Address::normalized("3361-8481-1234"),
                version: "pyramid-switch-1.0.0".to_string(),
            }
        );
        assert_eq!(reply.voltage(), None);
    }

    #[test]
    fn test_parse_normalizes_source_address() {
        let reply = Reply::parse(b"33:61:84:81:12:34;1;3.7");
        assert_eq!(reply.mac().map(|m| m.as_str()), Some("3361-8481-1234"));
    }

    #[test]
    fn test_parse_rejects_empty_and_blank() {
        for input in [b"".as_slice(), b"   \r\n".as_slice()] {
            assert_eq!(
                Reply::parse(input),
                Reply::Invalid {
                    reason: "Blank string".to_string()
                },
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        assert_eq!(
            Reply::parse(b"no separator here"),
            Reply::Invalid {
                reason: "No semicolon separator".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_leading_separator() {
        assert_eq!(
            Reply::parse(b";1;3.7"),
            Reply::Invalid {
                reason: "No semicolon separator".to_string()
            }
        );
    }

    #[test]
    fn test_parse_never_panics_on_binary_garbage() {
        let reply = Reply::parse(&[0xFF, 0xFE, 0x00, 0x80]);
        assert!(!reply.is_valid());
    }

    #[test]
    fn test_status_token_variants() {
        for token in ["1", "on", "ON", "On"] {
            let line = format!("3361-8481-1234;{};3.7", token);
            let reply = Reply::parse(line.as_bytes());
            assert_eq!(reply.switch_on(), Some(true), "token {:?}", token);
        }
        for token in ["0", "off", "true", ""] {
            let line = format!("3361-8481-1234;{};3.7", token);
            let reply = Reply::parse(line.as_bytes());
            assert_eq!(reply.switch_on(), Some(false), "token {:?}", token);
        }
    }

    #[test]
    fn test_parse_voltage_lenient() {
        assert_eq!(parse_voltage("3.70"), 3.70);
        assert_eq!(parse_voltage("3.70V"), 3.70);
        assert_eq!(parse_voltage(" 3.7 v "), 3.7);
        assert_eq!(parse_voltage("0"), 0.0);
        assert_eq!(parse_voltage(""), 0.0);
        assert_eq!(parse_voltage("abc"), 0.0);
        // Only one unit letter is stripped.
        assert_eq!(parse_voltage("3.70VV"), 0.0);
    }

    #[test]
    fn test_classification_is_exclusive() {
        let cases: [(&[u8], fn(&Reply) -> bool); 6] = [
            (b"FFFF-FFFF-FFFF;1;3.7", |r| {
                matches!(r, Reply::Broadcast { .. })
            }),
            (b"3361-8481-1234;1;3.7", |r| {
                matches!(r, Reply::Status { .. })
            }),
            (b"3361-8481-1234;v1.0", |r| {
                matches!(r, Reply::Version { .. })
            }),
            (b"", |r| matches!(r, Reply::Invalid { .. })),
            (b"   ", |r| matches!(r, Reply::Invalid { .. })),
            (b"garbage", |r| matches!(r, Reply::Invalid { .. })),
        ];
        for (input, expected) in cases {
            let reply = Reply::parse(input);
            assert!(expected(&reply), "wrong variant for {:?}: {:?}", input, reply);
        }
    }
}
