//! Device address handling.
//!
//! Actuators are identified by their 6-byte radio MAC. Two textual forms
//! are accepted at the API boundary: colon-separated octet pairs
//! (`30:AE:A4:12:34:56`) and dash-separated quads (`30AE-A412-3456`).
//! The canonical in-memory spelling is the dash-grouped, upper-case form;
//! all comparisons and wire encodings use it.

use std::fmt;

use crate::error::{ProtocolError, ProtocolResult};

/// Number of octets in a device address.
pub const ADDRESS_OCTETS: usize = 6;

/// A device address in canonical text form.
///
/// [`Address::normalized`] never fails: inputs that strip down to exactly
/// 12 hex digits are regrouped canonically, and anything else is kept as
/// typed (upper-cased, `:` turned into `-`) so that a bad peer identifier
/// survives far enough to show up in logs. [`Address::parse`] additionally
/// enforces the accepted formats and is what the send path uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    /// The reserved all-ones broadcast address, canonical form.
    pub const BROADCAST: &'static str = "FFFF-FFFF-FFFF";

    /// Normalize an address string (infallible).
    ///
    /// Keeps only hex digits, upper-cases them, and regroups as
    /// `XXXX-XXXX-XXXX`. Inputs that do not contain exactly 12 hex digits
    /// fall back to the original text, upper-cased with `:` replaced by
    /// `-`. Normalization is idempotent on both paths.
    pub fn normalized(input: &str) -> Address {
        let hex: String = input
            .chars()
            .filter(|c| c.is_ascii_hexdigit())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if hex.len() == 2 * ADDRESS_OCTETS {
            return Address(format!("{}-{}-{}", &hex[..4], &hex[4..8], &hex[8..]));
        }

        let fallback: String = input
            .chars()
            .map(|c| if c == ':' { '-' } else { c.to_ascii_uppercase() })
            .collect();
        Address(fallback)
    }

    /// Parse and validate an address string.
    ///
    /// Normalizes first, then rejects anything that does not match an
    /// accepted format.
    pub fn parse(input: &str) -> ProtocolResult<Address> {
        let addr = Address::normalized(input);
        if addr.is_valid_format() {
            Ok(addr)
        } else {
            Err(ProtocolError::invalid_address(input))
        }
    }

    /// The broadcast address.
    pub fn broadcast() -> Address {
        Address(Self::BROADCAST.to_string())
    }

    /// Check whether this address matches an accepted wire format.
    ///
    /// Accepted: the 14-character dash grouping, the 17-character colon
    /// form, or any spelling containing exactly 12 hex digits. The first
    /// two check separator positions only.
    pub fn is_valid_format(&self) -> bool {
        let b = self.0.as_bytes();

        if b.len() == 14 && b[4] == b'-' && b[9] == b'-' {
            return true;
        }
        if b.len() == 17
            && b[2] == b':'
            && b[5] == b':'
            && b[8] == b':'
            && b[11] == b':'
            && b[14] == b':'
        {
            return true;
        }

        self.0.chars().filter(|c| c.is_ascii_hexdigit()).count() == 2 * ADDRESS_OCTETS
    }

    /// Check whether this is the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        self.0 == Self::BROADCAST
    }

    /// The canonical text form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The raw 6 octets, if this address carries exactly 12 hex digits.
    pub fn octets(&self) -> Option<[u8; ADDRESS_OCTETS]> {
        let hex: String = self.0.chars().filter(|c| c.is_ascii_hexdigit()).collect();
        if hex.len() != 2 * ADDRESS_OCTETS {
            return None;
        }

        let mut octets = [0u8; ADDRESS_OCTETS];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = u8::from_str_radix(&hex[2 * i..2 * i + 2], 16).ok()?;
        }
        Some(octets)
    }

    /// Build a canonical address from raw octets.
    pub fn from_octets(octets: [u8; ADDRESS_OCTETS]) -> Address {
        Address(format!(
            "{:02X}{:02X}-{:02X}{:02X}-{:02X}{:02X}",
            octets[0], octets[1], octets[2], octets[3], octets[4], octets[5]
        ))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_colon_form() {
        let addr = Address::normalized("30:AE:A4:12:34:56");
        assert_eq!(addr.as_str(), "30AE-A412-3456");
    }

    #[test]
    fn test_normalize_dash_form() {
        let addr = Address::normalized("30AE-A412-3456");
        assert_eq!(addr.as_str(), "30AE-A412-3456");
    }

    #[test]
    fn test_normalize_bare_hex_lowercase() {
        let addr = Address::normalized("30aea4123456");
        assert_eq!(addr.as_str(), "30AE-A412-3456");
    }

    #[test]
    fn test_normalize_mixed_separators() {
        let addr = Address::normalized("30-AE:a4 12.34.56");
        assert_eq!(addr.as_str(), "30AE-A412-3456");
    }

    #[test]
    fn test_normalize_fallback_keeps_text() {
        // Too few hex digits: keep the input, upper-cased, ':' -> '-'.
        let addr = Address::normalized("switch:one");
        assert_eq!(addr.as_str(), "SWITCH-ONE");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "30:AE:A4:12:34:56",
            "30AE-A412-3456",
            "30aea4123456",
            "not-a-mac",
            "FF:FF:FF:FF:FF:FF",
            "",
        ];
        for input in inputs {
            let once = Address::normalized(input);
            let twice = Address::normalized(once.as_str());
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_parse_accepts_both_forms() {
        assert!(Address::parse("30:AE:A4:12:34:56").is_ok());
        assert!(Address::parse("30AE-A412-3456").is_ok());
        assert!(Address::parse("30aea4123456").is_ok());
    }

    #[test]
    fn test_parse_rejects_junk() {
        assert!(Address::parse("not-a-mac").is_err());
        assert!(Address::parse("").is_err());
        assert!(Address::parse("30:AE:A4").is_err());
        assert!(Address::parse("30AEA41234567890").is_err());
    }

    #[test]
    fn test_broadcast_detection() {
        assert!(Address::normalized("FF:FF:FF:FF:FF:FF").is_broadcast());
        assert!(Address::normalized("ffff-ffff-ffff").is_broadcast());
        assert!(Address::broadcast().is_broadcast());
        assert!(!Address::normalized("30:AE:A4:12:34:56").is_broadcast());
    }

    #[test]
    fn test_octets_round_trip() {
        let octets = [0x30, 0xAE, 0xA4, 0x12, 0x34, 0x56];
        let addr = Address::from_octets(octets);
        assert_eq!(addr.as_str(), "30AE-A412-3456");
        assert_eq!(addr.octets(), Some(octets));
    }

    #[test]
    fn test_octets_none_for_fallback() {
        assert_eq!(Address::normalized("not-a-mac").octets(), None);
    }
}
