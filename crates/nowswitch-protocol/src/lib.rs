//! ESP-NOW Switch Control Protocol
//!
//! This crate provides types and utilities for talking to remote switch
//! actuators over a connectionless, peer-addressed datagram radio such as
//! ESP-NOW. Every exchange fits in a single short ASCII datagram; there is
//! no session state and no delivery guarantee at this layer.
//!
//! # Protocol Overview
//!
//! Commands (controller → actuator) are single lines:
//!
//! ```text
//! <ADDR>=<CMD>;ch=<channel>[;]
//! ```
//!
//! - `<ADDR>`: target address in canonical `XXXX-XXXX-XXXX` form
//! - `<CMD>`: `1` (switch on), `0` (switch off), `?` (status query),
//!   `V` (version query)
//! - `<channel>`: radio channel both peers must share, decimal 1-14
//! - trailing `;`: present only when a confirmation reply is requested
//!
//! Replies (actuator → controller) are also single lines:
//!
//! ```text
//! <ADDR>;<version-string>
//! <ADDR>;<status>;<voltage>[unit]
//! ```
//!
//! The second form doubles as the unsolicited heartbeat broadcast when
//! `<ADDR>` is the all-ones broadcast address.
//!
//! # Example
//!
//! ```rust,ignore
//! use nowswitch_protocol::{Address, Command, Reply};
//!
//! // Build a command line
//! let target = Address::parse("30:AE:A4:12:34:56")?;
//! let line = Command::SetState { on: true }.render(&target, 11, true)?;
//! assert_eq!(line, b"30AE-A412-3456=1;ch=11;");
//!
//! // Classify a reply
//! let reply = Reply::parse(b"30AE-A412-3456;1;3.70V");
//! ```

mod address;
mod commands;
mod error;
mod responses;

pub use address::*;
pub use commands::*;
pub use error::*;
pub use responses::*;
