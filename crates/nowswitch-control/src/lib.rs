//! ESP-NOW Switch Command Controller
//!
//! This crate drives the [`nowswitch_protocol`] wire format over a
//! pluggable datagram transport. It provides:
//!
//! - [`SwitchController`]: owns a target actuator, renders commands, and
//!   runs confirmable writes as bounded retry sessions
//! - [`ReplyHandler`]: the receive-context handle that classifies
//!   inbound datagrams and flags confirming replies
//! - [`Transport`]: the boundary trait a radio driver implements
//! - [`SwitchConfig`]: serde-friendly per-actuator configuration
//!
//! The transport is connectionless and unreliable; the controller treats
//! acknowledgement as a best-effort signal. A state write publishes its
//! intended state optimistically and the retry loop only raises
//! confidence that the actuator heard it.
//!
//! # Example
//!
//! ```rust,ignore
//! use nowswitch_control::{SwitchConfig, SwitchController};
//!
//! let config = SwitchConfig {
//!     name: "garage".to_string(),
//!     device_mac: "30:AE:A4:12:34:56".to_string(),
//!     ..SwitchConfig::default()
//! };
//! let mut controller = SwitchController::new(radio, config)?;
//!
//! // Wire the receive side of the radio driver:
//! let handler = controller.reply_handler();
//!
//! // Confirmable write with retries:
//! let outcome = controller.write_state(true)?;
//! ```

mod ack;
mod config;
mod controller;
mod error;
mod session;
mod transport;

pub use ack::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use session::*;
pub use transport::*;
