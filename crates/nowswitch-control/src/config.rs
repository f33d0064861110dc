//! Switch configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};
use nowswitch_protocol::Address;

/// Default number of transmit attempts for a confirmable command.
pub const DEFAULT_RETRY_COUNT: u8 = 40;

/// Default pause between transmit attempts, in milliseconds.
pub const DEFAULT_RETRY_INTERVAL_MS: u32 = 100;

/// Configuration for one switch actuator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchConfig {
    /// Display name used in log output.
    pub name: String,
    /// Target actuator address, colon or dash form.
    pub device_mac: String,
    /// Substring expected in a confirming reply. When unset, the
    /// canonical text of the target address is used.
    #[serde(default)]
    pub response_token: Option<String>,
    /// Transmit attempts per confirmable command (1-100).
    #[serde(default = "default_retry_count")]
    pub retry_count: u8,
    /// Pause between attempts in milliseconds (10-5000).
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u32,
}

fn default_retry_count() -> u8 {
    DEFAULT_RETRY_COUNT
}

fn default_retry_interval_ms() -> u32 {
    DEFAULT_RETRY_INTERVAL_MS
}

impl Default for SwitchConfig {
    fn default() -> Self {
        SwitchConfig {
            name: "switch".to_string(),
            device_mac: String::new(),
            response_token: None,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_interval_ms: DEFAULT_RETRY_INTERVAL_MS,
        }
    }
}

impl SwitchConfig {
    /// Validate field ranges and parse the target address.
    ///
    /// Returns the parsed target on success so callers do not re-parse.
    pub fn validate(&self) -> ControlResult<Address> {
        if !(1..=100).contains(&self.retry_count) {
            return Err(ControlError::config(format!(
                "retry_count must be 1-100, got {}",
                self.retry_count
            )));
        }
        if !(10..=5000).contains(&self.retry_interval_ms) {
            return Err(ControlError::config(format!(
                "retry_interval_ms must be 10-5000, got {}",
                self.retry_interval_ms
            )));
        }
        if let Some(token) = &self.response_token {
            if token.is_empty() {
                return Err(ControlError::config("response_token must not be empty"));
            }
        }

        Address::parse(&self.device_mac)
            .map_err(|e| ControlError::config(format!("device_mac: {}", e)))
    }

    /// The response token actually used for matching.
    pub fn effective_token(&self, target: &Address) -> String {
        match &self.response_token {
            Some(token) => token.clone(),
            None => target.as_str().to_string(),
        }
    }
}
