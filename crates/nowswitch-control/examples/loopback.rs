//! Example: drive a simulated actuator over an in-memory radio.
//!
//! A loopback transport forwards every datagram to an "actuator" thread
//! that decodes command lines and answers with status replies, ignoring
//! the first two commands to mimic a lossy radio. The controller's retry
//! session keeps transmitting until the first reply lands.
//!
//! Usage: cargo run --example loopback
//! (set RUST_LOG=trace to watch every transmit attempt)

use std::thread;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing_subscriber::EnvFilter;

use nowswitch_control::{
    RecvInfo, ReplyHandler, SwitchConfig, SwitchController, Transport, TransportError,
};
use nowswitch_protocol::{Address, Command, ParsedCommand};

/// Radio stand-in: hands every datagram to the actuator thread.
struct LoopbackTransport {
    air: Sender<Vec<u8>>,
    channel: u8,
    staged_channel: Option<u8>,
}

impl Transport for LoopbackTransport {
    fn send(&mut self, _dest: &Address, payload: &[u8]) -> Result<(), TransportError> {
        self.air
            .send(payload.to_vec())
            .map_err(|_| TransportError::SendFailed("actuator gone".to_string()))
    }

    fn add_peer(&mut self, _peer: &Address) -> Result<(), TransportError> {
        Ok(())
    }

    fn channel(&self) -> u8 {
        self.channel
    }

    fn set_channel(&mut self, channel: u8) {
        self.staged_channel = Some(channel);
    }

    fn apply_channel(&mut self) {
        if let Some(channel) = self.staged_channel.take() {
            self.channel = channel;
        }
    }
}

/// The remote switch: decodes command lines and answers via the
/// controller's reply handler, dropping the first `lossy` commands.
fn run_actuator(air: Receiver<Vec<u8>>, handler: ReplyHandler, mac: Address, lossy: u32) {
    let info = RecvInfo { src: mac.clone() };
    let mut dropped = 0;

    for datagram in air {
        if dropped < lossy {
            dropped += 1;
            println!("[actuator] datagram lost in the air ({}/{})", dropped, lossy);
            continue;
        }

        let parsed = match ParsedCommand::parse(&datagram) {
            Ok(parsed) => parsed,
            Err(e) => {
                println!("[actuator] ignoring undecodable datagram: {}", e);
                continue;
            }
        };

        let reply = match parsed.command {
            Command::SetState { on } => {
                println!("[actuator] switching {}", if on { "ON" } else { "OFF" });
                format!("{};{};3.95V", mac, if on { "1" } else { "0" })
            }
            Command::QueryStatus => format!("{};1;3.95V", mac),
            Command::QueryVersion => format!("{};loopback-actuator-1.0.0", mac),
            Command::Raw(_) => continue,
        };

        if parsed.wants_reply {
            handler.on_broadcast(&info, reply.as_bytes());
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let (air_tx, air_rx) = unbounded();
    let transport = LoopbackTransport {
        air: air_tx,
        channel: 6,
        staged_channel: None,
    };

    let config = SwitchConfig {
        name: "garage".to_string(),
        device_mac: "33:61:84:81:12:34".to_string(),
        response_token: None,
        retry_count: 10,
        retry_interval_ms: 50,
    };

    let mut controller =
        SwitchController::new(transport, config).expect("configuration should validate");
    controller.log_config();

    let actuator_mac = controller.target().clone();
    let handler = controller.reply_handler();
    let actuator = thread::spawn(move || run_actuator(air_rx, handler, actuator_mac, 2));

    println!("writing state ON (first two datagrams will be lost)...");
    let outcome = controller
        .write_state(true)
        .expect("write should reach the transport");
    println!(
        "outcome: confirmed={} after {} attempts, reported state={}",
        outcome.is_confirmed(),
        outcome.attempts(),
        controller.state()
    );

    println!("querying firmware version...");
    controller
        .send_version_query("33:61:84:81:12:34")
        .expect("query should reach the transport");

    // Give the version reply a moment to come back before shutting down.
    thread::sleep(Duration::from_millis(100));
    drop(controller);
    actuator.join().expect("actuator thread panicked");
}
