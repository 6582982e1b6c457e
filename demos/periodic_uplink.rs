//! Host demo: drives the node state machine against an in-memory MAC layer.
//!
//! Run with `cargo run --example periodic_uplink --features std`.

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

use embedded_hal::timer::CountDown;
use lorawan_node::{
    config::{AppConfig, HardwareConfig},
    mac::{DeviceClass, JoinStatus, MacEvent, MacLayer, MacParams, SendResult},
    node::LoRaWanNode,
    uplink::UplinkFrame,
};

/// In-memory MAC: joins after a short delay, accepts every uplink.
struct SimMac {
    status: JoinStatus,
    join_requested_at: Option<Instant>,
    events: VecDeque<MacEvent>,
}

impl SimMac {
    fn new() -> Self {
        Self {
            status: JoinStatus::NotJoined,
            join_requested_at: None,
            events: VecDeque::new(),
        }
    }
}

impl MacLayer for SimMac {
    type Error = ();

    fn init(&mut self, hw: &HardwareConfig, params: MacParams) -> Result<(), ()> {
        println!(
            "radio up: {:?}, adr={}, trials={}",
            hw.chip, params.adr_enabled, params.join_trials
        );
        Ok(())
    }

    fn join(&mut self) {
        println!("join started");
        self.status = JoinStatus::Joining;
        self.join_requested_at = Some(Instant::now());
    }

    fn join_status(&self) -> JoinStatus {
        self.status
    }

    fn request_class(&mut self, class: DeviceClass) {
        println!("class {} requested", class.name());
        // the simulated server confirms immediately
        self.events.push_back(MacEvent::ClassConfirmed(class));
    }

    fn send(&mut self, frame: &UplinkFrame, confirmed: bool) -> SendResult {
        println!(
            "uplink port={} len={} payload={:?} confirmed={}",
            frame.port(),
            frame.payload().len(),
            frame.payload(),
            confirmed
        );
        SendResult::Success
    }

    fn process_events(&mut self) {
        // simulated OTAA handshake takes one second
        if self.status == JoinStatus::Joining {
            if let Some(at) = self.join_requested_at {
                if at.elapsed() > Duration::from_secs(1) {
                    self.join_requested_at = None;
                    self.status = JoinStatus::Joined;
                    self.events.push_back(MacEvent::Joined);
                }
            }
        }
    }

    fn poll_event(&mut self) -> Option<MacEvent> {
        self.events.pop_front()
    }

    fn random_seed(&mut self) -> u32 {
        std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(1)
    }
}

/// Wall-clock one-shot countdown.
struct WallClockTimer {
    deadline: Option<Instant>,
}

impl CountDown for WallClockTimer {
    type Time = u32;

    fn start<P: Into<u32>>(&mut self, period_ms: P) {
        self.deadline = Some(Instant::now() + Duration::from_millis(period_ms.into() as u64));
    }

    fn wait(&mut self) -> nb::Result<(), void::Void> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.deadline = None;
                Ok(())
            }
            _ => Err(nb::Error::WouldBlock),
        }
    }
}

fn main() {
    // Short periods so the demo is watchable
    let config = AppConfig {
        tx_period_ms: 2_000,
        jitter_max_ms: 500,
        ..AppConfig::default()
    };

    let timer = WallClockTimer { deadline: None };
    let mut node = LoRaWanNode::new(SimMac::new(), timer, config);
    node.start(&HardwareConfig::default()).expect("bring-up failed");

    let end = Instant::now() + Duration::from_secs(12);
    while Instant::now() < end {
        node.process();
        thread::sleep(Duration::from_millis(10));
    }

    println!("done, last result: {:?}", node.last_send_result());
}
