//! MAC/radio collaborator interface
//!
//! The node core never talks to the radio directly. Everything below the
//! application (join handshake, session keys, regional parameters, framing,
//! encryption, retransmission) lives behind the [`MacLayer`] trait and is
//! injected into the state machine, which keeps the whole control logic
//! testable against a fake MAC.
//!
//! MAC completions are delivered through a single-consumer event queue
//! ([`MacLayer::poll_event`]) drained by the node's main-loop body, so every
//! handler runs serially on the one thread of control.

use heapless::Vec;

use crate::config::HardwareConfig;
use crate::uplink::{UplinkFrame, MAX_PAYLOAD_SIZE};

/// Network join status as tracked by the MAC layer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JoinStatus {
    /// No join procedure has completed
    NotJoined,
    /// A join procedure is in flight
    Joining,
    /// The device holds a valid session
    Joined,
}

/// LoRaWAN device class
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceClass {
    /// Class A: two receive windows after each uplink
    A,
    /// Class B: additional scheduled receive slots
    B,
    /// Class C: continuous receive except when transmitting
    C,
}

impl DeviceClass {
    /// Map a downlink class selector byte to a device class.
    ///
    /// Selectors outside `0..=2` are not an error, they are simply ignored
    /// by the caller.
    pub fn from_selector(selector: u8) -> Option<Self> {
        match selector {
            0 => Some(DeviceClass::A),
            1 => Some(DeviceClass::B),
            2 => Some(DeviceClass::C),
            _ => None,
        }
    }

    /// Class name for log output
    pub fn name(&self) -> &'static str {
        match self {
            DeviceClass::A => "A",
            DeviceClass::B => "B",
            DeviceClass::C => "C",
        }
    }
}

/// Result code of an uplink submission
///
/// A non-success code is observability data rather than a fault: the node
/// records and logs it but takes no corrective action.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendResult {
    /// Frame accepted for transmission
    Success,
    /// MAC layer busy with a previous operation
    Busy,
    /// No session, frame dropped
    NotJoined,
    /// Submission failed inside the MAC layer
    Failed,
}

impl SendResult {
    /// Result name for log output
    pub fn as_str(&self) -> &'static str {
        match self {
            SendResult::Success => "success",
            SendResult::Busy => "busy",
            SendResult::NotJoined => "not-joined",
            SendResult::Failed => "failed",
        }
    }
}

/// MAC tuning parameters for one-time bring-up
///
/// Built from [`AppConfig`](crate::config::AppConfig) by the node.
#[derive(Debug, Clone, Copy)]
pub struct MacParams {
    /// Adaptive Data Rate enabled
    pub adr_enabled: bool,
    /// Default data rate index
    pub data_rate: u8,
    /// Public network sync word
    pub public_network: bool,
    /// Maximum join trials before the MAC gives up
    pub join_trials: u8,
    /// Default transmit power index
    pub tx_power: u8,
}

impl From<&crate::config::AppConfig> for MacParams {
    fn from(config: &crate::config::AppConfig) -> Self {
        Self {
            adr_enabled: config.adr_enabled,
            data_rate: config.data_rate,
            public_network: config.public_network,
            join_trials: config.join_trials,
            tx_power: config.tx_power,
        }
    }
}

/// A received downlink with its link-quality metrics
#[derive(Debug, Clone)]
pub struct DownlinkFrame {
    /// Destination port
    pub port: u8,
    /// Decrypted application payload
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
    /// Received signal strength in dBm
    pub rssi: i16,
    /// Signal to noise ratio in dB
    pub snr: i8,
}

/// Asynchronous MAC completion delivered to the node
#[derive(Debug, Clone)]
pub enum MacEvent {
    /// The join procedure completed and a session is established
    Joined,
    /// A previously requested class switch took effect
    ClassConfirmed(DeviceClass),
    /// A downlink frame was received and decrypted
    Downlink(DownlinkFrame),
}

/// The MAC/radio collaborator consumed by the node
///
/// All operations are asynchronous: they return immediately and report
/// completion through the event queue. Implementations must deliver events
/// only from [`process_events`](MacLayer::process_events) context so that
/// no handler ever runs concurrently with another.
pub trait MacLayer {
    /// Error type for radio bring-up
    type Error;

    /// One-time radio and stack initialization
    fn init(&mut self, hw: &HardwareConfig, params: MacParams) -> Result<(), Self::Error>;

    /// Begin the join procedure asynchronously
    fn join(&mut self);

    /// Current join status
    fn join_status(&self) -> JoinStatus;

    /// Request a device class switch; confirmed via [`MacEvent::ClassConfirmed`]
    fn request_class(&mut self, class: DeviceClass);

    /// Submit an uplink frame
    fn send(&mut self, frame: &UplinkFrame, confirmed: bool) -> SendResult;

    /// Service pending radio interrupt work; must run every loop iteration
    fn process_events(&mut self);

    /// Take the next pending completion, if any
    fn poll_event(&mut self) -> Option<MacEvent>;

    /// Entropy word for jitter seeding (hardware RNG or radio noise)
    fn random_seed(&mut self) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_maps_to_class() {
        assert_eq!(DeviceClass::from_selector(0), Some(DeviceClass::A));
        assert_eq!(DeviceClass::from_selector(1), Some(DeviceClass::B));
        assert_eq!(DeviceClass::from_selector(2), Some(DeviceClass::C));
    }

    #[test]
    fn out_of_range_selector_is_none() {
        assert_eq!(DeviceClass::from_selector(3), None);
        assert_eq!(DeviceClass::from_selector(9), None);
        assert_eq!(DeviceClass::from_selector(0xFF), None);
    }

    #[test]
    fn class_names() {
        assert_eq!(DeviceClass::A.name(), "A");
        assert_eq!(DeviceClass::B.name(), "B");
        assert_eq!(DeviceClass::C.name(), "C");
    }
}
