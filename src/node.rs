//! Session/uplink state machine
//!
//! [`LoRaWanNode`] is the single thread of control of the application: it
//! tracks join status, paces periodic unconfirmed uplinks through the
//! duty-cycle timer, and reacts to server-directed class switches. All MAC
//! completions arrive through the event queue drained in [`process`], so
//! every handler runs serially; the exclusive `&mut self` borrow on every
//! entry point is the non-reentrancy guarantee, no locking is involved.
//!
//! The error policy is availability first: after bring-up nothing in this
//! layer aborts or escalates. Failed sends are logged and retried implicitly
//! by the next tick, malformed downlinks are ignored, and an unjoined tick
//! is simply skipped.
//!
//! [`process`]: LoRaWanNode::process

use embedded_hal::timer::CountDown;
use heapless::Vec;

use crate::config::{AppConfig, HardwareConfig};
use crate::mac::{
    DeviceClass, DownlinkFrame, JoinStatus, MacEvent, MacLayer, MacParams, SendResult,
};
use crate::timer::DutyCycleTimer;
use crate::uplink::{SequenceCounter, UplinkFrame, MAX_PAYLOAD_SIZE};

#[cfg(feature = "defmt")]
#[allow(unused_imports)]
use defmt::{debug, info, warn};
#[cfg(not(feature = "defmt"))]
#[allow(unused_imports)]
use log::{debug, info, warn};

/// Session lifecycle as seen by the application layer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// Bring-up has not run yet
    Unjoined,
    /// Join request issued, waiting for the MAC to complete it
    Joining,
    /// Session established, periodic uplinks running
    Joined,
}

/// Node error type
///
/// Only bring-up can fail loudly; everything afterwards is soft.
#[derive(Debug)]
pub enum NodeError<E> {
    /// Radio/MAC initialization failed
    Init(E),
    /// `start` was called on a node that is already running
    AlreadyStarted,
}

/// The session/uplink state machine
///
/// Owns the MAC collaborator, the single reusable uplink frame, the
/// sequence counter and the duty-cycle timer. Nothing here is global and
/// nothing is shared: the owning firmware calls [`process`] from its main
/// loop and, optionally, [`on_timer_expired`] from a timer interrupt.
///
/// [`process`]: LoRaWanNode::process
/// [`on_timer_expired`]: LoRaWanNode::on_timer_expired
pub struct LoRaWanNode<M, T>
where
    M: MacLayer,
    T: CountDown,
    T::Time: From<u32>,
{
    mac: M,
    config: AppConfig,
    state: SessionState,
    class: DeviceClass,
    frame: UplinkFrame,
    counter: SequenceCounter,
    timer: DutyCycleTimer<T>,
    last_send: Option<SendResult>,
    app_rx: Option<Vec<u8, MAX_PAYLOAD_SIZE>>,
}

impl<M, T> LoRaWanNode<M, T>
where
    M: MacLayer,
    T: CountDown,
    T::Time: From<u32>,
{
    /// Create a node over the given MAC layer and hardware countdown
    pub fn new(mac: M, countdown: T, config: AppConfig) -> Self {
        let timer = DutyCycleTimer::new(countdown, config.tx_period_ms, config.jitter_max_ms);
        Self {
            mac,
            config,
            state: SessionState::Unjoined,
            class: DeviceClass::A,
            frame: UplinkFrame::new(),
            counter: SequenceCounter::new(),
            timer,
            last_send: None,
            app_rx: None,
        }
    }

    /// One-time bring-up: initialize the radio stack and begin the join
    /// procedure.
    ///
    /// Join completion arrives later through the event queue; the join is
    /// retried internally by the MAC up to the configured trial limit and
    /// is never restarted by this layer.
    pub fn start(&mut self, hw: &HardwareConfig) -> Result<(), NodeError<M::Error>> {
        if self.state != SessionState::Unjoined {
            return Err(NodeError::AlreadyStarted);
        }

        let seed = self.mac.random_seed();
        self.timer.seed(seed);

        self.mac
            .init(hw, MacParams::from(&self.config))
            .map_err(NodeError::Init)?;

        self.mac.join();
        self.state = SessionState::Joining;
        info!("join requested");
        Ok(())
    }

    /// Main-loop body.
    ///
    /// Services pending radio interrupt work, drains the MAC event queue,
    /// and runs the periodic tick if the countdown fired. The caller loops
    /// over this and yields a short slice between iterations; no call in
    /// here blocks.
    pub fn process(&mut self) {
        self.mac.process_events();
        while let Some(event) = self.mac.poll_event() {
            self.handle_event(event);
        }
        if self.timer.poll_expired() {
            self.on_timer_expired();
        }
    }

    /// Duty-cycle tick, also callable from an interrupt-driven host.
    ///
    /// Rearms the timer before attempting the transmission so that a slow
    /// or failing send can never stall the cycle.
    pub fn on_timer_expired(&mut self) {
        self.timer.rearm();
        self.send_periodic_frame();
    }

    /// Current session lifecycle state
    pub fn session_state(&self) -> SessionState {
        self.state
    }

    /// Device class currently in effect
    pub fn device_class(&self) -> DeviceClass {
        self.class
    }

    /// Result code of the most recent uplink submission
    pub fn last_send_result(&self) -> Option<SendResult> {
        self.last_send
    }

    /// Take the most recent application-port downlink payload, if any
    pub fn take_downlink(&mut self) -> Option<Vec<u8, MAX_PAYLOAD_SIZE>> {
        self.app_rx.take()
    }

    /// Borrow the MAC layer
    pub fn mac(&self) -> &M {
        &self.mac
    }

    /// Mutably borrow the MAC layer
    pub fn mac_mut(&mut self) -> &mut M {
        &mut self.mac
    }

    fn handle_event(&mut self, event: MacEvent) {
        match event {
            MacEvent::Joined => self.on_joined(),
            MacEvent::ClassConfirmed(class) => self.on_class_confirmed(class),
            MacEvent::Downlink(frame) => self.on_downlink(frame),
        }
    }

    /// Join completed: settle into class A and start the duty cycle.
    fn on_joined(&mut self) {
        info!("network joined");
        self.state = SessionState::Joined;
        self.mac.request_class(DeviceClass::A);
        // arm() is idempotent, a duplicate join completion cannot
        // double-arm the cycle
        self.timer.arm();
    }

    fn on_downlink(&mut self, downlink: DownlinkFrame) {
        info!(
            "downlink on port {}, size {}, rssi {}, snr {}",
            downlink.port,
            downlink.payload.len(),
            downlink.rssi,
            downlink.snr
        );

        if downlink.port == self.config.class_port {
            // One selector byte exactly; anything else is not a command
            if downlink.payload.len() == 1 {
                if let Some(class) = DeviceClass::from_selector(downlink.payload[0]) {
                    self.mac.request_class(class);
                }
            }
        } else if downlink.port == self.config.app_port {
            self.app_rx = Some(downlink.payload);
        }
        // other ports: ignored
    }

    /// Class switch took effect: tell the network server right away with a
    /// zero-length unconfirmed uplink on the application port.
    fn on_class_confirmed(&mut self, class: DeviceClass) {
        info!("switch to class {} done", class.name());
        self.class = class;

        self.frame.rebuild_empty(self.config.app_port);
        let result = self.mac.send(&self.frame, false);
        self.last_send = Some(result);
        if result != SendResult::Success {
            // Fire and forget: the next periodic uplink carries on regardless
            warn!("class status uplink not accepted: {}", result.as_str());
        }
    }

    /// Periodic uplink attempt.
    ///
    /// Skipped without side effects while not joined; the next tick tries
    /// again. The sequence counter advances on every submission whether or
    /// not the MAC accepted it.
    fn send_periodic_frame(&mut self) {
        if self.mac.join_status() != JoinStatus::Joined {
            info!("not joined, skip sending frame");
            return;
        }

        let seq = self.counter.value();
        if self.frame.rebuild(self.config.app_port, &[seq]).is_err() {
            // Cannot happen for a 1-byte payload; leave the counter alone
            return;
        }

        let result = self.mac.send(&self.frame, false);
        self.counter.advance();
        self.last_send = Some(result);
        info!("uplink seq {} result {}", seq, result.as_str());
    }
}
