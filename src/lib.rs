//! Application-level control logic for a LoRaWAN end-device
//!
//! This crate drives a battery-powered LoRaWAN node through network join,
//! periodic unconfirmed uplinks, and server-directed device-class switching.
//! It owns the session/uplink state machine only: the MAC layer (session
//! keys, regional parameters, radio control) is an external collaborator
//! injected through the [`mac::MacLayer`] trait, and the duty-cycle timer
//! drives any `embedded-hal` countdown.
//!
//! # Features
//! - Join tracking with duty-cycled periodic uplinks after join
//! - Downlink-triggered class switching (A/B/C) on a reserved control port
//! - Zero-length status uplink on every confirmed class change
//! - Single-threaded cooperative operation, no locking, no allocation
//! - Fake MAC friendly: the whole state machine is testable off-hardware
//!
//! # Example
//! ```ignore
//! use lorawan_node::{
//!     config::{AppConfig, HardwareConfig},
//!     node::LoRaWanNode,
//! };
//!
//! // `mac` implements MacLayer, `countdown` implements embedded-hal CountDown
//! let mut node = LoRaWanNode::new(mac, countdown, AppConfig::default());
//!
//! // One-time bring-up: radio init plus asynchronous join.
//! node.start(&HardwareConfig::default()).unwrap();
//!
//! // Cooperative main loop: service the radio, drain MAC events,
//! // run the periodic tick when the countdown fires.
//! loop {
//!     node.process();
//!     // yield a short slice to the host runtime here
//! }
//! ```

#![warn(missing_docs)]
#![no_std]

/// Runtime and hardware configuration
pub mod config;

/// MAC/radio collaborator interface
pub mod mac;

/// Session/uplink state machine
pub mod node;

/// Duty-cycle timer
pub mod timer;

/// Uplink frame buffer and sequence counter
pub mod uplink;
