//! Uplink frame buffer and sequence counter
//!
//! One [`UplinkFrame`] exists per node and is reused for every transmission.
//! The transmit paths rebuild it in place and fully construct it before
//! submission; the cooperative scheduling model guarantees it is never
//! rebuilt concurrently.

use heapless::Vec;

/// Maximum application payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 64;

/// Sequence counter wrap-around value
pub const SEQUENCE_MODULUS: u8 = 100;

/// Error returned when a payload does not fit the frame buffer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PayloadTooLarge;

/// The single reusable uplink frame
#[derive(Debug, Clone)]
pub struct UplinkFrame {
    port: u8,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl UplinkFrame {
    /// Create an empty frame addressed to nobody in particular
    pub fn new() -> Self {
        Self {
            port: 0,
            payload: Vec::new(),
        }
    }

    /// Rebuild the frame with the given port and payload
    pub fn rebuild(&mut self, port: u8, payload: &[u8]) -> Result<(), PayloadTooLarge> {
        self.payload.clear();
        self.payload
            .extend_from_slice(payload)
            .map_err(|_| PayloadTooLarge)?;
        self.port = port;
        Ok(())
    }

    /// Rebuild the frame as a zero-length status uplink on the given port
    pub fn rebuild_empty(&mut self, port: u8) {
        self.payload.clear();
        self.port = port;
    }

    /// Destination port
    pub fn port(&self) -> u8 {
        self.port
    }

    /// Payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

impl Default for UplinkFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// Uplink liveness counter in `[0, 100)`
///
/// This is a coarse liveness indicator, not a delivery-sequence number: it
/// advances once per submission whether or not the frame ever reached the
/// network server.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceCounter(u8);

impl SequenceCounter {
    /// Counter starting at zero
    pub fn new() -> Self {
        Self(0)
    }

    /// Current value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Advance modulo [`SEQUENCE_MODULUS`], returning the value that was
    /// current before the increment (the value just emitted).
    pub fn advance(&mut self) -> u8 {
        let emitted = self.0;
        self.0 = (self.0 + 1) % SEQUENCE_MODULUS;
        emitted
    }
}
