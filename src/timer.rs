//! Duty-cycle timer
//!
//! A single one-shot countdown that paces the periodic uplink. The timer is
//! re-armed on every expiry, which makes it functionally periodic, and the
//! re-arm happens before the transmission attempt so a slow or failing send
//! can never starve the cycle.
//!
//! Each re-arm adds a fresh random jitter on top of the base period to
//! desynchronize fleets of devices sharing a channel. The jitter comes from
//! a small LCG seeded with entropy supplied by the MAC layer.

use embedded_hal::timer::CountDown;

#[cfg(feature = "defmt")]
#[allow(unused_imports)]
use defmt::{debug, info, warn};
#[cfg(not(feature = "defmt"))]
#[allow(unused_imports)]
use log::{debug, info, warn};

/// Jitter PRNG, a 32-bit LCG with the Numerical Recipes constants.
///
/// Backoff-grade randomness only; nothing here is security relevant.
#[derive(Debug, Clone)]
struct JitterRng {
    state: u32,
}

impl JitterRng {
    fn new() -> Self {
        Self { state: 0x1234_5678 }
    }

    fn seed(&mut self, seed: u32) {
        // State must never be zero
        self.state = if seed == 0 { 1 } else { seed };
    }

    fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }
}

/// One-shot countdown re-armed on every expiry
///
/// Generic over any `embedded-hal` countdown whose time unit converts from
/// milliseconds.
pub struct DutyCycleTimer<T>
where
    T: CountDown,
    T::Time: From<u32>,
{
    countdown: T,
    base_period_ms: u32,
    jitter_max_ms: u32,
    armed: bool,
    rng: JitterRng,
}

impl<T> DutyCycleTimer<T>
where
    T: CountDown,
    T::Time: From<u32>,
{
    /// Create a disarmed timer over the given hardware countdown
    pub fn new(countdown: T, base_period_ms: u32, jitter_max_ms: u32) -> Self {
        Self {
            countdown,
            base_period_ms,
            jitter_max_ms,
            armed: false,
            rng: JitterRng::new(),
        }
    }

    /// Seed the jitter generator
    pub fn seed(&mut self, seed: u32) {
        self.rng.seed(seed);
    }

    /// Whether the countdown is currently running
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Arm the timer if it is not already running.
    ///
    /// Idempotent so that a duplicate join completion can never leave two
    /// countdowns in flight.
    pub fn arm(&mut self) {
        if self.armed {
            warn!("duty-cycle timer already armed, ignoring");
            return;
        }
        self.rearm();
    }

    /// Start the next countdown unconditionally, with fresh jitter.
    ///
    /// Returns the period that was programmed, in milliseconds.
    pub fn rearm(&mut self) -> u32 {
        let period_ms = self.next_period_ms();
        self.countdown.start(period_ms);
        self.armed = true;
        debug!("duty-cycle timer armed for {} ms", period_ms);
        period_ms
    }

    /// Check the hardware countdown, consuming an expiry.
    ///
    /// Returns `true` exactly once per firing; the caller is expected to
    /// re-arm immediately.
    pub fn poll_expired(&mut self) -> bool {
        if !self.armed {
            return false;
        }
        match self.countdown.wait() {
            Ok(()) => {
                self.armed = false;
                true
            }
            Err(nb::Error::WouldBlock) => false,
            Err(nb::Error::Other(_)) => false,
        }
    }

    fn next_period_ms(&mut self) -> u32 {
        if self.jitter_max_ms == 0 {
            return self.base_period_ms;
        }
        self.base_period_ms + self.rng.next() % self.jitter_max_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Manually fired countdown for host tests
    struct ManualCountdown {
        running: bool,
        fired: bool,
        last_period: Option<u32>,
        starts: usize,
    }

    impl ManualCountdown {
        fn new() -> Self {
            Self {
                running: false,
                fired: false,
                last_period: None,
                starts: 0,
            }
        }
    }

    impl CountDown for ManualCountdown {
        type Time = u32;

        fn start<P: Into<u32>>(&mut self, period: P) {
            self.running = true;
            self.fired = false;
            self.last_period = Some(period.into());
            self.starts += 1;
        }

        fn wait(&mut self) -> nb::Result<(), void::Void> {
            if self.fired {
                self.fired = false;
                self.running = false;
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }

    #[test]
    fn arm_is_idempotent_while_running() {
        let mut timer = DutyCycleTimer::new(ManualCountdown::new(), 30_000, 0);
        timer.arm();
        timer.arm();
        timer.arm();
        assert!(timer.is_armed());
        assert_eq!(timer.countdown.starts, 1);
    }

    #[test]
    fn rearm_always_restarts() {
        let mut timer = DutyCycleTimer::new(ManualCountdown::new(), 30_000, 0);
        timer.arm();
        timer.rearm();
        assert_eq!(timer.countdown.starts, 2);
    }

    #[test]
    fn without_jitter_period_is_fixed() {
        let mut timer = DutyCycleTimer::new(ManualCountdown::new(), 30_000, 0);
        for _ in 0..8 {
            assert_eq!(timer.rearm(), 30_000);
        }
    }

    #[test]
    fn jitter_stays_inside_window() {
        let mut timer = DutyCycleTimer::new(ManualCountdown::new(), 30_000, 5_000);
        timer.seed(0xDEAD_BEEF);
        for _ in 0..64 {
            let period = timer.rearm();
            assert!(period >= 30_000);
            assert!(period < 35_000);
        }
    }

    #[test]
    fn jitter_actually_varies() {
        let mut timer = DutyCycleTimer::new(ManualCountdown::new(), 30_000, 5_000);
        timer.seed(1);
        let first = timer.rearm();
        let mut saw_different = false;
        for _ in 0..16 {
            if timer.rearm() != first {
                saw_different = true;
            }
        }
        assert!(saw_different);
    }

    #[test]
    fn poll_consumes_a_firing_once() {
        let mut timer = DutyCycleTimer::new(ManualCountdown::new(), 30_000, 0);
        timer.arm();
        assert!(!timer.poll_expired());

        timer.countdown.fired = true;
        assert!(timer.poll_expired());
        assert!(!timer.is_armed());
        assert!(!timer.poll_expired());
    }

    #[test]
    fn disarmed_timer_never_fires() {
        let mut timer = DutyCycleTimer::new(ManualCountdown::new(), 30_000, 0);
        timer.countdown.fired = true;
        assert!(!timer.poll_expired());
    }
}
