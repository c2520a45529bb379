//! Status LED handling.
//!
//! While no host is connected the LED runs a fixed double-blink heartbeat
//! (on 150 ms, off 150 ms, on 150 ms, off 1 s); once connected it goes solid.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::lifecycle::{ConnectionState, LinkStatus};

/// The disconnected heartbeat: (level, duration in ms) per phase.
pub const BLINK_PATTERN: [(bool, u32); 4] = [(true, 150), (false, 150), (true, 150), (false, 1000)];

/// Drives the status LED from the connection state.
pub struct StatusIndicator<Led, D> {
    led: Led,
    delay: D,
}

impl<Led: OutputPin, D: DelayNs> StatusIndicator<Led, D> {
    pub fn new(led: Led, delay: D) -> Self {
        Self { led, delay }
    }

    fn set(&mut self, on: bool) {
        // The indicator is cosmetic; a failed edge is not worth surfacing.
        let result = if on {
            self.led.set_high()
        } else {
            self.led.set_low()
        };
        let _ = result;
    }

    /// Run one pass of the heartbeat pattern, bailing out between phases if
    /// the link comes up.
    pub async fn blink_cycle(&mut self, link: &LinkStatus) {
        for (on, ms) in BLINK_PATTERN {
            if link.is_connected() {
                return;
            }
            self.set(on);
            self.delay.delay_ms(ms).await;
        }
    }

    /// Task body: heartbeat while disconnected, solid on while connected.
    pub async fn run<W: RawMutex>(
        &mut self,
        link: &LinkStatus,
        wakeup: &Signal<W, ConnectionState>,
    ) -> ! {
        loop {
            if link.is_connected() {
                self.set(true);
                wakeup.wait().await;
            } else {
                self.blink_cycle(link).await;
            }
        }
    }
}
