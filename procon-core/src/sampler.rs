//! Line-level sampling of the legacy shift-register pad.
//!
//! The pad speaks the classic two-wire-plus-data protocol: a latch pulse
//! freezes the button state into the shift register, then each clock pulse
//! shifts one bit out on the serial data line, most significant button first.
//! The data line is active-low, so a pressed button reads back as 0.
//!
//! Timing is deliberately relaxed: every edge is followed by a fixed yielding
//! delay, and the loop just repeats as fast as those delays allow. The pad
//! hardware tolerates slow, jittery polling, so there is no period target and
//! no busy-waiting.
//!
//! A disconnected or silent pad reads as all lines idle, which is
//! indistinguishable from "no buttons pressed". That matches the source
//! hardware's behavior and is accepted as a known limitation.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::mapper::{map_sample, ControllerType, RawSample};
use crate::shared::SharedPadState;

/// How long the latch line is held high to settle the register.
pub const LATCH_SETTLE_MS: u32 = 6;

/// Half-period of the shift clock.
pub const CLOCK_HALF_PERIOD_MS: u32 = 6;

/// A GPIO line refused an edge. Absorbed by the sampling loop; only surfaced
/// from [`ShiftPad::read_frame`] for callers that care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineError;

/// Bit-banged reader for the pad's latch/clock/data lines.
///
/// Owns its three GPIO lines exclusively for the process lifetime.
pub struct ShiftPad<Latch, Clock, Data, D> {
    latch: Latch,
    clock: Clock,
    data: Data,
    delay: D,
    controller: ControllerType,
    latched: bool,
}

impl<Latch, Clock, Data, D> ShiftPad<Latch, Clock, Data, D>
where
    Latch: OutputPin,
    Clock: OutputPin,
    Data: InputPin,
    D: DelayNs,
{
    pub fn new(latch: Latch, clock: Clock, data: Data, delay: D, controller: ControllerType) -> Self {
        Self {
            latch,
            clock,
            data,
            delay,
            controller,
            latched: false,
        }
    }

    /// Diagnostics: whether a shift-out is currently in progress.
    #[inline]
    #[must_use]
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Latch the pad and clock out one full sample.
    pub async fn read_frame(&mut self) -> Result<RawSample, LineError> {
        self.latch.set_high().map_err(|_| LineError)?;
        self.delay.delay_ms(LATCH_SETTLE_MS).await;
        self.latch.set_low().map_err(|_| LineError)?;
        self.latched = true;

        // Give the register time to present the first bit.
        self.delay.delay_ms(LATCH_SETTLE_MS).await;

        let mut sample = RawSample::EMPTY;
        for bit in 0..self.controller.sample_bits() {
            // Active-low: pressed buttons pull the data line down.
            if self.data.is_low().map_err(|_| LineError)? {
                sample.set(bit);
            }
            self.clock.set_high().map_err(|_| LineError)?;
            self.delay.delay_ms(CLOCK_HALF_PERIOD_MS).await;
            self.clock.set_low().map_err(|_| LineError)?;
            self.delay.delay_ms(CLOCK_HALF_PERIOD_MS).await;
        }
        self.latched = false;

        Ok(sample)
    }

    /// Task body: sample forever, publishing each mapped frame.
    pub async fn run<M: RawMutex>(mut self, shared: &SharedPadState<M>) -> ! {
        info!("pad sampler running ({:?})", self.controller);
        loop {
            // Read noise collapses to the idle sample; there is no way (and
            // no need) to tell it apart from a released pad.
            let sample = self.read_frame().await.unwrap_or(RawSample::EMPTY);
            shared.write(map_sample(sample, self.controller));
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use procon_proto::Buttons;

    use super::*;
    use crate::testing::{block_on, NoopDelay, RecordingPin, ScriptedDataPin};

    fn pad(
        data: ScriptedDataPin,
        controller: ControllerType,
    ) -> (
        ShiftPad<RecordingPin, RecordingPin, ScriptedDataPin, NoopDelay>,
        RecordingPin,
        RecordingPin,
    ) {
        let latch = RecordingPin::new();
        let clock = RecordingPin::new();
        (
            ShiftPad::new(latch.clone(), clock.clone(), data, NoopDelay, controller),
            latch,
            clock,
        )
    }

    #[test]
    fn test_latch_pulse_then_eight_clocks() {
        let (mut pad, latch, clock) = pad(ScriptedDataPin::idle(), ControllerType::EightButton);
        block_on(pad.read_frame()).unwrap();

        assert_eq!(latch.edges(), std::vec![true, false]);
        let clock_edges = clock.edges();
        assert_eq!(clock_edges.len(), 16);
        assert_eq!(clock_edges.iter().filter(|&&level| level).count(), 8);
    }

    #[test]
    fn test_sixteen_button_pad_gets_sixteen_clocks() {
        let (mut pad, _latch, clock) = pad(ScriptedDataPin::idle(), ControllerType::SixteenButton);
        block_on(pad.read_frame()).unwrap();
        assert_eq!(clock.edges().iter().filter(|&&level| level).count(), 16);
    }

    #[test]
    fn test_idle_line_reads_empty_sample() {
        let (mut pad, _latch, _clock) = pad(ScriptedDataPin::idle(), ControllerType::EightButton);
        let sample = block_on(pad.read_frame()).unwrap();
        assert_eq!(sample, RawSample::EMPTY);
    }

    #[test]
    fn test_pressed_buttons_read_active_low() {
        // A (bit 0) and Start (bit 3) held: the data line is low on those
        // clock positions, high everywhere else.
        let levels: Vec<bool> = (0..8).map(|bit| !(bit == 0 || bit == 3)).collect();
        let (mut pad, _latch, _clock) =
            pad(ScriptedDataPin::new(levels), ControllerType::EightButton);
        let sample = block_on(pad.read_frame()).unwrap();
        assert_eq!(sample, RawSample(0x09));
        assert_eq!(
            map_sample(sample, ControllerType::EightButton).buttons,
            Buttons::A | Buttons::PLUS
        );
    }

    #[test]
    fn test_latched_flag_clears_after_frame() {
        let (mut pad, _latch, _clock) = pad(ScriptedDataPin::idle(), ControllerType::EightButton);
        assert!(!pad.is_latched());
        block_on(pad.read_frame()).unwrap();
        assert!(!pad.is_latched());
    }
}
