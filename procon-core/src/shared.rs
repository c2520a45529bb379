//! The shared state record exchanged between the sampler and the scheduler.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use procon_proto::ProconState;

struct Inner {
    state: ProconState,
    frame: u8,
}

/// Lock-guarded controller state plus the rolling 8-bit frame counter.
///
/// Exactly two roles touch this: the sampler writes, the report scheduler
/// reads. The lock covers only the copy-in/copy-out; neither GPIO access nor
/// transmission ever happens inside the critical section.
///
/// The frame counter wraps 255 -> 0, so the value 255 itself is never handed
/// out (the host only needs the sequence to roll, not to cover the full
/// range).
pub struct SharedPadState<M: RawMutex> {
    inner: Mutex<M, RefCell<Inner>>,
}

impl<M: RawMutex> SharedPadState<M> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                state: ProconState::neutral(),
                frame: 0,
            })),
        }
    }

    /// Replace the stored state with a fresh sample.
    pub fn write(&self, state: ProconState) {
        self.inner.lock(|cell| cell.borrow_mut().state = state);
    }

    /// Copy out the stored state and advance the frame counter.
    pub fn read_and_advance(&self) -> (ProconState, u8) {
        self.inner.lock(|cell| {
            let mut inner = cell.borrow_mut();
            let frame = inner.frame;
            inner.frame = inner.frame.wrapping_add(1);
            if inner.frame == u8::MAX {
                inner.frame = 0;
            }
            (inner.state, frame)
        })
    }
}

impl<M: RawMutex> Default for SharedPadState<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};
    use procon_proto::Buttons;

    use super::*;

    #[test]
    fn test_reader_sees_latest_write() {
        let shared: SharedPadState<NoopRawMutex> = SharedPadState::new();
        let mut state = ProconState::neutral();
        state.buttons = Buttons::A;
        shared.write(state);
        state.buttons = Buttons::B;
        shared.write(state);
        let (read, _) = shared.read_and_advance();
        assert_eq!(read.buttons, Buttons::B);
    }

    #[test]
    fn test_frame_counter_wraps_at_255() {
        let shared: SharedPadState<NoopRawMutex> = SharedPadState::new();
        for expected in 0..=254u8 {
            let (_, frame) = shared.read_and_advance();
            assert_eq!(frame, expected);
        }
        // The 256th call wraps back to zero; 255 is never produced.
        let (_, frame) = shared.read_and_advance();
        assert_eq!(frame, 0);
    }

    #[test]
    fn test_concurrent_reads_see_whole_writes() {
        // The writer only ever stores states whose three button groups carry
        // the same byte; any torn read would break that correlation.
        let shared: SharedPadState<CriticalSectionRawMutex> = SharedPadState::new();

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..10_000u32 {
                    let byte = (i % 251) as u32;
                    let mut state = ProconState::neutral();
                    state.buttons = Buttons(byte | (byte << 8) | (byte << 16));
                    shared.write(state);
                }
            });

            let mut frames = Vec::new();
            for _ in 0..10_000 {
                let (state, frame) = shared.read_and_advance();
                let b = state.buttons;
                assert_eq!(b.group1(), b.group2());
                assert_eq!(b.group2(), b.group3());
                frames.push(frame);
            }
            // The counter advances by exactly one per read, reader-side only.
            for pair in frames.windows(2) {
                let expected = if pair[0] == 254 { 0 } else { pair[0] + 1 };
                assert_eq!(pair[1], expected);
            }
        });
    }
}
