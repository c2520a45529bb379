//! Host-test support: a minimal blocking executor and mock peripherals.

extern crate std;

use core::cell::RefCell;
use core::convert::Infallible;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
use std::rc::Rc;
use std::sync::{Arc, Mutex as StdMutex};
use std::vec::Vec;

// Registers the std critical-section implementation for the test binary.
use critical_section as _;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::transport::{HidTransport, TransportError};

/// Run a future to completion (simple blocking executor).
///
/// Panics on `Pending`: every mock in this module resolves immediately.
pub fn block_on<F: Future>(mut f: F) -> F::Output {
    fn noop_raw_waker() -> RawWaker {
        fn noop(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            noop_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
        RawWaker::new(core::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
    let mut cx = Context::from_waker(&waker);

    // SAFETY: We don't move f after pinning
    let mut f = unsafe { Pin::new_unchecked(&mut f) };

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {
                panic!("Mock future returned Pending unexpectedly");
            }
        }
    }
}

/// Delay that completes instantly.
pub struct NoopDelay;

impl DelayNs for NoopDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

/// Transport that records every send.
pub struct MockTransport {
    pub sent: Arc<StdMutex<Vec<(u8, Vec<u8>)>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(StdMutex::new(Vec::new())),
        }
    }
}

impl HidTransport for MockTransport {
    fn send(
        &mut self,
        report_type: u8,
        payload: &[u8],
    ) -> impl Future<Output = Result<(), TransportError>> {
        self.sent
            .lock()
            .unwrap()
            .push((report_type, payload.to_vec()));
        core::future::ready(Ok(()))
    }
}

/// Output pin that records the level of every edge it is driven through.
#[derive(Clone, Default)]
pub struct RecordingPin {
    edges: Rc<RefCell<Vec<bool>>>,
}

impl RecordingPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edges(&self) -> Vec<bool> {
        self.edges.borrow().clone()
    }
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.edges.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.edges.borrow_mut().push(true);
        Ok(())
    }
}

/// Input pin that replays a scripted sequence of line levels, then idles high.
pub struct ScriptedDataPin {
    levels: Vec<bool>,
    pos: usize,
}

impl ScriptedDataPin {
    pub fn new(levels: Vec<bool>) -> Self {
        Self { levels, pos: 0 }
    }

    /// A line nothing is driving: reads high forever.
    pub fn idle() -> Self {
        Self::new(Vec::new())
    }
}

impl ErrorType for ScriptedDataPin {
    type Error = Infallible;
}

impl InputPin for ScriptedDataPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        let level = self.levels.get(self.pos).copied().unwrap_or(true);
        self.pos += 1;
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|level| !level)
    }
}
