//! Periodic report transmission.
//!
//! While a host is connected the scheduler pulls the latest shared state,
//! encodes it and sends it on a fixed cadence. Until pairing completes it
//! sends the 2-byte idle placeholder on a slower cadence instead, which keeps
//! the host polling without feeding it gameplay data.
//!
//! The connected flag is re-checked at every iteration, so tearing the
//! session down never interrupts a send or leaves a lock held.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;
use procon_proto::{encode_idle_report, encode_input_report};

use crate::lifecycle::{ConnectionState, LinkStatus};
use crate::pairing::PairingSession;
use crate::shared::SharedPadState;
use crate::transport::{HidTransport, TransportError, INTERRUPT_CHANNEL};

/// Cadence of full input reports once paired.
pub const FULL_REPORT_INTERVAL_MS: u32 = 15;

/// Cadence of idle placeholder reports before pairing completes.
pub const IDLE_REPORT_INTERVAL_MS: u32 = 100;

/// The periodic report loop.
///
/// Sole consumer of [`SharedPadState::read_and_advance`]; the pairing state
/// machine shares the transport mutex but never this struct.
pub struct ReportScheduler<'a, M: RawMutex, T: HidTransport, D: DelayNs> {
    shared: &'a SharedPadState<M>,
    pairing: &'a PairingSession,
    transport: &'a Mutex<M, T>,
    delay: D,
}

impl<'a, M: RawMutex, T: HidTransport, D: DelayNs> ReportScheduler<'a, M, T, D> {
    pub fn new(
        shared: &'a SharedPadState<M>,
        pairing: &'a PairingSession,
        transport: &'a Mutex<M, T>,
        delay: D,
    ) -> Self {
        Self {
            shared,
            pairing,
            transport,
            delay,
        }
    }

    /// Send one report (idle or full, depending on pairing) and wait out its
    /// cadence interval.
    pub async fn send_next(&mut self) -> Result<(), TransportError> {
        let (state, frame) = self.shared.read_and_advance();

        if self.pairing.is_paired() {
            let report = encode_input_report(&state, frame);
            self.transport
                .lock()
                .await
                .send(INTERRUPT_CHANNEL, &report)
                .await?;
            self.delay.delay_ms(FULL_REPORT_INTERVAL_MS).await;
        } else {
            let report = encode_idle_report(frame);
            self.transport
                .lock()
                .await
                .send(INTERRUPT_CHANNEL, &report)
                .await?;
            self.delay.delay_ms(IDLE_REPORT_INTERVAL_MS).await;
        }

        Ok(())
    }

    /// Report loop for one connection session; returns once the link drops.
    ///
    /// Transmission failures are logged and the loop keeps going; the host's
    /// own polling recovers the cadence.
    pub async fn run_session(&mut self, link: &LinkStatus) {
        info!("report scheduler running");
        while link.is_connected() {
            if let Err(e) = self.send_next().await {
                warn!("report transmission failed: {:?}", e);
            }
        }
        info!("report scheduler stopped");
    }

    /// Task body: park until the link comes up, run the session, repeat.
    pub async fn run<W: RawMutex>(
        &mut self,
        link: &LinkStatus,
        wakeup: &Signal<W, ConnectionState>,
    ) -> ! {
        loop {
            if link.is_connected() {
                self.run_session(link).await;
            } else {
                wakeup.wait().await;
            }
        }
    }
}
