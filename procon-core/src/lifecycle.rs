//! Connection lifecycle handling.
//!
//! Transport connect/disconnect callbacks land in [`ConnectionManager`],
//! which owns the session bookkeeping: discoverability, the paired flag, and
//! waking the tasks that only run on one side of the connection boundary
//! (report scheduler while connected, status blinker while not).

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

use crate::pairing::PairingSession;
use crate::transport::{HostControl, LinkEvent};

/// Connection state as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

/// Shared connected flag, read by the scheduler and blinker loops at every
/// iteration (their cooperative stop signal).
pub struct LinkStatus {
    connected: AtomicBool,
}

impl LinkStatus {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }
}

impl Default for LinkStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Reacts to transport lifecycle events.
///
/// On connect: stop advertising, mark the link up, wake the scheduler.
/// On disconnect: clear the pairing flag, mark the link down, re-enter
/// discoverable mode, wake the blinker.
pub struct ConnectionManager<'a, W: RawMutex, H: HostControl> {
    status: &'a LinkStatus,
    pairing: &'a PairingSession,
    host: H,
    listeners: &'a [&'a Signal<W, ConnectionState>],
}

impl<'a, W: RawMutex, H: HostControl> ConnectionManager<'a, W, H> {
    pub fn new(
        status: &'a LinkStatus,
        pairing: &'a PairingSession,
        host: H,
        listeners: &'a [&'a Signal<W, ConnectionState>],
    ) -> Self {
        Self {
            status,
            pairing,
            host,
            listeners,
        }
    }

    pub fn on_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::Connecting => {
                info!("host connecting");
                self.broadcast(ConnectionState::Connecting);
            }
            LinkEvent::Connected(address) => {
                info!("connected to {:?}", address);
                self.host.set_discoverable(false);
                self.status.set_connected(true);
                self.broadcast(ConnectionState::Connected);
            }
            LinkEvent::Disconnecting => {
                info!("host disconnecting");
                self.broadcast(ConnectionState::Disconnecting);
            }
            LinkEvent::Disconnected(address) => {
                info!("disconnected from {:?}, making self discoverable", address);
                self.pairing.reset();
                self.status.set_connected(false);
                self.host.set_discoverable(true);
                self.broadcast(ConnectionState::Disconnected);
            }
        }
    }

    fn broadcast(&self, state: ConnectionState) {
        for listener in self.listeners {
            listener.signal(state);
        }
    }
}
