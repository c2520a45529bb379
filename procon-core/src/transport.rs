//! Narrow interfaces to the platform Bluetooth HID stack.
//!
//! The radio, L2CAP/SDP plumbing and HID registration live outside this
//! crate. Everything the core needs from them is captured here: a way to send
//! a report, a way to toggle discoverability, and the connection events the
//! stack delivers.

use core::future::Future;

use procon_proto::DeviceAddress;

/// HID header byte for input reports on the interrupt channel (DATA|INPUT).
pub const INTERRUPT_CHANNEL: u8 = 0xA1;

/// Error type for transport operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Send failed at the transport layer.
    Io,
    /// Transport exists but no host is attached.
    NotReady,
    /// The link to the stack has gone away.
    Closed,
}

/// Async trait for the outbound report path.
///
/// Both the report scheduler and the pairing state machine send through this;
/// callers serialize access with a mutex so the two roles never interleave a
/// write.
pub trait HidTransport {
    /// Transmit one report. `report_type` is the HID header byte
    /// ([`INTERRUPT_CHANNEL`] for everything this device sends).
    fn send(
        &mut self,
        report_type: u8,
        payload: &[u8],
    ) -> impl Future<Output = Result<(), TransportError>>;
}

/// GAP-level host control: whether new hosts may find and connect to us.
pub trait HostControl {
    fn set_discoverable(&mut self, enabled: bool);
}

/// Connection lifecycle events delivered by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    Connecting,
    Connected(DeviceAddress),
    Disconnecting,
    Disconnected(DeviceAddress),
}
