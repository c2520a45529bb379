//! The seam between this firmware and the platform Bluetooth HID stack.
//!
//! Radio bring-up, SDP registration (with
//! [`procon_proto::descriptor::REPORT_DESCRIPTOR`] and
//! [`procon_proto::descriptor::DEVICE_NAME`]) and the L2CAP interrupt channel
//! live in the vendor HID glue, outside this crate. That glue talks to the
//! firmware exclusively through the static queues here:
//!
//! - it calls [`post_event`] from its connection and data callbacks;
//! - it drains [`next_outbound`] and transmits each report;
//! - it applies the scan-mode changes it receives from [`next_command`].
//!
//! On the firmware side, [`BtHidLink`] and [`ScanModeControl`] are the
//! [`HidTransport`] / [`HostControl`] implementations handed to the core.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;
use procon_core::{HidTransport, HostControl, LinkEvent, TransportError};

/// Largest inbound packet the event queue will carry. The handshake envelope
/// is 49 bytes; anything bigger is not ours to interpret anyway.
pub const MAX_INBOUND_LEN: usize = 64;

/// Largest outbound report (the longest canned reply is 50 bytes).
pub const MAX_OUTBOUND_LEN: usize = 50;

/// One occurrence delivered by the stack's callbacks.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// Connection lifecycle change.
    Link(LinkEvent),
    /// Data the host sent on the interrupt channel.
    InterruptData {
        report_id: u8,
        data: Vec<u8, MAX_INBOUND_LEN>,
    },
}

/// A report queued for the stack to transmit.
#[derive(Debug, Clone)]
pub struct OutboundReport {
    pub report_type: u8,
    pub data: Vec<u8, MAX_OUTBOUND_LEN>,
}

/// GAP-level request from the firmware to the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCommand {
    SetDiscoverable(bool),
}

static HOST_EVENTS: Channel<CriticalSectionRawMutex, HostEvent, 8> = Channel::new();
static OUTBOUND: Channel<CriticalSectionRawMutex, OutboundReport, 4> = Channel::new();
static CONTROL: Channel<CriticalSectionRawMutex, LinkCommand, 2> = Channel::new();

/// Stack side: enqueue an event for the firmware.
///
/// Returns `false` if the queue is full and the event was dropped; callbacks
/// must not block the stack's own task.
pub fn post_event(event: HostEvent) -> bool {
    HOST_EVENTS.try_send(event).is_ok()
}

/// Firmware side: wait for the next stack event.
pub async fn next_host_event() -> HostEvent {
    HOST_EVENTS.receive().await
}

/// Stack side: wait for the next report to transmit.
pub async fn next_outbound() -> OutboundReport {
    OUTBOUND.receive().await
}

/// Stack side: wait for the next GAP request.
pub async fn next_command() -> LinkCommand {
    CONTROL.receive().await
}

/// Outbound report path, backed by the [`OUTBOUND`] queue.
pub struct BtHidLink;

impl HidTransport for BtHidLink {
    async fn send(&mut self, report_type: u8, payload: &[u8]) -> Result<(), TransportError> {
        let data = Vec::from_slice(payload).map_err(|_| TransportError::Io)?;
        OUTBOUND.send(OutboundReport { report_type, data }).await;
        Ok(())
    }
}

/// Discoverability control, backed by the [`CONTROL`] queue.
pub struct ScanModeControl;

impl HostControl for ScanModeControl {
    fn set_discoverable(&mut self, enabled: bool) {
        // Runs in callback context, so it must not wait for queue space.
        if CONTROL.try_send(LinkCommand::SetDiscoverable(enabled)).is_err() {
            defmt::warn!("scan mode request dropped, stack not draining commands");
        }
    }
}
