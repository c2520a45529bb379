//! The host-driven pairing state machine.
//!
//! The host identifies the controller through a sequence of subcommand
//! exchanges; each recognized envelope gets its canned reply back, unmodified,
//! and everything else is dropped on the floor (the host retries or moves on
//! by itself; there is deliberately no retry logic on this side).
//!
//! Only one exchange changes state: the NFC/IR MCU configuration ack flips
//! the session to paired, after which the report scheduler switches from idle
//! placeholders to full input reports. The flag only ever goes back to false
//! through a disconnect.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use procon_proto::subcommand::SUBCOMMAND_OFFSET;
use procon_proto::{ReplyTable, Subcommand, INBOUND_ENVELOPE_LEN};

use crate::transport::{HidTransport, TransportError, INTERRUPT_CHANNEL};

/// Pairing state for one connection session.
///
/// Constructed once at startup (the reply table needs the persisted device
/// address); shared by the transport callback context and the report
/// scheduler.
pub struct PairingSession {
    replies: ReplyTable,
    paired: AtomicBool,
}

impl PairingSession {
    #[must_use]
    pub fn new(replies: ReplyTable) -> Self {
        Self {
            replies,
            paired: AtomicBool::new(false),
        }
    }

    /// Whether the handshake has completed for the current session.
    #[inline]
    #[must_use]
    pub fn is_paired(&self) -> bool {
        self.paired.load(Ordering::Acquire)
    }

    /// Drop back to the unpaired state. Called on disconnect.
    pub fn reset(&self) {
        if self.paired.swap(false, Ordering::AcqRel) {
            info!("pairing state cleared");
        }
    }

    /// Process one inbound packet from the host.
    ///
    /// Packets that are not the exact handshake envelope length are ignored
    /// (the host does not fragment handshake commands). Recognized
    /// subcommands are answered with their fixed reply; unknown ones produce
    /// no reply at all.
    pub async fn handle_inbound<M: RawMutex, T: HidTransport>(
        &self,
        payload: &[u8],
        transport: &Mutex<M, T>,
    ) -> Result<(), TransportError> {
        if payload.len() != INBOUND_ENVELOPE_LEN {
            trace!("ignoring {} byte report from host", payload.len());
            return Ok(());
        }

        let Some(subcommand) = Subcommand::classify(payload) else {
            debug!(
                "unsupported subcommand {:02x} {:02x} {:02x}",
                payload[SUBCOMMAND_OFFSET],
                payload[SUBCOMMAND_OFFSET + 1],
                payload[SUBCOMMAND_OFFSET + 2]
            );
            return Ok(());
        };

        let Some(reply) = self.replies.reply_for(subcommand) else {
            debug!("no canned reply for {:?}", subcommand);
            return Ok(());
        };

        transport
            .lock()
            .await
            .send(INTERRUPT_CHANNEL, reply)
            .await?;

        if subcommand.completes_pairing() && !self.paired.swap(true, Ordering::AcqRel) {
            info!("handshake complete, presenting as paired controller");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use procon_proto::{DeviceAddress, ReplyTable};

    use super::*;
    use crate::testing::{block_on, MockTransport};

    fn session() -> PairingSession {
        let table = ReplyTable::new(&DeviceAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]));
        PairingSession::new(table)
    }

    fn envelope(bytes: &[u8]) -> Vec<u8> {
        let mut env = std::vec![0u8; INBOUND_ENVELOPE_LEN];
        env[SUBCOMMAND_OFFSET..SUBCOMMAND_OFFSET + bytes.len()].copy_from_slice(bytes);
        env
    }

    #[test]
    fn test_known_subcommand_gets_exact_reply() {
        let session = session();
        let transport = MockTransport::new();
        let sent = transport.sent.clone();
        let mutex: Mutex<NoopRawMutex, _> = Mutex::new(transport);

        block_on(session.handle_inbound(&envelope(&[16, 0, 96]), &mutex)).unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (report_type, payload) = &sent[0];
        assert_eq!(*report_type, INTERRUPT_CHANNEL);
        assert_eq!(payload.len(), 48);
        assert_eq!(payload[0], 0x21);
        assert_eq!(&payload[14..17], &[0x10, 0x00, 0x60]);
        // Byte-for-byte what the table holds, nothing rewritten in flight.
        let expected = session
            .replies
            .reply_for(Subcommand::SpiRead(0x6000))
            .unwrap();
        assert_eq!(payload.as_slice(), expected);
        assert!(!session.is_paired());
    }

    #[test]
    fn test_device_info_reply_carries_patched_address() {
        let session = session();
        let transport = MockTransport::new();
        let sent = transport.sent.clone();
        let mutex: Mutex<NoopRawMutex, _> = Mutex::new(transport);

        block_on(session.handle_inbound(&envelope(&[0x02]), &mutex)).unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(&sent[0].1[19..25], &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    }

    #[test]
    fn test_wrong_length_envelope_is_ignored() {
        let session = session();
        let transport = MockTransport::new();
        let sent = transport.sent.clone();
        let mutex: Mutex<NoopRawMutex, _> = Mutex::new(transport);

        block_on(session.handle_inbound(&[0x02; 10], &mutex)).unwrap();
        block_on(session.handle_inbound(&[0x02; 50], &mutex)).unwrap();

        assert!(sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_subcommand_gets_no_reply() {
        let session = session();
        let transport = MockTransport::new();
        let sent = transport.sent.clone();
        let mutex: Mutex<NoopRawMutex, _> = Mutex::new(transport);

        block_on(session.handle_inbound(&envelope(&[0x7F]), &mutex)).unwrap();
        // SPI read of a region the handshake never touches.
        block_on(session.handle_inbound(&envelope(&[16, 0, 112]), &mutex)).unwrap();

        assert!(sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_mcu_config_completes_pairing_after_reply() {
        let session = session();
        let transport = MockTransport::new();
        let sent = transport.sent.clone();
        let mutex: Mutex<NoopRawMutex, _> = Mutex::new(transport);

        assert!(!session.is_paired());
        block_on(session.handle_inbound(&envelope(&[33, 33]), &mutex)).unwrap();
        assert!(session.is_paired());

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1[14], 0x21);
    }

    #[test]
    fn test_reset_clears_pairing() {
        let session = session();
        let transport = MockTransport::new();
        let mutex: Mutex<NoopRawMutex, _> = Mutex::new(transport);

        block_on(session.handle_inbound(&envelope(&[33, 33]), &mutex)).unwrap();
        assert!(session.is_paired());
        session.reset();
        assert!(!session.is_paired());
        // Idempotent.
        session.reset();
        assert!(!session.is_paired());
    }
}
