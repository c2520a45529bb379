//! Host subcommand envelopes and the canned reply table.
//!
//! During the identification handshake the host sends rumble-and-subcommand
//! output reports in a fixed 49-byte envelope. The subcommand discriminator
//! sits at byte 10; for SPI flash reads bytes 11-12 carry a little-endian
//! read address, and a few commands qualify themselves with an argument in
//! byte 11. Envelopes of any other length are not interpreted (the host does
//! not fragment handshake commands, so no reassembly is attempted).
//!
//! Every recognized subcommand has a fixed 0x21 acknowledgement reply,
//! captured from a real controller trace. The replies are immutable for the
//! process lifetime except the device-info reply, which is patched once at
//! startup with the persisted device address (the host compares it against
//! the address it paired with).
//!
//! The NFC/IR MCU configuration exchange (0x21 0x21) is the completion
//! marker: once its ack has been sent, the host treats the device as a fully
//! identified controller and gameplay reports may begin.

use crate::types::DeviceAddress;

/// Length of the rumble+subcommand envelope the host sends.
pub const INBOUND_ENVELOPE_LEN: usize = 49;

/// Offset of the subcommand discriminator within the envelope.
pub const SUBCOMMAND_OFFSET: usize = 10;

/// Offset of the device address within the device-info reply.
pub const DEVICE_ADDRESS_OFFSET: usize = 19;

/// A recognized handshake subcommand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Subcommand {
    /// 0x02: request device info (firmware version, type, device address).
    DeviceInfo,
    /// 0x03: set input report mode.
    SetInputMode,
    /// 0x04: trigger buttons elapsed time.
    TriggerButtonsElapsed,
    /// 0x08: set shipment low-power state.
    SetShipmentState,
    /// 0x10: SPI flash read at the given little-endian address.
    SpiRead(u16),
    /// 0x40: enable IMU. The host sends two near-identical argument values
    /// during the handshake; both map to the same acknowledgement.
    EnableImu,
    /// 0x48: enable vibration.
    EnableVibration,
    /// 0x30: set player lights.
    SetPlayerLights,
    /// 0x21: NFC/IR MCU configuration; its ack completes the handshake.
    McuConfig,
}

impl Subcommand {
    /// Classify an inbound envelope into a subcommand.
    ///
    /// Returns `None` for envelopes of the wrong length and for
    /// discriminators the handshake never uses.
    #[must_use]
    pub fn classify(envelope: &[u8]) -> Option<Self> {
        if envelope.len() != INBOUND_ENVELOPE_LEN {
            return None;
        }
        let id = envelope[SUBCOMMAND_OFFSET];
        let arg = envelope[SUBCOMMAND_OFFSET + 1];
        match id {
            0x02 => Some(Self::DeviceInfo),
            0x03 => Some(Self::SetInputMode),
            0x04 => Some(Self::TriggerButtonsElapsed),
            0x08 => Some(Self::SetShipmentState),
            0x10 => {
                let addr = u16::from_le_bytes([arg, envelope[SUBCOMMAND_OFFSET + 2]]);
                Some(Self::SpiRead(addr))
            }
            0x40 if arg == 0x01 || arg == 0x02 => Some(Self::EnableImu),
            0x48 if arg == 0x01 => Some(Self::EnableVibration),
            0x30 if arg == 0x01 => Some(Self::SetPlayerLights),
            0x21 if arg == 0x21 => Some(Self::McuConfig),
            _ => None,
        }
    }

    /// Whether acknowledging this subcommand completes the pairing handshake.
    #[inline]
    #[must_use]
    pub const fn completes_pairing(self) -> bool {
        matches!(self, Self::McuConfig)
    }
}

// Canned acknowledgement replies, byte-for-byte from a controller trace.

const REPLY_DEVICE_INFO: [u8; 49] = [
    0x21, 0x01, 0x40, 0x00, 0x00, 0x00, 0xE6, 0x27, 0x78, 0xAB, 0xD7, 0x76, 0x00, 0x82, 0x02,
    0x03, 0x48, 0x03, 0x02, 0xD8, 0xA0, 0x1D, 0x40, 0x15, 0x66, 0x03, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

const REPLY_SHIPMENT_STATE: &[u8] = &[
    0x21, 0x02, 0x8E, 0x84, 0x00, 0x12, 0x01, 0x18, 0x80, 0x01, 0x18, 0x80, 0x80, 0x80, 0x08,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

const REPLY_INPUT_MODE: &[u8] = &[
    0x21, 0x05, 0x8E, 0x84, 0x00, 0x12, 0x01, 0x18, 0x80, 0x01, 0x18, 0x80, 0x80, 0x80, 0x03,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

const REPLY_TRIGGER_ELAPSED: &[u8] = &[
    0x21, 0x06, 0x8E, 0x84, 0x00, 0x12, 0x01, 0x18, 0x80, 0x01, 0x18, 0x80, 0x80, 0x83, 0x04,
    0x00, 0x6A, 0x01, 0xBB, 0x01, 0x93, 0x01, 0x95, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

const REPLY_SPI_SERIAL_NUMBER: &[u8] = &[
    0x21, 0x03, 0x8E, 0x84, 0x00, 0x12, 0x01, 0x18, 0x80, 0x01, 0x18, 0x80, 0x80, 0x90, 0x10,
    0x00, 0x60, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00,
];

const REPLY_SPI_BODY_COLOR: &[u8] = &[
    0x21, 0x04, 0x8E, 0x84, 0x00, 0x12, 0x01, 0x18, 0x80, 0x01, 0x18, 0x80, 0x80, 0x90, 0x10,
    0x50, 0x60, 0x00, 0x00, 0x18, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

const REPLY_SPI_SENSOR_PARAMS: &[u8] = &[
    0x21, 0x04, 0x8E, 0x84, 0x00, 0x12, 0x01, 0x18, 0x80, 0x01, 0x18, 0x80, 0x80, 0x90, 0x10,
    0x80, 0x60, 0x00, 0x00, 0x18, 0x5E, 0x01, 0x00, 0x00, 0xF1, 0x0F, 0x19, 0xD0, 0x4C, 0xAE,
    0x40, 0xE1, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00,
    0x00,
];

const REPLY_SPI_STICK_PARAMS: &[u8] = &[
    0x21, 0x04, 0x8E, 0x84, 0x00, 0x12, 0x01, 0x18, 0x80, 0x01, 0x18, 0x80, 0x80, 0x90, 0x10,
    0x98, 0x60, 0x00, 0x00, 0x12, 0x19, 0xD0, 0x4C, 0xAE, 0x40, 0xE1, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00,
];

const REPLY_SPI_USER_CALIBRATION: &[u8] = &[
    0x21, 0x04, 0x8E, 0x84, 0x00, 0x12, 0x01, 0x18, 0x80, 0x01, 0x18, 0x80, 0x80, 0x90, 0x10,
    0x10, 0x80, 0x00, 0x00, 0x18, 0x00, 0x00,
];

const REPLY_SPI_FACTORY_CALIBRATION: &[u8] = &[
    0x21, 0x05, 0x8E, 0x84, 0x00, 0x12, 0x01, 0x18, 0x80, 0x01, 0x18, 0x80, 0x80, 0x90, 0x10,
    0x3D, 0x60, 0x00, 0x00, 0x19, 0xF0, 0x07, 0x7F, 0xF0, 0x07, 0x7F, 0xF0, 0x07, 0x7F, 0xF0,
    0x07, 0x7F, 0xF0, 0x07, 0x7F, 0xF0, 0x07, 0x7F, 0xF0, 0x07, 0x7F, 0xF0, 0x07, 0x7F, 0x0F,
    0x0F, 0x00, 0x00, 0x00, 0x00,
];

const REPLY_SPI_IMU_CALIBRATION: &[u8] = &[
    0x21, 0x04, 0x8E, 0x84, 0x00, 0x12, 0x01, 0x18, 0x80, 0x01, 0x18, 0x80, 0x80, 0x90, 0x10,
    0x20, 0x60, 0x00, 0x00, 0x18, 0x00, 0x00,
];

const REPLY_IMU_ENABLED: &[u8] = &[
    0x21, 0x04, 0x8E, 0x84, 0x00, 0x12, 0x01, 0x18, 0x80, 0x01, 0x18, 0x80, 0x80, 0x80, 0x40,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

const REPLY_VIBRATION_ENABLED: &[u8] = &[
    0x21, 0x04, 0x8E, 0x84, 0x00, 0x12, 0x01, 0x18, 0x80, 0x01, 0x18, 0x80, 0x80, 0x80, 0x48,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

const REPLY_PLAYER_LIGHTS: &[u8] = &[
    0x21, 0x04, 0x8E, 0x84, 0x00, 0x12, 0x01, 0x18, 0x80, 0x01, 0x18, 0x80, 0x80, 0x80, 0x30,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

const REPLY_MCU_CONFIG: &[u8] = &[
    0x21, 0x03, 0x8E, 0x84, 0x00, 0x12, 0x01, 0x18, 0x80, 0x01, 0x18, 0x80, 0x80, 0x80, 0x21,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

/// The reply table, built once at startup with the device address patched in.
///
/// Keyed by [`Subcommand`]; every entry except the device-info reply is a
/// process-lifetime constant.
pub struct ReplyTable {
    device_info: [u8; 49],
}

impl ReplyTable {
    /// Build the table, stamping the device address into the device-info
    /// reply.
    #[must_use]
    pub fn new(address: &DeviceAddress) -> Self {
        let mut device_info = REPLY_DEVICE_INFO;
        device_info[DEVICE_ADDRESS_OFFSET..DEVICE_ADDRESS_OFFSET + 6]
            .copy_from_slice(address.as_bytes());
        Self { device_info }
    }

    /// Look up the canned reply for a subcommand.
    ///
    /// SPI reads outside the handful of regions the handshake touches have
    /// no entry and yield `None`.
    #[must_use]
    pub fn reply_for(&self, subcommand: Subcommand) -> Option<&[u8]> {
        Some(match subcommand {
            Subcommand::DeviceInfo => &self.device_info,
            Subcommand::SetInputMode => REPLY_INPUT_MODE,
            Subcommand::TriggerButtonsElapsed => REPLY_TRIGGER_ELAPSED,
            Subcommand::SetShipmentState => REPLY_SHIPMENT_STATE,
            Subcommand::SpiRead(addr) => match addr {
                0x6000 => REPLY_SPI_SERIAL_NUMBER,
                0x6050 => REPLY_SPI_BODY_COLOR,
                0x6080 => REPLY_SPI_SENSOR_PARAMS,
                0x6098 => REPLY_SPI_STICK_PARAMS,
                0x8010 => REPLY_SPI_USER_CALIBRATION,
                0x603D => REPLY_SPI_FACTORY_CALIBRATION,
                0x6020 => REPLY_SPI_IMU_CALIBRATION,
                _ => return None,
            },
            Subcommand::EnableImu => REPLY_IMU_ENABLED,
            Subcommand::EnableVibration => REPLY_VIBRATION_ENABLED,
            Subcommand::SetPlayerLights => REPLY_PLAYER_LIGHTS,
            Subcommand::McuConfig => REPLY_MCU_CONFIG,
        })
    }
}
