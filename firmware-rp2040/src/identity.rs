//! Persisted device address.
//!
//! The handshake's device-info reply must carry a stable six-byte address,
//! so one is generated from the ring oscillator on first boot and stored in
//! the last flash sector. Subsequent boots read it back.

use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use procon_core::DeviceAddress;

/// Total flash size of the board (Pico: 2 MiB).
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// The address record lives in the last sector, after the firmware image.
const STORE_OFFSET: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

const MAGIC: [u8; 4] = *b"PADR";

/// Record layout: 4 magic bytes, 6 address bytes, 2 bytes padding so writes
/// stay word-aligned.
const RECORD_LEN: usize = 12;

/// The persisted address could not be read or written. Fatal at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct IdentityError;

/// Load the stored device address, generating and persisting a fresh one if
/// the record is missing or from another firmware.
pub fn load_or_generate(
    flash: &mut Flash<'_, FLASH, Blocking, FLASH_SIZE>,
) -> Result<DeviceAddress, IdentityError> {
    let mut record = [0u8; RECORD_LEN];
    flash
        .blocking_read(STORE_OFFSET, &mut record)
        .map_err(|_| IdentityError)?;

    if record[..4] == MAGIC {
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(&record[4..10]);
        return Ok(DeviceAddress::new(bytes));
    }

    let address = random_address();
    let mut fresh = [0u8; RECORD_LEN];
    fresh[..4].copy_from_slice(&MAGIC);
    fresh[4..10].copy_from_slice(address.as_bytes());
    flash
        .blocking_erase(STORE_OFFSET, STORE_OFFSET + ERASE_SIZE as u32)
        .map_err(|_| IdentityError)?;
    flash
        .blocking_write(STORE_OFFSET, &fresh)
        .map_err(|_| IdentityError)?;

    Ok(address)
}

/// Pull 48 bits out of the ring oscillator, one bit at a time.
fn random_address() -> DeviceAddress {
    let mut bytes = [0u8; 6];
    for byte in &mut bytes {
        for _ in 0..8 {
            let bit = embassy_rp::pac::ROSC.randombit().read().randombit();
            *byte = (*byte << 1) | u8::from(bit);
            // Let the oscillator drift between samples.
            cortex_m::asm::delay(64);
        }
    }
    DeviceAddress::new(bytes)
}
