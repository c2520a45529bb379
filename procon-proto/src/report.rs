//! Input report encoding.
//!
//! Two report forms go out on the interrupt channel:
//!
//! **Full input report** (after pairing), 13 bytes:
//!
//! ```text
//! [0x30][frame][battery][group1][group2][group3][Lstick x3][Rstick x3][vibrator]
//! ```
//!
//! **Idle report** (before pairing), 2 bytes:
//!
//! ```text
//! [0x00][frame]
//! ```
//!
//! The idle form keeps the host's polling cadence alive without presenting
//! gameplay data. Each stick is packed into three bytes as a pair of 12-bit
//! little-endian values: the X value spans byte 0 and the low nibble of
//! byte 1, Y occupies the rest. With 8-bit source axes the X byte split is
//! `(x << 4, x >> 4)` and Y fills the third byte.
//!
//! Both encoders are pure: identical input always yields identical bytes.

use crate::types::ProconState;

/// Report ID of the full input report.
pub const INPUT_REPORT_ID: u8 = 0x30;

/// Report ID of the pre-pairing idle report.
pub const IDLE_REPORT_ID: u8 = 0x00;

/// Report ID carried by subcommand replies.
pub const SUBCOMMAND_REPLY_ID: u8 = 0x21;

/// Size of the full input report.
pub const INPUT_REPORT_LEN: usize = 13;

/// Size of the idle report.
pub const IDLE_REPORT_LEN: usize = 2;

/// Fixed battery/connection-info byte: battery full, wired-grade connection.
pub const BATTERY_STATUS: u8 = 0x80;

/// Fixed vibrator-status trailer byte.
const VIBRATOR_STATUS: u8 = 0x08;

/// Pack one stick's 8-bit axes into the 3-byte 12-bit wire layout.
#[inline]
#[must_use]
pub const fn pack_stick(x: u8, y: u8) -> [u8; 3] {
    [(x << 4) & 0xF0, (x & 0xF0) >> 4, y]
}

/// Encode a full 0x30 input report for the given state and frame counter.
#[must_use]
pub fn encode_input_report(state: &ProconState, frame: u8) -> [u8; INPUT_REPORT_LEN] {
    let left = pack_stick(state.left_stick.x, state.left_stick.y);
    let right = pack_stick(state.right_stick.x, state.right_stick.y);
    [
        INPUT_REPORT_ID,
        frame,
        BATTERY_STATUS,
        state.buttons.group1(),
        state.buttons.group2(),
        state.buttons.group3(),
        left[0],
        left[1],
        left[2],
        right[0],
        right[1],
        right[2],
        VIBRATOR_STATUS,
    ]
}

/// Encode the 2-byte idle report transmitted before pairing completes.
#[must_use]
pub const fn encode_idle_report(frame: u8) -> [u8; IDLE_REPORT_LEN] {
    [IDLE_REPORT_ID, frame]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Buttons;

    #[test]
    fn test_neutral_report_layout() {
        let report = encode_input_report(&ProconState::neutral(), 0x2A);
        assert_eq!(
            report,
            [
                0x30, 0x2A, 0x80, 0x00, 0x00, 0x00, // header + empty button groups
                0xF0, 0x07, 0x7F, // left stick centered
                0xF0, 0x07, 0x7F, // right stick centered
                0x08,
            ]
        );
    }

    #[test]
    fn test_button_groups_land_in_order() {
        let mut state = ProconState::neutral();
        state.buttons = Buttons::A | Buttons::PLUS | Buttons::DPAD_UP;
        let report = encode_input_report(&state, 0);
        assert_eq!(report[3], 0x08);
        assert_eq!(report[4], 0x02);
        assert_eq!(report[5], 0x02);
    }

    #[test]
    fn test_stick_nibble_packing() {
        // Asymmetric value so a swapped nibble order would be caught.
        assert_eq!(pack_stick(0xAB, 0xCD), [0xB0, 0x0A, 0xCD]);
        assert_eq!(pack_stick(127, 127), [0xF0, 0x07, 0x7F]);
    }

    #[test]
    fn test_encoder_is_deterministic() {
        let mut state = ProconState::neutral();
        state.buttons = Buttons::B | Buttons::ZL;
        assert_eq!(
            encode_input_report(&state, 17),
            encode_input_report(&state, 17)
        );
    }

    #[test]
    fn test_idle_report() {
        assert_eq!(encode_idle_report(0), [0x00, 0x00]);
        assert_eq!(encode_idle_report(254), [0x00, 254]);
    }
}
