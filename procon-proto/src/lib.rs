//! Switch Pro Controller wire format for the shift-register pad bridge.
//!
//! This crate captures everything byte-exact about the emulated controller's
//! Bluetooth HID surface, with no platform dependencies:
//!
//! - [`types`]: Core data structures ([`ProconState`], [`Buttons`],
//!   [`StickPosition`], [`DeviceAddress`])
//! - [`report`]: Input-report encoding ([`encode_input_report`],
//!   [`encode_idle_report`])
//! - [`subcommand`]: Handshake envelope classification and the canned reply
//!   table ([`Subcommand`], [`ReplyTable`])
//! - [`descriptor`]: HID registration constants
//!
//! # Reports
//!
//! After the handshake completes, the device streams 13-byte `0x30` input
//! reports; before that it sends a 2-byte idle placeholder so the host keeps
//! polling:
//!
//! ```text
//! [0x30][frame][battery][buttons x3][stick_L x3][stick_R x3][vibrator]
//! [0x00][frame]
//! ```
//!
//! # Handshake
//!
//! The host drives identification through 49-byte subcommand envelopes; each
//! recognized discriminator is answered with a fixed reply captured from real
//! hardware. See [`subcommand`] for the envelope layout.
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod descriptor;
pub mod report;
pub mod subcommand;
pub mod types;

// Re-export main types at crate root
pub use report::{
    encode_idle_report, encode_input_report, pack_stick, BATTERY_STATUS, IDLE_REPORT_ID,
    IDLE_REPORT_LEN, INPUT_REPORT_ID, INPUT_REPORT_LEN, SUBCOMMAND_REPLY_ID,
};
pub use subcommand::{ReplyTable, Subcommand, INBOUND_ENVELOPE_LEN, SUBCOMMAND_OFFSET};
pub use types::{Buttons, DeviceAddress, ProconState, StickPosition};
