//! Shift-register pad to Switch Pro Controller bridge for RP2040.
//!
//! The firmware samples a legacy NES/SNES-style pad over its three-wire
//! shift-register interface and presents the buttons to a host as a Pro
//! Controller over Bluetooth HID.
//!
//! # Hardware Configuration
//!
//! | Function  | GPIO | Description                       |
//! |-----------|------|-----------------------------------|
//! | Pad latch | 13   | Latch pulse output                |
//! | Pad clock | 14   | Shift clock output                |
//! | Pad data  | 15   | Serial data input (active low)    |
//! | LED       | 25   | Connection status indicator       |
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with four concurrent tasks:
//!
//! - **Sampler Task**: bit-bangs the pad and publishes the mapped state
//! - **Dispatch Task**: consumes stack events; runs the pairing handshake
//!   and the connection lifecycle manager
//! - **Report Task**: streams input reports while a host is connected
//! - **Indicator Task**: blinks the LED until a host connects
//!
//! The Bluetooth HID stack itself (radio, SDP, L2CAP) is platform glue that
//! attaches through the queues in [`hostlink`]; see that module for the
//! integration contract.
//!
//! # Modules
//!
//! - [`config`]: board wiring and pad type
//! - [`hostlink`]: the Bluetooth stack seam ([`hostlink::BtHidLink`])
//! - [`identity`]: the persisted device address
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent reset)
//!
//! # Re-exports
//!
//! This crate re-exports the public items of [`procon_core`] for convenience,
//! so the binary only needs to depend on this crate.

#![no_std]

// Ensure mutually exclusive panic handler features
#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features");

// Re-export core types for convenience
pub use procon_core::{
    map_sample, Buttons, ConnectionManager, ConnectionState, ControllerType, DeviceAddress,
    HidTransport, HostControl, LineError, LinkEvent, LinkStatus, PairingSession, ProconState,
    RawSample, ReplyTable, ReportScheduler, SharedPadState, ShiftPad, StatusIndicator,
    StickPosition, Subcommand, TransportError,
};

pub mod config;
pub mod hostlink;
pub mod identity;
