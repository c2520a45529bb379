//! Platform-agnostic core of the shift-register pad to Pro Controller bridge.
//!
//! This crate contains everything between the GPIO lines and the Bluetooth
//! HID transport, written against narrow traits so it runs unchanged on any
//! Embassy-capable chip and under host tests:
//!
//! - [`sampler`]: bit-bangs the legacy pad's latch/clock/data lines
//!   ([`ShiftPad`])
//! - [`mapper`]: raw bitmask to controller state, including the synthetic
//!   Home/Minus/quick-menu combos ([`map_sample`], [`ControllerType`])
//! - [`shared`]: the lock-guarded state record between sampler and scheduler
//!   ([`SharedPadState`])
//! - [`pairing`]: the host-driven subcommand handshake ([`PairingSession`])
//! - [`scheduler`]: periodic report transmission ([`ReportScheduler`])
//! - [`lifecycle`]: connect/disconnect handling ([`ConnectionManager`])
//! - [`indicator`]: the status LED heartbeat ([`StatusIndicator`])
//! - [`transport`]: traits the platform Bluetooth stack implements
//!   ([`HidTransport`], [`HostControl`])
//!
//! # Task model
//!
//! Three long-lived loops ([`ShiftPad::run`], [`ReportScheduler::run`],
//! [`StatusIndicator::run`]) are spawned by the firmware; the pairing state
//! machine runs inside the transport's inbound-data context. All delays are
//! yielding, and cross-task state is limited to [`SharedPadState`], the
//! paired flag and the connected flag, each checked rather than interrupted
//! for cancellation.
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`** / **`log`**: Select a logging backend (mutually exclusive)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod indicator;
pub mod lifecycle;
pub mod mapper;
pub mod pairing;
pub mod sampler;
pub mod scheduler;
pub mod shared;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types at crate root
pub use indicator::{StatusIndicator, BLINK_PATTERN};
pub use lifecycle::{ConnectionManager, ConnectionState, LinkStatus};
pub use mapper::{map_sample, ControllerType, RawSample};
pub use pairing::PairingSession;
pub use sampler::{LineError, ShiftPad, CLOCK_HALF_PERIOD_MS, LATCH_SETTLE_MS};
pub use scheduler::{ReportScheduler, FULL_REPORT_INTERVAL_MS, IDLE_REPORT_INTERVAL_MS};
pub use shared::SharedPadState;
pub use transport::{HidTransport, HostControl, LinkEvent, TransportError, INTERRUPT_CHANNEL};

// Wire-format types, re-exported for convenience
pub use procon_proto::{
    Buttons, DeviceAddress, ProconState, ReplyTable, StickPosition, Subcommand,
};
