//! Boot-time configuration.

use procon_core::ControllerType;

/// Which legacy pad is wired to the latch/clock/data header.
///
/// A boot-time value rather than a build variant: one firmware image covers
/// both pad types.
pub const CONTROLLER_TYPE: ControllerType = ControllerType::EightButton;
