#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(unsafe_code)]

mod bridge;
mod constants;
mod current;
mod delay;
mod device;
mod error;
#[cfg(test)]
mod mock;

pub use bridge::Bridge;
pub use constants::{ITUSB1_PID, ITUSB1_VID};
pub use delay::StdDelay;
pub use device::Itusb1;
pub use error::ErrorTally;

/// Re-export of the bridge driver, for its configuration and error types.
pub use cp2130_hal;
pub use cp2130_hal::Error;
