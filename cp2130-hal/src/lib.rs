#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(unsafe_code)]

mod commands;
mod constants;
mod driver;
mod error;
pub mod gpio;
pub mod spi;
pub mod usb;

pub use constants::{CP2130_PID, SILABS_VID};
pub use driver::CP2130;
pub use error::Error;
