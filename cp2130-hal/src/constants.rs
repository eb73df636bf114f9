use std::time::Duration;

/// Silicon Labs USB vendor ID.
pub const SILABS_VID: u16 = 0x10C4;
/// Default product ID of an unprogrammed CP2130.
pub const CP2130_PID: u16 = 0x87A0;

/// Timeout applied to every control and bulk transfer.
pub(crate) const TRANSFER_TIMEOUT: Duration = Duration::from_millis(500);

/// The CP2130 exposes a single vendor-specific interface.
pub(crate) const INTERFACE: u8 = 0;
/// Bulk OUT endpoint carrying SPI command headers (and write data).
pub(crate) const BULK_OUT: u8 = 0x01;
/// Bulk IN endpoint returning SPI read data.
pub(crate) const BULK_IN: u8 = 0x82;

/// Highest chip-select channel (GPIO.10).
pub(crate) const MAX_CHANNEL: u8 = 10;
