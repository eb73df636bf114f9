use cp2130_hal::gpio::GpioPin;

/// USB vendor ID of the ITUSB1 (Silicon Labs).
pub const ITUSB1_VID: u16 = 0x10C4;
/// USB product ID of the ITUSB1.
pub const ITUSB1_PID: u16 = 0x8C96;

/// SPI channel (and chip select) of the LTC2312 ADC.
pub(crate) const ADC_CHANNEL: u8 = 0;
/// Number of ADC samples averaged per current measurement.
pub(crate) const N_SAMPLES: u32 = 5;

/// !UPEN: VBUS enable, active low.
pub(crate) const POWER_ENABLE_PIN: GpioPin = GpioPin::Gpio1;
/// !UDEN: data line enable, active low.
pub(crate) const DATA_ENABLE_PIN: GpioPin = GpioPin::Gpio2;
/// !UDOC: overcurrent flag, active low.
pub(crate) const OVERCURRENT_PIN: GpioPin = GpioPin::Gpio3;

/// Settling time after each power or data line transition, in milliseconds.
pub(crate) const SWITCH_DELAY_MS: u32 = 100;
/// Wait before releasing the chip select after a measurement, in microseconds.
pub(crate) const CS_RELEASE_DELAY_US: u32 = 100;
/// Wait for the LTC2312 to wake from nap or sleep, in microseconds.
pub(crate) const ADC_WAKE_DELAY_US: u32 = 1100;
