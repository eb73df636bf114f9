use cp2130_hal::CP2130;
use cp2130_hal::gpio::{GpioPin, GpioValues, LogicLevel};
use cp2130_hal::spi::SpiMode;
use cp2130_hal::usb::UsbConfig;

use crate::Error;

/// The bridge-chip operations the ITUSB1 relies on.
///
/// [`CP2130`] is the real implementation. The trait exists so the fixture
/// sequencing can be driven against other implementations, such as a mock.
pub trait Bridge {
    /// Read the logic level of every GPIO pin.
    fn gpio_read(&self) -> Result<GpioValues, Error>;

    /// Set the output level of the pins selected by `mask`.
    fn gpio_write(&self, levels: GpioValues, mask: GpioValues) -> Result<(), Error>;

    /// Read the level of a single pin.
    fn gpio_get(&self, pin: GpioPin) -> Result<LogicLevel, Error> {
        self.gpio_read().map(|values| values.level(pin))
    }

    /// Set the output level of a single pin.
    fn gpio_set(&self, pin: GpioPin, level: LogicLevel) -> Result<(), Error> {
        self.gpio_write(
            GpioValues::none().with_level(pin, level),
            GpioValues::pins(&[pin]),
        )
    }

    /// Configure the SPI mode of a channel.
    fn spi_configure_mode(&self, channel: u8, mode: SpiMode) -> Result<(), Error>;

    /// Disable every SPI delay of a channel.
    fn spi_disable_delays(&self, channel: u8) -> Result<(), Error>;

    /// Enable the chip select of a channel and disable all others.
    fn cs_select(&self, channel: u8) -> Result<(), Error>;

    /// Disable the chip select of a channel.
    fn cs_disable(&self, channel: u8) -> Result<(), Error>;

    /// Read up to `length` bytes over SPI.
    fn spi_read(&self, length: u32) -> Result<Vec<u8>, Error>;

    /// Read the manufacturer string descriptor.
    fn manufacturer_descriptor(&self) -> Result<String, Error>;

    /// Read the product string descriptor.
    fn product_descriptor(&self) -> Result<String, Error>;

    /// Read the serial number string descriptor.
    fn serial_descriptor(&self) -> Result<String, Error>;

    /// Read the USB configuration.
    fn usb_config(&self) -> Result<UsbConfig, Error>;

    /// True if the bridge has reported that the device went away.
    fn disconnected(&self) -> bool;

    /// Reset the bridge chip, consuming the handle.
    fn reset(self) -> Result<(), Error>
    where
        Self: Sized;
}

impl Bridge for CP2130 {
    fn gpio_read(&self) -> Result<GpioValues, Error> {
        CP2130::gpio_read(self)
    }

    fn gpio_write(&self, levels: GpioValues, mask: GpioValues) -> Result<(), Error> {
        CP2130::gpio_write(self, levels, mask)
    }

    fn spi_configure_mode(&self, channel: u8, mode: SpiMode) -> Result<(), Error> {
        CP2130::spi_configure_mode(self, channel, mode)
    }

    fn spi_disable_delays(&self, channel: u8) -> Result<(), Error> {
        CP2130::spi_disable_delays(self, channel)
    }

    fn cs_select(&self, channel: u8) -> Result<(), Error> {
        CP2130::cs_select(self, channel)
    }

    fn cs_disable(&self, channel: u8) -> Result<(), Error> {
        CP2130::cs_disable(self, channel)
    }

    fn spi_read(&self, length: u32) -> Result<Vec<u8>, Error> {
        CP2130::spi_read(self, length)
    }

    fn manufacturer_descriptor(&self) -> Result<String, Error> {
        CP2130::manufacturer_descriptor(self)
    }

    fn product_descriptor(&self) -> Result<String, Error> {
        CP2130::product_descriptor(self)
    }

    fn serial_descriptor(&self) -> Result<String, Error> {
        CP2130::serial_descriptor(self)
    }

    fn usb_config(&self) -> Result<UsbConfig, Error> {
        CP2130::usb_config(self)
    }

    fn disconnected(&self) -> bool {
        CP2130::disconnected(self)
    }

    fn reset(self) -> Result<(), Error> {
        CP2130::reset(self)
    }
}
