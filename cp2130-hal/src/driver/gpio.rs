use super::{CP2130, check_channel};
use crate::Error;
use crate::commands::Request;
use crate::gpio::{GpioPin, GpioValues, LogicLevel};

/// Control byte of Set_GPIO_Chip_Select.
#[derive(Debug, Clone, Copy)]
enum ChipSelectControl {
    Disable = 0x00,
    Enable = 0x01,
    EnableExclusive = 0x02,
}

impl ChipSelectControl {
    /// Data stage of Set_GPIO_Chip_Select: the channel then the control byte.
    fn to_buffer(self, channel: u8) -> [u8; 2] {
        [channel, self as u8]
    }
}

impl CP2130 {
    /// Read the logic level of every GPIO pin.
    ///
    /// # AN792
    ///
    /// See section 6.5 for the underlying Get_GPIO_Values request.
    pub fn gpio_read(&self) -> Result<GpioValues, Error> {
        let buf = self.control_in::<2>(Request::GetGpioValues)?;
        Ok(GpioValues::from_buffer(buf))
    }

    /// Set the output level of the pins selected by `mask`.
    ///
    /// Only pins configured as outputs are affected by the change.
    ///
    /// # AN792
    ///
    /// See section 6.6 for the underlying Set_GPIO_Values request.
    pub fn gpio_write(&self, levels: GpioValues, mask: GpioValues) -> Result<(), Error> {
        self.control_out(
            Request::SetGpioValues,
            &GpioValues::write_buffer(levels, mask),
        )
    }

    /// Read the logic level of a single pin.
    pub fn gpio_get(&self, pin: GpioPin) -> Result<LogicLevel, Error> {
        self.gpio_read().map(|values| values.level(pin))
    }

    /// Set the output level of a single pin.
    pub fn gpio_set(&self, pin: GpioPin, level: LogicLevel) -> Result<(), Error> {
        self.gpio_write(
            GpioValues::none().with_level(pin, level),
            GpioValues::pins(&[pin]),
        )
    }

    /// Enable the chip select of `channel` and disable all others.
    ///
    /// # AN792
    ///
    /// See section 6.8 for the underlying Set_GPIO_Chip_Select request.
    pub fn cs_select(&self, channel: u8) -> Result<(), Error> {
        self.set_chip_select(channel, ChipSelectControl::EnableExclusive)
    }

    /// Enable the chip select of `channel`, leaving the others as they are.
    pub fn cs_enable(&self, channel: u8) -> Result<(), Error> {
        self.set_chip_select(channel, ChipSelectControl::Enable)
    }

    /// Disable the chip select of `channel`.
    pub fn cs_disable(&self, channel: u8) -> Result<(), Error> {
        self.set_chip_select(channel, ChipSelectControl::Disable)
    }

    fn set_chip_select(&self, channel: u8, control: ChipSelectControl) -> Result<(), Error> {
        check_channel(channel)?;
        self.control_out(Request::SetGpioChipSelect, &control.to_buffer(channel))
    }
}
