//! GPIO pin identifiers and the pin-level bitmap used by the CP2130.

use bit_field::BitField;

/// GPIO pin level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicLevel {
    /// Pin is high (logic 1).
    High,
    /// Pin is low (logic 0).
    Low,
}

impl LogicLevel {
    /// True if the level is high.
    pub fn is_high(self) -> bool {
        matches!(self, LogicLevel::High)
    }

    /// True if the level is low.
    pub fn is_low(self) -> bool {
        matches!(self, LogicLevel::Low)
    }
}

impl From<bool> for LogicLevel {
    fn from(value: bool) -> Self {
        if value { Self::High } else { Self::Low }
    }
}

impl From<LogicLevel> for bool {
    fn from(value: LogicLevel) -> Self {
        value.is_high()
    }
}

/// One of the eleven CP2130 GPIO pins.
///
/// GPIO.0 through GPIO.10 double as the chip selects of SPI channels 0 to 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum GpioPin {
    Gpio0,
    Gpio1,
    Gpio2,
    Gpio3,
    Gpio4,
    Gpio5,
    Gpio6,
    Gpio7,
    Gpio8,
    Gpio9,
    Gpio10,
}

impl GpioPin {
    /// Every pin, in order.
    pub const ALL: [GpioPin; 11] = [
        GpioPin::Gpio0,
        GpioPin::Gpio1,
        GpioPin::Gpio2,
        GpioPin::Gpio3,
        GpioPin::Gpio4,
        GpioPin::Gpio5,
        GpioPin::Gpio6,
        GpioPin::Gpio7,
        GpioPin::Gpio8,
        GpioPin::Gpio9,
        GpioPin::Gpio10,
    ];

    /// Position of the pin in the 16-bit GPIO bitmap.
    ///
    /// Bit 9 is unused, so the pins are not contiguous. See the Get_GPIO_Values
    /// request in section 6.5 of AN792.
    fn bit(self) -> usize {
        match self {
            GpioPin::Gpio0 => 3,
            GpioPin::Gpio1 => 4,
            GpioPin::Gpio2 => 5,
            GpioPin::Gpio3 => 6,
            GpioPin::Gpio4 => 7,
            GpioPin::Gpio5 => 8,
            GpioPin::Gpio6 => 10,
            GpioPin::Gpio7 => 11,
            GpioPin::Gpio8 => 12,
            GpioPin::Gpio9 => 13,
            GpioPin::Gpio10 => 14,
        }
    }
}

/// Levels of the GPIO pins, as a bitmap.
///
/// The same type serves as the mask of a Set_GPIO_Values request, where a set
/// bit means the corresponding pin is to be changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GpioValues(u16);

impl GpioValues {
    /// Bitmap with every GPIO pin set.
    pub const ALL: GpioValues = GpioValues(0x7DF8);

    /// Bitmap with no pins set.
    pub const fn none() -> Self {
        Self(0)
    }

    /// Wrap a raw bitmap. Bits that do not correspond to a pin are discarded.
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// The raw bitmap.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Bitmap with only the given pins set.
    pub fn pins(pins: &[GpioPin]) -> Self {
        pins.iter()
            .fold(Self::none(), |values, &pin| values.with_level(pin, LogicLevel::High))
    }

    /// Level of a single pin.
    pub fn level(self, pin: GpioPin) -> LogicLevel {
        self.0.get_bit(pin.bit()).into()
    }

    /// Copy of the bitmap with the level of one pin changed.
    pub fn with_level(mut self, pin: GpioPin, level: LogicLevel) -> Self {
        self.0.set_bit(pin.bit(), level.into());
        self
    }

    /// Apply a Set_GPIO_Values request to these levels, as the device would.
    ///
    /// Pins selected by `mask` take their level from `levels`; all others are
    /// left unchanged.
    pub fn apply(self, levels: GpioValues, mask: GpioValues) -> Self {
        Self((self.0 & !mask.0) | (levels.0 & mask.0))
    }

    pub(crate) fn from_buffer(buf: [u8; 2]) -> Self {
        Self::from_bits(u16::from_be_bytes(buf))
    }

    pub(crate) fn to_buffer(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Data stage of Set_GPIO_Values: the levels then the mask, both big-endian.
    pub(crate) fn write_buffer(levels: Self, mask: Self) -> [u8; 4] {
        let [l_high, l_low] = levels.to_buffer();
        let [m_high, m_low] = mask.to_buffer();
        [l_high, l_low, m_high, m_low]
    }
}
