//! SPI channel configuration.
//!
//! Each of the eleven chip-select channels has its own SPI control word (clock
//! rate, polarity, phase and chip-select pin mode) and its own set of delays.

use bit_field::BitField;

/// SPI clock frequency.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ClockFrequency {
    /// 12 MHz
    #[default]
    F12MHz,
    /// 6 MHz
    F6MHz,
    /// 3 MHz
    F3MHz,
    /// 1.5 MHz
    F1_5MHz,
    /// 750 kHz
    F750kHz,
    /// 375 kHz
    F375kHz,
    /// 187.5 kHz
    F187_5kHz,
    /// 93.75 kHz
    F93_75kHz,
}

impl From<ClockFrequency> for u8 {
    fn from(value: ClockFrequency) -> Self {
        match value {
            ClockFrequency::F12MHz => 0,
            ClockFrequency::F6MHz => 1,
            ClockFrequency::F3MHz => 2,
            ClockFrequency::F1_5MHz => 3,
            ClockFrequency::F750kHz => 4,
            ClockFrequency::F375kHz => 5,
            ClockFrequency::F187_5kHz => 6,
            ClockFrequency::F93_75kHz => 7,
        }
    }
}

impl From<u8> for ClockFrequency {
    fn from(value: u8) -> Self {
        assert!(value <= 0b111, "Incorrect use of the from constructor.");
        match value {
            0 => Self::F12MHz,
            1 => Self::F6MHz,
            2 => Self::F3MHz,
            3 => Self::F1_5MHz,
            4 => Self::F750kHz,
            5 => Self::F375kHz,
            6 => Self::F187_5kHz,
            7 => Self::F93_75kHz,
            _ => unreachable!(),
        }
    }
}

/// Output mode of the chip-select pin.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChipSelectMode {
    /// Open-drain output.
    #[default]
    OpenDrain,
    /// Push-pull output.
    PushPull,
}

/// SPI clock idle level (CPOL).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ClockPolarity {
    /// Clock idles low, active high (CPOL = 0).
    #[default]
    IdleLow,
    /// Clock idles high, active low (CPOL = 1).
    IdleHigh,
}

/// SPI clock edge on which data is sampled (CPHA).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ClockPhase {
    /// Data is valid on the leading edge (CPHA = 0).
    #[default]
    LeadingEdge,
    /// Data is valid on the trailing edge (CPHA = 1).
    TrailingEdge,
}

/// SPI control word for one channel.
///
/// ## AN792
///
/// See the Set_SPI_Word request in section 6.11 for the bit layout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SpiMode {
    /// Chip-select pin output mode.
    pub chip_select_mode: ChipSelectMode,
    /// SPI clock rate.
    pub clock_frequency: ClockFrequency,
    /// Clock polarity.
    pub clock_polarity: ClockPolarity,
    /// Clock phase.
    pub clock_phase: ClockPhase,
}

impl SpiMode {
    pub(crate) fn to_word(self) -> u8 {
        let mut word = 0u8;
        word.set_bits(0..3, self.clock_frequency.into());
        word.set_bit(3, self.chip_select_mode == ChipSelectMode::PushPull);
        word.set_bit(4, self.clock_polarity == ClockPolarity::IdleHigh);
        word.set_bit(5, self.clock_phase == ClockPhase::TrailingEdge);
        word
    }

    pub(crate) fn from_word(word: u8) -> Self {
        Self {
            clock_frequency: word.get_bits(0..3).into(),
            chip_select_mode: match word.get_bit(3) {
                true => ChipSelectMode::PushPull,
                false => ChipSelectMode::OpenDrain,
            },
            clock_polarity: match word.get_bit(4) {
                true => ClockPolarity::IdleHigh,
                false => ClockPolarity::IdleLow,
            },
            clock_phase: match word.get_bit(5) {
                true => ClockPhase::TrailingEdge,
                false => ClockPhase::LeadingEdge,
            },
        }
    }
}

/// Chip-select and inter-byte delays for one channel.
///
/// Each delay is in units of 10 µs and is disabled when `None`.
///
/// ## AN792
///
/// See the Set_SPI_Delay request in section 6.13.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SpiDelays {
    /// Toggle chip select between bytes.
    pub cs_toggle: bool,
    /// Delay before chip select is de-asserted at the end of a transfer.
    pub pre_deassert: Option<u16>,
    /// Delay after chip select is asserted before the first byte.
    pub post_assert: Option<u16>,
    /// Delay between bytes.
    pub inter_byte: Option<u16>,
}

impl SpiDelays {
    /// Every delay disabled.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Build the Set_SPI_Delay data stage for `channel`.
    pub(crate) fn to_buffer(self, channel: u8) -> [u8; 8] {
        let mut mask = 0u8;
        mask.set_bit(0, self.inter_byte.is_some());
        mask.set_bit(1, self.post_assert.is_some());
        mask.set_bit(2, self.pre_deassert.is_some());
        mask.set_bit(3, self.cs_toggle);
        let [ib_high, ib_low] = self.inter_byte.unwrap_or(0).to_be_bytes();
        let [pa_high, pa_low] = self.post_assert.unwrap_or(0).to_be_bytes();
        let [pd_high, pd_low] = self.pre_deassert.unwrap_or(0).to_be_bytes();
        [
            channel, mask, ib_high, ib_low, pa_high, pa_low, pd_high, pd_low,
        ]
    }
}
