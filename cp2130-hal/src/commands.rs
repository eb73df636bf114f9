use rusb::{Direction, Recipient, RequestType};

/// Vendor-specific control requests understood by the CP2130.
///
/// See section 6 of AN792 for the full list. Only those used by this driver
/// are present.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Request {
    /// Reset the device. It disconnects from the bus and re-enumerates.
    ResetDevice,
    /// Read the logic level of all GPIO pins.
    GetGpioValues,
    /// Set the output level of the GPIO pins selected by a mask.
    SetGpioValues,
    /// Enable or disable the chip select of one channel.
    SetGpioChipSelect,
    /// Read the SPI control word of every channel.
    GetSpiWord,
    /// Write the SPI control word of one channel.
    SetSpiWord,
    /// Write the SPI delay settings of one channel.
    SetSpiDelay,
    /// Read the USB configuration (VID, PID, power and release version).
    GetUsbConfig,
    /// First half of the manufacturer string descriptor.
    GetManufacturingString1,
    /// Second half of the manufacturer string descriptor.
    GetManufacturingString2,
    /// First half of the product string descriptor.
    GetProductString1,
    /// Second half of the product string descriptor.
    GetProductString2,
    /// Serial number string descriptor.
    GetSerialString,
}

impl Request {
    /// The `bRequest` value of the control transfer.
    pub(crate) fn code(self) -> u8 {
        match self {
            Request::ResetDevice => 0x10,
            Request::GetGpioValues => 0x20,
            Request::SetGpioValues => 0x21,
            Request::SetGpioChipSelect => 0x25,
            Request::GetSpiWord => 0x30,
            Request::SetSpiWord => 0x31,
            Request::SetSpiDelay => 0x33,
            Request::GetUsbConfig => 0x60,
            Request::GetManufacturingString1 => 0x62,
            Request::GetManufacturingString2 => 0x64,
            Request::GetProductString1 => 0x66,
            Request::GetProductString2 => 0x68,
            Request::GetSerialString => 0x6A,
        }
    }

    /// Size of the data stage, in bytes.
    ///
    /// For IN requests this is the size of the buffer the device returns.
    pub(crate) fn data_length(self) -> usize {
        match self {
            Request::ResetDevice => 0,
            Request::GetGpioValues => 2,
            Request::SetGpioValues => 4,
            Request::SetGpioChipSelect => 2,
            Request::GetSpiWord => 11,
            Request::SetSpiWord => 2,
            Request::SetSpiDelay => 8,
            Request::GetUsbConfig => 9,
            Request::GetManufacturingString1
            | Request::GetManufacturingString2
            | Request::GetProductString1
            | Request::GetProductString2
            | Request::GetSerialString => 64,
        }
    }

    fn direction(self) -> Direction {
        match self {
            Request::ResetDevice
            | Request::SetGpioValues
            | Request::SetGpioChipSelect
            | Request::SetSpiWord
            | Request::SetSpiDelay => Direction::Out,
            _ => Direction::In,
        }
    }

    /// The `bmRequestType` value: vendor request to the device, `0xC0` or `0x40`.
    pub(crate) fn request_type(self) -> u8 {
        rusb::request_type(self.direction(), RequestType::Vendor, Recipient::Device)
    }
}

/// Commands carried in the 8-byte header of a bulk OUT transfer.
#[derive(Debug, Clone, Copy)]
pub(crate) enum BulkCommand {
    Read,
}

impl BulkCommand {
    /// Build the command header for a transfer of `length` bytes.
    ///
    /// Bytes 0 and 1 are reserved, byte 2 is the command, byte 3 is reserved and
    /// bytes 4..8 are the transfer length, little-endian. See section 5 of AN792.
    pub(crate) fn header(self, length: u32) -> [u8; 8] {
        let command = match self {
            BulkCommand::Read => 0x00,
        };
        let [l0, l1, l2, l3] = length.to_le_bytes();
        [0x00, 0x00, command, 0x00, l0, l1, l2, l3]
    }
}
