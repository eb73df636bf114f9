//! USB configuration and string descriptors stored in the CP2130.

use crate::Error;

/// USB string descriptor type.
const STRING_DESCRIPTOR: u8 = 0x03;

/// Descriptor bytes held in each 64-byte chunk of a two-part string.
///
/// The last byte of each chunk is unused, which is what limits the
/// manufacturer and product strings to 62 characters.
const CHUNK_DESCRIPTOR_BYTES: usize = 63;

/// How the device is powered, as reported during enumeration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PowerMode {
    /// Bus-powered with the internal voltage regulator enabled.
    #[default]
    BusPoweredRegulatorOn,
    /// Bus-powered with the internal voltage regulator disabled.
    BusPoweredRegulatorOff,
    /// Self-powered.
    SelfPowered,
    /// A value not defined by AN792.
    Unknown(u8),
}

impl From<u8> for PowerMode {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::BusPoweredRegulatorOn,
            0x01 => Self::BusPoweredRegulatorOff,
            0x02 => Self::SelfPowered,
            other => Self::Unknown(other),
        }
    }
}

/// Which direction the CP2130 favours when both have pending bulk data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TransferPriority {
    /// High priority read.
    #[default]
    Read,
    /// High priority write.
    Write,
}

impl From<u8> for TransferPriority {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::Read,
            _ => Self::Write,
        }
    }
}

/// USB configuration of the CP2130.
///
/// ## AN792
///
/// See the Get_USB_Config request in section 6.21 for the buffer layout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UsbConfig {
    /// USB vendor ID.
    pub vid: u16,
    /// USB product ID.
    pub pid: u16,
    /// Maximum current requested from the host, in units of 2 mA.
    pub max_power: u8,
    /// Power mode.
    pub power_mode: PowerMode,
    /// Major component of the device release number.
    pub major_release: u8,
    /// Minor component of the device release number.
    pub minor_release: u8,
    /// Bulk transfer priority.
    pub transfer_priority: TransferPriority,
}

impl UsbConfig {
    pub(crate) fn from_buffer(buf: &[u8; 9]) -> Self {
        Self {
            vid: u16::from_le_bytes([buf[0], buf[1]]),
            pid: u16::from_le_bytes([buf[2], buf[3]]),
            max_power: buf[4],
            power_mode: buf[5].into(),
            major_release: buf[6],
            minor_release: buf[7],
            transfer_priority: buf[8].into(),
        }
    }

    /// Maximum current requested from the host, in milliamps.
    pub fn max_power_ma(&self) -> u16 {
        u16::from(self.max_power) * 2
    }
}

/// Decode a USB string descriptor into a `String`.
///
/// Byte 0 is the descriptor length (including the two header bytes) and byte 1
/// the descriptor type. The UTF-16LE payload follows. A length larger than the
/// buffer is clamped, since the CP2130 returns descriptors in fixed-size chunks.
pub(crate) fn decode_string_descriptor(buf: &[u8]) -> Result<String, Error> {
    if buf.len() < 2 {
        return Err(Error::InvalidDescriptor);
    }
    if buf[1] != STRING_DESCRIPTOR {
        return Err(Error::InvalidDescriptor);
    }
    let end = usize::from(buf[0]).clamp(2, buf.len());
    let utf16: Vec<u16> = buf[2..end]
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&utf16).map_err(|_| Error::InvalidDescriptor)
}

/// Join the two chunks of a manufacturer or product string into one descriptor.
///
/// ## AN792
///
/// See the Get_Manufacturing_String_1/2 and Get_Product_String_1/2 requests in
/// sections 6.23 to 6.29.
pub(crate) fn join_descriptor_chunks(
    first: &[u8; 64],
    second: &[u8; 64],
) -> [u8; 2 * CHUNK_DESCRIPTOR_BYTES] {
    let mut buf = [0u8; 2 * CHUNK_DESCRIPTOR_BYTES];
    buf[..CHUNK_DESCRIPTOR_BYTES].copy_from_slice(&first[..CHUNK_DESCRIPTOR_BYTES]);
    buf[CHUNK_DESCRIPTOR_BYTES..].copy_from_slice(&second[..CHUNK_DESCRIPTOR_BYTES]);
    buf
}
