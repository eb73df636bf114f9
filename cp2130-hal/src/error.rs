/// Wrapper for problems when communicating with the CP2130.
#[derive(Debug)]
pub enum Error {
    /// No attached device matched the requested vendor ID, product ID and serial.
    DeviceNotFound,
    /// The device was found but its interface is claimed by another process or driver.
    DeviceBusy,
    /// A control transfer moved fewer bytes than the request requires.
    ShortTransfer {
        /// Number of bytes the request layout calls for.
        expected: usize,
        /// Number of bytes actually transferred.
        actual: usize,
    },
    /// A chip-select or SPI channel outside of `0..=10` was given.
    InvalidChannel(u8),
    /// A string descriptor read from the device was malformed.
    ///
    /// Either the descriptor type byte was not `0x03` or the payload was not
    /// valid UTF-16.
    InvalidDescriptor,
    /// An error reported by libusb.
    Usb(rusb::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DeviceNotFound => write!(f, "could not find device"),
            Error::DeviceBusy => write!(f, "device is currently unavailable"),
            Error::ShortTransfer { expected, actual } => {
                write!(f, "transferred {actual} of {expected} bytes")
            }
            Error::InvalidChannel(channel) => write!(f, "invalid channel {channel}"),
            Error::InvalidDescriptor => write!(f, "malformed string descriptor"),
            Error::Usb(e) => write!(f, "USB transfer failed: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Usb(e) => Some(e),
            _ => None,
        }
    }
}

#[doc(hidden)]
impl From<rusb::Error> for Error {
    fn from(value: rusb::Error) -> Self {
        Self::Usb(value)
    }
}

impl Error {
    /// True if the underlying USB device has gone away.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Error::Usb(rusb::Error::NoDevice))
    }
}
