use std::cell::Cell;

use log::trace;
use rusb::{Context, DeviceHandle};

use crate::Error;
use crate::commands::Request;
use crate::constants::{INTERFACE, MAX_CHANNEL, TRANSFER_TIMEOUT};

mod gpio;
mod spi;
mod usb;

/// Driver for the CP2130.
///
/// # Quick start
///
/// Open a device with [`CP2130::open`] (by serial number) or
/// [`CP2130::open_first`]. Use [`CP2130::list_devices`] to find the serial
/// numbers of the attached devices with a given vendor and product ID.
///
/// The device interface is claimed while the driver exists and released when it
/// is dropped or [closed](CP2130::close).
///
/// All methods take a shared reference, as libusb handles the locking of the
/// underlying device handle.
#[derive(Debug)]
pub struct CP2130 {
    /// Underlying libusb device handle, with interface 0 claimed.
    inner: DeviceHandle<Context>,
    /// Set once a transfer fails because the device has gone away.
    ///
    /// A `Cell` keeps the methods on `&self`. The driver is `!Sync` anyway.
    disconnected: Cell<bool>,
}

impl CP2130 {
    fn new(inner: DeviceHandle<Context>) -> Self {
        Self {
            inner,
            disconnected: Cell::new(false),
        }
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Control transfers
    ////////////////////////////////////////////////////////////////////////////////

    /// Issue an IN control request and return its data stage.
    ///
    /// The data stage must be exactly the size the request calls for.
    fn control_in<const N: usize>(&self, request: Request) -> Result<[u8; N], Error> {
        debug_assert_eq!(N, request.data_length(), "Buffer size mismatch.");
        let mut buf = [0u8; N];
        let read = self
            .inner
            .read_control(
                request.request_type(),
                request.code(),
                0,
                0,
                &mut buf,
                TRANSFER_TIMEOUT,
            )
            .map_err(|e| self.note_error(e))?;
        trace!("{request:?} <- {:02X?}", &buf[..read]);
        if read != N {
            return Err(Error::ShortTransfer {
                expected: N,
                actual: read,
            });
        }
        Ok(buf)
    }

    /// Issue an OUT control request with the given data stage.
    fn control_out(&self, request: Request, data: &[u8]) -> Result<(), Error> {
        debug_assert_eq!(data.len(), request.data_length(), "Buffer size mismatch.");
        trace!("{request:?} -> {data:02X?}");
        let written = self
            .inner
            .write_control(
                request.request_type(),
                request.code(),
                0,
                0,
                data,
                TRANSFER_TIMEOUT,
            )
            .map_err(|e| self.note_error(e))?;
        if written != data.len() {
            return Err(Error::ShortTransfer {
                expected: data.len(),
                actual: written,
            });
        }
        Ok(())
    }

    /// Convert a libusb error, remembering if it means the device is gone.
    fn note_error(&self, e: rusb::Error) -> Error {
        let e = Error::from(e);
        if e.is_disconnect() {
            self.disconnected.set(true);
        }
        e
    }

    ////////////////////////////////////////////////////////////////////////////////
    // General device commands
    ////////////////////////////////////////////////////////////////////////////////

    /// Reset the CP2130.
    ///
    /// Resetting the chip causes it to disconnect and re-enumerate with the USB
    /// host, so the driver is consumed. Open the device again afterwards.
    ///
    /// # AN792
    ///
    /// See section 6.1 for the underlying Reset_Device request.
    pub fn reset(self) -> Result<(), Error> {
        match self.control_out(Request::ResetDevice, &[]) {
            // The device may drop off the bus before acknowledging.
            Err(e) if e.is_disconnect() => Ok(()),
            other => other,
        }
    }

    /// Release the device interface and close the handle.
    ///
    /// This is what dropping the driver does; it exists to make the intent
    /// explicit at call sites.
    pub fn close(self) {
        drop(self);
    }

    /// True if a transfer has failed because the device was disconnected.
    pub fn disconnected(&self) -> bool {
        self.disconnected.get()
    }
}

impl Drop for CP2130 {
    fn drop(&mut self) {
        if let Err(e) = self.inner.release_interface(INTERFACE) {
            trace!("Could not release interface {INTERFACE}: {e}");
        }
    }
}

/// Reject channel numbers the CP2130 does not have.
fn check_channel(channel: u8) -> Result<(), Error> {
    if channel > MAX_CHANNEL {
        Err(Error::InvalidChannel(channel))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn channel_range() {
        assert!(check_channel(0).is_ok());
        assert!(check_channel(10).is_ok());
        assert!(matches!(check_channel(11), Err(Error::InvalidChannel(11))));
    }
}
