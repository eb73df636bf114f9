use log::{debug, trace};
use rusb::{Context, DeviceHandle, UsbContext};

use super::CP2130;
use crate::Error;
use crate::commands::Request;
use crate::constants::INTERFACE;
use crate::usb::{UsbConfig, decode_string_descriptor, join_descriptor_chunks};

/// # USB device functionality
impl CP2130 {
    /// Open the device with the given vendor ID, product ID and serial number.
    ///
    /// # Errors
    ///
    /// [`Error::DeviceNotFound`] if no attached device matches, and
    /// [`Error::DeviceBusy`] if the device interface could not be claimed (for
    /// instance because another program has it open).
    pub fn open(vendor_id: u16, product_id: u16, serial: &str) -> Result<Self, Error> {
        let handle = matching_devices(vendor_id, product_id)?
            .find_map(|(handle, s)| (s == serial).then_some(handle))
            .ok_or(Error::DeviceNotFound)?;
        debug!("Opened {vendor_id:04X}:{product_id:04X} with serial {serial}");
        Self::claim(handle)
    }

    /// Open the first device found with the given vendor and product ID.
    ///
    /// # Errors
    ///
    /// As for [`CP2130::open`].
    pub fn open_first(vendor_id: u16, product_id: u16) -> Result<Self, Error> {
        let (handle, serial) = matching_devices(vendor_id, product_id)?
            .next()
            .ok_or(Error::DeviceNotFound)?;
        debug!("Opened {vendor_id:04X}:{product_id:04X} with serial {serial}");
        Self::claim(handle)
    }

    /// List the serial numbers of the attached devices with the given vendor and
    /// product ID.
    ///
    /// Devices that cannot be opened (for lack of permissions, say) are skipped.
    pub fn list_devices(vendor_id: u16, product_id: u16) -> Result<Vec<String>, Error> {
        Ok(matching_devices(vendor_id, product_id)?
            .map(|(_, serial)| serial)
            .collect())
    }

    fn claim(handle: DeviceHandle<Context>) -> Result<Self, Error> {
        match handle.set_auto_detach_kernel_driver(true) {
            Ok(()) | Err(rusb::Error::NotSupported) => {}
            Err(e) => return Err(e.into()),
        }
        match handle.claim_interface(INTERFACE) {
            Ok(()) => Ok(Self::new(handle)),
            Err(rusb::Error::Busy | rusb::Error::Access) => Err(Error::DeviceBusy),
            Err(e) => Err(e.into()),
        }
    }

    /// Read the USB configuration of the device.
    ///
    /// # AN792
    ///
    /// See section 6.21 for the underlying Get_USB_Config request.
    pub fn usb_config(&self) -> Result<UsbConfig, Error> {
        let buf = self.control_in::<9>(Request::GetUsbConfig)?;
        Ok(UsbConfig::from_buffer(&buf))
    }

    /// Read the manufacturer string descriptor.
    ///
    /// The descriptor is read in two 64-byte chunks that each carry 63 bytes
    /// of it, allowing up to 62 UTF-16 characters.
    pub fn manufacturer_descriptor(&self) -> Result<String, Error> {
        self.two_part_descriptor(
            Request::GetManufacturingString1,
            Request::GetManufacturingString2,
        )
    }

    /// Read the product string descriptor.
    ///
    /// The descriptor is read in two 64-byte chunks that each carry 63 bytes
    /// of it, allowing up to 62 UTF-16 characters.
    pub fn product_descriptor(&self) -> Result<String, Error> {
        self.two_part_descriptor(Request::GetProductString1, Request::GetProductString2)
    }

    /// Read the serial number string descriptor (at most 30 characters).
    pub fn serial_descriptor(&self) -> Result<String, Error> {
        let buf = self.control_in::<64>(Request::GetSerialString)?;
        decode_string_descriptor(&buf)
    }

    fn two_part_descriptor(&self, first: Request, second: Request) -> Result<String, Error> {
        let first = self.control_in::<64>(first)?;
        let second = self.control_in::<64>(second)?;
        decode_string_descriptor(&join_descriptor_chunks(&first, &second))
    }
}

/// Open every attached device with the given IDs, paired with its serial number.
///
/// Devices are opened lazily as the iterator advances, and closed again when
/// their handle is dropped.
fn matching_devices(
    vendor_id: u16,
    product_id: u16,
) -> Result<impl Iterator<Item = (DeviceHandle<Context>, String)>, Error> {
    let context = Context::new()?;
    let devices: Vec<_> = context.devices()?.iter().collect();
    Ok(devices.into_iter().filter_map(move |device| {
        let descriptor = device.device_descriptor().ok()?;
        if descriptor.vendor_id() != vendor_id || descriptor.product_id() != product_id {
            return None;
        }
        let handle = match device.open() {
            Ok(handle) => handle,
            Err(e) => {
                trace!(
                    "Skipping device on bus {} address {}: {e}",
                    device.bus_number(),
                    device.address()
                );
                return None;
            }
        };
        let serial = handle.read_serial_number_string_ascii(&descriptor).ok()?;
        Some((handle, serial))
    }))
}
