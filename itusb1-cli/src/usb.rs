use itusb1::cp2130_hal::usb::{PowerMode, TransferPriority};
use itusb1::{ErrorTally, Itusb1};

#[allow(dead_code)]
#[derive(Debug)]
pub(crate) struct FixtureInfo {
    pub(crate) manufacturer: String,
    pub(crate) product: String,
    pub(crate) serial_number: String,
    pub(crate) vendor_id: String,
    pub(crate) product_id: String,
    pub(crate) max_power: String,
    pub(crate) power_mode: PowerMode,
    pub(crate) release: String,
    pub(crate) transfer_priority: TransferPriority,
}

impl FixtureInfo {
    fn read(device: &Itusb1, errors: &mut ErrorTally) -> Self {
        let config = device.usb_config(errors);
        Self {
            manufacturer: device.manufacturer_descriptor(errors),
            product: device.product_descriptor(errors),
            serial_number: device.serial_descriptor(errors),
            vendor_id: format!("{:#06X}", config.vid),
            product_id: format!("{:#06X}", config.pid),
            max_power: format!("{} mA", config.max_power_ma()),
            power_mode: config.power_mode,
            release: format!("{}.{}", config.major_release, config.minor_release),
            transfer_priority: config.transfer_priority,
        }
    }
}

pub(crate) fn print_info(device: &Itusb1, errors: &mut ErrorTally) {
    println!("{:#?}", FixtureInfo::read(device, errors));
}

pub(crate) fn list(errors: &mut ErrorTally) {
    for serial in Itusb1::list_devices(errors) {
        println!("{serial}");
    }
}
