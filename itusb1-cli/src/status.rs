use itusb1::{ErrorTally, Itusb1};

#[allow(dead_code)]
#[derive(Debug)]
pub(crate) struct FixtureStatus {
    pub(crate) vbus_on: bool,
    pub(crate) data_connected: bool,
    pub(crate) overcurrent: bool,
    pub(crate) current_ma: Option<f32>,
}

impl FixtureStatus {
    /// Read the line status, and the current if `measure` is set.
    ///
    /// Measuring requires [`Itusb1::setup`] to have been called.
    fn read(device: &mut Itusb1, measure: bool, errors: &mut ErrorTally) -> Self {
        Self {
            vbus_on: device.usb_power_status(errors),
            data_connected: device.usb_data_status(errors),
            overcurrent: device.overcurrent_status(errors),
            current_ma: measure.then(|| device.current(errors)),
        }
    }
}

pub(crate) fn attach(device: &mut Itusb1, errors: &mut ErrorTally) {
    device.attach(errors);
    println!("{:#?}", FixtureStatus::read(device, false, errors));
}

pub(crate) fn detach(device: &mut Itusb1, errors: &mut ErrorTally) {
    device.detach(errors);
    println!("{:#?}", FixtureStatus::read(device, false, errors));
}

pub(crate) fn print_status(device: &mut Itusb1, errors: &mut ErrorTally) {
    device.setup(errors);
    println!("{:#?}", FixtureStatus::read(device, true, errors));
}

pub(crate) fn current(device: &mut Itusb1, count: u32, errors: &mut ErrorTally) {
    device.setup(errors);
    for _ in 0..count {
        println!("{:.2} mA", device.current(errors));
    }
}
