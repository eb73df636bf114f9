use cp2130_hal::CP2130;
use cp2130_hal::gpio::{GpioPin, GpioValues, LogicLevel};
use cp2130_hal::spi::{ChipSelectMode, ClockFrequency, ClockPhase, ClockPolarity, SpiMode};
use cp2130_hal::usb::UsbConfig;
use embedded_hal::delay::DelayNs;
use log::debug;

use crate::bridge::Bridge;
use crate::constants::{
    ADC_CHANNEL, ADC_WAKE_DELAY_US, CS_RELEASE_DELAY_US, DATA_ENABLE_PIN, ITUSB1_PID,
    ITUSB1_VID, N_SAMPLES, OVERCURRENT_PIN, POWER_ENABLE_PIN, SWITCH_DELAY_MS,
};
use crate::current::{code_from_bytes, milliamps};
use crate::delay::StdDelay;
use crate::{Error, ErrorTally};

/// SPI mode of the LTC2312 channel: push-pull chip select, 1.5 MHz, mode 0.
const ADC_SPI_MODE: SpiMode = SpiMode {
    chip_select_mode: ChipSelectMode::PushPull,
    clock_frequency: ClockFrequency::F1_5MHz,
    clock_polarity: ClockPolarity::IdleLow,
    clock_phase: ClockPhase::LeadingEdge,
};

/// An ITUSB1 USB switch.
///
/// # Quick start
///
/// Open a fixture by serial number with [`Itusb1::open`] (use
/// [`Itusb1::list_devices`] to find the serial numbers), then call
/// [`Itusb1::setup`] once before measuring current.
///
/// # Errors
///
/// Apart from opening, operations record failures in the [`ErrorTally`] passed
/// to them instead of returning early. A failed status read counts as a low
/// GPIO level, and a failed ADC read counts as a zero sample.
///
/// # Lines
///
/// The power, data and overcurrent lines are all active-low on the bridge:
/// GPIO.1 is !UPEN (VBUS enable), GPIO.2 is !UDEN (data line enable) and
/// GPIO.3 is !UDOC (overcurrent). The status methods return the active-high
/// sense ("VBUS is on", "overcurrent detected").
#[derive(Debug)]
pub struct Itusb1<B = CP2130, D = StdDelay> {
    bridge: B,
    delay: D,
}

impl Itusb1 {
    /// Open the ITUSB1 with the given serial number.
    ///
    /// # Errors
    ///
    /// [`Error::DeviceNotFound`] if no such fixture is attached, or
    /// [`Error::DeviceBusy`] if it is in use.
    pub fn open(serial: &str) -> Result<Self, Error> {
        let bridge = CP2130::open(ITUSB1_VID, ITUSB1_PID, serial)?;
        Ok(Self::new(bridge, StdDelay))
    }

    /// Open the first ITUSB1 found.
    ///
    /// # Errors
    ///
    /// As for [`Itusb1::open`].
    pub fn open_first() -> Result<Self, Error> {
        let bridge = CP2130::open_first(ITUSB1_VID, ITUSB1_PID)?;
        Ok(Self::new(bridge, StdDelay))
    }

    /// Serial numbers of the attached ITUSB1 fixtures.
    pub fn list_devices(errors: &mut ErrorTally) -> Vec<String> {
        errors.check(CP2130::list_devices(ITUSB1_VID, ITUSB1_PID))
    }
}

impl<B: Bridge, D: DelayNs> Itusb1<B, D> {
    /// Wrap an already-open bridge.
    pub fn new(bridge: B, delay: D) -> Self {
        Self { bridge, delay }
    }

    /// Close the fixture, releasing the bridge.
    pub fn close(self) {
        drop(self);
    }

    /// True if the fixture has been unplugged since it was opened.
    pub fn disconnected(&self) -> bool {
        self.bridge.disconnected()
    }

    /// Reset the bridge chip, which resets the whole fixture.
    ///
    /// The fixture re-enumerates afterwards, so it must be opened again.
    pub fn reset(self, errors: &mut ErrorTally) {
        errors.check(self.bridge.reset());
    }

    /// Prepare the ADC channel for current measurement.
    ///
    /// This configures SPI channel 0 for the LTC2312 and takes one throwaway
    /// reading, which also wakes the ADC from nap or sleep mode.
    pub fn setup(&mut self, errors: &mut ErrorTally) {
        errors.check(self.bridge.spi_configure_mode(ADC_CHANNEL, ADC_SPI_MODE));
        errors.check(self.bridge.spi_disable_delays(ADC_CHANNEL));
        errors.check(self.bridge.cs_select(ADC_CHANNEL));
        self.raw_current(errors);
        // Give the ADC time to wake before the chip select is released.
        self.delay.delay_us(ADC_WAKE_DELAY_US);
        errors.check(self.bridge.cs_disable(ADC_CHANNEL));
    }

    /// Attach the device under test to the host under test.
    ///
    /// VBUS is switched on first and the data lines 100 ms later, as when a
    /// plug is inserted by hand. If VBUS and the data lines disagree, both are
    /// switched off first. Nothing changes if the DUT is already attached.
    pub fn attach(&mut self, errors: &mut ErrorTally) {
        if self.usb_power_status(errors) != self.usb_data_status(errors) {
            debug!("VBUS and data lines disagree, switching both off");
            self.switch_usb(false, errors);
            self.delay.delay_ms(SWITCH_DELAY_MS);
        }
        if !self.usb_power_status(errors) && !self.usb_data_status(errors) {
            debug!("Attaching DUT");
            self.switch_usb_power(true, errors);
            self.delay.delay_ms(SWITCH_DELAY_MS);
            self.switch_usb_data(true, errors);
            // Enough for enumeration to start, not to finish.
            self.delay.delay_ms(SWITCH_DELAY_MS);
        }
    }

    /// Detach the device under test from the host under test.
    ///
    /// The data lines are disconnected before VBUS is switched off. Lines that
    /// are already off are left alone.
    pub fn detach(&mut self, errors: &mut ErrorTally) {
        if self.usb_data_status(errors) {
            debug!("Disconnecting data lines");
            self.switch_usb_data(false, errors);
            self.delay.delay_ms(SWITCH_DELAY_MS);
        }
        if self.usb_power_status(errors) {
            debug!("Switching VBUS off");
            self.switch_usb_power(false, errors);
            self.delay.delay_ms(SWITCH_DELAY_MS);
        }
    }

    /// Measure the current drawn on VBUS, in milliamps.
    ///
    /// The first ADC reading is discarded since it holds the previous
    /// conversion. The following five are averaged.
    ///
    /// [`Itusb1::setup`] must have been called since the fixture was opened.
    pub fn current(&mut self, errors: &mut ErrorTally) -> f32 {
        errors.check(self.bridge.cs_select(ADC_CHANNEL));
        self.raw_current(errors);
        let code_sum: u32 = (0..N_SAMPLES)
            .map(|_| u32::from(self.raw_current(errors)))
            .sum();
        // Releasing the chip select straight after the last read can fail.
        self.delay.delay_us(CS_RELEASE_DELAY_US);
        errors.check(self.bridge.cs_disable(ADC_CHANNEL));
        milliamps(code_sum, N_SAMPLES)
    }

    /// True if the overcurrent flag is raised.
    pub fn overcurrent_status(&self, errors: &mut ErrorTally) -> bool {
        self.line_active(OVERCURRENT_PIN, errors)
    }

    /// True if VBUS is switched on.
    pub fn usb_power_status(&self, errors: &mut ErrorTally) -> bool {
        self.line_active(POWER_ENABLE_PIN, errors)
    }

    /// True if the data lines are connected.
    pub fn usb_data_status(&self, errors: &mut ErrorTally) -> bool {
        self.line_active(DATA_ENABLE_PIN, errors)
    }

    /// Switch VBUS and the data lines together, in a single bridge request.
    pub fn switch_usb(&self, on: bool, errors: &mut ErrorTally) {
        let levels = if on {
            GpioValues::none()
        } else {
            GpioValues::ALL
        };
        let mask = GpioValues::pins(&[POWER_ENABLE_PIN, DATA_ENABLE_PIN]);
        errors.check(self.bridge.gpio_write(levels, mask));
    }

    /// Switch VBUS on or off.
    pub fn switch_usb_power(&self, on: bool, errors: &mut ErrorTally) {
        self.set_line(POWER_ENABLE_PIN, on, errors);
    }

    /// Connect or disconnect the data lines.
    pub fn switch_usb_data(&self, on: bool, errors: &mut ErrorTally) {
        self.set_line(DATA_ENABLE_PIN, on, errors);
    }

    /// Manufacturer string descriptor of the fixture.
    pub fn manufacturer_descriptor(&self, errors: &mut ErrorTally) -> String {
        errors.check(self.bridge.manufacturer_descriptor())
    }

    /// Product string descriptor of the fixture.
    pub fn product_descriptor(&self, errors: &mut ErrorTally) -> String {
        errors.check(self.bridge.product_descriptor())
    }

    /// Serial number string descriptor of the fixture.
    pub fn serial_descriptor(&self, errors: &mut ErrorTally) -> String {
        errors.check(self.bridge.serial_descriptor())
    }

    /// USB configuration of the fixture's bridge chip.
    pub fn usb_config(&self, errors: &mut ErrorTally) -> UsbConfig {
        errors.check(self.bridge.usb_config())
    }

    /// Read one 12-bit code from the LTC2312. Failed or short reads give 0.
    fn raw_current(&self, errors: &mut ErrorTally) -> u16 {
        code_from_bytes(&errors.check(self.bridge.spi_read(2)))
    }

    /// True if an active-low line is asserted.
    fn line_active(&self, pin: GpioPin, errors: &mut ErrorTally) -> bool {
        !errors.check(self.bridge.gpio_get(pin).map(LogicLevel::is_high))
    }

    /// Assert or release an active-low line.
    fn set_line(&self, pin: GpioPin, active: bool, errors: &mut ErrorTally) {
        errors.check(self.bridge.gpio_set(pin, LogicLevel::from(!active)));
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;
    use crate::mock::{Event, fixture};

    const SWITCH_WAIT: Event = Event::Delay(Duration::from_millis(100));

    /// Every line off: all GPIO pins idle high.
    fn detached() -> GpioValues {
        GpioValues::ALL
    }

    fn attached() -> GpioValues {
        GpioValues::ALL
            .with_level(GpioPin::Gpio1, LogicLevel::Low)
            .with_level(GpioPin::Gpio2, LogicLevel::Low)
    }

    fn set(pin: GpioPin, level: LogicLevel) -> Event {
        Event::GpioWrite {
            levels: GpioValues::none().with_level(pin, level),
            mask: GpioValues::pins(&[pin]),
        }
    }

    #[test]
    fn attach_powers_up_before_connecting_data() {
        let (mut device, log) = fixture(detached());
        let mut errors = ErrorTally::new();
        device.attach(&mut errors);

        assert!(errors.is_empty());
        assert_eq!(
            log.actions(),
            [
                set(GpioPin::Gpio1, LogicLevel::Low),
                SWITCH_WAIT,
                set(GpioPin::Gpio2, LogicLevel::Low),
                SWITCH_WAIT,
            ]
        );
        assert!(device.usb_power_status(&mut errors));
        assert!(device.usb_data_status(&mut errors));
    }

    #[test]
    fn attach_when_attached_changes_nothing() {
        let (mut device, log) = fixture(attached());
        let mut errors = ErrorTally::new();
        device.attach(&mut errors);

        assert!(errors.is_empty());
        assert!(log.actions().is_empty());
        assert!(log.gpio_reads() > 0, "Line status was not checked.");
    }

    #[test]
    fn attach_resets_mismatched_lines_first() {
        // VBUS on, data lines disconnected.
        let initial = detached().with_level(GpioPin::Gpio1, LogicLevel::Low);
        let (mut device, log) = fixture(initial);
        let mut errors = ErrorTally::new();
        device.attach(&mut errors);

        assert!(errors.is_empty());
        assert_eq!(
            log.actions(),
            [
                Event::GpioWrite {
                    levels: GpioValues::ALL,
                    mask: GpioValues::pins(&[GpioPin::Gpio1, GpioPin::Gpio2]),
                },
                SWITCH_WAIT,
                set(GpioPin::Gpio1, LogicLevel::Low),
                SWITCH_WAIT,
                set(GpioPin::Gpio2, LogicLevel::Low),
                SWITCH_WAIT,
            ]
        );
    }

    #[test]
    fn detach_disconnects_data_before_power() {
        let (mut device, log) = fixture(attached());
        let mut errors = ErrorTally::new();
        device.detach(&mut errors);

        assert!(errors.is_empty());
        assert_eq!(
            log.actions(),
            [
                set(GpioPin::Gpio2, LogicLevel::High),
                SWITCH_WAIT,
                set(GpioPin::Gpio1, LogicLevel::High),
                SWITCH_WAIT,
            ]
        );
        assert!(!device.usb_power_status(&mut errors));
        assert!(!device.usb_data_status(&mut errors));
    }

    #[test]
    fn detach_when_detached_changes_nothing() {
        let (mut device, log) = fixture(detached());
        let mut errors = ErrorTally::new();
        device.detach(&mut errors);

        assert!(errors.is_empty());
        assert!(log.actions().is_empty());
    }

    #[test]
    fn detach_switches_off_lone_power() {
        let initial = detached().with_level(GpioPin::Gpio1, LogicLevel::Low);
        let (mut device, log) = fixture(initial);
        let mut errors = ErrorTally::new();
        device.detach(&mut errors);

        assert_eq!(
            log.actions(),
            [set(GpioPin::Gpio1, LogicLevel::High), SWITCH_WAIT]
        );
    }

    #[test]
    fn current_discards_first_sample_and_averages_five() {
        let (mut device, log) = fixture(detached());
        // Stale conversion, which must not count.
        log.queue_sample(Ok(vec![0xFF, 0xF0]));
        // Codes 400, 404, 396, 402, 398.
        for code in [400u16, 404, 396, 402, 398] {
            log.queue_sample(Ok((code << 4).to_be_bytes().to_vec()));
        }
        let mut errors = ErrorTally::new();
        let current = device.current(&mut errors);

        assert!(errors.is_empty());
        assert_eq!(current, 100.0);
        assert_eq!(
            log.actions(),
            [
                Event::CsSelect(0),
                Event::SpiRead(2),
                Event::SpiRead(2),
                Event::SpiRead(2),
                Event::SpiRead(2),
                Event::SpiRead(2),
                Event::SpiRead(2),
                Event::Delay(Duration::from_micros(100)),
                Event::CsDisable(0),
            ]
        );
    }

    #[test]
    fn current_of_full_scale_codes() {
        let (mut device, log) = fixture(detached());
        for _ in 0..6 {
            log.queue_sample(Ok(vec![0xFF, 0xF0]));
        }
        let mut errors = ErrorTally::new();
        assert_eq!(device.current(&mut errors), 1023.75);
    }

    #[test]
    fn failed_reads_count_as_zero() {
        let (mut device, log) = fixture(detached());
        log.queue_sample(Ok(vec![0x00, 0x10]));
        log.queue_sample(Ok(vec![0x19, 0x00])); // 400
        log.queue_sample(Err(Error::DeviceNotFound));
        log.queue_sample(Ok(vec![0x19])); // short read, no error
        log.queue_sample(Ok(vec![0x19, 0x00])); // 400
        log.queue_sample(Err(Error::DeviceNotFound));
        let mut errors = ErrorTally::new();
        let current = device.current(&mut errors);

        assert_eq!(current, 40.0);
        assert_eq!(errors.count(), 2);
        // The chip select is still released.
        assert_eq!(log.actions().last(), Some(&Event::CsDisable(0)));
    }

    #[test]
    fn setup_configures_and_wakes_the_adc() {
        let (mut device, log) = fixture(detached());
        let mut errors = ErrorTally::new();
        device.setup(&mut errors);

        assert!(errors.is_empty());
        assert_eq!(
            log.actions(),
            [
                Event::SpiMode(0, ADC_SPI_MODE),
                Event::SpiDelaysOff(0),
                Event::CsSelect(0),
                Event::SpiRead(2),
                Event::Delay(Duration::from_micros(1100)),
                Event::CsDisable(0),
            ]
        );
        assert_eq!(ADC_SPI_MODE.chip_select_mode, ChipSelectMode::PushPull);
        assert_eq!(ADC_SPI_MODE.clock_frequency, ClockFrequency::F1_5MHz);
    }

    #[test]
    fn overcurrent_is_active_low() {
        let (device, _log) = fixture(detached());
        let mut errors = ErrorTally::new();
        assert!(!device.overcurrent_status(&mut errors));

        let tripped = detached().with_level(GpioPin::Gpio3, LogicLevel::Low);
        let (device, _log) = fixture(tripped);
        assert!(device.overcurrent_status(&mut errors));
        assert!(errors.is_empty());
    }

    #[test]
    fn switch_usb_changes_both_lines_at_once() {
        let (device, log) = fixture(detached());
        let mut errors = ErrorTally::new();
        device.switch_usb(true, &mut errors);

        assert_eq!(
            log.actions(),
            [Event::GpioWrite {
                levels: GpioValues::none(),
                mask: GpioValues::pins(&[GpioPin::Gpio1, GpioPin::Gpio2]),
            }]
        );
        assert!(device.usb_power_status(&mut errors));
        assert!(device.usb_data_status(&mut errors));
    }

    #[test]
    fn gpio_failures_are_tallied_and_sequence_continues() {
        let (mut device, log) = fixture(detached());
        log.fail_gpio();
        let mut errors = ErrorTally::new();
        device.detach(&mut errors);

        // A failed read is a low level, so both active-low lines look asserted
        // and detach tries to switch both off.
        assert_eq!(errors.count(), 4);
        assert_eq!(log.actions().len(), 4);
    }

    #[test]
    fn descriptors_and_config_pass_through() {
        let (device, _log) = fixture(detached());
        let mut errors = ErrorTally::new();
        assert_eq!(device.manufacturer_descriptor(&mut errors), "Bloguetronica");
        assert_eq!(device.product_descriptor(&mut errors), "ITUSB1 USB Test Switch");
        assert_eq!(device.serial_descriptor(&mut errors), "IT-0001");
        let config = device.usb_config(&mut errors);
        assert_eq!((config.vid, config.pid), (ITUSB1_VID, ITUSB1_PID));
        assert!(errors.is_empty());
    }

    #[test]
    fn reset_consumes_the_device() {
        let (device, log) = fixture(detached());
        let mut errors = ErrorTally::new();
        device.reset(&mut errors);
        assert!(errors.is_empty());
        assert_eq!(log.actions(), [Event::Reset]);
    }

    #[test]
    fn disconnection_is_reported() {
        let (device, log) = fixture(detached());
        assert!(!device.disconnected());
        log.unplug();
        assert!(device.disconnected());
    }
}
