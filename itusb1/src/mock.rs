//! Mock bridge and delay that record what the fixture asks of them.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use cp2130_hal::gpio::GpioValues;
use cp2130_hal::spi::SpiMode;
use cp2130_hal::usb::UsbConfig;
use embedded_hal::delay::DelayNs;

use crate::constants::{ITUSB1_PID, ITUSB1_VID};
use crate::{Bridge, Error, Itusb1};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    GpioRead,
    GpioWrite {
        levels: GpioValues,
        mask: GpioValues,
    },
    SpiMode(u8, SpiMode),
    SpiDelaysOff(u8),
    CsSelect(u8),
    CsDisable(u8),
    SpiRead(u32),
    Delay(Duration),
    Reset,
}

#[derive(Default)]
struct State {
    events: RefCell<Vec<Event>>,
    gpio: Cell<GpioValues>,
    samples: RefCell<VecDeque<Result<Vec<u8>, Error>>>,
    fail_gpio: Cell<bool>,
    unplugged: Cell<bool>,
}

impl State {
    fn log(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    fn gpio_failure(&self) -> Result<(), Error> {
        match self.fail_gpio.get() {
            true => Err(Error::ShortTransfer {
                expected: 2,
                actual: 0,
            }),
            false => Ok(()),
        }
    }
}

/// Test-side view of the shared mock state.
pub(crate) struct MockLog(Rc<State>);

impl MockLog {
    /// Everything except GPIO reads, which are too frequent to list in tests.
    pub(crate) fn actions(&self) -> Vec<Event> {
        self.0
            .events
            .borrow()
            .iter()
            .filter(|e| **e != Event::GpioRead)
            .cloned()
            .collect()
    }

    pub(crate) fn gpio_reads(&self) -> usize {
        self.0
            .events
            .borrow()
            .iter()
            .filter(|e| **e == Event::GpioRead)
            .count()
    }

    /// Queue the result of the next SPI read. Reads with nothing queued give
    /// two zero bytes.
    pub(crate) fn queue_sample(&self, sample: Result<Vec<u8>, Error>) {
        self.0.samples.borrow_mut().push_back(sample);
    }

    /// Make every GPIO request fail from now on.
    pub(crate) fn fail_gpio(&self) {
        self.0.fail_gpio.set(true);
    }

    pub(crate) fn unplug(&self) {
        self.0.unplugged.set(true);
    }
}

pub(crate) struct MockBridge(Rc<State>);

impl Bridge for MockBridge {
    fn gpio_read(&self) -> Result<GpioValues, Error> {
        self.0.log(Event::GpioRead);
        self.0.gpio_failure()?;
        Ok(self.0.gpio.get())
    }

    fn gpio_write(&self, levels: GpioValues, mask: GpioValues) -> Result<(), Error> {
        self.0.log(Event::GpioWrite { levels, mask });
        self.0.gpio_failure()?;
        self.0.gpio.set(self.0.gpio.get().apply(levels, mask));
        Ok(())
    }

    fn spi_configure_mode(&self, channel: u8, mode: SpiMode) -> Result<(), Error> {
        self.0.log(Event::SpiMode(channel, mode));
        Ok(())
    }

    fn spi_disable_delays(&self, channel: u8) -> Result<(), Error> {
        self.0.log(Event::SpiDelaysOff(channel));
        Ok(())
    }

    fn cs_select(&self, channel: u8) -> Result<(), Error> {
        self.0.log(Event::CsSelect(channel));
        Ok(())
    }

    fn cs_disable(&self, channel: u8) -> Result<(), Error> {
        self.0.log(Event::CsDisable(channel));
        Ok(())
    }

    fn spi_read(&self, length: u32) -> Result<Vec<u8>, Error> {
        self.0.log(Event::SpiRead(length));
        self.0
            .samples
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(vec![0; length as usize]))
    }

    fn manufacturer_descriptor(&self) -> Result<String, Error> {
        Ok("Bloguetronica".into())
    }

    fn product_descriptor(&self) -> Result<String, Error> {
        Ok("ITUSB1 USB Test Switch".into())
    }

    fn serial_descriptor(&self) -> Result<String, Error> {
        Ok("IT-0001".into())
    }

    fn usb_config(&self) -> Result<UsbConfig, Error> {
        Ok(UsbConfig {
            vid: ITUSB1_VID,
            pid: ITUSB1_PID,
            ..Default::default()
        })
    }

    fn disconnected(&self) -> bool {
        self.0.unplugged.get()
    }

    fn reset(self) -> Result<(), Error> {
        self.0.log(Event::Reset);
        Ok(())
    }
}

pub(crate) struct MockDelay(Rc<State>);

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.log(Event::Delay(Duration::from_nanos(ns.into())));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.log(Event::Delay(Duration::from_micros(us.into())));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.log(Event::Delay(Duration::from_millis(ms.into())));
    }
}

/// A fixture on a mock bridge whose GPIO pins start at `gpio`.
pub(crate) fn fixture(gpio: GpioValues) -> (Itusb1<MockBridge, MockDelay>, MockLog) {
    let state = Rc::new(State::default());
    state.gpio.set(gpio);
    let device = Itusb1::new(MockBridge(state.clone()), MockDelay(state.clone()));
    (device, MockLog(state))
}
