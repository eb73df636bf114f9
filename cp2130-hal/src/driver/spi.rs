use log::trace;

use super::{CP2130, check_channel};
use crate::Error;
use crate::commands::{BulkCommand, Request};
use crate::constants::{BULK_IN, BULK_OUT, TRANSFER_TIMEOUT};
use crate::spi::{SpiDelays, SpiMode};

impl CP2130 {
    /// Read the SPI mode of `channel`.
    ///
    /// # AN792
    ///
    /// See section 6.10 for the underlying Get_SPI_Word request, which returns
    /// the control word of all eleven channels at once.
    pub fn spi_read_mode(&self, channel: u8) -> Result<SpiMode, Error> {
        check_channel(channel)?;
        let words = self.control_in::<11>(Request::GetSpiWord)?;
        Ok(SpiMode::from_word(words[usize::from(channel)]))
    }

    /// Configure the SPI mode of `channel`.
    ///
    /// # AN792
    ///
    /// See section 6.11 for the underlying Set_SPI_Word request.
    pub fn spi_configure_mode(&self, channel: u8, mode: SpiMode) -> Result<(), Error> {
        check_channel(channel)?;
        self.control_out(Request::SetSpiWord, &[channel, mode.to_word()])
    }

    /// Configure the chip-select and inter-byte delays of `channel`.
    ///
    /// # AN792
    ///
    /// See section 6.13 for the underlying Set_SPI_Delay request.
    pub fn spi_configure_delays(&self, channel: u8, delays: SpiDelays) -> Result<(), Error> {
        check_channel(channel)?;
        self.control_out(Request::SetSpiDelay, &delays.to_buffer(channel))
    }

    /// Disable every SPI delay of `channel`.
    pub fn spi_disable_delays(&self, channel: u8) -> Result<(), Error> {
        self.spi_configure_delays(channel, SpiDelays::disabled())
    }

    /// Read `length` bytes from the SPI bus, using the currently selected
    /// chip select.
    ///
    /// The returned data may be shorter than requested if the bulk transfer
    /// came back short. That is not treated as an error.
    ///
    /// # AN792
    ///
    /// See section 5.1 for the Read command sent over the bulk OUT endpoint.
    pub fn spi_read(&self, length: u32) -> Result<Vec<u8>, Error> {
        let header = BulkCommand::Read.header(length);
        self.inner
            .write_bulk(BULK_OUT, &header, TRANSFER_TIMEOUT)
            .map_err(|e| self.note_error(e))?;

        let mut buf = vec![0u8; length as usize];
        let read = self
            .inner
            .read_bulk(BULK_IN, &mut buf, TRANSFER_TIMEOUT)
            .map_err(|e| self.note_error(e))?;
        buf.truncate(read);
        trace!("SPI read {length} <- {buf:02X?}");
        Ok(buf)
    }
}
