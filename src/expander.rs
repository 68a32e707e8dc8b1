//! Register access for one 8-bit GPIO-expander port (TCA6416/PCA9557 style register layout).

use crate::error::Error;
use crate::registers::addr;

/// One GPIO-expander device on a bus.
///
/// The struct owns (or borrows, via `&mut I2C`) the bus handle. Dropping it releases
/// the handle and leaves the pins as they are.
pub struct Expander<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> Expander<I2C> {
    /// Wrap the expander at `address`. No bus traffic.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Return the 7-bit I2C address of this expander.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the bus handle back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Expander<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Program initial output levels, then pin directions. Pins turning into outputs start at
    /// `initial_output`.
    ///
    /// This is the reverse of the board's stock expander bring-up, which sets directions first and
    /// lets new outputs drive stale latch contents until the output write lands.
    pub fn init(&mut self, direction_mask: u8, initial_output: u8) -> Result<(), Error<I2C::Error>> {
        self.write_reg(addr::OUTPUT, initial_output)?;
        self.write_reg(addr::CONFIG, direction_mask)?;
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "expander 0x{:02x}: config=0x{:02x} output=0x{:02x}",
            self.address,
            direction_mask,
            initial_output
        );
        Ok(())
    }

    /// Write a single register.
    pub fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("expander 0x{:02x}: write reg {} = 0x{:02x}", self.address, reg, value);
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(Error::I2c)
    }

    /// Read a single register.
    pub fn read_reg(&mut self, reg: u8) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(Error::I2c)?;
        Ok(buf[0])
    }

    /// Update masked bits in a register (read-modify-write).
    pub fn update_reg(&mut self, reg: u8, mask: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        let cur = self.read_reg(reg)?;
        let new = (cur & !mask) | (value & mask);
        self.write_reg(reg, new)
    }

    /// Actual pin levels, regardless of direction.
    pub fn read_input(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_reg(addr::INPUT)
    }

    /// Output flip-flop contents (not the pin level).
    pub fn read_output(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_reg(addr::OUTPUT)
    }

    pub fn write_output(&mut self, value: u8) -> Result<(), Error<I2C::Error>> {
        self.write_reg(addr::OUTPUT, value)
    }

    pub fn read_polarity(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_reg(addr::POLARITY)
    }

    pub fn write_polarity(&mut self, value: u8) -> Result<(), Error<I2C::Error>> {
        self.write_reg(addr::POLARITY, value)
    }

    /// Pin directions; a set bit is an input.
    pub fn read_config(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_reg(addr::CONFIG)
    }

    pub fn write_config(&mut self, value: u8) -> Result<(), Error<I2C::Error>> {
        self.write_reg(addr::CONFIG, value)
    }
}
