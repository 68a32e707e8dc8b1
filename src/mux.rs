//! Address multiplexer: a GPIO expander whose outputs route the rail bus to one bank of rail expanders.

use embedded_hal::delay::DelayNs;

use crate::board::I2C_PMOD_GPIO_EXPANDER;
use crate::data_types::Rail;
use crate::error::Error;
use crate::expander::Expander;
use crate::registers::MUX_SETTLE_MS;

/// Multiplexer driver.
///
/// `current` mirrors the last selector value read from or written to the device. The output
/// register is still read on every select, since other bus owners may have changed it.
pub struct AddressMux<I2C, D> {
    expander: Expander<I2C>,
    delay: D,
    current: Option<u8>,
}

impl<I2C, D> AddressMux<I2C, D> {
    /// Create a multiplexer driver at the board's PMOD expander address (0x21).
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_address(i2c, I2C_PMOD_GPIO_EXPANDER, delay)
    }

    /// Create a multiplexer driver with a custom I2C address.
    pub fn with_address(i2c: I2C, address: u8, delay: D) -> Self {
        Self {
            expander: Expander::new(i2c, address),
            delay,
            current: None,
        }
    }

    pub fn address(&self) -> u8 {
        self.expander.address()
    }

    /// Last selector value seen on the device, if any.
    pub fn current(&self) -> Option<u8> {
        self.current
    }

    /// Give back the bus handle and the delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.expander.release(), self.delay)
    }
}

impl<I2C, D> AddressMux<I2C, D>
where
    I2C: embedded_hal::i2c::I2c,
    D: DelayNs,
{
    /// All pins outputs, all outputs low.
    pub fn init(&mut self) -> Result<(), Error<I2C::Error>> {
        self.expander.init(0x00, 0x00)?;
        self.current = Some(0x00);
        Ok(())
    }

    /// Route the bus to `rail`'s bank and wait for it to settle.
    pub fn select(&mut self, rail: Rail) -> Result<(), Error<I2C::Error>> {
        self.select_code(rail.config().selector)
    }

    /// Drive `code` onto the selector outputs unless they already hold it, then wait
    /// [`MUX_SETTLE_MS`].
    pub fn select_code(&mut self, code: u8) -> Result<(), Error<I2C::Error>> {
        let cur = self.expander.read_output()?;
        if cur != code {
            self.expander.write_output(code)?;
            #[cfg(feature = "defmt")]
            defmt::debug!("mux: selector 0x{:02x} -> 0x{:02x}", cur, code);
        }
        self.current = Some(code);
        self.delay.delay_ms(MUX_SETTLE_MS);
        Ok(())
    }
}
