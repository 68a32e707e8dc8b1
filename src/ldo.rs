//! Single-rail controller: enable, power-good and voltage set-point of one LDO through its expander.
//!
//! The controller does not select the rail on the multiplexer. When used on its own the caller must
//! have routed the bus to the rail's bank first; [`crate::manager::RailManager`] does this for every
//! access.

use crate::data_types::{Rail, RailConfig, VoltageRange};
use crate::error::Error;
use crate::expander::Expander;
use crate::registers::{LDO_INIT_CONFIG, LDO_INIT_OUTPUT, LdoPins, code_to_config, config_to_code};

/// Controller for one rail.
pub struct Ldo<I2C> {
    rail: Rail,
    range: VoltageRange,
    expander: Expander<I2C>,
}

impl<I2C> Ldo<I2C> {
    /// Create a controller for `rail` at its board address. No bus traffic.
    pub fn new(i2c: I2C, rail: Rail) -> Self {
        let RailConfig { address, range, .. } = rail.config();
        Self {
            rail,
            range,
            expander: Expander::new(i2c, address),
        }
    }

    pub fn rail(&self) -> Rail {
        self.rail
    }

    pub fn range(&self) -> VoltageRange {
        self.range
    }

    /// Give the bus handle back without touching the regulator.
    pub fn release(self) -> I2C {
        self.expander.release()
    }
}

impl<I2C> Ldo<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Output low, EN as the only output. Leaves the rail disabled at its minimum voltage code.
    pub fn init(&mut self) -> Result<(), Error<I2C::Error>> {
        self.expander.init(LDO_INIT_CONFIG, LDO_INIT_OUTPUT)
    }

    pub fn enable(&mut self) -> Result<(), Error<I2C::Error>> {
        // A power-good read may have left EN as input.
        self.drive_enable_pin()?;
        self.expander.write_output(LdoPins::EN.bits())?;
        #[cfg(feature = "defmt")]
        defmt::debug!("{}: enabled", self.rail);
        Ok(())
    }

    pub fn disable(&mut self) -> Result<(), Error<I2C::Error>> {
        self.drive_enable_pin()?;
        self.expander.write_output(0x00)?;
        #[cfg(feature = "defmt")]
        defmt::debug!("{}: disabled", self.rail);
        Ok(())
    }

    /// Read back the EN output latch. Pin directions are left untouched.
    pub fn is_enabled(&mut self) -> Result<bool, Error<I2C::Error>> {
        let out = LdoPins::from_bits_retain(self.expander.read_output()?);
        Ok(out.contains(LdoPins::EN))
    }

    /// Switch PGOOD to input and sample it.
    pub fn is_power_good(&mut self) -> Result<bool, Error<I2C::Error>> {
        let config = self.expander.read_config()?;
        self.expander.write_config(config | LdoPins::PGOOD.bits())?;
        let input = LdoPins::from_bits_retain(self.expander.read_input()?);
        Ok(input.contains(LdoPins::PGOOD))
    }

    /// Program the voltage set-point. The range is checked before any bus access.
    ///
    /// Writing while the regulator is enabled glitches the output; disable it first.
    pub fn set_voltage_mv(&mut self, mv: u16) -> Result<(), Error<I2C::Error>> {
        let Some(code) = self.range.encode(mv) else {
            return Err(Error::OutOfRange);
        };
        let config = self.expander.read_config()?;
        self.expander.write_config(code_to_config(config, code))?;
        #[cfg(feature = "defmt")]
        defmt::debug!("{}: {} mV -> code {}", self.rail, mv, code);
        Ok(())
    }

    /// Raw 6-bit voltage select code currently programmed.
    pub fn voltage_code(&mut self) -> Result<u8, Error<I2C::Error>> {
        Ok(config_to_code(self.expander.read_config()?))
    }

    /// Programmed set-point in millivolts.
    pub fn voltage_mv(&mut self) -> Result<u16, Error<I2C::Error>> {
        let code = self.voltage_code()?;
        Ok(self.range.decode(code))
    }

    fn drive_enable_pin(&mut self) -> Result<(), Error<I2C::Error>> {
        let config = self.expander.read_config()?;
        self.expander.write_config(config & !LdoPins::EN.bits())
    }
}
