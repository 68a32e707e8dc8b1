//! Rail manager: owns the address multiplexer and the rail bus, and drives all eight rails.

use embedded_hal::delay::DelayNs;

use crate::data_types::{Rail, RailMap};
use crate::error::Error;
use crate::ldo::Ldo;
use crate::mux::AddressMux;

/// The LDO bank of the board.
///
/// Every rail access is preceded by a multiplexer select for that rail. The manager holds no lock:
/// exclusive ownership (`&mut self`) is what serializes access, and callers must make sure nothing
/// else drives the same physical buses while it is in use.
///
/// Dropping the manager (or calling [`RailManager::release`]) hands the bus handles back and leaves
/// the regulators in whatever state they are in.
pub struct RailManager<I2C, D> {
    mux: AddressMux<I2C, D>,
    i2c: I2C,
}

impl<I2C, D> RailManager<I2C, D> {
    /// Take ownership of the multiplexer bus, the rail bus and a delay provider. No bus traffic;
    /// call [`RailManager::init`] before using the rails.
    pub fn new(mux_i2c: I2C, rail_i2c: I2C, delay: D) -> Self {
        Self::from_parts(AddressMux::new(mux_i2c, delay), rail_i2c)
    }

    /// Same as [`RailManager::new`] with a caller-built multiplexer (e.g. non-default address).
    pub fn from_parts(mux: AddressMux<I2C, D>, rail_i2c: I2C) -> Self {
        Self { mux, i2c: rail_i2c }
    }

    /// Selector value last driven onto the multiplexer.
    pub fn selected(&self) -> Option<u8> {
        self.mux.current()
    }

    /// Give back the multiplexer bus, the rail bus and the delay provider.
    ///
    /// Also the way back to the handles after a failed [`RailManager::init`].
    pub fn release(self) -> (I2C, I2C, D) {
        let (mux_i2c, delay) = self.mux.release();
        (mux_i2c, self.i2c, delay)
    }
}

impl<I2C, D> RailManager<I2C, D>
where
    I2C: embedded_hal::i2c::I2c,
    D: DelayNs,
{
    /// Bring the bank to its reset state: selector outputs low, then every rail disabled at its
    /// minimum voltage, in declared order.
    ///
    /// After an `Error::I2c` the bank state is unknown; calling `init` again starts over.
    pub fn init(&mut self) -> Result<(), Error<I2C::Error>> {
        self.mux.init()?;
        for rail in Rail::ALL {
            self.with_rail(rail, |ldo| ldo.init())?;
        }
        #[cfg(feature = "defmt")]
        defmt::info!("LDO bank initialized");
        Ok(())
    }

    pub fn enable_all(&mut self) -> Result<(), Error<I2C::Error>> {
        for rail in Rail::ALL {
            self.enable_rail(rail)?;
        }
        Ok(())
    }

    pub fn disable_all(&mut self) -> Result<(), Error<I2C::Error>> {
        for rail in Rail::ALL {
            self.disable_rail(rail)?;
        }
        Ok(())
    }

    /// Enable the named rails, in the order given. Names are all checked before the first write.
    pub fn enable(&mut self, names: &[&str]) -> Result<(), Error<I2C::Error>> {
        if !all_known(names) {
            return Err(Error::UnknownRail);
        }
        for rail in names.iter().filter_map(|name| Rail::from_name(name)) {
            self.enable_rail(rail)?;
        }
        Ok(())
    }

    /// Disable the named rails, in the order given. Names are all checked before the first write.
    pub fn disable(&mut self, names: &[&str]) -> Result<(), Error<I2C::Error>> {
        if !all_known(names) {
            return Err(Error::UnknownRail);
        }
        for rail in names.iter().filter_map(|name| Rail::from_name(name)) {
            self.disable_rail(rail)?;
        }
        Ok(())
    }

    pub fn enable_rail(&mut self, rail: Rail) -> Result<(), Error<I2C::Error>> {
        self.with_rail(rail, |ldo| ldo.enable())
    }

    pub fn disable_rail(&mut self, rail: Rail) -> Result<(), Error<I2C::Error>> {
        self.with_rail(rail, |ldo| ldo.disable())
    }

    /// Enable latch of every rail.
    pub fn enabled(&mut self) -> Result<RailMap<bool>, Error<I2C::Error>> {
        self.collect(|ldo| ldo.is_enabled())
    }

    /// Program several set-points given as `(net name, millivolts)`.
    ///
    /// Every entry is checked (known name, value inside that rail's range) before any write. Each
    /// rail is then disabled, reprogrammed and re-enabled only if it was enabled before.
    pub fn set_voltages(&mut self, settings: &[(&str, u16)]) -> Result<(), Error<I2C::Error>> {
        for (name, mv) in settings {
            let Some(rail) = Rail::from_name(name) else {
                return Err(Error::UnknownRail);
            };
            if !rail.config().range.contains(*mv) {
                return Err(Error::OutOfRange);
            }
        }
        for (name, mv) in settings {
            if let Some(rail) = Rail::from_name(name) {
                self.set_voltage(rail, *mv)?;
            }
        }
        Ok(())
    }

    /// Program one rail's set-point with the disable, set, restore sequence.
    pub fn set_voltage(&mut self, rail: Rail, mv: u16) -> Result<(), Error<I2C::Error>> {
        if !rail.config().range.contains(mv) {
            return Err(Error::OutOfRange);
        }
        self.with_rail(rail, |ldo| {
            let was_enabled = ldo.is_enabled()?;
            ldo.disable()?;
            ldo.set_voltage_mv(mv)?;
            if was_enabled {
                ldo.enable()?;
            }
            Ok(())
        })
    }

    /// Programmed set-point of every rail, in millivolts.
    pub fn voltages(&mut self) -> Result<RailMap<u16>, Error<I2C::Error>> {
        self.collect(|ldo| ldo.voltage_mv())
    }

    /// Power-good status of every rail.
    pub fn power_goods(&mut self) -> Result<RailMap<bool>, Error<I2C::Error>> {
        self.collect(|ldo| ldo.is_power_good())
    }

    fn with_rail<R>(
        &mut self,
        rail: Rail,
        f: impl FnOnce(&mut Ldo<&mut I2C>) -> Result<R, Error<I2C::Error>>,
    ) -> Result<R, Error<I2C::Error>> {
        self.mux.select(rail)?;
        let mut ldo = Ldo::new(&mut self.i2c, rail);
        f(&mut ldo)
    }

    fn collect<T: Default + Copy>(
        &mut self,
        mut f: impl FnMut(&mut Ldo<&mut I2C>) -> Result<T, Error<I2C::Error>>,
    ) -> Result<RailMap<T>, Error<I2C::Error>> {
        let mut out = RailMap::<T>::default();
        for rail in Rail::ALL {
            out[rail] = self.with_rail(rail, &mut f)?;
        }
        Ok(out)
    }
}

fn all_known(names: &[&str]) -> bool {
    names.iter().all(|name| Rail::from_name(name).is_some())
}
