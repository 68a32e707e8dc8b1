//! Error definitions for the LDO rail driver.

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug)]
pub enum Error<I2cError> {
    /// Underlying I2C transaction failed. Bus and expander state are unknown afterwards.
    I2c(I2cError),
    /// Rail name does not match any rail of the board.
    UnknownRail,
    /// Requested voltage is outside the rail's regulator range.
    OutOfRange,
}

impl<I2cError> Error<I2cError> {
    /// True for errors caused by caller input rather than by the bus.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::UnknownRail | Error::OutOfRange)
    }
}

impl<I2cError: core::fmt::Debug> core::fmt::Display for Error<I2cError> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "I2C error: {:?}", e),
            Error::UnknownRail => write!(f, "unknown rail name"),
            Error::OutOfRange => write!(f, "voltage out of range for rail"),
        }
    }
}
