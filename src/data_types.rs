//! Data types for the LDO rail bank: rail identities, their static wiring and per-rail result maps.

use crate::registers::{
    HIGH_RANGE_MAX_MV, HIGH_RANGE_MIN_MV, LOW_RANGE_MAX_MV, LOW_RANGE_MIN_MV, code_to_high_range_mv,
    code_to_low_range_mv, high_range_mv_to_code, low_range_mv_to_code,
};

/// The eight regulated rails of the board, in declared order.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Rail {
    VddCore,
    VddRram,
    VddSmacro,
    VdioCore,
    VddRmacro,
    VdioRmacro,
    VduhRmacro,
    VddIo,
}

impl Rail {
    /// All rails in declared order. Batch operations walk this order.
    pub const ALL: [Rail; 8] = [
        Rail::VddCore,
        Rail::VddRram,
        Rail::VddSmacro,
        Rail::VdioCore,
        Rail::VddRmacro,
        Rail::VdioRmacro,
        Rail::VduhRmacro,
        Rail::VddIo,
    ];

    /// Schematic net name of the rail.
    pub const fn name(self) -> &'static str {
        match self {
            Rail::VddCore => "VDD_CORE",
            Rail::VddRram => "VDD_RRAM",
            Rail::VddSmacro => "VDD_SMACRO",
            Rail::VdioCore => "VDIO_CORE",
            Rail::VddRmacro => "VDD_RMACRO",
            Rail::VdioRmacro => "VDIO_RMACRO",
            Rail::VduhRmacro => "VDUH_RMACRO",
            Rail::VddIo => "VDD_IO",
        }
    }

    /// Look a rail up by its net name (exact, case-sensitive).
    pub fn from_name(name: &str) -> Option<Rail> {
        Rail::ALL.into_iter().find(|rail| rail.name() == name)
    }

    /// Position in [`Rail::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Static wiring of this rail.
    pub const fn config(self) -> RailConfig {
        match self {
            Rail::VddCore => RailConfig::new(0x4, 0x28, VoltageRange::Low),
            Rail::VddRram => RailConfig::new(0x4, 0x2C, VoltageRange::Low),
            Rail::VddSmacro => RailConfig::new(0x2, 0x38, VoltageRange::Low),
            Rail::VdioCore => RailConfig::new(0x2, 0x3C, VoltageRange::Low),
            Rail::VddRmacro => RailConfig::new(0x1, 0x08, VoltageRange::Low),
            Rail::VdioRmacro => RailConfig::new(0x1, 0x0C, VoltageRange::High),
            Rail::VduhRmacro => RailConfig::new(0x0, 0x18, VoltageRange::High),
            Rail::VddIo => RailConfig::new(0x0, 0x1C, VoltageRange::High),
        }
    }
}

impl core::fmt::Display for Rail {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl core::str::FromStr for Rail {
    type Err = UnknownRailName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rail::from_name(s).ok_or(UnknownRailName)
    }
}

/// Returned when parsing a string that names no rail.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnknownRailName;

/// Regulator variant fitted on a rail; selects the voltage encoding.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VoltageRange {
    /// 0.5 V to 1.25 V, 25 mV per code.
    Low,
    /// 0.8 V to 3.3 V, 50 mV per code.
    High,
}

impl VoltageRange {
    pub const fn min_mv(self) -> u16 {
        match self {
            VoltageRange::Low => LOW_RANGE_MIN_MV,
            VoltageRange::High => HIGH_RANGE_MIN_MV,
        }
    }

    pub const fn max_mv(self) -> u16 {
        match self {
            VoltageRange::Low => LOW_RANGE_MAX_MV,
            VoltageRange::High => HIGH_RANGE_MAX_MV,
        }
    }

    pub const fn contains(self, mv: u16) -> bool {
        mv >= self.min_mv() && mv <= self.max_mv()
    }

    /// Encode millivolts into the select code. Returns `None` outside the range.
    pub fn encode(self, mv: u16) -> Option<u8> {
        if !self.contains(mv) {
            return None;
        }
        Some(match self {
            VoltageRange::Low => low_range_mv_to_code(mv),
            VoltageRange::High => high_range_mv_to_code(mv),
        })
    }

    /// Decode a select code into millivolts.
    pub fn decode(self, code: u8) -> u16 {
        match self {
            VoltageRange::Low => code_to_low_range_mv(code),
            VoltageRange::High => code_to_high_range_mv(code),
        }
    }
}

/// Wiring of one rail: where its expander sits and which regulator it drives.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RailConfig {
    /// Value written to the multiplexer output register to reach this rail's bank.
    pub selector: u8,
    /// 7-bit I2C address of the rail expander.
    pub address: u8,
    pub range: VoltageRange,
}

impl RailConfig {
    pub const fn new(selector: u8, address: u8, range: VoltageRange) -> Self {
        Self {
            selector,
            address,
            range,
        }
    }
}

/// One value per rail, indexed by [`Rail`] and iterated in declared order.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RailMap<T> {
    values: [T; 8],
}

impl<T> RailMap<T> {
    pub const fn from_array(values: [T; 8]) -> Self {
        Self { values }
    }

    pub fn get(&self, rail: Rail) -> &T {
        &self.values[rail.index()]
    }

    pub fn get_mut(&mut self, rail: Rail) -> &mut T {
        &mut self.values[rail.index()]
    }

    /// Lookup by net name.
    pub fn get_by_name(&self, name: &str) -> Option<&T> {
        Rail::from_name(name).map(|rail| self.get(rail))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Rail, &T)> {
        Rail::ALL.into_iter().zip(self.values.iter())
    }

    pub fn into_array(self) -> [T; 8] {
        self.values
    }
}

impl<T> core::ops::Index<Rail> for RailMap<T> {
    type Output = T;

    fn index(&self, rail: Rail) -> &T {
        self.get(rail)
    }
}

impl<T> core::ops::IndexMut<Rail> for RailMap<T> {
    fn index_mut(&mut self, rail: Rail) -> &mut T {
        self.get_mut(rail)
    }
}
