//! Register map, pin assignments and voltage conversions for the LDO rail expanders.
//! Both the rail expanders and the address multiplexer use the same register layout.

/// Register addresses (port 0 of the expander).
pub mod addr {
    /// Incoming pin levels, read-only.
    pub const INPUT: u8 = 0x00;
    /// Output flip-flops for pins configured as outputs.
    pub const OUTPUT: u8 = 0x02;
    /// Polarity inversion for pins configured as inputs.
    pub const POLARITY: u8 = 0x04;
    /// Pin direction (1 = input / high impedance, 0 = output).
    pub const CONFIG: u8 = 0x06;
}

/// Low-range regulators (core rails).
pub const LOW_RANGE_MIN_MV: u16 = 500;
pub const LOW_RANGE_MAX_MV: u16 = 1_250;
/// Encode step in tenths of a millivolt (12.5 mV).
pub const LOW_RANGE_STEP_DMV: u32 = 125;
/// Decode resolution per code.
pub const LOW_RANGE_LSB_MV: u16 = 25;

/// High-range regulators (I/O rails).
pub const HIGH_RANGE_MIN_MV: u16 = 800;
pub const HIGH_RANGE_MAX_MV: u16 = 3_300;
/// Encode step in tenths of a millivolt (25 mV).
pub const HIGH_RANGE_STEP_DMV: u32 = 250;
pub const HIGH_RANGE_LSB_MV: u16 = 50;

/// Multiplexer settle time after the selector output changes.
pub const MUX_SETTLE_MS: u32 = 10;

/// Direction mask applied to a rail expander at init: only EN is an output.
pub const LDO_INIT_CONFIG: u8 = !LdoPins::EN.bits();
/// Output register value applied to a rail expander at init.
pub const LDO_INIT_OUTPUT: u8 = 0x00;

bitflags::bitflags! {
    /// Pin assignment of a rail expander.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct LdoPins: u8 {
        /// Bit 7: regulator power-good output, read as an input.
        const PGOOD = 1 << 7;
        /// Bit 6: regulator enable, driven as an output.
        const EN    = 1 << 6;
        /// Bits 5-0: voltage select, encoded active-low through the direction register.
        const VSEL  = 0b0011_1111;
    }
}

/// Encode a low-range voltage into the 6-bit select code. Clamps to the regulator limits.
pub fn low_range_mv_to_code(mv: u16) -> u8 {
    let mv = mv.clamp(LOW_RANGE_MIN_MV, LOW_RANGE_MAX_MV);
    let offset_dmv = u32::from(mv - LOW_RANGE_MIN_MV) * 10;
    // Chip resolution is twice the step; halving after the ceiling absorbs step-boundary noise.
    (offset_dmv.div_ceil(LOW_RANGE_STEP_DMV) >> 1) as u8 & LdoPins::VSEL.bits()
}

/// Encode a high-range voltage into the 6-bit select code. Clamps to the regulator limits.
pub fn high_range_mv_to_code(mv: u16) -> u8 {
    let mv = mv.clamp(HIGH_RANGE_MIN_MV, HIGH_RANGE_MAX_MV);
    let offset_dmv = u32::from(mv - HIGH_RANGE_MIN_MV) * 10;
    (offset_dmv.div_ceil(HIGH_RANGE_STEP_DMV) >> 1) as u8 & LdoPins::VSEL.bits()
}

pub fn code_to_low_range_mv(code: u8) -> u16 {
    LOW_RANGE_MIN_MV + u16::from(code & LdoPins::VSEL.bits()) * LOW_RANGE_LSB_MV
}

pub fn code_to_high_range_mv(code: u8) -> u16 {
    HIGH_RANGE_MIN_MV + u16::from(code & LdoPins::VSEL.bits()) * HIGH_RANGE_LSB_MV
}

/// Build the configuration register value carrying `code`, keeping the two upper pin directions.
pub fn code_to_config(current_config: u8, code: u8) -> u8 {
    let upper = current_config & !LdoPins::VSEL.bits();
    (upper | (code & LdoPins::VSEL.bits())) ^ LdoPins::VSEL.bits()
}

/// Extract the select code from a configuration register value.
pub fn config_to_code(config: u8) -> u8 {
    (config & LdoPins::VSEL.bits()) ^ LdoPins::VSEL.bits()
}
