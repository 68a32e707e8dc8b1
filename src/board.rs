//! Hard-wired I2C topology of the ZC706 board and the LDO bank attached to it.

/// Linux device nodes of the channels behind the on-board PCA9548 switch.
pub mod port {
    pub const I2C_ADAPTER: &str = "/dev/i2c-0";
    pub const SI570: &str = "/dev/i2c-1";
    pub const HDMI: &str = "/dev/i2c-2";
    pub const EEPROM: &str = "/dev/i2c-3";
    pub const PORT_EXPANDER: &str = "/dev/i2c-4";
    pub const RTC: &str = "/dev/i2c-5";
    pub const FMC_HPC: &str = "/dev/i2c-6";
    pub const FMC_LPC: &str = "/dev/i2c-7";
    pub const PMBUS: &str = "/dev/i2c-8";
}

/// PCA9548 channel enables. A set bit connects the channel; several may be set at once.
pub mod mux_mask {
    pub const SI570: u8 = 0b0000_0001;
    pub const HDMI: u8 = 0b0000_0010;
    pub const EEPROM: u8 = 0b0000_0100;
    pub const PORT_EXPANDER: u8 = 0b0000_1000;
    pub const RTC: u8 = 0b0001_0000;
    pub const FMC_HPC: u8 = 0b0010_0000;
    pub const FMC_LPC: u8 = 0b0100_0000;
    pub const PMBUS: u8 = 0b1000_0000;
}

/// 7-bit address of the PCA9548 I2C switch.
pub const I2C_SWITCH_MUX_ADDRESS: u8 = 0x74;
/// 7-bit address of the PMOD GPIO expander used as the LDO address multiplexer.
pub const I2C_PMOD_GPIO_EXPANDER: u8 = 0x21;

/// Channel carrying the LDO address multiplexer.
pub const LDO_MUX_PORT: &str = port::PORT_EXPANDER;
/// Channel carrying the rail expanders.
pub const LDO_RAIL_PORT: &str = port::FMC_LPC;

const PORT_MASKS: [(&str, u8); 8] = [
    (port::SI570, mux_mask::SI570),
    (port::HDMI, mux_mask::HDMI),
    (port::EEPROM, mux_mask::EEPROM),
    (port::PORT_EXPANDER, mux_mask::PORT_EXPANDER),
    (port::RTC, mux_mask::RTC),
    (port::FMC_HPC, mux_mask::FMC_HPC),
    (port::FMC_LPC, mux_mask::FMC_LPC),
    (port::PMBUS, mux_mask::PMBUS),
];

/// PCA9548 mask that connects the channel exposed as `port`. The root adapter has none.
pub fn mux_mask_for_port(port: &str) -> Option<u8> {
    PORT_MASKS
        .iter()
        .find(|(path, _)| *path == port)
        .map(|(_, mask)| *mask)
}
