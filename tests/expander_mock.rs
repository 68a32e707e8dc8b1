use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};
use zc706_ldo::board::I2C_PMOD_GPIO_EXPANDER;
use zc706_ldo::expander::Expander;

const ADDR: u8 = I2C_PMOD_GPIO_EXPANDER;

#[test]
fn init_writes_output_before_config() {
    let expectations = [
        I2cTrans::write(ADDR, vec![0x02, 0x5A]),
        I2cTrans::write(ADDR, vec![0x06, 0xF0]),
    ];
    let mut i2c = I2cMock::new(&expectations);
    let mut exp = Expander::new(i2c.clone(), ADDR);
    assert_eq!(exp.address(), 0x21);
    exp.init(0xF0, 0x5A).unwrap();
    i2c.done();
}

#[test]
fn register_accessors_hit_fixed_offsets() {
    let expectations = [
        I2cTrans::write_read(ADDR, vec![0x00], vec![0x81]),
        I2cTrans::write_read(ADDR, vec![0x02], vec![0x04]),
        I2cTrans::write_read(ADDR, vec![0x04], vec![0x00]),
        I2cTrans::write(ADDR, vec![0x04, 0x80]),
        I2cTrans::write_read(ADDR, vec![0x06], vec![0xFF]),
    ];
    let mut i2c = I2cMock::new(&expectations);
    let mut exp = Expander::new(i2c.clone(), ADDR);
    assert_eq!(exp.read_input().unwrap(), 0x81);
    assert_eq!(exp.read_output().unwrap(), 0x04);
    assert_eq!(exp.read_polarity().unwrap(), 0x00);
    exp.write_polarity(0x80).unwrap();
    assert_eq!(exp.read_config().unwrap(), 0xFF);
    i2c.done();
}

#[test]
fn update_reg_only_touches_masked_bits() {
    let expectations = [
        I2cTrans::write_read(ADDR, vec![0x06], vec![0b1011_1111]),
        I2cTrans::write(ADDR, vec![0x06, 0b1010_0101]),
    ];
    let mut i2c = I2cMock::new(&expectations);
    let mut exp = Expander::new(i2c.clone(), ADDR);
    exp.update_reg(0x06, 0b0011_1111, 0b0010_0101).unwrap();
    i2c.done();
}
