use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};
use zc706_ldo::data_types::Rail;
use zc706_ldo::error::Error;
use zc706_ldo::manager::RailManager;

const MUX: u8 = 0x21;

#[derive(Default)]
struct CountingDelay {
    total_ns: u64,
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

/// Expected traffic on both buses, tracking the selector the mock multiplexer holds.
struct Script {
    mux: Vec<I2cTrans>,
    rails: Vec<I2cTrans>,
    selector: u8,
}

impl Script {
    /// Traffic of `RailManager::init`.
    fn after_init() -> Self {
        let mut script = Script {
            mux: vec![I2cTrans::write(MUX, vec![0x02, 0x00]), I2cTrans::write(MUX, vec![0x06, 0x00])],
            rails: Vec::new(),
            selector: 0x00,
        };
        for rail in Rail::ALL {
            script.select(rail);
            let addr = rail.config().address;
            script.rails.push(I2cTrans::write(addr, vec![0x02, 0x00]));
            script.rails.push(I2cTrans::write(addr, vec![0x06, 0xBF]));
        }
        script
    }

    fn select(&mut self, rail: Rail) {
        let code = rail.config().selector;
        self.mux.push(I2cTrans::write_read(MUX, vec![0x02], vec![self.selector]));
        if code != self.selector {
            self.mux.push(I2cTrans::write(MUX, vec![0x02, code]));
            self.selector = code;
        }
    }

    fn read(&mut self, rail: Rail, reg: u8, value: u8) {
        self.rails.push(I2cTrans::write_read(rail.config().address, vec![reg], vec![value]));
    }

    fn write(&mut self, rail: Rail, reg: u8, value: u8) {
        self.rails.push(I2cTrans::write(rail.config().address, vec![reg, value]));
    }

    fn mocks(&self) -> (I2cMock, I2cMock) {
        (I2cMock::new(&self.mux), I2cMock::new(&self.rails))
    }
}

#[test]
fn init_resets_every_rail_in_declared_order() {
    let script = Script::after_init();
    let (mut mux_i2c, mut rail_i2c) = script.mocks();
    let mut mgr = RailManager::new(mux_i2c.clone(), rail_i2c.clone(), CountingDelay::default());
    mgr.init().unwrap();
    assert_eq!(mgr.selected(), Some(Rail::VddIo.config().selector));
    mux_i2c.done();
    rail_i2c.done();

    let (_, _, delay) = mgr.release();
    assert_eq!(delay.total_ns, 8 * 10_000_000);
}

#[test]
fn unknown_rail_name_issues_no_writes() {
    let script = Script::after_init();
    let (mut mux_i2c, mut rail_i2c) = script.mocks();
    let mut mgr = RailManager::new(mux_i2c.clone(), rail_i2c.clone(), CountingDelay::default());
    mgr.init().unwrap();

    let err = mgr.enable(&["BOGUS_RAIL"]).unwrap_err();
    assert!(matches!(err, Error::UnknownRail));
    assert!(err.is_invalid_argument());
    // A valid name ahead of the bad one must not be touched either.
    assert!(matches!(mgr.disable(&["VDD_CORE", "BOGUS_RAIL"]), Err(Error::UnknownRail)));
    mux_i2c.done();
    rail_i2c.done();
}

#[test]
fn enable_named_rails_selects_each_first() {
    let mut script = Script::after_init();
    for rail in [Rail::VddRram, Rail::VddIo] {
        script.select(rail);
        script.read(rail, 0x06, 0xBF);
        script.write(rail, 0x06, 0xBF);
        script.write(rail, 0x02, 0x40);
    }
    let (mut mux_i2c, mut rail_i2c) = script.mocks();
    let mut mgr = RailManager::new(mux_i2c.clone(), rail_i2c.clone(), CountingDelay::default());
    mgr.init().unwrap();
    mgr.enable(&["VDD_RRAM", "VDD_IO"]).unwrap();
    assert_eq!(mgr.selected(), Some(0x0));
    mux_i2c.done();
    rail_i2c.done();
}

#[test]
fn enable_all_then_read_enables() {
    let mut script = Script::after_init();
    for rail in Rail::ALL {
        script.select(rail);
        script.read(rail, 0x06, 0xBF);
        script.write(rail, 0x06, 0xBF);
        script.write(rail, 0x02, 0x40);
    }
    for rail in Rail::ALL {
        script.select(rail);
        let out = if rail == Rail::VddRram { 0x00 } else { 0x40 };
        script.read(rail, 0x02, out);
    }
    let (mut mux_i2c, mut rail_i2c) = script.mocks();
    let mut mgr = RailManager::new(mux_i2c.clone(), rail_i2c.clone(), CountingDelay::default());
    mgr.init().unwrap();
    mgr.enable_all().unwrap();
    let enabled = mgr.enabled().unwrap();
    for (rail, on) in enabled.iter() {
        assert_eq!(*on, rail != Rail::VddRram, "{rail}");
    }
    mux_i2c.done();
    rail_i2c.done();
}

#[test]
fn disable_all_drives_enables_low() {
    let mut script = Script::after_init();
    for rail in Rail::ALL {
        script.select(rail);
        script.read(rail, 0x06, 0xBF);
        script.write(rail, 0x06, 0xBF);
        script.write(rail, 0x02, 0x00);
    }
    let (mut mux_i2c, mut rail_i2c) = script.mocks();
    let mut mgr = RailManager::new(mux_i2c.clone(), rail_i2c.clone(), CountingDelay::default());
    mgr.init().unwrap();
    mgr.disable_all().unwrap();
    mux_i2c.done();
    rail_i2c.done();
}

#[test]
fn set_voltages_restores_prior_enable() {
    let mut script = Script::after_init();
    let core = Rail::VddCore;
    script.select(core);
    // was enabled
    script.read(core, 0x02, 0x40);
    // disable
    script.read(core, 0x06, 0xBF);
    script.write(core, 0x06, 0xBF);
    script.write(core, 0x02, 0x00);
    // 900 mV -> code 16
    script.read(core, 0x06, 0xBF);
    script.write(core, 0x06, 0xAF);
    // re-enable
    script.read(core, 0x06, 0xAF);
    script.write(core, 0x06, 0xAF);
    script.write(core, 0x02, 0x40);
    // read back everything
    for rail in Rail::ALL {
        script.select(rail);
        let config = if rail == core { 0xAF } else { 0xBF };
        script.read(rail, 0x06, config);
    }
    for rail in Rail::ALL {
        script.select(rail);
        let out = if rail == core { 0x40 } else { 0x00 };
        script.read(rail, 0x02, out);
    }

    let (mut mux_i2c, mut rail_i2c) = script.mocks();
    let mut mgr = RailManager::new(mux_i2c.clone(), rail_i2c.clone(), CountingDelay::default());
    mgr.init().unwrap();
    mgr.set_voltages(&[("VDD_CORE", 900)]).unwrap();

    let voltages = mgr.voltages().unwrap();
    assert!((voltages[Rail::VddCore] as i32 - 900).abs() <= 25);
    assert_eq!(voltages[Rail::VddRram], 500);
    assert_eq!(voltages[Rail::VddIo], 800);

    let enabled = mgr.enabled().unwrap();
    assert!(enabled[Rail::VddCore]);
    assert_eq!(enabled.iter().filter(|(_, on)| **on).count(), 1);
    mux_i2c.done();
    rail_i2c.done();
}

#[test]
fn set_voltage_leaves_disabled_rail_disabled() {
    let mut script = Script::after_init();
    let io = Rail::VddIo;
    script.select(io);
    script.read(io, 0x02, 0x00);
    script.read(io, 0x06, 0xBF);
    script.write(io, 0x06, 0xBF);
    script.write(io, 0x02, 0x00);
    // 3300 mV -> code 50 -> (0x80 | 50) ^ 0x3F = 0x8D
    script.read(io, 0x06, 0xBF);
    script.write(io, 0x06, 0x8D);

    let (mut mux_i2c, mut rail_i2c) = script.mocks();
    let mut mgr = RailManager::new(mux_i2c.clone(), rail_i2c.clone(), CountingDelay::default());
    mgr.init().unwrap();
    mgr.set_voltage(io, 3_300).unwrap();
    mux_i2c.done();
    rail_i2c.done();
}

#[test]
fn set_voltages_validates_every_entry_first() {
    let script = Script::after_init();
    let (mut mux_i2c, mut rail_i2c) = script.mocks();
    let mut mgr = RailManager::new(mux_i2c.clone(), rail_i2c.clone(), CountingDelay::default());
    mgr.init().unwrap();

    let err = mgr.set_voltages(&[("VDD_CORE", 900), ("VDD_IO", 500)]).unwrap_err();
    assert!(matches!(err, Error::OutOfRange));
    let err = mgr.set_voltages(&[("VDD_CORE", 1_300)]).unwrap_err();
    assert!(matches!(err, Error::OutOfRange));
    let err = mgr.set_voltages(&[("VDD_CORE", 900), ("VDD_NOPE", 900)]).unwrap_err();
    assert!(matches!(err, Error::UnknownRail));
    assert!(matches!(mgr.set_voltage(Rail::VdioRmacro, 3_400), Err(Error::OutOfRange)));
    mux_i2c.done();
    rail_i2c.done();
}

#[test]
fn power_goods_reports_each_rail() {
    let mut script = Script::after_init();
    for rail in Rail::ALL {
        script.select(rail);
        script.read(rail, 0x06, 0x3F);
        script.write(rail, 0x06, 0xBF);
        let input = if rail == Rail::VdioCore { 0x00 } else { 0x80 };
        script.read(rail, 0x00, input);
    }
    let (mut mux_i2c, mut rail_i2c) = script.mocks();
    let mut mgr = RailManager::new(mux_i2c.clone(), rail_i2c.clone(), CountingDelay::default());
    mgr.init().unwrap();
    let goods = mgr.power_goods().unwrap();
    assert!(!goods[Rail::VdioCore]);
    assert_eq!(goods.iter().filter(|(_, good)| **good).count(), 7);
    assert_eq!(goods.get_by_name("VDD_CORE"), Some(&true));
    mux_i2c.done();
    rail_i2c.done();
}

#[test]
fn failed_init_keeps_handles_and_can_retry() {
    let good = Script::after_init();
    let mut mux = vec![I2cTrans::write(MUX, vec![0x02, 0x00]).with_error(ErrorKind::Other)];
    mux.extend(good.mux.iter().cloned());
    let mut mux_i2c = I2cMock::new(&mux);
    let mut rail_i2c = I2cMock::new(&good.rails);

    let mut mgr = RailManager::new(mux_i2c.clone(), rail_i2c.clone(), CountingDelay::default());
    let err = mgr.init().unwrap_err();
    assert!(matches!(err, Error::I2c(ErrorKind::Other)));
    assert_eq!(mgr.selected(), None);

    // The bank can be brought up again on the same handles.
    mgr.init().unwrap();
    mux_i2c.done();
    rail_i2c.done();

    let (_, _, delay) = mgr.release();
    assert_eq!(delay.total_ns, 8 * 10_000_000);
}

#[test]
fn release_after_failed_init_returns_handles() {
    let mux = [I2cTrans::write(MUX, vec![0x02, 0x00]).with_error(ErrorKind::Other)];
    let rails: [I2cTrans; 0] = [];
    let mux_i2c = I2cMock::new(&mux);
    let rail_i2c = I2cMock::new(&rails);

    let mut mgr = RailManager::new(mux_i2c, rail_i2c, CountingDelay::default());
    assert!(matches!(mgr.init(), Err(Error::I2c(ErrorKind::Other))));

    let (mut mux_i2c, mut rail_i2c, delay) = mgr.release();
    assert_eq!(delay.total_ns, 0);
    mux_i2c.done();
    rail_i2c.done();
}
