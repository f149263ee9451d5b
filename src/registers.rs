use crate::{
    memory::{TypeAddr, ROM_START},
    timer::Timer,
};

pub const REGISTER_COUNT: usize = 16;
pub const FLAG_REGISTER: u8 = 0xF;

/// V0..VF, I, PC and the two 60 Hz timers.
#[derive(Debug, Clone)]
pub struct Registers {
    registers: [u8; REGISTER_COUNT],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub delay: Timer,
    pub sound: Timer,
}

impl Registers {
    pub fn new() -> Self {
        Self {
            registers: [0; REGISTER_COUNT],
            pc: ProgramCounter(ROM_START),
            index: IndexRegister(0x0),
            delay: Timer::default(),
            sound: Timer::default(),
        }
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[Self::slot(reg_num)]
    }

    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[Self::slot(reg_num)] = value;
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.set_register(FLAG_REGISTER, u8::from(flag));
    }

    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let slot = Self::slot(reg_num);
        self.registers[slot] = self.registers[slot].wrapping_add(value);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.registers
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.registers
    }

    /// Runs both timers down by elapsed wall-clock seconds.
    pub fn update_timers(&mut self, dt: f64) {
        self.delay.decay(dt);
        self.sound.decay(dt);
    }

    fn slot(reg_num: u8) -> usize {
        assert!(
            (reg_num as usize) < REGISTER_COUNT,
            "no register V{reg_num:X}"
        );
        reg_num as usize
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    // next instruction
    pub fn advance(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    // replay the current instruction
    pub fn retreat(&mut self) {
        self.0 = self.0.wrapping_sub(2);
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    pub fn get(&self) -> TypeAddr {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    pub fn add(&mut self, offset: u8) {
        self.0 = self.0.wrapping_add(TypeAddr::from(offset));
    }

    pub fn get(&self) -> TypeAddr {
        self.0
    }
}
