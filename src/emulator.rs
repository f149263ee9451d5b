use log::{debug, trace, warn};

use crate::{
    config::{Config, Quirks},
    decode::{Instruction, Opcode},
    error::{LoadError, MachineError},
    keyboard::KEY_COUNT,
    memory::{Memory, Stack},
    peripherals::{Audio, Display, Mute, RandomSource, ThreadRandom},
    registers::Registers,
};

/// The whole machine: registers, memory and call stack, plus handles to
/// the display, the random source and the buzzer.
///
/// Single-threaded. `cycle` is called from the outer loop with the
/// elapsed wall-clock time; it decays the timers every call and runs at
/// most one instruction once a full instruction period has accumulated.
pub struct Emulator<D: Display> {
    pub regs: Registers,
    pub mem: Memory,
    pub stack: Stack,
    display: D,
    rng: Box<dyn RandomSource>,
    audio: Box<dyn Audio>,
    quirks: Quirks,
    period: f64,
    time_passed: f64,
    // FX0A: key latched on press, released before the wait resolves
    awaited_key: Option<u8>,
}

impl<D: Display> Emulator<D> {
    pub fn new(config: Config, display: D) -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::with_capacity(config.memory_size),
            stack: Stack::new(),
            display,
            rng: Box::new(ThreadRandom::new()),
            audio: Box::new(Mute),
            quirks: config.quirks,
            period: config.instruction_period(),
            time_passed: 0.0,
            awaited_key: None,
        }
    }

    pub fn with_random(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_audio(mut self, audio: impl Audio + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        self.mem.load_rom(rom)
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn should_terminate(&self) -> bool {
        self.display.should_terminate()
    }

    /// Advance by `dt` seconds. Returns whether an instruction ran.
    pub fn cycle(&mut self, dt: f64) -> Result<bool, MachineError> {
        self.time_passed += dt;
        self.regs.update_timers(dt);
        self.audio.set_active(self.regs.sound.is_active());

        if self.time_passed < self.period {
            return Ok(false);
        }
        self.time_passed -= self.period;

        self.tick()?;

        self.display.present_frame();
        self.display.poll_input();
        Ok(true)
    }

    /// One fetch-decode-execute.
    pub fn tick(&mut self) -> Result<Instruction, MachineError> {
        let operation = self.fetch_decode()?;
        self.execute_ins(operation)?;
        Ok(operation)
    }

    pub fn fetch_decode(&mut self) -> Result<Instruction, MachineError> {
        let pc = self.regs.pc.get();
        let op: Opcode = self.mem.fetch(pc)?;
        self.regs.pc.advance();

        let ins = Instruction::decode(op);
        trace!("{pc:03x}: {op} {ins:?}");
        Ok(ins)
    }

    pub fn execute_ins(&mut self, ins: Instruction) -> Result<(), MachineError> {
        match ins {
            Instruction::ClearScreen => self.display.clear_screen(),
            Instruction::PopSubroutine => {
                let addr = self.stack.pop()?;
                self.regs.pc.set_addr(addr);
            }
            Instruction::Jump(addr) => self.regs.pc.set_addr(addr),
            Instruction::PushSubroutine(addr) => {
                // pc already points past the call
                self.stack.push(self.regs.pc.get())?;
                self.regs.pc.set_addr(addr);
            }

            Instruction::SkipEqualConstant(vx, nn) => self.skip_if(self.regs.get(vx) == nn),
            Instruction::SkipNotEqualConstant(vx, nn) => self.skip_if(self.regs.get(vx) != nn),
            Instruction::SkipEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx) == self.regs.get(vy))
            }
            Instruction::SkipNotEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx) != self.regs.get(vy))
            }

            Instruction::SetRegister(vx, nn) => self.regs.set_register(vx, nn),
            Instruction::AddToRegister(vx, nn) => self.regs.add_to_register(vx, nn),

            Instruction::CopyRegister(..)
            | Instruction::Or(..)
            | Instruction::And(..)
            | Instruction::XOr(..)
            | Instruction::Add(..)
            | Instruction::SubtractForward(..)
            | Instruction::RightShift(..)
            | Instruction::SubtractBackward(..)
            | Instruction::LeftShift(..) => self.alu(ins),

            Instruction::SetIndexRegister(addr) => self.regs.index.set_addr(addr),
            Instruction::JumpWithOffset(addr, vx) => {
                let offset = if self.quirks.legacy_jump_offset {
                    self.regs.get(0x0)
                } else {
                    self.regs.get(vx)
                };
                self.regs.pc.set_addr(addr + u16::from(offset));
            }
            Instruction::Random(vx, nn) => {
                let ransuu = self.rng.next_byte();
                self.regs.set_register(vx, ransuu & nn);
            }
            Instruction::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                let sprite = self.mem.sprite(self.regs.index.get(), height)?;
                let collided = self.display.draw_sprite(sprite, x, y);
                self.regs.set_flag(collided);
            }

            Instruction::SkipIfPressed(vx) => {
                let pressed = self.display.is_key_pressed(self.regs.get(vx) & 0xF);
                self.skip_if(pressed);
            }
            Instruction::SkipIfNotPressed(vx) => {
                let pressed = self.display.is_key_pressed(self.regs.get(vx) & 0xF);
                self.skip_if(!pressed);
            }

            Instruction::CopyDelayToRegister(vx) => {
                let delay = self.regs.delay.get();
                self.regs.set_register(vx, delay);
            }
            Instruction::GetKey(vx) => self.wait_for_key(vx),
            Instruction::CopyRegisterToDelay(vx) => {
                let value = self.regs.get(vx);
                self.regs.delay.set(value);
            }
            Instruction::CopyRegisterToSound(vx) => {
                let value = self.regs.get(vx);
                self.regs.sound.set(value);
            }
            Instruction::AddToIndex(vx) => {
                let offset = self.regs.get(vx);
                self.regs.index.add(offset);
            }
            Instruction::PointChar(vx) => {
                let addr = self.mem.font_addr(self.regs.get(vx) & 0xF);
                self.regs.index.set_addr(addr);
            }
            Instruction::ToDecimal(vx) => {
                self.mem.store_bcd(self.regs.index.get(), self.regs.get(vx))?;
            }
            Instruction::StoreRegisterToMemory(vx) => {
                self.mem
                    .store_registers(self.regs.index.get(), vx, self.regs.as_slice())?;
            }
            Instruction::LoadRegisterFromMemory(vx) => {
                self.mem
                    .load_registers(self.regs.index.get(), vx, self.regs.as_mut_slice())?;
            }

            Instruction::Unknown(op) => {
                warn!("unknown instruction {op} at {:03x}", self.regs.pc.get().wrapping_sub(2));
            }
        }
        Ok(())
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.regs.pc.advance();
        }
    }

    // 8XY* family, VF is written last so it wins when X is F
    fn alu(&mut self, ins: Instruction) {
        let regs = &mut self.regs;
        let legacy_shift = self.quirks.legacy_shift;

        match ins {
            Instruction::CopyRegister(vx, vy) => regs.set_register(vx, regs.get(vy)),
            Instruction::Or(vx, vy) => {
                regs.set_register(vx, regs.get(vx) | regs.get(vy));
                regs.set_flag(false);
            }
            Instruction::And(vx, vy) => {
                regs.set_register(vx, regs.get(vx) & regs.get(vy));
                regs.set_flag(false);
            }
            Instruction::XOr(vx, vy) => {
                regs.set_register(vx, regs.get(vx) ^ regs.get(vy));
                regs.set_flag(false);
            }
            Instruction::Add(vx, vy) => {
                let (sum, carry) = regs.get(vx).overflowing_add(regs.get(vy));
                regs.set_register(vx, sum);
                regs.set_flag(carry);
            }
            Instruction::SubtractForward(vx, vy) => {
                let (x, y) = (regs.get(vx), regs.get(vy));
                regs.set_register(vx, x.wrapping_sub(y));
                regs.set_flag(x >= y); // no borrow
            }
            Instruction::SubtractBackward(vx, vy) => {
                let (x, y) = (regs.get(vx), regs.get(vy));
                regs.set_register(vx, y.wrapping_sub(x));
                regs.set_flag(y >= x);
            }
            Instruction::RightShift(vx, vy) => {
                let value = if legacy_shift { regs.get(vy) } else { regs.get(vx) };
                regs.set_register(vx, value >> 1);
                regs.set_flag(value & 1 == 1);
            }
            Instruction::LeftShift(vx, vy) => {
                let value = if legacy_shift { regs.get(vy) } else { regs.get(vx) };
                regs.set_register(vx, value << 1);
                regs.set_flag(value & 0x80 != 0);
            }
            _ => unreachable!("{ins:?} is not an ALU instruction"),
        }
    }

    // Replays itself through the pc until a key goes down and comes back up.
    fn wait_for_key(&mut self, vx: u8) {
        match self.awaited_key {
            None => {
                let pressed = (0..KEY_COUNT as u8).find(|k| self.display.is_key_pressed(*k));
                if let Some(key) = pressed {
                    debug!("FX0A latched key {key:X}");
                    self.awaited_key = Some(key);
                    self.regs.set_register(vx, key);
                }
                self.regs.pc.retreat();
            }
            Some(key) if self.display.is_key_pressed(key) => self.regs.pc.retreat(),
            Some(key) => {
                debug!("FX0A resolved with key {key:X}");
                self.awaited_key = None;
            }
        }
    }
}
