use std::{fs, path::Path};

use log::debug;

use crate::{
    decode::Opcode,
    error::{LoadError, MachineError},
};

pub type TypeAddr = u16; // in reality u12

pub const DEFAULT_MEMORY_SIZE: usize = 4096;
pub const FONT_START: TypeAddr = 0x50;
pub const ROM_START: TypeAddr = 0x200;
pub const BYTES_PER_CHAR: u8 = 5;
pub const STACK_DEPTH: usize = 16;

type FontBytes = [u8; BYTES_PER_CHAR as usize * 16];

const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Raw ROM bytes, no header.
pub fn read_rom(path: impl AsRef<Path>) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Flat byte-addressable RAM.
///
/// Layout:
///   0x000-0x1ff  reserved for the interpreter, font glyphs at 0x050-0x09f
///   0x200-end    program
///
/// Every access is checked against the capacity; nothing wraps around.
pub struct Memory {
    bytes: Box<[u8]>,
    rom_len: usize,
}

impl Memory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let font_end = FONT_START as usize + DEFAULT_FONT.len();
        assert!(
            capacity >= ROM_START as usize,
            "memory must be at least {ROM_START:#05x} bytes"
        );

        let mut bytes = vec![0; capacity].into_boxed_slice();
        bytes[FONT_START as usize..font_end].copy_from_slice(&DEFAULT_FONT);
        Self { bytes, rom_len: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn rom_len(&self) -> usize {
        self.rom_len
    }

    // loads program bytes starting at 0x200
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        let start = ROM_START as usize;
        let available = self.capacity() - start;
        if rom.len() > available {
            return Err(LoadError::OutOfSpace {
                len: rom.len(),
                available,
                start,
            });
        }

        self.bytes[start..start + rom.len()].copy_from_slice(rom);
        self.rom_len = rom.len();
        debug!("loaded {} byte ROM at {start:#05x}", rom.len());
        Ok(())
    }

    fn range(&self, addr: usize, len: usize) -> Result<std::ops::Range<usize>, MachineError> {
        match addr.checked_add(len) {
            Some(end) if end <= self.capacity() => Ok(addr..end),
            _ => Err(MachineError::OutOfBounds {
                addr,
                len,
                capacity: self.capacity(),
            }),
        }
    }

    pub fn get(&self, addr: TypeAddr) -> Result<u8, MachineError> {
        let range = self.range(addr as usize, 1)?;
        Ok(self.bytes[range.start])
    }

    /// Big-endian word at `pc`, `pc + 1`.
    pub fn fetch(&self, pc: TypeAddr) -> Result<Opcode, MachineError> {
        let range = self.range(pc as usize, 2)?;
        let word = &self.bytes[range];
        Ok(Opcode::from_bytes(word[0], word[1]))
    }

    pub fn sprite(&self, addr: TypeAddr, n: u8) -> Result<&[u8], MachineError> {
        let range = self.range(addr as usize, n as usize)?;
        Ok(&self.bytes[range])
    }

    pub fn font_addr(&self, digit: u8) -> TypeAddr {
        assert!(digit <= 0xF, "no font glyph for {digit:#x}");
        FONT_START + TypeAddr::from(digit) * TypeAddr::from(BYTES_PER_CHAR)
    }

    /// Hundreds, tens and ones of `value` at `addr..addr + 3`.
    pub fn store_bcd(&mut self, addr: TypeAddr, value: u8) -> Result<(), MachineError> {
        let range = self.range(addr as usize, 3)?;
        self.bytes[range].copy_from_slice(&[value / 100, (value / 10) % 10, value % 10]);
        Ok(())
    }

    /// Copy `regs[0..=count]` to `addr..`.
    pub fn store_registers(
        &mut self,
        addr: TypeAddr,
        count: u8,
        regs: &[u8],
    ) -> Result<(), MachineError> {
        let len = count as usize + 1;
        let range = self.range(addr as usize, len)?;
        self.bytes[range].copy_from_slice(&regs[..len]);
        Ok(())
    }

    /// Copy `addr..` into `regs[0..=count]`.
    pub fn load_registers(
        &self,
        addr: TypeAddr,
        count: u8,
        regs: &mut [u8],
    ) -> Result<(), MachineError> {
        let len = count as usize + 1;
        let range = self.range(addr as usize, len)?;
        regs[..len].copy_from_slice(&self.bytes[range]);
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded return-address stack for 2NNN / 00EE.
pub struct Stack {
    addresses: Vec<TypeAddr>,
    depth: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self::with_depth(STACK_DEPTH)
    }

    pub fn with_depth(depth: usize) -> Self {
        Self {
            addresses: Vec::with_capacity(depth),
            depth,
        }
    }

    pub fn push(&mut self, addr: TypeAddr) -> Result<(), MachineError> {
        if self.addresses.len() == self.depth {
            return Err(MachineError::StackOverflow(self.depth));
        }
        self.addresses.push(addr);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<TypeAddr, MachineError> {
        self.addresses.pop().ok_or(MachineError::StackUnderflow)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
