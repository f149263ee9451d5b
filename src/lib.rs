// 16 8-bit data registers named V0 to VF, VF doubles as the flag output
// I -> address register (12 bits used)
//
// Stack of return addresses for 2NNN / 00EE
//
// Delay timer & Sound timer: count down at 60 per second until 0
// Beep while the sound timer is non-zero
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier

pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod peripherals;
pub mod registers;
pub mod screen;
pub mod sound;
pub mod timer;

pub use config::{Config, Quirks};
pub use decode::{Instruction, Opcode};
pub use emulator::Emulator;
pub use error::{LoadError, MachineError};
pub use peripherals::{Audio, Display, RandomSource};
