//! Instruction-stepping core for the Sharp SM83, the Game Boy's
//! LR35902 CPU.
//!
//! The crate models the register file, the flag register, and the two
//! opcode dispatch tables (primary and CB-prefixed) behind a single
//! [`Cpu::step`] operation. Memory lives behind the [`Bus`] trait: the
//! CPU borrows a bus for each step and performs all of its memory
//! traffic through it, so the same core can run against anything from a
//! flat byte array to a full machine bus. [`FlatBus`] is the bundled
//! 64 KiB reference bus for tests and simple hosts.
//!
//! ```
//! use pocketboy_sm83::{Cpu, FlatBus};
//!
//! let mut cpu = Cpu::new();
//! let mut bus = FlatBus::new();
//! bus.load(0x0000, &[0x3E, 0x42]); // LD A, 0x42
//! cpu.step(&mut bus).unwrap();
//! assert_eq!(cpu.regs.a, 0x42);
//! ```

pub mod bus;
pub mod cpu;

pub use bus::FlatBus;
pub use cpu::{Bus, Cpu, Flag, Registers, StepError};
