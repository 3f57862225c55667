//! Steps a small program on a flat bus and prints the final CPU state.
//!
//! Run with `RUST_LOG=trace cargo run --example run_program` to watch
//! the per-instruction trace and the diagnostic that ends the run.

use anyhow::Result;
use pocketboy_sm83::{Cpu, FlatBus, StepError};

fn main() -> Result<()> {
    env_logger::init();

    let mut cpu = Cpu::new();
    let mut bus = FlatBus::new();

    bus.load(
        0x0000,
        &[
            0x31, 0xFE, 0xFF, // LD SP, 0xFFFE
            0x3E, 0x42, // LD A, 0x42
            0x21, 0x00, 0xC0, // LD HL, 0xC000
            0x32, // LD (HL-), A
            0x06, 0x99, // LD B, 0x99
            0x0E, 0x77, // LD C, 0x77
            0xC5, // PUSH BC
            0xC1, // POP BC
            0xCD, 0x20, 0x00, // CALL 0x0020
        ],
    );
    bus.load(0x0020, &[0xAF]); // XOR A at the call target

    loop {
        match cpu.step(&mut bus) {
            Ok(()) => {}
            Err(StepError::UnimplementedOpcode { opcode, pc }) => {
                log::info!("stopping at unhandled byte 0x{opcode:02X} (address 0x{pc:04X})");
                break;
            }
        }
    }

    println!(
        "A={:02X} F={:02X} BC={:04X} DE={:04X} HL={:04X} SP={:04X} PC={:04X}",
        cpu.regs.a,
        cpu.regs.f,
        cpu.regs.bc(),
        cpu.regs.de(),
        cpu.regs.hl(),
        cpu.regs.sp,
        cpu.regs.pc
    );
    println!("byte written at 0xC000 = 0x{:02X}", bus.memory[0xC000]);
    Ok(())
}
