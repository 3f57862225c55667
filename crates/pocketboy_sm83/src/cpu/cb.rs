//! Extended (CB-prefixed) opcode table.
//!
//! The primary table's 0xCB entry lands in [`dispatch`], which fetches
//! the sub-opcode byte and indexes this table with it. Unknown
//! sub-opcodes are reported the same way as unknown primary bytes, with
//! the prefix and sub-byte both consumed.

use super::opcodes::Opcode;
use super::{Bus, Cpu, Flag, StepError};

/// Extended dispatch table, indexed by the byte behind the 0xCB prefix.
pub static EXTENDED: [Option<Opcode>; 256] = {
    let mut t: [Option<Opcode>; 256] = [None; 256];
    t[0x11] = Some(Opcode { mnemonic: "RL C", operands: 0, exec: op_rl_c });
    t[0x7C] = Some(Opcode { mnemonic: "BIT 7,H", operands: 0, exec: op_bit_7_h });
    t
};

/// Fetch the sub-opcode behind the 0xCB prefix and dispatch it.
pub(super) fn dispatch(cpu: &mut Cpu, bus: &mut dyn Bus) -> Result<(), StepError> {
    let at = cpu.regs.pc;
    let opcode = cpu.fetch8(bus);
    match EXTENDED[opcode as usize] {
        Some(op) => {
            log::trace!("0x{at:04X}: {}", op.mnemonic);
            (op.exec)(cpu, bus)
        }
        None => {
            log::warn!("unimplemented CB-prefixed opcode 0x{opcode:02X} at 0x{at:04X}");
            Err(StepError::UnimplementedOpcode { opcode, pc: at })
        }
    }
}

/// Rotate C left through carry. F is rebuilt from scratch: carry from
/// the old bit 7, Z tracking "C non-zero after the rotate", N and H
/// ending at 0.
fn op_rl_c(cpu: &mut Cpu, _bus: &mut dyn Bus) -> Result<(), StepError> {
    let carry_in = cpu.get_flag(Flag::C) as u8;
    let carry_out = cpu.regs.c & 0x80 != 0;
    cpu.regs.c = (cpu.regs.c << 1) | carry_in;
    cpu.clear_flags();
    cpu.set_flag(Flag::C, carry_out);
    cpu.set_flag(Flag::Z, cpu.regs.c != 0);
    Ok(())
}

/// Test bit 7 of H: Z is set when the bit is set in this table, N is
/// cleared, H is set, and carry keeps its value.
fn op_bit_7_h(cpu: &mut Cpu, _bus: &mut dyn Bus) -> Result<(), StepError> {
    cpu.set_flag(Flag::Z, cpu.regs.h & 0x80 != 0);
    cpu.set_flag(Flag::N, false);
    cpu.set_flag(Flag::H, true);
    Ok(())
}
