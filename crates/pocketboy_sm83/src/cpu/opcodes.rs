//! Primary opcode table and its handlers.
//!
//! Each entry is an [`Opcode`] record pairing a mnemonic and an operand
//! width with the function implementing the rule. The table is a plain
//! `static` built in a const block and indexed directly by the fetched
//! byte; bytes without an entry surface from the step engine as
//! [`StepError::UnimplementedOpcode`].

use super::{cb, Bus, Cpu, Flag, StepError};

/// Handler signature shared by every table entry.
///
/// A handler fetches its own immediate operands (advancing PC) and
/// performs all bus traffic itself; the engine only fetches the opcode
/// byte.
pub type OpFn = fn(&mut Cpu, &mut dyn Bus) -> Result<(), StepError>;

/// One decoded instruction rule.
#[derive(Clone, Copy)]
pub struct Opcode {
    /// Mnemonic, for diagnostics and table-driven tests.
    pub mnemonic: &'static str,
    /// Immediate operand bytes the rule consumes beyond the opcode
    /// byte itself. Metadata only: handlers do their own fetching.
    pub operands: u8,
    pub exec: OpFn,
}

/// Primary dispatch table, indexed by the fetched opcode byte.
pub static PRIMARY: [Option<Opcode>; 256] = {
    let mut t: [Option<Opcode>; 256] = [None; 256];
    // The rotate-A-circular rule lives at 0x04 in this table.
    t[0x04] = Some(Opcode { mnemonic: "RLCA", operands: 0, exec: op_rlca });
    t[0x05] = Some(Opcode { mnemonic: "DEC B", operands: 0, exec: op_dec_b });
    t[0x06] = Some(Opcode { mnemonic: "LD B,u8", operands: 1, exec: op_ld_b_u8 });
    t[0x0C] = Some(Opcode { mnemonic: "INC C", operands: 0, exec: op_inc_c });
    t[0x0E] = Some(Opcode { mnemonic: "LD C,u8", operands: 1, exec: op_ld_c_u8 });
    t[0x11] = Some(Opcode { mnemonic: "LD DE,u16", operands: 2, exec: op_ld_de_u16 });
    t[0x17] = Some(Opcode { mnemonic: "RLA", operands: 0, exec: op_rla });
    t[0x1A] = Some(Opcode { mnemonic: "LD A,(DE)", operands: 0, exec: op_ld_a_de });
    t[0x20] = Some(Opcode { mnemonic: "JR NZ,r8", operands: 1, exec: op_jr_nz });
    t[0x21] = Some(Opcode { mnemonic: "LD HL,u16", operands: 2, exec: op_ld_hl_u16 });
    t[0x31] = Some(Opcode { mnemonic: "LD SP,u16", operands: 2, exec: op_ld_sp_u16 });
    t[0x32] = Some(Opcode { mnemonic: "LD (HL-),A", operands: 0, exec: op_ld_hld_a });
    t[0x3E] = Some(Opcode { mnemonic: "LD A,u8", operands: 1, exec: op_ld_a_u8 });
    t[0x4F] = Some(Opcode { mnemonic: "LD C,A", operands: 0, exec: op_ld_c_a });
    t[0x77] = Some(Opcode { mnemonic: "LD (HL),A", operands: 0, exec: op_ld_hl_a });
    t[0xAF] = Some(Opcode { mnemonic: "XOR A", operands: 0, exec: op_xor_a });
    t[0xC1] = Some(Opcode { mnemonic: "POP BC", operands: 0, exec: op_pop_bc });
    t[0xC5] = Some(Opcode { mnemonic: "PUSH BC", operands: 0, exec: op_push_bc });
    t[0xCB] = Some(Opcode { mnemonic: "PREFIX CB", operands: 1, exec: cb::dispatch });
    t[0xCC] = Some(Opcode { mnemonic: "CALL Z,a16", operands: 2, exec: op_call_z });
    t[0xCD] = Some(Opcode { mnemonic: "CALL a16", operands: 2, exec: op_call });
    t[0xE0] = Some(Opcode { mnemonic: "LDH (u8),A", operands: 1, exec: op_ldh_u8_a });
    t[0xE2] = Some(Opcode { mnemonic: "LDH (C),A", operands: 0, exec: op_ldh_c_a });
    t
};

// Rotates.

/// Rotate A left circularly: the old bit 7 goes to both the carry flag
/// and bit 0. Z, N and H are untouched.
fn op_rlca(cpu: &mut Cpu, _bus: &mut dyn Bus) -> Result<(), StepError> {
    let carry = cpu.regs.a & 0x80 != 0;
    cpu.regs.a = (cpu.regs.a << 1) | carry as u8;
    cpu.set_flag(Flag::C, carry);
    Ok(())
}

/// Rotate A left through carry: the old carry becomes bit 0 of A, the
/// old bit 7 becomes the carry. Z, N and H are untouched.
fn op_rla(cpu: &mut Cpu, _bus: &mut dyn Bus) -> Result<(), StepError> {
    let carry_in = cpu.get_flag(Flag::C) as u8;
    let carry_out = cpu.regs.a & 0x80 != 0;
    cpu.regs.a = (cpu.regs.a << 1) | carry_in;
    cpu.set_flag(Flag::C, carry_out);
    Ok(())
}

// Increments and decrements.

fn op_dec_b(cpu: &mut Cpu, _bus: &mut dyn Bus) -> Result<(), StepError> {
    cpu.regs.b = cpu.regs.b.wrapping_sub(1);
    // Inverted polarity for this rule: Z tracks "B still non-zero".
    cpu.set_flag(Flag::Z, cpu.regs.b != 0);
    Ok(())
}

fn op_inc_c(cpu: &mut Cpu, _bus: &mut dyn Bus) -> Result<(), StepError> {
    cpu.regs.c = cpu.regs.c.wrapping_add(1);
    Ok(())
}

// 8-bit loads.

fn op_ld_b_u8(cpu: &mut Cpu, bus: &mut dyn Bus) -> Result<(), StepError> {
    cpu.regs.b = cpu.fetch8(bus);
    Ok(())
}

fn op_ld_c_u8(cpu: &mut Cpu, bus: &mut dyn Bus) -> Result<(), StepError> {
    cpu.regs.c = cpu.fetch8(bus);
    Ok(())
}

fn op_ld_a_u8(cpu: &mut Cpu, bus: &mut dyn Bus) -> Result<(), StepError> {
    cpu.regs.a = cpu.fetch8(bus);
    Ok(())
}

fn op_ld_c_a(cpu: &mut Cpu, _bus: &mut dyn Bus) -> Result<(), StepError> {
    cpu.regs.c = cpu.regs.a;
    Ok(())
}

fn op_ld_a_de(cpu: &mut Cpu, bus: &mut dyn Bus) -> Result<(), StepError> {
    cpu.regs.a = bus.read8(cpu.regs.de());
    Ok(())
}

// 16-bit immediate loads.

fn op_ld_de_u16(cpu: &mut Cpu, bus: &mut dyn Bus) -> Result<(), StepError> {
    let value = cpu.fetch16(bus);
    cpu.regs.set_de(value);
    Ok(())
}

fn op_ld_hl_u16(cpu: &mut Cpu, bus: &mut dyn Bus) -> Result<(), StepError> {
    let value = cpu.fetch16(bus);
    cpu.regs.set_hl(value);
    Ok(())
}

fn op_ld_sp_u16(cpu: &mut Cpu, bus: &mut dyn Bus) -> Result<(), StepError> {
    cpu.regs.sp = cpu.fetch16(bus);
    Ok(())
}

// Stores.

fn op_ld_hl_a(cpu: &mut Cpu, bus: &mut dyn Bus) -> Result<(), StepError> {
    bus.write8(cpu.regs.hl(), cpu.regs.a);
    Ok(())
}

/// Write A to (HL), then decrement the HL pair, the borrow rippling
/// from L into H (0x0000 wraps to 0xFFFF).
fn op_ld_hld_a(cpu: &mut Cpu, bus: &mut dyn Bus) -> Result<(), StepError> {
    let addr = cpu.regs.hl();
    bus.write8(addr, cpu.regs.a);
    cpu.regs.set_hl(addr.wrapping_sub(1));
    Ok(())
}

fn op_ldh_u8_a(cpu: &mut Cpu, bus: &mut dyn Bus) -> Result<(), StepError> {
    let offset = cpu.fetch8(bus);
    bus.write8(0xFF00 + offset as u16, cpu.regs.a);
    Ok(())
}

fn op_ldh_c_a(cpu: &mut Cpu, bus: &mut dyn Bus) -> Result<(), StepError> {
    bus.write8(0xFF00 + cpu.regs.c as u16, cpu.regs.a);
    Ok(())
}

// Logic.

/// XOR A always zeroes the accumulator; Z reports the zero result and
/// the other flag bits keep their values.
fn op_xor_a(cpu: &mut Cpu, _bus: &mut dyn Bus) -> Result<(), StepError> {
    cpu.regs.a = 0;
    cpu.set_flag(Flag::Z, true);
    Ok(())
}

// Stack.

fn op_push_bc(cpu: &mut Cpu, bus: &mut dyn Bus) -> Result<(), StepError> {
    cpu.push_u16(bus, cpu.regs.bc());
    Ok(())
}

fn op_pop_bc(cpu: &mut Cpu, bus: &mut dyn Bus) -> Result<(), StepError> {
    let value = cpu.pop_u16(bus);
    cpu.regs.set_bc(value);
    Ok(())
}

// Control flow.

fn op_jr_nz(cpu: &mut Cpu, bus: &mut dyn Bus) -> Result<(), StepError> {
    let offset = cpu.fetch8(bus) as i8;
    if !cpu.get_flag(Flag::Z) {
        // Relative to the address after the offset byte; `as u16`
        // sign-extends the two's-complement offset.
        cpu.regs.pc = cpu.regs.pc.wrapping_add(offset as u16);
    }
    Ok(())
}

/// Push the return address (the byte after the operand), then load PC
/// from the little-endian 16-bit operand.
fn op_call(cpu: &mut Cpu, bus: &mut dyn Bus) -> Result<(), StepError> {
    let ret = cpu.regs.pc.wrapping_add(2);
    cpu.push_u16(bus, ret);
    cpu.regs.pc = bus.read16(cpu.regs.pc);
    Ok(())
}

fn op_call_z(cpu: &mut Cpu, bus: &mut dyn Bus) -> Result<(), StepError> {
    if cpu.get_flag(Flag::Z) {
        op_call(cpu, bus)
    } else {
        // Not taken: skip the operand bytes, no stack traffic.
        cpu.regs.pc = cpu.regs.pc.wrapping_add(2);
        Ok(())
    }
}
