pub mod cb;
pub mod opcodes;


use thiserror::Error;

/// Registers for the SM83 (Game Boy) CPU core.
///
/// The core is Z80-like with an 8-bit ALU and a 16-bit address space.
/// B/C, D/E and H/L are conventionally paired into 16-bit values, high
/// byte first, via the accessors below.
#[derive(Clone, Copy, Debug, Default)]
pub struct Registers {
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

impl Registers {
    #[inline]
    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        let [b, c] = value.to_be_bytes();
        self.b = b;
        self.c = c;
    }

    #[inline]
    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        let [d, e] = value.to_be_bytes();
        self.d = d;
        self.e = e;
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        let [h, l] = value.to_be_bytes();
        self.h = h;
        self.l = l;
    }
}

/// Flag bits in the F register.
///
/// Layout (bit index in the byte, from MSB to LSB):
/// - bit 7: Z (zero)
/// - bit 6: N (subtract)
/// - bit 5: H (half carry)
/// - bit 4: C (carry)
///
/// F is a plain bitfield: an instruction only changes the bits its rule
/// documents, apart from the few rules that reset the whole register
/// before setting their own bits.
#[derive(Clone, Copy, Debug)]
pub enum Flag {
    Z = 7,
    N = 6,
    H = 5,
    C = 4,
}

impl Cpu {
    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        let bit = flag as u8;
        (self.regs.f & (1 << bit)) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let bit = flag as u8;
        if value {
            self.regs.f |= 1 << bit;
        } else {
            self.regs.f &= !(1 << bit);
        }
    }

    /// Reset the whole F register to zero. Used by the handful of rules
    /// that rebuild the flags from scratch.
    #[inline]
    pub fn clear_flags(&mut self) {
        self.regs.f = 0;
    }
}

/// Abstraction over the memory bus the CPU executes against.
///
/// The core borrows a bus for the duration of one [`Cpu::step`] call and
/// performs all memory traffic through it; it never owns the bus.
/// Addresses are plain `u16`, so the 64 KiB wrap is part of the type
/// rather than a runtime check, and reads/writes cannot fail.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Little-endian 16-bit read: low byte at `addr`, high byte at
    /// `addr + 1`, wrapping at the end of the address space.
    ///
    /// The default implementation composes two `read8` calls; buses with
    /// a cheaper wide access can override it as long as the byte order
    /// stays the same.
    fn read16(&mut self, addr: u16) -> u16 {
        let lo = self.read8(addr) as u16;
        let hi = self.read8(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }
}

/// Error returned by [`Cpu::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepError {
    /// The fetched byte has no rule in the dispatch tables.
    ///
    /// The byte counts as consumed: PC has already moved past it (and
    /// past the 0xCB prefix for extended opcodes), so a caller that logs
    /// the report and keeps stepping will not loop on the same byte. SP
    /// and the rest of the register file are untouched.
    #[error("unimplemented opcode 0x{opcode:02X} at 0x{pc:04X}")]
    UnimplementedOpcode {
        /// The unhandled opcode byte.
        opcode: u8,
        /// Address the byte was fetched from.
        pc: u16,
    },
}

/// SM83 CPU state.
///
/// Nothing here but the register file: decode and execute live in the
/// two opcode tables, and memory belongs to the caller's [`Bus`].
/// Instances are cheap copies, and several can run side by side against
/// different buses.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cpu {
    pub regs: Registers,
}

impl Cpu {
    /// Create a CPU in the power-on state, every register at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset an existing CPU back to the power-on state.
    pub fn reset(&mut self) {
        self.regs = Registers::default();
    }

    /// Execute one instruction.
    ///
    /// Fetches the byte at PC (advancing PC past it) and dispatches
    /// through the primary table; the matching rule performs its own
    /// operand fetches and bus traffic. `0xCB` dispatches a second fetch
    /// through the extended table. A byte with no rule is consumed and
    /// reported as [`StepError::UnimplementedOpcode`], leaving the CPU
    /// in a clean state for the next call.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<(), StepError> {
        let at = self.regs.pc;
        let opcode = self.fetch8(bus);
        match opcodes::PRIMARY[opcode as usize] {
            Some(op) => {
                log::trace!("0x{at:04X}: {}", op.mnemonic);
                (op.exec)(self, bus)
            }
            None => {
                log::warn!("unimplemented opcode 0x{opcode:02X} at 0x{at:04X}");
                Err(StepError::UnimplementedOpcode { opcode, pc: at })
            }
        }
    }

    /// Read the byte at PC and advance PC past it.
    #[inline]
    fn fetch8(&mut self, bus: &mut dyn Bus) -> u8 {
        let value = bus.read8(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Read a little-endian 16-bit immediate at PC and advance PC past
    /// both bytes.
    #[inline]
    fn fetch16(&mut self, bus: &mut dyn Bus) -> u16 {
        let value = bus.read16(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(2);
        value
    }

    /// Push a 16-bit value: SP moves down by two, the low byte lands at
    /// SP and the high byte at SP+1.
    #[inline]
    fn push_u16(&mut self, bus: &mut dyn Bus, value: u16) {
        self.regs.sp = self.regs.sp.wrapping_sub(2);
        bus.write8(self.regs.sp, value as u8);
        bus.write8(self.regs.sp.wrapping_add(1), (value >> 8) as u8);
    }

    /// Pop a 16-bit value laid out by `push_u16`; SP moves up by two.
    #[inline]
    fn pop_u16(&mut self, bus: &mut dyn Bus) -> u16 {
        let lo = bus.read8(self.regs.sp) as u16;
        let hi = bus.read8(self.regs.sp.wrapping_add(1)) as u16;
        self.regs.sp = self.regs.sp.wrapping_add(2);
        (hi << 8) | lo
    }
}
