//! Flat reference bus.

use crate::cpu::Bus;

/// 64 KiB of flat RAM behind the [`Bus`] trait.
///
/// Every address reads and writes plain memory; nothing is mapped.
/// Tests, examples and simple hosts stage programs either through
/// [`FlatBus::load`] or by poking `memory` directly.
pub struct FlatBus {
    pub memory: [u8; 0x10000],
}

impl Default for FlatBus {
    fn default() -> Self {
        Self {
            memory: [0; 0x10000],
        }
    }
}

impl FlatBus {
    /// Create a bus with every byte at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `bytes` into memory starting at `origin`, wrapping at the
    /// end of the address space.
    pub fn load(&mut self, origin: u16, bytes: &[u8]) {
        for (i, &byte) in bytes.iter().enumerate() {
            let addr = origin.wrapping_add(i as u16);
            self.memory[addr as usize] = byte;
        }
    }
}

impl Bus for FlatBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read16_is_little_endian_and_wraps_at_the_top() {
        let mut bus = FlatBus::new();
        bus.memory[0x1000] = 0xCD;
        bus.memory[0x1001] = 0xAB;
        assert_eq!(bus.read16(0x1000), 0xABCD);

        // The high byte of a read at 0xFFFF comes from 0x0000.
        bus.memory[0xFFFF] = 0x34;
        bus.memory[0x0000] = 0x12;
        assert_eq!(bus.read16(0xFFFF), 0x1234);
    }

    #[test]
    fn load_places_bytes_and_wraps_at_the_top() {
        let mut bus = FlatBus::new();
        bus.load(0xFFFE, &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(bus.memory[0xFFFE], 0x01);
        assert_eq!(bus.memory[0xFFFF], 0x02);
        assert_eq!(bus.memory[0x0000], 0x03);
        assert_eq!(bus.memory[0x0001], 0x04);
    }
}
