//! 6502 register file.

use emu_core::Bus;

use crate::flags::{I, U};
use crate::Status;

/// Base address of the hardware stack page.
pub const STACK_PAGE: u16 = 0x0100;

/// 6502 CPU register set.
///
/// - A: 8-bit accumulator
/// - X, Y: 8-bit index registers
/// - S: 8-bit stack pointer (stack at $0100-$01FF, grows down)
/// - PC: 16-bit program counter
/// - P: 8-bit processor status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Stack pointer (points to the next free slot).
    pub s: u8,
    /// Program counter.
    pub pc: u16,
    /// Processor status flags.
    pub p: Status,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Registers in their power-on state.
    ///
    /// A, X and Y are undefined on real hardware; we use 0. S ends up at $FD
    /// after the reset sequence's three suppressed pushes. PC is left at 0
    /// until the reset vector is read.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0xFD,
            pc: 0,
            p: Status(U | I),
        }
    }

    /// Current top-of-stack address without modifying S.
    #[must_use]
    pub const fn stack_addr(&self) -> u16 {
        STACK_PAGE | (self.s as u16)
    }

    /// Push a byte. S wraps within the stack page.
    pub fn push<B: Bus>(&mut self, bus: &mut B, value: u8) {
        bus.write(self.stack_addr(), value);
        self.s = self.s.wrapping_sub(1);
    }

    /// Pull a byte. S wraps within the stack page.
    pub fn pull<B: Bus>(&mut self, bus: &mut B) -> u8 {
        self.s = self.s.wrapping_add(1);
        bus.read(self.stack_addr())
    }

    /// Push a word, high byte first.
    pub fn push_word<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push(bus, hi);
        self.push(bus, lo);
    }

    /// Pull a word, low byte first.
    pub fn pull_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.pull(bus);
        let hi = self.pull(bus);
        u16::from_le_bytes([lo, hi])
    }
}
