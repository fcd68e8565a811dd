//! Operand resolution.
//!
//! The 6502 has 13 addressing modes:
//! - Implied: no operand (CLC, RTS)
//! - Accumulator: operates on A (ASL A)
//! - Immediate: `#$nn`, the next byte is the value
//! - Zero Page: `$nn`
//! - Zero Page,X / Zero Page,Y: `$nn,X`, index added mod 256, stays in page zero
//! - Absolute: `$nnnn`
//! - Absolute,X / Absolute,Y: `$nnnn,X`, index carries into the high byte
//! - Indirect: `($nnnn)`, JMP only, with the page-wrap bug
//! - Indexed Indirect: `($nn,X)`, pointer at operand + X in page zero
//! - Indirect Indexed: `($nn),Y`, pointer from page zero, then + Y
//! - Relative: signed branch offset
//!
//! Resolution consumes the operand bytes, so PC points at the next
//! instruction by the time the executor runs.

use emu_core::Bus;

use crate::Registers;
use crate::opcode::AddressingMode;

/// Where an instruction's operand lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Effective memory address.
    Address(u16),
    /// The accumulator register.
    Accumulator,
    /// No operand.
    Implied,
    /// Literal byte from the instruction stream.
    Immediate(u8),
    /// Branch displacement from the post-instruction PC.
    Relative(i8),
}

/// Result of resolving one addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub operand: Operand,
    /// Indexing moved the effective address into a different page.
    pub page_crossed: bool,
}

impl Resolved {
    const fn at(addr: u16) -> Self {
        Self {
            operand: Operand::Address(addr),
            page_crossed: false,
        }
    }

    const fn indexed(base: u16, addr: u16) -> Self {
        Self {
            operand: Operand::Address(addr),
            page_crossed: base & 0xFF00 != addr & 0xFF00,
        }
    }

    const fn of(operand: Operand) -> Self {
        Self {
            operand,
            page_crossed: false,
        }
    }
}

/// Fetch the byte at PC and advance PC.
fn fetch<B: Bus>(regs: &mut Registers, bus: &mut B) -> u8 {
    let value = bus.read(regs.pc);
    regs.pc = regs.pc.wrapping_add(1);
    value
}

/// Fetch a little-endian word at PC and advance PC by two.
fn fetch_word<B: Bus>(regs: &mut Registers, bus: &mut B) -> u16 {
    let lo = fetch(regs, bus);
    let hi = fetch(regs, bus);
    u16::from_le_bytes([lo, hi])
}

/// Read a word whose high byte comes from the same page as the low byte.
///
/// With `addr` = $xxFF the high byte is read from $xx00, not $(xx+1)00. This
/// is how the NMOS part fetches the JMP indirect pointer, and zero-page
/// pointers get the same treatment for free.
fn read_word_same_page<B: Bus>(bus: &mut B, addr: u16) -> u16 {
    let lo = bus.read(addr);
    let hi_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
    let hi = bus.read(hi_addr);
    u16::from_le_bytes([lo, hi])
}

/// Resolve `mode` against the instruction stream at PC.
///
/// Advances PC past the operand bytes and reports page crossing for the
/// indexed modes that can carry into the high byte.
pub fn resolve<B: Bus>(mode: AddressingMode, regs: &mut Registers, bus: &mut B) -> Resolved {
    match mode {
        AddressingMode::Implied => Resolved::of(Operand::Implied),
        AddressingMode::Accumulator => Resolved::of(Operand::Accumulator),
        AddressingMode::Immediate => Resolved::of(Operand::Immediate(fetch(regs, bus))),
        AddressingMode::Relative => Resolved::of(Operand::Relative(fetch(regs, bus) as i8)),
        AddressingMode::ZeroPage => Resolved::at(u16::from(fetch(regs, bus))),
        AddressingMode::ZeroPageX => {
            let base = fetch(regs, bus);
            Resolved::at(u16::from(base.wrapping_add(regs.x)))
        }
        AddressingMode::ZeroPageY => {
            let base = fetch(regs, bus);
            Resolved::at(u16::from(base.wrapping_add(regs.y)))
        }
        AddressingMode::Absolute => Resolved::at(fetch_word(regs, bus)),
        AddressingMode::AbsoluteX => {
            let base = fetch_word(regs, bus);
            Resolved::indexed(base, base.wrapping_add(u16::from(regs.x)))
        }
        AddressingMode::AbsoluteY => {
            let base = fetch_word(regs, bus);
            Resolved::indexed(base, base.wrapping_add(u16::from(regs.y)))
        }
        AddressingMode::Indirect => {
            let pointer = fetch_word(regs, bus);
            Resolved::at(read_word_same_page(bus, pointer))
        }
        AddressingMode::IndexedIndirect => {
            let pointer = fetch(regs, bus).wrapping_add(regs.x);
            Resolved::at(read_word_same_page(bus, u16::from(pointer)))
        }
        AddressingMode::IndirectIndexed => {
            let pointer = fetch(regs, bus);
            let base = read_word_same_page(bus, u16::from(pointer));
            Resolved::indexed(base, base.wrapping_add(u16::from(regs.y)))
        }
    }
}
