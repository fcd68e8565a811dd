//! One-line disassembler.

use emu_core::Bus;

use crate::opcode::{AddressingMode, lookup};

/// A disassembled instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disassembly {
    /// Assembler text, e.g. `LDA $1234,X`.
    pub text: String,
    /// Bytes occupied, opcode included.
    pub len: u16,
}

/// Disassemble the instruction at `address`.
///
/// Reads through the bus, so only use it on buses where reads have no side
/// effects. Undocumented opcodes come back as `.byte $nn`.
pub fn disassemble<B: Bus>(bus: &mut B, address: u16) -> Disassembly {
    let opcode = bus.read(address);
    let entry = lookup(opcode);
    if !entry.is_valid() {
        return Disassembly {
            text: format!(".byte ${opcode:02X}"),
            len: 1,
        };
    }

    let lo = bus.read(address.wrapping_add(1));
    let hi = bus.read(address.wrapping_add(2));
    let word = u16::from_le_bytes([lo, hi]);
    let m = entry.instruction.mnemonic();

    let text = match entry.mode {
        AddressingMode::Implied => m.to_string(),
        AddressingMode::Accumulator => format!("{m} A"),
        AddressingMode::Immediate => format!("{m} #${lo:02X}"),
        AddressingMode::ZeroPage => format!("{m} ${lo:02X}"),
        AddressingMode::ZeroPageX => format!("{m} ${lo:02X},X"),
        AddressingMode::ZeroPageY => format!("{m} ${lo:02X},Y"),
        AddressingMode::Absolute => format!("{m} ${word:04X}"),
        AddressingMode::AbsoluteX => format!("{m} ${word:04X},X"),
        AddressingMode::AbsoluteY => format!("{m} ${word:04X},Y"),
        AddressingMode::Indirect => format!("{m} (${word:04X})"),
        AddressingMode::IndexedIndirect => format!("{m} (${lo:02X},X)"),
        AddressingMode::IndirectIndexed => format!("{m} (${lo:02X}),Y"),
        AddressingMode::Relative => {
            let target = address
                .wrapping_add(2)
                .wrapping_add_signed(i16::from(lo as i8));
            format!("{m} ${target:04X}")
        }
    };

    Disassembly {
        text,
        len: entry.byte_len(),
    }
}
