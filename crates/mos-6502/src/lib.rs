//! MOS 6502 instruction core.
//!
//! Instruction-stepped rather than cycle-stepped: [`Mos6502::step`] runs one
//! whole instruction and returns the cycles it took, including page-cross
//! and branch penalties. The caller's run loop uses that count to clock
//! everything else.
//!
//! One step is a fixed pipeline:
//!
//! 1. fetch the opcode at PC and advance PC
//! 2. decode it through [`OPCODE_TABLE`]
//! 3. [`resolve`] the addressing mode, consuming operand bytes
//! 4. [`execute`] the instruction against the resolved [`Operand`]
//!
//! Undocumented opcodes are not emulated. They decode as
//! [`Instruction::Invalid`] and stepping one returns [`Fault::InvalidOpcode`].

mod addressing;
mod cpu;
mod disasm;
mod execute;
pub mod flags;
mod opcode;
mod registers;

pub use addressing::{Operand, Resolved, resolve};
pub use cpu::{Fault, InterruptKind, Mos6502, Variant};
pub use disasm::{Disassembly, disassemble};
pub use execute::execute;
pub use flags::Status;
pub use opcode::{AddressingMode, Instruction, OPCODE_TABLE, OpcodeEntry, lookup};
pub use registers::{Registers, STACK_PAGE};

/// NMI vector.
pub const NMI_VECTOR: u16 = 0xFFFA;

/// Reset vector.
pub const RESET_VECTOR: u16 = 0xFFFC;

/// IRQ and BRK vector.
pub const IRQ_VECTOR: u16 = 0xFFFE;
