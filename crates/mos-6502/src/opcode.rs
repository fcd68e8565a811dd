//! Opcode decode table.
//!
//! Every one of the 256 opcode bytes maps to an [`OpcodeEntry`]. Bytes with
//! no documented NMOS instruction decode to [`Instruction::Invalid`] with the
//! implied mode and zero cycles, so callers always get the same shape back.

use std::fmt;

/// Instruction identity. The 56 documented mnemonics plus `Invalid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    Invalid,
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
}

impl Instruction {
    /// Assembler mnemonic. Invalid bytes render as `???`.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Invalid => "???",
            Self::Adc => "ADC",
            Self::And => "AND",
            Self::Asl => "ASL",
            Self::Bcc => "BCC",
            Self::Bcs => "BCS",
            Self::Beq => "BEQ",
            Self::Bit => "BIT",
            Self::Bmi => "BMI",
            Self::Bne => "BNE",
            Self::Bpl => "BPL",
            Self::Brk => "BRK",
            Self::Bvc => "BVC",
            Self::Bvs => "BVS",
            Self::Clc => "CLC",
            Self::Cld => "CLD",
            Self::Cli => "CLI",
            Self::Clv => "CLV",
            Self::Cmp => "CMP",
            Self::Cpx => "CPX",
            Self::Cpy => "CPY",
            Self::Dec => "DEC",
            Self::Dex => "DEX",
            Self::Dey => "DEY",
            Self::Eor => "EOR",
            Self::Inc => "INC",
            Self::Inx => "INX",
            Self::Iny => "INY",
            Self::Jmp => "JMP",
            Self::Jsr => "JSR",
            Self::Lda => "LDA",
            Self::Ldx => "LDX",
            Self::Ldy => "LDY",
            Self::Lsr => "LSR",
            Self::Nop => "NOP",
            Self::Ora => "ORA",
            Self::Pha => "PHA",
            Self::Php => "PHP",
            Self::Pla => "PLA",
            Self::Plp => "PLP",
            Self::Rol => "ROL",
            Self::Ror => "ROR",
            Self::Rti => "RTI",
            Self::Rts => "RTS",
            Self::Sbc => "SBC",
            Self::Sec => "SEC",
            Self::Sed => "SED",
            Self::Sei => "SEI",
            Self::Sta => "STA",
            Self::Stx => "STX",
            Self::Sty => "STY",
            Self::Tax => "TAX",
            Self::Tay => "TAY",
            Self::Tsx => "TSX",
            Self::Txa => "TXA",
            Self::Txs => "TXS",
            Self::Tya => "TYA",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// The 13 addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// `$nnnn`
    Absolute,
    /// `$nnnn,X`
    AbsoluteX,
    /// `$nnnn,Y`
    AbsoluteY,
    /// `($nnnn)`, JMP only.
    Indirect,
    /// `($nn,X)`
    IndexedIndirect,
    /// `($nn),Y`
    IndirectIndexed,
    /// `$nn`
    ZeroPage,
    /// `$nn,X`
    ZeroPageX,
    /// `$nn,Y`
    ZeroPageY,
    /// `A`
    Accumulator,
    /// `#$nn`
    Immediate,
    Implied,
    /// Signed branch offset.
    Relative,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    #[must_use]
    pub const fn operand_len(self) -> u16 {
        match self {
            Self::Accumulator | Self::Implied => 0,
            Self::IndexedIndirect
            | Self::IndirectIndexed
            | Self::ZeroPage
            | Self::ZeroPageX
            | Self::ZeroPageY
            | Self::Immediate
            | Self::Relative => 1,
            Self::Absolute | Self::AbsoluteX | Self::AbsoluteY | Self::Indirect => 2,
        }
    }
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Absolute => "abs",
            Self::AbsoluteX => "abs,X",
            Self::AbsoluteY => "abs,Y",
            Self::Indirect => "(abs)",
            Self::IndexedIndirect => "(zp,X)",
            Self::IndirectIndexed => "(zp),Y",
            Self::ZeroPage => "zp",
            Self::ZeroPageX => "zp,X",
            Self::ZeroPageY => "zp,Y",
            Self::Accumulator => "A",
            Self::Immediate => "#imm",
            Self::Implied => "imp",
            Self::Relative => "rel",
        };
        f.write_str(name)
    }
}

/// Decoded shape of one opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
    /// The opcode byte this entry describes.
    pub opcode: u8,
    pub instruction: Instruction,
    pub mode: AddressingMode,
    /// Cycles before any penalty.
    pub cycles: u8,
    /// One extra cycle when the effective address crosses a page.
    pub page_penalty: bool,
}

impl OpcodeEntry {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        !matches!(self.instruction, Instruction::Invalid)
    }

    /// Opcode byte plus operand bytes.
    #[must_use]
    pub const fn byte_len(&self) -> u16 {
        1 + self.mode.operand_len()
    }
}

const fn op(
    opcode: u8,
    instruction: Instruction,
    mode: AddressingMode,
    cycles: u8,
    page_penalty: bool,
) -> OpcodeEntry {
    OpcodeEntry {
        opcode,
        instruction,
        mode,
        cycles,
        page_penalty,
    }
}

const fn invalid(opcode: u8) -> OpcodeEntry {
    op(
        opcode,
        Instruction::Invalid,
        AddressingMode::Implied,
        0,
        false,
    )
}

#[allow(clippy::enum_glob_use)]
const TABLE: [OpcodeEntry; 256] = {
    use AddressingMode::*;
    use Instruction::*;
    [
        op(0x00, Brk, Implied, 7, false),
        op(0x01, Ora, IndexedIndirect, 6, false),
        invalid(0x02),
        invalid(0x03),
        invalid(0x04),
        op(0x05, Ora, ZeroPage, 3, false),
        op(0x06, Asl, ZeroPage, 5, false),
        invalid(0x07),
        op(0x08, Php, Implied, 3, false),
        op(0x09, Ora, Immediate, 2, false),
        op(0x0A, Asl, Accumulator, 2, false),
        invalid(0x0B),
        invalid(0x0C),
        op(0x0D, Ora, Absolute, 4, false),
        op(0x0E, Asl, Absolute, 6, false),
        invalid(0x0F),
        op(0x10, Bpl, Relative, 2, false),
        op(0x11, Ora, IndirectIndexed, 5, true),
        invalid(0x12),
        invalid(0x13),
        invalid(0x14),
        op(0x15, Ora, ZeroPageX, 4, false),
        op(0x16, Asl, ZeroPageX, 6, false),
        invalid(0x17),
        op(0x18, Clc, Implied, 2, false),
        op(0x19, Ora, AbsoluteY, 4, true),
        invalid(0x1A),
        invalid(0x1B),
        invalid(0x1C),
        op(0x1D, Ora, AbsoluteX, 4, true),
        op(0x1E, Asl, AbsoluteX, 7, false),
        invalid(0x1F),
        op(0x20, Jsr, Absolute, 6, false),
        op(0x21, And, IndexedIndirect, 6, false),
        invalid(0x22),
        invalid(0x23),
        op(0x24, Bit, ZeroPage, 3, false),
        op(0x25, And, ZeroPage, 3, false),
        op(0x26, Rol, ZeroPage, 5, false),
        invalid(0x27),
        op(0x28, Plp, Implied, 4, false),
        op(0x29, And, Immediate, 2, false),
        op(0x2A, Rol, Accumulator, 2, false),
        invalid(0x2B),
        op(0x2C, Bit, Absolute, 4, false),
        op(0x2D, And, Absolute, 4, false),
        op(0x2E, Rol, Absolute, 6, false),
        invalid(0x2F),
        op(0x30, Bmi, Relative, 2, false),
        op(0x31, And, IndirectIndexed, 5, true),
        invalid(0x32),
        invalid(0x33),
        invalid(0x34),
        op(0x35, And, ZeroPageX, 4, false),
        op(0x36, Rol, ZeroPageX, 6, false),
        invalid(0x37),
        op(0x38, Sec, Implied, 2, false),
        op(0x39, And, AbsoluteY, 4, true),
        invalid(0x3A),
        invalid(0x3B),
        invalid(0x3C),
        op(0x3D, And, AbsoluteX, 4, true),
        op(0x3E, Rol, AbsoluteX, 7, false),
        invalid(0x3F),
        op(0x40, Rti, Implied, 6, false),
        op(0x41, Eor, IndexedIndirect, 6, false),
        invalid(0x42),
        invalid(0x43),
        invalid(0x44),
        op(0x45, Eor, ZeroPage, 3, false),
        op(0x46, Lsr, ZeroPage, 5, false),
        invalid(0x47),
        op(0x48, Pha, Implied, 3, false),
        op(0x49, Eor, Immediate, 2, false),
        op(0x4A, Lsr, Accumulator, 2, false),
        invalid(0x4B),
        op(0x4C, Jmp, Absolute, 3, false),
        op(0x4D, Eor, Absolute, 4, false),
        op(0x4E, Lsr, Absolute, 6, false),
        invalid(0x4F),
        op(0x50, Bvc, Relative, 2, false),
        op(0x51, Eor, IndirectIndexed, 5, true),
        invalid(0x52),
        invalid(0x53),
        invalid(0x54),
        op(0x55, Eor, ZeroPageX, 4, false),
        op(0x56, Lsr, ZeroPageX, 6, false),
        invalid(0x57),
        op(0x58, Cli, Implied, 2, false),
        op(0x59, Eor, AbsoluteY, 4, true),
        invalid(0x5A),
        invalid(0x5B),
        invalid(0x5C),
        op(0x5D, Eor, AbsoluteX, 4, true),
        op(0x5E, Lsr, AbsoluteX, 7, false),
        invalid(0x5F),
        op(0x60, Rts, Implied, 6, false),
        op(0x61, Adc, IndexedIndirect, 6, false),
        invalid(0x62),
        invalid(0x63),
        invalid(0x64),
        op(0x65, Adc, ZeroPage, 3, false),
        op(0x66, Ror, ZeroPage, 5, false),
        invalid(0x67),
        op(0x68, Pla, Implied, 4, false),
        op(0x69, Adc, Immediate, 2, false),
        op(0x6A, Ror, Accumulator, 2, false),
        invalid(0x6B),
        op(0x6C, Jmp, Indirect, 5, false),
        op(0x6D, Adc, Absolute, 4, false),
        op(0x6E, Ror, Absolute, 6, false),
        invalid(0x6F),
        op(0x70, Bvs, Relative, 2, false),
        op(0x71, Adc, IndirectIndexed, 5, true),
        invalid(0x72),
        invalid(0x73),
        invalid(0x74),
        op(0x75, Adc, ZeroPageX, 4, false),
        op(0x76, Ror, ZeroPageX, 6, false),
        invalid(0x77),
        op(0x78, Sei, Implied, 2, false),
        op(0x79, Adc, AbsoluteY, 4, true),
        invalid(0x7A),
        invalid(0x7B),
        invalid(0x7C),
        op(0x7D, Adc, AbsoluteX, 4, true),
        op(0x7E, Ror, AbsoluteX, 7, false),
        invalid(0x7F),
        invalid(0x80),
        op(0x81, Sta, IndexedIndirect, 6, false),
        invalid(0x82),
        invalid(0x83),
        op(0x84, Sty, ZeroPage, 3, false),
        op(0x85, Sta, ZeroPage, 3, false),
        op(0x86, Stx, ZeroPage, 3, false),
        invalid(0x87),
        op(0x88, Dey, Implied, 2, false),
        invalid(0x89),
        op(0x8A, Txa, Implied, 2, false),
        invalid(0x8B),
        op(0x8C, Sty, Absolute, 4, false),
        op(0x8D, Sta, Absolute, 4, false),
        op(0x8E, Stx, Absolute, 4, false),
        invalid(0x8F),
        op(0x90, Bcc, Relative, 2, false),
        op(0x91, Sta, IndirectIndexed, 6, false),
        invalid(0x92),
        invalid(0x93),
        op(0x94, Sty, ZeroPageX, 4, false),
        op(0x95, Sta, ZeroPageX, 4, false),
        op(0x96, Stx, ZeroPageY, 4, false),
        invalid(0x97),
        op(0x98, Tya, Implied, 2, false),
        op(0x99, Sta, AbsoluteY, 5, false),
        op(0x9A, Txs, Implied, 2, false),
        invalid(0x9B),
        invalid(0x9C),
        op(0x9D, Sta, AbsoluteX, 5, false),
        invalid(0x9E),
        invalid(0x9F),
        op(0xA0, Ldy, Immediate, 2, false),
        op(0xA1, Lda, IndexedIndirect, 6, false),
        op(0xA2, Ldx, Immediate, 2, false),
        invalid(0xA3),
        op(0xA4, Ldy, ZeroPage, 3, false),
        op(0xA5, Lda, ZeroPage, 3, false),
        op(0xA6, Ldx, ZeroPage, 3, false),
        invalid(0xA7),
        op(0xA8, Tay, Implied, 2, false),
        op(0xA9, Lda, Immediate, 2, false),
        op(0xAA, Tax, Implied, 2, false),
        invalid(0xAB),
        op(0xAC, Ldy, Absolute, 4, false),
        op(0xAD, Lda, Absolute, 4, false),
        op(0xAE, Ldx, Absolute, 4, false),
        invalid(0xAF),
        op(0xB0, Bcs, Relative, 2, false),
        op(0xB1, Lda, IndirectIndexed, 5, true),
        invalid(0xB2),
        invalid(0xB3),
        op(0xB4, Ldy, ZeroPageX, 4, false),
        op(0xB5, Lda, ZeroPageX, 4, false),
        op(0xB6, Ldx, ZeroPageY, 4, false),
        invalid(0xB7),
        op(0xB8, Clv, Implied, 2, false),
        op(0xB9, Lda, AbsoluteY, 4, true),
        op(0xBA, Tsx, Implied, 2, false),
        invalid(0xBB),
        op(0xBC, Ldy, AbsoluteX, 4, true),
        op(0xBD, Lda, AbsoluteX, 4, true),
        op(0xBE, Ldx, AbsoluteY, 4, true),
        invalid(0xBF),
        op(0xC0, Cpy, Immediate, 2, false),
        op(0xC1, Cmp, IndexedIndirect, 6, false),
        invalid(0xC2),
        invalid(0xC3),
        op(0xC4, Cpy, ZeroPage, 3, false),
        op(0xC5, Cmp, ZeroPage, 3, false),
        op(0xC6, Dec, ZeroPage, 5, false),
        invalid(0xC7),
        op(0xC8, Iny, Implied, 2, false),
        op(0xC9, Cmp, Immediate, 2, false),
        op(0xCA, Dex, Implied, 2, false),
        invalid(0xCB),
        op(0xCC, Cpy, Absolute, 4, false),
        op(0xCD, Cmp, Absolute, 4, false),
        op(0xCE, Dec, Absolute, 6, false),
        invalid(0xCF),
        op(0xD0, Bne, Relative, 2, false),
        op(0xD1, Cmp, IndirectIndexed, 5, true),
        invalid(0xD2),
        invalid(0xD3),
        invalid(0xD4),
        op(0xD5, Cmp, ZeroPageX, 4, false),
        op(0xD6, Dec, ZeroPageX, 6, false),
        invalid(0xD7),
        op(0xD8, Cld, Implied, 2, false),
        op(0xD9, Cmp, AbsoluteY, 4, true),
        invalid(0xDA),
        invalid(0xDB),
        invalid(0xDC),
        op(0xDD, Cmp, AbsoluteX, 4, true),
        op(0xDE, Dec, AbsoluteX, 7, false),
        invalid(0xDF),
        op(0xE0, Cpx, Immediate, 2, false),
        op(0xE1, Sbc, IndexedIndirect, 6, false),
        invalid(0xE2),
        invalid(0xE3),
        op(0xE4, Cpx, ZeroPage, 3, false),
        op(0xE5, Sbc, ZeroPage, 3, false),
        op(0xE6, Inc, ZeroPage, 5, false),
        invalid(0xE7),
        op(0xE8, Inx, Implied, 2, false),
        op(0xE9, Sbc, Immediate, 2, false),
        op(0xEA, Nop, Implied, 2, false),
        invalid(0xEB),
        op(0xEC, Cpx, Absolute, 4, false),
        op(0xED, Sbc, Absolute, 4, false),
        op(0xEE, Inc, Absolute, 6, false),
        invalid(0xEF),
        op(0xF0, Beq, Relative, 2, false),
        op(0xF1, Sbc, IndirectIndexed, 5, true),
        invalid(0xF2),
        invalid(0xF3),
        invalid(0xF4),
        op(0xF5, Sbc, ZeroPageX, 4, false),
        op(0xF6, Inc, ZeroPageX, 6, false),
        invalid(0xF7),
        op(0xF8, Sed, Implied, 2, false),
        op(0xF9, Sbc, AbsoluteY, 4, true),
        invalid(0xFA),
        invalid(0xFB),
        invalid(0xFC),
        op(0xFD, Sbc, AbsoluteX, 4, true),
        op(0xFE, Inc, AbsoluteX, 7, false),
        invalid(0xFF),
    ]
};

// Entry n must describe byte n: a duplicate or a gap breaks the build.
const _: () = {
    let mut i = 0;
    while i < TABLE.len() {
        assert!(TABLE[i].opcode as usize == i, "opcode table out of order");
        i += 1;
    }
};

/// The decode table, indexed by opcode byte.
pub static OPCODE_TABLE: [OpcodeEntry; 256] = TABLE;

/// Decode an opcode byte. Total over `u8`.
#[must_use]
pub fn lookup(opcode: u8) -> &'static OpcodeEntry {
    &OPCODE_TABLE[opcode as usize]
}
