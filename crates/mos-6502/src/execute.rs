//! Instruction semantics.
//!
//! The executor only knows where the operand lives, never how it was
//! addressed. Each instruction reports the cycles it adds on top of the
//! table's base cost; today only taken branches add any.

use emu_core::Bus;

use crate::addressing::Operand;
use crate::flags::{C, D, I, N, V, Z};
use crate::opcode::Instruction;
use crate::{IRQ_VECTOR, Registers, Status, Variant};

/// Execute one decoded instruction.
///
/// Returns the instruction-specific extra cycles, or `None` for
/// [`Instruction::Invalid`], which has no defined effect and leaves all state
/// untouched.
pub fn execute<B: Bus>(
    instruction: Instruction,
    operand: Operand,
    regs: &mut Registers,
    bus: &mut B,
    variant: Variant,
) -> Option<u32> {
    let decimal = variant.has_decimal_mode() && regs.p.is_set(D);

    match instruction {
        Instruction::Invalid => return None,

        // Load/store
        Instruction::Lda => {
            regs.a = read(operand, regs, bus);
            regs.p.update_nz(regs.a);
        }
        Instruction::Ldx => {
            regs.x = read(operand, regs, bus);
            regs.p.update_nz(regs.x);
        }
        Instruction::Ldy => {
            regs.y = read(operand, regs, bus);
            regs.p.update_nz(regs.y);
        }
        Instruction::Sta => write(operand, regs, bus, regs.a),
        Instruction::Stx => write(operand, regs, bus, regs.x),
        Instruction::Sty => write(operand, regs, bus, regs.y),

        // Arithmetic
        Instruction::Adc => {
            let value = read(operand, regs, bus);
            if decimal {
                adc_decimal(regs, value);
            } else {
                adc_binary(regs, value);
            }
        }
        Instruction::Sbc => {
            let value = read(operand, regs, bus);
            if decimal {
                sbc_decimal(regs, value);
            } else {
                // Binary SBC is ADC of the one's complement.
                adc_binary(regs, !value);
            }
        }

        // Logic
        Instruction::And => {
            regs.a &= read(operand, regs, bus);
            regs.p.update_nz(regs.a);
        }
        Instruction::Ora => {
            regs.a |= read(operand, regs, bus);
            regs.p.update_nz(regs.a);
        }
        Instruction::Eor => {
            regs.a ^= read(operand, regs, bus);
            regs.p.update_nz(regs.a);
        }
        Instruction::Bit => {
            let value = read(operand, regs, bus);
            regs.p.set_if(Z, regs.a & value == 0);
            regs.p.set_if(N, value & 0x80 != 0);
            regs.p.set_if(V, value & 0x40 != 0);
        }

        // Shifts and rotates
        Instruction::Asl => modify(operand, regs, bus, asl),
        Instruction::Lsr => modify(operand, regs, bus, lsr),
        Instruction::Rol => modify(operand, regs, bus, rol),
        Instruction::Ror => modify(operand, regs, bus, ror),

        // Increment/decrement
        Instruction::Inc => modify(operand, regs, bus, inc),
        Instruction::Dec => modify(operand, regs, bus, dec),
        Instruction::Inx => regs.x = inc(&mut regs.p, regs.x),
        Instruction::Iny => regs.y = inc(&mut regs.p, regs.y),
        Instruction::Dex => regs.x = dec(&mut regs.p, regs.x),
        Instruction::Dey => regs.y = dec(&mut regs.p, regs.y),

        // Compare
        Instruction::Cmp => {
            let value = read(operand, regs, bus);
            compare(&mut regs.p, regs.a, value);
        }
        Instruction::Cpx => {
            let value = read(operand, regs, bus);
            compare(&mut regs.p, regs.x, value);
        }
        Instruction::Cpy => {
            let value = read(operand, regs, bus);
            compare(&mut regs.p, regs.y, value);
        }

        // Branches
        Instruction::Bcc => return Some(branch(regs, operand, !regs.p.is_set(C))),
        Instruction::Bcs => return Some(branch(regs, operand, regs.p.is_set(C))),
        Instruction::Bne => return Some(branch(regs, operand, !regs.p.is_set(Z))),
        Instruction::Beq => return Some(branch(regs, operand, regs.p.is_set(Z))),
        Instruction::Bpl => return Some(branch(regs, operand, !regs.p.is_set(N))),
        Instruction::Bmi => return Some(branch(regs, operand, regs.p.is_set(N))),
        Instruction::Bvc => return Some(branch(regs, operand, !regs.p.is_set(V))),
        Instruction::Bvs => return Some(branch(regs, operand, regs.p.is_set(V))),

        // Jumps and calls
        Instruction::Jmp => regs.pc = target(operand),
        Instruction::Jsr => {
            // PC already points past the operand; the pushed address is the
            // last byte of the JSR itself.
            regs.push_word(bus, regs.pc.wrapping_sub(1));
            regs.pc = target(operand);
        }
        Instruction::Rts => {
            regs.pc = regs.pull_word(bus).wrapping_add(1);
        }

        // Interrupts and stack
        Instruction::Brk => {
            // BRK skips a padding byte: the return address is BRK + 2.
            regs.push_word(bus, regs.pc.wrapping_add(1));
            regs.push(bus, regs.p.to_byte_brk());
            regs.p.set(I);
            regs.pc = read_vector(bus, IRQ_VECTOR);
        }
        Instruction::Rti => {
            let p = regs.pull(bus);
            regs.p = Status::from_stack(p);
            regs.pc = regs.pull_word(bus);
        }
        Instruction::Pha => regs.push(bus, regs.a),
        Instruction::Php => regs.push(bus, regs.p.to_byte_brk()),
        Instruction::Pla => {
            regs.a = regs.pull(bus);
            regs.p.update_nz(regs.a);
        }
        Instruction::Plp => {
            let p = regs.pull(bus);
            regs.p = Status::from_stack(p);
        }

        // Flags
        Instruction::Clc => regs.p.clear(C),
        Instruction::Sec => regs.p.set(C),
        Instruction::Cli => regs.p.clear(I),
        Instruction::Sei => regs.p.set(I),
        Instruction::Cld => regs.p.clear(D),
        Instruction::Sed => regs.p.set(D),
        Instruction::Clv => regs.p.clear(V),

        // Transfers
        Instruction::Tax => {
            regs.x = regs.a;
            regs.p.update_nz(regs.x);
        }
        Instruction::Tay => {
            regs.y = regs.a;
            regs.p.update_nz(regs.y);
        }
        Instruction::Txa => {
            regs.a = regs.x;
            regs.p.update_nz(regs.a);
        }
        Instruction::Tya => {
            regs.a = regs.y;
            regs.p.update_nz(regs.a);
        }
        Instruction::Tsx => {
            regs.x = regs.s;
            regs.p.update_nz(regs.x);
        }
        Instruction::Txs => regs.s = regs.x,

        Instruction::Nop => {}
    }

    Some(0)
}

/// Read a little-endian vector.
pub(crate) fn read_vector<B: Bus>(bus: &mut B, vector: u16) -> u16 {
    let lo = bus.read(vector);
    let hi = bus.read(vector.wrapping_add(1));
    u16::from_le_bytes([lo, hi])
}

// ============================================================================
// Operand access
// ============================================================================

fn read<B: Bus>(operand: Operand, regs: &Registers, bus: &mut B) -> u8 {
    match operand {
        Operand::Address(addr) => bus.read(addr),
        Operand::Immediate(value) => value,
        Operand::Accumulator => regs.a,
        Operand::Implied | Operand::Relative(_) => unreachable!("{operand:?} has no value"),
    }
}

fn write<B: Bus>(operand: Operand, regs: &mut Registers, bus: &mut B, value: u8) {
    match operand {
        Operand::Address(addr) => bus.write(addr, value),
        Operand::Accumulator => regs.a = value,
        Operand::Immediate(_) | Operand::Implied | Operand::Relative(_) => {
            unreachable!("{operand:?} is not writable");
        }
    }
}

/// Read-modify-write on memory or A.
fn modify<B: Bus>(
    operand: Operand,
    regs: &mut Registers,
    bus: &mut B,
    op: fn(&mut Status, u8) -> u8,
) {
    let value = read(operand, regs, bus);
    let result = op(&mut regs.p, value);
    write(operand, regs, bus, result);
}

fn target(operand: Operand) -> u16 {
    match operand {
        Operand::Address(addr) => addr,
        _ => unreachable!("{operand:?} is not a jump target"),
    }
}

/// Take or skip a branch, returning its extra cycles.
///
/// Taken: +1. Target on a different page from the next instruction: +1 more.
fn branch(regs: &mut Registers, operand: Operand, taken: bool) -> u32 {
    let Operand::Relative(offset) = operand else {
        unreachable!("{operand:?} is not a branch offset");
    };
    if !taken {
        return 0;
    }
    let next = regs.pc;
    let dest = next.wrapping_add_signed(i16::from(offset));
    regs.pc = dest;
    if next & 0xFF00 == dest & 0xFF00 { 1 } else { 2 }
}

// ============================================================================
// ALU
// ============================================================================

fn adc_binary(regs: &mut Registers, value: u8) {
    let a = regs.a;
    let carry = u16::from(regs.p.is_set(C));
    let sum = u16::from(a) + u16::from(value) + carry;
    let result = sum as u8;

    regs.p.set_if(C, sum > 0xFF);
    regs.p.set_if(V, (a ^ result) & (value ^ result) & 0x80 != 0);
    regs.p.update_nz(result);
    regs.a = result;
}

fn adc_decimal(regs: &mut Registers, value: u8) {
    let a = regs.a;
    let carry = u8::from(regs.p.is_set(C));

    let mut lo = (a & 0x0F) + (value & 0x0F) + carry;
    if lo > 9 {
        lo += 6;
    }
    let mut hi = (a >> 4) + (value >> 4) + u8::from(lo > 0x0F);

    // NMOS: Z from the binary sum, N and V from the intermediate high digit.
    let binary = a.wrapping_add(value).wrapping_add(carry);
    let intermediate = (hi << 4) | (lo & 0x0F);
    regs.p.set_if(Z, binary == 0);
    regs.p.set_if(N, hi & 0x08 != 0);
    regs.p
        .set_if(V, (a ^ intermediate) & (value ^ intermediate) & 0x80 != 0);

    if hi > 9 {
        hi += 6;
    }
    regs.p.set_if(C, hi > 0x0F);
    regs.a = (hi << 4) | (lo & 0x0F);
}

fn sbc_decimal(regs: &mut Registers, value: u8) {
    let a = regs.a;
    let borrow = i16::from(!regs.p.is_set(C));

    // NMOS: every flag comes from the binary subtraction.
    let binary = i16::from(a) - i16::from(value) - borrow;
    let result = binary as u8;
    regs.p.set_if(C, binary >= 0);
    regs.p.set_if(V, (a ^ value) & (a ^ result) & 0x80 != 0);
    regs.p.update_nz(result);

    let mut lo = i16::from(a & 0x0F) - i16::from(value & 0x0F) - borrow;
    let mut hi = i16::from(a >> 4) - i16::from(value >> 4);
    if lo < 0 {
        lo -= 6;
        hi -= 1;
    }
    if hi < 0 {
        hi -= 6;
    }
    regs.a = ((hi << 4) as u8) | ((lo & 0x0F) as u8);
}

fn compare(p: &mut Status, register: u8, value: u8) {
    p.set_if(C, register >= value);
    p.update_nz(register.wrapping_sub(value));
}

fn asl(p: &mut Status, value: u8) -> u8 {
    p.set_if(C, value & 0x80 != 0);
    let result = value << 1;
    p.update_nz(result);
    result
}

fn lsr(p: &mut Status, value: u8) -> u8 {
    p.set_if(C, value & 0x01 != 0);
    let result = value >> 1;
    p.update_nz(result);
    result
}

fn rol(p: &mut Status, value: u8) -> u8 {
    let carry_in = u8::from(p.is_set(C));
    p.set_if(C, value & 0x80 != 0);
    let result = (value << 1) | carry_in;
    p.update_nz(result);
    result
}

fn ror(p: &mut Status, value: u8) -> u8 {
    let carry_in = if p.is_set(C) { 0x80 } else { 0 };
    p.set_if(C, value & 0x01 != 0);
    let result = (value >> 1) | carry_in;
    p.update_nz(result);
    result
}

fn inc(p: &mut Status, value: u8) -> u8 {
    let result = value.wrapping_add(1);
    p.update_nz(result);
    result
}

fn dec(p: &mut Status, value: u8) -> u8 {
    let result = value.wrapping_sub(1);
    p.update_nz(result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_core::SimpleBus;

    fn regs_at(pc: u16) -> Registers {
        let mut regs = Registers::new();
        regs.pc = pc;
        regs
    }

    fn run(instruction: Instruction, operand: Operand, regs: &mut Registers) -> Option<u32> {
        let mut bus = SimpleBus::new();
        execute(instruction, operand, regs, &mut bus, Variant::Nmos6502)
    }

    #[test]
    fn adc_signed_overflow() {
        let mut regs = regs_at(0);
        regs.a = 0x7F;
        run(Instruction::Adc, Operand::Immediate(0x01), &mut regs);
        assert_eq!(regs.a, 0x80);
        assert!(regs.p.is_set(V));
        assert!(regs.p.is_set(N));
        assert!(!regs.p.is_set(C));
        assert!(!regs.p.is_set(Z));
    }

    #[test]
    fn adc_carry_out_and_zero() {
        let mut regs = regs_at(0);
        regs.a = 0xFF;
        regs.p.set(C);
        run(Instruction::Adc, Operand::Immediate(0x00), &mut regs);
        assert_eq!(regs.a, 0x00);
        assert!(regs.p.is_set(C));
        assert!(regs.p.is_set(Z));
        assert!(!regs.p.is_set(V));
    }

    #[test]
    fn sbc_borrow_and_overflow() {
        let mut regs = regs_at(0);
        regs.a = 0x80;
        regs.p.set(C);
        run(Instruction::Sbc, Operand::Immediate(0x01), &mut regs);
        assert_eq!(regs.a, 0x7F);
        assert!(regs.p.is_set(V));
        assert!(regs.p.is_set(C));

        regs.a = 0x00;
        regs.p.set(C);
        run(Instruction::Sbc, Operand::Immediate(0x01), &mut regs);
        assert_eq!(regs.a, 0xFF);
        assert!(!regs.p.is_set(C));
        assert!(regs.p.is_set(N));
    }

    #[test]
    fn decimal_adc_on_nmos() {
        let mut regs = regs_at(0);
        regs.p.set(D);
        regs.a = 0x58;
        run(Instruction::Adc, Operand::Immediate(0x46), &mut regs);
        assert_eq!(regs.a, 0x04);
        assert!(regs.p.is_set(C));
    }

    #[test]
    fn decimal_sbc_on_nmos() {
        let mut regs = regs_at(0);
        regs.p.set(D);
        regs.p.set(C);
        regs.a = 0x46;
        run(Instruction::Sbc, Operand::Immediate(0x12), &mut regs);
        assert_eq!(regs.a, 0x34);
        assert!(regs.p.is_set(C));

        regs.a = 0x10;
        regs.p.set(C);
        run(Instruction::Sbc, Operand::Immediate(0x01), &mut regs);
        assert_eq!(regs.a, 0x09);
    }

    #[test]
    fn decimal_flag_ignored_on_2a03() {
        let mut regs = regs_at(0);
        let mut bus = SimpleBus::new();
        regs.p.set(D);
        regs.a = 0x58;
        execute(
            Instruction::Adc,
            Operand::Immediate(0x46),
            &mut regs,
            &mut bus,
            Variant::Ricoh2A03,
        );
        assert_eq!(regs.a, 0x9E);
        assert!(regs.p.is_set(D));
    }

    #[test]
    fn cmp_equal() {
        let mut regs = regs_at(0);
        regs.a = 0x10;
        run(Instruction::Cmp, Operand::Immediate(0x10), &mut regs);
        assert!(regs.p.is_set(Z));
        assert!(regs.p.is_set(C));
        assert!(!regs.p.is_set(N));
        assert_eq!(regs.a, 0x10);
    }

    #[test]
    fn cpx_less_than() {
        let mut regs = regs_at(0);
        regs.x = 0x05;
        run(Instruction::Cpx, Operand::Immediate(0x06), &mut regs);
        assert!(!regs.p.is_set(C));
        assert!(!regs.p.is_set(Z));
        assert!(regs.p.is_set(N));
    }

    #[test]
    fn bit_copies_high_bits_without_touching_a() {
        let mut regs = regs_at(0);
        let mut bus = SimpleBus::new();
        bus.write(0x0010, 0xC0);
        regs.a = 0x01;
        execute(
            Instruction::Bit,
            Operand::Address(0x0010),
            &mut regs,
            &mut bus,
            Variant::Nmos6502,
        );
        assert!(regs.p.is_set(N));
        assert!(regs.p.is_set(V));
        assert!(regs.p.is_set(Z));
        assert_eq!(regs.a, 0x01);
    }

    #[test]
    fn rotates_feed_carry_through() {
        let mut regs = regs_at(0);
        regs.a = 0x80;
        run(Instruction::Rol, Operand::Accumulator, &mut regs);
        assert_eq!(regs.a, 0x00);
        assert!(regs.p.is_set(C));
        assert!(regs.p.is_set(Z));

        run(Instruction::Ror, Operand::Accumulator, &mut regs);
        assert_eq!(regs.a, 0x80);
        assert!(!regs.p.is_set(C));
        assert!(regs.p.is_set(N));
    }

    #[test]
    fn memory_shift_writes_back() {
        let mut regs = regs_at(0);
        let mut bus = SimpleBus::new();
        bus.write(0x0300, 0x81);
        execute(
            Instruction::Lsr,
            Operand::Address(0x0300),
            &mut regs,
            &mut bus,
            Variant::Nmos6502,
        );
        assert_eq!(bus.peek(0x0300), 0x40);
        assert!(regs.p.is_set(C));
        assert_eq!(regs.a, 0);
    }

    #[test]
    fn increments_wrap() {
        let mut regs = regs_at(0);
        regs.x = 0xFF;
        run(Instruction::Inx, Operand::Implied, &mut regs);
        assert_eq!(regs.x, 0x00);
        assert!(regs.p.is_set(Z));

        run(Instruction::Dey, Operand::Implied, &mut regs);
        assert_eq!(regs.y, 0xFF);
        assert!(regs.p.is_set(N));
    }

    #[test]
    fn stores_leave_flags_alone() {
        let mut regs = regs_at(0);
        let mut bus = SimpleBus::new();
        regs.a = 0x00;
        let before = regs.p;
        execute(
            Instruction::Sta,
            Operand::Address(0x0400),
            &mut regs,
            &mut bus,
            Variant::Nmos6502,
        );
        assert_eq!(regs.p, before);
    }

    #[test]
    fn branch_not_taken_costs_nothing() {
        let mut regs = regs_at(0x0210);
        regs.p.clear(Z);
        let extra = run(Instruction::Beq, Operand::Relative(0x10), &mut regs);
        assert_eq!(extra, Some(0));
        assert_eq!(regs.pc, 0x0210);
    }

    #[test]
    fn branch_taken_same_page() {
        let mut regs = regs_at(0x0210);
        regs.p.set(Z);
        let extra = run(Instruction::Beq, Operand::Relative(-0x10), &mut regs);
        assert_eq!(extra, Some(1));
        assert_eq!(regs.pc, 0x0200);
    }

    #[test]
    fn branch_taken_across_page() {
        let mut regs = regs_at(0x02F0);
        regs.p.set(Z);
        let extra = run(Instruction::Beq, Operand::Relative(0x20), &mut regs);
        assert_eq!(extra, Some(2));
        assert_eq!(regs.pc, 0x0310);
    }

    #[test]
    fn transfers_update_nz_except_txs() {
        let mut regs = regs_at(0);
        regs.x = 0x00;
        regs.p.clear(Z);
        run(Instruction::Txs, Operand::Implied, &mut regs);
        assert_eq!(regs.s, 0x00);
        assert!(!regs.p.is_set(Z));

        run(Instruction::Tsx, Operand::Implied, &mut regs);
        assert!(regs.p.is_set(Z));
    }

    #[test]
    fn invalid_has_no_effect() {
        let mut regs = regs_at(0x0201);
        let before = regs;
        assert_eq!(run(Instruction::Invalid, Operand::Implied, &mut regs), None);
        assert_eq!(regs, before);
    }
}
