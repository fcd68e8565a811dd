//! The CPU: register file plus the fetch/decode/resolve/execute step.

use std::fmt;

use emu_core::{Bus, Observable, Value};
use log::{debug, trace, warn};

use crate::addressing::resolve;
use crate::execute::{execute, read_vector};
use crate::flags::{C, D, I, N, V, Z};
use crate::opcode::lookup;
use crate::{IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR, Registers};

/// Cycles taken by the reset, IRQ and NMI sequences.
const INTERRUPT_CYCLES: u32 = 7;

/// CPU variant. Only decimal-mode arithmetic differs between them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Variant {
    /// NMOS 6502/6510: ADC and SBC honour the D flag.
    #[default]
    Nmos6502,
    /// Ricoh 2A03/2A07 (NES): D can be set and cleared but ADC/SBC stay binary.
    Ricoh2A03,
}

impl Variant {
    #[must_use]
    pub const fn has_decimal_mode(self) -> bool {
        matches!(self, Self::Nmos6502)
    }
}

/// Interrupt line being serviced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptKind {
    /// Maskable, ignored while I is set.
    Irq,
    /// Non-maskable.
    Nmi,
}

/// Conditions that stop a step from completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The byte at `address` is not a documented opcode. PC has moved past
    /// the opcode byte and nothing else has changed.
    InvalidOpcode { opcode: u8, address: u16 },
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOpcode { opcode, address } => {
                write!(f, "invalid opcode ${opcode:02X} at ${address:04X}")
            }
        }
    }
}

impl std::error::Error for Fault {}

/// The MOS 6502.
#[derive(Debug)]
pub struct Mos6502 {
    /// CPU registers.
    pub regs: Registers,

    variant: Variant,

    /// Cycles consumed since construction, including reset and interrupts.
    total_cycles: u64,

    /// Instructions completed since construction.
    instructions: u64,
}

impl Default for Mos6502 {
    fn default() -> Self {
        Self::new()
    }
}

impl Mos6502 {
    /// An NMOS 6502 in power-on state. Call [`Mos6502::reset`] to load PC.
    #[must_use]
    pub fn new() -> Self {
        Self::with_variant(Variant::default())
    }

    #[must_use]
    pub fn with_variant(variant: Variant) -> Self {
        Self {
            regs: Registers::new(),
            variant,
            total_cycles: 0,
            instructions: 0,
        }
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    #[must_use]
    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    #[must_use]
    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Execute one instruction and return the cycles it consumed.
    ///
    /// Total = base cycles, +1 if the mode crossed a page and the opcode pays
    /// for it, + whatever the instruction adds (taken branches).
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, Fault> {
        let address = self.regs.pc;
        let opcode = bus.read(address);
        self.regs.pc = address.wrapping_add(1);

        let entry = lookup(opcode);
        let resolved = resolve(entry.mode, &mut self.regs, bus);

        let Some(extra) = execute(
            entry.instruction,
            resolved.operand,
            &mut self.regs,
            bus,
            self.variant,
        ) else {
            warn!("invalid opcode ${opcode:02X} at ${address:04X}");
            return Err(Fault::InvalidOpcode { opcode, address });
        };

        let penalty = u32::from(entry.page_penalty && resolved.page_crossed);
        let cycles = u32::from(entry.cycles) + penalty + extra;

        trace!(
            "${address:04X}  {opcode:02X}  {} {:?}  {cycles} cycles",
            entry.instruction, resolved.operand
        );

        self.total_cycles += u64::from(cycles);
        self.instructions += 1;
        Ok(cycles)
    }

    /// Run the reset sequence and return its cycle cost.
    ///
    /// Loads PC from $FFFC/$FFFD, sets S to $FD and P to I plus the unused
    /// bit. A, X and Y are cleared. The stack is not written.
    pub fn reset<B: Bus>(&mut self, bus: &mut B) -> u32 {
        self.regs = Registers::new();
        self.regs.pc = read_vector(bus, RESET_VECTOR);
        debug!("reset, PC=${:04X}", self.regs.pc);

        self.total_cycles += u64::from(INTERRUPT_CYCLES);
        INTERRUPT_CYCLES
    }

    /// Service an interrupt at an instruction boundary.
    ///
    /// Pushes PC and P (B clear), sets I and jumps through the vector.
    /// Returns the cycles taken, or `None` if an IRQ arrived while I was set.
    pub fn interrupt<B: Bus>(&mut self, kind: InterruptKind, bus: &mut B) -> Option<u32> {
        let vector = match kind {
            InterruptKind::Irq if self.regs.p.is_set(I) => return None,
            InterruptKind::Irq => IRQ_VECTOR,
            InterruptKind::Nmi => NMI_VECTOR,
        };

        let return_addr = self.regs.pc;
        self.regs.push_word(bus, return_addr);
        let p = self.regs.p.to_byte_irq();
        self.regs.push(bus, p);
        self.regs.p.set(I);
        self.regs.pc = read_vector(bus, vector);
        debug!(
            "{kind:?} from ${return_addr:04X} to ${:04X}",
            self.regs.pc
        );

        self.total_cycles += u64::from(INTERRUPT_CYCLES);
        Some(INTERRUPT_CYCLES)
    }
}

impl Observable for Mos6502 {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "pc" => Some(self.regs.pc.into()),
            "a" => Some(self.regs.a.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "s" | "sp" => Some(self.regs.s.into()),
            "p" | "status" => Some(self.regs.p.0.into()),
            "flags.c" | "c" => Some(self.regs.p.is_set(C).into()),
            "flags.z" | "z" => Some(self.regs.p.is_set(Z).into()),
            "flags.i" | "i" => Some(self.regs.p.is_set(I).into()),
            "flags.d" | "d" => Some(self.regs.p.is_set(D).into()),
            "flags.v" | "v" => Some(self.regs.p.is_set(V).into()),
            "flags.n" | "n" => Some(self.regs.p.is_set(N).into()),
            "cycles" => Some(self.total_cycles.into()),
            "instructions" => Some(self.instructions.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc",
            "a",
            "x",
            "y",
            "s",
            "p",
            "flags.c",
            "flags.z",
            "flags.i",
            "flags.d",
            "flags.v",
            "flags.n",
            "cycles",
            "instructions",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_core::SimpleBus;

    #[test]
    fn lda_immediate() {
        let mut cpu = Mos6502::new();
        let mut bus = SimpleBus::new();

        bus.load(0x0000, &[0xA9, 0x42]);
        cpu.regs.pc = 0x0000;

        assert_eq!(cpu.step(&mut bus), Ok(2));
        assert_eq!(cpu.regs.a, 0x42);
        assert_eq!(cpu.regs.pc, 0x0002);
    }

    #[test]
    fn sta_zeropage() {
        let mut cpu = Mos6502::new();
        let mut bus = SimpleBus::new();

        cpu.regs.a = 0x55;
        bus.load(0x0000, &[0x85, 0x10]);
        cpu.regs.pc = 0x0000;

        assert_eq!(cpu.step(&mut bus), Ok(3));
        assert_eq!(bus.peek(0x0010), 0x55);
    }

    #[test]
    fn jmp_absolute() {
        let mut cpu = Mos6502::new();
        let mut bus = SimpleBus::new();

        bus.load(0x0000, &[0x4C, 0x34, 0x12]);
        cpu.regs.pc = 0x0000;

        assert_eq!(cpu.step(&mut bus), Ok(3));
        assert_eq!(cpu.regs.pc, 0x1234);
    }

    #[test]
    fn counters_include_reset() {
        let mut cpu = Mos6502::new();
        let mut bus = SimpleBus::new();
        bus.load(0xFFFC, &[0x00, 0x02]);
        bus.load(0x0200, &[0xEA]);

        assert_eq!(cpu.reset(&mut bus), 7);
        cpu.step(&mut bus).expect("NOP is valid");

        assert_eq!(cpu.total_cycles(), 9);
        assert_eq!(cpu.instructions(), 1);
        assert_eq!(cpu.query("cycles"), Some(Value::U64(9)));
    }

    #[test]
    fn observable_paths_all_resolve() {
        let cpu = Mos6502::new();
        for path in cpu.query_paths() {
            assert!(cpu.query(path).is_some(), "{path}");
        }
        assert_eq!(cpu.query("flags.i"), Some(Value::Bool(true)));
        assert_eq!(cpu.query("bogus"), None);
    }

    #[test]
    fn fault_message() {
        let fault = Fault::InvalidOpcode {
            opcode: 0x02,
            address: 0x8000,
        };
        assert_eq!(fault.to_string(), "invalid opcode $02 at $8000");
    }
}
