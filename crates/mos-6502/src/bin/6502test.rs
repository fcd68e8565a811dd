//! Klaus Dormann's 6502 functional test suite runner.
//!
//! Usage: `6502test [binary] [start] [success]`
//!
//! The binary is loaded at $0000 and run from `start` (default $0400) until
//! PC stops moving. Trapping at `success` (default $3469) is a pass, any
//! other trap or an undocumented opcode is a failure.
//!
//! Download the test from: https://github.com/Klaus2m5/6502_65C02_functional_tests

use std::fs;
use std::process::ExitCode;
use std::time::Instant;

use emu_core::SimpleBus;
use mos_6502::{Mos6502, disassemble};

const DEFAULT_PATH: &str = "test-roms/6502_functional_test.bin";
const DEFAULT_START: u16 = 0x0400;
const DEFAULT_SUCCESS: u16 = 0x3469;

/// Parse `$0400`, `0x0400` or bare `0400` as hex.
fn parse_address(arg: &str) -> Option<u16> {
    let digits = arg
        .strip_prefix('$')
        .or_else(|| arg.strip_prefix("0x"))
        .unwrap_or(arg);
    u16::from_str_radix(digits, 16).ok()
}

fn address_arg(arg: Option<String>, default: u16) -> Result<u16, String> {
    match arg {
        None => Ok(default),
        Some(text) => parse_address(&text).ok_or_else(|| format!("bad address: {text}")),
    }
}

fn dump_state(cpu: &Mos6502, bus: &mut SimpleBus) {
    let pc = cpu.pc();
    println!("  {}", disassemble(bus, pc).text);
    println!(
        "  PC=${pc:04X} A=${:02X} X=${:02X} Y=${:02X} SP=${:02X} P=${:02X}",
        cpu.regs.a, cpu.regs.x, cpu.regs.y, cpu.regs.s, cpu.regs.p.0
    );
    println!("  Instructions executed: {}", cpu.instructions());

    print!("  Memory around PC:");
    let start = pc.saturating_sub(8);
    for i in 0..16 {
        print!(" {:02X}", bus.peek(start.wrapping_add(i)));
    }
    println!();
}

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let test_path = args.next().unwrap_or_else(|| DEFAULT_PATH.to_string());

    let (start, success) = match (
        address_arg(args.next(), DEFAULT_START),
        address_arg(args.next(), DEFAULT_SUCCESS),
    ) {
        (Ok(start), Ok(success)) => (start, success),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let test_data = match fs::read(&test_path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to load test ROM {test_path}: {e}");
            eprintln!();
            eprintln!("To run the 6502 functional test:");
            eprintln!("1. Download from: https://github.com/Klaus2m5/6502_65C02_functional_tests");
            eprintln!("2. Assemble 6502_functional_test.a65 with origin at $0000");
            eprintln!("3. Place the binary at {DEFAULT_PATH}");
            return ExitCode::FAILURE;
        }
    };

    println!("Running 6502 functional test suite...");
    println!("Test binary: {test_path} ({} bytes)", test_data.len());
    println!("Start ${start:04X}, success trap ${success:04X}");
    println!();

    let mut cpu = Mos6502::new();
    let mut bus = SimpleBus::new();
    bus.load(0x0000, &test_data);
    cpu.regs.pc = start;

    let start_time = Instant::now();

    loop {
        let pc = cpu.pc();
        if let Err(fault) = cpu.step(&mut bus) {
            println!("FAULT: {fault}");
            dump_state(&cpu, &mut bus);
            return ExitCode::FAILURE;
        }

        if cpu.pc() != pc {
            continue;
        }

        if pc == success {
            let elapsed = start_time.elapsed();
            println!("SUCCESS! All tests passed.");
            println!();
            println!("Statistics:");
            println!("  Instructions executed: {}", cpu.instructions());
            println!("  Total cycles: {}", cpu.total_cycles());
            println!("  Time elapsed: {elapsed:?}");
            println!(
                "  Effective speed: {:.2} MHz",
                cpu.total_cycles() as f64 / elapsed.as_secs_f64() / 1_000_000.0
            );
            return ExitCode::SUCCESS;
        }

        println!("TRAP detected at PC=${pc:04X}");
        dump_state(&cpu, &mut bus);
        return ExitCode::FAILURE;
    }
}
