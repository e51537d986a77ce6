use anyhow::{Context, Result};
use retromos_6502::{Cpu, Reg};

/// Hand-assembled demo program, loaded at `DEMO_ORIGIN`:
///
/// ```text
/// 0x0600  LDA #$01
/// 0x0602  LDX #$FB
/// 0x0604  ASL A      <-+
/// 0x0605  INX          |
/// 0x0606  BNE $0604  --+
/// 0x0608  STA $00
/// ```
///
/// Doubles the accumulator while X counts up to zero, then stores the
/// result (0x20) at address 0x0000.
const DEMO_PROGRAM: &[u8] = &[
    0xA9, 0x01, 0xA2, 0xFB, 0x0A, 0xE8, 0xD0, 0xFC, 0x85, 0x00,
];

const DEMO_ORIGIN: u16 = 0x0600;

/// Exact cycle cost of the demo program; the default budget stops the
/// core right at its last instruction. A larger budget runs into the
/// zeroed memory past the program and surfaces the unknown-opcode error.
const DEMO_CYCLES: u32 = 41;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let cycles = match args.next() {
        Some(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("invalid cycle budget '{}'", raw))?,
        None => DEMO_CYCLES,
    };
    let program = match args.next() {
        Some(path) => {
            log::info!("Loading program from '{}'", path);
            std::fs::read(&path).with_context(|| format!("failed to read program '{}'", path))?
        }
        None => {
            log::info!("No program path provided, running the built-in demo");
            DEMO_PROGRAM.to_vec()
        }
    };

    let mut cpu = Cpu::new();
    cpu.load_program(DEMO_ORIGIN, &program);
    cpu.set_pc(DEMO_ORIGIN);

    log::info!("Executing with a budget of {} cycles", cycles);
    cpu.execute(cycles)?;

    println!(
        "A=0x{:02X} X=0x{:02X} Y=0x{:02X} SP=0x{:02X} PC=0x{:04X} P=0b{:08b}",
        cpu.register(Reg::A),
        cpu.register(Reg::X),
        cpu.register(Reg::Y),
        cpu.register(Reg::Sp),
        cpu.pc(),
        cpu.status_byte(),
    );
    Ok(())
}
