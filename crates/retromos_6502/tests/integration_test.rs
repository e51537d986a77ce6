use retromos_6502::{Cpu, CpuError, Flag, Reg};

/// Hand-assembled countdown loop exercising loads, flag ops, addition,
/// register decrement, a backward branch and a store:
///
/// ```text
/// 0x0200  LDX #$05
/// 0x0202  LDA #$00
/// 0x0204  CLC          <-+
/// 0x0205  ADC #$02       |
/// 0x0207  DEX            |
/// 0x0208  BNE $0204    --+
/// 0x020A  STA $10
/// ```
const COUNTDOWN: &[u8] = &[
    0xA2, 0x05, 0xA9, 0x00, 0x18, 0x69, 0x02, 0xCA, 0xD0, 0xFA, 0x85, 0x10,
];

/// Total cycle cost of COUNTDOWN: LDX + LDA, four taken-branch loop
/// iterations, one fall-through iteration, then the store.
const COUNTDOWN_CYCLES: u32 = 2 + 2 + 4 * (2 + 2 + 2 + 3) + (2 + 2 + 2 + 2) + 3;

fn loaded_cpu() -> Cpu {
    let mut cpu = Cpu::new();
    cpu.load_program(0x0200, COUNTDOWN);
    cpu.set_pc(0x0200);
    cpu
}

#[test]
fn countdown_program_accumulates_and_stores() {
    let mut cpu = loaded_cpu();
    cpu.execute(COUNTDOWN_CYCLES).unwrap();

    assert_eq!(cpu.mem_read(0x0010), 0x0A);
    assert_eq!(cpu.register(Reg::A), 0x0A);
    assert_eq!(cpu.register(Reg::X), 0x00);
    assert!(cpu.flag(Flag::Zero));
    assert_eq!(cpu.pc(), 0x020C);
}

#[test]
fn overshooting_budget_reaches_the_same_state() {
    // One cycle short of the exact total: the loop still finishes the
    // final store before noticing the budget is spent.
    let mut exact = loaded_cpu();
    exact.execute(COUNTDOWN_CYCLES).unwrap();

    let mut overshot = loaded_cpu();
    overshot.execute(COUNTDOWN_CYCLES - 1).unwrap();

    assert_eq!(overshot.pc(), exact.pc());
    assert_eq!(overshot.register(Reg::A), exact.register(Reg::A));
    assert_eq!(overshot.mem_read(0x0010), exact.mem_read(0x0010));
}

#[test]
fn running_past_the_program_hits_an_unknown_opcode() {
    let mut cpu = loaded_cpu();
    let err = cpu.execute(1_000).unwrap_err();
    assert_eq!(
        err,
        CpuError::UnknownOpcode {
            opcode: 0x00,
            pc: 0x020C
        }
    );
}

#[test]
fn reset_recovers_from_a_fatal_error() {
    let mut cpu = loaded_cpu();
    cpu.execute(1_000).unwrap_err();

    cpu.reset();
    cpu.load_program(0x0200, COUNTDOWN);
    cpu.set_pc(0x0200);
    cpu.execute(COUNTDOWN_CYCLES).unwrap();
    assert_eq!(cpu.mem_read(0x0010), 0x0A);
}

#[test]
fn single_stepping_matches_the_documented_cycle_totals() {
    let mut cpu = loaded_cpu();
    let mut total = 0u32;
    loop {
        match cpu.step() {
            Ok(cycles) => total += cycles,
            Err(CpuError::UnknownOpcode { .. }) => break,
            Err(err) => panic!("unexpected error: {}", err),
        }
    }
    assert_eq!(total, COUNTDOWN_CYCLES);
}
