use crate::addressing::AddressMode;
use crate::regs::{Flag, Reg};

/// Operation families of the implemented 6502 subset.
///
/// Families are parametrized by register and flag instead of spelling
/// out one variant per mnemonic, so the executor has one arm per
/// behavior rather than one per opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// LDA/LDX/LDY
    Load(Reg),
    /// STA/STX/STY
    Store(Reg),
    /// TAX/TAY/TSX/TXA/TXS/TYA
    Transfer { src: Reg, dst: Reg },
    /// ADC
    Adc,
    /// AND
    And,
    /// EOR
    Eor,
    /// ORA
    Ora,
    /// BIT
    Bit,
    /// INC
    IncMem,
    /// DEC
    DecMem,
    /// INX/INY
    IncReg(Reg),
    /// DEX/DEY
    DecReg(Reg),
    /// SEC/SED/SEI
    SetFlag(Flag),
    /// CLC/CLD/CLI/CLV
    ClearFlag(Flag),
    /// ASL
    Asl,
    /// LSR
    Lsr,
    /// ROL
    Rol,
    /// ROR
    Ror,
    /// BPL/BMI/BVC/BVS/BCC/BCS/BNE/BEQ: branch when the named flag
    /// equals the expected value.
    Branch(Flag, bool),
    /// NOP
    Nop,
}

/// A decoded instruction: what to do, where the operand lives, and the
/// base cycle cost with the opcode fetch included.
///
/// Loads and accumulator arithmetic with an absolute-indexed mode cost
/// one extra cycle when index arithmetic crosses a page; the executor
/// adds it on top of `cycles`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub operation: Operation,
    pub mode: AddressMode,
    pub cycles: u32,
}

const fn ins(operation: Operation, mode: AddressMode, cycles: u32) -> Instruction {
    Instruction {
        operation,
        mode,
        cycles,
    }
}

/// Decode one opcode byte.
///
/// This match is the dispatch table: a total mapping over the
/// implemented subset, `None` for every byte outside it. Indirect
/// opcodes (x1 column) are intentionally absent.
pub fn decode(opcode: u8) -> Option<Instruction> {
    use AddressMode::*;
    use Operation::*;

    Some(match opcode {
        0xA9 => ins(Load(Reg::A), Immediate, 2),
        0xA5 => ins(Load(Reg::A), ZeroPage, 3),
        0xB5 => ins(Load(Reg::A), ZeroPageX, 4),
        0xAD => ins(Load(Reg::A), Absolute, 4),
        0xBD => ins(Load(Reg::A), AbsoluteX, 4),
        0xB9 => ins(Load(Reg::A), AbsoluteY, 4),

        0xA2 => ins(Load(Reg::X), Immediate, 2),
        0xA6 => ins(Load(Reg::X), ZeroPage, 3),
        0xB6 => ins(Load(Reg::X), ZeroPageY, 4),
        0xAE => ins(Load(Reg::X), Absolute, 4),
        0xBE => ins(Load(Reg::X), AbsoluteY, 4),

        0xA0 => ins(Load(Reg::Y), Immediate, 2),
        0xA4 => ins(Load(Reg::Y), ZeroPage, 3),
        0xB4 => ins(Load(Reg::Y), ZeroPageX, 4),
        0xAC => ins(Load(Reg::Y), Absolute, 4),
        0xBC => ins(Load(Reg::Y), AbsoluteX, 4),

        0x85 => ins(Store(Reg::A), ZeroPage, 3),
        0x95 => ins(Store(Reg::A), ZeroPageX, 4),
        0x8D => ins(Store(Reg::A), Absolute, 4),
        0x9D => ins(Store(Reg::A), AbsoluteX, 5),
        0x99 => ins(Store(Reg::A), AbsoluteY, 5),

        0x86 => ins(Store(Reg::X), ZeroPage, 3),
        0x96 => ins(Store(Reg::X), ZeroPageY, 4),
        0x8E => ins(Store(Reg::X), Absolute, 4),

        0x84 => ins(Store(Reg::Y), ZeroPage, 3),
        0x94 => ins(Store(Reg::Y), ZeroPageX, 4),
        0x8C => ins(Store(Reg::Y), Absolute, 4),

        0xAA => ins(Transfer { src: Reg::A, dst: Reg::X }, Implied, 2),
        0xA8 => ins(Transfer { src: Reg::A, dst: Reg::Y }, Implied, 2),
        0xBA => ins(Transfer { src: Reg::Sp, dst: Reg::X }, Implied, 2),
        0x8A => ins(Transfer { src: Reg::X, dst: Reg::A }, Implied, 2),
        0x9A => ins(Transfer { src: Reg::X, dst: Reg::Sp }, Implied, 2),
        0x98 => ins(Transfer { src: Reg::Y, dst: Reg::A }, Implied, 2),

        0x69 => ins(Adc, Immediate, 2),
        0x65 => ins(Adc, ZeroPage, 3),
        0x75 => ins(Adc, ZeroPageX, 4),
        0x6D => ins(Adc, Absolute, 4),
        0x7D => ins(Adc, AbsoluteX, 4),
        0x79 => ins(Adc, AbsoluteY, 4),

        0x29 => ins(And, Immediate, 2),
        0x25 => ins(And, ZeroPage, 3),
        0x35 => ins(And, ZeroPageX, 4),
        0x2D => ins(And, Absolute, 4),
        0x3D => ins(And, AbsoluteX, 4),
        0x39 => ins(And, AbsoluteY, 4),

        0x49 => ins(Eor, Immediate, 2),
        0x45 => ins(Eor, ZeroPage, 3),
        0x55 => ins(Eor, ZeroPageX, 4),
        0x4D => ins(Eor, Absolute, 4),
        0x5D => ins(Eor, AbsoluteX, 4),
        0x59 => ins(Eor, AbsoluteY, 4),

        0x09 => ins(Ora, Immediate, 2),
        0x05 => ins(Ora, ZeroPage, 3),
        0x15 => ins(Ora, ZeroPageX, 4),
        0x0D => ins(Ora, Absolute, 4),
        0x1D => ins(Ora, AbsoluteX, 4),
        0x19 => ins(Ora, AbsoluteY, 4),

        0x24 => ins(Bit, ZeroPage, 3),
        0x2C => ins(Bit, Absolute, 4),

        0xE6 => ins(IncMem, ZeroPage, 5),
        0xF6 => ins(IncMem, ZeroPageX, 6),
        0xEE => ins(IncMem, Absolute, 6),
        0xFE => ins(IncMem, AbsoluteX, 7),

        0xC6 => ins(DecMem, ZeroPage, 5),
        0xD6 => ins(DecMem, ZeroPageX, 6),
        0xCE => ins(DecMem, Absolute, 6),
        0xDE => ins(DecMem, AbsoluteX, 7),

        0xE8 => ins(IncReg(Reg::X), Implied, 2),
        0xC8 => ins(IncReg(Reg::Y), Implied, 2),
        0xCA => ins(DecReg(Reg::X), Implied, 2),
        0x88 => ins(DecReg(Reg::Y), Implied, 2),

        0x38 => ins(SetFlag(Flag::Carry), Implied, 2),
        0xF8 => ins(SetFlag(Flag::Decimal), Implied, 2),
        0x78 => ins(SetFlag(Flag::InterruptDisable), Implied, 2),

        0x18 => ins(ClearFlag(Flag::Carry), Implied, 2),
        0xD8 => ins(ClearFlag(Flag::Decimal), Implied, 2),
        0x58 => ins(ClearFlag(Flag::InterruptDisable), Implied, 2),
        0xB8 => ins(ClearFlag(Flag::Overflow), Implied, 2),

        0x0A => ins(Asl, Accumulator, 2),
        0x06 => ins(Asl, ZeroPage, 5),
        0x16 => ins(Asl, ZeroPageX, 6),
        0x0E => ins(Asl, Absolute, 6),
        0x1E => ins(Asl, AbsoluteX, 7),

        0x4A => ins(Lsr, Accumulator, 2),
        0x46 => ins(Lsr, ZeroPage, 5),
        0x56 => ins(Lsr, ZeroPageX, 6),
        0x4E => ins(Lsr, Absolute, 6),
        0x5E => ins(Lsr, AbsoluteX, 7),

        0x2A => ins(Rol, Accumulator, 2),
        0x26 => ins(Rol, ZeroPage, 5),
        0x36 => ins(Rol, ZeroPageX, 6),
        0x2E => ins(Rol, Absolute, 6),
        0x3E => ins(Rol, AbsoluteX, 7),

        0x6A => ins(Ror, Accumulator, 2),
        0x66 => ins(Ror, ZeroPage, 5),
        0x76 => ins(Ror, ZeroPageX, 6),
        0x6E => ins(Ror, Absolute, 6),
        0x7E => ins(Ror, AbsoluteX, 7),

        0x10 => ins(Branch(Flag::Negative, false), Relative, 2),
        0x30 => ins(Branch(Flag::Negative, true), Relative, 2),
        0x50 => ins(Branch(Flag::Overflow, false), Relative, 2),
        0x70 => ins(Branch(Flag::Overflow, true), Relative, 2),
        0x90 => ins(Branch(Flag::Carry, false), Relative, 2),
        0xB0 => ins(Branch(Flag::Carry, true), Relative, 2),
        0xD0 => ins(Branch(Flag::Zero, false), Relative, 2),
        0xF0 => ins(Branch(Flag::Zero, true), Relative, 2),

        0xEA => ins(Nop, Implied, 2),

        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_documented_opcodes() {
        let lda = decode(0xA9).unwrap();
        assert_eq!(lda.operation, Operation::Load(Reg::A));
        assert_eq!(lda.mode, AddressMode::Immediate);
        assert_eq!(lda.cycles, 2);

        let sta = decode(0x9D).unwrap();
        assert_eq!(sta.operation, Operation::Store(Reg::A));
        assert_eq!(sta.mode, AddressMode::AbsoluteX);
        assert_eq!(sta.cycles, 5);

        let txs = decode(0x9A).unwrap();
        assert_eq!(
            txs.operation,
            Operation::Transfer {
                src: Reg::X,
                dst: Reg::Sp
            }
        );

        let beq = decode(0xF0).unwrap();
        assert_eq!(beq.operation, Operation::Branch(Flag::Zero, true));
        assert_eq!(beq.mode, AddressMode::Relative);
    }

    #[test]
    fn unknown_bytes_decode_to_none() {
        // BRK, JMP, JSR, RTS and the indirect columns are out of scope.
        for opcode in [0x00, 0x4C, 0x20, 0x60, 0xA1, 0xB1, 0x61, 0x71, 0xFF] {
            assert_eq!(decode(opcode), None, "opcode {:#04X}", opcode);
        }
    }

    #[test]
    fn implemented_subset_has_expected_size() {
        let implemented = (0..=0xFFu16)
            .filter(|op| decode(*op as u8).is_some())
            .count();
        assert_eq!(implemented, 107);
    }

    #[test]
    fn no_dispatch_entry_uses_an_indirect_mode() {
        for op in 0..=0xFFu16 {
            if let Some(instr) = decode(op as u8) {
                assert!(
                    instr.mode != AddressMode::IndirectX && instr.mode != AddressMode::IndirectY,
                    "opcode {:#04X} uses {:?}",
                    op,
                    instr.mode
                );
            }
        }
    }
}
