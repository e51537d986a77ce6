//! Decode/execute core of a MOS 6502-family 8-bit microprocessor.
//!
//! The crate models the register file, the processor status flags, a
//! flat 64 KiB memory and a cycle-accurate fetch-decode-execute loop
//! over the documented addressing modes. Front-ends, program loaders
//! and peripherals live outside this crate; the CPU only exposes its
//! registers, flags and memory.

mod addressing;
mod cpu;
mod memory;
mod opcodes;
mod regs;

pub use addressing::AddressMode;
pub use cpu::Cpu;
pub use error::CpuError;
pub use memory::{Memory, MEMORY_SIZE};
pub use opcodes::{decode, Instruction, Operation};
pub use regs::{Flag, Flags, Reg, Registers, RESET_PC};

pub mod error {
    use crate::addressing::AddressMode;

    /// Fatal conditions raised by the execution loop and the
    /// addressing-mode resolver.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum CpuError {
        /// A fetched byte has no entry in the dispatch table. The
        /// program counter has already advanced past the byte; nothing
        /// else has mutated.
        UnknownOpcode { opcode: u8, pc: u16 },
        /// A declared-but-unimplemented addressing mode was resolved.
        /// No dispatch entry uses these modes, so this is only
        /// reachable by driving the resolver directly.
        UnimplementedAddressing(AddressMode),
    }

    impl std::error::Error for CpuError {}

    impl std::fmt::Display for CpuError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                CpuError::UnknownOpcode { opcode, pc } => {
                    write!(f, "unknown opcode 0x{:02X} at 0x{:04X}", opcode, pc)
                }
                CpuError::UnimplementedAddressing(mode) => {
                    write!(f, "addressing mode {:?} is declared but not implemented", mode)
                }
            }
        }
    }
}
