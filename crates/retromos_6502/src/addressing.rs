use crate::cpu::Cpu;
use crate::error::CpuError;

/// Addressing modes of the 6502 family.
///
/// `IndirectX` and `IndirectY` are declared for completeness but have no
/// dispatch entry; resolving one is an explicit error, never a silent
/// no-op. `Relative` is consumed by the branch family only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressMode {
    Accumulator,
    Implied,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Relative,
    IndirectX,
    IndirectY,
}

/// An effective address plus whether index arithmetic crossed a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub addr: u16,
    pub page_crossed: bool,
}

impl Resolved {
    fn at(addr: u16) -> Self {
        Self {
            addr,
            page_crossed: false,
        }
    }
}

impl Cpu {
    /// Resolve a load-style operand: the value the instruction operates
    /// on, plus the page-crossed indicator for cycle accounting.
    ///
    /// Consumes the instruction's operand bytes at the program counter.
    pub(crate) fn operand_value(&mut self, mode: AddressMode) -> Result<(u8, bool), CpuError> {
        match mode {
            AddressMode::Immediate => Ok((self.fetch8(), false)),
            _ => {
                let resolved = self.operand_address(mode)?;
                Ok((self.mem_read(resolved.addr), resolved.page_crossed))
            }
        }
    }

    /// Resolve a store-style operand: the effective address an
    /// instruction writes through (stores, memory increments, shifts).
    ///
    /// Consumes the instruction's operand bytes at the program counter.
    pub(crate) fn operand_address(&mut self, mode: AddressMode) -> Result<Resolved, CpuError> {
        match mode {
            AddressMode::ZeroPage => {
                let zp = self.fetch8();
                Ok(Resolved::at(u16::from(zp)))
            }
            // Zero-page indexing wraps within page zero.
            AddressMode::ZeroPageX => {
                let zp = self.fetch8();
                let x = self.regs.x;
                Ok(Resolved::at(u16::from(zp.wrapping_add(x))))
            }
            AddressMode::ZeroPageY => {
                let zp = self.fetch8();
                let y = self.regs.y;
                Ok(Resolved::at(u16::from(zp.wrapping_add(y))))
            }
            AddressMode::Absolute => {
                let base = self.fetch16();
                Ok(Resolved::at(base))
            }
            AddressMode::AbsoluteX => {
                let base = self.fetch16();
                let x = self.regs.x;
                Ok(Self::indexed(base, x))
            }
            AddressMode::AbsoluteY => {
                let base = self.fetch16();
                let y = self.regs.y;
                Ok(Self::indexed(base, y))
            }
            AddressMode::IndirectX | AddressMode::IndirectY => {
                Err(CpuError::UnimplementedAddressing(mode))
            }
            AddressMode::Accumulator | AddressMode::Implied | AddressMode::Immediate
            | AddressMode::Relative => {
                // The dispatch table never pairs these with an
                // address-style resolution.
                unreachable!("no effective address for {:?}", mode)
            }
        }
    }

    /// Index a 16-bit base address, masked to 16 bits by wrapping.
    ///
    /// A page is crossed exactly when the low-byte sum overflows, i.e.
    /// when the effective address lands in a different 256-byte page
    /// than the base.
    fn indexed(base: u16, index: u8) -> Resolved {
        let addr = base.wrapping_add(u16::from(index));
        Resolved {
            addr,
            page_crossed: (addr & 0xFF00) != (base & 0xFF00),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu_with_operands(bytes: &[u8]) -> Cpu {
        let mut cpu = Cpu::new();
        cpu.load_program(cpu.pc(), bytes);
        cpu
    }

    #[test]
    fn immediate_reads_byte_at_pc() {
        let mut cpu = cpu_with_operands(&[0x42]);
        let pc = cpu.pc();
        let (value, crossed) = cpu.operand_value(AddressMode::Immediate).unwrap();
        assert_eq!(value, 0x42);
        assert!(!crossed);
        assert_eq!(cpu.pc(), pc.wrapping_add(1));
    }

    #[test]
    fn zero_page_indexed_wraps_within_page_zero() {
        let mut cpu = cpu_with_operands(&[0xFF]);
        cpu.set_register(crate::Reg::X, 0x02);
        let resolved = cpu.operand_address(AddressMode::ZeroPageX).unwrap();
        assert_eq!(resolved.addr, 0x0001);
        assert!(!resolved.page_crossed);
    }

    #[test]
    fn zero_page_y_uses_y_index() {
        let mut cpu = cpu_with_operands(&[0x10]);
        cpu.set_register(crate::Reg::Y, 0x05);
        let resolved = cpu.operand_address(AddressMode::ZeroPageY).unwrap();
        assert_eq!(resolved.addr, 0x0015);
    }

    #[test]
    fn absolute_reads_little_endian_address() {
        let mut cpu = cpu_with_operands(&[0x34, 0x12]);
        let resolved = cpu.operand_address(AddressMode::Absolute).unwrap();
        assert_eq!(resolved.addr, 0x1234);
        assert!(!resolved.page_crossed);
    }

    #[test]
    fn absolute_indexed_reports_page_cross() {
        let mut cpu = cpu_with_operands(&[0xFF, 0x20]);
        cpu.set_register(crate::Reg::X, 0x01);
        let resolved = cpu.operand_address(AddressMode::AbsoluteX).unwrap();
        assert_eq!(resolved.addr, 0x2100);
        assert!(resolved.page_crossed);
    }

    #[test]
    fn absolute_indexed_same_page_does_not_cross() {
        let mut cpu = cpu_with_operands(&[0x10, 0x20]);
        cpu.set_register(crate::Reg::Y, 0x01);
        let resolved = cpu.operand_address(AddressMode::AbsoluteY).unwrap();
        assert_eq!(resolved.addr, 0x2011);
        assert!(!resolved.page_crossed);
    }

    #[test]
    fn absolute_indexed_masks_to_16_bits() {
        let mut cpu = cpu_with_operands(&[0xFF, 0xFF]);
        cpu.set_register(crate::Reg::X, 0x02);
        let resolved = cpu.operand_address(AddressMode::AbsoluteX).unwrap();
        assert_eq!(resolved.addr, 0x0001);
        assert!(resolved.page_crossed);
    }

    #[test]
    fn indirect_modes_are_rejected_explicitly() {
        let mut cpu = cpu_with_operands(&[0x00]);
        assert_eq!(
            cpu.operand_address(AddressMode::IndirectX),
            Err(CpuError::UnimplementedAddressing(AddressMode::IndirectX))
        );
        assert_eq!(
            cpu.operand_address(AddressMode::IndirectY),
            Err(CpuError::UnimplementedAddressing(AddressMode::IndirectY))
        );
    }
}
