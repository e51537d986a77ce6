use crate::addressing::AddressMode;
use crate::error::CpuError;
use crate::memory::Memory;
use crate::opcodes::{decode, Instruction, Operation};
use crate::regs::{Flag, Flags, Reg, Registers};

/// MOS 6502-family CPU core.
///
/// Owns its register file, status flags and the full 64 KiB of flat
/// memory by value, so independent instances never share state. Driven
/// by `execute` against a cycle budget, or one instruction at a time
/// through `step`.
pub struct Cpu {
    pub(crate) regs: Registers,
    pub(crate) flags: Flags,
    mem: Memory,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Create a new CPU in the documented power-up state.
    pub fn new() -> Self {
        Self {
            regs: Registers::power_up(),
            flags: Flags::default(),
            mem: Memory::default(),
        }
    }

    /// Restore the power-up state: registers and flags cleared, program
    /// counter at the reset address, memory zeroed. Nothing survives, so
    /// calling it twice is the same as calling it once.
    pub fn reset(&mut self) {
        self.regs = Registers::power_up();
        self.flags = Flags::default();
        self.mem.clear();
        log::debug!("cpu reset: pc=0x{:04X} sp=0x{:02X}", self.regs.pc, self.regs.sp);
    }

    pub fn register(&self, reg: Reg) -> u8 {
        match reg {
            Reg::A => self.regs.a,
            Reg::X => self.regs.x,
            Reg::Y => self.regs.y,
            Reg::Sp => self.regs.sp,
        }
    }

    pub fn set_register(&mut self, reg: Reg, value: u8) {
        match reg {
            Reg::A => self.regs.a = value,
            Reg::X => self.regs.x = value,
            Reg::Y => self.regs.y = value,
            Reg::Sp => self.regs.sp = value,
        }
    }

    pub fn flag(&self, flag: Flag) -> bool {
        self.flags.get(flag)
    }

    /// All flags packed into one byte, in the documented bit order.
    pub fn status_byte(&self) -> u8 {
        self.flags.to_u8()
    }

    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.regs.pc = pc;
    }

    pub fn mem_read(&self, addr: u16) -> u8 {
        self.mem.read8(addr)
    }

    pub fn mem_write(&mut self, addr: u16, value: u8) {
        self.mem.write8(addr, value);
    }

    /// Copy a program image into memory starting at `origin`, wrapping
    /// at the top of the address space. Bootstrap/test convenience; the
    /// program counter is not touched.
    pub fn load_program(&mut self, origin: u16, bytes: &[u8]) {
        self.mem.load(origin, bytes);
    }

    pub(crate) fn fetch8(&mut self) -> u8 {
        let byte = self.mem.read8(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        byte
    }

    pub(crate) fn fetch16(&mut self) -> u16 {
        let lo = u16::from(self.fetch8());
        let hi = u16::from(self.fetch8());
        (hi << 8) | lo
    }

    /// Run the fetch-decode-execute loop until the cycle budget is
    /// exhausted or a fetched byte has no dispatch entry.
    ///
    /// An instruction whose cost drops the remaining budget below zero
    /// still completes; the loop only ever stops between instructions.
    /// Both terminal states (exact boundary and overshoot) leave the CPU
    /// in a well-defined state ready for further calls.
    pub fn execute(&mut self, cycle_budget: u32) -> Result<(), CpuError> {
        let mut remaining = i64::from(cycle_budget);
        while remaining > 0 {
            remaining -= i64::from(self.step()?);
        }
        Ok(())
    }

    /// Execute a single instruction and return the number of cycles it
    /// consumed, the opcode fetch included.
    pub fn step(&mut self) -> Result<u32, CpuError> {
        let pc = self.regs.pc;
        let opcode = self.fetch8();
        let instr = match decode(opcode) {
            Some(instr) => instr,
            None => {
                log::error!("unknown opcode 0x{:02X} at 0x{:04X}", opcode, pc);
                return Err(CpuError::UnknownOpcode { opcode, pc });
            }
        };
        log::trace!(
            "0x{:04X}  0x{:02X}  {:?} {:?}",
            pc,
            opcode,
            instr.operation,
            instr.mode
        );
        self.exec(instr)
    }

    fn exec(&mut self, instr: Instruction) -> Result<u32, CpuError> {
        let mut cycles = instr.cycles;
        match instr.operation {
            Operation::Load(reg) => {
                let (value, crossed) = self.operand_value(instr.mode)?;
                self.set_register(reg, value);
                self.set_zn(value);
                if crossed {
                    cycles += 1;
                }
            }
            Operation::Store(reg) => {
                let value = self.register(reg);
                let resolved = self.operand_address(instr.mode)?;
                self.mem.write8(resolved.addr, value);
            }
            Operation::Transfer { src, dst } => {
                let value = self.register(src);
                self.set_register(dst, value);
                // TXS leaves the flags alone on real hardware.
                if dst != Reg::Sp {
                    self.set_zn(value);
                }
            }
            Operation::Adc => {
                let (value, crossed) = self.operand_value(instr.mode)?;
                self.adc(value);
                if crossed {
                    cycles += 1;
                }
            }
            Operation::And => {
                let (value, crossed) = self.operand_value(instr.mode)?;
                let result = self.regs.a & value;
                self.regs.a = result;
                self.set_zn(result);
                if crossed {
                    cycles += 1;
                }
            }
            Operation::Eor => {
                let (value, crossed) = self.operand_value(instr.mode)?;
                let result = self.regs.a ^ value;
                self.regs.a = result;
                self.set_zn(result);
                if crossed {
                    cycles += 1;
                }
            }
            Operation::Ora => {
                let (value, crossed) = self.operand_value(instr.mode)?;
                let result = self.regs.a | value;
                self.regs.a = result;
                self.set_zn(result);
                if crossed {
                    cycles += 1;
                }
            }
            Operation::Bit => {
                let (value, _) = self.operand_value(instr.mode)?;
                self.flags.zero = self.regs.a & value == 0;
                self.flags.overflow = value & 0x40 != 0;
                self.flags.negative = value & 0x80 != 0;
            }
            Operation::IncMem => {
                let resolved = self.operand_address(instr.mode)?;
                let result = self.mem.read8(resolved.addr).wrapping_add(1);
                self.mem.write8(resolved.addr, result);
                self.set_zn(result);
            }
            Operation::DecMem => {
                let resolved = self.operand_address(instr.mode)?;
                let result = self.mem.read8(resolved.addr).wrapping_sub(1);
                self.mem.write8(resolved.addr, result);
                self.set_zn(result);
            }
            Operation::IncReg(reg) => {
                let result = self.register(reg).wrapping_add(1);
                self.set_register(reg, result);
                self.set_zn(result);
            }
            Operation::DecReg(reg) => {
                let result = self.register(reg).wrapping_sub(1);
                self.set_register(reg, result);
                self.set_zn(result);
            }
            Operation::SetFlag(flag) => self.flags.set(flag, true),
            Operation::ClearFlag(flag) => self.flags.set(flag, false),
            Operation::Asl | Operation::Lsr | Operation::Rol | Operation::Ror => {
                if instr.mode == AddressMode::Accumulator {
                    let result = self.shift(instr.operation, self.regs.a);
                    self.regs.a = result;
                } else {
                    let resolved = self.operand_address(instr.mode)?;
                    let value = self.mem.read8(resolved.addr);
                    let result = self.shift(instr.operation, value);
                    self.mem.write8(resolved.addr, result);
                }
            }
            Operation::Branch(flag, expected) => {
                let offset = self.fetch8() as i8;
                if self.flags.get(flag) == expected {
                    let base = self.regs.pc;
                    let target = base.wrapping_add(offset as u16);
                    cycles += if (target & 0xFF00) != (base & 0xFF00) { 2 } else { 1 };
                    self.regs.pc = target;
                }
            }
            Operation::Nop => {}
        }
        Ok(cycles)
    }

    fn set_zn(&mut self, value: u8) {
        self.flags.zero = value == 0;
        self.flags.negative = value & 0x80 != 0;
    }

    fn adc(&mut self, value: u8) {
        let a = self.regs.a;
        let carry = u8::from(self.flags.carry);
        let sum = u16::from(a) + u16::from(value) + u16::from(carry);
        let result = sum as u8;
        self.flags.carry = sum > 0xFF;
        // Overflow: both operands share a sign and the result does not.
        self.flags.overflow = (a ^ result) & (value ^ result) & 0x80 != 0;
        self.set_zn(result);
        self.regs.a = result;
    }

    /// Shift or rotate one bit. The outgoing bit becomes the new carry;
    /// rotates fold the incoming carry into the vacated bit.
    fn shift(&mut self, operation: Operation, value: u8) -> u8 {
        let carry_in = u8::from(self.flags.carry);
        let (result, carry_out) = match operation {
            Operation::Asl => (value << 1, value & 0x80 != 0),
            Operation::Rol => ((value << 1) | carry_in, value & 0x80 != 0),
            Operation::Lsr => (value >> 1, value & 0x01 != 0),
            Operation::Ror => ((value >> 1) | (carry_in << 7), value & 0x01 != 0),
            _ => unreachable!("not a shift operation: {:?}", operation),
        };
        self.flags.carry = carry_out;
        self.set_zn(result);
        result
    }
}
