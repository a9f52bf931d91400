use super::{ExitCode, Processor};
use crate::constants;
use crate::instruction::{self, InstructionLine, Opcode, Semantics};
use crate::{Cell, Word};

pub(super) enum TickResult {
    Next,
    Jump(usize),
    Stop(ExitCode),
}

impl Processor {
    pub(super) fn tick(&mut self, word: Word) -> TickResult {
        match instruction::decode(word) {
            Some(instr) => self
                .execute(&instr)
                .unwrap_or_else(TickResult::Stop),
            None => TickResult::Stop(ExitCode::UnknownInstruction),
        }
    }

    fn execute(&mut self, instr: &InstructionLine) -> Result<TickResult, ExitCode> {
        match instr.op {
            Opcode::NOP => {}

            Opcode::MOV => {
                let value = self.src_value(instr)?;
                self.write_dst(instr, value)?;
            }

            Opcode::PSH => {
                let value = if instr.sem.contains(Semantics::DST_REG) {
                    self.registers[reg_slot(instr.dst)?]
                } else if instr.sem.contains(Semantics::DST_MEM) {
                    self.mem_read(instr.dst)?
                } else {
                    instr.src
                };
                self.push(value)?;
            }

            Opcode::POP => {
                let value = self.pop()?;
                if instr.sem.contains(Semantics::DST_REG) {
                    self.registers[reg_slot(instr.dst)?] = value;
                } else if instr.sem.contains(Semantics::DST_MEM) {
                    self.mem_write(instr.dst, value)?;
                } else {
                    return Err(ExitCode::UnknownInstruction);
                }
            }

            Opcode::ADD => self.binary_op(instr, Cell::wrapping_add)?,
            Opcode::SUB => self.binary_op(instr, Cell::wrapping_sub)?,
            Opcode::MUL => self.binary_op(instr, Cell::wrapping_mul)?,

            Opcode::DIV => {
                let divisor = self.src_value(instr)?;
                if divisor == 0 {
                    return Err(ExitCode::DivisionByZero);
                }
                let value = self.read_dst(instr)?.wrapping_div(divisor);
                self.write_dst(instr, value)?;
            }

            Opcode::MOD => {
                let divisor = self.src_value(instr)?;
                if divisor == 0 {
                    return Err(ExitCode::DivisionByZero);
                }
                let value = self.read_dst(instr)?.wrapping_rem(divisor);
                self.write_dst(instr, value)?;
            }

            Opcode::INC => {
                let value = self.read_dst(instr)?.wrapping_add(1);
                self.write_dst(instr, value)?;
            }

            Opcode::DEC => {
                let value = self.read_dst(instr)?.wrapping_sub(1);
                self.write_dst(instr, value)?;
            }

            Opcode::AND => self.register_op(instr, |d, s| d & s)?,
            Opcode::BOR => self.register_op(instr, |d, s| d | s)?,
            Opcode::XOR => self.register_op(instr, |d, s| d ^ s)?,

            // Arithmetic negation; the mnemonic is historical.
            Opcode::NOT => self.register_op(instr, |_, s| s.wrapping_neg())?,

            Opcode::SHL => self.register_op(instr, |d, s| d.wrapping_shl(s as u32))?,
            Opcode::SHR => self.register_op(instr, |d, s| d.wrapping_shr(s as u32))?,

            Opcode::CLF => self.flags.clear(),

            Opcode::CMP => {
                let dst = self.read_dst(instr)?;
                let src = self.src_value(instr)?;
                self.flags.compare(dst, src);
            }

            Opcode::JMP => return Ok(self.jump_if(true, instr)),
            Opcode::JEQ => return Ok(self.jump_if(self.flags.zero(), instr)),
            Opcode::JNE => return Ok(self.jump_if(!self.flags.zero(), instr)),
            Opcode::JLE => {
                return Ok(self.jump_if(self.flags.zero() || self.flags.negative(), instr))
            }
            Opcode::JLT => {
                return Ok(self.jump_if(!self.flags.zero() && self.flags.negative(), instr))
            }
            Opcode::JGE => {
                return Ok(self.jump_if(self.flags.zero() || self.flags.positive(), instr))
            }
            Opcode::JGT => {
                return Ok(self.jump_if(!self.flags.zero() && self.flags.positive(), instr))
            }

            Opcode::CALL => {
                // pc has already advanced past this instruction; that is
                // the return address.
                self.push(self.pc as Cell)?;
                return Ok(TickResult::Jump(instr.dst as usize));
            }

            Opcode::RET => {
                let target = self.pop()?;
                if target < 0 {
                    return Err(ExitCode::BadMemoryAccess);
                }
                return Ok(TickResult::Jump(target as usize));
            }

            Opcode::SYSCALL => {
                let Processor {
                    kernel,
                    registers,
                    memory,
                    ..
                } = self;
                if !kernel.dispatch(registers, memory) {
                    return Err(ExitCode::BadMemoryAccess);
                }
            }

            Opcode::HLT => return Ok(TickResult::Stop(ExitCode::Halted)),
        }

        Ok(TickResult::Next)
    }

    /// Resolves the source operand per the semantic tag. Immediates arrive
    /// already sign-extended by the decoder.
    fn src_value(&self, instr: &InstructionLine) -> Result<Cell, ExitCode> {
        if instr.sem.contains(Semantics::SRC_REG) {
            Ok(self.registers[reg_slot(instr.src)?])
        } else if instr.sem.contains(Semantics::SRC_MEM) {
            self.mem_read(instr.src)
        } else if instr.sem.contains(Semantics::SRC_IREG) {
            let address = self.registers[reg_slot(instr.src)?];
            self.mem_read(address)
        } else {
            Ok(instr.src)
        }
    }

    fn read_dst(&self, instr: &InstructionLine) -> Result<Cell, ExitCode> {
        if instr.sem.contains(Semantics::DST_REG) {
            Ok(self.registers[reg_slot(instr.dst)?])
        } else if instr.sem.contains(Semantics::DST_MEM) {
            self.mem_read(instr.dst)
        } else {
            Err(ExitCode::UnknownInstruction)
        }
    }

    /// Writes through the destination reference and updates the flags from
    /// the stored value.
    fn write_dst(&mut self, instr: &InstructionLine, value: Cell) -> Result<(), ExitCode> {
        if instr.sem.contains(Semantics::DST_REG) {
            self.registers[reg_slot(instr.dst)?] = value;
        } else if instr.sem.contains(Semantics::DST_MEM) {
            self.mem_write(instr.dst, value)?;
        } else {
            return Err(ExitCode::UnknownInstruction);
        }
        self.flags.set_from(value);
        Ok(())
    }

    fn binary_op<F>(&mut self, instr: &InstructionLine, op: F) -> Result<(), ExitCode>
    where
        F: Fn(Cell, Cell) -> Cell,
    {
        let src = self.src_value(instr)?;
        let value = op(self.read_dst(instr)?, src);
        self.write_dst(instr, value)
    }

    /// Bitwise and shift instructions operate on registers only and leave
    /// the flags untouched.
    fn register_op<F>(&mut self, instr: &InstructionLine, op: F) -> Result<(), ExitCode>
    where
        F: Fn(Cell, Cell) -> Cell,
    {
        let dst = reg_slot(instr.dst)?;
        let src = reg_slot(instr.src)?;
        self.registers[dst] = op(self.registers[dst], self.registers[src]);
        Ok(())
    }

    fn mem_read(&self, address: Cell) -> Result<Cell, ExitCode> {
        if address < 0 {
            return Err(ExitCode::BadMemoryAccess);
        }
        self.memory
            .read(address as usize)
            .ok_or(ExitCode::BadMemoryAccess)
    }

    fn mem_write(&mut self, address: Cell, value: Cell) -> Result<(), ExitCode> {
        if address >= 0 && self.memory.write(address as usize, value) {
            Ok(())
        } else {
            Err(ExitCode::BadMemoryAccess)
        }
    }

    fn push(&mut self, value: Cell) -> Result<(), ExitCode> {
        if self.sp == constants::STACK_SIZE {
            return Err(ExitCode::StackOverflow);
        }
        self.stack[self.sp] = value;
        self.sp += 1;
        Ok(())
    }

    fn pop(&mut self) -> Result<Cell, ExitCode> {
        if self.sp == 0 {
            return Err(ExitCode::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }

    fn jump_if(&self, condition: bool, instr: &InstructionLine) -> TickResult {
        if condition {
            TickResult::Jump(instr.dst as usize)
        } else {
            TickResult::Next
        }
    }
}

fn reg_slot(operand: Cell) -> Result<usize, ExitCode> {
    // A malformed register index can only come from a hand-built word.
    if operand >= 0 && (operand as usize) < constants::REGISTER_COUNT {
        Ok(operand as usize)
    } else {
        Err(ExitCode::UnknownInstruction)
    }
}
