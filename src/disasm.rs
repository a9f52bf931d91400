//! Debug rendering of encoded instructions.

use crate::instruction::{decode, InstructionLine, Opcode, Semantics};
use crate::Word;
use std::fmt::Write;

static REG_NAMES: [&str; 4] = ["AX", "BX", "CX", "DX"];

/// Operand template of an opcode: what the destination field carries.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Template {
    /// No operands are ever rendered (NOP, CLF, RET, SYSCALL, HLT).
    None,
    /// The destination is a code address (the jump family and CALL).
    Target,
    /// Operands follow the semantic tag.
    Operands,
}

fn template(op: Opcode) -> Template {
    match op {
        Opcode::NOP | Opcode::CLF | Opcode::RET | Opcode::SYSCALL | Opcode::HLT => Template::None,
        Opcode::JMP
        | Opcode::JEQ
        | Opcode::JNE
        | Opcode::JLE
        | Opcode::JLT
        | Opcode::JGE
        | Opcode::JGT
        | Opcode::CALL => Template::Target,
        _ => Template::Operands,
    }
}

fn reg_name(operand: i64) -> &'static str {
    REG_NAMES
        .get(operand.max(0) as usize)
        .copied()
        .unwrap_or("R?")
}

fn render(instr: &InstructionLine) -> String {
    let name = instr.op.to_string();

    match template(instr.op) {
        Template::None => name,
        Template::Target => format!("{} 0x{:04X}", name, instr.dst),
        Template::Operands => {
            let sem = instr.sem;
            if sem == Semantics::ATOM {
                name
            } else if sem == Semantics::SRC_IMM {
                format!("{} {}", name, instr.src)
            } else if sem == Semantics::DST_REG {
                format!("{} {}", name, reg_name(instr.dst))
            } else if sem == Semantics::DST_MEM {
                format!("{} [0x{:X}]", name, instr.dst)
            } else if sem == Semantics::REG_REG {
                format!("{} {}, {}", name, reg_name(instr.dst), reg_name(instr.src))
            } else if sem == Semantics::REG_MEM {
                format!("{} [0x{:X}], {}", name, instr.dst, reg_name(instr.src))
            } else if sem == Semantics::MEM_REG {
                format!("{} {}, [0x{:X}]", name, reg_name(instr.dst), instr.src)
            } else if sem == Semantics::IMM_REG {
                format!("{} {}, {}", name, reg_name(instr.dst), instr.src)
            } else if sem == Semantics::IMM_MEM {
                format!("{} [0x{:X}], {}", name, instr.dst, instr.src)
            } else if sem.contains(Semantics::SRC_IREG) {
                format!("{} {}, [{}]", name, reg_name(instr.dst), reg_name(instr.src))
            } else {
                format!("{} {}, {}", name, instr.dst, instr.src)
            }
        }
    }
}

/// Renders one encoded word.
pub fn disassemble_instruction(word: Word) -> String {
    match decode(word) {
        Some(instr) => render(&instr),
        None => format!("??? 0x{:016X}", word),
    }
}

/// Renders a whole code segment, one instruction per line with its offset
/// and the raw word.
pub fn disassemble(code: &[Word]) -> String {
    let mut out = String::new();
    for (offset, word) in code.iter().enumerate() {
        let _ = writeln!(
            out,
            "0x{:04X}  {:<24}{:016X}",
            offset,
            disassemble_instruction(*word),
            word
        );
    }
    out
}
