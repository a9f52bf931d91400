use crate::test::*;
use crate::{instr, program};
use crate::{ExitCode, Register, Semantics};

#[test]
fn push_then_pop_register() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 32),
        (PSH, Semantics::DST_REG, AX, -1),
        (POP, Semantics::DST_REG, DX, -1),
        (HLT)
    ]);

    assert_eq!(processor.stack()[0], 32);
    assert_eq!(processor.register(Register::DX), 32);
}

#[test]
fn stack_is_lifo() {
    let processor = run_halted(&program![
        (PSH, Semantics::SRC_IMM, -1, 1),
        (PSH, Semantics::SRC_IMM, -1, 2),
        (PSH, Semantics::SRC_IMM, -1, 3),
        (POP, Semantics::DST_REG, AX, -1),
        (POP, Semantics::DST_REG, BX, -1),
        (POP, Semantics::DST_REG, CX, -1),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::AX), 3);
    assert_eq!(processor.register(Register::BX), 2);
    assert_eq!(processor.register(Register::CX), 1);
}

#[test]
fn push_memory_cell() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_MEM, 0x30, 11),
        (PSH, Semantics::DST_MEM, 0x30, -1),
        (POP, Semantics::DST_REG, AX, -1),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::AX), 11);
}

#[test]
fn pop_into_memory_cell() {
    let processor = run_halted(&program![
        (PSH, Semantics::SRC_IMM, -1, 64),
        (POP, Semantics::DST_MEM, 0x30, -1),
        (HLT)
    ]);

    assert_eq!(processor.memory().read(0x30), Some(64));
}

#[test]
fn pop_on_empty_stack_faults() {
    let (_, exit_code) = run_program(&program![(POP, Semantics::DST_REG, AX, -1), (HLT)]);
    assert_eq!(exit_code, ExitCode::StackUnderflow);
}

#[test]
fn deep_push_overflows() {
    // push in an infinite loop until the stack fills up
    let (_, exit_code) = run_program(&program![
        (PSH, Semantics::SRC_IMM, -1, 1),
        (JMP, Semantics::DST_MEM, 0, -1)
    ]);

    assert_eq!(exit_code, ExitCode::StackOverflow);
}
