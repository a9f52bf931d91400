use crate::test::*;
use crate::{instr, program};
use crate::{ExitCode, Register, Semantics};

#[test]
fn add_immediate_and_register() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 3),
        (ADD, Semantics::REG_REG, BX, AX),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::AX), 3);
    assert_eq!(processor.register(Register::BX), 3);
    assert!(processor.flags().positive());
}

#[test]
fn sub_goes_negative() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 3),
        (SUB, Semantics::IMM_REG, AX, 5),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::AX), -2);
    assert!(processor.flags().negative());
}

#[test]
fn mul_into_memory_roundtrip() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 3),
        (MUL, Semantics::IMM_REG, AX, 4),
        (MOV, Semantics::REG_MEM, 0x10, AX),
        (MOV, Semantics::MEM_REG, BX, 0x10),
        (HLT)
    ]);

    assert_eq!(processor.memory().read(0x10), Some(12));
    assert_eq!(processor.register(Register::BX), 12);
}

#[test]
fn div_rounds_towards_zero() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 7),
        (DIV, Semantics::IMM_REG, AX, 2),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::AX), 3);
}

#[test]
fn div_by_zero_faults() {
    let (_, exit_code) = run_program(&program![
        (MOV, Semantics::IMM_REG, AX, 8),
        (DIV, Semantics::IMM_REG, AX, 0),
        (HLT)
    ]);

    assert_eq!(exit_code, ExitCode::DivisionByZero);
}

#[test]
fn div_by_zero_register_source() {
    let (_, exit_code) = run_program(&program![
        (MOV, Semantics::IMM_REG, AX, 8),
        (DIV, Semantics::REG_REG, AX, BX),
        (HLT)
    ]);

    assert_eq!(exit_code, ExitCode::DivisionByZero);
}

#[test]
fn mod_takes_remainder() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 6),
        (MOD, Semantics::IMM_REG, AX, 5),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::AX), 1);
}

#[test]
fn mod_by_zero_faults() {
    let (_, exit_code) = run_program(&program![
        (MOV, Semantics::IMM_REG, AX, 6),
        (MOD, Semantics::IMM_REG, AX, 0),
        (HLT)
    ]);

    assert_eq!(exit_code, ExitCode::DivisionByZero);
}

#[test]
fn inc_register() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 9),
        (INC, Semantics::DST_REG, AX, -1),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::AX), 10);
}

#[test]
fn dec_register() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 9),
        (DEC, Semantics::DST_REG, AX, -1),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::AX), 8);
}

#[test]
fn inc_memory() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_MEM, 0x20, 5),
        (INC, Semantics::DST_MEM, 0x20, -1),
        (HLT)
    ]);

    assert_eq!(processor.memory().read(0x20), Some(6));
}

#[test]
fn dec_memory_decrements() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_MEM, 0x20, 5),
        (DEC, Semantics::DST_MEM, 0x20, -1),
        (HLT)
    ]);

    assert_eq!(processor.memory().read(0x20), Some(4));
}

#[test]
fn arithmetic_sets_exactly_one_flag() {
    for &(value, sum) in &[(-7i64, -4i64), (3, 6), (-3, 0)] {
        let processor = run_halted(&program![
            (MOV, Semantics::IMM_REG, AX, value),
            (ADD, Semantics::IMM_REG, AX, 3),
            (HLT)
        ]);
        assert_eq!(processor.register(crate::Register::AX), sum);
        assert_single_flag(processor.flags());
        assert_eq!(processor.flags().zero(), sum == 0);
        assert_eq!(processor.flags().negative(), sum < 0);
        assert_eq!(processor.flags().positive(), sum > 0);
    }
}

#[test]
fn bad_memory_operand_faults() {
    let (_, exit_code) = run_program(&program![
        (MOV, Semantics::IMM_MEM, 40_000, 1),
        (HLT)
    ]);

    assert_eq!(exit_code, ExitCode::BadMemoryAccess);
}
