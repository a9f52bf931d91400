use crate::test::*;
use crate::{instr, program};
use crate::{Register, Semantics};

#[test]
fn cmp_equal_sets_zero() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 5),
        (CMP, Semantics::IMM_REG, AX, 5),
        (HLT)
    ]);

    assert!(processor.flags().zero());
    assert_single_flag(processor.flags());
}

#[test]
fn cmp_less_sets_negative() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 3),
        (CMP, Semantics::IMM_REG, AX, 5),
        (HLT)
    ]);

    assert!(processor.flags().negative());
    assert_single_flag(processor.flags());
}

#[test]
fn cmp_greater_sets_positive() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 9),
        (CMP, Semantics::IMM_REG, AX, 5),
        (HLT)
    ]);

    assert!(processor.flags().positive());
    assert_single_flag(processor.flags());
}

#[test]
fn cmp_does_not_clobber_registers() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 9),
        (CMP, Semantics::IMM_REG, AX, 5),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::AX), 9);
}

#[test]
fn cmp_register_source() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 4),
        (MOV, Semantics::IMM_REG, BX, 4),
        (CMP, Semantics::REG_REG, AX, BX),
        (HLT)
    ]);

    assert!(processor.flags().zero());
}

#[test]
fn clf_clears_every_flag() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 5),
        (CMP, Semantics::IMM_REG, AX, 3),
        (CLF),
        (HLT)
    ]);

    let flags = processor.flags();
    assert!(!flags.zero() && !flags.negative() && !flags.positive());
}
