use crate::test::*;
use crate::{instr, program};
use crate::{Register, Semantics};

#[test]
fn and() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 0b1100),
        (MOV, Semantics::IMM_REG, BX, 0b1010),
        (AND, Semantics::REG_REG, AX, BX),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::AX), 0b1000);
}

#[test]
fn bor() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 0b1100),
        (MOV, Semantics::IMM_REG, BX, 0b1010),
        (BOR, Semantics::REG_REG, AX, BX),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::AX), 0b1110);
}

#[test]
fn xor() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 0b1100),
        (MOV, Semantics::IMM_REG, BX, 0b1010),
        (XOR, Semantics::REG_REG, AX, BX),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::AX), 0b0110);
}

#[test]
fn not_is_arithmetic_negation() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, BX, 5),
        (NOT, Semantics::REG_REG, AX, BX),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::AX), -5);
    assert_eq!(processor.register(Register::BX), 5);
}

#[test]
fn shl() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 3),
        (MOV, Semantics::IMM_REG, BX, 4),
        (SHL, Semantics::REG_REG, AX, BX),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::AX), 48);
}

#[test]
fn shr_is_arithmetic() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, -16),
        (MOV, Semantics::IMM_REG, BX, 2),
        (SHR, Semantics::REG_REG, AX, BX),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::AX), -4);
}
