use crate::test::*;
use crate::{instr, program};
use crate::{ExitCode, Register, Semantics};

#[test]
fn jmp_skips_over() {
    let processor = run_halted(&program![
        (JMP, Semantics::DST_MEM, 2, -1),
        (MOV, Semantics::IMM_REG, AX, 1),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::AX), 0);
}

#[test]
fn countdown_loop_runs_to_zero() {
    // mov ax, 10; loop: dec ax; cmp ax, 0; jne loop; hlt
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 10),
        (DEC, Semantics::DST_REG, AX, -1),
        (CMP, Semantics::IMM_REG, AX, 0),
        (JNE, Semantics::DST_MEM, 1, -1),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::AX), 0);
    assert!(processor.flags().zero());
}

#[test]
fn jeq_taken_only_on_zero() {
    let processor = run_halted(&program![
        (CMP, Semantics::IMM_REG, AX, 0),
        (JEQ, Semantics::DST_MEM, 3, -1),
        (MOV, Semantics::IMM_REG, BX, 1),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::BX), 0);
}

#[test]
fn jeq_not_taken_on_nonzero() {
    let processor = run_halted(&program![
        (MOV, Semantics::IMM_REG, AX, 1),
        (CMP, Semantics::IMM_REG, AX, 0),
        (JEQ, Semantics::DST_MEM, 4, -1),
        (MOV, Semantics::IMM_REG, BX, 1),
        (HLT)
    ]);

    assert_eq!(processor.register(Register::BX), 1);
}

fn branch_outcome(value: i64, against: i64, op: crate::Opcode) -> bool {
    use crate::{encode, InstructionLine};

    let code = vec![
        encode(&instr!(MOV, Semantics::IMM_REG, AX, value)),
        encode(&instr!(CMP, Semantics::IMM_REG, AX, against)),
        encode(&InstructionLine::new(op, Semantics::DST_MEM, 4, -1)),
        encode(&instr!(MOV, Semantics::IMM_REG, DX, 1)),
        encode(&instr!(HLT)),
    ];

    let processor = run_halted(&code);
    // DX stays zero when the branch was taken.
    processor.register(Register::DX) == 0
}

#[test]
fn conditional_jump_predicates() {
    use crate::Opcode;

    for &(value, against) in &[(1i64, 2i64), (2, 2), (3, 2)] {
        let lt = value < against;
        let eq = value == against;

        assert_eq!(branch_outcome(value, against, Opcode::JEQ), eq);
        assert_eq!(branch_outcome(value, against, Opcode::JNE), !eq);
        assert_eq!(branch_outcome(value, against, Opcode::JLT), lt);
        assert_eq!(branch_outcome(value, against, Opcode::JLE), lt || eq);
        assert_eq!(branch_outcome(value, against, Opcode::JGT), !lt && !eq);
        assert_eq!(branch_outcome(value, against, Opcode::JGE), !lt);
    }
}

#[test]
fn call_and_ret() {
    // call the subroutine at 3, which sets BX and returns
    let processor = run_halted(&program![
        (CALL, Semantics::DST_MEM, 3, -1),
        (MOV, Semantics::IMM_REG, AX, 1),
        (HLT),
        (MOV, Semantics::IMM_REG, BX, 7),
        (RET)
    ]);

    assert_eq!(processor.register(Register::AX), 1);
    assert_eq!(processor.register(Register::BX), 7);
}

#[test]
fn nested_calls_unwind_in_order() {
    let processor = run_halted(&program![
        (CALL, Semantics::DST_MEM, 2, -1),
        (HLT),
        (CALL, Semantics::DST_MEM, 5, -1),
        (INC, Semantics::DST_REG, AX, -1),
        (RET),
        (MOV, Semantics::IMM_REG, AX, 10),
        (RET)
    ]);

    // inner call runs first, then the increment on the way back
    assert_eq!(processor.register(Register::AX), 11);
}

#[test]
fn ret_on_empty_stack_faults() {
    let (_, exit_code) = run_program(&program![(RET)]);
    assert_eq!(exit_code, ExitCode::StackUnderflow);
}
