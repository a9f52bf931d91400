use crate::{constants, Cell, Word};
use num::traits::ToPrimitive;
use num::FromPrimitive;
use num_derive::{FromPrimitive, ToPrimitive};
use std::ops::{BitOr, BitOrAssign};
use util::EnumFromStr;
use util_derive::EnumFromStr;

/// Instruction set of the register machine.
///
/// The discriminants are the encoded opcodes, so the whole set fits the
/// 5-bit opcode field.
#[derive(
    Clone, Copy, PartialEq, Eq, Debug, ToPrimitive, FromPrimitive, EnumFromStr,
)]
pub enum Opcode {
    /// No operation.
    NOP,
    /// Clear the comparison flags.
    CLF,
    /// Compare destination against source and set the flags.
    CMP,
    /// Move source into destination.
    MOV,
    /// Push a register, memory cell or immediate onto the stack.
    PSH,
    /// Pop the stack top into a register or memory cell.
    POP,
    ADD,
    SUB,
    MUL,
    /// Divide; a zero source stops the machine with
    /// [`ExitCode::DivisionByZero`](enum.ExitCode.html#variant.DivisionByZero).
    DIV,
    MOD,
    INC,
    DEC,
    AND,
    BOR,
    XOR,
    /// Arithmetic negation of the source register. The mnemonic is
    /// historical; this has never been a bitwise complement.
    NOT,
    SHL,
    SHR,
    /// Unconditional jump to the destination instruction index.
    JMP,
    JEQ,
    JNE,
    JLE,
    JLT,
    JGE,
    JGT,
    /// Push the index of the next instruction and jump.
    CALL,
    /// Pop a return address and jump to it.
    RET,
    /// Enter the kernel gate; the call is selected by `BX`.
    SYSCALL,
    /// Stop the machine cleanly.
    HLT,
}

/// General purpose registers.
#[derive(
    Clone, Copy, PartialEq, Eq, Debug, ToPrimitive, FromPrimitive, EnumFromStr,
)]
pub enum Register {
    AX,
    BX,
    CX,
    DX,
}

macro_rules! impl_enum_display {
    ($e:ty) => {
        impl std::fmt::Display for $e {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                std::fmt::Debug::fmt(self, f)
            }
        }
    };
}

impl_enum_display!(Opcode);
impl_enum_display!(Register);

#[inline]
pub fn register_index(id: Register) -> usize {
    id.to_usize().unwrap()
}

/// Operand semantics of one instruction, a small set of bit flags
/// describing what kind of operands the src and dst fields carry.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Semantics(u8);

impl Semantics {
    /// No operands at all (HLT, RET, ...).
    pub const ATOM: Semantics = Semantics(0x00);
    /// Source is a register.
    pub const SRC_REG: Semantics = Semantics(0x01);
    /// Source is a memory cell.
    pub const SRC_MEM: Semantics = Semantics(0x02);
    /// Source is an immediate value.
    pub const SRC_IMM: Semantics = Semantics(0x04);
    /// Source is the memory cell addressed by a register's content.
    pub const SRC_IREG: Semantics = Semantics(0x08);
    /// Destination is a register.
    pub const DST_REG: Semantics = Semantics(0x10);
    /// Destination is a memory cell.
    pub const DST_MEM: Semantics = Semantics(0x20);

    // Composed values for the common operand shapes.
    pub const REG_REG: Semantics = Semantics(0x11);
    pub const REG_MEM: Semantics = Semantics(0x21);
    pub const MEM_REG: Semantics = Semantics(0x12);
    pub const IMM_REG: Semantics = Semantics(0x14);
    pub const IMM_MEM: Semantics = Semantics(0x24);

    #[inline]
    pub fn from_bits(bits: u8) -> Semantics {
        Semantics(bits & 0x3F)
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn contains(self, flags: Semantics) -> bool {
        self.0 & flags.0 == flags.0
    }
}

impl BitOr for Semantics {
    type Output = Semantics;

    fn bitor(self, rhs: Semantics) -> Semantics {
        Semantics(self.0 | rhs.0)
    }
}

impl BitOrAssign for Semantics {
    fn bitor_assign(&mut self, rhs: Semantics) {
        self.0 |= rhs.0;
    }
}

/// A decoded (or not yet encoded) instruction.
///
/// `dst` and `src` are kept as signed values; `-1` marks an unused operand
/// slot while the instruction is being built by the assembler.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct InstructionLine {
    pub op: Opcode,
    pub sem: Semantics,
    pub dst: Cell,
    pub src: Cell,
}

impl InstructionLine {
    pub fn new(op: Opcode, sem: Semantics, dst: Cell, src: Cell) -> InstructionLine {
        InstructionLine { op, sem, dst, src }
    }

    /// An operand-less instruction.
    pub fn atom(op: Opcode) -> InstructionLine {
        InstructionLine::new(op, Semantics::ATOM, -1, -1)
    }
}

#[inline]
fn enum_to_word<T: ToPrimitive + Copy>(val: T) -> Word {
    val.to_u64().unwrap()
}

/// Packs an instruction line into one code word.
///
/// Unused operand slots (`-1`) are normalised to zero so that operand-less
/// instructions never shift a negative value into the word.
pub fn encode(line: &InstructionLine) -> Word {
    let dst = if line.dst == -1 { 0 } else { line.dst };
    let src = if line.src == -1 { 0 } else { line.src };

    ((enum_to_word(line.op) << constants::OPCODE_OFFSET) & constants::OPCODE_MASK)
        | ((Word::from(line.sem.bits()) << constants::SEM_OFFSET) & constants::SEM_MASK)
        | (((src as Word) << constants::SRC_OFFSET) & constants::SRC_MASK)
        | ((dst as Word) & constants::DST_MASK)
}

/// Unpacks one code word.
///
/// Returns `None` when the opcode field does not name an instruction. The
/// src field is sign-extended from its 27 bits, so immediates keep their
/// value; register indices and addresses are small enough not to be
/// affected.
pub fn decode(word: Word) -> Option<InstructionLine> {
    let op = Opcode::from_u64((word & constants::OPCODE_MASK) >> constants::OPCODE_OFFSET)?;
    let sem = Semantics::from_bits(((word & constants::SEM_MASK) >> constants::SEM_OFFSET) as u8);

    let mut src = (word & constants::SRC_MASK) >> constants::SRC_OFFSET;
    if src & constants::SRC_SIGN_MASK != 0 {
        src |= constants::SRC_EXTENSION;
    }

    let dst = (word & constants::DST_MASK) as Cell;

    Some(InstructionLine {
        op,
        sem,
        dst,
        src: src as Cell,
    })
}

/// Builds an [`InstructionLine`](struct.InstructionLine.html).
#[macro_export]
macro_rules! instr {
    ($op:ident) => {
        $crate::InstructionLine::atom($crate::Opcode::$op)
    };
    ($op:ident, $sem:expr, $dst:expr, $src:expr) => {
        $crate::InstructionLine::new($crate::Opcode::$op, $sem, $dst, $src)
    };
}

/// Encodes a list of `instr!` argument tuples into code words.
#[macro_export]
macro_rules! program {
    [$( ($( $x:tt )+) ),* $(,)?] => {
        vec![$( $crate::encode(&$crate::instr!($($x)+)) ),*]
    };
}
