//! Virtual processor for the Pluto register machine.
//!
//! A program is a sequence of 64-bit instruction words laid out as
//! `[op:5][sem:6][src:27][dst:26]`, plus an optional data image that is
//! mapped into main memory before execution starts. The [`Processor`] runs a
//! classic fetch/decode/dispatch loop over the code against four general
//! purpose registers, a fixed-size call/operand stack, flat cell-addressed
//! memory and a set of comparison flags.
//!
//! Programs are produced from assembly source by the `plasm` crate; the
//! on-disk image format lives in `plexfile`.

pub mod constants;

mod disasm;
mod flags;
mod instruction;
mod memory;
mod processor;
mod syscall;


pub use crate::disasm::{disassemble, disassemble_instruction};
pub use crate::flags::Flags;
pub use crate::instruction::{
    decode, encode, register_index, InstructionLine, Opcode, Register, Semantics,
};
pub use crate::memory::Memory;
pub use crate::processor::{ExitCode, Processor};
pub use crate::syscall::{Kernel, SYS_ATOI, SYS_READ, SYS_WRITE};

/// One encoded instruction word.
pub type Word = u64;

/// Contents of a register or memory cell.
pub type Cell = i64;
