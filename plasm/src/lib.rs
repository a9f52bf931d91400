//! Assembler for the [pluto](../pluto/index.html) register machine.
//!
//! The entry point is [`assemble`](fn.assemble.html), which takes a source
//! buffer and returns the executable image consumed by the processor (the
//! [`Executable`](../plexfile/struct.Executable.html) type from the
//! `plexfile` crate).
//!
//! Source is tokenized by a hand-written, total lexer: every input
//! yields a token stream, and anything unclassifiable surfaces as an
//! `Unknown` token that assembly rejects with its line number. The parser
//! makes two passes: the first enforces the token adjacency rules, lays out
//! the data segment and emits instructions (forward label references get a
//! placeholder operand), the second patches the collected placeholders.
//!
//! # Language
//!
//! A program has a `.data` section of label-addressed storage and a `.main`
//! section of instructions; execution starts at the first `.main` marker.
//! Comments run from `;` (or `#`) to the end of the line.
//!
//! ```text
//! .data
//! msg: db "Hello", 5          ; five bytes plus a terminating NUL
//! buf: db 1024                ; reserve 1024 zeroed bytes
//! num: 42                     ; store one byte under the current directive
//!
//! .main
//! mov ax, 10
//! loop:
//! dec ax
//! cmp ax, 0
//! jne loop
//! mov bx, 1
//! mov cx, msg
//! mov dx, 5
//! syscall
//! hlt
//! ```
//!
//! ## Data section
//!
//! Directive | Cell size
//! ----------|----------
//! `db`      | 1 byte
//! `dw`      | 2 bytes
//! `dd`      | 4 bytes
//! `dq`      | 8 bytes
//!
//! `label: <directive> <n>` reserves `n * size` zeroed bytes. A bare
//! constant after a label stores its low bytes under the current directive.
//! A string literal copies its bytes (optionally truncated by an explicit
//! length) plus a terminating NUL. Labels resolve to addresses from
//! `0x2000` upwards.
//!
//! ## Main section
//!
//! Operands are registers (`ax`, `bx`, `cx`, `dx`), decimal or `0x` hex
//! constants, bracketed memory addresses (`[0x10]`), indirect registers
//! (`[cx]`), and bare label references. Labels may be used before they are
//! defined; the second pass resolves them.

mod error;
mod lexer;
mod parser;
mod symbols;
mod token;


pub use crate::error::Error;
pub use crate::lexer::tokenize;
pub use crate::parser::Parser;
pub use crate::symbols::{PatchSlot, SymbolTable, UnresolvedRef};
pub use crate::token::{Directive, Section, Token, TokenKind};

use plexfile::Executable;

pub type Result<T> = std::result::Result<T, Error>;

/// Assembles a source buffer into an executable image.
pub fn assemble(input: &str) -> Result<Executable> {
    let tokens = lexer::tokenize(input);
    Parser::new(&tokens).parse()
}
