use crate::token::TokenKind;
use std::error::Error as StdError;
use std::fmt;

/// Everything that can abort an assembly run. Every variant that points at
/// source carries the line number it was detected on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// A token the lexer could not classify.
    UnknownToken { value: String, line: usize },
    /// Adjacency violation: `seen` may not follow `after`.
    UnexpectedToken {
        seen: TokenKind,
        after: TokenKind,
        line: usize,
    },
    /// A word in instruction position that names no instruction.
    UnknownMnemonic { value: String, line: usize },
    /// A label still unresolved after the patch pass.
    UndefinedSymbol { name: String },
    /// A data label would bind below the data window.
    DataOffsetViolation { address: u64, line: usize },
    /// A string initialiser length exceeding the literal.
    InvalidStringLength {
        requested: usize,
        available: usize,
        line: usize,
    },
    /// A constant that does not parse as a decimal or hex number.
    InvalidConstant { value: String, line: usize },
    /// An operand that does not fit its instruction field.
    ImmediateOverflow { value: i64, line: usize },
    /// The data segment outgrew the addressable range.
    DataTooLarge { line: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnknownToken { value, line } => {
                write!(f, "unknown token \"{}\" at line {}", value, line)
            }
            Error::UnexpectedToken { seen, after, line } => {
                write!(f, "unexpected token {} after {} at line {}", seen, after, line)
            }
            Error::UnknownMnemonic { value, line } => {
                write!(f, "unknown mnemonic \"{}\" at line {}", value, line)
            }
            Error::UndefinedSymbol { name } => write!(f, "undefined symbol \"{}\"", name),
            Error::DataOffsetViolation { address, line } => write!(
                f,
                "data address 0x{:X} below the data offset at line {}",
                address, line
            ),
            Error::InvalidStringLength {
                requested,
                available,
                line,
            } => write!(
                f,
                "string length {} exceeds the {}-byte literal at line {}",
                requested, available, line
            ),
            Error::InvalidConstant { value, line } => {
                write!(f, "invalid constant \"{}\" at line {}", value, line)
            }
            Error::ImmediateOverflow { value, line } => {
                write!(f, "operand {} does not fit its field at line {}", value, line)
            }
            Error::DataTooLarge { line } => {
                write!(f, "data segment exceeds the addressable range at line {}", line)
            }
        }
    }
}

impl StdError for Error {}
