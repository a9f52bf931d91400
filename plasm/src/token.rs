use std::fmt;
use util::EnumFromStr;
use util_derive::EnumFromStr;

/// Source region a token belongs to. Everything before the first section
/// marker counts as data.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Section {
    Data,
    Main,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    Label,
    Instruction,
    Register,
    String,
    Constant,
    Address,
    Section,
    Directive,
    Comma,
    Newline,
    Comment,
    Unknown,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub section: Section,
}

impl Token {
    pub fn new(kind: TokenKind, value: String, section: Section) -> Token {
        Token {
            kind,
            value,
            section,
        }
    }
}

/// Data-section size directives. The multiplier is the number of bytes one
/// constant occupies or reserves.
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumFromStr)]
pub enum Directive {
    DB,
    DW,
    DD,
    DQ,
}

impl Directive {
    pub fn multiplier(self) -> usize {
        match self {
            Directive::DB => 1,
            Directive::DW => 2,
            Directive::DD => 4,
            Directive::DQ => 8,
        }
    }
}
