//! Hand-written tokenizer for Pluto assembly.
//!
//! The lexer is total: any input produces a token stream terminated by an
//! [`Eof`](enum.TokenKind.html#variant.Eof) token. Characters that fit no
//! rule become `Unknown` tokens for the parser to reject with a line number.

use crate::token::{Directive, Section, Token, TokenKind};
use pluto::{Opcode, Register};

const TOKEN_VALUE_SIZE: usize = 512;

struct Lexer<'a> {
    buffer: &'a [u8],
    pos: usize,
    section: Section,
    prev: TokenKind,
}

/// Tokenizes a whole source buffer.
///
/// A Newline token is supplied before Eof when the final line is
/// unterminated, so downstream adjacency rules see every statement closed.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }

    let len = tokens.len();
    if len >= 2 && tokens[len - 2].kind != TokenKind::Newline {
        let section = tokens[len - 1].section;
        tokens.insert(
            len - 1,
            Token::new(TokenKind::Newline, String::new(), section),
        );
    }

    tokens
}

fn is_instruction(word: &str) -> bool {
    word.to_uppercase().parse::<Opcode>().is_ok()
}

fn is_register(word: &str) -> bool {
    word.to_uppercase().parse::<Register>().is_ok()
}

fn is_directive(word: &str) -> bool {
    word.to_uppercase().parse::<Directive>().is_ok()
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            buffer: input.as_bytes(),
            pos: 0,
            section: Section::Data,
            prev: TokenKind::Unknown,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.buffer.get(self.pos).copied()
    }

    fn skip_spaces(&mut self) {
        while let Some(c) = self.peek() {
            if c == b'\n' || !c.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
    }

    /// Consumes bytes until one of the given delimiters (or end of input)
    /// and returns the passed-over text.
    fn take_until(&mut self, delimiters: &[u8]) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if delimiters.contains(&c) {
                break;
            }
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.buffer[start..self.pos]).into_owned()
    }

    fn next_token(&mut self) -> Token {
        self.skip_spaces();

        let token = match self.peek() {
            None => self.token(TokenKind::Eof, String::new()),
            Some(b'\n') => {
                self.pos += 1;
                self.token(TokenKind::Newline, String::new())
            }
            Some(b',') => {
                self.pos += 1;
                self.token(TokenKind::Comma, String::new())
            }
            Some(b';') | Some(b'#') => {
                let value = self.take_until(&[b'\n']);
                self.token(TokenKind::Comment, value)
            }
            Some(quote @ b'"') | Some(quote @ b'\'') => {
                self.pos += 1;
                let value = self.take_until(&[quote, b'\n']);
                if self.peek() == Some(quote) {
                    self.pos += 1;
                }
                self.token(TokenKind::String, value)
            }
            Some(c) if c.is_ascii_digit() => {
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if !c.is_ascii_alphanumeric() {
                        break;
                    }
                    self.pos += 1;
                }
                let value = String::from_utf8_lossy(&self.buffer[start..self.pos]).into_owned();
                self.token(TokenKind::Constant, value)
            }
            Some(b'[') => {
                self.pos += 1;
                let value = self.take_until(&[b']', b'\n']);
                if self.peek() == Some(b']') {
                    self.pos += 1;
                }
                self.token(TokenKind::Address, value)
            }
            Some(_) => {
                let value = self.take_until(&[b' ', b'\t', b'\r', b',', b'\n', b';', b'#']);
                self.word_token(value)
            }
        };

        self.prev = token.kind;
        token
    }

    fn word_token(&mut self, value: String) -> Token {
        if value.ends_with(':') {
            let name = value[..value.len() - 1].to_string();
            return self.token(TokenKind::Label, name);
        }

        if value.starts_with('.') {
            // Section switch takes effect from this token onwards.
            self.section = if value.eq_ignore_ascii_case(".data") {
                Section::Data
            } else {
                Section::Main
            };
            return self.token(TokenKind::Section, value);
        }

        if is_instruction(&value) {
            self.token(TokenKind::Instruction, value)
        } else if is_register(&value) {
            self.token(TokenKind::Register, value)
        } else if is_directive(&value) {
            self.token(TokenKind::Directive, value)
        } else if matches!(
            self.prev,
            TokenKind::Instruction | TokenKind::Register | TokenKind::Comma
        ) {
            // A bare word in operand position is a label reference.
            self.token(TokenKind::Address, value)
        } else {
            self.token(TokenKind::Unknown, value)
        }
    }

    fn token(&self, kind: TokenKind, mut value: String) -> Token {
        if value.len() > TOKEN_VALUE_SIZE {
            let mut end = TOKEN_VALUE_SIZE;
            while !value.is_char_boundary(end) {
                end -= 1;
            }
            value.truncate(end);
        }
        Token::new(kind, value, self.section)
    }
}
