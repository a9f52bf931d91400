//! Two-pass assembler over the token stream.
//!
//! The first pass walks the tokens once, enforcing the adjacency rules,
//! filling the data segment and collecting instruction lines; label
//! references that cannot be resolved yet are emitted with a placeholder
//! operand and queued. The second pass patches the queued operands and
//! encodes the final code words.

use crate::error::Error;
use crate::symbols::{PatchSlot, SymbolTable};
use crate::token::{Directive, Section, Token, TokenKind};
use byteorder::{ByteOrder, LittleEndian};
use plexfile::Executable;
use pluto::{constants, encode, register_index, InstructionLine, Opcode, Register, Semantics};

const MAX_DATA_SIZE: usize = u32::max_value() as usize - 1;

// Operand field ranges: src is a 27-bit signed immediate, dst a 26-bit
// unsigned address. Anything outside would be truncated by the encoder, so
// it is rejected here.
const IMM_MIN: i64 = -(1 << 26);
const IMM_MAX: i64 = (1 << 26) - 1;
const ADDR_MAX: i64 = (1 << 26) - 1;

struct Pending {
    line: InstructionLine,
    comma: bool,
}

pub struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    line: usize,
    current_directive: Directive,
    reserving: bool,
    data_base: u64,
    symbols: SymbolTable,
    lines: Vec<InstructionLine>,
    data: Vec<u8>,
    entry_point: Option<u32>,
    pending: Option<Pending>,
    eof: Token,
}

fn parse_constant(value: &str, line: usize) -> Result<i64, Error> {
    let parsed = if value.starts_with("0x") || value.starts_with("0X") {
        i64::from_str_radix(&value[2..], 16)
    } else {
        value.parse()
    };

    parsed.map_err(|_| Error::InvalidConstant {
        value: value.to_string(),
        line,
    })
}

fn names_register(value: &str) -> bool {
    value.trim().to_uppercase().parse::<Register>().is_ok()
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Parser<'t> {
        Parser {
            tokens,
            pos: 0,
            line: 1,
            current_directive: Directive::DB,
            reserving: false,
            data_base: constants::DATA_OFFSET as u64,
            symbols: SymbolTable::new(),
            lines: Vec::new(),
            data: Vec::new(),
            entry_point: None,
            pending: None,
            eof: Token::new(TokenKind::Eof, String::new(), Section::Main),
        }
    }

    pub fn parse(mut self) -> Result<Executable, Error> {
        self.run()?;
        self.patch()?;

        let code: Vec<u64> = self.lines.iter().map(encode).collect();
        Ok(Executable::from(
            code,
            self.data,
            constants::DATA_OFFSET as u64,
            self.entry_point.unwrap_or(0),
        ))
    }

    fn run(&mut self) -> Result<(), Error> {
        while self.current().kind != TokenKind::Eof {
            self.step()?;
            self.pos += 1;
        }
        Ok(())
    }

    fn patch(&mut self) -> Result<(), Error> {
        for reference in self.symbols.take_unresolved() {
            let offset = match self.symbols.get(&reference.name) {
                Some(offset) => offset as i64,
                None => {
                    return Err(Error::UndefinedSymbol {
                        name: reference.name,
                    })
                }
            };

            let line = match self.lines.get_mut(reference.instr_index) {
                Some(line) => line,
                None => {
                    return Err(Error::UndefinedSymbol {
                        name: reference.name,
                    })
                }
            };

            match reference.slot {
                PatchSlot::Dst => line.dst = offset,
                PatchSlot::Src => line.src = offset,
            }
        }
        Ok(())
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos + 1).unwrap_or(&self.eof)
    }

    fn prev_kind(&self) -> TokenKind {
        if self.pos == 0 {
            TokenKind::Newline
        } else {
            self.tokens[self.pos - 1].kind
        }
    }

    fn expect_next(&self, allowed: &[TokenKind]) -> Result<(), Error> {
        let kind = self.peek().kind;
        if allowed.contains(&kind) {
            Ok(())
        } else {
            Err(Error::UnexpectedToken {
                seen: kind,
                after: self.current().kind,
                line: self.line,
            })
        }
    }

    fn misplaced(&self, seen: TokenKind) -> Error {
        Error::UnexpectedToken {
            seen,
            after: self.prev_kind(),
            line: self.line,
        }
    }

    fn next_ends_statement(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Comment | TokenKind::Newline
        )
    }

    fn emit(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.lines.push(pending.line);
        }
    }

    fn push_data(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if self.data.len() + bytes.len() > MAX_DATA_SIZE {
            return Err(Error::DataTooLarge { line: self.line });
        }
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    fn step(&mut self) -> Result<(), Error> {
        let token = self.current().clone();

        match token.kind {
            TokenKind::Label => self.label(&token)?,
            TokenKind::Instruction => self.instruction(&token)?,
            TokenKind::Register => self.register(&token)?,
            TokenKind::Constant => self.constant(&token)?,
            TokenKind::String => self.string(&token)?,
            TokenKind::Address => self.address(&token)?,

            TokenKind::Section => {
                // The entry point is the instruction index at the first
                // `.main` marker.
                if token.value.eq_ignore_ascii_case(".main") && self.entry_point.is_none() {
                    self.entry_point = Some(self.lines.len() as u32);
                }
            }

            TokenKind::Directive => {
                self.current_directive = token
                    .value
                    .to_uppercase()
                    .parse()
                    .map_err(|_| Error::UnknownMnemonic {
                        value: token.value.clone(),
                        line: self.line,
                    })?;
                self.reserving = true;
            }

            TokenKind::Comma => self.comma(&token)?,

            TokenKind::Newline => {
                if self.pending.is_some() {
                    return Err(self.misplaced(TokenKind::Newline));
                }
                self.line += 1;
                self.reserving = false;
            }

            TokenKind::Comment => {
                self.expect_next(&[TokenKind::Newline, TokenKind::Eof])?;
            }

            TokenKind::Unknown => {
                let prev = self.prev_kind();
                let in_instruction_position = token.section == Section::Main
                    && matches!(prev, TokenKind::Newline | TokenKind::Label | TokenKind::Section);
                return Err(if in_instruction_position {
                    Error::UnknownMnemonic {
                        value: token.value,
                        line: self.line,
                    }
                } else {
                    Error::UnknownToken {
                        value: token.value,
                        line: self.line,
                    }
                });
            }

            TokenKind::Eof => {}
        }

        Ok(())
    }

    fn label(&mut self, token: &Token) -> Result<(), Error> {
        match token.section {
            Section::Data => {
                if self.data_base < constants::DATA_OFFSET as u64 {
                    return Err(Error::DataOffsetViolation {
                        address: self.data_base,
                        line: self.line,
                    });
                }
                self.symbols.put(&token.value, self.data_base);
                self.expect_next(&[
                    TokenKind::Label,
                    TokenKind::Constant,
                    TokenKind::Directive,
                    TokenKind::String,
                    TokenKind::Newline,
                ])
            }
            Section::Main => {
                self.symbols.put(&token.value, self.lines.len() as u64);
                self.expect_next(&[TokenKind::Label, TokenKind::Instruction, TokenKind::Newline])
            }
        }
    }

    fn instruction(&mut self, token: &Token) -> Result<(), Error> {
        if token.section == Section::Data {
            return Err(self.misplaced(TokenKind::Instruction));
        }

        let op: Opcode = token
            .value
            .to_uppercase()
            .parse()
            .map_err(|_| Error::UnknownMnemonic {
                value: token.value.clone(),
                line: self.line,
            })?;

        let mut line = InstructionLine::atom(op);
        // Seed the semantic tag from the first operand.
        match self.peek().kind {
            TokenKind::Address => line.sem = Semantics::DST_MEM,
            TokenKind::Register => line.sem = Semantics::DST_REG,
            TokenKind::Constant => line.sem = Semantics::SRC_IMM,
            _ => {}
        }

        self.pending = Some(Pending { line, comma: false });
        self.expect_next(&[
            TokenKind::Constant,
            TokenKind::Register,
            TokenKind::Address,
            TokenKind::Comment,
            TokenKind::Newline,
        ])?;

        if self.next_ends_statement() {
            self.emit();
        }
        Ok(())
    }

    fn register(&mut self, token: &Token) -> Result<(), Error> {
        if token.section == Section::Data {
            return Err(self.misplaced(TokenKind::Register));
        }

        let reg: Register = token
            .value
            .to_uppercase()
            .parse()
            .map_err(|_| Error::UnknownMnemonic {
                value: token.value.clone(),
                line: self.line,
            })?;
        let index = register_index(reg) as i64;

        let mut pending = match self.pending.take() {
            Some(pending) => pending,
            None => return Err(self.misplaced(TokenKind::Register)),
        };

        if pending.line.dst == -1 {
            pending.line.dst = index;
            let ends = self.next_ends_statement();
            if ends {
                // Single-operand form (PSH, POP, INC, DEC).
                pending.line.sem = Semantics::DST_REG;
            }
            self.pending = Some(pending);
            self.expect_next(&[
                TokenKind::Constant,
                TokenKind::Register,
                TokenKind::Comma,
                TokenKind::Comment,
                TokenKind::Newline,
            ])?;
            if ends {
                self.emit();
            }
        } else {
            if !pending.comma {
                // `mov ax bx` without the comma
                self.pending = Some(pending);
                return Err(self.misplaced(TokenKind::Register));
            }
            pending.line.src = index;
            pending.line.sem |= Semantics::SRC_REG;
            self.pending = Some(pending);
            self.expect_next(&[TokenKind::Comment, TokenKind::Newline])?;
            self.emit();
        }
        Ok(())
    }

    fn constant(&mut self, token: &Token) -> Result<(), Error> {
        match token.section {
            Section::Data => {
                if self.reserving {
                    let count = parse_constant(&token.value, self.line)?;
                    if count < 0 {
                        return Err(Error::InvalidConstant {
                            value: token.value.clone(),
                            line: self.line,
                        });
                    }
                    let bytes = (count as usize)
                        .checked_mul(self.current_directive.multiplier())
                        .ok_or(Error::DataTooLarge { line: self.line })?;
                    if self.data.len() + bytes > MAX_DATA_SIZE {
                        return Err(Error::DataTooLarge { line: self.line });
                    }
                    self.data.resize(self.data.len() + bytes, 0);
                    self.data_base += bytes as u64;
                } else {
                    // No directive on this line: store the constant's low
                    // bytes under the current cell size.
                    let value = parse_constant(&token.value, self.line)?;
                    let width = self.current_directive.multiplier();
                    let mut buffer = [0u8; 8];
                    LittleEndian::write_i64(&mut buffer, value);
                    self.push_data(&buffer[..width])?;
                    self.data_base += width as u64;
                }
                self.expect_next(&[TokenKind::Newline, TokenKind::Comma, TokenKind::Comment])
            }
            Section::Main => {
                let value = parse_constant(&token.value, self.line)?;
                if value < IMM_MIN || value > IMM_MAX {
                    return Err(Error::ImmediateOverflow {
                        value,
                        line: self.line,
                    });
                }

                let mut pending = match self.pending.take() {
                    Some(pending) => pending,
                    None => return Err(self.misplaced(TokenKind::Constant)),
                };
                pending.line.src = value;
                pending.line.sem |= Semantics::SRC_IMM;
                self.pending = Some(pending);

                self.expect_next(&[TokenKind::Comment, TokenKind::Newline])?;
                self.emit();
                Ok(())
            }
        }
    }

    fn string(&mut self, token: &Token) -> Result<(), Error> {
        if token.section != Section::Data {
            return Err(self.misplaced(TokenKind::String));
        }

        let literal = token.value.as_bytes().to_vec();
        let mut length = literal.len();

        if self.peek().kind == TokenKind::Comma {
            self.pos += 2;
            let length_token = self.current().clone();
            if length_token.kind != TokenKind::Constant {
                return Err(Error::UnexpectedToken {
                    seen: length_token.kind,
                    after: TokenKind::Comma,
                    line: self.line,
                });
            }
            let requested = parse_constant(&length_token.value, self.line)?;
            if requested < 0 || requested as usize > literal.len() {
                return Err(Error::InvalidStringLength {
                    requested: requested.max(0) as usize,
                    available: literal.len(),
                    line: self.line,
                });
            }
            length = requested as usize;
        }

        self.push_data(&literal[..length])?;
        self.push_data(&[0])?;
        self.data_base += (length + 1) as u64;

        self.expect_next(&[TokenKind::Comment, TokenKind::Newline])
    }

    fn address(&mut self, token: &Token) -> Result<(), Error> {
        if token.section == Section::Data {
            return Err(self.misplaced(TokenKind::Address));
        }

        let interior = token.value.trim().to_string();
        let mut pending = match self.pending.take() {
            Some(pending) => pending,
            None => return Err(self.misplaced(TokenKind::Address)),
        };
        let dst_slot = pending.line.dst == -1;

        if let Ok(reg) = interior.to_uppercase().parse::<Register>() {
            // Indirect register: the memory cell addressed by the register
            // content. Source operand only.
            if dst_slot {
                self.pending = Some(pending);
                return Err(self.misplaced(TokenKind::Address));
            }
            pending.line.sem |= Semantics::SRC_IREG;
            pending.line.src = register_index(reg) as i64;
            self.pending = Some(pending);
            self.expect_next(&[TokenKind::Comment, TokenKind::Newline])?;
            self.emit();
            return Ok(());
        }

        if interior.chars().next().map_or(false, |c| c.is_ascii_digit()) {
            let address = parse_constant(&interior, self.line)?;
            if address < 0 || address > ADDR_MAX {
                self.pending = Some(pending);
                return Err(Error::ImmediateOverflow {
                    value: address,
                    line: self.line,
                });
            }
            if dst_slot {
                pending.line.dst = address;
            } else {
                pending.line.sem |= Semantics::SRC_MEM;
                pending.line.src = address;
            }
            self.pending = Some(pending);
            return self.finish_address(dst_slot);
        }

        // A bare name: a label reference, resolved now when possible and
        // patched in the second pass otherwise.
        let slot = if dst_slot {
            PatchSlot::Dst
        } else {
            PatchSlot::Src
        };
        if !dst_slot {
            pending.line.sem |= Semantics::SRC_MEM;
        }

        let operand = match self.symbols.get(&interior) {
            Some(offset) => offset as i64,
            None => {
                self.symbols
                    .add_unresolved(&interior, self.lines.len(), slot);
                0
            }
        };
        match slot {
            PatchSlot::Dst => pending.line.dst = operand,
            PatchSlot::Src => pending.line.src = operand,
        }

        self.pending = Some(pending);
        self.finish_address(dst_slot)
    }

    /// An address filling dst may be followed by the comma that introduces
    /// the source operand; as a source it always ends the operand list.
    fn finish_address(&mut self, dst_slot: bool) -> Result<(), Error> {
        if dst_slot {
            self.expect_next(&[TokenKind::Comma, TokenKind::Comment, TokenKind::Newline])?;
            if self.next_ends_statement() {
                self.emit();
            }
        } else {
            self.expect_next(&[TokenKind::Comment, TokenKind::Newline])?;
            self.emit();
        }
        Ok(())
    }

    fn comma(&mut self, token: &Token) -> Result<(), Error> {
        match token.section {
            Section::Data => self.expect_next(&[TokenKind::Constant]),
            Section::Main => {
                let mut pending = match self.pending.take() {
                    Some(pending) => pending,
                    None => return Err(self.misplaced(TokenKind::Comma)),
                };
                pending.comma = true;

                // Seed the source kind from the lookahead, mirroring the
                // destination seeding on the instruction token.
                let next = self.peek();
                match next.kind {
                    TokenKind::Register => pending.line.sem |= Semantics::SRC_REG,
                    TokenKind::Constant => pending.line.sem |= Semantics::SRC_IMM,
                    TokenKind::Address => {
                        if !names_register(&next.value) {
                            pending.line.sem |= Semantics::SRC_MEM;
                        }
                    }
                    _ => {}
                }

                self.pending = Some(pending);
                self.expect_next(&[TokenKind::Register, TokenKind::Constant, TokenKind::Address])
            }
        }
    }
}
