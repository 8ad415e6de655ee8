//! x86-64 single-instruction decoder.
//!
//! The decoder walks the canonical encoding form
//!
//! ```text
//! [legacy prefix] [REX] [opcode (1-2 bytes)] [ModR/M] [SIB] [disp8/32] [imm]
//! ```
//!
//! byte by byte, binding the mnemonic through the opcode tables and
//! rendering each operand as text. A fresh [`DecodeContext`] is created per
//! call; the only persistent state on [`Disassembler`] is the byte source
//! and the span-keyed cache of rendered instructions.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use unasm_core::{register_name, DecodedInstruction, Mnemonic, Width};

use crate::error::DecodeError;
use crate::modrm::{memory_operand, ModRM, Sib};
use crate::opcodes::{opcode_kind, operand_entry, Operand, OpcodeKind, OperandEntry};
use crate::prefix::{is_prefix_instruction, Prefix, Rex};

/// Maximum encoded length of an x86-64 instruction.
pub const MAX_INSTRUCTION_LEN: usize = 15;

/// Single-instruction decoder over a read-only byte buffer.
///
/// Decoded instructions are cached under their byte span `(start, end)`.
/// The cache grows monotonically and is owned exclusively by this value;
/// sharing it across threads requires external synchronization.
pub struct Disassembler<'a> {
    source: &'a [u8],
    decoded: BTreeMap<(usize, usize), String>,
}

impl<'a> Disassembler<'a> {
    /// Creates a decoder over `source`.
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            decoded: BTreeMap::new(),
        }
    }

    /// Decodes the single instruction starting at byte offset `start`.
    ///
    /// On success the rendered text is inserted into the span cache. A
    /// failed decode leaves the cache untouched; the caller chooses how to
    /// resynchronize.
    pub fn decode_single(&mut self, start: usize) -> Result<DecodedInstruction, DecodeError> {
        let inst = DecodeContext::new(self.source, start).run()?;
        self.decoded.insert(inst.span(), inst.assembly.clone());
        Ok(inst)
    }

    /// Returns the cached assembly text for the span `[start, end)`.
    pub fn lookup(&self, start: usize, end: usize) -> Option<&str> {
        self.decoded.get(&(start, end)).map(String::as_str)
    }

    /// Linear sweep over the whole buffer, resynchronizing by one byte
    /// after each failed decode.
    pub fn disassemble(&mut self) -> Vec<Result<DecodedInstruction, DecodeError>> {
        let mut results = Vec::new();
        let mut offset = 0;
        while offset < self.source.len() {
            match self.decode_single(offset) {
                Ok(inst) => {
                    offset = inst.end();
                    results.push(Ok(inst));
                }
                Err(err) => {
                    offset += 1;
                    results.push(Err(err));
                }
            }
        }
        results
    }

    /// Returns the underlying byte source.
    pub fn source(&self) -> &[u8] {
        self.source
    }
}

/// Per-call decode state.
struct DecodeContext<'a> {
    source: &'a [u8],
    start: usize,
    cursor: usize,
    prefix: Prefix,
    /// LOCK/REPNE/REP byte; recorded, never folded into table keys.
    #[allow(dead_code)]
    prefix_instruction: Option<u8>,
    rex: Option<Rex>,
    opcode: u16,
    modrm: Option<ModRM>,
    sib: Option<Sib>,
    disp8: Option<u8>,
    disp32: Option<u32>,
}

impl<'a> DecodeContext<'a> {
    fn new(source: &'a [u8], start: usize) -> Self {
        Self {
            source,
            start,
            cursor: start,
            prefix: Prefix::None,
            prefix_instruction: None,
            rex: None,
            opcode: 0,
            modrm: None,
            sib: None,
            disp8: None,
            disp32: None,
        }
    }

    fn run(mut self) -> Result<DecodedInstruction, DecodeError> {
        self.parse_prefix_instruction();
        self.parse_operand_size_prefix();
        self.parse_rex();
        let (mnemonic, entry) = self.parse_opcode()?;
        self.parse_modrm(&entry)?;
        self.parse_sib()?;
        self.parse_displacement()?;
        let operands = self.resolve_operands(&entry)?;
        Ok(self.emit(mnemonic, &operands))
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.cursor).copied()
    }

    /// Builds a truncation error for `extra` further bytes past the cursor.
    fn truncated(&self, extra: usize) -> DecodeError {
        DecodeError::truncated(
            self.start,
            self.cursor + extra - self.start,
            self.source.len().saturating_sub(self.start),
        )
    }

    fn take(&mut self) -> Result<u8, DecodeError> {
        let byte = self.peek().ok_or_else(|| self.truncated(1))?;
        self.cursor += 1;
        Ok(byte)
    }

    fn take_n(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.source.len().saturating_sub(self.cursor) < n {
            return Err(self.truncated(n));
        }
        let bytes = &self.source[self.cursor..self.cursor + n];
        self.cursor += n;
        Ok(bytes)
    }

    fn parse_prefix_instruction(&mut self) {
        if let Some(byte) = self.peek() {
            if is_prefix_instruction(byte) {
                self.prefix_instruction = Some(byte);
                self.cursor += 1;
            }
        }
    }

    fn parse_operand_size_prefix(&mut self) {
        if self.peek() == Some(0x66) {
            self.prefix = Prefix::P66;
            self.cursor += 1;
        }
    }

    fn parse_rex(&mut self) {
        let Some(byte) = self.peek() else { return };
        if !Rex::matches(byte) {
            return;
        }
        let rex = Rex::from_byte(byte);
        self.rex = Some(rex);
        self.cursor += 1;

        if rex.w {
            self.prefix = Prefix::RexW;
        } else if self.prefix != Prefix::P66 {
            self.prefix = Prefix::Rex;
        }
    }

    fn parse_opcode(&mut self) -> Result<(Mnemonic, OperandEntry), DecodeError> {
        let first = self.take()?;
        self.opcode = if first == 0x0F {
            let second = self.take()?;
            (u16::from(first) << 8) | u16::from(second)
        } else {
            u16::from(first)
        };

        // Prefix-fallback chain: REXW -> REX -> NONE. The effective prefix
        // is rewritten on each retry so operand widths stay consistent with
        // the row that matched.
        let kind = loop {
            if let Some(kind) = opcode_kind(self.prefix, self.opcode) {
                break kind;
            }
            self.prefix = match self.prefix {
                Prefix::RexW => Prefix::Rex,
                Prefix::Rex => Prefix::None,
                _ => {
                    return Err(DecodeError::unknown_opcode(
                        self.start,
                        self.prefix,
                        self.opcode,
                    ))
                }
            };
        };

        let mnemonic = match kind {
            OpcodeKind::Plain(mnemonic) => mnemonic,
            OpcodeKind::Group(rows) => {
                // The mnemonic lives in the reg field of the ModR/M byte:
                // peek it here, consume it in parse_modrm.
                let byte = self.peek().ok_or_else(|| self.truncated(1))?;
                let reg = (byte >> 3) & 0x7;
                rows.iter()
                    .find(|(r, _)| *r == reg)
                    .map(|(_, m)| *m)
                    .ok_or_else(|| {
                        DecodeError::unknown_opcode(self.start, self.prefix, self.opcode)
                    })?
            }
        };

        let entry = operand_entry(self.prefix, mnemonic, self.opcode).ok_or_else(|| {
            DecodeError::unknown_operand_form(self.start, self.prefix, mnemonic, self.opcode)
        })?;
        Ok((mnemonic, entry))
    }

    fn parse_modrm(&mut self, entry: &OperandEntry) -> Result<(), DecodeError> {
        if entry.encoding.has_modrm() {
            let byte = self.take()?;
            self.modrm = Some(ModRM::parse(byte, self.rex));
        }
        Ok(())
    }

    fn parse_sib(&mut self) -> Result<(), DecodeError> {
        if let Some(modrm) = self.modrm {
            if modrm.needs_sib() {
                let byte = self.take()?;
                self.sib = Some(Sib::parse(byte, modrm.mod_, self.rex));
            }
        }
        Ok(())
    }

    fn parse_displacement(&mut self) -> Result<(), DecodeError> {
        let Some(modrm) = self.modrm else {
            return Ok(());
        };
        if modrm.is_register() {
            return Ok(());
        }
        if modrm.has_disp8() {
            self.disp8 = Some(self.take()?);
        }
        let forced = self.sib.is_some_and(|sib| sib.forces_disp32());
        if modrm.has_disp32() || forced {
            let bytes = self.take_n(4)?;
            self.disp32 = Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]));
        }
        Ok(())
    }

    /// Resolves each operand slot to its textual form, consuming immediate
    /// bytes from the tail in declared order.
    fn resolve_operands(&mut self, entry: &OperandEntry) -> Result<Vec<String>, DecodeError> {
        let width = entry.width.unwrap_or(match self.prefix {
            Prefix::RexW => Width::W64,
            Prefix::P66 => Width::W16,
            _ => Width::W32,
        });

        let mut rendered = Vec::with_capacity(entry.operands.len());
        for operand in entry.operands {
            let text = match operand {
                Operand::Al => "al".to_string(),
                Operand::Ax => "ax".to_string(),
                Operand::Eax => "eax".to_string(),
                Operand::Rax => "rax".to_string(),
                Operand::One => "1".to_string(),
                Operand::Reg => self.resolve_reg(entry, width),
                Operand::Rm => self.resolve_rm(width),
                Operand::Imm8 => self.immediate(1)?,
                Operand::Imm16 => self.immediate(2)?,
                Operand::Imm32 => self.immediate(4)?,
                Operand::Imm64 => self.immediate(8)?,
                Operand::Moff => {
                    let size = if self.prefix == Prefix::RexW { 8 } else { 4 };
                    self.immediate(size)?
                }
            };
            rendered.push(text);
        }
        Ok(rendered)
    }

    fn resolve_reg(&self, entry: &OperandEntry, width: Width) -> String {
        match self.modrm {
            Some(modrm) => register_name(modrm.reg, width).to_string(),
            // O/OI forms: the register index is embedded in the opcode
            // byte, extended by REX.B.
            None => {
                let index = entry.opcode_reg.unwrap_or(0)
                    | self.rex.map_or(0, |rex| (rex.b as u8) << 3);
                register_name(index, width).to_string()
            }
        }
    }

    fn resolve_rm(&self, width: Width) -> String {
        self.modrm.map_or_else(String::new, |modrm| {
            if modrm.is_register() {
                register_name(modrm.rm, width).to_string()
            } else {
                memory_operand(&modrm, self.sib.as_ref(), self.disp8, self.disp32)
            }
        })
    }

    fn immediate(&mut self, size: usize) -> Result<String, DecodeError> {
        let bytes = self.take_n(size)?;
        Ok(hex_literal(bytes))
    }

    fn emit(self, mnemonic: Mnemonic, operands: &[String]) -> DecodedInstruction {
        let mut assembly = String::new();
        let _ = write!(assembly, " {} ", mnemonic);
        for operand in operands {
            assembly.push(' ');
            assembly.push_str(operand);
        }
        DecodedInstruction {
            start: self.start,
            len: self.cursor - self.start,
            mnemonic,
            assembly,
        }
    }
}

/// Formats little-endian bytes as a `0x`-prefixed, MSB-first hex literal.
fn hex_literal(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(2 + bytes.len() * 2);
    text.push_str("0x");
    for byte in bytes.iter().rev() {
        let _ = write!(text, "{byte:02x}");
    }
    text
}
