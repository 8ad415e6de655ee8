//! Opcode and operand-form lookup tables.
//!
//! Two lookups drive the decoder. `opcode_kind` maps the effective prefix
//! and (possibly two-byte) opcode value to a mnemonic, either directly or
//! through a /digit group resolved by the ModR/M reg field. `operand_entry`
//! then maps the prefix, mnemonic, and opcode to the operand-encoding form
//! and the ordered operand list.
//!
//! Rows exist only under the prefixes where they are meaningful:
//! width-promotable opcodes are tabled under `None`, `P66`, and `RexW`;
//! byte-form opcodes under `None` only. A bare `Rex` prefix is never tabled
//! and always reaches the unprefixed row through the fallback chain,
//! keeping the REX bits for register extension while the operand width
//! stays at the 32-bit default.

use unasm_core::{Mnemonic, Width};

use crate::prefix::Prefix;

/// Operand-encoding form. Dictates whether a ModR/M byte is present and
/// how the operand slots are sourced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpEnc {
    /// Immediate (often with a fixed accumulator slot).
    I,
    /// Code-offset immediate (relative branches).
    D,
    /// ModR/M, r/m only.
    M,
    /// Register embedded in the opcode byte.
    O,
    /// No operands.
    Np,
    /// ModR/M, r/m with immediate.
    Mi,
    /// ModR/M, r/m with the literal 1.
    M1,
    /// ModR/M: r/m, reg.
    Mr,
    /// ModR/M: reg, r/m.
    Rm,
    /// ModR/M: reg, r/m, immediate.
    Rmi,
    /// Opcode-embedded register with immediate.
    Oi,
}

impl OpEnc {
    /// Returns true if this form requires a ModR/M byte.
    pub fn has_modrm(self) -> bool {
        matches!(
            self,
            Self::M | Self::Mi | Self::M1 | Self::Mr | Self::Rm | Self::Rmi
        )
    }
}

/// One operand slot, resolved in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// The literal `1` (single-shift forms).
    One,
    Imm8,
    Imm16,
    Imm32,
    Imm64,
    /// Register from the ModR/M reg field or the opcode-embedded index.
    Reg,
    /// Register or memory reference from the ModR/M r/m field.
    Rm,
    /// Fixed accumulators, selected per prefix by the table row.
    Al,
    Ax,
    Eax,
    Rax,
    /// Address-sized memory-offset immediate.
    Moff,
}

/// Mnemonic selection for one (prefix, opcode) key.
#[derive(Debug, Clone, Copy)]
pub enum OpcodeKind {
    /// The opcode maps to a single mnemonic.
    Plain(Mnemonic),
    /// The opcode is a /digit group: the ModR/M reg field picks the
    /// mnemonic. Absent digits are reserved encodings.
    Group(&'static [(u8, Mnemonic)]),
}

/// Operand-table row.
#[derive(Debug, Clone, Copy)]
pub struct OperandEntry {
    /// Operand-encoding form.
    pub encoding: OpEnc,
    /// Ordered operand slots.
    pub operands: &'static [Operand],
    /// Register index embedded in the opcode byte (O/OI forms).
    pub opcode_reg: Option<u8>,
    /// Fixed operand width; `None` derives it from the effective prefix.
    pub width: Option<Width>,
}

impl OperandEntry {
    fn new(encoding: OpEnc, operands: &'static [Operand]) -> Self {
        Self {
            encoding,
            operands,
            opcode_reg: None,
            width: None,
        }
    }

    fn with_width(mut self, width: Width) -> Self {
        self.width = Some(width);
        self
    }

    fn with_opcode_reg(mut self, reg: u8) -> Self {
        self.opcode_reg = Some(reg);
        self
    }
}

/// Immediate group (0x80/0x81/0x83): /digit selects the ALU operation.
pub const GROUP1_OPS: &[(u8, Mnemonic)] = &[
    (0, Mnemonic::Add),
    (1, Mnemonic::Or),
    (2, Mnemonic::Adc),
    (3, Mnemonic::Sbb),
    (4, Mnemonic::And),
    (5, Mnemonic::Sub),
    (6, Mnemonic::Xor),
    (7, Mnemonic::Cmp),
];

/// Shift/rotate group (0xC0/0xC1/0xD0/0xD1).
pub const GROUP2_OPS: &[(u8, Mnemonic)] = &[
    (0, Mnemonic::Rol),
    (1, Mnemonic::Ror),
    (2, Mnemonic::Rcl),
    (3, Mnemonic::Rcr),
    (4, Mnemonic::Shl),
    (5, Mnemonic::Shr),
    (6, Mnemonic::Sal),
    (7, Mnemonic::Sar),
];

/// Unary/test group (0xF6/0xF7).
pub const GROUP3_OPS: &[(u8, Mnemonic)] = &[
    (0, Mnemonic::Test),
    (1, Mnemonic::Test),
    (2, Mnemonic::Not),
    (3, Mnemonic::Neg),
    (4, Mnemonic::Mul),
    (5, Mnemonic::Imul),
    (6, Mnemonic::Div),
    (7, Mnemonic::Idiv),
];

/// INC/DEC group (0xFE).
pub const GROUP4_OPS: &[(u8, Mnemonic)] = &[(0, Mnemonic::Inc), (1, Mnemonic::Dec)];

/// INC/DEC/CALL/JMP/PUSH group (0xFF). /3, /5, and /7 are reserved here
/// (far call/jmp are outside the supported subset).
pub const GROUP5_OPS: &[(u8, Mnemonic)] = &[
    (0, Mnemonic::Inc),
    (1, Mnemonic::Dec),
    (2, Mnemonic::Call),
    (4, Mnemonic::Jmp),
    (6, Mnemonic::Push),
];

const POP_OPS: &[(u8, Mnemonic)] = &[(0, Mnemonic::Pop)];
const MOV_OPS: &[(u8, Mnemonic)] = &[(0, Mnemonic::Mov)];
const NOP_OPS: &[(u8, Mnemonic)] = &[(0, Mnemonic::Nop)];

/// Looks up the mnemonic selection for `(prefix, opcode)`.
///
/// Two-byte opcodes carry 0x0F in the high byte of `opcode`.
pub fn opcode_kind(prefix: Prefix, opcode: u16) -> Option<OpcodeKind> {
    use Mnemonic::*;
    use OpcodeKind::{Group, Plain};
    use Prefix as P;

    Some(match (prefix, opcode) {
        // ALU families: r/m8,r8 / r/m,r / r8,r/m8 / r,r/m / al,imm8 / eax,imm
        (P::None, 0x00 | 0x02 | 0x04) => Plain(Add),
        (P::None | P::P66 | P::RexW, 0x01 | 0x03 | 0x05) => Plain(Add),
        (P::None, 0x08 | 0x0A | 0x0C) => Plain(Or),
        (P::None | P::P66 | P::RexW, 0x09 | 0x0B | 0x0D) => Plain(Or),
        (P::None, 0x10 | 0x12 | 0x14) => Plain(Adc),
        (P::None | P::P66 | P::RexW, 0x11 | 0x13 | 0x15) => Plain(Adc),
        (P::None, 0x18 | 0x1A | 0x1C) => Plain(Sbb),
        (P::None | P::P66 | P::RexW, 0x19 | 0x1B | 0x1D) => Plain(Sbb),
        (P::None, 0x20 | 0x22 | 0x24) => Plain(And),
        (P::None | P::P66 | P::RexW, 0x21 | 0x23 | 0x25) => Plain(And),
        (P::None, 0x28 | 0x2A | 0x2C) => Plain(Sub),
        (P::None | P::P66 | P::RexW, 0x29 | 0x2B | 0x2D) => Plain(Sub),
        (P::None, 0x30 | 0x32 | 0x34) => Plain(Xor),
        (P::None | P::P66 | P::RexW, 0x31 | 0x33 | 0x35) => Plain(Xor),
        (P::None, 0x38 | 0x3A | 0x3C) => Plain(Cmp),
        (P::None | P::P66 | P::RexW, 0x39 | 0x3B | 0x3D) => Plain(Cmp),

        // Stack operations (64-bit operands in 64-bit mode)
        (P::None, 0x50..=0x57) => Plain(Push),
        (P::None, 0x58..=0x5F) => Plain(Pop),
        (P::None | P::P66, 0x68 | 0x6A) => Plain(Push),
        (P::None, 0x8F) => Group(POP_OPS),

        // IMUL with immediate
        (P::None | P::P66 | P::RexW, 0x69 | 0x6B) => Plain(Imul),

        // String input/output
        (P::None, 0x6C) => Plain(Insb),
        (P::None, 0x6D) => Plain(Insd),
        (P::P66, 0x6D) => Plain(Insw),
        (P::None, 0x6E) => Plain(Outsb),
        (P::None, 0x6F) => Plain(Outsd),
        (P::P66, 0x6F) => Plain(Outsw),

        // Conditional jumps: rel8 and the 0x0F rel32 escape share the
        // condition in the low nibble
        (P::None, 0x70 | 0x0F80) => Plain(Jo),
        (P::None, 0x71 | 0x0F81) => Plain(Jno),
        (P::None, 0x72 | 0x0F82) => Plain(Jb),
        (P::None, 0x73 | 0x0F83) => Plain(Jae),
        (P::None, 0x74 | 0x0F84) => Plain(Jz),
        (P::None, 0x75 | 0x0F85) => Plain(Jnz),
        (P::None, 0x76 | 0x0F86) => Plain(Jbe),
        (P::None, 0x77 | 0x0F87) => Plain(Ja),
        (P::None, 0x78 | 0x0F88) => Plain(Js),
        (P::None, 0x79 | 0x0F89) => Plain(Jns),
        (P::None, 0x7A | 0x0F8A) => Plain(Jp),
        (P::None, 0x7B | 0x0F8B) => Plain(Jnp),
        (P::None, 0x7C | 0x0F8C) => Plain(Jl),
        (P::None, 0x7D | 0x0F8D) => Plain(Jge),
        (P::None, 0x7E | 0x0F8E) => Plain(Jle),
        (P::None, 0x7F | 0x0F8F) => Plain(Jg),

        // Immediate groups
        (P::None, 0x80) => Group(GROUP1_OPS),
        (P::None | P::P66 | P::RexW, 0x81 | 0x83) => Group(GROUP1_OPS),

        // TEST/XCHG/MOV/LEA ModR/M forms
        (P::None, 0x84) => Plain(Test),
        (P::None | P::P66 | P::RexW, 0x85) => Plain(Test),
        (P::None, 0x86) => Plain(Xchg),
        (P::None | P::P66 | P::RexW, 0x87) => Plain(Xchg),
        (P::None, 0x88 | 0x8A) => Plain(Mov),
        (P::None | P::P66 | P::RexW, 0x89 | 0x8B) => Plain(Mov),
        (P::None | P::P66 | P::RexW, 0x8D) => Plain(Lea),

        (P::None, 0x90) => Plain(Nop),
        (P::None | P::P66 | P::RexW, 0x91..=0x97) => Plain(Xchg),

        // Width conversions: the 0x66 prefix selects the narrow pair
        (P::None, 0x98) => Plain(Cwde),
        (P::P66, 0x98) => Plain(Cbw),
        (P::None, 0x99) => Plain(Cdq),
        (P::P66, 0x99) => Plain(Cwd),

        // MOV with memory-offset immediates
        (P::None, 0xA0 | 0xA2) => Plain(Mov),
        (P::None | P::P66 | P::RexW, 0xA1 | 0xA3) => Plain(Mov),

        // String operations
        (P::None, 0xA4) => Plain(Movsb),
        (P::None, 0xA5) => Plain(Movsd),
        (P::P66, 0xA5) => Plain(Movsw),
        (P::None, 0xA6) => Plain(Cmpsb),
        (P::None, 0xA7) => Plain(Cmpsd),
        (P::P66, 0xA7) => Plain(Cmpsw),
        (P::None, 0xAA) => Plain(Stosb),
        (P::None, 0xAB) => Plain(Stosd),
        (P::P66, 0xAB) => Plain(Stosw),
        (P::None, 0xAC) => Plain(Lodsb),
        (P::None, 0xAD) => Plain(Lodsd),
        (P::P66, 0xAD) => Plain(Lodsw),
        (P::None, 0xAE) => Plain(Scasb),
        (P::None, 0xAF) => Plain(Scasd),
        (P::P66, 0xAF) => Plain(Scasw),

        // TEST with accumulator
        (P::None, 0xA8) => Plain(Test),
        (P::None | P::P66 | P::RexW, 0xA9) => Plain(Test),

        // MOV with immediate
        (P::None, 0xB0..=0xB7) => Plain(Mov),
        (P::None | P::P66 | P::RexW, 0xB8..=0xBF) => Plain(Mov),
        (P::None, 0xC6) => Group(MOV_OPS),
        (P::None | P::P66 | P::RexW, 0xC7) => Group(MOV_OPS),

        // Shift/rotate groups
        (P::None, 0xC0 | 0xD0) => Group(GROUP2_OPS),
        (P::None | P::P66 | P::RexW, 0xC1 | 0xD1) => Group(GROUP2_OPS),

        (P::None, 0xC2 | 0xC3) => Plain(Ret),
        (P::None, 0xC8) => Plain(Enter),
        (P::None, 0xC9) => Plain(Leave),

        (P::None, 0xE2) => Plain(Loop),
        (P::None, 0xE3) => Plain(Jecxz),
        (P::None, 0xE4) => Plain(In),
        (P::None, 0xE6) => Plain(Out),
        (P::None, 0xE8) => Plain(Call),
        (P::None, 0xE9 | 0xEB) => Plain(Jmp),

        // Unary group
        (P::None, 0xF6) => Group(GROUP3_OPS),
        (P::None | P::P66 | P::RexW, 0xF7) => Group(GROUP3_OPS),

        // Flag operations
        (P::None, 0xF8) => Plain(Clc),
        (P::None, 0xF9) => Plain(Stc),
        (P::None, 0xFC) => Plain(Cld),
        (P::None, 0xFD) => Plain(Std),

        (P::None, 0xFE) => Group(GROUP4_OPS),
        (P::None | P::P66 | P::RexW, 0xFF) => Group(GROUP5_OPS),

        // Two-byte opcodes
        (P::None, 0x0F0B) => Plain(Ud2),
        (P::None | P::P66, 0x0F1F) => Group(NOP_OPS),
        (P::None, 0x0FA2) => Plain(Cpuid),
        (P::None | P::P66 | P::RexW, 0x0FAF) => Plain(Imul),

        _ => return None,
    })
}

const NO_OPS: &[Operand] = &[];
const RM_REG: &[Operand] = &[Operand::Rm, Operand::Reg];
const REG_RM: &[Operand] = &[Operand::Reg, Operand::Rm];
const RM_ONLY: &[Operand] = &[Operand::Rm];
const RM_ONE: &[Operand] = &[Operand::Rm, Operand::One];
const RM_IMM8: &[Operand] = &[Operand::Rm, Operand::Imm8];
const RM_IMM16: &[Operand] = &[Operand::Rm, Operand::Imm16];
const RM_IMM32: &[Operand] = &[Operand::Rm, Operand::Imm32];
const REG_ONLY: &[Operand] = &[Operand::Reg];
const REG_IMM8: &[Operand] = &[Operand::Reg, Operand::Imm8];
const REG_IMM16: &[Operand] = &[Operand::Reg, Operand::Imm16];
const REG_IMM32: &[Operand] = &[Operand::Reg, Operand::Imm32];
const REG_IMM64: &[Operand] = &[Operand::Reg, Operand::Imm64];
const REG_RM_IMM8: &[Operand] = &[Operand::Reg, Operand::Rm, Operand::Imm8];
const REG_RM_IMM16: &[Operand] = &[Operand::Reg, Operand::Rm, Operand::Imm16];
const REG_RM_IMM32: &[Operand] = &[Operand::Reg, Operand::Rm, Operand::Imm32];
const IMM8_ONLY: &[Operand] = &[Operand::Imm8];
const IMM16_ONLY: &[Operand] = &[Operand::Imm16];
const IMM32_ONLY: &[Operand] = &[Operand::Imm32];
const IMM16_IMM8: &[Operand] = &[Operand::Imm16, Operand::Imm8];
const AL_IMM8: &[Operand] = &[Operand::Al, Operand::Imm8];
const AX_IMM16: &[Operand] = &[Operand::Ax, Operand::Imm16];
const EAX_IMM32: &[Operand] = &[Operand::Eax, Operand::Imm32];
const RAX_IMM32: &[Operand] = &[Operand::Rax, Operand::Imm32];
const IMM8_AL: &[Operand] = &[Operand::Imm8, Operand::Al];
const AL_MOFF: &[Operand] = &[Operand::Al, Operand::Moff];
const AX_MOFF: &[Operand] = &[Operand::Ax, Operand::Moff];
const EAX_MOFF: &[Operand] = &[Operand::Eax, Operand::Moff];
const RAX_MOFF: &[Operand] = &[Operand::Rax, Operand::Moff];
const MOFF_AL: &[Operand] = &[Operand::Moff, Operand::Al];
const MOFF_AX: &[Operand] = &[Operand::Moff, Operand::Ax];
const MOFF_EAX: &[Operand] = &[Operand::Moff, Operand::Eax];
const MOFF_RAX: &[Operand] = &[Operand::Moff, Operand::Rax];
const REG_AX: &[Operand] = &[Operand::Reg, Operand::Ax];
const REG_EAX: &[Operand] = &[Operand::Reg, Operand::Eax];
const REG_RAX: &[Operand] = &[Operand::Reg, Operand::Rax];

/// Looks up the operand-table row for `(prefix, mnemonic, opcode)`.
///
/// The caller always passes a mnemonic resolved by `opcode_kind` for the
/// same prefix and opcode; rows that are unambiguous for their opcode match
/// the mnemonic with a wildcard.
pub fn operand_entry(prefix: Prefix, mnemonic: Mnemonic, opcode: u16) -> Option<OperandEntry> {
    use Mnemonic::*;
    use Prefix as P;
    use Width::{W64, W8};

    Some(match (prefix, mnemonic, opcode) {
        // ALU families
        (P::None, _, 0x00 | 0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38) => {
            OperandEntry::new(OpEnc::Mr, RM_REG).with_width(W8)
        }
        (_, _, 0x01 | 0x09 | 0x11 | 0x19 | 0x21 | 0x29 | 0x31 | 0x39) => {
            OperandEntry::new(OpEnc::Mr, RM_REG)
        }
        (P::None, _, 0x02 | 0x0A | 0x12 | 0x1A | 0x22 | 0x2A | 0x32 | 0x3A) => {
            OperandEntry::new(OpEnc::Rm, REG_RM).with_width(W8)
        }
        (_, _, 0x03 | 0x0B | 0x13 | 0x1B | 0x23 | 0x2B | 0x33 | 0x3B) => {
            OperandEntry::new(OpEnc::Rm, REG_RM)
        }
        (P::None, _, 0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C) => {
            OperandEntry::new(OpEnc::I, AL_IMM8)
        }
        (P::None, _, 0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D) => {
            OperandEntry::new(OpEnc::I, EAX_IMM32)
        }
        (P::P66, _, 0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D) => {
            OperandEntry::new(OpEnc::I, AX_IMM16)
        }
        (P::RexW, _, 0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D) => {
            OperandEntry::new(OpEnc::I, RAX_IMM32)
        }

        // Stack operations
        (P::None, _, op @ 0x50..=0x57) => OperandEntry::new(OpEnc::O, REG_ONLY)
            .with_width(W64)
            .with_opcode_reg((op - 0x50) as u8),
        (P::None, _, op @ 0x58..=0x5F) => OperandEntry::new(OpEnc::O, REG_ONLY)
            .with_width(W64)
            .with_opcode_reg((op - 0x58) as u8),
        (P::None, _, 0x68) => OperandEntry::new(OpEnc::I, IMM32_ONLY),
        (P::P66, _, 0x68) => OperandEntry::new(OpEnc::I, IMM16_ONLY),
        (P::None | P::P66, _, 0x6A) => OperandEntry::new(OpEnc::I, IMM8_ONLY),
        (P::None, _, 0x8F) => OperandEntry::new(OpEnc::M, RM_ONLY).with_width(W64),

        // IMUL with immediate
        (P::None | P::RexW, _, 0x69) => OperandEntry::new(OpEnc::Rmi, REG_RM_IMM32),
        (P::P66, _, 0x69) => OperandEntry::new(OpEnc::Rmi, REG_RM_IMM16),
        (_, _, 0x6B) => OperandEntry::new(OpEnc::Rmi, REG_RM_IMM8),

        // No-operand forms: string operations, width conversions
        (P::None | P::P66, _, 0x6C..=0x6F | 0x98 | 0x99 | 0xA4..=0xA7 | 0xAA..=0xAF) => {
            OperandEntry::new(OpEnc::Np, NO_OPS)
        }
        (P::None, _, 0x90 | 0xC3 | 0xC9 | 0xF8 | 0xF9 | 0xFC | 0xFD | 0x0F0B | 0x0FA2) => {
            OperandEntry::new(OpEnc::Np, NO_OPS)
        }

        // Relative branches: rendered as plain immediates
        (P::None, _, 0x70..=0x7F | 0xE2 | 0xE3 | 0xEB) => OperandEntry::new(OpEnc::D, IMM8_ONLY),
        (P::None, _, 0xE8 | 0xE9 | 0x0F80..=0x0F8F) => OperandEntry::new(OpEnc::D, IMM32_ONLY),

        // Immediate groups
        (P::None, _, 0x80) => OperandEntry::new(OpEnc::Mi, RM_IMM8).with_width(W8),
        (P::None | P::RexW, _, 0x81) => OperandEntry::new(OpEnc::Mi, RM_IMM32),
        (P::P66, _, 0x81) => OperandEntry::new(OpEnc::Mi, RM_IMM16),
        (_, _, 0x83) => OperandEntry::new(OpEnc::Mi, RM_IMM8),

        // TEST/XCHG/MOV ModR/M forms
        (P::None, _, 0x84 | 0x86 | 0x88) => OperandEntry::new(OpEnc::Mr, RM_REG).with_width(W8),
        (_, _, 0x85 | 0x87 | 0x89) => OperandEntry::new(OpEnc::Mr, RM_REG),
        (P::None, _, 0x8A) => OperandEntry::new(OpEnc::Rm, REG_RM).with_width(W8),
        (_, _, 0x8B | 0x8D) => OperandEntry::new(OpEnc::Rm, REG_RM),

        // XCHG with the accumulator
        (P::None, _, op @ 0x91..=0x97) => {
            OperandEntry::new(OpEnc::O, REG_EAX).with_opcode_reg((op - 0x90) as u8)
        }
        (P::P66, _, op @ 0x91..=0x97) => {
            OperandEntry::new(OpEnc::O, REG_AX).with_opcode_reg((op - 0x90) as u8)
        }
        (P::RexW, _, op @ 0x91..=0x97) => {
            OperandEntry::new(OpEnc::O, REG_RAX).with_opcode_reg((op - 0x90) as u8)
        }

        // MOV with memory-offset immediates
        (P::None, _, 0xA0) => OperandEntry::new(OpEnc::I, AL_MOFF),
        (P::None, _, 0xA1) => OperandEntry::new(OpEnc::I, EAX_MOFF),
        (P::P66, _, 0xA1) => OperandEntry::new(OpEnc::I, AX_MOFF),
        (P::RexW, _, 0xA1) => OperandEntry::new(OpEnc::I, RAX_MOFF),
        (P::None, _, 0xA2) => OperandEntry::new(OpEnc::I, MOFF_AL),
        (P::None, _, 0xA3) => OperandEntry::new(OpEnc::I, MOFF_EAX),
        (P::P66, _, 0xA3) => OperandEntry::new(OpEnc::I, MOFF_AX),
        (P::RexW, _, 0xA3) => OperandEntry::new(OpEnc::I, MOFF_RAX),

        // TEST with the accumulator
        (P::None, _, 0xA8) => OperandEntry::new(OpEnc::I, AL_IMM8),
        (P::None, _, 0xA9) => OperandEntry::new(OpEnc::I, EAX_IMM32),
        (P::P66, _, 0xA9) => OperandEntry::new(OpEnc::I, AX_IMM16),
        (P::RexW, _, 0xA9) => OperandEntry::new(OpEnc::I, RAX_IMM32),

        // MOV with immediate
        (P::None, _, op @ 0xB0..=0xB7) => OperandEntry::new(OpEnc::Oi, REG_IMM8)
            .with_width(W8)
            .with_opcode_reg((op - 0xB0) as u8),
        (P::None, _, op @ 0xB8..=0xBF) => {
            OperandEntry::new(OpEnc::Oi, REG_IMM32).with_opcode_reg((op - 0xB8) as u8)
        }
        (P::P66, _, op @ 0xB8..=0xBF) => {
            OperandEntry::new(OpEnc::Oi, REG_IMM16).with_opcode_reg((op - 0xB8) as u8)
        }
        (P::RexW, _, op @ 0xB8..=0xBF) => {
            OperandEntry::new(OpEnc::Oi, REG_IMM64).with_opcode_reg((op - 0xB8) as u8)
        }
        (P::None, Mov, 0xC6) => OperandEntry::new(OpEnc::Mi, RM_IMM8).with_width(W8),
        (P::None | P::RexW, Mov, 0xC7) => OperandEntry::new(OpEnc::Mi, RM_IMM32),
        (P::P66, Mov, 0xC7) => OperandEntry::new(OpEnc::Mi, RM_IMM16),

        // Shift/rotate groups
        (P::None, _, 0xC0) => OperandEntry::new(OpEnc::Mi, RM_IMM8).with_width(W8),
        (_, _, 0xC1) => OperandEntry::new(OpEnc::Mi, RM_IMM8),
        (P::None, _, 0xD0) => OperandEntry::new(OpEnc::M1, RM_ONE).with_width(W8),
        (_, _, 0xD1) => OperandEntry::new(OpEnc::M1, RM_ONE),

        (P::None, _, 0xC2) => OperandEntry::new(OpEnc::I, IMM16_ONLY),
        (P::None, _, 0xC8) => OperandEntry::new(OpEnc::I, IMM16_IMM8),

        // I/O with an immediate port
        (P::None, _, 0xE4) => OperandEntry::new(OpEnc::I, AL_IMM8),
        (P::None, _, 0xE6) => OperandEntry::new(OpEnc::I, IMM8_AL),

        // Unary group: TEST carries an immediate, the rest take r/m only
        (P::None, Test, 0xF6) => OperandEntry::new(OpEnc::Mi, RM_IMM8).with_width(W8),
        (P::None, _, 0xF6) => OperandEntry::new(OpEnc::M, RM_ONLY).with_width(W8),
        (P::None | P::RexW, Test, 0xF7) => OperandEntry::new(OpEnc::Mi, RM_IMM32),
        (P::P66, Test, 0xF7) => OperandEntry::new(OpEnc::Mi, RM_IMM16),
        (_, _, 0xF7) => OperandEntry::new(OpEnc::M, RM_ONLY),

        (P::None, _, 0xFE) => OperandEntry::new(OpEnc::M, RM_ONLY).with_width(W8),

        // CALL/JMP/PUSH through r/m always use 64-bit operands in 64-bit
        // mode; INC/DEC keep the prefix-derived width
        (_, Call | Jmp | Push, 0xFF) => OperandEntry::new(OpEnc::M, RM_ONLY).with_width(W64),
        (_, Inc | Dec, 0xFF) => OperandEntry::new(OpEnc::M, RM_ONLY),

        // Two-byte opcodes
        (P::None | P::P66, Nop, 0x0F1F) => OperandEntry::new(OpEnc::M, RM_ONLY),
        (_, Imul, 0x0FAF) => OperandEntry::new(OpEnc::Rm, REG_RM),

        _ => return None,
    })
}
