//! ModR/M and SIB byte views, and the memory-operand renderer.

use unasm_core::{register_name, Width};

use crate::prefix::Rex;

/// Decoded ModR/M byte.
///
/// `reg` and `rm` are stored REX-extended to 4 bits; the addressing-mode
/// predicates mask back down to the raw 3-bit fields where the encoding
/// rules are defined on them.
#[derive(Debug, Clone, Copy)]
pub struct ModRM {
    /// Mod field (2 bits).
    pub mod_: u8,
    /// Reg field (3 bits, extended by REX.R).
    pub reg: u8,
    /// R/M field (3 bits, extended by REX.B).
    pub rm: u8,
}

impl ModRM {
    /// Parses a ModR/M byte with REX extension.
    pub fn parse(byte: u8, rex: Option<Rex>) -> Self {
        let rex = rex.unwrap_or_default();
        Self {
            mod_: (byte >> 6) & 0x3,
            reg: ((byte >> 3) & 0x7) | ((rex.r as u8) << 3),
            rm: (byte & 0x7) | ((rex.b as u8) << 3),
        }
    }

    /// Returns true if this ModR/M encodes a register operand (mod=11).
    pub fn is_register(&self) -> bool {
        self.mod_ == 0b11
    }

    /// Returns true if this ModR/M requires a SIB byte.
    pub fn needs_sib(&self) -> bool {
        self.mod_ != 0b11 && (self.rm & 0x7) == 0b100
    }

    /// Returns true if an 8-bit displacement follows.
    pub fn has_disp8(&self) -> bool {
        self.mod_ == 0b01
    }

    /// Returns true if a 32-bit displacement follows.
    pub fn has_disp32(&self) -> bool {
        self.mod_ == 0b10 || self.is_rip_relative()
    }

    /// Returns true for the mod=00, rm=101 RIP-relative form.
    pub fn is_rip_relative(&self) -> bool {
        self.mod_ == 0b00 && (self.rm & 0x7) == 0b101
    }
}

/// Decoded SIB byte.
///
/// Constructed together with the ModR/M mod field, which governs whether
/// the base-omission rule applies and which displacement follows.
#[derive(Debug, Clone, Copy)]
pub struct Sib {
    /// Scale field (2 bits); the factor is `1 << scale`.
    pub scale: u8,
    /// Index register (3 bits, extended by REX.X).
    pub index: u8,
    /// Base register (3 bits, extended by REX.B).
    pub base: u8,
    mod_: u8,
}

impl Sib {
    /// Parses a SIB byte with REX extension under the given ModR/M mod.
    pub fn parse(byte: u8, mod_: u8, rex: Option<Rex>) -> Self {
        let rex = rex.unwrap_or_default();
        Self {
            scale: (byte >> 6) & 0x3,
            index: ((byte >> 3) & 0x7) | ((rex.x as u8) << 3),
            base: (byte & 0x7) | ((rex.b as u8) << 3),
            mod_,
        }
    }

    /// Returns the scale factor (1, 2, 4, or 8).
    pub fn scale_factor(&self) -> u8 {
        1 << self.scale
    }

    /// Returns true if an index term is present. The raw encoding 100
    /// without REX.X means "no index"; with REX.X it selects r12.
    pub fn has_index(&self) -> bool {
        self.index != 0b100
    }

    /// Returns true if a base term is present. Raw base 101 under mod=00
    /// drops the base and forces a 32-bit displacement instead.
    pub fn has_base(&self) -> bool {
        !self.forces_disp32()
    }

    /// Returns true if this SIB demands a 32-bit displacement regardless of
    /// the ModR/M displacement flags.
    pub fn forces_disp32(&self) -> bool {
        (self.base & 0x7) == 0b101 && self.mod_ == 0b00
    }
}

/// Formats a 32-bit displacement as `0x` + eight hex digits.
fn disp32_literal(disp: u32) -> String {
    format!("0x{disp:08x}")
}

/// Renders a memory operand from the ModR/M byte, the optional SIB byte,
/// and the captured displacements.
///
/// Displacement formatting is asymmetric by design of the output format:
/// disp8 renders as an unsigned decimal term, disp32 as a zero-padded hex
/// literal. Inside a SIB operand the displacement leads; in the plain
/// base-register form it trails the base.
pub fn memory_operand(
    modrm: &ModRM,
    sib: Option<&Sib>,
    disp8: Option<u8>,
    disp32: Option<u32>,
) -> String {
    if let Some(sib) = sib {
        let mut terms: Vec<String> = Vec::new();
        if let Some(disp) = disp8 {
            terms.push(disp.to_string());
        } else if let Some(disp) = disp32 {
            terms.push(disp32_literal(disp));
        }
        if sib.has_base() {
            terms.push(register_name(sib.base, Width::W64).to_string());
        }
        if sib.has_index() {
            terms.push(format!(
                "{} * {}",
                register_name(sib.index, Width::W64),
                sib.scale_factor()
            ));
        }
        if !sib.has_base() && !sib.has_index() {
            // Neither register survives: a bare absolute displacement.
            return terms.pop().unwrap_or_default();
        }
        return format!("[{}]", terms.join(" + "));
    }

    if modrm.is_rip_relative() {
        // RIP-relative: rendered as the bare target displacement.
        return disp32_literal(disp32.unwrap_or_default());
    }

    let base = register_name(modrm.rm, Width::W64);
    match (disp8, disp32) {
        (Some(disp), _) => format!("[{base} + {disp}]"),
        (None, Some(disp)) => format!("[{base} + {}]", disp32_literal(disp)),
        (None, None) => format!("[{base}]"),
    }
}
