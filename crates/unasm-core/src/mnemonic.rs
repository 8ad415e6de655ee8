//! Mnemonic vocabulary for the supported x86-64 subset.

/// Instruction mnemonics the decoder can produce.
///
/// Rendering is always lower case; `as_str` is the single source of truth
/// for the textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mnemonic {
    Mov,
    Lea,
    Add,
    Adc,
    Sub,
    Sbb,
    Mul,
    Imul,
    Div,
    Idiv,
    Inc,
    Dec,
    And,
    Or,
    Xor,
    Not,
    Neg,
    Cmp,
    Test,
    Sal,
    Shl,
    Sar,
    Shr,
    Rcl,
    Rcr,
    Rol,
    Ror,
    Jmp,
    Loop,
    Jz,
    Jnz,
    Ja,
    Jae,
    Jb,
    Jbe,
    Jg,
    Jge,
    Jl,
    Jle,
    Jp,
    Jnp,
    Jo,
    Jno,
    Js,
    Jns,
    Jecxz,
    Call,
    Ret,
    Push,
    Pop,
    Movsb,
    Movsw,
    Movsd,
    Cmpsb,
    Cmpsw,
    Cmpsd,
    Stosb,
    Stosw,
    Stosd,
    Lodsb,
    Lodsw,
    Lodsd,
    Scasb,
    Scasw,
    Scasd,
    Insb,
    Insw,
    Insd,
    Outsb,
    Outsw,
    Outsd,
    In,
    Out,
    Cbw,
    Cwde,
    Cwd,
    Cdq,
    Enter,
    Leave,
    Nop,
    Ud2,
    Cpuid,
    Xchg,
    Stc,
    Clc,
    Cld,
    Std,
}

impl Mnemonic {
    /// Returns the lower-case textual form of this mnemonic.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mov => "mov",
            Self::Lea => "lea",
            Self::Add => "add",
            Self::Adc => "adc",
            Self::Sub => "sub",
            Self::Sbb => "sbb",
            Self::Mul => "mul",
            Self::Imul => "imul",
            Self::Div => "div",
            Self::Idiv => "idiv",
            Self::Inc => "inc",
            Self::Dec => "dec",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Not => "not",
            Self::Neg => "neg",
            Self::Cmp => "cmp",
            Self::Test => "test",
            Self::Sal => "sal",
            Self::Shl => "shl",
            Self::Sar => "sar",
            Self::Shr => "shr",
            Self::Rcl => "rcl",
            Self::Rcr => "rcr",
            Self::Rol => "rol",
            Self::Ror => "ror",
            Self::Jmp => "jmp",
            Self::Loop => "loop",
            Self::Jz => "jz",
            Self::Jnz => "jnz",
            Self::Ja => "ja",
            Self::Jae => "jae",
            Self::Jb => "jb",
            Self::Jbe => "jbe",
            Self::Jg => "jg",
            Self::Jge => "jge",
            Self::Jl => "jl",
            Self::Jle => "jle",
            Self::Jp => "jp",
            Self::Jnp => "jnp",
            Self::Jo => "jo",
            Self::Jno => "jno",
            Self::Js => "js",
            Self::Jns => "jns",
            Self::Jecxz => "jecxz",
            Self::Call => "call",
            Self::Ret => "ret",
            Self::Push => "push",
            Self::Pop => "pop",
            Self::Movsb => "movsb",
            Self::Movsw => "movsw",
            Self::Movsd => "movsd",
            Self::Cmpsb => "cmpsb",
            Self::Cmpsw => "cmpsw",
            Self::Cmpsd => "cmpsd",
            Self::Stosb => "stosb",
            Self::Stosw => "stosw",
            Self::Stosd => "stosd",
            Self::Lodsb => "lodsb",
            Self::Lodsw => "lodsw",
            Self::Lodsd => "lodsd",
            Self::Scasb => "scasb",
            Self::Scasw => "scasw",
            Self::Scasd => "scasd",
            Self::Insb => "insb",
            Self::Insw => "insw",
            Self::Insd => "insd",
            Self::Outsb => "outsb",
            Self::Outsw => "outsw",
            Self::Outsd => "outsd",
            Self::In => "in",
            Self::Out => "out",
            Self::Cbw => "cbw",
            Self::Cwde => "cwde",
            Self::Cwd => "cwd",
            Self::Cdq => "cdq",
            Self::Enter => "enter",
            Self::Leave => "leave",
            Self::Nop => "nop",
            Self::Ud2 => "ud2",
            Self::Cpuid => "cpuid",
            Self::Xchg => "xchg",
            Self::Stc => "stc",
            Self::Clc => "clc",
            Self::Cld => "cld",
            Self::Std => "std",
        }
    }
}

impl std::fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
