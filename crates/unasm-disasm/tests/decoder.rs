//! End-to-end decoder tests over raw instruction bytes.

use unasm_core::Mnemonic;
use unasm_disasm::{DecodeError, Disassembler};

#[test]
fn one_byte() {
    let obj = [0x90, 0xC3];
    let mut disasm = Disassembler::new(&obj);

    let inst = disasm.decode_single(0).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Nop);
    assert_eq!(inst.len, 1);
    assert_eq!(inst.assembly, " nop ");

    let inst = disasm.decode_single(1).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Ret);
    assert_eq!(inst.assembly, " ret ");
}

#[test]
fn one_byte_imm() {
    let obj = [
        0xB8, 0x44, 0x33, 0x22, 0x11, // mov  eax 0x11223344
        0xB9, 0x44, 0x33, 0x22, 0x11, // mov  ecx 0x11223344
        0x05, 0x44, 0x33, 0x22, 0x11, // add  eax 0x11223344
        0x2D, 0x44, 0x33, 0x22, 0x11, // sub  eax 0x11223344
    ];
    let mut disasm = Disassembler::new(&obj);

    let inst = disasm.decode_single(0).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Mov);
    assert_eq!(disasm.lookup(0, 5), Some(" mov  eax 0x11223344"));

    let inst = disasm.decode_single(5).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Mov);
    assert_eq!(disasm.lookup(5, 10), Some(" mov  ecx 0x11223344"));

    let inst = disasm.decode_single(10).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Add);
    assert_eq!(disasm.lookup(10, 15), Some(" add  eax 0x11223344"));

    let inst = disasm.decode_single(15).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Sub);
    assert_eq!(disasm.lookup(15, 20), Some(" sub  eax 0x11223344"));
}

#[test]
fn one_byte_imm_size() {
    let obj = [
        0xB0, 0x11, // mov  al 0x11
        0x66, 0xB8, 0x22, 0x11, // mov  ax 0x1122
        0xB8, 0x44, 0x33, 0x22, 0x11, // mov  eax 0x11223344
        0x48, 0xB8, 0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11, // mov  rax 0x1122...
    ];
    let mut disasm = Disassembler::new(&obj);

    disasm.decode_single(0).unwrap();
    assert_eq!(disasm.lookup(0, 2), Some(" mov  al 0x11"));

    disasm.decode_single(2).unwrap();
    assert_eq!(disasm.lookup(2, 6), Some(" mov  ax 0x1122"));

    disasm.decode_single(6).unwrap();
    assert_eq!(disasm.lookup(6, 11), Some(" mov  eax 0x11223344"));

    let inst = disasm.decode_single(11).unwrap();
    assert_eq!(inst.len, 10);
    assert_eq!(disasm.lookup(11, 21), Some(" mov  rax 0x1122334455667788"));
}

#[test]
fn several_add() {
    let obj = [
        0x01, 0xC1, // add  ecx eax
        0x01, 0x04, 0x25, 0x00, 0x00, 0x00, 0x00, // add  0x00000000 eax
        0x01, 0x00, // add  [rax] eax
        0x01, 0x04, 0x00, // add  [rax + rax * 1] eax
        0x01, 0x44, 0x00, 0x01, // add  [1 + rax + rax * 1] eax
        0x01, 0x84, 0x00, 0x00, 0x80, 0x00, 0x00, // add  [0x00008000 + rax + rax * 1] eax
    ];
    let mut disasm = Disassembler::new(&obj);

    disasm.decode_single(0).unwrap();
    assert_eq!(disasm.lookup(0, 2), Some(" add  ecx eax"));

    disasm.decode_single(2).unwrap();
    assert_eq!(disasm.lookup(2, 9), Some(" add  0x00000000 eax"));

    disasm.decode_single(9).unwrap();
    assert_eq!(disasm.lookup(9, 11), Some(" add  [rax] eax"));

    disasm.decode_single(11).unwrap();
    assert_eq!(disasm.lookup(11, 14), Some(" add  [rax + rax * 1] eax"));

    disasm.decode_single(14).unwrap();
    assert_eq!(disasm.lookup(14, 18), Some(" add  [1 + rax + rax * 1] eax"));

    let inst = disasm.decode_single(18).unwrap();
    assert_eq!(inst.len, 7);
    assert_eq!(
        disasm.lookup(18, 25),
        Some(" add  [0x00008000 + rax + rax * 1] eax")
    );
}

#[test]
fn modrm_reg_cycles_registers() {
    let obj = [
        0x01, 0x00, 0x01, 0x08, 0x01, 0x10, 0x01, 0x18, 0x01, 0x20, 0x01, 0x28, 0x01, 0x30, 0x01,
        0x38,
    ];
    let expected = [
        " add  [rax] eax",
        " add  [rax] ecx",
        " add  [rax] edx",
        " add  [rax] ebx",
        " add  [rax] esp",
        " add  [rax] ebp",
        " add  [rax] esi",
        " add  [rax] edi",
    ];
    let mut disasm = Disassembler::new(&obj);
    for (i, text) in expected.iter().enumerate() {
        let inst = disasm.decode_single(i * 2).unwrap();
        assert_eq!(inst.mnemonic, Mnemonic::Add);
        assert_eq!(disasm.lookup(i * 2, i * 2 + 2), Some(*text));
    }
}

#[test]
fn modrm_mod11_cycles_registers() {
    let obj = [
        0x01, 0xC0, 0x01, 0xC1, 0x01, 0xC2, 0x01, 0xC3, 0x01, 0xC4, 0x01, 0xC5, 0x01, 0xC6, 0x01,
        0xC7,
    ];
    let expected = [
        " add  eax eax",
        " add  ecx eax",
        " add  edx eax",
        " add  ebx eax",
        " add  esp eax",
        " add  ebp eax",
        " add  esi eax",
        " add  edi eax",
    ];
    let mut disasm = Disassembler::new(&obj);
    for (i, text) in expected.iter().enumerate() {
        disasm.decode_single(i * 2).unwrap();
        assert_eq!(disasm.lookup(i * 2, i * 2 + 2), Some(*text));
    }

    // the RM form swaps the operand order
    let obj = [0x03, 0xC1];
    let mut disasm = Disassembler::new(&obj);
    disasm.decode_single(0).unwrap();
    assert_eq!(disasm.lookup(0, 2), Some(" add  eax ecx"));
}

#[test]
fn modrm_mod_displacements() {
    let obj = [
        0x8B, 0x08, // mov  ecx [rax]
        0x8B, 0x48, 0x01, // mov  ecx [rax + 1]
        0x8B, 0x88, 0x00, 0x01, 0x00, 0x00, // mov  ecx [rax + 0x00000100]
    ];
    let mut disasm = Disassembler::new(&obj);

    disasm.decode_single(0).unwrap();
    assert_eq!(disasm.lookup(0, 2), Some(" mov  ecx [rax]"));

    disasm.decode_single(2).unwrap();
    assert_eq!(disasm.lookup(2, 5), Some(" mov  ecx [rax + 1]"));

    disasm.decode_single(5).unwrap();
    assert_eq!(disasm.lookup(5, 11), Some(" mov  ecx [rax + 0x00000100]"));
}

#[test]
fn modrm_mod00_rm101() {
    let obj = [
        0x8B, 0x4D, 0x00, // mov  ecx [rbp + 0]
        0x8B, 0x4D, 0x01, // mov  ecx [rbp + 1]
        0x8B, 0x8D, 0x00, 0x01, 0x00, 0x00, // mov  ecx [rbp + 0x00000100]
        0x8B, 0x0C, 0x25, 0x00, 0x00, 0x08, 0x00, // mov  ecx 0x00080000
    ];
    let mut disasm = Disassembler::new(&obj);

    disasm.decode_single(0).unwrap();
    assert_eq!(disasm.lookup(0, 3), Some(" mov  ecx [rbp + 0]"));

    disasm.decode_single(3).unwrap();
    assert_eq!(disasm.lookup(3, 6), Some(" mov  ecx [rbp + 1]"));

    disasm.decode_single(6).unwrap();
    assert_eq!(disasm.lookup(6, 12), Some(" mov  ecx [rbp + 0x00000100]"));

    let inst = disasm.decode_single(12).unwrap();
    assert_eq!(inst.len, 7);
    assert_eq!(disasm.lookup(12, 19), Some(" mov  ecx 0x00080000"));
}

#[test]
fn rip_relative() {
    // mod=00, rm=101 without SIB: rendered as the bare displacement
    let obj = [0x8B, 0x05, 0x10, 0x00, 0x00, 0x00];
    let mut disasm = Disassembler::new(&obj);
    let inst = disasm.decode_single(0).unwrap();
    assert_eq!(inst.len, 6);
    assert_eq!(disasm.lookup(0, 6), Some(" mov  eax 0x00000010"));
}

#[test]
fn modrm_sib_rsp() {
    let obj = [
        0x8B, 0x14, 0x08, // mov  edx [rax + rcx * 1]
        0x8B, 0x54, 0x08, 0x01, // mov  edx [1 + rax + rcx * 1]
        0x8B, 0x14, 0x48, // mov  edx [rax + rcx * 2]
        0x8B, 0x14, 0x24, // mov  edx [rsp]
    ];
    let mut disasm = Disassembler::new(&obj);

    disasm.decode_single(0).unwrap();
    assert_eq!(disasm.lookup(0, 3), Some(" mov  edx [rax + rcx * 1]"));

    disasm.decode_single(3).unwrap();
    assert_eq!(disasm.lookup(3, 7), Some(" mov  edx [1 + rax + rcx * 1]"));

    disasm.decode_single(7).unwrap();
    assert_eq!(disasm.lookup(7, 10), Some(" mov  edx [rax + rcx * 2]"));

    disasm.decode_single(10).unwrap();
    assert_eq!(disasm.lookup(10, 13), Some(" mov  edx [rsp]"));
}

#[test]
fn add_imm() {
    let obj = [
        0x01, 0xC0, // add  eax eax
        0x83, 0xC0, 0x01, // add  eax 0x01
    ];
    let mut disasm = Disassembler::new(&obj);

    disasm.decode_single(0).unwrap();
    assert_eq!(disasm.lookup(0, 2), Some(" add  eax eax"));

    let inst = disasm.decode_single(2).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Add);
    assert_eq!(disasm.lookup(2, 5), Some(" add  eax 0x01"));
}

#[test]
fn modrm_opcode_extension() {
    let obj = [
        0x83, 0xC0, 0x01, // add  eax 0x01
        0x83, 0xC8, 0x01, // or   eax 0x01
        0x83, 0xD0, 0x01, // adc  eax 0x01
        0x83, 0xD8, 0x01, // sbb  eax 0x01
        0x83, 0xE0, 0x01, // and  eax 0x01
        0x83, 0xE8, 0x01, // sub  eax 0x01
        0x83, 0xF0, 0x01, // xor  eax 0x01
        0x83, 0xF8, 0x01, // cmp  eax 0x01
    ];
    let expected = [
        (Mnemonic::Add, " add  eax 0x01"),
        (Mnemonic::Or, " or  eax 0x01"),
        (Mnemonic::Adc, " adc  eax 0x01"),
        (Mnemonic::Sbb, " sbb  eax 0x01"),
        (Mnemonic::And, " and  eax 0x01"),
        (Mnemonic::Sub, " sub  eax 0x01"),
        (Mnemonic::Xor, " xor  eax 0x01"),
        (Mnemonic::Cmp, " cmp  eax 0x01"),
    ];
    let mut disasm = Disassembler::new(&obj);
    for (i, (mnemonic, text)) in expected.iter().enumerate() {
        let inst = disasm.decode_single(i * 3).unwrap();
        assert_eq!(inst.mnemonic, *mnemonic);
        assert_eq!(disasm.lookup(i * 3, i * 3 + 3), Some(*text));
    }
}

#[test]
fn rexw_promotes_width() {
    let obj = [
        0x83, 0xC0, 0x01, // add  eax 0x01
        0x48, 0x83, 0xC0, 0x01, // add  rax 0x01
    ];
    let mut disasm = Disassembler::new(&obj);

    let inst = disasm.decode_single(0).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Add);
    assert_eq!(disasm.lookup(0, 3), Some(" add  eax 0x01"));

    let inst = disasm.decode_single(3).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Add);
    assert_eq!(disasm.lookup(3, 7), Some(" add  rax 0x01"));
}

#[test]
fn rex_rxb_extend_independently() {
    let obj = [
        0x44, 0x01, 0x04, 0x91, // REX.R: add  [rcx + rdx * 4] r8d
        0x42, 0x01, 0x04, 0x91, // REX.X: add  [rcx + r10 * 4] eax
        0x41, 0x01, 0x04, 0x91, // REX.B: add  [r9 + rdx * 4] eax
    ];
    let mut disasm = Disassembler::new(&obj);

    disasm.decode_single(0).unwrap();
    assert_eq!(disasm.lookup(0, 4), Some(" add  [rcx + rdx * 4] r8d"));

    disasm.decode_single(4).unwrap();
    assert_eq!(disasm.lookup(4, 8), Some(" add  [rcx + r10 * 4] eax"));

    disasm.decode_single(8).unwrap();
    assert_eq!(disasm.lookup(8, 12), Some(" add  [r9 + rdx * 4] eax"));
}

#[test]
fn rex_b_extends_opcode_register() {
    // REX.B on an OI-form opcode selects the extended register file
    let obj = [0x49, 0xB8, 0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11];
    let mut disasm = Disassembler::new(&obj);
    disasm.decode_single(0).unwrap();
    assert_eq!(disasm.lookup(0, 10), Some(" mov  r8 0x1122334455667788"));
}

#[test]
fn push_pop_render_64_bit() {
    let obj = [0x55, 0x5D, 0x41, 0x54];
    let mut disasm = Disassembler::new(&obj);

    let inst = disasm.decode_single(0).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Push);
    assert_eq!(disasm.lookup(0, 1), Some(" push  rbp"));

    let inst = disasm.decode_single(1).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Pop);
    assert_eq!(disasm.lookup(1, 2), Some(" pop  rbp"));

    // REX.B reaches r12 through the fallback to the unprefixed row
    disasm.decode_single(2).unwrap();
    assert_eq!(disasm.lookup(2, 4), Some(" push  r12"));
}

#[test]
fn lea_renders_memory_operand() {
    let obj = [0x48, 0x8D, 0x44, 0x08, 0x02];
    let mut disasm = Disassembler::new(&obj);
    let inst = disasm.decode_single(0).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Lea);
    assert_eq!(disasm.lookup(0, 5), Some(" lea  rax [2 + rax + rcx * 1]"));
}

#[test]
fn group3_test_takes_immediate() {
    let obj = [
        0xF7, 0xC0, 0x44, 0x33, 0x22, 0x11, // test  eax 0x11223344
        0xF7, 0xD8, // neg  eax
    ];
    let mut disasm = Disassembler::new(&obj);

    let inst = disasm.decode_single(0).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Test);
    assert_eq!(disasm.lookup(0, 6), Some(" test  eax 0x11223344"));

    let inst = disasm.decode_single(6).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Neg);
    assert_eq!(disasm.lookup(6, 8), Some(" neg  eax"));
}

#[test]
fn group5_forms() {
    let obj = [
        0xFF, 0xC0, // inc  eax
        0xFF, 0xD0, // call  rax
        0xFF, 0xE0, // jmp  rax
        0xFF, 0x75, 0x08, // push  [rbp + 8]
    ];
    let mut disasm = Disassembler::new(&obj);

    let inst = disasm.decode_single(0).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Inc);
    assert_eq!(disasm.lookup(0, 2), Some(" inc  eax"));

    let inst = disasm.decode_single(2).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Call);
    assert_eq!(disasm.lookup(2, 4), Some(" call  rax"));

    let inst = disasm.decode_single(4).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Jmp);
    assert_eq!(disasm.lookup(4, 6), Some(" jmp  rax"));

    let inst = disasm.decode_single(6).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Push);
    assert_eq!(disasm.lookup(6, 9), Some(" push  [rbp + 8]"));
}

#[test]
fn group5_reserved_digit_is_an_error() {
    // 0xFF /7 is reserved
    let obj = [0xFF, 0xF8];
    let mut disasm = Disassembler::new(&obj);
    let err = disasm.decode_single(0).unwrap_err();
    assert!(matches!(err, DecodeError::UnknownOpcode { .. }));
}

#[test]
fn shift_forms() {
    let obj = [
        0xC1, 0xE0, 0x04, // shl  eax 0x04
        0xD1, 0xF8, // sar  eax 1
    ];
    let mut disasm = Disassembler::new(&obj);

    let inst = disasm.decode_single(0).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Shl);
    assert_eq!(disasm.lookup(0, 3), Some(" shl  eax 0x04"));

    let inst = disasm.decode_single(3).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Sar);
    assert_eq!(disasm.lookup(3, 5), Some(" sar  eax 1"));
}

#[test]
fn relative_branches_render_as_immediates() {
    let obj = [
        0x74, 0x05, // jz  0x05
        0xE8, 0x00, 0x01, 0x00, 0x00, // call  0x00000100
        0x0F, 0x84, 0x10, 0x00, 0x00, 0x00, // jz  0x00000010
    ];
    let mut disasm = Disassembler::new(&obj);

    let inst = disasm.decode_single(0).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Jz);
    assert_eq!(disasm.lookup(0, 2), Some(" jz  0x05"));

    let inst = disasm.decode_single(2).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Call);
    assert_eq!(disasm.lookup(2, 7), Some(" call  0x00000100"));

    let inst = disasm.decode_single(7).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Jz);
    assert_eq!(inst.len, 6);
    assert_eq!(disasm.lookup(7, 13), Some(" jz  0x00000010"));
}

#[test]
fn mov_moffs() {
    let obj = [
        0xA1, 0x44, 0x33, 0x22, 0x11, // mov  eax 0x11223344
        0x48, 0xA1, 0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11,
    ];
    let mut disasm = Disassembler::new(&obj);

    let inst = disasm.decode_single(0).unwrap();
    assert_eq!(inst.len, 5);
    assert_eq!(disasm.lookup(0, 5), Some(" mov  eax 0x11223344"));

    // REX.W widens the offset to eight bytes
    let inst = disasm.decode_single(5).unwrap();
    assert_eq!(inst.len, 10);
    assert_eq!(disasm.lookup(5, 15), Some(" mov  rax 0x1122334455667788"));
}

#[test]
fn mov_imm_to_rm() {
    let obj = [0xC7, 0x00, 0x44, 0x33, 0x22, 0x11];
    let mut disasm = Disassembler::new(&obj);
    let inst = disasm.decode_single(0).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Mov);
    assert_eq!(disasm.lookup(0, 6), Some(" mov  [rax] 0x11223344"));
}

#[test]
fn imul_forms() {
    let obj = [
        0x6B, 0xC1, 0x05, // imul  eax ecx 0x05
        0x0F, 0xAF, 0xC1, // imul  eax ecx
    ];
    let mut disasm = Disassembler::new(&obj);

    let inst = disasm.decode_single(0).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Imul);
    assert_eq!(disasm.lookup(0, 3), Some(" imul  eax ecx 0x05"));

    let inst = disasm.decode_single(3).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Imul);
    assert_eq!(disasm.lookup(3, 6), Some(" imul  eax ecx"));
}

#[test]
fn operand_size_prefix_mnemonic_selection() {
    let obj = [0x99, 0x66, 0x99];
    let mut disasm = Disassembler::new(&obj);

    let inst = disasm.decode_single(0).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Cdq);

    let inst = disasm.decode_single(1).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Cwd);
    assert_eq!(inst.len, 2);
}

#[test]
fn lock_prefix_is_recorded_but_inert() {
    let obj = [0xF0, 0x01, 0xC1];
    let mut disasm = Disassembler::new(&obj);
    let inst = disasm.decode_single(0).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Add);
    assert_eq!(inst.len, 3);
    assert_eq!(disasm.lookup(0, 3), Some(" add  ecx eax"));
}

#[test]
fn truncated_inputs_error() {
    for bytes in [
        &[0x48][..],             // lone REX
        &[0x83][..],             // group opcode without ModR/M
        &[0x8B, 0x04][..],       // ModR/M expecting SIB
        &[0x8B, 0x88, 0x01][..], // partial disp32
        &[0xB8, 0x01][..],       // partial imm32
    ] {
        let mut disasm = Disassembler::new(bytes);
        let err = disasm.decode_single(0).unwrap_err();
        assert!(
            matches!(err, DecodeError::Truncated { .. }),
            "expected truncation for {bytes:02x?}, got {err:?}"
        );
    }
}

#[test]
fn linear_sweep_resynchronizes() {
    // a garbage byte between two valid instructions
    let obj = [0x90, 0xD6, 0xC3];
    let mut disasm = Disassembler::new(&obj);
    let results = disasm.disassemble();
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().mnemonic, Mnemonic::Ret);
}
