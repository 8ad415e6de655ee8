#![no_main]

use libfuzzer_sys::fuzz_target;
use unasm_disasm::Disassembler;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must never panic; errors are fine.
    let mut disasm = Disassembler::new(data);
    let _ = disasm.decode_single(0);

    // Also sweep the whole buffer, exercising the one-byte resync path.
    if data.len() >= 16 {
        let _ = disasm.disassemble();
    }
});
