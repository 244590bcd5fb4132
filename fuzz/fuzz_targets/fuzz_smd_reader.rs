#![no_main]

use libfuzzer_sys::fuzz_target;
use nanofinder::smd::{load_smd_bytes, to_smd_bytes};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must produce an error, never a panic
    if let Ok(mapping) = load_smd_bytes(data) {
        let _ = mapping.export_tables(None, 0);
        let _ = mapping.summary(0);
        let _ = to_smd_bytes(&mapping);
    }
});
