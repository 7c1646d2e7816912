#![no_main]

use safeson::Decoder;

libfuzzer_sys::fuzz_target!(|data: &[u8]| {
    let _ = Decoder::new().parse_slice(data);
});
