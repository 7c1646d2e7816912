#![no_main]

use safeson::{Decoder, IterScanner};

libfuzzer_sys::fuzz_target!(|data: &[u8]| {
    let iter = data.iter().copied().map(Ok::<_, ()>);
    let _ = Decoder::new().parse_reader(&mut IterScanner::new(iter));
});
