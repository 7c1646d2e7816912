#![no_main]

use safeson::{Decoder, IterScanner, Kind, SliceScanner};

libfuzzer_sys::fuzz_target!(|data: &[u8]| {
    let mut decoder = Decoder::new();
    let iter = data.iter().copied().map(Ok::<_, ()>);
    let iv = decoder.parse_reader(&mut IterScanner::new(iter));
    let sv = decoder.parse_slice(data);
    assert_eq!(iv, sv);

    let si = decoder.validate(&mut SliceScanner::new(data));
    match (sv, si) {
        // validation does not detect duplicate keys
        (Err(e), _) if matches!(e.kind, Kind::DuplicateKey(_)) => (),
        (Ok(_), Ok(())) => (),
        (Err(v), Err(i)) => assert_eq!(v, i),
        _ => panic!(),
    }
});
