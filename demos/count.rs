use safeson::{Decoder, IterScanner, Read, SliceScanner, Value};

/// Count the number of values, including nested ones.
fn count(v: &Value) -> usize {
    match v {
        Value::Array(arr) => 1 + arr.iter().map(count).sum::<usize>(),
        Value::Object(obj) => 1 + obj.values().map(count).sum::<usize>(),
        _ => 1,
    }
}

fn process(mut read: impl Read) -> Result<usize, safeson::Error> {
    let mut decoder = Decoder::new();
    let mut sum = 0;
    for v in decoder.many(&mut read) {
        sum += count(&v?);
    }
    Ok(sum)
}

fn main() {
    let n = if let Some(filename) = std::env::args().nth(1) {
        let file = std::fs::read(filename).expect("read file");
        process(SliceScanner::new(&file))
    } else {
        use std::io::Read;
        process(IterScanner::new(std::io::stdin().bytes()))
    };
    println!("{:?}", n)
}
