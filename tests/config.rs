use safeson::value::Value;
use safeson::{config, str, Config, Decoder, DuplicateKeyStrategy, Error, Kind, SliceScanner};

fn decoder(f: impl FnOnce(safeson::ConfigBuilder) -> safeson::ConfigBuilder) -> Decoder {
    Decoder::with_config(f(Config::builder()).build().unwrap())
}

#[test]
fn defaults() {
    let c = Config::default();
    assert_eq!(c.max_string_length(), 1024000);
    assert_eq!(c.max_recursion_depth(), 512);
    assert_eq!(c.max_whitespace(), 128);
    assert!(c.consume_trailing_content());
    assert_eq!(c.duplicate_keys(), DuplicateKeyStrategy::Fail);
    assert_eq!(Config::builder().build(), Ok(c));
}

#[test]
fn minimums() {
    let e = Config::builder().max_string_length(8).build().unwrap_err();
    assert_eq!(e, config::Error::StringLength(8));
    assert_eq!(e.to_string(), "max string length must be at least 16, got 8");

    let c = Config::builder().max_string_length(16).max_recursion_depth(4).max_whitespace(2);
    assert!(c.build().is_ok());
}

#[test]
fn whitespace() {
    let ws = |n| " ".repeat(n);
    let mut d = Decoder::new();
    assert_eq!(d.parse(&format!("{}1{}", ws(128), ws(128))), Ok(Value::from(1)));
    assert_eq!(d.parse(&ws(129)), Err(Error::new(128, Kind::Whitespace)));

    let mut d = decoder(|c| c.max_whitespace(2));
    assert_eq!(d.parse("[1,  2]"), Ok(Value::Array(vec![1.into(), 2.into()])));
    assert_eq!(d.parse("[1,   2]"), Err(Error::new(5, Kind::Whitespace)));
    // every run is counted separately
    assert!(d.parse("  [  1  ,  2  ]  ").is_ok());
}

#[test]
fn recursion() {
    let mut d = decoder(|c| c.max_recursion_depth(4));
    assert!(d.parse("[[[[1]]]]").is_ok());
    assert_eq!(d.parse("[[[[[1]]]]]"), Err(Error::new(4, Kind::Depth)));

    // arrays and objects count alike
    assert!(d.parse(r#"{"a":[{"b":[1]}]}"#).is_ok());
    assert_eq!(
        d.parse(r#"{"a":[{"b":[[1]]}]}"#),
        Err(Error::new(12, Kind::Depth))
    );

    // the limit also holds for values that are only validated
    let mut scanner = SliceScanner::new(b"[[[[[]]]]]");
    assert_eq!(d.validate(&mut scanner), Err(Error::new(4, Kind::Depth)));

    // depth is not exhausted by siblings
    assert!(d.parse("[[[[]]], [[[]]], [[[]]]]").is_ok());
}

#[test]
fn deep_nesting_does_not_overflow() {
    let json = "[".repeat(100_000);
    let e = Decoder::new().parse(&json).unwrap_err();
    assert_eq!(e, Error::new(512, Kind::Depth));
}

#[test]
fn string_length() {
    let mut d = decoder(|c| c.max_string_length(4096));
    let s = |n| format!("\"{}\"", "x".repeat(n));
    assert_eq!(d.parse(&s(4088)).unwrap().len(), 4088);
    assert_eq!(d.parse(&s(5000)), Err(Error::new(4090, str::Error::TooLong)));
    // keys are bounded as well
    let key = format!("{{{}: 1}}", s(5000));
    assert_eq!(d.parse(&key), Err(Error::new(4091, str::Error::TooLong)));
}

#[test]
fn trailing_content() {
    assert_eq!(
        Decoder::new().parse("{} x"),
        Err(Error::new(3, Kind::TrailingContent(b'x')))
    );
    assert_eq!(
        Decoder::new().parse("[1]]"),
        Err(Error::new(3, Kind::TrailingContent(b']')))
    );
    assert_eq!(
        Decoder::new().parse("{}}"),
        Err(Error::new(2, Kind::TrailingContent(b'}')))
    );

    let mut d = decoder(|c| c.consume_trailing_content(false));
    assert_eq!(d.parse("1 2"), Ok(Value::from(1)));
    assert_eq!(d.parse("[] garbage"), Ok(Value::Array(Vec::new())));
}

#[test]
fn consecutive_documents() {
    let mut d = decoder(|c| c.consume_trailing_content(false));
    let mut scanner = SliceScanner::new(b"1 \"two\"\n[3]  ");
    assert_eq!(d.parse_reader(&mut scanner), Ok(Value::from(1)));
    assert_eq!(d.parse_reader(&mut scanner), Ok(Value::from("two")));
    assert_eq!(d.parse_reader(&mut scanner), Ok(Value::Array(vec![3.into()])));
    assert_eq!(d.parse_reader(&mut scanner), Err(Error::new(12, Kind::Eof)));
}

#[test]
fn many() {
    let mut d = Decoder::new();

    let mut scanner = SliceScanner::new(b"1 [2] {\"a\": 3}  ");
    let values: Vec<Value> = d.many(&mut scanner).collect::<Result<_, _>>().unwrap();
    let obj: Value = [("a", 3)].into_iter().collect();
    assert_eq!(values, [Value::from(1), Value::Array(vec![2.into()]), obj]);

    let mut scanner = SliceScanner::new(b"1 x 2");
    let values: Vec<Result<Value, Error>> = d.many(&mut scanner).collect();
    assert_eq!(values, [Ok(Value::from(1)), Err(Error::new(2, Kind::Literal))]);

    let mut scanner = SliceScanner::new(b"   ");
    assert_eq!(d.many(&mut scanner).count(), 0);

    // values may directly follow each other
    let mut scanner = SliceScanner::new(b"[1][2]\"a\"{}");
    assert_eq!(d.many(&mut scanner).count(), 4);
}

#[test]
fn duplicate_keys() {
    let json = r#"{"a": 1, "b": 2, "a": 3}"#;
    let kv = |v: &[(&str, i32)]| -> Value { v.iter().copied().collect() };

    let mut d = Decoder::new();
    assert_eq!(
        d.parse(json),
        Err(Error::new(17, Kind::DuplicateKey("a".into())))
    );

    let mut d = decoder(|c| c.duplicate_keys(DuplicateKeyStrategy::KeepFirst));
    assert_eq!(d.parse(json), Ok(kv(&[("a", 1), ("b", 2)])));

    let mut d = decoder(|c| c.duplicate_keys(DuplicateKeyStrategy::KeepLast));
    let v = d.parse(json).unwrap();
    assert_eq!(v, kv(&[("a", 3), ("b", 2)]));
    // the first occurrence determines the position
    let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["a", "b"]);

    let json = r#"{"a":1,"b":2,"a":2,"b":3}"#;
    assert_eq!(
        Decoder::new().parse(json),
        Err(Error::new(13, Kind::DuplicateKey("a".into())))
    );
    let mut d = decoder(|c| c.duplicate_keys(DuplicateKeyStrategy::KeepFirst));
    assert_eq!(d.parse(json), Ok(kv(&[("a", 1), ("b", 2)])));
    let mut d = decoder(|c| c.duplicate_keys(DuplicateKeyStrategy::KeepLast));
    assert_eq!(d.parse(json), Ok(kv(&[("a", 2), ("b", 3)])));

    // nested objects are checked independently
    let mut d = Decoder::new();
    assert!(d.parse(r#"{"a": {"a": 1}, "b": {"a": 2}}"#).is_ok());
    assert_eq!(
        d.parse(r#"[{"x": 1, "x": 2}]"#),
        Err(Error::new(10, Kind::DuplicateKey("x".into())))
    );
}
