use safeson::num::{self, Number};
use safeson::value::{Object, Value};
use safeson::{escape, str, Decoder, Error, Expect, IterScanner, Kind, SliceScanner};

fn arr<const N: usize>(v: [Value; N]) -> Value {
    Value::Array(v.into())
}

fn obj<const N: usize>(v: [(&str, Value); N]) -> Value {
    v.into_iter().collect()
}

fn iter_of_slice(slice: &[u8]) -> impl Iterator<Item = Result<u8, ()>> + '_ {
    slice.iter().copied().map(Ok)
}

fn parses_to(slice: &[u8], v: Value) -> Result<(), Error> {
    let mut decoder = Decoder::new();
    decoder.validate(&mut SliceScanner::new(slice))?;
    decoder.validate(&mut IterScanner::new(iter_of_slice(slice)))?;

    let parsed = decoder.parse_reader(&mut SliceScanner::new(slice))?;
    assert_eq!(parsed, v);

    let parsed = decoder.parse_reader(&mut IterScanner::new(iter_of_slice(slice)))?;
    assert_eq!(parsed, v);

    Ok(())
}

fn fails_with(slice: &[u8], e: Error) {
    let mut decoder = Decoder::new();
    let validated = decoder.validate(&mut SliceScanner::new(slice));
    assert_eq!(validated.unwrap_err(), e);

    let validated = decoder.validate(&mut IterScanner::new(iter_of_slice(slice)));
    assert_eq!(validated.unwrap_err(), e);

    parse_fails_with(slice, e)
}

fn parse_fails_with(slice: &[u8], e: Error) {
    let mut decoder = Decoder::new();
    let parsed = decoder.parse_reader(&mut SliceScanner::new(slice));
    assert_eq!(parsed.unwrap_err(), e);

    let parsed = decoder.parse_reader(&mut IterScanner::new(iter_of_slice(slice)));
    assert_eq!(parsed.unwrap_err(), e);
}

fn err(index: usize, kind: impl Into<Kind>) -> Error {
    Error::new(index, kind)
}

#[test]
fn basic() -> Result<(), Error> {
    parses_to(b"null", Value::Null)?;
    parses_to(b"false", Value::Bool(false))?;
    parses_to(b"true", Value::Bool(true))?;
    parses_to(b" \t\r\ntrue\n", Value::Bool(true))?;

    fails_with(b"nul", err(2, Kind::Literal));
    fails_with(b"fal", err(2, Kind::Literal));
    fails_with(b"t", err(0, Kind::Literal));
    fails_with(b"trUe", err(2, Kind::Literal));
    fails_with(b"a", err(0, Kind::Literal));

    fails_with(b"", err(0, Kind::Eof));
    fails_with(b"   ", err(2, Kind::Eof));
    fails_with(b"true false", err(5, Kind::TrailingContent(b'f')));

    Ok(())
}

#[test]
fn numbers() -> Result<(), Error> {
    parses_to(b"0", Value::from(0))?;
    parses_to(b"42", Value::from(42))?;
    parses_to(b"-0", Value::from(0))?;
    parses_to(b"-42", Value::from(-42))?;
    parses_to(b"2147483647", Number::Int32(i32::MAX).into())?;
    parses_to(b"2147483648", Number::Int64(2147483648).into())?;
    parses_to(b"-2147483649", Number::Int64(-2147483649).into())?;
    parses_to(b"9223372036854775807", Number::Int64(i64::MAX).into())?;
    parses_to(b"-9223372036854775808", Number::Int64(i64::MIN).into())?;

    parses_to(b"3.25", Value::from(3.25))?;
    parses_to(b"-0.5", Value::from(-0.5))?;
    parses_to(b"1e2", Value::from(100.0))?;
    parses_to(b"1E+2", Value::from(100.0))?;
    parses_to(b"25e-2", Value::from(0.25))?;
    parses_to(b"1.0", Number::Double(1.0).into())?;

    fails_with(b"-", err(0, num::Error::Invalid));
    fails_with(b"-a", err(1, num::Error::Invalid));
    fails_with(b"1.", err(1, num::Error::Eof));
    fails_with(b"1.e5", err(2, num::Error::Invalid));
    fails_with(b"1e", err(1, num::Error::Eof));
    fails_with(b"1e+", err(2, num::Error::Eof));
    fails_with(b"01", err(1, Kind::TrailingContent(b'1')));
    fails_with(b"+1", err(0, Kind::Literal));

    Ok(())
}

#[test]
fn big_integers_become_doubles() {
    let v = Decoder::new().parse("123456789012345678901234567890").unwrap();
    let d = v.as_number().unwrap();
    assert!(!d.is_int());
    assert!((d.as_f64() - 1.2345678901234568e29).abs() < 1e16);
}

#[test]
fn strings() -> Result<(), Error> {
    parses_to(br#""""#, Value::from(""))?;
    parses_to(br#""asdf""#, Value::from("asdf"))?;
    parses_to("\"ä\"".as_bytes(), Value::from("ä"))?;
    parses_to(br#""\u00e4""#, Value::from("ä"))?;
    parses_to(br#""\uD834\uDD1E""#, Value::from("\u{1D11E}"))?;
    parses_to(br#""a\tb\n\"c\"""#, Value::from("a\tb\n\"c\""))?;

    fails_with(br#"""#, err(0, str::Error::Eof));
    fails_with(br#""abc"#, err(3, str::Error::Eof));
    fails_with(b"\"a\nb\"", err(2, str::Error::Control(b'\n')));
    fails_with(br#""\x""#, err(2, escape::Error::InvalidKind(b'x')));
    fails_with(br#""\uabc"#, err(5, escape::Error::Eof));
    fails_with(br#""\uD800""#, err(7, escape::Error::ExpectedLowSurrogate));
    fails_with(br#""foo \uDFFF""#, err(6, escape::Error::InvalidCodeUnit(0xDFFF)));

    Ok(())
}

#[test]
fn invalid_utf8_is_replaced() {
    let v = Decoder::new().parse_slice(b"\"a\xC3(b\"").unwrap();
    assert_eq!(v, Value::from("a\u{FFFD}(b"));
}

#[test]
fn arrays() -> Result<(), Error> {
    parses_to(b"[]", arr([]))?;
    parses_to(b"[  ]", arr([]))?;
    parses_to(b"[false]", arr([Value::Bool(false)]))?;
    parses_to(b"[false, 1]", arr([false.into(), 1.into()]))?;
    parses_to(b"[[], [[]]]", arr([arr([]), arr([arr([])])]))?;

    fails_with(b"[", err(0, Kind::UnterminatedArray));
    fails_with(b"[1", err(1, Kind::UnterminatedArray));
    fails_with(b"[1,", err(2, Kind::UnterminatedArray));
    fails_with(b"[1,]", err(3, Kind::Literal));
    fails_with(b"[,1]", err(1, Kind::Literal));
    fails_with(b"[1 2]", err(3, Kind::Token(Expect::CommaOrRSquare, b'2')));
    fails_with(b"[1}", err(2, Kind::Token(Expect::CommaOrRSquare, b'}')));
    fails_with(b"[[[[[[[[]]]]]]]", err(14, Kind::UnterminatedArray));

    Ok(())
}

#[test]
fn objects() -> Result<(), Error> {
    parses_to(b"{}", obj([]))?;
    parses_to(br#"{"a": 0}"#, obj([("a", 0.into())]))?;
    parses_to(
        br#"{"a": 0, "b": [null]}"#,
        obj([("a", 0.into()), ("b", arr([Value::Null]))]),
    )?;

    fails_with(b"{", err(0, Kind::UnterminatedObject));
    fails_with(br#"{"" "#, err(3, Kind::UnterminatedObject));
    fails_with(br#"{"":"#, err(3, Kind::UnterminatedObject));
    fails_with(br#"{"":3,,"#, err(6, Kind::Token(Expect::Quote, b',')));
    fails_with(br#"{"a" 1}"#, err(5, Kind::Token(Expect::Colon, b'1')));
    fails_with(br#"{1:2}"#, err(1, Kind::Token(Expect::Quote, b'1')));
    fails_with(br#"{"a":1,}"#, err(7, Kind::Token(Expect::Quote, b'}')));
    fails_with(br#"{"a":1]"#, err(6, Kind::Token(Expect::CommaOrRCurly, b']')));

    Ok(())
}

#[test]
fn key_order_is_preserved() {
    let v = Decoder::new().parse(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
    let keys: Vec<_> = v.as_object().unwrap().keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, ["z", "a", "m"]);
}

#[test]
fn duplicate_keys_fail_by_default() {
    parse_fails_with(
        br#"{"abc":1,"abc":2}"#,
        err(9, Kind::DuplicateKey("abc".into())),
    );
    // a previous null does not count
    let v = Decoder::new().parse(r#"{"a": null, "a": 2}"#).unwrap();
    assert_eq!(v, obj([("a", 2.into())]));
}

#[test]
fn failing_source() {
    let mut decoder = Decoder::new();

    let bytes = [Ok(b'['), Ok(b'1'), Err("broken pipe")];
    let mut scanner = IterScanner::new(bytes.into_iter());
    assert_eq!(decoder.parse_reader(&mut scanner), Err(err(1, Kind::Read)));
    assert_eq!(scanner.error, Some("broken pipe"));

    let mut scanner = IterScanner::new([Err::<u8, _>(())].into_iter());
    assert_eq!(decoder.parse_reader(&mut scanner), Err(err(0, Kind::Read)));
}

#[test]
fn reuse_decoder() {
    let mut decoder = Decoder::new();
    assert!(decoder.parse(r#""x"#).is_err());
    let long = format!("\"{}\"", "y".repeat(3000));
    assert_eq!(decoder.parse(&long).unwrap().len(), 3000);
    assert_eq!(decoder.parse(r#""z""#).unwrap(), Value::from("z"));
    assert_eq!(decoder.parse("[]").unwrap(), Value::Array(Vec::new()));
    assert_eq!(decoder.parse("{}").unwrap(), Value::Object(Object::new()));
}

#[test]
fn error_messages() {
    let e = Decoder::new().parse("[1,]").unwrap_err();
    assert_eq!(e.to_string(), "JSON parsing error at index 3: invalid literal");

    let e = Decoder::new().parse(r#""\uD800""#).unwrap_err();
    assert_eq!(
        e.to_string(),
        "JSON parsing error at index 7: expected low surrogate"
    );
}
