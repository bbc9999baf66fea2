#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde_json::{Value, json};
use yamlcache::file::{coerce, parse_duration};

/// Structured input for the lenient conversions
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    text: String,
    int: i64,
    float: f64,
    flag: bool,
    items: Vec<String>,
}

fn coerce_all(value: &Value) {
    let _ = coerce::to_string(value);
    let _ = coerce::to_bool(value);
    let _ = coerce::to_i64(value);
    let _ = coerce::to_f64(value);
    let _ = coerce::to_duration(value);
    let _ = coerce::to_string_slice(value);

    // Narrowing never succeeds where widening failed
    if coerce::to_i64(value).is_none() {
        assert!(coerce::to_i32(value).is_none());
    }
}

fuzz_target!(|input: FuzzInput| {
    // Duration parsing is deterministic and never panics
    let first = parse_duration(&input.text);
    assert_eq!(first, parse_duration(&input.text));

    let values = [
        Value::String(input.text.clone()),
        json!(input.int),
        json!(input.float),
        json!(input.flag),
        json!(input.items),
        Value::Null,
    ];

    for value in &values {
        coerce_all(value);
    }
});
