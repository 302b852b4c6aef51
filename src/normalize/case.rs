//! Key case folding: snake_case and kebab-case keys become camelCase.

use serde_json::{Map, Value};

fn is_separator(c: char) -> bool {
    c == '_' || c == '-'
}

/// Converts a single key to camelCase.
///
/// Leading separators are kept (`_id` stays `_id`), every later run of
/// separators is dropped and the following character upper-cased.
pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();

    while let Some(&c) = chars.peek() {
        if !is_separator(c) {
            break;
        }
        out.push(c);
        chars.next();
    }

    let mut upper_next = false;
    for c in chars {
        if is_separator(c) {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Recursively rewrites every object key to camelCase.
///
/// When a legacy key and its canonical spelling are both present, the
/// canonical one wins and the legacy one is dropped.
pub fn camelize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut canonical = Map::new();
            let mut legacy = Vec::new();
            for (key, inner) in map {
                let camel = to_camel_case(&key);
                if camel == key {
                    canonical.insert(key, camelize_keys(inner));
                } else {
                    legacy.push((camel, inner));
                }
            }
            for (key, inner) in legacy {
                if !canonical.contains_key(&key) {
                    canonical.insert(key, camelize_keys(inner));
                }
            }
            Value::Object(canonical)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(camelize_keys).collect()),
        other => other,
    }
}
