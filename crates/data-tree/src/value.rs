//! Typed terminal values and their per-type total orders.

use std::cmp::Ordering;

use base64::Engine;
use serde_json::Value as Json;

use crate::error::TreeError;

/// Runtime type of a terminal value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    Uint,
    Decimal64 { fraction_digits: u8 },
    Bool,
    String,
    Binary,
    Enumeration,
    Identityref,
    Empty,
}

/// Terminal value of a leaf or leaf-list instance.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Int(i64),
    Uint(u64),
    /// Fixed-point number: `value * 10^-fraction_digits`.
    Decimal64 {
        value: i64,
        fraction_digits: u8,
    },
    Bool(bool),
    String(String),
    Binary(Vec<u8>),
    Enum(String),
    Identityref(String),
    Empty,
}

fn sign(o: Ordering) -> i32 {
    match o {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Uint(_) => ValueType::Uint,
            Value::Decimal64 {
                fraction_digits, ..
            } => ValueType::Decimal64 {
                fraction_digits: *fraction_digits,
            },
            Value::Bool(_) => ValueType::Bool,
            Value::String(_) => ValueType::String,
            Value::Binary(_) => ValueType::Binary,
            Value::Enum(_) => ValueType::Enumeration,
            Value::Identityref(_) => ValueType::Identityref,
            Value::Empty => ValueType::Empty,
        }
    }

    /// Total order of two values of the identical runtime type.
    ///
    /// # Panics
    ///
    /// If the runtime types differ; values of one schema node always share a
    /// type, so this is a caller defect.
    pub fn compare(&self, other: &Value) -> i32 {
        let o = match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Uint(a), Value::Uint(b)) => a.cmp(b),
            (
                Value::Decimal64 {
                    value: a,
                    fraction_digits: fa,
                },
                Value::Decimal64 {
                    value: b,
                    fraction_digits: fb,
                },
            ) if fa == fb => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::String(a), Value::String(b))
            | (Value::Enum(a), Value::Enum(b))
            | (Value::Identityref(a), Value::Identityref(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Value::Binary(a), Value::Binary(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Value::Empty, Value::Empty) => Ordering::Equal,
            _ => panic!(
                "cannot compare values of different types: {:?} and {:?}",
                self.value_type(),
                other.value_type()
            ),
        };
        sign(o)
    }

    /// Canonical string form.
    pub fn canonical(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Uint(v) => v.to_string(),
            Value::Decimal64 {
                value,
                fraction_digits,
            } => format_decimal64(*value, *fraction_digits),
            Value::Bool(v) => v.to_string(),
            Value::String(s) | Value::Enum(s) | Value::Identityref(s) => s.clone(),
            Value::Binary(b) => base64::engine::general_purpose::STANDARD.encode(b),
            Value::Empty => String::new(),
        }
    }

    /// JSON encoding: numbers stay numbers, decimal64 and binary become
    /// strings, `empty` is `[null]`.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Int(v) => Json::from(*v),
            Value::Uint(v) => Json::from(*v),
            Value::Bool(v) => Json::Bool(*v),
            Value::Empty => Json::Array(vec![Json::Null]),
            _ => Json::String(self.canonical()),
        }
    }

    pub fn from_json(ty: ValueType, json: &Json) -> Result<Value, TreeError> {
        let invalid = || TreeError::InvalidValue(format!("{json} is not a valid {ty:?} value"));
        Ok(match ty {
            ValueType::Int => Value::Int(json.as_i64().ok_or_else(invalid)?),
            ValueType::Uint => Value::Uint(json.as_u64().ok_or_else(invalid)?),
            ValueType::Bool => Value::Bool(json.as_bool().ok_or_else(invalid)?),
            ValueType::Decimal64 { fraction_digits } => {
                let s = json.as_str().ok_or_else(invalid)?;
                Value::Decimal64 {
                    value: parse_decimal64(s, fraction_digits).ok_or_else(invalid)?,
                    fraction_digits,
                }
            }
            ValueType::String => Value::String(json.as_str().ok_or_else(invalid)?.to_string()),
            ValueType::Enumeration => Value::Enum(json.as_str().ok_or_else(invalid)?.to_string()),
            ValueType::Identityref => {
                Value::Identityref(json.as_str().ok_or_else(invalid)?.to_string())
            }
            ValueType::Binary => {
                let s = json.as_str().ok_or_else(invalid)?;
                Value::Binary(
                    base64::engine::general_purpose::STANDARD
                        .decode(s)
                        .map_err(|_| invalid())?,
                )
            }
            ValueType::Empty => match json {
                Json::Array(items) if items.len() == 1 && items[0].is_null() => Value::Empty,
                _ => return Err(invalid()),
            },
        })
    }
}

fn format_decimal64(value: i64, fraction_digits: u8) -> String {
    if fraction_digits == 0 {
        return value.to_string();
    }
    let digits = value.unsigned_abs().to_string();
    let fd = fraction_digits as usize;
    let padded = format!("{digits:0>width$}", width = fd + 1);
    let (int, frac) = padded.split_at(padded.len() - fd);
    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}{int}.{frac}")
}

fn parse_decimal64(s: &str, fraction_digits: u8) -> Option<i64> {
    let (neg, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (int, frac) = match body.split_once('.') {
        Some((_, "")) => return None,
        Some(parts) => parts,
        None => (body, ""),
    };
    if int.is_empty() || frac.len() > fraction_digits as usize {
        return None;
    }
    if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut digits = String::with_capacity(int.len() + fraction_digits as usize + 1);
    if neg {
        digits.push('-');
    }
    digits.push_str(int);
    digits.push_str(frac);
    for _ in frac.len()..fraction_digits as usize {
        digits.push('0');
    }
    // The negative range is one wider than the positive one.
    let scaled: i128 = digits.parse().ok()?;
    i64::try_from(scaled).ok()
}
