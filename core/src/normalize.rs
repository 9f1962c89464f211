//! Field-casing normalization for backend records.
//!
//! # Design
//! Some endpoints answer with lowercase keys (`idusuario`) where others use
//! camelCase (`idUsuario`). Each entity declares its canonical fields once as
//! a `&[Field]` table; `normalize` rewrites any case-insensitive match to the
//! canonical name before the record is decoded into a typed entity.
//!
//! Numeric fields are coerced from numeric strings. Required numeric fields
//! that are absent, null or unparseable become zero. Keys that match no
//! declared field are left untouched.

use serde_json::{Map, Number, Value};

/// Wire type of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Decimal,
    Text,
}

/// One canonical field of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl Field {
    pub const fn integer(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Integer, required: false }
    }

    pub const fn decimal(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Decimal, required: false }
    }

    pub const fn text(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Text, required: false }
    }

    pub const fn required(self) -> Self {
        Self { required: true, ..self }
    }
}

/// Rewrite `value` into the canonical shape described by `fields`.
///
/// Non-object values are returned unchanged.
pub fn normalize(fields: &[Field], value: Value) -> Value {
    let Value::Object(object) = value else {
        return value;
    };
    if fields.is_empty() {
        return Value::Object(object);
    }

    let mut out = Map::with_capacity(object.len());
    let mut pending: Vec<(String, Value)> = Vec::new();
    for (key, v) in object {
        match fields.iter().find(|f| f.name.eq_ignore_ascii_case(&key)) {
            Some(field) if field.name == key => {
                out.insert(key, v);
            }
            Some(field) => pending.push((field.name.to_string(), v)),
            None => {
                out.insert(key, v);
            }
        }
    }
    // An exact-case key wins over a differently-cased duplicate.
    for (canonical, v) in pending {
        out.entry(canonical).or_insert(v);
    }

    for field in fields {
        let coerced = match out.remove(field.name) {
            Some(v) => coerce(field.kind, v),
            None => None,
        };
        match coerced {
            Some(v) => {
                out.insert(field.name.to_string(), v);
            }
            None if field.required => {
                if let Some(zero) = zero_for(field.kind) {
                    out.insert(field.name.to_string(), zero);
                }
            }
            None => {}
        }
    }

    Value::Object(out)
}

/// Coerce a raw value to the field kind. `None` means "treat as absent".
fn coerce(kind: FieldKind, value: Value) -> Option<Value> {
    match (kind, value) {
        (_, Value::Null) => None,
        (FieldKind::Integer, Value::Number(n)) => {
            if n.is_i64() || n.is_u64() {
                Some(Value::Number(n))
            } else {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| Value::from(f as i64))
            }
        }
        (FieldKind::Integer, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::from),
        (FieldKind::Decimal, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        (FieldKind::Text, Value::Number(n)) => Some(Value::String(n.to_string())),
        (FieldKind::Text, Value::Bool(b)) => Some(Value::String(b.to_string())),
        (_, other) => Some(other),
    }
}

fn zero_for(kind: FieldKind) -> Option<Value> {
    match kind {
        FieldKind::Integer => Some(Value::from(0)),
        FieldKind::Decimal => Number::from_f64(0.0).map(Value::Number),
        FieldKind::Text => None,
    }
}
