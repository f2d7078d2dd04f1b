use anyhow::{anyhow, Result};
use base64::Engine;
use serde_json::{json, Value as Json};

use LiteScan::{Key, Record, Value};

/// Разобрать значение ключа из аргумента CLI:
/// `null`, `int:N`, `real:F`, `hex:..` (blob), `text:..` или просто текст.
pub fn parse_value_arg(arg: &str) -> Result<Value> {
    if arg == "null" {
        return Ok(Value::Null);
    }
    if let Some(n) = arg.strip_prefix("int:") {
        let v = n
            .trim()
            .parse::<i64>()
            .map_err(|e| anyhow!("invalid int '{}': {}", n, e))?;
        return Ok(Value::Integer(v));
    }
    if let Some(f) = arg.strip_prefix("real:") {
        let v = f
            .trim()
            .parse::<f64>()
            .map_err(|e| anyhow!("invalid real '{}': {}", f, e))?;
        return Ok(Value::Real(v));
    }
    if let Some(hx) = arg.strip_prefix("hex:") {
        return Ok(Value::Blob(decode_hex(hx)?));
    }
    if let Some(t) = arg.strip_prefix("text:") {
        return Ok(Value::Text(t.to_string()));
    }
    Ok(Value::Text(arg.to_string()))
}

pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    if s.len() % 2 != 0 {
        return Err(anyhow!("hex string must have even length"));
    }
    let mut out = Vec::with_capacity(s.len() / 2);
    let bytes = s.as_bytes();
    for i in (0..bytes.len()).step_by(2) {
        let h = (bytes[i] as char)
            .to_digit(16)
            .ok_or_else(|| anyhow!("invalid hex at pos {}", i))?;
        let l = (bytes[i + 1] as char)
            .to_digit(16)
            .ok_or_else(|| anyhow!("invalid hex at pos {}", i + 1))?;
        out.push(((h << 4) | l) as u8);
    }
    Ok(out)
}

/// JSON-представление значения; BLOB - {"base64": "..."}.
pub fn value_json(v: &Value) -> Json {
    match v {
        Value::Null => Json::Null,
        Value::Integer(i) => json!(i),
        Value::Real(f) => json!(f),
        Value::Text(s) => json!(s),
        Value::Blob(b) => json!({ "base64": base64::engine::general_purpose::STANDARD.encode(b) }),
    }
}

pub fn key_json(k: &Key) -> Json {
    match k {
        Key::Rowid(r) => json!({ "rowid": r }),
        Key::Tuple(t) => Json::Array(t.iter().map(value_json).collect()),
    }
}

pub fn display_value(v: &Value) -> String {
    match v {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => format!("'{}'", s),
        Value::Blob(b) if b.len() <= 32 => format!("x'{}'", LiteScan::util::to_hex(b)),
        Value::Blob(b) => format!(
            "x'{}..' ({} B)",
            LiteScan::util::to_hex(&b[..32]),
            b.len()
        ),
    }
}

pub fn display_key(k: &Key) -> String {
    match k {
        Key::Rowid(r) => format!("rowid={}", r),
        Key::Tuple(t) => format!(
            "({})",
            t.iter().map(display_value).collect::<Vec<_>>().join(", ")
        ),
    }
}

pub fn display_record(rec: &Record) -> Result<String> {
    let vals = rec.values()?;
    Ok(vals.iter().map(display_value).collect::<Vec<_>>().join(" | "))
}

pub fn record_json(rec: &Record) -> Result<Json> {
    let vals = rec.values()?;
    Ok(Json::Array(vals.iter().map(value_json).collect()))
}
