//! record - декодер записей (record format).
//!
//! Запись: [header_len varint][serial type varint ...][значения ...].
//! header_len учитывает и собственный varint. Заголовок разбирается сразу (он короткий),
//! значения декодируются лениво, по одному, в порядке колонок.
//!
//! Serial types:
//! - 0 NULL; 1..=6 signed BE int шириной 1,2,3,4,6,8; 7 f64 BE; 8/9 константы 0/1;
//! - 10/11 зарезервированы (Format);
//! - >=12: чётные - BLOB, нечётные - TEXT в кодировке файла; длина (code-12)/2.

use std::io::Cursor;

use crate::error::{bail_format, Error, Result};
use crate::meta::TextEncoding;
use crate::util::{read_be_int, read_exact_vec, read_varint};

/// Decoded column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(b) => Some(b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Blob(v.to_vec())
    }
}

/// Column type/length tag from the record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialType {
    Null,
    /// Signed big-endian integer of the given width (1,2,3,4,6,8).
    Int(u8),
    Float,
    Zero,
    One,
    Blob(usize),
    Text(usize),
}

impl SerialType {
    pub fn from_code(code: u64) -> Result<Self> {
        Ok(match code {
            0 => SerialType::Null,
            1 => SerialType::Int(1),
            2 => SerialType::Int(2),
            3 => SerialType::Int(3),
            4 => SerialType::Int(4),
            5 => SerialType::Int(6),
            6 => SerialType::Int(8),
            7 => SerialType::Float,
            8 => SerialType::Zero,
            9 => SerialType::One,
            10 | 11 => bail_format!("reserved serial type {}", code),
            n if n % 2 == 0 => SerialType::Blob(((n - 12) / 2) as usize),
            n => SerialType::Text(((n - 13) / 2) as usize),
        })
    }

    /// Bytes the value occupies in the record body.
    #[inline]
    pub fn content_len(self) -> usize {
        match self {
            SerialType::Null | SerialType::Zero | SerialType::One => 0,
            SerialType::Int(w) => w as usize,
            SerialType::Float => 8,
            SerialType::Blob(n) | SerialType::Text(n) => n,
        }
    }
}

/// Запись с разобранным заголовком; значения читаются лениво через `iter()`.
#[derive(Debug, Clone)]
pub struct Record {
    payload: Vec<u8>,
    types: Vec<SerialType>,
    // смещение содержимого первой колонки из `types`
    body_off: usize,
    encoding: TextEncoding,
}

impl Record {
    /// Разобрать заголовок записи. Значения не трогаются.
    pub fn parse(payload: Vec<u8>, encoding: TextEncoding) -> Result<Self> {
        let mut c = Cursor::new(payload.as_slice());
        let header_len = read_varint(&mut c)?;
        if header_len > payload.len() as u64 {
            bail_format!(
                "record header length {} exceeds payload ({} B)",
                header_len,
                payload.len()
            );
        }
        let mut types = Vec::new();
        while c.position() < header_len {
            types.push(SerialType::from_code(read_varint(&mut c)?)?);
        }
        if c.position() != header_len {
            bail_format!(
                "record header overruns its declared length {} (at {})",
                header_len,
                c.position()
            );
        }
        Ok(Self {
            body_off: header_len as usize,
            payload,
            types,
            encoding,
        })
    }

    /// Number of columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn serial_types(&self) -> &[SerialType] {
        &self.types
    }

    /// Ленивый итератор по значениям. После первой ошибки итератор заканчивается.
    pub fn iter(&self) -> RecordIter<'_> {
        RecordIter {
            rec: self,
            col: 0,
            cur: Cursor::new(self.payload.get(self.body_off..).unwrap_or(&[])),
            failed: false,
        }
    }

    /// Decode every column.
    pub fn values(&self) -> Result<Vec<Value>> {
        self.iter().collect()
    }

    /// Decode a single column.
    pub fn column(&self, idx: usize) -> Result<Value> {
        self.iter()
            .nth(idx)
            .unwrap_or_else(|| {
                Err(Error::format(format!(
                    "column {} out of range ({} columns)",
                    idx,
                    self.len()
                )))
            })
    }

    /// Отделить первые `n` колонок (ключ) и вернуть остаток как запись.
    pub fn split_key(self, n: usize) -> Result<(Vec<Value>, Record)> {
        if n > self.types.len() {
            bail_format!(
                "record has {} columns, key needs {}",
                self.types.len(),
                n
            );
        }
        let key: Vec<Value> = self.iter().take(n).collect::<Result<_>>()?;
        let skipped: usize = self.types[..n].iter().map(|t| t.content_len()).sum();
        let Record {
            payload,
            mut types,
            body_off,
            encoding,
        } = self;
        types.drain(..n);
        Ok((
            key,
            Record {
                payload,
                types,
                body_off: body_off + skipped,
                encoding,
            },
        ))
    }
}

pub struct RecordIter<'a> {
    rec: &'a Record,
    col: usize,
    cur: Cursor<&'a [u8]>,
    failed: bool,
}

impl<'a> RecordIter<'a> {
    fn decode(&mut self, st: SerialType) -> Result<Value> {
        Ok(match st {
            SerialType::Null => Value::Null,
            SerialType::Zero => Value::Integer(0),
            SerialType::One => Value::Integer(1),
            SerialType::Int(w) => Value::Integer(read_be_int(&mut self.cur, w as usize)?),
            SerialType::Float => {
                let bits = read_exact_vec(&mut self.cur, 8, "real")?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&bits);
                Value::Real(f64::from_be_bytes(raw))
            }
            SerialType::Blob(n) => Value::Blob(read_exact_vec(&mut self.cur, n, "blob")?),
            SerialType::Text(n) => {
                let raw = read_exact_vec(&mut self.cur, n, "text")?;
                Value::Text(self.rec.encoding.decode(&raw)?)
            }
        })
    }
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let st = *self.rec.types.get(self.col)?;
        self.col += 1;
        let v = self.decode(st);
        if v.is_err() {
            self.failed = true;
        }
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.rec.types.len().saturating_sub(self.col);
        (0, Some(left))
    }
}
