//! util - примитивные ридеры поверх байтового курсора.
//!
//! Содержит:
//! - read_varint(): 1..9-байтовый varint формата (big-endian, 7 бит на байт, 9-й байт - все 8 бит).
//! - read_be_uint()/read_be_int(): big-endian целые фиксированной ширины 1..=8.
//!
//! Все функции читают из буфера страницы/payload, уже находящегося в памяти, поэтому
//! нехватка байт - это структурная ошибка (Format), а не I/O.

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Read};

use crate::error::{Error, Result};

/// Maximum encoded length of a varint.
pub const VARINT_MAX_LEN: usize = 9;

#[inline]
fn underread(what: &str, e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        Error::format(format!("unexpected end of input while reading {}", what))
    } else {
        Error::Io(e)
    }
}

/// Прочитать varint. Первые 8 байт несут по 7 бит (старший бит - флаг продолжения),
/// 9-й байт (если дошли до него) несёт все 8 бит.
pub fn read_varint<R: Read>(r: &mut R) -> Result<u64> {
    let mut n: u64 = 0;
    for _ in 0..VARINT_MAX_LEN - 1 {
        let b = r.read_u8().map_err(|e| underread("varint", e))?;
        n = (n << 7) | u64::from(b & 0x7F);
        if b & 0x80 == 0 {
            return Ok(n);
        }
    }
    let b = r.read_u8().map_err(|e| underread("varint", e))?;
    Ok((n << 8) | u64::from(b))
}

/// Unsigned big-endian integer of `n` bytes (1..=8).
pub fn read_be_uint<R: Read>(r: &mut R, n: usize) -> Result<u64> {
    if n == 0 || n > 8 {
        return Err(Error::format(format!("unsupported integer width {}", n)));
    }
    r.read_uint::<BigEndian>(n).map_err(|e| underread("uint", e))
}

/// Signed (two's complement) big-endian integer of `n` bytes (1..=8).
pub fn read_be_int<R: Read>(r: &mut R, n: usize) -> Result<i64> {
    if n == 0 || n > 8 {
        return Err(Error::format(format!("unsupported integer width {}", n)));
    }
    r.read_int::<BigEndian>(n).map_err(|e| underread("int", e))
}

/// Прочитать ровно `len` байт; недочёт - Format с указанием, что читали.
/// Длина приходит с диска, поэтому буфер растёт по мере чтения, а не выделяется заранее.
pub fn read_exact_vec<R: Read>(r: &mut R, len: usize, what: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    r.take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(Error::format(format!(
            "unexpected end of input while reading {} ({} of {} B)",
            what,
            buf.len(),
            len
        )));
    }
    Ok(buf)
}

/// Hex representation for diagnostics and CLI output.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
