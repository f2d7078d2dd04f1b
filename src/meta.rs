// src/meta.rs - 100-байтовый заголовок файла базы данных.
//
// Формат (BE):
// [0..16)   magic "SQLite format 3\0"
// 16  u16   page_size (1 => 65536)
// 18  u8    write_version (1=legacy, 2=WAL)
// 19  u8    read_version  (1=legacy, 2=WAL)
// 20  u8    reserved bytes per page
// 21  u8    max embedded payload fraction (=64)
// 22  u8    min embedded payload fraction (=32)
// 23  u8    leaf payload fraction (=32)
// 24  u32   file change counter
// 28  u32   page_count
// 32  u32   first freelist trunk page
// 36  u32   freelist page count
// 40  u32   schema cookie
// 44  u32   schema format (=4)
// 48  u32   default page cache size
// 52  u32   largest root b-tree page (auto-vacuum; must be 0)
// 56  u32   text encoding (1=UTF-8, 2=UTF-16le, 3=UTF-16be)
// 60  u32   user_version
// 64  u32   incremental vacuum (must be 0)
// 68  u32   application_id
// 72  [20]  reserved, zero
// 92  u32   version-valid-for
// 96  u32   SQLITE_VERSION_NUMBER
//
// Политика: заголовок парсится один раз при открытии, неизменяем, любая аномалия - Format.

use byteorder::{BigEndian, ReadBytesExt};
use log::warn;
use serde::Serialize;
use std::io::{Cursor, Read};

use crate::consts::{
    FILE_HEADER_SIZE, HEADER_MAGIC, HEADER_RESERVED_LEN, LEAF_PAYLOAD_FRACTION,
    MAX_EMBEDDED_PAYLOAD_FRACTION, MAX_PAGE_SIZE_RAW, MIN_EMBEDDED_PAYLOAD_FRACTION,
    MIN_PAGE_SIZE, MIN_USABLE_SIZE, PAGE_SIZE_64K, SUPPORTED_READ_VERSION,
    SUPPORTED_SCHEMA_FORMAT,
};
use crate::error::{bail_format, Error, Result};

/// Кодировка TEXT-значений во всём файле.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl TextEncoding {
    pub fn from_raw(v: u32) -> Result<Self> {
        match v {
            1 => Ok(TextEncoding::Utf8),
            2 => Ok(TextEncoding::Utf16Le),
            3 => Ok(TextEncoding::Utf16Be),
            other => Err(Error::format(format!("invalid text encoding ({})", other))),
        }
    }

    /// Decode raw TEXT bytes stored in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| Error::format(format!("invalid UTF-8 text: {}", e))),
            TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
                if bytes.len() % 2 != 0 {
                    bail_format!("UTF-16 text has odd length {}", bytes.len());
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|c| match self {
                        TextEncoding::Utf16Le => u16::from_le_bytes([c[0], c[1]]),
                        _ => u16::from_be_bytes([c[0], c[1]]),
                    })
                    .collect();
                String::from_utf16(&units)
                    .map_err(|e| Error::format(format!("invalid UTF-16 text: {}", e)))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileHeader {
    pub page_size: u32, // 512..=32768 (2^n) или 65536
    pub write_version: u8,
    pub read_version: u8,
    pub reserved_bytes_per_page: u8,
    pub file_change_counter: u32,
    pub page_count: u32,
    pub first_freelist_trunk_page: u32,
    pub freelist_page_count: u32,
    pub schema_cookie: u32,
    pub schema_format: u32, // == 4
    pub default_page_cache_size: u32,
    pub text_encoding: TextEncoding,
    pub user_version: u32,
    pub application_id: u32,
    pub version_valid_for: u32,
    pub sqlite_version_number: u32,
}

/// Проверка размера страницы по сырому значению из заголовка.
/// Возвращает нормализованный размер (1 => 65536).
pub fn validate_page_size(raw: u32) -> Result<u32> {
    if raw == 1 {
        return Ok(PAGE_SIZE_64K);
    }
    if raw < MIN_PAGE_SIZE || raw > MAX_PAGE_SIZE_RAW || !raw.is_power_of_two() {
        bail_format!("invalid page size ({})", raw);
    }
    Ok(raw)
}

impl FileHeader {
    /// Разобрать заголовок из потока (ожидается позиция 0).
    /// Короткое чтение - Io; любое неподдерживаемое значение - Format.
    pub fn parse<R: Read>(stream: &mut R, check_magic: bool) -> Result<Self> {
        let mut raw = [0u8; FILE_HEADER_SIZE];
        stream.read_exact(&mut raw)?;
        Self::parse_bytes(&raw, check_magic)
    }

    pub fn parse_bytes(raw: &[u8; FILE_HEADER_SIZE], check_magic: bool) -> Result<Self> {
        if check_magic && &raw[..HEADER_MAGIC.len()] != HEADER_MAGIC {
            bail_format!("not a database (bad magic)");
        }

        // Всё дальше читается из буфера в памяти: длина гарантирована.
        let mut f = Cursor::new(&raw[HEADER_MAGIC.len()..]);

        let page_size = validate_page_size(u32::from(f.read_u16::<BigEndian>()?))?;

        let write_version = f.read_u8()?; // not checked
        let read_version = f.read_u8()?;
        if read_version != SUPPORTED_READ_VERSION {
            bail_format!("unsupported read version ({})", read_version);
        }

        let reserved_bytes_per_page = f.read_u8()?;
        if page_size - u32::from(reserved_bytes_per_page) < MIN_USABLE_SIZE {
            bail_format!(
                "usable page size too small ({} - {})",
                page_size,
                reserved_bytes_per_page
            );
        }

        if f.read_u8()? != MAX_EMBEDDED_PAYLOAD_FRACTION {
            bail_format!("invalid max embedded payload fraction");
        }
        if f.read_u8()? != MIN_EMBEDDED_PAYLOAD_FRACTION {
            bail_format!("invalid min embedded payload fraction");
        }
        if f.read_u8()? != LEAF_PAYLOAD_FRACTION {
            bail_format!("invalid leaf payload fraction");
        }

        let file_change_counter = f.read_u32::<BigEndian>()?;
        let page_count = f.read_u32::<BigEndian>()?;
        let first_freelist_trunk_page = f.read_u32::<BigEndian>()?;
        let freelist_page_count = f.read_u32::<BigEndian>()?;
        let schema_cookie = f.read_u32::<BigEndian>()?;

        let schema_format = f.read_u32::<BigEndian>()?;
        if schema_format != SUPPORTED_SCHEMA_FORMAT {
            bail_format!("unsupported schema format ({})", schema_format);
        }

        let default_page_cache_size = f.read_u32::<BigEndian>()?;

        let largest_root_page = f.read_u32::<BigEndian>()?;
        if largest_root_page != 0 {
            bail_format!("auto-vacuum databases are unsupported");
        }

        let text_encoding = TextEncoding::from_raw(f.read_u32::<BigEndian>()?)?;
        let user_version = f.read_u32::<BigEndian>()?;

        let incremental_vacuum = f.read_u32::<BigEndian>()?;
        if incremental_vacuum != 0 {
            bail_format!("incremental-vacuum databases are unsupported");
        }

        let application_id = f.read_u32::<BigEndian>()?;

        let mut rsvd = [0u8; HEADER_RESERVED_LEN];
        f.read_exact(&mut rsvd)?;
        if rsvd.iter().any(|&b| b != 0) {
            bail_format!("invalid reserved bytes");
        }

        let version_valid_for = f.read_u32::<BigEndian>()?;
        let sqlite_version_number = f.read_u32::<BigEndian>()?;

        if page_count != 0 && version_valid_for != file_change_counter {
            // page_count is only trustworthy when these agree; we never rely on it.
            warn!(
                "header page_count={} may be stale (version_valid_for={} != change_counter={})",
                page_count, version_valid_for, file_change_counter
            );
        }

        Ok(FileHeader {
            page_size,
            write_version,
            read_version,
            reserved_bytes_per_page,
            file_change_counter,
            page_count,
            first_freelist_trunk_page,
            freelist_page_count,
            schema_cookie,
            schema_format,
            default_page_cache_size,
            text_encoding,
            user_version,
            application_id,
            version_valid_for,
            sqlite_version_number,
        })
    }

    /// U: page size minus the reserved tail of every page.
    #[inline]
    pub fn usable_size(&self) -> u32 {
        self.page_size - u32::from(self.reserved_bytes_per_page)
    }
}
