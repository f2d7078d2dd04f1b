//! Общие константы формата (file header, b-tree pages, catalog).
//!
//! Reference: https://www.sqlite.org/fileformat.html

// -------- File header --------
pub const HEADER_MAGIC: &[u8; 16] = b"SQLite format 3\x00";
pub const FILE_HEADER_SIZE: usize = 100;

// Fixed-value fields (validated on open)
pub const MAX_EMBEDDED_PAYLOAD_FRACTION: u8 = 64;
pub const MIN_EMBEDDED_PAYLOAD_FRACTION: u8 = 32;
pub const LEAF_PAYLOAD_FRACTION: u8 = 32;

/// Only "legacy" (rollback journal) files are readable; 2 = WAL.
pub const SUPPORTED_READ_VERSION: u8 = 1;
pub const SUPPORTED_SCHEMA_FORMAT: u32 = 4;

pub const MIN_PAGE_SIZE: u32 = 512;
pub const MAX_PAGE_SIZE_RAW: u32 = 32768;
/// Raw value 1 in the header means 65536.
pub const PAGE_SIZE_64K: u32 = 65536;
/// The format never allows a usable page area below this.
pub const MIN_USABLE_SIZE: u32 = 480;

pub const HEADER_RESERVED_LEN: usize = 20;

// -------- B-tree pages --------
pub const PAGE_TYPE_INDEX_INTERIOR: u8 = 0x02;
pub const PAGE_TYPE_TABLE_INTERIOR: u8 = 0x05;
pub const PAGE_TYPE_INDEX_LEAF: u8 = 0x0A;
pub const PAGE_TYPE_TABLE_LEAF: u8 = 0x0D;

/// Raw cell_content_start of 0 wraps to this.
pub const CELL_CONTENT_WRAP: u32 = 65536;

// -------- Overflow pages --------
/// [next_page u32 BE][payload ...]
pub const OVF_NEXT_PTR_LEN: usize = 4;

// -------- Catalog --------
pub const SCHEMA_TABLE: &str = "sqlite_schema";
pub const SCHEMA_TABLE_ROOT: u32 = 1;
pub const SCHEMA_TABLE_SQL: &str =
    "CREATE TABLE sqlite_schema(type text, name text, tbl_name text, rootpage integer, sql text)";

// -------- Defaults --------
pub const DEFAULT_PAGE_CACHE_PAGES: usize = 128;
