#![allow(non_snake_case)]

//! LiteScan - декодер файлов SQLite 3 только на чтение: каталог, упорядоченные сканы
//! B-tree и точечный поиск, без движка SQLite.

// Базовые модули
pub mod consts;
pub mod error;
pub mod meta;
pub mod config;

// Модульная раскладка (папки с mod.rs)
pub mod page;   // src/page/{mod,common,btree,ovf}
pub mod pager;  // src/pager/{mod,core,io,cache}.rs
pub mod db;     // src/db/{mod,core,open,scan,kv}.rs

pub mod record;
pub mod key;

// Утилиты (varint, BE-целые)
pub mod util;   // src/util/mod.rs

#[cfg(test)]
mod testutil;

// Удобные реэкспорты
pub use config::{LiteScanConfig, OpenOptions};
pub use db::{Database, IndexEntry, RangeScan, TableEntry};
pub use error::{Error, Result};
pub use key::{compare_tuples, compare_values, Bound, Key};
pub use meta::{validate_page_size, FileHeader, TextEncoding};
pub use page::PageType;
pub use pager::CacheStats;
pub use record::{Record, SerialType, Value};
