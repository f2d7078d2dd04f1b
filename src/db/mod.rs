//! db - high-level API: открытие файла, каталог, сканы и точечный поиск.
//!
//! Разделение по подмодулям:
//! - core.rs - структура Database, записи каталога, аксессоры (header/tables/indexes/...)
//! - open.rs - open/open_with_config/open_path, загрузка каталога из sqlite_schema
//! - scan.rs - ленивый упорядоченный обход B-tree (RangeScan), scan_table/scan_keyed/scan_range
//! - kv.rs   - lookup_row / contains_key

pub mod core;
pub mod kv;
pub mod open;
pub mod scan;

pub use self::core::{Database, IndexEntry, TableEntry};
pub use scan::RangeScan;
