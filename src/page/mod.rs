//! page - on-disk b-tree страницы и overflow-цепочки.
//!
//! Разделение по подмодулям:
//! - common.rs - тип страницы (4 варианта b-tree) и раскладка заголовка страницы.
//! - btree/    - разбор заголовка b-tree страницы и массива указателей ячеек.
//! - ovf/      - сборка payload с учётом overflow-цепочек (пороги X/M/K).

pub mod btree;
pub mod common;
pub mod ovf;

// ---------------- re-exports (внешний API модуля page) ----------------

pub use common::PageType;

pub use btree::{BTreePage, PageHeader};

pub use ovf::{assemble_payload, local_payload_len, max_local, min_local, read_payload};
