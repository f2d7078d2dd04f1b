//! db/core - ядро high-level API: структура Database, каталог и простые аксессоры.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::meta::FileHeader;
use crate::pager::{CacheStats, Pager};

/// Индекс из каталога (`type = 'index'`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub name: String,
    pub tbl_name: String,
    pub rootpage: u32,
    /// NULL for automatic indexes (UNIQUE / PRIMARY KEY constraints).
    pub sql: Option<String>,
}

/// Таблица из каталога (`type = 'table'`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableEntry {
    pub name: String,
    pub rootpage: u32,
    /// NULL in the catalog row stays `None`.
    pub sql: Option<String>,
}

/// Открытая (только на чтение) база данных.
///
/// Владеет хранилищем через Pager, заголовком файла и каталогом.
/// Все операции синхронные; методы скана берут `&mut self`, так как читают хранилище
/// и обновляют кэш страниц.
pub struct Database<R> {
    pub(crate) pager: Pager<R>,
    // name -> root page / creation sql (tables, включая сам каталог)
    pub(crate) roots: BTreeMap<String, u32>,
    pub(crate) schemas: BTreeMap<String, Option<String>>,
    pub(crate) indexes: BTreeMap<String, IndexEntry>,
}

impl<R> Database<R> {
    #[inline]
    pub fn header(&self) -> &FileHeader {
        self.pager.header()
    }

    /// Tables in name order (the catalog table itself included).
    pub fn tables(&self) -> Vec<TableEntry> {
        self.roots
            .iter()
            .map(|(name, &rootpage)| TableEntry {
                name: name.clone(),
                rootpage,
                sql: self.schemas.get(name).cloned().flatten(),
            })
            .collect()
    }

    pub fn indexes(&self) -> Vec<IndexEntry> {
        self.indexes.values().cloned().collect()
    }

    /// Indexes defined on one table.
    pub fn indexes_of(&self, table: &str) -> Vec<IndexEntry> {
        self.indexes
            .values()
            .filter(|ix| ix.tbl_name == table)
            .cloned()
            .collect()
    }

    /// Creation statement of a table or index.
    pub fn schema(&self, name: &str) -> Result<Option<&str>> {
        if let Some(sql) = self.schemas.get(name) {
            return Ok(sql.as_deref());
        }
        match self.indexes.get(name) {
            Some(ix) => Ok(ix.sql.as_deref()),
            None => Err(Error::not_found(format!("no such table or index: {}", name))),
        }
    }

    /// Root page of a table or index.
    pub fn root_page(&self, name: &str) -> Result<u32> {
        if let Some(&root) = self.roots.get(name) {
            return Ok(root);
        }
        self.indexes
            .get(name)
            .map(|ix| ix.rootpage)
            .ok_or_else(|| Error::not_found(format!("no such table or index: {}", name)))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.pager.cache_stats()
    }

    /// Overflow pages dereferenced since open.
    pub fn overflow_pages_read(&self) -> u64 {
        self.pager.overflow_pages_read()
    }

    pub fn into_inner(self) -> R {
        self.pager.into_inner()
    }
}
