//! db/open - открытие Database: заголовок, затем каталог из sqlite_schema.

use log::debug;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use crate::config::{LiteScanConfig, OpenOptions};
use crate::consts::{SCHEMA_TABLE, SCHEMA_TABLE_ROOT, SCHEMA_TABLE_SQL};
use crate::error::{bail_format, Result};
use crate::key::Bound;
use crate::pager::Pager;
use crate::record::Value;

use super::core::{Database, IndexEntry};
use super::scan::RangeScan;

// Колонки строки каталога: type, name, tbl_name, rootpage, sql
const CATALOG_COLUMNS: usize = 5;

impl Database<File> {
    /// Открыть файл по пути; конфигурация берётся из окружения.
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open_path_with_config(path, &LiteScanConfig::from_env())
    }

    pub fn open_path_with_config(path: &Path, cfg: &LiteScanConfig) -> Result<Self> {
        let f = File::open(path)?;
        debug!("open {}", path.display());
        Self::open_with_config(f, cfg)
    }
}

impl Database<()> {
    /// Builder for open options (starts from env).
    pub fn builder() -> OpenOptions {
        OpenOptions::new()
    }
}

impl<R: Read + Seek> Database<R> {
    /// Открыть базу поверх произвольного хранилища.
    pub fn open(store: R, check_magic: bool) -> Result<Self> {
        let cfg = LiteScanConfig::default().with_check_magic(check_magic);
        Self::open_with_config(store, &cfg)
    }

    pub fn open_with_config(store: R, cfg: &LiteScanConfig) -> Result<Self> {
        let mut pager = Pager::open(store, cfg)?;

        let mut roots = BTreeMap::new();
        let mut schemas = BTreeMap::new();
        let mut indexes = BTreeMap::new();
        roots.insert(SCHEMA_TABLE.to_string(), SCHEMA_TABLE_ROOT);
        schemas.insert(SCHEMA_TABLE.to_string(), Some(SCHEMA_TABLE_SQL.to_string()));

        let scan = RangeScan::new(
            &mut pager,
            SCHEMA_TABLE_ROOT,
            0,
            Bound::NegInfinity,
            Bound::PosInfinity,
        );
        for item in scan {
            let (rowid, rec) = item?;
            let cols = rec.values()?;
            if cols.len() < CATALOG_COLUMNS {
                bail_format!("catalog row {:?} has {} columns", rowid, cols.len());
            }
            match cols[0].as_text() {
                Some("table") => {
                    let name = catalog_text(&cols[1], "name")?;
                    let tbl_name = catalog_text(&cols[2], "tbl_name")?;
                    if name != tbl_name {
                        bail_format!("catalog table {} has tbl_name {}", name, tbl_name);
                    }
                    let root = catalog_root(&cols[3], &name)?;
                    let sql = match &cols[4] {
                        Value::Text(s) => Some(s.clone()),
                        Value::Null => None,
                        other => bail_format!("catalog table {}: sql is {:?}", name, other),
                    };
                    debug!("catalog: table {} -> page {}", name, root);
                    roots.insert(name.clone(), root);
                    schemas.insert(name, sql);
                }
                Some("index") => {
                    let name = catalog_text(&cols[1], "name")?;
                    let tbl_name = catalog_text(&cols[2], "tbl_name")?;
                    let rootpage = catalog_root(&cols[3], &name)?;
                    let sql = cols[4].as_text().map(str::to_string);
                    debug!("catalog: index {} on {} -> page {}", name, tbl_name, rootpage);
                    indexes.insert(
                        name.clone(),
                        IndexEntry {
                            name,
                            tbl_name,
                            rootpage,
                            sql,
                        },
                    );
                }
                // view / trigger: своих деревьев нет
                _ => {}
            }
        }

        debug!(
            "catalog loaded: {} tables, {} indexes",
            roots.len(),
            indexes.len()
        );

        Ok(Self {
            pager,
            roots,
            schemas,
            indexes,
        })
    }
}

fn catalog_text(v: &Value, what: &str) -> Result<String> {
    match v.as_text() {
        Some(s) => Ok(s.to_string()),
        None => bail_format!("catalog {} is not text: {:?}", what, v),
    }
}

fn catalog_root(v: &Value, name: &str) -> Result<u32> {
    match v.as_i64() {
        Some(r) if (0..=i64::from(u32::MAX)).contains(&r) => Ok(r as u32),
        _ => bail_format!("catalog entry {} has invalid rootpage {:?}", name, v),
    }
}
