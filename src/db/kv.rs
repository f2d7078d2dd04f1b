//! db/kv - точечный поиск по ключу.
//!
//! lookup_row(name, key) = первый элемент скана окна [key, +inf) при key_arity = арности ключа;
//! если его ключ не равен искомому - NotFound.
//!
//! Для rowid-ключа (key_arity = 0) окно на table-деревьях не применяется, поэтому поиск
//! находит строку, только если она первая в таблице.
// TODO: отсечение table-interior поддеревьев по rowid сделало бы rowid-поиск точным.

use log::trace;
use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::key::{Bound, Key};
use crate::record::Record;

use super::core::Database;

impl<R: Read + Seek> Database<R> {
    /// Найти строку по точному ключу. Для кортежей возвращается часть записи после ключа.
    pub fn lookup_row(&mut self, name: &str, key: impl Into<Key>) -> Result<Record> {
        let key = key.into();
        let arity = key.arity();
        let mut scan = self.scan_range(name, arity, Bound::Finite(key.clone()), Bound::PosInfinity)?;
        match scan.next() {
            Some(Ok((found, value))) if found == key => Ok(value),
            Some(Ok((found, _))) => {
                trace!("lookup {:?} in {}: first key in window is {:?}", key, name, found);
                Err(Error::not_found(format!("key {:?} not found in {}", key, name)))
            }
            Some(Err(e)) => Err(e),
            None => Err(Error::not_found(format!("key {:?} not found in {}", key, name))),
        }
    }

    /// Проверка наличия ключа (те же правила, что у lookup_row).
    pub fn contains_key(&mut self, name: &str, key: impl Into<Key>) -> Result<bool> {
        // неизвестное имя - ошибка, а не "ключа нет"
        self.root_page(name)?;
        match self.lookup_row(name, key) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
