//! pager/core - ядро Pager: структура, open(), заголовок файла и счётчики.

use log::{debug, warn};
use std::io::{Read, Seek, SeekFrom};
use std::sync::Arc;

use crate::config::LiteScanConfig;
use crate::meta::FileHeader;
use crate::page::BTreePage;

use super::cache::{CacheStats, PageCache};

/// Что лежит в кэше: разобранная b-tree страница или сырая overflow-страница.
#[derive(Clone)]
pub(crate) enum CachedPage {
    BTree(Arc<BTreePage>),
    Raw(Arc<Vec<u8>>),
}

/// Низкоуровневый менеджер страниц поверх произвольного `Read + Seek` хранилища.
/// Хранилище считается неизменным на всё время жизни Pager.
pub struct Pager<R> {
    pub(crate) store: R,
    pub(crate) header: FileHeader,
    pub(crate) cache: PageCache<CachedPage>,
    // кэшировать ли overflow-страницы (по умолчанию нет)
    pub(crate) cache_ovf: bool,
    pub(crate) ovf_pages_read: u64,
    // целых страниц в хранилище на момент открытия
    pub(crate) store_pages: u64,
}

impl<R: Read + Seek> Pager<R> {
    /// Прочитать и проверить заголовок, подготовить кэш.
    pub fn open(mut store: R, cfg: &LiteScanConfig) -> crate::Result<Self> {
        store.seek(SeekFrom::Start(0))?;
        let header = FileHeader::parse(&mut store, cfg.check_magic)?;

        let store_len = store.seek(SeekFrom::End(0))?;
        let ps = u64::from(header.page_size);
        if store_len % ps != 0 {
            warn!(
                "store length {} is not a multiple of page size {}",
                store_len, ps
            );
        } else if header.page_count != 0 && u64::from(header.page_count) != store_len / ps {
            warn!(
                "header page_count={} but store holds {} pages",
                header.page_count,
                store_len / ps
            );
        }

        debug!(
            "pager open: page_size={}, reserved={}, usable={}, pages={}, encoding={:?}, cache={} pages",
            header.page_size,
            header.reserved_bytes_per_page,
            header.usable_size(),
            header.page_count,
            header.text_encoding,
            cfg.page_cache_pages
        );

        Ok(Self {
            store,
            header,
            cache: PageCache::new(cfg.page_cache_pages),
            cache_ovf: cfg.cache_overflow_pages,
            ovf_pages_read: 0,
            store_pages: store_len / ps,
        })
    }
}

impl<R> Pager<R> {
    #[inline]
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Сколько overflow-страниц было разыменовано с момента открытия.
    #[inline]
    pub fn overflow_pages_read(&self) -> u64 {
        self.ovf_pages_read
    }

    /// Whole pages present in the store when it was opened.
    #[inline]
    pub fn store_pages(&self) -> u64 {
        self.store_pages
    }

    /// Вернуть хранилище (например, чтобы закрыть файл явно).
    pub fn into_inner(self) -> R {
        self.store
    }
}
