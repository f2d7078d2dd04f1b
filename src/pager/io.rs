//! pager/io - чтение страниц:
//! - read_raw_page: seek + read_exact одной страницы (без кэша)
//! - get_page: b-tree страница через LRU-кэш (разобранный заголовок + байты)
//! - read_overflow_page: overflow-страница; по умолчанию мимо кэша
//!
//! Страницы нумеруются с 1; страница N лежит по смещению (N-1)*page_size.
//! Короткое чтение из хранилища - Io (файл обрезан), номер 0 - Format.

use log::trace;
use std::io::{Read, Seek, SeekFrom};
use std::sync::Arc;

use crate::error::{bail_format, Result};
use crate::page::BTreePage;

use super::core::{CachedPage, Pager};

impl<R: Read + Seek> Pager<R> {
    /// Прочитать страницу целиком, минуя кэш.
    pub fn read_raw_page(&mut self, page_no: u32) -> Result<Vec<u8>> {
        if page_no == 0 {
            bail_format!("page number 0 is not a valid page");
        }
        let ps = self.header.page_size as usize;
        let off = u64::from(page_no - 1) * ps as u64;
        self.store.seek(SeekFrom::Start(off))?;
        let mut buf = vec![0u8; ps];
        self.store.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// B-tree страница (через кэш).
    pub fn get_page(&mut self, page_no: u32) -> Result<Arc<BTreePage>> {
        match self.cache.get(page_no) {
            Some(CachedPage::BTree(p)) => return Ok(p),
            Some(CachedPage::Raw(raw)) => {
                // была прочитана как overflow - разбираем заново
                let page = Arc::new(BTreePage::parse(page_no, raw.as_ref().clone())?);
                self.cache.put(page_no, CachedPage::BTree(page.clone()));
                return Ok(page);
            }
            None => {}
        }
        trace!("page cache miss: page {}", page_no);
        let data = self.read_raw_page(page_no)?;
        let page = Arc::new(BTreePage::parse(page_no, data)?);
        self.cache.put(page_no, CachedPage::BTree(page.clone()));
        Ok(page)
    }

    /// Overflow-страница: [next u32][данные]. Считается в overflow_pages_read().
    pub fn read_overflow_page(&mut self, page_no: u32) -> Result<Arc<Vec<u8>>> {
        self.ovf_pages_read += 1;
        if !self.cache_ovf {
            return Ok(Arc::new(self.read_raw_page(page_no)?));
        }
        match self.cache.get(page_no) {
            Some(CachedPage::Raw(raw)) => return Ok(raw),
            Some(CachedPage::BTree(p)) => return Ok(Arc::new(p.data.clone())),
            None => {}
        }
        let raw = Arc::new(self.read_raw_page(page_no)?);
        self.cache.put(page_no, CachedPage::Raw(raw.clone()));
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LiteScanConfig;
    use crate::page::PageType;
    use crate::testutil::{table_leaf_cell, DbImage, HeaderBuilder};
    use std::io::Cursor;

    fn two_page_image() -> Vec<u8> {
        let mut img = DbImage::new(512, HeaderBuilder::new());
        img.btree_page(1, PageType::TableLeaf, None, &[]);
        img.btree_page(2, PageType::TableLeaf, None, &[table_leaf_cell(7, &[2, 9, 1])]);
        img.into_bytes()
    }

    #[test]
    fn pages_are_cached() {
        let mut p = Pager::open(Cursor::new(two_page_image()), &LiteScanConfig::default()).unwrap();
        let a = p.get_page(2).unwrap();
        let b = p.get_page(2).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.num_cells(), 1);
        let s = p.cache_stats();
        assert_eq!((s.hits, s.misses, s.entries), (1, 1, 1));
    }

    #[test]
    fn cache_disabled_rereads() {
        let cfg = LiteScanConfig::default().with_page_cache_pages(0);
        let mut p = Pager::open(Cursor::new(two_page_image()), &cfg).unwrap();
        let a = p.get_page(2).unwrap();
        let b = p.get_page(2).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(p.cache_stats().hits, 0);
    }

    #[test]
    fn page_zero_and_past_end() {
        let mut p = Pager::open(Cursor::new(two_page_image()), &LiteScanConfig::default()).unwrap();
        assert!(p.get_page(0).unwrap_err().is_format());
        // truncated store: short read is I/O
        assert!(p.get_page(3).unwrap_err().is_io());
    }

    #[test]
    fn overflow_pages_bypass_cache_by_default() {
        let mut p = Pager::open(Cursor::new(two_page_image()), &LiteScanConfig::default()).unwrap();
        p.read_overflow_page(2).unwrap();
        p.read_overflow_page(2).unwrap();
        assert_eq!(p.overflow_pages_read(), 2);
        assert_eq!(p.cache_stats().entries, 0);

        let cfg = LiteScanConfig::default().with_cache_overflow_pages(true);
        let mut p = Pager::open(Cursor::new(two_page_image()), &cfg).unwrap();
        let a = p.read_overflow_page(2).unwrap();
        let b = p.read_overflow_page(2).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        // the same page can still be parsed as a b-tree page
        assert_eq!(p.get_page(2).unwrap().num_cells(), 1);
    }
}
