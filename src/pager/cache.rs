//! pager/cache - LRU по номеру страницы, O(1) на get/put.
//!
//! Узлы двусвязного списка живут прямо в HashMap (prev/next - номера страниц);
//! голова - самая свежая страница, хвост - кандидат на вытеснение.
//! Значения отдаются клоном, поэтому в кэше лежат `Arc`.
//! Ёмкость 0 выключает кэш, но промахи всё равно считаются.

use log::trace;
use serde::Serialize;
use std::collections::HashMap;

/// Hit/miss counters of a page cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
    pub capacity: usize,
}

pub struct PageCache<V> {
    cap: usize,
    map: HashMap<u32, Entry<V>>,
    head: Option<u32>, // Most-recently used
    tail: Option<u32>, // Least-recently used
    hits: u64,
    misses: u64,
    evictions: u64,
}

struct Entry<V> {
    value: V,
    prev: Option<u32>,
    next: Option<u32>,
}

impl<V: Clone> PageCache<V> {
    /// Create a cache for N pages.
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            map: HashMap::with_capacity(cap.max(1)),
            head: None,
            tail: None,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains(&self, page_no: u32) -> bool {
        self.map.contains_key(&page_no)
    }

    /// Look a page up; moves entry to MRU (head) on hit.
    pub fn get(&mut self, page_no: u32) -> Option<V> {
        if self.cap == 0 || !self.map.contains_key(&page_no) {
            self.misses += 1;
            return None;
        }
        self.detach(page_no);
        self.attach_front(page_no);
        self.hits += 1;
        self.map.get(&page_no).map(|e| e.value.clone())
    }

    /// Put a value into the cache, updating/inserting and moving to MRU.
    /// Insert or refresh a page; a full cache drops its least recently used entry.
    pub fn put(&mut self, page_no: u32, value: V) {
        if self.cap == 0 {
            return;
        }

        if let Some(e) = self.map.get_mut(&page_no) {
            e.value = value;
            self.detach(page_no);
            self.attach_front(page_no);
            return;
        }

        // новая запись; при заполнении вытесняем хвост
        if self.map.len() >= self.cap {
            if let Some(victim) = self.tail {
                self.detach(victim);
                self.map.remove(&victim);
                self.evictions += 1;
                trace!("page cache: evicted page {}", victim);
            }
        }

        self.map.insert(
            page_no,
            Entry {
                value,
                prev: None,
                next: None,
            },
        );
        self.attach_front(page_no);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            entries: self.map.len(),
            capacity: self.cap,
        }
    }

    // ---------------- список ----------------

    fn detach(&mut self, page_no: u32) {
        let (prev, next) = match self.map.get(&page_no) {
            Some(e) => (e.prev, e.next),
            None => return,
        };

        if self.head == Some(page_no) {
            self.head = next;
        }
        if self.tail == Some(page_no) {
            self.tail = prev;
        }

        // связать соседей напрямую
        if let Some(p) = prev {
            if let Some(pe) = self.map.get_mut(&p) {
                pe.next = next;
            }
        }
        if let Some(n) = next {
            if let Some(ne) = self.map.get_mut(&n) {
                ne.prev = prev;
            }
        }

        if let Some(e) = self.map.get_mut(&page_no) {
            e.prev = None;
            e.next = None;
        }
    }

    fn attach_front(&mut self, page_no: u32) {
        if self.head == Some(page_no) {
            return;
        }

        if let Some(e) = self.map.get_mut(&page_no) {
            e.prev = None;
            e.next = self.head;
        }

        if let Some(old_head) = self.head {
            if let Some(he) = self.map.get_mut(&old_head) {
                he.prev = Some(page_no);
            }
        }

        self.head = Some(page_no);

        // пустой список: хвост тоже указывает на новый узел
        if self.tail.is_none() {
            self.tail = Some(page_no);
        }
    }
}
