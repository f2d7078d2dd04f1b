//! db/scan - упорядоченный обход B-tree в окне [min, max).
//!
//! Обход ленивый, на явном стеке кадров (страница + позиция ячейки), поэтому потребитель
//! может остановиться в любой момент, а уже пройденные поддеревья не возобновляются.
//! Каждый кадр держит `Arc` своей страницы и собственную позицию: общих курсоров
//! между родителем и потомком нет.
//!
//! Правила по типам страниц:
//! - table-interior: без отсечения; все левые потомки по порядку, затем правый.
//! - table-leaf: каждая ячейка (rowid, record), границы окна не применяются.
//! - index-interior: key < min - ячейка пропускается целиком (вместе с левым поддеревом);
//!   key > min - сначала левое поддерево; key >= max - обход заканчивается полностью;
//!   иначе ячейка выдаётся; в конце - правый потомок.
//! - index-leaf: выдаются только ячейки с min <= key < max.

use log::trace;
use std::io::{Cursor, Read, Seek};
use std::sync::Arc;

use crate::error::{bail_format, Result};
use crate::key::{Bound, Key};
use crate::page::{read_payload, BTreePage, PageType};
use crate::pager::Pager;
use crate::record::Record;
use crate::util::{read_be_uint, read_varint};

use super::core::Database;

/// Глубже настоящие деревья не бывают; больше - почти наверняка цикл в страницах.
const MAX_TREE_DEPTH: usize = 64;

struct Frame {
    page: Arc<BTreePage>,
    next_cell: usize,
    // index-interior: ячейка ждёт, пока не будет пройдено её левое поддерево
    pending: Option<(Key, Record)>,
    right_done: bool,
}

/// Ленивый скан B-tree. Элементы - `(key, record)` по возрастанию ключа;
/// для index-деревьев `record` содержит колонки после ключа.
/// Первая ошибка завершает скан.
pub struct RangeScan<'a, R> {
    pager: &'a mut Pager<R>,
    key_arity: usize,
    min: Bound,
    max: Bound,
    stack: Vec<Frame>,
    root: Option<u32>,
    done: bool,
}

impl<'a, R: Read + Seek> RangeScan<'a, R> {
    pub fn new(pager: &'a mut Pager<R>, root: u32, key_arity: usize, min: Bound, max: Bound) -> Self {
        Self {
            pager,
            key_arity,
            min,
            max,
            stack: Vec::new(),
            root: Some(root),
            done: false,
        }
    }

    fn push(&mut self, page_no: u32) -> Result<()> {
        if self.stack.len() >= MAX_TREE_DEPTH {
            bail_format!("b-tree deeper than {} levels at page {}", MAX_TREE_DEPTH, page_no);
        }
        let page = self.pager.get_page(page_no)?;
        let is_index = page.header.page_type.is_index();
        if is_index != (self.key_arity > 0) {
            bail_format!(
                "page {} is {:?} but scan expects a {} tree (key_arity={})",
                page_no,
                page.header.page_type,
                if self.key_arity > 0 { "index" } else { "table" },
                self.key_arity
            );
        }
        trace!("scan: enter page {} ({:?})", page_no, page.header.page_type);
        self.stack.push(Frame {
            page,
            next_cell: 0,
            pending: None,
            right_done: false,
        });
        Ok(())
    }

    fn table_leaf_cell(&mut self, page: &BTreePage, idx: usize) -> Result<(Key, Record)> {
        let mut c = Cursor::new(page.cell(idx)?);
        let payload_len = read_varint(&mut c)?;
        let rowid = read_varint(&mut c)? as i64;
        let rec = read_payload(&mut *self.pager, &mut c, payload_len, PageType::TableLeaf)?;
        Ok((Key::Rowid(rowid), rec))
    }

    fn index_cell(&mut self, page: &BTreePage, idx: usize) -> Result<(Option<u32>, Key, Record)> {
        let page_type = page.header.page_type;
        let mut c = Cursor::new(page.cell(idx)?);
        let left = if page_type.is_interior() {
            Some(read_be_uint(&mut c, 4)? as u32)
        } else {
            None
        };
        let payload_len = read_varint(&mut c)?;
        let rec = read_payload(&mut *self.pager, &mut c, payload_len, page_type)?;
        let (key, value) = rec.split_key(self.key_arity)?;
        Ok((left, Key::Tuple(key), value))
    }

    // Один шаг обхода. Ok(Some) - очередная пара, Ok(None) - обход закончен.
    fn step(&mut self) -> Result<Option<(Key, Record)>> {
        if let Some(root) = self.root.take() {
            self.push(root)?;
        }
        loop {
            let Some(top) = self.stack.last_mut() else {
                return Ok(None);
            };

            if let Some((key, value)) = top.pending.take() {
                // левое поддерево пройдено
                if !self.max.above(&key) {
                    return Ok(None);
                }
                return Ok(Some((key, value)));
            }

            let page = top.page.clone();
            let idx = top.next_cell;
            let exhausted = idx >= page.num_cells();
            if !exhausted {
                top.next_cell += 1;
            }

            match page.header.page_type {
                PageType::TableLeaf => {
                    if exhausted {
                        self.stack.pop();
                        continue;
                    }
                    return self.table_leaf_cell(&page, idx).map(Some);
                }
                PageType::TableInterior => {
                    if exhausted {
                        if top.right_done {
                            self.stack.pop();
                            continue;
                        }
                        top.right_done = true;
                        let right = right_child(&page)?;
                        self.push(right)?;
                        continue;
                    }
                    let mut c = Cursor::new(page.cell(idx)?);
                    let left = read_be_uint(&mut c, 4)? as u32;
                    self.push(left)?;
                }
                PageType::IndexLeaf => {
                    if exhausted {
                        self.stack.pop();
                        continue;
                    }
                    let (_, key, value) = self.index_cell(&page, idx)?;
                    if Bound::window_contains(&self.min, &self.max, &key) {
                        return Ok(Some((key, value)));
                    }
                }
                PageType::IndexInterior => {
                    if exhausted {
                        if top.right_done {
                            self.stack.pop();
                            continue;
                        }
                        top.right_done = true;
                        let right = right_child(&page)?;
                        self.push(right)?;
                        continue;
                    }
                    let (left, key, value) = self.index_cell(&page, idx)?;
                    if self.min.above(&key) {
                        // всё левое поддерево тоже ниже окна
                        continue;
                    }
                    if self.min.below(&key) {
                        let Some(left) = left else {
                            bail_format!("index interior cell without left child on page {}", page.page_no);
                        };
                        if let Some(top) = self.stack.last_mut() {
                            top.pending = Some((key, value));
                        }
                        self.push(left)?;
                        continue;
                    }
                    // key == min: левое поддерево целиком ниже окна
                    if !self.max.above(&key) {
                        return Ok(None);
                    }
                    return Ok(Some((key, value)));
                }
            }
        }
    }
}

fn right_child(page: &BTreePage) -> Result<u32> {
    match page.header.right_ptr {
        Some(p) => Ok(p),
        None => bail_format!("interior page {} has no right pointer", page.page_no),
    }
}

impl<'a, R: Read + Seek> Iterator for RangeScan<'a, R> {
    type Item = Result<(Key, Record)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.done = true;
                self.stack.clear();
                None
            }
            Err(e) => {
                self.done = true;
                self.stack.clear();
                Some(Err(e))
            }
        }
    }
}

impl<R: Read + Seek> Database<R> {
    /// Полный скан rowid-таблицы: `(Key::Rowid, record)` по возрастанию rowid.
    pub fn scan_table(&mut self, name: &str) -> Result<RangeScan<'_, R>> {
        self.scan_range(name, 0, Bound::NegInfinity, Bound::PosInfinity)
    }

    /// Полный скан дерева с составным ключом (индекс или WITHOUT ROWID таблица).
    pub fn scan_keyed(&mut self, name: &str, key_arity: usize) -> Result<RangeScan<'_, R>> {
        self.scan_range(name, key_arity, Bound::NegInfinity, Bound::PosInfinity)
    }

    /// Скан окна `[min, max)`. Для `key_arity = 0` (table-деревья) границы не применяются:
    /// выдаётся вся таблица по порядку rowid.
    pub fn scan_range(
        &mut self,
        name: &str,
        key_arity: usize,
        min: Bound,
        max: Bound,
    ) -> Result<RangeScan<'_, R>> {
        let root = self.root_page(name)?;
        Ok(RangeScan::new(&mut self.pager, root, key_arity, min, max))
    }

    /// Скан по номеру корневой страницы, минуя каталог.
    pub fn scan_root(&mut self, root: u32, key_arity: usize, min: Bound, max: Bound) -> RangeScan<'_, R> {
        RangeScan::new(&mut self.pager, root, key_arity, min, max)
    }
}
