//! page/common - тип b-tree страницы и смещения полей заголовка страницы.

use serde::Serialize;

use crate::consts::{
    PAGE_TYPE_INDEX_INTERIOR, PAGE_TYPE_INDEX_LEAF, PAGE_TYPE_TABLE_INTERIOR,
    PAGE_TYPE_TABLE_LEAF,
};
use crate::error::{Error, Result};

// ---------- Раскладка заголовка (относительно начала заголовка страницы) ----------
/// page type tag (u8)
pub const OFF_PAGE_TYPE: usize = 0;
/// first freeblock (u16)
pub const OFF_FIRST_FREEBLOCK: usize = 1;
/// number of cells (u16)
pub const OFF_NUM_CELLS: usize = 3;
/// start of cell content area (u16, 0 => 65536)
pub const OFF_CELL_CONTENT: usize = 5;
/// fragmented free bytes (u8)
pub const OFF_FRAGMENTED: usize = 7;
/// rightmost child pointer (u32), interior pages only
pub const OFF_RIGHT_PTR: usize = 8;

pub const LEAF_HDR_LEN: usize = 8;
pub const INTERIOR_HDR_LEN: usize = 12;

/// Four b-tree page variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PageType {
    IndexInterior,
    TableInterior,
    IndexLeaf,
    TableLeaf,
}

impl PageType {
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            PAGE_TYPE_INDEX_INTERIOR => Ok(PageType::IndexInterior),
            PAGE_TYPE_TABLE_INTERIOR => Ok(PageType::TableInterior),
            PAGE_TYPE_INDEX_LEAF => Ok(PageType::IndexLeaf),
            PAGE_TYPE_TABLE_LEAF => Ok(PageType::TableLeaf),
            other => Err(Error::format(format!("invalid b-tree page type 0x{:02x}", other))),
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            PageType::IndexInterior => PAGE_TYPE_INDEX_INTERIOR,
            PageType::TableInterior => PAGE_TYPE_TABLE_INTERIOR,
            PageType::IndexLeaf => PAGE_TYPE_INDEX_LEAF,
            PageType::TableLeaf => PAGE_TYPE_TABLE_LEAF,
        }
    }

    #[inline]
    pub fn is_interior(self) -> bool {
        matches!(self, PageType::IndexInterior | PageType::TableInterior)
    }

    #[inline]
    pub fn is_index(self) -> bool {
        matches!(self, PageType::IndexInterior | PageType::IndexLeaf)
    }

    #[inline]
    pub fn header_len(self) -> usize {
        if self.is_interior() {
            INTERIOR_HDR_LEN
        } else {
            LEAF_HDR_LEN
        }
    }
}
