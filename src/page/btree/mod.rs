//! page/btree - b-tree страница в памяти: сырые байты + разобранный заголовок.
//! - header.rs - разбор заголовка и массива указателей ячеек.

pub mod header;

pub use header::{header_offset, page_header_read, PageHeader};

use crate::error::{bail_format, Result};

/// Разобранная b-tree страница. Живёт в page cache под `Arc`, поэтому неизменяема;
/// каждый читатель создаёт свой курсор поверх `data`, общих позиций нет.
#[derive(Debug, Clone)]
pub struct BTreePage {
    pub page_no: u32,
    pub header: PageHeader,
    pub cell_offsets: Vec<u16>,
    pub data: Vec<u8>,
}

impl BTreePage {
    pub fn parse(page_no: u32, data: Vec<u8>) -> Result<Self> {
        let (header, cell_offsets) = page_header_read(&data, page_no == 1)?;
        Ok(Self {
            page_no,
            header,
            cell_offsets,
            data,
        })
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cell_offsets.len()
    }

    /// Bytes of the page from the `idx`-th cell to the page end.
    pub fn cell(&self, idx: usize) -> Result<&[u8]> {
        let Some(&off) = self.cell_offsets.get(idx) else {
            bail_format!("cell {} out of range on page {}", idx, self.page_no);
        };
        let off = off as usize;
        if off >= self.data.len() {
            bail_format!(
                "cell offset {} beyond page {} ({} B)",
                off,
                self.page_no,
                self.data.len()
            );
        }
        Ok(&self.data[off..])
    }
}
