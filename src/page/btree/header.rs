//! page/btree/header - заголовок b-tree страницы и массив указателей ячеек.

use byteorder::{BigEndian, ByteOrder};
use serde::Serialize;

use crate::consts::{CELL_CONTENT_WRAP, FILE_HEADER_SIZE};
use crate::error::{bail_format, Result};
use crate::page::common::{
    PageType, OFF_CELL_CONTENT, OFF_FIRST_FREEBLOCK, OFF_FRAGMENTED, OFF_NUM_CELLS,
    OFF_PAGE_TYPE, OFF_RIGHT_PTR,
};

/// Заголовок b-tree страницы.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageHeader {
    pub page_type: PageType,
    pub first_freeblock: u16,
    pub num_cells: u16,
    pub cell_content_start: u32, // 0 on disk => 65536
    pub fragmented_free_bytes: u8,
    pub right_ptr: Option<u32>, // interior pages only
}

/// Offset of the page header inside the raw page (page 1 skips the file header).
#[inline]
pub fn header_offset(is_first_page: bool) -> usize {
    if is_first_page {
        FILE_HEADER_SIZE
    } else {
        0
    }
}

/// Прочитать заголовок страницы и массив смещений ячеек (`num_cells` × u16 BE).
/// Неизвестный тег типа, выход за пределы страницы - Format.
pub fn page_header_read(page: &[u8], is_first_page: bool) -> Result<(PageHeader, Vec<u16>)> {
    let base = header_offset(is_first_page);
    if page.len() <= base + OFF_PAGE_TYPE {
        bail_format!("page buffer too small for b-tree header ({} B)", page.len());
    }
    let page_type = PageType::from_tag(page[base + OFF_PAGE_TYPE])?;
    let hdr_end = base + page_type.header_len();
    if page.len() < hdr_end {
        bail_format!("page buffer too small for {:?} header", page_type);
    }

    let first_freeblock =
        BigEndian::read_u16(&page[base + OFF_FIRST_FREEBLOCK..base + OFF_FIRST_FREEBLOCK + 2]);
    let num_cells = BigEndian::read_u16(&page[base + OFF_NUM_CELLS..base + OFF_NUM_CELLS + 2]);
    let raw_content = BigEndian::read_u16(&page[base + OFF_CELL_CONTENT..base + OFF_CELL_CONTENT + 2]);
    let cell_content_start = if raw_content == 0 {
        CELL_CONTENT_WRAP
    } else {
        u32::from(raw_content)
    };
    let fragmented_free_bytes = page[base + OFF_FRAGMENTED];
    let right_ptr = if page_type.is_interior() {
        Some(BigEndian::read_u32(&page[base + OFF_RIGHT_PTR..base + OFF_RIGHT_PTR + 4]))
    } else {
        None
    };

    // Технически это не часть заголовка, но разбираем здесь же.
    let ptrs_end = hdr_end + 2 * num_cells as usize;
    if ptrs_end > page.len() {
        bail_format!(
            "cell pointer array overruns page ({} cells, page {} B)",
            num_cells,
            page.len()
        );
    }
    let cell_offsets = page[hdr_end..ptrs_end]
        .chunks_exact(2)
        .map(BigEndian::read_u16)
        .collect();

    Ok((
        PageHeader {
            page_type,
            first_freeblock,
            num_cells,
            cell_content_start,
            fragmented_free_bytes,
            right_ptr,
        },
        cell_offsets,
    ))
}
