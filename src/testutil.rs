//! testutil - сборка байтовых образов (заголовок, записи, b-tree страницы) для unit-тестов.
//! Реальный движок таких аномалий не пишет, поэтому собираем вручную.

use crate::consts::{FILE_HEADER_SIZE, HEADER_MAGIC};
use crate::meta::TextEncoding;
use crate::page::PageType;
use crate::record::Value;

pub(crate) struct HeaderBuilder {
    raw: [u8; FILE_HEADER_SIZE],
}

impl HeaderBuilder {
    pub(crate) fn new() -> Self {
        let mut raw = [0u8; FILE_HEADER_SIZE];
        raw[..16].copy_from_slice(HEADER_MAGIC);
        raw[16..18].copy_from_slice(&4096u16.to_be_bytes());
        raw[18] = 1;
        raw[19] = 1;
        raw[21] = 64;
        raw[22] = 32;
        raw[23] = 32;
        raw[24..28].copy_from_slice(&1u32.to_be_bytes()); // change counter
        raw[28..32].copy_from_slice(&1u32.to_be_bytes()); // page_count
        raw[44..48].copy_from_slice(&4u32.to_be_bytes()); // schema format
        raw[56..60].copy_from_slice(&1u32.to_be_bytes()); // utf-8
        raw[92..96].copy_from_slice(&1u32.to_be_bytes()); // version-valid-for
        raw[96..100].copy_from_slice(&3_045_000u32.to_be_bytes());
        Self { raw }
    }

    pub(crate) fn raw_page_size(mut self, v: u16) -> Self {
        self.raw[16..18].copy_from_slice(&v.to_be_bytes());
        self
    }

    pub(crate) fn reserved(mut self, v: u8) -> Self {
        self.raw[20] = v;
        self
    }

    pub(crate) fn schema_format(mut self, v: u32) -> Self {
        self.raw[44..48].copy_from_slice(&v.to_be_bytes());
        self
    }

    pub(crate) fn text_encoding(mut self, v: u32) -> Self {
        self.raw[56..60].copy_from_slice(&v.to_be_bytes());
        self
    }

    pub(crate) fn build(self) -> [u8; FILE_HEADER_SIZE] {
        self.raw
    }
}

pub(crate) fn encode_varint(v: u64) -> Vec<u8> {
    if v > 0x00FF_FFFF_FFFF_FFFF {
        let mut out = vec![0u8; 9];
        out[8] = v as u8;
        let mut x = v >> 8;
        for i in (0..8).rev() {
            out[i] = ((x & 0x7F) as u8) | 0x80;
            x >>= 7;
        }
        return out;
    }
    let mut groups = vec![(v & 0x7F) as u8];
    let mut x = v >> 7;
    while x > 0 {
        groups.push(((x & 0x7F) as u8) | 0x80);
        x >>= 7;
    }
    groups.reverse();
    groups
}

/// Record from explicit (serial type, body bytes) pairs.
pub(crate) fn encode_record_raw(cols: &[(u64, Vec<u8>)]) -> Vec<u8> {
    let mut types = Vec::new();
    for (st, _) in cols {
        types.extend_from_slice(&encode_varint(*st));
    }
    // header_len covers its own varint
    let mut header_len = types.len() + 1;
    while encode_varint(header_len as u64).len() + types.len() != header_len {
        header_len = encode_varint(header_len as u64).len() + types.len();
    }
    let mut out = encode_varint(header_len as u64);
    out.extend_from_slice(&types);
    for (_, body) in cols {
        out.extend_from_slice(body);
    }
    out
}

/// Record with the narrowest serial type per value.
pub(crate) fn encode_record(values: &[Value], enc: TextEncoding) -> Vec<u8> {
    let cols: Vec<(u64, Vec<u8>)> = values
        .iter()
        .map(|v| match v {
            Value::Null => (0, Vec::new()),
            Value::Integer(0) => (8, Vec::new()),
            Value::Integer(1) => (9, Vec::new()),
            Value::Integer(i) => {
                let (st, width) = match *i {
                    -0x80..=0x7F => (1, 1),
                    -0x8000..=0x7FFF => (2, 2),
                    -0x80_0000..=0x7F_FFFF => (3, 3),
                    -0x8000_0000..=0x7FFF_FFFF => (4, 4),
                    -0x8000_0000_0000..=0x7FFF_FFFF_FFFF => (5, 6),
                    _ => (6, 8),
                };
                (st, i.to_be_bytes()[8 - width..].to_vec())
            }
            Value::Real(f) => (7, f.to_bits().to_be_bytes().to_vec()),
            Value::Text(s) => {
                let bytes = encode_text(s, enc);
                (bytes.len() as u64 * 2 + 13, bytes)
            }
            Value::Blob(b) => (b.len() as u64 * 2 + 12, b.clone()),
        })
        .collect();
    encode_record_raw(&cols)
}

pub(crate) fn encode_text(s: &str, enc: TextEncoding) -> Vec<u8> {
    match enc {
        TextEncoding::Utf8 => s.as_bytes().to_vec(),
        TextEncoding::Utf16Le => s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect(),
        TextEncoding::Utf16Be => s.encode_utf16().flat_map(|u| u.to_be_bytes()).collect(),
    }
}

// ---------------- cells ----------------

pub(crate) fn table_leaf_cell(rowid: i64, payload: &[u8]) -> Vec<u8> {
    let mut c = encode_varint(payload.len() as u64);
    c.extend_from_slice(&encode_varint(rowid as u64));
    c.extend_from_slice(payload);
    c
}

pub(crate) fn table_interior_cell(left: u32, rowid: i64) -> Vec<u8> {
    let mut c = left.to_be_bytes().to_vec();
    c.extend_from_slice(&encode_varint(rowid as u64));
    c
}

pub(crate) fn index_leaf_cell(payload: &[u8]) -> Vec<u8> {
    let mut c = encode_varint(payload.len() as u64);
    c.extend_from_slice(payload);
    c
}

pub(crate) fn index_interior_cell(left: u32, payload: &[u8]) -> Vec<u8> {
    let mut c = left.to_be_bytes().to_vec();
    c.extend_from_slice(&index_leaf_cell(payload));
    c
}

// ---------------- whole-file image ----------------

/// In-memory database image: page 1 carries the file header.
pub(crate) struct DbImage {
    page_size: usize,
    header: [u8; FILE_HEADER_SIZE],
    pages: Vec<Vec<u8>>,
}

impl DbImage {
    pub(crate) fn new(page_size: u16, header: HeaderBuilder) -> Self {
        let header = header.raw_page_size(page_size).build();
        Self {
            page_size: page_size as usize,
            header,
            pages: vec![vec![0u8; page_size as usize]],
        }
    }

    pub(crate) fn page_size(&self) -> usize {
        self.page_size
    }

    fn ensure(&mut self, page_no: u32) -> &mut Vec<u8> {
        let idx = page_no as usize - 1;
        while self.pages.len() <= idx {
            self.pages.push(vec![0u8; self.page_size]);
        }
        &mut self.pages[idx]
    }

    /// Lay out a b-tree page: header, pointer array, cells packed from the page end.
    pub(crate) fn btree_page(
        &mut self,
        page_no: u32,
        page_type: PageType,
        right_ptr: Option<u32>,
        cells: &[Vec<u8>],
    ) {
        let ps = self.page_size;
        let hdr_off = if page_no == 1 { FILE_HEADER_SIZE } else { 0 };
        let page = self.ensure(page_no);

        let mut end = ps;
        let mut offsets = Vec::with_capacity(cells.len());
        for cell in cells {
            end -= cell.len();
            page[end..end + cell.len()].copy_from_slice(cell);
            offsets.push(end as u16);
        }

        page[hdr_off] = page_type.tag();
        page[hdr_off + 1..hdr_off + 3].copy_from_slice(&0u16.to_be_bytes());
        page[hdr_off + 3..hdr_off + 5].copy_from_slice(&(cells.len() as u16).to_be_bytes());
        let content_start = if end == 65536 { 0 } else { end as u16 };
        page[hdr_off + 5..hdr_off + 7].copy_from_slice(&content_start.to_be_bytes());
        page[hdr_off + 7] = 0;
        let mut p = hdr_off + 8;
        if let Some(r) = right_ptr {
            page[p..p + 4].copy_from_slice(&r.to_be_bytes());
            p += 4;
        }
        for off in offsets {
            page[p..p + 2].copy_from_slice(&off.to_be_bytes());
            p += 2;
        }
    }

    /// Overflow page: [next u32][bytes...].
    pub(crate) fn overflow_page(&mut self, page_no: u32, next: u32, bytes: &[u8]) {
        let page = self.ensure(page_no);
        page[..4].copy_from_slice(&next.to_be_bytes());
        page[4..4 + bytes.len()].copy_from_slice(bytes);
    }

    pub(crate) fn into_bytes(mut self) -> Vec<u8> {
        let count = self.pages.len() as u32;
        self.header[28..32].copy_from_slice(&count.to_be_bytes());
        let mut out = Vec::with_capacity(self.pages.len() * self.page_size);
        self.pages[0][..FILE_HEADER_SIZE].copy_from_slice(&self.header);
        for p in &self.pages {
            out.extend_from_slice(p);
        }
        out
    }
}

/// Catalog row for a table: ("table", name, name, root, sql).
pub(crate) fn schema_row(kind: &str, name: &str, tbl: &str, root: u32, sql: Option<&str>) -> Vec<u8> {
    encode_record(
        &[
            Value::Text(kind.into()),
            Value::Text(name.into()),
            Value::Text(tbl.into()),
            Value::Integer(i64::from(root)),
            sql.map(|s| Value::Text(s.into())).unwrap_or(Value::Null),
        ],
        TextEncoding::Utf8,
    )
}
