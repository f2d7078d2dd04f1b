//! page/ovf/chain - сборка payload ячейки с учётом overflow-цепочек.
//!
//! Обозначения из описания формата (https://www.sqlite.org/fileformat.html):
//! - U - usable size страницы (page_size - reserved).
//! - P - объявленная длина payload.
//! - X - максимум байт, хранимых локально: U-35 для table-leaf, ((U-12)*64/255)-23 для index.
//! - M - минимум локальных байт: ((U-12)*32/255)-23.
//! - K = M + ((P-M) mod (U-4)); локально лежит K, если K <= X, иначе M.
//!
//! После локальной части идёт u32 BE номер первой overflow-страницы. Каждая overflow-страница:
//! [next u32 BE][до U-4 байт продолжения]. Цепочка обязана закончиться ровно там, где
//! закончился payload: ненулевой next у последней страницы - Format.

use log::trace;
use std::io::{Cursor, Read, Seek};

use crate::consts::OVF_NEXT_PTR_LEN;
use crate::error::{bail_format, Result};
use crate::page::PageType;
use crate::pager::Pager;
use crate::record::Record;
use crate::util::{read_be_uint, read_exact_vec};

/// X: the largest payload stored entirely on the b-tree page.
#[inline]
pub fn max_local(usable: u32, page_type: PageType) -> u64 {
    let u = u64::from(usable);
    match page_type {
        PageType::TableLeaf => u - 35,
        _ => ((u - 12) * 64 / 255) - 23,
    }
}

/// M: the minimum local part once a payload spills.
#[inline]
pub fn min_local(usable: u32) -> u64 {
    let u = u64::from(usable);
    ((u - 12) * 32 / 255) - 23
}

/// Сколько байт payload длины `payload_len` лежит на самой странице.
/// Возвращает (local, spills).
pub fn local_payload_len(usable: u32, payload_len: u64, page_type: PageType) -> (u64, bool) {
    let x = max_local(usable, page_type);
    if payload_len <= x {
        return (payload_len, false);
    }
    let m = min_local(usable);
    let k = m + ((payload_len - m) % (u64::from(usable) - 4));
    (if k <= x { k } else { m }, true)
}

/// Собрать полный payload. `cell` стоит на первом байте payload внутри страницы.
pub fn assemble_payload<R: Read + Seek>(
    pager: &mut Pager<R>,
    cell: &mut Cursor<&[u8]>,
    payload_len: u64,
    page_type: PageType,
) -> Result<Vec<u8>> {
    let usable = pager.header().usable_size();
    let (local, spills) = local_payload_len(usable, payload_len, page_type);

    let mut payload = read_exact_vec(cell, local as usize, "local payload")?;
    if !spills {
        return Ok(payload);
    }

    let mut remaining = payload_len - local;
    let per_page = u64::from(usable) - OVF_NEXT_PTR_LEN as u64;
    // цепочка не может быть длиннее самого файла
    let pages_needed = remaining.div_ceil(per_page);
    if pages_needed > pager.store_pages() {
        bail_format!(
            "payload of {} B needs {} overflow pages, store holds {}",
            payload_len,
            pages_needed,
            pager.store_pages()
        );
    }
    payload.reserve(remaining as usize);
    let mut next = read_be_uint(cell, OVF_NEXT_PTR_LEN)? as u32;

    while remaining > 0 {
        if next == 0 {
            bail_format!(
                "overflow chain ended with {} of {} payload bytes missing",
                remaining,
                payload_len
            );
        }
        trace!("overflow page {} ({} B remaining)", next, remaining);
        let page = pager.read_overflow_page(next)?;
        let mut c = Cursor::new(page.as_slice());
        let this_page = next;
        next = read_be_uint(&mut c, OVF_NEXT_PTR_LEN)? as u32;

        let take = per_page.min(remaining) as usize;
        let chunk = read_exact_vec(&mut c, take, "overflow payload")
            .map_err(|e| crate::Error::format(format!("overflow page {}: {}", this_page, e)))?;
        payload.extend_from_slice(&chunk);
        remaining -= take as u64;
    }

    if next != 0 {
        bail_format!("unexpected last overflow page (dangling next pointer {})", next);
    }
    Ok(payload)
}

/// Собрать payload и отдать его декодеру записей.
pub fn read_payload<R: Read + Seek>(
    pager: &mut Pager<R>,
    cell: &mut Cursor<&[u8]>,
    payload_len: u64,
    page_type: PageType,
) -> Result<Record> {
    let payload = assemble_payload(pager, cell, payload_len, page_type)?;
    Record::parse(payload, pager.header().text_encoding)
}
