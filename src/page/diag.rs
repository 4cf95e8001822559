//! page/diag — диагностика страницы: перечисление записей, дамп, проверка инвариантов.
//!
//! Только чтение (кроме явного prune в вызывающем коде). Используется тестами и CLI.

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::consts::{HEADER_SIZE, SLOT_ENTRY_SIZE};

use super::ops::SlottedPage;
use super::slots::slot_pos;

/// Сводка по странице (для JSON-вывода).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageStats {
    pub page_size: usize,
    pub slot_count: usize,
    pub free_bytes: usize,
    pub used_bytes: usize,
}

impl PageStats {
    pub fn of(page: &SlottedPage<'_>) -> Self {
        Self {
            page_size: page.page_size(),
            slot_count: page.slot_count(),
            free_bytes: page.free_bytes(),
            used_bytes: page.used_bytes(),
        }
    }
}

/// Декодировать все живые записи в порядке слотов.
pub fn map_for_diagnostics<T, F>(page: &SlottedPage<'_>, mut decode: F) -> Vec<T>
where
    F: FnMut(&[u8], &[u8]) -> T,
{
    let mut out = Vec::with_capacity(page.slot_count());
    for (k, v) in page.records() {
        out.push(decode(k, v));
    }
    out
}

/// "key=value" через запятую; байты не-UTF-8 заменяются.
pub fn render_records(page: &SlottedPage<'_>) -> String {
    map_for_diagnostics(page, |k, v| {
        format!("{}={}", String::from_utf8_lossy(k), String::from_utf8_lossy(v))
    })
    .join(",")
}

/// Печатное представление байтов: ASCII 32..=126 как есть, остальное — '.'.
pub fn debug_repr(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if (32..=126).contains(&b) { b as char } else { '.' })
        .collect()
}

/// CRC32 всех байт страницы. После prune_free одинаковое логическое содержимое
/// даёт одинаковый дайджест независимо от истории операций.
pub fn page_crc32(bytes: &[u8]) -> u32 {
    let mut h = crc32fast::Hasher::new();
    h.update(bytes);
    h.finalize()
}

/// Проверка структурных инвариантов страницы:
/// - учёт байт: header + slots + free + Σ(записей) == page_size;
/// - границы записей внутри KV-области, key_start ≤ value_start ≤ конец записи;
/// - записи смежны (без дыр), KV-область начинается ровно на kv_start;
/// - ключи строго возрастают.
pub fn check_invariants(page: &SlottedPage<'_>) -> Result<()> {
    let ps = page.page_size();
    let n = page.slot_count();
    let free = page.free_bytes();

    let slots_end = slot_pos(n);
    let meta = HEADER_SIZE + n * SLOT_ENTRY_SIZE + free;
    if meta > ps {
        return Err(anyhow!(
            "header/slots/free overflow the page: {} > {} (slot_count={}, free_bytes={})",
            meta,
            ps,
            n,
            free
        ));
    }
    let kv_start = slots_end + free;

    let mut rec_end = ps;
    let mut data_bytes = 0usize;
    let mut prev_key: Option<&[u8]> = None;
    for i in 0..n {
        let s = page.slot(i);
        if s.key_start < kv_start || s.key_start > s.value_start || s.value_start > rec_end {
            return Err(anyhow!(
                "slot {} out of bounds: key_start={}, value_start={}, record_end={}, kv_start={}",
                i,
                s.key_start,
                s.value_start,
                rec_end,
                kv_start
            ));
        }
        data_bytes += rec_end - s.key_start;

        let key = page.key_at(i);
        if let Some(prev) = prev_key {
            if prev >= key {
                return Err(anyhow!("slot {} key is not greater than slot {} key", i, i - 1));
            }
        }
        prev_key = Some(key);
        rec_end = s.key_start;
    }

    if rec_end != kv_start {
        return Err(anyhow!(
            "key-value region has a hole: records start at {}, kv_start={}",
            rec_end,
            kv_start
        ));
    }
    if meta + data_bytes != ps {
        return Err(anyhow!(
            "byte accounting mismatch: {} + {} != {}",
            meta,
            data_bytes,
            ps
        ));
    }
    Ok(())
}
