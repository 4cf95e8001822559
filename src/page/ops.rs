//! page/ops — движок slotted-страницы: wipe/get/compare/insert/remove/prune.
//!
//! Регионы страницы ёмкости C:
//! - [0 .. HEADER_SIZE)            — заголовок;
//! - [HEADER_SIZE .. slots_end)    — каталог слотов (slot_count записей);
//! - [slots_end .. kv_start)       — единственный свободный промежуток (free_bytes);
//! - [kv_start .. C)               — записи key‖value, slot 0 ближе всех к концу.
//!
//! Конец записи i не хранится: это key_start записи i-1 (или C для i == 0).
//! Все сдвиги перекрывающихся диапазонов — через copy_within (memmove).

use std::cmp::Ordering;

use anyhow::Result;
use log::trace;

use crate::config::validate_page_size;
use crate::consts::{HEADER_SIZE, SLOT_ENTRY_SIZE};
use crate::metrics::{record_insert, record_insert_rejected, record_remove, record_wipe};

use super::header::{header_read, header_write, PageHeader};
use super::slots::{slot_pos, slot_read, slot_write, SlotEntry};

/// Изменяемое представление slotted-страницы поверх чужого буфера (без копирования).
pub struct SlottedPage<'a> {
    page: &'a mut [u8],
}

impl<'a> SlottedPage<'a> {
    /// Связать движок с буфером. Содержимое не проверяется и не изменяется:
    /// для новой страницы вызовите `wipe()`.
    pub fn new(page: &'a mut [u8]) -> Result<Self> {
        validate_page_size(page.len())?;
        Ok(Self { page })
    }

    /// Сырые байты страницы (для дампов/проверок).
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.page
    }

    #[inline]
    pub fn page_size(&self) -> usize {
        self.page.len()
    }

    #[inline]
    pub fn header(&self) -> PageHeader {
        header_read(self.page)
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.header().slot_count as usize
    }

    #[inline]
    pub fn free_bytes(&self) -> usize {
        self.header().free_bytes as usize
    }

    /// Конец каталога слотов (начало свободного промежутка).
    #[inline]
    pub fn slots_end(&self) -> usize {
        slot_pos(self.slot_count())
    }

    /// Начало KV-области (конец свободного промежутка).
    #[inline]
    pub fn kv_start(&self) -> usize {
        let h = self.header();
        slot_pos(h.slot_count as usize) + h.free_bytes as usize
    }

    /// Байты, занятые каталогом и записями (без заголовка).
    #[inline]
    pub fn used_bytes(&self) -> usize {
        self.page_size() - HEADER_SIZE - self.free_bytes()
    }

    /// Сбросить страницу в пустое состояние: все байты = 0, free_bytes = C - HEADER_SIZE.
    pub fn wipe(&mut self) {
        self.page.fill(0);
        let h = PageHeader::empty(self.page.len());
        header_write(self.page, &h);
        record_wipe();
    }

    /// Запись каталога для живого слота.
    pub fn slot(&self, index: usize) -> SlotEntry {
        let n = self.slot_count();
        assert!(index < n, "invalid slot index {} (slot_count={})", index, n);
        slot_read(self.page, index)
    }

    /// Ключ и значение живого слота (view в буфер страницы).
    pub fn get_record(&self, index: usize) -> (&[u8], &[u8]) {
        let s = self.slot(index);
        let end = self.gap_offset(index);
        (
            &self.page[s.key_start..s.value_start],
            &self.page[s.value_start..end],
        )
    }

    #[inline]
    pub fn key_at(&self, index: usize) -> &[u8] {
        self.get_record(index).0
    }

    #[inline]
    pub fn value_at(&self, index: usize) -> &[u8] {
        self.get_record(index).1
    }

    /// Сравнить ключ слота `index` с `key` (лексикографически по байтам,
    /// более короткий префикс меньше).
    pub fn compare(&self, index: usize, key: &[u8]) -> Ordering {
        self.key_at(index).cmp(key)
    }

    /// Вставить запись так, чтобы она оказалась в слоте `index`; слоты index.. сдвигаются на +1.
    ///
    /// `index` должен быть получен из search (сортировку движок не проверяет).
    /// Возвращает false (страница не изменена), если
    /// `key.len() + value.len() + SLOT_ENTRY_SIZE > free_bytes()`.
    #[must_use = "insert reports whether the record fit into the page"]
    pub fn insert(&mut self, index: usize, key: &[u8], value: &[u8]) -> bool {
        let len = key.len() + value.len();
        let free = self.free_bytes();
        if len + SLOT_ENTRY_SIZE > free {
            trace!(
                "insert rejected: need {} B, free {} B (slot_count={})",
                len + SLOT_ENTRY_SIZE,
                free,
                self.slot_count()
            );
            record_insert_rejected();
            return false;
        }

        let (rec_start, rec_end) = self.open_gap(index, len);

        let entry = SlotEntry {
            key_start: rec_start,
            value_start: rec_start + key.len(),
        };
        slot_write(self.page, index, &entry);
        self.page[entry.key_start..entry.value_start].copy_from_slice(key);
        self.page[entry.value_start..rec_end].copy_from_slice(value);

        record_insert();
        true
    }

    /// Удалить живой слот `index`; промежуток в KV-области закрывается сдвигом.
    pub fn remove(&mut self, index: usize) {
        let n = self.slot_count();
        assert!(index < n, "invalid slot index {} (slot_count={})", index, n);
        self.close_gap(index);
        record_remove();
    }

    /// Обнулить свободный промежуток. Логическое содержимое не меняется;
    /// нужно для детерминированных дампов.
    pub fn prune_free(&mut self) {
        let (from, to) = (self.slots_end(), self.kv_start());
        self.page[from..to].fill(0);
    }

    /// Итератор по живым записям в порядке слотов.
    pub fn records(&self) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
        (0..self.slot_count()).map(move |i| self.get_record(i))
    }

    // ---------------- internal helpers ----------------

    /// Смещение «щели» перед слотом `gap` в адресном пространстве:
    /// gap == 0 → конец страницы; иначе key_start слота gap-1.
    /// Допустимо gap ∈ [0 ..= slot_count].
    fn gap_offset(&self, gap: usize) -> usize {
        let n = self.slot_count();
        assert!(
            gap <= n,
            "invalid gap reference {} (slot_count={})",
            gap,
            n
        );
        if gap == 0 {
            self.page.len()
        } else {
            slot_read(self.page, gap - 1).key_start
        }
    }

    /// Открыть дыру длины `len` для нового слота `gap`. Вызывающий уже проверил место.
    /// Возвращает [rec_start, rec_end) дыры. Запись каталога `gap` остаётся незаполненной.
    fn open_gap(&mut self, gap: usize, len: usize) -> (usize, usize) {
        let rec_end = self.gap_offset(gap);
        let rec_start = rec_end - len;

        let mut h = self.header();
        let n = h.slot_count as usize;
        let kv_start = slot_pos(n) + h.free_bytes as usize;

        // Записи gap.. (они лежат ниже rec_end) уезжают на len байт к свободной области.
        self.page.copy_within(kv_start..rec_end, kv_start - len);

        // Каталог gap..n сдвигается на одну позицию вверх; смещения уменьшаются на len.
        self.page.copy_within(slot_pos(gap)..slot_pos(n), slot_pos(gap + 1));
        for i in gap + 1..=n {
            let e = slot_read(self.page, i).shifted_down(len);
            slot_write(self.page, i, &e);
        }

        h.slot_count += 1;
        h.free_bytes -= (len + SLOT_ENTRY_SIZE) as u16;
        header_write(self.page, &h);

        (rec_start, rec_end)
    }

    /// Закрыть слот `gap`: сдвинуть записи ниже него на его длину к концу страницы,
    /// убрать запись каталога.
    fn close_gap(&mut self, gap: usize) {
        let rec_end = self.gap_offset(gap);
        let rec_start = self.gap_offset(gap + 1);
        debug_assert!(rec_start <= rec_end);
        let len = rec_end - rec_start;

        let mut h = self.header();
        let n = h.slot_count as usize;
        let kv_start = slot_pos(n) + h.free_bytes as usize;

        self.page.copy_within(kv_start..rec_start, kv_start + len);

        self.page.copy_within(slot_pos(gap + 1)..slot_pos(n), slot_pos(gap));
        for i in gap..n - 1 {
            let e = slot_read(self.page, i).shifted_up(len);
            slot_write(self.page, i, &e);
        }

        h.slot_count -= 1;
        h.free_bytes += (len + SLOT_ENTRY_SIZE) as u16;
        header_write(self.page, &h);
    }
}

impl std::fmt::Debug for SlottedPage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlottedPage")
            .field("page_size", &self.page_size())
            .field("slot_count", &self.slot_count())
            .field("free_bytes", &self.free_bytes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_PAGE_SIZE;

    fn page(ps: usize) -> Vec<u8> {
        let mut buf = vec![0xEEu8; ps];
        SlottedPage::new(&mut buf).unwrap().wipe();
        buf
    }

    #[test]
    fn new_rejects_bad_sizes() {
        let mut small = vec![0u8; 3];
        assert!(SlottedPage::new(&mut small).is_err());
        let mut big = vec![0u8; MAX_PAGE_SIZE + 1];
        assert!(SlottedPage::new(&mut big).is_err());
        let mut ok = vec![0u8; MAX_PAGE_SIZE];
        assert!(SlottedPage::new(&mut ok).is_ok());
    }

    #[test]
    fn wipe_resets_header_and_bytes() {
        let buf = page(32);
        assert!(buf[4..].iter().all(|&b| b == 0));
        let mut buf = buf;
        let p = SlottedPage::new(&mut buf).unwrap();
        assert_eq!(p.slot_count(), 0);
        assert_eq!(p.free_bytes(), 28);
        assert_eq!(p.kv_start(), 32);
        assert_eq!(p.slots_end(), 4);
    }

    #[test]
    fn insert_places_records_from_page_end() {
        let mut buf = page(32);
        let mut p = SlottedPage::new(&mut buf).unwrap();
        assert!(p.insert(0, b"k1", b"v1"));
        assert!(p.insert(1, b"k2", b"vv2"));

        // slot 0 — последние 4 байта, slot 1 — перед ним
        assert_eq!(p.slot(0), SlotEntry { key_start: 28, value_start: 30 });
        assert_eq!(p.slot(1), SlotEntry { key_start: 23, value_start: 25 });
        assert_eq!(&p.as_bytes()[23..32], b"k2vv2k1v1");
        assert_eq!(p.free_bytes(), 28 - 4 - 4 - 5 - 4);
    }

    #[test]
    fn insert_in_front_shifts_existing_records() {
        let mut buf = page(32);
        let mut p = SlottedPage::new(&mut buf).unwrap();
        assert!(p.insert(0, b"b", b"2"));
        assert!(p.insert(0, b"a", b"11"));
        assert_eq!(p.get_record(0), (&b"a"[..], &b"11"[..]));
        assert_eq!(p.get_record(1), (&b"b"[..], &b"2"[..]));
        assert_eq!(&p.as_bytes()[27..32], b"b2a11");
    }

    #[test]
    fn remove_middle_closes_gap() {
        let mut buf = page(48);
        let mut p = SlottedPage::new(&mut buf).unwrap();
        assert!(p.insert(0, b"a", b"1"));
        assert!(p.insert(1, b"b", b"22"));
        assert!(p.insert(2, b"c", b"333"));
        let free_before = p.free_bytes();

        p.remove(1);
        assert_eq!(p.slot_count(), 2);
        assert_eq!(p.free_bytes(), free_before + 3 + SLOT_ENTRY_SIZE);
        assert_eq!(p.get_record(0), (&b"a"[..], &b"1"[..]));
        assert_eq!(p.get_record(1), (&b"c"[..], &b"333"[..]));
        assert_eq!(p.kv_start(), 48 - 6);
    }

    #[test]
    fn empty_key_and_value_on_max_page() {
        let mut buf = page(MAX_PAGE_SIZE);
        let mut p = SlottedPage::new(&mut buf).unwrap();
        assert!(p.insert(0, b"", b""));
        assert!(p.insert(1, b"k", b""));
        assert_eq!(p.get_record(0), (&b""[..], &b""[..]));
        assert_eq!(p.get_record(1), (&b"k"[..], &b""[..]));
        p.remove(0);
        assert_eq!(p.get_record(0), (&b"k"[..], &b""[..]));
        assert_eq!(p.free_bytes(), MAX_PAGE_SIZE - HEADER_SIZE - SLOT_ENTRY_SIZE - 1);
    }

    #[test]
    fn prune_free_zeroes_only_the_gap() {
        let mut buf = page(32);
        let mut p = SlottedPage::new(&mut buf).unwrap();
        assert!(p.insert(0, b"aa", b"bb"));
        assert!(p.insert(1, b"xy", b"zz"));
        p.remove(1);
        // после remove в свободной области остаются старые байты
        let (from, to) = (p.slots_end(), p.kv_start());
        assert!(p.as_bytes()[from..to].iter().any(|&b| b != 0));
        p.prune_free();
        assert!(p.as_bytes()[from..to].iter().all(|&b| b == 0));
        assert_eq!(p.get_record(0), (&b"aa"[..], &b"bb"[..]));
    }

    #[test]
    #[should_panic(expected = "invalid slot index")]
    fn get_record_out_of_range_panics() {
        let mut buf = page(32);
        let p = SlottedPage::new(&mut buf).unwrap();
        let _ = p.get_record(0);
    }

    #[test]
    #[should_panic(expected = "invalid slot index")]
    fn remove_out_of_range_panics() {
        let mut buf = page(32);
        let mut p = SlottedPage::new(&mut buf).unwrap();
        assert!(p.insert(0, b"a", b"b"));
        p.remove(1);
    }

    #[test]
    #[should_panic(expected = "invalid gap reference")]
    fn insert_past_end_panics() {
        let mut buf = page(32);
        let mut p = SlottedPage::new(&mut buf).unwrap();
        let _ = p.insert(1, b"a", b"b");
    }
}
