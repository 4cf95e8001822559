//! page/slots — каталог слотов: массив [key_start u16][value_start u16] сразу за заголовком.
//!
//! Смещения абсолютные. Единственное значение, не помещающееся в u16, — 65536
//! (конец страницы максимального размера); оно хранится как 0. Смещение 0 никогда
//! не указывает на запись (там лежит заголовок), поэтому декодирование однозначно.

use byteorder::{ByteOrder, LittleEndian};

use crate::consts::{
    HEADER_SIZE, MAX_PAGE_SIZE, SLOT_ENTRY_SIZE, SLOT_OFF_KEY_START, SLOT_OFF_VALUE_START,
};

/// Запись каталога: границы ключа и значения одной записи.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotEntry {
    pub key_start: usize,
    pub value_start: usize,
}

impl SlotEntry {
    #[inline]
    pub fn key_len(&self) -> usize {
        self.value_start - self.key_start
    }

    /// Сдвинуть обе границы на `delta` байт к началу страницы.
    #[inline]
    pub(crate) fn shifted_down(self, delta: usize) -> Self {
        Self {
            key_start: self.key_start - delta,
            value_start: self.value_start - delta,
        }
    }

    /// Сдвинуть обе границы на `delta` байт к концу страницы.
    #[inline]
    pub(crate) fn shifted_up(self, delta: usize) -> Self {
        Self {
            key_start: self.key_start + delta,
            value_start: self.value_start + delta,
        }
    }
}

/// Абсолютная позиция записи каталога `i` (или конца каталога при i == slot_count).
#[inline]
pub fn slot_pos(i: usize) -> usize {
    HEADER_SIZE + i * SLOT_ENTRY_SIZE
}

#[inline]
fn encode_off(off: usize) -> u16 {
    debug_assert!(off <= MAX_PAGE_SIZE);
    (off & 0xFFFF) as u16
}

#[inline]
fn decode_off(raw: u16) -> usize {
    if raw == 0 {
        MAX_PAGE_SIZE
    } else {
        raw as usize
    }
}

pub fn slot_read(page: &[u8], i: usize) -> SlotEntry {
    let p = slot_pos(i);
    SlotEntry {
        key_start: decode_off(LittleEndian::read_u16(
            &page[p + SLOT_OFF_KEY_START..p + SLOT_OFF_KEY_START + 2],
        )),
        value_start: decode_off(LittleEndian::read_u16(
            &page[p + SLOT_OFF_VALUE_START..p + SLOT_OFF_VALUE_START + 2],
        )),
    }
}

pub fn slot_write(page: &mut [u8], i: usize, e: &SlotEntry) {
    let p = slot_pos(i);
    LittleEndian::write_u16(
        &mut page[p + SLOT_OFF_KEY_START..p + SLOT_OFF_KEY_START + 2],
        encode_off(e.key_start),
    );
    LittleEndian::write_u16(
        &mut page[p + SLOT_OFF_VALUE_START..p + SLOT_OFF_VALUE_START + 2],
        encode_off(e.value_start),
    );
}
