//! page/header — заголовок slotted-страницы: [slot_count u16][free_bytes u16] (LE).

use byteorder::{ByteOrder, LittleEndian};

use crate::consts::{HEADER_SIZE, OFF_FREE_BYTES, OFF_SLOT_COUNT};

/// Заголовок страницы (копия полей, не ссылка на буфер).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageHeader {
    /// Число живых записей.
    pub slot_count: u16,
    /// Размер единственного свободного промежутка между каталогом и KV-областью.
    pub free_bytes: u16,
}

impl PageHeader {
    /// Заголовок пустой страницы заданной ёмкости.
    #[inline]
    pub fn empty(page_size: usize) -> Self {
        debug_assert!(page_size >= HEADER_SIZE);
        Self {
            slot_count: 0,
            free_bytes: (page_size - HEADER_SIZE) as u16,
        }
    }
}

/// Прочитать заголовок. Буфер должен быть не короче HEADER_SIZE.
#[inline]
pub fn header_read(page: &[u8]) -> PageHeader {
    PageHeader {
        slot_count: LittleEndian::read_u16(&page[OFF_SLOT_COUNT..OFF_SLOT_COUNT + 2]),
        free_bytes: LittleEndian::read_u16(&page[OFF_FREE_BYTES..OFF_FREE_BYTES + 2]),
    }
}

/// Записать заголовок.
#[inline]
pub fn header_write(page: &mut [u8], h: &PageHeader) {
    LittleEndian::write_u16(&mut page[OFF_SLOT_COUNT..OFF_SLOT_COUNT + 2], h.slot_count);
    LittleEndian::write_u16(&mut page[OFF_FREE_BYTES..OFF_FREE_BYTES + 2], h.free_bytes);
}
