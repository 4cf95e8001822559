//! Общие константы формата slotted-страницы.
//!
//! Layout (все поля little-endian):
//! ```text
//! offset 0 : slot_count  u16
//! offset 2 : free_bytes  u16
//! offset 4 : slot[0] = [key_start u16][value_start u16]
//! offset 8 : slot[1] = ...
//! <free region>
//! <key-value region, растёт от конца страницы; slot 0 ближе всех к концу>
//! ```

// -------- Header --------
/// Размер заголовка страницы: [slot_count u16][free_bytes u16].
pub const HEADER_SIZE: usize = 4;
pub const OFF_SLOT_COUNT: usize = 0;
pub const OFF_FREE_BYTES: usize = 2;

// -------- Slot directory --------
/// Размер записи каталога слотов: [key_start u16][value_start u16].
pub const SLOT_ENTRY_SIZE: usize = 4;
pub const SLOT_OFF_KEY_START: usize = 0;
pub const SLOT_OFF_VALUE_START: usize = 2;

// -------- Page size --------
/// Все смещения должны помещаться в u16 (65536 кодируется как 0, см. page::slots).
pub const MAX_PAGE_SIZE: usize = 1 << 16;
/// Минимум — страница, в которой есть только заголовок.
pub const MIN_PAGE_SIZE: usize = HEADER_SIZE;
/// Размер страницы по умолчанию для InMemoryPageManager / CLI.
pub const DEFAULT_PAGE_SIZE: usize = 4096;
