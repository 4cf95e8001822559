//! page — slotted-страница: отсортированные KV-записи переменной длины в одном буфере.
//!
//! Разделение по подмодулям:
//! - header.rs — заголовок [slot_count u16][free_bytes u16] (LE).
//! - slots.rs  — каталог слотов [key_start u16][value_start u16].
//! - ops.rs    — SlottedPage: wipe/get_record/compare/insert/remove/prune_free.
//! - search.rs — бинарный и линейный поиск, SearchMode, кодировка !index.
//! - kv.rs     — get/upsert/delete по ключу.
//! - diag.rs   — перечисление записей, дамп, проверка инвариантов.

pub mod header;
pub mod slots;
pub mod ops;
pub mod search;
pub mod kv;
pub mod diag;

// ---------------- re-exports (внешний API модуля page) ----------------

pub use header::{header_read, header_write, PageHeader};
pub use slots::{slot_pos, slot_read, slot_write, SlotEntry};
pub use ops::SlottedPage;
pub use search::{decode_search, encode_search, SearchMode};
pub use diag::{
    check_invariants, debug_repr, map_for_diagnostics, page_crc32, render_records, PageStats,
};
