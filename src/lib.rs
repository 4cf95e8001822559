#![allow(non_snake_case)]

// Базовые модули
pub mod consts;
pub mod config;
pub mod metrics;

// Slotted-страница: header/slots/ops/search/kv/diag
pub mod page;   // src/page/{mod,header,slots,ops,search,kv,diag}.rs
// Страницы по номеру (in-memory get-or-create)
pub mod pager;  // src/pager/{mod,page,manager}.rs

// Удобные реэкспорты
pub use config::{validate_page_size, SlotConfig};
pub use page::{SearchMode, SlottedPage};
pub use pager::{InMemoryPageManager, Page, PageManager, PagerBuilder};
