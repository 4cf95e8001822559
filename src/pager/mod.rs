//! pager — слой управления страницами (in-memory).
//!
//! Подмодули:
//! - page.rs    — Page: номер + буфер фиксированного размера под мьютексом.
//! - manager.rs — PageManager (трейт), InMemoryPageManager, PagerBuilder.

pub mod page;
pub mod manager;

// Re-exports для внешнего API
pub use manager::{InMemoryPageManager, PageManager, PagerBuilder};
pub use page::Page;
