//! Lightweight global metrics for SlotDB.
//!
//! Потокобезопасные атомарные счётчики:
//! - операции над страницами (insert/remove/search/wipe)
//! - отказы insert по нехватке места
//! - page manager (созданные страницы, повторные обращения)

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Page ops -----
static PAGE_INSERTS: AtomicU64 = AtomicU64::new(0);
static PAGE_INSERTS_REJECTED: AtomicU64 = AtomicU64::new(0);
static PAGE_REMOVES: AtomicU64 = AtomicU64::new(0);
static PAGE_SEARCHES: AtomicU64 = AtomicU64::new(0);
static PAGE_WIPES: AtomicU64 = AtomicU64::new(0);

// ----- Page manager -----
static PAGES_CREATED: AtomicU64 = AtomicU64::new(0);
static PAGE_LOOKUPS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    // Page ops
    pub page_inserts: u64,
    pub page_inserts_rejected: u64,
    pub page_removes: u64,
    pub page_searches: u64,
    pub page_wipes: u64,

    // Page manager
    pub pages_created: u64,
    pub page_lookups: u64,
}

impl MetricsSnapshot {
    /// Доля отказов insert по нехватке места.
    pub fn insert_reject_ratio(&self) -> f64 {
        let total = self.page_inserts + self.page_inserts_rejected;
        if total == 0 {
            0.0
        } else {
            self.page_inserts_rejected as f64 / total as f64
        }
    }
}

// ----- Recorders (Page ops) -----
pub fn record_insert() {
    PAGE_INSERTS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_insert_rejected() {
    PAGE_INSERTS_REJECTED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_remove() {
    PAGE_REMOVES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_search() {
    PAGE_SEARCHES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_wipe() {
    PAGE_WIPES.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Page manager) -----
pub fn record_page_created() {
    PAGES_CREATED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_page_lookup() {
    PAGE_LOOKUPS.fetch_add(1, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        page_inserts: PAGE_INSERTS.load(Ordering::Relaxed),
        page_inserts_rejected: PAGE_INSERTS_REJECTED.load(Ordering::Relaxed),
        page_removes: PAGE_REMOVES.load(Ordering::Relaxed),
        page_searches: PAGE_SEARCHES.load(Ordering::Relaxed),
        page_wipes: PAGE_WIPES.load(Ordering::Relaxed),

        pages_created: PAGES_CREATED.load(Ordering::Relaxed),
        page_lookups: PAGE_LOOKUPS.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    PAGE_INSERTS.store(0, Ordering::Relaxed);
    PAGE_INSERTS_REJECTED.store(0, Ordering::Relaxed);
    PAGE_REMOVES.store(0, Ordering::Relaxed);
    PAGE_SEARCHES.store(0, Ordering::Relaxed);
    PAGE_WIPES.store(0, Ordering::Relaxed);

    PAGES_CREATED.store(0, Ordering::Relaxed);
    PAGE_LOOKUPS.store(0, Ordering::Relaxed);
}
