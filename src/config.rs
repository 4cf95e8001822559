//! Centralized configuration for SlotDB.
//!
//! - SlotConfig::from_env() reads SLOTDB_* variables on top of the defaults.
//! - Fluent `with_*` setters override individual fields.
//! - PagerBuilder (see pager/) consumes a SlotConfig.
//!
//! ENV:
//! - SLOTDB_PAGE_SIZE     — page size in bytes, [4 .. 65536] (default 4096)
//! - SLOTDB_SEARCH        — "binary" | "linear" (default binary)
//! - SLOTDB_PRUNE_ON_DUMP — 0|1|true|false|on|off|yes|no (default true)

use std::fmt;

use anyhow::{anyhow, Result};
use log::warn;

use crate::consts::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use crate::page::SearchMode;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotConfig {
    /// Page size for newly created pages.
    /// Env: SLOTDB_PAGE_SIZE (default 4096)
    pub page_size: usize,

    /// Search strategy used by key-level helpers and the CLI.
    /// Env: SLOTDB_SEARCH (default binary)
    pub search_mode: SearchMode,

    /// Zero the free region before dumping a page (deterministic dumps).
    /// Env: SLOTDB_PRUNE_ON_DUMP (default true)
    pub prune_on_dump: bool,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_mode: SearchMode::Binary,
            prune_on_dump: true,
        }
    }
}

/// Page size must let every offset fit into u16 (65536 is encoded as 0).
pub fn validate_page_size(page_size: usize) -> Result<()> {
    if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(anyhow!(
            "page_size must be in [{} .. {}], got {}",
            MIN_PAGE_SIZE,
            MAX_PAGE_SIZE,
            page_size
        ));
    }
    Ok(())
}

#[inline]
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

impl SlotConfig {
    /// Load configuration from environment variables. Malformed values are
    /// ignored (with a warning) and the default is kept.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("SLOTDB_PAGE_SIZE") {
            match v.trim().parse::<usize>() {
                Ok(n) if validate_page_size(n).is_ok() => cfg.page_size = n,
                _ => warn!("SLOTDB_PAGE_SIZE={:?} ignored (must be in [{} .. {}])", v, MIN_PAGE_SIZE, MAX_PAGE_SIZE),
            }
        }

        if let Ok(v) = std::env::var("SLOTDB_SEARCH") {
            match v.parse::<SearchMode>() {
                Ok(m) => cfg.search_mode = m,
                Err(e) => warn!("SLOTDB_SEARCH ignored: {}", e),
            }
        }

        if let Ok(v) = std::env::var("SLOTDB_PRUNE_ON_DUMP") {
            match parse_bool(&v) {
                Some(b) => cfg.prune_on_dump = b,
                None => warn!("SLOTDB_PRUNE_ON_DUMP={:?} ignored", v),
            }
        }

        cfg
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    pub fn with_prune_on_dump(mut self, on: bool) -> Self {
        self.prune_on_dump = on;
        self
    }

    /// Finish the builder chain, validating the result.
    pub fn build(self) -> Result<Self> {
        validate_page_size(self.page_size)?;
        Ok(self)
    }
}

impl fmt::Display for SlotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SlotConfig {{ page_size: {}, search_mode: {}, prune_on_dump: {} }}",
            self.page_size, self.search_mode, self.prune_on_dump
        )
    }
}
