//! pager/manager — таблица page_no → Page с атомарным get-or-create.
//!
//! Design:
//! - Mutex<HashMap<u32, Arc<Page>>>: поиск и вставка под одной блокировкой,
//!   поэтому конкурентное первое обращение к одному номеру создаёт ровно одну страницу.
//! - Страница создаётся уже очищенной (wipe), её размер фиксирован для всего менеджера.
//! - Вытеснения и персистентности нет.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use log::debug;

use crate::config::{validate_page_size, SlotConfig};
use crate::metrics::{record_page_created, record_page_lookup};

use super::page::Page;

/// Источник страниц по номеру.
pub trait PageManager: Send + Sync {
    /// Вернуть страницу `page_no`, создав её при первом обращении.
    /// Повторные вызовы возвращают тот же буфер.
    fn get(&self, page_no: u32) -> Result<Arc<Page>>;

    /// Размер страниц этого менеджера.
    fn page_size(&self) -> usize;
}

#[derive(Debug)]
pub struct InMemoryPageManager {
    page_size: usize,
    pages: Mutex<HashMap<u32, Arc<Page>>>,
}

impl InMemoryPageManager {
    pub fn new(page_size: usize) -> Result<Self> {
        validate_page_size(page_size)?;
        Ok(Self {
            page_size,
            pages: Mutex::new(HashMap::new()),
        })
    }

    pub fn with_config(cfg: &SlotConfig) -> Result<Self> {
        Self::new(cfg.page_size)
    }

    pub fn builder() -> PagerBuilder {
        PagerBuilder::new()
    }

    /// Сколько страниц уже создано.
    pub fn len(&self) -> usize {
        self.pages.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Номера созданных страниц (по возрастанию).
    pub fn page_numbers(&self) -> Result<Vec<u32>> {
        let map = self
            .pages
            .lock()
            .map_err(|_| anyhow!("page table lock poisoned"))?;
        let mut out: Vec<u32> = map.keys().copied().collect();
        out.sort_unstable();
        Ok(out)
    }
}

impl PageManager for InMemoryPageManager {
    fn get(&self, page_no: u32) -> Result<Arc<Page>> {
        record_page_lookup();
        let mut map = self
            .pages
            .lock()
            .map_err(|_| anyhow!("page table lock poisoned"))?;
        if let Some(p) = map.get(&page_no) {
            return Ok(Arc::clone(p));
        }
        let page = Arc::new(Page::new(page_no, self.page_size)?);
        map.insert(page_no, Arc::clone(&page));
        record_page_created();
        debug!("page manager: created page {} ({} B)", page_no, self.page_size);
        Ok(page)
    }

    fn page_size(&self) -> usize {
        self.page_size
    }
}

/// Builder для InMemoryPageManager. По умолчанию стартует с SlotConfig::from_env().
#[derive(Clone, Debug)]
pub struct PagerBuilder {
    cfg: SlotConfig,
}

impl Default for PagerBuilder {
    fn default() -> Self {
        Self {
            cfg: SlotConfig::from_env(),
        }
    }
}

impl PagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: SlotConfig::default(),
        }
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.cfg.page_size = page_size;
        self
    }

    pub fn config(&self) -> &SlotConfig {
        &self.cfg
    }

    pub fn build(self) -> Result<InMemoryPageManager> {
        InMemoryPageManager::with_config(&self.cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_page_size() {
        assert!(InMemoryPageManager::new(2).is_err());
        assert!(PagerBuilder::from_default().page_size(70_000).build().is_err());
    }

    #[test]
    fn page_numbers_are_sorted() -> Result<()> {
        let pm = InMemoryPageManager::new(64)?;
        for no in [7u32, 1, 3] {
            pm.get(no)?;
        }
        assert_eq!(pm.page_numbers()?, vec![1, 3, 7]);
        assert_eq!(pm.len(), 3);
        Ok(())
    }
}
