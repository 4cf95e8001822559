//! pager/page — страница фиксированного размера, адресуемая номером.

use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Result};

use crate::page::SlottedPage;

/// Буфер страницы + её номер. Содержимое защищено мьютексом: в каждый момент
/// страницу изменяет не более одного владельца блокировки.
#[derive(Debug)]
pub struct Page {
    page_no: u32,
    page_size: usize,
    data: Mutex<Vec<u8>>,
}

impl Page {
    /// Новая пустая (wiped) страница.
    pub(crate) fn new(page_no: u32, page_size: usize) -> Result<Self> {
        let mut data = vec![0u8; page_size];
        SlottedPage::new(&mut data)?.wipe();
        Ok(Self {
            page_no,
            page_size,
            data: Mutex::new(data),
        })
    }

    #[inline]
    pub fn page_no(&self) -> u32 {
        self.page_no
    }

    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Эксклюзивный доступ к байтам страницы.
    pub fn lock(&self) -> Result<MutexGuard<'_, Vec<u8>>> {
        self.data
            .lock()
            .map_err(|_| anyhow!("page {} lock poisoned", self.page_no))
    }

    /// Выполнить `f` над SlottedPage под блокировкой страницы.
    pub fn with_ops<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut SlottedPage<'_>) -> R,
    {
        let mut guard = self.lock()?;
        let mut ops = SlottedPage::new(guard.as_mut_slice())?;
        Ok(f(&mut ops))
    }

    /// Копия байтов страницы.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(self.lock()?.clone())
    }
}
