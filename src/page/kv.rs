//! page/kv — операции уровня ключа поверх search + insert/remove.

use super::ops::SlottedPage;

impl SlottedPage<'_> {
    /// Значение по ключу (view в буфер страницы).
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.search(key).ok().map(|i| self.value_at(i))
    }

    /// Вставить или заменить значение ключа.
    ///
    /// Возвращает false, если новая запись не помещается; страница при этом не меняется
    /// (место проверяется до удаления старой версии).
    #[must_use = "upsert reports whether the record fit into the page"]
    pub fn upsert(&mut self, key: &[u8], value: &[u8]) -> bool {
        match self.search(key) {
            Err(idx) => self.insert(idx, key, value),
            Ok(idx) => {
                let old_len = self.value_at(idx).len();
                if value.len() > self.free_bytes() + old_len {
                    return self.insert_rejected();
                }
                self.remove(idx);
                let ok = self.insert(idx, key, value);
                debug_assert!(ok, "upsert: record must fit after capacity pre-check");
                ok
            }
        }
    }

    /// Удалить ключ, если он есть. Возвращает true, если запись существовала.
    pub fn delete(&mut self, key: &[u8]) -> bool {
        match self.search(key) {
            Ok(idx) => {
                self.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    #[inline]
    fn insert_rejected(&self) -> bool {
        log::trace!(
            "upsert rejected: free {} B (slot_count={})",
            self.free_bytes(),
            self.slot_count()
        );
        crate::metrics::record_insert_rejected();
        false
    }
}
