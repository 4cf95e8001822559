//! page/search — поиск слота по ключу.
//!
//! Результат в стиле `slice::binary_search`: Ok(i) — точное совпадение в слоте i,
//! Err(i) — ключа нет, i — позиция вставки, сохраняющая порядок.
//!
//! Два режима:
//! - Binary — O(log n) деление [0, slot_count), основной путь;
//! - Linear — O(n) проход 0..slot_count, эталон для тестов и отладки.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::metrics::record_search;

use super::ops::SlottedPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Binary,
    Linear,
}

impl FromStr for SearchMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binary" | "bin" => Ok(SearchMode::Binary),
            "linear" | "scan" => Ok(SearchMode::Linear),
            other => Err(anyhow!("unknown search mode '{}'", other)),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Binary => f.write_str("binary"),
            SearchMode::Linear => f.write_str("linear"),
        }
    }
}

impl SlottedPage<'_> {
    /// Бинарный поиск по [0, slot_count).
    pub fn search(&self, key: &[u8]) -> Result<usize, usize> {
        record_search();
        let (mut lo, mut hi) = (0usize, self.slot_count());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.compare(mid, key) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Ok(mid),
            }
        }
        Err(lo)
    }

    /// Линейный поиск: первый слот с ключом ≥ key.
    pub fn scan_search(&self, key: &[u8]) -> Result<usize, usize> {
        record_search();
        let n = self.slot_count();
        for i in 0..n {
            match self.compare(i, key) {
                Ordering::Less => continue,
                Ordering::Equal => return Ok(i),
                Ordering::Greater => return Err(i),
            }
        }
        Err(n)
    }

    #[inline]
    pub fn search_with(&self, mode: SearchMode, key: &[u8]) -> Result<usize, usize> {
        match mode {
            SearchMode::Binary => self.search(key),
            SearchMode::Linear => self.scan_search(key),
        }
    }
}

/// Компактная кодировка результата поиска: i ≥ 0 — найдено, иначе !insertion_index.
#[inline]
pub fn encode_search(r: Result<usize, usize>) -> i32 {
    match r {
        Ok(i) => i as i32,
        Err(i) => !(i as i32),
    }
}

#[inline]
pub fn decode_search(code: i32) -> Result<usize, usize> {
    if code >= 0 {
        Ok(code as usize)
    } else {
        Err(!code as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(ps: usize, keys: &[&str]) -> Vec<u8> {
        let mut buf = vec![0u8; ps];
        let mut p = SlottedPage::new(&mut buf).unwrap();
        p.wipe();
        for k in keys {
            let idx = p.search(k.as_bytes()).unwrap_err();
            assert!(p.insert(idx, k.as_bytes(), b"v"));
        }
        buf
    }

    #[test]
    fn empty_page_yields_insertion_zero() {
        let mut buf = filled(64, &[]);
        let p = SlottedPage::new(&mut buf).unwrap();
        assert_eq!(p.search(b"anything"), Err(0));
        assert_eq!(p.scan_search(b"anything"), Err(0));
        assert_eq!(encode_search(p.search(b"")), -1);
    }

    #[test]
    fn single_slot_all_positions() {
        let mut buf = filled(64, &["m"]);
        let p = SlottedPage::new(&mut buf).unwrap();
        for mode in [SearchMode::Binary, SearchMode::Linear] {
            assert_eq!(p.search_with(mode, b"a"), Err(0));
            assert_eq!(p.search_with(mode, b"m"), Ok(0));
            assert_eq!(p.search_with(mode, b"z"), Err(1));
        }
    }

    #[test]
    fn prefix_orders_before_longer_key() {
        let mut buf = filled(128, &["ab", "abc", "a", "b"]);
        let p = SlottedPage::new(&mut buf).unwrap();
        let keys: Vec<&[u8]> = p.records().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![&b"a"[..], b"ab", b"abc", b"b"]);
        assert_eq!(p.search(b"abb"), Err(2));
        assert_eq!(p.search(b"abcd"), Err(3));
    }

    #[test]
    fn unsigned_byte_comparison() {
        let mut buf = vec![0u8; 64];
        let mut p = SlottedPage::new(&mut buf).unwrap();
        p.wipe();
        assert!(p.insert(0, &[0x01], b""));
        assert!(p.insert(1, &[0xFF], b""));
        assert_eq!(p.search(&[0x80]), Err(1));
        assert_eq!(p.scan_search(&[0x80]), Err(1));
    }

    #[test]
    fn encode_decode_complement() {
        assert_eq!(encode_search(Ok(3)), 3);
        assert_eq!(encode_search(Err(0)), -1);
        assert_eq!(encode_search(Err(5)), -6);
        assert_eq!(decode_search(-6), Err(5));
        assert_eq!(decode_search(0), Ok(0));
    }

    #[test]
    fn mode_parse_and_display() {
        assert_eq!("Linear".parse::<SearchMode>().unwrap(), SearchMode::Linear);
        assert_eq!(" bin ".parse::<SearchMode>().unwrap(), SearchMode::Binary);
        assert!("hash".parse::<SearchMode>().is_err());
        assert_eq!(SearchMode::Binary.to_string(), "binary");
    }
}
