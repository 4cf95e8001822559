use anyhow::Result;

use SlotDB::consts::{HEADER_SIZE, SLOT_ENTRY_SIZE};
use SlotDB::page::{check_invariants, map_for_diagnostics, render_records, SlottedPage};

/// Обёртка над буфером страницы: вставка/удаление через линейный поиск,
/// как делает вызывающий код индекса.
struct Tester {
    page: Vec<u8>,
}

impl Tester {
    fn new(page_size: usize) -> Result<Self> {
        let mut page = vec![0u8; page_size];
        SlottedPage::new(&mut page)?.wipe();
        Ok(Self { page })
    }

    fn ops(&mut self) -> SlottedPage<'_> {
        SlottedPage::new(&mut self.page).expect("valid page size")
    }

    fn insert(&mut self, key: &str, value: &str) -> bool {
        let mut ops = self.ops();
        let idx = ops
            .scan_search(key.as_bytes())
            .expect_err("key must not exist before insert");
        let ok = ops.insert(idx, key.as_bytes(), value.as_bytes());
        check_invariants(&ops).expect("invariants after insert");
        ok
    }

    fn remove(&mut self, key: &str) {
        let mut ops = self.ops();
        let idx = ops.scan_search(key.as_bytes()).expect("key must exist");
        ops.remove(idx);
        check_invariants(&ops).expect("invariants after remove");
    }

    fn check(&mut self, expected: &str) {
        let mut ops = self.ops();
        ops.prune_free();
        assert_eq!(render_records(&ops), expected);
    }
}

#[test]
fn simple_crud_keeps_records_sorted() -> Result<()> {
    let mut t = Tester::new(64)?;

    assert!(t.insert("foo", "1"));
    t.check("foo=1");
    assert!(t.insert("bar", "22"));
    t.check("bar=22,foo=1");
    assert!(t.insert("baz", "333"));
    t.check("bar=22,baz=333,foo=1");
    assert!(t.insert("bat", "4444"));
    t.check("bar=22,bat=4444,baz=333,foo=1");

    t.remove("bat");
    t.check("bar=22,baz=333,foo=1");
    t.remove("bar");
    t.check("baz=333,foo=1");
    t.remove("baz");
    t.check("foo=1");
    t.remove("foo");
    t.check("");

    let ops = t.ops();
    assert_eq!(ops.slot_count(), 0);
    assert_eq!(ops.free_bytes(), 64 - HEADER_SIZE);
    Ok(())
}

#[test]
fn size_boundary_rejects_then_fits_exactly() -> Result<()> {
    let page_size = HEADER_SIZE + SLOT_ENTRY_SIZE + 6;
    let mut t = Tester::new(page_size)?;
    assert_eq!(t.ops().free_bytes(), 10);

    let before = t.page.clone();
    assert!(!t.insert("foo", "abcd"), "3 + 4 + 4 > 10 must be rejected");
    assert_eq!(t.page, before, "rejected insert must not touch the page");
    assert_eq!(t.ops().slot_count(), 0);

    assert!(t.insert("foo", "abc"), "3 + 3 + 4 == 10 must fit");
    t.check("foo=abc");
    assert_eq!(t.ops().free_bytes(), 0);
    Ok(())
}

#[test]
fn empty_page_search_encodes_insertion_zero() -> Result<()> {
    let mut t = Tester::new(128)?;
    let ops = t.ops();
    for key in [&b""[..], b"a", b"\xff\xff", b"zzzz"] {
        assert_eq!(ops.search(key), Err(0));
        assert_eq!(ops.scan_search(key), Err(0));
        assert_eq!(SlotDB::page::encode_search(ops.search(key)), !0);
    }
    Ok(())
}

#[test]
fn diagnostics_mapping_uses_caller_decoder() -> Result<()> {
    let mut t = Tester::new(128)?;
    assert!(t.insert("b", "2"));
    assert!(t.insert("a", "1"));
    let ops = t.ops();
    let lens = map_for_diagnostics(&ops, |k, v| (k.len(), v.to_vec()));
    assert_eq!(lens, vec![(1, b"1".to_vec()), (1, b"2".to_vec())]);
    Ok(())
}

#[test]
fn get_record_returns_views_into_page() -> Result<()> {
    let mut t = Tester::new(64)?;
    assert!(t.insert("key", "value"));
    let ops = t.ops();
    let (k, v) = ops.get_record(0);
    assert_eq!(k, b"key");
    assert_eq!(v, b"value");
    // запись лежит в самом конце страницы
    assert_eq!(&ops.as_bytes()[64 - 8..], b"keyvalue");
    assert_eq!(ops.compare(0, b"kex"), std::cmp::Ordering::Greater);
    assert_eq!(ops.compare(0, b"key"), std::cmp::Ordering::Equal);
    assert_eq!(ops.compare(0, b"keys"), std::cmp::Ordering::Less);
    Ok(())
}
