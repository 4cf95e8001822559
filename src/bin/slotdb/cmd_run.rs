use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use SlotDB::page::{
    check_invariants, debug_repr, encode_search, page_crc32, PageStats, SlottedPage,
};
use SlotDB::{InMemoryPageManager, PageManager, SearchMode, SlotConfig};

use super::util::{decode_bytes_arg, display_text, read_all};

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum Op {
    Put { key: String, value: String },
    Get { key: String },
    Search { key: String },
    Del { key: String },
    Wipe,
}

#[derive(Debug, Serialize)]
struct OpOutcome {
    op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    ok: bool,
    /// i ≥ 0 — слот найден; иначе !insertion_index
    #[serde(skip_serializing_if = "Option::is_none")]
    slot: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

#[derive(Debug, Serialize)]
struct RunReport {
    search_mode: SearchMode,
    stats: PageStats,
    crc32: u32,
    outcomes: Vec<OpOutcome>,
    records: Vec<(String, String)>,
}

#[allow(clippy::too_many_arguments)]
pub fn exec(
    page_size: Option<usize>,
    ops_file: Option<PathBuf>,
    ops_json: Option<String>,
    search: Option<SearchMode>,
    json: bool,
    dump: bool,
    verify: bool,
) -> Result<()> {
    let mut cfg = SlotConfig::from_env();
    if let Some(ps) = page_size {
        cfg = cfg.with_page_size(ps);
    }
    if let Some(m) = search {
        cfg = cfg.with_search_mode(m);
    }
    let cfg = cfg.build()?;
    debug!("slotdb run: {}", cfg);

    let ops = load_ops(ops_file, ops_json)?;

    let pm = InMemoryPageManager::with_config(&cfg)?;
    let page = pm.get(0)?;

    let report = page.with_ops(|p| -> Result<RunReport> {
        let mut outcomes = Vec::with_capacity(ops.len());
        for (i, op) in ops.iter().enumerate() {
            outcomes.push(apply(p, cfg.search_mode, op)?);
            if verify {
                check_invariants(p).with_context(|| format!("after op #{}", i))?;
            }
        }
        if cfg.prune_on_dump {
            p.prune_free();
        }
        let records = p
            .records()
            .map(|(k, v)| (display_text(k), display_text(v)))
            .collect();
        Ok(RunReport {
            search_mode: cfg.search_mode,
            stats: PageStats::of(p),
            crc32: page_crc32(p.as_bytes()),
            outcomes,
            records,
        })
    })??;

    info!(
        "applied {} op(s): slot_count={}, free_bytes={}",
        report.outcomes.len(),
        report.stats.slot_count,
        report.stats.free_bytes
    );

    if json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        print_human(&report);
    }

    if dump {
        let bytes = page.snapshot()?;
        for chunk in bytes.chunks(64) {
            println!("{}", debug_repr(chunk));
        }
    }
    Ok(())
}

fn load_ops(ops_file: Option<PathBuf>, ops_json: Option<String>) -> Result<Vec<Op>> {
    let raw = match (ops_file, ops_json) {
        (Some(p), _) => read_all(&p)?,
        (None, Some(s)) => s.into_bytes(),
        (None, None) => return Err(anyhow!("either --ops-file or --ops-json is required")),
    };
    serde_json::from_slice(&raw).context("parse ops JSON")
}

fn apply(p: &mut SlottedPage<'_>, mode: SearchMode, op: &Op) -> Result<OpOutcome> {
    let out = match op {
        Op::Put { key, value } => {
            let k = decode_bytes_arg(key)?;
            let v = decode_bytes_arg(value)?;
            let ok = match p.search_with(mode, &k) {
                Err(idx) => p.insert(idx, &k, &v),
                Ok(_) => p.upsert(&k, &v),
            };
            OpOutcome {
                op: "put",
                key: Some(key.clone()),
                ok,
                slot: None,
                value: None,
            }
        }
        Op::Get { key } => {
            let k = decode_bytes_arg(key)?;
            let r = p.search_with(mode, &k);
            OpOutcome {
                op: "get",
                key: Some(key.clone()),
                ok: r.is_ok(),
                slot: Some(encode_search(r)),
                value: r.ok().map(|i| display_text(p.value_at(i))),
            }
        }
        Op::Search { key } => {
            let k = decode_bytes_arg(key)?;
            let r = p.search_with(mode, &k);
            OpOutcome {
                op: "search",
                key: Some(key.clone()),
                ok: r.is_ok(),
                slot: Some(encode_search(r)),
                value: None,
            }
        }
        Op::Del { key } => {
            let k = decode_bytes_arg(key)?;
            let r = p.search_with(mode, &k);
            if let Ok(i) = r {
                p.remove(i);
            }
            OpOutcome {
                op: "del",
                key: Some(key.clone()),
                ok: r.is_ok(),
                slot: Some(encode_search(r)),
                value: None,
            }
        }
        Op::Wipe => {
            p.wipe();
            OpOutcome {
                op: "wipe",
                key: None,
                ok: true,
                slot: None,
                value: None,
            }
        }
    };
    Ok(out)
}

fn print_human(r: &RunReport) {
    for o in &r.outcomes {
        let key = o.key.as_deref().unwrap_or("");
        match (&o.value, o.slot) {
            (Some(v), Some(s)) => println!("{:<6} {:<16} ok={} slot={} value={}", o.op, key, o.ok, s, v),
            (None, Some(s)) => println!("{:<6} {:<16} ok={} slot={}", o.op, key, o.ok, s),
            _ => println!("{:<6} {:<16} ok={}", o.op, key, o.ok),
        }
    }
    println!(
        "page: size={} slots={} free={} used={} crc32={:08x} search={}",
        r.stats.page_size,
        r.stats.slot_count,
        r.stats.free_bytes,
        r.stats.used_bytes,
        r.crc32,
        r.search_mode
    );
    let rendered: Vec<String> = r.records.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    println!("records: {}", rendered.join(","));
}
