use anyhow::Result;
use log::debug;
use serde::Serialize;
use std::time::Instant;

use SlotDB::page::{check_invariants, PageStats};
use SlotDB::{InMemoryPageManager, PageManager, SlotConfig};

use super::util::Rng64;

#[derive(Debug, Serialize)]
struct FillReport {
    stats: PageStats,
    inserted: usize,
    duplicates: usize,
    elapsed_us: u128,
    metrics_inserts_rejected: u64,
}

pub fn exec(
    page_size: Option<usize>,
    key_size: usize,
    value_size: usize,
    seed: u64,
    json: bool,
) -> Result<()> {
    let mut cfg = SlotConfig::from_env();
    if let Some(ps) = page_size {
        cfg = cfg.with_page_size(ps);
    }
    let cfg = cfg.build()?;

    let pm = InMemoryPageManager::with_config(&cfg)?;
    let page = pm.get(0)?;
    let mut rng = Rng64::new(seed);

    let t0 = Instant::now();
    let (inserted, duplicates, stats) = page.with_ops(|p| -> Result<(usize, usize, PageStats)> {
        let (mut inserted, mut duplicates) = (0usize, 0usize);
        loop {
            let key = rng.alnum(key_size);
            let value = rng.alnum(value_size);
            match p.search(&key) {
                // совпадение случайного ключа — просто пропускаем
                Ok(_) => duplicates += 1,
                Err(idx) => {
                    if !p.insert(idx, &key, &value) {
                        break;
                    }
                    inserted += 1;
                }
            }
            if duplicates > 1_000_000 {
                break;
            }
        }
        check_invariants(p)?;
        Ok((inserted, duplicates, PageStats::of(p)))
    })??;
    let elapsed = t0.elapsed();
    debug!("fill: {} record(s) in {:?}", inserted, elapsed);

    let report = FillReport {
        stats,
        inserted,
        duplicates,
        elapsed_us: elapsed.as_micros(),
        metrics_inserts_rejected: SlotDB::metrics::snapshot().page_inserts_rejected,
    };

    if json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!(
            "filled page: size={} records={} free={} used={} duplicates={} elapsed={:.3} ms",
            report.stats.page_size,
            report.inserted,
            report.stats.free_bytes,
            report.stats.used_bytes,
            report.duplicates,
            elapsed.as_secs_f64() * 1000.0
        );
    }
    Ok(())
}
