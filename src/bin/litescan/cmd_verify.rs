use anyhow::{anyhow, Result};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::time::Instant;

use LiteScan::{Database, Key, Value};

use super::util::display_key;

/// Полный скан с проверкой строгого возрастания ключей, затем `lookups` случайных
/// точечных поисков, каждый сверяется со снимком скана.
pub fn exec(path: PathBuf, table: String, key_cols: usize, lookups: usize, seed: u64) -> Result<()> {
    let mut db = Database::open_path(&path)?;

    let t0 = Instant::now();
    let mut snapshot: Vec<(Key, Vec<Value>)> = Vec::new();
    let scan = if key_cols == 0 {
        db.scan_table(&table)?
    } else {
        db.scan_keyed(&table, key_cols)?
    };
    for item in scan {
        let (key, rec) = item?;
        if let Some((prev, _)) = snapshot.last() {
            if *prev >= key {
                return Err(anyhow!(
                    "keys out of order: {} then {}",
                    display_key(prev),
                    display_key(&key)
                ));
            }
        }
        snapshot.push((key, rec.values()?));
    }
    info!(
        "scan {}: {} rows in strictly increasing key order ({:.1} ms)",
        table,
        snapshot.len(),
        t0.elapsed().as_secs_f64() * 1000.0
    );

    if key_cols == 0 {
        warn!("rowid lookups resolve only the first row of a table; skipping lookups");
        return Ok(());
    }
    if snapshot.is_empty() {
        println!("OK: {} is empty", table);
        return Ok(());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let t1 = Instant::now();
    for _ in 0..lookups {
        let (key, expected) = &snapshot[rng.gen_range(0..snapshot.len())];
        let got = db.lookup_row(&table, key.clone())?.values()?;
        if &got != expected {
            return Err(anyhow!("lookup {} returned a different value", display_key(key)));
        }
    }
    info!(
        "{} lookups OK ({:.1} ms), cache {:?}, overflow pages read {}",
        lookups,
        t1.elapsed().as_secs_f64() * 1000.0,
        db.cache_stats(),
        db.overflow_pages_read()
    );
    println!("OK: {} rows, {} lookups", snapshot.len(), lookups);
    Ok(())
}
