use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use oorandom::Rand64;
use rusqlite::{params, Connection};

use LiteScan::{Bound, Database, Key, Value};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let base = std::env::temp_dir();
    base.join(format!("litescan-index-{prefix}-{pid}-{t}-{id}"))
}

const CITIES: [&str; 6] = ["Amsterdam", "Berlin", "Kyiv", "Lisbon", "Oslo", "Riga"];

/// 3000 строк, индекс (city, age) с большим количеством дубликатов.
fn build_people(path: &PathBuf) -> Result<Vec<(String, i64, i64)>> {
    let conn = Connection::open(path)?;
    conn.execute_batch(
        "PRAGMA page_size=512;
         CREATE TABLE people(id INTEGER PRIMARY KEY, city TEXT, age INTEGER, note TEXT);
         CREATE INDEX idx_city_age ON people(city, age);",
    )?;
    let mut rng = Rand64::new(5);
    let mut rows = Vec::new();
    let tx = conn.unchecked_transaction()?;
    for id in 1..=3000i64 {
        let city = CITIES[rng.rand_range(0..CITIES.len() as u64) as usize].to_string();
        let age = rng.rand_range(18..40) as i64;
        tx.execute(
            "INSERT INTO people(id, city, age, note) VALUES (?1, ?2, ?3, ?4)",
            params![id, city, age, format!("note {}", id)],
        )?;
        rows.push((city, age, id));
    }
    tx.commit()?;
    rows.sort();
    Ok(rows)
}

fn ck(city: &str, age: i64) -> Key {
    Key::Tuple(vec![Value::Text(city.into()), Value::Integer(age)])
}

fn row_key(city: &str, age: i64, id: i64) -> Key {
    Key::Tuple(vec![Value::Text(city.into()), Value::Integer(age), Value::Integer(id)])
}

#[test]
fn full_index_scan_in_engine_order() -> Result<()> {
    let root = unique_root("full");
    fs::create_dir_all(&root)?;
    let path = root.join("people.db");
    let rows = build_people(&path)?;

    let mut db = Database::open_path(&path)?;
    assert_eq!(db.indexes_of("people").len(), 1);

    // все три колонки записи индекса как ключ: (city, age, rowid) уникален
    let mut got = Vec::new();
    for item in db.scan_keyed("idx_city_age", 3)? {
        let (k, rest) = item?;
        assert!(rest.is_empty());
        got.push(k);
    }
    let expected: Vec<Key> = rows.iter().map(|(c, a, id)| row_key(c, *a, *id)).collect();
    assert_eq!(got, expected);
    assert!(got.windows(2).all(|w| w[0] < w[1]));

    // ключ из двух колонок: остаток записи - rowid
    let mut n = 0;
    let mut prev: Option<Key> = None;
    for item in db.scan_keyed("idx_city_age", 2)? {
        let (k, rest) = item?;
        assert_eq!(rest.len(), 1);
        assert!(rest.column(0)?.as_i64().is_some());
        if let Some(p) = &prev {
            assert!(*p <= k, "non-decreasing with duplicates");
        }
        prev = Some(k);
        n += 1;
    }
    assert_eq!(n, 3000);

    let _ = fs::remove_dir_all(&root);
    Ok(())
}

#[test]
fn duplicate_key_lookups_and_windows() -> Result<()> {
    let root = unique_root("dups");
    fs::create_dir_all(&root)?;
    let path = root.join("people.db");
    let rows = build_people(&path)?;

    let mut groups: BTreeMap<(String, i64), BTreeSet<i64>> = BTreeMap::new();
    for (c, a, id) in &rows {
        groups.entry((c.clone(), *a)).or_default().insert(*id);
    }
    let full: Vec<(Key, i64)> = rows.iter().map(|(c, a, id)| (ck(c, *a), *id)).collect();

    let mut db = Database::open_path(&path)?;

    // поиск по (city, age) находит одну из строк с этим ключом
    for ((city, age), ids) in &groups {
        let rec = db.lookup_row("idx_city_age", ck(city, *age))?;
        let id = rec.column(0)?.as_i64().unwrap();
        assert!(ids.contains(&id), "({city}, {age}) -> {id}");
    }
    assert!(db.lookup_row("idx_city_age", ck("Berlin", 99)).unwrap_err().is_not_found());
    assert!(db.lookup_row("idx_city_age", ck("Zurich", 20)).unwrap_err().is_not_found());

    // окна по префиксу из двух колонок: порядок, границы и подмножество полного скана
    let windows = [
        (ck("Berlin", 20), ck("Berlin", 30)),
        (ck("Kyiv", 18), ck("Oslo", 18)),
        (ck("Amsterdam", 0), ck("Amsterdam", 100)),
        (ck("Riga", 39), ck("Zzz", 0)),
    ];
    for (lo, hi) in windows {
        let got: Vec<(Key, i64)> = db
            .scan_range("idx_city_age", 2, Bound::from(lo.clone()), Bound::from(hi.clone()))?
            .map(|r| r.and_then(|(k, rest)| Ok((k, rest.column(0)?.as_i64().unwrap_or(-1)))))
            .collect::<LiteScan::Result<_>>()?;
        assert!(!got.is_empty());
        assert!(got.windows(2).all(|w| w[0].0 <= w[1].0));
        for (k, id) in &got {
            assert!(lo <= *k && *k < hi);
            assert!(full.contains(&(k.clone(), *id)));
        }
    }

    // с уникальным ключом (city, age, rowid) окно точное
    let lo = row_key("Kyiv", 25, 0);
    let hi = row_key("Lisbon", 30, 0);
    let got = db
        .scan_range("idx_city_age", 3, Bound::from(lo.clone()), Bound::from(hi.clone()))?
        .count();
    let expected = rows
        .iter()
        .map(|(c, a, id)| row_key(c, *a, *id))
        .filter(|k| lo <= *k && *k < hi)
        .count();
    assert_eq!(got, expected);

    let _ = fs::remove_dir_all(&root);
    Ok(())
}
