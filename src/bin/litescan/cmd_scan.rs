use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

use LiteScan::Database;

use super::util::{display_key, display_record, key_json, record_json};

pub fn exec(
    path: PathBuf,
    table: String,
    key_cols: usize,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut db = Database::open_path(&path)?;
    let scan = if key_cols == 0 {
        db.scan_table(&table)?
    } else {
        db.scan_keyed(&table, key_cols)?
    };

    let mut n = 0usize;
    for item in scan.take(limit.unwrap_or(usize::MAX)) {
        let (key, rec) = item?;
        if json {
            println!("{}", json!({ "key": key_json(&key), "values": record_json(&rec)? }));
        } else {
            println!("{} -> {}", display_key(&key), display_record(&rec)?);
        }
        n += 1;
    }

    if !json {
        if n == 0 {
            println!("(no rows)");
        } else {
            println!("({} rows)", n);
        }
    }
    Ok(())
}
