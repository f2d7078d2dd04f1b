use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

use LiteScan::{Database, Key, Value};

use super::util::{display_key, display_record, key_json, parse_value_arg, record_json};

pub fn exec(
    path: PathBuf,
    table: String,
    rowid: Option<i64>,
    key: Vec<String>,
    json: bool,
) -> Result<()> {
    let mut db = Database::open_path(&path)?;
    let key = match rowid {
        Some(r) => Key::Rowid(r),
        None => {
            let vals = key
                .iter()
                .map(|s| parse_value_arg(s))
                .collect::<Result<Vec<Value>>>()?;
            Key::Tuple(vals)
        }
    };

    match db.lookup_row(&table, key.clone()) {
        Ok(rec) => {
            if json {
                println!("{}", json!({ "key": key_json(&key), "values": record_json(&rec)? }));
            } else {
                println!("FOUND {} -> {}", display_key(&key), display_record(&rec)?);
            }
        }
        Err(e) if e.is_not_found() => println!("NOT FOUND {}", display_key(&key)),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
