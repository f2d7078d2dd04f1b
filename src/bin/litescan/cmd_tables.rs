use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

use LiteScan::Database;

pub fn exec(path: PathBuf, json: bool) -> Result<()> {
    let db = Database::open_path(&path)?;
    let tables = db.tables();
    let indexes = db.indexes();

    if json {
        let doc = json!({ "tables": tables, "indexes": indexes });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("tables ({}):", tables.len());
    for t in &tables {
        println!(
            "  {:<32} root={:<6} {}",
            t.name,
            t.rootpage,
            t.sql.as_deref().unwrap_or("(none)")
        );
    }
    println!("indexes ({}):", indexes.len());
    for ix in &indexes {
        println!(
            "  {:<32} on {:<20} root={:<6} {}",
            ix.name,
            ix.tbl_name,
            ix.rootpage,
            ix.sql.as_deref().unwrap_or("(auto)")
        );
    }
    Ok(())
}
