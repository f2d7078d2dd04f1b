use anyhow::{Context, Result};
use std::path::PathBuf;

use LiteScan::Database;

pub fn exec(path: PathBuf, json: bool) -> Result<()> {
    let db = Database::open_path(&path)
        .with_context(|| format!("open {}", path.display()))?;
    let h = db.header();

    if json {
        println!("{}", serde_json::to_string_pretty(h)?);
        return Ok(());
    }

    println!("file:                 {}", path.display());
    println!("page_size:            {}", h.page_size);
    println!("reserved/page:        {}", h.reserved_bytes_per_page);
    println!("usable_size:          {}", h.usable_size());
    println!("page_count:           {}", h.page_count);
    println!("write/read version:   {}/{}", h.write_version, h.read_version);
    println!("change_counter:       {}", h.file_change_counter);
    println!("freelist:             trunk={} pages={}", h.first_freelist_trunk_page, h.freelist_page_count);
    println!("schema_cookie:        {}", h.schema_cookie);
    println!("schema_format:        {}", h.schema_format);
    println!("text_encoding:        {:?}", h.text_encoding);
    println!("user_version:         {}", h.user_version);
    println!("application_id:       {}", h.application_id);
    println!("sqlite_version:       {}", h.sqlite_version_number);
    Ok(())
}
