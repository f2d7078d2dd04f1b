use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI для LiteScan: чтение файлов SQLite 3 без движка SQLite.
#[derive(Parser, Debug)]
#[command(name = "litescan", version, about = "Read-only SQLite 3 file decoder")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Print the parsed 100-byte file header
    Header {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List catalog tables and indexes
    Tables {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Stream rows of a table or index in key order
    Scan {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        table: String,
        /// Number of key columns (0 = rowid table; N for indexes / WITHOUT ROWID tables)
        #[arg(long, default_value_t = 0)]
        key_cols: usize,
        /// Stop after N rows
        #[arg(long)]
        limit: Option<usize>,
        /// One JSON object per line
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Point lookup by rowid or by key tuple
    Get {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        table: String,
        /// Rowid (resolves only the first row of a rowid table)
        #[arg(long, conflicts_with = "key")]
        rowid: Option<i64>,
        /// Key column (repeat for composite keys): text, int:N, real:F, hex:.. or null
        #[arg(long, required_unless_present = "rowid")]
        key: Vec<String>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Full scan with ordering check, then random lookups against the snapshot
    Verify {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        table: String,
        #[arg(long, default_value_t = 1)]
        key_cols: usize,
        #[arg(long, default_value_t = 20000)]
        lookups: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}
