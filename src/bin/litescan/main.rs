use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::error;

mod cli;
mod util;
mod cmd_header;
mod cmd_tables;
mod cmd_scan;
mod cmd_get;
mod cmd_verify;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт - info.
    // Пример: RUST_LOG=debug ./litescan scan --path db.sqlite --table t
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        // Логируем ошибку и выходим с кодом 1.
        error!("{:?}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Header { path, json } =>
            cmd_header::exec(path, json),

        cli::Cmd::Tables { path, json } =>
            cmd_tables::exec(path, json),

        cli::Cmd::Scan { path, table, key_cols, limit, json } =>
            cmd_scan::exec(path, table, key_cols, limit, json),

        cli::Cmd::Get { path, table, rowid, key, json } =>
            cmd_get::exec(path, table, rowid, key, json),

        cli::Cmd::Verify { path, table, key_cols, lookups, seed } =>
            cmd_verify::exec(path, table, key_cols, lookups, seed),
    }
}
