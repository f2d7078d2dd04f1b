//! Centralized configuration and builder for LiteScan.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - LiteScanConfig::from_env() reads LITESCAN_* variables.
//! - OpenOptions is a small builder that produces a LiteScanConfig (and can open a file).
//!
//! Defaults:
//! - page_cache_pages = 128 (0 disables the cache)
//! - check_magic = true
//! - cache_overflow_pages = false (overflow pages are read once per payload and bypass the cache)

use std::fmt;
use std::fs::File;
use std::path::Path;

use crate::consts::DEFAULT_PAGE_CACHE_PAGES;
use crate::db::Database;
use crate::error::Result;

#[inline]
fn env_flag(s: &str) -> bool {
    let s = s.trim().to_ascii_lowercase();
    s == "1" || s == "true" || s == "yes" || s == "on"
}

/// Reader configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiteScanConfig {
    /// Page cache size in pages (0 disables).
    /// Env: LITESCAN_PAGE_CACHE_PAGES (default 128)
    pub page_cache_pages: usize,

    /// Verify the 16-byte magic prefix of the file header.
    /// Env: LITESCAN_CHECK_MAGIC (default true; "0|false|off|no" => false)
    pub check_magic: bool,

    /// Keep overflow pages in the page cache too.
    /// Env: LITESCAN_CACHE_OVF (default false; "1|true|on|yes" => true)
    pub cache_overflow_pages: bool,
}

impl Default for LiteScanConfig {
    fn default() -> Self {
        Self {
            page_cache_pages: DEFAULT_PAGE_CACHE_PAGES,
            check_magic: true,
            cache_overflow_pages: false,
        }
    }
}

impl LiteScanConfig {
    /// Load configuration from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("LITESCAN_PAGE_CACHE_PAGES") {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.page_cache_pages = n;
            }
        }

        if let Ok(v) = std::env::var("LITESCAN_CHECK_MAGIC") {
            cfg.check_magic = env_flag(&v);
        }

        if let Ok(v) = std::env::var("LITESCAN_CACHE_OVF") {
            cfg.cache_overflow_pages = env_flag(&v);
        }

        cfg
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_page_cache_pages(mut self, pages: usize) -> Self {
        self.page_cache_pages = pages;
        self
    }

    pub fn with_check_magic(mut self, on: bool) -> Self {
        self.check_magic = on;
        self
    }

    pub fn with_cache_overflow_pages(mut self, on: bool) -> Self {
        self.cache_overflow_pages = on;
        self
    }
}

impl fmt::Display for LiteScanConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LiteScanConfig {{ \
             page_cache_pages: {}, \
             check_magic: {}, \
             cache_overflow_pages: {} \
             }}",
            if self.page_cache_pages == 0 {
                "disabled".to_string()
            } else {
                self.page_cache_pages.to_string()
            },
            self.check_magic,
            self.cache_overflow_pages,
        )
    }
}

/// Lightweight builder that produces a LiteScanConfig.
/// `Database::builder()` returns this builder.
#[derive(Clone, Debug)]
pub struct OpenOptions {
    cfg: LiteScanConfig,
}

impl Default for OpenOptions {
    fn default() -> Self {
        // Start from env, then allow overrides.
        Self {
            cfg: LiteScanConfig::from_env(),
        }
    }
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: LiteScanConfig::default(),
        }
    }

    pub fn page_cache_pages(mut self, pages: usize) -> Self {
        self.cfg.page_cache_pages = pages;
        self
    }

    pub fn check_magic(mut self, on: bool) -> Self {
        self.cfg.check_magic = on;
        self
    }

    pub fn cache_overflow_pages(mut self, on: bool) -> Self {
        self.cfg.cache_overflow_pages = on;
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> LiteScanConfig {
        self.cfg
    }

    /// Open a database file with these options.
    pub fn open(self, path: &Path) -> Result<Database<File>> {
        Database::open_path_with_config(path, &self.cfg)
    }
}
