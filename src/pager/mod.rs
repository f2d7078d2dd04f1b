//! pager - слой доступа к страницам, модульная разбивка.
//!
//! Подмодули:
//! - core.rs  - структура Pager, open(), заголовок файла и счётчики.
//! - io.rs    - чтение страниц (b-tree через кэш, overflow мимо кэша по умолчанию).
//! - cache.rs - LRU-кэш страниц, принадлежащий экземпляру Pager.

pub mod cache;
pub mod core;
pub mod io;

// Re-exports для внешнего API
pub use cache::{CacheStats, PageCache};
pub use self::core::Pager;
