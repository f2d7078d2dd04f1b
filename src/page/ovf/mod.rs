//! page/ovf - payload ячейки: локальная часть + OVERFLOW-цепочка.
//! - chain.rs - пороги X/M/K и сборка полного payload.

pub mod chain;

// Реэкспорт внешнего API
pub use chain::{assemble_payload, local_payload_len, max_local, min_local, read_payload};
