//! Database layer (in-memory store).

pub mod memory;

pub use memory::MemoryDb;
