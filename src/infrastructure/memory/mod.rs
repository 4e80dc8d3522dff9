//! In-process storage backend.
//!
//! [`MemoryStore`] implements every repository trait without a database and
//! is selected with `STORAGE=memory`.

mod memory_store;

pub use memory_store::MemoryStore;
