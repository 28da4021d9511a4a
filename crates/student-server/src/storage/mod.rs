//! Storage layer
//!
//! SQLite (embedded) for durable storage, DashMap for the in-memory backend.
//! Both implement [`student_core::StudentStore`].

pub mod db;
pub mod memory;

pub use db::Database;
pub use memory::MemoryStore;
