//! Student Registry Core Library
//!
//! Error taxonomy, the storage port, and the record service that enforces
//! email uniqueness on top of it.

// Re-export pure types from student-types
pub use student_types::*;

pub mod error;
pub mod ports;
pub mod service;

pub use error::{Result, StudentError};
pub use ports::StudentStore;
pub use service::{RecordService, StudentService};
