//! Student Types - Pure type definitions for the student registry
//!
//! This crate contains only plain data types with no async runtime or storage
//! dependencies, so both the core and the server can share them.

pub mod student;

pub use student::*;
