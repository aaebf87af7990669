//! Output generation.
//!
//! # Submodules
//!
//! - [`json`]: writes the [`crate::models::Snapshot`] document consumed by the
//!   front end
//!
//! A run with zero accepted articles writes nothing; the previous snapshot
//! stays on disk untouched.

pub mod json;
