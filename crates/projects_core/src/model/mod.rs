//! Domain model for the project manager.
//!
//! # Responsibility
//! - Define the project aggregate and its child records.
//! - Provide the fixed-point decimal used for hours and costs.
//!
//! # Invariants
//! - Model types are storage-agnostic; SQL mapping lives in `repo`.

pub mod decimal;
pub mod project;
