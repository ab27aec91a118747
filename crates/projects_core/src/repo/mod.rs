//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return absence (`Option`, `bool`) rather than
//!   raising not-found; semantic errors belong to the service layer.

pub mod project_repo;
