//! Core domain logic for the projects manager.
//! Model, storage, repository and service layers; the CLI only renders.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{DbError, DbResult, Gateway};
pub use logging::{default_log_level, init_logging, logging_status, parse_level, LogSettings};
pub use model::decimal::{Decimal, ParseDecimalError};
pub use model::project::{
    is_valid_difficulty, Category, Material, Project, ProjectId, Step, DIFFICULTY_MAX,
    DIFFICULTY_MIN,
};
pub use repo::project_repo::{ProjectRepository, RepoError, RepoResult, SqliteProjectRepository};
pub use service::project_service::{ProjectService, ProjectServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
