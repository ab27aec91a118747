//! Project use-case service.
//!
//! # Responsibility
//! - Provide the add/list/get/update/delete entry points used by the shell.
//! - Translate repository absence into a not-found failure.
//!
//! # Invariants
//! - A missing row and a zero-row update both surface as `ProjectNotFound`.
//! - Service layer remains storage-agnostic.

use crate::model::project::{Project, ProjectId};
use crate::repo::project_repo::{ProjectRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for project use-cases.
#[derive(Debug)]
pub enum ProjectServiceError {
    /// No project row matched the identifier.
    ProjectNotFound(ProjectId),
    /// Update was requested for a project that was never persisted.
    MissingProjectId,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectNotFound(project_id) => {
                write!(f, "Project with project ID={project_id} does not exist.")
            }
            Self::MissingProjectId => write!(f, "project has not been saved yet"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ProjectServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type ServiceResult<T> = Result<T, ProjectServiceError>;

/// Project service facade over repository implementations.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new project and returns it with its identifier.
    pub fn add_project(&self, project: &Project) -> ServiceResult<Project> {
        Ok(self.repo.insert_project(project)?)
    }

    /// Lists all projects ordered by name, without child collections.
    pub fn fetch_all_projects(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.repo.fetch_all_projects()?)
    }

    /// Loads one project aggregate.
    ///
    /// # Errors
    /// - `ProjectNotFound(project_id)` when no row matches.
    pub fn fetch_project_by_id(&self, project_id: ProjectId) -> ServiceResult<Project> {
        self.repo
            .fetch_project_by_id(project_id)?
            .ok_or(ProjectServiceError::ProjectNotFound(project_id))
    }

    /// Replaces all mutable fields of a persisted project.
    ///
    /// # Errors
    /// - `MissingProjectId` when `project.project_id` is `None`.
    /// - `ProjectNotFound` when the update affected zero rows.
    pub fn modify_project_details(&self, project: &Project) -> ServiceResult<()> {
        let project_id = project
            .project_id
            .ok_or(ProjectServiceError::MissingProjectId)?;

        if !self.repo.modify_project_details(project)? {
            return Err(ProjectServiceError::ProjectNotFound(project_id));
        }

        Ok(())
    }

    /// Deletes one project together with its child rows.
    ///
    /// # Errors
    /// - `ProjectNotFound` when no row matched.
    pub fn delete_project(&self, project_id: ProjectId) -> ServiceResult<()> {
        if !self.repo.delete_project(project_id)? {
            return Err(ProjectServiceError::ProjectNotFound(project_id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectService, ProjectServiceError};
    use crate::model::project::{Project, ProjectId};
    use crate::repo::project_repo::{ProjectRepository, RepoError, RepoResult};
    use std::cell::RefCell;

    /// Repository double that records calls and returns canned outcomes.
    #[derive(Default)]
    struct StubRepository {
        stored: Option<Project>,
        write_outcome: bool,
        updates: RefCell<Vec<Project>>,
    }

    impl ProjectRepository for StubRepository {
        fn insert_project(&self, project: &Project) -> RepoResult<Project> {
            let mut created = project.clone();
            created.project_id = Some(7);
            Ok(created)
        }

        fn fetch_all_projects(&self) -> RepoResult<Vec<Project>> {
            Ok(self.stored.iter().cloned().collect())
        }

        fn fetch_project_by_id(&self, _project_id: ProjectId) -> RepoResult<Option<Project>> {
            Ok(self.stored.clone())
        }

        fn modify_project_details(&self, project: &Project) -> RepoResult<bool> {
            self.updates.borrow_mut().push(project.clone());
            Ok(self.write_outcome)
        }

        fn delete_project(&self, _project_id: ProjectId) -> RepoResult<bool> {
            if self.stored.is_none() && self.write_outcome {
                return Err(RepoError::InvalidData("inconsistent stub".to_string()));
            }
            Ok(self.write_outcome)
        }
    }

    #[test]
    fn fetch_missing_project_maps_to_not_found() {
        let service = ProjectService::new(StubRepository::default());

        let err = service.fetch_project_by_id(42).unwrap_err();
        assert!(matches!(err, ProjectServiceError::ProjectNotFound(42)));
        assert_eq!(err.to_string(), "Project with project ID=42 does not exist.");
    }

    #[test]
    fn zero_row_update_maps_to_not_found() {
        let service = ProjectService::new(StubRepository::default());
        let mut project = Project::new("Deck", 3);
        project.project_id = Some(9);

        let err = service.modify_project_details(&project).unwrap_err();
        assert!(matches!(err, ProjectServiceError::ProjectNotFound(9)));
    }

    #[test]
    fn update_without_identifier_never_reaches_repository() {
        let service = ProjectService::new(StubRepository {
            write_outcome: true,
            ..StubRepository::default()
        });

        let err = service
            .modify_project_details(&Project::new("Deck", 3))
            .unwrap_err();
        assert!(matches!(err, ProjectServiceError::MissingProjectId));
        assert!(service.repo.updates.borrow().is_empty());
    }

    #[test]
    fn successful_delete_and_add_pass_through() {
        let mut stored = Project::new("Shed", 2);
        stored.project_id = Some(7);
        let service = ProjectService::new(StubRepository {
            stored: Some(stored),
            write_outcome: true,
            ..StubRepository::default()
        });

        service.delete_project(7).unwrap();
        let created = service.add_project(&Project::new("Fence", 1)).unwrap();
        assert_eq!(created.project_id, Some(7));
        assert_eq!(service.fetch_all_projects().unwrap().len(), 1);
    }

    #[test]
    fn repository_errors_keep_their_source() {
        let service = ProjectService::new(StubRepository {
            write_outcome: true,
            ..StubRepository::default()
        });

        let err = service.delete_project(1).unwrap_err();
        assert!(matches!(err, ProjectServiceError::Repo(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
