//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/list/aggregate-fetch/update/delete over `project`.
//! - Keep SQL details and row mapping inside the persistence boundary.
//!
//! # Invariants
//! - Every call runs inside exactly one `Gateway` transaction.
//! - List reads return summary rows; only `fetch_project_by_id` fills
//!   materials, steps and categories.
//! - Update/delete report the affected-row outcome as `bool` instead of
//!   raising; translating zero rows is the service's job.

use crate::db::{DbError, Gateway};
use crate::model::decimal::Decimal;
use crate::model::project::{Category, Material, Project, ProjectId, Step};
use log::{debug, info};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PROJECT_SELECT_SQL: &str = "SELECT
    project_id,
    project_name,
    estimated_hours,
    actual_hours,
    difficulty,
    notes
FROM project";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for project persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Store failure: connectivity, constraint violation, bad SQL.
    Db(DbError),
    /// Persisted data or caller input that cannot be mapped.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid project data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for project CRUD operations.
pub trait ProjectRepository {
    /// Persists a new project and returns it with the assigned identifier.
    fn insert_project(&self, project: &Project) -> RepoResult<Project>;
    /// Lists summary rows ordered by `project_name` ascending.
    fn fetch_all_projects(&self) -> RepoResult<Vec<Project>>;
    /// Loads one project with its materials, steps and categories.
    fn fetch_project_by_id(&self, project_id: ProjectId) -> RepoResult<Option<Project>>;
    /// Replaces all mutable fields; returns whether exactly one row changed.
    fn modify_project_details(&self, project: &Project) -> RepoResult<bool>;
    /// Deletes one project (children cascade); returns whether it existed.
    fn delete_project(&self, project_id: ProjectId) -> RepoResult<bool>;
}

/// SQLite-backed project repository.
#[derive(Debug, Clone)]
pub struct SqliteProjectRepository {
    gateway: Gateway,
}

impl SqliteProjectRepository {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }
}

impl ProjectRepository for SqliteProjectRepository {
    fn insert_project(&self, project: &Project) -> RepoResult<Project> {
        let project_id = self.gateway.with_transaction("project_insert", |tx| {
            tx.execute(
                "INSERT INTO project (
                    project_name,
                    estimated_hours,
                    actual_hours,
                    difficulty,
                    notes
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    project.project_name.as_str(),
                    project.estimated_hours.map(decimal_to_db),
                    project.actual_hours.map(decimal_to_db),
                    project.difficulty,
                    project.notes.as_deref(),
                ],
            )?;
            Ok::<_, RepoError>(tx.last_insert_rowid())
        })?;

        info!("event=project_insert module=repo status=ok project_id={project_id}");

        let mut created = project.summary();
        created.project_id = Some(project_id);
        Ok(created)
    }

    fn fetch_all_projects(&self) -> RepoResult<Vec<Project>> {
        let projects = self.gateway.with_transaction("project_list", |tx| {
            let mut stmt =
                tx.prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY project_name ASC;"))?;
            let mut rows = stmt.query([])?;
            let mut projects = Vec::new();
            while let Some(row) = rows.next()? {
                projects.push(parse_project_row(row)?);
            }
            Ok::<_, RepoError>(projects)
        })?;

        debug!(
            "event=project_list module=repo status=ok count={}",
            projects.len()
        );
        Ok(projects)
    }

    fn fetch_project_by_id(&self, project_id: ProjectId) -> RepoResult<Option<Project>> {
        self.gateway
            .with_transaction("project_get", |tx| -> RepoResult<Option<Project>> {
                let mut stmt =
                    tx.prepare(&format!("{PROJECT_SELECT_SQL} WHERE project_id = ?1;"))?;
                let mut rows = stmt.query([project_id])?;
                let Some(row) = rows.next()? else {
                    return Ok(None);
                };
                let mut project = parse_project_row(row)?;

                // Children are read in the same transaction as the parent row.
                project.materials = load_materials(tx, project_id)?;
                project.steps = load_steps(tx, project_id)?;
                project.categories = load_categories(tx, project_id)?;
                Ok(Some(project))
            })
    }

    fn modify_project_details(&self, project: &Project) -> RepoResult<bool> {
        let project_id = project.project_id.ok_or_else(|| {
            RepoError::InvalidData("cannot update a project without project_id".to_string())
        })?;

        let changed = self.gateway.with_transaction("project_update", |tx| {
            let changed = tx.execute(
                "UPDATE project
                 SET
                    project_name = ?1,
                    estimated_hours = ?2,
                    actual_hours = ?3,
                    difficulty = ?4,
                    notes = ?5
                 WHERE project_id = ?6;",
                params![
                    project.project_name.as_str(),
                    project.estimated_hours.map(decimal_to_db),
                    project.actual_hours.map(decimal_to_db),
                    project.difficulty,
                    project.notes.as_deref(),
                    project_id,
                ],
            )?;
            Ok::<_, RepoError>(changed)
        })?;

        info!(
            "event=project_update module=repo status=ok project_id={project_id} changed={changed}"
        );
        Ok(changed == 1)
    }

    fn delete_project(&self, project_id: ProjectId) -> RepoResult<bool> {
        let changed = self.gateway.with_transaction("project_delete", |tx| {
            let changed = tx.execute("DELETE FROM project WHERE project_id = ?1;", [project_id])?;
            Ok::<_, RepoError>(changed)
        })?;

        info!(
            "event=project_delete module=repo status=ok project_id={project_id} changed={changed}"
        );
        Ok(changed == 1)
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    Ok(Project {
        project_id: Some(row.get("project_id")?),
        project_name: row.get("project_name")?,
        estimated_hours: parse_decimal_column(row, "estimated_hours")?,
        actual_hours: parse_decimal_column(row, "actual_hours")?,
        difficulty: row.get("difficulty")?,
        notes: row.get("notes")?,
        materials: Vec::new(),
        steps: Vec::new(),
        categories: Vec::new(),
    })
}

fn load_materials(conn: &Connection, project_id: ProjectId) -> RepoResult<Vec<Material>> {
    let mut stmt = conn.prepare(
        "SELECT
            material_id,
            project_id,
            material_name,
            num_required,
            cost
         FROM material
         WHERE project_id = ?1
         ORDER BY material_id ASC;",
    )?;
    let mut rows = stmt.query([project_id])?;
    let mut materials = Vec::new();
    while let Some(row) = rows.next()? {
        materials.push(Material {
            material_id: row.get("material_id")?,
            project_id: row.get("project_id")?,
            material_name: row.get("material_name")?,
            num_required: row.get("num_required")?,
            cost: parse_decimal_column(row, "cost")?,
        });
    }
    Ok(materials)
}

fn load_steps(conn: &Connection, project_id: ProjectId) -> RepoResult<Vec<Step>> {
    let mut stmt = conn.prepare(
        "SELECT
            step_id,
            project_id,
            step_text,
            step_order
         FROM step
         WHERE project_id = ?1
         ORDER BY step_order ASC, step_id ASC;",
    )?;
    let mut rows = stmt.query([project_id])?;
    let mut steps = Vec::new();
    while let Some(row) = rows.next()? {
        steps.push(Step {
            step_id: row.get("step_id")?,
            project_id: row.get("project_id")?,
            step_text: row.get("step_text")?,
            step_order: row.get("step_order")?,
        });
    }
    Ok(steps)
}

fn load_categories(conn: &Connection, project_id: ProjectId) -> RepoResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT c.category_id, c.category_name
         FROM category c
         INNER JOIN project_category pc ON pc.category_id = c.category_id
         WHERE pc.project_id = ?1
         ORDER BY c.category_name ASC;",
    )?;
    let mut rows = stmt.query([project_id])?;
    let mut categories = Vec::new();
    while let Some(row) = rows.next()? {
        categories.push(Category {
            category_id: row.get("category_id")?,
            category_name: row.get("category_name")?,
        });
    }
    Ok(categories)
}

fn decimal_to_db(value: Decimal) -> String {
    value.to_string()
}

// DECIMAL columns have NUMERIC affinity, so SQLite may hand back INTEGER,
// REAL or TEXT for the same logical value.
fn parse_decimal_column(row: &Row<'_>, column: &str) -> RepoResult<Option<Decimal>> {
    let invalid = |shown: String| {
        RepoError::InvalidData(format!("invalid decimal value `{shown}` in {column}"))
    };

    match row.get_ref(column)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(whole) => Decimal::from_whole(whole)
            .map(Some)
            .ok_or_else(|| invalid(whole.to_string())),
        ValueRef::Real(value) => Decimal::from_f64(value)
            .map(Some)
            .ok_or_else(|| invalid(value.to_string())),
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            text.parse::<Decimal>()
                .map(Some)
                .map_err(|_| invalid(text.into_owned()))
        }
        ValueRef::Blob(_) => Err(invalid("<blob>".to_string())),
    }
}
