//! Interactive menu over the project service.
//!
//! # Responsibility
//! - Render the numbered menu, read a selection and dispatch it.
//! - Report every failure from inner layers without leaving the loop.
//! - Implement the update-with-defaults edit flow.
//!
//! # Invariants
//! - The selected project is explicit state: each operation receives the
//!   current selection and returns the next one.
//! - A select attempt clears the selection before the lookup.
//! - Deleting the selected project's identifier clears the selection first.
//! - Only a blank menu entry (or end of input) ends the loop.

use crate::console::Console;
use log::{info, warn};
use projects_core::{Decimal, Project, ProjectRepository, ProjectService, ProjectServiceError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{BufRead, Write};

const OPERATIONS: [&str; 5] = [
    "1) Add a project",
    "2) List projects",
    "3) Select a project",
    "4) Update project details",
    "5) Delete a project",
];

pub type ShellResult<T> = Result<T, ShellError>;

/// Shell-level failure.
#[derive(Debug)]
pub enum ShellError {
    /// Not-found or store failure from the service layer.
    Service(ProjectServiceError),
    /// Terminal read/write failure.
    Io(std::io::Error),
    /// Input stream reached end of file.
    InputClosed,
}

impl Display for ShellError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "terminal i/o failed: {err}"),
            Self::InputClosed => write!(f, "input closed"),
        }
    }
}

impl Error for ShellError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::InputClosed => None,
        }
    }
}

impl From<ProjectServiceError> for ShellError {
    fn from(value: ProjectServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<std::io::Error> for ShellError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Next selection plus the outcome of the operation that produced it.
type Transition = (Option<Project>, ShellResult<()>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Exit,
    Add,
    List,
    Select,
    Update,
    Delete,
    Unknown(i64),
}

impl MenuAction {
    fn from_selection(selection: Option<i64>) -> Self {
        match selection {
            None => Self::Exit,
            Some(1) => Self::Add,
            Some(2) => Self::List,
            Some(3) => Self::Select,
            Some(4) => Self::Update,
            Some(5) => Self::Delete,
            Some(other) => Self::Unknown(other),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::Add => "add",
            Self::List => "list",
            Self::Select => "select",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Field-by-field answers collected by the update flow.
///
/// `None` means the user left the prompt blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectEdits {
    pub project_name: Option<String>,
    pub estimated_hours: Option<Decimal>,
    pub actual_hours: Option<Decimal>,
    pub difficulty: Option<i32>,
    pub notes: Option<String>,
}

impl ProjectEdits {
    /// Builds the replacement record: blank answers keep the current value,
    /// any answer (even an identical one) replaces it.
    pub fn apply_to(&self, current: &Project) -> Project {
        Project {
            project_id: current.project_id,
            project_name: self
                .project_name
                .clone()
                .unwrap_or_else(|| current.project_name.clone()),
            estimated_hours: self.estimated_hours.or(current.estimated_hours),
            actual_hours: self.actual_hours.or(current.actual_hours),
            difficulty: self.difficulty.or(current.difficulty),
            notes: self.notes.clone().or_else(|| current.notes.clone()),
            ..current.clone()
        }
    }
}

pub struct Shell<R: ProjectRepository, I, O> {
    service: ProjectService<R>,
    console: Console<I, O>,
}

impl<R: ProjectRepository, I: BufRead, O: Write> Shell<R, I, O> {
    pub fn new(service: ProjectService<R>, console: Console<I, O>) -> Self {
        Self { service, console }
    }

    #[cfg(test)]
    pub fn into_output(self) -> O {
        self.console.into_output()
    }

    /// Runs the menu loop until the user exits.
    ///
    /// # Errors
    /// - Only terminal I/O failures end the loop with an error.
    pub fn run(&mut self) -> ShellResult<()> {
        let mut selection: Option<Project> = None;

        loop {
            let action = match self.read_menu_action() {
                Ok(action) => action,
                Err(ShellError::InputClosed) => MenuAction::Exit,
                Err(err) => return Err(err),
            };

            if action == MenuAction::Exit {
                self.console.say("Exiting menu.")?;
                return Ok(());
            }

            let (next, outcome) = self.dispatch(action, selection);
            selection = next;

            match outcome {
                Ok(()) => {}
                Err(ShellError::InputClosed) => {
                    self.console.say("\nExiting menu.")?;
                    return Ok(());
                }
                Err(ShellError::Io(err)) => return Err(ShellError::Io(err)),
                Err(err) => {
                    warn!(
                        "event=shell_action module=shell action={} status=error error_kind={}",
                        action.label(),
                        error_kind(&err)
                    );
                    self.console.say(format!("\nError: {err} Try again."))?;
                }
            }
        }
    }

    fn read_menu_action(&mut self) -> ShellResult<MenuAction> {
        self.console
            .say("\nThese are the available selections. Press the Enter key to quit:")?;
        for operation in OPERATIONS {
            self.console.say(format!("\t{operation}"))?;
        }

        let selection = self.console.read_int("Enter a menu selection")?;
        Ok(MenuAction::from_selection(selection))
    }

    fn dispatch(&mut self, action: MenuAction, selection: Option<Project>) -> Transition {
        match action {
            MenuAction::Add => (selection, self.create_project()),
            MenuAction::List => (selection, self.list_projects()),
            MenuAction::Select => self.select_project(),
            MenuAction::Update => self.update_project_details(selection),
            MenuAction::Delete => self.delete_project(selection),
            MenuAction::Unknown(value) => {
                let outcome = self
                    .console
                    .say(format!("\n{value} is not a valid selection. Try again."));
                (selection, outcome)
            }
            MenuAction::Exit => (selection, Ok(())),
        }
    }

    fn create_project(&mut self) -> ShellResult<()> {
        let project_name = self.console.read_required_text("Enter the project name")?;
        let estimated_hours = self.console.read_decimal("Enter the estimated hours")?;
        let actual_hours = self.console.read_decimal("Enter the actual hours")?;
        let difficulty = self
            .console
            .read_difficulty("Enter the project difficulty (1-5)")?;
        let notes = self.console.read_text("Enter the project notes")?;

        let mut project = Project::new(project_name, difficulty);
        project.estimated_hours = estimated_hours;
        project.actual_hours = actual_hours;
        project.notes = notes;

        let created = self.service.add_project(&project)?;
        info!("event=shell_action module=shell action=add status=ok");
        self.console.say(format!(
            "You have successfully created project: {}",
            ProjectView(&created)
        ))
    }

    fn list_projects(&mut self) -> ShellResult<()> {
        let projects = self.service.fetch_all_projects()?;

        self.console.say("\nProjects:")?;
        for project in &projects {
            let project_id = project
                .project_id
                .map_or_else(|| "?".to_string(), |id| id.to_string());
            self.console
                .say(format!("   {project_id}: {}", project.project_name))?;
        }
        Ok(())
    }

    fn select_project(&mut self) -> Transition {
        match self.try_select_project() {
            Ok(selected) => (selected, Ok(())),
            Err(err) => (None, Err(err)),
        }
    }

    fn try_select_project(&mut self) -> ShellResult<Option<Project>> {
        self.list_projects()?;
        let Some(project_id) = self
            .console
            .read_int("Enter a project ID to select a project")?
        else {
            self.console.say("\nYou are not working on a project.")?;
            return Ok(None);
        };

        let project = self.service.fetch_project_by_id(project_id)?;
        self.console.say(format!(
            "\nYou are working with project: {}",
            ProjectView(&project)
        ))?;
        Ok(Some(project))
    }

    fn update_project_details(&mut self, selection: Option<Project>) -> Transition {
        let Some(current) = selection else {
            return (None, self.console.say("\nPlease select a project."));
        };

        match self.try_update_project(&current) {
            Ok(updated) => (Some(updated), Ok(())),
            // The selected row no longer exists.
            Err(err @ ShellError::Service(ProjectServiceError::ProjectNotFound(_))) => {
                (None, Err(err))
            }
            Err(err) => (Some(current), Err(err)),
        }
    }

    fn try_update_project(&mut self, current: &Project) -> ShellResult<Project> {
        let project_id = current
            .project_id
            .ok_or(ProjectServiceError::MissingProjectId)?;

        let edits = ProjectEdits {
            project_name: self.console.read_text(&format!(
                "Enter the project name [{}]",
                current.project_name
            ))?,
            estimated_hours: self.console.read_decimal(&format!(
                "Enter the estimated hours [{}]",
                OptionalField(current.estimated_hours.as_ref())
            ))?,
            actual_hours: self.console.read_decimal(&format!(
                "Enter the actual hours [{}]",
                OptionalField(current.actual_hours.as_ref())
            ))?,
            difficulty: self.console.read_difficulty_or_blank(&format!(
                "Enter the project difficulty (1-5) [{}]",
                OptionalField(current.difficulty.as_ref())
            ))?,
            notes: self.console.read_text(&format!(
                "Enter the project notes [{}]",
                OptionalField(current.notes.as_ref())
            ))?,
        };

        self.service
            .modify_project_details(&edits.apply_to(current))?;
        info!("event=shell_action module=shell action=update status=ok project_id={project_id}");

        // Re-read so the selection reflects what the store now holds.
        let refreshed = self.service.fetch_project_by_id(project_id)?;
        self.console.say(format!(
            "\nYou are working with project: {}",
            ProjectView(&refreshed)
        ))?;
        Ok(refreshed)
    }

    fn delete_project(&mut self, selection: Option<Project>) -> Transition {
        if let Err(err) = self.list_projects() {
            return (selection, Err(err));
        }

        let project_id = match self.console.read_int("Enter ID of project to be deleted") {
            Ok(Some(project_id)) => project_id,
            Ok(None) => return (selection, self.console.say("\nNo project was deleted.")),
            Err(err) => return (selection, Err(err)),
        };

        let selection = selection.filter(|project| project.project_id != Some(project_id));
        let outcome = self
            .service
            .delete_project(project_id)
            .map_err(ShellError::from)
            .and_then(|()| {
                info!("event=shell_action module=shell action=delete status=ok project_id={project_id}");
                self.console
                    .say(format!("Project {project_id} was deleted successfully."))
            });
        (selection, outcome)
    }
}

fn error_kind(err: &ShellError) -> &'static str {
    match err {
        ShellError::Service(ProjectServiceError::ProjectNotFound(_)) => "not_found",
        ShellError::Service(ProjectServiceError::MissingProjectId) => "missing_id",
        ShellError::Service(ProjectServiceError::Repo(_)) => "store",
        ShellError::Io(_) => "io",
        ShellError::InputClosed => "input_closed",
    }
}

struct OptionalField<'a, T>(Option<&'a T>);

impl<T: Display> Display for OptionalField<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value}"),
            None => Ok(()),
        }
    }
}

/// Multi-line rendering of a project aggregate.
struct ProjectView<'a>(&'a Project);

impl Display for ProjectView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let project = self.0;
        writeln!(f)?;
        if let Some(project_id) = project.project_id {
            writeln!(f, "   ID={project_id}")?;
        }
        writeln!(f, "   name={}", project.project_name)?;
        writeln!(
            f,
            "   estimated hours={}",
            OptionalField(project.estimated_hours.as_ref())
        )?;
        writeln!(
            f,
            "   actual hours={}",
            OptionalField(project.actual_hours.as_ref())
        )?;
        writeln!(
            f,
            "   difficulty={}",
            OptionalField(project.difficulty.as_ref())
        )?;
        write!(f, "   notes={}", OptionalField(project.notes.as_ref()))?;

        if !project.materials.is_empty() {
            write!(f, "\n   Materials:")?;
            for material in &project.materials {
                write!(
                    f,
                    "\n      {} (required={}, cost={})",
                    material.material_name,
                    OptionalField(material.num_required.as_ref()),
                    OptionalField(material.cost.as_ref())
                )?;
            }
        }
        if !project.steps.is_empty() {
            write!(f, "\n   Steps:")?;
            for step in &project.steps {
                write!(f, "\n      {}. {}", step.step_order, step.step_text)?;
            }
        }
        if !project.categories.is_empty() {
            write!(f, "\n   Categories:")?;
            for category in &project.categories {
                write!(f, "\n      {}", category.category_name)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectEdits, Shell, ShellError};
    use crate::console::Console;
    use projects_core::{
        Decimal, Gateway, Project, ProjectService, ProjectServiceError, SqliteProjectRepository,
    };
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        gateway: Gateway,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let gateway = Gateway::new(dir.path().join("projects.db"));
            Self { _dir: dir, gateway }
        }

        fn service(&self) -> ProjectService<SqliteProjectRepository> {
            ProjectService::new(SqliteProjectRepository::new(self.gateway.clone()))
        }

        /// Runs one scripted session and returns everything the shell printed.
        fn run(&self, script: &str) -> String {
            self.run_bytes(script.as_bytes())
        }

        fn run_bytes(&self, script: &[u8]) -> String {
            let console = Console::new(script, Vec::new());
            let mut shell = Shell::new(self.service(), console);
            shell.run().unwrap();
            String::from_utf8(shell.into_output()).unwrap()
        }

        fn seed(&self, project: &Project) -> Project {
            self.service().add_project(project).unwrap()
        }
    }

    fn hours(text: &str) -> Option<Decimal> {
        Some(text.parse().unwrap())
    }

    fn deck() -> Project {
        let mut project = Project::new("Deck", 3);
        project.estimated_hours = hours("12.50");
        project.actual_hours = hours("10");
        project.notes = Some("cedar boards".to_string());
        project
    }

    #[test]
    fn blank_edits_keep_every_previous_value() {
        let mut current = deck();
        current.project_id = Some(1);

        assert_eq!(ProjectEdits::default().apply_to(&current), current);
    }

    #[test]
    fn non_blank_edits_replace_even_when_identical() {
        let mut current = deck();
        current.project_id = Some(1);
        let edits = ProjectEdits {
            project_name: Some("Deck".to_string()),
            difficulty: Some(5),
            notes: Some("weatherproof".to_string()),
            ..ProjectEdits::default()
        };

        let updated = edits.apply_to(&current);
        assert_eq!(updated.project_id, Some(1));
        assert_eq!(updated.project_name, "Deck");
        assert_eq!(updated.difficulty, Some(5));
        assert_eq!(updated.notes.as_deref(), Some("weatherproof"));
        assert_eq!(updated.estimated_hours, current.estimated_hours);
    }

    #[test]
    fn blank_menu_entry_exits() {
        let output = Fixture::new().run("\n");

        assert!(output.contains("1) Add a project"));
        assert!(output.contains("5) Delete a project"));
        assert!(output.trim_end().ends_with("Exiting menu."));
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let output = Fixture::new().run("");
        assert!(output.contains("Exiting menu."));
    }

    #[test]
    fn unknown_and_non_numeric_selections_keep_the_loop_running() {
        let output = Fixture::new().run("9\nabc\n\n");

        assert!(output.contains("9 is not a valid selection. Try again."));
        assert!(output.contains("abc is not a valid number"));
        assert_eq!(output.matches("These are the available selections").count(), 2);
    }

    #[test]
    fn add_reprompts_difficulty_then_lists_project() {
        let fixture = Fixture::new();
        let output = fixture.run("1\nDeck\n12.5\n\n0\n6\n3\nnotes here\n2\n\n");

        assert_eq!(output.matches("is not a value between 1 and 5").count(), 2);
        assert!(output.contains("You have successfully created project:"));

        let stored = fixture.service().fetch_all_projects().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].difficulty, Some(3));
        assert_eq!(stored[0].estimated_hours, hours("12.50"));
        assert_eq!(stored[0].actual_hours, None);
        assert_eq!(stored[0].notes.as_deref(), Some("notes here"));

        let project_id = stored[0].project_id.unwrap();
        assert!(output.contains(&format!("   {project_id}: Deck")));
    }

    #[test]
    fn list_is_sorted_by_name() {
        let fixture = Fixture::new();
        fixture.seed(&Project::new("Zeta", 1));
        fixture.seed(&Project::new("Alpha", 1));

        let output = fixture.run("2\n\n");
        let alpha = output.find(": Alpha").unwrap();
        let zeta = output.find(": Zeta").unwrap();
        assert!(alpha < zeta);
    }

    #[test]
    fn update_with_blank_fields_changes_only_notes() {
        let fixture = Fixture::new();
        let original = fixture.seed(&deck());
        let project_id = original.project_id.unwrap();

        let script = format!("3\n{project_id}\n4\n\n\n\n\nweatherproof\n\n");
        let output = fixture.run(&script);

        assert!(output.contains("Enter the project name [Deck]"));
        assert!(output.contains("Enter the estimated hours [12.50]"));
        assert!(output.contains("Enter the project difficulty (1-5) [3]"));

        let stored = fixture.service().fetch_project_by_id(project_id).unwrap();
        let expected = Project {
            notes: Some("weatherproof".to_string()),
            ..original
        };
        assert_eq!(stored, expected);
    }

    #[test]
    fn update_reprompts_out_of_range_difficulty() {
        let fixture = Fixture::new();
        let project_id = fixture.seed(&deck()).project_id.unwrap();

        let script = format!("3\n{project_id}\n4\n\n\n\n9\n1\n\n\n");
        let output = fixture.run(&script);

        assert!(output.contains("Error, 9 is not a value between 1 and 5, inclusive."));
        let stored = fixture.service().fetch_project_by_id(project_id).unwrap();
        assert_eq!(stored.difficulty, Some(1));
    }

    #[test]
    fn update_without_selection_asks_to_select() {
        let output = Fixture::new().run("4\n\n");
        assert!(output.contains("Please select a project."));
    }

    #[test]
    fn failed_select_clears_previous_selection() {
        let fixture = Fixture::new();
        let project_id = fixture.seed(&deck()).project_id.unwrap();

        let script = format!("3\n{project_id}\n3\n999\n4\n\n");
        let output = fixture.run(&script);

        assert!(output.contains("You are working with project:"));
        assert!(output.contains("Error: Project with project ID=999 does not exist. Try again."));
        assert!(output.contains("Please select a project."));
    }

    #[test]
    fn select_shows_child_collections() {
        let fixture = Fixture::new();
        let project_id = fixture.seed(&deck()).project_id.unwrap();
        let conn = projects_core::db::open_db(fixture.gateway.path()).unwrap();
        conn.execute(
            "INSERT INTO step (project_id, step_text, step_order) VALUES (?1, 'Sand edges', 1);",
            [project_id],
        )
        .unwrap();

        let output = fixture.run(&format!("3\n{project_id}\n\n"));
        assert!(output.contains("Steps:"));
        assert!(output.contains("1. Sand edges"));
    }

    #[test]
    fn deleting_selected_project_clears_selection() {
        let fixture = Fixture::new();
        let project_id = fixture.seed(&deck()).project_id.unwrap();

        let script = format!("3\n{project_id}\n5\n{project_id}\n4\n\n");
        let output = fixture.run(&script);

        assert!(output.contains(&format!("Project {project_id} was deleted successfully.")));
        assert!(output.contains("Please select a project."));
        assert!(fixture.service().fetch_all_projects().unwrap().is_empty());
    }

    #[test]
    fn deleting_other_project_keeps_selection() {
        let fixture = Fixture::new();
        let kept = fixture.seed(&deck()).project_id.unwrap();
        let removed = fixture.seed(&Project::new("Shed", 2)).project_id.unwrap();

        let script = format!("3\n{kept}\n5\n{removed}\n4\n\n\n\n\n\n\n");
        let output = fixture.run(&script);

        assert!(!output.contains("Please select a project."));
        assert!(output.contains("Enter the project name [Deck]"));
    }

    #[test]
    fn deleting_unknown_project_reports_and_continues() {
        let output = Fixture::new().run("5\n41\n2\n\n");

        assert!(output.contains("Error: Project with project ID=41 does not exist. Try again."));
        assert!(output.trim_end().ends_with("Exiting menu."));
    }

    #[test]
    fn non_utf8_line_is_reported_and_loop_continues() {
        let fixture = Fixture::new();
        fixture.seed(&deck());

        let output = fixture.run_bytes(b"\xff\xfe\n2\n\n");

        assert!(output.contains("Input is not valid UTF-8 text."));
        assert!(output.contains(": Deck"));
        assert!(output.trim_end().ends_with("Exiting menu."));
    }

    #[test]
    fn blank_update_keeps_missing_difficulty() {
        let fixture = Fixture::new();
        let project_id = fixture.seed(&deck()).project_id.unwrap();
        let conn = projects_core::db::open_db(fixture.gateway.path()).unwrap();
        conn.execute(
            "UPDATE project SET difficulty = NULL WHERE project_id = ?1;",
            [project_id],
        )
        .unwrap();

        let script = format!("3\n{project_id}\n4\n\n\n\n\n\n\n");
        let output = fixture.run(&script);

        assert!(output.contains("Enter the project difficulty (1-5) []"));
        let stored = fixture.service().fetch_project_by_id(project_id).unwrap();
        assert_eq!(stored.difficulty, None);
        assert_eq!(stored.project_name, "Deck");
    }

    #[test]
    fn update_of_vanished_project_clears_selection() {
        let fixture = Fixture::new();
        let console = Console::new(&b"\n\n\n\n\n"[..], Vec::new());
        let mut shell = Shell::new(fixture.service(), console);
        let stale = Project {
            project_id: Some(999),
            ..deck()
        };

        let (selection, outcome) = shell.update_project_details(Some(stale));

        assert_eq!(selection, None);
        assert!(matches!(
            outcome,
            Err(ShellError::Service(ProjectServiceError::ProjectNotFound(999)))
        ));
    }
}
