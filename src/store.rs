use crate::task::{Status, Task};
use chrono::Utc;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot access task file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Task not found: {0}")]
    TaskNotFound(String),
    #[error("Task description must not be empty")]
    EmptyDescription,
}

impl Error {
    /// Storage errors are fatal; not-found and validation problems are
    /// reported and the process carries on with a clean exit.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Json(_))
    }
}

/// Persistence layer for the task list.
///
/// The store holds no tasks in memory between calls; each operation reads the
/// whole file, mutates the list, and writes the whole file back.
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the backing file with an empty task list if it is absent.
    /// Does nothing when the file already exists.
    pub fn init(&self) -> Result<(), Error> {
        if !self.path.exists() {
            debug!("Creating task file at {}", self.path.display());
            self.save(&[])?;
        }
        Ok(())
    }

    pub fn load(&self) -> Result<Vec<Task>, Error> {
        let contents = fs::read_to_string(&self.path)?;
        let tasks: Vec<Task> = serde_json::from_str(&contents)?;
        debug!("Loaded {} tasks from {}", tasks.len(), self.path.display());
        Ok(tasks)
    }

    /// Overwrites the file with the full task list, pretty-printed.
    pub fn save(&self, tasks: &[Task]) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(tasks)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Appends a new task with a fresh unique id and `todo` status.
    pub fn add(&self, description: &str) -> Result<Task, Error> {
        if description.trim().is_empty() {
            return Err(Error::EmptyDescription);
        }
        let mut tasks = self.load()?;
        let now = Utc::now();
        let task = Task {
            id: generate_id(&tasks),
            description: description.to_string(),
            status: Status::Todo,
            created_at: now,
            updated_at: now,
        };
        tasks.push(task.clone());
        self.save(&tasks)?;
        debug!("Added task {}", task.id);
        Ok(task)
    }

    /// Replaces the description of the task with the given id.
    pub fn update_description(&self, id: &str, description: &str) -> Result<Task, Error> {
        let mut tasks = self.load()?;
        let task = find_task_mut(&mut tasks, id)?;
        task.description = description.to_string();
        task.updated_at = Utc::now();
        let updated = task.clone();
        self.save(&tasks)?;
        Ok(updated)
    }

    /// Moves the task with the given id to `status`. Transitions are
    /// unconstrained, so `done` may move back to `todo`.
    pub fn set_status(&self, id: &str, status: Status) -> Result<Task, Error> {
        let mut tasks = self.load()?;
        let task = find_task_mut(&mut tasks, id)?;
        task.status = status;
        task.updated_at = Utc::now();
        let updated = task.clone();
        self.save(&tasks)?;
        Ok(updated)
    }

    /// Removes the task with the given id permanently. The file is not
    /// rewritten when the id does not exist.
    pub fn delete(&self, id: &str) -> Result<(), Error> {
        let mut tasks = self.load()?;
        let index = tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        tasks.remove(index);
        self.save(&tasks)?;
        debug!("Deleted task {id}");
        Ok(())
    }

    /// Returns tasks in insertion order, optionally only those with the
    /// given status.
    pub fn list(&self, filter: Option<Status>) -> Result<Vec<Task>, Error> {
        let tasks = self.load()?;
        Ok(match filter {
            Some(status) => tasks
                .into_iter()
                .filter(|task| task.status == status)
                .collect(),
            None => tasks,
        })
    }
}

fn find_task_mut<'a>(tasks: &'a mut [Task], id: &str) -> Result<&'a mut Task, Error> {
    tasks
        .iter_mut()
        .find(|task| task.id == id)
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))
}

/// Millisecond timestamp plus a random hex suffix. The suffix keeps ids
/// distinct when several tasks are created within the same millisecond;
/// regenerate if the result is somehow already taken.
fn generate_id(tasks: &[Task]) -> String {
    loop {
        let id = format!(
            "{}{:04x}",
            Utc::now().timestamp_millis(),
            rand::random::<u16>()
        );
        if !tasks.iter().any(|task| task.id == id) {
            return id;
        }
    }
}
