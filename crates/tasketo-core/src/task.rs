use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::{CalendarEngine, CalendarSystem};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// Declaration order is the board/column order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl Status {
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Subtask {
    pub fn new(title: &str, now: DateTime<Utc>) -> CoreResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            title: required_title(title)?,
            completed: false,
            created_at: now,
            completed_at: None,
        })
    }

    /// Flips the flag; the completion date moves with it.
    pub fn toggle(&mut self, now: DateTime<Utc>) -> bool {
        self.completed = !self.completed;
        self.completed_at = self.completed.then_some(now);
        self.completed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub status: Status,

    #[serde(default)]
    pub due: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    /// Calendar the due date is shown under.
    #[serde(default)]
    pub calendar: CalendarSystem,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub recurrence: Option<Recurrence>,

    #[serde(default)]
    pub subtasks: Vec<Subtask>,

    #[serde(default)]
    pub attachments: Vec<String>,

    #[serde(default)]
    pub notes: String,
}

/// A multi-field edit. `None` leaves the field alone; for optional fields
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub due: Option<Option<DateTime<Utc>>>,
    pub calendar: Option<CalendarSystem>,
    pub tags: Option<Vec<String>>,
    pub recurrence: Option<Option<Recurrence>>,
    pub attachments: Option<Vec<String>>,
    pub notes: Option<String>,
}

impl Task {
    pub fn new(title: &str, now: DateTime<Utc>) -> CoreResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            title: required_title(title)?,
            description: None,
            priority: Priority::default(),
            status: Status::default(),
            due: None,
            created_at: now,
            completed_at: None,
            calendar: CalendarSystem::default(),
            tags: vec![],
            recurrence: None,
            subtasks: vec![],
            attachments: vec![],
            notes: String::new(),
        })
    }

    /// Applies every field of `edit` or none of them.
    #[tracing::instrument(skip(self, edit, now), fields(id = %self.id))]
    pub fn apply_edit(&mut self, edit: TaskEdit, now: DateTime<Utc>) -> CoreResult<()> {
        let title = edit.title.as_deref().map(required_title).transpose()?;
        let tags = edit.tags.map(|tags| normalize_tags(&tags)).transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = edit.description {
            self.description = description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty());
        }
        if let Some(priority) = edit.priority {
            self.priority = priority;
        }
        if let Some(due) = edit.due {
            self.due = due;
        }
        if let Some(calendar) = edit.calendar {
            self.calendar = calendar;
        }
        if let Some(tags) = tags {
            self.tags = tags;
        }
        if let Some(recurrence) = edit.recurrence {
            self.recurrence = recurrence;
        }
        if let Some(attachments) = edit.attachments {
            self.attachments = attachments;
        }
        if let Some(notes) = edit.notes {
            self.notes = notes.trim().to_string();
        }
        if let Some(status) = edit.status {
            self.set_status(status, now);
        }
        Ok(())
    }

    /// Entering `Completed` stamps the completion date; leaving it clears it.
    pub fn set_status(&mut self, status: Status, now: DateTime<Utc>) {
        if status == self.status {
            return;
        }
        self.completed_at = (status == Status::Completed).then_some(now);
        self.status = status;
    }

    /// Returns false when the tag was already present.
    pub fn add_tag(&mut self, tag: &str) -> CoreResult<bool> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(CoreError::validation("tag cannot be empty"));
        }
        if self.tags.iter().any(|t| t == tag) {
            return Ok(false);
        }
        self.tags.push(tag.to_string());
        Ok(true)
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag.trim());
        self.tags.len() != before
    }

    pub fn add_subtask(&mut self, title: &str, now: DateTime<Utc>) -> CoreResult<Uuid> {
        let subtask = Subtask::new(title, now)?;
        let id = subtask.id;
        self.subtasks.push(subtask);
        Ok(id)
    }

    /// Returns the new completion flag.
    #[tracing::instrument(skip(self, now), fields(task = %self.id))]
    pub fn toggle_subtask(&mut self, id: Uuid, now: DateTime<Utc>) -> CoreResult<bool> {
        let subtask = self
            .subtasks
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(CoreError::NotFound { kind: "subtask", id })?;
        Ok(subtask.toggle(now))
    }

    pub fn remove_subtask(&mut self, id: Uuid) -> CoreResult<Subtask> {
        let idx = self
            .subtasks
            .iter()
            .position(|s| s.id == id)
            .ok_or(CoreError::NotFound { kind: "subtask", id })?;
        Ok(self.subtasks.remove(idx))
    }

    /// `(completed, total)`
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.completed).count();
        (done, self.subtasks.len())
    }

    /// Next occurrence of a recurring task, stepped under the task's own
    /// calendar so "monthly" follows that calendar's month lengths.
    pub fn next_due(&self, engine: &CalendarEngine) -> Option<CoreResult<DateTime<Utc>>> {
        let due = self.due?;
        let recurrence = self.recurrence?;
        let next = match recurrence {
            Recurrence::Daily => due
                .checked_add_signed(chrono::Duration::days(1))
                .ok_or_else(|| CoreError::date("daily recurrence overflowed")),
            Recurrence::Weekly => due
                .checked_add_signed(chrono::Duration::weeks(1))
                .ok_or_else(|| CoreError::date("weekly recurrence overflowed")),
            Recurrence::Monthly => engine.add_months(due, 1, self.calendar),
            Recurrence::Yearly => engine.add_months(due, 12, self.calendar),
        };
        Some(next)
    }
}

pub fn find_task(tasks: &[Task], id: Uuid) -> CoreResult<&Task> {
    tasks
        .iter()
        .find(|t| t.id == id)
        .ok_or(CoreError::NotFound { kind: "task", id })
}

pub fn find_task_mut(tasks: &mut [Task], id: Uuid) -> CoreResult<&mut Task> {
    tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(CoreError::NotFound { kind: "task", id })
}

/// Removes the task together with the subtasks it owns. The collection is
/// untouched when the id is absent.
#[tracing::instrument(skip(tasks))]
pub fn delete_task(tasks: &mut Vec<Task>, id: Uuid) -> CoreResult<Task> {
    let idx = tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or(CoreError::NotFound { kind: "task", id })?;
    let task = tasks.remove(idx);
    tracing::debug!(subtasks = task.subtasks.len(), "deleted task");
    Ok(task)
}

fn required_title(raw: &str) -> CoreResult<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(CoreError::validation("title cannot be empty"));
    }
    Ok(title.to_string())
}

fn normalize_tags(tags: &[String]) -> CoreResult<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(CoreError::validation("tag cannot be empty"));
        }
        if !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    Ok(out)
}
