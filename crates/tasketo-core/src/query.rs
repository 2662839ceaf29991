//! Search -> filter -> sort over a task
//! collection. Every call is a pure function
//! of its inputs and only ever borrows the
//! tasks.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use tracing::{
  debug,
  trace
};

use crate::calendar::{
  CalendarEngine,
  CalendarSystem,
  CanonicalTimestamp
};
use crate::error::CoreError;
use crate::task::{
  Status,
  Task
};

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
)]
pub enum TaskFilter {
  #[default]
  All,
  Pending,
  InProgress,
  Completed,
  Overdue,
  Today,
  Upcoming
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
)]
pub enum SortKey {
  /// Ascending; tasks without a due date
  /// last.
  #[default]
  DueDate,
  /// Urgent first.
  Priority,
  /// Ordinal, case-sensitive: `"Zebra"`
  /// sorts before `"apple"`.
  Title,
  /// Newest first.
  CreatedDate,
  /// Pending, in progress, completed,
  /// cancelled.
  Status
}

#[derive(Debug, Clone, Default)]
pub struct Query {
  pub search:   String,
  pub filter:   TaskFilter,
  pub sort:     SortKey,
  /// Calendar whose day boundaries decide
  /// the date buckets.
  pub calendar: CalendarSystem
}

impl Query {
  #[tracing::instrument(skip(
    self, tasks, engine, now
  ), fields(
    search = %self.search,
    filter = %self.filter,
    sort = %self.sort,
    calendar = %self.calendar
  ))]
  pub fn run<'a>(
    &self,
    tasks: &'a [Task],
    engine: &CalendarEngine,
    now: CanonicalTimestamp
  ) -> Vec<&'a Task> {
    let needle = normalize_search(
      &self.search
    );

    let mut out: Vec<&Task> = tasks
      .iter()
      .filter(|task| {
        needle.as_deref().is_none_or(
          |needle| {
            matches_search(task, needle)
          }
        )
      })
      .filter(|task| {
        self.filter.matches(
          task,
          self.calendar,
          engine,
          now
        )
      })
      .collect();

    // `sort_by` is stable, which keeps ties
    // in input order.
    out.sort_by(|a, b| {
      self.sort.compare(a, b)
    });

    debug!(
      input = tasks.len(),
      output = out.len(),
      "query evaluated"
    );
    out
  }
}

impl TaskFilter {
  pub const ALL: [Self; 7] = [
    Self::All,
    Self::Pending,
    Self::InProgress,
    Self::Completed,
    Self::Overdue,
    Self::Today,
    Self::Upcoming
  ];

  pub fn matches(
    &self,
    task: &Task,
    calendar: CalendarSystem,
    engine: &CalendarEngine,
    now: CanonicalTimestamp
  ) -> bool {
    let ok = match self {
      | Self::All => true,
      | Self::Pending => {
        task.status == Status::Pending
      }
      | Self::InProgress => {
        task.status == Status::InProgress
      }
      | Self::Completed => {
        task.status == Status::Completed
      }
      | Self::Overdue => {
        task.status != Status::Completed
          && task.due.is_some_and(|due| {
            engine.is_overdue(
              due, calendar, now
            )
          })
      }
      | Self::Today => {
        task.due.is_some_and(|due| {
          engine.is_today(
            due, calendar, now
          )
        })
      }
      | Self::Upcoming => {
        task.status != Status::Completed
          && task.due.is_some_and(|due| {
            engine.is_upcoming(
              due, calendar, now
            )
          })
      }
    };

    trace!(filter = %self, id = %task.id, ok, "filter predicate evaluation");
    ok
  }
}

impl SortKey {
  pub const ALL: [Self; 5] = [
    Self::DueDate,
    Self::Priority,
    Self::Title,
    Self::CreatedDate,
    Self::Status
  ];

  #[must_use]
  pub fn compare(
    &self,
    a: &Task,
    b: &Task
  ) -> Ordering {
    match self {
      | Self::DueDate => {
        match (a.due, b.due) {
          | (Some(x), Some(y)) => x.cmp(&y),
          | (Some(_), None) => {
            Ordering::Less
          }
          | (None, Some(_)) => {
            Ordering::Greater
          }
          | (None, None) => {
            Ordering::Equal
          }
        }
      }
      | Self::Priority => {
        b.priority.cmp(&a.priority)
      }
      | Self::Title => a.title.cmp(&b.title),
      | Self::CreatedDate => {
        b.created_at.cmp(&a.created_at)
      }
      | Self::Status => {
        a.status.cmp(&b.status)
      }
    }
  }
}

/// Kanban columns in status order. Search
/// applies; each column keeps input order.
#[tracing::instrument(skip(tasks))]
pub fn group_by_status<'a>(
  tasks: &'a [Task],
  search: &str
) -> Vec<(Status, Vec<&'a Task>)> {
  let needle = normalize_search(search);
  Status::ALL
    .into_iter()
    .map(|status| {
      let column = tasks
        .iter()
        .filter(|task| task.status == status)
        .filter(|task| {
          needle.as_deref().is_none_or(
            |needle| {
              matches_search(task, needle)
            }
          )
        })
        .collect();
      (status, column)
    })
    .collect()
}

/// Lower-cased needle, or `None` when the
/// search box is blank.
fn normalize_search(
  raw: &str
) -> Option<String> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    None
  } else {
    Some(trimmed.to_lowercase())
  }
}

fn matches_search(
  task: &Task,
  needle: &str
) -> bool {
  let hit = |text: &str| {
    text.to_lowercase().contains(needle)
  };

  hit(&task.title)
    || task
      .description
      .as_deref()
      .is_some_and(hit)
    || task.tags.iter().any(|tag| hit(tag))
}

impl fmt::Display for TaskFilter {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(match self {
      | Self::All => "all",
      | Self::Pending => "pending",
      | Self::InProgress => "in-progress",
      | Self::Completed => "completed",
      | Self::Overdue => "overdue",
      | Self::Today => "today",
      | Self::Upcoming => "upcoming"
    })
  }
}

impl FromStr for TaskFilter {
  type Err = CoreError;

  fn from_str(
    raw: &str
  ) -> Result<Self, Self::Err> {
    let lower =
      raw.trim().to_ascii_lowercase();
    Self::ALL
      .into_iter()
      .find(|f| f.to_string() == lower)
      .ok_or_else(|| {
        CoreError::Validation(format!(
          "unknown filter: {raw}"
        ))
      })
  }
}

impl fmt::Display for SortKey {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(match self {
      | Self::DueDate => "due",
      | Self::Priority => "priority",
      | Self::Title => "title",
      | Self::CreatedDate => "created",
      | Self::Status => "status"
    })
  }
}

impl FromStr for SortKey {
  type Err = CoreError;

  fn from_str(
    raw: &str
  ) -> Result<Self, Self::Err> {
    let lower =
      raw.trim().to_ascii_lowercase();
    Self::ALL
      .into_iter()
      .find(|k| k.to_string() == lower)
      .ok_or_else(|| {
        CoreError::Validation(format!(
          "unknown sort key: {raw}"
        ))
      })
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    Duration,
    TimeZone,
    Utc
  };

  use super::{
    Query,
    SortKey,
    TaskFilter,
    group_by_status
  };
  use crate::calendar::{
    CalendarEngine,
    CalendarSystem
  };
  use crate::task::{
    Priority,
    Status,
    Task
  };

  fn now() -> chrono::DateTime<Utc> {
    Utc
      .with_ymd_and_hms(
        2026, 10, 18, 12, 0, 0
      )
      .single()
      .expect("valid now")
  }

  fn task(title: &str) -> Task {
    Task::new(title, now())
      .expect("create task")
  }

  fn titles(
    tasks: &[&Task]
  ) -> Vec<String> {
    tasks
      .iter()
      .map(|t| t.title.clone())
      .collect()
  }

  #[test]
  fn search_hits_title_description_and_tags()
  {
    let by_title = task("Quarterly Report");
    let mut by_desc = task("Errand");
    by_desc.description =
      Some("pick up the REPORT".to_string());
    let mut by_tag = task("Other");
    by_tag.tags = vec!["Reports".to_string()];
    let miss = task("Unrelated");
    let tasks =
      vec![by_title, by_desc, by_tag, miss];

    let query = Query {
      search: "  report ".to_string(),
      ..Query::default()
    };
    let out = query.run(
      &tasks,
      &CalendarEngine::default(),
      now()
    );
    assert_eq!(
      titles(&out),
      vec![
        "Quarterly Report",
        "Errand",
        "Other"
      ]
    );
  }

  #[test]
  fn blank_search_keeps_everything() {
    let tasks =
      vec![task("a"), task("b")];
    let query = Query {
      search: "   ".to_string(),
      ..Query::default()
    };
    assert_eq!(
      query
        .run(
          &tasks,
          &CalendarEngine::default(),
          now()
        )
        .len(),
      2
    );
  }

  #[test]
  fn status_filters_select_exact_status() {
    let mut started = task("started");
    started.status = Status::InProgress;
    let mut cancelled = task("cancelled");
    cancelled.status = Status::Cancelled;
    let tasks =
      vec![task("fresh"), started, cancelled];
    let engine = CalendarEngine::default();

    let run = |filter| {
      titles(
        &Query {
          filter,
          ..Query::default()
        }
        .run(&tasks, &engine, now())
      )
    };
    assert_eq!(
      run(TaskFilter::Pending),
      vec!["fresh"]
    );
    assert_eq!(
      run(TaskFilter::InProgress),
      vec!["started"]
    );
    assert!(
      run(TaskFilter::Completed).is_empty()
    );
    assert_eq!(run(TaskFilter::All).len(), 3);
  }

  #[test]
  fn today_filter_ignores_status() {
    let mut done_today = task("done today");
    done_today.due =
      Some(now() + Duration::hours(2));
    done_today.status = Status::Completed;
    let mut tomorrow = task("tomorrow");
    tomorrow.due =
      Some(now() + Duration::days(1));
    let tasks = vec![done_today, tomorrow];

    let out = Query {
      filter: TaskFilter::Today,
      calendar: CalendarSystem::SolarHijri,
      ..Query::default()
    }
    .run(
      &tasks,
      &CalendarEngine::default(),
      now()
    );
    assert_eq!(titles(&out), vec!["done today"]);
  }

  #[test]
  fn priority_sort_is_descending_and_stable()
  {
    let mut low = task("low");
    low.priority = Priority::Low;
    let mut urgent = task("urgent");
    urgent.priority = Priority::Urgent;
    let medium_a = task("medium a");
    let medium_b = task("medium b");
    let tasks =
      vec![medium_a, low, urgent, medium_b];

    let out = Query {
      sort: SortKey::Priority,
      ..Query::default()
    }
    .run(
      &tasks,
      &CalendarEngine::default(),
      now()
    );
    assert_eq!(
      titles(&out),
      vec![
        "urgent",
        "medium a",
        "medium b",
        "low"
      ]
    );
  }

  #[test]
  fn title_sort_is_case_sensitive() {
    let tasks = vec![
      task("apple"),
      task("Zebra"),
      task("banana")
    ];
    let out = Query {
      sort: SortKey::Title,
      ..Query::default()
    }
    .run(
      &tasks,
      &CalendarEngine::default(),
      now()
    );
    assert_eq!(
      titles(&out),
      vec!["Zebra", "apple", "banana"]
    );
  }

  #[test]
  fn created_and_status_sorts() {
    let mut old = task("old");
    old.created_at =
      now() - Duration::days(3);
    let mut done = task("done");
    done.status = Status::Completed;
    let mut cancelled = task("cancelled");
    cancelled.status = Status::Cancelled;
    let mut active = task("active");
    active.status = Status::InProgress;
    let tasks =
      vec![old, done, cancelled, active];
    let engine = CalendarEngine::default();

    let created = Query {
      sort: SortKey::CreatedDate,
      ..Query::default()
    }
    .run(&tasks, &engine, now());
    assert_eq!(
      created.last().map(|t| t.title.as_str()),
      Some("old")
    );

    let by_status = Query {
      sort: SortKey::Status,
      ..Query::default()
    }
    .run(&tasks, &engine, now());
    assert_eq!(
      titles(&by_status),
      vec![
        "old",
        "active",
        "done",
        "cancelled"
      ]
    );
  }

  #[test]
  fn kanban_columns_follow_status_order() {
    let mut started = task("started work");
    started.status = Status::InProgress;
    let tasks = vec![
      task("pending work"),
      started,
      task("pending chores")
    ];
    let columns =
      group_by_status(&tasks, "work");
    assert_eq!(columns.len(), 4);
    assert_eq!(columns[0].0, Status::Pending);
    assert_eq!(
      titles(&columns[0].1),
      vec!["pending work"]
    );
    assert_eq!(
      titles(&columns[1].1),
      vec!["started work"]
    );
    assert!(columns[3].1.is_empty());
  }

  #[test]
  fn selectors_parse_from_text() {
    assert_eq!(
      "Overdue"
        .parse::<TaskFilter>()
        .expect("filter"),
      TaskFilter::Overdue
    );
    assert_eq!(
      "in-progress"
        .parse::<TaskFilter>()
        .expect("filter"),
      TaskFilter::InProgress
    );
    assert_eq!(
      "created"
        .parse::<SortKey>()
        .expect("sort"),
      SortKey::CreatedDate
    );
    assert!("soon".parse::<SortKey>().is_err());
  }
}
