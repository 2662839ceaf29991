//! Core of the tasketo tracker: a dual-calendar date engine and a
//! search/filter/sort pipeline over task records.

pub mod calendar;
pub mod config;
pub mod error;
pub mod query;
pub mod settings;
pub mod task;

pub use calendar::{
  CalendarDate,
  CalendarEngine,
  CalendarSystem,
  CanonicalTimestamp,
  FormatStyle,
  Language,
  Zone
};
pub use error::{
  CoreError,
  CoreResult
};
pub use query::{
  Query,
  SortKey,
  TaskFilter
};
pub use settings::AppSettings;
pub use task::{
  Priority,
  Status,
  Subtask,
  Task,
  TaskEdit
};
