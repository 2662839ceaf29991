pub mod cli;
pub mod render;

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tasketo_core::Task;
use tasketo_core::Query;
use tasketo_core::config::EngineConfig;
use tasketo_core::query::group_by_status;
use tracing::{
  debug,
  info
};

use crate::cli::{
  Command,
  GlobalCli
};
use crate::render::Renderer;

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli = GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting tasketo CLI"
  );

  let mut cfg = EngineConfig::load(
    cli.config.as_deref()
  )?;
  if let Some(zone) = cli.zone {
    cfg.zone = zone;
  }
  if let Some(calendar) = cli.calendar {
    cfg.calendar = calendar;
  }
  if let Some(language) = cli.language {
    cfg.language = language;
  }
  debug!(?cfg, "applied command-line overrides");

  let engine = cfg.engine();
  let renderer = Renderer::new(
    engine,
    cfg.calendar,
    cfg.language
  );
  let now = Utc::now();
  let stdout = io::stdout();
  let out = stdout.lock();

  match cli.command {
    | Command::List {
      file,
      search,
      filter,
      sort
    } => {
      let tasks = load_snapshot(&file)?;
      let query = Query {
        search,
        filter,
        sort,
        calendar: cfg.calendar
      };
      let matched =
        query.run(&tasks, &engine, now);
      info!(
        total = tasks.len(),
        matched = matched.len(),
        "query complete"
      );
      renderer
        .write_task_table(out, &matched, now)?;
    }
    | Command::Board {
      file,
      search
    } => {
      let tasks = load_snapshot(&file)?;
      let columns =
        group_by_status(&tasks, &search);
      renderer.write_board(out, &columns)?;
    }
    | Command::Date {
      expr
    } => {
      let ts = engine
        .parse_input(&expr, cfg.calendar, now)
        .with_context(|| {
          format!(
            "failed to resolve date \
             expression {expr:?}"
          )
        })?;
      renderer.write_instant(out, ts, now)?;
    }
  }

  info!("done");
  Ok(())
}

/// Reads a JSON array of task records.
fn load_snapshot(
  path: &Path
) -> anyhow::Result<Vec<Task>> {
  let raw = fs::read_to_string(path)
    .with_context(|| {
      format!(
        "failed to read {}",
        path.display()
      )
    })?;
  let tasks: Vec<Task> =
    serde_json::from_str(&raw)
      .with_context(|| {
        format!(
          "failed to parse tasks in {}",
          path.display()
        )
      })?;
  debug!(
    file = %path.display(),
    count = tasks.len(),
    "loaded task snapshot"
  );
  Ok(tasks)
}
