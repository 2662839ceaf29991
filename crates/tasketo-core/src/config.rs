//! Engine configuration: the zone wall-clock
//! times are read in, plus the default
//! calendar and language for hosts that have
//! not loaded a settings record yet.

use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::Context;
use serde::Deserialize;
use tracing::{
  debug,
  info,
  warn
};

use crate::calendar::{
  CalendarEngine,
  CalendarSystem,
  Language,
  Zone
};

const CONFIG_FILE: &str = "tasketo.toml";
const CONFIG_DIR: &str = "tasketo";
pub const CONFIG_ENV_VAR: &str =
  "TASKETO_CONFIG";
pub const TIMEZONE_ENV_VAR: &str =
  "TASKETO_TIMEZONE";
pub const CALENDAR_ENV_VAR: &str =
  "TASKETO_CALENDAR";
pub const LANGUAGE_ENV_VAR: &str =
  "TASKETO_LANGUAGE";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
  timezone: Option<String>,
  calendar: Option<String>,
  language: Option<String>,
  time:     Option<TimeSection>
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TimeSection {
  timezone: Option<String>,
  calendar: Option<String>
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
  pub zone:     Zone,
  pub calendar: CalendarSystem,
  pub language: Language
}

impl EngineConfig {
  /// Resolves from the environment, then the
  /// config file, then defaults. Bad entries
  /// are logged and skipped; an unreadable or
  /// malformed file, or an explicit path that
  /// does not exist, is an error.
  #[tracing::instrument(skip(
    path_override
  ))]
  pub fn load(
    path_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Self::default();

    if let Some(path) =
      resolve_config_path(path_override)
    {
      if path.exists() {
        cfg.apply_file(&path)?;
      } else if path_override.is_some() {
        anyhow::bail!(
          "config file {} does not exist",
          path.display()
        );
      } else {
        debug!(file = %path.display(), "no config file; using defaults");
      }
    }

    cfg.apply_env();
    info!(
      zone = %cfg.zone,
      calendar = %cfg.calendar,
      language = ?cfg.language,
      "resolved engine config"
    );
    Ok(cfg)
  }

  #[must_use]
  pub fn engine(&self) -> CalendarEngine {
    CalendarEngine::new(self.zone)
  }

  #[tracing::instrument(skip(self))]
  fn apply_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let raw = fs::read_to_string(path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    let parsed: ConfigFile =
      toml::from_str(&raw).with_context(
        || {
          format!(
            "failed to parse {}",
            path.display()
          )
        }
      )?;

    let source =
      format!("file:{}", path.display());
    let (section_zone, section_calendar) =
      parsed
        .time
        .map(|t| (t.timezone, t.calendar))
        .unwrap_or_default();

    if let Some(raw) =
      parsed.timezone.or(section_zone)
    {
      self.set_zone(&raw, &source);
    }
    if let Some(raw) =
      parsed.calendar.or(section_calendar)
    {
      self.set_calendar(&raw, &source);
    }
    if let Some(raw) = parsed.language {
      self.set_language(&raw, &source);
    }
    Ok(())
  }

  fn apply_env(&mut self) {
    if let Ok(raw) =
      std::env::var(TIMEZONE_ENV_VAR)
    {
      self.set_zone(&raw, TIMEZONE_ENV_VAR);
    }
    if let Ok(raw) =
      std::env::var(CALENDAR_ENV_VAR)
    {
      self.set_calendar(
        &raw,
        CALENDAR_ENV_VAR
      );
    }
    if let Ok(raw) =
      std::env::var(LANGUAGE_ENV_VAR)
    {
      self.set_language(
        &raw,
        LANGUAGE_ENV_VAR
      );
    }
  }

  fn set_zone(
    &mut self,
    raw: &str,
    source: &str
  ) {
    match raw.parse::<Zone>() {
      | Ok(zone) => {
        info!(source, zone = %zone, "configured time zone");
        self.zone = zone;
      }
      | Err(err) => {
        warn!(source, value = raw, error = %err, "ignoring time zone");
      }
    }
  }

  fn set_calendar(
    &mut self,
    raw: &str,
    source: &str
  ) {
    match raw.parse::<CalendarSystem>() {
      | Ok(calendar) => {
        self.calendar = calendar;
      }
      | Err(err) => {
        warn!(source, value = raw, error = %err, "ignoring calendar");
      }
    }
  }

  fn set_language(
    &mut self,
    raw: &str,
    source: &str
  ) {
    match raw.parse::<Language>() {
      | Ok(language) => {
        self.language = language;
      }
      | Err(err) => {
        warn!(source, value = raw, error = %err, "ignoring language");
      }
    }
  }
}

fn resolve_config_path(
  path_override: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = path_override {
    return Some(path.to_path_buf());
  }

  if let Ok(raw) =
    std::env::var(CONFIG_ENV_VAR)
  {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
      return Some(PathBuf::from(trimmed));
    }
  }

  dirs::config_dir().map(|dir| {
    dir.join(CONFIG_DIR).join(CONFIG_FILE)
  })
}
