use std::fmt;
use std::str::FromStr;

use chrono::{
  FixedOffset,
  LocalResult,
  NaiveDateTime,
  Offset,
  TimeZone,
  Utc
};
use chrono_tz::Tz;
use regex::Regex;

use super::CanonicalTimestamp;
use crate::error::{
  CoreError,
  CoreResult
};

/// The zone in which wall-clock times are
/// read and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
  Fixed(FixedOffset),
  Named(Tz)
}

impl Default for Zone {
  fn default() -> Self {
    Self::utc()
  }
}

impl Zone {
  #[must_use]
  pub fn utc() -> Self {
    Self::Fixed(Utc.fix())
  }

  pub fn from_offset_seconds(
    seconds: i32
  ) -> CoreResult<Self> {
    offset_from_seconds(seconds)
      .map(Self::Fixed)
  }

  /// Offset in effect at the instant.
  #[must_use]
  pub fn offset_at(
    &self,
    ts: CanonicalTimestamp
  ) -> FixedOffset {
    match self {
      | Self::Fixed(offset) => *offset,
      | Self::Named(tz) => {
        tz.offset_from_utc_datetime(
          &ts.naive_utc()
        )
        .fix()
      }
    }
  }

  /// Maps a wall-clock time in this zone onto
  /// the canonical timeline. Ambiguous times
  /// (clocks turned back) resolve to the
  /// earlier instant; skipped times fail.
  pub fn resolve_local(
    &self,
    local: NaiveDateTime
  ) -> CoreResult<CanonicalTimestamp> {
    match self {
      | Self::Fixed(offset) => {
        super::to_canonical(
          local, *offset
        )
      }
      | Self::Named(tz) => {
        match tz
          .from_local_datetime(&local)
        {
          | LocalResult::Single(dt) => {
            Ok(dt.with_timezone(&Utc))
          }
          | LocalResult::Ambiguous(
            first,
            second
          ) => {
            tracing::warn!(
              zone = %tz,
              first = %first,
              second = %second,
              "ambiguous local datetime; using earliest"
            );
            let chosen =
              if first <= second {
                first
              } else {
                second
              };
            Ok(chosen.with_timezone(&Utc))
          }
          | LocalResult::None => {
            Err(CoreError::date(format!(
              "{local} does not exist in \
               {tz}"
            )))
          }
        }
      }
    }
  }
}

impl fmt::Display for Zone {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | Self::Fixed(offset) => {
        write!(f, "{offset}")
      }
      | Self::Named(tz) => {
        write!(f, "{}", tz.name())
      }
    }
  }
}

impl FromStr for Zone {
  type Err = CoreError;

  /// Accepts IANA identifiers
  /// (`Asia/Tehran`) and fixed offsets
  /// (`+03:30`, `UTC-5`, `Z`).
  fn from_str(
    raw: &str
  ) -> Result<Self, Self::Err> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return Err(CoreError::validation(
        "time zone is empty"
      ));
    }

    if trimmed.eq_ignore_ascii_case("z")
      || trimmed
        .eq_ignore_ascii_case("utc")
    {
      return Ok(Self::utc());
    }

    let offset_re = Regex::new(
      r"^(?i:utc|gmt)?\s*(?P<sign>[+-])(?P<hours>\d{1,2})(?::?(?P<minutes>\d{2}))?$",
    )
    .map_err(|e| {
      CoreError::validation(format!(
        "internal regex compile \
         failure: {e}"
      ))
    })?;

    if let Some(caps) =
      offset_re.captures(trimmed)
    {
      let hours: i32 = caps
        .name("hours")
        .map_or("0", |m| m.as_str())
        .parse()
        .map_err(|_| {
          CoreError::validation(format!(
            "invalid offset hours: \
             {trimmed}"
          ))
        })?;
      let minutes: i32 = caps
        .name("minutes")
        .map_or("0", |m| m.as_str())
        .parse()
        .map_err(|_| {
          CoreError::validation(format!(
            "invalid offset minutes: \
             {trimmed}"
          ))
        })?;
      if hours > 14 || minutes > 59 {
        return Err(
          CoreError::validation(format!(
            "offset out of range: \
             {trimmed}"
          ))
        );
      }
      let sign = if caps
        .name("sign")
        .is_some_and(|m| m.as_str() == "-")
      {
        -1
      } else {
        1
      };
      return Self::from_offset_seconds(
        sign * (hours * 3600 + minutes * 60)
      );
    }

    trimmed
      .parse::<Tz>()
      .map(Self::Named)
      .map_err(|err| {
        CoreError::validation(format!(
          "unknown time zone \
           {trimmed}: {err}"
        ))
      })
  }
}

/// Validates a raw offset; chrono rejects
/// anything a full day or more from UTC.
pub fn offset_from_seconds(
  seconds: i32
) -> CoreResult<FixedOffset> {
  FixedOffset::east_opt(seconds)
    .ok_or_else(|| {
      CoreError::validation(format!(
        "utc offset of {seconds}s is out \
         of range"
      ))
    })
}
