use chrono::Duration;
use regex::Regex;

use super::{
  CalendarDate,
  CalendarEngine,
  CalendarSystem,
  CanonicalTimestamp,
  names
};
use crate::error::{
  CoreError,
  CoreResult
};

impl CalendarEngine {
  /// Reads a user-entered date expression.
  ///
  /// Absolute dates are read in `calendar`
  /// and in the engine's zone. Persian and
  /// Arabic-Indic digits are accepted.
  #[tracing::instrument(skip(self, now), fields(input = input))]
  pub fn parse_input(
    &self,
    input: &str,
    calendar: CalendarSystem,
    now: CanonicalTimestamp
  ) -> CoreResult<CanonicalTimestamp> {
    let token =
      names::to_ascii_digits(input.trim());
    let lower = token.to_ascii_lowercase();

    match lower.as_str() {
      | "now" => return Ok(now),
      | "today" => {
        return self.start_of_day(now, 0);
      }
      | "tomorrow" => {
        return self.start_of_day(now, 1);
      }
      | "yesterday" => {
        return self.start_of_day(now, -1);
      }
      | _ => {}
    }

    let rel_re = Regex::new(
      r"^(?P<sign>[+-])(?P<num>\d+)(?P<unit>[dhm])$"
    )
    .map_err(|e| {
      CoreError::validation(format!(
        "internal regex compile \
         failure: {e}"
      ))
    })?;

    if let Some(caps) =
      rel_re.captures(&lower)
    {
      let num: i64 = caps["num"]
        .parse()
        .map_err(|_| {
          CoreError::validation(format!(
            "invalid relative amount: \
             {token}"
          ))
        })?;
      let duration = match &caps["unit"] {
        | "d" => Duration::try_days(num),
        | "h" => Duration::try_hours(num),
        | _ => Duration::try_minutes(num)
      }
      .ok_or_else(|| {
        CoreError::validation(format!(
          "relative amount too large: \
           {token}"
        ))
      })?;
      let shifted = if &caps["sign"] == "-"
      {
        now.checked_sub_signed(duration)
      } else {
        now.checked_add_signed(duration)
      };
      return shifted.ok_or_else(|| {
        CoreError::date(format!(
          "{token} leaves the \
           representable range"
        ))
      });
    }

    let date_re = Regex::new(
      r"^(?P<year>-?\d{1,4})[-/](?P<month>\d{1,2})[-/](?P<day>\d{1,2})(?:[ T](?P<hour>\d{1,2}):(?P<minute>\d{2}))?$",
    )
    .map_err(|e| {
      CoreError::validation(format!(
        "internal regex compile \
         failure: {e}"
      ))
    })?;

    let Some(caps) =
      date_re.captures(&token)
    else {
      return Err(CoreError::validation(
        format!(
          "unrecognized date expression: \
           {input} (supported: now, \
           today, tomorrow, yesterday, \
           +Nd/+Nh/+Nm, YYYY-MM-DD, \
           YYYY/MM/DD, optionally \
           followed by HH:MM)"
        )
      ));
    };

    let field = |name: &str| -> CoreResult<u32> {
      caps
        .name(name)
        .map_or(Ok(0), |m| m.as_str().parse())
        .map_err(|_| {
          CoreError::validation(format!(
            "invalid {name} in {token}"
          ))
        })
    };
    let year: i32 = caps["year"]
      .parse()
      .map_err(|_| {
        CoreError::validation(format!(
          "invalid year in {token}"
        ))
      })?;

    self.create_canonical(
      CalendarDate {
        year,
        month: field("month")?,
        day: field("day")?
      },
      field("hour")?,
      field("minute")?,
      0,
      calendar
    )
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    TimeZone,
    Utc
  };

  use crate::calendar::{
    CalendarEngine,
    CalendarSystem,
    Zone
  };

  fn engine() -> CalendarEngine {
    CalendarEngine::new(
      "+03:30"
        .parse::<Zone>()
        .expect("zone")
    )
  }

  #[test]
  fn parses_keywords_at_local_midnight() {
    let now = Utc
      .with_ymd_and_hms(
        2026, 10, 18, 21, 0, 0
      )
      .single()
      .expect("valid now");
    let parsed = engine()
      .parse_input(
        "tomorrow",
        CalendarSystem::Gregorian,
        now
      )
      .expect("parse tomorrow");
    // Local now is already Oct 19 00:30, so
    // tomorrow is Oct 20 local midnight.
    assert_eq!(
      parsed,
      Utc
        .with_ymd_and_hms(
          2026, 10, 19, 20, 30, 0
        )
        .single()
        .expect("utc")
    );
  }

  #[test]
  fn parses_solar_hijri_with_persian_digits()
  {
    let now = Utc::now();
    let parsed = engine()
      .parse_input(
        "۱۴۰۳/۰۱/۰۱ ۰۹:۳۰",
        CalendarSystem::SolarHijri,
        now
      )
      .expect("parse jalali");
    assert_eq!(
      parsed,
      Utc
        .with_ymd_and_hms(
          2024, 3, 20, 6, 0, 0
        )
        .single()
        .expect("utc")
    );
  }

  #[test]
  fn parses_relative_offsets() {
    let now = Utc
      .with_ymd_and_hms(
        2026, 10, 18, 12, 0, 0
      )
      .single()
      .expect("valid now");
    let parsed = engine()
      .parse_input(
        "-2h",
        CalendarSystem::Gregorian,
        now
      )
      .expect("parse relative");
    assert_eq!(
      parsed,
      Utc
        .with_ymd_and_hms(
          2026, 10, 18, 10, 0, 0
        )
        .single()
        .expect("utc")
    );
  }

  #[test]
  fn rejects_garbage_and_bad_components() {
    let now = Utc::now();
    let engine = engine();
    assert!(
      engine
        .parse_input(
          "next blue moon",
          CalendarSystem::Gregorian,
          now
        )
        .is_err()
    );
    assert!(
      engine
        .parse_input(
          "1404/12/30",
          CalendarSystem::SolarHijri,
          now
        )
        .is_err()
    );
  }
}
