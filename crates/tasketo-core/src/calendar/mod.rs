//! Dual-calendar date engine.
//!
//! Every instant lives on one canonical (UTC) timeline. Display and
//! day-granularity comparisons first shift the instant into the
//! configured zone, then project the local Gregorian date onto the
//! requested calendar through its [`CalendarRules`] entry.

mod input;
pub mod jalali;
mod names;
mod zone;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{
  DateTime,
  Datelike,
  Days,
  FixedOffset,
  LocalResult,
  NaiveDate,
  NaiveDateTime,
  NaiveTime,
  TimeZone,
  Timelike,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};

pub use self::zone::{
  Zone,
  offset_from_seconds
};
use crate::error::{
  CoreError,
  CoreResult
};

/// An absolute instant; the only form in
/// which time is ever persisted.
pub type CanonicalTimestamp = DateTime<Utc>;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarSystem {
  #[default]
  Gregorian,
  SolarHijri
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  #[default]
  English,
  Persian
}

/// A (year, month, day) triple under some
/// calendar. Ordering is chronological as
/// long as both sides use the same calendar.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
pub struct CalendarDate {
  pub year:  i32,
  pub month: u32,
  pub day:   u32
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum FormatStyle {
  /// `March 20, 2024`
  Date,
  /// `March 20, 2024, 09:30`
  DateTime,
  /// `2024/03/20`
  Numeric
}

/// Per-calendar dispatch record: name tables
/// and the conversion pair anchored on the
/// proleptic Gregorian day.
pub struct CalendarRules {
  months:         [[&'static str; 12]; 2],
  weekdays:       [[&'static str; 7]; 2],
  from_gregorian:
    fn(NaiveDate) -> CoreResult<CalendarDate>,
  to_gregorian:
    fn(CalendarDate) -> CoreResult<NaiveDate>,
  month_length: fn(i32, u32) -> CoreResult<u32>
}

static GREGORIAN_RULES: CalendarRules =
  CalendarRules {
    months:         names::GREGORIAN_MONTHS,
    weekdays:       names::GREGORIAN_WEEKDAYS,
    from_gregorian: gregorian_from_naive,
    to_gregorian:   gregorian_to_naive,
    month_length:   gregorian_month_length
  };

static SOLAR_HIJRI_RULES: CalendarRules =
  CalendarRules {
    months:         names::SOLAR_HIJRI_MONTHS,
    weekdays:
      names::SOLAR_HIJRI_WEEKDAYS,
    from_gregorian: solar_hijri_from_naive,
    to_gregorian:   solar_hijri_to_naive,
    month_length:   jalali::month_length
  };

impl CalendarRules {
  pub fn from_gregorian(
    &self,
    date: NaiveDate
  ) -> CoreResult<CalendarDate> {
    (self.from_gregorian)(date)
  }

  pub fn to_gregorian(
    &self,
    date: CalendarDate
  ) -> CoreResult<NaiveDate> {
    (self.to_gregorian)(date)
  }

  pub fn month_length(
    &self,
    year: i32,
    month: u32
  ) -> CoreResult<u32> {
    (self.month_length)(year, month)
  }

  pub fn month_name(
    &self,
    month: u32,
    language: Language
  ) -> CoreResult<&'static str> {
    let idx = month
      .checked_sub(1)
      .filter(|idx| *idx < 12)
      .ok_or_else(|| {
        CoreError::date(format!(
          "month {month} is outside \
           1..=12"
        ))
      })?;
    Ok(
      self.months[language.table_index()]
        [idx as usize]
    )
  }

  pub fn weekday_name(
    &self,
    weekday: chrono::Weekday,
    language: Language
  ) -> &'static str {
    self.weekdays[language.table_index()]
      [weekday.num_days_from_monday()
        as usize]
  }
}

fn gregorian_from_naive(
  date: NaiveDate
) -> CoreResult<CalendarDate> {
  Ok(CalendarDate {
    year:  date.year(),
    month: date.month(),
    day:   date.day()
  })
}

fn gregorian_to_naive(
  date: CalendarDate
) -> CoreResult<NaiveDate> {
  let len = gregorian_month_length(
    date.year, date.month
  )?;
  if date.day == 0 || date.day > len {
    return Err(CoreError::date(format!(
      "day {} is outside 1..={len} for \
       {}-{:02}",
      date.day, date.year, date.month
    )));
  }
  NaiveDate::from_ymd_opt(
    date.year, date.month, date.day
  )
  .ok_or_else(|| {
    CoreError::date(format!(
      "{}-{:02}-{:02} is not \
       representable",
      date.year, date.month, date.day
    ))
  })
}

fn gregorian_month_length(
  year: i32,
  month: u32
) -> CoreResult<u32> {
  match month {
    | 1 | 3 | 5 | 7 | 8 | 10 | 12 => {
      Ok(31)
    }
    | 4 | 6 | 9 | 11 => Ok(30),
    | 2 => {
      if NaiveDate::from_ymd_opt(
        year, 2, 29
      )
      .is_some()
      {
        Ok(29)
      } else {
        Ok(28)
      }
    }
    | _ => {
      Err(CoreError::date(format!(
        "month {month} is outside \
         1..=12"
      )))
    }
  }
}

fn solar_hijri_from_naive(
  date: NaiveDate
) -> CoreResult<CalendarDate> {
  let (year, month, day) =
    jalali::from_gregorian(date)?;
  Ok(CalendarDate {
    year,
    month,
    day
  })
}

fn solar_hijri_to_naive(
  date: CalendarDate
) -> CoreResult<NaiveDate> {
  jalali::to_gregorian(
    date.year, date.month, date.day
  )
}

impl CalendarSystem {
  pub const ALL: [Self; 2] =
    [Self::Gregorian, Self::SolarHijri];

  #[must_use]
  pub fn rules(
    self
  ) -> &'static CalendarRules {
    match self {
      | Self::Gregorian => {
        &GREGORIAN_RULES
      }
      | Self::SolarHijri => {
        &SOLAR_HIJRI_RULES
      }
    }
  }

  #[must_use]
  pub fn display_name(
    self,
    language: Language
  ) -> &'static str {
    match (self, language) {
      | (
        Self::Gregorian,
        Language::English
      ) => "Gregorian",
      | (
        Self::Gregorian,
        Language::Persian
      ) => "میلادی",
      | (
        Self::SolarHijri,
        Language::English
      ) => "Shamsi",
      | (
        Self::SolarHijri,
        Language::Persian
      ) => "شمسی"
    }
  }
}

impl fmt::Display for CalendarSystem {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(match self {
      | Self::Gregorian => "gregorian",
      | Self::SolarHijri => "solar-hijri"
    })
  }
}

impl FromStr for CalendarSystem {
  type Err = CoreError;

  fn from_str(
    raw: &str
  ) -> Result<Self, Self::Err> {
    match raw
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "gregorian" | "g" => {
        Ok(Self::Gregorian)
      }
      | "solar-hijri" | "solarhijri"
      | "shamsi" | "jalali"
      | "persian" => Ok(Self::SolarHijri),
      | other => {
        Err(CoreError::validation(
          format!(
            "unknown calendar system: \
             {other}"
          )
        ))
      }
    }
  }
}

impl Language {
  pub const ALL: [Self; 2] =
    [Self::English, Self::Persian];

  fn table_index(self) -> usize {
    match self {
      | Self::English => 0,
      | Self::Persian => 1
    }
  }

  #[must_use]
  pub fn locale_tag(
    self
  ) -> &'static str {
    match self {
      | Self::English => "en",
      | Self::Persian => "fa"
    }
  }

  /// Persian is always laid out right to
  /// left.
  #[must_use]
  pub fn is_rtl(self) -> bool {
    matches!(self, Self::Persian)
  }

  #[must_use]
  pub fn display_name(
    self
  ) -> &'static str {
    match self {
      | Self::English => "English",
      | Self::Persian => "فارسی"
    }
  }

  fn localize_digits(
    self,
    text: String
  ) -> String {
    match self {
      | Self::English => text,
      | Self::Persian => {
        names::to_persian_digits(&text)
      }
    }
  }
}

impl FromStr for Language {
  type Err = CoreError;

  fn from_str(
    raw: &str
  ) -> Result<Self, Self::Err> {
    match raw
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "en" | "english" => {
        Ok(Self::English)
      }
      | "fa" | "persian" | "farsi" => {
        Ok(Self::Persian)
      }
      | other => {
        Err(CoreError::validation(
          format!(
            "unknown language: {other}"
          )
        ))
      }
    }
  }
}

impl fmt::Display for CalendarDate {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "{:04}/{:02}/{:02}",
      self.year, self.month, self.day
    )
  }
}

/// Normalizes a wall-clock time observed at
/// `offset` onto the canonical timeline.
pub fn to_canonical(
  local: NaiveDateTime,
  offset: FixedOffset
) -> CoreResult<CanonicalTimestamp> {
  match offset.from_local_datetime(&local)
  {
    | LocalResult::Single(dt) => {
      Ok(dt.with_timezone(&Utc))
    }
    | _ => {
      Err(CoreError::date(format!(
        "{local} at {offset} is outside \
         the representable range"
      )))
    }
  }
}

/// Inverse of [`to_canonical`].
#[must_use]
pub fn to_local(
  ts: CanonicalTimestamp,
  offset: FixedOffset
) -> NaiveDateTime {
  ts.with_timezone(&offset).naive_local()
}

pub fn days_in_month(
  year: i32,
  month: u32,
  calendar: CalendarSystem
) -> CoreResult<u32> {
  calendar.rules().month_length(year, month)
}

pub fn is_leap_year(
  year: i32,
  calendar: CalendarSystem
) -> CoreResult<bool> {
  match calendar {
    | CalendarSystem::Gregorian => {
      Ok(gregorian_month_length(year, 2)?
        == 29)
    }
    | CalendarSystem::SolarHijri => {
      jalali::is_leap_year(year)
    }
  }
}

/// Date engine bound to the zone in which
/// the user reads and enters wall-clock
/// times. "Now" is always supplied by the
/// caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarEngine {
  zone: Zone
}

impl CalendarEngine {
  #[must_use]
  pub fn new(zone: Zone) -> Self {
    Self {
      zone
    }
  }

  #[must_use]
  pub fn zone(&self) -> Zone {
    self.zone
  }

  #[must_use]
  pub fn local(
    &self,
    ts: CanonicalTimestamp
  ) -> NaiveDateTime {
    to_local(ts, self.zone.offset_at(ts))
  }

  pub fn calendar_day(
    &self,
    ts: CanonicalTimestamp,
    calendar: CalendarSystem
  ) -> CoreResult<CalendarDate> {
    calendar
      .rules()
      .from_gregorian(self.local(ts).date())
  }

  #[tracing::instrument(skip(self))]
  pub fn create_canonical(
    &self,
    date: CalendarDate,
    hour: u32,
    minute: u32,
    second: u32,
    calendar: CalendarSystem
  ) -> CoreResult<CanonicalTimestamp> {
    let time = NaiveTime::from_hms_opt(
      hour, minute, second
    )
    .ok_or_else(|| {
      CoreError::date(format!(
        "time {hour:02}:{minute:02}:\
         {second:02} is invalid"
      ))
    })?;
    let gregorian =
      calendar.rules().to_gregorian(date)?;
    self
      .zone
      .resolve_local(gregorian.and_time(time))
  }

  #[tracing::instrument(skip(self))]
  pub fn format(
    &self,
    ts: CanonicalTimestamp,
    calendar: CalendarSystem,
    language: Language,
    style: FormatStyle
  ) -> CoreResult<String> {
    let local = self.local(ts);
    let rules = calendar.rules();
    let date =
      rules.from_gregorian(local.date())?;
    let month =
      rules.month_name(date.month, language)?;

    let text = match (style, language) {
      | (FormatStyle::Numeric, _) => {
        date.to_string()
      }
      | (_, Language::English) => {
        format!(
          "{month} {}, {}",
          date.day, date.year
        )
      }
      | (_, Language::Persian) => {
        format!(
          "{} {month} {}",
          date.day, date.year
        )
      }
    };

    let text = if style
      == FormatStyle::DateTime
    {
      let sep = match language {
        | Language::English => ",",
        | Language::Persian => "،"
      };
      format!(
        "{text}{sep} {:02}:{:02}",
        local.hour(),
        local.minute()
      )
    } else {
      text
    };

    Ok(language.localize_digits(text))
  }

  #[must_use]
  pub fn weekday_name(
    &self,
    ts: CanonicalTimestamp,
    calendar: CalendarSystem,
    language: Language
  ) -> &'static str {
    calendar.rules().weekday_name(
      self.local(ts).weekday(),
      language
    )
  }

  pub fn month_name(
    &self,
    ts: CanonicalTimestamp,
    calendar: CalendarSystem,
    language: Language
  ) -> CoreResult<&'static str> {
    let date =
      self.calendar_day(ts, calendar)?;
    calendar
      .rules()
      .month_name(date.month, language)
  }

  /// Compares the calendar day of `ts` with
  /// the calendar day of `now`. `None` when
  /// either falls outside the calendar's
  /// supported range.
  #[must_use]
  pub fn compare_day(
    &self,
    ts: CanonicalTimestamp,
    calendar: CalendarSystem,
    now: CanonicalTimestamp
  ) -> Option<Ordering> {
    let day =
      self.checked_day(ts, calendar)?;
    let today =
      self.checked_day(now, calendar)?;
    Some(day.cmp(&today))
  }

  #[must_use]
  pub fn is_today(
    &self,
    ts: CanonicalTimestamp,
    calendar: CalendarSystem,
    now: CanonicalTimestamp
  ) -> bool {
    self.compare_day(ts, calendar, now)
      == Some(Ordering::Equal)
  }

  #[must_use]
  pub fn is_tomorrow(
    &self,
    ts: CanonicalTimestamp,
    calendar: CalendarSystem,
    now: CanonicalTimestamp
  ) -> bool {
    self.is_shifted_day(ts, calendar, now, 1)
  }

  #[must_use]
  pub fn is_yesterday(
    &self,
    ts: CanonicalTimestamp,
    calendar: CalendarSystem,
    now: CanonicalTimestamp
  ) -> bool {
    self.is_shifted_day(
      ts, calendar, now, -1
    )
  }

  /// Day granularity only: a due time that
  /// already passed earlier today is not
  /// overdue.
  #[must_use]
  pub fn is_overdue(
    &self,
    ts: CanonicalTimestamp,
    calendar: CalendarSystem,
    now: CanonicalTimestamp
  ) -> bool {
    self.compare_day(ts, calendar, now)
      == Some(Ordering::Less)
  }

  #[must_use]
  pub fn is_upcoming(
    &self,
    ts: CanonicalTimestamp,
    calendar: CalendarSystem,
    now: CanonicalTimestamp
  ) -> bool {
    self.compare_day(ts, calendar, now)
      == Some(Ordering::Greater)
  }

  #[tracing::instrument(skip(self))]
  pub fn relative_string(
    &self,
    ts: CanonicalTimestamp,
    calendar: CalendarSystem,
    language: Language,
    now: CanonicalTimestamp
  ) -> CoreResult<String> {
    let day =
      self.calendar_day(ts, calendar)?;
    let today =
      self.calendar_day(now, calendar)?;
    let delta = (self.local(ts).date()
      - self.local(now).date())
    .num_days();

    let phrase = match delta {
      | 0 => Relative::Today,
      | 1 => Relative::Tomorrow,
      | -1 => Relative::Yesterday,
      | d if d.abs() < 7 => {
        Relative::Span(d, Unit::Day)
      }
      | d if d.abs() < 28 => {
        Relative::Span(
          d / 7,
          Unit::Week
        )
      }
      | d => {
        let (earlier, later) = if d > 0 {
          (today, day)
        } else {
          (day, today)
        };
        let months = i64::from(
          whole_months(earlier, later)
        );
        let sign = d.signum();
        if months >= 12 {
          Relative::Span(
            sign * (months / 12),
            Unit::Year
          )
        } else if months > 0 {
          Relative::Span(
            sign * months,
            Unit::Month
          )
        } else {
          Relative::Span(
            d / 7,
            Unit::Week
          )
        }
      }
    };

    Ok(phrase.render(language))
  }

  /// Moves `ts` by whole calendar months,
  /// keeping the wall-clock time and clamping
  /// the day to the target month's length.
  #[tracing::instrument(skip(self))]
  pub fn add_months(
    &self,
    ts: CanonicalTimestamp,
    months: i32,
    calendar: CalendarSystem
  ) -> CoreResult<CanonicalTimestamp> {
    let local = self.local(ts);
    let rules = calendar.rules();
    let date =
      rules.from_gregorian(local.date())?;

    let index = i64::from(date.year) * 12
      + i64::from(date.month)
      - 1
      + i64::from(months);
    let year = i32::try_from(
      index.div_euclid(12)
    )
    .map_err(|_| {
      CoreError::date(
        "month arithmetic overflowed the \
         year range"
      )
    })?;
    let month =
      index.rem_euclid(12) as u32 + 1;
    let day = date.day.min(
      rules.month_length(year, month)?
    );

    let target =
      rules.to_gregorian(CalendarDate {
        year,
        month,
        day
      })?;
    self
      .zone
      .resolve_local(target.and_time(local.time()))
  }

  /// Local midnight of the day `days` away
  /// from the local day of `now`.
  pub fn start_of_day(
    &self,
    now: CanonicalTimestamp,
    days: i64
  ) -> CoreResult<CanonicalTimestamp> {
    let today = self.local(now).date();
    let target = shift_days(today, days)
      .ok_or_else(|| {
        CoreError::date(
          "day offset overflowed the \
           calendar range"
        )
      })?;
    self
      .zone
      .resolve_local(target.and_time(NaiveTime::MIN))
  }

  fn checked_day(
    &self,
    ts: CanonicalTimestamp,
    calendar: CalendarSystem
  ) -> Option<CalendarDate> {
    match self.calendar_day(ts, calendar) {
      | Ok(day) => Some(day),
      | Err(err) => {
        tracing::warn!(
          ts = %ts,
          %calendar,
          error = %err,
          "instant outside calendar range"
        );
        None
      }
    }
  }

  fn is_shifted_day(
    &self,
    ts: CanonicalTimestamp,
    calendar: CalendarSystem,
    now: CanonicalTimestamp,
    days: i64
  ) -> bool {
    let Some(target) =
      shift_days(self.local(now).date(), days)
    else {
      return false;
    };
    let Ok(target) = calendar
      .rules()
      .from_gregorian(target)
    else {
      return false;
    };
    self.checked_day(ts, calendar)
      == Some(target)
  }
}

fn shift_days(
  date: NaiveDate,
  days: i64
) -> Option<NaiveDate> {
  if days >= 0 {
    date.checked_add_days(Days::new(
      days.unsigned_abs()
    ))
  } else {
    date.checked_sub_days(Days::new(
      days.unsigned_abs()
    ))
  }
}

/// Whole months from `earlier` to `later`,
/// both expressed in the same calendar.
fn whole_months(
  earlier: CalendarDate,
  later: CalendarDate
) -> i32 {
  let mut months = (later.year
    - earlier.year)
    * 12
    + later.month as i32
    - earlier.month as i32;
  if later.day < earlier.day {
    months -= 1;
  }
  months.max(0)
}

#[derive(Debug, Clone, Copy)]
enum Unit {
  Day,
  Week,
  Month,
  Year
}

#[derive(Debug, Clone, Copy)]
enum Relative {
  Today,
  Tomorrow,
  Yesterday,
  Span(i64, Unit)
}

impl Relative {
  fn render(
    self,
    language: Language
  ) -> String {
    match (self, language) {
      | (Self::Today, Language::English) => {
        "today".to_string()
      }
      | (
        Self::Tomorrow,
        Language::English
      ) => "tomorrow".to_string(),
      | (
        Self::Yesterday,
        Language::English
      ) => "yesterday".to_string(),
      | (Self::Today, Language::Persian) => {
        "امروز".to_string()
      }
      | (
        Self::Tomorrow,
        Language::Persian
      ) => "فردا".to_string(),
      | (
        Self::Yesterday,
        Language::Persian
      ) => "دیروز".to_string(),
      | (
        Self::Span(n, unit),
        Language::English
      ) => {
        let count = n.unsigned_abs();
        let unit = match unit {
          | Unit::Day => "day",
          | Unit::Week => "week",
          | Unit::Month => "month",
          | Unit::Year => "year"
        };
        let plural =
          if count == 1 { "" } else { "s" };
        if n >= 0 {
          format!("in {count} {unit}{plural}")
        } else {
          format!(
            "{count} {unit}{plural} ago"
          )
        }
      }
      | (
        Self::Span(n, unit),
        Language::Persian
      ) => {
        let count = n.unsigned_abs();
        let unit = match unit {
          | Unit::Day => "روز",
          | Unit::Week => "هفته",
          | Unit::Month => "ماه",
          | Unit::Year => "سال"
        };
        let text = if n >= 0 {
          format!("{count} {unit} دیگر")
        } else {
          format!("{count} {unit} پیش")
        };
        names::to_persian_digits(&text)
      }
    }
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
    CalendarDate,
    CalendarEngine,
    CalendarSystem,
    FormatStyle,
    Language,
    Zone,
    days_in_month,
    is_leap_year,
    to_canonical,
    to_local
  };

  fn tehran() -> CalendarEngine {
    CalendarEngine::new(
      Zone::from_offset_seconds(12_600)
        .expect("tehran offset")
    )
  }

  fn utc(
    y: i32,
    m: u32,
    d: u32,
    h: u32,
    mi: u32
  ) -> super::CanonicalTimestamp {
    Utc
      .with_ymd_and_hms(y, m, d, h, mi, 0)
      .single()
      .expect("valid utc")
  }

  fn ymd(
    year: i32,
    month: u32,
    day: u32
  ) -> CalendarDate {
    CalendarDate {
      year,
      month,
      day
    }
  }

  #[test]
  fn offset_conversion_round_trips() {
    let offset =
      super::offset_from_seconds(-25_200)
        .expect("offset");
    let local = utc(2026, 3, 1, 23, 45)
      .naive_utc();
    let canonical =
      to_canonical(local, offset)
        .expect("canonical");
    assert_eq!(
      canonical,
      utc(2026, 3, 2, 6, 45)
    );
    assert_eq!(
      to_local(canonical, offset),
      local
    );
  }

  #[test]
  fn nowruz_renders_as_march_in_gregorian()
  {
    let engine = tehran();
    let ts = engine
      .create_canonical(
        ymd(1403, 1, 1),
        0,
        0,
        0,
        CalendarSystem::SolarHijri
      )
      .expect("create");

    assert_eq!(
      engine
        .format(
          ts,
          CalendarSystem::Gregorian,
          Language::English,
          FormatStyle::Date
        )
        .expect("format"),
      "March 20, 2024"
    );
    assert_eq!(
      engine
        .format(
          ts,
          CalendarSystem::SolarHijri,
          Language::Persian,
          FormatStyle::Date
        )
        .expect("format"),
      "۱ فروردین ۱۴۰۳"
    );
    assert_eq!(
      engine
        .format(
          ts,
          CalendarSystem::SolarHijri,
          Language::English,
          FormatStyle::Numeric
        )
        .expect("format"),
      "1403/01/01"
    );
  }

  #[test]
  fn formats_in_local_zone_not_utc() {
    // 22:00 UTC is already the next day in
    // Tehran.
    let engine = tehran();
    let ts = utc(2026, 10, 17, 22, 0);
    assert_eq!(
      engine
        .format(
          ts,
          CalendarSystem::Gregorian,
          Language::English,
          FormatStyle::DateTime
        )
        .expect("format"),
      "October 18, 2026, 01:30"
    );
    assert_eq!(
      engine
        .format(
          ts,
          CalendarSystem::SolarHijri,
          Language::Persian,
          FormatStyle::DateTime
        )
        .expect("format"),
      "۲۶ مهر ۱۴۰۵، ۰۱:۳۰"
    );
  }

  #[test]
  fn names_follow_calendar_and_language() {
    let engine = tehran();
    let ts = utc(2026, 10, 18, 8, 0);
    assert_eq!(
      engine.weekday_name(
        ts,
        CalendarSystem::Gregorian,
        Language::English
      ),
      "Sunday"
    );
    assert_eq!(
      engine.weekday_name(
        ts,
        CalendarSystem::SolarHijri,
        Language::Persian
      ),
      "یکشنبه"
    );
    assert_eq!(
      engine
        .month_name(
          ts,
          CalendarSystem::SolarHijri,
          Language::English
        )
        .expect("month"),
      "Mehr"
    );
    assert_eq!(
      engine
        .month_name(
          ts,
          CalendarSystem::Gregorian,
          Language::Persian
        )
        .expect("month"),
      "اکتبر"
    );
  }

  #[test]
  fn day_checks_use_local_midnight() {
    let engine = tehran();
    // 23:00 local on Oct 18.
    let now = utc(2026, 10, 18, 19, 30);
    // 20 hours later crosses local midnight.
    let due = now + Duration::hours(20);
    for calendar in CalendarSystem::ALL {
      assert!(
        !engine.is_today(due, calendar, now)
      );
      assert!(
        engine.is_tomorrow(due, calendar, now)
      );
      assert_eq!(
        engine
          .relative_string(
            due,
            calendar,
            Language::English,
            now
          )
          .expect("relative"),
        "tomorrow"
      );
    }
  }

  #[test]
  fn overdue_is_day_granular() {
    let engine = tehran();
    let now = utc(2026, 10, 18, 12, 0);
    let earlier_today =
      now - Duration::hours(3);
    let yesterday =
      now - Duration::hours(24);
    for calendar in CalendarSystem::ALL {
      assert!(!engine.is_overdue(
        earlier_today,
        calendar,
        now
      ));
      assert!(engine.is_overdue(
        yesterday, calendar, now
      ));
      assert!(engine.is_yesterday(
        yesterday, calendar, now
      ));
    }
  }

  #[test]
  fn relative_phrases_scale_units() {
    let engine = CalendarEngine::default();
    let now = utc(2026, 10, 18, 9, 0);
    let cases = [
      (Duration::days(3), "in 3 days"),
      (Duration::days(-2), "2 days ago"),
      (Duration::days(14), "in 2 weeks"),
      (Duration::days(-70), "2 months ago"),
      (Duration::days(400), "in 1 year")
    ];
    for (delta, expected) in cases {
      assert_eq!(
        engine
          .relative_string(
            now + delta,
            CalendarSystem::Gregorian,
            Language::English,
            now
          )
          .expect("relative"),
        expected
      );
    }
    assert_eq!(
      engine
        .relative_string(
          now + Duration::days(3),
          CalendarSystem::SolarHijri,
          Language::Persian,
          now
        )
        .expect("relative"),
      "۳ روز دیگر"
    );
  }

  #[test]
  fn month_spans_count_in_the_chosen_calendar()
  {
    let engine = CalendarEngine::default();
    // 1405/07/26 -> 1405/08/26 is a whole
    // Shamsi month; 10/18 -> 11/17 is not a
    // whole Gregorian one.
    let now = utc(2026, 10, 18, 9, 0);
    let due = now + Duration::days(30);
    let phrase = |calendar| {
      engine
        .relative_string(
          due,
          calendar,
          Language::English,
          now
        )
        .expect("relative")
    };
    assert_eq!(
      phrase(CalendarSystem::SolarHijri),
      "in 1 month"
    );
    assert_eq!(
      phrase(CalendarSystem::Gregorian),
      "in 4 weeks"
    );
  }

  #[test]
  fn add_months_clamps_to_month_length() {
    let engine = CalendarEngine::default();
    // 1404/06/31 -> Mehr has 30 days.
    let start = engine
      .create_canonical(
        ymd(1404, 6, 31),
        10,
        0,
        0,
        CalendarSystem::SolarHijri
      )
      .expect("create");
    let next = engine
      .add_months(
        start,
        1,
        CalendarSystem::SolarHijri
      )
      .expect("add");
    assert_eq!(
      engine
        .calendar_day(
          next,
          CalendarSystem::SolarHijri
        )
        .expect("day"),
      ymd(1404, 7, 30)
    );

    let jan31 = utc(2026, 1, 31, 10, 0);
    let feb = engine
      .add_months(
        jan31,
        1,
        CalendarSystem::Gregorian
      )
      .expect("add");
    assert_eq!(feb, utc(2026, 2, 28, 10, 0));
  }

  #[test]
  fn invalid_components_are_rejected() {
    let engine = CalendarEngine::default();
    for (date, calendar) in [
      (ymd(2026, 13, 1), CalendarSystem::Gregorian),
      (ymd(2026, 2, 29), CalendarSystem::Gregorian),
      (ymd(1404, 1, 32), CalendarSystem::SolarHijri),
      (ymd(1404, 12, 30), CalendarSystem::SolarHijri)
    ] {
      assert!(
        engine
          .create_canonical(
            date, 0, 0, 0, calendar
          )
          .is_err()
      );
    }
    assert!(
      engine
        .create_canonical(
          ymd(2026, 1, 1),
          24,
          0,
          0,
          CalendarSystem::Gregorian
        )
        .is_err()
    );
  }

  #[test]
  fn month_lengths_and_leap_years() {
    assert_eq!(
      days_in_month(
        2024,
        2,
        CalendarSystem::Gregorian
      )
      .expect("len"),
      29
    );
    assert_eq!(
      days_in_month(
        1403,
        12,
        CalendarSystem::SolarHijri
      )
      .expect("len"),
      30
    );
    assert!(
      !is_leap_year(
        2100,
        CalendarSystem::Gregorian
      )
      .expect("leap")
    );
    assert!(
      is_leap_year(
        1403,
        CalendarSystem::SolarHijri
      )
      .expect("leap")
    );
  }

  #[test]
  fn parses_selectors() {
    assert_eq!(
      "shamsi"
        .parse::<CalendarSystem>()
        .expect("calendar"),
      CalendarSystem::SolarHijri
    );
    assert_eq!(
      "fa".parse::<Language>()
        .expect("language"),
      Language::Persian
    );
    assert!(Language::Persian.is_rtl());
    assert!(!Language::English.is_rtl());
    assert!(
      "julian"
        .parse::<CalendarSystem>()
        .is_err()
    );
  }
}
