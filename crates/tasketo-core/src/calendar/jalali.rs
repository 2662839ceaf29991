//! Solar Hijri (Jalali) <-> Gregorian conversion.
//!
//! Uses the break-table formulation of the 33-year arithmetic cycle: the
//! table lists the years at which the cycle pattern shifts, and from it we
//! derive the Gregorian day of March on which Farvardin 1 falls. Every
//! conversion is anchored on that day, so both directions always agree on
//! the same physical day.

use chrono::{
  Datelike,
  Days,
  NaiveDate
};

use crate::error::{
  CoreError,
  CoreResult
};

const BREAKS: [i32; 20] = [
  -61, 9, 38, 199, 426, 686, 756, 818,
  1111, 1181, 1210, 1635, 2060, 2097,
  2192, 2262, 2324, 2394, 2456, 3178
];

pub const MIN_YEAR: i32 = BREAKS[0];
pub const MAX_YEAR: i32 =
  BREAKS[BREAKS.len() - 1] - 1;

/// First six months have 31 days.
const FIRST_HALF_DAYS: i64 = 186;

#[derive(Debug, Clone, Copy)]
struct YearInfo {
  /// Years since the last leap year;
  /// zero means this year is leap.
  since_leap:     i32,
  gregorian_year: i32,
  /// Day of March holding Farvardin 1.
  march_day:      u32
}

fn year_info(
  year: i32
) -> CoreResult<YearInfo> {
  if !(MIN_YEAR..=MAX_YEAR)
    .contains(&year)
  {
    return Err(CoreError::date(
      format!(
        "solar hijri year {year} is \
         outside {MIN_YEAR}..={MAX_YEAR}"
      )
    ));
  }

  let gregorian_year = year + 621;
  let mut leap_j = -14;
  let mut prev = BREAKS[0];
  let mut jump = 0;

  for &brk in &BREAKS[1..] {
    jump = brk - prev;
    if year < brk {
      break;
    }
    leap_j += (jump / 33) * 8
      + (jump % 33) / 4;
    prev = brk;
  }

  let mut n = year - prev;
  leap_j +=
    (n / 33) * 8 + ((n % 33) + 3) / 4;
  if jump % 33 == 4 && jump - n == 4 {
    leap_j += 1;
  }

  let leap_g = gregorian_year / 4
    - ((gregorian_year / 100 + 1) * 3)
      / 4
    - 150;
  let march_day = 20 + leap_j - leap_g;

  if jump - n < 6 {
    n = n - jump
      + ((jump + 4) / 33) * 33;
  }
  let mut since_leap =
    ((n + 1) % 33 - 1) % 4;
  if since_leap == -1 {
    since_leap = 4;
  }

  Ok(YearInfo {
    since_leap,
    gregorian_year,
    march_day: u32::try_from(march_day)
      .map_err(|_| {
        CoreError::date(format!(
          "invalid march anchor for \
           year {year}"
        ))
      })?
  })
}

fn new_year_day(
  info: &YearInfo
) -> CoreResult<NaiveDate> {
  NaiveDate::from_ymd_opt(
    info.gregorian_year,
    3,
    info.march_day
  )
  .ok_or_else(|| {
    CoreError::date(format!(
      "gregorian anchor {}-03-{} is \
       not representable",
      info.gregorian_year,
      info.march_day
    ))
  })
}

pub fn is_leap_year(
  year: i32
) -> CoreResult<bool> {
  Ok(year_info(year)?.since_leap == 0)
}

pub fn month_length(
  year: i32,
  month: u32
) -> CoreResult<u32> {
  match month {
    | 1..=6 => Ok(31),
    | 7..=11 => Ok(30),
    | 12 => {
      if is_leap_year(year)? {
        Ok(30)
      } else {
        Ok(29)
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

#[tracing::instrument(level = "trace")]
pub fn to_gregorian(
  year: i32,
  month: u32,
  day: u32
) -> CoreResult<NaiveDate> {
  let len = month_length(year, month)?;
  if day == 0 || day > len {
    return Err(CoreError::date(
      format!(
        "day {day} is outside 1..={len} \
         for {year}/{month}"
      )
    ));
  }

  let info = year_info(year)?;
  let start = new_year_day(&info)?;
  let month_offset = if month <= 6 {
    (month - 1) * 31
  } else {
    FIRST_HALF_DAYS as u32
      + (month - 7) * 30
  };
  let offset =
    u64::from(month_offset + day - 1);

  start
    .checked_add_days(Days::new(offset))
    .ok_or_else(|| {
      CoreError::date(format!(
        "{year}/{month}/{day} overflows \
         the gregorian range"
      ))
    })
}

#[tracing::instrument(level = "trace")]
pub fn from_gregorian(
  date: NaiveDate
) -> CoreResult<(i32, u32, u32)> {
  // Before Nowruz the date still belongs to
  // the previous solar year, so the last
  // supported year is reached from the
  // following gregorian year as well.
  let guess =
    (date.year() - 621).min(MAX_YEAR + 1);
  let (year, start) = if guess <= MAX_YEAR {
    let start =
      new_year_day(&year_info(guess)?)?;
    if date >= start {
      (guess, start)
    } else {
      (guess - 1, solar_year_start(guess - 1, date)?)
    }
  } else {
    (MAX_YEAR, solar_year_start(MAX_YEAR, date)?)
  };

  let k = (date - start).num_days();
  let year_len =
    if is_leap_year(year)? { 366 } else { 365 };
  if k >= year_len {
    return Err(CoreError::date(format!(
      "{date} is past the supported solar \
       hijri range"
    )));
  }

  if k < FIRST_HALF_DAYS {
    Ok((
      year,
      1 + (k / 31) as u32,
      (k % 31) as u32 + 1
    ))
  } else {
    let k = k - FIRST_HALF_DAYS;
    Ok((
      year,
      7 + (k / 30) as u32,
      (k % 30) as u32 + 1
    ))
  }
}

fn solar_year_start(
  year: i32,
  date: NaiveDate
) -> CoreResult<NaiveDate> {
  if year < MIN_YEAR {
    return Err(CoreError::date(format!(
      "{date} precedes the supported \
       solar hijri range"
    )));
  }
  new_year_day(&year_info(year)?)
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::{
    MAX_YEAR,
    from_gregorian,
    is_leap_year,
    month_length,
    to_gregorian
  };

  fn ymd(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid gregorian date")
  }

  #[test]
  fn nowruz_anchors() {
    assert_eq!(
      to_gregorian(1403, 1, 1)
        .expect("1403"),
      ymd(2024, 3, 20)
    );
    assert_eq!(
      to_gregorian(1404, 1, 1)
        .expect("1404"),
      ymd(2025, 3, 21)
    );
    assert_eq!(
      to_gregorian(1402, 1, 1)
        .expect("1402"),
      ymd(2023, 3, 21)
    );
  }

  #[test]
  fn converts_second_half_of_year() {
    assert_eq!(
      from_gregorian(ymd(2026, 10, 18))
        .expect("convert"),
      (1405, 7, 26)
    );
    assert_eq!(
      from_gregorian(ymd(2026, 9, 23))
        .expect("convert"),
      (1405, 7, 1)
    );
  }

  #[test]
  fn last_day_before_nowruz_respects_leap()
  {
    // 1403 is leap, so Esfand has 30 days.
    assert_eq!(
      from_gregorian(ymd(2025, 3, 20))
        .expect("convert"),
      (1403, 12, 30)
    );
    assert_eq!(
      from_gregorian(ymd(2024, 3, 19))
        .expect("convert"),
      (1402, 12, 29)
    );
  }

  #[test]
  fn leap_years_follow_cycle() {
    assert!(is_leap_year(1399).expect("1399"));
    assert!(is_leap_year(1403).expect("1403"));
    assert!(!is_leap_year(1404).expect("1404"));
    assert_eq!(
      month_length(1404, 12)
        .expect("len"),
      29
    );
  }

  #[test]
  fn rejects_impossible_components() {
    assert!(to_gregorian(1404, 13, 1).is_err());
    assert!(to_gregorian(1404, 7, 31).is_err());
    assert!(to_gregorian(1404, 12, 30).is_err());
    assert!(to_gregorian(1404, 1, 0).is_err());
    assert!(to_gregorian(4000, 1, 1).is_err());
  }

  #[test]
  fn last_supported_year_converts_both_ways()
  {
    for day in [
      ymd(3798, 12, 31),
      ymd(3799, 1, 1),
      ymd(3799, 3, 1)
    ] {
      let (y, m, d) =
        from_gregorian(day).expect("to jalali");
      assert_eq!(y, MAX_YEAR);
      assert_eq!(
        to_gregorian(y, m, d)
          .expect("to gregorian"),
        day
      );
    }
    assert_eq!(
      from_gregorian(ymd(3799, 1, 1))
        .expect("convert"),
      (3177, 10, 12)
    );
    let last = to_gregorian(
      MAX_YEAR,
      12,
      month_length(MAX_YEAR, 12)
        .expect("len")
    )
    .expect("last day");
    let past =
      last.succ_opt().expect("next day");
    assert!(from_gregorian(past).is_err());
  }

  #[test]
  fn round_trips_a_span_of_days() {
    let mut day = ymd(2020, 1, 1);
    let end = ymd(2030, 12, 31);
    while day <= end {
      let (y, m, d) =
        from_gregorian(day).expect("to jalali");
      assert_eq!(
        to_gregorian(y, m, d)
          .expect("to gregorian"),
        day
      );
      day = day.succ_opt().expect("next day");
    }
  }
}
