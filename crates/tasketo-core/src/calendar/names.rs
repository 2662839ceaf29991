// Month and weekday tables, indexed [language][n].
// Weekday rows start at Monday to line up with
// `Weekday::num_days_from_monday`.

pub(crate) const GREGORIAN_MONTHS:
  [[&str; 12]; 2] = [
  [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December"
  ],
  [
    "ژانویه",
    "فوریه",
    "مارس",
    "آوریل",
    "مه",
    "ژوئن",
    "ژوئیه",
    "اوت",
    "سپتامبر",
    "اکتبر",
    "نوامبر",
    "دسامبر"
  ]
];

pub(crate) const SOLAR_HIJRI_MONTHS:
  [[&str; 12]; 2] = [
  [
    "Farvardin",
    "Ordibehesht",
    "Khordad",
    "Tir",
    "Mordad",
    "Shahrivar",
    "Mehr",
    "Aban",
    "Azar",
    "Dey",
    "Bahman",
    "Esfand"
  ],
  [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند"
  ]
];

pub(crate) const GREGORIAN_WEEKDAYS:
  [[&str; 7]; 2] = [
  [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday"
  ],
  PERSIAN_WEEKDAYS
];

pub(crate) const SOLAR_HIJRI_WEEKDAYS:
  [[&str; 7]; 2] = [
  [
    "Doshanbeh",
    "Seshanbeh",
    "Chaharshanbeh",
    "Panjshanbeh",
    "Jomeh",
    "Shanbeh",
    "Yekshanbeh"
  ],
  PERSIAN_WEEKDAYS
];

const PERSIAN_WEEKDAYS: [&str; 7] = [
  "دوشنبه",
  "سه‌شنبه",
  "چهارشنبه",
  "پنجشنبه",
  "جمعه",
  "شنبه",
  "یکشنبه"
];

const PERSIAN_DIGITS: [char; 10] = [
  '۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷',
  '۸', '۹'
];

/// Rewrites ASCII digits as Persian
/// (U+06F0..U+06F9) digits.
pub(crate) fn to_persian_digits(
  text: &str
) -> String {
  text
    .chars()
    .map(|ch| match ch.to_digit(10) {
      | Some(d) if ch.is_ascii_digit() => {
        PERSIAN_DIGITS[d as usize]
      }
      | _ => ch
    })
    .collect()
}

/// Folds Persian and Arabic-Indic digits
/// back to ASCII so user input in either
/// script parses the same way.
pub(crate) fn to_ascii_digits(
  text: &str
) -> String {
  text
    .chars()
    .map(|ch| match ch {
      | '\u{06F0}'..='\u{06F9}' => {
        char::from(
          b'0'
            + (ch as u32 - 0x06F0) as u8
        )
      }
      | '\u{0660}'..='\u{0669}' => {
        char::from(
          b'0'
            + (ch as u32 - 0x0660) as u8
        )
      }
      | _ => ch
    })
    .collect()
}
