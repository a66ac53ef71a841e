use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Timelike, Utc};

use crate::error::RuleError;

/// Month abbreviations with the number of extra characters in the full name.
const MONTHS: [(&str, usize); 12] = [
    ("jan", 4),
    ("feb", 5),
    ("mar", 2),
    ("apr", 2),
    ("may", 0),
    ("jun", 1),
    ("jul", 1),
    ("aug", 3),
    ("sep", 6),
    ("oct", 4),
    ("nov", 5),
    ("dec", 4),
];

/// Largest accepted epoch value (2^40 seconds).
const MAX_EPOCH_SECONDS: i64 = 1 << 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Year,
    /// Two-digit year: 69-99 is 19xx, 00-68 is 20xx.
    ShortYear,
}

impl DateField {
    /// Inclusive bounds a parsed value must respect.
    pub fn bounds(&self) -> (i64, i64) {
        match self {
            DateField::Month => (1, 12),
            DateField::Day => (1, 31),
            DateField::Hour => (0, 24),
            DateField::Minute => (0, 59),
            DateField::Second => (0, 60),
            DateField::Year => (1000, 9999),
            DateField::ShortYear => (0, 99),
        }
    }
}

/// One step of a [`FormatProgram`](super::FormatProgram).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Text that must appear at the cursor (after optional spaces).
    Literal(String),
    /// Exactly `width` digits.
    Fixed { width: usize, field: DateField },
    /// One or more digits.
    Variable { field: DateField },
    /// Three-letter month, optionally followed by the rest of the full name.
    MonthName { long: bool },
    /// Seconds since the Unix epoch.
    EpochSeconds,
}

impl Directive {
    /// Directives for a `%X` format letter.
    pub fn from_letter(letter: char) -> Result<Vec<Directive>, RuleError> {
        use DateField::*;

        let fixed = |width, field| Directive::Fixed { width, field };
        let variable = |field| Directive::Variable { field };

        let directive = match letter {
            'R' => Directive::MonthName { long: true },
            'B' => Directive::MonthName { long: false },
            'M' => fixed(2, Month),
            'G' => variable(Month),
            'D' => fixed(2, Day),
            'F' => variable(Day),
            'H' => fixed(2, Hour),
            'N' => variable(Hour),
            'T' => fixed(2, Minute),
            'U' => variable(Minute),
            'S' => fixed(2, Second),
            'O' => variable(Second),
            'W' => fixed(4, Year),
            'Y' => fixed(2, ShortYear),
            'X' => Directive::EpochSeconds,
            'Z' => {
                return Ok(vec![
                    fixed(2, Hour),
                    Directive::Literal(":".to_string()),
                    fixed(2, Minute),
                    Directive::Literal(":".to_string()),
                    fixed(2, Second),
                ])
            }
            other => return Err(RuleError::UnknownDirective(other)),
        };
        Ok(vec![directive])
    }

    /// Run the directive at byte offset `pos`, returning the new cursor.
    pub fn apply(&self, input: &str, pos: usize, acc: &mut Accumulator) -> Option<usize> {
        let bytes = input.as_bytes();
        let pos = skip_spaces(bytes, pos);

        match self {
            Directive::Literal(lit) => {
                let rest = input.get(pos..)?;
                rest.starts_with(lit.as_str()).then(|| pos + lit.len())
            }
            Directive::Fixed { width, field } => {
                let end = pos.checked_add(*width)?;
                let digits = bytes.get(pos..end)?;
                if !digits.iter().all(u8::is_ascii_digit) {
                    return None;
                }
                acc.set(*field, parse_digits(digits)?)?;
                Some(end)
            }
            Directive::Variable { field } => {
                let end = skip_digits(bytes, pos);
                if end == pos {
                    return None;
                }
                acc.set(*field, parse_digits(&bytes[pos..end])?)?;
                Some(end)
            }
            Directive::MonthName { long } => {
                let abbrev = input.get(pos..pos + 3)?.to_ascii_lowercase();
                let (index, suffix) = MONTHS
                    .iter()
                    .enumerate()
                    .find(|(_, (name, _))| *name == abbrev)
                    .map(|(i, (_, suffix))| (i, *suffix))?;
                acc.month = index as u32 + 1;
                let skip = if *long { suffix } else { 0 };
                Some((pos + 3 + skip).min(bytes.len()))
            }
            Directive::EpochSeconds => {
                let end = skip_digits(bytes, pos);
                if end == pos {
                    return None;
                }
                let secs = parse_digits(&bytes[pos..end])?;
                if secs > MAX_EPOCH_SECONDS {
                    return None;
                }
                acc.epoch = Some(secs);
                Some(end)
            }
        }
    }
}

fn skip_spaces(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos) == Some(&b' ') {
        pos += 1;
    }
    pos
}

fn skip_digits(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    pos
}

fn parse_digits(digits: &[u8]) -> Option<i64> {
    digits.iter().try_fold(0i64, |acc, d| {
        acc.checked_mul(10)?.checked_add(i64::from(d - b'0'))
    })
}

/// Timestamp under construction. Fields start at the current local time;
/// directives overwrite the ones they parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accumulator {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub epoch: Option<i64>,
    /// Whether `day` came from the input rather than the clock.
    pub day_set: bool,
}

impl Accumulator {
    pub fn starting_at(now: DateTime<FixedOffset>) -> Self {
        Self {
            year: now.year(),
            month: now.month(),
            day: now.day(),
            hour: now.hour(),
            minute: now.minute(),
            second: now.second(),
            epoch: None,
            day_set: false,
        }
    }

    /// Bounds-check and store a parsed value.
    fn set(&mut self, field: DateField, value: i64) -> Option<()> {
        let (min, max) = field.bounds();
        if value < min || value > max {
            return None;
        }
        // Bounds above guarantee the casts cannot truncate.
        match field {
            DateField::Month => self.month = value as u32,
            DateField::Day => {
                self.day = value as u32;
                self.day_set = true;
            }
            DateField::Hour => self.hour = value as u32,
            DateField::Minute => self.minute = value as u32,
            DateField::Second => self.second = value as u32,
            DateField::Year => self.year = value as i32,
            DateField::ShortYear => {
                let century = if value >= 69 { 1900 } else { 2000 };
                self.year = century + value as i32;
            }
        }
        Some(())
    }

    /// Resolve to an instant in `tz`. Hour 24 and second 60 roll over.
    /// A parsed day that does not exist in the month fails; a day carried
    /// over from the clock is clamped to the end of the month.
    pub fn resolve(&self, tz: &FixedOffset) -> Option<DateTime<Utc>> {
        if let Some(secs) = self.epoch {
            return DateTime::from_timestamp(secs, 0);
        }
        let date = if self.day_set {
            NaiveDate::from_ymd_opt(self.year, self.month, self.day)?
        } else {
            (28..=self.day.max(28))
                .rev()
                .find_map(|day| NaiveDate::from_ymd_opt(self.year, self.month, day))?
        };
        let local = date.and_hms_opt(0, 0, 0)?
            + Duration::hours(i64::from(self.hour))
            + Duration::minutes(i64::from(self.minute))
            + Duration::seconds(i64::from(self.second));
        tz.from_local_datetime(&local)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2020, 6, 15, 1, 2, 3)
            .unwrap()
    }

    fn run(directive: &Directive, input: &str) -> (Option<usize>, Accumulator) {
        let mut acc = Accumulator::starting_at(now());
        let out = directive.apply(input, 0, &mut acc);
        (out, acc)
    }

    #[test]
    fn test_fixed_width_requires_digits() {
        let d = Directive::Fixed { width: 2, field: DateField::Day };
        assert_eq!(run(&d, " 05").0, Some(3));
        assert_eq!(run(&d, "5 ").0, None);
        assert_eq!(run(&d, "5").0, None);
        assert_eq!(run(&d, "32").0, None);
    }

    #[test]
    fn test_variable_width() {
        let d = Directive::Variable { field: DateField::Hour };
        let (pos, acc) = run(&d, "  8:30");
        assert_eq!(pos, Some(3));
        assert_eq!(acc.hour, 8);
        assert_eq!(run(&d, "25").0, None);
        assert_eq!(run(&d, "x").0, None);
    }

    #[test]
    fn test_month_names() {
        let short = Directive::MonthName { long: false };
        let long = Directive::MonthName { long: true };

        let (pos, acc) = run(&short, "OCT 5");
        assert_eq!((pos, acc.month), (Some(3), 10));

        let (pos, acc) = run(&long, "September 5");
        assert_eq!((pos, acc.month), (Some(9), 9));

        // Clamped at the end of input.
        assert_eq!(run(&long, "Sep").0, Some(3));
        assert_eq!(run(&short, "Foo").0, None);
    }

    #[test]
    fn test_literal() {
        let d = Directive::Literal(":".to_string());
        assert_eq!(run(&d, ":30").0, Some(1));
        assert_eq!(run(&d, "-30").0, None);
    }

    #[test]
    fn test_literal_skips_leading_spaces() {
        let d = Directive::Literal(":".to_string());
        assert_eq!(run(&d, "  :30").0, Some(3));
        assert_eq!(run(&d, " -30").0, None);
    }

    #[test]
    fn test_epoch() {
        let (pos, acc) = run(&Directive::EpochSeconds, "1600000000");
        assert_eq!(pos, Some(10));
        assert_eq!(
            acc.resolve(&FixedOffset::east_opt(0).unwrap()).map(|t| t.timestamp()),
            Some(1_600_000_000)
        );
        assert_eq!(run(&Directive::EpochSeconds, "2000000000000").0, None);
    }

    #[test]
    fn test_short_year_pivot() {
        let d = Directive::Fixed { width: 2, field: DateField::ShortYear };
        assert_eq!(run(&d, "21").1.year, 2021);
        assert_eq!(run(&d, "99").1.year, 1999);
    }

    #[test]
    fn test_resolve_rollover_and_invalid_dates() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let mut acc = Accumulator::starting_at(now());
        acc.hour = 24;
        acc.minute = 0;
        acc.second = 0;
        let ts = acc.resolve(&utc).unwrap();
        assert_eq!((ts.day(), ts.hour()), (16, 0));

        acc.month = 2;
        acc.day = 31;
        acc.day_set = true;
        assert_eq!(acc.resolve(&utc), None);
    }

    #[test]
    fn test_clock_day_clamped_to_month_length() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let end_of_october = utc.with_ymd_and_hms(2022, 10, 31, 12, 0, 0).unwrap();

        let mut acc = Accumulator::starting_at(end_of_october);
        acc.set(DateField::Month, 9).unwrap();
        let ts = acc.resolve(&utc).unwrap();
        assert_eq!((ts.month(), ts.day()), (9, 30));

        acc.set(DateField::Year, 2023).unwrap();
        acc.set(DateField::Month, 2).unwrap();
        let ts = acc.resolve(&utc).unwrap();
        assert_eq!((ts.month(), ts.day()), (2, 28));

        acc.set(DateField::Day, 31).unwrap();
        assert_eq!(acc.resolve(&utc), None);
    }

    #[test]
    fn test_unknown_letter() {
        assert_eq!(Directive::from_letter('Q'), Err(RuleError::UnknownDirective('Q')));
        assert_eq!(Directive::from_letter('Z').unwrap().len(), 5);
    }
}
