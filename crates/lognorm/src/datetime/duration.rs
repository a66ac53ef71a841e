use crate::error::RuleError;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;

/// A duration format: the unit (in seconds) of each number to read.
///
/// Only directive letters matter; literals in the format string are ignored
/// since numbers are found by skipping everything that is not a digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationFormat {
    units: Vec<i64>,
}

impl DurationFormat {
    pub fn parse(format: &str) -> Result<Self, RuleError> {
        let mut units = Vec::new();
        let mut chars = format.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                continue;
            }
            match chars.next() {
                Some('%') => {}
                Some(letter) => units.extend_from_slice(unit_for(letter)?),
                None => return Err(RuleError::DanglingPercent(format.to_string())),
            }
        }
        if units.is_empty() {
            return Err(RuleError::EmptyFormat);
        }
        Ok(Self { units })
    }

    pub fn units(&self) -> &[i64] {
        &self.units
    }

    /// Total seconds, or `None` when `input` holds fewer numbers than the
    /// format needs.
    pub fn seconds(&self, input: &str) -> Option<i64> {
        let mut numbers = IntScanner::new(input);
        self.units.iter().try_fold(0i64, |total, unit| {
            let value = numbers.next()?;
            total.checked_add(value.checked_mul(*unit)?)
        })
    }
}

fn unit_for(letter: char) -> Result<&'static [i64], RuleError> {
    let units: &'static [i64] = match letter {
        'M' | 'G' => &[MONTH],
        'D' | 'J' | 'A' => &[DAY],
        'F' | 'H' | 'I' | 'N' => &[HOUR],
        'T' | 'U' => &[MINUTE],
        'S' | 'O' => &[1],
        'Z' => &[HOUR, MINUTE, 1],
        other => return Err(RuleError::UnknownDirective(other)),
    };
    Ok(units)
}

/// Yields consecutive runs of ASCII digits as integers.
struct IntScanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> IntScanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }
}

impl Iterator for IntScanner<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        while self.bytes.get(self.pos).is_some_and(|b| !b.is_ascii_digit()) {
            self.pos += 1;
        }
        let start = self.pos;
        while self.bytes.get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
        }
        if start == self.pos {
            return None;
        }
        self.bytes[start..self.pos]
            .iter()
            .try_fold(0i64, |acc, d| acc.checked_mul(10)?.checked_add(i64::from(d - b'0')))
    }
}

/// Try each format in order and return the first total.
pub fn first_duration(formats: &[DurationFormat], input: &str) -> Option<i64> {
    formats.iter().find_map(|format| format.seconds(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(DurationFormat::parse("%N:%U:%O").unwrap().units(), &[HOUR, MINUTE, 1]);
        assert_eq!(DurationFormat::parse("%Z").unwrap().units(), &[HOUR, MINUTE, 1]);
        assert_eq!(DurationFormat::parse("%A%N%T%O").unwrap().units(), &[DAY, HOUR, MINUTE, 1]);
        assert_eq!(DurationFormat::parse("hello"), Err(RuleError::EmptyFormat));
        assert_eq!(DurationFormat::parse("%W"), Err(RuleError::UnknownDirective('W')));
    }

    #[test]
    fn test_days_hours_minutes_seconds() {
        let format = DurationFormat::parse("%D%F%U%O").unwrap();
        assert_eq!(format.seconds("1  3 42  13"), Some(99733));
    }

    #[test]
    fn test_separators_are_skipped() {
        let format = DurationFormat::parse("%N:%U:%O").unwrap();
        assert_eq!(format.seconds("0h:12m:05s"), Some(725));
    }

    #[test]
    fn test_not_enough_numbers() {
        let format = DurationFormat::parse("%N%U%O").unwrap();
        assert_eq!(format.seconds("1 2"), None);
    }

    #[test]
    fn test_first_matching_format_wins() {
        let formats = vec![
            DurationFormat::parse("%D%N%U%O").unwrap(),
            DurationFormat::parse("%U%O").unwrap(),
        ];
        assert_eq!(first_duration(&formats, "2:30"), Some(150));
    }
}
