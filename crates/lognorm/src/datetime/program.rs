use chrono::{DateTime, FixedOffset, Utc};

use super::directive::{Accumulator, Directive};
use crate::error::RuleError;

/// An ordered list of date directives, built once and shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatProgram {
    directives: Vec<Directive>,
}

impl FormatProgram {
    pub fn new(directives: Vec<Directive>) -> Result<Self, RuleError> {
        if directives.is_empty() {
            return Err(RuleError::EmptyFormat);
        }
        Ok(Self { directives })
    }

    /// Compile a format string such as `"%B %F %W %H:%T:%S"`.
    ///
    /// `%X` selects a directive, `%%` is a literal percent sign, whitespace
    /// only separates directives, and any other text is a literal.
    pub fn parse(format: &str) -> Result<Self, RuleError> {
        let mut directives = Vec::new();
        let mut literal = String::new();
        let mut chars = format.chars();

        while let Some(c) = chars.next() {
            match c {
                '%' => match chars.next() {
                    Some('%') => literal.push('%'),
                    Some(letter) => {
                        flush_literal(&mut literal, &mut directives);
                        directives.extend(Directive::from_letter(letter)?);
                    }
                    None => return Err(RuleError::DanglingPercent(format.to_string())),
                },
                c if c.is_whitespace() => flush_literal(&mut literal, &mut directives),
                c => literal.push(c),
            }
        }
        flush_literal(&mut literal, &mut directives);

        Self::new(directives)
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Parse `input`, starting every unset field from `now`.
    ///
    /// Directives run until one fails or the input is exhausted; trailing
    /// directives with nothing left to read are skipped.
    pub fn run(&self, input: &str, now: DateTime<FixedOffset>) -> Option<DateTime<Utc>> {
        if input.is_empty() {
            return None;
        }
        let mut acc = Accumulator::starting_at(now);
        let mut pos = 0;
        for directive in &self.directives {
            if pos >= input.len() {
                break;
            }
            pos = directive.apply(input, pos, &mut acc)?;
        }
        acc.resolve(now.offset())
    }
}

fn flush_literal(literal: &mut String, directives: &mut Vec<Directive>) {
    if !literal.is_empty() {
        directives.push(Directive::Literal(std::mem::take(literal)));
    }
}

/// Try each program in order and return the first timestamp produced.
pub fn parse_first(programs: &[FormatProgram], input: &str, now: DateTime<FixedOffset>) -> Option<DateTime<Utc>> {
    programs.iter().find_map(|program| program.run(input, now))
}
