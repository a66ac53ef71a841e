use std::fmt;

use crate::error::RuleError;

/// A named capture slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// `None` for skip captures (`%{}` / `%{?name}`): matched, never stored.
    pub name: Option<String>,
    /// `%{name->}`: strip trailing spaces and swallow repeats of the next
    /// delimiter.
    pub trim_right: bool,
}

impl Capture {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            trim_right: false,
        }
    }

    pub fn padded(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            trim_right: true,
        }
    }

    pub fn skip() -> Self {
        Self {
            name: None,
            trim_right: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Capture(Capture),
}

/// A compiled dissect pattern. Immutable once built.
///
/// Invariants: never empty, no two captures are adjacent, no two literals
/// are adjacent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub(super) tokens: Vec<Token>,
}

impl Pattern {
    /// Compile the textual form.
    pub fn parse(text: &str) -> Result<Self, RuleError> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut rest = text;
        let mut offset = 0;

        while let Some(start) = rest.find("%{") {
            literal.push_str(&rest[..start]);
            let body_start = start + 2;
            let end = rest[body_start..]
                .find('}')
                .ok_or(RuleError::UnterminatedCapture(offset + start))?;
            let body = &rest[body_start..body_start + end];

            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(Token::Capture(parse_capture(body)));

            let consumed = body_start + end + 1;
            offset += consumed;
            rest = &rest[consumed..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Self::from_tokens(tokens)
    }

    /// Build from pre-split tokens, merging adjacent literals.
    pub fn from_tokens(tokens: Vec<Token>) -> Result<Self, RuleError> {
        let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());
        for token in tokens {
            match (merged.last_mut(), token) {
                (_, Token::Literal(lit)) if lit.is_empty() => {}
                (Some(Token::Literal(prev)), Token::Literal(lit)) => prev.push_str(&lit),
                (Some(Token::Capture(prev)), Token::Capture(next)) => {
                    return Err(RuleError::AdjacentCaptures(
                        display_name(prev),
                        display_name(&next),
                    ));
                }
                (_, token) => merged.push(token),
            }
        }

        if merged.is_empty() {
            return Err(RuleError::EmptyPattern);
        }
        Ok(Self { tokens: merged })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Names of the fields this pattern stores on success.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            Token::Capture(Capture { name: Some(name), .. }) => Some(name.as_str()),
            _ => None,
        })
    }
}

fn parse_capture(body: &str) -> Capture {
    let (body, trim_right) = match body.strip_suffix("->") {
        Some(stripped) => (stripped, true),
        None => (body, false),
    };
    let name = if body.is_empty() || body.starts_with('?') {
        None
    } else {
        Some(body.to_string())
    };
    Capture { name, trim_right }
}

fn display_name(capture: &Capture) -> String {
    capture.name.clone().unwrap_or_else(|| "?".to_string())
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            match token {
                Token::Literal(lit) => f.write_str(lit)?,
                Token::Capture(c) => {
                    let name = c.name.as_deref().unwrap_or("");
                    let pad = if c.trim_right { "->" } else { "" };
                    write!(f, "%{{{}{}}}", name, pad)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Token {
        Token::Literal(s.to_string())
    }

    #[test]
    fn test_parse_simple() {
        let p = Pattern::parse("hello %{f1}!").unwrap();
        assert_eq!(
            p.tokens(),
            &[lit("hello "), Token::Capture(Capture::named("f1")), lit("!")]
        );
    }

    #[test]
    fn test_parse_padding_and_skip() {
        let p = Pattern::parse("%{month->} %{?ignored} %{}:%{day}").unwrap();
        assert_eq!(
            p.tokens(),
            &[
                Token::Capture(Capture::padded("month")),
                lit(" "),
                Token::Capture(Capture::skip()),
                lit(" "),
                Token::Capture(Capture::skip()),
                lit(":"),
                Token::Capture(Capture::named("day")),
            ]
        );
        assert_eq!(p.field_names().collect::<Vec<_>>(), vec!["month", "day"]);
    }

    #[test]
    fn test_percent_without_brace_is_literal() {
        let p = Pattern::parse("%{host}: %ASA-%{level}").unwrap();
        assert_eq!(p.tokens()[1], lit(": %ASA-"));
    }

    #[test]
    fn test_unterminated_capture() {
        assert_eq!(
            Pattern::parse("abc %{name"),
            Err(RuleError::UnterminatedCapture(4))
        );
    }

    #[test]
    fn test_adjacent_captures_rejected() {
        assert_eq!(
            Pattern::parse("%{a}%{b}"),
            Err(RuleError::AdjacentCaptures("a".into(), "b".into()))
        );
    }

    #[test]
    fn test_empty_pattern_rejected() {
        assert_eq!(Pattern::parse(""), Err(RuleError::EmptyPattern));
    }

    #[test]
    fn test_from_tokens_merges_literals() {
        let p = Pattern::from_tokens(vec![lit("a"), lit(""), lit("b"), Token::Capture(Capture::named("x"))]).unwrap();
        assert_eq!(p.tokens(), &[lit("ab"), Token::Capture(Capture::named("x"))]);
    }

    #[test]
    fn test_display_round_trips_syntax() {
        let text = "%{month->} %{day} [%{}]";
        assert_eq!(Pattern::parse(text).unwrap().to_string(), text);
    }
}
