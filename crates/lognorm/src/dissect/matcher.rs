use super::pattern::{Pattern, Token};

impl Pattern {
    /// Match `input` against the pattern.
    ///
    /// Returns the named captures in pattern order, or `None` when any
    /// literal is missing. Skip captures are matched but not returned.
    ///
    /// A leading literal must prefix the input and a trailing literal must
    /// end it. Literals in between bind at their first occurrence after the
    /// previous delimiter.
    pub fn captures<'p>(&'p self, input: &str) -> Option<Vec<(&'p str, String)>> {
        let mut out = Vec::new();
        let mut rest = input;
        let last = self.tokens.len() - 1;

        for (i, token) in self.tokens.iter().enumerate() {
            match token {
                Token::Literal(lit) => {
                    // Reached only for a leading literal or a literal not yet
                    // consumed by the capture before it.
                    if i == last {
                        if rest != lit.as_str() {
                            return None;
                        }
                        rest = "";
                    } else {
                        rest = rest.strip_prefix(lit.as_str())?;
                    }
                }
                Token::Capture(capture) => {
                    let value;
                    match self.tokens.get(i + 1) {
                        None => {
                            value = rest;
                            rest = "";
                        }
                        Some(Token::Literal(lit)) if i + 1 == last => {
                            let body = rest.strip_suffix(lit.as_str())?;
                            value = body;
                            rest = lit.as_str();
                        }
                        Some(Token::Literal(lit)) => {
                            let at = rest.find(lit.as_str())?;
                            value = &rest[..at];
                            rest = &rest[at..];
                            if capture.trim_right {
                                // Keep one delimiter for the literal token.
                                while rest[lit.len()..].starts_with(lit.as_str()) {
                                    rest = &rest[lit.len()..];
                                }
                            }
                        }
                        // Adjacent captures are rejected at build time.
                        Some(Token::Capture(_)) => return None,
                    }

                    if let Some(name) = &capture.name {
                        let value = if capture.trim_right {
                            value.trim_end_matches(' ')
                        } else {
                            value
                        };
                        out.push((name.as_str(), value.to_string()));
                    }
                }
            }
        }

        Some(out)
    }
}
