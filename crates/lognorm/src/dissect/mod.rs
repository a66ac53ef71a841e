/// Dissect tokenizer
///
/// Splits text against a literal/capture template without regular
/// expressions. A pattern such as
///
/// ```text
/// %{month->} %{day->} %{year} %{hostip}: %ASA-%{level}-%{messageid}: %{payload}
/// ```
///
/// binds every `%{name}` to the text between the surrounding literals.
///
/// - `pattern.rs`: pattern syntax and compile-time validation
/// - `matcher.rs`: the left-to-right matcher

pub mod pattern;
mod matcher;

pub use pattern::{Capture, Pattern, Token};
