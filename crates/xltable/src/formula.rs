//! Formula templates with `{column}` placeholders
//!
//! A template such as `=AVERAGE({bravo}, {charlie})` is tokenized once into
//! literal text and placeholder names. Rendering swaps each placeholder for a
//! cell reference supplied by the caller. `{{` and `}}` stand for literal
//! braces, so array constants stay expressible (`=SUM({{1,2}})`).

use std::fmt;
use thiserror::Error;

/// Tokenizer errors, reported with the byte offset where they start
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unterminated placeholder at byte {0}")]
    Unterminated(usize),

    #[error("empty placeholder at byte {0}")]
    EmptyPlaceholder(usize),

    #[error("'{{' inside placeholder at byte {0}")]
    NestedOpen(usize),

    #[error("unmatched '}}' at byte {0}")]
    UnmatchedClose(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed formula template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaTemplate {
    text: String,
    segments: Vec<Segment>,
}

impl FormulaTemplate {
    /// Tokenize `text`.
    ///
    /// # Examples
    /// ```
    /// use xltable::FormulaTemplate;
    ///
    /// let template = FormulaTemplate::parse("=AVERAGE({bravo}, {charlie})").unwrap();
    /// assert_eq!(template.placeholders().collect::<Vec<_>>(), ["bravo", "charlie"]);
    ///
    /// let rendered = template.render(|name| name.to_uppercase());
    /// assert_eq!(rendered, "=AVERAGE(BRAVO, CHARLIE)");
    /// ```
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = text.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            let doubled = chars.peek().map(|&(_, next)| next) == Some(c);
            match c {
                '{' | '}' if doubled => {
                    chars.next();
                    literal.push(c);
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, '{')) => return Err(TemplateError::NestedOpen(pos)),
                            Some((_, ch)) => name.push(ch),
                            None => return Err(TemplateError::Unterminated(pos)),
                        }
                    }
                    if name.is_empty() {
                        return Err(TemplateError::EmptyPlaceholder(pos));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name));
                }
                '}' => return Err(TemplateError::UnmatchedClose(pos)),
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            text: text.to_string(),
            segments,
        })
    }

    /// The template as written
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Placeholder names in order of appearance (repeats included)
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute every placeholder with `reference(name)`.
    pub fn render<F>(&self, mut reference: F) -> String
    where
        F: FnMut(&str) -> String,
    {
        let mut out = String::with_capacity(self.text.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => out.push_str(&reference(name)),
            }
        }
        out
    }

    /// Render with this-row structured references (`[@bravo]`), the
    /// row-independent form a table column formula uses.
    pub fn render_structured(&self) -> String {
        self.render(structured_reference)
    }
}

impl fmt::Display for FormulaTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// `[@name]`, or `[@[name]]` with `'` escapes when the header holds
/// anything besides letters, digits and underscores.
fn structured_reference(name: &str) -> String {
    if name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return format!("[@{}]", name);
    }

    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '[' | ']' | '#' | '\'') {
            escaped.push('\'');
        }
        escaped.push(c);
    }
    format!("[@[{}]]", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_and_render() {
        let template = FormulaTemplate::parse("=AVERAGE({bravo}, {charlie})").unwrap();
        assert_eq!(template.as_str(), "=AVERAGE({bravo}, {charlie})");

        let rendered = template.render(|name| match name {
            "bravo" => "D2".to_string(),
            _ => "E2".to_string(),
        });
        assert_eq!(rendered, "=AVERAGE(D2, E2)");
    }

    #[test]
    fn test_repeated_and_adjacent_placeholders() {
        let template = FormulaTemplate::parse("{a}{b}+{a}").unwrap();
        assert_eq!(template.placeholders().collect::<Vec<_>>(), ["a", "b", "a"]);
        assert_eq!(template.render(|n| n.repeat(2)), "aabb+aa");
    }

    #[test]
    fn test_escaped_braces() {
        let template = FormulaTemplate::parse("=SUM({{1,2}})+{x}").unwrap();
        assert_eq!(template.placeholders().count(), 1);
        assert_eq!(template.render(|_| "A2".into()), "=SUM({1,2})+A2");
    }

    #[test]
    fn test_no_placeholders() {
        let template = FormulaTemplate::parse("=TODAY()").unwrap();
        assert_eq!(template.placeholders().count(), 0);
        assert_eq!(template.render(|_| unreachable!()), "=TODAY()");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            FormulaTemplate::parse("=A({bravo").unwrap_err(),
            TemplateError::Unterminated(3)
        );
        assert_eq!(
            FormulaTemplate::parse("={}").unwrap_err(),
            TemplateError::EmptyPlaceholder(1)
        );
        assert_eq!(
            FormulaTemplate::parse("={a{b}}").unwrap_err(),
            TemplateError::NestedOpen(1)
        );
        assert_eq!(
            FormulaTemplate::parse("=1}").unwrap_err(),
            TemplateError::UnmatchedClose(2)
        );
    }

    #[test]
    fn test_structured_render() {
        let template = FormulaTemplate::parse("={bravo}+{unit price}+{a#b}").unwrap();
        assert_eq!(
            template.render_structured(),
            "=[@bravo]+[@[unit price]]+[@[a'#b]]"
        );
    }
}
