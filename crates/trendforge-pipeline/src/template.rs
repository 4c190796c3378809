//! Prompt templates with `{name}` placeholders.
//!
//! `{{` and `}}` render as literal braces. A `{` that does not open a
//! well-formed `{identifier}` is kept as literal text, so JSON snippets in a
//! prompt survive without escaping.

use std::collections::HashMap;

use crate::error::TemplateError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    #[must_use]
    pub fn new(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            segments: scan(text),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Distinct placeholder names in order of first appearance.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Substitute every placeholder with its value in a single pass.
    ///
    /// Values are inserted verbatim and never re-scanned, so a value that
    /// itself contains `{name}` text is left untouched. Extra values are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingPlaceholder`] for the first
    /// placeholder with no value.
    pub fn render(&self, values: &HashMap<&str, String>) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = values.get(name.as_str()).ok_or_else(|| {
                        TemplateError::MissingPlaceholder {
                            template: self.name.clone(),
                            placeholder: name.clone(),
                        }
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn scan(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        match c {
            '{' if rest.starts_with("{{") => {
                literal.push('{');
                rest = &rest[2..];
            }
            '}' if rest.starts_with("}}") => {
                literal.push('}');
                rest = &rest[2..];
            }
            '{' => {
                let ident_len = rest[1..]
                    .find(|ch: char| !is_ident_char(ch))
                    .unwrap_or(rest.len() - 1);
                if ident_len > 0 && rest[1 + ident_len..].starts_with('}') {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(rest[1..=ident_len].to_string()));
                    rest = &rest[ident_len + 2..];
                } else {
                    literal.push('{');
                    rest = &rest[1..];
                }
            }
            _ => {
                literal.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}
