//! Placeholder scanning for expression templates.
//!
//! Templates are scanned once, when the fragment is built; rendering then walks
//! the token list without re-parsing.

use crate::error::{BuildError, BuildResult};
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// Literal SQL, a byte range of the template.
    Text(Range<usize>),
    /// Argument at this index (`?` resolved to its position, or `?N`).
    Arg(usize),
    /// `?name`, a byte range of the template holding `name`.
    Named(Range<usize>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Template {
    pub(crate) tokens: Vec<Token>,
    /// Number of arguments the template consumes.
    pub(crate) required: usize,
}

pub(crate) fn scan(template: &str) -> BuildResult<Template> {
    let bytes = template.as_bytes();
    let mut tokens = Vec::new();
    let mut positional = 0usize;
    let mut indexed_max: Option<usize> = None;
    let mut text_start = 0;
    let mut i = 0;

    fn push_text(tokens: &mut Vec<Token>, range: Range<usize>) {
        if !range.is_empty() {
            tokens.push(Token::Text(range));
        }
    }

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                // Quoted region; a doubled quote does not close it.
                i += 1;
                loop {
                    match bytes.get(i) {
                        None => {
                            return Err(BuildError::invalid_template(
                                template,
                                format!("unterminated {} quote", quote as char),
                            ));
                        }
                        Some(&b) if b == quote => {
                            if bytes.get(i + 1) == Some(&quote) {
                                i += 2;
                                continue;
                            }
                            i += 1;
                            break;
                        }
                        Some(_) => i += 1,
                    }
                }
            }
            b'\\' if bytes.get(i + 1) == Some(&b'?') => {
                push_text(&mut tokens, text_start..i);
                tokens.push(Token::Text(i + 1..i + 2));
                i += 2;
                text_start = i;
            }
            b'?' => {
                push_text(&mut tokens, text_start..i);
                let start = i + 1;
                match bytes.get(start) {
                    Some(b) if b.is_ascii_digit() => {
                        let end = scan_while(bytes, start, |b| b.is_ascii_digit());
                        let index: usize = template[start..end].parse().map_err(|_| {
                            BuildError::invalid_template(template, "placeholder index out of range")
                        })?;
                        indexed_max = Some(indexed_max.map_or(index, |max| max.max(index)));
                        tokens.push(Token::Arg(index));
                        i = end;
                    }
                    Some(&b) if b == b'_' || b.is_ascii_alphabetic() => {
                        let end = scan_while(bytes, start, |b| b == b'_' || b.is_ascii_alphanumeric());
                        tokens.push(Token::Named(start..end));
                        i = end;
                    }
                    _ => {
                        tokens.push(Token::Arg(positional));
                        positional += 1;
                        i = start;
                    }
                }
                text_start = i;
            }
            _ => i += 1,
        }
    }
    push_text(&mut tokens, text_start..bytes.len());

    let required = indexed_max.map_or(positional, |max| positional.max(max + 1));
    Ok(Template { tokens, required })
}

fn scan_while(bytes: &[u8], mut i: usize, pred: impl Fn(u8) -> bool) -> usize {
    while i < bytes.len() && pred(bytes[i]) {
        i += 1;
    }
    i
}
