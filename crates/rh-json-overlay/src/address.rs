// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Leaf addresses inside a JSON document
//!
//! An address is a list of steps rendered as text:
//!
//! | Document | Leaf address |
//! |----------|--------------|
//! | `{"c":{"bb":{"q":1}}}` | `c.bb.q` |
//! | `{"c":[{"bb":1}]}` | `c[0].bb` |
//! | `[{"c":1},{"c":2}]` | `[1].c` |
//! | `{"a":[[1]]}` | `a[0][0]` |
//! | `{"a.b":1}` | `["a.b"]` |
//!
//! Keys containing `.`, `[`, `]`, `"` or `\` (and the empty key) are written in
//! bracket-quoted form so that every rendered address parses back to the same
//! steps. The empty string is the root address.

use crate::error::{OverlayError, Result};
use std::fmt::{self, Write as _};
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

/// One step from a container to one of its children
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Member of an object
    Key(String),
    /// Element of an array
    Index(usize),
}

/// Parsed form of a leaf address
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Address {
    steps: Vec<Step>,
}

impl Address {
    /// The address of the document root
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Append an object member step
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.steps.push(Step::Key(key.into()));
        self
    }

    /// Append an array element step
    pub fn index(mut self, index: usize) -> Self {
        self.steps.push(Step::Index(index));
        self
    }

    pub(crate) fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub(crate) fn pop(&mut self) {
        self.steps.pop();
    }

    /// The address made of the first `len` steps
    pub fn prefix(&self, len: usize) -> Address {
        Address {
            steps: self.steps[..len.min(self.steps.len())].to_vec(),
        }
    }

    /// Cut the address right after the first member step named `key`
    ///
    /// Index steps that follow the member are dropped with the rest, so the
    /// result designates the whole value held under that key.
    pub fn truncate_at_key(&self, key: &str) -> Option<Address> {
        let position = self
            .steps
            .iter()
            .position(|step| matches!(step, Step::Key(k) if k == key))?;
        Some(self.prefix(position + 1))
    }
}

fn needs_quoting(key: &str) -> bool {
    key.is_empty() || key.contains(&['.', '[', ']', '"', '\\'][..])
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                Step::Index(index) => write!(f, "[{index}]")?,
                Step::Key(key) if needs_quoting(key) => {
                    f.write_str("[\"")?;
                    for c in key.chars() {
                        if c == '"' || c == '\\' {
                            f.write_char('\\')?;
                        }
                        f.write_char(c)?;
                    }
                    f.write_str("\"]")?;
                }
                Step::Key(key) => {
                    if i > 0 {
                        f.write_char('.')?;
                    }
                    f.write_str(key)?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = OverlayError;

    fn from_str(raw: &str) -> Result<Self> {
        let mut steps = Vec::new();
        let mut chars = raw.char_indices().peekable();
        let mut after_dot = false;

        while let Some(&(pos, c)) = chars.peek() {
            match c {
                '.' => {
                    if steps.is_empty() || after_dot {
                        return Err(OverlayError::invalid(
                            raw,
                            format!("empty segment at offset {pos}"),
                        ));
                    }
                    chars.next();
                    after_dot = true;
                }
                '[' => {
                    if after_dot {
                        return Err(OverlayError::invalid(
                            raw,
                            format!("'[' directly after '.' at offset {pos}"),
                        ));
                    }
                    chars.next();
                    steps.push(parse_bracket(raw, &mut chars)?);
                }
                ']' => {
                    return Err(OverlayError::invalid(
                        raw,
                        format!("unmatched ']' at offset {pos}"),
                    ));
                }
                _ => {
                    if !steps.is_empty() && !after_dot {
                        return Err(OverlayError::invalid(
                            raw,
                            format!("missing '.' before key at offset {pos}"),
                        ));
                    }
                    let mut key = String::new();
                    while let Some(&(_, c)) = chars.peek() {
                        if matches!(c, '.' | '[' | ']') {
                            break;
                        }
                        key.push(c);
                        chars.next();
                    }
                    steps.push(Step::Key(key));
                    after_dot = false;
                }
            }
        }

        if after_dot {
            return Err(OverlayError::invalid(raw, "trailing '.'"));
        }

        Ok(Address { steps })
    }
}

/// Parse the inside of `[...]`, the opening bracket already consumed
fn parse_bracket(raw: &str, chars: &mut Peekable<CharIndices<'_>>) -> Result<Step> {
    if let Some(&(_, '"')) = chars.peek() {
        chars.next();
        let mut key = String::new();
        loop {
            match chars.next() {
                Some((_, '\\')) => match chars.next() {
                    Some((_, c)) => key.push(c),
                    None => return Err(OverlayError::invalid(raw, "unterminated escape")),
                },
                Some((_, '"')) => break,
                Some((_, c)) => key.push(c),
                None => return Err(OverlayError::invalid(raw, "unterminated quoted key")),
            }
        }
        return match chars.next() {
            Some((_, ']')) => Ok(Step::Key(key)),
            _ => Err(OverlayError::invalid(raw, "expected ']' after quoted key")),
        };
    }

    let mut digits = String::new();
    loop {
        match chars.next() {
            Some((_, ']')) => break,
            Some((_, c)) if c.is_ascii_digit() => digits.push(c),
            Some((pos, c)) => {
                return Err(OverlayError::invalid(
                    raw,
                    format!("unexpected '{c}' in index at offset {pos}"),
                ));
            }
            None => return Err(OverlayError::invalid(raw, "unterminated index")),
        }
    }
    if digits.is_empty() {
        return Err(OverlayError::invalid(raw, "empty index"));
    }
    digits
        .parse::<usize>()
        .map(Step::Index)
        .map_err(|e| OverlayError::invalid(raw, format!("index out of range: {e}")))
}
