use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{CoreError, CoreResult};

/// A maximal repetition of one pattern letter. The length encodes the
/// requested width or padding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldRun {
    pub chr: char,
    pub length: usize,
}

impl FieldRun {
    /// `Z` runs shorter than 5 request the same generic-offset data as
    /// `OOOO`, so they are rewritten before dispatch.
    pub fn canonical(self) -> Self {
        if self.chr == 'Z' && self.length < 5 {
            FieldRun {
                chr: 'O',
                length: 4,
            }
        } else {
            self
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternItem {
    Field(FieldRun),
    Literal(String),
}

/// Splits a raw pattern into maximal field runs and literal text.
/// Quoting follows UTS 35: `'…'` spans are literal, `''` is one quote.
pub fn tokenize(pattern: &str) -> CoreResult<Vec<PatternItem>> {
    let mut items = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(&chr) = chars.peek() {
        if chr.is_ascii_alphabetic() {
            if !literal.is_empty() {
                items.push(PatternItem::Literal(core::mem::take(&mut literal)));
            }
            let mut length = 0;
            while chars.peek() == Some(&chr) {
                chars.next();
                length += 1;
            }
            items.push(PatternItem::Field(FieldRun { chr, length }));
        } else if chr == '\'' {
            chars.next();
            if chars.peek() == Some(&'\'') {
                chars.next();
                literal.push('\'');
                continue;
            }
            let mut closed = false;
            while let Some(inner) = chars.next() {
                if inner == '\'' {
                    if chars.peek() == Some(&'\'') {
                        chars.next();
                        literal.push('\'');
                    } else {
                        closed = true;
                        break;
                    }
                } else {
                    literal.push(inner);
                }
            }
            if !closed {
                return Err(CoreError::InvalidInput("unterminated quote in pattern"));
            }
        } else {
            literal.push(chr);
            chars.next();
        }
    }
    if !literal.is_empty() {
        items.push(PatternItem::Literal(literal));
    }
    Ok(items)
}
