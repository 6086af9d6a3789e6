//! Client projection grammar.
//!
//! Clients request a projection with a compact pipe/bracket string: a
//! sequence of pipe-separated field names, where any name may be followed
//! by a bracketed sub-sequence of the same grammar for that field's nested
//! projection.
//!
//! ```text
//! username|profile[id|lastname]|phone_numbers
//! ```
//!
//! Parsing scans for top-level bracket pairs, recovers the field name
//! immediately preceding each one, recurses into the bracket contents, and
//! blanks the consumed span so the remainder can be split on `|` into flat
//! sibling fields.

use atlas_core::FieldSpecTree;

use crate::error::ExposeError;

/// Placeholder written over consumed spans; outside the grammar charset so
/// it can be stripped before the final split.
const BLANK: char = '\0';

/// Parses a projection string into a [`FieldSpecTree`].
///
/// # Errors
///
/// Returns [`ExposeError::InvalidSyntax`] when the input contains a
/// character outside `[A-Za-z0-9_\[\]|]` or its brackets are unbalanced.
///
/// # Example
///
/// ```
/// use atlas_expose::parse_projection;
///
/// let tree = parse_projection("username|profile[id|lastname]|phone_numbers").unwrap();
/// assert!(tree.has_field("username"));
/// assert!(tree.has_field("phone_numbers"));
/// assert!(tree.child("profile").unwrap().has_field("lastname"));
/// ```
pub fn parse_projection(input: &str) -> Result<FieldSpecTree, ExposeError> {
    validate(input)?;
    Ok(parse_level(input))
}

fn validate(input: &str) -> Result<(), ExposeError> {
    let mut depth: i64 = 0;
    for c in input.chars() {
        if !(c.is_ascii_alphanumeric() || matches!(c, '_' | '[' | ']' | '|')) {
            return Err(ExposeError::invalid_syntax(format!(
                "unexpected character '{c}'"
            )));
        }
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth < 0 {
                    return Err(ExposeError::invalid_syntax("unbalanced brackets"));
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(ExposeError::invalid_syntax("unbalanced brackets"));
    }
    Ok(())
}

fn parse_level(input: &str) -> FieldSpecTree {
    let mut buf: Vec<char> = input.trim_matches('|').chars().collect();
    let mut tree = FieldSpecTree::new();

    while let Some((open, close)) = top_level_pair(&buf) {
        if open + 1 == close {
            // `field[]` is swallowed as a no-op rather than rejected; the
            // bare field name survives into the flat split below.
            blank(&mut buf, open, close);
            continue;
        }

        // Walk back from the bracket to the nearest delimiter to recover
        // the tag name.
        let mut start = open;
        while start > 0 && !is_delimiter(buf[start - 1]) {
            start -= 1;
        }
        let tag: String = buf[start..open].iter().collect();
        let contents: String = buf[open + 1..close].iter().collect();
        blank(&mut buf, start, close);

        if tag.is_empty() {
            // A bracket with no preceding field name grants nothing.
            continue;
        }
        tree.add_child(tag, parse_level(&contents));
    }

    let remaining: String = buf.iter().filter(|&&c| c != BLANK).collect();
    for part in remaining.split('|').filter(|s| !s.is_empty()) {
        tree.add_field(part);
    }
    tree
}

/// Finds the first top-level bracket pair: the `[` taking depth 0 to 1 and
/// the `]` bringing it back to 0. Nested pairs inside are left for the
/// recursion on the extracted contents.
fn top_level_pair(buf: &[char]) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut open = None;
    for (i, &c) in buf.iter().enumerate() {
        match c {
            '[' => {
                if depth == 0 {
                    open = Some(i);
                }
                depth += 1;
            }
            ']' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Some((open?, i));
                }
            }
            _ => {}
        }
    }
    None
}

fn blank(buf: &mut [char], start: usize, end: usize) {
    for slot in &mut buf[start..=end] {
        *slot = BLANK;
    }
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '|' | '[' | ']') || c == BLANK
}
