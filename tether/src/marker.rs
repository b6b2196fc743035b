//! The marker protocol: how a slot index is written into markup and found again.
//!
//! An inline marker looks like `---!{3}!---`. The delimiters are unlikely in
//! hand-written markup and cannot form an attribute name. When a slot has no
//! value at compile time the marker is wrapped in a comment instead,
//! `<!-- ---!{3}!--- -->`, so the position survives in the tree without
//! producing visible text.
//!
//! There is no escape for the delimiters. A literal [`OPEN`] in a template's
//! static text runs up to the next [`CLOSE`], usually the one ending the
//! following marker, and the merged token is rejected as malformed when the
//! template renders. Values are never scanned, so they may contain anything.
//!
//! Every function here is pure. Scanning keeps no state between calls.

use core::fmt;
use core::ops::Range;

/// Opening delimiter of a marker.
pub const OPEN: &str = "---!{";

/// Closing delimiter of a marker.
pub const CLOSE: &str = "}!---";

/// Write the inline marker for `index`.
pub fn encode(index: usize) -> String {
    format!("{OPEN}{index}{CLOSE}")
}

/// Write the comment-wrapped marker for `index`, as it appears in markup.
pub fn encode_anchor(index: usize) -> String {
    format!("<!-- {} -->", encode(index))
}

/// Recover the slot index from a token produced by [`encode`].
///
/// Returns `None` for anything that is not exactly one well-formed marker.
pub fn decode(token: &str) -> Option<usize> {
    let body = token.strip_prefix(OPEN)?.strip_suffix(CLOSE)?;
    parse_index(body)
}

fn parse_index(body: &str) -> Option<usize> {
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    body.parse().ok()
}

/// True if `text` contains at least one marker-shaped token.
///
/// Marker-shaped means the delimiters match; the body between them need not
/// be a valid index.
pub fn is_marker(text: &str) -> bool {
    scan(text).next().is_some()
}

/// A marker-shaped token found by [`scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found<'a> {
    /// Byte range of the whole token in the scanned text.
    pub range: Range<usize>,
    /// The text between the delimiters.
    pub body: &'a str,
}

impl Found<'_> {
    /// The slot index, if the body is a valid index.
    pub fn index(&self) -> Option<usize> {
        parse_index(self.body)
    }
}

/// Iterator over marker-shaped tokens in a text, left to right.
#[derive(Debug, Clone)]
pub struct Scan<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Scan<'a> {
    type Item = Found<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.pos..];
        let open = rest.find(OPEN)?;
        let body_start = self.pos + open + OPEN.len();
        let close = self.text[body_start..].find(CLOSE)?;
        let body_end = body_start + close;
        let end = body_end + CLOSE.len();
        let found = Found {
            range: self.pos + open..end,
            body: &self.text[body_start..body_end],
        };
        self.pos = end;
        Some(found)
    }
}

/// Find every marker-shaped token in `text`, left to right, duplicates kept.
pub fn scan(text: &str) -> Scan<'_> {
    Scan { text, pos: 0 }
}

/// A marker-shaped token whose body is not a slot index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerError {
    /// The offending token.
    pub token: String,
}

impl fmt::Display for MarkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed marker `{}`", self.token)
    }
}

impl std::error::Error for MarkerError {}

/// The slot indices referenced by `text`, in order of appearance.
pub fn indices(text: &str) -> Result<Vec<usize>, MarkerError> {
    scan(text)
        .map(|found| {
            found.index().ok_or_else(|| MarkerError {
                token: text[found.range.clone()].to_string(),
            })
        })
        .collect()
}

/// Replace every marker in `text` with whatever `value` returns for its index.
///
/// Tokens that do not decode are left untouched.
pub fn substitute<F, S>(text: &str, mut value: F) -> String
where
    F: FnMut(usize) -> S,
    S: AsRef<str>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for found in scan(text) {
        let Some(index) = found.index() else {
            continue;
        };
        out.push_str(&text[last..found.range.start]);
        out.push_str(value(index).as_ref());
        last = found.range.end;
    }
    out.push_str(&text[last..]);
    out
}

/// True if an attribute name is written in bracket notation, e.g. `[value]`,
/// meaning "bind as a direct property".
pub fn is_property_binding(name: &str) -> bool {
    name.len() >= 2 && name.starts_with('[') && name.ends_with(']')
}

/// The attribute name with all bracket decoration removed.
pub fn clean_name(name: &str) -> String {
    name.replace(['[', ']'], "")
}

/// Prefix marking an attribute as an event binding.
pub const EVENT_PREFIX: char = '@';

/// The event kind an attribute binds, with the first `@` removed.
pub fn event_name(name: &str) -> String {
    name.replacen(EVENT_PREFIX, "", 1)
}
