//! Ordered tag-sequence matcher
//!
//! Model replies look like XML but are not guaranteed to be well formed, so
//! they are never handed to an XML parser. Instead each block is described
//! by a [`TagPattern`]: literal tags separated by lazy spans.
//!
//! ```text
//! <hook> SKIP <score> LINE </score> SKIP <what_works> ANY </what_works> SKIP </hook>
//! ```
//!
//! Matching rules:
//!
//! - Leftmost-first: occurrences of the opening tag are tried in document
//!   order and the first complete match wins.
//! - Lazy spans: at every span the nearest occurrence of the following tag
//!   is tried first, falling back to later occurrences (backtracking).
//! - [`Span::Line`] may not cross a line terminator; skips and
//!   [`Span::Any`] captures may cross anything, including other tags.
//! - The whole sequence must match. There is no partial result.
//!
//! Failed `(element, offset)` states are remembered for the duration of a
//! search, so hostile input with many repeated tags stays polynomial.

use std::collections::HashSet;

/// Text a capture is allowed to cover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    /// Anything, including line breaks
    Any,
    /// A single line: no `\n`, `\r`, U+2028 or U+2029
    Line,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Element {
    Tag(String),
    Skip,
    Capture(Span),
}

/// A fixed sequence of tags, skips and captures
///
/// Patterns must start with a tag and every skip or capture must be
/// followed by a tag. Any other shape never matches.
#[derive(Debug, Clone, Default)]
pub struct TagPattern {
    elements: Vec<Element>,
}

impl TagPattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a literal tag, e.g. `"<score>"`
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.elements.push(Element::Tag(tag.into()));
        self
    }

    /// Append a lazy span whose text is discarded
    pub fn skip(mut self) -> Self {
        self.elements.push(Element::Skip);
        self
    }

    /// Append a lazy span whose text is returned by [`TagPattern::find`]
    pub fn capture(mut self, span: Span) -> Self {
        self.elements.push(Element::Capture(span));
        self
    }

    /// Number of captures a successful match returns
    pub fn capture_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, Element::Capture(_)))
            .count()
    }

    /// Find the first match in `text` and return its captures in order
    pub fn find<'t>(&self, text: &'t str) -> Option<Vec<&'t str>> {
        let Some(Element::Tag(open)) = self.elements.first() else {
            return None;
        };

        let mut matcher = Matcher {
            elements: &self.elements,
            text,
            captures: Vec::with_capacity(self.capture_count()),
            failed: HashSet::new(),
        };

        // Tags start with '<' and contain no other '<', so occurrences never overlap
        for (start, _) in text.match_indices(open.as_str()) {
            if matcher.match_at(1, start + open.len()) {
                return Some(matcher.captures);
            }
        }

        None
    }
}

struct Matcher<'p, 't> {
    elements: &'p [Element],
    text: &'t str,
    captures: Vec<&'t str>,
    failed: HashSet<(usize, usize)>,
}

impl<'p, 't> Matcher<'p, 't> {
    /// Match `elements[index..]` starting at byte offset `pos`
    fn match_at(&mut self, index: usize, pos: usize) -> bool {
        let elements = self.elements;
        let Some(element) = elements.get(index) else {
            return true;
        };

        if self.failed.contains(&(index, pos)) {
            return false;
        }

        let matched = match element {
            Element::Tag(tag) => {
                self.text[pos..].starts_with(tag.as_str())
                    && self.match_at(index + 1, pos + tag.len())
            }
            Element::Skip => self.match_span(index, pos, Span::Any, false),
            Element::Capture(span) => self.match_span(index, pos, *span, true),
        };

        if !matched {
            self.failed.insert((index, pos));
        }
        matched
    }

    fn match_span(&mut self, index: usize, pos: usize, span: Span, capture: bool) -> bool {
        let elements = self.elements;
        let Some(Element::Tag(next)) = elements.get(index + 1) else {
            return false;
        };

        let text = self.text;
        let rest = &text[pos..];
        let limit = match span {
            Span::Any => rest.len(),
            Span::Line => rest.find(is_line_terminator).unwrap_or(rest.len()),
        };

        for (offset, _) in rest.match_indices(next.as_str()) {
            if offset > limit {
                break;
            }
            if capture {
                self.captures.push(&rest[..offset]);
            }
            if self.match_at(index + 1, pos + offset) {
                return true;
            }
            if capture {
                self.captures.pop();
            }
        }

        false
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
