use std::ops::Range;

/// A span found by the block scanner: the keyword match plus, unless the
/// match was followed by something other than `{`, a brace-balanced body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    /// Byte offset where the keyword match starts.
    pub start: usize,
    /// Byte offset just past the keyword match.
    pub keyword_end: usize,
    /// Byte offset just past the closing `}`; equals `keyword_end` when bodyless.
    pub end: usize,
    /// Everything from `start` up to the opening `{` (or the keyword text alone).
    pub header: &'a str,
    /// Text strictly between the braces.
    pub body: Option<&'a str>,
}

impl<'a> Block<'a> {
    pub fn is_bodyless(&self) -> bool {
        self.body.is_none()
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Byte range of the body, excluding both braces.
    pub fn body_span(&self) -> Option<Range<usize>> {
        self.body.map(|body| {
            let close = self.end - 1;
            close - body.len()..close
        })
    }
}
