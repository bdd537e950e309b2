use regex::Regex;

use crate::block::Block;
use crate::parser::error::ScanError;

/// Where the next keyword search starts once a block has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    /// Right after the keyword match, so nested matches inside the body are found.
    AfterKeyword,
    /// After the closing brace, so the body is never searched.
    AfterBlock,
}

#[derive(Debug, Clone, Copy)]
enum ScanState {
    SeekingKeyword,
    SeekingBoundary {
        start: usize,
        keyword_end: usize,
    },
    InBlock {
        start: usize,
        keyword_end: usize,
        open: usize,
        pos: usize,
        depth: usize,
    },
}

/// Lazily yields the blocks introduced by `pattern` in source order.
///
/// After an unbalanced block is reported the iterator is exhausted.
pub struct BlockScanner<'t, 'p> {
    text: &'t str,
    pattern: &'p Regex,
    resume: Resume,
    file_id: usize,
    cursor: usize,
    finished: bool,
}

/// Scan `text` for `pattern` matches, descending into bodies.
pub fn scan<'t, 'p>(text: &'t str, pattern: &'p Regex, file_id: usize) -> BlockScanner<'t, 'p> {
    BlockScanner::new(text, pattern, file_id, Resume::AfterKeyword)
}

impl<'t, 'p> BlockScanner<'t, 'p> {
    pub fn new(text: &'t str, pattern: &'p Regex, file_id: usize, resume: Resume) -> Self {
        BlockScanner {
            text,
            pattern,
            resume,
            file_id,
            cursor: 0,
            finished: false,
        }
    }

    fn bodyless(&mut self, start: usize, keyword_end: usize) -> Block<'t> {
        let text = self.text;
        self.cursor = keyword_end;
        Block {
            start,
            keyword_end,
            end: keyword_end,
            header: &text[start..keyword_end],
            body: None,
        }
    }

    fn closed(&mut self, start: usize, keyword_end: usize, open: usize, close: usize) -> Block<'t> {
        let text = self.text;
        self.cursor = match self.resume {
            Resume::AfterKeyword => keyword_end,
            Resume::AfterBlock => close + 1,
        };
        Block {
            start,
            keyword_end,
            end: close + 1,
            header: &text[start..open],
            body: Some(&text[open + 1..close]),
        }
    }
}

impl<'t, 'p> Iterator for BlockScanner<'t, 'p> {
    type Item = Result<Block<'t>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let text = self.text;
        let bytes = text.as_bytes();
        let mut state = ScanState::SeekingKeyword;

        loop {
            state = match state {
                ScanState::SeekingKeyword => {
                    let found = if self.cursor <= text.len() {
                        self.pattern.find_at(text, self.cursor)
                    } else {
                        None
                    };
                    match found {
                        // An empty match would never advance the cursor.
                        Some(m) if m.end() > m.start() => ScanState::SeekingBoundary {
                            start: m.start(),
                            keyword_end: m.end(),
                        },
                        _ => {
                            self.finished = true;
                            return None;
                        }
                    }
                }

                ScanState::SeekingBoundary { start, keyword_end } => {
                    let mut pos = keyword_end;
                    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                        pos += 1;
                    }
                    if bytes.get(pos) == Some(&b'{') {
                        ScanState::InBlock {
                            start,
                            keyword_end,
                            open: pos,
                            pos: pos + 1,
                            depth: 1,
                        }
                    } else {
                        return Some(Ok(self.bodyless(start, keyword_end)));
                    }
                }

                ScanState::InBlock {
                    start,
                    keyword_end,
                    open,
                    pos,
                    depth,
                } => {
                    let Some(&byte) = bytes.get(pos) else {
                        self.finished = true;
                        return Some(Err(ScanError::unbalanced(
                            start..keyword_end,
                            depth,
                            self.file_id,
                        )));
                    };
                    let depth = match byte {
                        b'{' => depth + 1,
                        b'}' => depth - 1,
                        _ => depth,
                    };
                    if depth == 0 {
                        return Some(Ok(self.closed(start, keyword_end, open, pos)));
                    }
                    ScanState::InBlock {
                        start,
                        keyword_end,
                        open,
                        pos: pos + 1,
                        depth,
                    }
                }
            };
        }
    }
}
