use std::ops::Range;

use crate::decl::TypeDecl;

#[derive(Debug, Clone)]
struct ScopeSpan {
    body: Range<usize>,
    owner: String,
    /// Index of the innermost span enclosing this one.
    parent: Option<usize>,
}

/// Interval-containment index over type bodies.
///
/// Brace matching guarantees the bodies are either nested or disjoint, so the
/// innermost body containing an offset is found by a binary search followed by
/// a walk up the parent chain.
#[derive(Debug, Clone, Default)]
pub struct ScopeIndex {
    spans: Vec<ScopeSpan>,
}

impl ScopeIndex {
    pub fn new(types: &[TypeDecl]) -> Self {
        let mut spans: Vec<ScopeSpan> = types
            .iter()
            .map(|t| ScopeSpan {
                body: t.body_span.clone(),
                owner: t.name.clone(),
                parent: None,
            })
            .collect();
        spans.sort_by(|a, b| {
            a.body
                .start
                .cmp(&b.body.start)
                .then(b.body.end.cmp(&a.body.end))
        });

        let mut open: Vec<usize> = Vec::new();
        for i in 0..spans.len() {
            while let Some(&top) = open.last() {
                if spans[top].body.end <= spans[i].body.start {
                    open.pop();
                } else {
                    break;
                }
            }
            spans[i].parent = open.last().copied();
            open.push(i);
        }

        ScopeIndex { spans }
    }

    /// Name of the innermost type whose body strictly contains `offset`.
    pub fn owner_of(&self, offset: usize) -> Option<&str> {
        let after = self.spans.partition_point(|s| s.body.start <= offset);
        let mut current = after.checked_sub(1);
        while let Some(i) = current {
            let span = &self.spans[i];
            if offset < span.body.end {
                return Some(&span.owner);
            }
            current = span.parent;
        }
        None
    }
}
