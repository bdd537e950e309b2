use regex::Regex;

use crate::decl::{TestMethod, TypeDecl};

/// Finds test methods in a type body.
///
/// Nested `{...}` regions are collapsed to `;` first, so inline definitions and
/// bare prototypes look the same and members of nested types are not picked up.
#[derive(Debug, Clone)]
pub struct Harvester {
    pattern: Regex,
}

impl Harvester {
    pub fn new(prefix: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"\bvoid\s+({}\w*)\s*\(\s*(?:void)?\s*\)\s*(?:const\s*)?(?:noexcept\s*)?(?:override\s*)?(?:final\s*)?;",
            regex::escape(prefix)
        ))?;
        Ok(Harvester { pattern })
    }

    /// Test methods of `decl` in source order. Duplicate names are kept.
    pub fn harvest(&self, decl: &TypeDecl) -> Vec<TestMethod> {
        let flattened = collapse_nested_bodies(&decl.body);
        self.pattern
            .captures_iter(&flattened)
            .map(|caps| TestMethod {
                class_name: decl.name.clone(),
                name: caps[1].to_string(),
            })
            .collect()
    }
}

/// Replace every top-level `{...}` region in `body` with a single `;`.
fn collapse_nested_bodies(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut depth = 0usize;
    for c in body.chars() {
        match c {
            '{' => {
                if depth == 0 {
                    out.push(';');
                }
                depth += 1;
            }
            '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}
