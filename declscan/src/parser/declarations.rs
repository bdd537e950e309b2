use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::SourceUnit;
use crate::decl::{RoutineDecl, RoutineScope, TypeDecl, TypeKeyword};
use crate::line_of;
use crate::parser::error::ScanError;
use crate::parser::scanner::{BlockScanner, Resume, scan};
use crate::parser::scope_index::ScopeIndex;

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// `class Name [final] [: base-list]`. The base list stops before `{`, `}` or `;`
/// outside of comments.
static TYPE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\b(class|struct)\s+([A-Za-z_]\w*)(?:\s+final)?",
        r"(?:\s*:\s*((?:::)?",
        r"(?:[^:{};/]|//[^\n]*|/\*(?s:.*?)\*/)",
        r"(?:[^{};/]|//[^\n]*|/\*(?s:.*?)\*/)*))?",
    ))
    .expect("invalid type pattern")
});

/// Line and block comments, removed from base lists before splitting.
static COMMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"//[^\n]*|/\*(?s:.*?)\*/").expect("invalid comment pattern"));

/// A prototype-shaped line: optional template/specifier prefix, return type,
/// name, parameter list and trailing qualifiers. The terminator is checked by
/// the caller so definitions can be told apart from prototypes.
static ROUTINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*",
        r"(?:(?:public|private|protected)[ \t]*:[ \t]*)?",
        r"(?:template[ \t]*<[^>]*>\s*)?",
        r"(?:(?:inline|constexpr|static|virtual|explicit|extern|friend)[ \t]+)*",
        r"([A-Za-z_][\w:<>,]*(?:[ \t]+[\w:<>,*&]+)*?)",
        r"([ \t*&]+)",
        r"([A-Za-z_]\w*)",
        r"[ \t]*\(([^;{}]*)\)",
        r"[ \t]*(?:const[ \t]*)?(?:noexcept[ \t]*)?(?:override[ \t]*)?(?:final[ \t]*)?",
        r"(?:=[ \t]*(?:0|default|delete)[ \t]*)?",
    ))
    .expect("invalid routine pattern")
});

/// Leading words that make a prototype-shaped line a statement instead.
const STATEMENT_WORDS: &[&str] = &[
    "return", "else", "new", "delete", "throw", "case", "goto", "typedef", "using", "do",
    "co_return", "co_yield", "co_await",
];

/// Names that are control keywords or operators, never routines.
const RESERVED_NAMES: &[&str] = &[
    "if", "while", "for", "switch", "return", "sizeof", "alignof", "catch", "decltype",
    "static_assert", "defined",
];

// ---------------------------------------------------------------------------
// Type pass
// ---------------------------------------------------------------------------

/// Every class/struct with a body, in source order, duplicates included.
pub(crate) fn extract_types(unit: &SourceUnit) -> Result<Vec<TypeDecl>, ScanError> {
    let text = unit.text.as_str();
    let mut types = Vec::new();

    for block in scan(text, &TYPE_PATTERN, unit.file_id) {
        let block = block?;

        // Forward declarations and template parameters have no body.
        let (Some(body), Some(body_span)) = (block.body, block.body_span()) else {
            continue;
        };
        if preceded_by_enum(text, block.start) {
            continue;
        }
        let Some(caps) = TYPE_PATTERN.captures_at(text, block.start) else {
            continue;
        };

        let keyword = match &caps[1] {
            "struct" => TypeKeyword::Struct,
            _ => TypeKeyword::Class,
        };
        let bases = caps.get(3).map(|m| parse_bases(m.as_str())).unwrap_or_default();

        types.push(TypeDecl {
            keyword,
            name: caps[2].to_string(),
            bases,
            path: unit.path.clone(),
            file_id: unit.file_id,
            line: line_of(text, block.start),
            span: block.span(),
            body_span,
            body: body.to_string(),
        });
    }

    Ok(types)
}

/// Collapse duplicate names so the last declaration wins.
pub(crate) fn keep_last_by_name(types: Vec<TypeDecl>) -> Vec<TypeDecl> {
    let mut seen = HashSet::new();
    let mut kept: Vec<TypeDecl> = types
        .into_iter()
        .rev()
        .filter(|t| seen.insert(t.name.clone()))
        .collect();
    kept.reverse();
    kept
}

fn preceded_by_enum(text: &str, start: usize) -> bool {
    let before = text[..start].trim_end();
    match before.strip_suffix("enum") {
        Some(rest) => !rest.ends_with(|c: char| c.is_alphanumeric() || c == '_'),
        None => false,
    }
}

/// Split a base list at top-level commas and strip comments and access
/// qualifiers.
fn parse_bases(list: &str) -> Vec<String> {
    let list = COMMENT_PATTERN.replace_all(list, " ");
    let mut bases = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for c in list.chars() {
        match c {
            '<' | '(' => depth += 1,
            '>' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                push_base(&mut bases, &current);
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    push_base(&mut bases, &current);
    bases
}

fn push_base(bases: &mut Vec<String>, raw: &str) {
    let name: String = raw
        .split_whitespace()
        .filter(|word| !matches!(*word, "public" | "private" | "protected" | "virtual"))
        .collect();
    if !name.is_empty() {
        bases.push(name);
    }
}

// ---------------------------------------------------------------------------
// Routine pass
// ---------------------------------------------------------------------------

/// Prototype declarations in source order, attributed to their enclosing type.
///
/// Definitions are skipped together with their bodies.
pub(crate) fn extract_routines(
    unit: &SourceUnit,
    index: &ScopeIndex,
) -> Result<Vec<RoutineDecl>, ScanError> {
    let text = unit.text.as_str();
    let mut routines = Vec::new();

    let scanner = BlockScanner::new(text, &ROUTINE_PATTERN, unit.file_id, Resume::AfterBlock);
    for block in scanner {
        let block = block?;
        if !block.is_bodyless() || !text[block.keyword_end..].trim_start().starts_with(';') {
            continue;
        }
        let Some(caps) = ROUTINE_PATTERN.captures_at(text, block.start) else {
            continue;
        };

        let (Some(return_type), Some(sep), Some(name), Some(params)) =
            (caps.get(1), caps.get(2), caps.get(3), caps.get(4))
        else {
            continue;
        };

        let leading = return_type.as_str().split_whitespace().next().unwrap_or("");
        if STATEMENT_WORDS.contains(&leading)
            || RESERVED_NAMES.contains(&name.as_str())
            || is_conversion_operator(return_type.as_str())
        {
            continue;
        }

        let offset = return_type.start();
        let scope = match index.owner_of(offset) {
            Some(owner) => RoutineScope::Type(owner.to_string()),
            None => RoutineScope::File,
        };

        routines.push(RoutineDecl {
            name: name.as_str().to_string(),
            return_type: format!("{}{}", return_type.as_str().trim(), sep.as_str().trim()),
            params: params.as_str().trim().to_string(),
            scope,
            offset,
            line: line_of(text, offset),
        });
    }

    Ok(routines)
}

/// `operator bool()` and `Foo::operator int()` look like a return type
/// followed by a name.
fn is_conversion_operator(return_type: &str) -> bool {
    return_type
        .split_whitespace()
        .any(|word| word == "operator" || word.ends_with("::operator"))
}
