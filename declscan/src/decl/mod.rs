pub mod test_case;

use std::ops::Range;
use std::path::PathBuf;

pub use test_case::{AcceptedTestCase, TestMethod};

/// Which keyword introduced a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKeyword {
    Class,
    Struct,
}

impl TypeKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKeyword::Class => "class",
            TypeKeyword::Struct => "struct",
        }
    }
}

/// A class or struct with a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub keyword: TypeKeyword,
    /// Declared name, always an identifier.
    pub name: String,
    /// Base names in declaration order, without access qualifiers or whitespace.
    /// `::` qualification is kept verbatim.
    pub bases: Vec<String>,
    /// Path of the declaring file.
    pub path: PathBuf,
    pub file_id: usize,
    /// 1-based line of the keyword.
    pub line: usize,
    /// Byte span from the keyword to just past the closing brace.
    pub span: Range<usize>,
    /// Byte span of the body, excluding braces.
    pub body_span: Range<usize>,
    pub body: String,
}

impl TypeDecl {
    pub fn has_bases(&self) -> bool {
        !self.bases.is_empty()
    }

    /// Base names reduced to their trailing identifier (`a::b::C<T>` -> `C`).
    pub fn unqualified_bases(&self) -> impl Iterator<Item = &str> {
        self.bases.iter().map(|base| unqualified(base))
    }
}

/// Strip template arguments and namespace qualification from a type name.
pub fn unqualified(name: &str) -> &str {
    let name = name.split('<').next().unwrap_or(name);
    name.rsplit("::").next().unwrap_or(name).trim()
}

/// Where a prototype was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineScope {
    File,
    /// Declared inside the body of the named type.
    Type(String),
}

/// A function prototype (declaration terminated by `;`, no body).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineDecl {
    pub name: String,
    pub return_type: String,
    /// Raw text between the parentheses.
    pub params: String,
    pub scope: RoutineScope,
    /// Byte offset of the start of the declaration.
    pub offset: usize,
    /// 1-based source line.
    pub line: usize,
}

impl RoutineDecl {
    pub fn is_file_scope(&self) -> bool {
        self.scope == RoutineScope::File
    }
}

/// Everything extracted from one source unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    /// Types in declaration order; a later type with the same name replaces an
    /// earlier one.
    pub types: Vec<TypeDecl>,
    /// Prototypes in source order. Empty unless routines were requested.
    pub routines: Vec<RoutineDecl>,
}

impl Declarations {
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.routines.is_empty()
    }
}
