use crate::decl::TypeDecl;

/// A zero-argument `void` member whose name starts with the test prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestMethod {
    pub class_name: String,
    pub name: String,
}

impl TestMethod {
    /// `ClassName::method_name`, as shown in listings and test reports.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.class_name, self.name)
    }
}

/// A type that derives, directly or transitively, from one of the root names.
///
/// Only the resolver creates these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedTestCase {
    decl: TypeDecl,
    methods: Vec<TestMethod>,
}

impl AcceptedTestCase {
    pub(crate) fn new(decl: TypeDecl, methods: Vec<TestMethod>) -> Self {
        AcceptedTestCase { decl, methods }
    }

    pub fn decl(&self) -> &TypeDecl {
        &self.decl
    }

    pub fn name(&self) -> &str {
        &self.decl.name
    }

    /// Methods in source order; duplicates are kept.
    pub fn methods(&self) -> &[TestMethod] {
        &self.methods
    }
}
