pub mod error;
mod declarations;
pub mod scanner;
mod scope_index;

pub use error::ScanError;
pub use scanner::{BlockScanner, Resume, scan};
pub use scope_index::ScopeIndex;

use crate::SourceUnit;
use crate::decl::Declarations;

/// Which extraction passes to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Class/struct declarations only.
    Types,
    /// Types plus prototype-style routine declarations.
    TypesAndRoutines,
}

/// Declaration extractor entry point.
pub struct Parser<'a> {
    unit: &'a SourceUnit,
}

impl<'a> Parser<'a> {
    pub fn new(unit: &'a SourceUnit) -> Self {
        Parser { unit }
    }

    /// Extract declarations from the source unit.
    ///
    /// Fails only when a block never closes; lines that match nothing are ignored.
    pub fn parse(&self, mode: ParseMode) -> Result<Declarations, ScanError> {
        let raw_types = declarations::extract_types(self.unit)?;

        let routines = match mode {
            ParseMode::Types => Vec::new(),
            ParseMode::TypesAndRoutines => {
                let index = ScopeIndex::new(&raw_types);
                declarations::extract_routines(self.unit, &index)?
            }
        };

        Ok(Declarations {
            types: declarations::keep_last_by_name(raw_types),
            routines,
        })
    }
}
