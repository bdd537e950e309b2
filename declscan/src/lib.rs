pub mod block;
pub mod decl;
pub mod harvest;
pub mod parser;
pub mod resolve;

use std::io;
use std::path::{Path, PathBuf};

use log::warn;

pub use decl::{AcceptedTestCase, Declarations, RoutineDecl, RoutineScope, TestMethod, TypeDecl};
pub use parser::{ParseMode, Parser, ScanError};
pub use resolve::Resolver;

/// One input file. The text is never modified after loading.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub text: String,
    /// The file ID used for error reporting with codespan-reporting.
    pub file_id: usize,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>, file_id: usize) -> Self {
        SourceUnit {
            path: path.into(),
            text: text.into(),
            file_id,
        }
    }

    /// Read a file from disk. Bytes that are not valid UTF-8 are replaced with
    /// U+FFFD, so a stray Latin-1 comment never makes a header unreadable.
    pub fn load(path: &Path, file_id: usize) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                warn!("{} is not valid UTF-8; decoding lossily", path.display());
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        Ok(SourceUnit::new(path, text, file_id))
    }
}

/// Convert a byte offset into a 1-based line number.
pub(crate) fn line_of(source: &str, offset: usize) -> usize {
    source.as_bytes()[..offset.min(source.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}
