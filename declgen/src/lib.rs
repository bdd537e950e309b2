pub mod config;
pub mod error;
pub mod harness;
pub mod wrapper;

use std::path::Path;

use declscan::{ScanError, SourceUnit};
use log::debug;

pub use config::{Config, HarnessConfig, WrapperConfig};
pub use error::GenError;

/// A file that was skipped because it could not be scanned.
#[derive(Debug, Clone)]
pub struct ScanFailure {
    pub unit: SourceUnit,
    pub error: ScanError,
}

/// Write a generated file in one call, creating parent directories first.
pub fn write_output(path: &Path, contents: &str) -> Result<(), GenError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| GenError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, contents).map_err(|source| GenError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

pub(crate) fn load_unit(path: &Path, file_id: usize) -> Result<SourceUnit, GenError> {
    SourceUnit::load(path, file_id).map_err(|source| GenError::Read {
        path: path.to_path_buf(),
        source,
    })
}
