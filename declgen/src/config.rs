use std::path::Path;

use serde::Deserialize;

use crate::error::GenError;

/// Tool configuration, normally read from a `declscan.toml` file.
/// Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub wrappers: WrapperConfig,
    pub harness: HarnessConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WrapperConfig {
    /// Prefix for the handle type and the create/destroy functions.
    pub symbol_prefix: String,

    /// Runtime header included first by every generated source file.
    pub umbrella_header: String,

    /// File extensions (without the dot) treated as headers.
    pub header_extensions: Vec<String>,
}

impl Default for WrapperConfig {
    fn default() -> Self {
        WrapperConfig {
            symbol_prefix: "smlt_".to_string(),
            umbrella_header: "simulant/simulant.h".to_string(),
            header_extensions: vec!["h".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Base names that make a class a test case.
    pub root_names: Vec<String>,

    /// Prefix a method name must start with to be registered.
    pub test_prefix: String,

    /// Header declaring the test runner.
    pub runtime_header: String,

    /// Fully qualified runner type constructed by the generated `main`.
    pub runner_type: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            root_names: vec!["TestCase".to_string(), "SimulantTestCase".to_string()],
            test_prefix: "test_".to_string(),
            runtime_header: "simulant/test.h".to_string(),
            runner_type: "smlt::test::TestRunner".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, GenError> {
        let text = std::fs::read_to_string(path).map_err(|source| GenError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_toml(&text).map_err(|e| GenError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
