use std::path::{Path, PathBuf};

use declscan::decl::TypeDecl;
use declscan::{ParseMode, Parser};
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::WrapperConfig;
use crate::error::GenError;
use crate::{ScanFailure, load_unit, write_output};

/// Names derived from one class for its C-linkage wrapper.
struct WrapperNames {
    /// `smlt_widget_t`
    handle: String,
    /// `smlt_widget`
    function_prefix: String,
    /// `widget`
    variable: String,
}

impl WrapperNames {
    fn new(decl: &TypeDecl, config: &WrapperConfig) -> Self {
        let lower = decl.name.to_lowercase();
        let function_prefix = format!("{}{}", config.symbol_prefix, lower);
        WrapperNames {
            handle: format!("{}_t", function_prefix),
            function_prefix,
            variable: lower,
        }
    }
}

/// The `extern "C"` header declaring an opaque handle and create/destroy
/// functions for every type.
pub fn emit_header(types: &[TypeDecl], config: &WrapperConfig) -> String {
    let mut lines: Vec<String> = vec![
        "#pragma once".into(),
        String::new(),
        "#ifdef __cplusplus".into(),
        "extern \"C\" {".into(),
        "#endif".into(),
        String::new(),
    ];

    for decl in types {
        let names = WrapperNames::new(decl, config);
        lines.push(format!("struct {};", names.handle));
        lines.push(String::new());
        lines.push(format!("{}* {}_create();", names.handle, names.function_prefix));
        lines.push(format!(
            "{handle}* {prefix}_destroy({handle}* {var});",
            handle = names.handle,
            prefix = names.function_prefix,
            var = names.variable
        ));
        lines.push(String::new());
    }

    lines.push("#ifdef __cplusplus".to_string());
    lines.push("}".to_string());
    lines.push("#endif".to_string());
    lines.push(String::new());
    lines.join("\n")
}

/// The companion source defining each factory. Destroy functions are declared
/// only; their bodies are left to the caller.
pub fn emit_source(types: &[TypeDecl], relative_header: &Path, config: &WrapperConfig) -> String {
    let mut lines: Vec<String> = vec![
        format!("#include <{}>", config.umbrella_header),
        format!("#include \"./{}\"", slash_path(relative_header)),
    ];

    for decl in types {
        let names = WrapperNames::new(decl, config);
        lines.push(String::new());
        lines.push(format!("{}* {}_create() {{", names.handle, names.function_prefix));
        lines.push(format!("    return new {}();", decl.name));
        lines.push("}".to_string());
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Outcome of a wrapper generation run.
#[derive(Debug, Default)]
pub struct WrapperReport {
    /// Every file written, in walk order.
    pub generated: Vec<PathBuf>,
    pub failures: Vec<ScanFailure>,
}

/// Walk `src` for headers and write a `.h`/`.cpp` wrapper pair for each one
/// under the same relative path in `dest`.
pub fn generate_tree(src: &Path, dest: &Path, config: &WrapperConfig) -> Result<WrapperReport, GenError> {
    let mut report = WrapperReport::default();

    let walker = WalkDir::new(src).sort_by_file_name();
    for (file_id, entry) in walker.into_iter().enumerate() {
        let entry = entry.map_err(|source| GenError::Walk {
            path: src.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() || !is_header(entry.path(), config) {
            continue;
        }

        let unit = load_unit(entry.path(), file_id)?;
        let parsed = Parser::new(&unit).parse(ParseMode::TypesAndRoutines);
        let decls = match parsed {
            Ok(decls) => decls,
            Err(error) => {
                warn!("skipping {}: {}", unit.path.display(), error);
                report.failures.push(ScanFailure { unit, error });
                continue;
            }
        };

        for routine in decls.routines.iter().filter(|r| r.is_file_scope()) {
            debug!(
                "{}:{}: free function {} {}({})",
                unit.path.display(),
                routine.line,
                routine.return_type,
                routine.name,
                routine.params
            );
        }

        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let header_path = dest.join(relative).with_extension("h");
        let source_path = header_path.with_extension("cpp");

        write_output(&header_path, &emit_header(&decls.types, config))?;
        write_output(&source_path, &emit_source(&decls.types, relative, config))?;
        info!(
            "processed {} ({} types) -> {}",
            unit.path.display(),
            decls.types.len(),
            header_path.display()
        );

        report.generated.push(header_path);
        report.generated.push(source_path);
    }

    Ok(report)
}

fn is_header(path: &Path, config: &WrapperConfig) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| config.header_extensions.iter().any(|h| h == ext))
}

fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
