use std::collections::BTreeSet;
use std::path::PathBuf;

use declscan::decl::TypeDecl;
use declscan::{AcceptedTestCase, ParseMode, Parser, Resolver, SourceUnit};
use log::{debug, warn};

use crate::config::HarnessConfig;
use crate::error::GenError;
use crate::{ScanFailure, load_unit};

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

const PRELUDE_TEMPLATE: &str = r#"#include <functional>
#include <memory>
#include <map>

#ifdef __DREAMCAST__
#include <kos.h>
KOS_INIT_FLAGS(INIT_DEFAULT | INIT_MALLOCSTATS | INIT_NET);
#endif

#include "@RUNTIME_HEADER@"

@INCLUDES@


std::map<std::string, std::string> parse_args(int argc, char* argv[]) {
    std::map<std::string, std::string> ret;

    for(int i = 1; i < argc; ++i) {
        std::string arg = argv[i];

        auto eq = arg.find('=');
        if(eq != std::string::npos && arg[0] == '-' && arg[1] == '-') {
            auto key = std::string(arg.begin(), arg.begin() + eq);
            auto value = std::string(arg.begin() + eq + 1, arg.end());
            ret[key] = value;
        } else if(arg[0] == '-' && arg[1] == '-') {
            auto key = arg;
            if(i < (argc - 1)) {
                auto value = argv[++i];
                ret[key] = value;
            } else {
                ret[key] = "";
            }
        } else {
            ret[arg] = "";  // Positional, not key=value
        }
    }

    return ret;
}
"#;

const MAIN_TEMPLATE: &str = r#"
int main(int argc, char* argv[]) {
    auto runner = std::make_shared<@RUNNER_TYPE@>();

    auto args = parse_args(argc, argv);

    std::string junit_xml;
    auto junit_xml_it = args.find("--junit-xml");
    if(junit_xml_it != args.end()) {
        junit_xml = junit_xml_it->second;
        std::cout << "    Outputting junit XML to: " << junit_xml << std::endl;
        args.erase(junit_xml_it);
    }

    std::string test_case;
    if(args.size()) {
        test_case = args.begin()->first;
    }
@REGISTRATIONS@

    return runner->run(test_case, junit_xml);
}
"#;

const EMPTY_MAIN_TEMPLATE: &str = r#"
int main(int argc, char* argv[]) {
    auto args = parse_args(argc, argv);
    (void) args;

    return 0;
}
"#;

const REGISTER_TEMPLATE: &str = r#"
    runner->register_case<@CLASS@>(
        std::vector<void (@CLASS@::*)()>({@MEMBERS@}),
        {@NAMES@}
    );"#;

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Result of scanning the test sources.
#[derive(Debug, Default)]
pub struct HarnessScan {
    /// Accepted test cases in resolver acceptance order.
    pub cases: Vec<AcceptedTestCase>,
    pub failures: Vec<ScanFailure>,
}

/// Scan every file, resolve test cases across all of them and harvest their
/// test methods. Files that fail to scan are skipped and reported.
pub fn discover(files: &[PathBuf], config: &HarnessConfig) -> Result<HarnessScan, GenError> {
    let units = files
        .iter()
        .enumerate()
        .map(|(file_id, path)| load_unit(path, file_id))
        .collect::<Result<Vec<_>, _>>()?;
    discover_units(units, config)
}

/// Same as [`discover`], for sources that are already in memory.
pub fn discover_units(units: Vec<SourceUnit>, config: &HarnessConfig) -> Result<HarnessScan, GenError> {
    let resolver = Resolver::new(config.root_names.iter().cloned(), &config.test_prefix)?;
    let mut scan = HarnessScan::default();
    let mut types: Vec<TypeDecl> = Vec::new();

    for unit in units {
        let parsed = Parser::new(&unit).parse(ParseMode::Types);
        match parsed {
            Ok(decls) => {
                if decls.types.is_empty() {
                    warn!("{} declares no classes", unit.path.display());
                }
                for decl in &decls.types {
                    debug!(
                        "found {} {} : [{}] in {}",
                        decl.keyword.as_str(),
                        decl.name,
                        decl.bases.join(", "),
                        unit.path.display()
                    );
                }
                types.extend(decls.types);
            }
            Err(error) => {
                warn!("skipping {}: {}", unit.path.display(), error);
                scan.failures.push(ScanFailure { unit, error });
            }
        }
    }

    scan.cases = resolver.resolve(&types);
    if scan.cases.is_empty() {
        warn!("no test cases found; the generated harness will be empty");
    }
    Ok(scan)
}

/// `ClassName::method_name` for every test, in registration order.
pub fn list_tests(cases: &[AcceptedTestCase]) -> Vec<String> {
    cases
        .iter()
        .flat_map(|case| case.methods())
        .map(|method| method.qualified_name())
        .collect()
}

// ---------------------------------------------------------------------------
// Emission
// ---------------------------------------------------------------------------

/// Render the complete harness program.
pub fn emit_harness(cases: &[AcceptedTestCase], config: &HarnessConfig) -> String {
    let includes: BTreeSet<String> = cases
        .iter()
        .map(|case| case.decl().path.to_string_lossy().replace('\\', "/"))
        .collect();
    let includes: Vec<String> = includes
        .iter()
        .map(|path| format!("#include \"{}\"", path))
        .collect();

    let mut out = PRELUDE_TEMPLATE
        .replace("@RUNTIME_HEADER@", &config.runtime_header)
        .replace("@INCLUDES@", &includes.join("\n"));

    if cases.is_empty() {
        out.push_str(EMPTY_MAIN_TEMPLATE);
        return out;
    }

    let registrations: Vec<String> = cases.iter().map(render_registration).collect();
    out.push_str(
        &MAIN_TEMPLATE
            .replace("@RUNNER_TYPE@", &config.runner_type)
            .replace("@REGISTRATIONS@", &registrations.join("\n")),
    );
    out
}

fn render_registration(case: &AcceptedTestCase) -> String {
    let class = case.name();
    let members: Vec<String> = case
        .methods()
        .iter()
        .map(|m| format!("&{}::{}", class, m.name))
        .collect();
    let names: Vec<String> = case
        .methods()
        .iter()
        .map(|m| format!("\"{}\"", m.qualified_name()))
        .collect();

    REGISTER_TEMPLATE
        .replace("@CLASS@", class)
        .replace("@MEMBERS@", &members.join(", "))
        .replace("@NAMES@", &names.join(", "))
}
