use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use log::info;

use declgen::{Config, GenError, ScanFailure, harness, wrapper, write_output};
use declscan::decl::RoutineScope;
use declscan::{Declarations, ParseMode, SourceUnit};

#[derive(Parser)]
#[command(
    name = "declscan",
    version,
    about = "Structural C/C++ declaration scanner and wrapper/test-harness generator"
)]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a declscan.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate extern "C" wrapper stubs for every class in a header tree
    GenerateWrappers(WrapperArgs),

    /// Generate a test runner entry point from C++ test sources
    GenerateHarness(HarnessArgs),

    /// Print the classes and function prototypes found in each file
    ListDeclarations(ListArgs),
}

#[derive(clap::Args)]
struct WrapperArgs {
    /// Directory searched recursively for headers
    src_dir: PathBuf,

    /// Directory receiving the generated .h/.cpp pairs
    dest_dir: PathBuf,
}

#[derive(clap::Args)]
struct HarnessArgs {
    /// The output source file for the generated test main()
    #[arg(long)]
    output: Option<PathBuf>,

    /// Don't generate the harness, only print the discovered tests
    #[arg(long)]
    list_tests: bool,

    /// The C++ files containing your tests
    #[arg(required = true)]
    test_files: Vec<PathBuf>,
}

#[derive(clap::Args)]
struct ListArgs {
    /// Header or source files to scan
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => fail(&e),
        },
        None => Config::default(),
    };

    let exit_code = match cli.command {
        Command::GenerateWrappers(args) => do_generate_wrappers(args, &config, color_choice),
        Command::GenerateHarness(args) => do_generate_harness(args, &config, color_choice),
        Command::ListDeclarations(args) => do_list_declarations(args, color_choice),
    };
    process::exit(exit_code);
}

/// `RUST_LOG` wins over `--verbose` when both are given.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

fn fail(error: &GenError) -> ! {
    eprintln!("error: {}", error);
    process::exit(1);
}

fn do_generate_wrappers(args: WrapperArgs, config: &Config, color_choice: ColorChoice) -> i32 {
    let report = match wrapper::generate_tree(&args.src_dir, &args.dest_dir, &config.wrappers) {
        Ok(report) => report,
        Err(e) => fail(&e),
    };

    info!(
        "generated {} files under {}",
        report.generated.len(),
        args.dest_dir.display()
    );
    emit_scan_failures(&report.failures, color_choice)
}

fn do_generate_harness(args: HarnessArgs, config: &Config, color_choice: ColorChoice) -> i32 {
    // Checked before any file is read.
    if !args.list_tests && args.output.is_none() {
        fail(&GenError::MissingOutputPath);
    }

    let scan = match harness::discover(&args.test_files, &config.harness) {
        Ok(scan) => scan,
        Err(e) => fail(&e),
    };
    let exit_code = emit_scan_failures(&scan.failures, color_choice);

    if args.list_tests {
        for name in harness::list_tests(&scan.cases) {
            println!("{}", name);
        }
        return exit_code;
    }

    if let Some(output) = &args.output {
        let source = harness::emit_harness(&scan.cases, &config.harness);
        if let Err(e) = write_output(output, &source) {
            fail(&e);
        }
        info!(
            "wrote {} test cases to {}",
            scan.cases.len(),
            output.display()
        );
    }
    exit_code
}

fn do_list_declarations(args: ListArgs, color_choice: ColorChoice) -> i32 {
    let mut failures = Vec::new();

    for (file_id, path) in args.files.iter().enumerate() {
        let unit = match SourceUnit::load(path, file_id) {
            Ok(unit) => unit,
            Err(source) => fail(&GenError::Read {
                path: path.clone(),
                source,
            }),
        };
        let parsed = declscan::Parser::new(&unit).parse(ParseMode::TypesAndRoutines);
        match parsed {
            Ok(decls) => print_declarations(&unit.path, &decls),
            Err(error) => failures.push(ScanFailure { unit, error }),
        }
    }

    emit_scan_failures(&failures, color_choice)
}

fn print_declarations(path: &Path, decls: &Declarations) {
    println!("{}", path.display());
    for decl in &decls.types {
        let bases = if decl.bases.is_empty() {
            String::new()
        } else {
            format!(" : {}", decl.bases.join(", "))
        };
        println!(
            "  {} {}{}  (line {})",
            decl.keyword.as_str(),
            decl.name,
            bases,
            decl.line
        );
    }
    for routine in &decls.routines {
        let scope = match &routine.scope {
            RoutineScope::File => "<file scope>".to_string(),
            RoutineScope::Type(owner) => owner.clone(),
        };
        println!(
            "  {} {}({})  [{}]  (line {})",
            routine.return_type, routine.name, routine.params, scope, routine.line
        );
    }
}

/// Render scan failures as source diagnostics. Returns the exit code they imply.
fn emit_scan_failures(failures: &[ScanFailure], color_choice: ColorChoice) -> i32 {
    if failures.is_empty() {
        return 0;
    }

    let mut files = SimpleFiles::new();
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();

    for failure in failures {
        let file_id = files.add(
            failure.unit.path.display().to_string(),
            failure.unit.text.clone(),
        );
        let mut error = failure.error.clone();
        error.file_id = file_id;
        let diagnostic = error.to_diagnostic();
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
    }

    eprintln!("error: {} file(s) could not be scanned", failures.len());
    1
}
