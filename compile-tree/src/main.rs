use clap::{ArgAction, Args, Parser, Subcommand};
use compile_tree_core::{
    CompileError, CompileInvoker, CompileRequest, JAVA_SOURCE_SUFFIX, SourceTreeScanner,
};
use compile_tree_process::SystemProcessRunner;
use miette::MietteHandlerOpts;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod toolchain;

use toolchain::ToolchainArgs;

/// Exit status when no compiler is available at all
const EXIT_UNSUPPORTED: i32 = 2;

#[derive(Parser)]
#[command(
    name = "compile-tree",
    version,
    about = "Compile a source tree with an external Java compiler",
    long_about = "Finds every source file under a directory and hands them all to javac in one invocation.\n\
                  Compiler diagnostics are shown as they are produced."
)]
struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug; RUST_LOG overrides)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every source file under SOURCE into DEST
    Compile(CompileArgs),

    /// List the source files that would be compiled
    List {
        /// Source root directory
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Only look at files directly inside SOURCE
        #[arg(long)]
        no_recurse: bool,

        /// File name suffix of source files
        #[arg(long, default_value = JAVA_SOURCE_SUFFIX)]
        suffix: String,
    },

    /// Show which compiler would be used
    Locate {
        #[command(flatten)]
        toolchain: ToolchainArgs,
    },
}

#[derive(Args)]
struct CompileArgs {
    /// Source root directory
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Destination directory for compiled output (created if missing)
    #[arg(value_name = "DEST")]
    dest: PathBuf,

    /// Only compile files directly inside SOURCE
    #[arg(long)]
    no_recurse: bool,

    #[command(flatten)]
    toolchain: ToolchainArgs,

    /// File name suffix of source files
    #[arg(long, default_value = JAVA_SOURCE_SUFFIX)]
    suffix: String,

    /// Kill the compiler if it runs longer than this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print the compiler command line instead of running it
    #[arg(long)]
    dry_run: bool,

    /// Do not echo compiler output while it runs
    #[arg(short, long)]
    quiet: bool,

    /// Options passed to the compiler, after `--`
    #[arg(last = true, value_name = "OPTIONS")]
    options: Vec<String>,
}

fn main() {
    setup_miette_handler();

    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let result = match cli.command {
        Some(Commands::Compile(args)) => handle_compile_command(args),
        Some(Commands::List {
            source,
            no_recurse,
            suffix,
        }) => handle_list_command(source, !no_recurse, suffix),
        Some(Commands::Locate { toolchain }) => handle_locate_command(&toolchain),
        None => {
            // No subcommand provided, show help
            Cli::parse_from(["compile-tree", "--help"]);
            return;
        }
    };

    if let Err(err) = result {
        let code = if err.is_environmental() {
            EXIT_UNSUPPORTED
        } else {
            1
        };
        eprintln!("{:?}", miette::Report::new(err));
        process::exit(code);
    }
}

fn setup_miette_handler() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .tab_width(4)
                .with_cause_chain()
                .build(),
        )
    }))
    .ok();
}

fn setup_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_compile_command(args: CompileArgs) -> Result<(), CompileError> {
    let mut runner = SystemProcessRunner::new();
    if args.quiet {
        runner = runner.quiet();
    }
    if let Some(secs) = args.timeout {
        runner = runner.timeout(Duration::from_secs(secs));
    }

    let invoker = CompileInvoker::new(args.toolchain.compiler(), runner).with_source_suffix(args.suffix);
    let request = CompileRequest::new(&args.source, &args.dest)
        .recurse(!args.no_recurse)
        .options(args.options);

    if args.dry_run {
        let invocation = invoker.invocation(&request)?;
        println!("{}", invocation);
        return Ok(());
    }

    let compiled = match invoker.compile(&request) {
        Ok(compiled) => compiled,
        Err(err) => {
            // Output was captured but not shown while running
            if args.quiet {
                if let Some(output) = err.output() {
                    eprint!("{}", output.output());
                }
            }
            return Err(err);
        }
    };

    println!("{}", compiled_message(compiled, &args.dest));
    Ok(())
}

fn compiled_message(count: usize, dest: &Path) -> String {
    format!("✅ Compiled {} source files into {}", count, dest.display())
}

fn handle_list_command(source: PathBuf, recurse: bool, suffix: String) -> Result<(), CompileError> {
    let sources = SourceTreeScanner::with_suffix(suffix).scan(&source, recurse)?;
    for path in &sources {
        println!("{}", path.display());
    }
    eprintln!("\n📊 {} source files", sources.len());
    Ok(())
}

fn handle_locate_command(toolchain: &ToolchainArgs) -> Result<(), CompileError> {
    let compiler = toolchain.compiler().ok_or_else(CompileError::no_compiler)?;
    println!("{}", compiler.executable().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_compile_with_trailing_compiler_options() {
        let cli = Cli::try_parse_from([
            "compile-tree",
            "compile",
            "src",
            "out",
            "--no-recurse",
            "--jdk",
            "/opt/jdk",
            "--",
            "-Xlint:none",
            "-g",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Compile(args)) => {
                assert_eq!(args.source, PathBuf::from("src"));
                assert_eq!(args.dest, PathBuf::from("out"));
                assert!(args.no_recurse);
                assert_eq!(args.toolchain.jdk, Some(PathBuf::from("/opt/jdk")));
                assert_eq!(args.suffix, ".java");
                assert_eq!(args.options, vec!["-Xlint:none".to_string(), "-g".to_string()]);
                assert!(!args.dry_run);
            }
            _ => panic!("Expected compile command"),
        }
    }

    #[test]
    fn test_compile_defaults() {
        let cli = Cli::try_parse_from(["compile-tree", "compile", "src", "out"]).unwrap();
        match cli.command {
            Some(Commands::Compile(args)) => {
                assert!(!args.no_recurse);
                assert!(!args.quiet);
                assert_eq!(args.timeout, None);
                assert!(args.options.is_empty());
            }
            _ => panic!("Expected compile command"),
        }
    }

    #[test]
    fn test_compiled_message_reports_file_count() {
        assert_eq!(
            compiled_message(3, Path::new("build/classes")),
            "✅ Compiled 3 source files into build/classes"
        );
    }

    #[test]
    fn test_compile_requires_destination() {
        assert!(Cli::try_parse_from(["compile-tree", "compile", "src"]).is_err());
    }

    #[test]
    fn test_list_with_custom_suffix() {
        let cli = Cli::try_parse_from(["compile-tree", "-vv", "list", "src", "--suffix", ".src"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::List {
                source,
                no_recurse,
                suffix,
            }) => {
                assert_eq!(source, PathBuf::from("src"));
                assert!(!no_recurse);
                assert_eq!(suffix, ".src");
            }
            _ => panic!("Expected list command"),
        }
    }
}
