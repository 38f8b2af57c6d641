use std::io;
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use nearest::nearest::TestGlobs;
use nearest::types::Mode;

/// nearest: find the Python function or class enclosing a line.
#[derive(Parser)]
#[command(name = "nearest", version, about)]
struct Cli {
    /// Python source file.
    path: Option<PathBuf>,

    /// 1-based line number inside the file.
    line: Option<u32>,

    /// What to look for.
    #[arg(long, value_enum, default_value_t = Mode::Definition)]
    mode: Mode,

    /// Name glob for test functions (with --mode test).
    #[arg(long, default_value = "test*")]
    def_glob: String,

    /// Name glob for test classes (with --mode test).
    #[arg(long, default_value = "Test*")]
    class_glob: String,

    /// Machine-readable JSON output.
    #[arg(long)]
    json: bool,

    /// Log finder decisions to stderr. `RUST_LOG` overrides.
    #[arg(long, short)]
    verbose: bool,

    /// Print shell completions for the given shell.
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    let cli = Cli::parse();

    // Shell completions
    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "nearest", &mut io::stdout());
        return;
    }

    init_tracing(cli.verbose);

    let (Some(path), Some(line)) = (cli.path, cli.line) else {
        eprintln!("usage: nearest <path> <line> [--mode block|def|test] [--json]");
        process::exit(3);
    };

    let globs = TestGlobs {
        def_glob: cli.def_glob,
        class_glob: cli.class_glob,
    };
    debug!(path = %path.display(), line, mode = %cli.mode, "query");

    if cli.json {
        match nearest::run_json(&path, line, cli.mode, &globs) {
            Ok(report) => {
                println!("{report:#}");
                if report["found"].is_null() {
                    process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("{e}");
                process::exit(e.exit_code());
            }
        }
        return;
    }

    match nearest::run(&path, line, cli.mode, &globs) {
        Ok(Some(output)) => print!("{output}"),
        Ok(None) => {
            println!("{}", nearest::no_match_line(&path, line, cli.mode));
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(e.exit_code());
        }
    }
}

/// Initialize the tracing subscriber on stderr.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
