use clap::Parser;
use std::path::PathBuf;
use std::process;

use gplc::{BacktrackPolicy, GenConfig, ProgramNode, TraceConfig};

#[derive(Parser)]
#[command(name = "gplc")]
#[command(about = "Generate the runtime source for a graph program")]
#[command(version)]
struct Cli {
    /// Annotated program AST (JSON) produced by the front end
    program: PathBuf,

    /// Directory receiving the generated main.c
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Back track by copying the host graph instead of recording changes
    #[arg(long)]
    copy_graphs: bool,

    /// Emit rule match/application traces into the runtime
    #[arg(long)]
    trace_rules: bool,

    /// Emit host-graph snapshots into the runtime trace
    #[arg(long)]
    trace_graphs: bool,

    /// Emit backtracking traces into the runtime
    #[arg(long)]
    trace_backtracking: bool,

    /// The runtime frees its hashed host list store during teardown
    #[arg(long)]
    list_hashing: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let source = match std::fs::read_to_string(&cli.program) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot read program file: {}: {}", cli.program.display(), e);
            process::exit(1);
        }
    };
    let program: ProgramNode = match serde_json::from_str(&source) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Error: malformed program AST: {}", e);
            process::exit(1);
        }
    };

    let config = GenConfig {
        backtracking: if cli.copy_graphs {
            BacktrackPolicy::CopyGraphs
        } else {
            BacktrackPolicy::RecordChanges
        },
        tracing: TraceConfig {
            rules: cli.trace_rules,
            graphs: cli.trace_graphs,
            backtracking: cli.trace_backtracking,
        },
        list_hashing: cli.list_hashing,
    };

    match gplc::write_main_file(&program, &config, &cli.output_dir) {
        Ok(path) => println!("Generated {}", path.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
