use clap::{Parser, Subcommand};
use shrinkray::{config, output, paths, pipeline, scan, stale};
use shrinkray::pipeline::BuildOptions;
use shrinkray::transform::CommandTransformer;
use std::path::{Path, PathBuf};

/// Shared flag for commands that evaluate staleness.
#[derive(clap::Args, Clone)]
struct ForceArgs {
    /// Reprocess every file regardless of timestamps
    #[arg(short, long)]
    force: bool,
}

#[derive(Parser)]
#[command(name = "shrinkray")]
#[command(about = "Incremental transpile-and-obfuscate build step for JavaScript trees")]
#[command(long_about = "\
Incremental transpile-and-obfuscate build step for JavaScript trees

Sources live under a raw root; outputs mirror its structure with the raw
segment stripped. A file is rebuilt only when it is newer than its output
(or the output doesn't exist). Each rebuild pipes the file through two
external filter commands: a transpiler that lowers syntax and compacts the
code, then an obfuscator that renames and compresses it.

Tree layout:

  project/
  ├── raw/                     # Raw root (--source)
  │   ├── shrinkray.toml       # Build config (optional)
  │   ├── app.js               # → project/app.js
  │   └── lib/
  │       └── util.js          # → project/lib/util.js
  ├── app.js                   # Final outputs mirror raw/
  └── lib/
      └── util.js

Only files with the configured source extension (default .js) are
processed; everything else under the raw root is ignored.

Run 'shrinkray gen-config' to print a documented shrinkray.toml.")]
#[command(version = env!("BUILD_VERSION"))]
struct Cli {
    /// Raw source directory
    #[arg(long, default_value = "raw", global = true)]
    source: PathBuf,

    /// Output directory (default: the parent of the raw root)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the incremental build over the raw tree
    Build(ForceArgs),
    /// List candidate source files without processing
    Scan,
    /// Report which files a build would reprocess
    Check(ForceArgs),
    /// Print a stock shrinkray.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let output_root = resolve_output_root(&cli);

    match cli.command {
        Command::Build(force_args) => {
            let config = config::load_config(&cli.source)?;
            config.validate()?;
            let candidates = scan::scan(&cli.source, &config.source_ext)?;
            init_thread_pool(&config.processing);

            let transformer = CommandTransformer::from_config(&config);
            let opts = BuildOptions {
                source_root: cli.source.clone(),
                output_root,
                force: force_args.force,
            };

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for report in rx {
                    output::print_file_report(&report);
                }
            });
            let stats = pipeline::process_tree(&transformer, &candidates, &opts, Some(tx));
            printer.join().unwrap();

            println!("{stats}");
            if stats.failed > 0 {
                std::process::exit(1);
            }
        }
        Command::Scan => {
            let config = config::load_config(&cli.source)?;
            config.validate()?;
            let candidates = scan::scan(&cli.source, &config.source_ext)?;
            output::print_scan_output(&candidates, &cli.source);
        }
        Command::Check(force_args) => {
            let config = config::load_config(&cli.source)?;
            config.validate()?;
            let candidates = scan::scan(&cli.source, &config.source_ext)?;

            let mut stale_count = 0usize;
            for candidate in &candidates {
                let out = paths::map_to_output(candidate, &cli.source, &output_root);
                let is_stale = stale::is_stale(candidate, &out, force_args.force)?;
                if is_stale {
                    stale_count += 1;
                }
                println!("{}", output::format_check_line(&out, is_stale));
            }
            println!("{stale_count} of {} stale", candidates.len());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Output root: explicit flag, or the parent of the raw root.
fn resolve_output_root(cli: &Cli) -> PathBuf {
    cli.output.clone().unwrap_or_else(|| {
        match cli.source.parent() {
            Some(parent) if parent != Path::new("") => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    })
}

/// Initialize the rayon thread pool from processing config.
///
/// Caps at the number of available CPU cores — user can constrain down,
/// not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
