//! `leger` command-line compiler.
//!
//! ```bash
//! leger compile --input pages --output .leger/generated
//! leger compile --target html --registry components.json
//! leger check --input pages
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use leger_cli::{CompileSettings, Report, check_dir, compile_dir, load_registry};
use leger_svelte::PageTarget;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "leger")]
#[command(about = "Compile .leg pages into Svelte components or HTML", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every page in a directory
    Compile {
        /// Directory holding .leg pages
        #[arg(short, long, default_value = "pages")]
        input: PathBuf,

        /// Directory receiving generated pages
        #[arg(short, long, default_value = ".leger/generated")]
        output: PathBuf,

        /// Output flavour
        #[arg(short, long, value_enum, default_value_t = Target::Svelte)]
        target: Target,

        /// Component map (JSON or YAML); defaults to the built-in components
        #[arg(short, long, value_name = "PATH")]
        registry: Option<PathBuf>,

        /// Import prefix for Svelte component files
        #[arg(long, default_value = leger_svelte::codegen::DEFAULT_COMPONENTS_DIR)]
        components_dir: String,

        /// Write Svelte pages as SvelteKit route files (`index` → `+page.svelte`)
        #[arg(long)]
        routes: bool,

        /// Stop at the first page that fails
        #[arg(long)]
        fail_fast: bool,
    },

    /// Validate every page in a directory without writing output
    Check {
        /// Directory holding .leg pages
        #[arg(short, long, default_value = "pages")]
        input: PathBuf,

        /// Component map (JSON or YAML); defaults to the built-in components
        #[arg(short, long, value_name = "PATH")]
        registry: Option<PathBuf>,

        /// Stop at the first page that fails
        #[arg(long)]
        fail_fast: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Svelte,
    Html,
}

impl From<Target> for PageTarget {
    fn from(target: Target) -> Self {
        match target {
            Target::Svelte => PageTarget::Svelte,
            Target::Html => PageTarget::Html,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(command: Commands) -> Result<bool> {
    match command {
        Commands::Compile {
            input,
            output,
            target,
            registry,
            components_dir,
            routes,
            fail_fast,
        } => {
            let registry = load_registry(registry.as_deref())?;
            let settings = CompileSettings {
                input,
                output,
                target: target.into(),
                components_dir,
                routes,
                fail_fast,
            };
            let report = compile_dir(&settings, &registry)?;
            println!(
                "✓ {} '.leg' files compiled to {}",
                report.succeeded.len(),
                settings.output.display()
            );
            Ok(print_failures(&report))
        }
        Commands::Check {
            input,
            registry,
            fail_fast,
        } => {
            let registry = load_registry(registry.as_deref())?;
            let report = check_dir(&input, &registry, fail_fast)?;
            println!("✓ {} '.leg' files valid", report.succeeded.len());
            Ok(print_failures(&report))
        }
    }
}

/// Prints each failure; returns whether the run succeeded.
fn print_failures(report: &Report) -> bool {
    for failure in &report.failures {
        eprintln!("✗ {}", failure.error);
    }
    report.is_success()
}
