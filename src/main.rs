use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nestscope::analysis::scan_project;
use nestscope::config::ScanConfig;
use nestscope::export::{export_to_string, ExportFormat};

#[derive(Parser)]
#[command(name = "nestscope")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Module dependency graph extractor for decorator-based DI projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a project and print its module graph
    Analyze {
        /// Project root (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format: json or dot
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Module file suffix (overrides the config file)
        #[arg(long)]
        suffix: Option<String>,

        /// Config file (defaults to nestscope.toml in the project root)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Increase log verbosity (-v info, -vv debug)
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,
    },
    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Analyze {
            path,
            format,
            output,
            suffix,
            config,
            verbose,
        }) => {
            init_tracing(verbose);

            let mut scan_config = match &config {
                Some(file) => ScanConfig::load(file)
                    .with_context(|| format!("loading config {}", file.display()))?,
                None => ScanConfig::discover(&path)
                    .with_context(|| format!("loading config from {}", path.display()))?,
            };
            if let Some(suffix) = suffix {
                scan_config.suffix = suffix;
            }

            let graph = scan_project(&path, &scan_config)
                .with_context(|| format!("scanning {}", path.display()))?;

            for cycle in graph.import_cycles() {
                info!(
                    forward_referenced = cycle.forward_referenced,
                    "import cycle: {}",
                    cycle.cycle_path()
                );
            }

            let format = ExportFormat::from_name_or_default(&format);
            let rendered = export_to_string(format, &graph).context("rendering graph")?;

            match output {
                Some(file) => fs::write(&file, rendered)
                    .with_context(|| format!("writing {}", file.display()))?,
                None => print!("{}", rendered),
            }
        }
        Some(Commands::Version) => {
            println!("nestscope v{}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            println!("nestscope - Module Dependency Graph Extractor");
            println!("Run 'nestscope analyze <path>' to scan a project");
            println!("Run 'nestscope --help' for more information");
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
