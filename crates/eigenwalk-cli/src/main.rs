//! eigenwalk CLI — run the notebook, or ask one-off questions about a matrix.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

mod commands;

#[derive(Parser)]
#[command(name = "eigenwalk")]
#[command(
    version,
    about = "eigenwalk — a walk through linear maps, eigenvectors, rank and inversion"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where lesson diagrams go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DiagramFormat {
    /// One SVG file per diagram.
    Svg,
    /// A single `diagrams.json`.
    Json,
    /// Compute diagrams but write nothing.
    #[value(name = "none")]
    Headless,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one lesson, or all of them.
    Run {
        /// Lesson name (see `eigenwalk list`), or `all`.
        #[arg(short, long, default_value = "all")]
        lesson: String,

        /// Diagram output format.
        #[arg(short, long, value_enum, default_value_t = DiagramFormat::Svg)]
        format: DiagramFormat,

        /// Output directory for diagrams.
        #[arg(short, long, default_value = "eigenwalk-out")]
        out: PathBuf,

        /// Lesson config (TOML).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print reports as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List the lessons in reading order.
    List,

    /// Eigenvalues and eigenvectors of a matrix, e.g. "-1,3;2,-2".
    Eigen {
        #[arg(allow_hyphen_values = true)]
        matrix: String,

        /// Digits after the decimal point.
        #[arg(short, long, default_value_t = 4)]
        precision: usize,
    },

    /// Inverse of a matrix, directly and via its eigendecomposition.
    Invert {
        #[arg(allow_hyphen_values = true)]
        matrix: String,

        /// Digits after the decimal point.
        #[arg(short, long, default_value_t = 4)]
        precision: usize,
    },

    /// Numerical rank of a matrix.
    Rank {
        #[arg(allow_hyphen_values = true)]
        matrix: String,

        /// Relative threshold below which singular values count as zero.
        #[arg(short, long, default_value_t = 1e-9)]
        tolerance: f64,
    },

    /// Validate a lesson config file.
    Validate {
        /// Path to a lesson config (TOML).
        path: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so stdout stays clean for reports.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    Registry::default().with(filter).with(fmt_layer).init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            lesson,
            format,
            out,
            config,
            json,
        } => commands::run(&lesson, format, &out, config.as_deref(), json),
        Commands::List => commands::list(),
        Commands::Eigen { matrix, precision } => commands::eigen(&matrix, precision),
        Commands::Invert { matrix, precision } => commands::invert(&matrix, precision),
        Commands::Rank { matrix, tolerance } => commands::rank(&matrix, tolerance),
        Commands::Validate { path } => commands::validate(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
