//! Lazyview CLI
//!
//! Command-line interface for the viewport-triggered loader:
//! - Simulate scrolling through an image gallery
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use lazyview::config::{generate_default_config, Config, LoggingConfig};
use lazyview::sim::{GalleryLayout, ScrollReport, Simulation};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "lazyview")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Viewport-triggered image loading simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scroll through a gallery and report when each image is committed
    Simulate {
        /// JSON layout file (default: generated grid)
        #[arg(short, long)]
        layout: Option<PathBuf>,
        /// Grid columns when no layout is given
        #[arg(long, default_value = "4")]
        columns: usize,
        /// Grid rows when no layout is given
        #[arg(long, default_value = "25")]
        rows: usize,
        /// Tile size in pixels
        #[arg(long, default_value = "200")]
        tile: f64,
        /// Gap between tiles in pixels
        #[arg(long, default_value = "16")]
        gap: f64,
        /// Scroll step in pixels
        #[arg(short, long, default_value = "240")]
        step: f64,
        /// Override the proximity margin in pixels
        #[arg(short, long)]
        margin: Option<f64>,
        /// Pretend the visibility detector is unavailable
        #[arg(long)]
        eager: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };

    init_logging(&config.logging);

    match cli.command {
        Commands::Simulate {
            layout,
            columns,
            rows,
            tile,
            gap,
            step,
            margin,
            eager,
        } => {
            if let Some(px) = margin {
                config.loader.proximity_margin = px;
                config.validate()?;
            }

            let layout = match layout {
                Some(path) => GalleryLayout::load(&path)?,
                None => GalleryLayout::grid(columns, rows, tile, gap),
            };
            tracing::info!(
                images = layout.len(),
                height = layout.height(),
                margin = config.loader.proximity_margin,
                "Starting simulation"
            );

            let mut sim = Simulation::new(&config, &layout, eager);
            let report = sim.run(step);

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                _ => print_table(&report),
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lazyview={}", logging.level)));

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_table(report: &ScrollReport) {
    println!(
        "Mode: {}   Margin: {}px   Images: {}   Loaded: {}",
        if report.eager { "eager" } else { "deferred" },
        report.margin,
        report.total_images,
        report.loaded
    );
    println!("{}", "-".repeat(60));
    println!("{:>10}  {:>9}  First image", "Offset", "Committed");
    println!("{}", "-".repeat(60));

    for step in &report.steps {
        println!(
            "{:>10.0}  {:>9}  {}",
            step.offset,
            step.committed.len(),
            step.committed.first().map(String::as_str).unwrap_or("-")
        );
    }
}
