use crate::utils::constants::{DEFAULT_END_YEAR, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_START_YEAR};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ghcnd-stats")]
#[command(about = "Monthly temperature statistics for GHCN-Daily station observations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the statistics HTTP API
    Serve {
        #[arg(short, long, help = "Daily observations CSV file")]
        csv: PathBuf,

        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,

        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },

    /// Print one metric's monthly table over a year range
    Summary {
        #[arg(short, long, help = "Daily observations CSV file")]
        csv: PathBuf,

        #[arg(
            short,
            long,
            default_value = "avg_tmax",
            help = "avg_tmax | avg_tmin | rec_tmax | rec_tmin"
        )]
        metric: String,

        #[arg(long, default_value_t = DEFAULT_START_YEAR)]
        start: i32,

        #[arg(long, default_value_t = DEFAULT_END_YEAR)]
        end: i32,
    },

    /// Report dataset coverage without aggregating
    Info {
        #[arg(short, long, help = "Daily observations CSV file")]
        csv: PathBuf,
    },
}
