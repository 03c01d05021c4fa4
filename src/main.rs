use clap::Parser;
use ghcnd_stats::cli::{run, Cli};
use ghcnd_stats::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
