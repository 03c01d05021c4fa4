use crate::analyzers::{run_summary, SummaryRequest};
use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::models::{MetricId, TableSlice, MONTH_LABELS};
use crate::readers::DailyReader;
use crate::server::run_server;
use crate::store::StationStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub async fn run(cli: Cli) -> Result<()> {
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Serve { csv, host, port } => {
            println!("Serving statistics for {}", csv.display());
            let store = Arc::new(StationStore::new(csv));
            run_server(store, &host, port).await?;
        }

        Commands::Summary {
            csv,
            metric,
            start,
            end,
        } => {
            let store = StationStore::new(csv);
            let aggregates = store.aggregates().await?;

            let request =
                SummaryRequest::new(MetricId::parse_lenient(Some(metric.as_str())), start, end);
            let slice = run_summary(&aggregates, &request);

            if slice.rows.is_empty() {
                println!("No data in the requested year range");
                return Ok(());
            }

            println!("Metric: {}", slice.metric);
            print_table(&slice);
        }

        Commands::Info { csv } => {
            let dataset = DailyReader::new().read_dataset(&csv)?;

            println!("Days:       {}", dataset.len());
            println!("Scale:      {}", dataset.scale());
            if let (Some(first), Some(last)) = (dataset.days().first(), dataset.days().last()) {
                println!("First date: {}", first.date);
                println!("Last date:  {}", last.date);
            }
        }
    }

    Ok(())
}

fn print_table(slice: &TableSlice) {
    print!("{:>6}", "year");
    for label in MONTH_LABELS {
        print!("{:>7}", label);
    }
    println!();

    for row in &slice.rows {
        print!("{:>6}", row.year);
        for value in row.values {
            match value {
                Some(v) => print!("{:>7.1}", v),
                None => print!("{:>7}", "-"),
            }
        }
        println!();
    }
}
