use anyhow::Result;
use clap::Parser;
use release_index::cli::{run, Cli};
use release_index::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.log_level, cli.output_format) {
        eprintln!("{e}");
    }
    tracing::info!("CLI arguments parsed, invoking run");

    let result = run(cli).await;
    match &result {
        Ok(_) => tracing::info!("CLI completed successfully"),
        Err(e) => tracing::error!(error = %e, "CLI exited with error"),
    }
    result
}
