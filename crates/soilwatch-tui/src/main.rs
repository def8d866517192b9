use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use soilwatch_tui::RunOptions;

#[derive(Parser)]
#[command(name = "soilwatch")]
#[command(author, version, about = "Terminal dashboard for NPK soil sensors", long_about = None)]
struct Cli {
    /// Sensor feed endpoint
    #[arg(long, default_value = "http://api.ehub.ph/rgb.php")]
    url: String,

    /// Poll interval in seconds
    #[arg(long, default_value_t = 5)]
    interval: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing. Logs go to stderr so they never corrupt the
    // alternate screen.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    soilwatch_tui::run(RunOptions {
        url: cli.url,
        interval: Duration::from_secs(cli.interval.max(1)),
    })
    .await
}
