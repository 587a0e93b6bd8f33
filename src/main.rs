use clap::Parser;

use sportsfest_lib::bootstrap::{self, tracing::init_tracing_subscriber};
use sportsfest_lib::cli::{self, Cli};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let args = Cli::parse();
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(bootstrap::resolve_config_path);
    let config = bootstrap::load_or_default(&config_path)?;

    if let Err(err) = init_tracing_subscriber(&config.log_dir, &config.log_level) {
        eprintln!("Failed to initialize tracing: {err}");
    }
    tracing::debug!(config = %config_path.display(), "configuration loaded");

    let usecases = bootstrap::wire_dependencies(&config)?;
    let mut stdout = std::io::stdout();
    cli::run(args.command, &usecases, &mut stdout).await
}
