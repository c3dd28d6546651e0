use clap::Parser;
use subnetter::display::print_error;
use subnetter::{run, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.global.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => {}
        Err(e) => {
            print_error(&format!("Error: {}", e));
            std::process::exit(1);
        }
    }
}
