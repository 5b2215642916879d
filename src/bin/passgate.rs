use clap::Parser;
use passgate_api::cli::Cli;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Errors are already reported by the CLI in the requested format
    if let Err(e) = passgate_api::cli::run(cli).await {
        if let Ok("true") | Ok("1") = std::env::var("CLI_VERBOSE").as_deref() {
            eprintln!("Error: {e:?}");
        }
        std::process::exit(1);
    }
}
