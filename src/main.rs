use std::process::ExitCode;

use courier::cli;
use courier::config::Config;
use courier::server::Server;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "courier".to_string());

    let port = match cli::parse_port(std::env::args()) {
        Ok(port) => port,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{}", cli::usage(&program));
            return Ok(ExitCode::from(2));
        }
    };

    let cfg = Config::load(port)?;
    let server = Server::bind(&cfg).await?;

    server
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    Ok(ExitCode::SUCCESS)
}
