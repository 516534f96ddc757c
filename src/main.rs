mod config;
mod executor;
mod fetch;
mod request;
mod resource;
mod server;

use rmcp::{transport::stdio, ServiceExt};
use server::TerminalServer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting terminal bridge on stdio");
    TerminalServer::new().serve(stdio()).await?.waiting().await?;
    Ok(())
}
