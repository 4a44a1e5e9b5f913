use anyhow::Result;
use webpilot::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
