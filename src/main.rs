use anyhow::Result;
use clap::Parser;
use sobel_batch::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}
