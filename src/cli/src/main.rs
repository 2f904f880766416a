mod cli;
mod interactive;
mod logging;
mod render;

use std::process::ExitCode;

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    Cli::execute().await
}
