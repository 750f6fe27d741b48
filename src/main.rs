use clap::Parser;
use probekit::cli::Cli;
use probekit::{commands, init_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let settings = commands::load_settings(cli.config.as_deref())?;

    let mut stdout = std::io::stdout().lock();
    commands::run(cli.command, &settings, &mut stdout).await
}
