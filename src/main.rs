use anyhow::Result;
use clap::Parser;
use fontshot::cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fontshot=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
