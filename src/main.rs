use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use qrlogo::{Cli, Config, Error, HttpFetcher};

fn real_main(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::default();
    let fetcher = HttpFetcher::new(&config)?;
    let stdout = std::io::stdout();
    qrlogo::run(cli, &fetcher, &config, &mut stdout.lock())
        .with_context(|| format!("failed to create {}", cli.output.display()))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // Reject --logo with --no-logo as a usage error before doing anything else.
    if let Err(e @ Error::ConflictingOptions) = cli.logo_source() {
        Cli::command().error(ErrorKind::ArgumentConflict, e).exit();
    }

    if let Err(e) = real_main(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
