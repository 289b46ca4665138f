//! dijnet - incremental invoice downloader for the Dijnet portal.

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::env;
use std::io;
use std::process::ExitCode;

use dijnet_dl::cli::{self, confirm_resume, parse_args, usage};
use dijnet_dl::{DEFAULT_BASE_URL, DijnetClient, FileConfig, Result};

/// Environment lookup that treats empty values as unset.
fn env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

async fn run() -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    if args.help {
        print!("{}", usage());
        return Ok(());
    }

    let file = FileConfig::load(&args.config_path())?;
    let config = args.into_config(env_var, file)?;
    log::debug!("Effective config: {config:?}");

    let base_url = env_var("DIJNET_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let client = DijnetClient::with_base_url(base_url)?;

    cli::run(&config, &client, |latest| {
        confirm_resume(&mut io::stdin().lock(), &mut io::stdout(), latest)
    })
    .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("Run failed ({:?}): {e:?}", e.kind());
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
