//! # sheetdb: Read SheetDB Tabs from the Command Line
//!
//! This is the main entry point for the `sheetdb` binary. All logic lives in
//! the `sheetdb_cli` library crate.

use anyhow::Result;
use clap::Parser;
use sheetdb_cli::{run, Cli};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the JSON result.
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sheetdb=info".parse()?))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("[sheetdb error] {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}
