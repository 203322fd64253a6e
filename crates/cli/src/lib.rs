//! # `sheetdb-cli` Library Crate
//!
//! Argument parsing and command handling for the `sheetdb` binary. Commands
//! read one or more tabs and render them as a JSON array, one entry per
//! requested sheet in request order.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sheetdb::{load_config, ResilientFetcher, Row, SheetDbClient, SheetDbConfig, SheetId};
use tracing::info;

// --- CLI Argument Structs ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// The SheetDB endpoint to read from.
    #[arg(long, global = true, env = "SHEETDB_BASE_URL")]
    pub base_url: Option<String>,
    /// Path to an optional YAML configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Fail on the first error instead of retrying and substituting empty sheets.
    #[arg(long, global = true)]
    pub strict: bool,
    /// Print the result on a single line.
    #[arg(long, global = true)]
    pub compact: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read the `$TICKER` tab of each ticker symbol
    Ticker(SheetArgs),
    /// Read tabs by their plain name
    Name(SheetArgs),
}

#[derive(Parser, Debug)]
pub struct SheetArgs {
    /// One or more sheets to read.
    #[arg(required = true)]
    pub sheets: Vec<String>,
}

impl Commands {
    /// The sheet identifiers named on the command line, in order.
    pub fn sheet_ids(&self) -> Vec<SheetId> {
        match self {
            Commands::Ticker(args) => args
                .sheets
                .iter()
                .map(|s| SheetId::ticker(s.as_str()))
                .collect(),
            Commands::Name(args) => args
                .sheets
                .iter()
                .map(|s| SheetId::name(s.as_str()))
                .collect(),
        }
    }
}

// --- Output ---

/// One entry of the rendered output.
#[derive(Serialize, Debug)]
pub struct SheetOutput<'a> {
    pub sheet: String,
    pub rows: &'a [Row],
}

/// Renders fetched sheets as a JSON array aligned with `sheets`.
pub fn render(sheets: &[SheetId], results: &[Vec<Row>], compact: bool) -> Result<String> {
    let output: Vec<SheetOutput> = sheets
        .iter()
        .zip(results)
        .map(|(sheet, rows)| SheetOutput {
            sheet: sheet.query_value(),
            rows,
        })
        .collect();

    let rendered = if compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    Ok(rendered)
}

// --- Public Entrypoint ---

/// Resolves configuration, reads the requested sheets and returns the rendered output.
pub async fn run(cli: Cli) -> Result<String> {
    let config = resolve_config(&cli)?;
    let sheets = cli.command.sheet_ids();
    info!(
        "Reading {} sheet(s) from {} (strict: {})",
        sheets.len(),
        config.base_url,
        cli.strict
    );

    let results = if cli.strict {
        let client = SheetDbClient::from_config(&config)?;
        client
            .fetch_sheets(&sheets)
            .await
            .context("Failed to read sheets")?
    } else {
        ResilientFetcher::from_config(&config)?
            .fetch_many(&sheets)
            .await
    };

    render(&sheets, &results, cli.compact)
}

fn resolve_config(cli: &Cli) -> Result<SheetDbConfig> {
    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    Ok(config)
}
