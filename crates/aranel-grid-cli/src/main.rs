//! Command-line front end for the grid load engine.
//!
//! Reads a JSON array of product records and a JSON load request, runs the
//! request and prints the resulting page as JSON:
//!
//! ```text
//! aranel-grid --records products.json --options request.json --locale tr-TR
//! echo '{"sortColumn":"Price","sortDirection":"asc"}' | aranel-grid --records products.json
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use aranel_grid::{GridRecord, LoadOptions, Loader, Locale, DEFAULT_UTC_ADJUSTMENT_HOURS};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::Parser;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "aranel-grid")]
#[command(about = "Filter, sort and page a JSON record file", long_about = None)]
struct Cli {
    /// Path to a JSON array of product records
    #[arg(long)]
    records: PathBuf,
    /// Path to the JSON load request; "-" reads stdin
    #[arg(long, default_value = "-")]
    options: String,
    /// Culture tag used to parse filter values (e.g. en-US, tr-TR)
    #[arg(long, default_value = "invariant")]
    locale: String,
    /// Hours added to explicit UTC filter instants
    #[arg(long, default_value_t = DEFAULT_UTC_ADJUSTMENT_HOURS, allow_negative_numbers = true)]
    utc_offset_hours: i64,
    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, GridRecord)]
#[serde(rename_all = "PascalCase")]
#[grid(rename_all = "PascalCase")]
struct Product {
    id: i32,
    name: String,
    price: Decimal,
    category: String,
    release_date: NaiveDate,
    warranty_expiry: NaiveDateTime,
    in_stock: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let output = run(&cli)?;
    println!("{}", output);
    Ok(())
}

fn run(cli: &Cli) -> Result<String> {
    let locale =
        Locale::from_tag(&cli.locale).ok_or_else(|| anyhow!("unknown locale '{}'", cli.locale))?;

    let records_text = fs::read_to_string(&cli.records)
        .with_context(|| format!("failed to read records from {}", cli.records.display()))?;
    let products: Vec<Product> = serde_json::from_str(&records_text)
        .with_context(|| format!("invalid product records in {}", cli.records.display()))?;

    let options_text = read_options(&cli.options)?;
    let options: LoadOptions =
        serde_json::from_str(&options_text).context("invalid load request")?;

    tracing::debug!(records = products.len(), locale = locale.tag(), "running load");

    let utc_adjustment = Duration::try_hours(cli.utc_offset_hours)
        .ok_or_else(|| anyhow!("utc offset of {} hours is out of range", cli.utc_offset_hours))?;

    let loader = Loader::new().locale(locale).utc_adjustment(utc_adjustment);
    let page = loader.load(&options, &products)?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&page)?
    } else {
        serde_json::to_string(&page)?
    };
    Ok(json)
}

fn read_options(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read load request from stdin")?;
        return Ok(buf);
    }
    let path = Path::new(source);
    fs::read_to_string(path)
        .with_context(|| format!("failed to read load request from {}", path.display()))
}
