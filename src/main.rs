//! # Tide Tables Application Entry Point
//!
//! This binary crate wires the loaders, the layout engine and the sinks into
//! one batch run: read the station tables and the prediction feed, lay out and
//! format the twelve months, and write the text and print outputs.
//!
//! ```text
//! tide-tables [--year YYYY] [--config PATH] [--feed PATH] [--stdout] [--json] [--write-config]
//! ```
//!
//! `--stdout` prints the document instead of writing files; `--json` prints
//! the month grids. Without `--year` (and no year in the config) the year is
//! asked for on stdin.

use anyhow::{bail, Context};
use chrono::{Datelike, Local};
use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use tide_tables_lib::{
    config::{Config, CONFIG_FILE},
    correction, document, grid,
    feed::RawFeed,
    sink::OutputPaths,
    station::{self, BaselineTable, StationNames},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line options.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    year: Option<i32>,
    config: Option<PathBuf>,
    feed: Option<PathBuf>,
    stdout: bool,
    json: bool,
    write_config: bool,
}

impl CliArgs {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut cli = CliArgs::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--year" => {
                    let value = args.next().context("--year needs a value")?;
                    cli.year = Some(parse_year(&value)?);
                }
                "--config" => {
                    cli.config = Some(args.next().context("--config needs a path")?.into());
                }
                "--feed" => {
                    cli.feed = Some(args.next().context("--feed needs a path")?.into());
                }
                "--stdout" => cli.stdout = true,
                "--json" => cli.json = true,
                "--write-config" => cli.write_config = true,
                other => bail!("unknown argument: {other}"),
            }
        }
        Ok(cli)
    }
}

fn parse_year(value: &str) -> anyhow::Result<i32> {
    let year: i32 = value
        .trim()
        .parse()
        .with_context(|| format!("invalid year {value:?}"))?;
    if !(1..=9999).contains(&year) {
        bail!("year {year} is out of range");
    }
    Ok(year)
}

/// Ask for the year on stdin; an empty answer means the current year.
fn prompt_year() -> anyhow::Result<i32> {
    use std::io::Write;

    let current = Local::now().year();
    print!("Por favor, ingrese el año al que corresponden los datos [{current}]: ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    if answer.trim().is_empty() {
        Ok(current)
    } else {
        parse_year(&answer)
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = CliArgs::parse(env::args().skip(1))?;
    let config_path = cli.config.clone().unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    if cli.write_config {
        return config.save_to_path(&config_path);
    }

    let feed_path = cli.feed.clone().unwrap_or_else(|| config.input.feed.clone());
    let year = match cli.year.or(config.table.year) {
        Some(year) => year,
        None => prompt_year()?,
    };

    // Stale tables must not survive a failed run
    let outputs = OutputPaths::for_feed(&feed_path, &config.output.directory);
    let write_files = !(cli.stdout || cli.json);
    if write_files {
        outputs
            .remove_previous()
            .context("removing previous outputs")?;
    }

    let raw = RawFeed::load(&feed_path)
        .with_context(|| format!("reading feed {}", feed_path.display()))?;
    let station_id = raw.station_id()?;

    let names = StationNames::load(&config.input.stations)
        .with_context(|| format!("reading {}", config.input.stations.display()))?;
    let baselines = BaselineTable::load(&config.input.baselines)
        .with_context(|| format!("reading {}", config.input.baselines.display()))?;
    let station = station::lookup_profile(station_id, &names, &baselines)?;

    let feed = correction::apply_baseline(&raw.trim_year_boundaries(), station.baseline);

    if cli.json {
        let grids = grid::build_year_grids(&feed, year)?;
        println!("{}", serde_json::to_string_pretty(&grids)?);
        return Ok(());
    }

    let document = document::build_document(&feed, &station, year)?;

    if cli.stdout {
        print!("{}", document.text());
        return Ok(());
    }

    outputs
        .write_document(&document, config.output.page_columns)
        .with_context(|| {
            format!(
                "writing {} and {}",
                outputs.text.display(),
                outputs.pages.display()
            )
        })?;
    info!(station = %station.name, year, "tide tables complete");
    Ok(())
}
