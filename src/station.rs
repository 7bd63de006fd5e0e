//! # Station Reference Tables
//!
//! A station's profile is spread over two tables keyed by station id:
//!
//! - **Names table** (`ESTACIONES.txt`, no header): id, display name, then
//!   coordinates. Names contain single spaces and punctuation, so a column
//!   break is a whitespace run that follows a `.` or a digit, or that precedes
//!   two digits: `25023 MAZATLAN, SIN. 23 11.8` splits as
//!   `25023 | MAZATLAN, SIN. | 23 | 11.8`.
//! - **Baseline table** (`NBMI.txt`, one header line): columns are separated
//!   by tabs or by runs of three or more spaces. The id column is headed
//!   `000`; column 4 is the meridian (degrees west) and column 5 the mean low
//!   water used as baseline.
//!
//! A station missing from either table stops the run: without it there is no
//! name to print and no baseline to subtract.

use crate::feed::parse_field;
use crate::{StationId, StationProfile, TableError};
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::info;

const NAMES_TABLE: &str = "station names table";
const BASELINE_TABLE: &str = "baseline table";

/// Whitespace runs; only some of them separate names-table columns.
const NAME_GAP: &str = r"\s+";
/// Tab runs with their trailing blanks, or three or more blanks.
const BASELINE_SEPARATOR: &str = r"\t+\s*|\s{3,}";

/// Highest meridian a baseline row may name.
const MAX_MERIDIAN: f64 = 360.0;

const ID_HEADER: &str = "000";
const MERIDIAN_COLUMN: usize = 4;
const BASELINE_COLUMN: usize = 5;

/// Station ids and display names.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StationNames {
    entries: Vec<(StationId, String)>,
}

impl StationNames {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let names = Self::parse(&path.display().to_string(), &fs::read_to_string(path)?)?;
        info!(path = %path.display(), stations = names.entries.len(), "loaded station names");
        Ok(names)
    }

    pub fn parse(origin: &str, contents: &str) -> Result<Self, TableError> {
        let gaps = Regex::new(NAME_GAP)?;
        let mut entries = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_name_columns(line, &gaps);
            if fields.len() < 2 {
                return Err(TableError::Malformed {
                    origin: origin.to_string(),
                    line: index + 1,
                    reason: "expected station id and name".to_string(),
                });
            }
            let id: StationId = parse_field(origin, index + 1, fields[0], "station id")?;
            entries.push((id, fields[1].to_string()));
        }
        Ok(StationNames { entries })
    }

    pub fn name(&self, id: StationId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, name)| name.as_str())
    }
}

/// Meridian and baseline of one station.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaselineEntry {
    pub id: StationId,
    pub meridian_deg: u16,
    pub baseline: f64,
}

/// The mean-low-water table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BaselineTable {
    entries: Vec<BaselineEntry>,
}

impl BaselineTable {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let table = Self::parse(&path.display().to_string(), &fs::read_to_string(path)?)?;
        info!(path = %path.display(), stations = table.entries.len(), "loaded baseline table");
        Ok(table)
    }

    pub fn parse(origin: &str, contents: &str) -> Result<Self, TableError> {
        let separators = Regex::new(BASELINE_SEPARATOR)?;
        let mut lines = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let id_column = lines
            .next()
            .and_then(|(_, header)| {
                split_baseline_columns(header, &separators)
                    .iter()
                    .position(|name| *name == ID_HEADER)
            })
            .unwrap_or(0);

        let mut entries = Vec::new();
        for (index, line) in lines {
            let line_no = index + 1;
            let fields = split_baseline_columns(line, &separators);
            let needed = id_column.max(BASELINE_COLUMN) + 1;
            if fields.len() < needed {
                return Err(TableError::Malformed {
                    origin: origin.to_string(),
                    line: line_no,
                    reason: format!("expected {needed} columns, found {}", fields.len()),
                });
            }
            let meridian: f64 = parse_field(origin, line_no, fields[MERIDIAN_COLUMN], "meridian")?;
            if !(0.0..=MAX_MERIDIAN).contains(&meridian) {
                return Err(TableError::Malformed {
                    origin: origin.to_string(),
                    line: line_no,
                    reason: format!("meridian {meridian} outside 0..={MAX_MERIDIAN}"),
                });
            }
            entries.push(BaselineEntry {
                id: parse_field(origin, line_no, fields[id_column], "station id")?,
                meridian_deg: meridian.trunc() as u16,
                baseline: parse_field(origin, line_no, fields[BASELINE_COLUMN], "baseline")?,
            });
        }
        Ok(BaselineTable { entries })
    }

    pub fn entry(&self, id: StationId) -> Option<&BaselineEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }
}

/// Join both tables into the profile of station `id`.
pub fn lookup_profile(
    id: StationId,
    names: &StationNames,
    baselines: &BaselineTable,
) -> Result<StationProfile, TableError> {
    let name = names.name(id).ok_or(TableError::StationNotFound {
        id,
        table: NAMES_TABLE,
    })?;
    let entry = baselines.entry(id).ok_or(TableError::StationNotFound {
        id,
        table: BASELINE_TABLE,
    })?;

    let profile = StationProfile {
        id,
        name: name.to_string(),
        meridian_deg: entry.meridian_deg,
        baseline: entry.baseline,
    };
    info!(
        id,
        name = %profile.name,
        meridian = profile.meridian_deg,
        baseline = profile.baseline,
        "resolved station"
    );
    Ok(profile)
}

/// Split a names-table line at the whitespace runs matched by `gaps` that
/// follow `.` or a digit, or that precede two digits.
fn split_name_columns<'a>(line: &'a str, gaps: &Regex) -> Vec<&'a str> {
    let line = line.trim();
    let mut fields = Vec::new();
    let mut field_start = 0;

    for gap in gaps.find_iter(line) {
        let after_break = line[..gap.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c == '.' || c.is_ascii_digit());
        let before_number = line[gap.end()..]
            .chars()
            .take(2)
            .filter(char::is_ascii_digit)
            .count()
            == 2;

        if after_break || before_number {
            fields.push(&line[field_start..gap.start()]);
            field_start = gap.end();
        }
    }
    fields.push(&line[field_start..]);
    fields
}

/// Split a baseline-table line at the separators matched by `separators`.
fn split_baseline_columns<'a>(line: &'a str, separators: &Regex) -> Vec<&'a str> {
    separators.split(line.trim()).map(str::trim).collect()
}
