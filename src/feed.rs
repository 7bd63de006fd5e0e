//! # Prediction Feed Loading
//!
//! Reads the station's annual prediction listing (`.LIS`) into
//! [`RawEventRow`]s.
//!
//! ## Record Layout
//!
//! The first non-blank line is a column header and is skipped. Every data line
//! is whitespace separated; its last 13 fields are:
//!
//! ```text
//! STN  DAY  AUX  TIME HGT  TIME HGT  TIME HGT  TIME HGT  TIME HGT
//! ```
//!
//! Some listings prefix each record with a running counter, which is ignored.
//! Empty slots carry the sentinel `9999` in both the time and height columns.
//!
//! ## Year Boundaries
//!
//! Listings occasionally carry one row of the previous or the next year. The
//! layout engine counts rows from January 1st, so [`RawFeed::trim_year_boundaries`]
//! drops a leading row that is not day 1 and a trailing row that is not day 31.

use crate::{RawEventRow, StationId, TableError, TideEvent, EVENT_SLOTS};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Fields per record once any leading counter is discarded.
const RECORD_FIELDS: usize = 3 + 2 * EVENT_SLOTS;

/// The feed exactly as read, before trimming and baseline correction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawFeed {
    rows: Vec<RawEventRow>,
}

impl RawFeed {
    pub fn from_rows(rows: Vec<RawEventRow>) -> Self {
        RawFeed { rows }
    }

    /// Read and parse a listing from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let feed = Self::parse(&path.display().to_string(), &contents)?;
        info!(path = %path.display(), rows = feed.rows.len(), "loaded prediction feed");
        Ok(feed)
    }

    /// Parse listing text. `origin` names the source in error messages.
    pub fn parse(origin: &str, contents: &str) -> Result<Self, TableError> {
        let mut lines = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        // Column header
        lines.next();

        let rows = lines
            .map(|(index, line)| parse_record(origin, index + 1, line))
            .collect::<Result<Vec<_>, _>>()?;

        if rows.is_empty() {
            return Err(TableError::EmptyFeed);
        }
        Ok(RawFeed { rows })
    }

    /// Station named by the first record.
    pub fn station_id(&self) -> Result<StationId, TableError> {
        self.rows
            .first()
            .map(|row| row.station)
            .ok_or(TableError::EmptyFeed)
    }

    /// Drop a first row that is not day 1 and a last row that is not day 31.
    pub fn trim_year_boundaries(mut self) -> Self {
        if self.rows.first().is_some_and(|row| row.day != 1) {
            let dropped = self.rows.remove(0);
            debug!(day = dropped.day, "dropped leading row outside the year");
        }
        if self.rows.last().is_some_and(|row| row.day != 31) {
            if let Some(dropped) = self.rows.pop() {
                debug!(day = dropped.day, "dropped trailing row outside the year");
            }
        }
        self
    }

    pub fn rows(&self) -> &[RawEventRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn parse_record(origin: &str, line_no: usize, line: &str) -> Result<RawEventRow, TableError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < RECORD_FIELDS {
        return Err(TableError::Malformed {
            origin: origin.to_string(),
            line: line_no,
            reason: format!(
                "expected {} fields, found {}",
                RECORD_FIELDS,
                fields.len()
            ),
        });
    }
    let fields = &fields[fields.len() - RECORD_FIELDS..];

    let mut events = [TideEvent::EMPTY; EVENT_SLOTS];
    for (slot, event) in events.iter_mut().enumerate() {
        let time: f64 = parse_field(origin, line_no, fields[3 + 2 * slot], "time")?;
        let height: f64 = parse_field(origin, line_no, fields[4 + 2 * slot], "height")?;
        *event = TideEvent {
            time: time as i32,
            height,
        };
    }

    Ok(RawEventRow {
        station: parse_field(origin, line_no, fields[0], "station id")?,
        day: parse_field(origin, line_no, fields[1], "day")?,
        aux: fields[2].to_string(),
        events,
    })
}

/// Parse one column value, reporting the source position on failure.
pub(crate) fn parse_field<T: FromStr>(
    origin: &str,
    line: usize,
    value: &str,
    what: &str,
) -> Result<T, TableError> {
    value.trim().parse().map_err(|_| TableError::Malformed {
        origin: origin.to_string(),
        line,
        reason: format!("invalid {what} {value:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LISTING: &str = "\
STN DATE HL TIME HGT TIME HGT TIME HGT TIME HGT TIME HGT
1 25023 31 12 0412 95 1033 12 1650 88 2248 30 9999 9999
2 25023 1 1 0502 97 1120 10 1741 90 2335 28 9999 9999
3 25023 2 1 0551 99 1208 8 1830 91 9999 9999 9999 9999
4 25023 1 1 0025 27 0640 100 1255 7 1918 92 9999 9999
";

    #[test]
    fn test_parse_skips_header_and_counter() {
        let feed = RawFeed::parse("HL25023.LIS", LISTING).unwrap();
        assert_eq!(feed.len(), 4);

        let row = &feed.rows()[1];
        assert_eq!(row.station, 25023);
        assert_eq!(row.day, 1);
        assert_eq!(row.aux, "1");
        assert_eq!(row.events[0], TideEvent { time: 502, height: 97.0 });
        assert!(row.events[4].is_sentinel());
    }

    #[test]
    fn test_parse_without_counter_column() {
        let text = "header\n25023 1 1 0615 120 9999 9999 9999 9999 9999 9999 9999 9999\n";
        let feed = RawFeed::parse("feed", text).unwrap();
        assert_eq!(feed.rows()[0].events[0].time, 615);
        assert_eq!(feed.station_id().unwrap(), 25023);
    }

    #[test]
    fn test_trim_drops_rows_outside_year() {
        let feed = RawFeed::parse("HL25023.LIS", LISTING).unwrap();
        let trimmed = feed.trim_year_boundaries();
        let days: Vec<u32> = trimmed.rows().iter().map(|row| row.day).collect();
        // Leading Dec 31 and trailing Jan 1 are gone
        assert_eq!(days, vec![1, 2]);
    }

    #[test]
    fn test_trim_keeps_complete_year() {
        let rows = vec![RawEventRow::empty(1, 1), RawEventRow::empty(1, 31)];
        let feed = RawFeed::from_rows(rows.clone()).trim_year_boundaries();
        assert_eq!(feed.rows(), rows.as_slice());
    }

    #[test]
    fn test_short_record_is_malformed() {
        let text = "header\n25023 1 1 0615 120\n";
        match RawFeed::parse("feed", text) {
            Err(TableError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_height_is_malformed() {
        let text = "header\n25023 1 1 0615 abc 9999 9999 9999 9999 9999 9999 9999 9999\n";
        assert!(matches!(
            RawFeed::parse("feed", text),
            Err(TableError::Malformed { .. })
        ));
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(matches!(
            RawFeed::parse("feed", "STN DATE HL\n\n"),
            Err(TableError::EmptyFeed)
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(LISTING.as_bytes()).unwrap();
        let feed = RawFeed::load(file.path()).unwrap();
        assert_eq!(feed.len(), 4);
    }
}
