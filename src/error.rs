//! Error type shared by the loaders, the layout engine and the sinks.

use crate::StationId;
use std::io;
use thiserror::Error;

/// Errors that abort a tide-table run.
///
/// Cursor overruns past the end of a month are not errors: the layout engine
/// renders them as blank slots.
#[derive(Error, Debug)]
pub enum TableError {
    /// Reading an input table or writing an output file failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A column separator pattern failed to compile
    #[error("invalid column pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A line of an input table could not be split into the expected columns
    #[error("{origin}:{line}: {reason}")]
    Malformed {
        origin: String,
        line: usize,
        reason: String,
    },

    /// The feed contains no data rows
    #[error("prediction feed has no data rows")]
    EmptyFeed,

    /// The feed's station id is missing from one of the reference tables
    #[error("station {id} not found in {table}")]
    StationNotFound { id: StationId, table: &'static str },

    /// Month number outside 1..=12
    #[error("invalid month {0}, expected 1..=12")]
    InvalidMonth(u32),

    /// The annotation row does not reserve enough leading blanks
    #[error("row {row} does not reserve {needed} leading blanks for the meridian annotation")]
    ReservedSpace { row: usize, needed: usize },
}
