//! # Tide Tables Core Library
//!
//! This library turns a station's annual tide-prediction feed into the printed
//! monthly tables used for official tide tables: for every month a grid of
//! calendar day, time and height (feet and meters), headed by the station name
//! and its meridian time.
//!
//! ## Design Philosophy
//!
//! ### Fixed Layout
//! - **Fixed-shape grids**: every month is a 55 × 12 table regardless of its
//!   length, so the printed pages line up from January to December
//! - **Byte-exact text**: whitespace padding is part of the output contract; the
//!   text and print sinks consume the formatted blocks unmodified
//!
//! ### Explicit Data Flow
//! The feed is read once, corrected once, and then only borrowed:
//!
//! 1. **Load**: parse the station tables and the `.LIS` feed ([`station`], [`feed`])
//! 2. **Trim**: drop a stray lead/trail row outside the calendar year
//! 3. **Correct**: subtract the mean-low-water baseline into a new value ([`correction`])
//! 4. **Lay out**: build one [`grid::MonthGrid`] per month ([`grid`], [`units`])
//! 5. **Format**: render each grid to its printed block ([`formatter`])
//! 6. **Assemble**: concatenate the twelve blocks and hand them to the sinks
//!    ([`document`], [`sink`])
//!
//! ## Core Types
//!
//! - [`StationProfile`]: name, meridian and baseline of one station
//! - [`RawEventRow`]: one day of the feed with up to five tide events
//! - [`TideEvent`]: a single (time, height) slot

use serde::{Deserialize, Serialize};

pub mod calendar;
pub mod config;
pub mod correction;
pub mod document;
pub mod error;
pub mod feed;
pub mod formatter;
pub mod grid;
pub mod sink;
pub mod station;
pub mod units;

pub use error::TableError;

/// Reserved raw value meaning "no event in this slot".
pub const SENTINEL: i32 = 9999;

/// Number of (time, height) slots carried by every feed row.
pub const EVENT_SLOTS: usize = 5;

/// Numeric station identifier shared by the feed and both reference tables.
pub type StationId = u32;

/// Everything the layout engine needs to know about a station.
///
/// Assembled by [`station::lookup_profile`] from the names table and the
/// baseline table; never modified afterwards.
///
/// # Example
/// ```
/// use tide_tables_lib::StationProfile;
///
/// let station = StationProfile {
///     id: 25023,
///     name: "MAZATLAN, SIN.".to_string(),
///     meridian_deg: 105,
///     baseline: 45.0,
/// };
/// assert_eq!(station.meridian_deg, 105);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StationProfile {
    /// Station identifier
    pub id: StationId,
    /// Display name printed in every month header
    pub name: String,
    /// Reference meridian in degrees west
    pub meridian_deg: u16,
    /// Mean low water, in the feed's height units (centimeters)
    pub baseline: f64,
}

/// One (time, height) slot of a feed row.
///
/// `time` is the raw `HHMM` value; `height` is in centimeters, raw or
/// baseline-corrected depending on which feed holds the row.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideEvent {
    pub time: i32,
    pub height: f64,
}

impl TideEvent {
    /// An empty slot, as the feed writes it.
    pub const EMPTY: TideEvent = TideEvent {
        time: SENTINEL,
        height: SENTINEL as f64,
    };

    /// True when the slot carries no event.
    pub fn is_sentinel(&self) -> bool {
        self.time == SENTINEL
    }
}

/// One record of the annual prediction feed.
///
/// Rows are consumed strictly in feed order: row `n` of a trimmed feed is day
/// `n + 1` of the year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawEventRow {
    /// Station the prediction belongs to
    pub station: StationId,
    /// Day-of-month indicator
    pub day: u32,
    /// Third feed column, carried through untouched
    pub aux: String,
    /// Up to five events; missing slots hold [`TideEvent::EMPTY`]
    pub events: [TideEvent; EVENT_SLOTS],
}

impl RawEventRow {
    /// A row with every slot empty.
    pub fn empty(station: StationId, day: u32) -> Self {
        RawEventRow {
            station,
            day,
            aux: String::new(),
            events: [TideEvent::EMPTY; EVENT_SLOTS],
        }
    }
}
