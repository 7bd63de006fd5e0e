//! # Month Grid Builder
//!
//! Redistributes the flat, one-row-per-day feed into the fixed-shape grid of a
//! printed month page.
//!
//! ## Grid Shape
//!
//! A grid has 55 rows and 12 columns: three side-by-side blocks of
//! `DIA | HORA | PIES | METROS`. Each day takes five rows, one per event slot:
//!
//! ```text
//!        block 0          block 1          block 2
//! row 0  day 1  slot 0    day 11 slot 0    day 21 slot 0
//! row 1  day 1  slot 1    day 11 slot 1    day 21 slot 1
//! ...
//! row 45 day 10 slot 0    day 20 slot 0    day 30 slot 0
//! ...
//! row 50                                   day 31 slot 0
//! row 54                                   day 31 slot 4
//! ```
//!
//! The day number is printed on the first row of its five; the other rows of
//! the `DIA` column stay blank.
//!
//! ## One Pass, Two Renderings
//!
//! [`collect_days`] walks the month's days once and produces a [`DayEvents`]
//! per calendar day. Times come from the month's hour origin and heights from
//! its height origin (they differ for January of a leap year, see
//! [`calendar`]). Times and heights are then rendered from those lists
//! independently, so the month boundary and sentinel rules live in a single
//! place:
//!
//! - a day whose feed row lies past the month's last row has no time, or no
//!   height, depending on which origin overran
//! - a slot whose time is the sentinel `9999` has no event
//!
//! Both cases leave the affected cells blank.

use crate::calendar::{self, MonthSpec};
use crate::correction::CorrectedFeed;
use crate::{units, RawEventRow, TableError, EVENT_SLOTS};
use serde::Serialize;
use tracing::{debug, warn};

/// Rows in every month grid.
pub const GRID_ROWS: usize = 55;
/// Columns in every month grid.
pub const GRID_COLUMNS: usize = BLOCKS * BLOCK_COLUMNS;
/// Side-by-side day blocks.
pub const BLOCKS: usize = 3;
/// Columns per block.
pub const BLOCK_COLUMNS: usize = 4;
/// Days stacked in one block before the 31st.
pub const DAYS_PER_BLOCK: u32 = 10;
/// First row of the reserved 31st day.
pub const EXTRA_DAY_ROW: usize = 50;
/// Column headers of one block.
pub const BLOCK_HEADERS: [&str; BLOCK_COLUMNS] = ["DIA", "HORA", "PIES", "METROS"];

/// Column within a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Day = 0,
    Hour = 1,
    Feet = 2,
    Meters = 3,
}

impl Column {
    /// Grid column index of this column in `block`.
    pub fn index(self, block: usize) -> usize {
        block * BLOCK_COLUMNS + self as usize
    }
}

/// The events of one calendar day, slot positions preserved.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DayEvents {
    /// Day of month, 1-based
    pub day: u32,
    /// Slot `n` holds the `n`-th time read at the day's hour row, if any
    pub times: [Option<i32>; EVENT_SLOTS],
    /// Slot `n` holds the `n`-th height read at the day's height row, if any
    pub heights: [Option<f64>; EVENT_SLOTS],
}

impl DayEvents {
    /// Number of slots with a time.
    pub fn event_count(&self) -> usize {
        self.times.iter().flatten().count()
    }
}

/// Grid block and first row where `day` is written.
pub fn day_position(day: u32) -> (usize, usize) {
    if day > BLOCKS as u32 * DAYS_PER_BLOCK {
        return (BLOCKS - 1, EXTRA_DAY_ROW);
    }
    let index = day.saturating_sub(1);
    let block = (index / DAYS_PER_BLOCK) as usize;
    let row = (index % DAYS_PER_BLOCK) as usize * EVENT_SLOTS;
    (block, row)
}

/// Walk the days of `month` once and collect every day's times and heights.
pub fn collect_days(feed: &CorrectedFeed, month: &MonthSpec) -> Vec<DayEvents> {
    let mut days = Vec::with_capacity(month.days as usize);
    for day in 1..=month.days {
        let hour_row = month
            .hour_row_for_day(day)
            .and_then(|index| feed_row(feed, month, day, index));
        let height_row = month
            .row_for_day(day)
            .and_then(|index| feed_row(feed, month, day, index));

        let mut times = [None; EVENT_SLOTS];
        if let Some(row) = hour_row {
            for (time, event) in times.iter_mut().zip(row.events.iter()) {
                if !event.is_sentinel() {
                    *time = Some(event.time);
                }
            }
        }

        let mut heights = [None; EVENT_SLOTS];
        if let Some(row) = height_row {
            for (height, event) in heights.iter_mut().zip(row.events.iter()) {
                if !event.is_sentinel() {
                    *height = Some(event.height);
                }
            }
        }

        days.push(DayEvents { day, times, heights });
    }
    days
}

fn feed_row<'a>(
    feed: &'a CorrectedFeed,
    month: &MonthSpec,
    day: u32,
    index: usize,
) -> Option<&'a RawEventRow> {
    let row = feed.row(index);
    if row.is_none() {
        warn!(month = month.name, day, row = index, "feed ends before this day");
    }
    row
}

/// One printed month: 55 rows of 12 cells, `None` meaning blank.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthGrid {
    pub month: MonthSpec,
    pub year: i32,
    cells: Vec<[Option<String>; GRID_COLUMNS]>,
}

impl MonthGrid {
    fn blank(month: MonthSpec, year: i32) -> Self {
        MonthGrid {
            month,
            year,
            cells: vec![Default::default(); GRID_ROWS],
        }
    }

    /// Cell text at `row`, `column`; `None` when blank or out of range.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.cells
            .get(row)
            .and_then(|cells| cells.get(column))
            .and_then(|cell| cell.as_deref())
    }

    /// Rows in print order.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<String>; GRID_COLUMNS]> {
        self.cells.iter()
    }

    /// Number of non-blank `DIA` cells.
    pub fn day_cells(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| (0..BLOCKS).map(move |block| &row[Column::Day.index(block)]))
            .filter(|cell| cell.is_some())
            .count()
    }

    pub(crate) fn set(&mut self, row: usize, column: usize, text: String) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|cells| cells.get_mut(column)) {
            *cell = Some(text);
        }
    }

    fn place_days(&mut self, days: &[DayEvents]) {
        for day in days {
            let (block, row) = day_position(day.day);
            self.set(row, Column::Day.index(block), day.day.to_string());
        }
    }

    fn place_times(&mut self, days: &[DayEvents]) {
        for day in days {
            let (block, base) = day_position(day.day);
            for (slot, time) in day.times.iter().enumerate() {
                if let Some(time) = time {
                    self.set(base + slot, Column::Hour.index(block), units::time_text(*time));
                }
            }
        }
    }

    fn place_heights(&mut self, days: &[DayEvents]) {
        for day in days {
            let (block, base) = day_position(day.day);
            for (slot, height) in day.heights.iter().enumerate() {
                if let Some(height) = height {
                    let row = base + slot;
                    self.set(row, Column::Feet.index(block), units::feet_text(*height));
                    self.set(row, Column::Meters.index(block), units::meters_text(*height));
                }
            }
        }
    }
}

/// Build the grid of `month` (1..=12) of `year` from the corrected feed.
pub fn build_month_grid(
    feed: &CorrectedFeed,
    month: u32,
    year: i32,
) -> Result<MonthGrid, TableError> {
    let spec = calendar::month_spec(month, year)?;
    let days = collect_days(feed, &spec);

    let mut grid = MonthGrid::blank(spec, year);
    grid.place_days(&days);
    grid.place_times(&days);
    grid.place_heights(&days);

    debug!(
        month = spec.name,
        year,
        events = days.iter().map(DayEvents::event_count).sum::<usize>(),
        "built month grid"
    );
    Ok(grid)
}

/// Grids for all twelve months of `year`.
pub fn build_year_grids(feed: &CorrectedFeed, year: i32) -> Result<Vec<MonthGrid>, TableError> {
    (1..=12)
        .map(|month| build_month_grid(feed, month, year))
        .collect()
}
