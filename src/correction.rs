//! # Baseline Correction
//!
//! Heights in the feed are measured from the tide gauge's zero. Printed tables
//! give them relative to the station's mean low water, so the baseline is
//! subtracted from every height slot, all five of them, before any layout
//! happens.
//!
//! The correction produces a new [`CorrectedFeed`]; the raw feed is left as
//! read. Grid construction only accepts a `CorrectedFeed`, so it cannot run on
//! uncorrected data or on data corrected twice.

use crate::feed::RawFeed;
use crate::RawEventRow;
use serde::Serialize;
use tracing::debug;

/// Trimmed feed with heights relative to mean low water.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CorrectedFeed {
    rows: Vec<RawEventRow>,
    baseline: f64,
}

impl CorrectedFeed {
    /// Row `index` of the corrected feed, if the feed is that long.
    pub fn row(&self, index: usize) -> Option<&RawEventRow> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[RawEventRow] {
        &self.rows
    }

    /// Baseline that was subtracted.
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Subtract `baseline` from every height slot of `feed`.
///
/// Sentinel slots are corrected too; they are recognised by their time
/// column, which is never touched.
pub fn apply_baseline(feed: &RawFeed, baseline: f64) -> CorrectedFeed {
    let rows = feed
        .rows()
        .iter()
        .map(|row| {
            let mut row = row.clone();
            for event in row.events.iter_mut() {
                event.height -= baseline;
            }
            row
        })
        .collect::<Vec<_>>();

    debug!(rows = rows.len(), baseline, "applied baseline correction");
    CorrectedFeed { rows, baseline }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TideEvent, EVENT_SLOTS};

    fn feed_with_heights(heights: [f64; EVENT_SLOTS]) -> RawFeed {
        let mut row = RawEventRow::empty(25023, 1);
        for (slot, height) in heights.iter().enumerate() {
            row.events[slot] = TideEvent {
                time: 100 * slot as i32,
                height: *height,
            };
        }
        RawFeed::from_rows(vec![row])
    }

    #[test]
    fn test_every_slot_is_corrected() {
        let raw = feed_with_heights([120.0, 10.0, 95.0, 30.0, 0.0]);
        let corrected = apply_baseline(&raw, 30.0);

        let heights: Vec<f64> = corrected.rows()[0]
            .events
            .iter()
            .map(|event| event.height)
            .collect();
        assert_eq!(heights, vec![90.0, -20.0, 65.0, 0.0, -30.0]);
        assert_eq!(corrected.baseline(), 30.0);
    }

    #[test]
    fn test_raw_feed_is_untouched() {
        let raw = feed_with_heights([120.0; EVENT_SLOTS]);
        let _ = apply_baseline(&raw, 30.0);
        assert_eq!(raw.rows()[0].events[0].height, 120.0);
    }

    #[test]
    fn test_times_and_sentinels_are_preserved() {
        let raw = RawFeed::from_rows(vec![RawEventRow::empty(25023, 1)]);
        let corrected = apply_baseline(&raw, 45.5);
        assert!(corrected.rows()[0].events.iter().all(TideEvent::is_sentinel));
        assert_eq!(corrected.row(0).map(|row| row.day), Some(1));
        assert!(corrected.row(1).is_none());
    }
}
