//! # Table Assembly
//!
//! Builds and formats the twelve month grids in calendar order and keeps the
//! resulting blocks together as a [`TideDocument`]. The text sink writes the
//! blocks back to back; the print sink gives each block its own page.

use crate::correction::CorrectedFeed;
use crate::{formatter, grid, StationProfile, TableError};
use tracing::info;

/// Blank lines above each month block on a printed page.
pub const PAGE_TOP_MARGIN: usize = 6;

/// The twelve formatted month blocks of one station and year.
#[derive(Clone, Debug, PartialEq)]
pub struct TideDocument {
    blocks: Vec<String>,
}

impl TideDocument {
    /// Keep already formatted blocks, in the order given.
    pub fn assemble(blocks: Vec<String>) -> Self {
        TideDocument { blocks }
    }

    /// Month blocks in calendar order.
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    /// The whole document, as written to the text file.
    pub fn text(&self) -> String {
        self.blocks.concat()
    }

    /// One print page per month: top margin, then the block with every line
    /// centered on `page_columns` characters.
    pub fn pages(&self, page_columns: usize) -> Vec<String> {
        self.blocks
            .iter()
            .map(|block| {
                let margin = "\n".repeat(PAGE_TOP_MARGIN);
                let body = block
                    .split('\n')
                    .map(|line| center(line, page_columns))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("{margin}{body}")
            })
            .collect()
    }
}

fn center(line: &str, columns: usize) -> String {
    if line.is_empty() {
        return String::new();
    }
    let pad = columns.saturating_sub(line.chars().count()) / 2;
    format!("{}{}", " ".repeat(pad), line)
}

/// Lay out and format all twelve months of `year` for `station`.
pub fn build_document(
    feed: &CorrectedFeed,
    station: &StationProfile,
    year: i32,
) -> Result<TideDocument, TableError> {
    let blocks = grid::build_year_grids(feed, year)?
        .iter()
        .map(|grid| formatter::format_grid(grid, &station.name, station.meridian_deg))
        .collect::<Result<Vec<_>, _>>()?;

    info!(station = %station.name, year, months = blocks.len(), "assembled tide document");
    Ok(TideDocument::assemble(blocks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_plain_concatenation() {
        let document = TideDocument::assemble(vec!["\n\nA".to_string(), "\n\nB".to_string()]);
        assert_eq!(document.text(), "\n\nA\n\nB");
        assert_eq!(document.blocks().len(), 2);
    }

    #[test]
    fn test_pages_center_lines_below_margin() {
        let document = TideDocument::assemble(vec!["\nabcd\n".to_string()]);
        let pages = document.pages(10);

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0], format!("{}\n   abcd\n", "\n".repeat(PAGE_TOP_MARGIN)));
    }

    #[test]
    fn test_wide_lines_are_not_shifted() {
        assert_eq!(center("0123456789AB", 10), "0123456789AB");
    }
}
