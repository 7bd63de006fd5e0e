//! # Month Page Formatting
//!
//! Renders a [`MonthGrid`] into the fixed-width text block printed for one
//! month. The layout is byte-exact; both sinks copy it unmodified.
//!
//! ## Block Layout
//!
//! ```text
//! (three empty lines)
//! ESTACION<pad><station name><pad><MONTH> <year>
//! (empty line)
//! DIA   HORA   PIES METROS    DIA   HORA   PIES METROS    DIA   HORA   PIES METROS
//! (empty line)
//!   1   0615  2.952    0.9     11                          21
//! ... 55 grid rows ...
//! ```
//!
//! - every cell is right-aligned in a column at least 6 characters wide and
//!   columns are separated by one space
//! - the first three characters of every line are dropped (they are always
//!   blank), which gives 80-character lines for the standard grid
//! - the header padding centers the station name over the data rows
//!
//! ## Meridian Annotation
//!
//! `HORA DEL MERIDIANO 105° W.` is printed at the left edge of grid row 50,
//! the 53rd line of the body. Rows 50-54 of the first two blocks are always
//! blank, so the annotation and one trailing space overwrite the leading
//! blanks of that line and its width is unchanged.

use crate::grid::{MonthGrid, BLOCK_HEADERS, EXTRA_DAY_ROW, GRID_COLUMNS};
use crate::TableError;

/// Minimum printed column width.
pub const COLUMN_WIDTH: usize = 6;

/// Blank characters dropped from the start of every rendered line.
pub const LEADING_TRIM: usize = 3;

/// Grid row that carries the meridian annotation.
pub const MERIDIAN_ROW: usize = EXTRA_DAY_ROW;

/// Lines of the body above the first grid row: column header and blank line.
pub const BODY_HEADER_LINES: usize = 2;

/// Text printed on every page to name the station's time zone.
pub fn meridian_annotation(meridian_deg: u16) -> String {
    format!("HORA DEL MERIDIANO {:03}° W.", meridian_deg)
}

/// Render `grid` into its printed block.
pub fn format_grid(
    grid: &MonthGrid,
    station_name: &str,
    meridian_deg: u16,
) -> Result<String, TableError> {
    let widths = column_widths(grid);

    let header_cells = BLOCK_HEADERS.iter().cycle().take(GRID_COLUMNS).copied();
    let header = render_line(header_cells, &widths);

    let mut rows: Vec<String> = grid
        .rows()
        .map(|row| render_line(row.iter().map(|cell| cell.as_deref().unwrap_or("")), &widths))
        .collect();

    let annotation = meridian_annotation(meridian_deg);
    if let Some(line) = rows.get_mut(MERIDIAN_ROW) {
        *line = place_annotation(line, &annotation)?;
    }

    let title = title_line(
        station_name,
        grid.month.name,
        grid.year,
        header.chars().count(),
    );

    let mut block = String::new();
    block.push_str("\n\n\n");
    block.push_str(&title);
    block.push_str("\n\n");
    block.push_str(&header);
    block.push_str("\n\n");
    block.push_str(&rows.join("\n"));
    Ok(block)
}

/// `ESTACION`, the station name and `MONTH year`, padded so the name sits in
/// the middle of a `width`-character line.
pub fn title_line(station_name: &str, month_name: &str, year: i32, width: usize) -> String {
    let year = year.to_string();
    let unpadded = "ESTACION".len()
        + station_name.chars().count()
        + month_name.chars().count()
        + 1
        + year.len();
    let pad = ((width as i64 - unpadded as i64) / 2).max(0) as usize;
    let spaces = " ".repeat(pad);
    format!("ESTACION{spaces}{station_name}{spaces}{month_name} {year}")
}

// Widest of the header, the cells and the minimum, per column.
fn column_widths(grid: &MonthGrid) -> [usize; GRID_COLUMNS] {
    let mut widths = [COLUMN_WIDTH; GRID_COLUMNS];
    for (column, width) in widths.iter_mut().enumerate() {
        let header = BLOCK_HEADERS[column % BLOCK_HEADERS.len()].len();
        let widest = grid
            .rows()
            .filter_map(|row| row[column].as_deref())
            .map(|text| text.chars().count())
            .max()
            .unwrap_or(0);
        *width = (*width).max(header).max(widest);
    }
    widths
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let line = cells
        .zip(widths.iter())
        .map(|(text, &width)| format!("{text:>width$}"))
        .collect::<Vec<_>>()
        .join(" ");
    let trim = " ".repeat(LEADING_TRIM);
    match line.strip_prefix(trim.as_str()) {
        Some(rest) => rest.to_string(),
        None => line,
    }
}

/// Overwrite the leading blanks of `line` with `annotation` and one space.
fn place_annotation(line: &str, annotation: &str) -> Result<String, TableError> {
    let needed = annotation.chars().count() + 1;
    let reserved = line.chars().take_while(|c| *c == ' ').count();
    if reserved < needed {
        return Err(TableError::ReservedSpace {
            row: MERIDIAN_ROW,
            needed,
        });
    }
    // Blanks are single-byte, so `needed` chars are `needed` bytes
    Ok(format!("{annotation} {}", &line[needed..]))
}
