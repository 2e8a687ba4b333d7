//! Grid generation: one block per visible row and time period.
//!
//! Block ids combine the row id with the calendar date of the period start
//! (`"<row>:YYYY-MM-DD"`), so a block keeps its id across scrolls and can stay
//! selected while it is regenerated.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::state::{Row, RowId};

/// One column of the time axis (a day, an hour, ... depending on zoom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodDate {
    /// Period start, absolute milliseconds.
    pub left_global: i64,
    /// Period end, absolute milliseconds.
    pub right_global: i64,
}

/// A grid cell: the intersection of a row and a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridBlock {
    pub id: String,
    pub row_id: RowId,
    pub time: PeriodDate,
    /// Top of the owning row in chart-local pixels.
    pub top: f64,
    #[serde(default)]
    pub selecting: bool,
    #[serde(default)]
    pub selected: bool,
}

/// A row of the grid with its blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub row_id: RowId,
    pub top: f64,
    pub blocks: Vec<GridBlock>,
    #[serde(default)]
    pub selecting: bool,
    #[serde(default)]
    pub selected: bool,
}

/// Hook applied to every block right after it is created.
#[derive(Clone)]
pub struct BlockHook(Rc<dyn Fn(GridBlock) -> GridBlock>);

impl BlockHook {
    pub fn new(f: impl Fn(GridBlock) -> GridBlock + 'static) -> Self {
        Self(Rc::new(f))
    }

    #[must_use]
    pub fn apply(&self, block: GridBlock) -> GridBlock {
        (self.0)(block)
    }
}

impl fmt::Debug for BlockHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BlockHook(..)")
    }
}

/// Calendar date (UTC) of an absolute millisecond timestamp, as `YYYY-MM-DD`.
///
/// Timestamps outside the representable range fall back to the raw number.
#[must_use]
pub fn date_key(time_ms: i64) -> String {
    let format = format_description!("[year]-[month]-[day]");
    match OffsetDateTime::from_unix_timestamp_nanos(i128::from(time_ms) * 1_000_000) {
        Ok(dt) => dt.format(&format).unwrap_or_else(|_| time_ms.to_string()),
        Err(_) => time_ms.to_string(),
    }
}

/// Composite id of the block for `row_id` starting at `left_global`.
#[must_use]
pub fn block_id(row_id: &str, left_global: i64) -> String {
    format!("{row_id}:{}", date_key(left_global))
}

/// Build grid rows for `visible_rows` (in display order) across `periods`.
///
/// Row tops accumulate from row heights, starting at 0. Every block passes through
/// `hooks` in order. Returns an empty grid when there are no periods.
#[must_use]
pub fn generate_blocks(visible_rows: &[&Row], periods: &[PeriodDate], hooks: &[BlockHook]) -> Vec<GridRow> {
    if periods.is_empty() {
        return Vec::new();
    }
    let mut top = 0.0;
    let mut grid = Vec::with_capacity(visible_rows.len());
    for row in visible_rows {
        let blocks = periods
            .iter()
            .map(|period| {
                let block = GridBlock {
                    id: block_id(&row.id, period.left_global),
                    row_id: row.id.clone(),
                    time: *period,
                    top,
                    selecting: false,
                    selected: false,
                };
                hooks.iter().fold(block, |b, hook| hook.apply(b))
            })
            .collect();
        grid.push(GridRow { row_id: row.id.clone(), top, blocks, selecting: false, selected: false });
        top += row.height;
    }
    grid
}
