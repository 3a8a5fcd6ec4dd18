// Tabular ADP export: one CSV row per player ranked by average pick.
//
// The per-player list of individual picks stays in memory only; it has no
// fixed width and is left out of the table.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::adp::aggregate::{AdpAggregate, AdpTable, TieBreak};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// One exported line. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub rank: usize,
    pub player_name: String,
    pub times_drafted: usize,
    /// One decimal with a trailing `%`, e.g. `"66.7%"`.
    pub draft_percentage: String,
    pub average_pick: f64,
    pub median_pick: f64,
    pub earliest_pick: u32,
    pub latest_pick: u32,
    pub std_dev: f64,
}

impl ExportRow {
    fn from_aggregate(rank: usize, a: &AdpAggregate) -> Self {
        Self {
            rank,
            player_name: a.player_name.clone(),
            times_drafted: a.times_drafted,
            draft_percentage: format!("{:.1}%", a.draft_percentage),
            average_pick: a.average_pick,
            median_pick: a.median_pick,
            earliest_pick: a.earliest_pick,
            latest_pick: a.latest_pick,
            std_dev: a.std_dev,
        }
    }
}

/// Exported line as read back. Every column is taken as text first so a
/// blank or garbled number degrades to zero instead of dropping the row.
#[derive(Debug, Deserialize)]
struct RawExportRow {
    #[serde(default)]
    rank: String,
    player_name: String,
    #[serde(default)]
    times_drafted: String,
    #[serde(default)]
    draft_percentage: String,
    #[serde(default)]
    average_pick: String,
    #[serde(default)]
    median_pick: String,
    #[serde(default)]
    earliest_pick: String,
    #[serde(default)]
    latest_pick: String,
    #[serde(default)]
    std_dev: String,
}

fn parse_or_zero<T: std::str::FromStr + Default>(s: &str) -> T {
    s.trim().parse().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Ranked rows for `table`; rank is 1-based and assigned after sorting.
pub fn ranked_rows(table: &AdpTable, tie_break: TieBreak) -> Vec<ExportRow> {
    table
        .ranked(tie_break)
        .into_iter()
        .enumerate()
        .map(|(i, a)| ExportRow::from_aggregate(i + 1, a))
        .collect()
}

/// Write the ranked table as CSV with a header row. Returns the number of
/// player rows written.
pub fn export<W: Write>(table: &AdpTable, writer: W, tie_break: TieBreak) -> Result<usize, ExportError> {
    let rows = ranked_rows(table, tie_break);
    let mut wtr = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        // serde-driven headers are only emitted alongside the first record
        wtr.write_record(HEADER)?;
    }
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(rows.len())
}

/// Column names of the export, in order.
pub const HEADER: [&str; 9] = [
    "rank",
    "player_name",
    "times_drafted",
    "draft_percentage",
    "average_pick",
    "median_pick",
    "earliest_pick",
    "latest_pick",
    "std_dev",
];

/// [`export`] to a file, creating parent directories as needed.
pub fn export_to_path(table: &AdpTable, path: &Path, tie_break: TieBreak) -> Result<usize, ExportError> {
    let io_err = |source: std::io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = File::create(path).map_err(io_err)?;
    let written = export(table, file, tie_break)?;
    info!(
        "ADP data exported to {} ({} players, {} drafts)",
        path.display(),
        written,
        table.total_drafts()
    );
    Ok(written)
}

/// Timestamped default file name, e.g. `custom_adp_20250812_193005.csv`.
pub fn default_export_name(now: NaiveDateTime) -> String {
    now.format("custom_adp_%Y%m%d_%H%M%S.csv").to_string()
}

// ---------------------------------------------------------------------------
// Read back
// ---------------------------------------------------------------------------

/// Parse a previously exported table. Rows missing a player name are
/// skipped; unparseable numeric cells read as zero.
pub fn read_export<R: Read>(rdr: R) -> Result<Vec<ExportRow>, ExportError> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawExportRow>() {
        match result {
            Ok(raw) => {
                if raw.player_name.trim().is_empty() {
                    warn!("skipping exported row without a player name");
                    continue;
                }
                rows.push(ExportRow {
                    rank: parse_or_zero(&raw.rank),
                    player_name: raw.player_name.trim().to_string(),
                    times_drafted: parse_or_zero(&raw.times_drafted),
                    draft_percentage: raw.draft_percentage.trim().to_string(),
                    average_pick: parse_or_zero(&raw.average_pick),
                    median_pick: parse_or_zero(&raw.median_pick),
                    earliest_pick: parse_or_zero(&raw.earliest_pick),
                    latest_pick: parse_or_zero(&raw.latest_pick),
                    std_dev: parse_or_zero(&raw.std_dev),
                });
            }
            Err(e) => {
                warn!("skipping malformed exported row: {}", e);
            }
        }
    }
    Ok(rows)
}
