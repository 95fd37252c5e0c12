//! Trip history files
//!
//! Writes and reads a list of trip records as JSON.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::TripRecord;
use crate::error::Result;

/// Write trip records to a JSON file, replacing it
pub fn write_json<P: AsRef<Path>>(path: P, trips: &[TripRecord]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, trips)?;
    writer.flush()?;
    tracing::debug!(path = %path.as_ref().display(), count = trips.len(), "Wrote trip history");
    Ok(())
}

/// Read trip records from a JSON file
pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Vec<TripRecord>> {
    let file = File::open(path)?;
    let trips = serde_json::from_reader(BufReader::new(file))?;
    Ok(trips)
}

/// Put `newer` ahead of `older`, keeping at most `limit` records
pub fn merge_newest_first(
    newer: impl IntoIterator<Item = TripRecord>,
    older: impl IntoIterator<Item = TripRecord>,
    limit: usize,
) -> Vec<TripRecord> {
    newer.into_iter().chain(older).take(limit).collect()
}
