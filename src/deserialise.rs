//! Load the observations file from the file system and deserialise it to raw observations.

use std::{fs, path::Path};

use csv::ReaderBuilder;

use crate::{
    error::{Result, WindRoseError},
    reading::RawObservation,
};

const BOM: char = '\u{feff}';

/// Reads every row of `path`. A single malformed row fails the whole load.
pub fn read_observations(path: &Path) -> Result<Vec<RawObservation>> {
    if !path.is_file() {
        return Err(WindRoseError::MissingInputFile {
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(path)?;
    parse_observations(&contents)
}

pub fn parse_observations(contents: &str) -> Result<Vec<RawObservation>> {
    let contents = contents.strip_prefix(BOM).unwrap_or(contents);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let mut observations = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let line = record.position().map_or(idx + 1, |p| p.line() as usize);
        observations.push(RawObservation::from_record(&record, line)?);
    }

    tracing::debug!(rows = observations.len(), "parsed observations");

    Ok(observations)
}
