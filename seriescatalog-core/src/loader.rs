//! CSV Loading
//!
//! Reads the message log and series sheets exported as CSV. Header names
//! are normalized (`Start Date` becomes `start_date`); cells are trimmed
//! and blank cells dropped.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::message::Message;
use crate::record::RawRecord;
use crate::series::Series;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// `" Cover-Art "` -> `"cover_art"`.
pub fn normalize_field_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Read every non-empty row of a CSV document.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_field_name)
        .collect();

    let mut records = vec![];
    for row in csv_reader.records() {
        let row = row?;
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .filter(|(name, value)| !name.is_empty() && !value.is_empty())
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();
        if !record.is_empty() {
            records.push(record);
        }
    }
    Ok(records)
}

pub fn load_records(path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    let records = read_records(file)?;
    debug!(file = %path.display(), rows = records.len(), "loaded records");
    Ok(records)
}

pub fn load_messages(path: &Path) -> Result<Vec<Message>, LoadError> {
    Ok(load_records(path)?.iter().map(Message::from_record).collect())
}

pub fn load_series(path: &Path) -> Result<Vec<Series>, LoadError> {
    Ok(load_records(path)?.iter().map(Series::from_record).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_field_name() {
        assert_eq!(normalize_field_name(" Start Date "), "start_date");
        assert_eq!(normalize_field_name("Cover-Art"), "cover_art");
    }

    #[test]
    fn test_read_records_skips_blank_cells_and_rows() {
        let data = "Title,Date,Series,Track\n\
                    \"Remain, Part 1\",\"Jan 5, 2014\",Abide,1\n\
                    ,,,\n\
                    Lone,,,\n";
        let records = read_records(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("title").map(String::as_str), Some("Remain, Part 1"));
        assert_eq!(records[0].get("date").map(String::as_str), Some("Jan 5, 2014"));
        assert!(!records[1].contains_key("date"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_records(Path::new("/nonexistent/messages.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
