//! Record sources
//!
//! Decodes persisted batches of repair requests. Two encodings are supported:
//!
//! - Text: one `<vehicle> <cost>` record per line. Blank lines and lines
//!   starting with `#` are skipped.
//! - JSON: an array of `{ "vehicle": ..., "cost": ... }` objects.
//!
//! Decoding is all-or-nothing: the first malformed unit fails the batch.

use serde::Deserialize;
use std::io::{self, BufRead};
use std::path::Path;
use tracing::trace;

use crate::domain::repair::Repair;
use crate::error::LoadError;

/// Placeholder path reported for I/O errors on anonymous readers
pub(crate) const STREAM_ORIGIN: &str = "<stream>";

/// Encoding of a persisted record batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordFormat {
    #[default]
    Text,
    Json,
}

impl RecordFormat {
    /// Picks the format from a file extension, falling back to text
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Wire shape of a JSON record, validated into a [`Repair`]
#[derive(Debug, Deserialize)]
struct RepairDto {
    vehicle: String,
    cost: f64,
}

/// Decode every record of a batch
///
/// # Errors
/// Returns an error if the reader fails or any unit is malformed. No records
/// are returned in that case.
pub fn read_records<R: BufRead>(reader: R, format: RecordFormat) -> Result<Vec<Repair>, LoadError> {
    match format {
        RecordFormat::Text => read_text(reader),
        RecordFormat::Json => read_json(reader),
    }
}

fn read_text<R: BufRead>(reader: R) -> Result<Vec<Repair>, LoadError> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| line_error(index + 1, e))?;
        if let Some(repair) = parse_line(index + 1, &line)? {
            records.push(repair);
        }
    }
    Ok(records)
}

fn read_json<R: BufRead>(reader: R) -> Result<Vec<Repair>, LoadError> {
    let dtos: Vec<RepairDto> = serde_json::from_reader(reader)?;
    dtos.into_iter()
        .enumerate()
        .map(|(index, dto)| {
            Repair::new(dto.vehicle, dto.cost)
                .map_err(|source| LoadError::InvalidRecord { index: index + 1, source })
        })
        .collect()
}

/// Classify a failure to read one line of a text source
///
/// Bytes that are not UTF-8 make the line malformed; anything else means the
/// source itself could not be read.
pub(crate) fn line_error(line_number: usize, err: io::Error) -> LoadError {
    if err.kind() == io::ErrorKind::InvalidData {
        LoadError::malformed(line_number, "line is not valid UTF-8")
    } else {
        LoadError::io(STREAM_ORIGIN, err)
    }
}

/// Parse one line of a text source
///
/// Returns `Ok(None)` for blank and comment lines.
pub(crate) fn parse_line(line_number: usize, line: &str) -> Result<Option<Repair>, LoadError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    trace!(line = line_number, "parsing repair record");
    trimmed
        .parse::<Repair>()
        .map(Some)
        .map_err(|e| LoadError::malformed(line_number, e.to_string()))
}
