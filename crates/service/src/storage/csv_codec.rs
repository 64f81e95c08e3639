use csv::{ReaderBuilder, Terminator, WriterBuilder};

use crate::artists::domain::{Dataset, Record};
use crate::errors::ServiceError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse a comma-separated file with a header row.
///
/// With `declared` columns every record is conformed to them; otherwise the
/// file header becomes the dataset header. Rows shorter than the header get
/// empty cells, surplus cells are dropped.
pub fn decode(bytes: &[u8], declared: Option<&[String]>) -> Result<Dataset, ServiceError> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = ReaderBuilder::new().has_headers(true).flexible(true).from_reader(body);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut dataset = match declared {
        Some(columns) => Dataset::declared(columns.to_vec()),
        None => Dataset::with_columns(headers.clone()),
    };
    for row in reader.records() {
        let row = row?;
        let record: Record = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), row.get(i).unwrap_or("")))
            .collect();
        dataset.push(record);
    }
    Ok(dataset)
}

/// Serialise header plus rows, CRLF-terminated. A dataset without columns encodes to nothing.
pub fn encode(dataset: &Dataset) -> Result<Vec<u8>, ServiceError> {
    let columns = dataset.columns();
    if columns.is_empty() {
        return Ok(Vec::new());
    }
    let mut writer = WriterBuilder::new().terminator(Terminator::CRLF).from_writer(Vec::new());
    writer.write_record(columns)?;
    for record in dataset.records() {
        writer.write_record(columns.iter().map(|c| record.get(c).unwrap_or("")))?;
    }
    writer.into_inner().map_err(|e| ServiceError::Storage(e.to_string()))
}
