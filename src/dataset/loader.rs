use super::{Dataset, Record};
use crate::error::{Error, Result};
use serde_json::{Number, Value};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Load an uploaded dataset file, choosing the parser by extension
pub fn load_file(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());

    let dataset = match ext.as_deref() {
        Some("csv") => from_csv_reader(File::open(path)?)?,
        Some("json") => {
            let mut text = String::new();
            File::open(path)?.read_to_string(&mut text)?;
            Dataset::from_json_str(&text)?
        }
        other => {
            return Err(Error::Dataset(format!(
                "unsupported dataset format {:?} for {:?}",
                other, path
            )))
        }
    };

    info!(
        path = %path.display(),
        records = dataset.len(),
        features = dataset.features().len(),
        "Dataset loaded"
    );
    Ok(dataset)
}

/// Parse CSV with a header row. Numeric cells become numbers, empty cells
/// become null, anything else is kept as a string.
pub fn from_csv_reader<R: Read>(reader: R) -> Result<Dataset> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv.headers()?.clone();

    let mut records = Vec::new();
    for row in csv.records() {
        let row = row?;
        let mut record = Record::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            record.insert(header.to_string(), parse_cell(cell));
        }
        records.push(record);
    }

    debug!(rows = records.len(), columns = headers.len(), "Parsed CSV dataset");
    Ok(Dataset::from_records(records))
}

fn parse_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = cell.parse::<i64>() {
        return Value::Number(n.into());
    }
    cell.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(cell.to_string()))
}
