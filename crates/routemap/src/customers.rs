use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::{PipelineError, PipelineResult};

const HEADER_FIELD: &str = "postal_code";

/// Load the customer ledger: `postal_code,demand` lines, optional
/// header row, missing or empty demand defaults to 0. A demand field
/// that is present but not an integer is an error; silently zeroing a
/// typo would render a misleading map.
pub fn load_customers(path: &Path) -> PipelineResult<HashMap<String, i64>> {
    let raw = fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_owned(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let mut demands = HashMap::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|why| {
            PipelineError::malformed(format!(
                "{}: line {}: {}",
                path.display(),
                line + 1,
                why
            ))
        })?;

        let postal = match record.get(0) {
            Some(field) if !field.is_empty() && field != HEADER_FIELD => field,
            _ => continue,
        };

        let demand = match record.get(1) {
            Some(field) if !field.is_empty() => {
                field.parse::<i64>().map_err(|_| {
                    PipelineError::malformed(format!(
                        "{}: line {}: demand '{}' is not an integer",
                        path.display(),
                        line + 1,
                        field
                    ))
                })?
            }
            _ => 0,
        };

        demands.insert(postal.to_owned(), demand);
    }

    Ok(demands)
}
