use crate::error::{RagError, RagResult};
use crate::models::Record;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct DatasetRow {
    #[serde(rename = "Question")]
    question: String,
    #[serde(rename = "Answer")]
    answer: String,
}

/// Reads the question/answer CSV. Columns other than `Question` and `Answer` are ignored.
pub fn load_records(path: &Path) -> RagResult<Vec<Record>> {
    let load_error = |reason: String| RagError::DatasetLoad {
        path: path.display().to_string(),
        reason,
    };

    log::info!("Loading dataset: {}", path.display());

    let mut reader = csv::Reader::from_path(path).map_err(|e| load_error(e.to_string()))?;
    let mut records = Vec::new();

    for (row, result) in reader.deserialize::<DatasetRow>().enumerate() {
        let parsed = result.map_err(|e| load_error(e.to_string()))?;
        records.push(Record {
            row,
            question: parsed.question,
            answer: parsed.answer,
        });
    }

    if records.is_empty() {
        return Err(load_error("dataset contains no records".to_string()));
    }

    log::info!("Loaded {} records", records.len());
    Ok(records)
}
