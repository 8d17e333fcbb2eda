//! Built-in checks for tabular and structured documents
//!
//! These run instead of the oracle. Each returns the lines that make up the
//! report body.

use csv::ReaderBuilder;
use serde_json::Value;

pub const CSV_NO_ERRORS: &str = "No errors found in CSV data.";
pub const JSON_NO_ERRORS: &str = "No errors found in JSON data.";
pub const JSON_NOT_AN_ARRAY: &str = "Input is not a JSON array of objects.";

/// Cell values read as missing, matching common dataframe NA conventions
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(cell: Option<&str>) -> bool {
    match cell {
        None => true,
        Some(value) => MISSING_MARKERS.contains(&value),
    }
}

/// Names every column with at least one missing cell, in column order
///
/// A row shorter than the header is missing its trailing cells.
pub fn missing_value_columns<R, C>(columns: &[String], rows: R) -> Vec<String>
where
    R: IntoIterator<Item = C>,
    C: AsRef<[String]>,
{
    let mut missing = vec![false; columns.len()];

    for row in rows {
        let row = row.as_ref();
        for (index, flag) in missing.iter_mut().enumerate() {
            if !*flag && is_missing(row.get(index).map(String::as_str)) {
                *flag = true;
            }
        }
    }

    columns
        .iter()
        .zip(missing)
        .filter(|(_, has_missing)| *has_missing)
        .map(|(name, _)| format!("Column {} contains missing values.", name))
        .collect()
}

/// Parses CSV text and reports columns with missing values
///
/// # Errors
///
/// Returns the parser error for input that is not well-formed CSV.
pub fn validate_csv(text: &str) -> Result<Vec<String>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let messages = missing_value_columns(&columns, rows);
    if messages.is_empty() {
        Ok(vec![CSV_NO_ERRORS.to_string()])
    } else {
        Ok(messages)
    }
}

/// Checks that a JSON document is an array of objects
///
/// Malformed JSON yields a decode message rather than an error.
pub fn validate_json(text: &str) -> Vec<String> {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => return vec![format!("JSON decode error: {}", e)],
    };

    let Value::Array(entries) = value else {
        return vec![JSON_NOT_AN_ARRAY.to_string()];
    };

    let messages: Vec<String> = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| !entry.is_object())
        .map(|(index, _)| format!("Entry at position {} is not an object.", index + 1))
        .collect();

    if messages.is_empty() {
        vec![JSON_NO_ERRORS.to_string()]
    } else {
        messages
    }
}
