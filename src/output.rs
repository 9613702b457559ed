use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::WriterBuilder;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::ExtractError;
use crate::model::{ExtractionResult, TestRecord};

const JSON_INDENT: &[u8] = b"    ";

fn write_json_to<W: Write>(writer: W, result: &ExtractionResult) -> Result<(), ExtractError> {
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = Serializer::with_formatter(writer, formatter);
    result.serialize(&mut serializer)?;
    Ok(())
}

/// # Errors
///
/// Fails if the result cannot be serialized.
pub fn to_json_string(result: &ExtractionResult) -> Result<String, ExtractError> {
    let mut buffer = Vec::new();
    write_json_to(&mut buffer, result)?;
    String::from_utf8(buffer)
        .map_err(|error| ExtractError::InvalidOption(format!("invalid utf-8 json output: {error}")))
}

/// # Errors
///
/// Fails on I/O errors creating or writing `path`.
pub fn write_json(path: &Path, result: &ExtractionResult) -> Result<(), ExtractError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_json_to(&mut writer, result)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn write_csv_to<W: Write>(
    writer: W,
    tests: &[TestRecord],
    delimiter: u8,
) -> Result<W, ExtractError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_writer(writer);
    if tests.is_empty() {
        writer.write_record(["test_name", "result", "units", "bio_ref_interval"])?;
    }
    for record in tests {
        writer.serialize(record)?;
    }
    writer.flush()?;

    writer
        .into_inner()
        .map_err(|error| ExtractError::Io(error.into_error()))
}

/// # Errors
///
/// Fails on I/O or CSV errors writing `path`.
pub fn write_csv(path: &Path, tests: &[TestRecord], delimiter: u8) -> Result<(), ExtractError> {
    write_csv_to(File::create(path)?, tests, delimiter)?;
    Ok(())
}

/// # Errors
///
/// Fails if a record cannot be written as CSV.
pub fn write_csv_to_string(tests: &[TestRecord], delimiter: u8) -> Result<String, ExtractError> {
    let bytes = write_csv_to(Vec::<u8>::new(), tests, delimiter)?;
    String::from_utf8(bytes)
        .map_err(|error| ExtractError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}
