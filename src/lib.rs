mod columns;
mod error;
mod fields;
mod model;
mod output;
mod pdf_reader;
mod profile;
mod records;
mod rows;

use std::path::Path;

use tracing::debug;

pub use columns::{Column, RowCells, assign_columns};
pub use error::ExtractError;
pub use fields::{extract_patient_info, parse_report_timestamp};
pub use model::{ExtractionResult, PageContent, PatientInfo, TestRecord, Token};
pub use output::{to_json_string, write_csv, write_csv_to_string, write_json};
pub use pdf_reader::{read_first_page, read_first_page_from_path};
pub use profile::{ColumnBreakpoints, LayoutProfile, VerticalWindow};
pub use records::{DropReason, build_records, drop_reason};
pub use rows::{Row, cluster_rows};

/// # Errors
///
/// Fails only on invalid input: an inconsistent `profile` or a token with a
/// negative or non-finite coordinate. Missing fields and unusable rows are
/// represented as empty values, never as errors.
pub fn extract_page(
    page: &PageContent,
    profile: &LayoutProfile,
) -> Result<ExtractionResult, ExtractError> {
    profile.validate()?;
    for token in &page.tokens {
        token.validate()?;
    }

    let patient_info = extract_patient_info(&page.text);
    let rows = cluster_rows(
        &page.tokens,
        profile.window,
        profile.row_threshold,
        &profile.header_labels,
    );
    let row_count = rows.len();
    let tests = build_records(rows, &profile.columns, &profile.excluded_labels);

    debug!(
        tokens = page.tokens.len(),
        rows = row_count,
        tests = tests.len(),
        "extracted lab report page"
    );

    Ok(ExtractionResult {
        patient_info,
        tests,
    })
}

/// # Errors
///
/// See [`read_first_page`] and [`extract_page`].
pub fn extract_pdf_bytes(
    input_pdf: &[u8],
    profile: &LayoutProfile,
) -> Result<ExtractionResult, ExtractError> {
    let page = read_first_page(input_pdf)?;
    extract_page(&page, profile)
}

/// # Errors
///
/// See [`read_first_page_from_path`] and [`extract_page`].
pub fn extract_pdf_file(
    input_pdf: &Path,
    profile: &LayoutProfile,
) -> Result<ExtractionResult, ExtractError> {
    let page = read_first_page_from_path(input_pdf)?;
    extract_page(&page, profile)
}
