use tracing::debug;

use crate::columns::{RowCells, assign_columns};
use crate::model::TestRecord;
use crate::profile::ColumnBreakpoints;
use crate::rows::Row;

const METHOD_PREFIX: char = '(';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    EmptyTestName,
    MethodAnnotation,
    ExcludedLabel,
}

#[must_use]
pub fn drop_reason(cells: &RowCells, excluded_labels: &[String]) -> Option<DropReason> {
    let test_name = cells.test_name.trim();
    if test_name.is_empty() {
        return Some(DropReason::EmptyTestName);
    }
    if test_name.starts_with(METHOD_PREFIX) {
        return Some(DropReason::MethodAnnotation);
    }
    if excluded_labels
        .iter()
        .any(|label| test_name.contains(label.as_str()))
    {
        return Some(DropReason::ExcludedLabel);
    }
    None
}

#[must_use]
pub fn build_records(
    mut rows: Vec<Row<'_>>,
    breakpoints: &ColumnBreakpoints,
    excluded_labels: &[String],
) -> Vec<TestRecord> {
    rows.sort_by(|left, right| left.anchor.total_cmp(&right.anchor));

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let cells = assign_columns(row.tokens.iter().copied(), breakpoints);
        if let Some(reason) = drop_reason(&cells, excluded_labels) {
            debug!(anchor = row.anchor, ?reason, test_name = %cells.test_name, "dropping table row");
            continue;
        }

        records.push(TestRecord {
            test_name: cells.test_name,
            result: cells.result,
            units: cells.units,
            bio_ref_interval: cells.interval,
        });
    }
    records
}
