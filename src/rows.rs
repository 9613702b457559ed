use tracing::debug;

use crate::model::Token;
use crate::profile::VerticalWindow;

/// Tokens judged to share one printed line, keyed by the vertical position
/// of the token that opened the row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    pub anchor: f64,
    pub tokens: Vec<&'a Token>,
}

impl Row<'_> {
    fn accepts(&self, y_position: f64, row_threshold: f64) -> bool {
        (y_position - self.anchor).abs() < row_threshold
    }
}

/// A token joins the first row, in discovery order, whose anchor lies
/// strictly within `row_threshold`. Anchors never move, so the result depends
/// on input order when rows sit closer than the threshold.
#[must_use]
pub fn cluster_rows<'a>(
    tokens: &'a [Token],
    window: VerticalWindow,
    row_threshold: f64,
    header_labels: &[String],
) -> Vec<Row<'a>> {
    let mut rows: Vec<Row<'a>> = Vec::new();
    let mut skipped_headers = 0_usize;
    let mut outside_window = 0_usize;

    for token in tokens {
        if !window.contains(token.y_position) {
            outside_window += 1;
            continue;
        }
        if header_labels.iter().any(|label| *label == token.text) {
            skipped_headers += 1;
            continue;
        }

        match rows
            .iter_mut()
            .find(|row| row.accepts(token.y_position, row_threshold))
        {
            Some(row) => row.tokens.push(token),
            None => rows.push(Row {
                anchor: token.y_position,
                tokens: vec![token],
            }),
        }
    }

    debug!(
        rows = rows.len(),
        skipped_headers, outside_window, "clustered tokens into rows"
    );
    rows
}
