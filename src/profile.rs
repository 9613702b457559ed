use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

pub const DEFAULT_TEST_COL_END: f64 = 272.0;
pub const DEFAULT_RESULTS_COL_END: f64 = 385.0;
pub const DEFAULT_UNITS_COL_END: f64 = 484.0;
pub const DEFAULT_TABLE_START_Y: f64 = 238.0;
pub const DEFAULT_TABLE_END_Y: f64 = 678.0;
pub const DEFAULT_ROW_THRESHOLD: f64 = 10.0;

pub const DEFAULT_HEADER_LABELS: [&str; 4] = ["TestName", "Results", "Units", "Bio.Ref.Interval"];
pub const DEFAULT_EXCLUDED_LABELS: [&str; 1] = ["LIVERPANEL"];

fn parse_coordinates<const N: usize>(spec: &str, what: &str) -> Result<[f64; N], String> {
    let parts = spec.split(',').map(str::trim).collect::<Vec<_>>();
    if parts.len() != N {
        return Err(format!(
            "invalid {what} '{spec}', expected exactly {N} comma-separated numbers"
        ));
    }

    let mut values = [0.0; N];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("invalid {what} coordinate: '{part}'"))?;
    }
    Ok(values)
}

/// Horizontal column boundaries. A token belongs to the first column whose
/// end lies strictly to the right of its start; anything past `units_col_end`
/// is the reference interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnBreakpoints {
    pub test_col_end: f64,
    pub results_col_end: f64,
    pub units_col_end: f64,
}

impl Default for ColumnBreakpoints {
    fn default() -> Self {
        Self {
            test_col_end: DEFAULT_TEST_COL_END,
            results_col_end: DEFAULT_RESULTS_COL_END,
            units_col_end: DEFAULT_UNITS_COL_END,
        }
    }
}

impl ColumnBreakpoints {
    fn validate(&self) -> Result<(), String> {
        let ends = [self.test_col_end, self.results_col_end, self.units_col_end];
        if ends.iter().any(|end| !end.is_finite() || *end < 0.0) {
            return Err("column breakpoints must be finite and non-negative".to_string());
        }
        if !(self.test_col_end < self.results_col_end && self.results_col_end < self.units_col_end)
        {
            return Err(format!(
                "column breakpoints must be strictly increasing, got {},{},{}",
                self.test_col_end, self.results_col_end, self.units_col_end
            ));
        }
        Ok(())
    }
}

impl FromStr for ColumnBreakpoints {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let [test_col_end, results_col_end, units_col_end] =
            parse_coordinates::<3>(spec, "column breakpoints")?;
        let breakpoints = Self {
            test_col_end,
            results_col_end,
            units_col_end,
        };
        breakpoints.validate()?;
        Ok(breakpoints)
    }
}

/// Inclusive vertical range holding the result table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerticalWindow {
    pub start: f64,
    pub end: f64,
}

impl Default for VerticalWindow {
    fn default() -> Self {
        Self {
            start: DEFAULT_TABLE_START_Y,
            end: DEFAULT_TABLE_END_Y,
        }
    }
}

impl VerticalWindow {
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: 0.0,
            end: f64::MAX,
        }
    }

    #[must_use]
    pub fn contains(&self, y: f64) -> bool {
        self.start <= y && y <= self.end
    }

    fn validate(&self) -> Result<(), String> {
        if !self.start.is_finite() || !self.end.is_finite() || self.start < 0.0 {
            return Err("table window must be finite and non-negative".to_string());
        }
        if self.end < self.start {
            return Err(format!(
                "table window end ({}) is above its start ({})",
                self.end, self.start
            ));
        }
        Ok(())
    }
}

impl FromStr for VerticalWindow {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let [start, end] = parse_coordinates::<2>(spec, "table window")?;
        let window = Self { start, end };
        window.validate()?;
        Ok(window)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutProfile {
    pub columns: ColumnBreakpoints,
    pub window: VerticalWindow,
    pub row_threshold: f64,
    /// Column captions repeated inside the table area; tokens matching one
    /// exactly are never treated as data.
    pub header_labels: Vec<String>,
    pub excluded_labels: Vec<String>,
}

impl Default for LayoutProfile {
    fn default() -> Self {
        Self {
            columns: ColumnBreakpoints::default(),
            window: VerticalWindow::default(),
            row_threshold: DEFAULT_ROW_THRESHOLD,
            header_labels: DEFAULT_HEADER_LABELS.map(str::to_string).to_vec(),
            excluded_labels: DEFAULT_EXCLUDED_LABELS.map(str::to_string).to_vec(),
        }
    }
}

impl LayoutProfile {
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidProfile`] when the breakpoints, window,
    /// threshold or labels cannot describe a real layout.
    pub fn validate(&self) -> Result<(), ExtractError> {
        self.columns.validate().map_err(ExtractError::InvalidProfile)?;
        self.window.validate().map_err(ExtractError::InvalidProfile)?;
        if !self.row_threshold.is_finite() || self.row_threshold <= 0.0 {
            return Err(ExtractError::InvalidProfile(format!(
                "row threshold must be a positive number, got {}",
                self.row_threshold
            )));
        }
        for (kind, labels) in [
            ("header label", &self.header_labels),
            ("excluded label", &self.excluded_labels),
        ] {
            if labels.iter().any(|label| label.trim().is_empty()) {
                return Err(ExtractError::InvalidProfile(format!(
                    "{kind} must not be empty or whitespace"
                )));
            }
        }
        Ok(())
    }
}
