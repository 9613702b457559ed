use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::fields::parse_report_timestamp;

/// A word on the page with its horizontal start and its top edge, both in
/// points measured from the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub x_start: f64,
    pub y_position: f64,
}

impl Token {
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidToken`] for negative or non-finite coordinates.
    pub fn new(
        text: impl Into<String>,
        x_start: f64,
        y_position: f64,
    ) -> Result<Self, ExtractError> {
        let token = Self {
            text: text.into(),
            x_start,
            y_position,
        };
        token.validate()?;
        Ok(token)
    }

    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidToken`] for negative or non-finite coordinates.
    pub fn validate(&self) -> Result<(), ExtractError> {
        for (axis, value) in [("x_start", self.x_start), ("y_position", self.y_position)] {
            if !value.is_finite() {
                return Err(self.invalid(format!("{axis} is not a finite number")));
            }
            if value < 0.0 {
                return Err(self.invalid(format!("{axis} is negative ({value})")));
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> ExtractError {
        ExtractError::InvalidToken {
            text: self.text.clone(),
            reason,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    pub text: String,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub lab_no: String,
    pub collected: String,
    pub received: String,
    pub reported: String,
    pub report_status: String,
}

impl PatientInfo {
    #[must_use]
    pub fn collected_at(&self) -> Option<NaiveDateTime> {
        parse_report_timestamp(&self.collected)
    }

    #[must_use]
    pub fn received_at(&self) -> Option<NaiveDateTime> {
        parse_report_timestamp(&self.received)
    }

    #[must_use]
    pub fn reported_at(&self) -> Option<NaiveDateTime> {
        parse_report_timestamp(&self.reported)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    pub test_name: String,
    pub result: String,
    pub units: String,
    pub bio_ref_interval: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub patient_info: PatientInfo,
    pub tests: Vec<TestRecord>,
}
