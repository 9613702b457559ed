use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::model::PatientInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatientField {
    Name,
    Age,
    Gender,
    LabNo,
    Collected,
    Received,
    Reported,
    ReportStatus,
}

impl PatientField {
    fn slot(self, info: &mut PatientInfo) -> &mut String {
        match self {
            Self::Name => &mut info.name,
            Self::Age => &mut info.age,
            Self::Gender => &mut info.gender,
            Self::LabNo => &mut info.lab_no,
            Self::Collected => &mut info.collected,
            Self::Received => &mut info.received,
            Self::Reported => &mut info.reported,
            Self::ReportStatus => &mut info.report_status,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum PostProcess {
    None,
    TruncateAt(&'static str),
}

impl PostProcess {
    fn apply(self, value: &str) -> String {
        match self {
            Self::None => value.to_string(),
            Self::TruncateAt(marker) => value
                .split(marker)
                .next()
                .unwrap_or_default()
                .trim()
                .to_string(),
        }
    }
}

struct FieldRule {
    field: PatientField,
    pattern: &'static str,
    post: PostProcess,
}

static FIELD_RULES: [FieldRule; 8] = [
    FieldRule {
        field: PatientField::Name,
        pattern: r"Name\s*:\s*(.*)",
        post: PostProcess::TruncateAt("Collected"),
    },
    FieldRule {
        field: PatientField::Age,
        pattern: r"Age\s*:\s*(\d+)",
        post: PostProcess::None,
    },
    FieldRule {
        field: PatientField::Gender,
        pattern: r"Gender\s*:\s*([A-Za-z]+)",
        post: PostProcess::None,
    },
    FieldRule {
        field: PatientField::LabNo,
        pattern: r"Lab\s*No\.\s*:\s*([A-Za-z0-9]+)",
        post: PostProcess::None,
    },
    FieldRule {
        field: PatientField::Collected,
        pattern: r"Collected\s*:\s*([\d:/APMapm \t]+)",
        post: PostProcess::None,
    },
    FieldRule {
        field: PatientField::Received,
        pattern: r"Received\s*:\s*([\d:/APMapm \t]+)",
        post: PostProcess::None,
    },
    FieldRule {
        field: PatientField::Reported,
        pattern: r"Reported\s*:\s*([\d:/APMapm \t]+)",
        post: PostProcess::None,
    },
    FieldRule {
        field: PatientField::ReportStatus,
        pattern: r"Report\s*Status\s*:\s*([A-Za-z]+)",
        post: PostProcess::None,
    },
];

static COMPILED_RULES: LazyLock<Vec<(&'static FieldRule, Regex)>> = LazyLock::new(|| {
    FIELD_RULES
        .iter()
        .map(|rule| {
            let regex = Regex::new(&format!("(?i){}", rule.pattern))
                .expect("hardcoded field regex is valid");
            (rule, regex)
        })
        .collect()
});

fn first_capture(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|capture| capture.get(1))
        .map(|value| value.as_str().trim().to_string())
}

#[must_use]
pub fn extract_patient_info(page_text: &str) -> PatientInfo {
    let mut info = PatientInfo::default();
    for (rule, regex) in COMPILED_RULES.iter() {
        if let Some(value) = first_capture(regex, page_text) {
            *rule.field.slot(&mut info) = rule.post.apply(&value);
        }
    }
    info
}

const TIMESTAMP_FORMATS: [&str; 5] = [
    "%d/%m/%Y %I:%M%p",
    "%d/%m/%Y %I:%M:%S%p",
    "%d/%m/%Y %I:%M %p",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// Dates are day-first; a bare date resolves to midnight.
#[must_use]
pub fn parse_report_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return None;
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(&normalized, "%d/%m/%Y")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
