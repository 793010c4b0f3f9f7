//! Report builders
//!
//! Two renderings of a dataset's routes for authoring QA: a plain-text
//! walkthrough and a matrix (CSV) with one row per route. Both are returned
//! as a [`Report`] carrying the download filename.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::dataset::Dataset;
use super::paths::{enumerate_checked, EnumerationError, EnumerationLimits, PathEnumerator, Route};
use super::validate::extra_validation;

const FILENAME_PREFIX: &str = "decision-tree";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Cannot enumerate routes, the graph contains cycles: {}", .0.join("; "))]
    Cyclic(Vec<String>),

    #[error(transparent)]
    Enumeration(#[from] EnumerationError),

    #[error("Failed to write matrix report: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write matrix report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Matrix report is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<csv::IntoInnerError<csv::Writer<Vec<u8>>>> for ReportError {
    fn from(err: csv::IntoInnerError<csv::Writer<Vec<u8>>>) -> Self {
        ReportError::Io(err.into_error())
    }
}

/// Which report to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    #[default]
    Text,
    Csv,
}

impl ReportKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportKind::Text => "txt",
            ReportKind::Csv => "csv",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(ReportKind::Text),
            "csv" | "matrix" => Ok(ReportKind::Csv),
            other => Err(format!("unknown report kind '{}' (expected txt or csv)", other)),
        }
    }
}

/// A rendered report ready to be written out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub filename: String,
    pub content: String,
}

impl Report {
    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}

/// Download filename for a report of the given kind
pub fn report_filename(dataset: &Dataset, kind: ReportKind) -> String {
    format!(
        "{}-{}.{}",
        FILENAME_PREFIX,
        dataset.filename_stem(),
        kind.extension()
    )
}

/// Builds the requested report
pub fn build_report(
    kind: ReportKind,
    dataset: &Dataset,
    limits: EnumerationLimits,
) -> Result<Report, ReportError> {
    let content = match kind {
        ReportKind::Text => build_text_report(dataset, limits)?,
        ReportKind::Csv => build_csv_report(dataset, limits)?,
    };

    Ok(Report {
        filename: report_filename(dataset, kind),
        content,
    })
}

/// Plain-text walkthrough of every route.
///
/// Graph errors are listed instead of hanging on a cycle: when any are
/// present the route section is left out.
pub fn build_text_report(
    dataset: &Dataset,
    limits: EnumerationLimits,
) -> Result<String, ReportError> {
    let findings = extra_validation(dataset);
    let routes = if findings.has_errors() {
        None
    } else {
        Some(PathEnumerator::new(limits).enumerate(dataset)?)
    };

    let mut lines: Vec<String> = Vec::new();
    lines.push("Decision tree report".to_string());
    lines.push(format!(
        "Version: {}",
        dataset
            .version
            .map(|v| v.to_string())
            .unwrap_or_else(|| "n/a".to_string())
    ));
    lines.push(format!("Root: {}", dataset.root_id));
    lines.push(format!("Total nodes: {}", dataset.len()));
    lines.push(format!(
        "Routes: {}",
        routes
            .as_ref()
            .map(|r| r.len().to_string())
            .unwrap_or_else(|| "n/a".to_string())
    ));

    if !findings.errors.is_empty() {
        lines.push(String::new());
        lines.push("Errors:".to_string());
        lines.extend(findings.errors.iter().map(|e| format!("- {}", e)));
    }
    if !findings.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings:".to_string());
        lines.extend(findings.warnings.iter().map(|w| format!("- {}", w)));
    }

    lines.push(String::new());
    match routes {
        None => lines.push("Routes not enumerated: the graph contains cycles.".to_string()),
        Some(routes) => {
            lines.push("Routes (from start to outcome):".to_string());
            for (i, route) in routes.iter().enumerate() {
                push_route(&mut lines, i + 1, route);
            }
        }
    }

    Ok(lines.join("\n"))
}

fn push_route(lines: &mut Vec<String>, ordinal: usize, route: &Route) {
    let outcome = &route.outcome;
    lines.push(String::new());
    lines.push(format!(
        "Route {}: {} [{}] (#{})",
        ordinal, outcome.title, outcome.kind, outcome.id
    ));
    for (n, step) in route.steps.iter().enumerate() {
        lines.push(format!("  {}. {} (node: {})", n + 1, step.node_title, step.node_id));
        lines.push(format!("     -> answer: {}", step.option_label));
    }
    lines.push(format!("  => Result: {}", outcome.title));
    if !outcome.description.is_empty() {
        lines.push(format!("     info: {}", outcome.description));
    }
}

/// Matrix report: `Q1,A1,...,Qn,An,OutcomeId,OutcomeTitle,OutcomeType`.
///
/// Routes shorter than the longest one leave their trailing question and
/// answer cells empty. Fields holding a comma, quote or line break are
/// quoted with doubled inner quotes.
pub fn build_csv_report(
    dataset: &Dataset,
    limits: EnumerationLimits,
) -> Result<String, ReportError> {
    let routes = enumerate_checked(dataset, limits).map_err(|e| match e {
        EnumerationError::Cyclic(errors) => ReportError::Cyclic(errors),
        other => ReportError::Enumeration(other),
    })?;

    let max_steps = routes.iter().map(|r| r.steps.len()).max().unwrap_or(0);

    let mut headers: Vec<String> = Vec::with_capacity(max_steps * 2 + 3);
    for i in 1..=max_steps {
        headers.push(format!("Q{}", i));
        headers.push(format!("A{}", i));
    }
    headers.extend(["OutcomeId", "OutcomeTitle", "OutcomeType"].map(String::from));

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&headers)?;
    for route in &routes {
        let mut row: Vec<&str> = Vec::with_capacity(headers.len());
        for i in 0..max_steps {
            match route.steps.get(i) {
                Some(step) => {
                    row.push(&step.node_title);
                    row.push(&step.option_label);
                }
                None => {
                    row.push("");
                    row.push("");
                }
            }
        }
        row.push(route.outcome.id.as_str());
        row.push(&route.outcome.title);
        row.push(route.outcome.kind.as_str());
        writer.write_record(&row)?;
    }

    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}
