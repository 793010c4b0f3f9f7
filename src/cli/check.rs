//! Analysis commands (validate, routes, report)
//!
//! These work on a dataset file, or on the project's active dataset when no
//! file is given. None of them touch the navigation state.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;

use super::output::Output;
use crate::domain::{
    build_report, enumerate_checked, validate_and_promote, Dataset, ReportKind, Route,
    ValidationSummary,
};
use crate::storage::{acquire, Config, Project, ProjectError};

/// Reads the raw candidate and a label for messages
fn candidate(file: Option<&Path>) -> Result<(Value, String)> {
    match file {
        Some(path) => Ok((acquire(path)?, path.display().to_string())),
        None => {
            let project = Project::open_current()?;
            if !project.has_dataset() {
                return Err(ProjectError::NoDataset.into());
            }
            let value = acquire(&project.dataset_path())?;
            Ok((value, "active dataset".to_string()))
        }
    }
}

fn dataset(file: Option<&Path>) -> Result<Dataset> {
    let (candidate, label) = candidate(file)?;
    validate_and_promote(candidate)
        .map_err(|errors| anyhow!("{} is invalid:\n{}", label, errors.join("\n")))
}

/// Check a dataset; fails when it cannot be loaded or walked safely
pub fn validate(output: &Output, file: Option<&Path>) -> Result<()> {
    let (candidate, label) = candidate(file)?;
    output.verbose_ctx("validate", &format!("Checking {}", label));

    let summary = ValidationSummary::for_candidate(candidate);

    if output.is_json() {
        output.data(&serde_json::json!({
            "loadable": summary.is_loadable(),
            "enumerable": summary.is_enumerable(),
            "errors": summary.structural,
            "graph_errors": summary.graph.errors,
            "warnings": summary.graph.warnings,
        }));
    } else if summary.is_clean() {
        println!("No problems found.");
    } else {
        for (i, (title, items)) in summary.sections().into_iter().enumerate() {
            if i > 0 {
                output.blank();
            }
            output.section(title, items);
        }
    }

    if !summary.is_enumerable() {
        bail!("{} failed validation", label);
    }
    Ok(())
}

/// List every route from the root to an outcome
pub fn routes(output: &Output, config: &Config, file: Option<&Path>) -> Result<()> {
    let dataset = dataset(file)?;
    let routes = enumerate_checked(&dataset, config.project.limits)?;
    output.verbose_ctx("routes", &format!("Enumerated {} routes", routes.len()));

    if output.is_json() {
        output.data(&routes);
    } else if routes.is_empty() {
        println!("No routes.");
    } else {
        println!("Routes ({}):", routes.len());
        for (i, route) in routes.iter().enumerate() {
            println!("{:>4}. {}", i + 1, describe(route));
        }
    }

    Ok(())
}

/// One-line rendering: `Q1 [answer] > Q2 [answer] => Outcome (type)`
fn describe(route: &Route) -> String {
    let mut line = route
        .steps
        .iter()
        .map(|step| format!("{} [{}]", step.node_title, step.option_label))
        .collect::<Vec<_>>()
        .join(" > ");
    if !line.is_empty() {
        line.push(' ');
    }
    line.push_str(&format!(
        "=> {} ({})",
        route.outcome.title, route.outcome.kind
    ));
    line
}

/// Write a report file, or print it with `target = None`
pub fn report(
    output: &Output,
    config: &Config,
    file: Option<&Path>,
    kind: ReportKind,
    target: Option<&Path>,
) -> Result<()> {
    let dataset = dataset(file)?;
    let report = build_report(kind, &dataset, config.project.limits)?;

    let Some(dir) = target else {
        println!("{}", report.content);
        return Ok(());
    };

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let path = dir.join(&report.filename);
    fs::write(&path, report.as_bytes())
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    output.verbose_ctx("report", &format!("{} bytes", report.content.len()));

    if output.is_json() {
        output.data(&serde_json::json!({
            "success": true,
            "kind": kind.to_string(),
            "path": path.display().to_string(),
        }));
    } else {
        output.success(&format!("Wrote {}", path.display()));
    }
    Ok(())
}
