//! Navigation commands (load, show, answer, back, reset, share)
//!
//! Every invocation opens a [`Navigator`] over the active dataset. The
//! navigator resumes from the persisted state slot, so a walk continues
//! across invocations.

use std::path::Path;

use anyhow::{bail, Context, Result};

use super::output::Output;
use crate::domain::{
    extra_validation, validate_and_promote, Dataset, LoadOutcome, Navigator, NodeId, TreeNode,
};
use crate::storage::{acquire, Config, FileStateSlot, FragmentLocator, Project};

type Session = Navigator<FileStateSlot, FragmentLocator>;

fn session_for(project: &Project, dataset: Dataset, locator: FragmentLocator) -> Session {
    let policy = project.config().project.policy();
    Navigator::open(dataset, project.state_slot(), locator).with_policy(policy)
}

fn open_session(project: &Project, locator: FragmentLocator) -> Result<Session> {
    let dataset = project.dataset()?;
    Ok(session_for(project, dataset, locator))
}

fn open_current() -> Result<(Project, Session)> {
    let project = Project::open_current()?;
    let session = open_session(&project, FragmentLocator::new())?;
    Ok((project, session))
}

/// Make a dataset file the active quiz
pub fn load(output: &Output, file: &Path) -> Result<()> {
    let project = Project::open_current()?;
    output.verbose_ctx(
        "load",
        &format!("Opened project at: {}", project.root().display()),
    );

    let session = match project.dataset() {
        Ok(active) => {
            let mut session = session_for(&project, active, FragmentLocator::new());
            let ticket = session.begin_load();
            match session.finish_load(ticket, acquire(file)) {
                LoadOutcome::Applied => session,
                LoadOutcome::Rejected(errors) => return rejected(output, file, &errors),
                LoadOutcome::Failed(message) => bail!(message),
                LoadOutcome::Stale => bail!("A newer load superseded {}", file.display()),
            }
        }
        Err(e) => {
            output.verbose_ctx("load", &format!("No usable active dataset: {:#}", e));
            let dataset = match validate_and_promote(acquire(file)?) {
                Ok(dataset) => dataset,
                Err(errors) => return rejected(output, file, &errors),
            };
            let mut session = session_for(&project, dataset, FragmentLocator::new());
            session.reset();
            session
        }
    };

    project.save_dataset(session.dataset())?;

    let dataset = session.dataset();
    let findings = extra_validation(dataset);
    output.verbose_ctx(
        "load",
        &format!(
            "Graph check: {} errors, {} warnings",
            findings.errors.len(),
            findings.warnings.len()
        ),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "success": true,
            "root": dataset.root_id,
            "nodes": dataset.len(),
            "version": dataset.version,
            "findings": findings,
        }));
    } else {
        output.success(&format!(
            "Loaded {} ({} nodes, root '{}')",
            file.display(),
            dataset.len(),
            dataset.root_id
        ));
        if !findings.errors.is_empty() {
            output.section("Graph errors", &findings.errors);
        }
        if !findings.warnings.is_empty() {
            output.section("Warnings", &findings.warnings);
        }
    }

    Ok(())
}

fn rejected(output: &Output, file: &Path, errors: &[String]) -> Result<()> {
    if output.is_json() {
        output.data(&serde_json::json!({
            "success": false,
            "errors": errors,
        }));
    } else {
        output.section("Errors", errors);
    }
    bail!("Dataset {} was rejected; the active quiz is unchanged", file.display())
}

/// Show the current question, optionally after following a link
pub fn show(output: &Output, at: Option<&str>, link: Option<&str>) -> Result<()> {
    let project = Project::open_current()?;

    let locator = match (at, link) {
        (Some(id), _) => FragmentLocator::from_fragment(id),
        (None, Some(link)) => {
            FragmentLocator::from_url(link).with_context(|| format!("Invalid link: {}", link))?
        }
        (None, None) => FragmentLocator::new(),
    };
    let requested = locator.fragment().map(str::to_string);

    let session = open_session(&project, locator)?;

    if let Some(requested) = requested {
        if session.current_id().as_str() != requested {
            output.verbose_ctx(
                "show",
                &format!("Node '{}' not found, showing root '{}'", requested, session.current_id()),
            );
        }
    }

    render(output, &session);
    Ok(())
}

/// Answer by 1-based option number, or by target node id
pub fn answer(output: &Output, choice: &str) -> Result<()> {
    let (_project, mut session) = open_current()?;

    let choice = choice.trim();
    match choice.parse::<usize>() {
        Ok(number) => session.answer_option(number)?,
        Err(_) => {
            let next: NodeId = choice.parse().context("Invalid node id")?;
            session.answer(&next)?;
        }
    }

    output.verbose_ctx("answer", &format!("Moved to '{}'", session.current_id()));
    render(output, &session);
    Ok(())
}

/// Undo the last answer
pub fn back(output: &Output) -> Result<()> {
    let (_project, mut session) = open_current()?;

    if !session.back() {
        output.verbose_ctx("back", "History is empty");
    }

    render(output, &session);
    Ok(())
}

/// Start over at the root
pub fn reset(output: &Output) -> Result<()> {
    let (_project, mut session) = open_current()?;
    session.reset();
    render(output, &session);
    Ok(())
}

/// Print a link to the current node
pub fn share(output: &Output, config: &Config, base: Option<&str>) -> Result<()> {
    let (_project, session) = open_current()?;

    let base = base
        .or(config.share_base_url())
        .context("No share base URL. Pass --base or set share_base_url in config.toml")?;

    let link = session
        .share_link(base)
        .with_context(|| format!("Invalid base URL: {}", base))?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "link": link.as_str(),
            "current": session.current_id(),
        }));
    } else {
        println!("{}", link);
    }
    Ok(())
}

fn render(output: &Output, session: &Session) {
    let Some(node) = session.current_node() else {
        output.error("The active dataset has no root node");
        return;
    };

    if output.is_json() {
        let breadcrumbs: Vec<_> = session
            .breadcrumbs()
            .into_iter()
            .map(|(id, title)| serde_json::json!({ "id": id, "title": title }))
            .collect();
        output.data(&serde_json::json!({
            "current": session.current_id(),
            "step": session.visited_count(),
            "history": session.history(),
            "breadcrumbs": breadcrumbs,
            "node": node,
        }));
        return;
    }

    let trail: Vec<_> = session.breadcrumbs().into_iter().map(|(_, title)| title).collect();
    println!("Step {}: {}", session.visited_count(), trail.join(" > "));
    output.blank();
    render_node(node);
}

fn render_node(node: &TreeNode) {
    println!("{} [{}] (#{})", node.display_title(), node.kind, node.id);

    if let Some(description) = node.description.as_deref().filter(|d| !d.is_empty()) {
        println!("{}", description);
    }

    if let Some(info) = &node.info {
        if let Some(badges) = info.badges.as_ref().filter(|b| !b.is_empty()) {
            println!("Badges: {}", badges.join(", "));
        }
        for link in info.links.iter().flatten() {
            println!("Link: {} <{}>", link.label, link.href);
        }
        if let Some(notes) = info.notes.as_deref().filter(|n| !n.is_empty()) {
            println!("Notes: {}", notes);
        }
    }

    if node.is_question() {
        println!();
        if node.answer_options().is_empty() {
            println!("This question has no answers. Use 'dquiz back' or 'dquiz reset'.");
        }
        for (i, option) in node.answer_options().iter().enumerate() {
            println!("  {}. {}", i + 1, option.label);
        }
    }
}
