//! Dataset validation
//!
//! Two independent passes, both returning findings as data:
//!
//! - [`validate_dataset`] is the structural check over the raw, untyped
//!   candidate. Any finding here blocks loading.
//! - [`extra_validation`] analyses the graph of a loaded dataset: cycles
//!   (errors, they break route enumeration), dead-end questions and
//!   unreachable nodes (warnings).
//!
//! Finding order is part of the contract: the structural check reports in
//! node-then-option order, the graph analysis in depth-first visiting order.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::dataset::Dataset;
use super::graph::DecisionGraph;
use super::id::NodeId;

/// Findings of the graph analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Findings {
    /// Graph defects that make route enumeration unsafe
    pub errors: Vec<String>,
    /// Advisory quality signals
    pub warnings: Vec<String>,
}

impl Findings {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

fn render_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "<missing>".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Structural check of a raw candidate dataset.
///
/// Returns one message per problem; an empty list means the candidate may be
/// promoted with [`Dataset::from_value`].
pub fn validate_dataset(candidate: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(object) = candidate.as_object() else {
        errors.push("dataset is not an object".to_string());
        return errors;
    };

    let root_id = object
        .get("rootId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty());
    if root_id.is_none() {
        errors.push("rootId is missing".to_string());
    }

    let nodes = object.get("nodes").and_then(Value::as_object);
    if nodes.is_none() {
        errors.push("nodes is missing or not a mapping".to_string());
    }

    let Some(nodes) = nodes else {
        return errors;
    };

    if let Some(root_id) = root_id {
        if !nodes.contains_key(root_id) {
            errors.push(format!("rootId '{}' does not exist in nodes", root_id));
        }
    }

    for node in nodes.values() {
        if node.get("type").and_then(Value::as_str) != Some("question") {
            continue;
        }
        let Some(options) = node.get("options").and_then(Value::as_array) else {
            continue;
        };

        for option in options {
            let resolves = option
                .get("next")
                .and_then(Value::as_str)
                .is_some_and(|next| nodes.contains_key(next));

            if !resolves {
                errors.push(format!(
                    "option '{}' -> next '{}' does not exist",
                    render_field(option.get("label")),
                    render_field(option.get("next")),
                ));
            }
        }
    }

    errors
}

/// Per-node state of the depth-first walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    OnPath,
    Done,
}

struct Frame {
    id: NodeId,
    successors: Vec<NodeId>,
    next: usize,
}

struct Walk<'a> {
    dataset: &'a Dataset,
    graph: DecisionGraph,
    states: HashMap<NodeId, VisitState>,
    findings: Findings,
}

impl Walk<'_> {
    fn state(&self, id: &str) -> VisitState {
        self.states
            .get(id)
            .copied()
            .unwrap_or(VisitState::Unvisited)
    }

    /// Marks a node as entered and returns its frame, or None when the walk
    /// must not descend into it
    fn enter(&mut self, id: &NodeId) -> Option<Frame> {
        let dataset = self.dataset;
        let node = dataset.node(id.as_str())?;

        match self.state(id.as_str()) {
            VisitState::OnPath => {
                self.findings
                    .errors
                    .push(format!("cycle detected at '{}'", id));
                return None;
            }
            VisitState::Done => return None,
            VisitState::Unvisited => {}
        }

        self.states.insert(id.clone(), VisitState::OnPath);

        if node.is_dead_end() {
            self.findings
                .warnings
                .push(format!("question '{}' has no options (dead end)", id));
        }

        Some(Frame {
            id: id.clone(),
            successors: self.graph.successors(id.as_str()),
            next: 0,
        })
    }
}

/// Graph analysis of a structurally valid dataset.
///
/// Walks depth-first from the root with an explicit stack, so arbitrarily
/// deep graphs cannot exhaust the call stack.
pub fn extra_validation(dataset: &Dataset) -> Findings {
    if dataset.root_id.is_empty() || dataset.is_empty() {
        return Findings {
            errors: vec!["dataset is incomplete".to_string()],
            warnings: vec![],
        };
    }

    let mut walk = Walk {
        dataset,
        graph: DecisionGraph::from_dataset(dataset),
        states: HashMap::new(),
        findings: Findings::default(),
    };

    let mut stack: Vec<Frame> = Vec::new();
    if let Some(frame) = walk.enter(&dataset.root_id) {
        stack.push(frame);
    }

    while let Some(frame) = stack.last_mut() {
        if frame.next < frame.successors.len() {
            let target = frame.successors[frame.next].clone();
            frame.next += 1;
            if let Some(child) = walk.enter(&target) {
                stack.push(child);
            }
        } else {
            walk.states.insert(frame.id.clone(), VisitState::Done);
            stack.pop();
        }
    }

    for id in dataset.node_ids() {
        if walk.state(id.as_str()) == VisitState::Unvisited {
            walk.findings
                .warnings
                .push(format!("node '{}' is unreachable from root", id));
        }
    }

    tracing::debug!(
        nodes = walk.graph.node_count(),
        edges = walk.graph.edge_count(),
        errors = walk.findings.errors.len(),
        warnings = walk.findings.warnings.len(),
        "graph analysis finished"
    );

    walk.findings
}

/// The load gate: structural check followed by promotion to the typed model
pub fn validate_and_promote(candidate: Value) -> Result<Dataset, Vec<String>> {
    let errors = validate_dataset(&candidate);
    if !errors.is_empty() {
        return Err(errors);
    }

    Dataset::from_value(candidate).map_err(|e| vec![e.to_string()])
}

/// Result of running every check on a candidate
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationSummary {
    /// Structural problems; non-empty means the dataset cannot be loaded
    pub structural: Vec<String>,
    /// Graph analysis, only run on structurally sound candidates
    pub graph: Findings,
}

impl ValidationSummary {
    /// Runs both passes on a raw candidate
    pub fn for_candidate(candidate: Value) -> Self {
        match validate_and_promote(candidate) {
            Ok(dataset) => Self::for_dataset(&dataset),
            Err(structural) => Self {
                structural,
                graph: Findings::default(),
            },
        }
    }

    /// Runs the graph analysis on an already loaded dataset
    pub fn for_dataset(dataset: &Dataset) -> Self {
        Self {
            structural: vec![],
            graph: extra_validation(dataset),
        }
    }

    pub fn is_loadable(&self) -> bool {
        self.structural.is_empty()
    }

    /// True when routes can be enumerated safely
    pub fn is_enumerable(&self) -> bool {
        self.is_loadable() && !self.graph.has_errors()
    }

    pub fn is_clean(&self) -> bool {
        self.is_loadable() && self.graph.is_clean()
    }

    /// Human-readable sections, empty when nothing was found
    pub fn sections(&self) -> Vec<(&'static str, &[String])> {
        let mut sections = Vec::new();
        if !self.structural.is_empty() {
            sections.push(("Errors", self.structural.as_slice()));
        }
        if !self.graph.errors.is_empty() {
            sections.push(("Graph errors", self.graph.errors.as_slice()));
        }
        if !self.graph.warnings.is_empty() {
            sections.push(("Warnings", self.graph.warnings.as_slice()));
        }
        sections
    }
}
