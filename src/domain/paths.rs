//! Route enumeration
//!
//! Lists every path from the root to a terminal node together with the
//! answers that lead there. The work is proportional to the number of
//! distinct paths: a shared subtree is walked once per prefix that reaches
//! it, because reports need every path spelled out.
//!
//! The walk has no cycle protection of its own. Run
//! [`extra_validation`](super::validate::extra_validation) first, or use
//! [`enumerate_checked`]; the depth and route ceilings in
//! [`EnumerationLimits`] make a cyclic graph fail instead of diverging.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::dataset::{Dataset, NodeType, TreeNode};
use super::graph::DecisionGraph;
use super::id::NodeId;
use super::validate::extra_validation;

#[derive(Debug, Error, PartialEq)]
pub enum EnumerationError {
    #[error("Route deeper than {limit} questions; raise limits.max_depth to enumerate it")]
    DepthExceeded { limit: usize },

    #[error("More than {limit} routes; raise limits.max_routes to enumerate them all")]
    TooManyRoutes { limit: usize },

    #[error("Graph contains cycles: {}", .0.join("; "))]
    Cyclic(Vec<String>),
}

/// Ceilings that keep enumeration bounded on pathological input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationLimits {
    /// Maximum number of questions on a single route
    pub max_depth: usize,

    /// Maximum number of routes
    pub max_routes: usize,
}

impl Default for EnumerationLimits {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_routes: 100_000,
        }
    }
}

/// One answered question on a route
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub node_id: NodeId,
    pub node_title: String,
    pub option_label: String,
}

/// Where a route ends
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOutcome {
    pub id: NodeId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: NodeType,
    pub description: String,
}

impl RouteOutcome {
    fn from_node(node: &TreeNode) -> Self {
        Self {
            id: node.id.clone(),
            title: node.title.clone(),
            kind: node.kind,
            description: node.description.clone().unwrap_or_default(),
        }
    }
}

/// A full path from the root to a terminal node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub steps: Vec<Step>,
    pub outcome: RouteOutcome,
}

struct Frame<'a> {
    node: &'a TreeNode,
    next: usize,
}

/// Depth-first route enumerator
#[derive(Debug, Clone, Copy, Default)]
pub struct PathEnumerator {
    limits: EnumerationLimits,
}

impl PathEnumerator {
    pub fn new(limits: EnumerationLimits) -> Self {
        Self { limits }
    }

    /// Enumerates every route of an acyclic dataset.
    ///
    /// Options are followed in declaration order, so the result is stable
    /// for a given dataset. Options whose target does not exist produce no
    /// route; a question without options ends its route as the outcome.
    pub fn enumerate(&self, dataset: &Dataset) -> Result<Vec<Route>, EnumerationError> {
        let mut routes = Vec::new();
        let Some(root) = dataset.root() else {
            return Ok(routes);
        };

        let mut steps: Vec<Step> = Vec::new();
        let mut frames: Vec<Frame<'_>> = Vec::new();

        self.arrive(root, &steps, &mut frames, &mut routes)?;

        while let Some(frame) = frames.last_mut() {
            let options = frame.node.answer_options();
            if frame.next >= options.len() {
                frames.pop();
                continue;
            }

            let option = &options[frame.next];
            let node = frame.node;
            frame.next += 1;

            steps.truncate(frames.len() - 1);
            steps.push(Step {
                node_id: node.id.clone(),
                node_title: node.title.clone(),
                option_label: option.label.clone(),
            });

            if let Some(target) = dataset.node(option.next.as_str()) {
                self.arrive(target, &steps, &mut frames, &mut routes)?;
            }
        }

        tracing::debug!(routes = routes.len(), "route enumeration finished");
        Ok(routes)
    }

    /// Either descends into a question or records a finished route
    fn arrive<'a>(
        &self,
        node: &'a TreeNode,
        steps: &[Step],
        frames: &mut Vec<Frame<'a>>,
        routes: &mut Vec<Route>,
    ) -> Result<(), EnumerationError> {
        if node.is_question() && !node.is_dead_end() {
            if frames.len() >= self.limits.max_depth {
                return Err(EnumerationError::DepthExceeded {
                    limit: self.limits.max_depth,
                });
            }
            frames.push(Frame { node, next: 0 });
            return Ok(());
        }

        if routes.len() >= self.limits.max_routes {
            return Err(EnumerationError::TooManyRoutes {
                limit: self.limits.max_routes,
            });
        }
        routes.push(Route {
            steps: steps.to_vec(),
            outcome: RouteOutcome::from_node(node),
        });
        Ok(())
    }
}

/// Enumerates routes with the default limits
pub fn enumerate_paths(dataset: &Dataset) -> Result<Vec<Route>, EnumerationError> {
    PathEnumerator::default().enumerate(dataset)
}

/// Refuses graphs with a reachable cycle, then enumerates
pub fn enumerate_checked(
    dataset: &Dataset,
    limits: EnumerationLimits,
) -> Result<Vec<Route>, EnumerationError> {
    if DecisionGraph::from_dataset(dataset).has_cycle() {
        let findings = extra_validation(dataset);
        if findings.has_errors() {
            return Err(EnumerationError::Cyclic(findings.errors));
        }
    }

    PathEnumerator::new(limits).enumerate(dataset)
}
