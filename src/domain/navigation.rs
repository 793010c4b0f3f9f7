//! Navigation state machine
//!
//! A [`Navigator`] owns the active dataset and the walk through it: the
//! current node plus the stack of nodes answered so far. It is the single
//! context value for a session; nothing here is global, so independent
//! sessions (and tests) never interfere.
//!
//! Two collaborators are kept in sync on every transition:
//!
//! - a [`StateSlot`] mirroring `{currentId, history}`, read once when the
//!   navigator is opened;
//! - a [`Locator`] (a URL fragment in practice) mirroring `currentId`. A
//!   locator changed from outside wins on the next [`Navigator::observe_locator`].
//!
//! Persisting is best-effort: a failed write is logged and the transition
//! still happens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use url::Url;

use super::dataset::{Dataset, TreeNode};
use super::id::NodeId;
use super::validate::validate_and_promote;

#[derive(Debug, Error, PartialEq)]
pub enum NavigationError {
    #[error("Node not found: {0}")]
    UnknownNode(NodeId),

    #[error("'{to}' is not an answer of '{from}'")]
    InvalidTransition { from: NodeId, to: NodeId },

    #[error("'{node}' has no option #{number}")]
    NoSuchOption { node: NodeId, number: usize },
}

/// Where the walk currently is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub current_id: NodeId,
    /// Previously visited nodes, oldest first, excluding `current_id`
    #[serde(default)]
    pub history: Vec<NodeId>,
}

impl NavigationState {
    /// Fresh state at the given root
    pub fn at(root: NodeId) -> Self {
        Self {
            current_id: root,
            history: Vec::new(),
        }
    }
}

/// The record written to a [`StateSlot`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub current_id: NodeId,

    #[serde(default)]
    pub history: Vec<NodeId>,

    /// Fingerprint of the dataset the state was recorded against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

/// Durable home of the navigation state
pub trait StateSlot {
    /// Reads the stored record; missing or corrupt data reads as `None`
    fn load(&self) -> Option<PersistedState>;

    /// Replaces the stored record
    fn save(&mut self, state: &PersistedState) -> anyhow::Result<()>;
}

/// Shareable pointer at the current node
pub trait Locator {
    /// The node id the locator currently names, if any
    fn read(&self) -> Option<String>;

    /// Points the locator at a node
    fn write(&mut self, id: &NodeId);
}

/// Whether `answer` checks the target against the current node's options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Any existing node is accepted; the caller offers only valid options
    #[default]
    Permissive,
    /// Only targets of the current node's options are accepted
    Strict,
}

/// Identity of one dataset acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

/// What happened to an acquisition result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The dataset became active and the walk restarted at its root
    Applied,
    /// The structural check failed; nothing changed
    Rejected(Vec<String>),
    /// Acquisition itself failed; nothing changed
    Failed(String),
    /// A newer load already completed; the result was discarded
    Stale,
}

/// Interactive walker over a dataset
pub struct Navigator<S: StateSlot, L: Locator> {
    dataset: Dataset,
    fingerprint: String,
    state: NavigationState,
    slot: S,
    locator: L,
    policy: TransitionPolicy,
    /// Last ticket handed out
    issued: u64,
    /// Newest ticket whose result has been handled
    completed: u64,
}

impl<S: StateSlot, L: Locator> Navigator<S, L> {
    /// Opens a session on an already validated dataset.
    ///
    /// The starting node is taken from the locator, else from the persisted
    /// state if it was recorded against this dataset, else the root. A
    /// locator naming an unknown node sends the walk to the root.
    pub fn open(dataset: Dataset, slot: S, locator: L) -> Self {
        let fingerprint = dataset.fingerprint();

        let mut state = slot
            .load()
            .filter(|p| p.dataset.as_deref().map_or(true, |d| d == fingerprint))
            .filter(|p| dataset.has_node(p.current_id.as_str()))
            .map(|p| NavigationState {
                current_id: p.current_id,
                history: p
                    .history
                    .into_iter()
                    .filter(|id| dataset.has_node(id.as_str()))
                    .collect(),
            })
            .unwrap_or_else(|| NavigationState::at(dataset.root_id.clone()));

        if let Some(linked) = locator.read() {
            if dataset.has_node(&linked) {
                state.current_id = NodeId::new(linked);
            } else {
                tracing::warn!(locator = %linked, "locator names an unknown node, falling back to root");
                state.current_id = dataset.root_id.clone();
            }
        }

        tracing::debug!(current = %state.current_id, history = state.history.len(), "navigator opened");

        let mut navigator = Self {
            dataset,
            fingerprint,
            state,
            slot,
            locator,
            policy: TransitionPolicy::default(),
            issued: 0,
            completed: 0,
        };
        navigator.persist();
        navigator
    }

    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn current_id(&self) -> &NodeId {
        &self.state.current_id
    }

    pub fn history(&self) -> &[NodeId] {
        &self.state.history
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    /// Mutable access for collaborators that change from outside
    pub fn locator_mut(&mut self) -> &mut L {
        &mut self.locator
    }

    /// The node being shown, falling back to the root
    pub fn current_node(&self) -> Option<&TreeNode> {
        self.dataset
            .node(self.state.current_id.as_str())
            .or_else(|| self.dataset.root())
    }

    /// Number of steps taken so far, counting the current node
    pub fn visited_count(&self) -> usize {
        self.state.history.len() + 1
    }

    /// `(id, title)` for every node on the walk, current node last
    pub fn breadcrumbs(&self) -> Vec<(NodeId, String)> {
        self.state
            .history
            .iter()
            .chain(std::iter::once(&self.state.current_id))
            .map(|id| {
                let title = self
                    .dataset
                    .node(id.as_str())
                    .map(|n| n.display_title().to_string())
                    .unwrap_or_else(|| id.to_string());
                (id.clone(), title)
            })
            .collect()
    }

    /// Moves to `next`, remembering the current node.
    ///
    /// In the permissive policy `next` only has to exist; the presentation
    /// layer is trusted to offer the current node's options.
    pub fn answer(&mut self, next: &NodeId) -> Result<(), NavigationError> {
        if !self.dataset.has_node(next.as_str()) {
            return Err(NavigationError::UnknownNode(next.clone()));
        }

        if self.policy == TransitionPolicy::Strict {
            let offered = self
                .current_node()
                .map(|node| node.answer_options().iter().any(|o| &o.next == next))
                .unwrap_or(false);
            if !offered {
                return Err(NavigationError::InvalidTransition {
                    from: self.state.current_id.clone(),
                    to: next.clone(),
                });
            }
        }

        let previous = std::mem::replace(&mut self.state.current_id, next.clone());
        self.state.history.push(previous);
        tracing::debug!(current = %self.state.current_id, "answered");
        self.persist();
        Ok(())
    }

    /// Answers with the current node's option at `number` (1-based)
    pub fn answer_option(&mut self, number: usize) -> Result<(), NavigationError> {
        let next = self
            .current_node()
            .and_then(|node| number.checked_sub(1).and_then(|i| node.answer_options().get(i)))
            .map(|option| option.next.clone())
            .ok_or_else(|| NavigationError::NoSuchOption {
                node: self.state.current_id.clone(),
                number,
            })?;

        self.answer(&next)
    }

    /// Steps back one answer; returns false when already at the start
    pub fn back(&mut self) -> bool {
        let Some(previous) = self.state.history.pop() else {
            return false;
        };

        self.state.current_id = previous;
        tracing::debug!(current = %self.state.current_id, "went back");
        self.persist();
        true
    }

    /// Restarts the walk at the root
    pub fn reset(&mut self) {
        self.state = NavigationState::at(self.dataset.root_id.clone());
        tracing::debug!(current = %self.state.current_id, "reset");
        self.persist();
    }

    /// Loads a raw candidate synchronously.
    ///
    /// Counts as the newest completed load, so any acquisition still in
    /// flight will be discarded when it finishes.
    pub fn load_dataset(&mut self, candidate: Value) -> Result<(), Vec<String>> {
        let ticket = self.begin_load();
        match self.finish_load::<std::convert::Infallible>(ticket, Ok(candidate)) {
            LoadOutcome::Rejected(errors) => Err(errors),
            _ => Ok(()),
        }
    }

    /// Starts an acquisition and returns the ticket its result must carry
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    /// Handles the result of an acquisition started with [`begin_load`].
    ///
    /// [`begin_load`]: Navigator::begin_load
    pub fn finish_load<E: fmt::Display>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Value, E>,
    ) -> LoadOutcome {
        if ticket.0 <= self.completed {
            tracing::warn!(ticket = ticket.0, newest = self.completed, "discarding stale dataset load");
            return LoadOutcome::Stale;
        }
        self.completed = ticket.0;

        let candidate = match result {
            Ok(candidate) => candidate,
            Err(e) => {
                tracing::warn!(error = %e, "dataset acquisition failed");
                return LoadOutcome::Failed(e.to_string());
            }
        };

        match validate_and_promote(candidate) {
            Ok(dataset) => {
                self.install(dataset);
                LoadOutcome::Applied
            }
            Err(errors) => {
                tracing::debug!(errors = errors.len(), "dataset rejected");
                LoadOutcome::Rejected(errors)
            }
        }
    }

    fn install(&mut self, dataset: Dataset) {
        self.fingerprint = dataset.fingerprint();
        self.dataset = dataset;
        tracing::debug!(root = %self.dataset.root_id, nodes = self.dataset.len(), "dataset installed");
        self.reset();
    }

    /// Applies a locator changed from outside; returns true if the walk moved.
    ///
    /// A locator naming an unknown node sends the walk to the root.
    pub fn observe_locator(&mut self) -> bool {
        let Some(linked) = self.locator.read() else {
            return false;
        };
        if linked == self.state.current_id.as_str() {
            return false;
        }

        let target = if self.dataset.has_node(&linked) {
            NodeId::new(linked)
        } else {
            tracing::warn!(locator = %linked, "locator names an unknown node, falling back to root");
            self.dataset.root_id.clone()
        };

        let moved = target != self.state.current_id;
        self.state.current_id = target;
        self.persist();
        moved
    }

    /// Link to the current node: `base` with the fragment set to its id
    pub fn share_link(&self, base: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(base)?;
        url.set_fragment(Some(self.state.current_id.as_str()));
        Ok(url)
    }

    fn persist(&mut self) {
        let record = PersistedState {
            current_id: self.state.current_id.clone(),
            history: self.state.history.clone(),
            dataset: Some(self.fingerprint.clone()),
            saved_at: Some(Utc::now()),
        };
        if let Err(e) = self.slot.save(&record) {
            tracing::warn!(error = %e, "failed to persist navigation state");
        }
        self.locator.write(&self.state.current_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::AnswerOption;
    use proptest::prelude::*;
    use serde_json::json;

    #[derive(Default)]
    struct MemorySlot {
        record: Option<PersistedState>,
        saves: usize,
        fail: bool,
    }

    impl StateSlot for MemorySlot {
        fn load(&self) -> Option<PersistedState> {
            self.record.clone()
        }

        fn save(&mut self, state: &PersistedState) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("disk full");
            }
            self.saves += 1;
            self.record = Some(state.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryLocator {
        fragment: Option<String>,
    }

    impl Locator for MemoryLocator {
        fn read(&self) -> Option<String> {
            self.fragment.clone()
        }

        fn write(&mut self, id: &NodeId) {
            self.fragment = Some(id.to_string());
        }
    }

    fn dataset() -> Dataset {
        Dataset::new("start")
            .with_node(TreeNode::question(
                "start",
                "Start",
                vec![AnswerOption::new("go", "middle"), AnswerOption::new("skip", "end")],
            ))
            .with_node(TreeNode::question(
                "middle",
                "Middle",
                vec![AnswerOption::new("finish", "end")],
            ))
            .with_node(TreeNode::outcome("end", "End"))
    }

    fn navigator() -> Navigator<MemorySlot, MemoryLocator> {
        Navigator::open(dataset(), MemorySlot::default(), MemoryLocator::default())
    }

    fn persisted(current: &str, history: &[&str], fingerprint: Option<String>) -> MemorySlot {
        MemorySlot {
            record: Some(PersistedState {
                current_id: current.into(),
                history: history.iter().map(|h| NodeId::from(*h)).collect(),
                dataset: fingerprint,
                saved_at: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn starts_at_root() {
        let nav = navigator();
        assert_eq!(nav.current_id(), &NodeId::from("start"));
        assert!(nav.history().is_empty());
        assert_eq!(nav.locator().fragment.as_deref(), Some("start"));
    }

    #[test]
    fn answer_then_back() {
        let mut nav = navigator();

        nav.answer(&"end".into()).unwrap();
        assert_eq!(nav.current_id(), &NodeId::from("end"));
        assert_eq!(nav.history(), &[NodeId::from("start")]);

        assert!(nav.back());
        assert_eq!(nav.current_id(), &NodeId::from("start"));
        assert!(nav.history().is_empty());
    }

    #[test]
    fn back_on_empty_history_is_a_no_op() {
        let mut nav = navigator();
        let before = nav.state().clone();
        let saves = nav.slot().saves;

        assert!(!nav.back());
        assert_eq!(nav.state(), &before);
        assert_eq!(nav.slot().saves, saves);
    }

    #[test]
    fn answer_by_option_number() {
        let mut nav = navigator();
        nav.answer_option(1).unwrap();
        assert_eq!(nav.current_id(), &NodeId::from("middle"));

        assert_eq!(
            nav.answer_option(2),
            Err(NavigationError::NoSuchOption {
                node: "middle".into(),
                number: 2
            })
        );
        assert!(nav.answer_option(0).is_err());
    }

    #[test]
    fn unknown_targets_are_rejected() {
        let mut nav = navigator();
        assert_eq!(
            nav.answer(&"ghost".into()),
            Err(NavigationError::UnknownNode("ghost".into()))
        );
        assert_eq!(nav.current_id(), &NodeId::from("start"));
    }

    #[test]
    fn permissive_policy_accepts_any_existing_node() {
        let mut nav = navigator();
        nav.answer(&"middle".into()).unwrap();
        // 'start' is not an option of 'middle'
        nav.answer(&"start".into()).unwrap();
        assert_eq!(nav.history().len(), 2);
    }

    #[test]
    fn strict_policy_checks_membership() {
        let mut nav = navigator().with_policy(TransitionPolicy::Strict);
        nav.answer(&"middle".into()).unwrap();

        assert_eq!(
            nav.answer(&"start".into()),
            Err(NavigationError::InvalidTransition {
                from: "middle".into(),
                to: "start".into()
            })
        );
        assert_eq!(nav.current_id(), &NodeId::from("middle"));

        nav.answer(&"end".into()).unwrap();
        assert!(nav.answer(&"start".into()).is_err());
    }

    #[test]
    fn reset_returns_to_root() {
        let mut nav = navigator();
        nav.answer_option(1).unwrap();
        nav.answer_option(1).unwrap();

        nav.reset();
        assert_eq!(nav.state(), &NavigationState::at("start".into()));
    }

    #[test]
    fn every_transition_is_persisted() {
        let mut nav = navigator();
        let opened = nav.slot().saves;

        nav.answer_option(1).unwrap();
        nav.back();
        nav.reset();

        assert_eq!(nav.slot().saves, opened + 3);
        let record = nav.slot().record.clone().unwrap();
        assert_eq!(record.current_id, "start");
        assert_eq!(record.dataset, Some(dataset().fingerprint()));
    }

    #[test]
    fn failed_persistence_does_not_block_transitions() {
        let slot = MemorySlot {
            fail: true,
            ..Default::default()
        };
        let mut nav = Navigator::open(dataset(), slot, MemoryLocator::default());

        nav.answer_option(2).unwrap();
        assert_eq!(nav.current_id(), &NodeId::from("end"));
        assert_eq!(nav.locator().fragment.as_deref(), Some("end"));
    }

    #[test]
    fn resumes_from_persisted_state() {
        let slot = persisted("end", &["start", "middle"], Some(dataset().fingerprint()));
        let nav = Navigator::open(dataset(), slot, MemoryLocator::default());

        assert_eq!(nav.current_id(), &NodeId::from("end"));
        assert_eq!(nav.history().len(), 2);
        assert_eq!(nav.locator().fragment.as_deref(), Some("end"));
    }

    #[test]
    fn ignores_state_recorded_for_another_dataset() {
        let slot = persisted("end", &["start"], Some("0123456789abcdef".to_string()));
        let nav = Navigator::open(dataset(), slot, MemoryLocator::default());

        assert_eq!(nav.state(), &NavigationState::at("start".into()));
    }

    #[test]
    fn stale_node_ids_fall_back() {
        let slot = persisted("removed", &["start"], None);
        let nav = Navigator::open(dataset(), slot, MemoryLocator::default());
        assert_eq!(nav.state(), &NavigationState::at("start".into()));

        let slot = persisted("end", &["start", "removed"], None);
        let nav = Navigator::open(dataset(), slot, MemoryLocator::default());
        assert_eq!(nav.history(), &[NodeId::from("start")]);
    }

    #[test]
    fn locator_wins_over_persisted_state() {
        let slot = persisted("end", &["start"], None);
        let locator = MemoryLocator {
            fragment: Some("middle".to_string()),
        };
        let nav = Navigator::open(dataset(), slot, locator);

        assert_eq!(nav.current_id(), &NodeId::from("middle"));
        assert_eq!(nav.history(), &[NodeId::from("start")]);
    }

    #[test]
    fn unknown_locator_at_startup_falls_back_to_root() {
        let slot = persisted("end", &["start"], Some(dataset().fingerprint()));
        let locator = MemoryLocator {
            fragment: Some("nowhere".to_string()),
        };
        let nav = Navigator::open(dataset(), slot, locator);

        assert_eq!(nav.current_id(), &NodeId::from("start"));
        assert_eq!(nav.locator().fragment.as_deref(), Some("start"));
    }

    #[test]
    fn unknown_locator_behaves_the_same_at_startup_and_later() {
        let slot = persisted("end", &["start"], None);
        let locator = MemoryLocator {
            fragment: Some("ghost".to_string()),
        };
        let opened = Navigator::open(dataset(), slot, locator);

        let slot = persisted("end", &["start"], None);
        let mut observed = Navigator::open(dataset(), slot, MemoryLocator::default());
        observed.locator_mut().fragment = Some("ghost".to_string());
        observed.observe_locator();

        assert_eq!(opened.state(), observed.state());
    }

    #[test]
    fn external_locator_change_overrides_current() {
        let mut nav = navigator();
        nav.locator_mut().fragment = Some("end".to_string());

        assert!(nav.observe_locator());
        assert_eq!(nav.current_id(), &NodeId::from("end"));
        assert!(!nav.observe_locator());

        nav.locator_mut().fragment = Some("bogus".to_string());
        assert!(nav.observe_locator());
        assert_eq!(nav.current_id(), &NodeId::from("start"));
        assert_eq!(nav.locator().fragment.as_deref(), Some("start"));
    }

    #[test]
    fn loading_an_invalid_dataset_changes_nothing() {
        let mut nav = navigator();
        nav.answer_option(1).unwrap();
        let before = nav.state().clone();

        let errors = nav
            .load_dataset(json!({ "rootId": "x", "nodes": {} }))
            .unwrap_err();

        assert_eq!(errors, vec!["rootId 'x' does not exist in nodes"]);
        assert_eq!(nav.state(), &before);
        assert_eq!(nav.dataset().root_id, "start");
    }

    #[test]
    fn loading_a_dataset_restarts_the_walk() {
        let mut nav = navigator();
        nav.answer_option(1).unwrap();

        nav.load_dataset(json!({
            "version": 2,
            "rootId": "other",
            "nodes": { "other": { "id": "other", "title": "Other", "type": "outcome" } }
        }))
        .unwrap();

        assert_eq!(nav.state(), &NavigationState::at("other".into()));
        assert_eq!(nav.dataset().version, Some(2));
        assert_eq!(nav.locator().fragment.as_deref(), Some("other"));
    }

    #[test]
    fn out_of_order_results_are_discarded() {
        let mut nav = navigator();
        let older = nav.begin_load();
        let newer = nav.begin_load();

        let newer_result: Result<Value, String> = Ok(json!({
            "rootId": "new",
            "nodes": { "new": { "type": "outcome" } }
        }));
        assert_eq!(nav.finish_load(newer, newer_result), LoadOutcome::Applied);

        let older_result: Result<Value, String> = Ok(json!({
            "rootId": "old",
            "nodes": { "old": { "type": "outcome" } }
        }));
        assert_eq!(nav.finish_load(older, older_result), LoadOutcome::Stale);
        assert_eq!(nav.dataset().root_id, "new");
    }

    #[test]
    fn failed_acquisition_keeps_the_active_dataset() {
        let mut nav = navigator();
        nav.answer_option(2).unwrap();

        let ticket = nav.begin_load();
        let outcome = nav.finish_load(ticket, Err::<Value, _>("connection refused"));

        assert_eq!(outcome, LoadOutcome::Failed("connection refused".to_string()));
        assert_eq!(nav.current_id(), &NodeId::from("end"));
        assert_eq!(nav.dataset().root_id, "start");
    }

    #[test]
    fn breadcrumbs_and_progress() {
        let mut nav = navigator();
        nav.answer_option(1).unwrap();

        let crumbs: Vec<_> = nav
            .breadcrumbs()
            .into_iter()
            .map(|(id, title)| format!("{}={}", id, title))
            .collect();
        assert_eq!(crumbs, vec!["start=Start", "middle=Middle"]);
        assert_eq!(nav.visited_count(), 2);
    }

    #[test]
    fn share_link_carries_current_node() {
        let mut nav = navigator();
        nav.answer_option(2).unwrap();

        let link = nav.share_link("https://quiz.example.org/app?data=x#old").unwrap();
        assert_eq!(link.as_str(), "https://quiz.example.org/app?data=x#end");
        assert!(nav.share_link("not a url").is_err());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Answer(usize),
        Back,
        Reset,
    }

    fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
        prop::collection::vec(
            prop_oneof![
                (1usize..3).prop_map(Op::Answer),
                Just(Op::Back),
                Just(Op::Reset),
            ],
            0..20,
        )
    }

    fn apply(nav: &mut Navigator<MemorySlot, MemoryLocator>, ops: &[Op]) {
        for op in ops {
            match op {
                Op::Answer(n) => {
                    let _ = nav.answer_option(*n);
                }
                Op::Back => {
                    nav.back();
                }
                Op::Reset => nav.reset(),
            }
        }
    }

    proptest! {
        #[test]
        fn reset_is_idempotent(ops in arb_ops()) {
            let mut once = navigator();
            apply(&mut once, &ops);
            once.reset();

            let mut twice = navigator();
            apply(&mut twice, &ops);
            twice.reset();
            twice.reset();

            prop_assert_eq!(once.state(), twice.state());
        }

        #[test]
        fn back_on_empty_history_never_changes_state(ops in arb_ops()) {
            let mut nav = navigator();
            apply(&mut nav, &ops);
            while nav.back() {}

            let before = nav.state().clone();
            prop_assert!(!nav.back());
            prop_assert_eq!(nav.state(), &before);
        }

        #[test]
        fn history_length_tracks_answers(ops in arb_ops()) {
            let mut nav = navigator();
            apply(&mut nav, &ops);
            prop_assert_eq!(nav.visited_count(), nav.history().len() + 1);
            prop_assert!(nav.dataset().has_node(nav.current_id().as_str()));
        }
    }
}
