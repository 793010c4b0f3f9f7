//! Domain models for decision-quiz
//!
//! Contains the core logic without any I/O concerns.

mod dataset;
mod graph;
mod id;
mod navigation;
mod paths;
mod report;
mod validate;

pub use dataset::{AnswerOption, Dataset, DatasetError, InfoLink, NodeInfo, NodeType, TreeNode};
pub use graph::DecisionGraph;
pub use id::{IdError, NodeId};
pub use navigation::{
    LoadOutcome, LoadTicket, Locator, NavigationError, NavigationState, Navigator,
    PersistedState, StateSlot, TransitionPolicy,
};
pub use paths::{
    enumerate_checked, enumerate_paths, EnumerationError, EnumerationLimits, PathEnumerator,
    Route, RouteOutcome, Step,
};
pub use report::{
    build_csv_report, build_report, build_text_report, report_filename, Report, ReportError,
    ReportKind,
};
pub use validate::{
    extra_validation, validate_and_promote, validate_dataset, Findings, ValidationSummary,
};
