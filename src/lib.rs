//! decision-quiz - walk and analyse decision-tree quizzes
//!
//! A quiz is a directed graph of question, outcome and link nodes. The crate
//! validates a dataset, enumerates every route from the root to a terminal
//! node, renders text and CSV reports, and drives an interactive walk whose
//! position survives restarts and can be shared as a link.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{Dataset, NodeId, NodeType, Navigator, TreeNode};
