//! Core domain types for animated graph traversal.
//!
//! ## Core Concepts
//!
//! - **Graph**: a small, immutable, undirected adjacency matrix
//! - **VisitState**: the per-run visited marks, reset before every run
//! - **Step**: one observable unit of progress (active pseudocode line,
//!   node/edge under examination, narration, and a snapshot of the marks)
//! - **Algorithm**: DFS or BFS, each with the pseudocode listing its steps point into
//!
//! Walkers and the paced engine live in `graph-walk-engine`; this crate only
//! holds the data they share with renderers.

mod graph;
pub mod pseudocode;
mod step;

pub use graph::{Graph, GraphError, GraphResult, Position, Preset};
pub use pseudocode::{Algorithm, UnknownAlgorithm, BFS_PSEUDOCODE, DFS_PSEUDOCODE};
pub use step::{visit_order, Step, StepKind, VisitSnapshot, VisitState};
