//! Per-run visit tracking and the step events a traversal emits.

use serde::{Deserialize, Serialize};

use crate::pseudocode::Algorithm;

/// Mutable visited marks for one traversal run.
///
/// Only the active run writes to it; everything else sees [`VisitSnapshot`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitState {
    marks: Vec<bool>,
}

impl VisitState {
    /// All-unvisited state for `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            marks: vec![false; node_count],
        }
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Clear every mark.
    pub fn reset(&mut self) {
        self.marks.fill(false);
    }

    /// Mark `node` visited. Returns `true` if it was not visited before.
    pub fn mark(&mut self, node: usize) -> bool {
        match self.marks.get_mut(node) {
            Some(mark) if !*mark => {
                *mark = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_visited(&self, node: usize) -> bool {
        self.marks.get(node).copied().unwrap_or(false)
    }

    pub fn visited_count(&self) -> usize {
        self.marks.iter().filter(|m| **m).count()
    }

    /// Nodes that were never marked, in index order.
    pub fn unvisited(&self) -> Vec<usize> {
        self.marks
            .iter()
            .enumerate()
            .filter_map(|(idx, &m)| (!m).then_some(idx))
            .collect()
    }

    pub fn snapshot(&self) -> VisitSnapshot {
        VisitSnapshot {
            marks: self.marks.clone(),
        }
    }
}

/// Immutable copy of a [`VisitState`] taken when a step was emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitSnapshot {
    marks: Vec<bool>,
}

impl VisitSnapshot {
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn is_visited(&self, node: usize) -> bool {
        self.marks.get(node).copied().unwrap_or(false)
    }

    pub fn visited_count(&self) -> usize {
        self.marks.iter().filter(|m| **m).count()
    }

    /// True when no node is marked.
    pub fn is_clear(&self) -> bool {
        self.marks.iter().all(|m| !m)
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.marks
    }
}

/// What happened at a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// DFS call or BFS start on a node.
    Enter,
    /// BFS queue created.
    QueueCreated,
    /// Node added to the BFS queue.
    Enqueued,
    /// Node newly marked visited.
    Visited,
    /// BFS loop condition evaluated.
    QueueCheck,
    /// Node taken from the BFS queue.
    Dequeued,
    /// Node being processed.
    Processing,
    /// Edge to a neighbor examined by the neighbor loop.
    EdgeConsidered,
    /// Neighbor turned out to be visited already.
    NeighborSeen,
    /// Neighbor turned out to be unvisited.
    NeighborNew,
    /// DFS recursing into a neighbor.
    Descend,
}

/// One externally observable unit of traversal progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Position in the run, starting at 0.
    pub seq: u64,
    pub algorithm: Algorithm,
    pub kind: StepKind,
    /// Active line in [`Algorithm::pseudocode`].
    pub line: usize,
    pub node: Option<usize>,
    /// Edge under examination, as `(from, to)`.
    pub edge: Option<(usize, usize)>,
    /// Narration to append.
    pub message: Option<String>,
    /// Visited marks after this step's mutation.
    pub visited: VisitSnapshot,
    /// DFS call path or BFS queue contents, front first.
    pub frontier: Vec<usize>,
}

impl Step {
    /// Source text of the active line.
    pub fn pseudocode_line(&self) -> &'static str {
        self.algorithm.line(self.line).unwrap_or("")
    }

    /// Whether this step marked a node visited.
    pub fn is_visit(&self) -> bool {
        self.kind == StepKind::Visited
    }
}

/// Nodes in the order they were marked visited.
pub fn visit_order<'a>(steps: impl IntoIterator<Item = &'a Step>) -> Vec<usize> {
    steps
        .into_iter()
        .filter(|s| s.is_visit())
        .filter_map(|s| s.node)
        .collect()
}
