//! Step-by-step DFS and BFS walkers.
//!
//! Walkers are lazy iterators: each call to `next` performs at most one state
//! mutation and returns the [`Step`] describing it. That lets the engine put a
//! pacing delay (and a cancellation point) between any two steps without the
//! walkers knowing about time at all.
//!
//! DFS keeps an explicit stack of `(node, next neighbor index)` frames instead
//! of recursing, so a walk can be dropped mid-descent.

use std::collections::VecDeque;

use graph_walk_core::pseudocode::{bfs_line, dfs_line};
use graph_walk_core::{Algorithm, Graph, Step, StepKind, VisitState};

use crate::error::{TraversalError, TraversalResult};

/// Fail with `InvalidArgument` unless `start` is a node of `graph`.
pub fn ensure_start(graph: &Graph, start: usize) -> TraversalResult<()> {
    if graph.contains(start) {
        Ok(())
    } else {
        Err(TraversalError::InvalidArgument {
            start,
            node_count: graph.node_count(),
        })
    }
}

/// Shared bookkeeping for building steps.
struct Emitter<'a> {
    algorithm: Algorithm,
    visited: &'a mut VisitState,
    seq: u64,
}

impl<'a> Emitter<'a> {
    fn new(algorithm: Algorithm, visited: &'a mut VisitState) -> Self {
        Self {
            algorithm,
            visited,
            seq: 0,
        }
    }

    fn step(
        &mut self,
        kind: StepKind,
        line: usize,
        node: Option<usize>,
        edge: Option<(usize, usize)>,
        message: String,
        frontier: Vec<usize>,
    ) -> Step {
        let step = Step {
            seq: self.seq,
            algorithm: self.algorithm,
            kind,
            line,
            node,
            edge,
            message: Some(message),
            visited: self.visited.snapshot(),
            frontier,
        };
        self.seq += 1;
        step
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: usize,
    next: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DfsPhase {
    Enter(usize),
    Mark(usize),
    Process(usize),
    Scan,
    Check { from: usize, to: usize },
    Descend { from: usize, to: usize },
    Done,
}

/// Depth-first walker. Neighbors are explored in increasing index order.
pub struct DepthFirst<'a> {
    graph: &'a Graph,
    emitter: Emitter<'a>,
    stack: Vec<Frame>,
    phase: DfsPhase,
}

impl<'a> DepthFirst<'a> {
    /// Validate `start`, reset `visited`, and position the walker before its first step.
    pub fn new(graph: &'a Graph, visited: &'a mut VisitState, start: usize) -> TraversalResult<Self> {
        ensure_start(graph, start)?;
        *visited = VisitState::new(graph.node_count());
        Ok(Self {
            graph,
            emitter: Emitter::new(Algorithm::Dfs, visited),
            stack: Vec::with_capacity(graph.node_count()),
            phase: DfsPhase::Enter(start),
        })
    }

    fn call_path(&self) -> Vec<usize> {
        self.stack.iter().map(|f| f.node).collect()
    }

    fn emit(
        &mut self,
        kind: StepKind,
        line: usize,
        node: usize,
        edge: Option<(usize, usize)>,
        message: String,
    ) -> Option<Step> {
        let frontier = self.call_path();
        Some(self.emitter.step(kind, line, Some(node), edge, message, frontier))
    }
}

impl Iterator for DepthFirst<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        loop {
            match self.phase {
                DfsPhase::Enter(node) => {
                    self.stack.push(Frame { node, next: 0 });
                    self.phase = DfsPhase::Mark(node);
                    return self.emit(
                        StepKind::Enter,
                        dfs_line::ENTER,
                        node,
                        None,
                        format!("Calling DFS({node})"),
                    );
                }
                DfsPhase::Mark(node) => {
                    self.emitter.visited.mark(node);
                    self.phase = DfsPhase::Process(node);
                    return self.emit(
                        StepKind::Visited,
                        dfs_line::MARK,
                        node,
                        None,
                        format!("Marked node {node} as visited"),
                    );
                }
                DfsPhase::Process(node) => {
                    self.phase = DfsPhase::Scan;
                    return self.emit(
                        StepKind::Processing,
                        dfs_line::PROCESS,
                        node,
                        None,
                        format!("Processing node {node}"),
                    );
                }
                DfsPhase::Scan => {
                    let Some(frame) = self.stack.last_mut() else {
                        self.phase = DfsPhase::Done;
                        continue;
                    };
                    let from = frame.node;
                    match self.graph.next_neighbor(from, frame.next) {
                        Some(to) => {
                            frame.next = to + 1;
                            self.phase = DfsPhase::Check { from, to };
                            return self.emit(
                                StepKind::EdgeConsidered,
                                dfs_line::FOR_EACH,
                                to,
                                Some((from, to)),
                                format!("Looking at neighbor {to} of node {from}"),
                            );
                        }
                        None => {
                            // Neighbors exhausted: return to the caller frame.
                            self.stack.pop();
                        }
                    }
                }
                DfsPhase::Check { from, to } => {
                    if self.emitter.visited.is_visited(to) {
                        self.phase = DfsPhase::Scan;
                        return self.emit(
                            StepKind::NeighborSeen,
                            dfs_line::CHECK,
                            to,
                            Some((from, to)),
                            format!("Node {to} is already visited, skipping"),
                        );
                    }
                    self.phase = DfsPhase::Descend { from, to };
                    return self.emit(
                        StepKind::NeighborNew,
                        dfs_line::CHECK,
                        to,
                        Some((from, to)),
                        format!("Node {to} has not been visited yet"),
                    );
                }
                DfsPhase::Descend { from, to } => {
                    self.phase = DfsPhase::Enter(to);
                    return self.emit(
                        StepKind::Descend,
                        dfs_line::RECURSE,
                        to,
                        Some((from, to)),
                        format!("Descending from node {from} into node {to}"),
                    );
                }
                DfsPhase::Done => return None,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BfsPhase {
    Enter,
    CreateQueue,
    EnqueueStart,
    MarkStart,
    Loop,
    Poll,
    Process(usize),
    Scan { node: usize, next: usize },
    Check { from: usize, to: usize },
    Mark { from: usize, to: usize },
    Enqueue { from: usize, to: usize },
    Done,
}

/// Breadth-first walker over a FIFO queue. Neighbors are enqueued in increasing index order.
pub struct BreadthFirst<'a> {
    graph: &'a Graph,
    emitter: Emitter<'a>,
    start: usize,
    queue: VecDeque<usize>,
    phase: BfsPhase,
}

impl<'a> BreadthFirst<'a> {
    /// Validate `start`, reset `visited`, and position the walker before its first step.
    pub fn new(graph: &'a Graph, visited: &'a mut VisitState, start: usize) -> TraversalResult<Self> {
        ensure_start(graph, start)?;
        *visited = VisitState::new(graph.node_count());
        Ok(Self {
            graph,
            emitter: Emitter::new(Algorithm::Bfs, visited),
            start,
            queue: VecDeque::with_capacity(graph.node_count()),
            phase: BfsPhase::Enter,
        })
    }

    fn emit(
        &mut self,
        kind: StepKind,
        line: usize,
        node: Option<usize>,
        edge: Option<(usize, usize)>,
        message: String,
    ) -> Option<Step> {
        let frontier = self.queue.iter().copied().collect();
        Some(self.emitter.step(kind, line, node, edge, message, frontier))
    }
}

impl Iterator for BreadthFirst<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let start = self.start;
        loop {
            match self.phase {
                BfsPhase::Enter => {
                    self.phase = BfsPhase::CreateQueue;
                    return self.emit(
                        StepKind::Enter,
                        bfs_line::ENTER,
                        Some(start),
                        None,
                        format!("Calling BFS({start})"),
                    );
                }
                BfsPhase::CreateQueue => {
                    self.queue.clear();
                    self.phase = BfsPhase::EnqueueStart;
                    return self.emit(
                        StepKind::QueueCreated,
                        bfs_line::CREATE_QUEUE,
                        None,
                        None,
                        "Created an empty queue".to_string(),
                    );
                }
                BfsPhase::EnqueueStart => {
                    self.queue.push_back(start);
                    self.phase = BfsPhase::MarkStart;
                    return self.emit(
                        StepKind::Enqueued,
                        bfs_line::ENQUEUE_START,
                        Some(start),
                        None,
                        format!("Added node {start} to the queue"),
                    );
                }
                BfsPhase::MarkStart => {
                    self.emitter.visited.mark(start);
                    self.phase = BfsPhase::Loop;
                    return self.emit(
                        StepKind::Visited,
                        bfs_line::MARK_START,
                        Some(start),
                        None,
                        format!("Marked node {start} as visited"),
                    );
                }
                BfsPhase::Loop => {
                    let message = if self.queue.is_empty() {
                        self.phase = BfsPhase::Done;
                        "Queue is empty, traversal finished".to_string()
                    } else {
                        self.phase = BfsPhase::Poll;
                        format!("Queue holds {} node(s)", self.queue.len())
                    };
                    return self.emit(StepKind::QueueCheck, bfs_line::WHILE, None, None, message);
                }
                BfsPhase::Poll => {
                    let Some(node) = self.queue.pop_front() else {
                        self.phase = BfsPhase::Loop;
                        continue;
                    };
                    self.phase = BfsPhase::Process(node);
                    return self.emit(
                        StepKind::Dequeued,
                        bfs_line::POLL,
                        Some(node),
                        None,
                        format!("Took node {node} from the queue"),
                    );
                }
                BfsPhase::Process(node) => {
                    self.phase = BfsPhase::Scan { node, next: 0 };
                    return self.emit(
                        StepKind::Processing,
                        bfs_line::PROCESS,
                        Some(node),
                        None,
                        format!("Processing node {node}"),
                    );
                }
                BfsPhase::Scan { node, next } => match self.graph.next_neighbor(node, next) {
                    Some(to) => {
                        self.phase = BfsPhase::Check { from: node, to };
                        return self.emit(
                            StepKind::EdgeConsidered,
                            bfs_line::FOR_EACH,
                            Some(to),
                            Some((node, to)),
                            format!("Looking at neighbor {to} of node {node}"),
                        );
                    }
                    None => self.phase = BfsPhase::Loop,
                },
                BfsPhase::Check { from, to } => {
                    if self.emitter.visited.is_visited(to) {
                        self.phase = BfsPhase::Scan {
                            node: from,
                            next: to + 1,
                        };
                        return self.emit(
                            StepKind::NeighborSeen,
                            bfs_line::CHECK,
                            Some(to),
                            Some((from, to)),
                            format!("Node {to} is already visited, skipping"),
                        );
                    }
                    self.phase = BfsPhase::Mark { from, to };
                    return self.emit(
                        StepKind::NeighborNew,
                        bfs_line::CHECK,
                        Some(to),
                        Some((from, to)),
                        format!("Node {to} has not been visited yet"),
                    );
                }
                BfsPhase::Mark { from, to } => {
                    self.emitter.visited.mark(to);
                    self.phase = BfsPhase::Enqueue { from, to };
                    return self.emit(
                        StepKind::Visited,
                        bfs_line::MARK,
                        Some(to),
                        Some((from, to)),
                        format!("Marked node {to} as visited"),
                    );
                }
                BfsPhase::Enqueue { from, to } => {
                    self.queue.push_back(to);
                    self.phase = BfsPhase::Scan {
                        node: from,
                        next: to + 1,
                    };
                    return self.emit(
                        StepKind::Enqueued,
                        bfs_line::ENQUEUE,
                        Some(to),
                        Some((from, to)),
                        format!("Added node {to} to the queue"),
                    );
                }
                BfsPhase::Done => return None,
            }
        }
    }
}

/// Either walker behind one type, chosen by [`Algorithm`].
pub enum Walker<'a> {
    DepthFirst(DepthFirst<'a>),
    BreadthFirst(BreadthFirst<'a>),
}

impl<'a> Walker<'a> {
    pub fn new(
        algorithm: Algorithm,
        graph: &'a Graph,
        visited: &'a mut VisitState,
        start: usize,
    ) -> TraversalResult<Self> {
        Ok(match algorithm {
            Algorithm::Dfs => Walker::DepthFirst(DepthFirst::new(graph, visited, start)?),
            Algorithm::Bfs => Walker::BreadthFirst(BreadthFirst::new(graph, visited, start)?),
        })
    }
}

impl Iterator for Walker<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        match self {
            Walker::DepthFirst(w) => w.next(),
            Walker::BreadthFirst(w) => w.next(),
        }
    }
}

/// Run a whole traversal without pacing and collect its steps.
pub fn trace(graph: &Graph, algorithm: Algorithm, start: usize) -> TraversalResult<Vec<Step>> {
    let mut visited = VisitState::new(graph.node_count());
    Ok(Walker::new(algorithm, graph, &mut visited, start)?.collect())
}
