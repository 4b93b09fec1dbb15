//! Paced traversal runs on a background task.
//!
//! `TraversalEngine` owns one graph and one [`VisitState`]. A run takes the
//! visit state's lock for its whole lifetime, which gives the
//! `Idle -> Running -> Idle` cycle:
//!
//! - [`TraversalEngine::start`] rejects with `AlreadyRunning` while a run holds the lock;
//! - [`TraversalEngine::restart`] cancels the current run and waits for its
//!   worker to release the lock before starting the next one.

use std::sync::Arc;
use std::time::Duration;

use graph_walk_core::{Algorithm, Graph, StepKind, VisitSnapshot, VisitState};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify, OwnedMutexGuard};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{TraversalError, TraversalResult};
use crate::pacer::Pacer;
use crate::sink::VisualizationSink;
use crate::walker::{ensure_start, Walker};

/// Configuration for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pause after every emitted step.
    pub delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
        }
    }
}

impl EngineConfig {
    /// Lower end of the comfortable viewing range.
    pub fn fast() -> Self {
        Self {
            delay: Duration::from_millis(100),
        }
    }

    /// No pacing at all, for tests and batch use.
    pub fn instant() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay_ms(ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(ms),
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Per-engine run counter, starting at 1.
    pub run_id: u64,
    pub algorithm: Algorithm,
    pub start: usize,
    /// Steps delivered to the sink.
    pub steps: u64,
    /// Nodes in the order they were marked visited.
    pub visit_order: Vec<usize>,
    /// Nodes still unvisited when the run ended.
    pub unvisited: Vec<usize>,
    /// Pacing delays cut short by [`RunHandle::skip_delay`].
    pub interrupted_delays: usize,
    /// The run stopped at a cancellation point.
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Whether every node of the graph was visited.
    pub fn covered_all(&self) -> bool {
        self.unvisited.is_empty()
    }
}

/// Control over one in-flight run.
#[derive(Debug)]
pub struct RunHandle {
    run_id: u64,
    algorithm: Algorithm,
    cancel: CancellationToken,
    nudge: Arc<Notify>,
    task: JoinHandle<TraversalResult<RunSummary>>,
}

impl RunHandle {
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Ask the worker to stop at its next pacing point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token that cancels this run; useful once [`RunHandle::join`] has taken the handle.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// End the current pacing delay early. A nudge sent while no delay is
    /// pending shortens the next one.
    pub fn skip_delay(&self) {
        self.nudge.notify_one();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the worker and return its summary.
    pub async fn join(self) -> TraversalResult<RunSummary> {
        self.task
            .await
            .map_err(|e| TraversalError::Worker(e.to_string()))?
    }
}

#[derive(Debug)]
struct RunControl {
    run_id: u64,
    cancel: CancellationToken,
}

/// Runs paced DFS/BFS traversals over a fixed graph.
///
/// Runs are spawned with `tokio::spawn`, so the `run_*` methods must be
/// called from within a Tokio runtime. Dropping the engine cancels the
/// current run.
pub struct TraversalEngine {
    graph: Arc<Graph>,
    config: EngineConfig,
    visit_state: Arc<Mutex<VisitState>>,
    current: Option<RunControl>,
    runs_started: u64,
}

impl TraversalEngine {
    /// Create an engine with default configuration.
    pub fn new(graph: Graph) -> Self {
        Self::with_config(graph, EngineConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(graph: Graph, config: EngineConfig) -> Self {
        let visit_state = VisitState::new(graph.node_count());
        Self {
            graph: Arc::new(graph),
            config,
            visit_state: Arc::new(Mutex::new(visit_state)),
            current: None,
            runs_started: 0,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Change the pacing delay. Takes effect on the next run.
    pub fn set_delay(&mut self, delay: Duration) {
        self.config.delay = delay;
    }

    /// Whether a run currently holds the visit state.
    pub fn is_running(&self) -> bool {
        self.visit_state.try_lock().is_err()
    }

    /// Visit marks left by the last run, or `None` while a run is active.
    pub fn visited(&self) -> Option<VisitSnapshot> {
        self.visit_state.try_lock().ok().map(|state| state.snapshot())
    }

    /// Start a depth-first run from `start`.
    pub fn run_dfs<S>(&mut self, start: usize, sink: S) -> TraversalResult<RunHandle>
    where
        S: VisualizationSink + 'static,
    {
        self.start(Algorithm::Dfs, start, sink)
    }

    /// Start a breadth-first run from `start`.
    pub fn run_bfs<S>(&mut self, start: usize, sink: S) -> TraversalResult<RunHandle>
    where
        S: VisualizationSink + 'static,
    {
        self.start(Algorithm::Bfs, start, sink)
    }

    /// Start a run, rejecting if one is already active.
    pub fn start<S>(
        &mut self,
        algorithm: Algorithm,
        start: usize,
        sink: S,
    ) -> TraversalResult<RunHandle>
    where
        S: VisualizationSink + 'static,
    {
        ensure_start(&self.graph, start)?;
        let guard = Arc::clone(&self.visit_state)
            .try_lock_owned()
            .map_err(|_| {
                warn!(%algorithm, start, "traversal_rejected_busy");
                TraversalError::AlreadyRunning
            })?;
        Ok(self.spawn(algorithm, start, guard, sink))
    }

    /// Cancel any active run, wait for it to exit, then start a new one.
    pub async fn restart<S>(
        &mut self,
        algorithm: Algorithm,
        start: usize,
        sink: S,
    ) -> TraversalResult<RunHandle>
    where
        S: VisualizationSink + 'static,
    {
        ensure_start(&self.graph, start)?;
        self.cancel();
        let guard = Arc::clone(&self.visit_state).lock_owned().await;
        Ok(self.spawn(algorithm, start, guard, sink))
    }

    /// Signal the active run to stop. Returns `false` if no run is active
    /// or it had already been cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.current.take() {
            Some(control) if self.is_running() && !control.cancel.is_cancelled() => {
                debug!(run_id = control.run_id, "traversal_cancel_requested");
                control.cancel.cancel();
                true
            }
            _ => false,
        }
    }

    fn spawn<S>(
        &mut self,
        algorithm: Algorithm,
        start: usize,
        mut guard: OwnedMutexGuard<VisitState>,
        mut sink: S,
    ) -> RunHandle
    where
        S: VisualizationSink + 'static,
    {
        self.runs_started += 1;
        let run_id = self.runs_started;
        let cancel = CancellationToken::new();
        let nudge = Arc::new(Notify::new());
        let pacer = Pacer::new(self.config.delay, cancel.clone(), Arc::clone(&nudge));
        let graph = Arc::clone(&self.graph);

        self.current = Some(RunControl {
            run_id,
            cancel: cancel.clone(),
        });

        let task = tokio::spawn(async move {
            drive(run_id, algorithm, start, &graph, &mut guard, &mut sink, &pacer).await
        });

        RunHandle {
            run_id,
            algorithm,
            cancel,
            nudge,
            task,
        }
    }
}

impl Drop for TraversalEngine {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for TraversalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraversalEngine")
            .field("node_count", &self.graph.node_count())
            .field("edge_count", &self.graph.edge_count())
            .field("delay", &self.config.delay)
            .field("runs_started", &self.runs_started)
            .field("running", &self.is_running())
            .finish()
    }
}

/// Worker body: mutate, notify, pace, until the walker is exhausted or cancelled.
async fn drive<S: VisualizationSink>(
    run_id: u64,
    algorithm: Algorithm,
    start: usize,
    graph: &Graph,
    visited: &mut VisitState,
    sink: &mut S,
    pacer: &Pacer,
) -> TraversalResult<RunSummary> {
    let started = Instant::now();
    info!(
        run_id,
        %algorithm,
        start,
        delay_ms = pacer.delay().as_millis() as u64,
        "traversal_run_start"
    );

    let walker = Walker::new(algorithm, graph, visited, start)?;
    sink.on_algorithm_start(algorithm, graph);

    let mut steps = 0u64;
    let mut visit_order = Vec::with_capacity(graph.node_count());
    let mut interrupted_delays = 0usize;
    let mut cancelled = false;

    for step in walker {
        if step.kind == StepKind::Visited {
            visit_order.extend(step.node);
        }
        sink.on_step(&step);
        steps += 1;
        debug!(run_id, seq = step.seq, line = step.line, node = ?step.node, "traversal_step");

        match pacer.pause().await {
            Ok(()) => {}
            Err(TraversalError::Interrupted) => {
                interrupted_delays += 1;
                debug!(run_id, seq = step.seq, "pacing_interrupted");
            }
            Err(TraversalError::Cancelled) => {
                cancelled = true;
                break;
            }
            Err(other) => return Err(other),
        }
    }

    let summary = RunSummary {
        run_id,
        algorithm,
        start,
        steps,
        visit_order,
        unvisited: visited.unvisited(),
        interrupted_delays,
        cancelled,
        elapsed: started.elapsed(),
    };

    sink.on_finish(&summary);

    if cancelled {
        info!(run_id, steps, "traversal_cancelled");
    } else {
        info!(
            run_id,
            steps,
            visited = summary.visit_order.len(),
            duration_ms = summary.elapsed.as_millis() as u64,
            "traversal_run_complete"
        );
    }

    Ok(summary)
}
