//! Paced DFS/BFS traversal that streams visualization steps to a sink.
//!
//! ```text
//! user action ──► TraversalEngine::run_dfs(0, sink)
//!                    │  tokio task, owns the VisitState lock
//!                    ▼
//!                 Walker ──step──► sink.on_step(&step) ──► Pacer::pause()
//!                    ▲                                         │
//!                    └──────────────── next step ◄─────────────┘
//! ```
//!
//! - **Walkers** ([`DepthFirst`], [`BreadthFirst`]) are pure iterators of
//!   [`Step`](graph_walk_core::Step)s; [`trace`] collects one without pacing.
//! - **Sinks** implement [`VisualizationSink`]; [`ChannelSink`] forwards to
//!   another thread, [`RecordingSink`] keeps everything for inspection.
//! - **Engine** ([`TraversalEngine`]) runs one walker at a time per engine,
//!   with a [`CancellationToken`](tokio_util::sync::CancellationToken) per run.

mod engine;
mod error;
mod pacer;
pub mod sink;
mod walker;

pub use engine::{EngineConfig, RunHandle, RunSummary, TraversalEngine};
pub use error::{TraversalError, TraversalResult};
pub use pacer::Pacer;
pub use sink::{from_fn, ChannelSink, FnSink, RecordingSink, SinkEvent, VisualizationSink};
pub use walker::{ensure_start, trace, BreadthFirst, DepthFirst, Walker};
