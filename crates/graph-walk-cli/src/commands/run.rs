//! Animated traversal in the terminal.

use std::time::Duration;

use anyhow::{Context, Result};
use graph_walk_engine::{EngineConfig, TraversalEngine};
use tracing::info;

use super::Selection;
use crate::render::TerminalSink;

/// Run one paced traversal, printing each step. Ctrl-C stops it cleanly.
pub async fn execute(selection: Selection, delay: Duration, show_code: bool) -> Result<()> {
    let graph = selection.preset.graph();
    let mut engine = TraversalEngine::with_config(graph, EngineConfig { delay });

    let handle = engine
        .start(
            selection.algorithm,
            selection.start,
            TerminalSink::stdout(show_code),
        )
        .with_context(|| {
            format!(
                "Cannot start {} on the {} graph",
                selection.algorithm, selection.preset
            )
        })?;

    let cancel = handle.cancellation_token();
    let join = handle.join();
    tokio::pin!(join);

    let summary = tokio::select! {
        result = &mut join => result?,
        Ok(()) = tokio::signal::ctrl_c() => {
            info!("interrupt received, stopping traversal");
            cancel.cancel();
            join.await?
        }
    };

    if summary.interrupted_delays > 0 {
        info!(skipped = summary.interrupted_delays, "pacing delays skipped");
    }

    Ok(())
}
