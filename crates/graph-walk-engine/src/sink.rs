//! The boundary between a traversal run and whatever renders it.
//!
//! The engine calls a [`VisualizationSink`] from its worker task, in step order.
//! Sinks only ever see owned snapshots, never the live visit state, so a sink
//! can forward events to another thread without extra locking.

use std::sync::{Arc, Mutex, MutexGuard};

use graph_walk_core::{visit_order, Algorithm, Graph, Step};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::RunSummary;

/// Receives traversal progress. Repainting is the sink's job, not the engine's.
pub trait VisualizationSink: Send {
    /// Called once per run, before the first step.
    fn on_algorithm_start(&mut self, algorithm: Algorithm, graph: &Graph) {
        let _ = (algorithm, graph);
    }

    /// Called after every step, in order.
    fn on_step(&mut self, step: &Step);

    /// Called once when the run ends, whether it completed or was cancelled.
    fn on_finish(&mut self, summary: &RunSummary) {
        let _ = summary;
    }
}

impl<S: VisualizationSink + ?Sized> VisualizationSink for Box<S> {
    fn on_algorithm_start(&mut self, algorithm: Algorithm, graph: &Graph) {
        (**self).on_algorithm_start(algorithm, graph);
    }

    fn on_step(&mut self, step: &Step) {
        (**self).on_step(step);
    }

    fn on_finish(&mut self, summary: &RunSummary) {
        (**self).on_finish(summary);
    }
}

/// Adapts a plain step callback into a sink.
pub struct FnSink<F>(F);

/// Build a sink from a step callback.
pub fn from_fn<F>(f: F) -> FnSink<F>
where
    F: FnMut(&Step) + Send,
{
    FnSink(f)
}

impl<F> VisualizationSink for FnSink<F>
where
    F: FnMut(&Step) + Send,
{
    fn on_step(&mut self, step: &Step) {
        (self.0)(step);
    }
}

/// Everything a sink can be told, as a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SinkEvent {
    Started {
        algorithm: Algorithm,
        node_count: usize,
    },
    Step(Step),
    Finished(RunSummary),
}

/// Forwards events over an unbounded channel, e.g. to a UI thread.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SinkEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SinkEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: SinkEvent) {
        if self.tx.send(event).is_err() {
            debug!("sink_receiver_dropped");
        }
    }
}

impl VisualizationSink for ChannelSink {
    fn on_algorithm_start(&mut self, algorithm: Algorithm, graph: &Graph) {
        self.send(SinkEvent::Started {
            algorithm,
            node_count: graph.node_count(),
        });
    }

    fn on_step(&mut self, step: &Step) {
        self.send(SinkEvent::Step(step.clone()));
    }

    fn on_finish(&mut self, summary: &RunSummary) {
        self.send(SinkEvent::Finished(summary.clone()));
    }
}

/// Keeps every event in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SinkEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SinkEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.lock().clone()
    }

    pub fn steps(&self) -> Vec<Step> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Step(step) => Some(step.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn visit_order(&self) -> Vec<usize> {
        visit_order(&self.steps())
    }

    /// Summary of the last finished run, if any.
    pub fn summary(&self) -> Option<RunSummary> {
        self.lock().iter().rev().find_map(|e| match e {
            SinkEvent::Finished(summary) => Some(summary.clone()),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl VisualizationSink for RecordingSink {
    fn on_algorithm_start(&mut self, algorithm: Algorithm, graph: &Graph) {
        self.lock().push(SinkEvent::Started {
            algorithm,
            node_count: graph.node_count(),
        });
    }

    fn on_step(&mut self, step: &Step) {
        self.lock().push(SinkEvent::Step(step.clone()));
    }

    fn on_finish(&mut self, summary: &RunSummary) {
        self.lock().push(SinkEvent::Finished(summary.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::trace;
    use graph_walk_core::Preset;

    #[test]
    fn test_fn_sink_sees_steps() {
        let graph = Preset::Small.graph();
        let mut seen = Vec::new();
        {
            let mut sink = from_fn(|step: &Step| seen.push(step.seq));
            for step in trace(&graph, Algorithm::Dfs, 0).unwrap() {
                sink.on_step(&step);
            }
        }
        assert_eq!(seen.first(), Some(&0));
        assert!(seen.windows(2).all(|w| w[0] + 1 == w[1]));
    }

    #[test]
    fn test_recording_sink_clones_share_buffer() {
        let graph = Preset::Small.graph();
        let recorder = RecordingSink::new();
        let mut boxed: Box<dyn VisualizationSink> = Box::new(recorder.clone());
        boxed.on_algorithm_start(Algorithm::Bfs, &graph);
        for step in trace(&graph, Algorithm::Bfs, 0).unwrap() {
            boxed.on_step(&step);
        }
        assert_eq!(recorder.visit_order(), vec![0, 1, 2, 3, 4]);
        assert!(matches!(
            recorder.events().first(),
            Some(SinkEvent::Started {
                algorithm: Algorithm::Bfs,
                node_count: 5
            })
        ));
        recorder.clear();
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let graph = Preset::Small.graph();
        let (mut sink, rx) = ChannelSink::new();
        drop(rx);
        sink.on_algorithm_start(Algorithm::Dfs, &graph);
    }

    #[test]
    fn test_events_serialize_with_event_tag() {
        let graph = Preset::Small.graph();
        let steps = trace(&graph, Algorithm::Bfs, 0).unwrap();

        let started = serde_json::to_value(SinkEvent::Started {
            algorithm: Algorithm::Bfs,
            node_count: 5,
        })
        .unwrap();
        assert_eq!(started["event"], "started");
        assert_eq!(started["algorithm"], "bfs");
        assert_eq!(started["node_count"], 5);

        let step = serde_json::to_value(SinkEvent::Step(steps[2].clone())).unwrap();
        assert_eq!(step["event"], "step");
        assert_eq!(step["seq"], 2);
        assert_eq!(step["kind"], "enqueued");
        assert_eq!(step["frontier"], serde_json::json!([0]));

        let summary = RunSummary {
            run_id: 3,
            algorithm: Algorithm::Bfs,
            start: 0,
            steps: steps.len() as u64,
            visit_order: visit_order(&steps),
            unvisited: vec![],
            interrupted_delays: 0,
            cancelled: false,
            elapsed: std::time::Duration::from_millis(1500),
        };
        let finished = serde_json::to_value(SinkEvent::Finished(summary.clone())).unwrap();
        assert_eq!(finished["event"], "finished");
        assert_eq!(finished["run_id"], 3);
        assert_eq!(finished["visit_order"], serde_json::json!([0, 1, 2, 3, 4]));
        assert_eq!(finished["cancelled"], false);

        let json = serde_json::to_string(&summary).unwrap();
        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
