//! Terminal rendering of traversal steps.
//!
//! The `format_*` functions are pure so they can be tested without a terminal;
//! [`TerminalSink`] just writes their output as steps arrive.

use std::io::{self, Write};

use graph_walk_core::{Algorithm, Graph, Step, VisitSnapshot};
use graph_walk_engine::{RunSummary, VisualizationSink};
use tracing::warn;

/// Sink that prints each step to a writer.
pub struct TerminalSink<W: Write + Send> {
    out: W,
    show_code: bool,
    failed: bool,
}

impl TerminalSink<io::Stdout> {
    pub fn stdout(show_code: bool) -> Self {
        Self::new(io::stdout(), show_code)
    }
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W, show_code: bool) -> Self {
        Self {
            out,
            show_code,
            failed: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        if self.failed {
            return;
        }
        if let Err(e) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush())
        {
            // Typically a closed pipe; stop writing but let the run finish.
            warn!(error = %e, "terminal_write_failed");
            self.failed = true;
        }
    }
}

impl<W: Write + Send> VisualizationSink for TerminalSink<W> {
    fn on_algorithm_start(&mut self, algorithm: Algorithm, graph: &Graph) {
        self.write(&format_header(algorithm, graph));
    }

    fn on_step(&mut self, step: &Step) {
        if self.show_code {
            let listing = format_listing(step.algorithm, Some(step.line));
            self.write(&listing);
        }
        self.write(&format_step(step));
    }

    fn on_finish(&mut self, summary: &RunSummary) {
        self.write(&format_summary(summary));
    }
}

pub fn format_header(algorithm: Algorithm, graph: &Graph) -> String {
    format!(
        "▶ {} on {} nodes, {} edges\n\n",
        algorithm.label(),
        graph.node_count(),
        graph.edge_count()
    )
}

/// Numbered listing with a marker on `highlight`.
pub fn format_listing(algorithm: Algorithm, highlight: Option<usize>) -> String {
    let mut out = String::new();
    for (idx, line) in algorithm.pseudocode().iter().enumerate() {
        let marker = if highlight == Some(idx) { '➤' } else { ' ' };
        out.push_str(&format!("{marker} {idx:>2} │ {line}\n"));
    }
    out
}

/// One cell per node: `●` visited, `○` not yet; the focus node is bracketed.
pub fn format_nodes(visited: &VisitSnapshot, focus: Option<usize>) -> String {
    (0..visited.len())
        .map(|node| {
            let mark = if visited.is_visited(node) { '●' } else { '○' };
            if focus == Some(node) {
                format!("[{mark}{node}]")
            } else {
                format!("{mark}{node}")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_step(step: &Step) -> String {
    let frontier_label = match step.algorithm {
        Algorithm::Dfs => "stack",
        Algorithm::Bfs => "queue",
    };
    let mut out = format!(
        "[{:>3}] {} L{:<2} {}\n      {}   {} {:?}\n",
        step.seq,
        step.algorithm.tag(),
        step.line,
        step.pseudocode_line().trim(),
        format_nodes(&step.visited, step.node),
        frontier_label,
        step.frontier,
    );
    if let Some(message) = &step.message {
        out.push_str(&format!("      {message}\n"));
    }
    out
}

pub fn format_order(order: &[usize]) -> String {
    order
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" → ")
}

pub fn format_summary(summary: &RunSummary) -> String {
    if summary.cancelled {
        return format!(
            "\n⏹ {} from {} cancelled after {} steps (visited so far: {})\n",
            summary.algorithm,
            summary.start,
            summary.steps,
            format_order(&summary.visit_order)
        );
    }

    let total = summary.visit_order.len() + summary.unvisited.len();
    let mut out = format!(
        "\n✅ {} from {} visited {}/{} nodes in {} steps\n   Order: {}\n",
        summary.algorithm,
        summary.start,
        summary.visit_order.len(),
        total,
        summary.steps,
        format_order(&summary.visit_order)
    );
    if !summary.unvisited.is_empty() {
        out.push_str(&format!(
            "   Unreachable: {}\n",
            summary
                .unvisited
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_walk_core::{Preset, StepKind};
    use graph_walk_engine::trace;
    use std::time::Duration;

    #[test]
    fn test_listing_highlights_one_line() {
        let listing = format_listing(Algorithm::Dfs, Some(1));
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with('➤'));
        assert_eq!(lines.iter().filter(|l| l.starts_with('➤')).count(), 1);
    }

    #[test]
    fn test_nodes_strip() {
        let steps = trace(&Preset::Small.graph(), Algorithm::Bfs, 0).unwrap();
        let visit = steps.iter().find(|s| s.kind == StepKind::Visited).unwrap();
        assert_eq!(format_nodes(&visit.visited, visit.node), "[●0] ○1 ○2 ○3 ○4");
    }

    #[test]
    fn test_step_mentions_line_and_message() {
        let steps = trace(&Preset::Small.graph(), Algorithm::Dfs, 0).unwrap();
        let text = format_step(&steps[1]);
        assert!(text.contains("DFS L1"));
        assert!(text.contains("mark node as visited"));
        assert!(text.contains("Marked node 0 as visited"));
        assert!(text.contains("stack [0]"));
    }

    #[test]
    fn test_summary_lists_unreachable() {
        let summary = RunSummary {
            run_id: 1,
            algorithm: Algorithm::Bfs,
            start: 0,
            steps: 12,
            visit_order: vec![0, 1],
            unvisited: vec![2],
            interrupted_delays: 0,
            cancelled: false,
            elapsed: Duration::ZERO,
        };
        let text = format_summary(&summary);
        assert!(text.contains("visited 2/3 nodes"));
        assert!(text.contains("Order: 0 → 1"));
        assert!(text.contains("Unreachable: 2"));
    }

    #[test]
    fn test_sink_writes_to_buffer() {
        let graph = Preset::Small.graph();
        let mut sink = TerminalSink::new(Vec::new(), true);
        sink.on_algorithm_start(Algorithm::Dfs, &graph);
        for step in trace(&graph, Algorithm::Dfs, 0).unwrap().iter().take(2) {
            sink.on_step(step);
        }
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.starts_with("▶ Depth-first search on 5 nodes, 5 edges"));
        assert!(text.contains("➤  0 │ DFS(node):"));
    }
}
