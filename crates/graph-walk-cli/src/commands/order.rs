//! Visit order without animation.

use anyhow::Result;
use graph_walk_core::{visit_order, Algorithm, Preset, Step};
use graph_walk_engine::trace;
use serde::Serialize;

use super::Selection;
use crate::render::{format_order, format_step};

#[derive(Debug, Serialize)]
struct OrderReport<'a> {
    algorithm: Algorithm,
    graph: Preset,
    start: usize,
    order: &'a [usize],
    unvisited: Vec<usize>,
    step_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<&'a [Step]>,
}

/// Print the order in which nodes get visited.
pub fn execute(selection: Selection, json: bool, show_steps: bool) -> Result<()> {
    let graph = selection.preset.graph();
    let steps = trace(&graph, selection.algorithm, selection.start)?;
    let order = visit_order(&steps);

    if json {
        let report = OrderReport {
            algorithm: selection.algorithm,
            graph: selection.preset,
            start: selection.start,
            order: &order,
            unvisited: (0..graph.node_count())
                .filter(|n| !order.contains(n))
                .collect(),
            step_count: steps.len(),
            steps: show_steps.then_some(steps.as_slice()),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if show_steps {
        for step in &steps {
            print!("{}", format_step(step));
        }
        println!();
    }

    println!(
        "{} from {} on {}: {}",
        selection.algorithm,
        selection.start,
        selection.preset,
        format_order(&order)
    );
    Ok(())
}
