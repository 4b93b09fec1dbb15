//! Graph preset inspection.

use anyhow::Result;
use graph_walk_core::Preset;

/// Print the adjacency matrix, edge list and layout of a preset.
pub fn execute(preset: Preset) -> Result<()> {
    let graph = preset.graph();

    println!("📊 Graph: {}", preset);
    println!("{:─<50}", "");
    println!("Nodes: {}", graph.node_count());
    println!("Edges: {}", graph.edge_count());

    println!();
    println!("Adjacency matrix:");
    let header: Vec<String> = (0..graph.node_count()).map(|n| format!("{n:>2}")).collect();
    println!("    {}", header.join(" "));
    for node in 0..graph.node_count() {
        let row: Vec<&str> = graph
            .row(node)
            .unwrap_or(&[])
            .iter()
            .map(|&adjacent| if adjacent { " 1" } else { " ·" })
            .collect();
        println!("{node:>2}  {}", row.join(" "));
    }

    println!();
    println!("Edges:");
    for (a, b) in graph.edges() {
        println!("   {a} ─ {b}");
    }

    println!();
    println!("Layout:");
    for (node, pos) in graph.layout().iter().enumerate() {
        println!("   {node:>2}: ({:.0}, {:.0})", pos.x, pos.y);
    }

    Ok(())
}
