//! Fixed undirected graphs backed by a boolean adjacency matrix.
//!
//! A [`Graph`] is validated once at construction (square, symmetric, no
//! self-loops) and never mutated afterwards. Traversals borrow it immutably,
//! so a single instance can be shared across runs.

use std::fmt;
use std::str::FromStr;

use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Bfs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for graph construction.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised while building a [`Graph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The matrix has no rows.
    #[error("graph has no nodes")]
    Empty,

    /// A row length differs from the number of rows.
    #[error("adjacency matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// `adjacency[row][col] != adjacency[col][row]`.
    #[error("adjacency matrix is not symmetric at ({row}, {col})")]
    Asymmetric { row: usize, col: usize },

    /// A node is adjacent to itself.
    #[error("self-loop on node {node}")]
    SelfLoop { node: usize },

    /// An edge endpoint is not a node of the graph.
    #[error("edge ({from}, {to}) is out of range for {node_count} nodes")]
    EdgeOutOfRange {
        from: usize,
        to: usize,
        node_count: usize,
    },

    /// Layout does not provide exactly one position per node.
    #[error("layout has {got} positions, expected {expected}")]
    LayoutMismatch { got: usize, expected: usize },

    /// No preset with this name.
    #[error("unknown graph preset: {0} (expected one of: small, tree)")]
    UnknownPreset(String),
}

/// Where a renderer should draw a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Immutable undirected graph over nodes `0..node_count()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graph {
    adjacency: Vec<Vec<bool>>,
    layout: Vec<Position>,
}

impl Graph {
    /// Build from a full adjacency matrix.
    pub fn from_matrix(adjacency: Vec<Vec<bool>>) -> GraphResult<Self> {
        let n = adjacency.len();
        if n == 0 {
            return Err(GraphError::Empty);
        }

        for (row, cells) in adjacency.iter().enumerate() {
            if cells.len() != n {
                return Err(GraphError::NotSquare {
                    row,
                    len: cells.len(),
                    expected: n,
                });
            }
        }

        for row in 0..n {
            if adjacency[row][row] {
                return Err(GraphError::SelfLoop { node: row });
            }
            for col in (row + 1)..n {
                if adjacency[row][col] != adjacency[col][row] {
                    return Err(GraphError::Asymmetric { row, col });
                }
            }
        }

        Ok(Self {
            layout: circle_layout(n),
            adjacency,
        })
    }

    /// Build from an undirected edge list over `node_count` nodes.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize)]) -> GraphResult<Self> {
        let mut adjacency = vec![vec![false; node_count]; node_count];
        for &(from, to) in edges {
            if from >= node_count || to >= node_count {
                return Err(GraphError::EdgeOutOfRange {
                    from,
                    to,
                    node_count,
                });
            }
            adjacency[from][to] = true;
            adjacency[to][from] = true;
        }
        Self::from_matrix(adjacency)
    }

    /// Replace the default circular layout.
    pub fn with_layout(mut self, layout: Vec<Position>) -> GraphResult<Self> {
        if layout.len() != self.node_count() {
            return Err(GraphError::LayoutMismatch {
                got: layout.len(),
                expected: self.node_count(),
            });
        }
        self.layout = layout;
        Ok(self)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges().len()
    }

    /// Check whether `node` is a valid index.
    pub fn contains(&self, node: usize) -> bool {
        node < self.node_count()
    }

    /// Check whether `a` and `b` share an edge. Out-of-range indices are never adjacent.
    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        self.adjacency
            .get(a)
            .and_then(|row| row.get(b))
            .copied()
            .unwrap_or(false)
    }

    /// Adjacency row for `node`.
    pub fn row(&self, node: usize) -> Option<&[bool]> {
        self.adjacency.get(node).map(Vec::as_slice)
    }

    /// Neighbors of `node` in increasing index order.
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.row(node)
            .unwrap_or(&[])
            .iter()
            .enumerate()
            .filter_map(|(idx, &adjacent)| adjacent.then_some(idx))
    }

    /// First neighbor of `node` whose index is `>= from`.
    ///
    /// This is the resumable form of [`Graph::neighbors`] used by walkers that
    /// keep a per-node cursor instead of a borrowed iterator.
    pub fn next_neighbor(&self, node: usize, from: usize) -> Option<usize> {
        let row = self.row(node)?;
        (from..row.len()).find(|&idx| row[idx])
    }

    pub fn degree(&self, node: usize) -> usize {
        self.neighbors(node).count()
    }

    /// Every edge once, as `(low, high)` pairs in row-major order.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let n = self.node_count();
        let mut edges = Vec::new();
        for row in 0..n {
            for col in (row + 1)..n {
                if self.adjacency[row][col] {
                    edges.push((row, col));
                }
            }
        }
        edges
    }

    pub fn layout(&self) -> &[Position] {
        &self.layout
    }

    /// Export as a petgraph undirected graph. Node weights are the node indices.
    pub fn to_petgraph(&self) -> UnGraph<usize, ()> {
        let mut graph = UnGraph::with_capacity(self.node_count(), self.edge_count());
        for node in 0..self.node_count() {
            graph.add_node(node);
        }
        for (a, b) in self.edges() {
            graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
        }
        graph
    }

    /// Nodes reachable from `start` (including `start`), as a mask.
    ///
    /// Returns an all-false mask when `start` is out of range.
    pub fn reachable_from(&self, start: usize) -> Vec<bool> {
        let mut reachable = vec![false; self.node_count()];
        if !self.contains(start) {
            return reachable;
        }
        let graph = self.to_petgraph();
        let mut bfs = Bfs::new(&graph, NodeIndex::new(start));
        while let Some(idx) = bfs.next(&graph) {
            reachable[graph[idx]] = true;
        }
        reachable
    }

    /// Hop distance from `start` to every node; `None` for unreachable nodes.
    pub fn distances_from(&self, start: usize) -> Vec<Option<usize>> {
        let mut distances = vec![None; self.node_count()];
        if !self.contains(start) {
            return distances;
        }
        let graph = self.to_petgraph();
        for (idx, cost) in dijkstra(&graph, NodeIndex::new(start), None, |_| 1usize) {
            distances[graph[idx]] = Some(cost);
        }
        distances
    }
}

fn circle_layout(n: usize) -> Vec<Position> {
    (0..n)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / n as f32;
            Position::new(300.0 + 220.0 * angle.cos(), 250.0 + 180.0 * angle.sin())
        })
        .collect()
}

/// Built-in graphs the tool ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Five nodes: `0-1, 0-2, 1-3, 1-4, 3-4`.
    #[default]
    Small,
    /// Eleven nodes arranged as a binary tree rooted at 0.
    Tree,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Small, Preset::Tree];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Small => "small",
            Preset::Tree => "tree",
        }
    }

    /// Build the preset graph.
    pub fn graph(&self) -> Graph {
        let (n, edges, layout): (usize, &[(usize, usize)], &[Position]) = match self {
            Preset::Small => (5, &SMALL_EDGES[..], &SMALL_LAYOUT[..]),
            Preset::Tree => (11, &TREE_EDGES[..], &TREE_LAYOUT[..]),
        };
        // Tables are fixed and covered by `test_presets_are_valid`.
        let mut adjacency = vec![vec![false; n]; n];
        for &(a, b) in edges {
            adjacency[a][b] = true;
            adjacency[b][a] = true;
        }
        Graph {
            adjacency,
            layout: layout.to_vec(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" | "five" | "5" => Ok(Preset::Small),
            "tree" | "eleven" | "11" => Ok(Preset::Tree),
            other => Err(GraphError::UnknownPreset(other.to_string())),
        }
    }
}

const SMALL_EDGES: [(usize, usize); 5] = [(0, 1), (0, 2), (1, 3), (1, 4), (3, 4)];

const SMALL_LAYOUT: [Position; 5] = [
    Position::new(100.0, 100.0),
    Position::new(300.0, 100.0),
    Position::new(500.0, 100.0),
    Position::new(200.0, 300.0),
    Position::new(400.0, 300.0),
];

const TREE_EDGES: [(usize, usize); 10] = [
    (0, 1),
    (0, 2),
    (1, 3),
    (1, 4),
    (2, 5),
    (2, 6),
    (3, 7),
    (4, 8),
    (5, 9),
    (6, 10),
];

const TREE_LAYOUT: [Position; 11] = [
    Position::new(400.0, 60.0),
    Position::new(220.0, 170.0),
    Position::new(580.0, 170.0),
    Position::new(130.0, 280.0),
    Position::new(310.0, 280.0),
    Position::new(490.0, 280.0),
    Position::new(670.0, 280.0),
    Position::new(130.0, 390.0),
    Position::new(310.0, 390.0),
    Position::new(490.0, 390.0),
    Position::new(670.0, 390.0),
];
