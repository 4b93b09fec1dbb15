//! Traversal algorithms and the pseudocode listings their steps point into.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which traversal to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Depth-first search.
    Dfs,
    /// Breadth-first search.
    Bfs,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Dfs, Algorithm::Bfs];

    /// Short uppercase tag ("DFS" / "BFS").
    pub fn tag(&self) -> &'static str {
        match self {
            Algorithm::Dfs => "DFS",
            Algorithm::Bfs => "BFS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::Dfs => "Depth-first search",
            Algorithm::Bfs => "Breadth-first search",
        }
    }

    /// The listing highlighted while this algorithm runs.
    pub fn pseudocode(&self) -> &'static [&'static str] {
        match self {
            Algorithm::Dfs => &DFS_PSEUDOCODE,
            Algorithm::Bfs => &BFS_PSEUDOCODE,
        }
    }

    /// Text of one listing line, if `line` is in range.
    pub fn line(&self, line: usize) -> Option<&'static str> {
        self.pseudocode().get(line).copied()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error for unrecognized algorithm names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown algorithm: {0} (expected dfs or bfs)")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dfs" | "depth" | "depth-first" => Ok(Algorithm::Dfs),
            "bfs" | "breadth" | "breadth-first" => Ok(Algorithm::Bfs),
            other => Err(UnknownAlgorithm(other.to_string())),
        }
    }
}

pub const DFS_PSEUDOCODE: [&str; 6] = [
    "DFS(node):",
    "    mark node as visited",
    "    process current node",
    "    for each neighbor of node:",
    "        if neighbor is not visited:",
    "            DFS(neighbor)",
];

pub const BFS_PSEUDOCODE: [&str; 11] = [
    "BFS(startNode):",
    "    create empty queue",
    "    add startNode to queue",
    "    mark startNode as visited",
    "    while queue is not empty:",
    "        currentNode = queue.poll()",
    "        process currentNode",
    "        for each neighbor of currentNode:",
    "            if neighbor is not visited:",
    "                mark neighbor as visited",
    "                add neighbor to queue",
];

/// Line indices into [`DFS_PSEUDOCODE`].
pub mod dfs_line {
    pub const ENTER: usize = 0;
    pub const MARK: usize = 1;
    pub const PROCESS: usize = 2;
    pub const FOR_EACH: usize = 3;
    pub const CHECK: usize = 4;
    pub const RECURSE: usize = 5;
}

/// Line indices into [`BFS_PSEUDOCODE`].
pub mod bfs_line {
    pub const ENTER: usize = 0;
    pub const CREATE_QUEUE: usize = 1;
    pub const ENQUEUE_START: usize = 2;
    pub const MARK_START: usize = 3;
    pub const WHILE: usize = 4;
    pub const POLL: usize = 5;
    pub const PROCESS: usize = 6;
    pub const FOR_EACH: usize = 7;
    pub const CHECK: usize = 8;
    pub const MARK: usize = 9;
    pub const ENQUEUE: usize = 10;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_constants_match_listings() {
        assert!(DFS_PSEUDOCODE[dfs_line::MARK].contains("mark node"));
        assert!(DFS_PSEUDOCODE[dfs_line::RECURSE].contains("DFS(neighbor)"));
        assert!(BFS_PSEUDOCODE[bfs_line::POLL].contains("queue.poll()"));
        assert!(BFS_PSEUDOCODE[bfs_line::ENQUEUE].contains("add neighbor"));
        assert_eq!(Algorithm::Bfs.line(bfs_line::WHILE), Some("    while queue is not empty:"));
        assert_eq!(Algorithm::Dfs.line(6), None);
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("DFS".parse::<Algorithm>(), Ok(Algorithm::Dfs));
        assert_eq!("breadth-first".parse::<Algorithm>(), Ok(Algorithm::Bfs));
        assert_eq!(
            "astar".parse::<Algorithm>(),
            Err(UnknownAlgorithm("astar".into()))
        );
    }
}
