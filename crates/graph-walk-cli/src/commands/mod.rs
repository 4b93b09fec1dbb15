//! CLI command implementations.

use anyhow::{Context, Result};
use graph_walk_core::{Algorithm, Preset};

use crate::config::Config;

pub mod config;
pub mod graph;
pub mod order;
pub mod pseudocode;
pub mod run;

/// Algorithm, graph and start node after merging flags over config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub algorithm: Algorithm,
    pub preset: Preset,
    pub start: usize,
}

impl Selection {
    /// Flags win; anything not given falls back to `config`.
    pub fn resolve(
        config: &Config,
        algorithm: Option<&str>,
        graph: Option<&str>,
        start: Option<usize>,
    ) -> Result<Self> {
        let algorithm = match algorithm {
            Some(name) => name.parse::<Algorithm>().context("Invalid --algorithm")?,
            None => config.algorithm,
        };
        let preset = match graph {
            Some(name) => name.parse::<Preset>().context("Invalid --graph")?,
            None => config.graph,
        };
        Ok(Self {
            algorithm,
            preset,
            start: start.unwrap_or(config.start),
        })
    }
}
