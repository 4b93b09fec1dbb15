//! Config command implementation.
//!
//! Manages CLI configuration.

use anyhow::{bail, Result};
use graph_walk_core::Preset;

use crate::config::{clamp_delay_ms, Config};

/// Show current configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("graph-walk Configuration");
    println!("{:-<40}", "");

    println!(
        "Delay:           {} ms (effective {} ms)",
        config.delay_ms,
        clamp_delay_ms(config.delay_ms)
    );
    println!("Graph:           {}", config.graph);
    println!("Algorithm:       {}", config.algorithm);
    println!("Start node:      {}", config.start);
    println!("Show pseudocode: {}", config.show_pseudocode);

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }

    Ok(())
}

/// Set a configuration value and persist it.
pub fn set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "delay-ms" | "delay" => {
            config.delay_ms = value.parse()?;
            println!("Set delay-ms to: {}", config.delay_ms);
        }
        "graph" => {
            let graph: Preset = value.parse()?;
            let node_count = graph.graph().node_count();
            if config.start >= node_count {
                bail!(
                    "Start node {} is out of range for the {} graph ({} nodes); set start first",
                    config.start,
                    graph,
                    node_count
                );
            }
            config.graph = graph;
            println!("Set graph to: {}", config.graph);
        }
        "algorithm" | "algo" => {
            config.algorithm = value.parse()?;
            println!("Set algorithm to: {}", config.algorithm);
        }
        "start" => {
            let start: usize = value.parse()?;
            let node_count = config.graph.graph().node_count();
            if start >= node_count {
                bail!(
                    "Start node {} is out of range for the {} graph ({} nodes)",
                    start,
                    config.graph,
                    node_count
                );
            }
            config.start = start;
            println!("Set start to: {}", config.start);
        }
        "show-pseudocode" | "pseudocode" => {
            config.show_pseudocode = value.parse()?;
            println!("Set show-pseudocode to: {}", config.show_pseudocode);
        }
        _ => {
            bail!(
                "Unknown config key: {}. Valid keys: delay-ms, graph, algorithm, start, show-pseudocode",
                key
            );
        }
    }

    config.save()?;
    Ok(())
}

/// Get a configuration value.
pub fn get(config: &Config, key: &str) -> Result<()> {
    let value = match key {
        "delay-ms" | "delay" => config.delay_ms.to_string(),
        "graph" => config.graph.to_string(),
        "algorithm" | "algo" => config.algorithm.to_string().to_lowercase(),
        "start" => config.start.to_string(),
        "show-pseudocode" | "pseudocode" => config.show_pseudocode.to_string(),
        _ => bail!("Unknown config key: {}", key),
    };
    println!("{}", value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn reset() -> Result<()> {
    if let Some(config_path) = Config::config_file_path() {
        if config_path.exists() {
            std::fs::remove_file(&config_path)?;
            println!("✅ Configuration reset to defaults");
        } else {
            println!("Configuration already at defaults");
        }
    }
    Ok(())
}
