//! graph-walk CLI - watch depth-first and breadth-first search step through a small graph.
//!
//! Run `gw` or `gw run` to animate the default traversal.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use graph_walk_core::{Algorithm, Preset};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

mod commands;
mod config;
mod render;

use commands::{config as config_cmd, Selection};
use config::{clamp_delay_ms, Config};

/// graph-walk CLI - animate graph traversals with pseudocode highlighting.
#[derive(Parser, Debug)]
#[command(
    name = "gw",
    author,
    version,
    about = "graph-walk: animate DFS and BFS over a small graph",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Which traversal to run. Anything omitted comes from the config.
#[derive(Args, Debug, Clone, Default)]
struct TraversalArgs {
    /// Algorithm: dfs or bfs.
    #[arg(short, long)]
    algorithm: Option<String>,

    /// Graph preset: small or tree.
    #[arg(short, long)]
    graph: Option<String>,

    /// Start node.
    #[arg(short, long)]
    start: Option<usize>,
}

impl TraversalArgs {
    fn resolve(&self, config: &Config) -> Result<Selection> {
        Selection::resolve(
            config,
            self.algorithm.as_deref(),
            self.graph.as_deref(),
            self.start,
        )
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Animate a traversal step by step (default command).
    Run {
        #[command(flatten)]
        traversal: TraversalArgs,

        /// Pause between steps in milliseconds (100-1000, 0 disables pacing).
        #[arg(short, long)]
        delay_ms: Option<u64>,

        /// Print the full pseudocode listing on every step.
        #[arg(long)]
        code: bool,
    },

    /// Print the visit order without animation.
    Order {
        #[command(flatten)]
        traversal: TraversalArgs,

        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Include every step, not just the order.
        #[arg(long)]
        steps: bool,
    },

    /// Show the pseudocode listings.
    Pseudocode {
        /// Only this algorithm (dfs or bfs).
        #[arg(short, long)]
        algorithm: Option<String>,
    },

    /// Show a graph preset.
    Graph {
        /// Graph preset: small or tree.
        #[arg(short, long)]
        graph: Option<String>,
    },

    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Get a configuration value.
    Get {
        /// Configuration key.
        key: String,
    },

    /// Reset configuration to defaults.
    Reset,

    /// Show path to config file.
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    // Stdout carries the animation and JSON output.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = Config::load()?;

    // Default to run if no command given
    let command = cli.command.unwrap_or(Commands::Run {
        traversal: TraversalArgs::default(),
        delay_ms: None,
        code: false,
    });

    match command {
        Commands::Run {
            traversal,
            delay_ms,
            code,
        } => {
            let selection = traversal.resolve(&config)?;
            let delay = match delay_ms {
                Some(ms) => std::time::Duration::from_millis(clamp_delay_ms(ms)),
                None => config.delay(),
            };
            commands::run::execute(selection, delay, code || config.show_pseudocode).await?;
        }

        Commands::Order {
            traversal,
            json,
            steps,
        } => {
            let selection = traversal.resolve(&config)?;
            commands::order::execute(selection, json, steps)?;
        }

        Commands::Pseudocode { algorithm } => {
            let algorithm = algorithm.map(|a| a.parse::<Algorithm>()).transpose()?;
            commands::pseudocode::execute(algorithm)?;
        }

        Commands::Graph { graph } => {
            let preset = match graph {
                Some(name) => name.parse::<Preset>()?,
                None => config.graph,
            };
            commands::graph::execute(preset)?;
        }

        Commands::Config(config_cmd_inner) => {
            let mut config = config;
            match config_cmd_inner {
                ConfigCommands::Show => {
                    config_cmd::show(&config)?;
                }
                ConfigCommands::Set { key, value } => {
                    config_cmd::set(&mut config, &key, &value)?;
                }
                ConfigCommands::Get { key } => {
                    config_cmd::get(&config, &key)?;
                }
                ConfigCommands::Reset => {
                    config_cmd::reset()?;
                }
                ConfigCommands::Path => {
                    if let Some(path) = Config::config_file_path() {
                        println!("{}", path.display());
                    } else {
                        println!("(no config file path available)");
                    }
                }
            }
        }
    }

    Ok(())
}
