//! Pseudocode listings.

use anyhow::Result;
use graph_walk_core::Algorithm;

use crate::render::format_listing;

/// Print the listing for `algorithm`, or both when `None`.
pub fn execute(algorithm: Option<Algorithm>) -> Result<()> {
    let algorithms = match algorithm {
        Some(algorithm) => vec![algorithm],
        None => Algorithm::ALL.to_vec(),
    };

    for (idx, algorithm) in algorithms.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        println!("📜 {} ({})", algorithm.label(), algorithm.tag());
        print!("{}", format_listing(*algorithm, None));
    }
    Ok(())
}
