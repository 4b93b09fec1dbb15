//! Integration tests for graph-walk-engine runs.

use std::collections::HashSet;
use std::time::Duration;

use graph_walk_core::{visit_order, Algorithm, Graph, Preset, StepKind};
use graph_walk_engine::{
    trace, ChannelSink, EngineConfig, RecordingSink, SinkEvent, TraversalEngine, TraversalError,
};

// ============================================================================
// Graph fixtures
// ============================================================================

fn four_edge_small() -> Graph {
    Graph::from_edges(5, &[(0, 1), (0, 2), (1, 3), (1, 4)]).unwrap()
}

/// Two components: a triangle {0,1,2} and a path {3,4,5}, plus isolated 6.
fn split_graph() -> Graph {
    Graph::from_edges(7, &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5)]).unwrap()
}

fn fixtures() -> Vec<Graph> {
    vec![
        four_edge_small(),
        split_graph(),
        Preset::Small.graph(),
        Preset::Tree.graph(),
    ]
}

fn instant_engine(graph: Graph) -> TraversalEngine {
    TraversalEngine::with_config(graph, EngineConfig::instant())
}

// ============================================================================
// Traversal properties
// ============================================================================

#[test]
fn visited_set_equals_reachable_set() {
    for graph in fixtures() {
        for algorithm in Algorithm::ALL {
            for start in 0..graph.node_count() {
                let steps = trace(&graph, algorithm, start).unwrap();
                let visited: HashSet<usize> = visit_order(&steps).into_iter().collect();
                let reachable: HashSet<usize> = graph
                    .reachable_from(start)
                    .iter()
                    .enumerate()
                    .filter_map(|(idx, &r)| r.then_some(idx))
                    .collect();
                assert_eq!(visited, reachable, "{algorithm} from {start}");
                assert_eq!(
                    steps.last().unwrap().visited.visited_count(),
                    reachable.len()
                );
            }
        }
    }
}

#[test]
fn bfs_visits_in_nondecreasing_distance() {
    for graph in fixtures() {
        for start in 0..graph.node_count() {
            let distances = graph.distances_from(start);
            let order = visit_order(&trace(&graph, Algorithm::Bfs, start).unwrap());
            let hops: Vec<usize> = order.iter().map(|&n| distances[n].unwrap()).collect();
            assert!(
                hops.windows(2).all(|w| w[0] <= w[1]),
                "start {start}: {hops:?}"
            );
        }
    }
}

#[test]
fn no_node_is_visited_twice() {
    for graph in fixtures() {
        for algorithm in Algorithm::ALL {
            for start in 0..graph.node_count() {
                let order = visit_order(&trace(&graph, algorithm, start).unwrap());
                let unique: HashSet<usize> = order.iter().copied().collect();
                assert_eq!(unique.len(), order.len());
            }
        }
    }
}

#[test]
fn steps_point_into_listing() {
    for algorithm in Algorithm::ALL {
        for step in trace(&Preset::Tree.graph(), algorithm, 0).unwrap() {
            assert!(step.line < algorithm.pseudocode().len());
            assert_eq!(step.algorithm, algorithm);
            assert!(step.message.is_some());
        }
    }
}

#[test]
fn every_check_is_preceded_by_the_neighbor_loop_line() {
    for algorithm in Algorithm::ALL {
        let steps = trace(&Preset::Tree.graph(), algorithm, 0).unwrap();
        for pair in steps.windows(2) {
            if matches!(pair[1].kind, StepKind::NeighborSeen | StepKind::NeighborNew) {
                assert_eq!(pair[0].kind, StepKind::EdgeConsidered);
                assert_eq!(pair[0].edge, pair[1].edge);
            }
        }
    }
}

#[test]
fn concrete_orders() {
    let tree = Preset::Tree.graph();
    assert_eq!(
        visit_order(&trace(&four_edge_small(), Algorithm::Dfs, 0).unwrap()),
        vec![0, 1, 3, 4, 2]
    );
    assert_eq!(
        visit_order(&trace(&four_edge_small(), Algorithm::Bfs, 0).unwrap()),
        vec![0, 1, 2, 3, 4]
    );
    assert_eq!(
        visit_order(&trace(&tree, Algorithm::Dfs, 0).unwrap()),
        vec![0, 1, 3, 7, 4, 8, 2, 5, 9, 6, 10]
    );
    assert_eq!(
        visit_order(&trace(&tree, Algorithm::Bfs, 0).unwrap()),
        vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10]
    );
}

// ============================================================================
// Engine runs
// ============================================================================

#[tokio::test]
async fn unreachable_nodes_stay_unvisited() -> anyhow::Result<()> {
    let mut engine = instant_engine(split_graph());
    let summary = engine.run_dfs(3, RecordingSink::new())?.join().await?;

    assert_eq!(summary.visit_order, vec![3, 4, 5]);
    assert_eq!(summary.unvisited, vec![0, 1, 2, 6]);
    assert!(!summary.covered_all());

    let visited = engine.visited().unwrap();
    assert!(visited.is_visited(5));
    assert!(!visited.is_visited(0));
    Ok(())
}

#[tokio::test]
async fn fresh_run_starts_from_clear_state() -> anyhow::Result<()> {
    let mut engine = instant_engine(Preset::Tree.graph());
    engine.run_bfs(0, RecordingSink::new())?.join().await?;
    assert_eq!(engine.visited().unwrap().visited_count(), 11);

    let recorder = RecordingSink::new();
    let summary = engine.run_dfs(4, recorder.clone())?.join().await?;
    let steps = recorder.steps();

    assert!(steps[0].visited.is_clear());
    assert_eq!(steps[0].visited, TraversalEngine::new(Preset::Tree.graph()).visited().unwrap());
    assert_eq!(summary.run_id, 2);
    assert_eq!(summary.visit_order[0], 4);
    Ok(())
}

#[tokio::test]
async fn channel_sink_delivers_in_order() -> anyhow::Result<()> {
    let mut engine = instant_engine(Preset::Small.graph());
    let (sink, mut rx) = ChannelSink::new();
    let summary = engine.run_bfs(0, sink)?.join().await?;

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    assert!(matches!(
        events.first(),
        Some(SinkEvent::Started {
            algorithm: Algorithm::Bfs,
            node_count: 5
        })
    ));
    assert!(matches!(events.last(), Some(SinkEvent::Finished(s)) if *s == summary));

    let seqs: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            SinkEvent::Step(step) => Some(step.seq),
            _ => None,
        })
        .collect();
    assert_eq!(seqs, (0..summary.steps).collect::<Vec<_>>());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn restart_cancels_and_replaces_running_traversal() -> anyhow::Result<()> {
    let mut engine = TraversalEngine::with_config(Preset::Tree.graph(), EngineConfig::fast());
    let first_sink = RecordingSink::new();
    let first = engine.run_dfs(0, first_sink.clone())?;

    let second_sink = RecordingSink::new();
    let second = engine.restart(Algorithm::Bfs, 0, second_sink.clone()).await?;

    let first_summary = first.join().await?;
    assert!(first_summary.cancelled);
    assert!(first_summary.visit_order.len() < 11);

    let second_summary = second.join().await?;
    assert!(!second_summary.cancelled);
    assert_eq!(second_summary.visit_order, (0..=10).collect::<Vec<_>>());
    assert!(second_sink.steps()[0].visited.is_clear());

    // The cancelled run delivered nothing after its summary.
    assert!(matches!(
        first_sink.events().last(),
        Some(SinkEvent::Finished(_))
    ));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn paced_run_takes_one_delay_per_step() -> anyhow::Result<()> {
    let mut engine = TraversalEngine::with_config(Preset::Small.graph(), EngineConfig::with_delay_ms(200));
    let started = tokio::time::Instant::now();
    let summary = engine.run_dfs(0, RecordingSink::new())?.join().await?;
    let waited = started.elapsed();

    assert!(waited >= Duration::from_millis(200) * summary.steps as u32);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn skip_delay_is_swallowed() -> anyhow::Result<()> {
    let mut engine = TraversalEngine::with_config(Preset::Small.graph(), EngineConfig::default());
    let recorder = RecordingSink::new();
    let handle = engine.run_bfs(0, recorder.clone())?;
    handle.skip_delay();
    let summary = handle.join().await?;

    assert_eq!(summary.interrupted_delays, 1);
    assert!(!summary.cancelled);
    assert_eq!(summary.visit_order, vec![0, 1, 2, 3, 4]);
    assert_eq!(recorder.steps().len() as u64, summary.steps);
    Ok(())
}

#[tokio::test]
async fn restart_rejects_invalid_start_without_cancelling() -> anyhow::Result<()> {
    let mut engine = TraversalEngine::with_config(Preset::Small.graph(), EngineConfig::with_delay_ms(50));
    let running = engine.run_dfs(0, RecordingSink::new())?;

    let err = engine
        .restart(Algorithm::Bfs, 42, RecordingSink::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TraversalError::InvalidArgument { start: 42, .. }));

    running.skip_delay();
    let summary = running.join().await?;
    assert!(!summary.cancelled);
    Ok(())
}

#[tokio::test]
async fn dropping_engine_cancels_run() -> anyhow::Result<()> {
    let mut engine = TraversalEngine::with_config(Preset::Tree.graph(), EngineConfig::with_delay_ms(10_000));
    let handle = engine.run_bfs(0, RecordingSink::new())?;
    drop(engine);
    let summary = handle.join().await?;
    assert!(summary.cancelled);
    Ok(())
}
