use canopy_graph::{EdgeId, Graph, NodeId};
use canopy_layout::reingold_tilford::ReingoldTilford;
use canopy_layout::{SpanParams, metrics, span};

type G = Graph<(), ()>;

#[test]
fn span_levels_become_z_coordinates() {
    // Diamond: 1 -> 2, 1 -> 3, 2 -> 4, 3 -> 4.
    let mut g = G::new();
    for id in 1..=4 {
        g.create_node_with(NodeId(id)).unwrap();
    }
    g.create_edge(NodeId(1), NodeId(2));
    g.create_edge(NodeId(1), NodeId(3));
    g.create_edge(NodeId(2), NodeId(4));
    g.create_edge(NodeId(3), NodeId(4));

    span::run(&mut g, &SpanParams::default()).unwrap();
    assert_eq!(g.position(NodeId(1)).unwrap().z, 0.0);
    assert_eq!(g.position(NodeId(2)).unwrap().z, 5.0);
    assert_eq!(g.position(NodeId(3)).unwrap().z, 5.0);
    assert_eq!(g.position(NodeId(4)).unwrap().z, 10.0);
    // The scratch tree never leaks into the input graph.
    assert_eq!(g.node_count(), 4);
    assert_eq!(g.edge_count(), 4);
}

#[test]
fn span_accepts_cyclic_input() {
    let mut g = G::new();
    for id in 1..=3 {
        g.create_node_with(NodeId(id)).unwrap();
    }
    g.create_edge(NodeId(1), NodeId(2));
    g.create_edge(NodeId(2), NodeId(3));
    g.create_edge(NodeId(3), NodeId(1));
    assert!(!g.is_acyclic());

    span::run(&mut g, &SpanParams::default()).unwrap();
    assert_eq!(g.position(NodeId(1)).unwrap().z, 0.0);
    assert_eq!(g.position(NodeId(2)).unwrap().z, 5.0);
    assert_eq!(g.position(NodeId(3)).unwrap().z, 10.0);
}

#[test]
fn span_materializes_bend_points_on_long_edges() {
    // The deep chain 1 -> 3 -> 4 -> 5 -> 6 pins node 6 at level 4; the backward correction
    // then pulls node 2 down next to 6, stretching the tree edge 1 -> 2 across three levels.
    let mut g = G::new();
    for id in 1..=6 {
        g.create_node_with(NodeId(id)).unwrap();
    }
    let long = g.create_edge(NodeId(1), NodeId(2));
    g.create_edge(NodeId(2), NodeId(6));
    g.create_edge(NodeId(1), NodeId(3));
    g.create_edge(NodeId(3), NodeId(4));
    g.create_edge(NodeId(4), NodeId(5));
    g.create_edge(NodeId(5), NodeId(6));

    span::run(&mut g, &SpanParams::default()).unwrap();

    assert_eq!(g.position(NodeId(1)).unwrap().z, 0.0);
    assert_eq!(g.position(NodeId(3)).unwrap().z, 5.0);
    assert_eq!(g.position(NodeId(4)).unwrap().z, 10.0);
    assert_eq!(g.position(NodeId(5)).unwrap().z, 15.0);
    assert_eq!(g.position(NodeId(2)).unwrap().z, 15.0);
    assert_eq!(g.position(NodeId(6)).unwrap().z, 20.0);

    // The spliced edge carries one bend per crossed level, ordered source to target.
    let bends = g.bends(long).unwrap().to_vec();
    assert_eq!(bends.len(), 2);
    let z0 = g.bend_position(bends[0]).unwrap().z;
    let z1 = g.bend_position(bends[1]).unwrap().z;
    assert_eq!(z0, 5.0);
    assert_eq!(z1, 10.0);

    // No synthetic nodes survive in the caller's graph.
    assert_eq!(g.node_count(), 6);
}

#[test]
fn span_self_loops_are_ignored() {
    let mut g = G::new();
    g.create_edge(NodeId(1), NodeId(2));
    let loop_edge = g.create_edge(NodeId(1), NodeId(1));

    span::run(&mut g, &SpanParams::default()).unwrap();
    assert_eq!(g.position(NodeId(2)).unwrap().z, 5.0);
    // The loop edge survives untouched, without bends.
    assert!(g.contains_edge(loop_edge));
    assert!(g.bends(loop_edge).unwrap().is_empty());
}

#[test]
fn span_composes_with_a_custom_extractor_and_tree_layout() {
    let mut g = G::new();
    let kept = g.create_edge(NodeId(1), NodeId(2));
    let dropped = g.create_edge(NodeId(3), NodeId(1));

    // Force edge 3 -> 1 out of the DAG; its reversal adopts node 3 under node 1.
    let extractor = |_: &G| -> Vec<EdgeId> { vec![kept] };
    span::run_with(
        &mut g,
        extractor,
        &ReingoldTilford::default(),
        &SpanParams::default(),
    )
    .unwrap();

    assert_eq!(g.position(NodeId(1)).unwrap().z, 0.0);
    assert_eq!(g.position(NodeId(2)).unwrap().z, 5.0);
    assert_eq!(g.position(NodeId(3)).unwrap().z, 5.0);
    assert!(g.bends(dropped).unwrap().is_empty());
}

#[test]
fn span_default_extractor_matches_the_metric() {
    let mut g = G::new();
    g.create_edge(NodeId(1), NodeId(2));
    g.create_edge(NodeId(2), NodeId(3));
    g.create_edge(NodeId(3), NodeId(1));
    let dag = metrics::spanning_dag(&g);
    assert_eq!(dag.len(), 2, "the back edge closes the cycle and is dropped");
}
