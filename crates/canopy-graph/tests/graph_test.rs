use canopy_graph::{EdgeId, Error, Graph, NodeId, Position, SharedGraph};

type G = Graph<f64, ()>;

fn diamond() -> G {
    // 1 -> 2, 1 -> 3, 2 -> 4, 3 -> 4
    let mut g = G::new();
    for id in 1..=4 {
        g.create_node_with(NodeId(id)).unwrap();
    }
    g.create_edge(NodeId(1), NodeId(2));
    g.create_edge(NodeId(1), NodeId(3));
    g.create_edge(NodeId(2), NodeId(4));
    g.create_edge(NodeId(3), NodeId(4));
    g
}

fn sorted(mut v: Vec<NodeId>) -> Vec<NodeId> {
    v.sort();
    v
}

#[test]
fn graph_create_edge_auto_creates_missing_endpoints() {
    let mut g = G::new();
    let e = g.create_edge(NodeId(10), NodeId(20));
    assert!(g.contains_node(NodeId(10)));
    assert!(g.contains_node(NodeId(20)));
    assert_eq!(g.source(e).unwrap(), NodeId(10));
    assert_eq!(g.target(e).unwrap(), NodeId(20));
    assert_eq!(g.node_count(), 2);
}

#[test]
fn graph_slots_stay_contiguous_after_arbitrary_deletes() {
    let mut g = G::new();
    let ids: Vec<NodeId> = (0..32).map(|_| g.create_node()).collect();
    for &id in &[ids[3], ids[0], ids[31], ids[17], ids[9]] {
        g.delete_node(id).unwrap();
    }
    let n = g.node_count();
    assert_eq!(n, 27);
    let mut seen = vec![false; n];
    for node in g.nodes().collect::<Vec<_>>() {
        let slot = g.node_slot(node).unwrap();
        assert!(slot < n, "slot {slot} out of range");
        assert!(!seen[slot], "slot {slot} duplicated");
        seen[slot] = true;
        assert_eq!(g.node_at(slot), node);
    }
    assert!(seen.into_iter().all(|s| s));
}

#[test]
fn graph_adjacency_array_keeps_incoming_prefix_outgoing_suffix() {
    let mut g = G::new();
    let hub = g.create_node();
    let mut spokes = Vec::new();
    // Interleave incoming and outgoing insertion to exercise the partition boundary.
    for i in 0..6 {
        let other = g.create_node();
        if i % 2 == 0 {
            spokes.push(g.create_edge(other, hub));
        } else {
            spokes.push(g.create_edge(hub, other));
        }
    }
    let num_in = g.in_degree(hub).unwrap();
    assert_eq!(num_in, 3);
    let all = g.edges_of(hub).unwrap().to_vec();
    for (i, e) in all.iter().enumerate() {
        if i < num_in {
            assert_eq!(g.target(*e).unwrap(), hub, "prefix entry must be incoming");
        } else {
            assert_eq!(g.source(*e).unwrap(), hub, "suffix entry must be outgoing");
        }
    }

    // Deleting an incoming edge must preserve the partition.
    g.delete_edge(spokes[0]).unwrap();
    let num_in = g.in_degree(hub).unwrap();
    assert_eq!(num_in, 2);
    let all = g.edges_of(hub).unwrap().to_vec();
    for (i, e) in all.iter().enumerate() {
        if i < num_in {
            assert_eq!(g.target(*e).unwrap(), hub);
        } else {
            assert_eq!(g.source(*e).unwrap(), hub);
        }
    }
}

#[test]
fn graph_self_loop_counts_once_per_direction() {
    let mut g = G::new();
    let v = g.create_node();
    let e = g.create_edge(v, v);
    assert_eq!(g.in_degree(v).unwrap(), 1);
    assert_eq!(g.out_degree(v).unwrap(), 1);
    assert_eq!(g.neighbors(v).unwrap(), vec![v]);
    g.delete_edge(e).unwrap();
    assert_eq!(g.degree(v).unwrap(), 0);
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn graph_delete_node_cascades_to_incident_edges() {
    let mut g = diamond();
    g.delete_node(NodeId(2)).unwrap();
    assert_eq!(
        sorted(g.nodes().collect()),
        vec![NodeId(1), NodeId(3), NodeId(4)]
    );
    assert_eq!(g.edge_count(), 2);
    assert!(g.find_edge(NodeId(1), NodeId(3)).is_some());
    assert!(g.find_edge(NodeId(3), NodeId(4)).is_some());
    assert_eq!(g.find_edge(NodeId(1), NodeId(2)), None);
    assert_eq!(g.find_edge(NodeId(2), NodeId(4)), None);
}

#[test]
fn graph_deleted_subset_reports_contains_correctly() {
    let mut g = G::new();
    let ids: Vec<NodeId> = (0..20).map(|_| g.create_node()).collect();
    let doomed: Vec<NodeId> = ids.iter().copied().filter(|id| id.0 % 3 == 0).collect();
    for &id in &doomed {
        g.delete_node(id).unwrap();
    }
    for &id in &ids {
        assert_eq!(g.contains_node(id), id.0 % 3 != 0);
    }
    assert_eq!(g.node_count(), ids.len() - doomed.len());
}

#[test]
fn graph_diamond_scenario_sources_sinks_and_acyclicity() {
    let mut g = diamond();
    assert!(g.is_acyclic());
    assert_eq!(g.sources(), vec![NodeId(1)]);
    assert_eq!(g.sinks(), vec![NodeId(4)]);
    assert_eq!(
        sorted(g.neighbors(NodeId(1)).unwrap()),
        vec![NodeId(2), NodeId(3)]
    );
    assert_eq!(
        g.children(NodeId(1)).unwrap().collect::<Vec<_>>(),
        vec![NodeId(2), NodeId(3)]
    );
    assert_eq!(
        g.parents(NodeId(4)).unwrap().collect::<Vec<_>>(),
        vec![NodeId(2), NodeId(3)]
    );

    // One back edge flips acyclicity.
    let back = g.create_edge(NodeId(4), NodeId(1));
    assert!(!g.is_acyclic());
    g.delete_edge(back).unwrap();
    assert!(g.is_acyclic());
}

#[test]
fn graph_positions_default_to_origin_and_follow_compaction() {
    let mut g = G::new();
    let a = g.create_node();
    let b = g.create_node();
    let c = g.create_node();
    assert_eq!(g.position(c).unwrap(), Position::ZERO);
    g.set_position(c, Position::new(1.0, 2.0, 3.0)).unwrap();
    g.set_position(b, Position::new(-1.0, 0.0, 0.0)).unwrap();

    // Deleting `a` (slot 0) moves `c` into slot 0; its position must follow.
    g.delete_node(a).unwrap();
    assert_eq!(g.position(c).unwrap(), Position::new(1.0, 2.0, 3.0));
    assert_eq!(g.position(b).unwrap(), Position::new(-1.0, 0.0, 0.0));
}

#[test]
fn graph_attributes_follow_compaction() {
    let mut g = G::new();
    let nodes: Vec<NodeId> = (0..5).map(|_| g.create_node()).collect();
    for (i, &n) in nodes.iter().enumerate() {
        *g.node_attr_mut(n).unwrap() = i as f64;
    }
    g.delete_node(nodes[1]).unwrap();
    g.delete_node(nodes[2]).unwrap();
    for &n in &[nodes[0], nodes[3], nodes[4]] {
        assert_eq!(*g.node_attr(n).unwrap(), n.0 as f64);
    }
}

#[test]
fn graph_bend_paths_are_ordered_and_freed_with_the_edge() {
    let mut g = G::new();
    let e = g.create_edge(NodeId(0), NodeId(1));
    let b0 = g.create_bend();
    let b1 = g.create_bend();
    let b2 = g.create_bend();
    g.set_bend_position(b0, Position::new(0.5, 0.0, 0.0)).unwrap();
    g.insert_bend(e, 0, b0).unwrap();
    g.insert_bend(e, 1, b2).unwrap();
    // Inserting in the middle shifts the tail right.
    g.insert_bend(e, 1, b1).unwrap();
    assert_eq!(g.bends(e).unwrap(), &[b0, b1, b2]);
    assert_eq!(g.bend_position(b0).unwrap(), Position::new(0.5, 0.0, 0.0));

    g.delete_edge(e).unwrap();
    assert_eq!(g.bend_position(b0), Err(Error::NoSuchBend(b0)));
}

#[test]
fn graph_deep_copy_is_independent_shared_copy_aliases() {
    let g = diamond();

    let mut deep = g.deep_copy();
    deep.delete_node(NodeId(1)).unwrap();
    assert_eq!(g.node_count(), 4, "deep copy mutation must not leak back");

    let shared = SharedGraph::new(g);
    let alias = shared.share();
    alias.borrow_mut().delete_node(NodeId(1)).unwrap();
    assert_eq!(shared.borrow().node_count(), 3);
    assert_eq!(shared.borrow().edge_count(), 2);
}

#[test]
fn graph_missing_ids_are_typed_errors() {
    let mut g = G::new();
    let ghost = NodeId(99);
    assert_eq!(g.position(ghost), Err(Error::NoSuchNode(ghost)));
    assert_eq!(g.delete_node(ghost), Err(Error::NoSuchNode(ghost)));
    assert_eq!(
        g.delete_edge(EdgeId(7)),
        Err(Error::NoSuchEdge(EdgeId(7)))
    );
    g.create_node_with(NodeId(5)).unwrap();
    assert_eq!(g.create_node_with(NodeId(5)), Err(Error::DuplicateId(5)));
}

#[test]
fn graph_clear_resets_id_allocation() {
    let mut g = G::new();
    for _ in 0..8 {
        g.create_node();
    }
    g.clear();
    assert_eq!(g.node_count(), 0);
    assert_eq!(g.create_node(), NodeId(0));
}

#[test]
fn graph_reserve_edges_avoids_incremental_growth() {
    let mut g = G::new();
    let hub = g.create_node();
    g.reserve_edges(hub, 64).unwrap();
    for _ in 0..64 {
        let other = g.create_node();
        g.create_edge(hub, other);
    }
    assert_eq!(g.out_degree(hub).unwrap(), 64);
}
