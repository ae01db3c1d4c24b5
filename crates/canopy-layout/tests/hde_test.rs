use canopy_graph::{Graph, NodeId};
use canopy_layout::{Error, HdeParams, hde};

type G = Graph<(), ()>;

fn path(n: usize) -> G {
    let mut g = G::new();
    for id in 0..n {
        g.create_node_with(NodeId(id)).unwrap();
    }
    for id in 1..n {
        g.create_edge(NodeId(id - 1), NodeId(id));
    }
    g
}

#[test]
fn hde_pivot_columns_start_at_slot_zero_and_spread() {
    let g = path(5);
    let params = HdeParams {
        pivots: 2,
        dimensions: 2,
    };
    let cols = hde::pivot_distance_columns(&g, &params).unwrap();
    assert_eq!(cols.len(), 2);
    // First pivot is slot 0; its own distance entry is 0 and all distances are non-negative.
    assert_eq!(cols[0], vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    assert!(cols.iter().flatten().all(|&d| d >= 0.0));
    // The second pivot maximizes the distance to the first: the far end of the path.
    assert_eq!(cols[1], vec![4.0, 3.0, 2.0, 1.0, 0.0]);
}

#[test]
fn hde_embedding_has_exactly_c_columns() {
    let g = path(6);
    for c in 1..=3 {
        let coords = hde::embed(
            &g,
            &HdeParams {
                pivots: 3,
                dimensions: c,
            },
        )
        .unwrap();
        assert_eq!(coords.len(), 6);
        assert!(coords.iter().all(|row| row.len() == c));
    }
}

#[test]
fn hde_path_graph_projects_monotonically_on_the_main_axis() {
    let g = path(5);
    let coords = hde::embed(
        &g,
        &HdeParams {
            pivots: 2,
            dimensions: 2,
        },
    )
    .unwrap();

    // With the two end pivots the centered distance columns are exact mirrors, so the dominant
    // axis is the path parameter itself and the second axis carries no variance.
    let xs: Vec<f64> = coords.iter().map(|row| row[0]).collect();
    let increasing = xs.windows(2).all(|w| w[1] > w[0]);
    let decreasing = xs.windows(2).all(|w| w[1] < w[0]);
    assert!(increasing || decreasing, "main axis must order the path: {xs:?}");
    for row in &coords {
        assert!(row[1].abs() < 1e-6);
    }
}

#[test]
fn hde_run_writes_positions() {
    let mut g = path(8);
    hde::run(
        &mut g,
        &HdeParams {
            pivots: 4,
            dimensions: 3,
        },
    )
    .unwrap();
    let spread = g
        .nodes()
        .map(|v| g.position(v).unwrap().x.abs())
        .fold(0.0, f64::max);
    assert!(spread > 0.0);
}

#[test]
fn hde_rejects_disconnected_graphs() {
    let mut g = path(4);
    g.create_node_with(NodeId(99)).unwrap();
    let result = hde::embed(
        &g,
        &HdeParams {
            pivots: 2,
            dimensions: 2,
        },
    );
    assert_eq!(result.unwrap_err(), Error::Disconnected);
}

#[test]
fn hde_rejects_graphs_smaller_than_the_pivot_count() {
    let g = path(3);
    let result = hde::embed(
        &g,
        &HdeParams {
            pivots: 50,
            dimensions: 3,
        },
    );
    assert_eq!(result.unwrap_err(), Error::TooFewNodes { have: 3, need: 50 });
}
