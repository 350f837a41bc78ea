pub mod graph {
    pub mod csr_graph;
    pub mod dial;
    pub mod digraph;
    pub mod dijkstra;
    pub mod edge_list;
    pub mod forest;
    pub mod rectangular_grid_graph;
    pub mod shortest_path_forest;
    pub mod shortest_path_search;
}
pub mod math {
    pub mod numbers;
    pub mod traits;
}
pub mod network {
    pub mod capacity;
    pub mod network;
    pub mod primal_dual;
    pub mod residual_graph;
    pub mod successive_shortest_paths;
}
pub mod spline {
    pub mod cubic_b_spline;
}
pub mod unwrap {
    pub mod integrate_unwrapped_gradients;
    pub mod residue;
    pub mod unwrap_phase;
}
