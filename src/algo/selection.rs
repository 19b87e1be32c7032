//! Selection growth and traversal over a built graph.
//!
//! All functions here are read-only. Output order is deterministic: input
//! members first, then newly discovered nodes in the order the adjacency
//! lists are walked.
//!
//! # Example
//!
//! ```
//! use meshgraph::prelude::*;
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let graph = build(&positions, &[0, 1, 2]).unwrap();
//!
//! let ring = grow_selection(&graph, &[VertexId::new(0)]);
//! assert_eq!(ring.len(), 3);
//! assert_eq!(grow_selection(&graph, &ring).len(), 3);
//! ```

use std::collections::{HashSet, VecDeque};

use crate::graph::{MeshGraph, NodeRef, VertexId};

/// Grow a vertex selection by one ring.
///
/// Returns the input vertices followed by every vertex that shares an edge
/// with one of them. No vertex appears twice, even if the input repeats one.
pub fn grow_selection(graph: &MeshGraph, selection: &[VertexId]) -> Vec<VertexId> {
    grow_selection_by(graph, selection, 1)
}

/// Grow a vertex selection by `rings` rings.
///
/// Equivalent to calling [`grow_selection`] `rings` times, but only the
/// vertices discovered in the previous ring are expanded each round.
/// `rings == 0` returns the deduplicated input.
pub fn grow_selection_by(graph: &MeshGraph, selection: &[VertexId], rings: usize) -> Vec<VertexId> {
    let mut seen: HashSet<VertexId> = HashSet::with_capacity(selection.len() * 4);
    let mut result: Vec<VertexId> = Vec::with_capacity(selection.len() * 4);

    for &v in selection {
        if seen.insert(v) {
            result.push(v);
        }
    }

    let mut frontier_start = 0;
    for _ in 0..rings {
        let frontier_end = result.len();
        if frontier_start == frontier_end {
            break;
        }

        for i in frontier_start..frontier_end {
            let v = result[i];
            for &e in graph.vertex(v).edges() {
                if let Some(other) = graph.edge(e).other_vertex(v) {
                    if seen.insert(other) {
                        result.push(other);
                    }
                }
            }
        }

        frontier_start = frontier_end;
    }

    result
}

/// Every node reachable from `start` through [`MeshGraph::neighbors`],
/// in breadth-first order. `start` comes first.
///
/// On a connected mesh this is the whole graph; on a mesh with several
/// shells it is the shell containing `start`.
pub fn connected_nodes(graph: &MeshGraph, start: NodeRef) -> Vec<NodeRef> {
    let mut seen: HashSet<NodeRef> = HashSet::new();
    let mut order = Vec::new();
    let mut queue = VecDeque::new();

    seen.insert(start);
    queue.push_back(start);

    while let Some(node) = queue.pop_front() {
        order.push(node);
        for next in graph.neighbors(node) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }

    log::trace!("connected_nodes from {:?}: {} nodes", start, order.len());
    order
}
