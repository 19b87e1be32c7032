//! # meshgraph
//!
//! A topology graph over indexed triangle meshes, for simulations that need to
//! move across a surface: walk from a triangle to its edges, from an edge to
//! the triangle on the other side, and bounce off whatever was hit.
//!
//! ## Features
//!
//! - **Node graph**: vertices, edges and triangles as first-class nodes with
//!   type-safe handles and serializable identities
//! - **Position deduplication**: coincident source vertices collapse into one node
//! - **Geometry queries**: normals, containment tests and edge-aligned frames
//! - **Flattening**: id-based records for JSON storage and exact round trips
//! - **Multiple file formats**: STL, PLY and flattened JSON graphs
//!
//! ## Quick Start
//!
//! ```no_run
//! use meshgraph::prelude::*;
//!
//! // Load a mesh and build its graph
//! let graph = meshgraph::io::load("model.stl").unwrap();
//!
//! println!("Vertices: {}", graph.num_vertices());
//! println!("Edges: {}", graph.num_edges());
//! println!("Triangles: {}", graph.num_triangles());
//!
//! for t in graph.triangle_ids() {
//!     println!("Triangle {:?}: normal={:?}", t, graph.triangle_normal(t));
//! }
//!
//! // Store it with stable ids
//! meshgraph::io::records::save(&graph, "model.graph.json").unwrap();
//! ```
//!
//! ## Building Graphs Programmatically
//!
//! ```
//! use meshgraph::prelude::*;
//! use nalgebra::Point3;
//!
//! // A unit square split along its diagonal. Vertex 3 repeats vertex 0.
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let indices = vec![0, 1, 2, 3, 2, 4];
//!
//! let graph = build(&positions, &indices).unwrap();
//! assert_eq!(graph.num_vertices(), 4);
//! assert_eq!(graph.num_edges(), 5);
//! assert_eq!(graph.num_triangles(), 2);
//! ```
//!
//! ## Graph Traversal
//!
//! ```
//! use meshgraph::prelude::*;
//! use nalgebra::Point3;
//!
//! # let positions = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.0, 1.0, 0.0),
//! # ];
//! # let graph = build(&positions, &[0, 1, 2]).unwrap();
//! let t = TriangleId::new(0);
//! for e in graph.triangle(t).edges() {
//!     // A boundary edge has no triangle on the other side
//!     let across = graph.edge_complement_triangle(e, t).unwrap();
//!     assert_eq!(across, None);
//! }
//!
//! // Every node lists its neighbors of the other two kinds
//! let around = graph.neighbors(NodeRef::Vertex(VertexId::new(0)));
//! assert_eq!(around.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod io;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use meshgraph::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::bounce::{bounce_off_edge, bounce_off_triangle, bounce_off_vertex};
    pub use crate::algo::selection::{connected_nodes, grow_selection, grow_selection_by};
    pub use crate::error::{GraphError, Result};
    pub use crate::graph::{
        build, build_from_triangles, build_with_options, BuildOptions, DedupStrategy, Edge,
        EdgeId, MeshGraph, NodeId, NodeRef, Triangle, TriangleId, Vertex, VertexId,
    };
    pub use crate::io::records::GraphRecords;
}

// Re-export nalgebra types for convenience
pub use nalgebra;
