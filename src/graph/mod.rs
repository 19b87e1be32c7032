//! The mesh topology graph.
//!
//! This module provides [`MeshGraph`], a graph whose nodes are the vertices,
//! edges and triangles of a triangle mesh, connected whenever the mesh
//! elements are adjacent.
//!
//! # Handles and identities
//!
//! Nodes are addressed by type-safe handles:
//! - [`VertexId`] - Identifies a vertex
//! - [`EdgeId`] - Identifies an edge
//! - [`TriangleId`] - Identifies a triangle
//!
//! [`NodeRef`] wraps any of the three. Each node also carries a [`NodeId`],
//! the non-zero identity used by the flattened record format.
//!
//! # Construction
//!
//! ```
//! use meshgraph::graph::{build, NodeRef};
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let graph = build(&positions, &[0, 1, 2]).unwrap();
//!
//! let (t, _) = graph.triangles().next().unwrap();
//! assert_eq!(graph.neighbors(NodeRef::Triangle(t)).len(), 6);
//! ```

mod builder;
mod ids;
mod mesh_graph;
mod node;

pub(crate) use builder::same_position;
pub use builder::{
    build, build_from_triangles, build_with_options, make_edge_key, BuildOptions, DedupStrategy,
};
pub use ids::{EdgeId, IdAllocator, NodeId, TriangleId, VertexId};
pub use mesh_graph::MeshGraph;
pub use node::{Edge, NodeRef, Triangle, Vertex};
