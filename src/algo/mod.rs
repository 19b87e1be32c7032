//! Algorithms over a built graph.
//!
//! - **Selection**: one-ring and multi-ring vertex selection growth, connected traversal
//! - **Bounce**: elastic reflection off triangle, edge and vertex normals
//!
//! Everything here only reads the graph.

pub mod bounce;
pub mod selection;
