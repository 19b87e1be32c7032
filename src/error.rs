//! Error types for meshgraph.
//!
//! Construction failures (malformed input meshes) and query failures
//! (passing a node that is not adjacent to the queried node) share one
//! error type. Degenerate geometry is never an error: an undefined normal
//! is reported as the zero vector.

use std::path::PathBuf;
use thiserror::Error;

use crate::graph::NodeRef;

/// Result type alias using [`GraphError`].
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while building, querying or restoring a mesh graph.
#[derive(Error, Debug)]
pub enum GraphError {
    /// The mesh has no triangles.
    #[error("mesh has no triangles")]
    EmptyMesh,

    /// The flat triangle index list is not a multiple of three long.
    #[error("triangle index list has length {len}, which is not a multiple of 3")]
    IndexCount {
        /// Length of the index list.
        len: usize,
    },

    /// More positions than 32-bit vertex indices can address.
    #[error("{count} vertices exceed the 32-bit index range")]
    TooManyVertices {
        /// Number of positions given.
        count: usize,
    },

    /// A triangle references a vertex index outside the position list.
    #[error("triangle {triangle} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The triangle index.
        triangle: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// Two corners of a triangle resolve to the same vertex.
    #[error("triangle {triangle} is degenerate (two corners share a position)")]
    DegenerateTriangle {
        /// The triangle index.
        triangle: usize,
    },

    /// An edge has more than two incident triangles.
    #[error("edge ({v0}, {v1}) has more than two incident triangles")]
    NonManifoldEdge {
        /// Mesh index of the first vertex of the edge.
        v0: u32,
        /// Mesh index of the second vertex of the edge.
        v1: u32,
    },

    /// A query was given a node that does not belong to the queried node's adjacency.
    #[error("{other:?} is not adjacent to {node:?}")]
    Topology {
        /// The node being queried.
        node: NodeRef,
        /// The node passed as argument.
        other: NodeRef,
    },

    /// A flattened record is unusable.
    #[error("invalid {kind} record {id}: {reason}")]
    InvalidRecord {
        /// Node kind of the record.
        kind: &'static str,
        /// Record id (0 if the id itself is the problem).
        id: u32,
        /// What is wrong with it.
        reason: String,
    },

    /// The graph violates a topological invariant.
    #[error("invalid graph state: {0}")]
    InvalidState(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}

impl GraphError {
    /// Create an invalid record error.
    pub fn invalid_record<T: std::fmt::Display>(kind: &'static str, id: u32, reason: T) -> Self {
        GraphError::InvalidRecord {
            kind,
            id,
            reason: reason.to_string(),
        }
    }

    /// Whether this error reports a problem with the input mesh rather than misuse of a built graph.
    pub fn is_malformed_mesh(&self) -> bool {
        matches!(
            self,
            GraphError::EmptyMesh
                | GraphError::IndexCount { .. }
                | GraphError::TooManyVertices { .. }
                | GraphError::InvalidVertexIndex { .. }
                | GraphError::DegenerateTriangle { .. }
                | GraphError::NonManifoldEdge { .. }
        )
    }
}
