//! Mesh file input and graph persistence.
//!
//! Mesh files are read into a [`RawMesh`] (positions plus a flat index list)
//! and handed to the graph builder, which does the vertex deduplication.
//! Graphs themselves are stored as id-based JSON records (see [`records`]).
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | STL | `.stl` | ✓ | ✗ | Binary and ASCII |
//! | PLY | `.ply` | ✓ | ✗ | Polygons are fan triangulated |
//! | Graph records | `.json` | ✓ | ✓ | Exact round trip of ids and adjacency |
//!
//! # Usage
//!
//! ```no_run
//! use meshgraph::io::{load, records};
//!
//! // Build a graph with automatic format detection
//! let graph = load("model.ply").unwrap();
//!
//! // Persist it, then restore it with the same ids
//! records::save(&graph, "model.json").unwrap();
//! let restored = load("model.json").unwrap();
//! assert_eq!(restored.num_nodes(), graph.num_nodes());
//! ```

pub mod ply;
pub mod records;
pub mod stl;

use std::path::Path;

use nalgebra::Point3;

use crate::error::{GraphError, Result};
use crate::graph::{build_with_options, BuildOptions, MeshGraph};

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
    /// Flattened graph records as JSON.
    Json,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            "json" => Some(Format::Json),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    fn detect(path: &Path) -> Result<Format> {
        Format::from_path(path).ok_or_else(|| GraphError::UnsupportedFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string(),
        })
    }
}

/// Vertex positions and a flat triangle index list, as read from a mesh file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMesh {
    /// Vertex positions. Coincident positions may repeat.
    pub positions: Vec<Point3<f64>>,
    /// Triangle corners, three per triangle, in winding order.
    pub indices: Vec<u32>,
}

impl RawMesh {
    /// Number of triangles described by the index list.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Build the graph of this mesh with default options.
    pub fn build(&self) -> Result<MeshGraph> {
        self.build_with_options(&BuildOptions::default())
    }

    /// Build the graph of this mesh.
    pub fn build_with_options(&self, options: &BuildOptions) -> Result<MeshGraph> {
        build_with_options(&self.positions, &self.indices, options)
    }
}

/// Read positions and indices from a mesh file.
///
/// Only mesh formats are accepted; a `.json` path is reported as unsupported
/// since graph records carry no raw index list.
pub fn load_raw<P: AsRef<Path>>(path: P) -> Result<RawMesh> {
    let path = path.as_ref();
    match Format::detect(path)? {
        Format::Stl => stl::load(path),
        Format::Ply => ply::load(path),
        Format::Json => Err(GraphError::UnsupportedFormat {
            extension: "json (graph records are not a raw mesh)".to_string(),
        }),
    }
}

/// Load a graph from a file with automatic format detection.
///
/// Mesh files are built with default [`BuildOptions`]; `.json` files are
/// restored from graph records.
///
/// # Example
///
/// ```no_run
/// use meshgraph::io::load;
///
/// let graph = load("model.stl").unwrap();
/// println!("{} triangles", graph.num_triangles());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<MeshGraph> {
    load_with_options(path, &BuildOptions::default())
}

/// Load a graph from a file, building mesh formats with the given options.
pub fn load_with_options<P: AsRef<Path>>(path: P, options: &BuildOptions) -> Result<MeshGraph> {
    let path = path.as_ref();
    let graph = match Format::detect(path)? {
        Format::Json => records::load(path)?,
        Format::Stl | Format::Ply => load_raw(path)?.build_with_options(options)?,
    };
    log::info!(
        "loaded {}: {} vertices, {} edges, {} triangles",
        path.display(),
        graph.num_vertices(),
        graph.num_edges(),
        graph.num_triangles()
    );
    Ok(graph)
}
