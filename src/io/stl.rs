//! STL (stereolithography) input.
//!
//! Both binary and ASCII files are read through `stl_io`, which already merges
//! bit-identical corners into an indexed vertex list.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{GraphError, Result};
use crate::graph::same_position;

use super::RawMesh;

/// Load an STL file.
///
/// Automatically detects binary vs ASCII format. Facets whose corners
/// collapse onto fewer than three distinct vertices are skipped.
///
/// # Example
///
/// ```no_run
/// use meshgraph::io::stl;
///
/// let raw = stl::load("model.stl").unwrap();
/// let graph = raw.build().unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<RawMesh> {
    let path = path.as_ref();
    let mut file = File::open(path)?;
    read(&mut file).map_err(|e| match e {
        GraphError::LoadError { message, .. } => GraphError::LoadError {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })
}

/// Read an STL mesh from any seekable reader.
pub fn read<R: Read + Seek>(reader: &mut R) -> Result<RawMesh> {
    let stl = stl_io::read_stl(reader).map_err(|e| GraphError::LoadError {
        path: Default::default(),
        message: e.to_string(),
    })?;

    let positions: Vec<Point3<f64>> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    let mut indices = Vec::with_capacity(stl.faces.len() * 3);
    let mut skipped = 0usize;
    for face in &stl.faces {
        let [i0, i1, i2] = face.vertices;
        // Corners stl_io keeps apart (such as -0.0 and 0.0) may still merge in the builder.
        let [p0, p1, p2] = [&positions[i0], &positions[i1], &positions[i2]];
        if same_position(p0, p1) || same_position(p1, p2) || same_position(p0, p2) {
            skipped += 1;
            continue;
        }
        indices.extend([i0 as u32, i1 as u32, i2 as u32]);
    }

    if skipped > 0 {
        log::warn!("skipped {} degenerate STL facets", skipped);
    }

    if indices.is_empty() {
        return Err(GraphError::LoadError {
            path: Default::default(),
            message: "STL file contains no valid triangles".to_string(),
        });
    }

    Ok(RawMesh { positions, indices })
}
