//! PLY (Stanford polygon) input.
//!
//! Faces with more than three corners are fan triangulated around their
//! first corner, so the winding of every polygon is kept.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{GraphError, Result};

use super::RawMesh;

/// Load a PLY file.
///
/// # Example
///
/// ```no_run
/// use meshgraph::io::ply;
///
/// let raw = ply::load("model.ply").unwrap();
/// println!("{} triangles", raw.num_triangles());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<RawMesh> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    read(&mut reader).map_err(|message| GraphError::LoadError {
        path: path.to_path_buf(),
        message,
    })
}

/// Read a PLY mesh from a buffered reader. Errors are plain messages; the
/// caller attaches the source.
fn read<R: BufRead>(reader: &mut R) -> std::result::Result<RawMesh, String> {
    let parser = Parser::<DefaultElement>::new();
    let ply = parser.read_ply(reader).map_err(|e| e.to_string())?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or("PLY file has no vertex element")?;

    let mut positions: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let x = get_float_property(vertex, "x").ok_or("vertex missing x coordinate")?;
        let y = get_float_property(vertex, "y").ok_or("vertex missing y coordinate")?;
        let z = get_float_property(vertex, "z").ok_or("vertex missing z coordinate")?;
        positions.push(Point3::new(x, y, z));
    }

    let face_element = ply.payload.get("face").ok_or("PLY file has no face element")?;

    let mut indices: Vec<u32> = Vec::with_capacity(face_element.len() * 3);
    for (f, face) in face_element.iter().enumerate() {
        let corners = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or("face missing vertex_indices property")?;

        let corners = corners
            .into_iter()
            .map(|i| u32::try_from(i).map_err(|_| format!("face {f} has negative or oversized index {i}")))
            .collect::<std::result::Result<Vec<u32>, String>>()?;

        if corners.len() < 3 {
            log::warn!("skipping PLY face {} with {} corners", f, corners.len());
            continue;
        }
        for i in 1..corners.len() - 1 {
            indices.extend([corners[0], corners[i], corners[i + 1]]);
        }
    }

    if indices.is_empty() {
        return Err("PLY file contains no faces".to_string());
    }

    Ok(RawMesh { positions, indices })
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<i64>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as i64).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as i64).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as i64).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as i64).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as i64).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as i64).collect()),
        _ => None,
    }
}
