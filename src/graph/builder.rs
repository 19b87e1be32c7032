//! Mesh graph construction.
//!
//! Builds a [`MeshGraph`] from a vertex position list and a flat triangle
//! index list (three indices per triangle, in winding order), in three
//! passes:
//!
//! 1. **Vertices**: source vertices with exactly equal positions are merged
//!    into one graph vertex. No tolerance is applied here, unlike the
//!    geometric predicates; only true duplicates are merged.
//! 2. **Triangles**: each index triple becomes a triangle over the merged
//!    vertices, remembering the source index of every corner.
//! 3. **Edges**: corner pairs are keyed by [`make_edge_key`], so both
//!    triangles sharing an edge find the same edge node.
//!
//! Identities are handed out in that order starting at 1: vertices, then
//! triangles, then edges.
//!
//! The input must be manifold with boundary (no edge shared by more than
//! two triangles); violations are reported as errors.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use nalgebra::Point3;

use super::ids::{EdgeId, IdAllocator, TriangleId, VertexId};
use super::mesh_graph::MeshGraph;
use super::node::{Edge, Triangle, Vertex};
use crate::error::{GraphError, Result};

/// How coincident source vertices are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupStrategy {
    /// Compare each vertex against every unique vertex found so far. O(n²).
    LinearScan,

    /// Look positions up in a hash map keyed by coordinate values. O(n).
    #[default]
    Hashed,
}

/// Options for mesh graph construction.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Vertex deduplication strategy. Both produce the same graph.
    pub dedup: DedupStrategy,

    /// Run [`MeshGraph::validate`] on the result (default: false).
    pub validate: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            dedup: DedupStrategy::Hashed,
            validate: false,
        }
    }
}

impl BuildOptions {
    /// Use the given deduplication strategy.
    pub fn with_dedup(mut self, dedup: DedupStrategy) -> Self {
        self.dedup = dedup;
        self
    }

    /// Set whether to validate the finished graph.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

/// Order-independent key for the edge between two vertex indices.
///
/// The smaller index fills the low 32 bits and the larger the high 32 bits,
/// so `make_edge_key(a, b) == make_edge_key(b, a)` and distinct unordered
/// pairs never collide.
#[inline]
pub fn make_edge_key(a: u32, b: u32) -> u64 {
    let (lower, upper) = if a < b { (a, b) } else { (b, a) };
    ((upper as u64) << 32) | lower as u64
}

/// Build a mesh graph from positions and a flat triangle index list.
///
/// # Example
/// ```
/// use meshgraph::graph::build;
/// use nalgebra::Point3;
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let graph = build(&positions, &[0, 1, 2, 0, 2, 3]).unwrap();
///
/// assert_eq!(graph.num_vertices(), 4);
/// assert_eq!(graph.num_edges(), 5);
/// assert_eq!(graph.num_triangles(), 2);
/// ```
pub fn build(positions: &[Point3<f64>], indices: &[u32]) -> Result<MeshGraph> {
    build_with_options(positions, indices, &BuildOptions::default())
}

/// Build a mesh graph from positions and index triples.
pub fn build_from_triangles(positions: &[Point3<f64>], faces: &[[u32; 3]]) -> Result<MeshGraph> {
    let indices: Vec<u32> = faces.iter().flatten().copied().collect();
    build(positions, &indices)
}

/// Build a mesh graph with explicit options.
pub fn build_with_options(
    positions: &[Point3<f64>],
    indices: &[u32],
    options: &BuildOptions,
) -> Result<MeshGraph> {
    check_indices(positions, indices)?;

    let num_triangles = indices.len() / 3;
    let mut graph = MeshGraph::with_capacity(positions.len(), num_triangles);
    let mut ids = IdAllocator::new();

    let mapping = match options.dedup {
        DedupStrategy::LinearScan => dedup_linear(positions, &mut graph, &mut ids),
        DedupStrategy::Hashed => dedup_hashed(positions, &mut graph, &mut ids),
    };
    log::debug!(
        "vertex pass: {} source vertices, {} unique",
        positions.len(),
        graph.num_vertices()
    );

    create_triangles(indices, &mapping, &mut graph, &mut ids)?;
    log::debug!("triangle pass: {} triangles", graph.num_triangles());

    create_edges(&mut graph, &mut ids)?;
    log::debug!("edge pass: {} edges", graph.num_edges());

    graph.index_ids();

    if options.validate {
        graph.validate()?;
    }

    log::info!(
        "built mesh graph: {} vertices, {} edges, {} triangles ({} ids)",
        graph.num_vertices(),
        graph.num_edges(),
        graph.num_triangles(),
        ids.allocated()
    );

    Ok(graph)
}

fn check_indices(positions: &[Point3<f64>], indices: &[u32]) -> Result<()> {
    if indices.is_empty() {
        return Err(GraphError::EmptyMesh);
    }
    if indices.len() % 3 != 0 {
        return Err(GraphError::IndexCount { len: indices.len() });
    }
    if positions.len() > u32::MAX as usize {
        return Err(GraphError::TooManyVertices {
            count: positions.len(),
        });
    }

    for (ti, triangle) in indices.chunks_exact(3).enumerate() {
        for &vi in triangle {
            if vi as usize >= positions.len() {
                return Err(GraphError::InvalidVertexIndex {
                    triangle: ti,
                    vertex: vi as usize,
                });
            }
        }
    }

    Ok(())
}

/// Exact equality, as `==` on every coordinate.
#[inline]
pub(crate) fn same_position(a: &Point3<f64>, b: &Point3<f64>) -> bool {
    a.x == b.x && a.y == b.y && a.z == b.z
}

/// Hash key matching [`same_position`]: `-0.0` and `0.0` share a key.
/// Positions with a NaN coordinate equal nothing and get no key.
#[inline]
fn position_key(p: &Point3<f64>) -> Option<[u64; 3]> {
    let bits = |c: f64| if c == 0.0 { 0 } else { c.to_bits() };
    if p.coords.iter().any(|c| c.is_nan()) {
        return None;
    }
    Some([bits(p.x), bits(p.y), bits(p.z)])
}

/// Returns the source-index to unique-vertex mapping.
fn dedup_linear(
    positions: &[Point3<f64>],
    graph: &mut MeshGraph,
    ids: &mut IdAllocator,
) -> Vec<VertexId> {
    let mut mapping = Vec::with_capacity(positions.len());

    for (i, p) in positions.iter().enumerate() {
        let existing = graph
            .vertices
            .iter()
            .position(|v| same_position(&v.position, p));

        let vid = match existing {
            Some(j) => VertexId::new(j),
            None => push_vertex(graph, ids, i, p),
        };
        mapping.push(vid);
    }

    mapping
}

fn dedup_hashed(
    positions: &[Point3<f64>],
    graph: &mut MeshGraph,
    ids: &mut IdAllocator,
) -> Vec<VertexId> {
    let mut mapping = Vec::with_capacity(positions.len());
    let mut seen: HashMap<[u64; 3], VertexId> = HashMap::with_capacity(positions.len());

    for (i, p) in positions.iter().enumerate() {
        let vid = match position_key(p) {
            Some(key) => match seen.entry(key) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => *entry.insert(push_vertex(graph, ids, i, p)),
            },
            None => push_vertex(graph, ids, i, p),
        };
        mapping.push(vid);
    }

    mapping
}

fn push_vertex(graph: &mut MeshGraph, ids: &mut IdAllocator, index: usize, p: &Point3<f64>) -> VertexId {
    let vid = VertexId::new(graph.vertices.len());
    graph.vertices.push(Vertex::new(ids.next_id(), index as u32, *p));
    vid
}

fn create_triangles(
    indices: &[u32],
    mapping: &[VertexId],
    graph: &mut MeshGraph,
    ids: &mut IdAllocator,
) -> Result<()> {
    for (ti, source) in indices.chunks_exact(3).enumerate() {
        let corners = [
            mapping[source[0] as usize],
            mapping[source[1] as usize],
            mapping[source[2] as usize],
        ];
        if corners[0] == corners[1] || corners[1] == corners[2] || corners[0] == corners[2] {
            return Err(GraphError::DegenerateTriangle { triangle: ti });
        }

        let tid = TriangleId::new(graph.triangles.len());
        let mut triangle = Triangle::new(ids.next_id(), corners, [source[0], source[1], source[2]]);

        let mut sum = Point3::origin().coords;
        for v in corners {
            let vertex = &mut graph.vertices[v.index()];
            vertex.triangles.push(tid);
            sum += vertex.position.coords;
        }
        triangle.position = Point3::from(sum / 3.0);

        graph.triangles.push(triangle);
    }

    Ok(())
}

fn create_edges(graph: &mut MeshGraph, ids: &mut IdAllocator) -> Result<()> {
    let mut edge_map: HashMap<u64, EdgeId> = HashMap::with_capacity(graph.triangles.len() * 2);

    for ti in 0..graph.triangles.len() {
        let tid = TriangleId::new(ti);
        let corners = graph.triangles[ti].vertices;

        for j in 0..3 {
            let a = corners[j];
            let b = corners[(j + 1) % 3];
            let (ia, ib) = (graph.vertices[a.index()].index, graph.vertices[b.index()].index);

            let eid = match edge_map.entry(make_edge_key(ia, ib)) {
                Entry::Vacant(entry) => {
                    let eid = EdgeId::new(graph.edges.len());
                    graph.edges.push(Edge::new(ids.next_id(), [a, b], tid));
                    graph.vertices[a.index()].edges.push(eid);
                    graph.vertices[b.index()].edges.push(eid);
                    *entry.insert(eid)
                }
                Entry::Occupied(entry) => {
                    let eid = *entry.get();
                    let edge = &mut graph.edges[eid.index()];
                    if edge.second.is_some() {
                        return Err(GraphError::NonManifoldEdge { v0: ia, v1: ib });
                    }
                    edge.second = Some(tid);
                    eid
                }
            };

            graph.triangles[ti].edges[j] = eid;
        }
    }

    for i in 0..graph.edges.len() {
        graph.edges[i].position = graph.edge_midpoint(EdgeId::new(i));
    }

    Ok(())
}
