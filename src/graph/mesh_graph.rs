//! The mesh graph arena and its queries.
//!
//! A [`MeshGraph`] owns every vertex, edge and triangle node of one mesh.
//! Nodes reference each other by handle, so adjacency lookups are O(1)
//! indexing into the arenas. Topology is fixed once built; vertex positions
//! may be moved afterwards (see [`MeshGraph::set_vertex_position`]).

use std::collections::HashMap;

use nalgebra::{Point3, UnitQuaternion, Vector3};
use rayon::prelude::*;

use super::ids::{EdgeId, NodeId, TriangleId, VertexId};
use super::node::{Edge, NodeRef, Triangle, Vertex};
use crate::error::{GraphError, Result};
use crate::geometry;

/// A graph of the vertices, edges and triangles of a triangle mesh.
///
/// Two nodes are connected when the mesh elements they stand for are
/// adjacent: a vertex with its edges and triangles, an edge with its two
/// vertices and one or two triangles, a triangle with its three vertices
/// and three edges.
#[derive(Debug, Clone, Default)]
pub struct MeshGraph {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) triangles: Vec<Triangle>,

    /// Identity lookup for every node.
    pub(crate) lookup: HashMap<NodeId, NodeRef>,
}

impl MeshGraph {
    pub(crate) fn with_capacity(num_vertices: usize, num_triangles: usize) -> Self {
        // E = 3F/2 on a closed mesh, a little more with boundary
        let num_edges = num_triangles * 3 / 2 + num_triangles / 4;

        Self {
            vertices: Vec::with_capacity(num_vertices),
            edges: Vec::with_capacity(num_edges),
            triangles: Vec::with_capacity(num_triangles),
            lookup: HashMap::with_capacity(num_vertices + num_edges + num_triangles),
        }
    }

    /// Rebuild the identity lookup from the node arenas.
    pub(crate) fn index_ids(&mut self) {
        self.lookup.clear();
        for (i, v) in self.vertices.iter().enumerate() {
            self.lookup.insert(v.id, NodeRef::Vertex(VertexId::new(i)));
        }
        for (i, e) in self.edges.iter().enumerate() {
            self.lookup.insert(e.id, NodeRef::Edge(EdgeId::new(i)));
        }
        for (i, t) in self.triangles.iter().enumerate() {
            self.lookup.insert(t.id, NodeRef::Triangle(TriangleId::new(i)));
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Total number of nodes of all kinds.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.vertices.len() + self.edges.len() + self.triangles.len()
    }

    /// Get a vertex by handle.
    #[inline]
    pub fn vertex(&self, v: VertexId) -> &Vertex {
        &self.vertices[v.index()]
    }

    /// Get an edge by handle.
    #[inline]
    pub fn edge(&self, e: EdgeId) -> &Edge {
        &self.edges[e.index()]
    }

    /// Get a triangle by handle.
    #[inline]
    pub fn triangle(&self, t: TriangleId) -> &Triangle {
        &self.triangles[t.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Move a vertex.
    ///
    /// Cached edge midpoints and triangle centroids are not updated until
    /// [`refresh_positions`](Self::refresh_positions) is called.
    #[inline]
    pub fn set_vertex_position(&mut self, v: VertexId, position: Point3<f64>) {
        self.vertices[v.index()].position = position;
    }

    /// Recompute every cached edge midpoint and triangle centroid.
    pub fn refresh_positions(&mut self) {
        for i in 0..self.edges.len() {
            self.edges[i].position = self.edge_midpoint(EdgeId::new(i));
        }
        for i in 0..self.triangles.len() {
            self.triangles[i].position = self.triangle_centroid(TriangleId::new(i));
        }
    }

    /// Find a node by identity.
    #[inline]
    pub fn find(&self, id: NodeId) -> Option<NodeRef> {
        self.lookup.get(&id).copied()
    }

    /// The identity of any node.
    pub fn node_id(&self, node: NodeRef) -> NodeId {
        match node {
            NodeRef::Vertex(v) => self.vertex(v).id,
            NodeRef::Edge(e) => self.edge(e).id,
            NodeRef::Triangle(t) => self.triangle(t).id,
        }
    }

    /// The (cached) position of any node.
    pub fn node_position(&self, node: NodeRef) -> &Point3<f64> {
        match node {
            NodeRef::Vertex(v) => &self.vertex(v).position,
            NodeRef::Edge(e) => &self.edge(e).position,
            NodeRef::Triangle(t) => &self.triangle(t).position,
        }
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex handles.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all edge handles.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all triangle handles.
    pub fn triangle_ids(&self) -> impl Iterator<Item = TriangleId> + '_ {
        (0..self.triangles.len()).map(TriangleId::new)
    }

    /// Iterate over all vertices with their handles.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all edges with their handles.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(i), e))
    }

    /// Iterate over all triangles with their handles.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleId, &Triangle)> + '_ {
        self.triangles
            .iter()
            .enumerate()
            .map(|(i, t)| (TriangleId::new(i), t))
    }

    /// Iterate over edges with a single adjacent triangle.
    pub fn boundary_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges().filter(|(_, e)| e.is_boundary()).map(|(id, _)| id)
    }

    /// Check if every edge has two adjacent triangles.
    pub fn is_closed(&self) -> bool {
        self.edges.iter().all(|e| !e.is_boundary())
    }

    /// All nodes adjacent to `node`.
    ///
    /// - vertex: its edges, then its triangles
    /// - edge: its one or two triangles, then its two vertices
    /// - triangle: its three edges, then its three vertices
    pub fn neighbors(&self, node: NodeRef) -> Vec<NodeRef> {
        match node {
            NodeRef::Vertex(v) => {
                let vertex = self.vertex(v);
                vertex
                    .edges
                    .iter()
                    .map(|&e| NodeRef::Edge(e))
                    .chain(vertex.triangles.iter().map(|&t| NodeRef::Triangle(t)))
                    .collect()
            }
            NodeRef::Edge(e) => {
                let edge = self.edge(e);
                edge.triangles()
                    .map(NodeRef::Triangle)
                    .chain(edge.vertices.iter().map(|&v| NodeRef::Vertex(v)))
                    .collect()
            }
            NodeRef::Triangle(t) => {
                let tri = self.triangle(t);
                tri.edges
                    .iter()
                    .map(|&e| NodeRef::Edge(e))
                    .chain(tri.vertices.iter().map(|&v| NodeRef::Vertex(v)))
                    .collect()
            }
        }
    }

    // ==================== Vertex queries ====================

    /// Average of the adjacent triangle normals (not area weighted).
    ///
    /// Returns the zero vector when the normals cancel out, for example for
    /// two anti-parallel triangles sharing the vertex. Treat zero as "no
    /// normal", not as a direction.
    pub fn vertex_normal(&self, v: VertexId) -> Vector3<f64> {
        let sum: Vector3<f64> = self
            .vertex(v)
            .triangles
            .iter()
            .map(|&t| self.triangle_normal(t))
            .sum();
        geometry::normalize_or_zero(&sum)
    }

    /// Normals of all vertices, indexed by vertex handle.
    pub fn vertex_normals(&self) -> Vec<Vector3<f64>> {
        (0..self.vertices.len())
            .into_par_iter()
            .map(|i| self.vertex_normal(VertexId::new(i)))
            .collect()
    }

    /// Source vertex index of `v` as recorded by its first adjacent triangle.
    pub fn vertex_original_index(&self, v: VertexId) -> Option<u32> {
        let first = *self.vertex(v).triangles.first()?;
        self.triangle(first).original_index(v)
    }

    // ==================== Edge queries ====================

    /// Positions of the edge endpoints, `[tail, head]`.
    #[inline]
    pub fn edge_positions(&self, e: EdgeId) -> [Point3<f64>; 2] {
        let [tail, head] = self.edge(e).vertices;
        [*self.position(tail), *self.position(head)]
    }

    /// Position of the tail vertex.
    #[inline]
    pub fn edge_tail(&self, e: EdgeId) -> &Point3<f64> {
        self.position(self.edge(e).tail())
    }

    /// Position of the head vertex.
    #[inline]
    pub fn edge_head(&self, e: EdgeId) -> &Point3<f64> {
        self.position(self.edge(e).head())
    }

    /// Move the tail vertex.
    pub fn set_edge_tail(&mut self, e: EdgeId, position: Point3<f64>) {
        let tail = self.edge(e).tail();
        self.set_vertex_position(tail, position);
    }

    /// Move the head vertex.
    pub fn set_edge_head(&mut self, e: EdgeId, position: Point3<f64>) {
        let head = self.edge(e).head();
        self.set_vertex_position(head, position);
    }

    /// Unit direction from tail to head.
    pub fn edge_direction(&self, e: EdgeId) -> Vector3<f64> {
        let [tail, head] = self.edge_positions(e);
        geometry::edge_direction(&tail, &head)
    }

    /// Average of the current endpoint positions.
    pub fn edge_midpoint(&self, e: EdgeId) -> Point3<f64> {
        let [tail, head] = self.edge_positions(e);
        Point3::from((tail.coords + head.coords) * 0.5)
    }

    /// Compute the length of an edge.
    pub fn edge_length(&self, e: EdgeId) -> f64 {
        let [tail, head] = self.edge_positions(e);
        (head - tail).norm()
    }

    /// Check if a point lies on the edge, with a fallback for points near an endpoint.
    pub fn edge_contains_point(&self, e: EdgeId, point: &Point3<f64>) -> bool {
        let [tail, head] = self.edge_positions(e);
        geometry::edge_contains_point(point, &tail, &head)
    }

    /// Check if a point lies on the edge segment.
    pub fn is_point_in_edge(&self, e: EdgeId, point: &Point3<f64>) -> bool {
        let [tail, head] = self.edge_positions(e);
        geometry::point_in_edge(point, &tail, &head)
    }

    /// The endpoint of `e` that is not `v`.
    pub fn edge_complement_vertex(&self, e: EdgeId, v: VertexId) -> Result<VertexId> {
        self.edge(e).other_vertex(v).ok_or(GraphError::Topology {
            node: e.into(),
            other: v.into(),
        })
    }

    /// The triangle on the other side of `e` from `t`.
    ///
    /// Returns `Ok(None)` when `e` is a boundary edge and `t` its only triangle.
    pub fn edge_complement_triangle(&self, e: EdgeId, t: TriangleId) -> Result<Option<TriangleId>> {
        let edge = self.edge(e);
        if edge.first == t {
            Ok(edge.second)
        } else if edge.second == Some(t) {
            Ok(Some(edge.first))
        } else {
            Err(GraphError::Topology {
                node: e.into(),
                other: t.into(),
            })
        }
    }

    /// Vector from the edge to the third corner of `t`, perpendicular to the edge.
    ///
    /// Its length is the distance of the third corner from the edge line.
    pub fn edge_to_complement(&self, e: EdgeId, t: TriangleId) -> Result<Vector3<f64>> {
        if !self.edge(e).contains_triangle(t) {
            return Err(GraphError::Topology {
                node: e.into(),
                other: t.into(),
            });
        }
        Ok(self.edge_to_complement_unchecked(e, t))
    }

    fn edge_to_complement_unchecked(&self, e: EdgeId, t: TriangleId) -> Vector3<f64> {
        let edge = self.edge(e);
        let Some(&corner) = self
            .triangle(t)
            .vertices
            .iter()
            .find(|&&v| !edge.contains_vertex(v))
        else {
            return Vector3::zeros();
        };

        let complement = self.position(corner);
        let [tail, head] = self.edge_positions(e);
        let foot = geometry::project_on_line(complement, &(tail - head), &head);
        complement - foot
    }

    /// Normal of an edge.
    ///
    /// With two triangles this is the fold normal: the first triangle's
    /// normal rotated half way towards the second's. A boundary edge points
    /// away from its triangle, in the triangle's plane.
    pub fn edge_normal(&self, e: EdgeId) -> Vector3<f64> {
        let edge = self.edge(e);
        match edge.second {
            None => -geometry::normalize_or_zero(&self.edge_to_complement_unchecked(e, edge.first)),
            Some(second) => geometry::fold_normal(
                &self.triangle_normal(edge.first),
                &self.triangle_normal(second),
            ),
        }
    }

    /// Normals of all edges, indexed by edge handle.
    pub fn edge_normals(&self) -> Vec<Vector3<f64>> {
        (0..self.edges.len())
            .into_par_iter()
            .map(|i| self.edge_normal(EdgeId::new(i)))
            .collect()
    }

    /// Rotation taking the edge to +X (tail at origin) with `point` in the negative-Y half plane.
    pub fn edge_basis_rotation(&self, e: EdgeId, point: &Point3<f64>) -> UnitQuaternion<f64> {
        let [tail, head] = self.edge_positions(e);
        geometry::edge_basis_rotation(&tail, &head, point)
    }

    // ==================== Triangle queries ====================

    /// Positions of the three corners in winding order.
    pub fn triangle_positions(&self, t: TriangleId) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.triangle(t).vertices;
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    /// Unit normal following the corner winding.
    pub fn triangle_normal(&self, t: TriangleId) -> Vector3<f64> {
        let [p0, p1, p2] = self.triangle_positions(t);
        geometry::triangle_normal(&p0, &p1, &p2)
    }

    /// Average of the current corner positions.
    pub fn triangle_centroid(&self, t: TriangleId) -> Point3<f64> {
        let [p0, p1, p2] = self.triangle_positions(t);
        Point3::from((p0.coords + p1.coords + p2.coords) / 3.0)
    }

    /// Check if a point lies inside the triangle.
    pub fn triangle_contains_point(&self, t: TriangleId, point: &Point3<f64>) -> bool {
        let [p0, p1, p2] = self.triangle_positions(t);
        geometry::point_in_triangle(point, &p0, &p1, &p2)
    }

    /// The corner of `t` that is not an endpoint of `e`.
    pub fn triangle_complement_vertex(&self, t: TriangleId, e: EdgeId) -> Result<VertexId> {
        let tri = self.triangle(t);
        let not_adjacent = || GraphError::Topology {
            node: t.into(),
            other: e.into(),
        };

        if !tri.contains_edge(e) {
            return Err(not_adjacent());
        }

        let edge = self.edge(e);
        tri.vertices
            .iter()
            .copied()
            .find(|&v| !edge.contains_vertex(v))
            .ok_or_else(not_adjacent)
    }

    /// Source vertex index recorded for corner `v` of `t`.
    pub fn triangle_original_index(&self, t: TriangleId, v: VertexId) -> Result<u32> {
        self.triangle(t)
            .original_index(v)
            .ok_or(GraphError::Topology {
                node: t.into(),
                other: v.into(),
            })
    }

    // ==================== Validation ====================

    /// Check every topological invariant of the graph.
    ///
    /// - a vertex has either no edges and no triangles (an unused position), or at least one
    ///   of each, and each of them lists the vertex back
    /// - every edge has two distinct endpoints and one or two distinct triangles, each listing it
    /// - `triangle.edges[j]` joins `vertices[j]` and `vertices[(j + 1) % 3]`
    /// - node identities are unique and indexed
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(GraphError::InvalidState(msg));

        for (vid, v) in self.vertices() {
            // Positions no triangle uses become isolated vertices.
            if v.edges.is_empty() != v.triangles.is_empty() {
                return fail(format!(
                    "{vid:?} has {} edges but {} triangles",
                    v.edges.len(),
                    v.triangles.len()
                ));
            }
            for &e in &v.edges {
                match self.edges.get(e.index()) {
                    Some(edge) if edge.contains_vertex(vid) => {}
                    _ => return fail(format!("{vid:?} lists {e:?}, which does not contain it")),
                }
            }
            for &t in &v.triangles {
                match self.triangles.get(t.index()) {
                    Some(tri) if tri.contains_vertex(vid) => {}
                    _ => return fail(format!("{vid:?} lists {t:?}, which does not contain it")),
                }
            }
        }

        for (eid, e) in self.edges() {
            let [tail, head] = e.vertices;
            if tail == head {
                return fail(format!("{eid:?} joins {tail:?} to itself"));
            }
            for v in [tail, head] {
                match self.vertices.get(v.index()) {
                    Some(vertex) if vertex.edges.contains(&eid) => {}
                    _ => return fail(format!("{eid:?} uses {v:?}, which does not list it")),
                }
            }
            if e.second == Some(e.first) {
                return fail(format!("{eid:?} lists {:?} twice", e.first));
            }
            for t in e.triangles() {
                match self.triangles.get(t.index()) {
                    Some(tri) if tri.contains_edge(eid) => {}
                    _ => return fail(format!("{eid:?} lists {t:?}, which does not contain it")),
                }
            }
        }

        for (tid, t) in self.triangles() {
            for j in 0..3 {
                let e = t.edges[j];
                let Some(edge) = self.edges.get(e.index()) else {
                    return fail(format!("{tid:?} has no edge in slot {j}"));
                };
                let (a, b) = (t.vertices[j], t.vertices[(j + 1) % 3]);
                if !(edge.contains_vertex(a) && edge.contains_vertex(b)) {
                    return fail(format!("{tid:?} slot {j}: {e:?} does not join {a:?} and {b:?}"));
                }
                if !edge.contains_triangle(tid) {
                    return fail(format!("{tid:?} uses {e:?}, which does not list it"));
                }
                match self.vertices.get(t.vertices[j].index()) {
                    Some(vertex) if vertex.triangles.contains(&tid) => {}
                    _ => return fail(format!("{tid:?} uses {a:?}, which does not list it")),
                }
            }
            if t.edges[0] == t.edges[1] || t.edges[1] == t.edges[2] || t.edges[0] == t.edges[2] {
                return fail(format!("{tid:?} repeats an edge"));
            }
        }

        let total = self.vertices.len() + self.edges.len() + self.triangles.len();
        if self.lookup.len() != total {
            return fail(format!(
                "{} identities for {} nodes (duplicate ids?)",
                self.lookup.len(),
                total
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build;

    fn unit_square() -> MeshGraph {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build(&positions, &[0, 1, 2, 0, 2, 3]).unwrap()
    }

    /// Two triangles sharing the edge (0,0,0)-(1,0,0), folded 90 degrees.
    fn folded_pair() -> MeshGraph {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        build(&positions, &[0, 1, 2, 1, 0, 3]).unwrap()
    }

    fn find_edge(graph: &MeshGraph, a: &Point3<f64>, b: &Point3<f64>) -> EdgeId {
        graph
            .edge_ids()
            .find(|&e| {
                let [p, q] = graph.edge_positions(e);
                (p == *a && q == *b) || (p == *b && q == *a)
            })
            .unwrap()
    }

    #[test]
    fn test_validate_rejects_half_connected_vertex() {
        let mut graph = unit_square();
        assert!(graph.validate().is_ok());

        // An edge without a triangle at the same vertex is inconsistent
        graph.vertices[1].triangles.clear();
        assert!(matches!(graph.validate(), Err(GraphError::InvalidState(_))));
    }

    #[test]
    fn test_square_edge_counts() {
        let graph = unit_square();
        assert_eq!(graph.num_vertices(), 4);
        assert_eq!(graph.num_edges(), 5);
        assert_eq!(graph.num_triangles(), 2);
        assert_eq!(graph.boundary_edges().count(), 4);
        assert!(!graph.is_closed());

        let diagonal = find_edge(&graph, &Point3::new(0.0, 0.0, 0.0), &Point3::new(1.0, 1.0, 0.0));
        assert_eq!(graph.edge(diagonal).num_triangles(), 2);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_vertex_normal() {
        let graph = unit_square();
        for v in graph.vertex_ids() {
            assert!((graph.vertex_normal(v) - Vector3::z()).norm() < 1e-12);
        }
        assert_eq!(graph.vertex_normals().len(), 4);
    }

    #[test]
    fn test_vertex_normal_cancels_to_zero() {
        // Two triangles meeting only at vertex 0
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ];
        let graph = build(&positions, &[0, 1, 2, 0, 3, 4]).unwrap();
        let shared = graph.vertex_ids().find(|&v| graph.vertex(v).index() == 0).unwrap();

        // Both normals are +Z; reversing the second triangle's winding cancels them
        let graph_flipped = build(&positions, &[0, 1, 2, 0, 4, 3]).unwrap();
        assert!((graph.vertex_normal(shared) - Vector3::z()).norm() < 1e-12);
        assert_eq!(graph_flipped.vertex_normal(shared), Vector3::zeros());
    }

    #[test]
    fn test_flat_edge_normal_equals_triangle_normal() {
        let graph = unit_square();
        let diagonal = find_edge(&graph, &Point3::new(0.0, 0.0, 0.0), &Point3::new(1.0, 1.0, 0.0));
        assert!((graph.edge_normal(diagonal) - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn test_folded_edge_normal_bisects() {
        let graph = folded_pair();
        let hinge = find_edge(&graph, &Point3::new(0.0, 0.0, 0.0), &Point3::new(1.0, 0.0, 0.0));
        assert_eq!(graph.edge(hinge).num_triangles(), 2);

        // Triangle normals are +Z and +Y
        let expected = Vector3::new(0.0, 1.0, 1.0).normalize();
        assert!((graph.edge_normal(hinge) - expected).norm() < 1e-12);
    }

    #[test]
    fn test_boundary_edge_normal_points_away() {
        let graph = unit_square();
        let bottom = find_edge(&graph, &Point3::new(0.0, 0.0, 0.0), &Point3::new(1.0, 0.0, 0.0));
        assert!(graph.edge(bottom).is_boundary());
        assert!((graph.edge_normal(bottom) - Vector3::new(0.0, -1.0, 0.0)).norm() < 1e-12);

        let t = graph.edge(bottom).first_triangle();
        let to_complement = graph.edge_to_complement(bottom, t).unwrap();
        assert!((to_complement - Vector3::y()).norm() < 1e-12);
    }

    #[test]
    fn test_complements() {
        let graph = unit_square();
        let diagonal = find_edge(&graph, &Point3::new(0.0, 0.0, 0.0), &Point3::new(1.0, 1.0, 0.0));
        let edge = graph.edge(diagonal).clone();

        assert_eq!(graph.edge_complement_vertex(diagonal, edge.tail()).unwrap(), edge.head());
        assert_eq!(graph.edge_complement_vertex(diagonal, edge.head()).unwrap(), edge.tail());

        let [t0, t1] = [edge.first_triangle(), edge.second_triangle().unwrap()];
        assert_eq!(graph.edge_complement_triangle(diagonal, t0).unwrap(), Some(t1));
        assert_eq!(graph.edge_complement_triangle(diagonal, t1).unwrap(), Some(t0));

        let third = graph.triangle_complement_vertex(t0, diagonal).unwrap();
        assert!(!edge.contains_vertex(third));
        assert!(graph.triangle(t0).contains_vertex(third));
    }

    #[test]
    fn test_complement_of_foreign_node_is_topology_error() {
        let graph = unit_square();
        let bottom = find_edge(&graph, &Point3::new(0.0, 0.0, 0.0), &Point3::new(1.0, 0.0, 0.0));
        let top = find_edge(&graph, &Point3::new(0.0, 1.0, 0.0), &Point3::new(1.0, 1.0, 0.0));
        let lonely = graph.edge(top).first_triangle();
        let far = graph
            .vertex_ids()
            .find(|&v| !graph.edge(bottom).contains_vertex(v))
            .unwrap();

        assert!(matches!(
            graph.edge_complement_vertex(bottom, far),
            Err(GraphError::Topology { .. })
        ));
        assert!(matches!(
            graph.edge_complement_triangle(bottom, lonely),
            Err(GraphError::Topology { .. })
        ));
        assert!(matches!(
            graph.triangle_complement_vertex(lonely, bottom),
            Err(GraphError::Topology { .. })
        ));
        assert!(graph.edge_to_complement(bottom, lonely).is_err());

        // Boundary edge: its own triangle has no complement
        let own = graph.edge(bottom).first_triangle();
        assert_eq!(graph.edge_complement_triangle(bottom, own).unwrap(), None);
    }

    #[test]
    fn test_point_containment() {
        let graph = unit_square();
        for (t, tri) in graph.triangles() {
            assert!(graph.triangle_contains_point(t, tri.position()));
            for p in graph.triangle_positions(t) {
                assert!(graph.triangle_contains_point(t, &p));
            }
            let far = tri.position() + graph.triangle_normal(t) * 5.0;
            assert!(!graph.triangle_contains_point(t, &far));
        }

        for (e, edge) in graph.edges() {
            assert!(graph.is_point_in_edge(e, edge.position()));
            assert!(graph.edge_contains_point(e, edge.position()));
            let [tail, head] = graph.edge_positions(e);
            assert!(graph.is_point_in_edge(e, &tail));
            assert!(graph.is_point_in_edge(e, &head));

            let beyond = head + graph.edge_direction(e) * 0.01;
            assert!(!graph.is_point_in_edge(e, &beyond));
            assert!(!graph.edge_contains_point(e, &beyond));
        }
    }

    #[test]
    fn test_neighbors() {
        let graph = unit_square();
        for (t, _) in graph.triangles() {
            let n = graph.neighbors(t.into());
            assert_eq!(n.len(), 6);
            assert_eq!(n.iter().filter(|n| matches!(n, NodeRef::Edge(_))).count(), 3);
        }
        for (e, edge) in graph.edges() {
            assert_eq!(graph.neighbors(e.into()).len(), edge.num_triangles() + 2);
        }
        for (v, vertex) in graph.vertices() {
            let n = graph.neighbors(v.into());
            assert_eq!(n.len(), vertex.edges().len() + vertex.triangles().len());
        }
    }

    #[test]
    fn test_find_and_node_id() {
        let graph = unit_square();
        for (e, edge) in graph.edges() {
            assert_eq!(graph.find(edge.id()), Some(NodeRef::Edge(e)));
            assert_eq!(graph.node_id(e.into()), edge.id());
        }
        assert_eq!(graph.find(NodeId::new(1000).unwrap()), None);
    }

    #[test]
    fn test_move_vertex_and_refresh() {
        let mut graph = unit_square();
        let bottom = find_edge(&graph, &Point3::new(0.0, 0.0, 0.0), &Point3::new(1.0, 0.0, 0.0));
        let before = *graph.edge(bottom).position();

        let head = *graph.edge_head(bottom);
        graph.set_edge_head(bottom, head + Vector3::new(0.0, 0.0, 1.0));
        // Cached position is stale until refreshed
        assert_eq!(*graph.edge(bottom).position(), before);

        graph.refresh_positions();
        assert!((graph.edge(bottom).position().z - 0.5).abs() < 1e-12);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_vertex_original_index() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0), // duplicate of 1
            Point3::new(1.0, 1.0, 0.0),
        ];
        let graph = build(&positions, &[0, 1, 2, 3, 4, 2]).unwrap();
        assert_eq!(graph.num_vertices(), 4);

        let merged = graph.vertex_ids().find(|&v| graph.vertex(v).index() == 1).unwrap();
        assert_eq!(graph.vertex_original_index(merged), Some(1));

        let second = graph.vertex(merged).triangles()[1];
        assert_eq!(graph.triangle_original_index(second, merged).unwrap(), 3);
    }

    #[test]
    fn test_edge_basis_rotation_on_graph() {
        let graph = unit_square();
        let bottom = find_edge(&graph, &Point3::new(0.0, 0.0, 0.0), &Point3::new(1.0, 0.0, 0.0));
        let tail = *graph.edge_tail(bottom);
        let apex = Point3::new(0.5, 1.0, 0.0);

        let r = graph.edge_basis_rotation(bottom, &apex);
        let along = r * (graph.edge_head(bottom) - tail);
        assert!(along.x > 0.0 && along.y.abs() < 1e-9 && along.z.abs() < 1e-9);
        assert!((r * (apex - tail)).y < 0.0);
    }
}
