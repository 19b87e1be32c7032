//! Vertex, edge and triangle nodes.
//!
//! Nodes hold only handles to their neighbors; the [`MeshGraph`](super::MeshGraph)
//! owns all of them. Positions are cached on each node: a vertex owns its
//! position, an edge caches its midpoint and a triangle its centroid.

use nalgebra::Point3;

use super::ids::{EdgeId, NodeId, TriangleId, VertexId};

/// A unique vertex position of the source mesh.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub(crate) id: NodeId,

    /// Index of the first occurrence of this position in the source vertex list.
    pub(crate) index: u32,

    pub(crate) position: Point3<f64>,

    /// Edges using this vertex, in no particular order.
    pub(crate) edges: Vec<EdgeId>,

    /// Triangles using this vertex, in no particular order.
    pub(crate) triangles: Vec<TriangleId>,
}

impl Vertex {
    pub(crate) fn new(id: NodeId, index: u32, position: Point3<f64>) -> Self {
        Self {
            id,
            index,
            position,
            edges: Vec::new(),
            triangles: Vec::new(),
        }
    }

    /// The node identity.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Index of the first source vertex with this position.
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The position of this vertex.
    #[inline]
    pub fn position(&self) -> &Point3<f64> {
        &self.position
    }

    /// Adjacent edges.
    #[inline]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Adjacent triangles.
    #[inline]
    pub fn triangles(&self) -> &[TriangleId] {
        &self.triangles
    }
}

/// An unordered pair of vertices shared by one or two triangles.
///
/// Vertex order does not matter for equality, but the first vertex is the
/// *tail* and the second the *head* for directional queries.
#[derive(Debug, Clone)]
pub struct Edge {
    pub(crate) id: NodeId,

    /// Cached midpoint.
    pub(crate) position: Point3<f64>,

    /// `[tail, head]`.
    pub(crate) vertices: [VertexId; 2],

    /// The triangle that created this edge.
    pub(crate) first: TriangleId,

    /// The triangle on the other side; `None` on a boundary edge.
    pub(crate) second: Option<TriangleId>,
}

impl Edge {
    pub(crate) fn new(id: NodeId, vertices: [VertexId; 2], first: TriangleId) -> Self {
        Self {
            id,
            position: Point3::origin(),
            vertices,
            first,
            second: None,
        }
    }

    /// The node identity.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The cached midpoint.
    #[inline]
    pub fn position(&self) -> &Point3<f64> {
        &self.position
    }

    /// The two endpoints, `[tail, head]`.
    #[inline]
    pub fn vertices(&self) -> [VertexId; 2] {
        self.vertices
    }

    /// The tail vertex (slot 0).
    #[inline]
    pub fn tail(&self) -> VertexId {
        self.vertices[0]
    }

    /// The head vertex (slot 1).
    #[inline]
    pub fn head(&self) -> VertexId {
        self.vertices[1]
    }

    /// The first adjacent triangle.
    #[inline]
    pub fn first_triangle(&self) -> TriangleId {
        self.first
    }

    /// The second adjacent triangle, if the edge is not on the boundary.
    #[inline]
    pub fn second_triangle(&self) -> Option<TriangleId> {
        self.second
    }

    /// Iterate over the one or two adjacent triangles.
    pub fn triangles(&self) -> impl Iterator<Item = TriangleId> + '_ {
        std::iter::once(self.first).chain(self.second)
    }

    /// Number of adjacent triangles (1 or 2).
    #[inline]
    pub fn num_triangles(&self) -> usize {
        if self.second.is_some() {
            2
        } else {
            1
        }
    }

    /// Check if this edge has only one adjacent triangle.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.second.is_none()
    }

    /// Check if `v` is one of the endpoints.
    #[inline]
    pub fn contains_vertex(&self, v: VertexId) -> bool {
        self.vertices[0] == v || self.vertices[1] == v
    }

    /// The endpoint opposite `v`, or `None` if `v` is not an endpoint.
    #[inline]
    pub fn other_vertex(&self, v: VertexId) -> Option<VertexId> {
        match self.vertices {
            [tail, head] if tail == v => Some(head),
            [tail, head] if head == v => Some(tail),
            _ => None,
        }
    }

    /// Check if `t` is one of the adjacent triangles.
    #[inline]
    pub fn contains_triangle(&self, t: TriangleId) -> bool {
        self.first == t || self.second == Some(t)
    }
}

/// A triangle of the source mesh.
///
/// Corner order is the source winding and decides the normal direction.
/// `edges[j]` connects `vertices[j]` and `vertices[(j + 1) % 3]`.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub(crate) id: NodeId,

    /// Cached centroid.
    pub(crate) position: Point3<f64>,

    pub(crate) vertices: [VertexId; 3],

    pub(crate) edges: [EdgeId; 3],

    /// Source vertex index each corner came from, before deduplication.
    pub(crate) original_vertices: [u32; 3],
}

impl Triangle {
    pub(crate) fn new(id: NodeId, vertices: [VertexId; 3], original_vertices: [u32; 3]) -> Self {
        Self {
            id,
            position: Point3::origin(),
            vertices,
            edges: [EdgeId::invalid(); 3],
            original_vertices,
        }
    }

    /// The node identity.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The cached centroid.
    #[inline]
    pub fn position(&self) -> &Point3<f64> {
        &self.position
    }

    /// The three corners in winding order.
    #[inline]
    pub fn vertices(&self) -> [VertexId; 3] {
        self.vertices
    }

    /// The three edges, aligned with the corner pairs.
    #[inline]
    pub fn edges(&self) -> [EdgeId; 3] {
        self.edges
    }

    /// Source vertex indices of the three corners.
    #[inline]
    pub fn original_vertices(&self) -> [u32; 3] {
        self.original_vertices
    }

    /// Check if `e` is one of the three edges.
    #[inline]
    pub fn contains_edge(&self, e: EdgeId) -> bool {
        self.edges.contains(&e)
    }

    /// Check if `v` is one of the three corners.
    #[inline]
    pub fn contains_vertex(&self, v: VertexId) -> bool {
        self.vertices.contains(&v)
    }

    /// Source vertex index recorded for corner `v`, if `v` is a corner.
    pub fn original_index(&self, v: VertexId) -> Option<u32> {
        self.vertices
            .iter()
            .position(|&corner| corner == v)
            .map(|j| self.original_vertices[j])
    }
}

/// A handle to a node of any kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// A vertex node.
    Vertex(VertexId),
    /// An edge node.
    Edge(EdgeId),
    /// A triangle node.
    Triangle(TriangleId),
}

impl NodeRef {
    /// Human-readable node kind.
    pub fn kind(&self) -> &'static str {
        match self {
            NodeRef::Vertex(_) => "vertex",
            NodeRef::Edge(_) => "edge",
            NodeRef::Triangle(_) => "triangle",
        }
    }
}

impl From<VertexId> for NodeRef {
    fn from(v: VertexId) -> Self {
        NodeRef::Vertex(v)
    }
}

impl From<EdgeId> for NodeRef {
    fn from(e: EdgeId) -> Self {
        NodeRef::Edge(e)
    }
}

impl From<TriangleId> for NodeRef {
    fn from(t: TriangleId) -> Self {
        NodeRef::Triangle(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> NodeId {
        NodeId::new(raw).unwrap()
    }

    #[test]
    fn test_edge_slots() {
        let mut e = Edge::new(id(7), [VertexId::new(0), VertexId::new(1)], TriangleId::new(0));
        assert_eq!(e.tail(), VertexId::new(0));
        assert_eq!(e.head(), VertexId::new(1));
        assert!(e.is_boundary());
        assert_eq!(e.triangles().collect::<Vec<_>>(), vec![TriangleId::new(0)]);

        e.second = Some(TriangleId::new(4));
        assert_eq!(e.num_triangles(), 2);
        assert!(e.contains_triangle(TriangleId::new(4)));
        assert!(!e.contains_triangle(TriangleId::new(5)));
        assert!(e.contains_vertex(VertexId::new(1)));
        assert!(!e.contains_vertex(VertexId::new(2)));
        assert_eq!(e.other_vertex(VertexId::new(0)), Some(VertexId::new(1)));
        assert_eq!(e.other_vertex(VertexId::new(2)), None);
    }

    #[test]
    fn test_triangle_original_index() {
        let t = Triangle::new(
            id(1),
            [VertexId::new(0), VertexId::new(1), VertexId::new(2)],
            [10, 11, 12],
        );
        assert_eq!(t.original_index(VertexId::new(1)), Some(11));
        assert_eq!(t.original_index(VertexId::new(5)), None);
        assert!(t.edges().iter().all(|e| !e.is_valid()));
    }

    #[test]
    fn test_node_ref_kind() {
        assert_eq!(NodeRef::from(VertexId::new(0)).kind(), "vertex");
        assert_eq!(NodeRef::from(EdgeId::new(0)).kind(), "edge");
        assert_eq!(NodeRef::from(TriangleId::new(0)).kind(), "triangle");
    }
}
