//! Flattened, id-based graph records.
//!
//! A [`GraphRecords`] set replaces every node reference with the referenced
//! node's [`NodeId`]. It is the persisted form of a [`MeshGraph`]: restoring
//! a record set yields the same ids and the same adjacency. Id 0 means "no
//! reference" and is only valid in an edge's second triangle slot.
//!
//! Field names follow the JSON layout:
//!
//! ```json
//! {
//!   "vertices":  [{ "id": 1, "index": 0, "position": [0, 0, 0], "edgeIds": [..], "triangleIds": [..] }],
//!   "edges":     [{ "id": 5, "position": [..], "vertexIds": [1, 2], "triangleIds": [4, 0] }],
//!   "triangles": [{ "id": 4, "position": [..], "originalVertices": [0, 1, 2], "vertexIds": [..], "edgeIds": [..] }]
//! }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::graph::{Edge, EdgeId, MeshGraph, NodeId, NodeRef, Triangle, TriangleId, Vertex, VertexId};

/// A flattened vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexRecord {
    /// Node id.
    pub id: u32,
    /// First source index of this position.
    pub index: u32,
    /// Vertex position.
    pub position: [f64; 3],
    /// Ids of the adjacent edges.
    pub edge_ids: Vec<u32>,
    /// Ids of the adjacent triangles.
    pub triangle_ids: Vec<u32>,
}

/// A flattened edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    /// Node id.
    pub id: u32,
    /// Cached midpoint.
    pub position: [f64; 3],
    /// `[tail, head]` vertex ids.
    pub vertex_ids: [u32; 2],
    /// Adjacent triangle ids; the second is 0 on a boundary edge.
    pub triangle_ids: [u32; 2],
}

/// A flattened triangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriangleRecord {
    /// Node id.
    pub id: u32,
    /// Cached centroid.
    pub position: [f64; 3],
    /// Source vertex index of each corner.
    pub original_vertices: [u32; 3],
    /// Corner vertex ids in winding order.
    pub vertex_ids: [u32; 3],
    /// Edge ids aligned with the corner pairs.
    pub edge_ids: [u32; 3],
}

/// All records of one graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphRecords {
    /// Vertex records, in handle order.
    pub vertices: Vec<VertexRecord>,
    /// Edge records, in handle order.
    pub edges: Vec<EdgeRecord>,
    /// Triangle records, in handle order.
    pub triangles: Vec<TriangleRecord>,
}

impl GraphRecords {
    /// Total number of records.
    pub fn len(&self) -> usize {
        self.vertices.len() + self.edges.len() + self.triangles.len()
    }

    /// Whether there are no records at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn to_array(p: &Point3<f64>) -> [f64; 3] {
    [p.x, p.y, p.z]
}

fn to_point(a: &[f64; 3]) -> Point3<f64> {
    Point3::new(a[0], a[1], a[2])
}

impl MeshGraph {
    /// Flatten the graph into id-based records.
    pub fn to_records(&self) -> GraphRecords {
        let vid = |v: VertexId| self.vertex(v).id.get();
        let eid = |e: EdgeId| self.edge(e).id.get();
        let tid = |t: TriangleId| self.triangle(t).id.get();

        let vertices = self
            .vertices
            .iter()
            .map(|v| VertexRecord {
                id: v.id.get(),
                index: v.index,
                position: to_array(&v.position),
                edge_ids: v.edges.iter().map(|&e| eid(e)).collect(),
                triangle_ids: v.triangles.iter().map(|&t| tid(t)).collect(),
            })
            .collect();

        let edges = self
            .edges
            .iter()
            .map(|e| EdgeRecord {
                id: e.id.get(),
                position: to_array(&e.position),
                vertex_ids: e.vertices.map(vid),
                triangle_ids: [tid(e.first), e.second.map_or(0, tid)],
            })
            .collect();

        let triangles = self
            .triangles
            .iter()
            .map(|t| TriangleRecord {
                id: t.id.get(),
                position: to_array(&t.position),
                original_vertices: t.original_vertices,
                vertex_ids: t.vertices.map(vid),
                edge_ids: t.edges.map(eid),
            })
            .collect();

        GraphRecords {
            vertices,
            edges,
            triangles,
        }
    }

    /// Rebuild a graph from records.
    ///
    /// Nodes are first allocated by id, then every reference is resolved
    /// against the completed id table. Fails on id 0, duplicate ids,
    /// references to missing or wrong-kind nodes, and on any broken
    /// topological invariant.
    pub fn from_records(records: &GraphRecords) -> Result<Self> {
        // Pass 1: assign a slot to every id.
        let mut table: HashMap<u32, NodeRef> = HashMap::with_capacity(records.len());
        let mut register = |kind: &'static str, id: u32, node: NodeRef| -> Result<NodeId> {
            let node_id = NodeId::new(id).ok_or_else(|| GraphError::invalid_record(kind, id, "id 0 is reserved"))?;
            if let Some(existing) = table.insert(id, node) {
                return Err(GraphError::invalid_record(
                    kind,
                    id,
                    format!("id already used by {} {:?}", existing.kind(), existing),
                ));
            }
            Ok(node_id)
        };

        let vertex_ids = records
            .vertices
            .iter()
            .enumerate()
            .map(|(i, r)| register("vertex", r.id, VertexId::new(i).into()))
            .collect::<Result<Vec<_>>>()?;
        let edge_ids = records
            .edges
            .iter()
            .enumerate()
            .map(|(i, r)| register("edge", r.id, EdgeId::new(i).into()))
            .collect::<Result<Vec<_>>>()?;
        let triangle_ids = records
            .triangles
            .iter()
            .enumerate()
            .map(|(i, r)| register("triangle", r.id, TriangleId::new(i).into()))
            .collect::<Result<Vec<_>>>()?;

        // Pass 2: resolve references.
        let resolver = Resolver { table: &table };
        let mut graph = MeshGraph::with_capacity(records.vertices.len(), records.triangles.len());

        for (r, id) in records.vertices.iter().zip(vertex_ids) {
            let mut vertex = Vertex::new(id, r.index, to_point(&r.position));
            vertex.edges = r
                .edge_ids
                .iter()
                .map(|&e| resolver.edge("vertex", r.id, e))
                .collect::<Result<_>>()?;
            vertex.triangles = r
                .triangle_ids
                .iter()
                .map(|&t| resolver.triangle("vertex", r.id, t))
                .collect::<Result<_>>()?;
            graph.vertices.push(vertex);
        }

        for (r, id) in records.edges.iter().zip(edge_ids) {
            let vertices = [
                resolver.vertex("edge", r.id, r.vertex_ids[0])?,
                resolver.vertex("edge", r.id, r.vertex_ids[1])?,
            ];
            let first = resolver.triangle("edge", r.id, r.triangle_ids[0])?;
            let mut edge = Edge::new(id, vertices, first);
            edge.position = to_point(&r.position);
            edge.second = match r.triangle_ids[1] {
                0 => None,
                t => Some(resolver.triangle("edge", r.id, t)?),
            };
            graph.edges.push(edge);
        }

        for (r, id) in records.triangles.iter().zip(triangle_ids) {
            let vertices = [
                resolver.vertex("triangle", r.id, r.vertex_ids[0])?,
                resolver.vertex("triangle", r.id, r.vertex_ids[1])?,
                resolver.vertex("triangle", r.id, r.vertex_ids[2])?,
            ];
            let mut triangle = Triangle::new(id, vertices, r.original_vertices);
            triangle.position = to_point(&r.position);
            triangle.edges = [
                resolver.edge("triangle", r.id, r.edge_ids[0])?,
                resolver.edge("triangle", r.id, r.edge_ids[1])?,
                resolver.edge("triangle", r.id, r.edge_ids[2])?,
            ];
            graph.triangles.push(triangle);
        }

        graph.index_ids();
        graph.validate()?;

        log::debug!(
            "restored graph from {} records ({} vertices, {} edges, {} triangles)",
            records.len(),
            graph.num_vertices(),
            graph.num_edges(),
            graph.num_triangles()
        );

        Ok(graph)
    }
}

/// Id-to-handle resolution for the second restore pass.
struct Resolver<'a> {
    table: &'a HashMap<u32, NodeRef>,
}

impl Resolver<'_> {
    fn lookup(&self, kind: &'static str, owner: u32, target: &str, id: u32) -> Result<NodeRef> {
        if id == 0 {
            return Err(GraphError::invalid_record(kind, owner, format!("missing {target} reference")));
        }
        self.table
            .get(&id)
            .copied()
            .ok_or_else(|| GraphError::invalid_record(kind, owner, format!("dangling {target} reference {id}")))
    }

    fn wrong_kind(kind: &'static str, owner: u32, target: &str, found: NodeRef) -> GraphError {
        GraphError::invalid_record(kind, owner, format!("expected a {target} reference, found {found:?}"))
    }

    fn vertex(&self, kind: &'static str, owner: u32, id: u32) -> Result<VertexId> {
        match self.lookup(kind, owner, "vertex", id)? {
            NodeRef::Vertex(v) => Ok(v),
            other => Err(Self::wrong_kind(kind, owner, "vertex", other)),
        }
    }

    fn edge(&self, kind: &'static str, owner: u32, id: u32) -> Result<EdgeId> {
        match self.lookup(kind, owner, "edge", id)? {
            NodeRef::Edge(e) => Ok(e),
            other => Err(Self::wrong_kind(kind, owner, "edge", other)),
        }
    }

    fn triangle(&self, kind: &'static str, owner: u32, id: u32) -> Result<TriangleId> {
        match self.lookup(kind, owner, "triangle", id)? {
            NodeRef::Triangle(t) => Ok(t),
            other => Err(Self::wrong_kind(kind, owner, "triangle", other)),
        }
    }
}

/// Encode a graph as pretty-printed JSON records.
pub fn to_json(graph: &MeshGraph) -> Result<String> {
    Ok(serde_json::to_string_pretty(&graph.to_records())?)
}

/// Decode a graph from JSON records.
pub fn from_json(json: &str) -> Result<MeshGraph> {
    let records: GraphRecords = serde_json::from_str(json)?;
    MeshGraph::from_records(&records)
}

/// Write a graph's records to a JSON file.
///
/// # Example
///
/// ```no_run
/// use meshgraph::io::records;
///
/// let graph = meshgraph::io::load("model.stl").unwrap();
/// records::save(&graph, "model.graph.json").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(graph: &MeshGraph, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &graph.to_records())?;
    writer.flush()?;
    log::info!("wrote {} node records to {}", graph.num_nodes(), path.display());
    Ok(())
}

/// Read a graph from a JSON records file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<MeshGraph> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let records: GraphRecords = serde_json::from_reader(reader)?;
    MeshGraph::from_records(&records)
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

    fn tetrahedron() -> MeshGraph {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        build(&positions, &[0, 2, 1, 0, 1, 3, 1, 2, 3, 2, 0, 3]).unwrap()
    }

    #[test]
    fn test_records_shape() {
        let graph = unit_square();
        let records = graph.to_records();

        assert_eq!(records.vertices.len(), 4);
        assert_eq!(records.edges.len(), 5);
        assert_eq!(records.triangles.len(), 2);

        // Exactly one interior edge
        let interior = records.edges.iter().filter(|e| e.triangle_ids[1] != 0).count();
        assert_eq!(interior, 1);

        for r in &records.vertices {
            assert_ne!(r.id, 0);
        }
    }

    #[test]
    fn test_round_trip_preserves_ids_and_adjacency() {
        for graph in [unit_square(), tetrahedron()] {
            let records = graph.to_records();
            let restored = MeshGraph::from_records(&records).unwrap();

            assert_eq!(restored.to_records(), records);
            for v in graph.vertex_ids() {
                let id = graph.vertex(v).id();
                assert_eq!(restored.find(id), Some(NodeRef::Vertex(v)));
                assert_eq!(
                    restored.neighbors(v.into()),
                    graph.neighbors(v.into())
                );
            }
            for e in graph.edge_ids() {
                assert_eq!(restored.edge_normal(e), graph.edge_normal(e));
            }
        }
    }

    #[test]
    fn test_json_round_trip() {
        let graph = tetrahedron();
        let json = to_json(&graph).unwrap();
        assert!(json.contains("\"triangleIds\""));
        assert!(json.contains("\"originalVertices\""));

        let restored = from_json(&json).unwrap();
        assert_eq!(restored.to_records(), graph.to_records());
    }

    #[test]
    fn test_save_and_load() {
        let graph = unit_square();
        let path = std::env::temp_dir().join(format!("meshgraph-records-{}.json", std::process::id()));

        save(&graph, &path).unwrap();
        let restored = load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(restored.to_records(), graph.to_records());
    }

    #[test]
    fn test_rejects_id_zero() {
        let mut records = unit_square().to_records();
        records.vertices[0].id = 0;

        let err = MeshGraph::from_records(&records).unwrap_err();
        assert!(matches!(err, GraphError::InvalidRecord { kind: "vertex", id: 0, .. }));
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let mut records = unit_square().to_records();
        records.triangles[1].id = records.edges[0].id;

        let err = MeshGraph::from_records(&records).unwrap_err();
        assert!(matches!(err, GraphError::InvalidRecord { kind: "triangle", .. }));
    }

    #[test]
    fn test_rejects_dangling_reference() {
        let mut records = unit_square().to_records();
        records.edges[0].vertex_ids[1] = 999;

        let err = MeshGraph::from_records(&records).unwrap_err();
        assert!(err.to_string().contains("dangling vertex reference 999"));
    }

    #[test]
    fn test_rejects_wrong_kind_reference() {
        let mut records = unit_square().to_records();
        let edge_id = records.edges[0].id;
        records.triangles[0].vertex_ids[0] = edge_id;

        let err = MeshGraph::from_records(&records).unwrap_err();
        assert!(err.to_string().contains("expected a vertex reference"));
    }

    #[test]
    fn test_rejects_missing_first_triangle() {
        let mut records = unit_square().to_records();
        records.edges[2].triangle_ids = [0, 0];

        let err = MeshGraph::from_records(&records).unwrap_err();
        assert!(err.to_string().contains("missing triangle reference"));
    }

    #[test]
    fn test_rejects_inconsistent_topology() {
        let mut records = unit_square().to_records();
        // Vertex claims an edge that does not use it
        let foreign = records
            .edges
            .iter()
            .find(|e| !e.vertex_ids.contains(&records.vertices[0].id))
            .map(|e| e.id)
            .unwrap();
        records.vertices[0].edge_ids.push(foreign);

        let err = MeshGraph::from_records(&records).unwrap_err();
        assert!(matches!(err, GraphError::InvalidState(_)));
    }

    #[test]
    fn test_round_trip_with_unused_position() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(5.0, 5.0, 5.0),
        ];
        let graph = build(&positions, &[0, 1, 2]).unwrap();
        let records = graph.to_records();
        assert!(records.vertices[3].edge_ids.is_empty());

        let restored = MeshGraph::from_records(&records).unwrap();
        assert_eq!(restored.num_vertices(), 4);
        assert_eq!(restored.to_records(), records);

        let json = to_json(&graph).unwrap();
        assert_eq!(from_json(&json).unwrap().to_records(), records);
    }

    #[test]
    fn test_empty_records() {
        let graph = MeshGraph::from_records(&GraphRecords::default()).unwrap();
        assert_eq!(graph.num_vertices(), 0);
        assert!(GraphRecords::default().is_empty());
    }
}
