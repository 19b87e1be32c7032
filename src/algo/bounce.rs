//! Specular bounce off graph nodes.
//!
//! Each function reflects a velocity off the local wall normal of one node:
//! the triangle normal, the edge fold normal or the averaged vertex normal.
//! The bounce is elastic and instantaneous. Positions are not touched.

use nalgebra::Vector3;

use crate::geometry::bounce_velocity;
use crate::graph::{EdgeId, MeshGraph, NodeRef, TriangleId, VertexId};

/// Reflect `velocity` off the plane of triangle `t`.
pub fn bounce_off_triangle(graph: &MeshGraph, t: TriangleId, velocity: &Vector3<f64>) -> Vector3<f64> {
    bounce_velocity(velocity, &graph.triangle_normal(t))
}

/// Reflect `velocity` off edge `e`, using its fold normal.
pub fn bounce_off_edge(graph: &MeshGraph, e: EdgeId, velocity: &Vector3<f64>) -> Vector3<f64> {
    bounce_velocity(velocity, &graph.edge_normal(e))
}

/// Reflect `velocity` off vertex `v`, using its averaged normal.
///
/// A vertex whose adjacent normals cancel out has no normal; the velocity is
/// then returned unchanged.
pub fn bounce_off_vertex(graph: &MeshGraph, v: VertexId, velocity: &Vector3<f64>) -> Vector3<f64> {
    bounce_velocity(velocity, &graph.vertex_normal(v))
}

/// Reflect `velocity` off any node.
pub fn bounce_off(graph: &MeshGraph, node: NodeRef, velocity: &Vector3<f64>) -> Vector3<f64> {
    match node {
        NodeRef::Vertex(v) => bounce_off_vertex(graph, v, velocity),
        NodeRef::Edge(e) => bounce_off_edge(graph, e, velocity),
        NodeRef::Triangle(t) => bounce_off_triangle(graph, t, velocity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build;
    use nalgebra::Point3;

    const TOL: f64 = 1e-10;

    fn create_floor() -> MeshGraph {
        // Unit square in the XY plane, normals along +Z
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build(&positions, &[0, 1, 2, 0, 2, 3]).unwrap()
    }

    /// Two triangles folded 90 degrees along the x axis.
    fn create_fold() -> MeshGraph {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        // Normals: +Z for the first, +Y for the second
        build(&positions, &[0, 1, 2, 0, 3, 1]).unwrap()
    }

    #[test]
    fn test_bounce_off_triangle_flips_normal_component() {
        let graph = create_floor();
        let v = Vector3::new(1.0, 2.0, -3.0);
        let out = bounce_off_triangle(&graph, TriangleId::new(0), &v);
        assert!((out - Vector3::new(1.0, 2.0, 3.0)).norm() < TOL);
    }

    #[test]
    fn test_bounce_preserves_speed() {
        let graph = create_fold();
        let v = Vector3::new(0.3, -0.7, -0.2);
        for e in graph.edge_ids() {
            let out = bounce_off_edge(&graph, e, &v);
            assert!((out.norm() - v.norm()).abs() < TOL);
        }
    }

    #[test]
    fn test_bounce_off_fold_edge() {
        let graph = create_fold();
        let diagonal = graph
            .edge_ids()
            .find(|&e| !graph.edge(e).is_boundary())
            .unwrap();

        // Fold normal is the bisector of +Y and +Z
        let n = Vector3::new(0.0, 1.0, 1.0).normalize();
        assert!((graph.edge_normal(diagonal) - n).norm() < 1e-9);

        let v = -n * 2.0;
        let out = bounce_off_edge(&graph, diagonal, &v);
        assert!((out - n * 2.0).norm() < 1e-9);
    }

    #[test]
    fn test_bounce_off_vertex_uses_average_normal() {
        let graph = create_floor();
        let v = Vector3::new(0.0, 0.0, -1.0);
        let out = bounce_off_vertex(&graph, VertexId::new(0), &v);
        assert!((out - Vector3::new(0.0, 0.0, 1.0)).norm() < TOL);
    }

    #[test]
    fn test_bounce_off_vertex_without_normal() {
        // Two triangles sharing an edge, wound in opposite directions over
        // the same plane: their normals cancel at the shared vertices.
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let graph = build(&positions, &[0, 1, 2, 1, 0, 3]).unwrap();
        assert_eq!(graph.vertex_normal(VertexId::new(0)), Vector3::zeros());

        let v = Vector3::new(0.5, -1.0, 2.0);
        assert_eq!(bounce_off_vertex(&graph, VertexId::new(0), &v), v);
    }

    #[test]
    fn test_bounce_off_dispatch() {
        let graph = create_floor();
        let v = Vector3::new(0.0, 1.0, -1.0);
        let t = TriangleId::new(1);
        assert_eq!(
            bounce_off(&graph, NodeRef::Triangle(t), &v),
            bounce_off_triangle(&graph, t, &v)
        );
    }
}
