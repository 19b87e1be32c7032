//! Geometry kernel.
//!
//! Stateless vector and rotation helpers shared by the graph queries. All
//! "equal" and "contains" predicates use the shared tolerance [`EPSILON`].
//!
//! Triangle normals follow the winding of the corners:
//! `cross(v1 - v0, v2 - v0)`, normalized. Vertex and edge normals are built
//! from these, so the convention must not change.
//!
//! # Example
//!
//! ```
//! use meshgraph::geometry::{point_in_triangle, triangle_normal};
//! use nalgebra::Point3;
//!
//! let a = Point3::new(0.0, 0.0, 0.0);
//! let b = Point3::new(1.0, 0.0, 0.0);
//! let c = Point3::new(0.0, 1.0, 0.0);
//!
//! assert!((triangle_normal(&a, &b, &c).z - 1.0).abs() < 1e-12);
//! assert!(point_in_triangle(&Point3::new(0.25, 0.25, 0.0), &a, &b, &c));
//! assert!(!point_in_triangle(&Point3::new(0.25, 0.25, 1.0), &a, &b, &c));
//! ```

use std::f64::consts::PI;

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

/// Tolerance used by every containment and proximity predicate.
pub const EPSILON: f64 = 0.001;

/// Minimum length of the summed edge-side cross products for a point to be
/// inside a triangle. Inside points sum to 3, points outside to at most ~2.
const INSIDE_CROSS_SUM: f64 = 2.5;

/// Normalize a vector, mapping the zero vector to itself.
#[inline]
pub fn normalize_or_zero(v: &Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(0.0).unwrap_or_else(Vector3::zeros)
}

/// Project `v` onto the direction of `onto`. Projecting onto a zero vector yields zero.
#[inline]
pub fn project(v: &Vector3<f64>, onto: &Vector3<f64>) -> Vector3<f64> {
    let len_sq = onto.norm_squared();
    if len_sq == 0.0 {
        return Vector3::zeros();
    }
    onto * (v.dot(onto) / len_sq)
}

/// Remove the component of `v` along `normal`. A zero normal leaves `v` unchanged.
#[inline]
pub fn project_on_plane(v: &Vector3<f64>, normal: &Vector3<f64>) -> Vector3<f64> {
    v - project(v, normal)
}

/// Project a point onto the infinite line through `line_origin` along `line_direction`.
///
/// The direction does not need to be normalized.
pub fn project_on_line(
    point: &Point3<f64>,
    line_direction: &Vector3<f64>,
    line_origin: &Point3<f64>,
) -> Point3<f64> {
    line_origin + project(&(point - line_origin), line_direction)
}

/// Shortest distance between a point and the infinite line through `line_point` along `line_direction`.
pub fn distance_from_line(
    point: &Point3<f64>,
    line_direction: &Vector3<f64>,
    line_point: &Point3<f64>,
) -> f64 {
    (project_on_line(point, line_direction, line_point) - point).norm()
}

/// Unit normal of the triangle `(v0, v1, v2)`; zero for a degenerate triangle.
pub fn triangle_normal(v0: &Point3<f64>, v1: &Point3<f64>, v2: &Point3<f64>) -> Vector3<f64> {
    normalize_or_zero(&(v1 - v0).cross(&(v2 - v0)))
}

/// Unit direction from `tail` to `head`.
pub fn edge_direction(tail: &Point3<f64>, head: &Point3<f64>) -> Vector3<f64> {
    normalize_or_zero(&(head - tail))
}

/// Test whether a point lies inside a triangle.
///
/// The point must be within [`EPSILON`] of the triangle's plane. It is then
/// inside when the three normalized cross products of consecutive corner
/// offsets all point the same way (their sum is longer than 2.5). Points
/// within [`EPSILON`] of a corner are accepted. Other points exactly on an
/// edge are not guaranteed either way.
pub fn point_in_triangle(
    point: &Point3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> bool {
    let normal = triangle_normal(v0, v1, v2);

    let in_plane = v0 + project_on_plane(&(point - v0), &normal);
    if (in_plane - point).norm() >= EPSILON {
        return false;
    }

    if [v0, v1, v2].iter().any(|v| (*v - point).norm() < EPSILON) {
        return true;
    }

    let (a, b, c) = (v0 - point, v1 - point, v2 - point);
    let cross_sum = normalize_or_zero(&a.cross(&b))
        + normalize_or_zero(&b.cross(&c))
        + normalize_or_zero(&c.cross(&a));

    cross_sum.norm() > INSIDE_CROSS_SUM
}

/// Test whether a point lies on the segment `v0`–`v1`.
///
/// The point must be within [`EPSILON`] of the segment's line and between
/// the endpoints (inclusive).
pub fn point_in_edge(point: &Point3<f64>, v0: &Point3<f64>, v1: &Point3<f64>) -> bool {
    let on_line = project_on_line(point, &(v1 - v0), v0);
    if (on_line - point).norm() >= EPSILON {
        return false;
    }

    (v0 - point).dot(&(v1 - point)) <= 0.0
}

/// Like [`point_in_edge`], but also accepts points within [`EPSILON`] of an
/// endpoint when the between-endpoints test fails.
pub fn edge_contains_point(point: &Point3<f64>, tail: &Point3<f64>, head: &Point3<f64>) -> bool {
    let on_line = project_on_line(point, &edge_direction(tail, head), tail);
    if (on_line - point).norm() > EPSILON {
        return false;
    }

    let tail_to_point = point - tail;
    let head_to_point = point - head;
    if tail_to_point.dot(&head_to_point) < 0.0 {
        return true;
    }

    tail_to_point.norm() < EPSILON || head_to_point.norm() < EPSILON
}

/// Shortest-arc rotation taking the direction of `from` to the direction of `to`.
///
/// Anti-parallel inputs rotate by π about an axis perpendicular to `from`.
/// A zero input yields the identity.
pub fn rotation_between(from: &Vector3<f64>, to: &Vector3<f64>) -> UnitQuaternion<f64> {
    if from.norm_squared() == 0.0 || to.norm_squared() == 0.0 {
        return UnitQuaternion::identity();
    }

    UnitQuaternion::rotation_between(from, to)
        .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&any_perpendicular(from), PI))
}

fn any_perpendicular(v: &Vector3<f64>) -> Unit<Vector3<f64>> {
    let (x, y, z) = (v.x.abs(), v.y.abs(), v.z.abs());
    let other = if x <= y && x <= z {
        Vector3::x()
    } else if y <= z {
        Vector3::y()
    } else {
        Vector3::z()
    };
    Unit::new_normalize(v.cross(&other))
}

/// Bisector of two unit normals, found by rotating `a` half way towards `b`.
///
/// Equal normals return `a`. Anti-parallel normals have no rotation axis and
/// also return `a`.
pub fn fold_normal(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    let angle = a.angle(b);
    match Unit::try_new(a.cross(b), 0.0) {
        Some(axis) => {
            let half = UnitQuaternion::from_axis_angle(&axis, 0.5 * angle);
            normalize_or_zero(&half.transform_vector(a))
        }
        None => normalize_or_zero(a),
    }
}

/// Rotation that maps the tail-relative edge/point system into a canonical frame.
///
/// Applied to `head - tail` the result points along +X; applied to
/// `point - tail` the result lies in the negative-Y half plane.
pub fn edge_basis_rotation(
    tail: &Point3<f64>,
    head: &Point3<f64>,
    point: &Point3<f64>,
) -> UnitQuaternion<f64> {
    let offset = point - tail;
    let edge = head - tail;

    // Direction from the point to its foot on the edge line becomes +Y.
    let to_edge = project(&offset, &edge) - offset;
    let up = rotation_between(&to_edge, &Vector3::y());

    // The edge is now perpendicular to Y; spin about Y until it lies on +X.
    let edge_up = up * edge;
    let spin = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), edge_up.z.atan2(edge_up.x));

    spin * up
}

/// Elastic reflection of a velocity off a wall with the given normal.
///
/// The component along the normal flips; the tangential component is kept.
/// The normal does not need to be unit length. A zero normal returns the
/// velocity unchanged.
pub fn bounce_velocity(velocity: &Vector3<f64>, wall_normal: &Vector3<f64>) -> Vector3<f64> {
    let tangent = project_on_plane(velocity, wall_normal);
    let perpendicular = velocity - tangent;
    tangent - perpendicular
}
