//! Primitive collision shapes and intersection algorithms
//!
//! Provides basic geometric primitives (segments, rays, spheres, triangles)
//! with the per-triangle tests the mesh and terrain queries are built from.

use crate::foundation::math::constants::{
    BARYCENTRIC_TOLERANCE, DEGENERATE_AREA_SQ, PARALLEL_EPSILON,
};
use crate::foundation::math::Vec3;

/// A finite segment parameterized by `t` in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Point at `t = 0`
    pub start: Vec3,
    /// Point at `t = 1`
    pub end: Vec3,
}

impl Segment {
    /// Creates a new segment
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// `end - start`
    pub fn delta(&self) -> Vec3 {
        self.end - self.start
    }

    /// Length of the segment
    pub fn length(&self) -> f32 {
        self.delta().norm()
    }

    /// Point at parameter `t`
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.start + self.delta() * t
    }
}

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl Sphere {
    /// Creates a new sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        debug_assert!(radius > 0.0, "sphere radius must be positive, got {radius}");
        Self { center, radius }
    }

    /// Segment traced by the center when moved by `displacement`
    pub fn motion(&self, displacement: Vec3) -> Segment {
        Segment::new(self.center, self.center + displacement)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// An inverted box that grows to fit the first point added to it
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::INFINITY),
            max: Vec3::repeat(f32::NEG_INFINITY),
        }
    }

    /// Box spanning both endpoints of a segment
    pub fn from_segment(segment: &Segment) -> Self {
        Self {
            min: segment.start.inf(&segment.end),
            max: segment.start.sup(&segment.end),
        }
    }

    /// Grow to contain `point`
    pub fn include(&mut self, point: Vec3) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }

    /// Box grown by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec3::repeat(margin),
            max: self.max + Vec3::repeat(margin),
        }
    }

    /// Whether the boxes overlap (touching counts)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

/// Where and how a query met a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Parameter of the hit along the query (segment `t`, ray distance, or sweep fraction)
    pub t: f32,
    /// Contact point on the surface
    pub point: Vec3,
    /// Unit surface normal at the contact
    pub normal: Vec3,
}

/// Closest point on a surface to some query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    /// Closest point on the surface
    pub point: Vec3,
    /// Normal of the triangle that produced `point`
    pub normal: Vec3,
    /// Euclidean distance from the query point to `point`
    pub distance: f32,
}

/// A world-space triangle with a precomputed unit normal
///
/// Only constructible through [`Triangle::try_new`], which rejects zero-area
/// input, so `normal` is always finite and unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    a: Vec3,
    b: Vec3,
    c: Vec3,
    normal: Vec3,
}

impl Triangle {
    /// Build a triangle, or `None` when it has (near) zero area
    pub fn try_new(a: Vec3, b: Vec3, c: Vec3) -> Option<Self> {
        let cross = (b - a).cross(&(c - a));
        let length_sq = cross.norm_squared();

        // Also rejects NaN input
        if !(length_sq > DEGENERATE_AREA_SQ) || !length_sq.is_finite() {
            return None;
        }

        Some(Self {
            a,
            b,
            c,
            normal: cross / length_sq.sqrt(),
        })
    }

    /// First vertex
    pub fn a(&self) -> Vec3 {
        self.a
    }

    /// Second vertex
    pub fn b(&self) -> Vec3 {
        self.b
    }

    /// Third vertex
    pub fn c(&self) -> Vec3 {
        self.c
    }

    /// Vertices in winding order
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }

    /// Unit normal, `normalize((b - a) x (c - a))`
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Signed distance from the triangle's plane to `point`
    pub fn signed_distance(&self, point: &Vec3) -> f32 {
        self.normal.dot(&(point - self.a))
    }

    /// Orthogonal projection of `point` onto the triangle's plane
    pub fn project_onto_plane(&self, point: &Vec3) -> Vec3 {
        point - self.normal * self.signed_distance(point)
    }

    /// Barycentric coordinates `(u, v, w)` of `point` with respect to `(a, b, c)`
    ///
    /// `point` is assumed to lie in the triangle's plane.
    pub fn barycentric(&self, point: &Vec3) -> (f32, f32, f32) {
        let v0 = self.b - self.a;
        let v1 = self.c - self.a;
        let v2 = point - self.a;

        let d00 = v0.dot(&v0);
        let d01 = v0.dot(&v1);
        let d11 = v1.dot(&v1);
        let d20 = v2.dot(&v0);
        let d21 = v2.dot(&v1);

        let denom = d00 * d11 - d01 * d01;
        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        (1.0 - v - w, v, w)
    }

    /// Whether an in-plane point lies inside the triangle, edges included
    pub fn contains_point(&self, point: &Vec3) -> bool {
        let (u, v, w) = self.barycentric(point);
        u >= -BARYCENTRIC_TOLERANCE && v >= -BARYCENTRIC_TOLERANCE && w >= -BARYCENTRIC_TOLERANCE
    }

    /// Point on the triangle closest to `point`
    ///
    /// Projects onto the plane and keeps the projection when its barycentric
    /// coordinates are all inside `[0, 1]`. Otherwise the point lies in an
    /// edge or vertex region and is resolved by the region tests from
    /// Ericson, *Real-Time Collision Detection* 5.1.5.
    pub fn closest_point(&self, point: &Vec3) -> Vec3 {
        let projected = self.project_onto_plane(point);
        let (u, v, w) = self.barycentric(&projected);
        if (0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v) && (0.0..=1.0).contains(&w) {
            return projected;
        }

        let ab = self.b - self.a;
        let ac = self.c - self.a;

        // Vertex region outside a
        let ap = point - self.a;
        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return self.a;
        }

        // Vertex region outside b
        let bp = point - self.b;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return self.b;
        }

        // Edge region ab
        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            return self.a + ab * (d1 / (d1 - d3));
        }

        // Vertex region outside c
        let cp = point - self.c;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return self.c;
        }

        // Edge region ac
        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            return self.a + ac * (d2 / (d2 - d6));
        }

        // Edge region bc
        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            return self.b + (self.c - self.b) * ((d4 - d3) / ((d4 - d3) + (d5 - d6)));
        }

        // Numerically inside after all
        let denom = 1.0 / (va + vb + vc);
        self.a + ab * (vb * denom) + ac * (vc * denom)
    }

    /// Segment vs triangle
    ///
    /// Solves the segment against the triangle's plane and keeps the crossing
    /// when `t` is in `[0, 1]` and the crossing point is inside the triangle.
    /// The returned point is snapped onto the plane.
    pub fn intersect_segment(&self, segment: &Segment) -> Option<SurfaceHit> {
        let delta = segment.delta();
        let denom = self.normal.dot(&delta);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = self.normal.dot(&(self.a - segment.start)) / denom;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }

        let point = self.project_onto_plane(&segment.point_at(t));
        if !self.contains_point(&point) {
            return None;
        }

        Some(SurfaceHit {
            t,
            point,
            normal: self.normal,
        })
    }

    /// Möller-Trumbore ray-triangle intersection
    ///
    /// Returns the distance along the ray, which is `t` for a normalized
    /// direction. Hits behind the origin are rejected; both faces count.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        const EPSILON: f32 = 0.000_001;

        let edge1 = self.b - self.a;
        let edge2 = self.c - self.a;

        let h = ray.direction.cross(&edge2);
        let det = edge1.dot(&h);

        // Ray parallel to triangle
        if det.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / det;
        let s = ray.origin - self.a;
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * ray.direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);
        (t >= 0.0).then_some(t)
    }

    /// Swept sphere vs triangle
    ///
    /// A sphere of `radius` whose center travels along `motion`. Returns the
    /// earliest fraction of the motion at which the sphere touches the
    /// triangle, the contact point on the triangle and the contact normal
    /// (pointing from the contact toward the center at impact).
    ///
    /// Conceptually the center segment is tested against the triangle inflated
    /// by `radius`: first the face offset along the normal, then the edge
    /// capsules and vertex spheres. A sphere already touching the triangle and
    /// moving further into it reports `t = 0`; one touching but moving away or
    /// along the surface reports nothing.
    pub fn sweep_sphere(&self, radius: f32, motion: &Segment) -> Option<SurfaceHit> {
        let delta = motion.delta();

        let closest = self.closest_point(&motion.start);
        let offset = motion.start - closest;
        if offset.norm_squared() <= radius * radius {
            let normal = offset
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(|| self.facing_normal(&motion.start));
            return (delta.dot(&normal) < 0.0).then_some(SurfaceHit {
                t: 0.0,
                point: closest,
                normal,
            });
        }

        if let Some(hit) = self.sweep_face(radius, motion) {
            // An edge lies in the plane, so nothing on the boundary can be
            // touched before the face itself.
            return Some(hit);
        }

        let [a, b, c] = self.vertices();
        let mut best: Option<SurfaceHit> = None;
        let edge_hits = [(a, b), (b, c), (c, a)]
            .into_iter()
            .filter_map(|(p, q)| sweep_sphere_edge(radius, motion, p, q));
        let vertex_hits = [a, b, c]
            .into_iter()
            .filter_map(|v| sweep_sphere_point(radius, motion, v));

        for hit in edge_hits.chain(vertex_hits) {
            if best.map_or(true, |current| hit.t < current.t) {
                best = Some(hit);
            }
        }
        best
    }

    /// Normal oriented toward the side of the plane `point` is on
    fn facing_normal(&self, point: &Vec3) -> Vec3 {
        if self.signed_distance(point) >= 0.0 {
            self.normal
        } else {
            -self.normal
        }
    }

    fn sweep_face(&self, radius: f32, motion: &Segment) -> Option<SurfaceHit> {
        let normal = self.facing_normal(&motion.start);
        let start_distance = normal.dot(&(motion.start - self.a));
        if start_distance < radius {
            return None;
        }

        let approach = normal.dot(&motion.delta());
        if approach > -PARALLEL_EPSILON {
            return None;
        }

        let t = (start_distance - radius) / -approach;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }

        let contact = self.project_onto_plane(&motion.point_at(t));
        self.contains_point(&contact).then_some(SurfaceHit {
            t,
            point: contact,
            normal,
        })
    }
}

/// Earliest time a moving sphere touches the segment `p..q` (capsule test)
fn sweep_sphere_edge(radius: f32, motion: &Segment, p: Vec3, q: Vec3) -> Option<SurfaceHit> {
    let delta = motion.delta();
    let edge = q - p;
    let m = motion.start - p;

    let ee = edge.dot(&edge);
    let me = m.dot(&edge);
    let de = delta.dot(&edge);

    let a = ee * delta.dot(&delta) - de * de;
    if a.abs() < PARALLEL_EPSILON {
        // Moving parallel to the edge; only its endpoints can be met
        return None;
    }
    let b = ee * m.dot(&delta) - de * me;
    let c = ee * (m.dot(&m) - radius * radius) - me * me;

    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / a;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    let s = (me + t * de) / ee;
    if !(0.0..=1.0).contains(&s) {
        return None;
    }

    let contact = p + edge * s;
    let center = motion.point_at(t);
    let normal = (center - contact).try_normalize(f32::EPSILON)?;
    Some(SurfaceHit {
        t,
        point: contact,
        normal,
    })
}

/// Earliest time a moving sphere touches a single point
fn sweep_sphere_point(radius: f32, motion: &Segment, vertex: Vec3) -> Option<SurfaceHit> {
    let delta = motion.delta();
    let m = motion.start - vertex;

    let a = delta.dot(&delta);
    let b = m.dot(&delta);
    let c = m.dot(&m) - radius * radius;

    // Moving away, or not moving
    if b >= 0.0 || a <= 0.0 {
        return None;
    }

    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / a;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    let center = motion.point_at(t);
    let normal = (center - vertex).try_normalize(f32::EPSILON)?;
    Some(SurfaceHit {
        t,
        point: vertex,
        normal,
    })
}
