//! Triangle mesh collision geometry
//!
//! A [`TriangleMesh`] is one static terrain piece: an immutable list of
//! world-space triangles built once at load time. Every query is a linear
//! scan with a running minimum; ties keep the earlier triangle.

use crate::foundation::math::{transform_point, Mat4, Vec3};
use crate::ecs::Component;
use super::primitives::{Aabb, ClosestPoint, Ray, Segment, SurfaceHit, Triangle};

/// Immutable world-space triangle soup for one terrain piece
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    triangles: Vec<Triangle>,
    bounds: Aabb,
    skipped_degenerate: usize,
}

impl Component for TriangleMesh {}

impl TriangleMesh {
    /// Build from a flat position buffer (stride 3, three vertices per triangle)
    ///
    /// `model` is applied to every vertex; pass the identity when the buffer is
    /// already in world space. Trailing floats that do not complete a triangle
    /// are ignored and zero-area triangles are dropped.
    pub fn from_positions(positions: &[f32], model: &Mat4) -> Self {
        const FLOATS_PER_TRIANGLE: usize = 9;

        let remainder = positions.len() % FLOATS_PER_TRIANGLE;
        if remainder != 0 {
            log::warn!(
                "Position buffer of {} floats is not a whole number of triangles, ignoring last {}",
                positions.len(),
                remainder
            );
        }

        let vertex = |chunk: &[f32]| transform_point(model, Vec3::new(chunk[0], chunk[1], chunk[2]));
        let corners = positions
            .chunks_exact(FLOATS_PER_TRIANGLE)
            .map(|tri| [vertex(&tri[0..3]), vertex(&tri[3..6]), vertex(&tri[6..9])]);

        Self::build(corners)
    }

    /// Build from an unindexed vertex list, three vertices per triangle
    pub fn from_vertices(vertices: &[Vec3]) -> Self {
        Self::build(vertices.chunks_exact(3).map(|tri| [tri[0], tri[1], tri[2]]))
    }

    /// Build from already validated triangles
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        let mut bounds = Aabb::empty();
        for vertex in triangles.iter().flat_map(Triangle::vertices) {
            bounds.include(vertex);
        }

        Self {
            triangles,
            bounds,
            skipped_degenerate: 0,
        }
    }

    fn build(corners: impl Iterator<Item = [Vec3; 3]>) -> Self {
        let mut triangles = Vec::new();
        let mut skipped = 0;

        for [a, b, c] in corners {
            match Triangle::try_new(a, b, c) {
                Some(triangle) => triangles.push(triangle),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            log::debug!("Skipped {} degenerate triangles while building mesh", skipped);
        }

        let mut mesh = Self::from_triangles(triangles);
        mesh.skipped_degenerate = skipped;
        mesh
    }

    /// Triangles in build order
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of usable triangles
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the mesh has no usable triangles
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// How many input triangles were dropped for having zero area
    pub fn skipped_degenerate(&self) -> usize {
        self.skipped_degenerate
    }

    /// World-space bounds of all triangles
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Closest point on the mesh to `point`, or `None` for an empty mesh
    pub fn closest_point(&self, point: &Vec3) -> Option<ClosestPoint> {
        let mut best: Option<(f32, Vec3, Vec3)> = None;

        for triangle in &self.triangles {
            let candidate = triangle.closest_point(point);
            let distance_sq = (candidate - point).norm_squared();
            if best.map_or(true, |(best_sq, _, _)| distance_sq < best_sq) {
                best = Some((distance_sq, candidate, triangle.normal()));
            }
        }

        best.map(|(distance_sq, point, normal)| ClosestPoint {
            point,
            normal,
            distance: distance_sq.sqrt(),
        })
    }

    /// Earliest crossing of `segment` (smallest `t` going from start to end)
    pub fn intersect_segment(&self, segment: &Segment) -> Option<SurfaceHit> {
        if !self.bounds.intersects(&Aabb::from_segment(segment)) {
            return None;
        }

        earliest(self.triangles.iter().filter_map(|tri| tri.intersect_segment(segment)))
    }

    /// Nearest ray hit; `t` is the distance along the ray
    pub fn intersect_ray(&self, ray: &Ray) -> Option<SurfaceHit> {
        earliest(self.triangles.iter().filter_map(|tri| {
            tri.intersect_ray(ray).map(|t| SurfaceHit {
                t,
                point: ray.point_at(t),
                normal: tri.normal(),
            })
        }))
    }

    /// Earliest contact of a sphere of `radius` whose center moves along `motion`
    pub fn sweep_sphere(&self, radius: f32, motion: &Segment) -> Option<SurfaceHit> {
        self.sweep_sphere_where(radius, motion, |_| true)
    }

    /// Like [`Self::sweep_sphere`], but contacts rejected by `accept` are
    /// passed through as if the triangle were not there
    pub fn sweep_sphere_where(
        &self,
        radius: f32,
        motion: &Segment,
        accept: impl Fn(&SurfaceHit) -> bool,
    ) -> Option<SurfaceHit> {
        if !self
            .bounds
            .expanded(radius)
            .intersects(&Aabb::from_segment(motion))
        {
            return None;
        }

        earliest(
            self.triangles
                .iter()
                .filter_map(|tri| tri.sweep_sphere(radius, motion))
                .filter(|hit| accept(hit)),
        )
    }
}

/// Smallest-`t` hit, first one wins ties
fn earliest(hits: impl Iterator<Item = SurfaceHit>) -> Option<SurfaceHit> {
    hits.fold(None, |best: Option<SurfaceHit>, hit| match best {
        Some(current) if current.t <= hit.t => Some(current),
        _ => Some(hit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::Sphere;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn floor_positions(z: f32) -> Vec<f32> {
        vec![
            -10.0, -10.0, z, 10.0, -10.0, z, 10.0, 10.0, z,
            -10.0, -10.0, z, 10.0, 10.0, z, -10.0, 10.0, z,
        ]
    }

    fn floor(z: f32) -> TriangleMesh {
        TriangleMesh::from_positions(&floor_positions(z), &Mat4::identity())
    }

    #[test]
    fn test_from_positions_ignores_trailing_floats_and_degenerates() {
        let mut positions = floor_positions(0.0);
        // Zero-area triangle
        positions.extend_from_slice(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
        // Incomplete triangle
        positions.extend_from_slice(&[0.0, 0.0, 0.0, 1.0]);

        let mesh = TriangleMesh::from_positions(&positions, &Mat4::identity());
        assert_eq!(mesh.len(), 2);
        assert_eq!(mesh.skipped_degenerate(), 1);
        for triangle in mesh.triangles() {
            assert!(triangle.normal().iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn test_from_positions_applies_model_matrix() {
        let model = Mat4::new_translation(&Vec3::new(0.0, 0.0, 3.0));
        let mesh = TriangleMesh::from_positions(&floor_positions(0.0), &model);

        assert_relative_eq!(mesh.bounds().min.z, 3.0);
        assert_relative_eq!(mesh.bounds().max.z, 3.0);
        let closest = mesh.closest_point(&Vec3::new(1.0, 1.0, 10.0)).unwrap();
        assert_relative_eq!(closest.distance, 7.0, epsilon = 1e-5);
    }

    #[test]
    fn test_empty_mesh_returns_nothing() {
        let mesh = TriangleMesh::from_positions(&[], &Mat4::identity());
        assert!(mesh.is_empty());
        assert!(mesh.closest_point(&Vec3::zeros()).is_none());
        let segment = Segment::new(Vec3::z(), -Vec3::z());
        assert!(mesh.intersect_segment(&segment).is_none());
        assert!(mesh.sweep_sphere(0.5, &segment).is_none());
        assert!(mesh.intersect_ray(&Ray::new(Vec3::z(), -Vec3::z())).is_none());
    }

    #[test]
    fn test_closest_point_is_never_farther_than_a_vertex() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut vertices = Vec::new();
        for _ in 0..24 {
            vertices.push(Vec3::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
            ));
        }
        let mesh = TriangleMesh::from_vertices(&vertices);
        assert!(!mesh.is_empty());

        for _ in 0..200 {
            let query = Vec3::new(
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
            );
            let closest = mesh.closest_point(&query).unwrap();

            for triangle in mesh.triangles() {
                for vertex in triangle.vertices() {
                    assert!(closest.distance <= (vertex - query).norm() + 1e-4);
                }
            }

            // The point lies on some triangle
            let on_surface = mesh
                .triangles()
                .iter()
                .any(|tri| (tri.closest_point(&closest.point) - closest.point).norm() < 1e-3);
            assert!(on_surface);
        }
    }

    #[test]
    fn test_segment_returns_first_crossing() {
        // Three stacked floors; build order deliberately not sorted by height
        let mut positions = floor_positions(-2.0);
        positions.extend(floor_positions(2.0));
        positions.extend(floor_positions(0.0));
        let mesh = TriangleMesh::from_positions(&positions, &Mat4::identity());

        let down = Segment::new(Vec3::new(1.0, -3.0, 5.0), Vec3::new(1.0, -3.0, -5.0));
        let hit = mesh.intersect_segment(&down).unwrap();
        assert_relative_eq!(hit.t, 0.3, epsilon = 1e-6);
        assert_relative_eq!(hit.point.z, 2.0);

        let up = Segment::new(Vec3::new(1.0, -3.0, -5.0), Vec3::new(1.0, -3.0, 5.0));
        let hit = mesh.intersect_segment(&up).unwrap();
        assert_relative_eq!(hit.t, 0.3, epsilon = 1e-6);
        assert_relative_eq!(hit.point.z, -2.0);
    }

    #[test]
    fn test_ray_is_unbounded_forward() {
        let mesh = floor(-100.0);
        let hit = mesh
            .intersect_ray(&Ray::new(Vec3::new(0.5, -0.5, 0.0), Vec3::new(0.0, 0.0, -1.0)))
            .unwrap();
        assert_relative_eq!(hit.t, 100.0, epsilon = 1e-3);
        assert_relative_eq!(hit.point.z, -100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_sweep_does_not_tunnel_at_any_speed() {
        let radius = 0.5;
        let mesh = floor(0.0);

        for step in 1..=10 {
            // Travel `d` from just above contact distance, straight through the floor
            let d = radius * step as f32;
            let sphere = Sphere::new(Vec3::new(2.0, -3.0, radius + 0.25 * d), radius);
            let motion = sphere.motion(Vec3::new(0.0, 0.0, -d));

            let hit = mesh.sweep_sphere(radius, &motion).unwrap();
            assert_relative_eq!(hit.t, 0.25, epsilon = 1e-5);
            assert_relative_eq!(motion.point_at(hit.t).z, radius, epsilon = 1e-5);

            // The endpoint-only overlap test misses most of these
            let end_overlap = mesh
                .closest_point(&motion.end)
                .map_or(false, |closest| closest.distance < radius);
            if d > 3.0 * radius {
                assert!(!end_overlap);
            }
        }
    }

    #[test]
    fn test_sweep_picks_earliest_piece_of_geometry() {
        let mut positions = floor_positions(0.0);
        positions.extend(floor_positions(-1.0));
        let mesh = TriangleMesh::from_positions(&positions, &Mat4::identity());

        let motion = Segment::new(Vec3::new(0.0, -4.0, 3.0), Vec3::new(0.0, -4.0, -3.0));
        let hit = mesh.sweep_sphere(0.5, &motion).unwrap();
        assert_relative_eq!(motion.point_at(hit.t).z, 0.5, epsilon = 1e-5);
    }
}
