//! Terrain aggregator
//!
//! Treats every terrain piece as one logical surface. Each query scans the
//! pieces linearly and keeps a running minimum, so cost is proportional to
//! the total triangle count. "Nothing there" is a sentinel result, never an
//! error: an empty terrain is a valid world in which bodies fall forever.

use crate::ecs::storage::ComponentStorage;
use crate::ecs::Entity;
use crate::foundation::math::Vec3;
use super::collision::{Ray, Segment, SurfaceHit, TriangleMesh};

/// Result of a segment, ray or sweep query against the whole terrain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainHit {
    /// Whether anything was hit
    pub hit: bool,
    /// Query parameter of the hit, `+inf` on a miss
    pub t: f32,
    /// Contact point on the surface
    pub point: Vec3,
    /// Unit surface normal at the contact
    pub normal: Vec3,
    /// Terrain piece that produced the hit
    pub piece: Option<Entity>,
}

impl TerrainHit {
    /// The no-hit sentinel
    pub const MISS: Self = Self {
        hit: false,
        t: f32::INFINITY,
        point: Vec3::new(0.0, 0.0, 0.0),
        normal: Vec3::new(0.0, 0.0, 0.0),
        piece: None,
    };

    fn from_surface(piece: Entity, surface: SurfaceHit) -> Self {
        Self {
            hit: true,
            t: surface.t,
            point: surface.point,
            normal: surface.normal,
            piece: Some(piece),
        }
    }
}

/// Closest terrain point to a query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainClosest {
    /// Closest point on any piece
    pub point: Vec3,
    /// Normal of the triangle that produced `point`
    pub normal: Vec3,
    /// Distance to `point`, `+inf` when there is no terrain
    pub distance: f32,
    /// Terrain piece containing `point`
    pub piece: Option<Entity>,
}

impl TerrainClosest {
    /// The no-terrain sentinel
    pub const NONE: Self = Self {
        point: Vec3::new(0.0, 0.0, 0.0),
        normal: Vec3::new(0.0, 0.0, 0.0),
        distance: f32::INFINITY,
        piece: None,
    };

    /// Whether a closest point exists at all
    pub fn is_some(&self) -> bool {
        self.piece.is_some()
    }
}

/// All static terrain pieces, keyed by the entity that owns each mesh
#[derive(Debug, Clone, Default)]
pub struct Terrain {
    pieces: ComponentStorage<TriangleMesh>,
}

impl Terrain {
    /// Create an empty terrain
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a mesh to `piece`, replacing any previous one
    pub fn insert(&mut self, piece: Entity, mesh: TriangleMesh) -> Option<TriangleMesh> {
        let previous = self.pieces.insert(piece, mesh);
        if previous.is_some() {
            log::warn!("Terrain piece {} replaced an existing mesh", piece);
        }
        previous
    }

    /// Detach and return the mesh owned by `piece`
    pub fn remove(&mut self, piece: Entity) -> Option<TriangleMesh> {
        self.pieces.remove(piece)
    }

    /// Mesh owned by `piece`
    pub fn get(&self, piece: Entity) -> Option<&TriangleMesh> {
        self.pieces.get(piece)
    }

    /// Whether `piece` owns a mesh
    pub fn contains(&self, piece: Entity) -> bool {
        self.pieces.contains(piece)
    }

    /// Iterate pieces in slot order
    pub fn pieces(&self) -> impl Iterator<Item = (Entity, &TriangleMesh)> {
        self.pieces.iter()
    }

    /// Number of pieces
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Total number of triangles across all pieces
    pub fn triangle_count(&self) -> usize {
        self.pieces.iter().map(|(_, mesh)| mesh.len()).sum()
    }

    /// Whether there are no pieces
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Drop every piece
    pub fn clear(&mut self) {
        self.pieces.clear();
    }

    /// Globally closest terrain point to `point`
    pub fn closest_point(&self, point: &Vec3) -> TerrainClosest {
        let mut best = TerrainClosest::NONE;

        for (piece, mesh) in self.pieces.iter() {
            if let Some(closest) = mesh.closest_point(point) {
                if closest.distance < best.distance {
                    best = TerrainClosest {
                        point: closest.point,
                        normal: closest.normal,
                        distance: closest.distance,
                        piece: Some(piece),
                    };
                }
            }
        }

        best
    }

    /// Earliest crossing of `segment` across all pieces
    pub fn intersect_segment(&self, segment: &Segment) -> TerrainHit {
        self.earliest(|mesh| mesh.intersect_segment(segment))
    }

    /// Nearest ray hit across all pieces, for picking
    pub fn intersect_ray(&self, ray: &Ray) -> TerrainHit {
        self.earliest(|mesh| mesh.intersect_ray(ray))
    }

    /// Earliest contact of a sphere of `radius` moving along `motion`
    pub fn sweep_sphere(&self, radius: f32, motion: &Segment) -> TerrainHit {
        self.earliest(|mesh| mesh.sweep_sphere(radius, motion))
    }

    /// Earliest contact accepted by `accept`; rejected contacts do not block
    pub fn sweep_sphere_where(
        &self,
        radius: f32,
        motion: &Segment,
        accept: impl Fn(&SurfaceHit) -> bool,
    ) -> TerrainHit {
        self.earliest(|mesh| mesh.sweep_sphere_where(radius, motion, &accept))
    }

    fn earliest(&self, query: impl Fn(&TriangleMesh) -> Option<SurfaceHit>) -> TerrainHit {
        let mut best = TerrainHit::MISS;

        for (piece, mesh) in self.pieces.iter() {
            if let Some(surface) = query(mesh) {
                if surface.t < best.t {
                    best = TerrainHit::from_surface(piece, surface);
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4;
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    fn slab(z: f32, x_offset: f32) -> TriangleMesh {
        let positions = [
            -5.0, -5.0, z, 5.0, -5.0, z, 5.0, 5.0, z,
            -5.0, -5.0, z, 5.0, 5.0, z, -5.0, 5.0, z,
        ];
        TriangleMesh::from_positions(&positions, &Mat4::new_translation(&Vec3::new(x_offset, 0.0, 0.0)))
    }

    #[test]
    fn test_empty_terrain_yields_sentinels() {
        let terrain = Terrain::new();
        let segment = Segment::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));

        let hit = terrain.intersect_segment(&segment);
        assert!(!hit.hit);
        assert_eq!(hit.t, f32::INFINITY);
        assert_eq!(hit, TerrainHit::MISS);

        assert!(!terrain.sweep_sphere(0.5, &segment).hit);
        assert!(!terrain.intersect_ray(&Ray::new(Vec3::zeros(), -Vec3::z())).hit);

        let closest = terrain.closest_point(&Vec3::zeros());
        assert!(!closest.is_some());
        assert_eq!(closest.distance, f32::INFINITY);
    }

    #[test]
    fn test_queries_pick_the_global_minimum_across_pieces() {
        let mut entities: SlotMap<Entity, ()> = SlotMap::with_key();
        let mut terrain = Terrain::new();

        let low = entities.insert(());
        let high = entities.insert(());
        let beside = entities.insert(());
        terrain.insert(low, slab(-3.0, 0.0));
        terrain.insert(high, slab(1.0, 0.0));
        terrain.insert(beside, slab(4.0, 20.0));

        assert_eq!(terrain.piece_count(), 3);
        assert_eq!(terrain.triangle_count(), 6);

        let down = Segment::new(Vec3::new(1.0, -2.0, 6.0), Vec3::new(1.0, -2.0, -6.0));
        let hit = terrain.intersect_segment(&down);
        assert!(hit.hit);
        assert_eq!(hit.piece, Some(high));
        assert_relative_eq!(hit.point.z, 1.0);

        let swept = terrain.sweep_sphere(0.5, &down);
        assert_eq!(swept.piece, Some(high));
        assert_relative_eq!(down.point_at(swept.t).z, 1.5, epsilon = 1e-5);

        let closest = terrain.closest_point(&Vec3::new(1.0, -2.0, -2.5));
        assert_eq!(closest.piece, Some(low));
        assert_relative_eq!(closest.distance, 0.5, epsilon = 1e-6);

        let ray = terrain.intersect_ray(&Ray::new(Vec3::new(20.0, 0.5, 10.0), -Vec3::z()));
        assert_eq!(ray.piece, Some(beside));
        assert_relative_eq!(ray.t, 6.0, epsilon = 1e-4);
    }

    #[test]
    fn test_removed_piece_no_longer_collides() {
        let mut entities: SlotMap<Entity, ()> = SlotMap::with_key();
        let mut terrain = Terrain::new();
        let piece = entities.insert(());
        terrain.insert(piece, slab(0.0, 0.0));

        let down = Segment::new(Vec3::new(1.0, -1.0, 1.0), Vec3::new(1.0, -1.0, -1.0));
        assert!(terrain.intersect_segment(&down).hit);

        assert!(terrain.remove(piece).is_some());
        assert!(!terrain.intersect_segment(&down).hit);
        assert!(terrain.is_empty());
    }

    #[test]
    fn test_filtered_sweep_passes_through_rejected_contacts() {
        let mut entities: SlotMap<Entity, ()> = SlotMap::with_key();
        let mut terrain = Terrain::new();
        let high = entities.insert(());
        let low = entities.insert(());
        terrain.insert(high, slab(1.0, 0.0));
        terrain.insert(low, slab(-3.0, 0.0));

        let down = Segment::new(Vec3::new(1.0, -2.0, 6.0), Vec3::new(1.0, -2.0, -6.0));
        let above_zero = |hit: &SurfaceHit| hit.point.z > 0.0;

        let nearest = terrain.sweep_sphere_where(0.5, &down, above_zero);
        assert_eq!(nearest.piece, Some(high));

        let below = terrain.sweep_sphere_where(0.5, &down, |hit| !above_zero(hit));
        assert_eq!(below.piece, Some(low));
        assert_relative_eq!(down.point_at(below.t).z, -2.5, epsilon = 1e-5);

        assert!(!terrain.sweep_sphere_where(0.5, &down, |_| false).hit);
    }

    #[test]
    fn test_insert_reports_replaced_mesh() {
        let mut entities: SlotMap<Entity, ()> = SlotMap::with_key();
        let mut terrain = Terrain::new();
        let piece = entities.insert(());

        assert!(terrain.insert(piece, slab(0.0, 0.0)).is_none());
        assert!(terrain.insert(piece, slab(2.0, 0.0)).is_some());
        assert_eq!(terrain.piece_count(), 1);
    }
}
