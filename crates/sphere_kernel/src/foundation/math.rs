//! Math utilities and types
//!
//! Thin aliases over `nalgebra` so the rest of the kernel reads in terms of
//! game-math vocabulary. The world is Z-up: gravity pulls along `-Z` and the
//! floor/ceiling classification measures normals against [`up`].

pub use nalgebra::{
    Vector2, Vector3,
    Matrix4,
    UnitQuaternion,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// World up vector `(0, 0, 1)`
#[inline]
pub fn up() -> Vec3 {
    Vec3::z()
}

/// Transform a point by an affine matrix
#[inline]
pub fn transform_point(matrix: &Mat4, point: Vec3) -> Vec3 {
    matrix.transform_point(&Point3::from(point)).coords
}

/// Drop the vertical component of a vector
#[inline]
pub fn horizontal(v: &Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, 0.0)
}

/// Math constants
pub mod constants {
    /// Squared doubled-area below which a triangle is considered degenerate
    pub const DEGENERATE_AREA_SQ: f32 = 1e-12;

    /// Denominator below which a segment is treated as parallel to a plane
    pub const PARALLEL_EPSILON: f32 = 1e-8;

    /// Slack used by inclusive barycentric inside tests
    pub const BARYCENTRIC_TOLERANCE: f32 = 1e-6;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_up_is_z() {
        assert_eq!(up(), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_transform_point_applies_translation_and_scale() {
        let matrix = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0)) * Mat4::new_scaling(2.0);
        let p = transform_point(&matrix, Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p, Vec3::new(3.0, 4.0, 5.0), epsilon = 1e-6);
    }
}
