//! Geometry

mod bounds2;
mod bounds3;
mod normal;
mod point2;
mod point3;
mod ray;
mod vector2;
mod vector3;

// Re-export.
pub use bounds2::*;
pub use bounds3::*;
pub use normal::*;
pub use point2::*;
pub use point3::*;
pub use ray::*;
pub use vector2::*;
pub use vector3::*;

/// Union trait for bounding boxes.
pub trait Union<T> {
    /// Return the bounding box that encloses `self` and `other`.
    ///
    /// * `other` - The other object.
    fn union(&self, other: &T) -> Self;
}

/// Intersect trait for bounding boxes.
pub trait Intersect<T> {
    /// Return the overlapping region of `self` and `other`.
    ///
    /// * `other` - The other object.
    fn intersect(&self, other: &T) -> Self;
}

/// Construct an orthonormal coordinate system from a single unit vector.
///
/// * `v1` - The unit vector.
pub fn coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2 = if v1.x.abs() > v1.y.abs() {
        Vector3f::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3 = v1.cross(&v2);
    (v2, v3)
}

/// Returns a direction vector for spherical coordinates in the given frame.
///
/// * `sin_theta` - sin(θ).
/// * `cos_theta` - cos(θ).
/// * `phi`       - φ.
/// * `x`         - Basis vector for x-axis.
/// * `y`         - Basis vector for y-axis.
/// * `z`         - Basis vector for z-axis.
pub fn spherical_direction_in_coord_frame(
    sin_theta: crate::pbrt::Float,
    cos_theta: crate::pbrt::Float,
    phi: crate::pbrt::Float,
    x: &Vector3f,
    y: &Vector3f,
    z: &Vector3f,
) -> Vector3f {
    sin_theta * phi.cos() * *x + sin_theta * phi.sin() * *y + cos_theta * *z
}

/// Flip a normal so it lies in the same hemisphere as the given vector.
///
/// * `n` - The normal.
/// * `v` - The reference vector.
pub fn face_forward(n: &Normal3f, v: &Vector3f) -> Normal3f {
    if n.dot_vec(v) < 0.0 {
        -*n
    } else {
        *n
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn coordinate_system_is_orthonormal() {
        let v1 = Vector3f::new(0.3, -0.4, 0.5).normalize();
        let (v2, v3) = coordinate_system(&v1);
        assert!(approx_eq!(f32, v1.dot(&v2), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, v1.dot(&v3), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, v2.dot(&v3), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, v2.length(), 1.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, v3.length(), 1.0, epsilon = 1e-6));
    }
}
