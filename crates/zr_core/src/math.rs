//! Vector and matrix helpers for the billboard world.
//!
//! Positions are homogeneous `Vec4` (w = 1) on the x/z ground plane, and every
//! transform is applied as a column-vector product `m * v`. The camera never
//! moves: player motion is expressed by transforming the world with these
//! matrices, so the builders here are the whole vocabulary of movement.

use glam::{Mat4, Vec3, Vec4};

/// Multiply a homogeneous vector by a 4x4 matrix (one row dot product per component).
pub fn vec_mat_mult(v: Vec4, m: &Mat4) -> Vec4 {
    *m * v
}

pub fn translate(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

/// Rotation of `angle_deg` degrees about `axis`. A zero axis yields identity.
pub fn rotate(angle_deg: f32, axis: Vec3) -> Mat4 {
    match axis.try_normalize() {
        Some(unit) => Mat4::from_axis_angle(unit, angle_deg.to_radians()),
        None => Mat4::IDENTITY,
    }
}

/// Rotation about the vertical axis, the only turn the player can make.
pub fn rotate_y(angle_deg: f32) -> Mat4 {
    Mat4::from_rotation_y(angle_deg.to_radians())
}

pub fn scale(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_scale(Vec3::new(x, y, z))
}

/// Right-handed perspective projection with a 0..1 depth range (wgpu clip space).
pub fn perspective(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh(fov_y_deg.to_radians(), aspect.max(f32::EPSILON), near, far)
}

/// Squared length on the ground plane; y is ignored.
pub fn planar_length_sq(v: Vec4) -> f32 {
    v.x * v.x + v.z * v.z
}

/// Squared distance between two points on the ground plane; y is ignored.
pub fn planar_distance_sq(a: Vec4, b: Vec4) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    dx * dx + dz * dz
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn approx(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < EPS
    }

    #[test]
    fn translate_moves_points_but_not_directions() {
        let m = translate(1.0, 2.0, 3.0);
        let point = vec_mat_mult(Vec4::new(0.5, 0.0, -0.5, 1.0), &m);
        assert!(approx(point, Vec4::new(1.5, 2.0, 2.5, 1.0)));

        let dir = vec_mat_mult(Vec4::new(0.0, 0.0, -1.0, 0.0), &m);
        assert!(approx(dir, Vec4::new(0.0, 0.0, -1.0, 0.0)));
    }

    #[test]
    fn rotate_y_negative_angle_swings_forward_point_right() {
        // Turning the player left rotates the world by a negative angle, so a
        // point straight ahead drifts to the right of the camera.
        let ahead = Vec4::new(0.0, 0.0, -1.0, 1.0);
        let turned = vec_mat_mult(ahead, &rotate_y(-2.0));
        assert!(turned.x > 0.0);
        assert!((planar_length_sq(turned) - 1.0).abs() < EPS);
    }

    #[test]
    fn rotate_about_y_matches_rotate_y() {
        let p = Vec4::new(0.3, 0.0, -0.7, 1.0);
        let a = vec_mat_mult(p, &rotate(2.0, Vec3::Y));
        let b = vec_mat_mult(p, &rotate_y(2.0));
        assert!(approx(a, b));
    }

    #[test]
    fn rotate_with_zero_axis_is_identity() {
        assert_eq!(rotate(45.0, Vec3::ZERO), Mat4::IDENTITY);
    }

    #[test]
    fn scale_shrinks_components() {
        let v = vec_mat_mult(Vec4::new(-1.0, 1.0, 0.0, 1.0), &scale(0.05, 0.05, 0.05));
        assert!(approx(v, Vec4::new(-0.05, 0.05, 0.0, 1.0)));
    }

    #[test]
    fn perspective_maps_near_and_far_into_unit_depth() {
        let proj = perspective(60.0, 16.0 / 9.0, 0.001, 100.0);
        let near = proj * Vec4::new(0.0, 0.0, -0.001, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -100.0, 1.0);
        assert!((near.z / near.w).abs() < 1e-3);
        assert!((far.z / far.w - 1.0).abs() < 1e-3);
    }

    #[test]
    fn planar_distance_ignores_height() {
        let a = Vec4::new(0.0, 5.0, 0.0, 1.0);
        let b = Vec4::new(3.0, -2.0, 4.0, 1.0);
        assert!((planar_distance_sq(a, b) - 25.0).abs() < EPS);
    }
}
