//! Directional obstacle probes around the player.
//!
//! Scenery acts as walls: before the controller applies a translation it asks
//! whether any scenery point sits inside a small box directly on that side of
//! the camera. The camera looks down -z with +x to its right, so "forward" is
//! the strip just in front (negative z) and "right" the strip at positive x.
//!
//! A linear scan is used; the scene holds on the order of a hundred points.

use glam::Vec4;

pub fn blocked_forward<I: IntoIterator<Item = Vec4>>(obstacles: I, extent: f32) -> bool {
    obstacles.into_iter().any(|p| in_forward_box(p, extent))
}

pub fn blocked_backward<I: IntoIterator<Item = Vec4>>(obstacles: I, extent: f32) -> bool {
    obstacles.into_iter().any(|p| in_backward_box(p, extent))
}

pub fn blocked_left<I: IntoIterator<Item = Vec4>>(obstacles: I, extent: f32) -> bool {
    obstacles.into_iter().any(|p| in_left_box(p, extent))
}

pub fn blocked_right<I: IntoIterator<Item = Vec4>>(obstacles: I, extent: f32) -> bool {
    obstacles.into_iter().any(|p| in_right_box(p, extent))
}

fn in_forward_box(p: Vec4, extent: f32) -> bool {
    p.x.abs() < extent && p.z < 0.0 && p.z > -extent
}

fn in_backward_box(p: Vec4, extent: f32) -> bool {
    p.x.abs() < extent && p.z > 0.0 && p.z < extent
}

fn in_left_box(p: Vec4, extent: f32) -> bool {
    p.x < 0.0 && p.x > -extent && p.z.abs() < extent
}

fn in_right_box(p: Vec4, extent: f32) -> bool {
    p.x > 0.0 && p.x < extent && p.z.abs() < extent
}
