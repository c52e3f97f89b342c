use glam::{Mat4, Vec4};
use serde::Deserialize;
use zr_core::input::{InputState, Key};
use zr_core::math::{rotate_y, translate};

use crate::collision::{blocked_backward, blocked_forward, blocked_left, blocked_right};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    #[default]
    None,
    Left,
    Right,
}

/// Movement intent for one simulation frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerInput {
    pub turn: Turn,
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub fire: bool,
}

impl ControllerInput {
    pub fn from_input(input: &InputState) -> Self {
        // Turning is exclusive; left wins when both are held.
        let turn = if input.any_held(&[Key::A, Key::Left]) {
            Turn::Left
        } else if input.any_held(&[Key::D, Key::Right]) {
            Turn::Right
        } else {
            Turn::None
        };
        Self {
            turn,
            forward: input.any_held(&[Key::W, Key::Up]),
            backward: input.any_held(&[Key::S, Key::Down]),
            strafe_left: input.any_held(&[Key::Q, Key::N]),
            strafe_right: input.any_held(&[Key::E, Key::M]),
            fire: input.is_held(Key::Space),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveSettings {
    pub move_step: f32,
    pub turn_degrees: f32,
    pub probe_extent: f32,
}

/// The world-space transform that realizes one frame of player motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveDelta {
    pub rotation: Mat4,
    pub translation: Mat4,
}

/// Build this frame's world transform. The world moves opposite to the player:
/// walking forward pushes scenery toward +z, strafing left pushes it toward +x.
/// A direction with an obstacle in its probe box contributes nothing.
pub fn compute_move_delta<I>(
    input: &ControllerInput,
    obstacles: I,
    settings: &MoveSettings,
) -> MoveDelta
where
    I: IntoIterator<Item = Vec4> + Clone,
{
    let rotation = match input.turn {
        Turn::Left => rotate_y(-settings.turn_degrees),
        Turn::Right => rotate_y(settings.turn_degrees),
        Turn::None => Mat4::IDENTITY,
    };

    let extent = settings.probe_extent;
    let step = settings.move_step;
    let mut dx = 0.0;
    let mut dz = 0.0;
    if input.forward && !blocked_forward(obstacles.clone(), extent) {
        dz += step;
    }
    if input.backward && !blocked_backward(obstacles.clone(), extent) {
        dz -= step;
    }
    if input.strafe_left && !blocked_left(obstacles.clone(), extent) {
        dx += step;
    }
    if input.strafe_right && !blocked_right(obstacles, extent) {
        dx -= step;
    }

    MoveDelta {
        rotation,
        translation: translate(dx, 0.0, dz),
    }
}

/// Rising-edge detector for the fire key: one shot per press, re-armed only
/// after a frame in which the key was up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireTrigger {
    armed: bool,
}

impl FireTrigger {
    pub fn new() -> Self {
        Self { armed: true }
    }

    /// Returns true when this frame should attempt a shot.
    pub fn update(&mut self, fire_held: bool) -> bool {
        if !fire_held {
            self.armed = true;
            return false;
        }
        if self.armed {
            self.armed = false;
            return true;
        }
        false
    }
}

impl Default for FireTrigger {
    fn default() -> Self {
        Self::new()
    }
}
