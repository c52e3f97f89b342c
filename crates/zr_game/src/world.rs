//! World state: everything the camera can see, expressed in camera space.
//!
//! The player never moves. Scenery, zombies and bullets are stored relative to a
//! camera fixed at the origin looking down -z, and player motion is applied by
//! transforming every entity the opposite way (see `sim::Game::step`).

use glam::{Mat4, Vec3, Vec4};

use crate::sprites::SpriteClass;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billboard {
    pub position: Vec4,
    pub class: SpriteClass,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zombie {
    pub position: Vec4,
    /// Fixed at spawn.
    pub speed_modifier: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub position: Vec4,
    pub direction: Vec3,
    /// Frames since the bullet was fired.
    pub age: u32,
    /// Set when the bullet hit a zombie this frame; removed with the aged-out ones.
    pub spent: bool,
}

impl Bullet {
    pub fn new(position: Vec4, direction: Vec3) -> Self {
        Self {
            position,
            direction,
            age: 0,
            spent: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct World {
    pub scenery: Vec<Billboard>,
    pub zombies: Vec<Zombie>,
    pub bullets: Vec<Bullet>,
}

impl World {
    /// Scenery classes by index: first quarter house 1, second quarter house 2,
    /// everything after that trees.
    pub fn with_scenery(points: Vec<Vec4>) -> Self {
        let quarter = points.len() / 4;
        let scenery = points
            .into_iter()
            .enumerate()
            .map(|(i, position)| Billboard {
                position,
                class: scenery_class_for_index(i, quarter),
            })
            .collect();
        Self {
            scenery,
            zombies: Vec::new(),
            bullets: Vec::new(),
        }
    }

    pub fn scenery_positions(&self) -> impl Iterator<Item = Vec4> + Clone + '_ {
        self.scenery.iter().map(|b| b.position)
    }

    /// Remove zombies by index in one pass. Duplicate indices (a zombie hit
    /// by several bullets in the same frame) are harmless.
    pub fn remove_zombies(&mut self, kill_list: &[usize]) {
        if kill_list.is_empty() {
            return;
        }
        let mut index = 0;
        self.zombies.retain(|_| {
            let keep = !kill_list.contains(&index);
            index += 1;
            keep
        });
    }

    /// Age every bullet by one frame and drop the spent or expired ones.
    /// Returns how many bullets timed out.
    pub fn age_bullets(&mut self, timeout: u32) -> usize {
        let mut expired = 0;
        self.bullets.retain_mut(|bullet| {
            bullet.age += 1;
            if bullet.spent {
                return false;
            }
            if bullet.age >= timeout {
                expired += 1;
                return false;
            }
            true
        });
        expired
    }

    /// Re-center the world on the camera after the player moved: positions get
    /// `rotation * translation`, bullet directions get the rotation only.
    pub fn apply_player_motion(&mut self, translation: &Mat4, rotation: &Mat4) {
        let motion = *rotation * *translation;
        for billboard in &mut self.scenery {
            billboard.position = motion * billboard.position;
        }
        for zombie in &mut self.zombies {
            zombie.position = motion * zombie.position;
        }
        for bullet in &mut self.bullets {
            bullet.position = motion * bullet.position;
            bullet.direction = rotation.transform_vector3(bullet.direction);
        }
    }
}

fn scenery_class_for_index(index: usize, quarter: usize) -> SpriteClass {
    if index < quarter {
        SpriteClass::House1
    } else if index < 2 * quarter {
        SpriteClass::House2
    } else {
        SpriteClass::Tree
    }
}
