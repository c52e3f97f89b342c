//! CPU-side geometry for each frame.
//!
//! Billboards are emitted as view-space quads in draw order (house_1, house_2,
//! tree, zombies, bullets) so runs that share a texture collapse into a single
//! `draw_indexed`. The horizon and gun are fixed-size and built separately.

use glam::Vec4;
use zr_render::{BillboardVertex, HorizonVertex};

use crate::sprites::SpriteClass;
use crate::world::World;

/// Half the side length of every billboard quad, in view-space units.
pub const BILLBOARD_HALF_SIZE: f32 = 0.05;

const SCENERY_DRAW_ORDER: [SpriteClass; 3] =
    [SpriteClass::House1, SpriteClass::House2, SpriteClass::Tree];

const SKY: [f32; 3] = [0.0, 1.0, 1.0];
const GROUND: [f32; 3] = [0.0, 1.0, 0.0];
const HORIZON: [f32; 3] = [1.0, 1.0, 1.0];

pub const HORIZON_VERTEX_COUNT: usize = 12;

pub const GUN_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// A contiguous run of indices that share the same texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub sprite: SpriteClass,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Debug, Default)]
pub struct BillboardMesh {
    pub vertices: Vec<BillboardVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
}

impl BillboardMesh {
    pub fn with_capacity(quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quads * 4),
            indices: Vec::with_capacity(quads * 6),
            draw_calls: Vec::with_capacity(8),
        }
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Append one camera-facing quad centered on `center`. The quad lies on the
    /// view-space plane through the center, so it always faces the camera.
    pub fn push_billboard(&mut self, center: Vec4, sprite: SpriteClass) {
        let h = BILLBOARD_HALF_SIZE;
        let base_index = self.vertices.len() as u32;

        self.vertices.push(BillboardVertex {
            position: [center.x - h, center.y - h, center.z],
            tex_coords: [0.0, 1.0],
        });
        self.vertices.push(BillboardVertex {
            position: [center.x + h, center.y - h, center.z],
            tex_coords: [1.0, 1.0],
        });
        self.vertices.push(BillboardVertex {
            position: [center.x + h, center.y + h, center.z],
            tex_coords: [1.0, 0.0],
        });
        self.vertices.push(BillboardVertex {
            position: [center.x - h, center.y + h, center.z],
            tex_coords: [0.0, 0.0],
        });

        let draw_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);

        push_draw_call(&mut self.draw_calls, sprite, draw_start, 6);
    }
}

pub fn build_billboard_mesh(world: &World) -> BillboardMesh {
    let quads = world.scenery.len() + world.zombies.len() + world.bullets.len();
    let mut mesh = BillboardMesh::with_capacity(quads);

    for class in SCENERY_DRAW_ORDER {
        for billboard in world.scenery.iter().filter(|b| b.class == class) {
            mesh.push_billboard(billboard.position, class);
        }
    }
    for zombie in &world.zombies {
        mesh.push_billboard(zombie.position, SpriteClass::Zombie);
    }
    for bullet in &world.bullets {
        mesh.push_billboard(bullet.position, SpriteClass::Bullet);
    }
    mesh
}

/// Append a draw call, merging with the previous one when the texture matches
/// and indices are contiguous.
fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    sprite: SpriteClass,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if last.sprite == sprite && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        sprite,
        index_start,
        index_count,
    });
}

pub fn count_texture_binds(draw_calls: &[DrawCall]) -> usize {
    let mut binds = 0usize;
    let mut current: Option<SpriteClass> = None;
    for draw in draw_calls {
        if current != Some(draw.sprite) {
            current = Some(draw.sprite);
            binds += 1;
        }
    }
    binds
}

/// Sky over a white horizon line over ground, as two bands of two triangles in
/// clip space. Colors are scaled by the day/night intensity; alpha stays 1.
pub fn horizon_vertices(intensity: f32) -> [HorizonVertex; HORIZON_VERTEX_COUNT] {
    let shade = |rgb: [f32; 3]| [rgb[0] * intensity, rgb[1] * intensity, rgb[2] * intensity, 1.0];
    let (s, g, h) = (shade(SKY), shade(GROUND), shade(HORIZON));

    let positions: [[f32; 2]; HORIZON_VERTEX_COUNT] = [
        // ground band
        [-1.0, 0.0],
        [-1.0, -1.0],
        [1.0, -1.0],
        [-1.0, 0.0],
        [1.0, 0.0],
        [1.0, -1.0],
        // sky band
        [-1.0, 1.0],
        [-1.0, 0.0],
        [1.0, 0.0],
        [-1.0, 1.0],
        [1.0, 1.0],
        [1.0, 0.0],
    ];
    let colors = [h, g, g, h, h, g, s, h, h, s, s, h];

    std::array::from_fn(|i| HorizonVertex {
        position: positions[i],
        color: colors[i],
    })
}

/// Full-screen quad in clip space, drawn with `GUN_INDICES`.
pub fn gun_vertices() -> [BillboardVertex; 4] {
    [
        BillboardVertex {
            position: [-1.0, -1.0, 0.0],
            tex_coords: [0.0, 1.0],
        },
        BillboardVertex {
            position: [1.0, -1.0, 0.0],
            tex_coords: [1.0, 1.0],
        },
        BillboardVertex {
            position: [1.0, 1.0, 0.0],
            tex_coords: [1.0, 0.0],
        },
        BillboardVertex {
            position: [-1.0, 1.0, 0.0],
            tex_coords: [0.0, 0.0],
        },
    ]
}

pub fn gun_sprite(muzzle_flash: bool) -> SpriteClass {
    if muzzle_flash {
        SpriteClass::GunFire
    } else {
        SpriteClass::Gun
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Bullet, Zombie};
    use glam::Vec3;

    fn ground(x: f32, z: f32) -> Vec4 {
        Vec4::new(x, 0.0, z, 1.0)
    }

    fn sample_world() -> World {
        let scenery = (0..8).map(|i| ground(i as f32 * 0.5 - 2.0, -1.0)).collect();
        let mut world = World::with_scenery(scenery);
        for i in 0..3 {
            world.zombies.push(Zombie {
                position: ground(1.0, -0.5 - i as f32 * 0.1),
                speed_modifier: 1.0,
            });
        }
        world
            .bullets
            .push(Bullet::new(Vec4::new(0.0, -0.005, -0.2, 1.0), Vec3::NEG_Z));
        world
    }

    #[test]
    fn quad_is_centered_and_faces_camera() {
        let mut mesh = BillboardMesh::default();
        mesh.push_billboard(Vec4::new(0.3, 0.0, -1.0, 1.0), SpriteClass::Tree);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        for v in &mesh.vertices {
            assert_eq!(v.position[2], -1.0);
            assert!(((v.position[0] - 0.3).abs() - 0.05).abs() < 1e-6);
            assert!((v.position[1].abs() - 0.05).abs() < 1e-6);
        }
    }

    #[test]
    fn billboard_mesh_merges_runs_in_draw_order() {
        let mesh = build_billboard_mesh(&sample_world());
        assert_eq!(mesh.quad_count(), 12);
        assert_eq!(mesh.indices.len(), 72);

        let sprites: Vec<SpriteClass> = mesh.draw_calls.iter().map(|d| d.sprite).collect();
        assert_eq!(
            sprites,
            vec![
                SpriteClass::House1,
                SpriteClass::House2,
                SpriteClass::Tree,
                SpriteClass::Zombie,
                SpriteClass::Bullet,
            ]
        );
        let counts: Vec<u32> = mesh.draw_calls.iter().map(|d| d.index_count).collect();
        assert_eq!(counts, vec![12, 12, 24, 18, 6]);

        let mut next = 0;
        for draw in &mesh.draw_calls {
            assert_eq!(draw.index_start, next);
            next += draw.index_count;
        }
        assert_eq!(count_texture_binds(&mesh.draw_calls), 5);
    }

    #[test]
    fn empty_groups_emit_no_draw_calls() {
        let mut world = World::default();
        world.zombies.push(Zombie {
            position: ground(0.0, -1.0),
            speed_modifier: 1.0,
        });
        let mesh = build_billboard_mesh(&world);
        assert_eq!(mesh.draw_calls.len(), 1);
        assert_eq!(mesh.draw_calls[0].sprite, SpriteClass::Zombie);
    }

    #[test]
    fn non_contiguous_draws_do_not_merge() {
        let mut draws = Vec::new();
        push_draw_call(&mut draws, SpriteClass::Tree, 0, 6);
        push_draw_call(&mut draws, SpriteClass::Tree, 12, 6);
        assert_eq!(draws.len(), 2);
        assert_eq!(count_texture_binds(&draws), 1);
    }

    #[test]
    fn horizon_has_twelve_vertices_scaled_by_intensity() {
        let full = horizon_vertices(1.0);
        assert_eq!(full.len(), 12);
        assert_eq!(full[0].color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(full[1].color, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(full[6].color, [0.0, 1.0, 1.0, 1.0]);

        let dim = horizon_vertices(0.5);
        assert_eq!(dim[0].color, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(dim[6].color, [0.0, 0.5, 0.5, 1.0]);
        for (a, b) in full.iter().zip(dim.iter()) {
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn horizon_line_sits_at_screen_center() {
        let white = [1.0, 1.0, 1.0, 1.0];
        for v in horizon_vertices(1.0) {
            if v.color == white {
                assert_eq!(v.position[1], 0.0);
            }
        }
    }

    #[test]
    fn gun_covers_clip_space_and_flash_swaps_texture() {
        let quad = gun_vertices();
        let xs: Vec<f32> = quad.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = quad.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), -1.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 1.0);
        assert_eq!(gun_sprite(true), SpriteClass::GunFire);
        assert_eq!(gun_sprite(false), SpriteClass::Gun);
    }
}
