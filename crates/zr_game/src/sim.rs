//! The per-frame game simulation.
//!
//! `Game` owns the whole session: world, counters, difficulty ramp, day/night
//! oscillator and RNG. It has no window or GPU dependency; the main loop (or a
//! test) calls `step` once per simulation frame and then reads the state to draw.
//!
//! Step order matters and mirrors how a frame plays out:
//!   1. day/night intensity
//!   2. controller: movement transform and fire
//!   3. spawn cadence and difficulty ramp, ammo regen
//!   4. bullet/zombie hits resolved through a kill-list
//!   5. bullet aging, zombie and bullet movement
//!   6. player motion applied to the world
//!   7. zombie/player contact, which resets the whole session

use glam::{Vec3, Vec4};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::GameConfig;
use crate::controller::{compute_move_delta, ControllerInput, FireTrigger, MoveSettings};
use crate::generators::{generate_ground_point, generate_ground_points, generate_speed_modifier};
use crate::world::{Bullet, World, Zombie};
use zr_core::math::{planar_distance_sq, planar_length_sq};

const INTENSITY_PHASE_STEP: f32 = 0.001;
const NIGHT_THRESHOLD: f32 = 0.08;
const MUZZLE_POSITION: Vec4 = Vec4::new(0.004, -0.005, 0.0, 1.0);
const BULLET_SPREAD: f32 = 0.04;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    /// A zombie reached the player. The session has already been reset.
    PlayerDied { final_score: u32 },
}

pub struct Game {
    pub config: GameConfig,
    rng: ChaCha8Rng,
    pub world: World,
    pub score: u32,
    pub ammo: u32,
    /// Frames between zombie spawns by day. Shrinks as the difficulty ramps.
    pub spawn_wait: u64,
    /// Frames since this life started.
    pub frame: u64,
    ramp_frames: u64,
    intensity_phase: f32,
    pub intensity: f32,
    pub day: bool,
    fire_trigger: FireTrigger,
    muzzle_flash: bool,
    pub lives: u32,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut game = Self {
            config,
            rng,
            world: World::default(),
            score: 0,
            ammo: 0,
            spawn_wait: 0,
            frame: 0,
            ramp_frames: 0,
            intensity_phase: 0.0,
            intensity: 1.0,
            day: true,
            fire_trigger: FireTrigger::new(),
            muzzle_flash: false,
            lives: 0,
        };
        game.reset();
        game
    }

    /// Start a new life: fresh scenery and zombies, starting counters.
    /// The RNG keeps running so each life gets a different layout.
    pub fn reset(&mut self) {
        let scenery = generate_ground_points(&mut self.rng, self.config.scenery_count);
        self.world = World::with_scenery(scenery);
        for _ in 0..self.config.initial_zombies {
            let zombie = self.new_zombie();
            self.world.zombies.push(zombie);
        }
        self.score = 0;
        self.ammo = self.config.starting_ammo;
        self.spawn_wait = self.config.spawn_wait_start;
        self.frame = 0;
        self.ramp_frames = 0;
        self.intensity_phase = 0.0;
        self.intensity = 1.0;
        self.day = true;
        self.fire_trigger = FireTrigger::new();
        self.muzzle_flash = false;
        self.lives += 1;
        log::info!(
            "Life {} started: {} scenery, {} zombies, {} rounds",
            self.lives,
            self.world.scenery.len(),
            self.world.zombies.len(),
            self.ammo
        );
    }

    /// Swap in new tuning. Takes effect from the next step; the world is kept.
    pub fn apply_config(&mut self, config: GameConfig) {
        self.spawn_wait = self
            .spawn_wait
            .clamp(config.spawn_wait_floor, config.spawn_wait_start);
        self.config = config;
    }

    /// True for exactly one read after a shot was fired.
    pub fn take_muzzle_flash(&mut self) -> bool {
        std::mem::take(&mut self.muzzle_flash)
    }

    pub fn step(&mut self, input: &ControllerInput) -> StepOutcome {
        self.frame += 1;
        self.update_intensity();

        let settings = MoveSettings {
            move_step: self.config.move_step,
            turn_degrees: self.config.turn_degrees,
            probe_extent: self.config.probe_extent,
        };
        let delta = compute_move_delta(input, self.world.scenery_positions(), &settings);
        if self.fire_trigger.update(input.fire) {
            self.fire();
        }

        self.update_spawning();
        if self.frame % self.config.ammo_regen_interval == 0 {
            self.ammo += 1;
        }

        let kill_list = self.resolve_bullet_hits();
        self.world.remove_zombies(&kill_list);
        self.world.age_bullets(self.config.bullet_timeout);

        self.move_zombies();
        self.move_bullets();
        self.world
            .apply_player_motion(&delta.translation, &delta.rotation);

        if self.zombie_reached_player() {
            let final_score = self.score;
            log::info!("Player died with score {final_score}");
            self.reset();
            return StepOutcome::PlayerDied { final_score };
        }
        StepOutcome::Continue
    }

    /// Consume one round and launch a bullet. Does nothing when out of ammo.
    pub fn fire(&mut self) -> bool {
        if self.ammo == 0 {
            log::debug!("Click: out of ammo");
            return false;
        }
        self.ammo -= 1;
        let spread_x = -BULLET_SPREAD + self.rng.gen::<f32>() * 2.0 * BULLET_SPREAD;
        let drop_y = -BULLET_SPREAD * (self.rng.gen::<f32>() * 2.0 * BULLET_SPREAD);
        self.world.bullets.push(Bullet::new(
            MUZZLE_POSITION,
            Vec3::new(spread_x, drop_y, -1.0),
        ));
        self.muzzle_flash = true;
        log::debug!("Fired, {} rounds left", self.ammo);
        true
    }

    fn update_intensity(&mut self) {
        self.intensity_phase += INTENSITY_PHASE_STEP;
        self.intensity = self.intensity_phase.cos() * 0.4 + 0.6;
        self.day = self.intensity > NIGHT_THRESHOLD;
    }

    fn update_spawning(&mut self) {
        let interval = if self.day {
            self.spawn_wait
        } else {
            (self.spawn_wait / 2).max(1)
        };
        if self.frame % interval == 0 && self.world.zombies.len() < self.config.max_zombies {
            let zombie = self.new_zombie();
            self.world.zombies.push(zombie);
            log::debug!(
                "Zombie spawned ({} alive, every {} frames)",
                self.world.zombies.len(),
                interval
            );
        }

        self.ramp_frames += 1;
        if self.ramp_frames >= self.config.spawn_ramp_interval {
            self.ramp_frames = 0;
            self.spawn_wait = self
                .spawn_wait
                .saturating_sub(self.config.spawn_ramp_step)
                .max(self.config.spawn_wait_floor);
            log::debug!("Difficulty ramp: spawn every {} frames", self.spawn_wait);
        }
    }

    fn new_zombie(&mut self) -> Zombie {
        Zombie {
            position: generate_ground_point(&mut self.rng),
            speed_modifier: generate_speed_modifier(&mut self.rng, self.config.speed_amplitude),
        }
    }

    /// Check every bullet against every zombie. Bullets that hit are marked
    /// spent; hit zombies are returned as a kill-list so the zombie list is not
    /// mutated mid-scan. Each hit scores, so a zombie struck by two bullets in
    /// the same frame is worth two points.
    fn resolve_bullet_hits(&mut self) -> Vec<usize> {
        let hit_radius_sq = self.config.hit_radius * self.config.hit_radius;
        let mut kill_list = Vec::new();
        for bullet in &mut self.world.bullets {
            for (index, zombie) in self.world.zombies.iter().enumerate() {
                if planar_distance_sq(zombie.position, bullet.position) < hit_radius_sq {
                    bullet.spent = true;
                    kill_list.push(index);
                    self.score += 1;
                    if self.rng.gen_bool(self.config.kill_refund_chance) {
                        self.ammo += 1;
                    }
                    log::trace!("Zombie {index} hit, score {}", self.score);
                }
            }
        }
        kill_list
    }

    fn move_zombies(&mut self) {
        let speed = self.config.zombie_speed / 1000.0;
        for zombie in &mut self.world.zombies {
            let distance = planar_length_sq(zombie.position).sqrt();
            if distance <= f32::EPSILON {
                continue;
            }
            let step = speed * zombie.speed_modifier / distance;
            zombie.position.x -= zombie.position.x * step;
            zombie.position.z -= zombie.position.z * step;
        }
    }

    fn move_bullets(&mut self) {
        let speed = self.config.bullet_speed / 1000.0;
        for bullet in &mut self.world.bullets {
            bullet.position += (bullet.direction * speed).extend(0.0);
        }
    }

    fn zombie_reached_player(&self) -> bool {
        let radius_sq = self.config.player_radius * self.config.player_radius;
        self.world
            .zombies
            .iter()
            .any(|zombie| planar_length_sq(zombie.position) < radius_sq)
    }
}
