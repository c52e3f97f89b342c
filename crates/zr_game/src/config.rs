//! Gameplay tuning loaded from `assets/config/tuning.json`.
//!
//! Every field is optional in the file; omitted fields keep the values the game
//! was balanced with. The file is polled for changes at frame boundaries, so
//! numbers can be tweaked while playing.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Fixed RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub scenery_count: usize,
    pub initial_zombies: usize,
    pub max_zombies: usize,
    pub starting_ammo: u32,
    /// Frames between free rounds.
    pub ammo_regen_interval: u64,
    /// Frames a bullet lives without hitting anything.
    pub bullet_timeout: u32,
    pub spawn_wait_start: u64,
    pub spawn_wait_floor: u64,
    /// Frames between difficulty ramps.
    pub spawn_ramp_interval: u64,
    pub spawn_ramp_step: u64,
    pub zombie_speed: f32,
    pub bullet_speed: f32,
    /// Zombie speed modifiers fall in `[1 - a, 1 + a]`.
    pub speed_amplitude: f32,
    /// Probability that a kill refunds one round.
    pub kill_refund_chance: f64,
    pub move_step: f32,
    pub turn_degrees: f32,
    /// Bullet-to-zombie hit distance on the ground plane.
    pub hit_radius: f32,
    /// Zombie-to-player kill distance on the ground plane.
    pub player_radius: f32,
    /// Size of the obstacle probe boxes around the player.
    pub probe_extent: f32,
    pub fov_degrees: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            scenery_count: 80,
            initial_zombies: 5,
            max_zombies: 100,
            starting_ammo: 20,
            ammo_regen_interval: 160,
            bullet_timeout: 900,
            spawn_wait_start: 160,
            spawn_wait_floor: 100,
            spawn_ramp_interval: 4000,
            spawn_ramp_step: 5,
            zombie_speed: 1.0,
            bullet_speed: 6.0,
            speed_amplitude: 0.2,
            kill_refund_chance: 0.3,
            move_step: 0.004,
            turn_degrees: 2.0,
            hit_radius: 0.008,
            player_radius: 0.036,
            probe_extent: 0.036,
            fov_degrees: 60.0,
        }
    }
}

/// Polls a file's modification time so reloads happen only when it changes.
pub struct FileWatcher {
    path: PathBuf,
    last_seen_modified: Option<SystemTime>,
}

impl FileWatcher {
    pub fn new(path: PathBuf) -> Self {
        let last_seen_modified = modified_time(&path);
        Self {
            path,
            last_seen_modified,
        }
    }

    pub fn should_reload(&mut self) -> bool {
        let current = modified_time(&self.path);
        match (self.last_seen_modified, current) {
            (Some(old), Some(now)) if now > old => {
                self.last_seen_modified = Some(now);
                true
            }
            (None, Some(now)) => {
                self.last_seen_modified = Some(now);
                true
            }
            _ => false,
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Load the tuning file, falling back to defaults when it does not exist.
/// A file that exists but is invalid is still an error.
pub fn load_config_or_default(path: &Path) -> Result<GameConfig, String> {
    if !path.exists() {
        log::warn!(
            "Config '{}' not found, using built-in tuning",
            path.display()
        );
        return Ok(GameConfig::default());
    }
    load_config_from_path(path)
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    let intervals = [
        ("ammo_regen_interval", config.ammo_regen_interval),
        ("spawn_wait_start", config.spawn_wait_start),
        ("spawn_wait_floor", config.spawn_wait_floor),
        ("spawn_ramp_interval", config.spawn_ramp_interval),
        ("bullet_timeout", u64::from(config.bullet_timeout)),
    ];
    for (name, value) in intervals {
        if value == 0 {
            return Err(format!("Config validation failed: {name} must be > 0"));
        }
    }
    if config.spawn_wait_floor > config.spawn_wait_start {
        return Err(format!(
            "Config validation failed: spawn_wait_floor ({}) exceeds spawn_wait_start ({})",
            config.spawn_wait_floor, config.spawn_wait_start
        ));
    }
    if !(0.0..=1.0).contains(&config.kill_refund_chance) {
        return Err("Config validation failed: kill_refund_chance must be within [0, 1]".to_string());
    }
    if !(0.0..1.0).contains(&config.speed_amplitude) {
        return Err("Config validation failed: speed_amplitude must be within [0, 1)".to_string());
    }
    if !(1.0..179.0).contains(&config.fov_degrees) {
        return Err("Config validation failed: fov_degrees must be within [1, 179)".to_string());
    }
    let positive = [
        ("hit_radius", config.hit_radius),
        ("player_radius", config.player_radius),
        ("probe_extent", config.probe_extent),
    ];
    for (name, value) in positive {
        if !(value > 0.0) {
            return Err(format!("Config validation failed: {name} must be > 0"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "zr_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let path = temp_file_path("partial");
        fs::write(&path, r#"{ "seed": 7, "max_zombies": 12 }"#).expect("write config");

        let config = load_config_from_path(&path).expect("config should load");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_zombies, 12);
        assert_eq!(config.spawn_wait_start, 160);
        assert_eq!(config.starting_ammo, 20);
        assert_eq!(config.bullet_timeout, 900);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn floor_above_start_is_rejected() {
        let path = temp_file_path("floor");
        fs::write(
            &path,
            r#"{ "spawn_wait_start": 90, "spawn_wait_floor": 100 }"#,
        )
        .expect("write config");

        let err = load_config_from_path(&path).expect_err("floor above start should fail");
        assert!(err.contains("spawn_wait_floor"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let path = temp_file_path("interval");
        fs::write(&path, r#"{ "ammo_regen_interval": 0 }"#).expect("write config");

        let err = load_config_from_path(&path).expect_err("zero interval should fail");
        assert!(err.contains("ammo_regen_interval"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let path = temp_file_path("unknown");
        fs::write(&path, r#"{ "zombie_sped": 2.0 }"#).expect("write config");

        let err = load_config_from_path(&path).expect_err("typo should fail");
        assert!(err.contains("Failed to parse config JSON"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = temp_file_path("missing");
        let config = load_config_or_default(&path).expect("missing file is not an error");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn watcher_detects_newly_created_file() {
        let path = temp_file_path("watcher_create");
        let _ = fs::remove_file(&path);

        let mut watcher = FileWatcher::new(path.clone());
        assert!(!watcher.should_reload(), "missing file should not reload");

        fs::write(&path, "{}").expect("write config");
        assert!(
            watcher.should_reload(),
            "creating file should trigger reload once"
        );
        assert!(
            !watcher.should_reload(),
            "without changes, second poll should not reload"
        );

        let _ = fs::remove_file(path);
    }
}
