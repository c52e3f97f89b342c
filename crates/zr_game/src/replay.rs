use crate::controller::{ControllerInput, Turn};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    pub seed: u64,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub turn: Turn,
    #[serde(default)]
    pub forward: bool,
    #[serde(default)]
    pub backward: bool,
    #[serde(default)]
    pub strafe_left: bool,
    #[serde(default)]
    pub strafe_right: bool,
    #[serde(default)]
    pub fire: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<ControllerInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(ControllerInput {
                    turn: frame.turn,
                    forward: frame.forward,
                    backward: frame.backward,
                    strafe_left: frame.strafe_left,
                    strafe_right: frame.strafe_right,
                    fire: frame.fire,
                });
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::{Game, StepOutcome};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "zr_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn run(replay: &ReplaySequence) -> (Game, u32) {
        let mut game = Game::new(GameConfig {
            seed: Some(replay.seed),
            ..GameConfig::default()
        });
        let mut deaths = 0;
        for input in replay.expanded_inputs() {
            if let StepOutcome::PlayerDied { .. } = game.step(&input) {
                deaths += 1;
            }
        }
        (game, deaths)
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "seed": 7,
              "frames": [
                { "forward": true, "repeat": 3 },
                { "turn": "left", "fire": true }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 4);
        assert!(expanded[0].forward);
        assert_eq!(expanded[3].turn, Turn::Left);
        assert!(expanded[3].fire);
        assert!(!expanded[3].forward);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_replay_is_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "seed": 1, "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay must fail");
        assert!(err.contains("empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn unknown_turn_is_a_parse_error() {
        let path = temp_file_path("bad_turn");
        fs::write(&path, r#"{ "seed": 1, "frames": [ { "turn": "up" } ] }"#)
            .expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("bad turn must fail");
        assert!(err.contains("Failed to parse replay JSON"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let path = temp_file_path("deterministic");
        fs::write(
            &path,
            r#"{
              "seed": 20240611,
              "frames": [
                { "forward": true, "repeat": 60 },
                { "fire": true },
                { "turn": "right", "repeat": 45 },
                { "fire": true },
                { "strafe_left": true, "backward": true, "repeat": 120 },
                { "turn": "left", "fire": true, "repeat": 30 },
                { "repeat": 600 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let (run_a, deaths_a) = run(&replay);
        let (run_b, deaths_b) = run(&replay);

        assert_eq!(run_a.world, run_b.world);
        assert_eq!(run_a.score, run_b.score);
        assert_eq!(run_a.ammo, run_b.ammo);
        assert_eq!(run_a.spawn_wait, run_b.spawn_wait);
        assert_eq!(run_a.frame, run_b.frame);
        assert_eq!(deaths_a, deaths_b);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn different_seeds_diverge() {
        let frames = vec![ReplayFrame {
            turn: Turn::None,
            forward: false,
            backward: false,
            strafe_left: false,
            strafe_right: false,
            fire: false,
            repeat: 10,
        }];
        let (a, _) = run(&ReplaySequence {
            seed: 1,
            frames: frames.clone(),
        });
        let (b, _) = run(&ReplaySequence { seed: 2, frames });
        assert_ne!(a.world.scenery, b.world.scenery);
    }
}
