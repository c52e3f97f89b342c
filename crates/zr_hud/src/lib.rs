pub mod hud;

pub use hud::{DebugStats, Hud, HudActions, HudView, ModalView};
