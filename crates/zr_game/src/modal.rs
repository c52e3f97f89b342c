//! Blocking dialogs: welcome, pause and death.
//!
//! While a modal is open the simulation does not step. Every transition reports
//! whether it changed anything so the caller can drop held keys and the clock
//! backlog exactly once per open/close.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Welcome,
    Paused { score: u32 },
    Died { score: u32 },
}

impl Modal {
    pub fn title(&self) -> &'static str {
        match self {
            Modal::Welcome => "Zombie Rampage",
            Modal::Paused { .. } => "Game Paused",
            Modal::Died { .. } => "You Died",
        }
    }

    pub fn body(&self) -> String {
        match self {
            Modal::Welcome => [
                "Welcome to Zombie Rampage!",
                "",
                "Controls:",
                "  W/S or Up/Down: move forward and back",
                "  A/D or Left/Right: turn",
                "  Q & E or N & M: strafe",
                "  Space: fire",
                "  P: pause",
                "",
                "Ammo trickles back over time and some kills refund a round.",
                "Don't let the zombies reach you.",
            ]
            .join("\n"),
            Modal::Paused { score } => format!("Score is {score}"),
            Modal::Died { score } => format!("You have been eaten by a zombie!\nYour score was {score}"),
        }
    }

    pub fn button_label(&self) -> &'static str {
        match self {
            Modal::Welcome => "Start",
            Modal::Paused { .. } => "Resume",
            Modal::Died { .. } => "Play again",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalState {
    active: Option<Modal>,
}

impl ModalState {
    /// A new session opens on the welcome dialog.
    pub fn new() -> Self {
        Self {
            active: Some(Modal::Welcome),
        }
    }

    pub fn current(&self) -> Option<Modal> {
        self.active
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// P opens the pause dialog during play and closes it again. It does
    /// nothing while another dialog is up.
    pub fn toggle_pause(&mut self, score: u32) -> bool {
        match self.active {
            None => {
                self.active = Some(Modal::Paused { score });
                log::info!("Paused at score {score}");
                true
            }
            Some(Modal::Paused { .. }) => {
                self.active = None;
                log::info!("Resumed");
                true
            }
            Some(_) => false,
        }
    }

    /// Enter or the dialog button closes whatever is open.
    pub fn acknowledge(&mut self) -> bool {
        match self.active.take() {
            Some(modal) => {
                log::debug!("Dismissed '{}'", modal.title());
                true
            }
            None => false,
        }
    }

    /// Death replaces any open dialog.
    pub fn player_died(&mut self, score: u32) -> bool {
        self.active = Some(Modal::Died { score });
        true
    }
}

impl Default for ModalState {
    fn default() -> Self {
        Self::new()
    }
}
