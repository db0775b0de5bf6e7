//! Presentation bridge
//!
//! The rules engine never draws anything. It queues [`Command`]s which the
//! host hands to a [`Presenter`]; the presenter owns sprites, text and the
//! physics pause switch. The only thing flowing back is the restart request,
//! delivered through the [`RestartPrompt`] token.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{EntityId, EntityKind, Game, Visual};

/// Output of the rules engine, in the order it was issued
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Command {
    RenderScore(u64),
    RenderLevel(u32),
    /// Show or hide the in-game score/level text
    SetHudVisible(bool),
    SetVisual { id: EntityId, visual: Visual },
    /// A new or recycled entity entered play
    Spawn {
        id: EntityId,
        kind: EntityKind,
        pos: Vec2,
        vel: Vec2,
    },
    /// Hide the entity and disable its body
    Remove { id: EntityId },
    /// Show the entity again and re-enable its body at `pos`
    Reactivate { id: EntityId, pos: Vec2 },
    /// Stop advancing physics
    FreezeSimulation,
    ResumeSimulation,
    ShowGameOverPanel { level: u32, score: u64 },
    HideGameOverPanel,
    ShowRestartPrompt,
}

/// Handle given to the presenter with the restart prompt.
///
/// Activating it asks the game to restart. A prompt left over from an
/// earlier round does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartPrompt {
    round: u32,
}

impl RestartPrompt {
    pub(crate) fn new(round: u32) -> Self {
        Self { round }
    }

    /// Round the prompt was shown for
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The prompt's on-activate callback. Returns true if a restart was queued.
    pub fn activate(self, game: &mut Game) -> bool {
        if game.round() != self.round {
            log::debug!(
                "Ignoring stale restart prompt (round {}, now {})",
                self.round,
                game.round()
            );
            return false;
        }
        game.request_restart();
        true
    }
}

/// Receiver for rules-engine output
pub trait Presenter {
    fn render_score(&mut self, score: u64);
    fn render_level(&mut self, level: u32);
    fn set_hud_visible(&mut self, _visible: bool) {}
    fn set_entity_visual(&mut self, id: EntityId, visual: Visual);
    fn spawn_entity(&mut self, _id: EntityId, _kind: EntityKind, _pos: Vec2, _vel: Vec2) {}
    fn remove_entity(&mut self, _id: EntityId) {}
    fn reactivate_entity(&mut self, _id: EntityId, _pos: Vec2) {}
    fn freeze_simulation(&mut self);
    fn resume_simulation(&mut self) {}
    fn show_game_over_panel(&mut self, level: u32, score: u64);
    fn hide_game_over_panel(&mut self) {}
    /// Display the "Try Again" prompt; activating it must call [`RestartPrompt::activate`]
    fn show_restart_prompt(&mut self, prompt: RestartPrompt);
}

/// Feed every pending command of `game` to `presenter`
pub fn present(game: &mut Game, presenter: &mut impl Presenter) {
    let round = game.round();
    for command in game.drain_commands() {
        dispatch(command, round, presenter);
    }
}

fn dispatch(command: Command, round: u32, presenter: &mut impl Presenter) {
    match command {
        Command::RenderScore(score) => presenter.render_score(score),
        Command::RenderLevel(level) => presenter.render_level(level),
        Command::SetHudVisible(visible) => presenter.set_hud_visible(visible),
        Command::SetVisual { id, visual } => presenter.set_entity_visual(id, visual),
        Command::Spawn { id, kind, pos, vel } => presenter.spawn_entity(id, kind, pos, vel),
        Command::Remove { id } => presenter.remove_entity(id),
        Command::Reactivate { id, pos } => presenter.reactivate_entity(id, pos),
        Command::FreezeSimulation => presenter.freeze_simulation(),
        Command::ResumeSimulation => presenter.resume_simulation(),
        Command::ShowGameOverPanel { level, score } => presenter.show_game_over_panel(level, score),
        Command::HideGameOverPanel => presenter.hide_game_over_panel(),
        Command::ShowRestartPrompt => presenter.show_restart_prompt(RestartPrompt::new(round)),
    }
}

/// HUD score line
pub fn score_text(score: u64) -> String {
    format!("Score: {score}")
}

/// HUD level line
pub fn level_text(level: u32) -> String {
    format!("Level: {level}")
}

/// Lines of the game-over panel, top to bottom
pub fn game_over_lines(level: u32, score: u64) -> [String; 3] {
    [
        format!("Level = {level}"),
        format!("Score = {score}"),
        "Try Again".to_string(),
    ]
}

/// Presenter that writes everything to the log and keeps the last prompt
#[derive(Debug, Default)]
pub struct LogPresenter {
    pub frozen: bool,
    pub prompt: Option<RestartPrompt>,
}

impl Presenter for LogPresenter {
    fn render_score(&mut self, score: u64) {
        log::debug!("{}", score_text(score));
    }

    fn render_level(&mut self, level: u32) {
        log::info!("{}", level_text(level));
    }

    fn set_entity_visual(&mut self, id: EntityId, visual: Visual) {
        log::trace!("Entity {} -> {:?}", id.0, visual);
    }

    fn spawn_entity(&mut self, id: EntityId, kind: EntityKind, pos: Vec2, vel: Vec2) {
        log::debug!("Spawn {:?} {} at {} moving {}", kind, id.0, pos, vel);
    }

    fn freeze_simulation(&mut self) {
        self.frozen = true;
    }

    fn resume_simulation(&mut self) {
        self.frozen = false;
    }

    fn show_game_over_panel(&mut self, level: u32, score: u64) {
        for line in game_over_lines(level, score) {
            log::info!("{line}");
        }
    }

    fn hide_game_over_panel(&mut self) {
        self.prompt = None;
    }

    fn show_restart_prompt(&mut self, prompt: RestartPrompt) {
        self.prompt = Some(prompt);
    }
}

/// Presenter that records what it was told (headless hosts and tests)
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub score: u64,
    pub level: u32,
    pub hud_visible: bool,
    pub frozen: bool,
    pub game_over_panel: Option<(u32, u64)>,
    pub prompt: Option<RestartPrompt>,
    pub visuals: Vec<(EntityId, Visual)>,
    pub spawned: Vec<EntityId>,
    pub removed: Vec<EntityId>,
    pub reactivated: Vec<EntityId>,
}

impl Presenter for RecordingPresenter {
    fn render_score(&mut self, score: u64) {
        self.score = score;
    }

    fn render_level(&mut self, level: u32) {
        self.level = level;
    }

    fn set_hud_visible(&mut self, visible: bool) {
        self.hud_visible = visible;
    }

    fn set_entity_visual(&mut self, id: EntityId, visual: Visual) {
        self.visuals.push((id, visual));
    }

    fn spawn_entity(&mut self, id: EntityId, _kind: EntityKind, _pos: Vec2, _vel: Vec2) {
        self.spawned.push(id);
    }

    fn remove_entity(&mut self, id: EntityId) {
        self.removed.push(id);
    }

    fn reactivate_entity(&mut self, id: EntityId, _pos: Vec2) {
        self.reactivated.push(id);
    }

    fn freeze_simulation(&mut self) {
        self.frozen = true;
    }

    fn resume_simulation(&mut self) {
        self.frozen = false;
    }

    fn show_game_over_panel(&mut self, level: u32, score: u64) {
        self.game_over_panel = Some((level, score));
    }

    fn hide_game_over_panel(&mut self) {
        self.game_over_panel = None;
        self.prompt = None;
    }

    fn show_restart_prompt(&mut self, prompt: RestartPrompt) {
        self.prompt = Some(prompt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_formats() {
        assert_eq!(score_text(120), "Score: 120");
        assert_eq!(level_text(2), "Level: 2");
        assert_eq!(
            game_over_lines(2, 120),
            [
                "Level = 2".to_string(),
                "Score = 120".to_string(),
                "Try Again".to_string()
            ]
        );
    }

    #[test]
    fn test_dispatch_routes_commands() {
        let mut presenter = RecordingPresenter::default();
        let commands = [
            Command::RenderScore(30),
            Command::RenderLevel(2),
            Command::SetHudVisible(true),
            Command::Remove { id: EntityId(4) },
            Command::FreezeSimulation,
            Command::ShowGameOverPanel { level: 2, score: 30 },
            Command::ShowRestartPrompt,
        ];
        for command in commands {
            dispatch(command, 7, &mut presenter);
        }
        assert_eq!(presenter.score, 30);
        assert_eq!(presenter.level, 2);
        assert!(presenter.hud_visible);
        assert_eq!(presenter.removed, vec![EntityId(4)]);
        assert!(presenter.frozen);
        assert_eq!(presenter.game_over_panel, Some((2, 30)));
        assert_eq!(presenter.prompt.map(|p| p.round()), Some(7));

        dispatch(Command::HideGameOverPanel, 7, &mut presenter);
        assert_eq!(presenter.game_over_panel, None);
        assert_eq!(presenter.prompt, None);
    }
}
