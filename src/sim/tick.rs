//! Per-tick rules
//!
//! Applies resting reports, then the player's movement intent, then drains
//! the remaining events through the state machine. Every transition checks the phase first; an event that
//! arrives in the wrong phase is dropped without effect.

use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind, Visual};
use super::event::GameEvent;
use super::game::Game;
use super::state::GamePhase;
use crate::bridge::Command;
use crate::error::SimError;

/// Horizontal movement request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    #[default]
    None,
}

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub direction: Direction,
    /// Jump is held (only acts while the player rests on a surface)
    pub jump: bool,
    /// Restart prompt was activated this tick
    pub restart: bool,
}

/// Advance the rules by one tick
pub fn tick(game: &mut Game, input: &TickInput) -> Result<(), SimError> {
    game.ticks += 1;

    if input.restart {
        game.request_restart();
    }

    // Resting changes gate this tick's jump, so they land before movement
    let (resting, events): (Vec<_>, Vec<_>) = game
        .events
        .drain()
        .into_iter()
        .partition(|e| matches!(e, GameEvent::EntityRestingOnPlatform { .. }));
    for event in resting {
        handle_event(game, event)?;
    }

    apply_movement(game, input)?;

    let total = events.len();
    for (handled, event) in events.into_iter().enumerate() {
        if handle_event(game, event)? == Flow::RoundReset {
            // Anything queued behind a restart belongs to the old round
            let dropped = total - handled - 1;
            if dropped > 0 {
                log::debug!("Dropped {dropped} events queued before restart");
            }
            break;
        }
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    RoundReset,
}

fn handle_event(game: &mut Game, event: GameEvent) -> Result<Flow, SimError> {
    match event {
        GameEvent::PlayerCollectedItem { item } => collect_item(game, item)?,
        GameEvent::PlayerHitHazard { hazard } => hit_hazard(game, hazard),
        GameEvent::EntityRestingOnPlatform { entity, resting } => set_resting(game, entity, resting),
        GameEvent::RestartRequested => return restart(game),
    }
    Ok(Flow::Continue)
}

/// Steer the player from held input
fn apply_movement(game: &mut Game, input: &TickInput) -> Result<(), SimError> {
    if game.state.phase != GamePhase::Playing || game.frozen {
        return Ok(());
    }

    let run_speed = game.settings.player_run_speed;
    let jump_speed = game.settings.player_jump_speed;
    let id = game.player;
    let player = game
        .entities
        .get_mut(id)
        .ok_or(SimError::UnknownEntity(id))?;

    let (vx, visual) = match input.direction {
        Direction::Left => (-run_speed, Visual::RunLeft),
        Direction::Right => (run_speed, Visual::RunRight),
        Direction::None => (0.0, Visual::Turn),
    };
    player.vel.x = vx;
    if input.jump && player.resting {
        player.vel.y = -jump_speed;
    }

    if player.visual != visual {
        player.visual = visual;
        game.commands.push(Command::SetVisual { id, visual });
    }
    Ok(())
}

/// Pick up a collectible; clearing the last one starts the next level
fn collect_item(game: &mut Game, item: EntityId) -> Result<(), SimError> {
    if game.state.phase != GamePhase::Playing {
        log::debug!("Ignoring pickup of {} during {:?}", item.0, game.state.phase);
        return Ok(());
    }
    let entity = game.entities.expect_kind(item, EntityKind::Collectible)?;
    if !entity.active {
        // Stale report for an item already picked up this tick
        return Ok(());
    }

    game.entities.deactivate(item)?;
    let points = game.state.award(game.settings.points_per_item);
    game.commands.push(Command::Remove { id: item });
    game.commands.push(Command::RenderScore(game.state.score));
    log::trace!("Collected {} for {} points", item.0, points);

    if game.entities.count_active(EntityKind::Collectible) == 0 {
        level_up(game)?;
    }
    Ok(())
}

fn level_up(game: &mut Game) -> Result<(), SimError> {
    game.respawn_collectibles()?;
    let player_x = game.player_entity().pos.x;
    game.spawn_hazard(player_x)?;
    game.state.level_up();
    game.commands.push(Command::RenderLevel(game.state.level));
    log::info!(
        "Level {} reached (score {}, {} hazards)",
        game.state.level,
        game.state.score,
        game.entities.count_active(EntityKind::Hazard)
    );
    Ok(())
}

/// End the round: freeze physics, tint the player, show the panel
fn hit_hazard(game: &mut Game, hazard: EntityId) {
    if game.state.phase != GamePhase::Playing {
        log::debug!("Ignoring hazard {} during {:?}", hazard.0, game.state.phase);
        return;
    }
    if !game.entities.get(hazard).is_some_and(|h| h.active) {
        return;
    }

    game.frozen = true;
    game.state.phase = GamePhase::GameOver;

    let id = game.player;
    if let Some(player) = game.entities.get_mut(id) {
        player.visual = Visual::Struck;
    }

    let (level, score) = (game.state.level, game.state.score);
    game.commands.push(Command::FreezeSimulation);
    game.commands.push(Command::SetVisual {
        id,
        visual: Visual::Struck,
    });
    game.commands.push(Command::SetHudVisible(false));
    game.commands.push(Command::ShowGameOverPanel { level, score });
    game.commands.push(Command::ShowRestartPrompt);
    log::info!("Game over at level {level} with score {score}");
}

fn set_resting(game: &mut Game, id: EntityId, resting: bool) {
    if game.state.phase != GamePhase::Playing {
        return;
    }
    if let Some(entity) = game.entities.get_mut(id) {
        if entity.active {
            entity.resting = resting;
        }
    }
}

/// Start a fresh round in place
fn restart(game: &mut Game) -> Result<Flow, SimError> {
    if game.state.phase != GamePhase::GameOver {
        log::debug!("Ignoring restart request while playing");
        return Ok(Flow::Continue);
    }

    game.reset_round()?;
    let player_x = game.player_entity().pos.x;
    game.spawn_hazard(player_x)?;
    log::info!("Round {} started", game.round);
    Ok(Flow::RoundReset)
}
