//! The round owner
//!
//! `Game` bundles everything a round needs: progress, the entity arena, the
//! rule table, the spawn RNG, and the queues in and out. The host engine
//! talks to it only through the `report_*` methods, `tick`, and the command
//! outbox.

use glam::Vec2;

use super::collision::CollisionRules;
use super::entity::{Entity, EntityId, EntityKind, EntityRegistry, Visual};
use super::event::{EventQueue, GameEvent};
use super::spawn::SpawnPolicy;
use super::state::GameState;
use super::tick::{Direction, TickInput, tick};
use crate::bridge::Command;
use crate::consts::*;
use crate::error::SimError;
use crate::settings::Settings;

/// A running game: one round at a time, restartable in place
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) settings: Settings,
    pub(crate) state: GameState,
    pub(crate) entities: EntityRegistry,
    pub(crate) rules: CollisionRules,
    pub(crate) spawner: SpawnPolicy,
    pub(crate) events: EventQueue,
    pub(crate) commands: Vec<Command>,
    pub(crate) player: EntityId,
    /// Physics is paused (set on game over)
    pub(crate) frozen: bool,
    /// Rounds started since creation (1-based)
    pub(crate) round: u32,
    pub(crate) ticks: u64,
    /// Latest movement intent reported by the host
    pub(crate) input: TickInput,
}

impl Game {
    /// Set up the first round: platforms, player, the collectible row and one
    /// hazard. `settings` must already be validated.
    pub fn new(settings: Settings) -> Result<Self, SimError> {
        debug_assert!(settings.validate().is_ok(), "unvalidated settings");

        let entities = EntityRegistry::new()
            .with_capacity(EntityKind::Player, 1)
            .with_capacity(EntityKind::Collectible, settings.collectible_count);
        let spawner = SpawnPolicy::new(&settings);

        let mut game = Self {
            settings,
            state: GameState::new(),
            entities,
            rules: CollisionRules::standard(),
            spawner,
            events: EventQueue::new(),
            commands: Vec::new(),
            player: EntityId(0),
            frozen: false,
            round: 1,
            ticks: 0,
            input: TickInput::default(),
        };

        game.create_scenery()?;
        game.player = game.create_player()?;
        game.create_collectibles()?;
        game.commands.push(Command::SetHudVisible(true));
        game.commands.push(Command::RenderLevel(game.state.level));
        game.commands.push(Command::RenderScore(game.state.score));
        let player_x = game.player_entity().pos.x;
        game.spawn_hazard(player_x)?;

        debug_assert_eq!(game.entities.count_active(EntityKind::Player), 1);
        log::info!(
            "Game initialized with seed {} ({} collectibles)",
            game.settings.seed,
            game.entities.count_active(EntityKind::Collectible)
        );
        Ok(game)
    }

    fn create_scenery(&mut self) -> Result<(), SimError> {
        for (x, y, scale) in PLATFORM_LAYOUT {
            let size = Vec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT) * scale;
            self.spawn_with(EntityKind::Platform, Vec2::new(x, y), |e| {
                e.size = size;
            })?;
        }
        Ok(())
    }

    fn create_player(&mut self) -> Result<EntityId, SimError> {
        let start = Vec2::from(self.settings.player_start);
        self.spawn_with(EntityKind::Player, start, |e| {
            e.size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
            e.bounce = Vec2::splat(PLAYER_BOUNCE);
            e.bounded = true;
        })
    }

    fn create_collectibles(&mut self) -> Result<(), SimError> {
        let layout: Vec<Vec2> = self.spawner.collectible_layout().collect();
        for pos in layout {
            let bounce_y = self.spawner.collectible_bounce();
            self.spawn_with(EntityKind::Collectible, pos, |e| {
                e.size = Vec2::new(COLLECTIBLE_WIDTH, COLLECTIBLE_HEIGHT);
                e.bounce = Vec2::new(0.0, bounce_y);
            })?;
        }
        Ok(())
    }

    /// Drop a new hazard on the far side from `player_x`, recycling a pooled
    /// slot when one is free
    pub(crate) fn spawn_hazard(&mut self, player_x: f32) -> Result<EntityId, SimError> {
        let hazard = self.spawner.drop_hazard(player_x);
        let id = self.spawn_with(EntityKind::Hazard, hazard.pos, |e| {
            e.vel = hazard.vel;
            e.size = Vec2::splat(HAZARD_SIZE);
            e.bounce = Vec2::splat(HAZARD_BOUNCE);
            e.bounded = true;
        })?;
        log::debug!("Hazard {} dropped at {} moving {}", id.0, hazard.pos, hazard.vel);
        Ok(id)
    }

    fn spawn_with(
        &mut self,
        kind: EntityKind,
        pos: Vec2,
        configure: impl FnOnce(&mut Entity),
    ) -> Result<EntityId, SimError> {
        let id = self.entities.spawn(kind, pos)?;
        let entity = self
            .entities
            .get_mut(id)
            .ok_or(SimError::UnknownEntity(id))?;
        configure(entity);
        self.commands.push(Command::Spawn {
            id,
            kind,
            pos: entity.pos,
            vel: entity.vel,
        });
        Ok(id)
    }

    /// Put every entity back to its round-start layout and reset progress.
    /// Leaves zero hazards in play; the caller drops the opening one.
    pub(crate) fn reset_round(&mut self) -> Result<(), SimError> {
        for id in self.entities.active_ids(EntityKind::Hazard) {
            self.entities.deactivate(id)?;
            self.commands.push(Command::Remove { id });
        }

        self.respawn_collectibles()?;

        let start = Vec2::from(self.settings.player_start);
        let player = self.player;
        self.entities.reactivate(player, start)?;
        if let Some(entity) = self.entities.get_mut(player) {
            entity.visual = Visual::Idle;
        }
        self.commands.push(Command::Reactivate { id: player, pos: start });
        self.commands.push(Command::SetVisual {
            id: player,
            visual: Visual::Idle,
        });

        self.state = GameState::new();
        self.frozen = false;
        self.round += 1;
        self.input = TickInput::default();

        self.commands.push(Command::HideGameOverPanel);
        self.commands.push(Command::ResumeSimulation);
        self.commands.push(Command::SetHudVisible(true));
        self.commands.push(Command::RenderLevel(self.state.level));
        self.commands.push(Command::RenderScore(self.state.score));
        Ok(())
    }

    /// Bring every collectible back at its layout column, at spawn height
    pub(crate) fn respawn_collectibles(&mut self) -> Result<(), SimError> {
        for id in self.entities.ids_of(EntityKind::Collectible) {
            let home = self.entities.expect_kind(id, EntityKind::Collectible)?.home;
            let pos = self.spawner.collectible_respawn(home);
            self.entities.reactivate(id, pos)?;
            self.commands.push(Command::Reactivate { id, pos });
        }
        Ok(())
    }

    // === Host → core ===

    /// The physics engine saw `a` and `b` intersect (or touch, for solid
    /// pairs). Pairs without a handler and inactive entities are ignored.
    pub fn report_overlap(&mut self, a: EntityId, b: EntityId) -> Result<(), SimError> {
        for id in [a, b] {
            if self.entities.get(id).is_none() {
                return Err(SimError::UnknownEntity(id));
            }
        }
        if let Some(event) = self.rules.resolve(&self.entities, a, b) {
            if !self.events.push(event) {
                log::trace!("Coalesced repeat report {:?}", event);
            }
        }
        Ok(())
    }

    /// The physics engine's "touching down" flag changed for `id`
    pub fn report_resting_on_surface(
        &mut self,
        id: EntityId,
        resting: bool,
    ) -> Result<(), SimError> {
        if self.entities.get(id).is_none() {
            return Err(SimError::UnknownEntity(id));
        }
        self.events.push(GameEvent::EntityRestingOnPlatform { entity: id, resting });
        Ok(())
    }

    /// Held movement input; applied on every following tick until changed
    pub fn report_movement_intent(&mut self, direction: Direction, jump: bool) {
        self.input.direction = direction;
        self.input.jump = jump;
    }

    /// Queue a restart. Only takes effect during game over.
    pub fn request_restart(&mut self) {
        self.events.push(GameEvent::RestartRequested);
    }

    /// Advance one tick with the latest reported movement intent
    pub fn update(&mut self) -> Result<(), SimError> {
        let input = self.input;
        tick(self, &input)
    }

    // === Core → host ===

    /// Take every command issued since the last drain
    pub fn drain_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn pending_commands(&self) -> &[Command] {
        &self.commands
    }

    // === Accessors ===

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    /// Bodies and rules for the physics collaborator. Only positions,
    /// velocities and sizes are meant to be written through this.
    pub fn physics_view(&mut self) -> (&mut EntityRegistry, &CollisionRules) {
        (&mut self.entities, &self.rules)
    }

    pub fn rules(&self) -> &CollisionRules {
        &self.rules
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn player_entity(&self) -> &Entity {
        // Created in `new` and never leaves the arena
        &self.entities[self.player]
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
