//! Entity registry
//!
//! An arena of entities addressed by stable indices. Entities are never
//! removed during a round: pickup and restart only flip the `active` flag, and
//! later spawns of the same kind reuse the inactive slots first.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Stable identifier for an entity (index into the registry arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Collectible,
    Hazard,
    Platform,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Player,
        EntityKind::Collectible,
        EntityKind::Hazard,
        EntityKind::Platform,
    ];

    #[inline]
    fn slot(self) -> usize {
        match self {
            EntityKind::Player => 0,
            EntityKind::Collectible => 1,
            EntityKind::Hazard => 2,
            EntityKind::Platform => 3,
        }
    }

    /// Static bodies are never moved by the integrator
    pub fn is_static(self) -> bool {
        self == EntityKind::Platform
    }
}

/// Visual state requested from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visual {
    /// Default sprite frame
    #[default]
    Idle,
    /// Facing the camera (player standing still)
    Turn,
    RunLeft,
    RunRight,
    /// Player was hit (red tint, facing frame)
    Struck,
}

/// A game object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    /// Full width/height of the bounding box
    pub size: Vec2,
    /// Per-axis restitution used by the integrator
    pub bounce: Vec2,
    /// Where this entity was first spawned (collectibles respawn at `home.x`)
    pub home: Vec2,
    /// Logically present; inactive entities are skipped by collision and rendering
    pub active: bool,
    /// Physical body enabled
    pub solid: bool,
    /// Collides with the play-field edges
    pub bounded: bool,
    /// Touching a surface below (as last reported by the physics engine)
    #[serde(default)]
    pub resting: bool,
    #[serde(default)]
    pub visual: Visual,
    /// Already queued on the kind's free list
    #[serde(skip)]
    pooled: bool,
}

impl Entity {
    fn new(id: EntityId, kind: EntityKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            size: Vec2::ONE,
            bounce: Vec2::ZERO,
            home: pos,
            active: true,
            solid: true,
            bounded: false,
            resting: false,
            visual: Visual::Idle,
            pooled: false,
        }
    }
}

/// Arena of all entities with per-kind pools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    /// Inactive slots per kind (may hold stale ids that were reactivated directly)
    #[serde(skip)]
    free: [Vec<EntityId>; 4],
    active_counts: [usize; 4],
    /// Maximum slots per kind (`None` = unbounded)
    capacities: [Option<usize>; 4],
    slot_counts: [usize; 4],
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    /// Empty registry with no capacity limits
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            free: Default::default(),
            active_counts: [0; 4],
            capacities: [None; 4],
            slot_counts: [0; 4],
        }
    }

    /// Limit the number of slots a kind may ever occupy
    pub fn with_capacity(mut self, kind: EntityKind, capacity: usize) -> Self {
        self.capacities[kind.slot()] = Some(capacity);
        self
    }

    /// Activate an entity of `kind` at `pos`, reusing a pooled slot if one exists
    pub fn spawn(&mut self, kind: EntityKind, pos: Vec2) -> Result<EntityId, SimError> {
        while let Some(id) = self.free[kind.slot()].pop() {
            let entity = &mut self.entities[id.index()];
            entity.pooled = false;
            if entity.active {
                // Reactivated directly since it was pooled
                continue;
            }
            entity.active = true;
            entity.solid = true;
            entity.pos = pos;
            entity.vel = Vec2::ZERO;
            entity.resting = false;
            entity.visual = Visual::Idle;
            self.active_counts[kind.slot()] += 1;
            return Ok(id);
        }

        let slots = self.slot_counts[kind.slot()];
        if let Some(capacity) = self.capacities[kind.slot()] {
            if slots >= capacity {
                return Err(SimError::PoolFull { kind, capacity });
            }
        }

        let id = EntityId(self.entities.len() as u32);
        self.entities.push(Entity::new(id, kind, pos));
        self.slot_counts[kind.slot()] += 1;
        self.active_counts[kind.slot()] += 1;
        Ok(id)
    }

    /// Logically remove an entity. Deactivating an inactive entity is a no-op.
    pub fn deactivate(&mut self, id: EntityId) -> Result<(), SimError> {
        let entity = self
            .entities
            .get_mut(id.index())
            .ok_or(SimError::UnknownEntity(id))?;
        if !entity.active {
            return Ok(());
        }
        entity.active = false;
        entity.solid = false;
        entity.vel = Vec2::ZERO;
        entity.resting = false;
        let kind = entity.kind;
        if !entity.pooled {
            entity.pooled = true;
            self.free[kind.slot()].push(id);
        }
        self.active_counts[kind.slot()] -= 1;
        Ok(())
    }

    /// Bring an entity back at `pos` with zero velocity
    pub fn reactivate(&mut self, id: EntityId, pos: Vec2) -> Result<(), SimError> {
        let entity = self
            .entities
            .get_mut(id.index())
            .ok_or(SimError::UnknownEntity(id))?;
        let was_active = entity.active;
        entity.active = true;
        entity.solid = true;
        entity.pos = pos;
        entity.vel = Vec2::ZERO;
        entity.resting = false;
        if !was_active {
            self.active_counts[entity.kind.slot()] += 1;
        }
        Ok(())
    }

    /// Visit every active entity of `kind` in id order
    pub fn for_each_active(&self, kind: EntityKind, mut f: impl FnMut(&Entity)) {
        for entity in self.active(kind) {
            f(entity);
        }
    }

    /// Active entities of `kind` in id order
    pub fn active(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |e| e.active && e.kind == kind)
    }

    /// Ids of every active entity of `kind` (snapshot, safe to mutate afterwards)
    pub fn active_ids(&self, kind: EntityKind) -> Vec<EntityId> {
        self.active(kind).map(|e| e.id).collect()
    }

    /// Ids of every slot of `kind`, active or not
    pub fn ids_of(&self, kind: EntityKind) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.id)
            .collect()
    }

    #[inline]
    pub fn count_active(&self, kind: EntityKind) -> usize {
        self.active_counts[kind.slot()]
    }

    /// Total slots ever allocated for `kind`
    #[inline]
    pub fn pool_size(&self, kind: EntityKind) -> usize {
        self.slot_counts[kind.slot()]
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.index())
    }

    /// Look up an entity, failing if it does not exist or is of another kind
    pub fn expect_kind(&self, id: EntityId, expected: EntityKind) -> Result<&Entity, SimError> {
        let entity = self.get(id).ok_or(SimError::UnknownEntity(id))?;
        if entity.kind != expected {
            return Err(SimError::KindMismatch {
                id,
                expected,
                actual: entity.kind,
            });
        }
        Ok(entity)
    }

    /// All slots, active or not, in id order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl std::ops::Index<EntityId> for EntityRegistry {
    type Output = Entity;

    fn index(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_assigns_sequential_ids() {
        let mut reg = EntityRegistry::new();
        let a = reg.spawn(EntityKind::Collectible, Vec2::ZERO).unwrap();
        let b = reg.spawn(EntityKind::Hazard, Vec2::ONE).unwrap();
        assert_eq!(a, EntityId(0));
        assert_eq!(b, EntityId(1));
        assert_eq!(reg.count_active(EntityKind::Collectible), 1);
        assert_eq!(reg.count_active(EntityKind::Hazard), 1);
    }

    #[test]
    fn test_deactivate_and_reactivate_keep_slot() {
        let mut reg = EntityRegistry::new();
        let id = reg.spawn(EntityKind::Collectible, Vec2::new(12.0, 0.0)).unwrap();
        reg.get_mut(id).unwrap().vel = Vec2::new(0.0, 50.0);

        reg.deactivate(id).unwrap();
        assert_eq!(reg.count_active(EntityKind::Collectible), 0);
        assert!(!reg.get(id).unwrap().active);
        assert!(!reg.get(id).unwrap().solid);

        // Second deactivate is a no-op
        reg.deactivate(id).unwrap();
        assert_eq!(reg.count_active(EntityKind::Collectible), 0);

        reg.reactivate(id, Vec2::new(12.0, 0.0)).unwrap();
        assert_eq!(reg.count_active(EntityKind::Collectible), 1);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get(id).unwrap().vel, Vec2::ZERO);
    }

    #[test]
    fn test_spawn_reuses_pooled_slot() {
        let mut reg = EntityRegistry::new();
        let first = reg.spawn(EntityKind::Hazard, Vec2::ZERO).unwrap();
        reg.deactivate(first).unwrap();

        let again = reg.spawn(EntityKind::Hazard, Vec2::new(500.0, 16.0)).unwrap();
        assert_eq!(first, again);
        assert_eq!(reg.pool_size(EntityKind::Hazard), 1);
        assert_eq!(reg.get(again).unwrap().pos, Vec2::new(500.0, 16.0));
    }

    #[test]
    fn test_stale_pool_entry_is_skipped() {
        let mut reg = EntityRegistry::new();
        let id = reg.spawn(EntityKind::Hazard, Vec2::ZERO).unwrap();
        reg.deactivate(id).unwrap();
        reg.reactivate(id, Vec2::ZERO).unwrap();

        // The pooled entry is stale, so a fresh slot must be allocated
        let other = reg.spawn(EntityKind::Hazard, Vec2::ZERO).unwrap();
        assert_ne!(id, other);
        assert_eq!(reg.count_active(EntityKind::Hazard), 2);

        // Cycling deactivate/reactivate does not grow the free list
        for _ in 0..10 {
            reg.deactivate(id).unwrap();
            reg.reactivate(id, Vec2::ZERO).unwrap();
        }
        assert!(reg.free[EntityKind::Hazard.slot()].len() <= 1);
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut reg = EntityRegistry::new().with_capacity(EntityKind::Player, 1);
        reg.spawn(EntityKind::Player, Vec2::ZERO).unwrap();
        let err = reg.spawn(EntityKind::Player, Vec2::ZERO).unwrap_err();
        assert_eq!(
            err,
            SimError::PoolFull {
                kind: EntityKind::Player,
                capacity: 1
            }
        );
    }

    #[test]
    fn test_capacity_allows_reuse() {
        let mut reg = EntityRegistry::new().with_capacity(EntityKind::Collectible, 2);
        let a = reg.spawn(EntityKind::Collectible, Vec2::ZERO).unwrap();
        reg.spawn(EntityKind::Collectible, Vec2::ZERO).unwrap();
        reg.deactivate(a).unwrap();
        assert_eq!(reg.spawn(EntityKind::Collectible, Vec2::ZERO).unwrap(), a);
    }

    #[test]
    fn test_for_each_active_skips_inactive() {
        let mut reg = EntityRegistry::new();
        let ids: Vec<_> = (0..4)
            .map(|i| reg.spawn(EntityKind::Collectible, Vec2::new(i as f32, 0.0)).unwrap())
            .collect();
        reg.spawn(EntityKind::Hazard, Vec2::ZERO).unwrap();
        reg.deactivate(ids[1]).unwrap();

        let mut seen = Vec::new();
        reg.for_each_active(EntityKind::Collectible, |e| seen.push(e.id));
        assert_eq!(seen, vec![ids[0], ids[2], ids[3]]);
    }

    #[test]
    fn test_unknown_and_mismatched_ids() {
        let mut reg = EntityRegistry::new();
        let id = reg.spawn(EntityKind::Platform, Vec2::ZERO).unwrap();
        assert_eq!(
            reg.deactivate(EntityId(99)),
            Err(SimError::UnknownEntity(EntityId(99)))
        );
        assert!(matches!(
            reg.expect_kind(id, EntityKind::Hazard),
            Err(SimError::KindMismatch { .. })
        ));
    }
}
