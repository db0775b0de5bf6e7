//! Collision rules
//!
//! Declares which entity kinds interact and how. `Solid` pairs block each
//! other's movement (the physics engine does the blocking); `Overlap` pairs
//! pass through each other. Either mode may carry a handler that turns a
//! reported contact into a [`GameEvent`].

use super::entity::{Entity, EntityId, EntityKind, EntityRegistry};
use super::event::GameEvent;
use crate::aabb_overlap;

/// How a pair of kinds interacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionMode {
    Solid,
    Overlap,
}

/// Turns a contact between `a` and `b` into an event. Only reads the pair.
pub type ContactHandler = fn(a: &Entity, b: &Entity) -> Option<GameEvent>;

/// A declared interaction between two kinds
#[derive(Debug, Clone, Copy)]
pub struct CollisionRule {
    pub a: EntityKind,
    pub b: EntityKind,
    pub mode: CollisionMode,
    pub handler: Option<ContactHandler>,
}

impl CollisionRule {
    pub const fn solid(a: EntityKind, b: EntityKind) -> Self {
        Self {
            a,
            b,
            mode: CollisionMode::Solid,
            handler: None,
        }
    }

    pub const fn overlap(a: EntityKind, b: EntityKind, handler: ContactHandler) -> Self {
        Self {
            a,
            b,
            mode: CollisionMode::Overlap,
            handler: Some(handler),
        }
    }

    pub const fn on_contact(mut self, handler: ContactHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Does this rule cover the kind pair (in either order)?
    /// Returns whether the pair must be swapped to match rule order.
    fn matches(&self, a: EntityKind, b: EntityKind) -> Option<bool> {
        if self.a == a && self.b == b {
            Some(false)
        } else if self.a == b && self.b == a {
            Some(true)
        } else {
            None
        }
    }
}

fn collect_item(_player: &Entity, item: &Entity) -> Option<GameEvent> {
    Some(GameEvent::PlayerCollectedItem { item: item.id })
}

fn hit_hazard(_player: &Entity, hazard: &Entity) -> Option<GameEvent> {
    Some(GameEvent::PlayerHitHazard { hazard: hazard.id })
}

/// The rule table, registered once at setup
#[derive(Debug, Clone)]
pub struct CollisionRules {
    rules: Vec<CollisionRule>,
}

impl Default for CollisionRules {
    fn default() -> Self {
        Self::standard()
    }
}

impl CollisionRules {
    /// Empty rule table
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The game's interactions: everything lands on platforms, the player
    /// picks up collectibles and dies on hazards.
    pub fn standard() -> Self {
        use EntityKind::*;
        Self::new()
            .with(CollisionRule::solid(Player, Platform))
            .with(CollisionRule::solid(Collectible, Platform))
            .with(CollisionRule::solid(Hazard, Platform))
            .with(CollisionRule::overlap(Player, Collectible, collect_item))
            .with(CollisionRule::solid(Player, Hazard).on_contact(hit_hazard))
    }

    pub fn with(mut self, rule: CollisionRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rule for a kind pair, in either order
    pub fn rule_for(&self, a: EntityKind, b: EntityKind) -> Option<&CollisionRule> {
        self.rules.iter().find(|r| r.matches(a, b).is_some())
    }

    /// Do these kinds block each other?
    pub fn is_solid(&self, a: EntityKind, b: EntityKind) -> bool {
        self.rule_for(a, b)
            .is_some_and(|r| r.mode == CollisionMode::Solid)
    }

    /// Translate a reported contact between two entities into an event.
    ///
    /// Unknown or inactive entities, undeclared pairs, and rules without a
    /// handler all yield `None`.
    pub fn resolve(
        &self,
        registry: &EntityRegistry,
        a: EntityId,
        b: EntityId,
    ) -> Option<GameEvent> {
        let ea = registry.get(a)?;
        let eb = registry.get(b)?;
        if !ea.active || !eb.active {
            return None;
        }
        for rule in &self.rules {
            let Some(swap) = rule.matches(ea.kind, eb.kind) else {
                continue;
            };
            let handler = rule.handler?;
            return if swap { handler(eb, ea) } else { handler(ea, eb) };
        }
        None
    }

    /// Scan active entities for intersecting pairs covered by a rule with a
    /// handler. Static pairs (platforms) are left to the integrator.
    pub fn detect_contacts(&self, registry: &EntityRegistry) -> Vec<(EntityId, EntityId)> {
        let mut pairs = Vec::new();
        for rule in &self.rules {
            if rule.handler.is_none() {
                continue;
            }
            for a in registry.active(rule.a) {
                for b in registry.active(rule.b) {
                    if a.id != b.id && aabb_overlap(a.pos, a.size, b.pos, b.size) {
                        pairs.push((a.id, b.id));
                    }
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn setup() -> (EntityRegistry, EntityId, EntityId, EntityId) {
        let mut reg = EntityRegistry::new();
        let player = reg.spawn(EntityKind::Player, Vec2::new(100.0, 100.0)).unwrap();
        let star = reg.spawn(EntityKind::Collectible, Vec2::new(105.0, 100.0)).unwrap();
        let bomb = reg.spawn(EntityKind::Hazard, Vec2::new(300.0, 100.0)).unwrap();
        for id in [player, star, bomb] {
            reg.get_mut(id).unwrap().size = Vec2::new(20.0, 20.0);
        }
        (reg, player, star, bomb)
    }

    #[test]
    fn test_resolve_in_either_order() {
        let (reg, player, star, bomb) = setup();
        let rules = CollisionRules::standard();
        let expected = Some(GameEvent::PlayerCollectedItem { item: star });
        assert_eq!(rules.resolve(&reg, player, star), expected);
        assert_eq!(rules.resolve(&reg, star, player), expected);
        assert_eq!(
            rules.resolve(&reg, bomb, player),
            Some(GameEvent::PlayerHitHazard { hazard: bomb })
        );
    }

    #[test]
    fn test_resolve_ignores_inactive() {
        let (mut reg, player, star, _) = setup();
        reg.deactivate(star).unwrap();
        assert_eq!(CollisionRules::standard().resolve(&reg, player, star), None);
    }

    #[test]
    fn test_resolve_ignores_undeclared_and_unknown() {
        let (reg, _, star, bomb) = setup();
        let rules = CollisionRules::standard();
        assert_eq!(rules.resolve(&reg, star, bomb), None);
        assert_eq!(rules.resolve(&reg, star, EntityId(42)), None);
    }

    #[test]
    fn test_solid_pairs() {
        let rules = CollisionRules::standard();
        assert!(rules.is_solid(EntityKind::Platform, EntityKind::Collectible));
        assert!(rules.is_solid(EntityKind::Player, EntityKind::Hazard));
        assert!(!rules.is_solid(EntityKind::Player, EntityKind::Collectible));
        assert!(!rules.is_solid(EntityKind::Hazard, EntityKind::Collectible));
    }

    #[test]
    fn test_detect_contacts() {
        let (mut reg, player, star, bomb) = setup();
        let rules = CollisionRules::standard();
        assert_eq!(rules.detect_contacts(&reg), vec![(player, star)]);

        reg.get_mut(bomb).unwrap().pos = Vec2::new(95.0, 100.0);
        reg.deactivate(star).unwrap();
        assert_eq!(rules.detect_contacts(&reg), vec![(player, bomb)]);
    }
}
