//! Headless arcade physics
//!
//! A minimal stand-in for the host engine's physics: gravity, per-axis
//! bounce, field bounds, and axis-aligned resolution against static
//! platforms. It moves bodies and reports what it sees back to the rules
//! engine; it never touches score, level or phase.

use glam::Vec2;

use crate::aabb_penetration;
use crate::error::SimError;
use crate::sim::{Entity, EntityId, EntityKind, Game};

/// Rebounds slower than this settle to rest instead of jittering
const REST_SPEED: f32 = 10.0;

/// Play-field rectangle, origin at the top-left
#[derive(Debug, Clone, Copy)]
pub struct FieldBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl FieldBounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }
}

/// What one step observed
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StepReport {
    /// Intersecting pairs that a collision rule reacts to
    pub contacts: Vec<(EntityId, EntityId)>,
    /// Entities whose resting state flipped this step
    pub resting: Vec<(EntityId, bool)>,
}

/// Gravity integrator over the game's bodies
#[derive(Debug, Clone)]
pub struct ArcadePhysics {
    pub gravity: f32,
    pub bounds: FieldBounds,
}

impl ArcadePhysics {
    pub fn new(gravity: f32, bounds: FieldBounds) -> Self {
        Self { gravity, bounds }
    }

    pub fn from_game(game: &Game) -> Self {
        let settings = game.settings();
        Self::new(
            settings.gravity,
            FieldBounds::new(settings.field_width, settings.field_height),
        )
    }

    /// Integrate one step and feed contacts and resting changes to `game`.
    /// Does nothing while the game has physics frozen.
    pub fn step(&self, game: &mut Game, dt: f32) -> Result<StepReport, SimError> {
        if game.is_frozen() {
            return Ok(StepReport::default());
        }

        let report = {
            let (entities, rules) = game.physics_view();
            let platforms: Vec<(Vec2, Vec2)> = entities
                .active(EntityKind::Platform)
                .map(|p| (p.pos, p.size))
                .collect();

            let mut resting = Vec::new();
            for entity in entities.iter_mut() {
                if !entity.active || !entity.solid || entity.kind.is_static() {
                    continue;
                }
                entity.vel.y += self.gravity * dt;
                entity.pos += entity.vel * dt;

                let mut touching_down = false;
                if rules.is_solid(entity.kind, EntityKind::Platform) {
                    for &(pos, size) in &platforms {
                        touching_down |= resolve_static(entity, pos, size);
                    }
                }
                if entity.bounded {
                    touching_down |= self.clamp_to_bounds(entity);
                }

                if touching_down != entity.resting {
                    resting.push((entity.id, touching_down));
                }
            }

            StepReport {
                contacts: rules.detect_contacts(entities),
                resting,
            }
        };

        for &(a, b) in &report.contacts {
            game.report_overlap(a, b)?;
        }
        for &(id, resting) in &report.resting {
            game.report_resting_on_surface(id, resting)?;
        }
        Ok(report)
    }

    /// Keep a body inside the field. Returns true if it sits on the floor.
    fn clamp_to_bounds(&self, entity: &mut Entity) -> bool {
        let half = entity.size * 0.5;
        let min = self.bounds.min + half;
        let max = self.bounds.max - half;
        let mut on_floor = false;

        if entity.pos.x < min.x {
            entity.pos.x = min.x;
            entity.vel.x = rebound(entity.vel.x, entity.bounce.x);
        } else if entity.pos.x > max.x {
            entity.pos.x = max.x;
            entity.vel.x = rebound(entity.vel.x, entity.bounce.x);
        }

        if entity.pos.y < min.y {
            entity.pos.y = min.y;
            entity.vel.y = rebound(entity.vel.y, entity.bounce.y);
        } else if entity.pos.y >= max.y {
            entity.pos.y = max.y;
            if entity.vel.y > 0.0 {
                entity.vel.y = rebound(entity.vel.y, entity.bounce.y);
            }
            on_floor = true;
        }
        on_floor
    }
}

/// Push `entity` out of a static box along the shallower axis.
/// Returns true if it landed on top.
fn resolve_static(entity: &mut Entity, pos: Vec2, size: Vec2) -> bool {
    let pen = aabb_penetration(entity.pos, entity.size, pos, size);
    if pen.x <= 0.0 || pen.y <= 0.0 {
        return false;
    }

    if pen.y <= pen.x {
        if entity.pos.y < pos.y {
            entity.pos.y -= pen.y;
            if entity.vel.y > 0.0 {
                entity.vel.y = rebound(entity.vel.y, entity.bounce.y);
            }
            return true;
        }
        entity.pos.y += pen.y;
        if entity.vel.y < 0.0 {
            entity.vel.y = rebound(entity.vel.y, entity.bounce.y);
        }
    } else {
        if entity.pos.x < pos.x {
            entity.pos.x -= pen.x;
        } else {
            entity.pos.x += pen.x;
        }
        entity.vel.x = rebound(entity.vel.x, entity.bounce.x);
    }
    false
}

#[inline]
fn rebound(speed: f32, bounce: f32) -> f32 {
    let out = -speed * bounce;
    if out.abs() < REST_SPEED { 0.0 } else { out }
}
