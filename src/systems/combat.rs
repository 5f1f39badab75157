//! Combat system functions: damage, death sequence, aiming and firing.

use crate::components::{Brain, Collider, Dying, Health, HitFlash, PathFollower, Transform};
use crate::constants::*;
use crate::events::{EventQueue, GameEvent};
use crate::grid::Grid;
use crate::systems::movement::flatten;
use glam::Vec3;
use hecs::{Entity, World};

/// Apply `amount` damage to an agent.
///
/// Ignored while the agent is dying. Starts the hit flash, and when health
/// reaches zero starts the death sequence: the collider is removed, the path
/// is dropped and the agent shrinks until [`update_timers`] removes it.
/// Returns whether the damage was applied.
pub fn take_damage(world: &mut World, entity: Entity, amount: i32, events: &mut EventQueue) -> bool {
    if world.get::<&Dying>(entity).is_ok() {
        return false;
    }

    let remaining = {
        let Ok(mut health) = world.get::<&mut Health>(entity) else {
            return false;
        };
        health.damage(amount);
        health.current
    };

    events.push(GameEvent::Damaged {
        entity,
        amount,
        remaining,
    });
    let _ = world.insert_one(
        entity,
        HitFlash {
            remaining: HIT_FLASH_DURATION,
        },
    );

    if remaining <= 0 {
        start_dying(world, entity, events);
    }
    true
}

fn start_dying(world: &mut World, entity: Entity, events: &mut EventQueue) {
    let duration = world
        .get::<&Brain>(entity)
        .map(|brain| brain.profile.death_duration)
        .unwrap_or(HUNTER_DEATH_DURATION);
    let position = world
        .get::<&Transform>(entity)
        .map(|t| t.position)
        .unwrap_or(Vec3::ZERO);

    if let Ok(mut follower) = world.get::<&mut PathFollower>(entity) {
        follower.clear();
    }
    let _ = world.remove_one::<Collider>(entity);
    let _ = world.insert_one(entity, Dying::new(duration));

    tracing::debug!(?entity, ?position, "bot died");
    events.push(GameEvent::AgentDied { entity, position });
}

/// Advance hit flash and death timers, despawning agents whose death
/// sequence has finished. Returns the number of agents removed.
pub fn update_timers(world: &mut World, dt: f32, events: &mut EventQueue) -> usize {
    let mut flash_done = Vec::new();
    for (entity, flash) in world.query_mut::<&mut HitFlash>() {
        flash.remaining -= dt;
        if flash.remaining <= 0.0 {
            flash_done.push(entity);
        }
    }
    for entity in flash_done {
        let _ = world.remove_one::<HitFlash>(entity);
    }

    let mut finished = Vec::new();
    for (entity, dying) in world.query_mut::<&mut Dying>() {
        dying.remaining -= dt;
        if dying.is_finished() {
            finished.push(entity);
        }
    }

    let removed = finished.len();
    for entity in finished {
        if world.despawn(entity).is_ok() {
            events.push(GameEvent::AgentRemoved { entity });
        }
    }
    removed
}

/// Turn toward `target` on the horizontal plane, smoothed by [`AIM_TURN_RATE`].
pub fn aim_towards(transform: &mut Transform, target: Vec3, dt: f32) {
    let desired = flatten(target - transform.position).normalize_or_zero();
    if desired == Vec3::ZERO {
        return;
    }
    let t = (AIM_TURN_RATE * dt).clamp(0.0, 1.0);
    let blended = transform.facing.lerp(desired, t).normalize_or_zero();
    transform.facing = if blended == Vec3::ZERO { desired } else { blended };
}

/// Fire along the current facing if the cooldown has elapsed.
pub fn try_fire(
    entity: Entity,
    brain: &mut Brain,
    transform: &Transform,
    now: f32,
    events: &mut EventQueue,
) -> bool {
    if now < brain.next_fire_time {
        return false;
    }
    brain.next_fire_time = now + brain.profile.fire_interval;
    events.push(GameEvent::AttackFired {
        entity,
        origin: transform.position,
        direction: transform.facing,
    });
    true
}

/// Whether a shot fired from `origin` along `direction` strikes a target
/// standing at `target`. Shots fly straight over the horizontal plane for
/// [`SHOT_RANGE`] units and stop at the first wall.
pub fn shot_hits(grid: &Grid, origin: Vec3, direction: Vec3, target: Vec3) -> bool {
    let direction = flatten(direction).normalize_or_zero();
    if direction == Vec3::ZERO {
        return false;
    }
    let to_target = flatten(target - origin);
    let along = to_target.dot(direction);
    if !(0.0..=SHOT_RANGE).contains(&along) {
        return false;
    }
    let miss = (to_target - direction * along).length();
    miss <= SHOT_HIT_RADIUS && grid.line_of_sight(origin, target)
}
