//! AI decision-making and behavior systems.
//!
//! Every bot runs one state machine. Each tick a bot perceives the target,
//! evaluates its transition, performs the action of the resulting state and
//! then walks its path.

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;

use crate::components::{AgentState, Brain, Dying, Health, PathFollower, Transform};
use crate::constants::*;
use crate::events::{EventQueue, GameEvent};
use crate::grid::Grid;
use crate::pathfinding::{Navigator, Pathfinder};
use crate::spawning::BotProfile;
use crate::systems::{combat, movement};

/// Everything a bot needs from outside its own components during one tick.
pub struct AiContext<'a, R: Rng> {
    pub grid: &'a Grid,
    pub pathfinder: &'a mut Pathfinder,
    /// Host navigation service, used by profiles that ask for it
    pub external_nav: Option<&'a mut (dyn Navigator + 'static)>,
    pub target: Vec3,
    pub now: f32,
    pub dt: f32,
    pub events: &'a mut EventQueue,
    pub rng: &'a mut R,
}

/// What a bot knows about the target this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    pub target: Vec3,
    /// Horizontal distance to the target
    pub distance: f32,
    pub visible: bool,
    pub health: i32,
    /// Within search radius of the last known target position (or none recorded)
    pub reached_last_known: bool,
}

/// Run one tick for every living bot.
pub fn update_agents<R: Rng>(world: &mut World, ctx: &mut AiContext<'_, R>) {
    puffin::profile_function!();

    let agents: Vec<Entity> = world
        .query::<(&Brain, Option<&Dying>)>()
        .iter()
        .filter(|(_, (_, dying))| dying.is_none())
        .map(|(entity, _)| entity)
        .collect();

    for entity in agents {
        let Ok((brain, transform, health, follower)) = world
            .query_one_mut::<(&mut Brain, &mut Transform, &mut Health, &mut PathFollower)>(entity)
        else {
            continue;
        };
        update_agent(entity, brain, transform, health, follower, ctx);
    }
}

fn update_agent<R: Rng>(
    entity: Entity,
    brain: &mut Brain,
    transform: &mut Transform,
    health: &mut Health,
    follower: &mut PathFollower,
    ctx: &mut AiContext<'_, R>,
) {
    // Paths computed on a previous grid are meaningless now
    if follower.path.as_ref().is_some_and(|p| !p.is_current(ctx.grid)) {
        follower.clear();
    }

    let visible = can_see_target(ctx.grid, brain, transform.position, ctx.target);
    if visible {
        brain.last_known_target = Some(ctx.target);
    }
    let perception = Perception {
        target: ctx.target,
        distance: movement::horizontal_distance(transform.position, ctx.target),
        visible,
        health: health.current,
        reached_last_known: brain
            .last_known_target
            .map(|lk| movement::horizontal_distance(transform.position, lk) <= SEARCH_ARRIVAL_RADIUS)
            .unwrap_or(true),
    };

    let next = update_state_machine(brain.state, &perception, &brain.profile);
    if next != brain.state {
        enter_state(entity, brain, follower, next, ctx);
    }

    run_state(entity, brain, transform, health, follower, &perception, ctx);
    movement::follow_path(transform, follower, brain.profile.speed, ctx.dt);
}

/// Whether a bot at `from` perceives the target at `target`.
///
/// While chasing or attacking the view radius is stretched by the profile's
/// pursuit factor. Walls only block bots with the line of sight capability.
pub fn can_see_target(grid: &Grid, brain: &Brain, from: Vec3, target: Vec3) -> bool {
    let profile = &brain.profile;
    let pursuing = matches!(brain.state, AgentState::Chase | AgentState::Attack);
    let range = if pursuing {
        profile.view_radius * profile.pursuit_factor
    } else {
        profile.view_radius
    };

    if movement::horizontal_distance(from, target) > range {
        return false;
    }
    !profile.capabilities.has_line_of_sight || grid.line_of_sight(from, target)
}

/// Update the AI state machine based on perception.
pub fn update_state_machine(
    current_state: AgentState,
    perception: &Perception,
    profile: &BotProfile,
) -> AgentState {
    if profile.capabilities.flees_when_close {
        return keep_distance(perception, profile);
    }

    match current_state {
        AgentState::Patrol => {
            if perception.visible {
                AgentState::Chase
            } else {
                AgentState::Patrol
            }
        }
        AgentState::Chase => {
            if !perception.visible {
                if profile.capabilities.has_search {
                    AgentState::Search
                } else {
                    AgentState::Patrol
                }
            } else if perception.distance <= profile.attack_range {
                AgentState::Attack
            } else {
                AgentState::Chase
            }
        }
        AgentState::Attack => {
            if perception.health < profile.flee_threshold {
                AgentState::Retreat
            } else if !perception.visible || perception.distance > profile.attack_range {
                AgentState::Chase
            } else {
                AgentState::Attack
            }
        }
        AgentState::Search => {
            if perception.visible {
                AgentState::Chase
            } else if perception.reached_last_known {
                AgentState::Patrol
            } else {
                AgentState::Search
            }
        }
        AgentState::Retreat => {
            if perception.health > profile.reengage_threshold {
                AgentState::Chase
            } else {
                AgentState::Retreat
            }
        }
    }
}

/// Transitions for bots that hold the target at range. The current state does
/// not matter: too close means flee, seen in range means attack, anything
/// else means wander.
fn keep_distance(perception: &Perception, profile: &BotProfile) -> AgentState {
    if perception.distance < profile.flee_radius {
        AgentState::Retreat
    } else if perception.visible && perception.distance <= profile.attack_range {
        AgentState::Attack
    } else {
        AgentState::Patrol
    }
}

/// Switch state. The old path is always discarded and the new state may
/// request its first path straight away.
fn enter_state<R: Rng>(
    entity: Entity,
    brain: &mut Brain,
    follower: &mut PathFollower,
    next: AgentState,
    ctx: &mut AiContext<'_, R>,
) {
    let from = brain.state;
    tracing::debug!(?entity, %from, to = %next, "bot state changed");
    ctx.events.push(GameEvent::StateChanged {
        entity,
        from,
        to: next,
    });

    brain.state = next;
    brain.next_path_time = ctx.now;
    follower.clear();
    if next == AgentState::Patrol {
        brain.last_known_target = None;
    }
}

fn run_state<R: Rng>(
    entity: Entity,
    brain: &mut Brain,
    transform: &mut Transform,
    health: &mut Health,
    follower: &mut PathFollower,
    perception: &Perception,
    ctx: &mut AiContext<'_, R>,
) {
    let ready = ctx.now >= brain.next_path_time;
    let position = transform.position;

    match brain.state {
        AgentState::Patrol => {
            if !follower.is_active() && ready {
                let destination = ctx.grid.random_walkable_within(
                    position,
                    brain.profile.patrol_radius,
                    PATROL_SAMPLE_ATTEMPTS,
                    ctx.rng,
                );
                match destination {
                    Some(goal) => request_path(entity, brain, follower, position, goal, ctx),
                    None => brain.next_path_time = ctx.now + CHASE_PATH_REFRESH_INTERVAL,
                }
            }
        }
        AgentState::Chase => {
            if ready {
                request_path(entity, brain, follower, position, perception.target, ctx);
            }
        }
        AgentState::Attack => {
            combat::aim_towards(transform, perception.target, ctx.dt);
            combat::try_fire(entity, brain, transform, ctx.now, ctx.events);
        }
        AgentState::Search => {
            if !follower.is_active() && ready {
                if let Some(last_known) = brain.last_known_target {
                    request_path(entity, brain, follower, position, last_known, ctx);
                }
            }
        }
        AgentState::Retreat => {
            if perception.distance > RETREAT_SAFE_DISTANCE
                && ctx.rng.gen_range(0..100) < RETREAT_REGEN_CHANCE_PERCENT
            {
                health.heal(RETREAT_REGEN_AMOUNT);
            }
            if brain.profile.capabilities.flees_when_close {
                // Keep running while the target stays close
                if ready {
                    let away = flee_destination(ctx.grid, position, perception.target)
                        .or_else(|| farthest_refuge(ctx.grid, perception.target));
                    if let Some(goal) = away {
                        request_path(entity, brain, follower, position, goal, ctx);
                    }
                }
            } else if !follower.is_active() && ready {
                if let Some(refuge) = farthest_refuge(ctx.grid, perception.target) {
                    request_path(entity, brain, follower, position, refuge, ctx);
                }
            }
        }
    }
}

/// Ask the profile's navigator for a path. A failed query keeps whatever path
/// the bot is already following until its next request window.
///
/// A bot standing inside a wall plans from the closest floor cell and walks
/// back onto it first.
fn request_path<R: Rng>(
    entity: Entity,
    brain: &mut Brain,
    follower: &mut PathFollower,
    from: Vec3,
    to: Vec3,
    ctx: &mut AiContext<'_, R>,
) {
    brain.next_path_time = ctx.now + CHASE_PATH_REFRESH_INTERVAL;

    let Some(start) = ctx.grid.nearest_walkable_cell(from) else {
        tracing::trace!(?entity, state = %brain.state, "no floor to plan from");
        return;
    };
    let lead_in = (start != ctx.grid.world_to_cell(from))
        .then(|| ctx.grid.cell_to_world(start.0, start.1));
    let plan_from = lead_in.unwrap_or(from);

    let result = match ctx.external_nav.as_mut() {
        Some(nav) if brain.profile.capabilities.uses_external_nav => {
            nav.find_path(ctx.grid, plan_from, to)
        }
        _ => ctx.pathfinder.find_path(ctx.grid, plan_from, to),
    };

    match (result, lead_in) {
        (Ok(path), Some(waypoint)) => follower.set(path.with_lead_in(waypoint, start)),
        (Ok(path), None) => follower.set(path),
        (Err(err), _) => {
            tracing::trace!(?entity, state = %brain.state, %err, "path request failed");
        }
    }
}

/// Floor point about `FLEE_STEP_DISTANCE` away from `from`, directly away
/// from `threat`.
pub fn flee_destination(grid: &Grid, from: Vec3, threat: Vec3) -> Option<Vec3> {
    let away = movement::flatten(from - threat).normalize_or_zero();
    if away == Vec3::ZERO {
        return None;
    }
    let (x, y) = grid.nearest_walkable_cell(from + away * FLEE_STEP_DISTANCE)?;
    let goal = grid.cell_to_world(x, y);
    (grid.world_to_cell(goal) != grid.world_to_cell(from)).then_some(goal)
}

/// Refuge farthest from `threat`, if the grid has any.
pub fn farthest_refuge(grid: &Grid, threat: Vec3) -> Option<Vec3> {
    grid.refuges().iter().copied().max_by(|a, b| {
        movement::horizontal_distance(*a, threat).total_cmp(&movement::horizontal_distance(*b, threat))
    })
}
