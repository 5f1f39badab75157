//! Path following for agents.

use crate::components::{PathFollower, Transform};
use crate::constants::WAYPOINT_TOLERANCE;
use glam::Vec3;

/// Distance between two positions ignoring height
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    flatten(b - a).length()
}

/// Drop the vertical component of `v`
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Step `transform` along the follower's path at `speed` units per second.
///
/// Waypoints within tolerance are popped before moving. The path is cleared
/// once its last waypoint is reached. Height is never changed.
pub fn follow_path(transform: &mut Transform, follower: &mut PathFollower, speed: f32, dt: f32) {
    if !follower.is_active() {
        return;
    }

    while let Some(waypoint) = follower.current_waypoint() {
        if horizontal_distance(transform.position, waypoint) > WAYPOINT_TOLERANCE {
            break;
        }
        follower.target_index += 1;
    }

    let Some(waypoint) = follower.current_waypoint() else {
        follower.clear();
        return;
    };

    let offset = flatten(waypoint - transform.position);
    let distance = offset.length();
    let step = speed * dt;
    let direction = offset / distance;

    if step >= distance {
        transform.position.x = waypoint.x;
        transform.position.z = waypoint.z;
    } else {
        transform.position += direction * step;
    }
    transform.facing = direction;
}
