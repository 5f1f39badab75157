//! The target the bots hunt.
//!
//! The simulation never looks the player up by itself; the host hands it a
//! [`Target`] when the simulation is created.

use glam::Vec3;

/// Read position, receive damage
pub trait Target {
    fn position(&self) -> Vec3;

    /// Move the target, used when a new map places it on its spawn cell.
    fn set_position(&mut self, position: Vec3);

    fn receive_damage(&mut self, amount: i32);
}

/// Default target: a position and a health pool
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Vec3,
    pub health: i32,
}

impl Player {
    pub fn new(position: Vec3, health: i32) -> Self {
        Self { position, health }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

impl Target for Player {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn receive_damage(&mut self, amount: i32) {
        if self.is_dead() {
            return;
        }
        self.health = (self.health - amount).max(0);
        if self.is_dead() {
            tracing::info!("player died");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_damage_floors_at_zero() {
        let mut player = Player::new(Vec3::ZERO, 20);
        player.receive_damage(15);
        assert_eq!(player.health, 5);
        player.receive_damage(15);
        assert_eq!(player.health, 0);
        assert!(player.is_dead());
        player.receive_damage(15);
        assert_eq!(player.health, 0);
    }
}
