use macroquad::math::Vec2;

use crate::{
    geometry::{normalize_angle, vector_to_position},
    input::InputState,
    ray::Ray,
    world::SegmentWorld,
};

pub const DIAGONAL_MULTIPLIER: f32 = 0.7071;

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    pub angle: f32, // Degrees
    pub speed: f32, // Pixels per second
}

impl Player {
    pub fn new(position: Vec2, angle: f32, speed: f32) -> Self {
        Self {
            position,
            angle,
            speed,
        }
    }

    pub fn spawn(world: &SegmentWorld, speed: f32) -> Self {
        Self::new(world.spawn, world.spawn_angle.unwrap_or(0.1), speed)
    }

    /// Moves in `angle` unless a ray of the same length hits a wall first.
    fn step(&mut self, world: &SegmentWorld, angle: f32, distance: f32) -> bool {
        let mut ray = Ray::new(self.position, angle);
        if ray.cast(world, 1.0, Some(distance), None).is_hit() {
            return false;
        }
        self.position += vector_to_position(angle, distance);
        true
    }

    /// Each pressed direction is tried on its own, so a blocked direction does
    /// not stop movement along the others and the player slides along walls.
    pub fn input(&mut self, input: &InputState, world: &SegmentWorld, dt: f32) {
        let mut multiplier = 1.0;
        if input.is_diagonal() {
            multiplier = DIAGONAL_MULTIPLIER;
        }
        if input.sprint {
            multiplier *= 2.0;
        }

        let distance = self.speed * multiplier * dt;
        if distance > 0.0 {
            if input.up {
                self.step(world, self.angle, distance);
            }
            if input.down {
                self.step(world, 180.0 + self.angle, distance);
            }
            if input.left {
                self.step(world, self.angle - 90.0, distance);
            }
            if input.right {
                self.step(world, self.angle + 90.0, distance);
            }
        }

        self.position.x = self.position.x.min(world.width() - 1.0).max(1.0);
        self.position.y = self.position.y.min(world.height() - 1.0).max(1.0);

        self.angle = normalize_angle(self.angle + input.mouse_dx);
    }
}

#[cfg(test)]
mod tests {
    use levelparser::Level;
    use macroquad::math::vec2;

    use super::*;
    use crate::world::BoundsCheck;

    fn world() -> SegmentWorld {
        let level: Level = "DI: 10, 10\nWA: 5, 0, 5, 10".parse().unwrap();
        SegmentWorld::load(&level, 48.0, BoundsCheck::Matching)
    }

    #[test]
    fn moves_forward_when_clear() {
        let world = world();
        let mut player = Player::new(vec2(100.0, 100.0), 0.0, 100.0);
        let input = InputState {
            up: true,
            ..Default::default()
        };
        player.input(&input, &world, 0.1);
        assert!((player.position.x - 110.0).abs() < 1e-3);
        assert!((player.position.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn walls_block_only_the_blocked_direction() {
        let world = world();
        // facing the wall at x = 240
        let mut player = Player::new(vec2(235.0, 100.0), 0.0, 100.0);
        let input = InputState {
            up: true,
            right: true,
            ..Default::default()
        };
        player.input(&input, &world, 0.1);
        assert!((player.position.x - 235.0).abs() < 1e-3, "{:?}", player.position);
        let slide = 100.0 * DIAGONAL_MULTIPLIER * 0.1;
        assert!((player.position.y - (100.0 + slide)).abs() < 1e-3);
    }

    #[test]
    fn sprint_and_clamping() {
        let world = world();
        let mut player = Player::new(vec2(5.0, 100.0), 0.0, 100.0);
        let input = InputState {
            down: true,
            sprint: true,
            ..Default::default()
        };
        player.input(&input, &world, 0.5);
        assert_eq!(player.position.x, 1.0);
    }

    #[test]
    fn mouse_turns_the_player() {
        let world = world();
        let mut player = Player::new(vec2(100.0, 100.0), 350.0, 100.0);
        let input = InputState {
            mouse_dx: 20.0,
            ..Default::default()
        };
        player.input(&input, &world, 0.016);
        assert!((player.angle - 10.0).abs() < 1e-3);
    }
}
