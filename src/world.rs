use levelparser::{Level, Structure};
use macroquad::math::{vec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::geometry::{point_to_segment_distance, vector_to_position, Segment};

pub const DEFAULT_WALL_COLOR: [u8; 4] = [100, 100, 100, 255];

/// How a ray decides it has left the world.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoundsCheck {
    /// x is compared against the world height and y against the width.
    #[default]
    Transposed,
    Matching,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    pub segment: Segment, // In pixels
    pub color: Option<[u8; 4]>,
}

impl Wall {
    pub fn color(&self) -> [u8; 4] {
        self.color.unwrap_or(DEFAULT_WALL_COLOR)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub id: u32,
    pub position: Vec2,
    pub angle: f32,
    pub width: f32,
}

impl Sprite {
    pub fn new(id: u32, position: Vec2, angle: f32, width: f32) -> Self {
        Self {
            id,
            position,
            angle,
            width,
        }
    }

    /// The flat billboard a ray has to cross to see the sprite: perpendicular
    /// to the sprite's facing, `width` long.
    pub fn cross_segment(&self) -> Segment {
        let half = self.width / 2.0;
        Segment::new(
            self.position + vector_to_position(self.angle - 90.0, half),
            self.position + vector_to_position(self.angle + 90.0, half),
        )
    }
}

#[derive(Debug, Clone)]
pub struct SegmentWorld {
    pub grid: f32,
    pub dimensions: [f32; 2], // In grid units
    pub spawn: Vec2,          // In pixels
    pub spawn_angle: Option<f32>,
    pub walls: Vec<Wall>,
    pub sprites: Vec<Sprite>,
    pub bounds_check: BoundsCheck,
}

impl SegmentWorld {
    pub fn load(level: &Level, grid: f32, bounds_check: BoundsCheck) -> Self {
        let mut level = level.clone();
        level.clamp_structures();

        let walls = level
            .structures
            .iter()
            .map(|structure| match structure {
                Structure::Wall { coords, color } => {
                    let [sx, sy, ex, ey] = coords.map(|c| c * grid);
                    Wall {
                        segment: Segment::new(vec2(sx, sy), vec2(ex, ey)),
                        color: *color,
                    }
                }
            })
            .collect::<Vec<_>>();

        let spawn = level.spawn.position;
        let mut world = Self {
            grid,
            dimensions: level.dimensions,
            spawn: vec2(spawn.x, spawn.y) * grid,
            spawn_angle: level.spawn.angle,
            walls,
            sprites: Vec::new(),
            bounds_check,
        };
        for spec in &level.sprites {
            let [x, y] = spec.position;
            let sprite = Sprite::new(spec.id, vec2(x, y) * grid, spec.angle, spec.width * grid);
            world.add_sprite(sprite);
        }

        log::info!(
            "Loaded level ({}x{}) with {} walls and {} sprites",
            level.width(),
            level.height(),
            world.walls.len(),
            world.sprites.len()
        );
        world
    }

    pub fn width(&self) -> f32 {
        self.grid * self.dimensions[0]
    }

    pub fn height(&self) -> f32 {
        self.grid * self.dimensions[1]
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let (x_limit, y_limit) = match self.bounds_check {
            BoundsCheck::Transposed => (self.height(), self.width()),
            BoundsCheck::Matching => (self.width(), self.height()),
        };
        point.x > 0.0 && point.y > 0.0 && point.x < x_limit && point.y < y_limit
    }

    /// Indices of the walls within `distance` pixels of `point`.
    pub fn find_lines_within_distance(
        &self,
        point: Vec2,
        distance: f32,
    ) -> impl Iterator<Item = usize> + '_ {
        self.walls
            .iter()
            .enumerate()
            .filter(move |(_, wall)| point_to_segment_distance(point, &wall.segment) <= distance)
            .map(|(i, _)| i)
    }

    pub fn add_sprite(&mut self, sprite: Sprite) {
        if !self.sprites.iter().any(|s| s.id == sprite.id) {
            self.sprites.push(sprite);
        }
    }
}
