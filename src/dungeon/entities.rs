use std::collections::HashMap;

use macroquad::math::{vec2, Vec2};
use rand::Rng;

use crate::{
    geometry::{calculate_angle, calculate_distance, vector_to_position, Rect},
    input::InputState,
};

use super::{lighting::LightSource, tile::TileMap};

const TORCH_FRAMES: u32 = 3;
const TORCH_FRAME_TICKS: u32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Torch {
    pub position: Vec2,
    pub init_strength: f32,
    pub strength: f32,
    pub distance: f32,
    pub pulses: bool,
    frame: u32,
    tick: u32,
}

impl Torch {
    pub fn new<R: Rng>(position: Vec2, pulses: bool, rng: &mut R) -> Self {
        let strength = rng.gen_range(6..=10) as f32;
        Self {
            position,
            init_strength: strength,
            strength,
            distance: rng.gen_range(24..=32) as f32,
            pulses,
            frame: 0,
            tick: 0,
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, 8.0, 8.0)
    }

    /// Flickers the flame, keeping the strength within half and all of
    /// its initial value.
    pub fn animate<R: Rng>(&mut self, rng: &mut R) {
        if self.pulses && self.frame % TORCH_FRAMES != 0 {
            self.strength += rng.gen_range(-1..=1) as f32;
        }

        self.tick += 1;
        if self.tick > TORCH_FRAME_TICKS {
            self.tick = 0;
            self.frame = (self.frame + 1) % TORCH_FRAMES;
        }

        self.strength = self
            .strength
            .clamp(self.init_strength / 2.0, self.init_strength);
    }

    pub fn light(&self) -> LightSource {
        LightSource {
            position: self.position,
            strength: self.strength,
            range: Some(self.distance),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Coin,
}

pub const ITEM_SIZE: f32 = 4.0;
pub const ITEM_EXPIRY: u32 = 99999;
pub const MAX_ITEMS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub position: Vec2,
    pub kind: ItemKind,
    pub value: u32,
    pub expire: u32,
}

impl Item {
    pub fn new(position: Vec2, kind: ItemKind, value: u32) -> Self {
        Self {
            position,
            kind,
            value,
            expire: ITEM_EXPIRY,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, ITEM_SIZE, ITEM_SIZE)
    }

    pub fn is_expired(&self) -> bool {
        self.expire == 0
    }

    /// Ages the item and drifts it toward a nearby player. Returns true
    /// once the player touches it.
    pub fn update(&mut self, player: &Player) -> bool {
        self.expire = self.expire.saturating_sub(1);

        let center = self.rect().center();
        let target = player.rect().center();
        let distance = calculate_distance(center, target);
        if distance < 16.0 {
            self.position += vector_to_position(calculate_angle(center, target), distance / 6.0);
            return self.rect().touches(&player.rect());
        }
        false
    }
}

pub const PLAYER_SIZE: f32 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Vec2,
    pub speed: f32,
    pub light_strength: f32,
    pub light_distance: f32,
    pub inventory: HashMap<ItemKind, u32>,
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            speed: 1.0,
            light_strength: 10.0,
            light_distance: 72.0,
            inventory: HashMap::new(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, PLAYER_SIZE, PLAYER_SIZE)
    }

    pub fn coins(&self) -> u32 {
        self.inventory.get(&ItemKind::Coin).copied().unwrap_or(0)
    }

    pub fn collect(&mut self, item: &Item) {
        *self.inventory.entry(item.kind).or_insert(0) += item.value;
    }

    /// Moves one step per held direction, each blocked on its own by
    /// solid tiles.
    pub fn input(&mut self, input: &InputState, tiles: &TileMap) {
        let moves = [
            (input.up, vec2(0.0, -self.speed)),
            (input.down, vec2(0.0, self.speed)),
            (input.left, vec2(-self.speed, 0.0)),
            (input.right, vec2(self.speed, 0.0)),
        ];

        for (held, step) in moves {
            if held && !tiles.solid_overlapping(&self.rect().offset(step)) {
                self.position += step;
            }
        }
    }

    pub fn round_position(&mut self) {
        self.position = self.position.round();
    }

    pub fn light(&self) -> LightSource {
        LightSource {
            position: self.position,
            strength: self.light_strength,
            range: Some(self.light_distance),
        }
    }
}
