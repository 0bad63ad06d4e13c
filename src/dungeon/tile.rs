use std::collections::HashMap;

use macroquad::math::{vec2, Vec2};
use rand::Rng;

use crate::geometry::Rect;

use super::room::RoomId;

pub const TILE_SIZE: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileType {
    Error,
    Ground1,
    Ground2,
    Wall,
    WallLedge,
    DoorOpen,
    DoorClosed,
    Ground3,
    Ground4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileDef {
    pub id: u8,
    pub name: &'static str,
    pub atlas: (u8, u8),
    pub solid: bool,
}

// Indexed by id, so `TILE_DEFS[id]` is the definition for that id.
const TILE_DEFS: [TileDef; 9] = [
    TileDef {
        id: 0,
        name: "err",
        atlas: (0, 0),
        solid: false,
    },
    TileDef {
        id: 1,
        name: "ground_1",
        atlas: (1, 0),
        solid: false,
    },
    TileDef {
        id: 2,
        name: "ground_2",
        atlas: (2, 0),
        solid: false,
    },
    TileDef {
        id: 3,
        name: "wall",
        atlas: (0, 1),
        solid: true,
    },
    TileDef {
        id: 4,
        name: "wall_ledge",
        atlas: (1, 1),
        solid: true,
    },
    TileDef {
        id: 5,
        name: "door_open",
        atlas: (2, 1),
        solid: false,
    },
    TileDef {
        id: 6,
        name: "door_closed",
        atlas: (3, 1),
        solid: true,
    },
    TileDef {
        id: 7,
        name: "ground_3",
        atlas: (3, 0),
        solid: false,
    },
    TileDef {
        id: 8,
        name: "ground_4",
        atlas: (4, 0),
        solid: false,
    },
];

const BY_ID: [TileType; 9] = [
    TileType::Error,
    TileType::Ground1,
    TileType::Ground2,
    TileType::Wall,
    TileType::WallLedge,
    TileType::DoorOpen,
    TileType::DoorClosed,
    TileType::Ground3,
    TileType::Ground4,
];

impl TileType {
    /// Unknown ids resolve to the error tile.
    pub fn from_id(id: u8) -> Self {
        BY_ID.get(id as usize).copied().unwrap_or(TileType::Error)
    }

    pub fn from_name(name: &str) -> Self {
        BY_ID
            .into_iter()
            .find(|ty| ty.def().name == name)
            .unwrap_or(TileType::Error)
    }

    pub fn def(self) -> &'static TileDef {
        let id = match self {
            TileType::Error => 0,
            TileType::Ground1 => 1,
            TileType::Ground2 => 2,
            TileType::Wall => 3,
            TileType::WallLedge => 4,
            TileType::DoorOpen => 5,
            TileType::DoorClosed => 6,
            TileType::Ground3 => 7,
            TileType::Ground4 => 8,
        };
        &TILE_DEFS[id]
    }

    pub fn is_door(self) -> bool {
        matches!(self, TileType::DoorOpen | TileType::DoorClosed)
    }

    pub fn is_wall(self) -> bool {
        matches!(self, TileType::Wall | TileType::WallLedge)
    }
}

pub fn random_ground_tile<R: Rng>(rng: &mut R) -> TileType {
    match rng.gen_range(0..=10) {
        0 => TileType::Ground1,
        1 => TileType::Ground2,
        2..=5 => TileType::Ground4,
        _ => TileType::Ground3,
    }
}

/// Rounds like `Math.round`, halves go up.
fn round_half_up(value: f32) -> f32 {
    (value + 0.5).floor()
}

/// Tile coordinates of a world position.
pub fn world_to_tile(position: Vec2) -> (i32, i32) {
    let size = TILE_SIZE as f32;
    (
        round_half_up(position.x / size - 0.5) as i32,
        round_half_up(position.y / size - 0.5) as i32,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Side of the room a door at `(x, y)` sits on.
    pub fn of_door(x: i32, y: i32, room: &Rect) -> Self {
        let center_x = room.x + room.width / 2.0 - 4.0;
        let center_y = room.y + room.height / 2.0 - 4.0;
        let (x, y) = (x as f32, y as f32);

        if y == center_y {
            if x < center_x {
                Direction::Left
            } else {
                Direction::Right
            }
        } else if y < center_y {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -TILE_SIZE),
            Direction::Down => (0, TILE_SIZE),
            Direction::Left => (-TILE_SIZE, 0),
            Direction::Right => (TILE_SIZE, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoorState {
    pub room: RoomId,
    pub direction: Direction,
    pub open: bool,
    pub locked: bool,
    pub generated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TileKind {
    Plain(TileType),
    Door(DoorState),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    pub kind: TileKind,
    pub light_alpha: f32,
}

impl Tile {
    pub fn new(x: i32, y: i32, kind: TileKind) -> Self {
        Self {
            x,
            y,
            kind,
            light_alpha: 0.0,
        }
    }

    pub fn tile_type(&self) -> TileType {
        match &self.kind {
            TileKind::Plain(ty) => *ty,
            TileKind::Door(door) if door.open => TileType::DoorOpen,
            TileKind::Door(_) => TileType::DoorClosed,
        }
    }

    pub fn def(&self) -> &'static TileDef {
        self.tile_type().def()
    }

    pub fn is_solid(&self) -> bool {
        self.def().solid
    }

    pub fn door(&self) -> Option<&DoorState> {
        match &self.kind {
            TileKind::Door(door) => Some(door),
            TileKind::Plain(_) => None,
        }
    }

    pub fn door_mut(&mut self) -> Option<&mut DoorState> {
        match &mut self.kind {
            TileKind::Door(door) => Some(door),
            TileKind::Plain(_) => None,
        }
    }

    pub fn position(&self) -> Vec2 {
        vec2(self.x as f32, self.y as f32)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    pub fn rect(&self) -> Rect {
        let size = TILE_SIZE as f32;
        Rect::new(self.x as f32, self.y as f32, size, size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(usize);

/// Every live tile of the world, with a lookup by exact position.
#[derive(Debug, Default)]
pub struct TileMap {
    slots: Vec<Option<Tile>>,
    index: HashMap<(i32, i32), Vec<TileId>>,
}

impl TileMap {
    pub fn insert(&mut self, tile: Tile) -> TileId {
        let id = TileId(self.slots.len());
        self.index.entry((tile.x, tile.y)).or_default().push(id);
        self.slots.push(Some(tile));
        id
    }

    pub fn remove(&mut self, id: TileId) -> Option<Tile> {
        let tile = self.slots.get_mut(id.0)?.take()?;
        if let Some(ids) = self.index.get_mut(&(tile.x, tile.y)) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.index.remove(&(tile.x, tile.y));
            }
        }
        Some(tile)
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.slots.get(id.0)?.as_ref()
    }

    pub fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    /// The oldest live tile at exactly `(x, y)`.
    pub fn at(&self, x: i32, y: i32) -> Option<TileId> {
        self.index.get(&(x, y))?.first().copied()
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Option<&Tile> {
        self.at(x, y).and_then(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileId, &Tile)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|tile| (TileId(i), tile)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (TileId, &mut Tile)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|tile| (TileId(i), tile)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Solid tiles whose grid cell contains a corner of `rect`.
    pub fn solid_overlapping(&self, rect: &Rect) -> bool {
        let corners = [
            vec2(rect.x, rect.y),
            vec2(rect.x + rect.width, rect.y),
            vec2(rect.x, rect.y + rect.height),
            vec2(rect.x + rect.width, rect.y + rect.height),
        ];
        corners.iter().any(|corner| {
            let (tx, ty) = world_to_tile(*corner);
            self.tile_at(tx * TILE_SIZE, ty * TILE_SIZE)
                .map_or(false, |tile| tile.is_solid() && tile.rect().overlaps(rect))
        })
    }
}
