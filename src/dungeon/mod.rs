//! Procedurally grown dungeon made of template rooms on an 8px tile grid.
//!
//! The spawn room's doors queue up neighbouring rooms, whose doors queue
//! up more rooms, until the room budget runs out. The world is then
//! cleaned up once and becomes playable.

pub mod entities;
pub mod lighting;
pub mod room;
pub mod tile;

use std::{collections::VecDeque, fmt};

use macroquad::math::{vec2, Vec2};
use noise::{NoiseFn, Perlin};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::DungeonConfig,
    geometry::{calculate_distance, Rect},
    input::InputState,
};

use entities::{Item, ItemKind, Player, Torch, MAX_ITEMS};
use lighting::{apply_lighting, reset_lighting, LightSource};
use room::{autogen_layout, Room, RoomId, RoomKind, RoomState, RoomTemplate, ROOM_SIZE};
use tile::{
    random_ground_tile, Direction, DoorState, Tile, TileId, TileKind, TileMap, TileType, TILE_SIZE,
};

const NOISE_RESOLUTION: f64 = 0.35;
const DOOR_REACH: f32 = 9.0;
const TRIGGER_MARGIN: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    OutOfBudget,
    Overlaps { x: i32, y: i32 },
    AlreadyGenerated,
    NotADoor,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::OutOfBudget => {
                write!(f, "Could not create room. The room budget is spent.")
            }
            PlacementError::Overlaps { x, y } => {
                write!(f, "Could not create room at ({x}, {y}). It intersects another room.")
            }
            PlacementError::AlreadyGenerated => {
                write!(f, "This door has already generated a room.")
            }
            PlacementError::NotADoor => write!(f, "The tile is not a door."),
        }
    }
}

impl std::error::Error for PlacementError {}

/// Things that happened to a room during one event pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomEvent {
    Triggered(RoomId),
    EnemiesSpawned { room: RoomId, count: u32 },
    CoinsSpawned { room: RoomId, count: u32 },
    Cleared(RoomId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionalBounds {
    pub low_x: i32,
    pub low_y: i32,
    pub high_x: i32,
    pub high_y: i32,
}

pub struct World {
    pub rooms: Vec<Room>,
    pub tiles: TileMap,
    pub torches: Vec<Torch>,
    pub items: Vec<Item>,
    pub room_budget: u32,
    pub finished_generating: bool,
    pub positional_bounds: Option<PositionalBounds>,
    pub rooms_cleared: u32,
    config: DungeonConfig,
    pending: VecDeque<TileId>,
    noise: Perlin,
    rng: StdRng,
    cleanups: u32,
}

impl World {
    /// A world without any rooms.
    pub fn empty(config: DungeonConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!("Growing a dungeon of {} rooms from seed {seed}", config.room_count);

        Self {
            rooms: Vec::new(),
            tiles: TileMap::default(),
            torches: Vec::new(),
            items: Vec::new(),
            room_budget: config.room_count,
            finished_generating: false,
            positional_bounds: None,
            rooms_cleared: 0,
            pending: VecDeque::new(),
            noise: Perlin::new(seed as u32),
            rng: StdRng::seed_from_u64(seed),
            cleanups: 0,
            config,
        }
    }

    /// A world with its spawn room placed at the origin. The rest of the
    /// dungeon grows from the spawn's doors on later ticks.
    pub fn new(config: DungeonConfig) -> Self {
        let mut world = Self::empty(config);
        match world.create_room_from_template(0, 0, RoomTemplate::A, true, true) {
            Ok(spawn) => {
                let room = &mut world.rooms[spawn.0];
                room.kind = RoomKind::Ambient;
                room.enemies = 0;
            }
            Err(err) => log::warn!("No spawn room: {err}"),
        }
        world
    }

    /// Throws the dungeon away and grows a new one.
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn spawn(&self) -> Option<&Room> {
        self.rooms.first()
    }

    /// Where the player starts, the middle of the spawn room.
    pub fn spawn_point(&self) -> Vec2 {
        self.spawn()
            .map(|room| room.center() - vec2(4.0, 4.0))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn pending_expansions(&self) -> usize {
        self.pending.len()
    }

    /// Room whose top-left corner is exactly `(x, y)`.
    pub fn get_room(&self, x: i32, y: i32) -> Option<RoomId> {
        self.rooms
            .iter()
            .find(|room| room.x == x && room.y == y)
            .map(|room| room.id)
    }

    pub fn get_tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.tiles.tile_at(x, y)
    }

    /// Places a randomly sized room without doors.
    pub fn create_room(&mut self, x: i32, y: i32, strict: bool) -> Result<RoomId, PlacementError> {
        let layout = autogen_layout(&mut self.rng);
        self.place_room(x, y, &layout, strict, true)
    }

    pub fn create_room_from_template(
        &mut self,
        x: i32,
        y: i32,
        template: RoomTemplate,
        strict: bool,
        doors_can_generate: bool,
    ) -> Result<RoomId, PlacementError> {
        self.place_room(x, y, &template.layout(), strict, doors_can_generate)
    }

    fn place_room(
        &mut self,
        x: i32,
        y: i32,
        layout: &[Vec<u8>],
        strict: bool,
        doors_can_generate: bool,
    ) -> Result<RoomId, PlacementError> {
        if self.room_budget == 0 {
            return Err(PlacementError::OutOfBudget);
        }

        let id = RoomId(self.rooms.len());
        let room = Room::new(id, x, y, layout, doors_can_generate, &mut self.rng);
        if strict && self.rooms.iter().any(|other| other.rect().overlaps(&room.rect())) {
            return Err(PlacementError::Overlaps { x, y });
        }
        self.rooms.push(room);

        for (row, cells) in layout.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let ty = match TileType::from_id(*cell) {
                    TileType::Ground1 => random_ground_tile(&mut self.rng),
                    ty => ty,
                };
                let (dx, dy) = (col as i32 * TILE_SIZE, row as i32 * TILE_SIZE);
                self.create_tile(id, dx, dy, ty, doors_can_generate);
            }
        }

        self.room_budget -= 1;
        log::debug!("Placed room {} at ({x}, {y}), {} left", id.0, self.room_budget);
        if self.room_budget == 0 {
            self.world_cleanup();
        }

        Ok(id)
    }

    /// Adds a tile at an offset from the room's corner. Doors queue a
    /// neighbouring room while the budget allows it.
    pub fn create_tile(
        &mut self,
        room: RoomId,
        dx: i32,
        dy: i32,
        ty: TileType,
        doors_can_generate: bool,
    ) -> Option<TileId> {
        let owner = self.rooms.get(room.0)?;
        let (x, y) = (owner.x + dx, owner.y + dy);

        let kind = if ty.is_door() {
            TileKind::Door(DoorState {
                room,
                direction: Direction::of_door(x, y, &owner.rect()),
                open: false,
                locked: false,
                generated: false,
            })
        } else {
            TileKind::Plain(ty)
        };

        let id = self.tiles.insert(Tile::new(x, y, kind));
        self.rooms[room.0].tiles.push(id);

        if ty.is_door() && doors_can_generate && self.room_budget > 0 {
            self.pending.push_back(id);
        }
        Some(id)
    }

    pub fn destroy_tile(&mut self, room: RoomId, tile: TileId) -> Option<Tile> {
        if let Some(owner) = self.rooms.get_mut(room.0) {
            owner.tiles.retain(|id| *id != tile);
        }
        self.tiles.remove(tile)
    }

    fn swap_tile(&mut self, room: RoomId, tile: TileId, ty: TileType) -> Option<TileId> {
        let old = self.destroy_tile(room, tile)?;
        let owner = self.rooms.get(room.0)?;
        let (dx, dy) = (old.x - owner.x, old.y - owner.y);
        self.create_tile(room, dx, dy, ty, false)
    }

    fn noise_branch(&self, x: i32, y: i32) -> usize {
        let size = ROOM_SIZE as f64;
        let sample = self.noise.get([
            x as f64 / size * NOISE_RESOLUTION,
            y as f64 / size * NOISE_RESOLUTION,
        ]);
        if sample < 0.0 {
            0
        } else {
            1
        }
    }

    /// Grows a room on the far side of a door. A door only ever tries
    /// once, even when the spot turns out to be taken.
    pub fn generate_next_room(&mut self, door: TileId) -> Result<RoomId, PlacementError> {
        let tile = self.tiles.get_mut(door).ok_or(PlacementError::NotADoor)?;
        let (x, y) = (tile.x, tile.y);
        let state = tile.door_mut().ok_or(PlacementError::NotADoor)?;
        if state.generated {
            return Err(PlacementError::AlreadyGenerated);
        }
        state.generated = true;

        let half = (ROOM_SIZE as f32 / 2.0 - 4.0).round() as i32;
        let ((x, y), variants) = match state.direction {
            Direction::Up => ((x - half, y - ROOM_SIZE), [RoomTemplate::Dr, RoomTemplate::Dl]),
            Direction::Down => ((x - half, y + TILE_SIZE), [RoomTemplate::Ur, RoomTemplate::Ul]),
            Direction::Left => ((x - ROOM_SIZE, y - half), [RoomTemplate::Ur, RoomTemplate::Dr]),
            Direction::Right => ((x + TILE_SIZE, y - half), [RoomTemplate::Ul, RoomTemplate::Dl]),
        };
        let template = variants[self.noise_branch(x, y)];

        if self.get_room(x, y).is_some() {
            return Err(PlacementError::Overlaps { x, y });
        }
        self.create_room_from_template(x, y, template, false, true)
    }

    /// Runs the door expansions that were queued before this call.
    /// Doors created along the way wait for the next call.
    pub fn process_pending_expansions(&mut self) -> usize {
        let queued = self.pending.len();
        let mut placed = 0;
        for _ in 0..queued {
            let Some(door) = self.pending.pop_front() else {
                break;
            };
            match self.generate_next_room(door) {
                Ok(_) => placed += 1,
                Err(err) => log::trace!("Door {door:?} did not expand: {err}"),
            }
        }
        placed
    }

    /// Expands doors until the world is finished.
    pub fn generate(&mut self) {
        while !self.finished_generating {
            if self.pending.is_empty() {
                log::warn!(
                    "Ran out of doors with {} rooms left in the budget",
                    self.room_budget
                );
                self.world_cleanup();
                break;
            }
            self.process_pending_expansions();
        }
    }

    /// Walls up doors that lead nowhere and opens up the spawn room.
    /// Only the first call does anything.
    pub fn world_cleanup(&mut self) {
        if self.finished_generating {
            return;
        }
        self.cleanups += 1;
        self.pending.clear();

        let doors: Vec<(TileId, RoomId, i32, i32, Direction)> = self
            .tiles
            .iter()
            .filter_map(|(id, tile)| {
                tile.door()
                    .map(|door| (id, door.room, tile.x, tile.y, door.direction))
            })
            .collect();

        let mut walled = 0;
        for (id, room, x, y, direction) in doors {
            let (dx, dy) = direction.offset();
            let dead_end = self
                .get_tile(x + dx, y + dy)
                .map_or(true, |next| next.tile_type().is_wall());
            if !dead_end {
                continue;
            }

            let top = self.rooms.get(room.0).map_or(false, |owner| owner.y == y);
            let ty = if top { TileType::WallLedge } else { TileType::Wall };
            self.swap_tile(room, id, ty);
            walled += 1;
        }

        if let Some(spawn) = self.spawn() {
            let spawn_id = spawn.id;
            let spawn_doors: Vec<TileId> = spawn
                .tiles
                .iter()
                .copied()
                .filter(|id| self.tiles.get(*id).map_or(false, |tile| tile.door().is_some()))
                .collect();
            for id in spawn_doors {
                let ground = random_ground_tile(&mut self.rng);
                self.swap_tile(spawn_id, id, ground);
            }
        }

        self.positional_bounds = Some(self.compute_positional_bounds());
        self.finished_generating = true;
        log::info!(
            "Dungeon finished with {} rooms, {walled} dead-end doors walled up",
            self.rooms.len()
        );
    }

    pub fn compute_positional_bounds(&self) -> PositionalBounds {
        self.rooms
            .iter()
            .fold(PositionalBounds::default(), |bounds, room| PositionalBounds {
                low_x: bounds.low_x.min(room.x),
                low_y: bounds.low_y.min(room.y),
                high_x: bounds.high_x.max(room.x),
                high_y: bounds.high_y.max(room.y),
            })
    }

    /// Advances a room through dormant, triggered, active and cleared.
    pub fn room_event_handler(&mut self, id: RoomId, player: &Rect) -> Vec<RoomEvent> {
        let mut events = Vec::new();
        let Some(room) = self.rooms.get_mut(id.0) else {
            return events;
        };
        if room.is_cleared() {
            return events;
        }

        let mut cleared = room.state == RoomState::Active
            && room.kind == RoomKind::Hostile
            && room.enemy_cache.is_empty();

        if room.state == RoomState::Dormant
            && room.rect().touches(player)
            && calculate_distance(room.center(), player.center())
                < room.width as f32 / 2.0 - TRIGGER_MARGIN
        {
            room.state = RoomState::Triggered;
            events.push(RoomEvent::Triggered(id));
        }

        if room.state == RoomState::Triggered {
            room.state = RoomState::Active;

            for tile in &room.tiles {
                if let Some(door) = self.tiles.get_mut(*tile).and_then(Tile::door_mut) {
                    door.open = false;
                    door.locked = true;
                }
            }

            match room.kind {
                RoomKind::Coins => {
                    let count = self.rng.gen_range(5..=10);
                    for _ in 0..count {
                        let x = self.rng.gen_range(room.x + 12..=room.x + room.width - 12);
                        let y = self.rng.gen_range(room.y + 12..=room.y + room.height - 12);
                        self.items
                            .push(Item::new(vec2(x as f32, y as f32), ItemKind::Coin, 1));
                    }
                    events.push(RoomEvent::CoinsSpawned { room: id, count });
                    cleared = true;
                }
                RoomKind::Hostile => {
                    let row = room.width as f32 / 2.0;
                    for i in 0..room.enemies {
                        room.create_enemy(vec2(16.0 + i as f32 * 9.0, row), 1);
                    }
                    events.push(RoomEvent::EnemiesSpawned {
                        room: id,
                        count: room.enemies,
                    });
                }
                RoomKind::Ambient => cleared = true,
            }
        }

        if !(cleared && room.state == RoomState::Active) {
            return events;
        }

        room.state = RoomState::Cleared;
        let tiles = room.tiles.clone();
        let torches = room.torch_positions();
        self.rooms_cleared += 1;

        for tile in tiles {
            if self.tiles.get(tile).map_or(false, |t| t.door().is_some()) {
                let ground = random_ground_tile(&mut self.rng);
                self.swap_tile(id, tile, ground);
            }
        }
        for position in torches {
            let torch = Torch::new(position, true, &mut self.rng);
            self.torches.push(torch);
        }

        log::debug!("Room {} cleared", id.0);
        events.push(RoomEvent::Cleared(id));
        events
    }

    /// Opens unlocked doors next to the player when they interact.
    pub fn update_doors(&mut self, player: &Rect, interact: bool) -> usize {
        if !interact {
            return 0;
        }
        let mut opened = 0;
        for (_, tile) in self.tiles.iter_mut() {
            let near = calculate_distance(tile.center(), player.center()) <= DOOR_REACH;
            if let Some(door) = tile.door_mut() {
                if near && !door.open && !door.locked {
                    door.open = true;
                    opened += 1;
                }
            }
        }
        opened
    }

    /// Ages items, drifts them toward the player and collects the ones
    /// that reach them.
    pub fn update_items(&mut self, player: &mut Player) {
        if self.items.len() >= MAX_ITEMS {
            let excess = self.items.len() + 1 - MAX_ITEMS;
            self.items.drain(..excess);
        }

        let viewport = self.viewport(player.position);
        let mut kept = Vec::with_capacity(self.items.len());
        for mut item in self.items.drain(..) {
            if item.rect().is_visible_in(&viewport) && item.update(player) {
                player.collect(&item);
                continue;
            }
            if !item.is_expired() {
                kept.push(item);
            }
        }
        self.items = kept;
    }

    /// The screen area centred on the player.
    pub fn viewport(&self, player: Vec2) -> Rect {
        let (width, height) = (self.config.screen_width, self.config.screen_height);
        Rect::new(
            player.x + 4.0 - width / 2.0,
            player.y + 4.0 - height / 2.0,
            width,
            height,
        )
    }

    pub fn lights(&self, player: &Player) -> Vec<LightSource> {
        self.torches
            .iter()
            .map(Torch::light)
            .chain(std::iter::once(player.light()))
            .collect()
    }

    /// One logic tick. Nothing but generation happens until the world
    /// is finished.
    pub fn tick(&mut self, player: &mut Player, input: &InputState) -> Vec<RoomEvent> {
        self.process_pending_expansions();
        if !self.finished_generating && self.pending.is_empty() {
            log::warn!(
                "Ran out of doors with {} rooms left in the budget",
                self.room_budget
            );
            self.world_cleanup();
        }
        if !self.finished_generating {
            return Vec::new();
        }

        reset_lighting(&mut self.tiles);
        player.input(input, &self.tiles);

        let rect = player.rect();
        let mut events = Vec::new();
        for i in 0..self.rooms.len() {
            events.extend(self.room_event_handler(RoomId(i), &rect));
        }
        self.update_doors(&rect, input.interact);
        self.update_items(player);

        let viewport = self.viewport(player.position);
        for torch in &mut self.torches {
            if torch.rect().is_visible_in(&viewport) {
                torch.animate(&mut self.rng);
            }
        }

        let lights = self.lights(player);
        apply_lighting(
            &mut self.tiles,
            &lights,
            &viewport,
            self.config.default_light_distance,
            self.config.light_step,
        );

        player.round_position();
        for item in &mut self.items {
            item.position = item.position.round();
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(room_count: u32) -> DungeonConfig {
        DungeonConfig {
            room_count,
            seed: Some(7),
            ..Default::default()
        }
    }

    fn doors_of(world: &World, room: RoomId) -> Vec<TileId> {
        world.rooms[room.0]
            .tiles
            .iter()
            .copied()
            .filter(|id| world.tiles.get(*id).map_or(false, |t| t.door().is_some()))
            .collect()
    }

    #[test]
    fn spawn_room_queues_its_doors() {
        let world = World::new(config(5));
        let spawn = world.spawn().unwrap();
        assert_eq!((spawn.x, spawn.y, spawn.width, spawn.height), (0, 0, 88, 88));
        assert_eq!(spawn.kind, RoomKind::Ambient);
        assert_eq!(spawn.tiles.len(), 121);
        assert_eq!(world.tiles.len(), 121);
        assert_eq!(world.pending_expansions(), 4);
        assert_eq!(world.room_budget, 4);
        assert!(!world.finished_generating);
        assert_eq!(world.spawn_point(), vec2(40.0, 40.0));
    }

    #[test]
    fn a_single_room_budget_walls_up_every_door() {
        let world = World::new(config(1));
        assert_eq!(world.room_budget, 0);
        assert!(world.finished_generating);
        assert_eq!(world.cleanups, 1);
        assert_eq!(world.pending_expansions(), 0);
        assert!(world.tiles.iter().all(|(_, tile)| tile.door().is_none()));

        assert_eq!(world.get_tile(40, 0).map(Tile::tile_type), Some(TileType::WallLedge));
        assert_eq!(world.get_tile(40, 80).map(Tile::tile_type), Some(TileType::Wall));
        assert_eq!(world.get_tile(0, 40).map(Tile::tile_type), Some(TileType::Wall));
        assert_eq!(world.get_tile(80, 40).map(Tile::tile_type), Some(TileType::Wall));
        assert_eq!(world.rooms[0].tiles.len(), 121);
        assert_eq!(world.positional_bounds, Some(PositionalBounds::default()));
    }

    #[test]
    fn cleanup_only_runs_once() {
        let mut world = World::new(config(1));
        world.world_cleanup();
        world.generate();
        assert_eq!(world.cleanups, 1);
        assert_eq!(
            world.create_room_from_template(200, 200, RoomTemplate::U, true, true),
            Err(PlacementError::OutOfBudget)
        );
    }

    #[test]
    fn doors_expand_once_into_matching_rooms() {
        let mut world = World::new(config(10));
        let up = world.tiles.at(40, 0).unwrap();

        let room = world.generate_next_room(up).unwrap();
        let placed = &world.rooms[room.0];
        assert_eq!((placed.x, placed.y), (0, -88));
        assert_eq!(
            world.get_tile(40, -8).map(Tile::tile_type),
            Some(TileType::DoorClosed)
        );
        assert_eq!(world.generate_next_room(up), Err(PlacementError::AlreadyGenerated));

        let floor = world.tiles.at(8, 8).unwrap();
        assert_eq!(world.generate_next_room(floor), Err(PlacementError::NotADoor));
    }

    #[test]
    fn occupied_slots_are_left_alone() {
        let mut world = World::new(config(10));
        world
            .create_room_from_template(88, 0, RoomTemplate::U, true, false)
            .unwrap();
        let right = world.tiles.at(80, 40).unwrap();
        let rooms = world.rooms.len();
        let budget = world.room_budget;
        assert_eq!(
            world.generate_next_room(right),
            Err(PlacementError::Overlaps { x: 88, y: 0 })
        );
        assert_eq!(world.rooms.len(), rooms);
        assert_eq!(world.room_budget, budget);
    }

    #[test]
    fn strict_placement_rejects_overlap_but_allows_touching() {
        let mut world = World::new(config(10));
        let before = world.tiles.len();
        assert_eq!(
            world.create_room_from_template(80, 0, RoomTemplate::U, true, false),
            Err(PlacementError::Overlaps { x: 80, y: 0 })
        );
        assert_eq!(world.tiles.len(), before);
        assert!(world
            .create_room_from_template(88, 0, RoomTemplate::U, true, false)
            .is_ok());
        assert!(world.create_room(-400, -400, true).is_ok());
    }

    #[test]
    fn pending_doors_wait_for_the_next_pass() {
        let mut world = World::new(config(25));
        let placed = world.process_pending_expansions();
        assert!(placed > 0);
        // Every placed branch room queues at least one door of its own.
        assert!(world.pending_expansions() >= placed);
        assert!(world.rooms.len() == 1 + placed);
    }

    #[test]
    fn generation_spends_the_budget_and_finishes() {
        let mut world = World::new(config(12));
        world.generate();
        assert!(world.finished_generating);
        assert_eq!(world.cleanups, 1);

        let bounds = world.positional_bounds.unwrap();
        for room in &world.rooms {
            assert!(room.x >= bounds.low_x && room.x <= bounds.high_x);
            assert!(room.y >= bounds.low_y && room.y <= bounds.high_y);
        }

        // Doors that survive cleanup lead somewhere walkable.
        for (_, tile) in world.tiles.iter() {
            if let Some(door) = tile.door() {
                let (dx, dy) = door.direction.offset();
                let next = world.get_tile(tile.x + dx, tile.y + dy).unwrap();
                assert!(!next.tile_type().is_wall());
            }
        }
        assert!(doors_of(&world, RoomId(0)).is_empty());
    }

    #[test]
    fn same_seed_grows_the_same_dungeon() {
        let mut a = World::new(config(15));
        let mut b = World::new(config(15));
        a.generate();
        b.generate();
        let layout = |w: &World| w.rooms.iter().map(|r| (r.x, r.y, r.kind)).collect::<Vec<_>>();
        assert_eq!(layout(&a), layout(&b));
    }

    fn coins_room() -> (World, RoomId) {
        let mut world = World::empty(config(10));
        let id = world
            .create_room_from_template(0, 0, RoomTemplate::Ud, true, false)
            .unwrap();
        world.rooms[id.0].kind = RoomKind::Coins;
        (world, id)
    }

    #[test]
    fn coin_rooms_pay_out_and_clear_in_one_pass() {
        let (mut world, id) = coins_room();

        let outside = Rect::new(-40.0, -40.0, 8.0, 8.0);
        assert!(world.room_event_handler(id, &outside).is_empty());
        assert_eq!(world.rooms[id.0].state, RoomState::Dormant);

        let player = Rect::new(40.0, 40.0, 8.0, 8.0);
        let events = world.room_event_handler(id, &player);
        assert_eq!(events.first(), Some(&RoomEvent::Triggered(id)));
        assert_eq!(events.last(), Some(&RoomEvent::Cleared(id)));
        assert_eq!(world.rooms[id.0].state, RoomState::Cleared);
        assert_eq!(world.rooms_cleared, 1);

        assert!((5..=10).contains(&world.items.len()));
        for item in &world.items {
            assert!((12.0..=76.0).contains(&item.position.x));
            assert!((12.0..=76.0).contains(&item.position.y));
        }

        assert!(doors_of(&world, id).is_empty());
        assert_eq!(world.rooms[id.0].tiles.len(), 121);
        assert_eq!(world.torches.len(), 4);
        assert_eq!(world.torches[2].position, vec2(72.0, 72.0));
    }

    #[test]
    fn the_trigger_needs_the_player_well_inside() {
        let (mut world, id) = coins_room();
        let doorway = Rect::new(40.0, 4.0, 8.0, 8.0);
        assert!(world.room_event_handler(id, &doorway).is_empty());
        assert_eq!(world.rooms[id.0].state, RoomState::Dormant);
    }

    #[test]
    fn hostile_rooms_clear_once_their_enemies_are_gone() {
        let (mut world, id) = coins_room();
        world.rooms[id.0].kind = RoomKind::Hostile;
        world.rooms[id.0].enemies = 2;
        let player = Rect::new(40.0, 40.0, 8.0, 8.0);

        let events = world.room_event_handler(id, &player);
        assert!(events.contains(&RoomEvent::EnemiesSpawned { room: id, count: 2 }));
        assert_eq!(world.rooms[id.0].state, RoomState::Active);
        assert_eq!(world.rooms[id.0].enemy_cache.len(), 2);
        assert_eq!(world.rooms[id.0].enemy_cache[1].position, vec2(25.0, 44.0));

        let doors = doors_of(&world, id);
        assert_eq!(doors.len(), 2);
        for door in &doors {
            let state = world.tiles.get(*door).and_then(Tile::door).unwrap();
            assert!(state.locked && !state.open);
        }

        assert!(world.room_event_handler(id, &player).is_empty());
        world.rooms[id.0].destroy_enemy(0);
        world.rooms[id.0].destroy_enemy(0);

        let events = world.room_event_handler(id, &player);
        assert_eq!(events, vec![RoomEvent::Cleared(id)]);
        assert_eq!(world.rooms_cleared, 1);

        // Cleared rooms stay cleared whatever happens to them later.
        world.rooms[id.0].create_enemy(vec2(20.0, 20.0), 1);
        assert!(world.room_event_handler(id, &player).is_empty());
        assert_eq!(world.rooms[id.0].state, RoomState::Cleared);
        assert_eq!(world.rooms_cleared, 1);
    }

    #[test]
    fn doors_open_for_a_nearby_player_unless_locked() {
        let (mut world, _) = coins_room();
        let up = world.tiles.at(40, 0).unwrap();
        let far = Rect::new(40.0, 40.0, 8.0, 8.0);
        let near = Rect::new(40.0, 8.0, 8.0, 8.0);

        assert_eq!(world.update_doors(&near, false), 0);
        assert_eq!(world.update_doors(&far, true), 0);
        assert_eq!(world.update_doors(&near, true), 1);
        assert_eq!(world.tiles.get(up).map(Tile::tile_type), Some(TileType::DoorOpen));

        let down = world.tiles.at(40, 80).unwrap();
        if let Some(door) = world.tiles.get_mut(down).and_then(Tile::door_mut) {
            door.locked = true;
        }
        let below = Rect::new(40.0, 72.0, 8.0, 8.0);
        assert_eq!(world.update_doors(&below, true), 0);
    }

    #[test]
    fn ticks_light_the_spawn_and_collect_coins() {
        let mut world = World::new(config(1));
        let mut player = Player::new(world.spawn_point());
        world.items.push(Item::new(vec2(52.0, 42.0), ItemKind::Coin, 3));

        let mut events = Vec::new();
        for _ in 0..10 {
            events.extend(world.tick(&mut player, &InputState::default()));
        }

        assert!(events.contains(&RoomEvent::Cleared(RoomId(0))));
        assert_eq!(world.rooms_cleared, 1);
        assert_eq!(player.coins(), 3);
        assert!(world.items.is_empty());

        let floor = world.get_tile(40, 40).unwrap();
        assert!(floor.light_alpha >= 0.1);
        assert_eq!(player.position, player.position.round());
    }

    #[test]
    fn ticks_stay_dark_with_a_zero_light_step() {
        let mut world = World::new(DungeonConfig {
            light_step: 0.0,
            ..config(1)
        });
        let mut player = Player::new(world.spawn_point());

        for _ in 0..3 {
            world.tick(&mut player, &InputState::default());
        }

        assert!(world.finished_generating);
        assert!(world.tiles.iter().all(|(_, tile)| tile.light_alpha == 0.0));
    }
}
