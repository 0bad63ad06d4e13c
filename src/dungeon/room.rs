use macroquad::math::{vec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

use super::tile::{Direction, TileId, TILE_SIZE};

/// Tiles along each side of a template room.
pub const ROOM_TILES: i32 = 11;
/// Pixel extent of a template room.
pub const ROOM_SIZE: i32 = ROOM_TILES * TILE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomKind {
    Ambient,
    Hostile,
    Coins,
}

impl RoomKind {
    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        let chance: f32 = rng.gen_range(0.0..100.0);
        if chance < 80.0 {
            RoomKind::Hostile
        } else {
            RoomKind::Coins
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RoomState {
    Dormant,
    Triggered,
    Active,
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomTemplate {
    A,
    Ae,
    U,
    D,
    L,
    R,
    Ud,
    Lr,
    Ul,
    Ur,
    Dl,
    Dr,
}

impl RoomTemplate {
    pub const ALL: [RoomTemplate; 12] = [
        RoomTemplate::A,
        RoomTemplate::Ae,
        RoomTemplate::U,
        RoomTemplate::D,
        RoomTemplate::L,
        RoomTemplate::R,
        RoomTemplate::Ud,
        RoomTemplate::Lr,
        RoomTemplate::Ul,
        RoomTemplate::Ur,
        RoomTemplate::Dl,
        RoomTemplate::Dr,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RoomTemplate::A => "a",
            RoomTemplate::Ae => "ae",
            RoomTemplate::U => "u",
            RoomTemplate::D => "d",
            RoomTemplate::L => "l",
            RoomTemplate::R => "r",
            RoomTemplate::Ud => "ud",
            RoomTemplate::Lr => "lr",
            RoomTemplate::Ul => "ul",
            RoomTemplate::Ur => "ur",
            RoomTemplate::Dl => "dl",
            RoomTemplate::Dr => "dr",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|template| template.name() == name)
    }

    /// Sides that carry an opening. The names are historical and do not
    /// always spell out the openings.
    pub fn openings(self) -> &'static [Direction] {
        use Direction::*;
        match self {
            RoomTemplate::A | RoomTemplate::Ae => &[Up, Down, Left, Right],
            RoomTemplate::U => &[Up],
            RoomTemplate::D => &[Down],
            RoomTemplate::L => &[Left],
            RoomTemplate::R => &[Right],
            RoomTemplate::Ud => &[Up, Down],
            RoomTemplate::Lr => &[Left, Right],
            RoomTemplate::Ul => &[Up, Left],
            RoomTemplate::Ur => &[Up, Right],
            RoomTemplate::Dl => &[Left, Down],
            RoomTemplate::Dr => &[Up, Right, Down],
        }
    }

    /// Tile ids, row by row. Openings are closed doors except in `ae`,
    /// where they are plain ground.
    pub fn layout(self) -> Vec<Vec<u8>> {
        let last = (ROOM_TILES - 1) as usize;
        let mid = last / 2;
        let mut rows = walled_layout(ROOM_TILES as usize, ROOM_TILES as usize, |_| 1);

        let opening = if self == RoomTemplate::Ae { 1 } else { 6 };
        for direction in self.openings() {
            let (row, col) = match direction {
                Direction::Up => (0, mid),
                Direction::Down => (last, mid),
                Direction::Left => (mid, 0),
                Direction::Right => (mid, last),
            };
            rows[row][col] = opening;
        }
        rows
    }
}

/// A box of walls with a ledge along the top edge. `floor` picks the
/// id of each interior tile.
fn walled_layout(width: usize, height: usize, mut floor: impl FnMut(usize) -> u8) -> Vec<Vec<u8>> {
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    let edge_x = x == 0 || x == width - 1;
                    if y == 0 && !edge_x {
                        4
                    } else if y == 0 || y == height - 1 || edge_x {
                        3
                    } else {
                        floor(x)
                    }
                })
                .collect()
        })
        .collect()
}

/// Random sized room without doors, 11 to 22 tiles per side.
pub fn autogen_layout<R: Rng>(rng: &mut R) -> Vec<Vec<u8>> {
    let width = rng.gen_range(11..=22);
    let height = rng.gen_range(11..=22);
    walled_layout(width, height, |_| rng.gen_range(1..=2))
}

pub fn world_to_room(position: Vec2) -> (i32, i32) {
    let size = ROOM_SIZE as f32;
    (
        (position.x / size).floor() as i32,
        (position.y / size).floor() as i32,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub position: Vec2,
    pub health: i32,
}

#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<TileId>,
    pub kind: RoomKind,
    pub state: RoomState,
    pub enemies: u32,
    pub enemy_cache: Vec<Enemy>,
    pub doors_can_generate_more_rooms: bool,
}

impl Room {
    pub fn new<R: Rng>(
        id: RoomId,
        x: i32,
        y: i32,
        layout: &[Vec<u8>],
        doors_can_generate_more_rooms: bool,
        rng: &mut R,
    ) -> Self {
        let kind = RoomKind::roll(rng);
        let enemies = match kind {
            RoomKind::Hostile => rng.gen_range(1..=3),
            _ => 0,
        };

        Self {
            id,
            x,
            y,
            width: layout.first().map_or(0, |row| row.len() as i32) * TILE_SIZE,
            height: layout.len() as i32 * TILE_SIZE,
            tiles: Vec::new(),
            kind,
            state: RoomState::Dormant,
            enemies,
            enemy_cache: Vec::new(),
            doors_can_generate_more_rooms,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
        )
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    pub fn is_cleared(&self) -> bool {
        self.state == RoomState::Cleared
    }

    /// Spawns an enemy at an offset from the room's corner.
    pub fn create_enemy(&mut self, offset: Vec2, health: i32) -> &Enemy {
        self.enemy_cache.push(Enemy {
            position: vec2(self.x as f32, self.y as f32) + offset,
            health,
        });
        &self.enemy_cache[self.enemy_cache.len() - 1]
    }

    pub fn destroy_enemy(&mut self, index: usize) -> Option<Enemy> {
        (index < self.enemy_cache.len()).then(|| self.enemy_cache.remove(index))
    }

    /// Torch positions placed in the corners once the room is cleared.
    pub fn torch_positions(&self) -> [Vec2; 4] {
        let (x, y) = (self.x as f32, self.y as f32);
        let (w, h) = (self.width as f32, self.height as f32);
        [
            vec2(x + 8.0, y + 8.0),
            vec2(x + w - 16.0, y + 8.0),
            vec2(x + w - 16.0, y + h - 16.0),
            vec2(x + 8.0, y + h - 16.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn spawn_template_matches_the_classic_layout() {
        let rows = RoomTemplate::A.layout();
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0], vec![3, 4, 4, 4, 4, 6, 4, 4, 4, 4, 3]);
        assert_eq!(rows[5], vec![6, 1, 1, 1, 1, 1, 1, 1, 1, 1, 6]);
        assert_eq!(rows[10], vec![3, 3, 3, 3, 3, 6, 3, 3, 3, 3, 3]);

        let open = RoomTemplate::Ae.layout();
        assert_eq!(open[0][5], 1);
        assert_eq!(open[5][0], 1);
    }

    #[test]
    fn branch_templates_keep_their_openings() {
        let dr = RoomTemplate::Dr.layout();
        assert_eq!(dr[0][5], 6);
        assert_eq!(dr[5][10], 6);
        assert_eq!(dr[10][5], 6);
        assert_eq!(dr[5][0], 3);

        let dl = RoomTemplate::Dl.layout();
        assert_eq!(dl[5][0], 6);
        assert_eq!(dl[10][5], 6);
        assert_eq!(dl[0][5], 4);

        assert_eq!(RoomTemplate::from_name("ul"), Some(RoomTemplate::Ul));
        assert_eq!(RoomTemplate::from_name("zz"), None);
    }

    #[test]
    fn autogenerated_rooms_are_walled() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let rows = autogen_layout(&mut rng);
            assert!((11..=22).contains(&rows.len()));
            let width = rows[0].len();
            assert!((11..=22).contains(&width));
            assert!(rows[0][1..width - 1].iter().all(|id| *id == 4));
            assert!(rows[rows.len() - 1].iter().all(|id| *id == 3));
            for row in &rows[1..rows.len() - 1] {
                assert_eq!(row[0], 3);
                assert_eq!(row[width - 1], 3);
                assert!(row[1..width - 1].iter().all(|id| *id == 1 || *id == 2));
            }
        }
    }

    #[test]
    fn enemies_are_cached_per_room() {
        let mut rng = StdRng::seed_from_u64(5);
        let layout = RoomTemplate::U.layout();
        let mut room = Room::new(RoomId(0), 88, 0, &layout, true, &mut rng);
        assert_eq!((room.width, room.height), (88, 88));

        let enemy = room.create_enemy(vec2(16.0, 44.0), 1);
        assert_eq!(enemy.position, vec2(104.0, 44.0));
        assert_eq!(room.enemy_cache.len(), 1);
        assert!(room.destroy_enemy(3).is_none());
        assert!(room.destroy_enemy(0).is_some());
        assert!(room.enemy_cache.is_empty());
    }

    #[test]
    fn rooms_are_found_by_pixel_position() {
        assert_eq!(world_to_room(vec2(0.0, 87.0)), (0, 0));
        assert_eq!(world_to_room(vec2(88.0, -1.0)), (1, -1));
    }
}
