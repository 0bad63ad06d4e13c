use std::fmt;

use macroquad::math::{vec2, Vec2};

use crate::geometry::{calculate_angle, calculate_distance, vector_to_position, Rect};

use super::tile::{world_to_tile, TileId, TileMap, TILE_SIZE};

/// Anything that lights up nearby tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub position: Vec2,
    pub strength: f32,
    pub range: Option<f32>, // Falls back to the world's default light distance
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightingError {
    NoStrength { position: Vec2 },
    InvalidStep { step: f32 },
}

impl fmt::Display for LightingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightingError::NoStrength { position } => write!(
                f,
                "The light source at ({}, {}) does not have a light strength.",
                position.x, position.y
            ),
            LightingError::InvalidStep { step } => {
                write!(f, "Light rays must step a positive distance, got {step}.")
            }
        }
    }
}

impl std::error::Error for LightingError {}

pub const MIN_LIT_ALPHA: f32 = 0.1;

fn valid_step(step: f32) -> bool {
    step > 0.0 && step.is_finite()
}

/// Marches from the middle of the source's cell toward `target` in
/// steps of `step` pixels. Returns where it was stopped by a solid tile,
/// or `None` if the target is reachable. Running into the target itself
/// does not count as being stopped. A ray that cannot step is stopped
/// where it starts.
pub fn cast_light_ray(tiles: &TileMap, source: Vec2, target: TileId, step: f32) -> Option<Vec2> {
    let goal = tiles.get(target)?.position();
    let half = TILE_SIZE as f32 / 2.0;
    let mut ray = source + vec2(half, half);
    if !valid_step(step) {
        return Some(ray);
    }

    while calculate_distance(ray, goal) > step {
        ray += vector_to_position(calculate_angle(ray, goal), step);

        let (tx, ty) = world_to_tile(ray);
        let Some(id) = tiles.at(tx * TILE_SIZE, ty * TILE_SIZE) else {
            continue;
        };
        let Some(tile) = tiles.get(id) else {
            continue;
        };

        let probe = Rect::new(ray.x, ray.y, 1.0, 1.0);
        if tile.is_solid()
            && probe.overlaps(&tile.rect())
            && calculate_distance(ray, tile.center()) <= 5.0
        {
            if id == target {
                return None;
            }
            return Some(ray);
        }
    }

    None
}

/// Adds one light's contribution to every visible tile in its range.
/// Returns how many tiles it reached.
pub fn cast_light(
    tiles: &mut TileMap,
    light: &LightSource,
    viewport: &Rect,
    default_range: f32,
    step: f32,
) -> Result<usize, LightingError> {
    if light.strength <= 0.0 {
        return Err(LightingError::NoStrength {
            position: light.position,
        });
    }
    if !valid_step(step) {
        return Err(LightingError::InvalidStep { step });
    }
    let range = light.range.unwrap_or(default_range);

    let map: &TileMap = tiles;
    let targets: Vec<(TileId, f32)> = map
        .iter()
        .filter(|(_, tile)| tile.rect().is_visible_in(viewport))
        .map(|(id, tile)| (id, calculate_distance(tile.position(), light.position)))
        .filter(|(_, distance)| *distance < range)
        .filter(|(id, _)| cast_light_ray(map, light.position, *id, step).is_none())
        .collect();

    for (id, distance) in &targets {
        if let Some(tile) = tiles.get_mut(*id) {
            // A light sitting exactly on a tile corner would divide by zero.
            tile.light_alpha += light.strength / distance.max(1.0);
            if tile.light_alpha < MIN_LIT_ALPHA {
                tile.light_alpha = MIN_LIT_ALPHA;
            }
        }
    }

    Ok(targets.len())
}

pub fn reset_lighting(tiles: &mut TileMap) {
    for (_, tile) in tiles.iter_mut() {
        tile.light_alpha = 0.0;
    }
}

/// Applies every light in turn. Lights that cannot shine are skipped.
pub fn apply_lighting(
    tiles: &mut TileMap,
    lights: &[LightSource],
    viewport: &Rect,
    default_range: f32,
    step: f32,
) {
    for light in lights {
        if let Err(err) = cast_light(tiles, light, viewport, default_range, step) {
            log::debug!("Skipping light: {err}");
        }
    }
}
