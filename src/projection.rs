use macroquad::math::{vec2, Vec2};

use crate::{
    camera::Camera,
    config::RaycastConfig,
    geometry::{calculate_angle, calculate_distance, normalize_angle},
    player::Player,
    ray::{Ray, RayHit},
    world::SegmentWorld,
};

const FLOOR_DARKNESS: f32 = 4.0;
const CEILING_DARKNESS: f32 = 2.0;
const DISTANCE_SHADE_BASE: f32 = 0.5;
const FACET_SHADE_BASE: f32 = 0.9;

/// Darkens the ends of the `0..1` range and leaves the middle at 1.
pub fn shadow_clamp_between(n: f32, lower: f32, upper: f32) -> f32 {
    if (0.0..=lower).contains(&n) {
        1.0 - n
    } else if (upper..=1.0).contains(&n) {
        n
    } else {
        1.0
    }
}

pub fn shadow_clamp(n: f32) -> f32 {
    shadow_clamp_between(n, 0.01, 0.99)
}

/// One projected wall slice. Shade values are the alpha of black overlays
/// drawn over the wall colour and are not clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallColumn {
    pub screen_x: f32,
    pub width: f32,
    pub top: f32,    // Top of the wall slice
    pub height: f32, // Projected wall height
    pub overlay_top: f32,
    pub overlay_height: f32, // Shading overlays cover a little more than the wall
    pub distance: f32,
    pub distance_shade: f32,
    pub facet_shade: f32,
    pub texture_offset: f32,
    pub color: [u8; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub y: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSighting {
    pub id: u32,
    pub angle: f32,
    pub hit: RayHit,
}

pub fn project_walls(
    world: &SegmentWorld,
    viewer: &Player,
    camera: &Camera,
    config: &RaycastConfig,
    screen: Vec2,
) -> Vec<WallColumn> {
    let fov = camera.fov();
    let render_distance = camera.render_distance();
    let light_distance = camera.light_distance();
    let half_height = screen.y / 2.0;
    let step = camera.resolution_degradation();
    let overlap = config.texture_overlap_compensation;

    let mut columns = Vec::new();
    for i in (0..screen.x.max(0.0) as usize).step_by(step) {
        let angle = viewer.angle + fov * (i as f32 / screen.x) - fov / 2.0;
        let mut ray = Ray::new(viewer.position, angle);
        let RayHit::Wall {
            fraction,
            wall_length,
            wall,
        } = ray.cast(world, config.ray_fidelity, Some(render_distance), None)
        else {
            continue;
        };

        let distance = calculate_distance(viewer.position, ray.position);
        let perpendicular = distance * (angle - viewer.angle).to_radians().cos();
        let height =
            (camera.wall_height_grid_ratio() / perpendicular) * half_height * config.wall_scale;

        let opacity = (light_distance - distance) / light_distance * shadow_clamp(fraction);
        let facet = shadow_clamp_between(fraction % wall_length, 0.1, FACET_SHADE_BASE);

        columns.push(WallColumn {
            screen_x: i as f32,
            width: step as f32,
            top: half_height - height / 2.0,
            height,
            overlay_top: half_height - height / 2.0 - overlap,
            overlay_height: height + overlap * 2.0,
            distance,
            distance_shade: DISTANCE_SHADE_BASE - opacity,
            facet_shade: if facet != 1.0 {
                facet - FACET_SHADE_BASE
            } else {
                0.0
            },
            texture_offset: wall_length / config.texture_repeat_factor * (fraction % wall_length),
            color: world.walls[wall].color(),
        });
    }
    columns
}

/// Translucent grey rows for the lower (floor) and upper (ceiling) halves.
pub fn floor_and_ceiling_bands(height: f32) -> Vec<Band> {
    let mut bands = Vec::new();
    let mut y = height / 2.0;
    while y < height {
        bands.push(Band {
            y,
            alpha: y / height / FLOOR_DARKNESS,
        });
        y += 1.0;
    }
    let mut y = height / 2.0 - 1.0;
    while y > 1.0 {
        bands.push(Band {
            y,
            alpha: (height - y) / height / CEILING_DARKNESS,
        });
        y -= 1.0;
    }
    bands
}

/// Casts toward every sprite inside the field of view and the world bounds.
pub fn sight_sprites(
    world: &SegmentWorld,
    viewer: &Player,
    camera: &Camera,
) -> Vec<SpriteSighting> {
    let half_fov = camera.fov() / 2.0;
    let bounds = vec2(world.width(), world.height());

    world
        .sprites
        .iter()
        .filter(|sprite| {
            let p = sprite.position;
            p.x >= 0.0 && p.y >= 0.0 && p.x <= bounds.x && p.y <= bounds.y
        })
        .filter_map(|sprite| {
            let angle = calculate_angle(viewer.position, sprite.position);
            let difference = normalize_angle(angle - viewer.angle);
            if difference > half_fov && difference < 360.0 - half_fov {
                return None;
            }
            let mut ray = Ray::new(viewer.position, angle);
            let hit = ray.cast(
                world,
                camera.resolution_degradation() as f32,
                Some(camera.render_distance()),
                Some(sprite),
            );
            Some(SpriteSighting {
                id: sprite.id,
                angle,
                hit,
            })
        })
        .collect()
}
