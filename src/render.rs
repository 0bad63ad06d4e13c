use macroquad::prelude::*;

use torchcast::{
    dungeon::{entities::Player, tile::TileType, World},
    geometry::normalize_angle,
    projection::floor_and_ceiling_bands,
    ray::RayHit,
    simulation::Simulation,
};

fn tile_color(ty: TileType) -> Color {
    match ty {
        TileType::Error => MAGENTA,
        TileType::Ground1 => Color::from_rgba(92, 84, 76, 255),
        TileType::Ground2 => Color::from_rgba(84, 78, 70, 255),
        TileType::Ground3 => Color::from_rgba(100, 92, 82, 255),
        TileType::Ground4 => Color::from_rgba(88, 80, 74, 255),
        TileType::Wall => Color::from_rgba(60, 56, 70, 255),
        TileType::WallLedge => Color::from_rgba(76, 72, 90, 255),
        TileType::DoorOpen => Color::from_rgba(120, 90, 50, 255),
        TileType::DoorClosed => Color::from_rgba(150, 110, 60, 255),
    }
}

fn with_alpha(color: Color, alpha: f32) -> Color {
    Color::new(color.r, color.g, color.b, alpha.clamp(0.0, 1.0))
}

/// Top-down view around the player, scaled up to fill the window.
pub fn draw_dungeon(world: &World, player: &Player, lighting: bool) {
    clear_background(BLACK);

    if !world.finished_generating {
        let text = format!("LOADING ({} rooms to go)", world.room_budget);
        draw_text(&text, 20.0, screen_height() / 2.0, 32.0, WHITE);
        return;
    }

    let viewport = world.viewport(player.position);
    let scale = (screen_width() / viewport.width).min(screen_height() / viewport.height);
    let rect = |x: f32, y: f32, w: f32, h: f32, color: Color| {
        draw_rectangle(
            (x - viewport.x) * scale,
            (y - viewport.y) * scale,
            w * scale,
            h * scale,
            color,
        );
    };

    for (_, tile) in world.tiles.iter() {
        let bounds = tile.rect();
        if !bounds.is_visible_in(&viewport) {
            continue;
        }
        let mut color = tile_color(tile.tile_type());
        if lighting {
            color = with_alpha(color, tile.light_alpha);
        }
        rect(bounds.x, bounds.y, bounds.width, bounds.height, color);
    }

    for item in &world.items {
        let bounds = item.rect();
        rect(bounds.x, bounds.y, bounds.width, bounds.height, GOLD);
    }
    for torch in &world.torches {
        let bounds = torch.rect();
        let flame = [ORANGE, YELLOW, RED][torch.frame() as usize % 3];
        rect(bounds.x + 3.0, bounds.y + 2.0, 2.0, 4.0, flame);
    }
    for room in &world.rooms {
        for enemy in &room.enemy_cache {
            rect(enemy.position.x, enemy.position.y, 8.0, 8.0, RED);
        }
    }

    let bounds = player.rect();
    rect(bounds.x, bounds.y, bounds.width, bounds.height, WHITE);
}

/// First person view: shading bands, wall slices and sprite markers.
pub fn draw_raycast(sim: &Simulation) {
    clear_background(BLACK);
    let (width, height) = (screen_width(), screen_height());

    for band in floor_and_ceiling_bands(height) {
        draw_rectangle(0.0, band.y, width, 1.0, with_alpha(GRAY, band.alpha));
    }

    for column in &sim.columns {
        let [r, g, b, a] = column.color;
        draw_rectangle(
            column.screen_x,
            column.top,
            column.width,
            column.height,
            Color::from_rgba(r, g, b, a),
        );
        for shade in [column.distance_shade, column.facet_shade] {
            draw_rectangle(
                column.screen_x,
                column.overlay_top,
                column.width,
                column.overlay_height,
                with_alpha(BLACK, shade),
            );
        }
    }

    let fov = sim.camera.fov();
    for sighting in &sim.sightings {
        if sighting.hit != RayHit::Target {
            continue;
        }
        let offset = normalize_angle(sighting.angle - sim.player.angle + fov / 2.0);
        let x = offset / fov * width;
        draw_circle(x, height / 2.0, 6.0, LIME);
    }
}
