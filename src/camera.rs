use macroquad::math::Vec2;
use serde::{Deserialize, Serialize};

/// View settings, distances in grid units.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CameraSettings {
    pub fov: f32, // Degrees
    pub render_distance: f32,
    pub light_distance: f32,
    pub wall_height_grid_ratio: f32,
    pub resolution_degradation: u32, // Screen columns per ray
    pub lock_to_player: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov: 90.0,
            render_distance: 48.0,
            light_distance: 24.0,
            wall_height_grid_ratio: 16.0,
            resolution_degradation: 1,
            lock_to_player: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub settings: CameraSettings,
    grid: f32,
    x: f32,
    y: f32,
    angle: f32,
}

impl Camera {
    pub fn new(settings: CameraSettings, grid: f32) -> Self {
        Self {
            settings,
            grid,
            x: 0.0,
            y: 0.0,
            angle: 0.0,
        }
    }

    pub fn fov(&self) -> f32 {
        self.settings.fov
    }

    pub fn render_distance(&self) -> f32 {
        self.settings.render_distance * self.grid
    }

    pub fn light_distance(&self) -> f32 {
        self.settings.light_distance * self.grid
    }

    pub fn wall_height_grid_ratio(&self) -> f32 {
        self.settings.wall_height_grid_ratio * self.grid
    }

    pub fn resolution_degradation(&self) -> usize {
        self.settings.resolution_degradation.max(1) as usize
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.x = position.x.round();
        self.y = position.y.round();
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle.round();
    }

    pub fn follow(&mut self, position: Vec2, angle: f32) {
        if !self.settings.lock_to_player {
            return;
        }
        self.set_position(position);
        self.set_angle(angle);
    }
}

#[cfg(test)]
mod tests {
    use macroquad::math::vec2;

    use super::*;

    #[test]
    fn distances_scale_with_the_grid() {
        let camera = Camera::new(CameraSettings::default(), 48.0);
        assert_eq!(camera.render_distance(), 48.0 * 48.0);
        assert_eq!(camera.light_distance(), 24.0 * 48.0);
        assert_eq!(camera.wall_height_grid_ratio(), 16.0 * 48.0);
    }

    #[test]
    fn follows_only_when_locked() {
        let mut camera = Camera::new(CameraSettings::default(), 48.0);
        camera.follow(vec2(10.4, 20.6), 33.5);
        assert_eq!(camera.position(), vec2(10.0, 21.0));
        assert_eq!(camera.angle(), 34.0);

        camera.settings.lock_to_player = false;
        camera.follow(vec2(99.0, 99.0), 0.0);
        assert_eq!(camera.position(), vec2(10.0, 21.0));
    }
}
