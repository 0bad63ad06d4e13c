use levelparser::Level;
use macroquad::math::Vec2;

use crate::{
    camera::Camera,
    config::RaycastConfig,
    input::InputState,
    player::Player,
    projection::{project_walls, sight_sprites, SpriteSighting, WallColumn},
    world::SegmentWorld,
};

/// The segment world, its player and the latest projected frame.
pub struct Simulation {
    pub config: RaycastConfig,
    pub world: SegmentWorld,
    pub player: Player,
    pub camera: Camera,
    pub columns: Vec<WallColumn>,
    pub sightings: Vec<SpriteSighting>,
}

impl Simulation {
    pub fn new(level: &Level, config: RaycastConfig) -> Self {
        let world = SegmentWorld::load(level, config.grid, config.bounds_check);
        let player = Player::spawn(&world, config.player_speed);
        let camera = Camera::new(config.camera.clone(), config.grid);
        Self {
            config,
            world,
            player,
            camera,
            columns: Vec::new(),
            sightings: Vec::new(),
        }
    }

    /// Input, then camera, then the raycast frame.
    pub fn update(&mut self, input: &InputState, dt: f32, screen: Vec2) {
        self.player.input(input, &self.world, dt);
        self.camera.follow(self.player.position, self.player.angle);
        self.columns = project_walls(&self.world, &self.player, &self.camera, &self.config, screen);
        self.sightings = sight_sprites(&self.world, &self.player, &self.camera);
    }
}
