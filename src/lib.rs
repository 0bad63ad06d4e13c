pub mod camera;
pub mod config;
pub mod dungeon;
pub mod geometry;
pub mod input;
pub mod levels;
pub mod player;
pub mod projection;
pub mod ray;
pub mod simulation;
pub mod world;
