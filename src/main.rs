use std::{fmt::Display, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use egui::{ScrollArea, Ui};
use macroquad::{prelude::*, window::Conf};
use stringlit::s;

use args::{Args, Command};
use torchcast::{
    config::Config,
    dungeon::{entities::Player, World},
    input::InputState,
    levels,
    simulation::Simulation,
};

mod args;
mod render;

const DEFAULT_CONFIG: &str = include_str!("../test_data/config.toml");

fn read_with_default(path: Option<PathBuf>, default: &str) -> anyhow::Result<String> {
    path.map(|path| {
        std::fs::read_to_string(&path).with_context(|| format!("Could not read {path:?}"))
    })
    .unwrap_or_else(|| Ok(s!(default)))
}

fn read_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let text = read_with_default(path, DEFAULT_CONFIG)?;
    toml::from_str(&text).context("Invalid config")
}

fn value<D: Display>(ui: &mut Ui, text: &str, value: D) {
    ui.horizontal(|ui| {
        ui.label(format!("{text}:"));
        ui.label(format!("{value}"));
    });
}

enum Mode {
    Dungeon { world: World, player: Player },
    Raycast(Simulation),
}

struct State {
    mode: Mode,
    paused: bool,
    lighting: bool,
    tick: usize,
    fps: i32,
    last_mouse_x: Option<f32>,
}

fn poll_input(last_mouse_x: &mut Option<f32>) -> InputState {
    let (mouse_x, _) = mouse_position();
    let input = InputState {
        up: is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
        down: is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
        left: is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
        right: is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
        sprint: is_key_down(KeyCode::LeftShift),
        interact: is_key_down(KeyCode::E),
        mouse_dx: last_mouse_x.map_or(0.0, |last| mouse_x - last),
    };
    *last_mouse_x = Some(mouse_x);
    input
}

fn update(state: &mut State) {
    if state.tick % 100 == 0 {
        state.fps = get_fps();
    }
    state.tick = state.tick.wrapping_add(1);

    if is_key_pressed(KeyCode::Space) {
        state.paused = !state.paused;
    }

    // Exit with ESC
    #[cfg(not(target_arch = "wasm32"))]
    if is_key_down(KeyCode::Escape) {
        std::process::exit(0);
    }

    let input = poll_input(&mut state.last_mouse_x);
    if state.paused {
        return;
    }

    match &mut state.mode {
        Mode::Dungeon { world, player } => {
            for event in world.tick(player, &input) {
                log::info!("{event:?}");
            }
        }
        Mode::Raycast(sim) => {
            sim.update(&input, get_frame_time(), vec2(screen_width(), screen_height()));
        }
    }
}

fn draw_panel(state: &mut State) {
    egui_macroquad::ui(|ctx| {
        egui::SidePanel::new(egui::panel::Side::Right, "Control").show(ctx, |ui| {
            ui.checkbox(&mut state.paused, "Pause (Space)");
            ui.separator();
            ui.heading("Debug");
            value(ui, "- FPS", state.fps);
            value(ui, "- DT", format!("{:.4}", get_frame_time()));
            ui.separator();

            match &mut state.mode {
                Mode::Dungeon { world, player } => {
                    ui.checkbox(&mut state.lighting, "Lighting");
                    if ui.button("New dungeon").clicked() {
                        world.reset();
                        *player = Player::new(world.spawn_point());
                    }
                    ui.collapsing("World", |ui| {
                        value(ui, "- Rooms", world.rooms.len());
                        value(ui, "- Budget left", world.room_budget);
                        value(ui, "- Pending doors", world.pending_expansions());
                        value(ui, "- Finished", world.finished_generating);
                        value(ui, "- Tiles", world.tiles.len());
                        value(ui, "- Torches", world.torches.len());
                        value(ui, "- Items", world.items.len());
                        if let Some(bounds) = world.positional_bounds {
                            value(ui, "- Bounds", format!("{bounds:?}"));
                        }
                    });
                    ui.collapsing("Player", |ui| {
                        value(ui, "- Position", player.position);
                        value(ui, "- Coins", player.coins());
                        value(ui, "- Rooms cleared", world.rooms_cleared);
                    });
                }
                Mode::Raycast(sim) => {
                    ui.collapsing("Player", |ui| {
                        value(ui, "- Position", sim.player.position);
                        value(ui, "- Angle", format!("{:.1}", sim.player.angle));
                    });
                    ui.collapsing("Frame", |ui| {
                        ScrollArea::new([false, true]).show(ui, |ui| {
                            value(ui, "- Columns", sim.columns.len());
                            value(ui, "- Walls", sim.world.walls.len());
                            value(ui, "- Sprites in view", sim.sightings.len());
                            match toml::to_string_pretty(&sim.config) {
                                Ok(config) => ui.label(config),
                                Err(e) => ui.label(format!("{e}")),
                            };
                        });
                    });
                }
            }
        });
    });
    egui_macroquad::draw();
}

async fn run(mut state: State) {
    loop {
        update(&mut state);
        match &state.mode {
            Mode::Dungeon { world, player } => render::draw_dungeon(world, player, state.lighting),
            Mode::Raycast(sim) => render::draw_raycast(sim),
        }
        draw_panel(&mut state);
        next_frame().await;
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: s!("torchcast"),
        window_width: 1015,
        window_height: 810,
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mode = match args.command.unwrap_or(Command::Dungeon {
        config: None,
        seed: None,
    }) {
        Command::ExampleLevel { json } => {
            if json {
                let level = levels::parse(levels::DEV_01)?;
                println!("{}", serde_json::to_string_pretty(&level)?);
            } else {
                println!("{}", levels::DEV_01);
            }
            return Ok(());
        }
        Command::ExampleConfig => {
            println!("{DEFAULT_CONFIG}");
            return Ok(());
        }
        Command::Dungeon { config, seed } => {
            let mut config = read_config(config)?;
            if seed.is_some() {
                config.dungeon.seed = seed;
            }
            let world = World::new(config.dungeon);
            let player = Player::new(world.spawn_point());
            Mode::Dungeon { world, player }
        }
        Command::Raycast { level, config } => {
            let config = read_config(config)?;
            let level = levels::parse(&read_with_default(level, levels::DEV_01)?)?;
            Mode::Raycast(Simulation::new(&level, config.raycast))
        }
    };

    let state = State {
        mode,
        paused: false,
        lighting: true,
        tick: 0,
        fps: 0,
        last_mouse_x: None,
    };
    macroquad::Window::from_config(window_conf(), run(state));
    Ok(())
}
