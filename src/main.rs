//! minimal bootstrap for the cave‑runner demo
//!
//! Generates a height‑map + tunnel tile map once at startup, then rolls a
//! circle through it with WASD. R carves a fresh map.
//! Works with **Bevy 0.15**.

mod camera;
mod components;
mod config;
mod constants;
mod player;
mod terrain;
mod tiles;

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin,
    LogDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::window::WindowResolution;
use clap::Parser;
use rand::Rng;

use camera::setup_camera;
use config::{Args, GameConfig};
use constants::SKY_COLOR;
use player::{
    player_motion_system, read_held_keys_system, spawn_player,
    sync_player_transform_system, tint_player_system, HeldKeys,
};
use terrain::{generate_world_system, regenerate_world_system, WorldRng};
use tiles::{redraw_tiles_system, TileTint};

/* ------------------------------------------------------------------------ */
/* hud                                                                      */
/* ------------------------------------------------------------------------ */
fn spawn_help_text(mut commands: Commands) {
    commands.spawn((
        Text::new("Use WASD to move the circle!  (R: new map)"),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::WHITE),
        TextLayout::new_with_justify(JustifyText::Center),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            width: Val::Percent(100.0),
            ..default()
        },
    ));
}

/* ------------------------------------------------------------------------ */
/* main                                                                     */
/* ------------------------------------------------------------------------ */
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = GameConfig::from_args(&args)?;

    let mut rng = config.rng();
    let tint = TileTint::new(rng.gen());

    App::new()
        /* diagnostics ----------------------------------------------------- */
        .add_plugins((
            LogDiagnosticsPlugin::default(),
            FrameTimeDiagnosticsPlugin::default(),
            EntityCountDiagnosticsPlugin::default(),
        ))

        /* bevy core ------------------------------------------------------- */
        .insert_resource(ClearColor(SKY_COLOR))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Cave Runner".into(),
                resolution: WindowResolution::new(
                    config.surface_width as f32,
                    config.surface_height as f32,
                ),
                resizable: false,
                ..default()
            }),
            ..default()
        }))

        /* world state ----------------------------------------------------- */
        .insert_resource(config)
        .insert_resource(WorldRng(rng))
        .insert_resource(tint)
        .init_resource::<HeldKeys>()

        /* startup systems ------------------------------------------------- */
        .add_systems(
            Startup,
            (generate_world_system, spawn_player, setup_camera, spawn_help_text),
        )

        /* frame‑update systems ------------------------------------------- */
        .add_systems(
            Update,
            (
                /* world --------------------------------------------------- */
                regenerate_world_system,       // R – fresh map
                redraw_tiles_system,           // respawn sprites on change

                /* player -------------------------------------------------- */
                read_held_keys_system,         // WASD → HeldKeys
                player_motion_system,          // per‑axis move & collide
                tint_player_system,            // red / green
                sync_player_transform_system,  // map px → world
            )
                .chain(),
        )
        .run();

    Ok(())
}
