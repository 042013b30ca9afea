//! tile sprites: colour banding & full redraw whenever the grid changes

use bevy::prelude::*;
use noise::{NoiseFn, Perlin};

use crate::components::TileSprite;
use crate::constants::*;
use crate::terrain::{Terrain, TileKind};

/// per‑run colour noise for rock tiles
#[derive(Resource)]
pub struct TileTint {
    pub noise: Perlin,
}

impl TileTint {
    pub fn new(seed: u32) -> Self {
        Self { noise: Perlin::new(seed) }
    }
}

/// quantised colour variation (pixel‑arty banding)
pub fn tile_color(tint: &TileTint, x: usize, y: usize) -> Color {
    let raw = tint
        .noise
        .get([x as f64 * COLOR_NOISE_SCALE, y as f64 * COLOR_NOISE_SCALE]) as f32;

    let step = (((raw + 1.0) * 0.5) * COLOR_VARIATION_LEVELS as f32)
        .floor()
        .clamp(0.0, (COLOR_VARIATION_LEVELS - 1) as f32);
    let norm = step / (COLOR_VARIATION_LEVELS as f32 - 1.0) * 2.0 - 1.0;
    let factor = 1.0 + norm * COLOR_VARIATION_STRENGTH;

    let rgb = ROCK_RGB * factor;
    Color::srgb(
        rgb.x.clamp(0.0, 1.0),
        rgb.y.clamp(0.0, 1.0),
        rgb.z.clamp(0.0, 1.0),
    )
}

/// every solid tile as a sprite bundle; empty tiles draw nothing
pub fn tile_sprites(terrain: &Terrain, tint: &TileTint) -> Vec<(Sprite, Transform, TileSprite)> {
    let mut out = Vec::new();
    for (y, row) in terrain.tiles.iter().enumerate() {
        for (x, &kind) in row.iter().enumerate() {
            if kind != TileKind::Solid {
                continue;
            }
            let centre = terrain.tile_center_world(x, y);
            out.push((
                Sprite {
                    color: tile_color(tint, x, y),
                    custom_size: Some(Vec2::splat(TILE_SIZE)),
                    ..default()
                },
                Transform::from_xyz(centre.x, centre.y, 0.0),
                TileSprite { x, y },
            ));
        }
    }
    out
}

/* ===========================================================
   redraw_tiles_system – runs on insert and on regeneration
   =========================================================== */
pub fn redraw_tiles_system(
    mut commands: Commands,
    terrain: Res<Terrain>,
    tint: Res<TileTint>,
    old: Query<Entity, With<TileSprite>>,
) {
    if !terrain.is_changed() {
        return;
    }
    for e in &old {
        commands.entity(e).despawn();
    }
    let sprites = tile_sprites(&terrain, &tint);
    debug!("drawing {} solid tiles", sprites.len());
    commands.spawn_batch(sprites);
}
