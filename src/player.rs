//! all player‑related systems (input, collision, motion, tint)

use bevy::input::ButtonInput;
use bevy::prelude::*;

use crate::components::*;
use crate::config::GameConfig;
use crate::constants::*;
use crate::terrain::{map_to_world, pixel_to_tile, solid, Terrain};

/* ===========================================================
   input state (WASD)
   =========================================================== */
#[derive(Resource, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub left: bool,
    pub down: bool,
    pub right: bool,
}

impl HeldKeys {
    pub fn from_input(keys: &ButtonInput<KeyCode>) -> Self {
        Self {
            up: keys.pressed(KeyCode::KeyW),
            left: keys.pressed(KeyCode::KeyA),
            down: keys.pressed(KeyCode::KeyS),
            right: keys.pressed(KeyCode::KeyD),
        }
    }

    /// unnormalised: two keys on different axes move faster than one
    pub fn offset(self, speed: f32) -> Vec2 {
        let mut d = Vec2::ZERO;
        if self.up {
            d.y -= speed;
        }
        if self.down {
            d.y += speed;
        }
        if self.left {
            d.x -= speed;
        }
        if self.right {
            d.x += speed;
        }
        d
    }
}

pub fn read_held_keys_system(keys: Res<ButtonInput<KeyCode>>, mut held: ResMut<HeldKeys>) {
    held.set_if_neq(HeldKeys::from_input(&keys));
}

/* ===========================================================
   collision
   =========================================================== */

/// true when any corner of the radius‑sized box around `pos` sits on a solid
/// or off‑grid tile
pub fn check_collision(terrain: &Terrain, pos: Vec2, radius: f32) -> bool {
    let corners = [
        Vec2::new(pos.x - radius, pos.y - radius),
        Vec2::new(pos.x + radius, pos.y - radius),
        Vec2::new(pos.x - radius, pos.y + radius),
        Vec2::new(pos.x + radius, pos.y + radius),
    ];
    corners
        .iter()
        .any(|c| solid(terrain, pixel_to_tile(c.x), pixel_to_tile(c.y)))
}

/// one frame of axis‑separated movement; x is committed first so the y test
/// sees the updated x, which is what lets the avatar slide along walls
pub fn step_avatar(terrain: &Terrain, pos: Vec2, radius: f32, held: HeldKeys, speed: f32) -> Vec2 {
    let target = pos + held.offset(speed);
    let mut next = pos;

    if !check_collision(terrain, Vec2::new(target.x, next.y), radius) {
        next.x = target.x;
    }
    if !check_collision(terrain, Vec2::new(next.x, target.y), radius) {
        next.y = target.y;
    }
    next
}

/* ===========================================================
   spawn
   =========================================================== */
#[derive(Resource)]
pub struct AvatarMaterials {
    pub clear: Handle<ColorMaterial>,
    pub blocked: Handle<ColorMaterial>,
}

/// centre of `SPAWN_TILE` in map pixels
pub fn spawn_position() -> Vec2 {
    let (sx, sy) = SPAWN_TILE;
    Vec2::new(
        sx as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        sy as f32 * TILE_SIZE + TILE_SIZE / 2.0,
    )
}

pub fn spawn_player(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let palette = AvatarMaterials {
        clear: materials.add(CLEAR_COLOR),
        blocked: materials.add(BLOCKED_COLOR),
    };

    let spawn = spawn_position();
    let world = map_to_world(config.map_pixel_size().y, spawn);

    commands.spawn((
        Mesh2d(meshes.add(Circle::new(PLAYER_RADIUS))),
        MeshMaterial2d(palette.clear.clone()),
        Transform::from_translation(world.extend(10.0)),
        Player { radius: PLAYER_RADIUS },
        MapPosition(spawn),
    ));
    commands.insert_resource(palette);
}

/* ===========================================================
   per‑frame motion
   =========================================================== */
pub fn player_motion_system(
    held: Res<HeldKeys>,
    terrain: Res<Terrain>,
    mut q: Query<(&mut MapPosition, &Player)>,
) {
    for (mut pos, ply) in &mut q {
        let next = step_avatar(&terrain, pos.0, ply.radius, *held, PLAYER_SPEED);
        pos.set_if_neq(MapPosition(next));
    }
}

/// green when free, red when overlapping rock (display only)
pub fn tint_player_system(
    terrain: Res<Terrain>,
    palette: Res<AvatarMaterials>,
    mut q: Query<(&MapPosition, &Player, &mut MeshMaterial2d<ColorMaterial>)>,
) {
    for (pos, ply, mut material) in &mut q {
        let wanted = if check_collision(&terrain, pos.0, ply.radius) {
            &palette.blocked
        } else {
            &palette.clear
        };
        if material.0 != *wanted {
            material.0 = wanted.clone();
        }
    }
}

pub fn sync_player_transform_system(
    terrain: Res<Terrain>,
    mut q: Query<(&MapPosition, &mut Transform), With<Player>>,
) {
    let map_h = terrain.pixel_size().y;
    for (pos, mut tf) in &mut q {
        let world = map_to_world(map_h, pos.0);
        tf.translation.x = world.x;
        tf.translation.y = world.y;
    }
}
