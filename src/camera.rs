use bevy::prelude::*;

use crate::config::GameConfig;

/// pixel snapping helper – keeps the camera on whole pixels so sprites never
/// land on half‑pixels and shimmer
#[inline]
fn snap(v: f32) -> f32 {
    v.round()
}

/// the map fits the window, so the camera just sits on its centre
pub fn camera_center(config: &GameConfig) -> Vec2 {
    let half = config.map_pixel_size() * 0.5;
    Vec2::new(snap(half.x), snap(half.y))
}

pub fn setup_camera(mut commands: Commands, config: Res<GameConfig>) {
    let centre = camera_center(&config);
    commands.spawn((Camera2d, Transform::from_translation(centre.extend(0.0))));
}
