use bevy::prelude::*;

/* ===========================================================
   player
   =========================================================== */
#[derive(Component)]
pub struct Player {
    pub radius: f32,
}

/// position in map pixels: origin top‑left, y grows downward
#[derive(Component, Clone, Copy, Debug, PartialEq, Deref, DerefMut)]
pub struct MapPosition(pub Vec2);

/* ===========================================================
   terrain helper components
   =========================================================== */
#[derive(Component)]
pub struct TileSprite {
    pub x: usize,
    pub y: usize,
}
