use bevy::prelude::*;

/// -------- tiles & surface --------
pub const TILE_SIZE: f32 = 32.0;
pub const DEFAULT_SURFACE_WIDTH: u32  = 800;
pub const DEFAULT_SURFACE_HEIGHT: u32 = 640;

/// -------- height‑map --------
pub const NOISE_FACTOR: f64   = 0.5;
pub const HEIGHT_MIN_FRAC: f64 = 0.2;
pub const HEIGHT_MAX_FRAC: f64 = 0.8;

/// -------- tunnels --------
pub const TUNNEL_LENGTH: usize    = 500;
pub const TUNNEL_MAX_TURNS: usize =  50;
pub const TURN_CHANCE: f64        = 0.1;

/// -------- player --------
pub const PLAYER_SPEED: f32  = 2.0; // px per frame, per held key
pub const PLAYER_RADIUS: f32 = TILE_SIZE / 2.0;
pub const SPAWN_TILE: (usize, usize) = (10, 10);

/// -------- colours --------
pub const SKY_COLOR: Color     = Color::srgb(0.0, 0.0, 0.0);
pub const ROCK_RGB: Vec3       = Vec3::new(0.588, 0.294, 0.0); // #964B00
pub const CLEAR_COLOR: Color   = Color::srgb(0.0, 1.0, 0.0);
pub const BLOCKED_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);

/// -------- colour‑variation --------
pub const COLOR_NOISE_SCALE: f64   = 0.15;
pub const COLOR_VARIATION_LEVELS: i32 = 4;
pub const COLOR_VARIATION_STRENGTH: f32 = 0.2;
