//! command‑line options and the validated run‑time config

use anyhow::{bail, Result};
use bevy::prelude::*;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::*;

/* ===========================================================
   CLI
   =========================================================== */
#[derive(Parser, Debug)]
#[command(author, version, about = "Cave Runner – carve a cave, roll a ball through it", long_about = None)]
pub struct Args {
    /// drawing surface width in pixels
    #[arg(long, default_value_t = DEFAULT_SURFACE_WIDTH)]
    pub width: u32,

    /// drawing surface height in pixels
    #[arg(long, default_value_t = DEFAULT_SURFACE_HEIGHT)]
    pub height: u32,

    /// fixed RNG seed; a fresh one is drawn when omitted
    #[arg(long)]
    pub seed: Option<u64>,
}

/* ===========================================================
   resource
   =========================================================== */
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct GameConfig {
    pub surface_width: u32,
    pub surface_height: u32,
    /// whole tiles that fit on the surface
    pub grid_width: usize,
    pub grid_height: usize,
    pub seed: u64,
}

impl GameConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        let tile = TILE_SIZE as u32;
        let grid_width = (args.width / tile) as usize;
        let grid_height = (args.height / tile) as usize;
        if grid_width == 0 || grid_height == 0 {
            bail!(
                "surface {}x{} is smaller than a single {tile}px tile",
                args.width,
                args.height
            );
        }

        // the avatar's box always spans two tiles per axis from its spawn tile
        let (sx, sy) = SPAWN_TILE;
        let (min_w, min_h) = (sx + 2, sy + 2);
        if grid_width < min_w || grid_height < min_h {
            bail!(
                "surface {}x{} gives a {grid_width}x{grid_height} tile grid; at least {min_w}x{min_h} tiles ({}x{} px) are needed to hold the spawn point",
                args.width,
                args.height,
                min_w as u32 * tile,
                min_h as u32 * tile,
            );
        }

        let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());

        Ok(Self {
            surface_width: args.width,
            surface_height: args.height,
            grid_width,
            grid_height,
            seed,
        })
    }

    /// size of the tiled area in pixels (may be smaller than the surface)
    pub fn map_pixel_size(&self) -> Vec2 {
        Vec2::new(
            self.grid_width as f32 * TILE_SIZE,
            self.grid_height as f32 * TILE_SIZE,
        )
    }

    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
}
