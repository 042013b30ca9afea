//! world‑generation: height‑map, tunnel carving & the tile grid resource
use bevy::input::ButtonInput;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::GameConfig;
use crate::constants::*;

/// map pixel (row‑0 = top) → world (y up)
pub fn map_to_world(terrain_h_px: f32, p: Vec2) -> Vec2 {
    Vec2::new(p.x, terrain_h_px - p.y)
}
/// map pixel → tile index, may be negative / past the edge
pub fn pixel_to_tile(v: f32) -> i32 {
    (v / TILE_SIZE).floor() as i32
}

/// -------- tiles --------
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TileKind {
    Empty,
    Solid,
}

/// -------- resource --------
#[derive(Resource, Clone, PartialEq, Debug)]
pub struct Terrain {
    /// row‑major, `tiles[y][x]`
    pub tiles: Vec<Vec<TileKind>>,
    pub width: usize,
    pub height: usize,
}

/// random source shared by every generation pass
#[derive(Resource, Deref, DerefMut)]
pub struct WorldRng(pub StdRng);

impl Terrain {
    pub fn filled(width: usize, height: usize, kind: TileKind) -> Self {
        Self {
            tiles: vec![vec![kind; width]; height],
            width,
            height,
        }
    }

    #[inline]
    pub fn in_bounds(&self, tx: i32, ty: i32) -> bool {
        tx >= 0 && ty >= 0 && (tx as usize) < self.width && (ty as usize) < self.height
    }

    pub fn get(&self, tx: i32, ty: i32) -> Option<TileKind> {
        if !self.in_bounds(tx, ty) {
            return None;
        }
        Some(self.tiles[ty as usize][tx as usize])
    }

    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(self.width as f32 * TILE_SIZE, self.height as f32 * TILE_SIZE)
    }

    /// world‑space centre of tile (x, y)
    pub fn tile_center_world(&self, x: usize, y: usize) -> Vec2 {
        let p = Vec2::new((x as f32 + 0.5) * TILE_SIZE, (y as f32 + 0.5) * TILE_SIZE);
        map_to_world(self.pixel_size().y, p)
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().flatten().filter(|&&k| k == kind).count()
    }
}

/// shortcut used by physics
#[inline]
pub fn solid(terrain: &Terrain, tx: i32, ty: i32) -> bool {
    match terrain.get(tx, ty) {
        Some(kind) => kind == TileKind::Solid,
        None => true, /* out‑of‑bounds treated as solid */
    }
}

/* ===========================================================
   1‑D height‑map (bounded random walk)
   =========================================================== */
pub fn generate_heightmap<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Vec<usize> {
    let lo = height as f64 * HEIGHT_MIN_FRAC;
    let hi = height as f64 * HEIGHT_MAX_FRAC;

    let mut current = height as f64 / 2.0;
    let mut height_map = Vec::with_capacity(width);
    for _ in 0..width {
        current += (rng.gen::<f64>() - 0.5) * 4.0 * NOISE_FACTOR;
        current = current.min(hi).max(lo);
        height_map.push(current.floor() as usize);
    }
    height_map
}

/* ===========================================================
   tunnels
   =========================================================== */
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// tile delta, y grows downward
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CarveStats {
    pub steps: usize,
    pub turns: usize,
    /// tiles that went from solid to empty
    pub cleared: usize,
    /// where the walk stopped
    pub end: (i32, i32),
}

/// random‑walk tunnel; an out‑of‑bounds position burns the step without writing
pub fn carve_tunnels<R: Rng + ?Sized>(
    terrain: &mut Terrain,
    start: (i32, i32),
    length: usize,
    max_turns: usize,
    rng: &mut R,
) -> CarveStats {
    let (mut x, mut y) = start;
    let mut direction = Direction::random(rng);
    let mut stats = CarveStats::default();

    while stats.steps < length && stats.turns < max_turns {
        stats.steps += 1;
        if !terrain.in_bounds(x, y) {
            continue;
        }

        let tile = &mut terrain.tiles[y as usize][x as usize];
        if *tile == TileKind::Solid {
            *tile = TileKind::Empty;
            stats.cleared += 1;
        }

        let (dx, dy) = direction.offset();
        let (nx, ny) = (x + dx, y + dy);

        // draw first: the turn roll is consumed even when the edge forces a turn
        if rng.gen::<f64>() < TURN_CHANCE || !terrain.in_bounds(nx, ny) {
            direction = Direction::random(rng);
            stats.turns += 1;
        } else {
            x = nx;
            y = ny;
        }
    }
    stats.end = (x, y);
    stats
}

/* ===========================================================
   full environment
   =========================================================== */
pub fn generate_environment<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> (Terrain, CarveStats) {
    let mut terrain = Terrain::filled(width, height, TileKind::Solid);

    let height_map = generate_heightmap(width, height, rng);

    /* sky */
    for (x, &surface) in height_map.iter().enumerate() {
        for row in terrain.tiles.iter_mut().take(surface) {
            row[x] = TileKind::Empty;
        }
    }

    /* one tunnel starting just below the surface */
    let start_x = rng.gen_range(0..width);
    let start_y = height_map[start_x] + 1;
    let stats = carve_tunnels(
        &mut terrain,
        (start_x as i32, start_y as i32),
        TUNNEL_LENGTH,
        TUNNEL_MAX_TURNS,
        rng,
    );

    (terrain, stats)
}

/* ---------- startup ---------- */

/// generate the grid & add the Terrain resource
pub fn generate_world_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut rng: ResMut<WorldRng>,
) {
    let (terrain, stats) = generate_environment(config.grid_width, config.grid_height, &mut rng.0);
    info!(
        "generated {}x{} tile map (seed {}): {} empty tiles, tunnel {} steps / {} turns / {} cleared, ends at {:?}",
        terrain.width,
        terrain.height,
        config.seed,
        terrain.count(TileKind::Empty),
        stats.steps,
        stats.turns,
        stats.cleared,
        stats.end,
    );
    commands.insert_resource(terrain);
}

/// R – throw the map away and carve a new one from the same stream
pub fn regenerate_world_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut terrain: ResMut<Terrain>,
    mut rng: ResMut<WorldRng>,
) {
    if !keys.just_pressed(KeyCode::KeyR) {
        return;
    }
    let (fresh, stats) = generate_environment(terrain.width, terrain.height, &mut rng.0);
    info!(
        "regenerated map: {} empty tiles, tunnel {} turns",
        fresh.count(TileKind::Empty),
        stats.turns
    );
    *terrain = fresh;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;

    /// every `gen::<f64>()` yields exactly 0.5
    fn midpoint_rng() -> StepRng {
        StepRng::new(1 << 63, 0)
    }

    #[test]
    fn heightmap_with_midpoint_source_is_flat() {
        assert_eq!(generate_heightmap(5, 10, &mut midpoint_rng()), vec![5, 5, 5, 5, 5]);
    }

    #[test]
    fn heightmap_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for &(w, h) in &[(1, 1), (5, 10), (25, 20), (200, 7), (64, 128)] {
            let hm = generate_heightmap(w, h, &mut rng);
            assert_eq!(hm.len(), w);
            let lo = (h as f64 * HEIGHT_MIN_FRAC).floor() as usize;
            let hi = (h as f64 * HEIGHT_MAX_FRAC).floor() as usize;
            assert!(hm.iter().all(|&v| v >= lo && v <= hi), "{hm:?} outside [{lo}, {hi}]");
        }
    }

    #[test]
    fn heightmap_moves_at_most_one_row_per_column() {
        let mut rng = StdRng::seed_from_u64(11);
        let hm = generate_heightmap(300, 100, &mut rng);
        for pair in hm.windows(2) {
            assert!(pair[0].abs_diff(pair[1]) <= 1, "jump in {pair:?}");
        }
    }

    #[test]
    fn solid_treats_out_of_bounds_as_solid() {
        let t = Terrain::filled(3, 2, TileKind::Empty);
        assert!(!solid(&t, 0, 0));
        assert!(!solid(&t, 2, 1));
        assert!(solid(&t, -1, 0));
        assert!(solid(&t, 0, -1));
        assert!(solid(&t, 3, 0));
        assert!(solid(&t, 0, 2));
    }

    #[test]
    fn carver_respects_turn_limit_and_bounds() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut t = Terrain::filled(12, 9, TileKind::Solid);
            let stats = carve_tunnels(&mut t, (6, 4), 500, 20, &mut rng);
            assert!(stats.turns <= 20);
            assert!(stats.steps <= 500);
            assert_eq!(t.tiles.len(), 9);
            assert!(t.tiles.iter().all(|row| row.len() == 12));
            assert_eq!(t.count(TileKind::Empty), stats.cleared);
            assert_eq!(t.get(6, 4), Some(TileKind::Empty));
        }
    }

    #[test]
    fn carver_out_of_bounds_start_writes_nothing() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut t = Terrain::filled(4, 4, TileKind::Solid);
        let stats = carve_tunnels(&mut t, (4, 10), 100, 50, &mut rng);
        assert_eq!(stats.steps, 100);
        assert_eq!(stats.turns, 0);
        assert_eq!(t.count(TileKind::Empty), 0);
    }

    /// replays a fixed list of `u64` draws and counts how many were taken
    struct ScriptedRng {
        draws: std::collections::VecDeque<u64>,
        taken: usize,
    }

    impl ScriptedRng {
        fn new(draws: &[u64]) -> Self {
            Self { draws: draws.iter().copied().collect(), taken: 0 }
        }
    }

    impl rand::RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }
        fn next_u64(&mut self) -> u64 {
            self.taken += 1;
            self.draws.pop_front().expect("script ran out of draws")
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            fill_from_u64s(self, dest);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            fill_from_u64s(self, dest);
            Ok(())
        }
    }

    fn fill_from_u64s(rng: &mut ScriptedRng, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = rand::RngCore::next_u64(rng).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    /// `gen::<f64>()` → 0.5, never below the turn chance
    const KEEP_GOING: u64 = 1 << 63;
    /// `gen_range(0..4)` → index from the top two bits
    const RIGHT: u64 = 1 << 62;
    const LEFT: u64 = 3 << 62;

    #[test]
    fn carver_rolls_turn_chance_before_edge_check() {
        let mut t = Terrain::filled(3, 1, TileKind::Solid);
        let mut rng = ScriptedRng::new(&[
            RIGHT,      // initial heading
            KEEP_GOING, // (0,0) → (1,0)
            KEEP_GOING, // (1,0) → (2,0)
            KEEP_GOING, // (2,0): edge ahead, roll still consumed…
            LEFT,       // …then the new heading
            KEEP_GOING, // (2,0) → (1,0)
        ]);
        let stats = carve_tunnels(&mut t, (0, 0), 4, 2, &mut rng);

        assert_eq!(rng.taken, 6);
        assert!(rng.draws.is_empty());
        assert_eq!(stats.steps, 4);
        assert_eq!(stats.turns, 1);
        assert_eq!(stats.end, (1, 0));
        assert_eq!(stats.cleared, 3);
        assert_eq!(t.count(TileKind::Solid), 0);
    }

    #[test]
    fn carver_turn_roll_changes_heading_mid_grid() {
        let mut t = Terrain::filled(3, 1, TileKind::Solid);
        let mut rng = ScriptedRng::new(&[
            RIGHT,      // initial heading
            0,          // (0,0): roll 0.0 < 0.1 → turn in place
            RIGHT,      // new heading, same as before
            KEEP_GOING, // (0,0) → (1,0)
        ]);
        let stats = carve_tunnels(&mut t, (0, 0), 2, 5, &mut rng);

        assert_eq!(rng.taken, 4);
        assert_eq!(stats.turns, 1);
        assert_eq!(stats.end, (1, 0));
        assert_eq!(t.tiles[0], vec![TileKind::Empty, TileKind::Solid, TileKind::Solid]);
    }

    #[test]
    fn carver_on_single_tile_turns_every_step() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut t = Terrain::filled(1, 1, TileKind::Solid);
        let stats = carve_tunnels(&mut t, (0, 0), 500, 7, &mut rng);
        // every neighbour is off the grid, so each step is a turn
        assert_eq!(stats.turns, 7);
        assert_eq!(stats.steps, 7);
        assert_eq!(t.tiles[0][0], TileKind::Empty);
    }

    #[test]
    fn environment_has_full_grid_and_open_sky() {
        let mut rng = StdRng::seed_from_u64(1234);
        let (t, stats) = generate_environment(25, 20, &mut rng);
        assert_eq!(t.width, 25);
        assert_eq!(t.height, 20);
        assert_eq!(t.tiles.len(), 20);
        assert!(t.tiles.iter().all(|row| row.len() == 25));
        assert_eq!(t.count(TileKind::Solid) + t.count(TileKind::Empty), 25 * 20);
        assert!(stats.turns <= TUNNEL_MAX_TURNS);
        // the height‑map never drops below 0.2·h, so the top rows are sky
        let sky_rows = (20.0 * HEIGHT_MIN_FRAC) as usize;
        for row in &t.tiles[..sky_rows] {
            assert!(row.iter().all(|&k| k == TileKind::Empty));
        }
        assert!(stats.cleared <= stats.steps);
    }

    #[test]
    fn same_seed_same_map() {
        let (a, _) = generate_environment(30, 20, &mut StdRng::seed_from_u64(77));
        let (b, _) = generate_environment(30, 20, &mut StdRng::seed_from_u64(77));
        assert_eq!(a, b);
    }

    #[test]
    fn tile_centres_flip_to_world_y_up() {
        let t = Terrain::filled(2, 3, TileKind::Empty);
        assert_eq!(t.tile_center_world(0, 0), Vec2::new(16.0, 80.0));
        assert_eq!(t.tile_center_world(1, 2), Vec2::new(48.0, 16.0));
        assert_eq!(pixel_to_tile(-0.5), -1);
        assert_eq!(pixel_to_tile(31.9), 0);
        assert_eq!(pixel_to_tile(32.0), 1);
    }

    #[test]
    fn regenerate_only_on_r() {
        let mut app = App::new();
        app.insert_resource(ButtonInput::<KeyCode>::default());
        app.insert_resource(WorldRng(StdRng::seed_from_u64(2)));
        app.insert_resource(Terrain::filled(25, 20, TileKind::Solid));
        app.add_systems(Update, regenerate_world_system);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyW);
        app.update();
        assert_eq!(app.world().resource::<Terrain>().count(TileKind::Empty), 0);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyR);
        app.update();
        let t = app.world().resource::<Terrain>();
        assert_eq!((t.width, t.height), (25, 20));
        assert!(t.count(TileKind::Empty) > 0);
    }
}
