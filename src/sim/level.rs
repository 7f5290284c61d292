//! Level content
//!
//! The simulation only needs a list of bricks and walls per level. Where they
//! come from is behind `LevelProvider`; `PatternLevels` is the stock set of
//! hand-designed grid patterns.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::rect::Rect;
use super::state::{Arena, Brick, PowerUpKind, Wall};

/// Bricks and walls for one level
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelLayout {
    pub bricks: Vec<Brick>,
    pub walls: Vec<Wall>,
}

/// Produces level geometry for the simulation
pub trait LevelProvider {
    /// Build level `level` (1-based) for the given arena.
    ///
    /// `rng` is the simulation's generator; use it for any random choice
    /// that should follow the run seed.
    fn load_level(&self, level: u32, arena: Arena, rng: &mut Pcg32) -> LevelLayout;
}

/// Row colours, cycled top to bottom
pub const PALETTE: [u32; 5] = [
    0xB44CE4, // Purple
    0x5FA7FF, // Blue
    0x79EB5C, // Green
    0xFFE066, // Yellow
    0xFF5D5D, // Red
];

pub const WALL_COLOR: u32 = 0x808080;

/// Largest brick edge
const MAX_BRICK_SIZE: i32 = 30;
/// Brick edge is at most arena width / this
const BRICK_DIVISIONS: i32 = 10;
const MAX_COLUMNS: i32 = 20;
/// Top of the first brick row
const GRID_TOP: i32 = 40;
/// Seed base for the scatter level (layout is fixed per level, not per run)
const SCATTER_SEED: u64 = 12345;

const HEART: [[u8; 7]; 6] = [
    [0, 1, 1, 0, 1, 1, 0],
    [1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1],
    [0, 1, 1, 1, 1, 1, 0],
    [0, 0, 1, 1, 1, 0, 0],
    [0, 0, 0, 1, 0, 0, 0],
];

/// Square-cell grid centred horizontally in the arena
#[derive(Debug, Clone, Copy)]
struct Grid {
    cell: i32,
    cols: i32,
    left: i32,
}

impl Grid {
    fn new(arena: Arena) -> Self {
        let cell = (arena.width / BRICK_DIVISIONS).clamp(1, MAX_BRICK_SIZE);
        let cols = (arena.width / cell).clamp(1, MAX_COLUMNS);
        let left = ((arena.width - cols * cell) / 2).max(0);
        Self { cell, cols, left }
    }

    fn rect(&self, x: i32, row: i32) -> Rect {
        Rect::new(x, GRID_TOP + row * self.cell, self.cell, self.cell)
    }

    fn cell_rect(&self, col: i32, row: i32) -> Rect {
        self.rect(self.left + col * self.cell, row)
    }

    fn brick(&self, col: i32, row: i32) -> Brick {
        brick(self.cell_rect(col, row), row)
    }

    /// Every cell in `rows` rows for which `keep(col, row)` holds
    fn fill(&self, rows: i32, keep: impl Fn(i32, i32) -> bool) -> Vec<Brick> {
        let mut bricks = Vec::new();
        for row in 0..rows {
            for col in 0..self.cols {
                if keep(col, row) {
                    bricks.push(self.brick(col, row));
                }
            }
        }
        bricks
    }
}

fn brick(rect: Rect, row: i32) -> Brick {
    Brick {
        rect,
        color: PALETTE[row as usize % PALETTE.len()],
        destroyed: false,
        power_up: None,
    }
}

/// The stock level set
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternLevels;

impl PatternLevels {
    /// Number of distinct patterns
    pub const LEVEL_COUNT: u32 = 10;

    /// Geometry only, no power-up tags
    pub fn layout(level: u32, arena: Arena) -> LevelLayout {
        let grid = Grid::new(arena);
        let cols = grid.cols;

        match level {
            // Straight rows
            1 => LevelLayout {
                bricks: grid.fill(5, |_, _| true),
                walls: Vec::new(),
            },
            // Checkerboard
            2 => LevelLayout {
                bricks: grid.fill(6, |c, r| (r + c) % 2 == 0),
                walls: Vec::new(),
            },
            // Pyramid
            3 => {
                let mut bricks = Vec::new();
                for row in 0..6 {
                    let count = (cols - row * 2).max(1);
                    let x0 = grid.left + row * (grid.cell / 2);
                    for c in 0..count {
                        bricks.push(brick(grid.rect(x0 + c * grid.cell, row), row));
                    }
                }
                LevelLayout {
                    bricks,
                    walls: Vec::new(),
                }
            }
            // Zigzag
            4 => LevelLayout {
                bricks: grid.fill(6, |c, r| {
                    (r % 2 == 0 && c % 3 != 0) || (r % 2 == 1 && c % 3 == 0)
                }),
                walls: Vec::new(),
            },
            // Hollow rectangle
            5 => LevelLayout {
                bricks: grid.fill(6, |c, r| r == 0 || r == 5 || c == 0 || c == cols - 1),
                walls: Vec::new(),
            },
            // Scatter, fixed per level
            6 => {
                let mut scatter = Pcg32::seed_from_u64(SCATTER_SEED + level as u64);
                let mut bricks = Vec::new();
                for row in 0..7 {
                    for col in 0..cols {
                        if scatter.random_bool(0.45) {
                            bricks.push(grid.brick(col, row));
                        }
                    }
                }
                LevelLayout {
                    bricks,
                    walls: Vec::new(),
                }
            }
            // Diamond between two indestructible pillars
            7 => {
                let rows = 7;
                let mid = cols / 2;
                let mut walls = Vec::new();
                if cols >= 3 {
                    for row in 0..rows {
                        for col in [0, cols - 1] {
                            walls.push(Wall {
                                rect: grid.cell_rect(col, row),
                                color: WALL_COLOR,
                            });
                        }
                    }
                }
                let bricks = grid
                    .fill(rows, |c, r| (mid - r..=mid + r).contains(&c))
                    .into_iter()
                    .filter(|b| !walls.iter().any(|w| w.rect.intersects(&b.rect)))
                    .collect();
                LevelLayout { bricks, walls }
            }
            // Heart
            8 => {
                let offset = ((cols - HEART[0].len() as i32) / 2).max(0);
                let mut bricks = Vec::new();
                for (row, line) in HEART.iter().enumerate() {
                    for (col, cell) in line.iter().enumerate() {
                        let col = offset + col as i32;
                        if *cell == 1 && col < cols {
                            bricks.push(grid.brick(col, row as i32));
                        }
                    }
                }
                LevelLayout {
                    bricks,
                    walls: Vec::new(),
                }
            }
            // Sine wave
            9 => LevelLayout {
                bricks: grid.fill(8, |c, r| ((c as f32 * 0.6).sin() * 2.0 + 3.0) as i32 == r),
                walls: Vec::new(),
            },
            // Cross
            10 => LevelLayout {
                bricks: grid.fill(9, |c, r| c == cols / 2 || r == 4),
                walls: Vec::new(),
            },
            _ => {
                log::warn!("No pattern for level {}, using level 1", level);
                Self::layout(1, arena)
            }
        }
    }
}

impl LevelProvider for PatternLevels {
    fn load_level(&self, level: u32, arena: Arena, rng: &mut Pcg32) -> LevelLayout {
        let mut layout = Self::layout(level, arena);
        assign_power_ups(&mut layout.bricks, rng);
        layout
    }
}

/// Tag `min(3, max(1, n / 20))` random bricks, cycling through the power-up kinds
pub fn assign_power_ups(bricks: &mut [Brick], rng: &mut Pcg32) {
    if bricks.is_empty() {
        return;
    }
    let count = (bricks.len() / 20).clamp(1, 3);
    for i in 0..count {
        let index = rng.random_range(0..bricks.len());
        bricks[index].power_up = Some(PowerUpKind::ROTATION[i % PowerUpKind::ROTATION.len()]);
    }
}
