//! Tile grid terrain: world-to-cell mapping, solidity queries, procedural
//! board generation, and level-text loading.
//!
//! Coordinate convention: +y is up, row 0 is the top of the grid, and rows
//! grow downward as y decreases. Cell `(col, row)` covers the world region
//! `[col, col+1) x [-(row+1), -row)`. Existing level data depends on this
//! mapping exactly; do not change it.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cell code for passable sky
pub const EMPTY: i32 = 0;
/// Cell code for surface soil
pub const TOPSOIL: i32 = 8;
/// Cell code for buried soil
pub const SOIL: i32 = 17;

/// Fatal level-data errors. A malformed board never loads partially;
/// substituting a default tile would silently change gameplay.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level header is missing width/height")]
    MissingHeader,
    #[error("invalid board dimensions {width}x{height}")]
    BadDimensions { width: i64, height: i64 },
    #[error("level has no terrain layer")]
    MissingTerrainLayer,
    #[error("expected {expected} terrain rows, found {found}")]
    RowCountMismatch { expected: usize, found: usize },
    #[error("terrain row {row} has {found} columns, expected {expected}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("terrain row {row}, column {col}: bad cell code {token:?}")]
    BadCellCode {
        row: usize,
        col: usize,
        token: String,
    },
}

/// Map a world coordinate to its (column, row) cell
#[inline]
pub fn world_to_cell(x: f32, y: f32) -> (i64, i64) {
    (x.floor() as i64, (-y - 1.0).ceil() as i64)
}

/// Immutable tile terrain, row-major with row 0 at the top
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<i32>,
}

impl TileGrid {
    /// Build from raw row-major cell codes. Panics when the cell count
    /// does not match the dimensions; this constructor is for callers that
    /// produce boards programmatically, not for untrusted level data.
    pub fn from_cells(width: usize, height: usize, cells: Vec<i32>) -> Self {
        assert_eq!(cells.len(), width * height, "cell count must be width * height");
        Self {
            width,
            height,
            cells,
        }
    }

    /// Procedurally generate a board: a solid floor, then randomized
    /// column growth up to the midline, then a pass that drops
    /// single-width pillars so every platform can be reached.
    ///
    /// A cell is forced to sky whenever any below-neighbor (including
    /// diagonals) is sky, which rules out unclimbable cliffs and floating
    /// platforms. The RNG is injected; a seeded `Pcg32` reproduces the
    /// same board.
    pub fn generate<R: Rng + ?Sized>(width: usize, height: usize, p: f32, rng: &mut R) -> Self {
        assert!(width >= 2 && height >= 2, "board too small to generate");
        let mut grid = Self {
            width,
            height,
            cells: vec![EMPTY; width * height],
        };

        for col in 0..width {
            grid.set(col, height - 1, TOPSOIL);
        }

        // Grow columns bottom-up, one row at a time
        for row in (height / 2..height - 1).rev() {
            for col in 0..width {
                let below_left = col > 0 && grid.cell(col - 1, row + 1) == EMPTY;
                let below = grid.cell(col, row + 1) == EMPTY;
                let below_right = col + 1 < width && grid.cell(col + 1, row + 1) == EMPTY;
                if below_left || below || below_right {
                    continue;
                }
                if rng.random::<f32>() < p {
                    grid.set(col, row, TOPSOIL);
                    grid.set(col, row + 1, SOIL);
                }
            }
        }

        // A lone surface cell flanked by sky on both sides drops one row
        for row in (height / 2..height - 1).rev() {
            for col in 1..width - 1 {
                if grid.cell(col, row) == TOPSOIL
                    && grid.cell(col - 1, row) == EMPTY
                    && grid.cell(col + 1, row) == EMPTY
                {
                    grid.set(col, row, EMPTY);
                    grid.set(col, row + 1, TOPSOIL);
                }
            }
        }

        log::info!("generated {width}x{height} board (growth p={p})");
        grid
    }

    /// Parse the `[header]`/`[layer]` level-text format: `width=`/`height=`
    /// keys, then a `type=Terrain` layer of comma-separated integer cell
    /// codes, one row per line. Codes of zero or less load as empty.
    pub fn from_level_text(text: &str) -> Result<Self, LevelError> {
        let mut width: Option<i64> = None;
        let mut height: Option<i64> = None;
        let mut terrain: Option<Vec<i32>> = None;

        let mut lines = text.lines();
        while let Some(line) = lines.next() {
            match line.trim() {
                "[header]" => {
                    for l in lines.by_ref() {
                        let l = l.trim();
                        if l.is_empty() {
                            break;
                        }
                        if let Some((key, value)) = l.split_once('=') {
                            let value = value.trim().parse::<i64>().unwrap_or(-1);
                            match key.trim() {
                                "width" => width = Some(value),
                                "height" => height = Some(value),
                                _ => {}
                            }
                        }
                    }
                }
                "[layer]" => {
                    let (w, h) = match (width, height) {
                        (Some(w), Some(h)) => (w, h),
                        _ => return Err(LevelError::MissingHeader),
                    };
                    if w <= 0 || h <= 0 {
                        return Err(LevelError::BadDimensions {
                            width: w,
                            height: h,
                        });
                    }
                    let (w, h) = (w as usize, h as usize);

                    // Skip the layer's key=value lines up to the data marker
                    let mut is_terrain = false;
                    for l in lines.by_ref() {
                        let l = l.trim();
                        if let Some((key, value)) = l.split_once('=') {
                            match key.trim() {
                                "type" => is_terrain = value.trim() == "Terrain",
                                "data" => break,
                                _ => {}
                            }
                        } else {
                            break;
                        }
                    }
                    if !is_terrain {
                        continue;
                    }

                    let mut cells = Vec::with_capacity(w * h);
                    for row in 0..h {
                        let line = match lines.next() {
                            Some(l) if !l.trim().is_empty() => l,
                            _ => {
                                return Err(LevelError::RowCountMismatch {
                                    expected: h,
                                    found: row,
                                });
                            }
                        };
                        let tokens: Vec<&str> = line.trim().split(',').collect();
                        if tokens.len() != w {
                            return Err(LevelError::ColumnCountMismatch {
                                row,
                                expected: w,
                                found: tokens.len(),
                            });
                        }
                        for (col, token) in tokens.iter().enumerate() {
                            let code = token.trim().parse::<i32>().map_err(|_| {
                                LevelError::BadCellCode {
                                    row,
                                    col,
                                    token: token.trim().to_string(),
                                }
                            })?;
                            cells.push(code.max(EMPTY));
                        }
                    }
                    terrain = Some(cells);
                }
                _ => {}
            }
        }

        match (width, height, terrain) {
            (Some(w), Some(h), Some(cells)) => {
                log::info!("loaded {w}x{h} level");
                Ok(Self {
                    width: w as usize,
                    height: h as usize,
                    cells,
                })
            }
            (None, _, _) | (_, None, _) => Err(LevelError::MissingHeader),
            _ => Err(LevelError::MissingTerrainLayer),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw cell code at (col, row); callers stay within bounds
    pub fn cell(&self, col: usize, row: usize) -> i32 {
        self.cells[row * self.width + col]
    }

    fn set(&mut self, col: usize, row: usize, code: i32) {
        self.cells[row * self.width + col] = code;
    }

    /// Whether (col, row) holds solid terrain. Anything outside the board
    /// is open air, so entities can fall off the world edge.
    pub fn is_solid(&self, col: i64, row: i64) -> bool {
        if col < 0 || col >= self.width as i64 || row < 0 || row >= self.height as i64 {
            return false;
        }
        self.cell(col as usize, row as usize) != EMPTY
    }

    /// Solidity at a world-space point
    pub fn solid_at(&self, x: f32, y: f32) -> bool {
        let (col, row) = world_to_cell(x, y);
        self.is_solid(col, row)
    }

    /// Vertical displacement that places a foot point at `(x, y)` exactly
    /// on the top edge of its solid cell; zero when the point is in open
    /// air
    pub fn ground_adjustment(&self, x: f32, y: f32) -> f32 {
        if !self.solid_at(x, y) {
            return 0.0;
        }
        y.ceil() - y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_world_to_cell_mapping() {
        // Cell (2, 3) covers x in [2, 3) and y in [-4, -3)
        assert_eq!(world_to_cell(2.5, -3.5), (2, 3));
        assert_eq!(world_to_cell(2.0, -3.0001), (2, 3));
        assert_eq!(world_to_cell(0.5, -0.5), (0, 0));
        // Just above the top of the grid
        assert_eq!(world_to_cell(0.5, 0.5).1, -1);
    }

    #[test]
    fn test_solid_cell_round_trip() {
        let mut cells = vec![EMPTY; 4 * 5];
        cells[3 * 4 + 2] = TOPSOIL; // (col=2, row=3)
        let grid = TileGrid::from_cells(4, 5, cells);
        assert!(grid.solid_at(2.5, -3.5));
        assert!(!grid.solid_at(1.5, -3.5));
        assert!(!grid.solid_at(2.5, -2.5));
    }

    #[test]
    fn test_out_of_bounds_is_open_air() {
        let grid = TileGrid::from_cells(2, 2, vec![TOPSOIL; 4]);
        assert!(!grid.is_solid(-1, 0));
        assert!(!grid.is_solid(0, -1));
        assert!(!grid.is_solid(2, 0));
        assert!(!grid.is_solid(0, 2));
        assert!(grid.is_solid(1, 1));
    }

    #[test]
    fn test_ground_adjustment_snaps_to_cell_top() {
        let mut cells = vec![EMPTY; 4 * 5];
        cells[3 * 4 + 2] = TOPSOIL;
        let grid = TileGrid::from_cells(4, 5, cells);
        let adjust = grid.ground_adjustment(2.5, -3.2);
        assert!((adjust - 0.2).abs() < 1e-5);
        // Open air: no adjustment
        assert_eq!(grid.ground_adjustment(1.5, -3.2), 0.0);
    }

    #[test]
    fn test_generate_floor_is_solid() {
        use crate::consts::{BOARD_HEIGHT, BOARD_LENGTH, GROWTH_P};
        let mut rng = Pcg32::seed_from_u64(7);
        let grid = TileGrid::generate(BOARD_LENGTH, BOARD_HEIGHT, GROWTH_P, &mut rng);
        for col in 0..BOARD_LENGTH {
            assert!(grid.is_solid(col as i64, BOARD_HEIGHT as i64 - 1));
        }
    }

    #[test]
    fn test_generate_no_floating_islands() {
        for seed in 0..4u64 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let grid = TileGrid::generate(50, 18, 0.93, &mut rng);
            for row in 0..grid.height() - 1 {
                for col in 0..grid.width() {
                    if grid.cell(col, row) != EMPTY {
                        // Every solid cell rests on solid ground
                        assert!(
                            grid.cell(col, row + 1) != EMPTY,
                            "floating cell at ({col}, {row}) with seed {seed}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_generate_no_lone_pillars() {
        let mut rng = Pcg32::seed_from_u64(11);
        let grid = TileGrid::generate(50, 18, 0.93, &mut rng);
        for row in 9..17 {
            for col in 1..49 {
                let lone = grid.cell(col, row) == TOPSOIL
                    && grid.cell(col - 1, row) == EMPTY
                    && grid.cell(col + 1, row) == EMPTY;
                assert!(!lone, "lone pillar survived at ({col}, {row})");
            }
        }
    }

    #[test]
    fn test_generate_is_deterministic_under_seed() {
        let a = TileGrid::generate(30, 12, 0.8, &mut Pcg32::seed_from_u64(42));
        let b = TileGrid::generate(30, 12, 0.8, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a.cells, b.cells);
    }

    const LEVEL: &str = "\
[header]
width=3
height=2

[layer]
type=Terrain
data=
0,0,4
1,1,1
";

    #[test]
    fn test_level_text_loads() {
        let grid = TileGrid::from_level_text(LEVEL).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert!(!grid.is_solid(0, 0));
        assert!(grid.is_solid(2, 0));
        assert!(grid.is_solid(0, 1));
    }

    #[test]
    fn test_level_text_negative_codes_load_empty() {
        let text = "[header]\nwidth=2\nheight=1\n\n[layer]\ntype=Terrain\ndata=\n-3,5\n";
        let grid = TileGrid::from_level_text(text).unwrap();
        assert!(!grid.is_solid(0, 0));
        assert!(grid.is_solid(1, 0));
    }

    #[test]
    fn test_level_text_missing_header_fails() {
        let text = "[layer]\ntype=Terrain\ndata=\n1,1\n";
        assert!(matches!(
            TileGrid::from_level_text(text),
            Err(LevelError::MissingHeader)
        ));
    }

    #[test]
    fn test_level_text_row_mismatch_fails() {
        let text = "[header]\nwidth=2\nheight=3\n\n[layer]\ntype=Terrain\ndata=\n1,1\n1,1\n";
        assert!(matches!(
            TileGrid::from_level_text(text),
            Err(LevelError::RowCountMismatch { expected: 3, found: 2 })
        ));
    }

    #[test]
    fn test_level_text_column_mismatch_fails() {
        let text = "[header]\nwidth=3\nheight=1\n\n[layer]\ntype=Terrain\ndata=\n1,1\n";
        assert!(matches!(
            TileGrid::from_level_text(text),
            Err(LevelError::ColumnCountMismatch {
                row: 0,
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_level_text_bad_code_fails() {
        let text = "[header]\nwidth=2\nheight=1\n\n[layer]\ntype=Terrain\ndata=\n1,x\n";
        assert!(matches!(
            TileGrid::from_level_text(text),
            Err(LevelError::BadCellCode { row: 0, col: 1, .. })
        ));
    }

    #[test]
    fn test_level_text_no_terrain_layer_fails() {
        let text = "[header]\nwidth=2\nheight=1\n";
        assert!(matches!(
            TileGrid::from_level_text(text),
            Err(LevelError::MissingTerrainLayer)
        ));
    }
}
