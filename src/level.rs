use crate::components::Pos;
use crate::error::{GameError, GameResult};

/// Built-in maze. Legend: `0` path (seeded with a pellet), `1` wall,
/// `2` pellet, `3` power pellet.
pub const CLASSIC: [&str; 15] = [
    "1111111111111111111",
    "1000000001000000001",
    "1021111101011111101",
    "1000000100000000101",
    "1011110101111010101",
    "1000010101000010101",
    "1111010101011110101",
    "0000010000000000100",
    "1111010111111110111",
    "1000010100000010001",
    "1011110101111011101",
    "1000000101000000001",
    "1021111101011111101",
    "1000000001000000001",
    "1111111111111111111",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Tile {
    Empty = 0,
    Wall = 1,
    Pellet = 2,
    Power = 3,
}

impl Tile {
    pub fn code(self) -> u8 {
        self as u8
    }

    fn from_legend(ch: char) -> Option<Tile> {
        match ch {
            '0' | '2' => Some(Tile::Pellet),
            '1' => Some(Tile::Wall),
            '3' => Some(Tile::Power),
            _ => None,
        }
    }
}

/// Immutable template plus the mutable grid rebuilt from it.
#[derive(Clone, Debug)]
pub struct Maze {
    template: Vec<Vec<Tile>>,
    grid: Vec<Vec<Tile>>,
    rows: usize,
    cols: usize,
}

impl Maze {
    pub fn classic() -> GameResult<Maze> {
        Maze::parse(&CLASSIC)
    }

    pub fn parse(rows: &[&str]) -> GameResult<Maze> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        if height < 3 || width < 3 {
            return Err(GameError::TooSmall {
                rows: height,
                cols: width,
            });
        }

        let mut template = Vec::with_capacity(height);
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(GameError::Ragged {
                    row: y,
                    expected: width,
                    found,
                });
            }
            let mut line = Vec::with_capacity(width);
            for (x, ch) in row.chars().enumerate() {
                let tile = Tile::from_legend(ch).ok_or(GameError::Legend { row: y, col: x, ch })?;
                line.push(tile);
            }
            template.push(line);
        }
        for (y, x) in power_corners(height, width) {
            if template[y][x] == Tile::Wall {
                return Err(GameError::WalledCorner { row: y, col: x });
            }
        }

        let mut maze = Maze {
            grid: template.clone(),
            template,
            rows: height,
            cols: width,
        };
        maze.reset();
        Ok(maze)
    }

    /// Re-seeds every pellet from the template and forces the four corner
    /// power pellets, whatever the current grid holds.
    pub fn reset(&mut self) {
        self.grid = self.template.clone();
        for (y, x) in power_corners(self.rows, self.cols) {
            self.grid[y][x] = Tile::Power;
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.cols && (pos.y as usize) < self.rows
    }

    /// Out-of-bounds reads as a wall, which closes the maze boundary.
    pub fn tile(&self, pos: Pos) -> Tile {
        if self.in_bounds(pos) {
            self.grid[pos.y as usize][pos.x as usize]
        } else {
            Tile::Wall
        }
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        self.tile(pos) == Tile::Wall
    }

    pub fn passable(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && !self.is_wall(pos)
    }

    /// Clears a pellet or power pellet and reports what was there.
    pub fn consume(&mut self, pos: Pos) -> Option<Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        let cell = &mut self.grid[pos.y as usize][pos.x as usize];
        match *cell {
            Tile::Pellet | Tile::Power => {
                let eaten = *cell;
                *cell = Tile::Empty;
                Some(eaten)
            }
            _ => None,
        }
    }

    pub fn pellets_remaining(&self) -> usize {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&t| t == Tile::Pellet || t == Tile::Power)
            .count()
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = &[Tile]> {
        self.grid.iter().map(|row| row.as_slice())
    }
}

/// Cells one step in from each corner; `parse` keeps them off walls.
fn power_corners(rows: usize, cols: usize) -> [(usize, usize); 4] {
    let (r, c) = (rows - 2, cols - 2);
    [(1, 1), (1, c), (r, 1), (r, c)]
}
