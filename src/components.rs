use crate::canvas::Rgb;

/// Grid coordinate: `x` is the column, `y` the row. Signed so that
/// neighbours of border tiles can be expressed and rejected as walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(row: i32, col: i32) -> Self {
        Pos { x: col, y: row }
    }

    pub fn step(self, dir: Direction) -> Pos {
        let (dx, dy) = dir.delta();
        Pos {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Continuous pixel position. The center of tile (r, c) is `(c * tile, r * tile)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Direction {
    /// Order in which ghosts enumerate their options.
    pub const MOVES: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::None => (0, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }
}

/// Tile the point rounds to.
pub fn cell_of(point: Point, tile: f64) -> Pos {
    Pos {
        x: (point.x / tile).round() as i32,
        y: (point.y / tile).round() as i32,
    }
}

pub fn center_of(pos: Pos, tile: f64) -> Point {
    Point {
        x: pos.x as f64 * tile,
        y: pos.y as f64 * tile,
    }
}

/// Absolute distance from the center of the point's own tile, per axis.
pub fn off_center(point: Point, tile: f64) -> (f64, f64) {
    let center = center_of(cell_of(point, tile), tile);
    ((point.x - center.x).abs(), (point.y - center.y).abs())
}

/// Tile that a prospective position is heading into while travelling `dir`:
/// its rounded tile, or the neighbour beyond once it has passed that tile's
/// center along the direction of travel.
pub fn heading_cell(next: Point, dir: Direction, tile: f64) -> Pos {
    let cell = cell_of(next, tile);
    let center = center_of(cell, tile);
    let (dx, dy) = dir.delta();
    let past = (next.x - center.x) * dx as f64 + (next.y - center.y) * dy as f64;
    if past > 0.0 {
        cell.step(dir)
    } else {
        cell
    }
}

#[derive(Debug, Clone)]
pub struct Pacman {
    pub pos: Point,
    pub direction: Direction,
    pub next_direction: Option<Direction>,
    pub speed: f64,
    pub radius: f64,
}

impl Pacman {
    pub fn spawn(at: Pos, speed: f64, tile: f64) -> Self {
        Pacman {
            pos: center_of(at, tile),
            direction: Direction::None,
            next_direction: None,
            speed,
            radius: tile * 0.45,
        }
    }

    pub fn cell(&self, tile: f64) -> Pos {
        cell_of(self.pos, tile)
    }
}

#[derive(Debug, Clone)]
pub struct Ghost {
    pub pos: Point,
    pub color: Rgb,
    pub direction: Direction,
    pub speed: f64,
}

impl Ghost {
    pub fn cell(&self, tile: f64) -> Pos {
        cell_of(self.pos, tile)
    }
}
