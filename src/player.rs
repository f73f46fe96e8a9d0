use crossterm::event::KeyCode;

use crate::components::{center_of, heading_cell, off_center, Direction, Pacman, Point, Pos};
use crate::config::Tuning;
use crate::level::Maze;

/// Fixed key table: arrows and WASD. Everything else is ignored.
pub fn intent_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
        _ => None,
    }
}

impl Pacman {
    /// Commits the requested direction when the player is close enough to
    /// its tile center and the neighbouring tile is open. Snaps to center.
    pub fn try_turn(&mut self, maze: &Maze, tuning: &Tuning) -> bool {
        let wanted = match self.next_direction {
            Some(dir) if dir != Direction::None && dir != self.direction => dir,
            _ => return false,
        };
        let cell = self.cell(tuning.tile);
        let (dx, dy) = off_center(self.pos, tuning.tile);
        let window = self.speed + tuning.turn_slack;
        if dx > window || dy > window {
            return false;
        }
        if !maze.passable(cell.step(wanted)) {
            return false;
        }
        self.pos = center_of(cell, tuning.tile);
        self.direction = wanted;
        true
    }

    /// Moves one tick along the current direction. Returns the tile to
    /// resolve when the player ends up near its center.
    pub fn advance(&mut self, maze: &Maze, tuning: &Tuning) -> Option<Pos> {
        if self.direction == Direction::None {
            return None;
        }
        let (dx, dy) = self.direction.delta();
        let next = Point {
            x: self.pos.x + dx as f64 * self.speed,
            y: self.pos.y + dy as f64 * self.speed,
        };
        if maze.is_wall(heading_cell(next, self.direction, tuning.tile)) {
            self.direction = Direction::None;
            return None;
        }
        self.pos = next;

        let (ox, oy) = off_center(self.pos, tuning.tile);
        if ox < tuning.eat_window && oy < tuning.eat_window {
            Some(self.cell(tuning.tile))
        } else {
            None
        }
    }

    /// Whole-tile movement used by the stepped variant. The player always
    /// sits on a tile center.
    pub fn step_on_grid(&mut self, maze: &Maze, tuning: &Tuning) -> Option<Pos> {
        let cell = self.cell(tuning.tile);
        if let Some(wanted) = self.next_direction {
            if wanted != Direction::None && maze.passable(cell.step(wanted)) {
                self.direction = wanted;
            }
        }
        if self.direction == Direction::None {
            return None;
        }
        let target = cell.step(self.direction);
        if !maze.passable(target) {
            self.direction = Direction::None;
            return None;
        }
        self.pos = center_of(target, tuning.tile);
        Some(target)
    }
}
