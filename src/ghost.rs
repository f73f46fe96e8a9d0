use std::cmp::Ordering;
use std::time::Duration;

use rand::Rng;
use tracing::trace;

use crate::canvas::Rgb;
use crate::components::{center_of, heading_cell, off_center, Direction, Ghost, Point, Pos};
use crate::config::Tuning;
use crate::level::Maze;

/// Starting tile, colour, heading and speed of one ghost.
#[derive(Clone, Copy, Debug)]
pub struct GhostSpawn {
    pub at: Pos,
    pub color: Rgb,
    pub direction: Direction,
    pub speed: f64,
}

pub const ROSTER: [GhostSpawn; 3] = [
    GhostSpawn {
        at: Pos::new(7, 8),
        color: Rgb::hex(0xff0000),
        direction: Direction::Left,
        speed: 1.5,
    },
    GhostSpawn {
        at: Pos::new(7, 10),
        color: Rgb::hex(0xffb8ff),
        direction: Direction::Right,
        speed: 1.4,
    },
    GhostSpawn {
        at: Pos::new(6, 8),
        color: Rgb::hex(0x00ffff),
        direction: Direction::Up,
        speed: 1.3,
    },
];

/// Row of the tile eaten ghosts are sent back to. The column is the maze's middle.
pub const HOME_ROW: i32 = 3;

impl GhostSpawn {
    pub fn spawn(&self, tile: f64) -> Ghost {
        Ghost {
            pos: center_of(self.at, tile),
            color: self.color,
            direction: self.direction,
            speed: self.speed,
        }
    }
}

/// Ghost behaviour, derived from the power-mode expiry rather than stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Chase,
    Frightened,
}

impl Mode {
    pub fn at(now: Duration, powered_until: Duration) -> Mode {
        if now < powered_until {
            Mode::Frightened
        } else {
            Mode::Chase
        }
    }

    /// Picks among `options` seen from `from`. Chase takes the option whose
    /// resulting tile is closest to `target`; frightened picks at random
    /// between the two farthest.
    pub fn pick(
        self,
        from: Pos,
        options: &[Direction],
        target: Pos,
        rng: &mut impl Rng,
    ) -> Option<Direction> {
        let mut ranked: Vec<(Direction, f64)> = options
            .iter()
            .map(|&dir| {
                let next = from.step(dir);
                let d = ((next.x - target.x) as f64).hypot((next.y - target.y) as f64);
                (dir, d)
            })
            .collect();
        match self {
            Mode::Chase => {
                ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
                ranked.first().map(|&(dir, _)| dir)
            }
            Mode::Frightened => {
                ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
                if ranked.is_empty() {
                    return None;
                }
                let idx = rng.gen_range(0..ranked.len().min(2));
                Some(ranked[idx].0)
            }
        }
    }
}

/// Open directions from `cell`, never reversing `current`.
pub fn options(maze: &Maze, cell: Pos, current: Direction) -> Vec<Direction> {
    Direction::MOVES
        .iter()
        .copied()
        .filter(|&dir| dir.opposite() != current)
        .filter(|&dir| maze.passable(cell.step(dir)))
        .collect()
}

impl Ghost {
    pub fn update(
        &mut self,
        maze: &Maze,
        target: Pos,
        mode: Mode,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) {
        let tile = tuning.tile;
        let cell = self.cell(tile);
        let center = center_of(cell, tile);
        let (dx, dy) = off_center(self.pos, tile);
        let (fx, fy) = self.direction.delta();
        // Already past the center means the choice for this tile was made.
        let past = (self.pos.x - center.x) * fx as f64 + (self.pos.y - center.y) * fy as f64;
        if dx < tuning.decision_window && dy < tuning.decision_window && past <= 0.0 {
            let open = options(maze, cell, self.direction);
            if open.is_empty() {
                let back = self.direction.opposite();
                if back != Direction::None && maze.passable(cell.step(back)) {
                    self.direction = back;
                }
            } else if let Some(dir) = mode.pick(cell, &open, target, rng) {
                self.direction = dir;
            }
            trace!(?cell, ?mode, direction = ?self.direction, "ghost decision");
            self.pos = center;
        }

        let speed = match mode {
            Mode::Frightened => self.speed * tuning.frightened_speed,
            Mode::Chase => self.speed,
        };
        let (mx, my) = self.direction.delta();
        let next = Point {
            x: self.pos.x + mx as f64 * speed,
            y: self.pos.y + my as f64 * speed,
        };
        if maze.is_wall(heading_cell(next, self.direction, tile)) {
            self.direction = self.direction.opposite();
        } else {
            self.pos = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Tile;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ghost_at(at: Pos, direction: Direction) -> Ghost {
        GhostSpawn {
            at,
            color: Rgb::hex(0xff0000),
            direction,
            speed: 1.5,
        }
        .spawn(32.0)
    }

    #[test]
    fn mode_follows_power_expiry() {
        let until = Duration::from_millis(7000);
        assert_eq!(Mode::at(Duration::from_millis(6999), until), Mode::Frightened);
        assert_eq!(Mode::at(until, until), Mode::Chase);
        assert_eq!(Mode::at(Duration::ZERO, Duration::ZERO), Mode::Chase);
    }

    #[test]
    fn options_exclude_reverse_and_walls() {
        let maze = Maze::classic().unwrap();
        // (1, 1): open right and down.
        let open = options(&maze, Pos::new(1, 1), Direction::Left);
        assert_eq!(open, vec![Direction::Down]);
        let open = options(&maze, Pos::new(1, 1), Direction::None);
        assert_eq!(open, vec![Direction::Right, Direction::Down]);
    }

    #[test]
    fn chase_takes_closest_resulting_tile() {
        let mut rng = StepRng::new(0, 0);
        let from = Pos::new(5, 5);
        let all = Direction::MOVES;
        let pick = Mode::Chase.pick(from, &all, Pos::new(5, 1), &mut rng);
        assert_eq!(pick, Some(Direction::Left));
        let pick = Mode::Chase.pick(from, &all, Pos::new(9, 5), &mut rng);
        assert_eq!(pick, Some(Direction::Down));
    }

    #[test]
    fn frightened_picks_among_two_farthest() {
        let from = Pos::new(5, 5);
        let target = Pos::new(5, 1);
        let all = Direction::MOVES;
        // Right is farthest; up and down tie for second and keep enumeration order.
        let mut first = StepRng::new(0, 0);
        assert_eq!(
            Mode::Frightened.pick(from, &all, target, &mut first),
            Some(Direction::Right)
        );

        let mut seen = Vec::new();
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let dir = Mode::Frightened.pick(from, &all, target, &mut rng).unwrap();
            assert!(matches!(dir, Direction::Right | Direction::Up), "{dir:?}");
            if !seen.contains(&dir) {
                seen.push(dir);
            }
        }
        assert_eq!(seen.len(), 2);

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            Mode::Frightened.pick(from, &[Direction::Left], target, &mut rng),
            Some(Direction::Left)
        );
        assert_eq!(Mode::Frightened.pick(from, &[], target, &mut rng), None);
    }

    #[test]
    fn dead_end_forces_reversal() {
        let maze = Maze::parse(&["11111", "10001", "11111"]).unwrap();
        let tuning = Tuning::default();
        let mut ghost = ghost_at(Pos::new(1, 3), Direction::Right);
        let mut rng = StepRng::new(0, 0);
        ghost.update(&maze, Pos::new(1, 1), Mode::Chase, &tuning, &mut rng);
        assert_eq!(ghost.direction, Direction::Left);
        assert!(ghost.pos.x < 3.0 * tuning.tile);
    }

    #[test]
    fn sealed_ghost_stays_put() {
        let maze = Maze::parse(&["111", "101", "111"]).unwrap();
        let tuning = Tuning::default();
        let mut ghost = ghost_at(Pos::new(1, 1), Direction::Up);
        let start = ghost.pos;
        let mut rng = StepRng::new(0, 0);
        for _ in 0..5 {
            ghost.update(&maze, Pos::new(1, 1), Mode::Chase, &tuning, &mut rng);
        }
        assert_eq!(ghost.pos, start);
    }

    #[test]
    fn ghosts_never_derive_to_a_wall() {
        let maze = Maze::classic().unwrap();
        let tuning = Tuning::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut ghosts: Vec<Ghost> = ROSTER.iter().map(|s| s.spawn(tuning.tile)).collect();
        let targets = [Pos::new(1, 1), Pos::new(13, 17), Pos::new(7, 0), Pos::new(3, 9)];
        for tick in 0..4000 {
            let target = targets[(tick / 500) % targets.len()];
            let mode = if tick % 1000 < 400 {
                Mode::Frightened
            } else {
                Mode::Chase
            };
            for ghost in ghosts.iter_mut() {
                ghost.update(&maze, target, mode, &tuning, &mut rng);
                assert_ne!(maze.tile(ghost.cell(tuning.tile)), Tile::Wall);
            }
        }
    }

    #[test]
    fn chasing_ghost_heads_down_the_corridor() {
        let maze = Maze::classic().unwrap();
        let tuning = Tuning::default();
        let mut rng = StepRng::new(0, 0);
        let mut ghost = ghost_at(Pos::new(1, 1), Direction::None);
        let target = Pos::new(1, 8);
        for _ in 0..100 {
            ghost.update(&maze, target, Mode::Chase, &tuning, &mut rng);
        }
        let cell = ghost.cell(tuning.tile);
        assert_eq!(ghost.direction, Direction::Right);
        assert_eq!(cell.y, 1);
        assert!((5..=7).contains(&cell.x), "{cell:?}");
    }

    #[test]
    fn frightened_ghosts_slow_down() {
        let maze = Maze::parse(&["111111", "100001", "111111"]).unwrap();
        let tuning = Tuning::default();
        let mut rng = StepRng::new(0, 0);
        let start = center_of(Pos::new(1, 1), tuning.tile).x;

        let mut chasing = ghost_at(Pos::new(1, 1), Direction::Right);
        chasing.update(&maze, Pos::new(1, 4), Mode::Chase, &tuning, &mut rng);
        assert_eq!(chasing.direction, Direction::Right);
        assert!((chasing.pos.x - start - 1.5).abs() < 1e-9);

        let mut fleeing = ghost_at(Pos::new(1, 1), Direction::Right);
        fleeing.update(&maze, Pos::new(1, 4), Mode::Frightened, &tuning, &mut rng);
        assert_eq!(fleeing.direction, Direction::Right);
        let moved = fleeing.pos.x - start;
        assert!((moved - 1.5 * tuning.frightened_speed).abs() < 1e-9, "{moved}");
    }

    #[test]
    fn leaving_a_center_does_not_redecide() {
        let maze = Maze::classic().unwrap();
        let tuning = Tuning::default();
        let mut rng = StepRng::new(0, 0);
        let mut ghost = ghost_at(Pos::new(1, 2), Direction::Right);
        ghost.update(&maze, Pos::new(1, 8), Mode::Chase, &tuning, &mut rng);
        let after_one = ghost.pos.x;
        ghost.update(&maze, Pos::new(1, 8), Mode::Chase, &tuning, &mut rng);
        assert!(ghost.pos.x > after_one);
    }
}
