use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::components::{center_of, Direction, Ghost, Pacman, Pos};
use crate::config::{Tuning, Variant};
use crate::error::{GameError, GameResult};
use crate::ghost::{GhostSpawn, Mode, HOME_ROW, ROSTER};
use crate::level::{Maze, Tile};

pub const PLAYER_SPAWN: Pos = Pos::new(7, 9);
pub const START_LIVES: u32 = 3;
const PELLET_SCORE: u32 = 10;
const POWER_SCORE: u32 = 50;
const GHOST_SCORE: u32 = 200;

const READY_TEXT: &str = "Use arrow keys or WASD to move";
const WIN_TEXT: &str = "You Win! Press r to play again.";
const LOSS_TEXT: &str = "Game Over! Press r to try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// Text shown outside the maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    pub score: u32,
    pub lives: u32,
    pub status: String,
}

/// Everything one game needs: the maze, the entities and the scoreboard.
pub struct Session {
    pub(crate) maze: Maze,
    pub(crate) pacman: Pacman,
    pub(crate) ghosts: Vec<Ghost>,
    pub(crate) score: u32,
    pub(crate) lives: u32,
    pub(crate) powered_until: Duration,
    pub(crate) outcome: Option<Outcome>,
    status: &'static str,
    variant: Variant,
    tuning: Tuning,
    roster: Vec<GhostSpawn>,
    player_spawn: Pos,
    home: Pos,
}

impl Session {
    pub fn new(variant: Variant, tuning: Tuning) -> GameResult<Session> {
        let roster = match variant {
            Variant::Smooth => ROSTER.to_vec(),
            Variant::Stepped => Vec::new(),
        };
        Session::with_maze(Maze::classic()?, variant, tuning, PLAYER_SPAWN, roster)
    }

    pub fn with_maze(
        maze: Maze,
        variant: Variant,
        tuning: Tuning,
        player_spawn: Pos,
        roster: Vec<GhostSpawn>,
    ) -> GameResult<Session> {
        check_spawn(&maze, "player", player_spawn)?;
        for spawn in &roster {
            check_spawn(&maze, "ghost", spawn.at)?;
        }
        let home = Pos::new(HOME_ROW, maze.cols() as i32 / 2);
        if !roster.is_empty() {
            check_spawn(&maze, "ghost home", home)?;
        }

        let mut session = Session {
            pacman: Pacman::spawn(player_spawn, tuning.player_speed, tuning.tile),
            ghosts: Vec::new(),
            maze,
            score: 0,
            lives: START_LIVES,
            powered_until: Duration::ZERO,
            outcome: None,
            status: READY_TEXT,
            variant,
            tuning,
            roster,
            player_spawn,
            home,
        };
        session.restart();
        Ok(session)
    }

    /// Rebuilds the maze and entities and clears the scoreboard.
    pub fn restart(&mut self) {
        self.maze.reset();
        self.pacman = Pacman::spawn(self.player_spawn, self.tuning.player_speed, self.tuning.tile);
        self.ghosts = self.roster.iter().map(|s| s.spawn(self.tuning.tile)).collect();
        self.score = 0;
        self.lives = START_LIVES;
        self.powered_until = Duration::ZERO;
        self.outcome = None;
        self.status = READY_TEXT;
        info!(variant = ?self.variant, pellets = self.maze.pellets_remaining(), "session started");
    }

    /// Records the direction the player wants next. Ignored once the game is over.
    pub fn request(&mut self, dir: Direction) {
        if self.outcome.is_none() {
            self.pacman.next_direction = Some(dir);
        }
    }

    /// One gameplay tick. `now` is the time since the driver started.
    pub fn frame(&mut self, now: Duration, rng: &mut impl Rng) {
        if self.outcome.is_some() {
            return;
        }
        self.update_player(now);
        if self.outcome.is_some() || self.ghosts.is_empty() {
            return;
        }
        let mode = Mode::at(now, self.powered_until);
        let target = self.pacman.cell(self.tuning.tile);
        for ghost in self.ghosts.iter_mut() {
            ghost.update(&self.maze, target, mode, &self.tuning, rng);
        }
        self.resolve_collisions(now);
    }

    fn update_player(&mut self, now: Duration) {
        let landed = match self.variant {
            Variant::Smooth => {
                self.pacman.try_turn(&self.maze, &self.tuning);
                self.pacman.advance(&self.maze, &self.tuning)
            }
            Variant::Stepped => self.pacman.step_on_grid(&self.maze, &self.tuning),
        };
        if let Some(cell) = landed {
            self.eat(cell, now);
        }
    }

    fn eat(&mut self, cell: Pos, now: Duration) {
        match self.maze.consume(cell) {
            Some(Tile::Pellet) => self.score += PELLET_SCORE,
            Some(Tile::Power) => {
                self.score += POWER_SCORE;
                self.powered_until = now + self.tuning.power_duration;
                debug!(?cell, until_ms = self.powered_until.as_millis() as u64, "power pellet");
            }
            _ => return,
        }
        if self.maze.pellets_remaining() == 0 {
            self.outcome = Some(Outcome::Won);
            self.status = WIN_TEXT;
            info!(score = self.score, "maze cleared");
        }
    }

    fn resolve_collisions(&mut self, now: Duration) {
        let reach = self.tuning.tile * self.tuning.catch_radius;
        for idx in 0..self.ghosts.len() {
            if self.pacman.pos.distance(self.ghosts[idx].pos) >= reach {
                continue;
            }
            if now < self.powered_until {
                self.score += GHOST_SCORE;
                self.ghosts[idx].pos = center_of(self.home, self.tuning.tile);
                debug!(ghost = idx, score = self.score, "ghost eaten");
                continue;
            }

            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                self.outcome = Some(Outcome::Lost);
                self.status = LOSS_TEXT;
                info!(score = self.score, "out of lives");
            } else {
                debug!(ghost = idx, lives = self.lives, "caught");
                self.respawn_after_capture();
            }
            return;
        }
    }

    fn respawn_after_capture(&mut self) {
        let tile = self.tuning.tile;
        self.pacman.pos = center_of(self.player_spawn, tile);
        self.pacman.direction = Direction::None;
        self.pacman.next_direction = None;
        for ghost in self.ghosts.iter_mut() {
            ghost.pos = center_of(ghost.cell(tile), tile);
            ghost.direction = match ghost.direction.opposite() {
                Direction::None => Direction::Left,
                back => back,
            };
        }
        self.powered_until = Duration::ZERO;
    }

    pub fn is_frightened(&self, now: Duration) -> bool {
        Mode::at(now, self.powered_until) == Mode::Frightened
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            lives: self.lives,
            status: self.status.to_string(),
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn pacman(&self) -> &Pacman {
        &self.pacman
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn powered_until(&self) -> Duration {
        self.powered_until
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}

fn check_spawn(maze: &Maze, what: &'static str, at: Pos) -> GameResult<()> {
    if maze.passable(at) {
        Ok(())
    } else {
        Err(GameError::BlockedSpawn {
            what,
            row: at.y,
            col: at.x,
        })
    }
}
