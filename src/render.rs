//! Immediate-mode drawing of one frame onto a [`Raster`].
//!
//! Entity positions are tile centers at `(c * tile, r * tile)`; the maze is
//! drawn with tile `(r, c)` occupying `[c * tile, (c + 1) * tile)`, so every
//! entity is translated by half a tile before drawing.

use std::f64::consts::PI;
use std::time::Duration;

use crate::canvas::{in_circle, Raster, Rgb};
use crate::components::{Direction, Ghost, Pacman};
use crate::game::Session;
use crate::level::Tile;

pub const BACKGROUND: Rgb = Rgb::hex(0x000000);
pub const WALL: Rgb = Rgb::hex(0x1932a6);
pub const PELLET: Rgb = Rgb::hex(0xffd966);
pub const PACMAN: Rgb = Rgb::hex(0xffd700);
pub const FRIGHTENED: Rgb = Rgb::hex(0x1a73e8);
const PUPIL: Rgb = Rgb::hex(0x000000);

const WALL_INSET: f64 = 2.0;
const PELLET_RADIUS: f64 = 4.0;
const POWER_RADIUS: f64 = 8.0;
const MOUTH: f64 = 0.25;

/// Logical size of the drawing surface for a session's maze.
pub fn surface_size(session: &Session) -> (f64, f64) {
    let tile = session.tuning().tile;
    let maze = session.maze();
    (maze.cols() as f64 * tile, maze.rows() as f64 * tile)
}

pub fn paint(raster: &mut Raster, session: &Session, now: Duration) {
    let tile = session.tuning().tile;
    raster.clear(BACKGROUND);

    for (r, row) in session.maze().rows_iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let x = c as f64 * tile;
            let y = r as f64 * tile;
            match cell {
                Tile::Wall => raster.fill_rect(
                    x + WALL_INSET,
                    y + WALL_INSET,
                    tile - 2.0 * WALL_INSET,
                    tile - 2.0 * WALL_INSET,
                    WALL,
                ),
                Tile::Pellet => raster.fill_circle(x + tile / 2.0, y + tile / 2.0, PELLET_RADIUS, PELLET),
                Tile::Power => raster.fill_circle(x + tile / 2.0, y + tile / 2.0, POWER_RADIUS, PELLET),
                Tile::Empty => {}
            }
        }
    }

    draw_pacman(raster, session.pacman(), tile);

    let frightened = session.is_frightened(now);
    for ghost in session.ghosts() {
        draw_ghost(raster, ghost, frightened, tile);
    }
}

fn facing_angle(dir: Direction) -> f64 {
    match dir {
        Direction::Left => PI,
        Direction::Up => -PI / 2.0,
        Direction::Down => PI / 2.0,
        Direction::Right | Direction::None => 0.0,
    }
}

fn draw_pacman(raster: &mut Raster, pac: &Pacman, tile: f64) {
    let cx = pac.pos.x + tile / 2.0;
    let cy = pac.pos.y + tile / 2.0;
    raster.fill_pie(cx, cy, pac.radius, facing_angle(pac.direction), MOUTH, PACMAN);
}

fn draw_ghost(raster: &mut Raster, ghost: &Ghost, frightened: bool, tile: f64) {
    // Body geometry is laid out for a 32 px tile.
    let k = tile / 32.0;
    let cx = ghost.pos.x + tile / 2.0;
    let cy = ghost.pos.y + tile / 2.0;
    let body = if frightened { FRIGHTENED } else { ghost.color };

    // Dome on top, straight sides, three bumps along the skirt.
    let (half_w, dome_y, hem_y, bump) = (12.0 * k, -6.0 * k, 8.0 * k, 4.0 * k);
    raster.fill_where(
        (cx - half_w, cy + dome_y - half_w, cx + half_w, cy + hem_y + bump),
        body,
        |x, y| {
            let (dx, dy) = (x - cx, y - cy);
            let dome = dy <= dome_y && in_circle(dx, dy - dome_y, half_w);
            let sides = dx.abs() <= half_w && dy > dome_y && dy <= hem_y;
            let skirt = dy > hem_y
                && [-8.0 * k, 0.0, 8.0 * k]
                    .iter()
                    .any(|&bx| in_circle(dx - bx, dy - hem_y, bump));
            dome || sides || skirt
        },
    );

    let (lx, rx, ey) = (-4.0 * k, 6.0 * k, -2.0 * k);
    raster.fill_circle(cx + lx, cy + ey, 4.0 * k, Rgb::WHITE);
    raster.fill_circle(cx + rx, cy + ey, 4.0 * k, Rgb::WHITE);

    let (gx, gy) = ghost.direction.delta();
    let (px, py) = (gx as f64 * 1.5 * k, gy as f64 * 1.5 * k);
    raster.fill_circle(cx + lx + px, cy + ey + py, 1.8 * k, PUPIL);
    raster.fill_circle(cx + rx + px, cy + ey + py, 1.8 * k, PUPIL);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{center_of, Pos};
    use crate::config::{Tuning, Variant};

    fn session() -> Session {
        Session::new(Variant::Smooth, Tuning::default()).unwrap()
    }

    #[test]
    fn surface_is_a_whole_number_of_tiles() {
        let s = session();
        assert_eq!(surface_size(&s), (19.0 * 32.0, 15.0 * 32.0));
    }

    #[test]
    fn walls_and_pellets_land_on_their_tiles() {
        let s = session();
        let (w, h) = surface_size(&s);
        let mut raster = Raster::new(w, h, 1.0);
        paint(&mut raster, &s, Duration::ZERO);
        // Wall tile (0, 0): inset fill with a dark border.
        assert_eq!(raster.pixel_at(16.0, 16.0), WALL);
        assert_eq!(raster.pixel_at(0.5, 0.5), BACKGROUND);
        // Pellet at (3, 3), power pellet at (1, 1).
        assert_eq!(raster.pixel_at(3.0 * 32.0 + 16.0, 3.0 * 32.0 + 16.0), PELLET);
        assert_eq!(raster.pixel_at(3.0 * 32.0 + 25.0, 3.0 * 32.0 + 16.0), BACKGROUND);
        assert_eq!(raster.pixel_at(32.0 + 22.0, 32.0 + 16.0), PELLET);
    }

    #[test]
    fn pacman_mouth_faces_its_direction() {
        let mut s = session();
        s.pacman.direction = Direction::Left;
        let (w, h) = surface_size(&s);
        let mut raster = Raster::new(w, h, 1.0);
        paint(&mut raster, &s, Duration::ZERO);
        let c = center_of(Pos::new(7, 9), 32.0);
        let (cx, cy) = (c.x + 16.0, c.y + 16.0);
        assert_eq!(raster.pixel_at(cx + 10.0, cy), PACMAN);
        assert_ne!(raster.pixel_at(cx - 12.0, cy), PACMAN);
    }

    #[test]
    fn ghosts_turn_blue_while_frightened() {
        let mut s = session();
        let (w, h) = surface_size(&s);
        let ghost = s.ghosts()[0].pos;
        // A body pixel clear of the eyes.
        let (bx, by) = (ghost.x + 16.0 - 9.0, ghost.y + 16.0 + 6.0);

        let mut raster = Raster::new(w, h, 1.0);
        paint(&mut raster, &s, Duration::ZERO);
        assert_eq!(raster.pixel_at(bx, by), Rgb::hex(0xff0000));

        s.powered_until = Duration::from_millis(7000);
        paint(&mut raster, &s, Duration::from_millis(10));
        assert_eq!(raster.pixel_at(bx, by), FRIGHTENED);
        paint(&mut raster, &s, Duration::from_millis(7000));
        assert_eq!(raster.pixel_at(bx, by), Rgb::hex(0xff0000));
    }

    #[test]
    fn pupils_follow_the_ghost() {
        let mut s = session();
        let (w, h) = surface_size(&s);
        let ghost = s.ghosts()[0].pos;
        let (ex, ey) = (ghost.x + 16.0 - 4.0, ghost.y + 16.0 - 2.0);

        s.ghosts[0].direction = Direction::Left;
        let mut raster = Raster::new(w, h, 1.0);
        paint(&mut raster, &s, Duration::ZERO);
        assert_eq!(raster.pixel_at(ex - 2.5, ey), PUPIL);
        assert_eq!(raster.pixel_at(ex + 2.5, ey), Rgb::WHITE);

        s.ghosts[0].direction = Direction::Right;
        paint(&mut raster, &s, Duration::ZERO);
        assert_eq!(raster.pixel_at(ex + 2.5, ey), PUPIL);
    }
}
