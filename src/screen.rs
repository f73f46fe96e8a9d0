use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthChar;

use crate::canvas::{Raster, Rgb};
use crate::game::Hud;

const UPPER_HALF: &str = "\u{2580}";
const KEY_HELP: &str = "(r restart, q quit)";

/// One text cell: the two raster pixels it shows.
#[derive(Clone, Copy, PartialEq)]
struct Cell {
    top: Rgb,
    bottom: Rgb,
}

/// Presents a raster to the terminal two pixel rows per text row, redrawing
/// only the cells that changed since the previous frame.
pub struct Screen {
    last: Vec<Cell>,
    last_hud: (String, String),
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
    cols: usize,
    rows: usize,
}

impl Screen {
    pub fn new(raster: &Raster) -> Self {
        let cols = raster.width();
        let rows = raster.height().div_ceil(2);
        Self {
            last: vec![
                Cell {
                    top: Rgb::BLACK,
                    bottom: Rgb::BLACK,
                };
                cols * rows
            ],
            last_hud: (String::new(), String::new()),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
            cols,
            rows,
        }
    }

    /// Terminal columns and rows needed for the maze and both HUD lines.
    pub fn needed(&self) -> (u16, u16) {
        (self.cols as u16, (self.rows + 2) as u16)
    }

    pub fn present<W: Write>(
        &mut self,
        out: &mut W,
        term_size: (u16, u16),
        raster: &Raster,
        hud: &Hud,
    ) -> io::Result<()> {
        let (needed_w, needed_h) = self.needed();
        let (term_w, term_h) = term_size;

        out.queue(MoveTo(0, 0))?;
        if term_w < needed_w || term_h < needed_h {
            out.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            out.queue(Print(msg))?;
            out.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.needs_full {
            out.queue(Clear(ClearType::All))?;
        }

        let top = fit(&format!("Score: {}    Lives: {}", hud.score, hud.lives), self.cols);
        let bottom = fit(&format!("{}  {}", hud.status, KEY_HELP), self.cols);
        if self.needs_full || top != self.last_hud.0 {
            self.hud_line(out, self.origin_y - 1, &top)?;
        }
        if self.needs_full || bottom != self.last_hud.1 {
            self.hud_line(out, self.origin_y + self.rows as u16, &bottom)?;
        }
        self.last_hud = (top, bottom);

        for row in 0..self.rows {
            for col in 0..self.cols {
                let top = raster.pixel(col, row * 2);
                let bottom = if row * 2 + 1 < raster.height() {
                    raster.pixel(col, row * 2 + 1)
                } else {
                    Rgb::BLACK
                };
                let cell = Cell { top, bottom };
                let idx = row * self.cols + col;
                if self.needs_full || cell != self.last[idx] {
                    self.last[idx] = cell;
                    self.draw_cell(out, col, row, cell)?;
                }
            }
        }
        self.needs_full = false;

        out.queue(ResetColor)?;
        out.flush()?;
        Ok(())
    }

    fn hud_line<W: Write>(&self, out: &mut W, y: u16, text: &str) -> io::Result<()> {
        out.queue(MoveTo(self.origin_x, y))?;
        out.queue(ResetColor)?;
        out.queue(SetForegroundColor(Color::White))?;
        out.queue(Print(text))?;
        out.queue(ResetColor)?;
        Ok(())
    }

    fn draw_cell<W: Write>(&self, out: &mut W, col: usize, row: usize, cell: Cell) -> io::Result<()> {
        out.queue(MoveTo(self.origin_x + col as u16, self.origin_y + row as u16))?;
        out.queue(SetForegroundColor(term_color(cell.top)))?;
        out.queue(SetBackgroundColor(term_color(cell.bottom)))?;
        out.queue(Print(UPPER_HALF))?;
        Ok(())
    }
}

fn term_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

/// Truncates or pads `text` to exactly `width` terminal columns.
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.extend(std::iter::repeat(' ').take(width - used));
    out
}
