//! Terminal rendering — the only place that knows about character cells.
//!
//! `TerminalSink` rasterises the logical arena onto a grid of coloured
//! characters, then `present` writes the grid out with crossterm. The bottom
//! row is reserved for the controls hint.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use glam::Vec2;
use stillpoint::render::{Align, Rgb, RenderSink};

const HINT: &str = "WASD move  MOUSE aim  CLICK/F fire  SPACE dash  1-3 pick  Q quit";
const C_HINT: Color = Color::DarkGrey;

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Rgb,
}

const BLANK: Cell = Cell { ch: ' ', fg: Rgb(0, 0, 0) };

pub struct TerminalSink {
    cols: u16,
    rows: u16,
    arena: Vec2,
    offset: Vec2,
    cells: Vec<Cell>,
}

impl TerminalSink {
    pub fn new(cols: u16, rows: u16, arena: Vec2) -> Self {
        let mut sink = Self {
            cols: 0,
            rows: 0,
            arena,
            offset: Vec2::ZERO,
            cells: Vec::new(),
        };
        sink.resize(cols, rows);
        sink
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        // Last row holds the hint.
        self.rows = rows.saturating_sub(1).max(1);
        self.cells = vec![BLANK; self.cols as usize * self.rows as usize];
    }

    /// Logical units covered by one cell, per axis.
    fn cell_size(&self) -> Vec2 {
        Vec2::new(self.arena.x / self.cols as f32, self.arena.y / self.rows as f32)
    }

    fn to_cell(&self, p: Vec2) -> Option<(u16, u16)> {
        let q = (p + self.offset) / self.cell_size();
        if q.x < 0.0 || q.y < 0.0 {
            return None;
        }
        let (c, r) = (q.x as u16, q.y as u16);
        (c < self.cols && r < self.rows).then_some((c, r))
    }

    /// Like `to_cell`, but pins positions outside the grid to its nearest edge.
    fn to_cell_clamped(&self, p: Vec2) -> (u16, u16) {
        let q = ((p + self.offset) / self.cell_size()).max(Vec2::ZERO);
        ((q.x as u16).min(self.cols - 1), (q.y as u16).min(self.rows - 1))
    }

    /// Logical arena position of the centre of a terminal cell.
    pub fn to_logical(&self, col: u16, row: u16) -> Vec2 {
        (Vec2::new(col as f32, row as f32) + 0.5) * self.cell_size()
    }

    fn put(&mut self, col: u16, row: u16, ch: char, fg: Rgb) {
        if col < self.cols && row < self.rows {
            self.cells[row as usize * self.cols as usize + col as usize] = Cell { ch, fg };
        }
    }

    fn plot(&mut self, p: Vec2, ch: char, fg: Rgb) {
        if let Some((c, r)) = self.to_cell(p) {
            self.put(c, r, ch, fg);
        }
    }

    /// Plot `ch` on every cell whose centre lies inside the circle. Circles
    /// smaller than a cell still get their centre cell.
    fn fill_disc(&mut self, center: Vec2, radius: f32, ch: char, fg: Rgb) {
        let size = self.cell_size();
        let Some((cc, cr)) = self.to_cell(center) else {
            return;
        };
        let reach_c = (radius / size.x).ceil() as i32;
        let reach_r = (radius / size.y).ceil() as i32;
        let mut any = false;
        for dr in -reach_r..=reach_r {
            for dc in -reach_c..=reach_c {
                let (c, r) = (cc as i32 + dc, cr as i32 + dr);
                if c < 0 || r < 0 {
                    continue;
                }
                let cell_center = self.to_logical(c as u16, r as u16) - self.offset;
                if cell_center.distance_squared(center) <= radius * radius {
                    self.put(c as u16, r as u16, ch, fg);
                    any = true;
                }
            }
        }
        if !any {
            self.put(cc, cr, ch, fg);
        }
    }

    pub fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.queue(terminal::Clear(terminal::ClearType::All))?;

        let mut current: Option<Rgb> = None;
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * self.cols as usize;
            let line = &self.cells[start..start + self.cols as usize];
            let mut run = String::new();
            for cell in line {
                if cell.ch != ' ' && current != Some(cell.fg) {
                    if !run.is_empty() {
                        out.queue(Print(std::mem::take(&mut run)))?;
                    }
                    let Rgb(r, g, b) = cell.fg;
                    out.queue(style::SetForegroundColor(Color::Rgb { r, g, b }))?;
                    current = Some(cell.fg);
                }
                run.push(cell.ch);
            }
            out.queue(Print(run))?;
        }

        out.queue(cursor::MoveTo(1, self.rows))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(HINT))?;

        // Park cursor in a harmless spot and flush
        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, self.rows))?;
        out.flush()
    }
}

fn polygon_glyph(sides: u32) -> char {
    match sides {
        3 => '▲',
        4 => '◆',
        5 => '✦',
        6 => '⬢',
        _ => '✸',
    }
}

impl RenderSink for TerminalSink {
    fn clear(&mut self, _background: Rgb) {
        self.cells.fill(BLANK);
        self.offset = Vec2::ZERO;
    }

    fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        let cell = self.cell_size();
        if radius * 2.0 < cell.x.min(cell.y) {
            self.plot(center, '·', color);
        } else {
            self.fill_disc(center, radius, '█', color);
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        let steps = 24;
        for i in 0..steps {
            let a = std::f32::consts::TAU * i as f32 / steps as f32;
            self.plot(center + Vec2::new(a.cos(), a.sin()) * radius, 'o', color);
        }
    }

    fn polygon(&mut self, center: Vec2, radius: f32, sides: u32, _rotation: f32, color: Rgb) {
        self.fill_disc(center, radius * 0.8, polygon_glyph(sides), color);
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb) {
        let cell = self.cell_size();
        let steps = ((to - from).length() / cell.x.min(cell.y)).ceil().max(1.0) as u32;
        for i in 0..=steps {
            self.plot(from.lerp(to, i as f32 / steps as f32), '·', color);
        }
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgb) {
        let cell = self.cell_size();
        let mut y = origin.y;
        while y < origin.y + size.y.max(cell.y * 0.5) {
            let mut x = origin.x;
            while x < origin.x + size.x {
                self.plot(Vec2::new(x, y), '█', color);
                x += cell.x;
            }
            y += cell.y;
        }
    }

    fn stroke_rect(&mut self, origin: Vec2, size: Vec2, color: Rgb) {
        let (c0, r0) = self.to_cell_clamped(origin);
        let (c1, r1) = self.to_cell_clamped(origin + size - 0.01);
        for c in c0..=c1 {
            self.put(c, r0, '─', color);
            self.put(c, r1, '─', color);
        }
        for r in r0..=r1 {
            self.put(c0, r, '│', color);
            self.put(c1, r, '│', color);
        }
        self.put(c0, r0, '┌', color);
        self.put(c1, r0, '┐', color);
        self.put(c0, r1, '└', color);
        self.put(c1, r1, '┘', color);
    }

    fn text(&mut self, pos: Vec2, text: &str, color: Rgb, align: Align) {
        let Some((col, row)) = self.to_cell(pos) else {
            return;
        };
        let len = text.chars().count() as u16;
        let start = match align {
            Align::Left => col,
            Align::Center => col.saturating_sub(len / 2),
            Align::Right => col.saturating_sub(len),
        };
        for (i, ch) in text.chars().enumerate() {
            self.put(start + i as u16, row, ch, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARENA: Vec2 = Vec2::new(1280.0, 720.0);

    fn row(sink: &TerminalSink, r: u16) -> String {
        let start = r as usize * sink.cols as usize;
        sink.cells[start..start + sink.cols as usize].iter().map(|c| c.ch).collect()
    }

    #[test]
    fn border_fills_the_grid_edges() {
        let mut sink = TerminalSink::new(40, 21, ARENA);
        sink.stroke_rect(Vec2::ZERO, ARENA, Rgb(1, 2, 3));
        assert!(row(&sink, 0).starts_with('┌'));
        assert!(row(&sink, 0).ends_with('┐'));
        assert!(row(&sink, 19).starts_with('└'));
    }

    #[test]
    fn border_survives_shake_both_ways() {
        for shake in [Vec2::new(9.0, 7.0), Vec2::new(-9.0, -7.0)] {
            let mut sink = TerminalSink::new(40, 21, ARENA);
            sink.set_offset(shake);
            sink.stroke_rect(Vec2::ZERO, ARENA, Rgb(1, 2, 3));
            let top = row(&sink, 0);
            let bottom = row(&sink, 19);
            assert_eq!(top.chars().filter(|&c| c == '─').count(), 38, "shake {shake:?}");
            assert!(top.ends_with('┐'), "shake {shake:?}");
            assert!(bottom.starts_with('└'), "shake {shake:?}");
        }
    }

    #[test]
    fn mouse_cells_map_back_inside_the_arena() {
        let sink = TerminalSink::new(40, 21, ARENA);
        assert_eq!(sink.to_logical(0, 0), Vec2::new(16.0, 18.0));
        assert!(sink.to_logical(39, 19).cmplt(ARENA).all());
    }
}
