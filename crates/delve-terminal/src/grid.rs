//! The reconstructed screen
//!
//! A fixed-size 2D buffer of cells plus a cursor. Mutated only through
//! [`Grid::apply`]; the extractor and everything above it read it through
//! [`Grid::render_text`]. All cursor motion and writes clamp into bounds —
//! a hostile or garbled byte stream can never index outside the buffer.

use crate::ops::{ClearKind, ScreenBuffer, StyleOp, TermOp};
use crate::TerminalError;

/// A single character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The character in this cell.
    pub ch: char,

    /// Foreground color.
    pub fg: Color,

    /// Background color.
    pub bg: Color,

    /// Style attributes.
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Default,
            bg: Color::Default,
            style: Style::default(),
        }
    }
}

/// Color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Default terminal color.
    Default,

    /// ANSI 256-color palette index.
    Indexed(u8),

    /// RGB color.
    Rgb(u8, u8, u8),
}

impl Default for Color {
    fn default() -> Self {
        Color::Default
    }
}

/// Style attributes tracked per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub bold: bool,
    pub reverse: bool,
    pub underline: bool,
}

/// Pen state applied to newly printed cells.
#[derive(Debug, Clone, Copy, Default)]
struct Pen {
    fg: Color,
    bg: Color,
    style: Style,
}

/// The complete reconstructed screen.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: u16,
    cols: u16,

    /// Cells in row-major order, always exactly `rows * cols` long.
    cells: Vec<Cell>,

    cursor_row: u16,
    cursor_col: u16,
    cursor_visible: bool,

    /// Whether the application has switched to the alternate screen.
    /// The game runs its full-screen UI there; only one buffer of cells
    /// is kept either way.
    alternate: bool,

    pen: Pen,
}

impl Grid {
    pub fn new(rows: u16, cols: u16) -> Result<Self, TerminalError> {
        if rows == 0 || cols == 0 {
            return Err(TerminalError::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows as usize * cols as usize],
            cursor_row: 0,
            cursor_col: 0,
            cursor_visible: true,
            alternate: false,
            pen: Pen::default(),
        })
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Cursor position as (row, col).
    pub fn cursor(&self) -> (u16, u16) {
        (self.cursor_row, self.cursor_col)
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn alternate_buffer(&self) -> bool {
        self.alternate
    }

    /// Cell at (row, col), or `None` outside the grid.
    pub fn cell(&self, row: u16, col: u16) -> Option<&Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells
            .get(row as usize * self.cols as usize + col as usize)
    }

    /// Apply one primitive operation.
    pub fn apply(&mut self, op: &TermOp) {
        match *op {
            TermOp::Print(ch) => self.print(ch),

            TermOp::MoveCursor { row, col } => {
                self.cursor_row = row.min(self.rows - 1);
                self.cursor_col = col.min(self.cols - 1);
            }
            TermOp::MoveRows(d) => {
                self.cursor_row = offset_clamped(self.cursor_row, d, self.rows);
            }
            TermOp::MoveCols(d) => {
                self.cursor_col = offset_clamped(self.cursor_col, d, self.cols);
            }
            TermOp::SetRow(row) => self.cursor_row = row.min(self.rows - 1),
            TermOp::SetCol(col) => self.cursor_col = col.min(self.cols - 1),

            TermOp::CarriageReturn => self.cursor_col = 0,
            TermOp::LineFeed => {
                // No scrollback: the bottom row is held and overwritten.
                self.cursor_row = (self.cursor_row + 1).min(self.rows - 1);
            }
            TermOp::Backspace => self.cursor_col = self.cursor_col.saturating_sub(1),
            TermOp::Tab => {
                let next = (self.cursor_col / 8 + 1) * 8;
                self.cursor_col = next.min(self.cols - 1);
            }

            TermOp::SetStyle(style_op) => self.set_style(style_op),
            TermOp::ResetStyle => self.pen = Pen::default(),

            TermOp::Clear(kind) => self.clear(kind),

            TermOp::SwitchBuffer(buffer) => {
                self.cells.fill(Cell::default());
                self.alternate = matches!(buffer, ScreenBuffer::Alternate);
            }

            TermOp::SetCursorVisible(visible) => self.cursor_visible = visible,

            TermOp::Bell | TermOp::Ignored => {}
        }
    }

    /// Render the grid as plain rows, attributes stripped. Trailing blanks
    /// are preserved to the full column count: the extractor's positional
    /// rules slice rows by column and depend on uniform width.
    pub fn render_text(&self) -> Vec<String> {
        (0..self.rows as usize)
            .map(|row| {
                let start = row * self.cols as usize;
                self.cells[start..start + self.cols as usize]
                    .iter()
                    .map(|cell| cell.ch)
                    .collect()
            })
            .collect()
    }

    fn print(&mut self, ch: char) {
        let idx = self.cursor_row as usize * self.cols as usize + self.cursor_col as usize;
        self.cells[idx] = Cell {
            ch,
            fg: self.pen.fg,
            bg: self.pen.bg,
            style: self.pen.style,
        };

        self.cursor_col += 1;
        if self.cursor_col >= self.cols {
            self.cursor_col = 0;
            self.cursor_row = (self.cursor_row + 1).min(self.rows - 1);
        }
    }

    fn set_style(&mut self, op: StyleOp) {
        match op {
            StyleOp::Bold(on) => self.pen.style.bold = on,
            StyleOp::Reverse(on) => self.pen.style.reverse = on,
            StyleOp::Underline(on) => self.pen.style.underline = on,
            StyleOp::Fg(color) => self.pen.fg = color,
            StyleOp::Bg(color) => self.pen.bg = color,
        }
    }

    fn clear(&mut self, kind: ClearKind) {
        let cols = self.cols as usize;
        let here = self.cursor_row as usize * cols + self.cursor_col as usize;
        let line_start = self.cursor_row as usize * cols;

        let range = match kind {
            ClearKind::ToLineEnd => here..line_start + cols,
            ClearKind::ToLineStart => line_start..here + 1,
            ClearKind::Line => line_start..line_start + cols,
            ClearKind::ToScreenEnd => here..self.cells.len(),
            ClearKind::ToScreenStart => 0..here + 1,
            ClearKind::Screen => 0..self.cells.len(),
        };

        self.cells[range].fill(Cell::default());
    }
}

fn offset_clamped(pos: u16, delta: i16, limit: u16) -> u16 {
    let moved = pos as i32 + delta as i32;
    moved.clamp(0, limit as i32 - 1) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: u16, cols: u16) -> Grid {
        Grid::new(rows, cols).unwrap()
    }

    #[test]
    fn print_wraps_and_clamps_at_bottom() {
        let mut g = grid(2, 3);
        for ch in "abcdef".chars() {
            g.apply(&TermOp::Print(ch));
        }
        // Wrapped past the bottom-right corner: back to column 0 of the
        // held bottom row.
        assert_eq!(g.cursor(), (1, 0));
        g.apply(&TermOp::Print('X'));
        assert_eq!(g.render_text(), vec!["abc".to_string(), "Xef".to_string()]);
    }

    #[test]
    fn cursor_motion_clamps() {
        let mut g = grid(4, 4);
        g.apply(&TermOp::MoveCursor { row: 100, col: 100 });
        assert_eq!(g.cursor(), (3, 3));
        g.apply(&TermOp::MoveRows(-50));
        g.apply(&TermOp::MoveCols(-50));
        assert_eq!(g.cursor(), (0, 0));
    }

    #[test]
    fn clear_to_line_end_leaves_cursor() {
        let mut g = grid(1, 4);
        for ch in "abcd".chars() {
            g.apply(&TermOp::Print(ch));
        }
        g.apply(&TermOp::MoveCursor { row: 0, col: 1 });
        g.apply(&TermOp::Clear(ClearKind::ToLineEnd));
        assert_eq!(g.render_text(), vec!["a   ".to_string()]);
        assert_eq!(g.cursor(), (0, 1));
    }

    #[test]
    fn switch_buffer_clears_and_flags() {
        let mut g = grid(1, 3);
        g.apply(&TermOp::Print('x'));
        g.apply(&TermOp::SwitchBuffer(ScreenBuffer::Alternate));
        assert!(g.alternate_buffer());
        assert_eq!(g.render_text(), vec!["   ".to_string()]);
    }

    #[test]
    fn render_preserves_trailing_blanks() {
        let mut g = grid(2, 5);
        g.apply(&TermOp::Print('a'));
        let rows = g.render_text();
        assert_eq!(rows[0].len(), 5);
        assert_eq!(rows[1].len(), 5);
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert!(Grid::new(0, 80).is_err());
        assert!(Grid::new(24, 0).is_err());
    }
}
