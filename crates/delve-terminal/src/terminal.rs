//! Terminal: parser + grid, owned for the whole session
//!
//! One instance lives as long as the game process. Feeding it output
//! chunks keeps the grid current; everything downstream reads the grid
//! through this type.

use crate::grid::Grid;
use crate::parser::Parser;
use crate::TerminalError;

pub struct Terminal {
    parser: Parser,
    grid: Grid,
}

impl Terminal {
    pub fn new(rows: u16, cols: u16) -> Result<Self, TerminalError> {
        Ok(Self {
            parser: Parser::new(),
            grid: Grid::new(rows, cols)?,
        })
    }

    /// Feed a chunk of raw output, mutating the grid. Chunks may split
    /// escape sequences at any byte boundary.
    pub fn process(&mut self, bytes: &[u8]) {
        for op in self.parser.advance(bytes) {
            self.grid.apply(&op);
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The full screen as plain rows; see [`Grid::render_text`].
    pub fn render_text(&self) -> Vec<String> {
        self.grid.render_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positioned_print_lands_where_directed() {
        let mut term = Terminal::new(10, 40).unwrap();
        term.process(b"\x1b[6;5HHealth: 12/20");
        let rows = term.render_text();
        assert_eq!(&rows[5][4..17], "Health: 12/20");
    }
}
