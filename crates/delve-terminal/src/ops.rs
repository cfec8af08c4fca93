//! Primitive screen operations
//!
//! Every byte the parser consumes is accounted for by zero or more of
//! these atomic effects. The grid is driven exclusively through them,
//! which keeps it testable without a parser in front of it.

use crate::grid::Color;

/// One atomic effect decoded from the escape stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermOp {
    /// Write a character at the cursor with the current pen, then advance.
    Print(char),

    /// Absolute cursor move, 0-based (CSI coordinates are 1-based and
    /// converted during decode).
    MoveCursor { row: u16, col: u16 },

    /// Relative row motion; negative values move up.
    MoveRows(i16),

    /// Relative column motion; negative values move left.
    MoveCols(i16),

    /// Absolute row, column unchanged (VPA).
    SetRow(u16),

    /// Absolute column, row unchanged (CHA).
    SetCol(u16),

    CarriageReturn,
    LineFeed,
    Backspace,
    Tab,

    /// Change one aspect of the pen used for subsequent prints.
    SetStyle(StyleOp),

    /// Reset the pen to defaults (SGR 0).
    ResetStyle,

    /// Blank out a region of the grid; the cursor does not move.
    Clear(ClearKind),

    /// Switch between the primary and alternate screen. Only one set of
    /// cells is kept, so this clears the grid and records the flag.
    SwitchBuffer(ScreenBuffer),

    SetCursorVisible(bool),

    Bell,

    /// Recognized but irrelevant to screen contents: titles, charset
    /// selection, device queries, private modes we do not track. Never
    /// surfaced as an error.
    Ignored,
}

/// A single pen change carried by SGR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleOp {
    Bold(bool),
    Reverse(bool),
    Underline(bool),
    Fg(Color),
    Bg(Color),
}

/// Which cells an erase sequence blanks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearKind {
    /// Cursor to end of line (EL 0).
    ToLineEnd,
    /// Start of line through cursor (EL 1).
    ToLineStart,
    /// Whole cursor line (EL 2).
    Line,
    /// Cursor to end of screen (ED 0).
    ToScreenEnd,
    /// Start of screen through cursor (ED 1).
    ToScreenStart,
    /// Whole screen (ED 2).
    Screen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenBuffer {
    Primary,
    Alternate,
}
